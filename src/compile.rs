mod parse;
mod template;

pub use parse::{Parser, BEGIN_TAG, END_TAG};
pub use template::{Block, BlockKind, Template};

use crate::log::Error;

/// Compile a [`Template`] from the given text.
///
/// The returned `Template` borrows `text`; use [`Template::into_owned`]
/// to copy the source once and lift that restriction.
///
/// # Errors
///
/// Returns an [`Error`] when the text contains an unterminated tag, or
/// a tag with no identifier.
///
/// # Examples
///
/// ```
/// use etch::compile;
///
/// let template = compile("{{ name }}");
/// assert!(template.is_ok())
/// ```
pub fn compile(text: &str) -> Result<Template<'_>, Error> {
    Parser::new(text).compile()
}
