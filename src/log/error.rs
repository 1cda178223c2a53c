use super::{
    message::{EMPTY_IDENTIFIER, UNSERIALIZABLE_VALUE, UNTERMINATED_TAG, WRITE_FAILURE},
    Pointer, RED, RESET,
};
use crate::{log::Visual, region::Region};
use std::fmt::{Debug, Display, Formatter, Result};

/// Discriminates the failure classes surfaced by compilation and rendering.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ErrorKind {
    /// A tag was opened with `{{` but never closed with `}}`.
    UnterminatedTag,
    /// A tag contained no identifier after surrounding whitespace
    /// was trimmed.
    EmptyIdentifier,
    /// A value could not be serialized for storage.
    Unserializable,
    /// Output could not be written to the buffer.
    Write,
}

impl ErrorKind {
    /// Return a short summary of the [`ErrorKind`].
    pub fn describe(&self) -> &'static str {
        match self {
            ErrorKind::UnterminatedTag => UNTERMINATED_TAG,
            ErrorKind::EmptyIdentifier => EMPTY_IDENTIFIER,
            ErrorKind::Unserializable => UNSERIALIZABLE_VALUE,
            ErrorKind::Write => WRITE_FAILURE,
        }
    }
}

/// Describes an error, and allows adding contextual help text and a
/// visualization.
///
/// # Examples
///
/// Creating an [`Error`] that includes a [`Visual`] of type [`Pointer`]:
///
/// ```
/// use etch::{Error, ErrorKind, Region};
///
/// Error::build(ErrorKind::UnterminatedTag)
///     .with_pointer("hello {{ name", Region::new(6..8))
///     .with_name("template.txt")
///     .with_help("did you close the tag with `}}`?");
/// ```
///
/// When printed with `println!("{:#}", error)` the [`Error`] produces this
/// output:
///
/// ```text
/// error: unterminated tag
///   --> template.txt:1:7
///    |
///  1 | hello {{ name
///    |       ^^
///    |
///   = help: did you close the tag with `}}`?
/// ```
pub struct Error {
    /// The failure class of the [`Error`].
    kind: ErrorKind,
    /// Byte offset of the offending construct within source text,
    /// when known.
    offset: Option<usize>,
    /// A visualization to help illustrate the [`Error`].
    visual: Option<Box<dyn Visual>>,
    /// Additional information to display with the [`Error`].
    help: Option<String>,
    /// The name of the template that the [`Error`] comes from.
    name: Option<String>,
}

impl Error {
    /// Create a new [`Error`] of the given [`ErrorKind`].
    ///
    /// The additional fields may be populated using the various methods
    /// defined on `Error`.
    ///
    /// # Examples
    ///
    /// ```
    /// use etch::{Error, ErrorKind};
    ///
    /// Error::build(ErrorKind::EmptyIdentifier)
    ///     .with_help("tags require an identifier, such as `{{ name }}`");
    /// ```
    pub fn build(kind: ErrorKind) -> Self {
        Error {
            kind,
            offset: None,
            visual: None,
            help: None,
            name: None,
        }
    }

    /// Set the name text, which is the name of the template that the
    /// [`Error`] is related to.
    pub fn with_name<T>(mut self, text: T) -> Self
    where
        T: Into<String>,
    {
        self.name = Some(text.into());

        self
    }

    /// Set the [`Visual`], which is a visualization that helps illustrate
    /// the cause of the error.
    pub fn with_visual(mut self, visual: impl Visual + 'static) -> Self {
        self.visual = Some(Box::new(visual));

        self
    }

    /// Set the byte offset of the offending construct.
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);

        self
    }

    /// Set the visualization to a new [`Pointer`] over the given source
    /// text and [`Region`], and record the `Region` beginning as the
    /// offset of the offending construct.
    pub fn with_pointer<T>(mut self, source: &str, region: T) -> Self
    where
        T: Into<Region>,
    {
        let region = region.into();
        self.offset = Some(region.begin);
        self.visual = Some(Box::new(Pointer::new(source, region)));

        self
    }

    /// Set the help text, which is contextual information to accompany
    /// the reason text.
    pub fn with_help<T>(mut self, text: T) -> Self
    where
        T: Into<String>,
    {
        self.help = Some(text.into());

        self
    }

    /// Return the failure class of the error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Return the byte offset of the offending construct, if known.
    pub fn offset(&self) -> Option<usize> {
        self.offset
    }

    /// Return the name of the template that the error is related to.
    pub fn get_name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        if !f.alternate() {
            writeln!(f, "{self:#}")?;
        }
        f.debug_struct("Error")
            .field("kind", &self.kind)
            .field("offset", &self.offset)
            .field("name", &self.name)
            .field("visual", &self.visual)
            .field("help", &self.help)
            .finish()?;

        Ok(())
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let header = format!("{RED}error{RESET}");
        write!(f, "{header}: {}", self.kind.describe())?;

        if self.visual.is_some() && f.alternate() {
            return self.visual.as_ref().unwrap().display(
                f,
                self.name.as_deref(),
                self.help.as_deref(),
            );
        }

        Ok(())
    }
}

impl std::error::Error for Error {}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.offset == other.offset
            && self.help == other.help
            && self.name == other.name
    }
}
