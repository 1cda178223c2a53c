use crate::region::Region;
use std::borrow::Cow;

/// Identifies the role of a [`Block`].
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BlockKind {
    /// A scan step that produced nothing.
    ///
    /// Bookkeeping only; never part of a compiled [`Template`].
    None,
    /// Literal text, written to output verbatim.
    Raw,
    /// A tag, resolved against a context during rendering.
    Identifier,
    /// End of input reached.
    ///
    /// Bookkeeping only; never part of a compiled [`Template`].
    End,
}

/// One syntactic unit of a template.
///
/// The payload and token fields are [`Region`] instances indexing the
/// source text of the owning [`Template`].
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Block {
    /// The role of this [`Block`].
    pub kind: BlockKind,
    /// For [`BlockKind::Raw`] the literal text, for
    /// [`BlockKind::Identifier`] the trimmed identifier name.
    pub payload: Region,
    /// The trimmed format token, when the tag carries one.
    pub format: Option<Region>,
    /// The trimmed culture token, when the tag carries one.
    pub culture: Option<Region>,
}

impl Block {
    /// Create a new Raw Block over the given Region.
    pub(crate) fn raw<T>(payload: T) -> Self
    where
        T: Into<Region>,
    {
        Self {
            kind: BlockKind::Raw,
            payload: payload.into(),
            format: None,
            culture: None,
        }
    }

    /// Create a new Identifier Block.
    pub(crate) fn identifier(
        payload: Region,
        format: Option<Region>,
        culture: Option<Region>,
    ) -> Self {
        Self {
            kind: BlockKind::Identifier,
            payload,
            format,
            culture,
        }
    }

    /// Create a new None sentinel Block.
    pub(crate) fn none() -> Self {
        Self::sentinel(BlockKind::None)
    }

    /// Create a new End sentinel Block.
    pub(crate) fn end() -> Self {
        Self::sentinel(BlockKind::End)
    }

    fn sentinel(kind: BlockKind) -> Self {
        Self {
            kind,
            payload: Region::new(0..0),
            format: None,
            culture: None,
        }
    }
}

/// A compiled template that can be rendered against a
/// [`Context`][`crate::Context`].
///
/// A Template is immutable once compiled and may be shared across
/// threads for concurrent renders. An empty source compiles to zero
/// blocks; a source with no tags compiles to a single [`BlockKind::Raw`]
/// block spanning the whole input.
#[derive(Debug, Clone)]
pub struct Template<'source> {
    /// The source text that the block regions index into.
    source: Cow<'source, str>,
    /// The blocks of the Template, in render order.
    blocks: Vec<Block>,
}

impl<'source> Template<'source> {
    /// Create a new Template from the given source and blocks.
    pub(crate) fn new(source: Cow<'source, str>, blocks: Vec<Block>) -> Self {
        Self { source, blocks }
    }

    /// Return the source text of the Template.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Return the blocks of the Template, in render order.
    ///
    /// Only [`BlockKind::Raw`] and [`BlockKind::Identifier`] blocks
    /// appear here.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Copy the source text so the Template no longer borrows it.
    pub fn into_owned(self) -> Template<'static> {
        Template {
            source: Cow::Owned(self.source.into_owned()),
            blocks: self.blocks,
        }
    }
}
