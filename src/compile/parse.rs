use super::template::{Block, BlockKind, Template};
use crate::{
    log::{Error, ErrorKind},
    region::Region,
    scan,
};
use std::borrow::Cow;

/// Marks the beginning of a tag.
pub const BEGIN_TAG: &str = "{{";
/// Marks the end of a tag.
pub const END_TAG: &str = "}}";

/// Divides a tag body into identifier, format and culture tokens.
const DIVIDER: u8 = b':';
/// Trimmed from both sides of every tag token.
const WHITESPACE: u8 = b' ';

/// Tracks the [`Parser`] position relative to tag markers and
/// determines the action taken on the next scan step.
#[derive(Debug, PartialEq)]
enum State {
    /// Scanning literal text.
    Literal,
    /// Inside of a tag.
    ///
    /// Remembers the offset of the `{{` so an unterminated tag can be
    /// reported against it.
    Tag { open: usize },
}

/// Provides methods to read source text as [`Block`] instances.
pub struct Parser<'source> {
    /// Reference to the source text.
    source: &'source str,
    /// Position within source.
    cursor: usize,
    /// Tracks the [`Parser`] state and determines the action taken
    /// when the next [`Block`] is scanned.
    state: State,
}

impl<'source> Parser<'source> {
    /// Create a new Parser from the given string.
    #[inline]
    pub fn new(source: &'source str) -> Self {
        Self {
            source,
            cursor: 0,
            state: State::Literal,
        }
    }

    /// Compile the template.
    ///
    /// Source is consumed in a single left to right pass, one [`Block`]
    /// per scan step. The [`BlockKind::None`] and [`BlockKind::End`]
    /// sentinels are bookkeeping for individual steps and are consumed
    /// here, so a compiled [`Template`] contains only raw and
    /// identifier blocks.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when a tag is left unterminated, or has no
    /// identifier after whitespace is trimmed. The error carries the
    /// byte offset of the offending `{{`; no partial [`Template`] is
    /// returned.
    pub fn compile(mut self) -> Result<Template<'source>, Error> {
        let mut blocks = vec![];

        loop {
            let block = self.next_block()?;
            match block.kind {
                BlockKind::None => continue,
                BlockKind::End => break,
                _ => blocks.push(block),
            }
        }

        Ok(Template::new(Cow::Borrowed(self.source), blocks))
    }

    /// Return the next [`Block`].
    fn next_block(&mut self) -> Result<Block, Error> {
        match self.state {
            State::Literal => Ok(self.scan_literal()),
            State::Tag { open } => self.scan_tag(open),
        }
    }

    /// Return the next [`Block`] in [`State::Literal`] configuration.
    ///
    /// Everything up to the next `{{` is one verbatim raw block. An
    /// empty literal run, as between back to back tags, yields the
    /// `None` sentinel so no empty raw block is emitted.
    fn scan_literal(&mut self) -> Block {
        let from = self.cursor;
        let bytes = self.source.as_bytes();
        if from == bytes.len() {
            return Block::end();
        }

        match scan::find(&bytes[from..], BEGIN_TAG.as_bytes()) {
            Some(position) => {
                let marker = from + position;
                self.state = State::Tag { open: marker };
                self.cursor = marker + BEGIN_TAG.len();

                if marker == from {
                    Block::none()
                } else {
                    Block::raw(from..marker)
                }
            }
            None => {
                self.cursor = bytes.len();

                Block::raw(from..bytes.len())
            }
        }
    }

    /// Return the next [`Block`] in [`State::Tag`] configuration.
    ///
    /// Assumes the cursor is just past a `{{`. The body strictly
    /// between the markers is divided at `:` into identifier, format
    /// and culture tokens, each trimmed of surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when no closing `}}` exists, or the
    /// identifier is empty after trimming.
    fn scan_tag(&mut self, open: usize) -> Result<Block, Error> {
        let bytes = self.source.as_bytes();
        let position = scan::find(&bytes[self.cursor..], END_TAG.as_bytes()).ok_or_else(|| {
            Error::build(ErrorKind::UnterminatedTag)
                .with_pointer(self.source, open..open + BEGIN_TAG.len())
                .with_help(format!("did you close the tag with `{END_TAG}`?"))
        })?;

        let close = self.cursor + position;
        let body = Region::new(self.cursor..close);
        self.cursor = close + END_TAG.len();
        self.state = State::Literal;

        let (name, tail) = self.divide(body);
        let name = self.trimmed(name).ok_or_else(|| {
            Error::build(ErrorKind::EmptyIdentifier)
                .with_pointer(self.source, open..self.cursor)
                .with_help("tags require an identifier, such as `{{ name }}`")
        })?;

        let (format, culture) = match tail {
            Some(tail) => {
                let (format, culture) = self.divide(tail);
                (
                    self.trimmed(format),
                    culture.and_then(|culture| self.trimmed(culture)),
                )
            }
            None => (None, None),
        };

        Ok(Block::identifier(name, format, culture))
    }

    /// Split the [`Region`] at its first divider.
    ///
    /// The right half excludes the divider itself, and is absent when
    /// the `Region` contains no divider.
    fn divide(&self, region: Region) -> (Region, Option<Region>) {
        let bytes = &self.source.as_bytes()[region.begin..region.end];

        match scan::find(bytes, &[DIVIDER]) {
            Some(at) => (
                Region::new(region.begin..region.begin + at),
                Some(Region::new(region.begin + at + 1..region.end)),
            ),
            None => (region, None),
        }
    }

    /// Shrink the [`Region`] past any surrounding whitespace.
    ///
    /// Returns `None` when nothing remains.
    fn trimmed(&self, region: Region) -> Option<Region> {
        let bytes = &self.source.as_bytes()[region.begin..region.end];
        let first = scan::find_first_not(bytes, WHITESPACE)?;
        let last = scan::find_last_not(bytes, WHITESPACE)
            .expect("a region with a leading non-space byte has a trailing one");

        Some(Region::new(region.begin + first..region.begin + last + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::{Parser, State};
    use crate::{
        compile::template::BlockKind,
        log::{Error, ErrorKind},
        region::Region,
    };

    #[test]
    fn test_no_tags_single_raw_block() {
        let template = Parser::new("lorem ipsum").compile().unwrap();
        let blocks = template.blocks();

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind, BlockKind::Raw);
        assert_eq!(blocks[0].payload.literal(template.source()), "lorem ipsum");
    }

    #[test]
    fn test_empty_source_zero_blocks() {
        let template = Parser::new("").compile().unwrap();

        assert!(template.blocks().is_empty());
    }

    #[test]
    fn test_whitespace_invariance() {
        for source in ["{{A}}", "{{ A }}", "{{  A  }}"] {
            let template = Parser::new(source).compile().unwrap();
            let blocks = template.blocks();

            assert_eq!(blocks.len(), 1);
            assert_eq!(blocks[0].kind, BlockKind::Identifier);
            assert_eq!(blocks[0].payload.literal(template.source()), "A");
        }
    }

    #[test]
    fn test_adjacent_tags_no_raw_between() {
        let template = Parser::new("{{A}}{{B}}").compile().unwrap();
        let blocks = template.blocks();

        assert_eq!(blocks.len(), 2);
        assert!(blocks.iter().all(|b| b.kind == BlockKind::Identifier));
        assert_eq!(blocks[0].payload.literal(template.source()), "A");
        assert_eq!(blocks[1].payload.literal(template.source()), "B");
    }

    #[test]
    fn test_mixed_block_sequence() {
        let template = Parser::new("x{{ A }}123{{ B }}x").compile().unwrap();
        let kinds: Vec<_> = template.blocks().iter().map(|b| b.kind).collect();

        assert_eq!(
            kinds,
            vec![
                BlockKind::Raw,
                BlockKind::Identifier,
                BlockKind::Raw,
                BlockKind::Identifier,
                BlockKind::Raw,
            ]
        );
    }

    #[test]
    fn test_format_token() {
        let template = Parser::new("{{ total : F2 }}").compile().unwrap();
        let block = &template.blocks()[0];

        assert_eq!(block.payload.literal(template.source()), "total");
        assert_eq!(
            block.format.map(|f| f.literal(template.source())),
            Some("F2")
        );
        assert_eq!(block.culture, None);
    }

    #[test]
    fn test_format_and_culture_tokens() {
        let template = Parser::new("{{total:F2:de-DE}}").compile().unwrap();
        let block = &template.blocks()[0];

        assert_eq!(block.payload.literal(template.source()), "total");
        assert_eq!(
            block.format.map(|f| f.literal(template.source())),
            Some("F2")
        );
        assert_eq!(
            block.culture.map(|c| c.literal(template.source())),
            Some("de-DE")
        );
    }

    #[test]
    fn test_empty_format_token_is_absent() {
        let template = Parser::new("{{ total : }}").compile().unwrap();

        assert_eq!(template.blocks()[0].format, None);
    }

    #[test]
    fn test_unterminated_tag() {
        let result = Parser::new("lorem {{A").compile();

        let error = result.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::UnterminatedTag);
        assert_eq!(error.offset(), Some(6));
    }

    #[test]
    fn test_unterminated_tag_at_end() {
        let error = Parser::new("lorem {{").compile().unwrap_err();

        assert_eq!(error.kind(), ErrorKind::UnterminatedTag);
        assert_eq!(error.offset(), Some(6));
    }

    #[test]
    fn test_empty_identifier() {
        let error = Parser::new("a{{   }}b").compile().unwrap_err();

        assert_eq!(error.kind(), ErrorKind::EmptyIdentifier);
        assert_eq!(error.offset(), Some(1));
    }

    #[test]
    fn test_second_close_pairs_with_first_open() {
        // No escape syntax exists, so the nearest `}}` closes the tag
        // and the remainder is literal text.
        let template = Parser::new("{{A}}}}").compile().unwrap();
        let blocks = template.blocks();

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].kind, BlockKind::Identifier);
        assert_eq!(blocks[1].kind, BlockKind::Raw);
        assert_eq!(blocks[1].payload.literal(template.source()), "}}");
    }

    #[test]
    fn test_state_change() {
        let mut parser = Parser::new("lorem {{");
        parser.next_block().unwrap();

        assert_eq!(parser.state, State::Tag { open: 6 });
    }

    #[test]
    fn test_raw_block_regions() -> Result<(), Error> {
        let template = Parser::new("a{{ b }}c").compile()?;
        let blocks = template.blocks();

        assert_eq!(blocks[0].payload, Region::new(0..1));
        assert_eq!(blocks[1].payload, Region::new(4..5));
        assert_eq!(blocks[2].payload, Region::new(8..9));

        Ok(())
    }
}
