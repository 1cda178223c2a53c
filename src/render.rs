use crate::{
    compile::{BlockKind, Template},
    format::Culture,
    log::{error_write, Error},
    pipe::Pipe,
    sink::{Pool, PooledSink, Sink},
    store::{Context, Value},
};

/// Render a [`Template`] against the given [`Context`], writing output
/// into the given [`Sink`].
///
/// Identifiers that are not found in the context write nothing; the
/// surrounding literal text still renders.
///
/// # Errors
///
/// Returns an [`Error`] when writing a formattable value fails.
///
/// # Examples
///
/// ```
/// use etch::{compile, render, Pool, PooledSink, Sink, Store};
///
/// let template = compile("hello, {{ name }}!").unwrap();
/// let store = Store::new().with_text("name", "taylor");
///
/// let pool = Pool::new();
/// let mut sink = PooledSink::new(&pool);
/// render(&template, &mut sink, &store).unwrap();
/// assert_eq!(sink.written(), b"hello, taylor!");
/// ```
pub fn render<C>(template: &Template, sink: &mut dyn Sink, context: &C) -> Result<(), Error>
where
    C: Context + ?Sized,
{
    Renderer::new(template, context).render(sink)
}

/// Render a [`Template`] against the given [`Context`] and return the
/// output as bytes.
///
/// Provides a shortcut to quickly render a `Template` without setting
/// up a [`Sink`]; output is staged in a [`PooledSink`] backed by the
/// process wide shared [`Pool`].
///
/// # Errors
///
/// Returns an [`Error`] when writing a formattable value fails.
///
/// # Examples
///
/// ```
/// use etch::{compile, render_to_vec, Store};
///
/// let template = compile("hello, {{ name }}!").unwrap();
/// let output = render_to_vec(&template, &Store::new().with_text("name", "taylor"));
/// assert_eq!(output.unwrap(), b"hello, taylor!");
/// ```
pub fn render_to_vec<C>(template: &Template, context: &C) -> Result<Vec<u8>, Error>
where
    C: Context + ?Sized,
{
    let mut sink = PooledSink::new(Pool::shared());
    Renderer::new(template, context).render(&mut sink)?;

    Ok(sink.to_vec())
}

/// Interprets the blocks of a [`Template`] against a [`Context`].
pub struct Renderer<'template, 'context, C: ?Sized> {
    /// The template being rendered.
    template: &'template Template<'template>,
    /// The context that identifiers are resolved against.
    context: &'context C,
    /// Culture applied when a tag carries no culture token.
    culture: Culture,
}

impl<'template, 'context, C> Renderer<'template, 'context, C>
where
    C: Context + ?Sized,
{
    /// Create a new Renderer.
    pub fn new(template: &'template Template<'template>, context: &'context C) -> Self {
        Renderer {
            template,
            context,
            culture: Culture::INVARIANT,
        }
    }

    /// Set the default [`Culture`], used when a tag carries no culture
    /// token.
    ///
    /// Returns the Renderer, so additional methods may be chained.
    pub fn with_culture(mut self, culture: Culture) -> Self {
        self.culture = culture;
        self
    }

    /// Render the [`Template`] stored inside the [`Renderer`].
    ///
    /// Blocks are visited once, in order. Raw payloads and resolved
    /// byte or text values are copied verbatim, UTF-16 values are
    /// transcoded, and formattable values are written under the tag's
    /// format and culture tokens. Identifiers missing from the context
    /// write nothing.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when writing a formattable value to the
    /// sink fails.
    ///
    /// # Panics
    ///
    /// Panics if a sentinel block reaches the renderer; a compiled
    /// [`Template`] never contains one.
    pub fn render(&self, sink: &mut dyn Sink) -> Result<(), Error> {
        let source = self.template.source();
        let mut pipe = Pipe::new(sink);

        for block in self.template.blocks() {
            match block.kind {
                BlockKind::Raw => pipe.write_bytes(block.payload.literal(source).as_bytes()),
                BlockKind::Identifier => {
                    let name = block.payload.literal(source);
                    match self.context.get_bytes(name.as_bytes()) {
                        Some(Value::Bytes(bytes)) => pipe.write_bytes(bytes),
                        Some(Value::Utf16(units)) => pipe.write_utf16(units),
                        Some(Value::Text(text)) => pipe.write_bytes(text.as_bytes()),
                        Some(Value::Formatted(value)) => {
                            let format = block.format.map(|region| region.literal(source));
                            let culture = block
                                .culture
                                .map(|region| Culture::named(region.literal(source)))
                                .unwrap_or(self.culture);

                            pipe.write_value(value, format, &culture)
                                .map_err(|_| error_write())?;
                        }
                        None => {}
                    }
                }
                BlockKind::None | BlockKind::End => {
                    unreachable!("sentinel block must not appear in a compiled template")
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{render, render_to_vec, Renderer};
    use crate::{
        compile::{compile, Block, Template},
        format::Culture,
        sink::{Pool, PooledSink, Sink},
        store::Store,
    };
    use std::borrow::Cow;

    #[test]
    fn test_render_raw() {
        let template = compile("hello there").unwrap();
        let result = render_to_vec(&template, &Store::new());

        assert_eq!(result.unwrap(), b"hello there");
    }

    #[test]
    fn test_render_empty() {
        let template = compile("").unwrap();

        assert_eq!(render_to_vec(&template, &Store::new()).unwrap(), b"");
    }

    #[test]
    fn test_render_single_tag() {
        let template = compile("{{A}}").unwrap();
        let store = Store::new().with_text("A", "Test1");

        assert_eq!(render_to_vec(&template, &store).unwrap(), b"Test1");
    }

    #[test]
    fn test_render_adjacent_tags() {
        let template = compile("{{ A }}{{ B }}").unwrap();
        let store = Store::new()
            .with_text("A", "Test1")
            .with_text("B", "Test2");

        assert_eq!(render_to_vec(&template, &store).unwrap(), b"Test1Test2");
    }

    #[test]
    fn test_render_surrounded_tag() {
        let template = compile("z{{A}}z").unwrap();
        let store = Store::new().with_text("A", "Test1");

        assert_eq!(render_to_vec(&template, &store).unwrap(), b"zTest1z");
    }

    #[test]
    fn test_render_mixed() {
        let template = compile("x{{ A }}123{{ B }}x").unwrap();
        let store = Store::new()
            .with_text("A", "Test1")
            .with_text("B", "Test2");

        assert_eq!(
            render_to_vec(&template, &store).unwrap(),
            b"xTest1123Test2x"
        );
    }

    #[test]
    fn test_render_concatenation() {
        let store = Store::new()
            .with_text("A", "Test1")
            .with_text("B", "Test2");
        let (a, b) = ("one {{A}} ", "two {{ B }}");

        let split: Vec<u8> = [
            render_to_vec(&compile(a).unwrap(), &store).unwrap(),
            render_to_vec(&compile(b).unwrap(), &store).unwrap(),
        ]
        .concat();
        let joined = render_to_vec(&compile(&format!("{a}{b}")).unwrap(), &store).unwrap();

        assert_eq!(split, joined);
    }

    #[test]
    fn test_render_missing_identifier_writes_nothing() {
        let template = compile("a{{ ghost }}b").unwrap();

        assert_eq!(render_to_vec(&template, &Store::new()).unwrap(), b"ab");
    }

    #[test]
    fn test_render_bytes_verbatim() {
        let template = compile("<{{ blob }}>").unwrap();
        let store = Store::new().with_bytes("blob", vec![0xDE, 0xAD]);

        assert_eq!(
            render_to_vec(&template, &store).unwrap(),
            [b'<', 0xDE, 0xAD, b'>']
        );
    }

    #[test]
    fn test_render_utf16_transcoded() {
        let template = compile("{{ wide }}").unwrap();
        let units: Vec<u16> = "sm\u{F6}rg\u{E5}s".encode_utf16().collect();
        let store = Store::new().with_utf16("wide", units);

        assert_eq!(
            render_to_vec(&template, &store).unwrap(),
            "sm\u{F6}rg\u{E5}s".as_bytes()
        );
    }

    #[test]
    fn test_render_formattable_with_tokens() {
        let template = compile("{{ total:F2:de-DE }} / {{ total }}").unwrap();
        let store = Store::new().with_must("total", 1234.5);

        assert_eq!(
            render_to_vec(&template, &store).unwrap(),
            b"1234,50 / 1234.5"
        );
    }

    #[test]
    fn test_render_default_culture() {
        let template = compile("{{ total:F1 }}").unwrap();
        let store = Store::new().with_must("total", 2.25);

        let pool = Pool::new();
        let mut sink = PooledSink::new(&pool);
        Renderer::new(&template, &store)
            .with_culture(Culture::named("de"))
            .render(&mut sink)
            .unwrap();

        assert_eq!(sink.written(), b"2,2");
    }

    #[test]
    fn test_render_into_caller_sink() {
        // A minimal conforming sink, proving the renderer works against
        // implementations other than PooledSink.
        struct Plain {
            buffer: Vec<u8>,
            committed: usize,
        }

        impl Sink for Plain {
            fn request_space(&mut self, hint: usize) -> &mut [u8] {
                self.buffer.resize(self.committed + hint.max(1), 0);
                &mut self.buffer[self.committed..]
            }

            fn commit(&mut self, count: usize) {
                self.committed += count;
            }

            fn written(&self) -> &[u8] {
                &self.buffer[..self.committed]
            }
        }

        let template = compile("z{{A}}z").unwrap();
        let store = Store::new().with_text("A", "Test1");
        let mut sink = Plain {
            buffer: vec![],
            committed: 0,
        };
        render(&template, &mut sink, &store).unwrap();

        assert_eq!(sink.written(), b"zTest1z");
    }

    #[test]
    fn test_render_owned_template() {
        let template = {
            let source = String::from("{{A}}");
            compile(&source).unwrap().into_owned()
        };
        let store = Store::new().with_text("A", "Test1");

        assert_eq!(render_to_vec(&template, &store).unwrap(), b"Test1");
    }

    #[test]
    #[should_panic]
    fn test_render_sentinel_block() {
        let template = Template::new(Cow::Borrowed(""), vec![Block::none()]);

        let _ = render_to_vec(&template, &Store::new());
    }
}
