use crate::{
    format::{self, Culture},
    sink::Sink,
};
use serde_json::{Map, Number, Value};
use std::char::{decode_utf16, REPLACEMENT_CHARACTER};
use std::fmt::{self, Display, Write};

/// Every UTF-16 unit expands to at most this many UTF-8 bytes.
const MAX_UTF8_PER_UNIT: usize = 3;

/// Wraps a [`Sink`] by providing methods that write to it in different
/// formats.
pub struct Pipe<'sink> {
    sink: &'sink mut dyn Sink,
}

impl<'sink> Pipe<'sink> {
    /// Create a new Pipe that writes to the given sink.
    pub fn new(sink: &'sink mut dyn Sink) -> Self {
        Self { sink }
    }

    /// Write the given bytes to the sink verbatim.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        let view = self.sink.request_space(bytes.len());
        view[..bytes.len()].copy_from_slice(bytes);
        self.sink.commit(bytes.len());
    }

    /// Transcode the given UTF-16 units to UTF-8 and write them to the
    /// sink.
    ///
    /// Unpaired surrogates become U+FFFD.
    pub fn write_utf16(&mut self, units: &[u16]) {
        if units.is_empty() {
            return;
        }
        let view = self.sink.request_space(units.len() * MAX_UTF8_PER_UNIT);

        let mut length = 0;
        for decoded in decode_utf16(units.iter().copied()) {
            let character = decoded.unwrap_or(REPLACEMENT_CHARACTER);
            length += character.encode_utf8(&mut view[length..]).len();
        }
        self.sink.commit(length);
    }

    /// Write the given formattable value to the sink under the format
    /// and culture tokens.
    ///
    /// The Pipe supports all serde_json value types, so the only error
    /// that will be returned is propagated from the [write!] macro
    /// itself.
    pub fn write_value(
        &mut self,
        value: &Value,
        format: Option<&str>,
        culture: &Culture,
    ) -> fmt::Result {
        match value {
            Value::Null => self.write_str("null"),
            Value::Bool(bool) => self.write_display(bool),
            Value::Number(number) => self.write_number(number, format, culture),
            Value::String(string) => self.write_str(string),
            Value::Array(array) => self.write_array(array, format, culture),
            Value::Object(object) => self.write_object(object, format, culture),
        }
    }

    /// Write the value to the sink using the Display implementation.
    fn write_display(&mut self, value: impl Display) -> fmt::Result {
        write!(self, "{}", value)
    }

    /// Write the number to the sink under the format and culture tokens.
    fn write_number(
        &mut self,
        number: &Number,
        format: Option<&str>,
        culture: &Culture,
    ) -> fmt::Result {
        format::write_number(self, number, format, culture)
    }

    /// Write the value to the sink as a comma separated list surrounded
    /// by brackets.
    fn write_array(
        &mut self,
        value: &Vec<Value>,
        format: Option<&str>,
        culture: &Culture,
    ) -> fmt::Result {
        write!(self, "[")?;
        let mut iter = value.iter();
        if let Some(item) = iter.next() {
            self.write_value(item, format, culture)?;
            for item in iter {
                write!(self, ", ")?;
                self.write_value(item, format, culture)?;
            }
        }
        write!(self, "]")
    }

    /// Write the value to the sink as key/value pairs surrounded by
    /// curly braces.
    fn write_object(
        &mut self,
        value: &Map<String, Value>,
        format: Option<&str>,
        culture: &Culture,
    ) -> fmt::Result {
        write!(self, "{{")?;
        let mut iter = value.iter();
        if let Some((key, item)) = iter.next() {
            write!(self, "{}: ", key)?;
            self.write_value(item, format, culture)?;
            for (key, item) in iter {
                write!(self, ", {}: ", key)?;
                self.write_value(item, format, culture)?;
            }
        }
        write!(self, "}}")
    }
}

impl Write for Pipe<'_> {
    #[inline]
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_bytes(s.as_bytes());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Pipe;
    use crate::{
        format::Culture,
        sink::{Pool, PooledSink, Sink},
    };
    use serde_json::json;

    #[test]
    fn test_write_bytes_verbatim() {
        let pool = Pool::new();
        let mut sink = PooledSink::new(&pool);
        Pipe::new(&mut sink).write_bytes(&[0xC0, 0xFF, 0xEE]);

        assert_eq!(sink.written(), &[0xC0, 0xFF, 0xEE]);
    }

    #[test]
    fn test_write_utf16() {
        let pool = Pool::new();
        let mut sink = PooledSink::new(&pool);

        // Exercises one, two and four byte encodings, including a
        // surrogate pair.
        let units: Vec<u16> = "h\u{E9}llo \u{1D11E}".encode_utf16().collect();
        Pipe::new(&mut sink).write_utf16(&units);

        assert_eq!(sink.written(), "h\u{E9}llo \u{1D11E}".as_bytes());
    }

    #[test]
    fn test_write_utf16_unpaired_surrogate() {
        let pool = Pool::new();
        let mut sink = PooledSink::new(&pool);
        Pipe::new(&mut sink).write_utf16(&[0x0061, 0xD800, 0x0062]);

        assert_eq!(sink.written(), "a\u{FFFD}b".as_bytes());
    }

    #[test]
    fn test_write_value_scalars() {
        assert_eq!(value_text(&json!(null)), "null");
        assert_eq!(value_text(&json!(true)), "true");
        assert_eq!(value_text(&json!(10)), "10");
        assert_eq!(value_text(&json!("text")), "text");
    }

    #[test]
    fn test_write_value_array() {
        assert_eq!(value_text(&json!([1, 2, 3])), "[1, 2, 3]");
        assert_eq!(value_text(&json!([])), "[]");
    }

    #[test]
    fn test_write_value_object() {
        assert_eq!(value_text(&json!({"one": 1, "two": 2})), "{one: 1, two: 2}");
    }

    fn value_text(value: &serde_json::Value) -> String {
        let pool = Pool::new();
        let mut sink = PooledSink::new(&pool);
        Pipe::new(&mut sink)
            .write_value(value, None, &Culture::INVARIANT)
            .unwrap();

        String::from_utf8(sink.written().to_vec()).unwrap()
    }
}
