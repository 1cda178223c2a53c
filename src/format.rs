//! Turns formattable values into text under the format and culture
//! tokens of a tag.

use serde_json::Number;
use std::fmt::{self, Write};

/// Fractional digits used by a fixed point token with no digit count.
const DEFAULT_PRECISION: usize = 2;

/// Controls locale sensitive details of value formatting.
///
/// A Culture is resolved from the culture token of a tag, such as
/// `{{ total:F2:de-DE }}`. Only the decimal separator is locale
/// sensitive; an unrecognized or absent token resolves to the
/// invariant culture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Culture {
    /// Decimal separator used when rendering fractional numbers.
    decimal: char,
}

impl Culture {
    /// The culture independent default, using `.` as the decimal
    /// separator.
    pub const INVARIANT: Culture = Culture { decimal: '.' };

    /// Resolve a culture token such as `de-DE`, `fr` or `sv_SE`.
    ///
    /// Only the language part of the token is considered.
    pub fn named(token: &str) -> Self {
        let language = token.split(['-', '_']).next().unwrap_or(token);
        let decimal = match language {
            "cs" | "da" | "de" | "es" | "fi" | "fr" | "it" | "nb" | "nl" | "no" | "pl"
            | "pt" | "ru" | "sv" | "tr" => ',',
            _ => '.',
        };

        Self { decimal }
    }

    /// Return the decimal separator character.
    pub fn decimal(&self) -> char {
        self.decimal
    }
}

impl Default for Culture {
    fn default() -> Self {
        Self::INVARIANT
    }
}

/// Write the number to the buffer under the given format token and
/// [`Culture`].
///
/// Recognized format tokens:
///
/// - `F` or `f`, optionally followed by a digit count: fixed point with
///   that many fractional digits, two when unspecified.
/// - `X` or `x`: upper or lower hexadecimal, integer values only.
///
/// Any other token, or no token, renders the default display form of
/// the number. The decimal separator of the `Culture` replaces `.` in
/// the result.
pub fn write_number<W>(
    buffer: &mut W,
    number: &Number,
    format: Option<&str>,
    culture: &Culture,
) -> fmt::Result
where
    W: Write + ?Sized,
{
    match format {
        Some(token) if token.starts_with(['F', 'f']) => {
            let digits = token[1..].parse().unwrap_or(DEFAULT_PRECISION);
            let float = number.as_f64().unwrap_or_default();

            write_localized(buffer, format!("{float:.digits$}"), culture)
        }
        Some("X") if number.as_i64().is_some() => {
            write!(buffer, "{:X}", number.as_i64().unwrap())
        }
        Some("x") if number.as_i64().is_some() => {
            write!(buffer, "{:x}", number.as_i64().unwrap())
        }
        _ => write_localized(buffer, number.to_string(), culture),
    }
}

/// Write already rendered number text, swapping in the decimal
/// separator of the [`Culture`].
fn write_localized<W>(buffer: &mut W, text: String, culture: &Culture) -> fmt::Result
where
    W: Write + ?Sized,
{
    if culture.decimal == '.' {
        return buffer.write_str(&text);
    }

    let mut encoded = [0; 4];
    let separator = culture.decimal.encode_utf8(&mut encoded);
    buffer.write_str(&text.replace('.', separator))
}
