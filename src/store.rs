use crate::log::{Error, ErrorKind};
use serde::Serialize;
use serde_json::to_value;
use std::{borrow::Borrow, collections::HashMap};

/// An owned lookup key.
///
/// Keys are compared byte for byte; no normalization or case folding
/// is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key(Vec<u8>);

impl Key {
    /// Create a new Key from the given bytes.
    pub fn new<T>(bytes: T) -> Self
    where
        T: Into<Vec<u8>>,
    {
        Self(bytes.into())
    }

    /// Return the bytes of the Key.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Borrow<[u8]> for Key {
    fn borrow(&self) -> &[u8] {
        &self.0
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Self(value.as_bytes().to_vec())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Self(value.into_bytes())
    }
}

impl From<&[u8]> for Key {
    fn from(value: &[u8]) -> Self {
        Self(value.to_vec())
    }
}

impl From<Vec<u8>> for Key {
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}

/// A value that a template identifier can resolve to.
///
/// The renderer matches on the variant to decide how the value reaches
/// the output buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Raw bytes, copied to output verbatim.
    Bytes(Vec<u8>),
    /// UTF-16 text, transcoded to UTF-8 on write.
    Utf16(Vec<u16>),
    /// UTF-8 text, copied to output verbatim.
    Text(String),
    /// An arbitrary value, rendered to text under the tag's format and
    /// culture tokens.
    Formatted(serde_json::Value),
}

/// Describes a type that can resolve identifiers to values during
/// rendering.
///
/// A Context is consulted once per identifier block and must remain
/// valid for the duration of one render call.
pub trait Context {
    /// Return the value of the given [`Key`], if any.
    fn get(&self, key: &Key) -> Option<&Value>;

    /// Return the value of the given borrowed key, if any.
    fn get_bytes(&self, key: &[u8]) -> Option<&Value>;
}

/// Provides storage for data that templates can be rendered against.
pub struct Store {
    data: HashMap<Key, Value>,
}

impl Store {
    /// Create a new Store.
    #[inline]
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    /// Insert the value into the Store as [`Value::Formatted`].
    ///
    /// # Errors
    ///
    /// Returns an error if the serialization fails.
    pub fn insert<S, T>(&mut self, key: S, value: T) -> Result<(), Error>
    where
        S: Into<Key>,
        T: Serialize,
    {
        let serialized = to_value(value).map_err(|error| {
            Error::build(ErrorKind::Unserializable).with_help(error.to_string())
        })?;
        self.data.insert(key.into(), Value::Formatted(serialized));

        Ok(())
    }

    /// Insert the value into the Store as [`Value::Formatted`].
    ///
    /// # Panics
    ///
    /// Will panic if the serialization fails.
    #[inline]
    pub fn insert_must<S, T>(&mut self, key: S, value: T)
    where
        S: Into<Key>,
        T: Serialize,
    {
        self.data
            .insert(key.into(), Value::Formatted(to_value(value).unwrap()));
    }

    /// Insert the value into the Store as [`Value::Formatted`].
    ///
    /// Returns the Store, so additional methods may be chained.
    ///
    /// # Errors
    ///
    /// Returns an error if the serialization fails.
    pub fn with<S, T>(mut self, key: S, value: T) -> Result<Self, Error>
    where
        S: Into<Key>,
        T: Serialize,
    {
        self.insert(key, value)?;
        Ok(self)
    }

    /// Insert the value into the Store as [`Value::Formatted`].
    ///
    /// Returns the Store, so additional methods may be chained.
    ///
    /// # Panics
    ///
    /// Will panic if the serialization fails.
    #[inline]
    pub fn with_must<S, T>(mut self, key: S, value: T) -> Self
    where
        S: Into<Key>,
        T: Serialize,
    {
        self.insert_must(key, value);
        self
    }

    /// Insert the value into the Store as [`Value::Bytes`].
    #[inline]
    pub fn insert_bytes<S, T>(&mut self, key: S, value: T)
    where
        S: Into<Key>,
        T: Into<Vec<u8>>,
    {
        self.data.insert(key.into(), Value::Bytes(value.into()));
    }

    /// Insert the value into the Store as [`Value::Bytes`].
    ///
    /// Returns the Store, so additional methods may be chained.
    #[inline]
    pub fn with_bytes<S, T>(mut self, key: S, value: T) -> Self
    where
        S: Into<Key>,
        T: Into<Vec<u8>>,
    {
        self.insert_bytes(key, value);
        self
    }

    /// Insert the value into the Store as [`Value::Text`].
    #[inline]
    pub fn insert_text<S, T>(&mut self, key: S, value: T)
    where
        S: Into<Key>,
        T: Into<String>,
    {
        self.data.insert(key.into(), Value::Text(value.into()));
    }

    /// Insert the value into the Store as [`Value::Text`].
    ///
    /// Returns the Store, so additional methods may be chained.
    #[inline]
    pub fn with_text<S, T>(mut self, key: S, value: T) -> Self
    where
        S: Into<Key>,
        T: Into<String>,
    {
        self.insert_text(key, value);
        self
    }

    /// Insert the value into the Store as [`Value::Utf16`].
    #[inline]
    pub fn insert_utf16<S, T>(&mut self, key: S, value: T)
    where
        S: Into<Key>,
        T: Into<Vec<u16>>,
    {
        self.data.insert(key.into(), Value::Utf16(value.into()));
    }

    /// Insert the value into the Store as [`Value::Utf16`].
    ///
    /// Returns the Store, so additional methods may be chained.
    #[inline]
    pub fn with_utf16<S, T>(mut self, key: S, value: T) -> Self
    where
        S: Into<Key>,
        T: Into<Vec<u16>>,
    {
        self.insert_utf16(key, value);
        self
    }
}

impl Context for Store {
    #[inline]
    fn get(&self, key: &Key) -> Option<&Value> {
        self.data.get(key)
    }

    #[inline]
    fn get_bytes(&self, key: &[u8]) -> Option<&Value> {
        self.data.get(key)
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
