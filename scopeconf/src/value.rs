//! Stored values and preload defaults.

use std::fmt;

use indexmap::IndexMap;
use serde::{
    Deserialize, Deserializer, Serialize,
    de::{self, Visitor},
};

/// A single stored value.
///
/// Values are never coerced: `var1 = 42` stores the text `"42"`. A name
/// declared without a delimiter stores `Flag(true)`; `Flag(false)` can only
/// come from a preload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Presence flag.
    Flag(bool),
    /// Text exactly as written, escapes resolved.
    Text(String),
}

impl Value {
    /// The text of a `Text` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            Value::Flag(_) => None,
        }
    }

    /// The state of a `Flag` value.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Value::Flag(flag) => Some(*flag),
            Value::Text(_) => None,
        }
    }
}

/// Booleans become flags. Strings and numbers become text, numbers in their
/// usual decimal spelling.
impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ValueVisitor;

        impl Visitor<'_> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string, number or boolean")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
                Ok(Value::Flag(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
                Ok(Value::Text(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
                Ok(Value::Text(v.to_string()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
                Ok(Value::Text(v.to_string()))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
                Ok(Value::Text(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
                Ok(Value::Text(v))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(text) => f.write_str(text),
            Value::Flag(flag) => write!(f, "{flag}"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Flag(value)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl PartialEq<bool> for Value {
    fn eq(&self, other: &bool) -> bool {
        self.as_flag() == Some(*other)
    }
}

/// A default supplied to [`ConfigFile::preload`](crate::ConfigFile::preload):
/// either one value or a full list of values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PreloadValue {
    /// A single default.
    One(Value),
    /// Several defaults, as if the name had been declared repeatedly.
    Many(Vec<Value>),
}

impl PreloadValue {
    pub(crate) fn into_values(self) -> Vec<Value> {
        match self {
            PreloadValue::One(value) => vec![value],
            PreloadValue::Many(values) => values,
        }
    }
}

impl From<Value> for PreloadValue {
    fn from(value: Value) -> Self {
        PreloadValue::One(value)
    }
}

impl From<&str> for PreloadValue {
    fn from(value: &str) -> Self {
        PreloadValue::One(value.into())
    }
}

impl From<String> for PreloadValue {
    fn from(value: String) -> Self {
        PreloadValue::One(value.into())
    }
}

impl From<bool> for PreloadValue {
    fn from(value: bool) -> Self {
        PreloadValue::One(value.into())
    }
}

impl From<Vec<Value>> for PreloadValue {
    fn from(values: Vec<Value>) -> Self {
        PreloadValue::Many(values)
    }
}

impl From<Vec<&str>> for PreloadValue {
    fn from(values: Vec<&str>) -> Self {
        PreloadValue::Many(values.into_iter().map(Value::from).collect())
    }
}

/// Insertion-ordered set of defaults, typically deserialized from a host
/// application's own settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Defaults(IndexMap<String, PreloadValue>);

impl Defaults {
    /// Parse a JSON object such as `{"var1": "12", "tags": ["a", "b"]}`.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

impl IntoIterator for Defaults {
    type Item = (String, PreloadValue);
    type IntoIter = indexmap::map::IntoIter<String, PreloadValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<K, V> FromIterator<(K, V)> for Defaults
where
    K: Into<String>,
    V: Into<PreloadValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}
