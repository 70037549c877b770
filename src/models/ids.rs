//! Identifier and loosely-typed scalar fields
//!
//! The backend is inconsistent about whether ids and hour/minute columns are
//! numbers or strings. Both shapes are accepted and rendered the same way.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Record identifier that may arrive as a JSON number or string
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    Number(i64),
    Text(String),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Number(n) => write!(f, "{n}"),
            Identifier::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Identifier::Text(value.to_string())
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Identifier::Text(value)
    }
}

impl From<i64> for Identifier {
    fn from(value: i64) -> Self {
        Identifier::Number(value)
    }
}

/// Scalar column that may be a number or a string on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LooseValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl LooseValue {
    /// Text form used by the row adapter; `None` for blank strings
    #[must_use]
    pub fn as_text(&self) -> Option<String> {
        match self {
            LooseValue::Integer(n) => Some(n.to_string()),
            LooseValue::Float(x) if x.is_finite() => Some(x.to_string()),
            LooseValue::Float(_) => None,
            LooseValue::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
        }
    }
}

/// Counts produced by SQL `SUM` arrive as floats (`12.0`); accept both
pub(crate) fn loose_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match LooseValue::deserialize(deserializer)? {
        LooseValue::Integer(n) if n >= 0 => Ok(n.unsigned_abs()),
        LooseValue::Float(x) if x.is_finite() && x >= 0.0 => Ok(x.round() as u64),
        LooseValue::Text(s) => s
            .trim()
            .parse::<u64>()
            .map_err(serde::de::Error::custom),
        other => Err(serde::de::Error::custom(format!("invalid count: {other:?}"))),
    }
}

pub(crate) fn loose_count_opt<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapped(#[serde(deserialize_with = "loose_count")] u64);

    Ok(Option::<Wrapped>::deserialize(deserializer)?.map(|Wrapped(n)| n))
}
