//! Best-effort coercion of raw text into typed tree values.

use serde_json::Value;

use crate::error::EditError;

const TRUE_WORDS: [&str; 4] = ["y", "yes", "true", "on"];
const FALSE_WORDS: [&str; 4] = ["n", "no", "false", "off"];

/// Declared type of an incoming raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueType {
    /// Recover the type from the text itself.
    #[default]
    Auto,
    /// Keep the text verbatim.
    Str,
    /// The text must be one of the boolean tokens.
    Bool,
    /// The text encodes a number, boolean, or nested structure.
    Structured,
}

/// Format of current-value text supplied alongside an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawFormat {
    Yaml,
    Json,
    Str,
}

/// Convert a raw value into a typed tree value according to its declared
/// type.
///
/// Strings declared boolean must match the truthy/falsy token sets
/// (`y/yes/true/on`, `n/no/false/off`, case-insensitive). Booleans declared
/// string are stringified. Strings with any other declared type are parsed
/// as structured text to recover numbers, booleans, and nested structures
/// embedded in them. Everything else passes through unchanged.
pub fn coerce_value(raw: Value, vtype: ValueType) -> Result<Value, EditError> {
    match (&raw, vtype) {
        (Value::String(s), ValueType::Bool) => {
            bool_token(s).ok_or_else(|| EditError::Coercion {
                value: s.clone(),
                reason: "not a boolean token".to_string(),
            })
        }
        (Value::Bool(b), ValueType::Str) => Ok(Value::String(b.to_string())),
        (Value::String(_), ValueType::Str) => Ok(raw),
        (Value::String(s), ValueType::Auto | ValueType::Structured) => parse_structured(s),
        _ => Ok(raw),
    }
}

/// Parse current-value text in the requested format.
pub fn parse_raw(raw: &str, format: RawFormat) -> Result<Value, EditError> {
    match format {
        RawFormat::Yaml => parse_structured(raw),
        RawFormat::Json => serde_json::from_str(raw).map_err(|e| EditError::Coercion {
            value: raw.to_string(),
            reason: e.to_string(),
        }),
        RawFormat::Str => Ok(Value::String(raw.to_string())),
    }
}

fn bool_token(s: &str) -> Option<Value> {
    if TRUE_WORDS.iter().any(|w| s.eq_ignore_ascii_case(w)) {
        return Some(Value::Bool(true));
    }
    if FALSE_WORDS.iter().any(|w| s.eq_ignore_ascii_case(w)) {
        return Some(Value::Bool(false));
    }
    None
}

fn parse_structured(s: &str) -> Result<Value, EditError> {
    if s.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_yaml::from_str(s).map_err(|e| EditError::Coercion {
        value: s.to_string(),
        reason: e.to_string(),
    })
}
