//! Field-level cleaning helpers for candidate JSON
//!
//! Shared by the HandSettings and XCardSettings normalizers. Policy for
//! every helper: absent fields take the default quietly, present-but-invalid
//! fields take the default with a WARN log, and nothing here ever fails.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

/// Look up a sub-record of the candidate object.
pub(crate) fn section<'a>(candidate: &'a Value, key: &str) -> Option<&'a Value> {
    let v = candidate.get(key)?;
    if v.is_object() {
        Some(v)
    } else {
        if !v.is_null() {
            warn!(field = key, "candidate section is not an object, using defaults");
        }
        None
    }
}

pub(crate) fn bool_field(section: Option<&Value>, key: &str, default: bool) -> bool {
    match section.and_then(|s| s.get(key)) {
        None | Some(Value::Null) => default,
        Some(Value::Bool(b)) => *b,
        Some(other) => {
            warn!(field = key, value = %other, "expected boolean, using default");
            default
        }
    }
}

/// Integer field clamped into `[min, max]`. Non-integer candidates (floats,
/// strings, anything else) fall back to the default rather than being
/// rounded into range.
pub(crate) fn clamped_int_field(
    section: Option<&Value>,
    key: &str,
    min: i64,
    max: i64,
    default: i64,
) -> i64 {
    match section.and_then(|s| s.get(key)) {
        None | Some(Value::Null) => default,
        Some(v) => match v.as_i64() {
            Some(n) => n.clamp(min, max),
            None => {
                warn!(field = key, value = %v, "expected integer, using default");
                default
            }
        },
    }
}

pub(crate) fn string_field(section: Option<&Value>, key: &str) -> String {
    match section.and_then(|s| s.get(key)) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => {
            warn!(field = key, value = %other, "expected string, using empty");
            String::new()
        }
    }
}

/// Closed-set enumeration field. Unrecognized values fall back to the
/// provided default.
pub(crate) fn enum_field<T>(section: Option<&Value>, key: &str, default: T) -> T
where
    T: DeserializeOwned,
{
    match section.and_then(|s| s.get(key)) {
        None | Some(Value::Null) => default,
        Some(v) => match serde_json::from_value::<T>(v.clone()) {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(field = key, value = %v, "unrecognized enumeration value, using default");
                default
            }
        },
    }
}
