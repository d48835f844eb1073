//! EDM primitive types: inference, validation and the wire/literal encodings.
//!
//! The encodings produced here are the exact text the table service expects.
//! `encode` yields the property payload text, `literal` yields the token used
//! inside a `$filter` expression, and `decode` is the inverse of `encode`.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Datelike, Utc};
use regex::Regex;

use crate::{Error, Result, Value};

#[allow(clippy::expect_used)] // good regex, it doesn't panic
static GUID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-([0-9a-fA-F]{4}-){3}[0-9a-fA-F]{12}$")
        .expect("static regex should not panic")
});

const EDM_PREFIX: &str = "Edm.";

// four-digit years only; anything else cannot round-trip through the wire format
const MIN_YEAR: i32 = 1;
const MAX_YEAR: i32 = 9999;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdmType {
    Binary,
    Boolean,
    DateTime,
    Double,
    Guid,
    Int32,
    Int64,
    String,
}

impl EdmType {
    pub const ALL: [EdmType; 8] = [
        EdmType::Binary,
        EdmType::Boolean,
        EdmType::DateTime,
        EdmType::Double,
        EdmType::Guid,
        EdmType::Int32,
        EdmType::Int64,
        EdmType::String,
    ];

    /// Wire name, e.g. `Edm.Int32`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EdmType::Binary => "Edm.Binary",
            EdmType::Boolean => "Edm.Boolean",
            EdmType::DateTime => "Edm.DateTime",
            EdmType::Double => "Edm.Double",
            EdmType::Guid => "Edm.Guid",
            EdmType::Int32 => "Edm.Int32",
            EdmType::Int64 => "Edm.Int64",
            EdmType::String => "Edm.String",
        }
    }

    /// Pick the EDM type for a value whose type was not given.
    ///
    /// Integers always map to `Int32`; callers that need the 64-bit range
    /// must ask for `Int64` explicitly. `Null` maps to `String`.
    #[must_use]
    pub fn infer(value: &Value) -> EdmType {
        match value {
            Value::Binary(_) => EdmType::Binary,
            Value::Bool(_) => EdmType::Boolean,
            Value::DateTime(_) => EdmType::DateTime,
            Value::Double(_) => EdmType::Double,
            Value::Int(_) => EdmType::Int32,
            Value::Null | Value::String(_) => EdmType::String,
        }
    }

    /// Check that `value` is acceptable for this type. `Null` always is.
    ///
    /// # Errors
    /// Returns `Error::Validation` describing why the value was rejected.
    pub fn validate(self, value: &Value) -> Result<()> {
        self.check(value).map_err(|reason| Error::Validation {
            property: None,
            edm_type: self,
            reason,
        })
    }

    pub(crate) fn check(self, value: &Value) -> std::result::Result<(), String> {
        match (self, value) {
            (_, Value::Null)
            | (EdmType::Binary, Value::Binary(_))
            | (EdmType::Boolean, Value::Bool(_))
            | (EdmType::Double, Value::Double(_) | Value::Int(_))
            | (EdmType::Int64, Value::Int(_))
            | (EdmType::String, Value::String(_)) => Ok(()),
            (EdmType::DateTime, Value::DateTime(dt)) => check_year(dt),
            (EdmType::Int32, Value::Int(n)) => i32::try_from(*n)
                .map(|_| ())
                .map_err(|_| format!("{n} is outside the Int32 range")),
            (EdmType::Int64, Value::String(s)) => parse_int64(s).map(|_| ()),
            (EdmType::Guid, Value::String(s)) => {
                if GUID_REGEX.is_match(s) {
                    Ok(())
                } else {
                    Err(format!("'{s}' is not a hyphenated GUID"))
                }
            }
            (ty, other) => Err(format!("{} value is not accepted for {ty}", other.kind())),
        }
    }

    /// Render a validated value as property payload text. `None` for `Null`.
    #[must_use]
    pub fn encode(self, value: &Value) -> Option<String> {
        let text = match value {
            Value::Null => return None,
            Value::Binary(bytes) => BASE64.encode(bytes),
            Value::Bool(b) => b.to_string(),
            Value::DateTime(dt) => format_datetime(dt),
            Value::Double(d) => format_double(*d),
            Value::Int(n) => n.to_string(),
            Value::String(s) if self == EdmType::Int64 => {
                parse_int64(s).map_or_else(|_| s.clone(), |n| n.to_string())
            }
            Value::String(s) => s.clone(),
        };
        Some(text)
    }

    /// Parse payload text produced by the service (or by `encode`).
    ///
    /// `Int64` decodes to a canonical decimal `Value::String`.
    ///
    /// # Errors
    /// Returns `Error::Decode` if the text is not valid for this type.
    pub fn decode(self, text: &str) -> Result<Value> {
        let decoded = match self {
            EdmType::Binary => BASE64
                .decode(text)
                .map(Value::Binary)
                .map_err(|e| e.to_string()),
            EdmType::Boolean => parse_bool(text).map(Value::Bool),
            EdmType::DateTime => DateTime::parse_from_rfc3339(text)
                .map_err(|e| e.to_string())
                .and_then(|dt| {
                    let dt = dt.with_timezone(&Utc);
                    check_year(&dt).map(|()| Value::DateTime(dt))
                }),
            EdmType::Double => parse_double(text).map(Value::Double),
            EdmType::Guid => {
                let v = Value::String(text.to_owned());
                self.check(&v).map(|()| v)
            }
            EdmType::Int32 => text
                .parse::<i32>()
                .map(|n| Value::Int(n.into()))
                .map_err(|e| e.to_string()),
            EdmType::Int64 => parse_int64(text).map(|n| Value::String(n.to_string())),
            EdmType::String => Ok(Value::String(text.to_owned())),
        };
        decoded.map_err(|reason| Error::Decode {
            edm_type: self,
            reason,
        })
    }

    /// Render a value as a `$filter` literal token.
    ///
    /// Always produces a token: strings that do not fit their declared
    /// `Guid`/`Int64` shape fall back to a quoted string literal.
    #[must_use]
    pub fn literal(self, value: &Value) -> String {
        match value {
            Value::Null => "null".to_owned(),
            Value::Binary(bytes) => format!("X'{}'", hex::encode(bytes)),
            Value::Bool(b) => b.to_string(),
            Value::DateTime(dt) => format!("datetime'{}'", format_datetime(dt)),
            Value::Double(d) => format_double(*d),
            Value::Int(n) => n.to_string(),
            Value::String(s) => match self {
                EdmType::Guid if GUID_REGEX.is_match(s) => format!("guid'{s}'"),
                EdmType::Int64 => {
                    parse_int64(s).map_or_else(|_| quote(s), |n| n.to_string())
                }
                _ => quote(s),
            },
        }
    }
}

impl fmt::Display for EdmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EdmType {
    type Err = Error;

    /// Accepts `Edm.Int32`, `Int32` and any ASCII casing of either.
    fn from_str(s: &str) -> Result<Self> {
        let bare = match s.get(..EDM_PREFIX.len()) {
            Some(head) if head.eq_ignore_ascii_case(EDM_PREFIX) => &s[EDM_PREFIX.len()..],
            _ => s,
        };
        EdmType::ALL
            .into_iter()
            .find(|t| t.as_str()[EDM_PREFIX.len()..].eq_ignore_ascii_case(bare))
            .ok_or_else(|| Error::UnknownEdmType(s.to_owned()))
    }
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Strict decimal integer: optional `-`, then ASCII digits only.
fn parse_int64(s: &str) -> std::result::Result<i64, String> {
    let digits = s.strip_prefix('-').unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("'{s}' is not a decimal integer"));
    }
    s.parse::<i64>()
        .map_err(|_| format!("'{s}' is outside the Int64 range"))
}

fn parse_bool(s: &str) -> std::result::Result<bool, String> {
    if s.eq_ignore_ascii_case("true") || s == "1" {
        Ok(true)
    } else if s.eq_ignore_ascii_case("false") || s == "0" {
        Ok(false)
    } else {
        Err(format!("'{s}' is not a boolean"))
    }
}

fn parse_double(s: &str) -> std::result::Result<f64, String> {
    match s {
        "NaN" => Ok(f64::NAN),
        "INF" => Ok(f64::INFINITY),
        "-INF" => Ok(f64::NEG_INFINITY),
        _ => s.parse::<f64>().map_err(|e| e.to_string()),
    }
}

fn format_double(d: f64) -> String {
    if d.is_nan() {
        "NaN".to_owned()
    } else if d.is_infinite() {
        let inf = if d.is_sign_positive() { "INF" } else { "-INF" };
        inf.to_owned()
    } else {
        d.to_string()
    }
}

fn check_year(dt: &DateTime<Utc>) -> std::result::Result<(), String> {
    let year = dt.year();
    if (MIN_YEAR..=MAX_YEAR).contains(&year) {
        Ok(())
    } else {
        Err(format!("year {year} is outside {MIN_YEAR:04}..={MAX_YEAR}"))
    }
}

/// ISO-8601 with 100ns ticks (seven fractional digits) and a `Z` suffix.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    // leap seconds report nanos >= 1e9
    let ticks = (dt.timestamp_subsec_nanos() / 100).min(9_999_999);
    format!("{}.{ticks:07}Z", dt.format("%Y-%m-%dT%H:%M:%S"))
}
