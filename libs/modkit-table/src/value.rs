use chrono::{DateTime, Utc};

/// Native value carried by a property or a filter constant.
///
/// The variant is what the caller handed in; the EDM type attached to it
/// decides how it is validated and rendered.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Binary(Vec<u8>),
    Bool(bool),
    DateTime(DateTime<Utc>),
    Double(f64),
    Int(i64),
    String(String),
}

impl Value {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Short name of the variant, used in error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Binary(_) => "binary",
            Value::Bool(_) => "bool",
            Value::DateTime(_) => "datetime",
            Value::Double(_) => "double",
            Value::Int(_) => "int",
            Value::String(_) => "string",
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.kind())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Binary(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Binary(v.to_vec())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::DateTime(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_native_conversions() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(23_i32), Value::Int(23));
        assert_eq!(Value::from("x"), Value::String("x".to_owned()));
        assert_eq!(Value::from(vec![1_u8, 2]), Value::Binary(vec![1, 2]));
        assert_eq!(Value::from(&[3_u8][..]), Value::Binary(vec![3]));
    }

    #[test]
    fn test_none_becomes_null() {
        let v: Value = Option::<i64>::None.into();
        assert!(v.is_null());

        let v: Value = Some("a").into();
        assert_eq!(v.as_str(), Some("a"));
    }

    #[test]
    fn test_display_names_the_kind() {
        assert_eq!(Value::Double(1.5).to_string(), "double");
        assert_eq!(Value::Null.to_string(), "null");
    }
}
