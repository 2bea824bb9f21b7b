use std::fmt;

use chrono::NaiveDateTime;
use serde_json::Value;

/// The closed vocabulary of declarable parameter and return types.
///
/// Aliases from both protocol traditions canonicalize onto one variant at
/// declaration time (`i4`/`integer` onto int, `float` onto double, and so
/// on); anything outside the table is rejected by [`RpcType::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcType {
    Int,
    Double,
    Boolean,
    Base64,
    DateTimeIso8601,
    String,
    Array,
    Struct,
    Null,
    Undefined,
}

impl RpcType {
    /// Canonicalize a declared type alias, or reject it.
    pub fn parse(alias: &str) -> Option<RpcType> {
        match alias {
            "i4" | "int" | "integer" => Some(RpcType::Int),
            "double" | "float" => Some(RpcType::Double),
            "boolean" | "bool" => Some(RpcType::Boolean),
            "base64" => Some(RpcType::Base64),
            "dateTime.iso8601" | "datetime" => Some(RpcType::DateTimeIso8601),
            "string" => Some(RpcType::String),
            "array" => Some(RpcType::Array),
            "struct" => Some(RpcType::Struct),
            "nil" | "ex:nil" | "null" => Some(RpcType::Null),
            "undefined" => Some(RpcType::Undefined),
            _ => None,
        }
    }

    /// The canonical wire name, as exposed by signature introspection.
    pub fn as_str(&self) -> &'static str {
        match self {
            RpcType::Int => "int",
            RpcType::Double => "double",
            RpcType::Boolean => "boolean",
            RpcType::Base64 => "base64",
            RpcType::DateTimeIso8601 => "dateTime.iso8601",
            RpcType::String => "string",
            RpcType::Array => "array",
            RpcType::Struct => "struct",
            RpcType::Null => "null",
            RpcType::Undefined => "undefined",
        }
    }

    /// Check a decoded value against this declared type.
    pub fn validates(&self, value: &Value) -> bool {
        match self {
            RpcType::Int => value.is_i64() || value.is_u64(),
            RpcType::Double => value.is_f64(),
            RpcType::Boolean => value.is_boolean(),
            RpcType::Base64 | RpcType::String => value.is_string(),
            RpcType::DateTimeIso8601 => match value.as_str() {
                Some(s) => is_iso8601(s),
                None => false,
            },
            RpcType::Array => value.is_array(),
            RpcType::Struct => value.is_object(),
            RpcType::Null => value.is_null(),
            RpcType::Undefined => true,
        }
    }
}

impl fmt::Display for RpcType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// A dateTime.iso8601 value must open with a full YYYY-MM-DDThh:mm:ss stamp;
// trailing fraction or zone designators are tolerated.
fn is_iso8601(s: &str) -> bool {
    match s.get(..19) {
        Some(prefix) => NaiveDateTime::parse_from_str(prefix, "%Y-%m-%dT%H:%M:%S").is_ok(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_alias_canonicalization() {
        assert_eq!(RpcType::parse("i4"), Some(RpcType::Int));
        assert_eq!(RpcType::parse("integer"), Some(RpcType::Int));
        assert_eq!(RpcType::parse("float"), Some(RpcType::Double));
        assert_eq!(RpcType::parse("bool"), Some(RpcType::Boolean));
        assert_eq!(RpcType::parse("datetime"), Some(RpcType::DateTimeIso8601));
        assert_eq!(RpcType::parse("ex:nil"), Some(RpcType::Null));
        assert_eq!(RpcType::parse("money"), None);
    }

    #[test]
    fn test_canonical_names() {
        assert_eq!(RpcType::parse("i4").unwrap().as_str(), "int");
        assert_eq!(RpcType::parse("datetime").unwrap().as_str(), "dateTime.iso8601");
        assert_eq!(RpcType::parse("nil").unwrap().as_str(), "null");
    }

    #[test]
    fn test_scalar_validation() {
        assert!(RpcType::Int.validates(&json!(42)));
        assert!(!RpcType::Int.validates(&json!(4.2)));
        assert!(RpcType::Double.validates(&json!(4.2)));
        assert!(!RpcType::Double.validates(&json!(42)));
        assert!(RpcType::Boolean.validates(&json!(true)));
        assert!(RpcType::String.validates(&json!("hi")));
        assert!(RpcType::Base64.validates(&json!("aGk=")));
        assert!(RpcType::Null.validates(&json!(null)));
        assert!(RpcType::Undefined.validates(&json!({"anything": []})));
    }

    #[test]
    fn test_composite_validation() {
        assert!(RpcType::Array.validates(&json!([1, 2])));
        assert!(!RpcType::Array.validates(&json!({"a": 1})));
        assert!(RpcType::Struct.validates(&json!({"a": 1})));
        assert!(!RpcType::Struct.validates(&json!([1, 2])));
    }

    #[test]
    fn test_datetime_validation() {
        let t = RpcType::DateTimeIso8601;
        assert!(t.validates(&json!("2026-08-25T10:30:00")));
        assert!(t.validates(&json!("2026-08-25T10:30:00Z")));
        assert!(!t.validates(&json!("2026-08-25")));
        assert!(!t.validates(&json!("not a date")));
        assert!(!t.validates(&json!(1724580600)));
    }
}
