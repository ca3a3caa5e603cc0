//! Scalar cell values and their canonical string rendering.
//!
//! The diff engine compares cells by rendered string, so `Display` here
//! defines the engine's notion of equality across documents: empty renders as
//! `""`, integral numbers render without a fractional part, booleans render
//! lowercase.

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// The largest integer magnitude exactly representable in an f64.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    pub fn text(s: impl Into<String>) -> CellValue {
        CellValue::Text(s.into())
    }

    /// Re-type a rendered string into the closest scalar value.
    ///
    /// Used when a resolved value (which travels as a string through the
    /// diff/resolve pipeline) is written back into a grid.
    pub fn from_rendered(s: &str) -> CellValue {
        if s.is_empty() {
            return CellValue::Empty;
        }
        match s {
            "true" => return CellValue::Bool(true),
            "false" => return CellValue::Bool(false),
            _ => {}
        }
        if let Ok(n) = s.parse::<f64>() {
            if n.is_finite() {
                return CellValue::Number(n);
            }
        }
        CellValue::Text(s.to_string())
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < MAX_EXACT_INT {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            CellValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            CellValue::Empty => serializer.serialize_none(),
            CellValue::Text(s) => serializer.serialize_str(s),
            CellValue::Number(n) => serializer.serialize_f64(*n),
            CellValue::Bool(b) => serializer.serialize_bool(*b),
        }
    }
}

impl<'de> Deserialize<'de> for CellValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ScalarVisitor;

        impl<'de> Visitor<'de> for ScalarVisitor {
            type Value = CellValue;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("null, a string, a number, or a boolean")
            }

            fn visit_unit<E: de::Error>(self) -> Result<CellValue, E> {
                Ok(CellValue::Empty)
            }

            fn visit_none<E: de::Error>(self) -> Result<CellValue, E> {
                Ok(CellValue::Empty)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<CellValue, D::Error>
            where
                D: Deserializer<'de>,
            {
                deserializer.deserialize_any(ScalarVisitor)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<CellValue, E> {
                Ok(CellValue::Text(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<CellValue, E> {
                Ok(CellValue::Text(v))
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<CellValue, E> {
                Ok(CellValue::Bool(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<CellValue, E> {
                Ok(CellValue::Number(v as f64))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<CellValue, E> {
                Ok(CellValue::Number(v as f64))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<CellValue, E> {
                Ok(CellValue::Number(v))
            }
        }

        deserializer.deserialize_any(ScalarVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendering_matches_diff_semantics() {
        assert_eq!(CellValue::Empty.to_string(), "");
        assert_eq!(CellValue::text("hello").to_string(), "hello");
        assert_eq!(CellValue::Number(42.0).to_string(), "42");
        assert_eq!(CellValue::Number(-3.0).to_string(), "-3");
        assert_eq!(CellValue::Number(2.5).to_string(), "2.5");
        assert_eq!(CellValue::Bool(true).to_string(), "true");
        assert_eq!(CellValue::Bool(false).to_string(), "false");
    }

    #[test]
    fn from_rendered_retypes_scalars() {
        assert_eq!(CellValue::from_rendered(""), CellValue::Empty);
        assert_eq!(CellValue::from_rendered("42"), CellValue::Number(42.0));
        assert_eq!(CellValue::from_rendered("2.5"), CellValue::Number(2.5));
        assert_eq!(CellValue::from_rendered("true"), CellValue::Bool(true));
        assert_eq!(
            CellValue::from_rendered("abc"),
            CellValue::Text("abc".to_string())
        );
    }

    #[test]
    fn from_rendered_round_trips_through_display() {
        for s in ["", "42", "2.5", "true", "false", "1, 2, 3", "conflict"] {
            assert_eq!(CellValue::from_rendered(s).to_string(), s);
        }
    }

    #[test]
    fn serde_uses_natural_json_scalars() {
        let json = serde_json::to_string(&vec![
            CellValue::Empty,
            CellValue::text("x"),
            CellValue::Number(1.5),
            CellValue::Bool(true),
        ])
        .unwrap();
        assert_eq!(json, r#"[null,"x",1.5,true]"#);

        let back: Vec<CellValue> = serde_json::from_str(&json).unwrap();
        assert_eq!(back[0], CellValue::Empty);
        assert_eq!(back[1], CellValue::text("x"));
        assert_eq!(back[2], CellValue::Number(1.5));
        assert_eq!(back[3], CellValue::Bool(true));
    }
}
