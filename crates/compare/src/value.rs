use std::fmt;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize, Serializer};

/// A single cell, already typed.
///
/// Variant order is the cross-type sort order used everywhere a total order
/// is needed (key iteration, secondary sort):
/// Numbers(0) < Text(1) < Bool(2) < Null(3).
///
/// Equality is per variant. Integers and floats share the `Number` variant, so
/// `100` and `100.0` are the same value; `Text("100")` and `Number(100)` are not.
///
/// Serializes as a bare JSON scalar. Integral numbers are written as JSON
/// integers so ID-like keys read `1`, not `1.0`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(OrderedFloat<f64>),
    Text(String),
    Bool(bool),
    #[default]
    Null,
}

impl CellValue {
    /// Numeric cell. NaN is a missing value, so it becomes `Null`.
    pub fn number(n: f64) -> Self {
        if n.is_nan() {
            CellValue::Null
        } else {
            CellValue::Number(OrderedFloat(n))
        }
    }

    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(n.0),
            _ => None,
        }
    }
}

/// Integral and exactly representable as `i64`.
fn as_integer(n: f64) -> Option<i64> {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        Some(n as i64)
    } else {
        None
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Number(n) => match as_integer(n.0) {
                Some(i) => serializer.serialize_i64(i),
                None => serializer.serialize_f64(n.0),
            },
            CellValue::Text(s) => serializer.serialize_str(s),
            CellValue::Bool(b) => serializer.serialize_bool(*b),
            CellValue::Null => serializer.serialize_unit(),
        }
    }
}

/// Plain rendering for reports: nulls are blank, integral numbers drop the
/// fractional part.
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Number(n) => match as_integer(n.0) {
                Some(i) => write!(f, "{i}"),
                None => write!(f, "{}", n.0),
            },
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(OrderedFloat(n as f64))
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(OrderedFloat(f64::from(n)))
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_and_float_are_equal() {
        assert_eq!(CellValue::from(100), CellValue::from(100.0));
        assert_eq!(CellValue::from(100_i64), CellValue::from(100.0));
    }

    #[test]
    fn text_never_equals_number() {
        assert_ne!(CellValue::from("100"), CellValue::from(100));
    }

    #[test]
    fn nan_is_null() {
        assert!(CellValue::number(f64::NAN).is_null());
        assert_eq!(CellValue::number(f64::NAN), CellValue::Null);
    }

    #[test]
    fn cross_type_order() {
        let mut values = vec![
            CellValue::Null,
            CellValue::from(true),
            CellValue::from("b"),
            CellValue::from(2.5),
            CellValue::from("a"),
            CellValue::from(-1),
            CellValue::from(false),
        ];
        values.sort();
        assert_eq!(
            values,
            vec![
                CellValue::from(-1),
                CellValue::from(2.5),
                CellValue::from("a"),
                CellValue::from("b"),
                CellValue::from(false),
                CellValue::from(true),
                CellValue::Null,
            ]
        );
    }

    #[test]
    fn display_rendering() {
        assert_eq!(CellValue::from(100.0).to_string(), "100");
        assert_eq!(CellValue::from(12.5).to_string(), "12.5");
        assert_eq!(CellValue::from(true).to_string(), "true");
        assert_eq!(CellValue::Null.to_string(), "");
        assert_eq!(CellValue::from(" x ").to_string(), " x ");
    }

    #[test]
    fn serializes_as_bare_scalars() {
        let values = vec![
            CellValue::from(1.5),
            CellValue::from("x"),
            CellValue::from(true),
            CellValue::Null,
        ];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"[1.5,"x",true,null]"#);

        let back: Vec<CellValue> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, values);
    }

    #[test]
    fn integral_numbers_serialize_as_json_integers() {
        let values = vec![CellValue::from(7), CellValue::from(-3.0), CellValue::from(0.25)];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, "[7,-3,0.25]");

        let back: Vec<CellValue> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, values);
    }

    #[test]
    fn integer_json_deserializes_as_number() {
        let v: CellValue = serde_json::from_str("42").unwrap();
        assert_eq!(v, CellValue::from(42));
    }
}
