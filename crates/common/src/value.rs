//! Scalar cell values and bind parameters.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use std::fmt;

/// 2^63. Integral floats at or past this magnitude do not fit in an `i64`.
const I64_FLOAT_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// A single decoded cell of a [`ResultTable`](crate::ResultTable).
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
}

impl Scalar {
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Integer view. Floats with no fractional part convert when they fit in
    /// an `i64`; text does not.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Integer(v) => Some(*v),
            Scalar::Float(v) if v.fract() == 0.0 && v.abs() < I64_FLOAT_BOUND => Some(*v as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Integer(v) => Some(*v as f64),
            Scalar::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Text(v) => Some(v),
            _ => None,
        }
    }

}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Boolean(v) => write!(f, "{}", v),
            Scalar::Integer(v) => write!(f, "{}", v),
            Scalar::Float(v) => write!(f, "{}", v),
            Scalar::Text(v) => f.write_str(v),
            Scalar::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Scalar::Timestamp(ts) => f.write_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true)),
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::Null => serializer.serialize_none(),
            Scalar::Boolean(v) => serializer.serialize_bool(*v),
            Scalar::Integer(v) => serializer.serialize_i64(*v),
            Scalar::Float(v) => serializer.serialize_f64(*v),
            Scalar::Text(v) => serializer.serialize_str(v),
            Scalar::Date(_) | Scalar::Timestamp(_) => serializer.collect_str(self),
        }
    }
}

/// A positional bind parameter sent alongside a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl BindValue {
    /// Warehouse type name used in the statement bindings payload.
    pub fn sql_type(&self) -> &'static str {
        match self {
            BindValue::Null | BindValue::Text(_) => "TEXT",
            BindValue::Boolean(_) => "BOOLEAN",
            BindValue::Integer(_) => "FIXED",
            BindValue::Float(_) => "REAL",
        }
    }

    /// String rendering of the value as the warehouse expects it; `None` binds SQL NULL.
    pub fn wire_value(&self) -> Option<String> {
        match self {
            BindValue::Null => None,
            BindValue::Boolean(v) => Some(v.to_string()),
            BindValue::Integer(v) => Some(v.to_string()),
            BindValue::Float(v) => Some(v.to_string()),
            BindValue::Text(v) => Some(v.clone()),
        }
    }
}

impl fmt::Display for BindValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.wire_value() {
            Some(v) => f.write_str(&v),
            None => f.write_str("NULL"),
        }
    }
}

impl From<bool> for BindValue {
    fn from(v: bool) -> Self {
        BindValue::Boolean(v)
    }
}

impl From<i64> for BindValue {
    fn from(v: i64) -> Self {
        BindValue::Integer(v)
    }
}

impl From<i32> for BindValue {
    fn from(v: i32) -> Self {
        BindValue::Integer(v as i64)
    }
}

impl From<u32> for BindValue {
    fn from(v: u32) -> Self {
        BindValue::Integer(v as i64)
    }
}

impl From<f64> for BindValue {
    fn from(v: f64) -> Self {
        BindValue::Float(v)
    }
}

impl From<&str> for BindValue {
    fn from(v: &str) -> Self {
        BindValue::Text(v.to_string())
    }
}

impl From<String> for BindValue {
    fn from(v: String) -> Self {
        BindValue::Text(v)
    }
}

impl<T: Into<BindValue>> From<Option<T>> for BindValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(BindValue::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_numeric_views() {
        assert_eq!(Scalar::Integer(42).as_f64(), Some(42.0));
        assert_eq!(Scalar::Float(3.0).as_i64(), Some(3));
        assert_eq!(Scalar::Float(3.5).as_i64(), None);
        assert_eq!(Scalar::Text("42".into()).as_i64(), None);
        assert!(Scalar::Null.is_null());
    }

    #[test]
    fn test_integral_float_outside_i64_has_no_integer_view() {
        // NUMBER(38,0) values can arrive as floats
        assert_eq!(Scalar::Float(1e19).as_i64(), None);
        assert_eq!(Scalar::Float(-9_223_372_036_854_775_808.0).as_i64(), None);
        assert_eq!(Scalar::Float(9_007_199_254_740_992.0).as_i64(), Some(1 << 53));
        assert_eq!(Scalar::Float(f64::INFINITY).as_i64(), None);
    }

    #[test]
    fn test_scalar_json_rendering() {
        let date = Scalar::Date(NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
        let ts = Scalar::Timestamp(Utc.with_ymd_and_hms(2024, 3, 31, 12, 0, 0).unwrap());

        assert_eq!(serde_json::to_string(&date).unwrap(), "\"2024-03-31\"");
        assert_eq!(
            serde_json::to_string(&ts).unwrap(),
            "\"2024-03-31T12:00:00.000Z\""
        );
        assert_eq!(serde_json::to_string(&Scalar::Null).unwrap(), "null");
    }

    #[test]
    fn test_bind_value_wire_form() {
        assert_eq!(BindValue::from(90).sql_type(), "FIXED");
        assert_eq!(BindValue::from(90).wire_value().as_deref(), Some("90"));
        assert_eq!(BindValue::from("CLI_001").sql_type(), "TEXT");
        assert_eq!(BindValue::from(None::<i64>).wire_value(), None);
        assert_eq!(BindValue::from(true).to_string(), "true");
    }
}
