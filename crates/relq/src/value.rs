//! Dynamically typed cell values exchanged with a [`Connection`](crate::Connection).
//!
//! Arguments flow out as [`Value`]s through [`IntoValue`]; result cells flow
//! back in through [`FromValue`]. Any type implementing both (plus `Clone`) is a
//! [`Field`], which is what row mappers hand to the scanner as destination slots.

use crate::error::{RelqError, RelqResult};
use chrono::{DateTime, NaiveDateTime, Utc};
use uuid::Uuid;

/// A single SQL argument or result cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Timestamp(NaiveDateTime),
    TimestampTz(DateTime<Utc>),
    Uuid(Uuid),
    Json(serde_json::Value),
}

impl Value {
    /// Short name of the variant, used in decode messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
            Value::Timestamp(_) => "timestamp",
            Value::TimestampTz(_) => "timestamptz",
            Value::Uuid(_) => "uuid",
            Value::Json(_) => "json",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

fn mismatch(expected: &str, got: &Value) -> RelqError {
    RelqError::decode(0, format!("expected {expected}, got {}", got.kind()))
}

/// Conversion into a bound argument.
pub trait IntoValue {
    fn into_value(self) -> Value;
}

/// Conversion out of a result cell.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> RelqResult<Self>;
}

/// A writable destination slot inside a record.
///
/// `set_value` decodes a result cell into the slot; `to_value` reads it back,
/// which is how keys are extracted from already-loaded records.
pub trait Field {
    fn set_value(&mut self, value: Value) -> RelqResult<()>;
    fn to_value(&self) -> Value;
}

impl<T> Field for T
where
    T: FromValue + IntoValue + Clone,
{
    fn set_value(&mut self, value: Value) -> RelqResult<()> {
        *self = T::from_value(value)?;
        Ok(())
    }

    fn to_value(&self) -> Value {
        self.clone().into_value()
    }
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> RelqResult<Self> {
        Ok(value)
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        match self {
            Some(v) => v.into_value(),
            None => Value::Null,
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> RelqResult<Self> {
        match value {
            Value::Null => Ok(None),
            v => T::from_value(v).map(Some),
        }
    }
}

macro_rules! impl_int_value {
    ($($t:ty),*) => {$(
        impl IntoValue for $t {
            fn into_value(self) -> Value {
                Value::Int(i64::from(self))
            }
        }

        impl FromValue for $t {
            fn from_value(value: Value) -> RelqResult<Self> {
                match value {
                    Value::Int(i) => <$t>::try_from(i).map_err(|_| {
                        RelqError::decode(0, format!("{i} out of range for {}", stringify!($t)))
                    }),
                    other => Err(mismatch("integer", &other)),
                }
            }
        }
    )*};
}

impl_int_value!(i8, i16, i32, i64, u8, u16, u32);

impl IntoValue for bool {
    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> RelqResult<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            // MySQL reports BOOLEAN columns as TINYINT(1).
            Value::Int(0) => Ok(false),
            Value::Int(1) => Ok(true),
            other => Err(mismatch("bool", &other)),
        }
    }
}

impl IntoValue for f64 {
    fn into_value(self) -> Value {
        Value::Float(self)
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> RelqResult<Self> {
        match value {
            Value::Float(f) => Ok(f),
            Value::Int(i) => Ok(i as f64),
            other => Err(mismatch("float", &other)),
        }
    }
}

impl IntoValue for f32 {
    fn into_value(self) -> Value {
        Value::Float(f64::from(self))
    }
}

impl FromValue for f32 {
    fn from_value(value: Value) -> RelqResult<Self> {
        f64::from_value(value).map(|f| f as f32)
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::Text(self)
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::Text(self.to_owned())
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> RelqResult<Self> {
        match value {
            Value::Text(s) => Ok(s),
            Value::Bytes(b) => String::from_utf8(b)
                .map_err(|e| RelqError::decode(0, format!("invalid utf-8: {e}"))),
            other => Err(mismatch("text", &other)),
        }
    }
}

impl IntoValue for Vec<u8> {
    fn into_value(self) -> Value {
        Value::Bytes(self)
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: Value) -> RelqResult<Self> {
        match value {
            Value::Bytes(b) => Ok(b),
            Value::Text(s) => Ok(s.into_bytes()),
            other => Err(mismatch("bytes", &other)),
        }
    }
}

impl IntoValue for NaiveDateTime {
    fn into_value(self) -> Value {
        Value::Timestamp(self)
    }
}

impl FromValue for NaiveDateTime {
    fn from_value(value: Value) -> RelqResult<Self> {
        match value {
            Value::Timestamp(t) => Ok(t),
            Value::TimestampTz(t) => Ok(t.naive_utc()),
            other => Err(mismatch("timestamp", &other)),
        }
    }
}

impl IntoValue for DateTime<Utc> {
    fn into_value(self) -> Value {
        Value::TimestampTz(self)
    }
}

impl FromValue for DateTime<Utc> {
    fn from_value(value: Value) -> RelqResult<Self> {
        match value {
            Value::TimestampTz(t) => Ok(t),
            Value::Timestamp(t) => Ok(t.and_utc()),
            other => Err(mismatch("timestamptz", &other)),
        }
    }
}

impl IntoValue for Uuid {
    fn into_value(self) -> Value {
        Value::Uuid(self)
    }
}

impl FromValue for Uuid {
    fn from_value(value: Value) -> RelqResult<Self> {
        match value {
            Value::Uuid(u) => Ok(u),
            Value::Text(s) => {
                Uuid::parse_str(&s).map_err(|e| RelqError::decode(0, format!("invalid uuid: {e}")))
            }
            Value::Bytes(b) => {
                Uuid::from_slice(&b).map_err(|e| RelqError::decode(0, format!("invalid uuid: {e}")))
            }
            other => Err(mismatch("uuid", &other)),
        }
    }
}

impl IntoValue for serde_json::Value {
    fn into_value(self) -> Value {
        Value::Json(self)
    }
}

impl FromValue for serde_json::Value {
    fn from_value(value: Value) -> RelqResult<Self> {
        match value {
            Value::Json(j) => Ok(j),
            Value::Text(s) => serde_json::from_str(&s)
                .map_err(|e| RelqError::decode(0, format!("invalid json: {e}"))),
            other => Err(mismatch("json", &other)),
        }
    }
}
