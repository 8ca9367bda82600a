use crate::{Error, Result, Value, as_value::mismatch};
use std::fmt::Debug;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Bidirectional conversion between the value of an entity field and the value
/// stored in its column.
///
/// Adapters are bound to one column and shared by every translation a mapper
/// performs, so they must be stateless. Both directions must handle the empty
/// value: absent in, absent out.
pub trait ColumnAdapter: Send + Sync + Debug {
    /// Entity field value to column value.
    fn from_entity(&self, value: Value) -> Result<Value>;
    /// Column value to entity field value.
    fn to_entity(&self, value: Value) -> Result<Value>;
}

/// Identity adapter, the default of every column.
#[derive(Default, Debug, Clone, Copy)]
pub struct PassThrough;

impl ColumnAdapter for PassThrough {
    fn from_entity(&self, value: Value) -> Result<Value> {
        Ok(value)
    }
    fn to_entity(&self, value: Value) -> Result<Value> {
        Ok(value)
    }
}

/// Stores a timestamp with time zone as RFC 3339 text.
///
/// Useful for backends without a native zoned timestamp type. An empty string read
/// from the column is treated like `NULL`.
#[derive(Default, Debug, Clone, Copy)]
pub struct Rfc3339Adapter;

impl ColumnAdapter for Rfc3339Adapter {
    fn from_entity(&self, value: Value) -> Result<Value> {
        match value {
            Value::TimestampWithTimezone(Some(v)) => v
                .format(&Rfc3339)
                .map(|v| Value::Varchar(Some(v)))
                .map_err(|e| Error::new(e).context(format!("Cannot format {} as RFC 3339", v))),
            v if v.is_null() => Ok(Value::Varchar(None)),
            v => Err(mismatch::<OffsetDateTime>(&v)),
        }
    }

    fn to_entity(&self, value: Value) -> Result<Value> {
        match value {
            Value::Varchar(Some(v)) if v.is_empty() => Ok(Value::TimestampWithTimezone(None)),
            Value::Varchar(Some(v)) => OffsetDateTime::parse(&v, &Rfc3339)
                .map(|v| Value::TimestampWithTimezone(Some(v)))
                .map_err(|e| Error::new(e).context(format!("Cannot parse `{}` as RFC 3339", v))),
            v @ Value::TimestampWithTimezone(..) => Ok(v),
            v if v.is_null() => Ok(Value::TimestampWithTimezone(None)),
            v => Err(mismatch::<OffsetDateTime>(&v)),
        }
    }
}
