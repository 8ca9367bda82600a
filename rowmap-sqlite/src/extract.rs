use rowmap_core::{AsValue, Context, Result, Value};
use rusqlite::types::ValueRef;
use std::str;

pub(crate) fn extract_value(value: ValueRef<'_>) -> Result<Value> {
    Ok(match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(v) => v.as_value(),
        ValueRef::Real(v) => v.as_value(),
        ValueRef::Text(v) => str::from_utf8(v)
            .context("Sqlite returned a text value that is not valid UTF-8")?
            .to_string()
            .as_value(),
        ValueRef::Blob(v) => Value::Blob(Some(v.into())),
    })
}
