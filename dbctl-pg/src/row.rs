//! PgRow -> JSON conversion for raw query results

use dbctl_core::RawRow;
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::{Column, Row, TypeInfo, ValueRef};

/// Convert a row into column name -> JSON value.
///
/// Scalar types map to their JSON counterparts; anything else is rendered
/// as a `<TYPE>` placeholder string.
pub fn row_to_json(row: &PgRow) -> Result<RawRow, sqlx::Error> {
    let mut out = RawRow::new();
    for (idx, column) in row.columns().iter().enumerate() {
        let value = column_value(row, idx, column.type_info().name())?;
        out.insert(column.name().to_string(), value);
    }
    Ok(out)
}

fn column_value(row: &PgRow, idx: usize, type_name: &str) -> Result<Value, sqlx::Error> {
    if row.try_get_raw(idx)?.is_null() {
        return Ok(Value::Null);
    }

    let value = match type_name {
        "BOOL" => Value::from(row.try_get::<bool, _>(idx)?),
        "INT2" => Value::from(row.try_get::<i16, _>(idx)?),
        "INT4" => Value::from(row.try_get::<i32, _>(idx)?),
        "INT8" => Value::from(row.try_get::<i64, _>(idx)?),
        "FLOAT4" => Value::from(f64::from(row.try_get::<f32, _>(idx)?)),
        "FLOAT8" => Value::from(row.try_get::<f64, _>(idx)?),
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" => Value::from(row.try_get::<String, _>(idx)?),
        other => Value::String(format!("<{}>", other)),
    };
    Ok(value)
}
