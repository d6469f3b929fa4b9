use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{Map, Number, Value};
use sqlx::mysql::MySqlRow;
use sqlx::{Column, Row, TypeInfo};
use tracing::debug;

use super::CatalogRow;

/// Convert a catalog row into a JSON object keyed by column name.
///
/// The catalog schema is not known at compile time, so each column is
/// decoded by its reported MySQL type.
pub fn row_to_json(row: &MySqlRow) -> Result<CatalogRow, sqlx::Error> {
    let mut object = Map::with_capacity(row.columns().len());
    for column in row.columns() {
        let value = decode_column(row, column.ordinal(), column.type_info().name())?;
        object.insert(column.name().to_string(), value);
    }
    Ok(object)
}

fn decode_column(row: &MySqlRow, index: usize, type_name: &str) -> Result<Value, sqlx::Error> {
    let value = match type_name {
        "NULL" => Value::Null,
        "BOOLEAN" => row.try_get::<Option<bool>, _>(index)?.map(Value::Bool).unwrap_or(Value::Null),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => row
            .try_get::<Option<i64>, _>(index)?
            .map(Value::from)
            .unwrap_or(Value::Null),
        "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
        | "BIGINT UNSIGNED" => row
            .try_get::<Option<u64>, _>(index)?
            .map(Value::from)
            .unwrap_or(Value::Null),
        "FLOAT" => float(row.try_get::<Option<f32>, _>(index)?.map(f64::from)),
        "DOUBLE" => float(row.try_get::<Option<f64>, _>(index)?),
        "DECIMAL" => float(row.try_get::<Option<Decimal>, _>(index)?.and_then(|d| d.to_f64())),
        "DATE" => string(row.try_get::<Option<NaiveDate>, _>(index)?),
        "TIME" => string(row.try_get::<Option<NaiveTime>, _>(index)?),
        "DATETIME" => row
            .try_get::<Option<NaiveDateTime>, _>(index)?
            .map(|dt| Value::String(iso_datetime(dt)))
            .unwrap_or(Value::Null),
        "TIMESTAMP" => row
            .try_get::<Option<DateTime<Utc>>, _>(index)?
            .map(|ts| Value::String(ts.to_rfc3339()))
            .unwrap_or(Value::Null),
        "JSON" => row.try_get::<Option<Value>, _>(index)?.unwrap_or(Value::Null),
        other => text_or_bytes(row, index, other),
    };
    Ok(value)
}

fn float(value: Option<f64>) -> Value {
    value
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

fn string<T: ToString>(value: Option<T>) -> Value {
    value
        .map(|v| Value::String(v.to_string()))
        .unwrap_or(Value::Null)
}

fn iso_datetime(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}

/// Text-like and binary columns: strings when possible, lossy UTF-8 otherwise.
/// Types that decode as neither are passed through as null.
fn text_or_bytes(row: &MySqlRow, index: usize, type_name: &str) -> Value {
    if let Ok(text) = row.try_get::<Option<String>, _>(index) {
        return text.map(Value::String).unwrap_or(Value::Null);
    }
    match row.try_get::<Option<Vec<u8>>, _>(index) {
        Ok(bytes) => bytes
            .map(|b| Value::String(String::from_utf8_lossy(&b).into_owned()))
            .unwrap_or(Value::Null),
        Err(e) => {
            debug!(column = index, type_name, error = %e, "Undecodable catalog column");
            Value::Null
        }
    }
}
