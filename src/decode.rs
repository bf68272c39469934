//! Decoding SQLite rows into JSON objects.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use sqlx::sqlite::{SqliteRow, SqliteValueRef};
use sqlx::{Column, Row, TypeInfo, Value, ValueRef};

use crate::Error;

/// A decoded row, keyed by column name in result-set order.
pub type JsonRow = IndexMap<String, JsonValue>;

/// Convert a single SQLite value to JSON.
///
/// The storage class of the value decides the mapping, not the declared
/// column type: booleans and dates come back as the integer or text SQLite
/// stored, BLOBs become standard base64 strings and non-finite reals become
/// `null`.
pub(crate) fn to_json(value: SqliteValueRef<'_>) -> Result<JsonValue, Error> {
   if value.is_null() {
      return Ok(JsonValue::Null);
   }

   let type_name = value.type_info().name().to_string();
   let owned = ValueRef::to_owned(&value);

   let json = match type_name.as_str() {
      "INTEGER" => JsonValue::from(owned.try_decode::<i64>()?),
      "REAL" => serde_json::Number::from_f64(owned.try_decode::<f64>()?)
         .map(JsonValue::Number)
         .unwrap_or(JsonValue::Null),
      "TEXT" => JsonValue::String(owned.try_decode::<String>()?),
      "BLOB" => JsonValue::String(BASE64.encode(owned.try_decode::<Vec<u8>>()?)),
      other => return Err(Error::UnsupportedDatatype(other.to_string())),
   };

   Ok(json)
}

/// Decode every column of every row.
pub(crate) fn decode_rows(rows: Vec<SqliteRow>) -> Result<Vec<JsonRow>, Error> {
   let mut decoded = Vec::with_capacity(rows.len());
   for row in rows {
      let mut value = IndexMap::with_capacity(row.columns().len());
      for (i, column) in row.columns().iter().enumerate() {
         let v = row.try_get_raw(i)?;
         value.insert(column.name().to_string(), to_json(v)?);
      }
      decoded.push(value);
   }

   Ok(decoded)
}
