//! Decoding of Firestore's typed REST values into plain JSON.
//!
//! Every field in a REST document is wrapped in a single-key object naming
//! its type:
//!
//! ```text
//! { "name":   { "stringValue": "ION Orchard" },
//!   "stars":  { "doubleValue": 4.4 },
//!   "total_reviews": { "integerValue": "31250" },
//!   "coordinates": { "mapValue": { "fields": { "lat": { "doubleValue": 1.304 } } } } }
//! ```
//!
//! `integerValue` arrives as a string. Non-finite doubles (sent as `"NaN"`,
//! `"Infinity"`) have no JSON representation and decode to `null`.
//! `geoPointValue` decodes to `{ "lat", "lng" }`, the shape used by the
//! domain types. Proto3 omits zero-valued members, so missing latitude or
//! longitude means `0.0`.

use serde_json::{Map, Number, Value};

use crate::error::StoreError;

fn unsupported(kind: &str, detail: impl Into<String>) -> StoreError {
    StoreError::UnsupportedValue {
        kind: kind.to_owned(),
        detail: detail.into(),
    }
}

/// Decodes a `fields` map into a JSON object.
///
/// # Errors
///
/// Returns [`StoreError::UnsupportedValue`] if any nested value is malformed
/// or of an unknown kind.
pub fn decode_fields(fields: &Map<String, Value>) -> Result<Value, StoreError> {
    let mut out = Map::with_capacity(fields.len());
    for (key, raw) in fields {
        out.insert(key.clone(), decode_value(raw)?);
    }
    Ok(Value::Object(out))
}

/// Decodes one typed value.
///
/// # Errors
///
/// Returns [`StoreError::UnsupportedValue`] if `raw` is not a single-key
/// typed value or its payload does not match the declared kind.
pub fn decode_value(raw: &Value) -> Result<Value, StoreError> {
    let obj = raw
        .as_object()
        .ok_or_else(|| unsupported("<none>", format!("expected an object, got {raw}")))?;
    let mut entries = obj.iter();
    let (kind, inner) = entries
        .next()
        .ok_or_else(|| unsupported("<none>", "empty value object"))?;
    if entries.next().is_some() {
        return Err(unsupported(kind, "value object has more than one key"));
    }

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" => inner
            .as_bool()
            .map(Value::Bool)
            .ok_or_else(|| unsupported(kind, format!("not a boolean: {inner}"))),
        "integerValue" => decode_integer(inner).ok_or_else(|| unsupported(kind, format!("not an integer: {inner}"))),
        "doubleValue" => decode_double(inner).ok_or_else(|| unsupported(kind, format!("not a double: {inner}"))),
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => inner
            .as_str()
            .map(|s| Value::String(s.to_owned()))
            .ok_or_else(|| unsupported(kind, format!("not a string: {inner}"))),
        "geoPointValue" => {
            let lat = inner.get("latitude").map_or(Some(0.0), Value::as_f64);
            let lng = inner.get("longitude").map_or(Some(0.0), Value::as_f64);
            match (lat, lng) {
                (Some(lat), Some(lng)) => Ok(serde_json::json!({ "lat": lat, "lng": lng })),
                _ => Err(unsupported(kind, format!("malformed geo point: {inner}"))),
            }
        }
        "arrayValue" => {
            let Some(values) = inner.get("values") else {
                return Ok(Value::Array(Vec::new()));
            };
            let values = values
                .as_array()
                .ok_or_else(|| unsupported(kind, "values is not an array"))?;
            values
                .iter()
                .map(decode_value)
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
        "mapValue" => match inner.get("fields") {
            None => Ok(Value::Object(Map::new())),
            Some(Value::Object(fields)) => decode_fields(fields),
            Some(other) => Err(unsupported(kind, format!("fields is not an object: {other}"))),
        },
        other => Err(unsupported(other, "unknown value kind")),
    }
}

fn decode_integer(inner: &Value) -> Option<Value> {
    match inner {
        Value::String(s) => s.parse::<i64>().ok().map(Value::from),
        Value::Number(n) => n.as_i64().map(Value::from),
        _ => None,
    }
}

fn decode_double(inner: &Value) -> Option<Value> {
    match inner {
        Value::Number(n) => n.as_f64().map(|f| Number::from_f64(f).map_or(Value::Null, Value::Number)),
        Value::String(s) if matches!(s.as_str(), "NaN" | "Infinity" | "-Infinity") => Some(Value::Null),
        _ => None,
    }
}
