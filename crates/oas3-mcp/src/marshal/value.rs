use serde_json::{Map, Value};

use crate::{
  error::MarshalError,
  routes::{resolve_ref, schema_type},
};

/// Whether an argument counts as absent: not supplied or `null`.
pub(crate) fn is_missing(value: Option<&Value>) -> bool {
  value.is_none_or(Value::is_null)
}

/// Renders a scalar against its declared type. `integer`, `number` and
/// `boolean` accept a matching JSON value or a string parsing as that type.
/// `#/$defs/` references are resolved through `definitions` first.
pub(crate) fn coerce_scalar(
  name: &str,
  value: &Value,
  schema: &Value,
  definitions: &Map<String, Value>,
) -> Result<String, MarshalError> {
  match (schema_type(resolve_ref(schema, definitions)), value) {
    (_, Value::Array(_) | Value::Object(_)) => Err(MarshalError::serialization(
      name,
      "nested arrays and objects are not supported here",
    )),
    (_, Value::Null) => Ok(String::new()),
    (Some("integer"), Value::Number(n)) => n
      .as_i64()
      .map(|i| i.to_string())
      .or_else(|| n.as_u64().map(|u| u.to_string()))
      .or_else(|| {
        n.as_f64()
          .filter(|f| f.fract() == 0.0 && f.is_finite())
          .map(|f| format!("{f:.0}"))
      })
      .ok_or_else(|| MarshalError::serialization(name, format!("expected an integer, got {n}"))),
    (Some("integer"), Value::String(s)) => s
      .trim()
      .parse::<i64>()
      .map(|i| i.to_string())
      .map_err(|_| MarshalError::serialization(name, format!("expected an integer, got '{s}'"))),
    (Some("number"), Value::Number(n)) => Ok(n.to_string()),
    (Some("number"), Value::String(s)) => s
      .trim()
      .parse::<f64>()
      .ok()
      .filter(|f| f.is_finite())
      .map(|_| s.trim().to_string())
      .ok_or_else(|| MarshalError::serialization(name, format!("expected a number, got '{s}'"))),
    (Some("boolean"), Value::Bool(b)) => Ok(b.to_string()),
    (Some("boolean"), Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
      "true" => Ok("true".to_string()),
      "false" => Ok("false".to_string()),
      _ => Err(MarshalError::serialization(name, format!("expected a boolean, got '{s}'"))),
    },
    (Some(ty @ ("integer" | "number" | "boolean")), other) => Err(MarshalError::serialization(
      name,
      format!("expected {ty}, got {}", json_kind(other)),
    )),
    (_, Value::String(s)) => Ok(s.clone()),
    (_, other) => Ok(other.to_string()),
  }
}

/// Coerces every element of an array value with the `items` schema.
pub(crate) fn coerce_array(
  name: &str,
  items: &[Value],
  schema: &Value,
  definitions: &Map<String, Value>,
) -> Result<Vec<String>, MarshalError> {
  let item_schema = resolve_ref(schema, definitions).get("items").unwrap_or(&Value::Null);
  items
    .iter()
    .map(|item| coerce_scalar(name, item, item_schema, definitions))
    .collect()
}

/// Property name and rendered value pairs, skipping `null` properties.
pub(crate) fn coerce_object(
  name: &str,
  object: &Map<String, Value>,
  schema: &Value,
  definitions: &Map<String, Value>,
) -> Result<Vec<(String, String)>, MarshalError> {
  let schema = resolve_ref(schema, definitions);
  object
    .iter()
    .filter(|(_, value)| !value.is_null())
    .map(|(prop, value)| {
      let prop_schema = schema
        .get("properties")
        .and_then(|props| props.get(prop))
        .unwrap_or(&Value::Null);
      coerce_scalar(name, value, prop_schema, definitions).map(|rendered| (prop.clone(), rendered))
    })
    .collect()
}

/// Text form used where no type check applies: strings as-is, arrays
/// comma-joined, objects as compact JSON.
pub(crate) fn to_text(value: &Value) -> String {
  match value {
    Value::Null => String::new(),
    Value::String(s) => s.clone(),
    Value::Array(items) => items.iter().map(to_text).collect::<Vec<_>>().join(","),
    Value::Bool(_) | Value::Number(_) | Value::Object(_) => value.to_string(),
  }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "boolean",
    Value::Number(_) => "number",
    Value::String(_) => "string",
    Value::Array(_) => "array",
    Value::Object(_) => "object",
  }
}
