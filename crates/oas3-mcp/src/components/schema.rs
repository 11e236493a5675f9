use serde_json::{Map, Value, json};

use super::content::{RESULT_PROPERTY, WRAP_RESULT_KEY};
use crate::{
  marshal::ArgumentLayout,
  media::ContentCategory,
  routes::{Route, resolve_ref, schema_type},
};

/// Object schema over the exposed arguments. Parameter and body schemas are
/// passed through as declared; route definitions ride along as `$defs`.
#[must_use]
pub fn input_schema(route: &Route, layout: &ArgumentLayout) -> Value {
  let mut properties = Map::new();
  for binding in layout.bindings() {
    let mut schema = binding.schema.clone();
    if let (Some(description), Value::Object(fields)) = (&binding.description, &mut schema)
      && !fields.contains_key("description")
    {
      fields.insert("description".to_string(), Value::String(description.clone()));
    }
    properties.insert(binding.argument.clone(), schema);
  }

  let required = layout.required_arguments().map(Value::from).collect::<Vec<_>>();

  let mut schema = Map::new();
  schema.insert("type".to_string(), json!("object"));
  schema.insert("properties".to_string(), Value::Object(properties));
  if !required.is_empty() {
    schema.insert("required".to_string(), Value::Array(required));
  }
  with_definitions(schema, route)
}

/// Schema of the structured result, from the declared JSON success response.
/// Non-object results are described as `{"result": ...}` and flagged with
/// `x-wrap-result`.
#[must_use]
pub fn output_schema(route: &Route) -> Option<Value> {
  let response = route.response.as_ref()?;
  let content_type = response.content_type.as_deref()?;
  if ContentCategory::from_content_type(content_type) != ContentCategory::Json {
    return None;
  }
  let declared = response.schema.as_ref()?;

  let resolved = resolve_ref(declared, &route.definitions);
  if is_object_schema(resolved, route) {
    let Value::Object(fields) = resolved.clone() else {
      return None;
    };
    return Some(with_definitions(fields, route));
  }

  let mut schema = Map::new();
  schema.insert("type".to_string(), json!("object"));
  schema.insert("properties".to_string(), json!({ RESULT_PROPERTY: declared }));
  schema.insert("required".to_string(), json!([RESULT_PROPERTY]));
  schema.insert(WRAP_RESULT_KEY.to_string(), Value::Bool(true));
  Some(with_definitions(schema, route))
}

/// Whether results of a tool with this output schema are wrapped.
#[must_use]
pub fn wraps_result(output_schema: Option<&Value>) -> bool {
  output_schema
    .and_then(|schema| schema.get(WRAP_RESULT_KEY))
    .and_then(Value::as_bool)
    .unwrap_or(false)
}

/// An explicit `object` type, an untyped schema with `properties`, or an
/// `allOf` whose members are all objects.
fn is_object_schema(schema: &Value, route: &Route) -> bool {
  let schema = resolve_ref(schema, &route.definitions);
  match schema_type(schema) {
    Some(ty) => ty == "object",
    None if schema.get("properties").is_some_and(Value::is_object) => true,
    None => schema
      .get("allOf")
      .and_then(Value::as_array)
      .is_some_and(|members| !members.is_empty() && members.iter().all(|m| is_object_schema(m, route))),
  }
}

fn with_definitions(mut schema: Map<String, Value>, route: &Route) -> Value {
  if !route.definitions.is_empty() && !schema.contains_key("$defs") {
    schema.insert("$defs".to_string(), Value::Object(route.definitions.clone()));
  }
  Value::Object(schema)
}
