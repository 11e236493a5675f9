use std::collections::BTreeSet;

use serde_json::{Map, Value};

pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";
pub const DEFS_REF_PREFIX: &str = "#/$defs/";

/// Rewrites every `#/components/schemas/X` reference to `#/$defs/X` in place.
pub fn rewrite_refs(value: &mut Value) {
  match value {
    Value::Object(map) => {
      for (key, child) in map.iter_mut() {
        if key == "$ref"
          && let Some(rewritten) = child
            .as_str()
            .and_then(|target| target.strip_prefix(SCHEMA_REF_PREFIX))
            .map(|name| format!("{DEFS_REF_PREFIX}{name}"))
        {
          *child = Value::String(rewritten);
        } else {
          rewrite_refs(child);
        }
      }
    }
    Value::Array(items) => items.iter_mut().for_each(rewrite_refs),
    _ => {}
  }
}

/// Names referenced via either `#/components/schemas/` or `#/$defs/`.
#[must_use]
pub fn collect_refs(value: &Value) -> BTreeSet<String> {
  let mut names = BTreeSet::new();
  collect_into(value, &mut names);
  names
}

fn collect_into(value: &Value, names: &mut BTreeSet<String>) {
  match value {
    Value::Object(map) => {
      for (key, child) in map {
        if key == "$ref"
          && let Some(target) = child.as_str()
        {
          if let Some(name) = target
            .strip_prefix(SCHEMA_REF_PREFIX)
            .or_else(|| target.strip_prefix(DEFS_REF_PREFIX))
          {
            names.insert(name.to_string());
          }
        } else {
          collect_into(child, names);
        }
      }
    }
    Value::Array(items) => items.iter().for_each(|item| collect_into(item, names)),
    _ => {}
  }
}

/// The declared JSON type of a schema, ignoring a `null` member of a type
/// array (`["integer", "null"]` reads as `integer`).
#[must_use]
pub fn schema_type(schema: &Value) -> Option<&str> {
  match schema.get("type")? {
    Value::String(ty) => Some(ty.as_str()),
    Value::Array(types) => types.iter().filter_map(Value::as_str).find(|ty| *ty != "null"),
    _ => None,
  }
}

/// Follows `#/$defs/` references through `definitions` to the schema they
/// name. Stops at the first schema that is not a resolvable reference, and
/// after one hop per definition so reference cycles terminate.
#[must_use]
pub fn resolve_ref<'a>(schema: &'a Value, definitions: &'a Map<String, Value>) -> &'a Value {
  let mut current = schema;
  for _ in 0..definitions.len() {
    let Some(target) = current
      .get("$ref")
      .and_then(Value::as_str)
      .and_then(|target| target.strip_prefix(DEFS_REF_PREFIX))
      .and_then(|name| definitions.get(name))
    else {
      break;
    };
    current = target;
  }
  current
}
