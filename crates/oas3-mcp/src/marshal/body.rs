use oas3_mcp_support::{RequestBody, percent_encode_query_component, percent_encode_query_key};
use serde_json::Value;

use super::value::to_text;
use crate::{
  error::MarshalError,
  media::{ContentCategory, JSON_MIME},
};

/// Serializes a body value under `content_type`. Media types without a
/// dedicated encoder are sent as JSON.
pub(crate) fn encode_body(content_type: &str, value: &Value) -> Result<RequestBody, MarshalError> {
  match ContentCategory::from_content_type(content_type) {
    ContentCategory::FormUrlEncoded => encode_form(value).map(|data| RequestBody::new(content_type, data)),
    ContentCategory::Text => Ok(RequestBody::new(content_type, to_text(value))),
    ContentCategory::Json => encode_json(value).map(|data| RequestBody::new(content_type, data)),
    _ => encode_json(value).map(|data| RequestBody::new(JSON_MIME, data)),
  }
}

fn encode_json(value: &Value) -> Result<Vec<u8>, MarshalError> {
  serde_json::to_vec(value).map_err(|e| MarshalError::serialization("body", e.to_string()))
}

/// `a=1&b=x&b=y`; arrays repeat the key, nested objects are compact JSON.
fn encode_form(value: &Value) -> Result<String, MarshalError> {
  let Value::Object(fields) = value else {
    return Err(MarshalError::serialization(
      "body",
      "form-encoded bodies must be objects",
    ));
  };

  let pairs = fields
    .iter()
    .filter(|(_, v)| !v.is_null())
    .flat_map(|(key, v)| match v {
      Value::Array(items) => items.iter().map(|item| (key, to_text(item))).collect::<Vec<_>>(),
      other => vec![(key, to_text(other))],
    })
    .map(|(key, v)| format!("{}={}", percent_encode_query_key(key), percent_encode_query_component(&v)))
    .collect::<Vec<_>>();

  Ok(pairs.join("&"))
}
