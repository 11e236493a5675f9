use oas3_mcp_support::percent_encode_path_segment;
use serde_json::{Map, Value};

use super::value::{coerce_array, coerce_scalar};
use crate::{
  error::MarshalError,
  routes::{ParameterInfo, ParameterStyle},
};

/// Renders one path parameter in its declared style, percent-encoded and
/// ready for substitution.
pub(crate) fn render_path_value(
  param: &ParameterInfo,
  value: &Value,
  definitions: &Map<String, Value>,
) -> Result<String, MarshalError> {
  let name = param.name.as_str();
  let values = match value {
    Value::Object(_) => {
      return Err(MarshalError::serialization(
        name,
        "objects are not supported in path parameters",
      ));
    }
    Value::Array(items) => coerce_array(name, items, &param.schema, definitions)?,
    scalar => vec![coerce_scalar(name, scalar, &param.schema, definitions)?],
  };
  let encoded = values
    .iter()
    .map(|v| percent_encode_path_segment(v))
    .collect::<Vec<_>>();

  Ok(match (param.style, param.explode) {
    (ParameterStyle::Label, true) => format!(".{}", encoded.join(".")),
    (ParameterStyle::Label, false) => format!(".{}", encoded.join(",")),
    (ParameterStyle::Matrix, true) => encoded.iter().map(|v| format!(";{name}={v}")).collect(),
    (ParameterStyle::Matrix, false) => format!(";{name}={}", encoded.join(",")),
    _ => encoded.join(","),
  })
}
