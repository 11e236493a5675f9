use serde_json::{Map, Value};

use super::value::{coerce_array, coerce_object, coerce_scalar};
use crate::{
  error::MarshalError,
  routes::{ParameterInfo, ParameterStyle},
};

/// Appends the query pairs for one parameter. `null`, empty strings and
/// empty arrays emit nothing.
pub(crate) fn push_query_pairs(
  param: &ParameterInfo,
  value: &Value,
  definitions: &Map<String, Value>,
  pairs: &mut Vec<(String, String)>,
) -> Result<(), MarshalError> {
  let name = param.name.as_str();
  match value {
    Value::Null => {}
    Value::String(s) if s.is_empty() => {}
    Value::Array(items) if items.is_empty() => {}
    Value::Array(items) => {
      let rendered = coerce_array(name, items, &param.schema, definitions)?;
      if param.explode && param.style == ParameterStyle::Form {
        pairs.extend(rendered.into_iter().map(|item| (name.to_string(), item)));
      } else {
        pairs.push((name.to_string(), rendered.join(delimiter(param.style))));
      }
    }
    Value::Object(object) => {
      let props = coerce_object(name, object, &param.schema, definitions)?;
      match (param.style, param.explode) {
        (ParameterStyle::DeepObject, _) => {
          pairs.extend(props.into_iter().map(|(prop, v)| (format!("{name}[{prop}]"), v)));
        }
        (ParameterStyle::Form, true) => pairs.extend(props),
        (style, _) => {
          if !props.is_empty() {
            let joined = props
              .into_iter()
              .flat_map(|(prop, v)| [prop, v])
              .collect::<Vec<_>>()
              .join(delimiter(style));
            pairs.push((name.to_string(), joined));
          }
        }
      }
    }
    scalar => pairs.push((name.to_string(), coerce_scalar(name, scalar, &param.schema, definitions)?)),
  }
  Ok(())
}

const fn delimiter(style: ParameterStyle) -> &'static str {
  match style {
    ParameterStyle::SpaceDelimited => " ",
    ParameterStyle::PipeDelimited => "|",
    _ => ",",
  }
}
