//! Turns a tool argument mapping into a concrete [`HttpRequest`].

mod body;
mod layout;
mod path;
mod query;
mod value;

#[cfg(test)]
mod tests;

use std::{collections::HashMap, sync::Arc};

use http::{HeaderMap, HeaderName, HeaderValue, header::COOKIE};
use oas3_mcp_support::{HttpRequest, percent_encode_cookie_value};
use serde_json::{Map, Value};

pub use layout::{ArgumentBinding, ArgumentLayout, ArgumentTarget, BODY_ARGUMENT};

use crate::{
  error::{MarshalError, ParameterScope},
  media::JSON_MIME,
  routes::{ParameterInfo, ParameterLocation, PathParseError, PathTemplate, Route},
};

/// Tool arguments keyed by exposed argument name.
pub type Arguments = Map<String, Value>;

/// Builds requests for one route. Immutable and shared by every call.
#[derive(Debug, Clone)]
pub struct RequestMarshaler {
  route: Arc<Route>,
  template: PathTemplate,
  layout: ArgumentLayout,
}

impl RequestMarshaler {
  /// Fails when the path template is malformed or placeholders and path
  /// parameters disagree.
  pub fn new(route: Arc<Route>) -> Result<Self, PathParseError> {
    let template = route.path_template()?;
    let layout = ArgumentLayout::for_route(&route);
    Ok(Self {
      route,
      template,
      layout,
    })
  }

  #[must_use]
  pub fn route(&self) -> &Route {
    &self.route
  }

  #[must_use]
  pub fn layout(&self) -> &ArgumentLayout {
    &self.layout
  }

  /// Reports every required argument that is absent or `null` in one error.
  pub fn validate(&self, args: &Arguments) -> Result<(), MarshalError> {
    let missing = self
      .layout
      .bindings()
      .iter()
      .filter(|b| b.required && value::is_missing(args.get(&b.argument)))
      .collect::<Vec<_>>();

    if missing.is_empty() {
      return Ok(());
    }

    let only_path = missing.iter().all(|b| match b.target {
      ArgumentTarget::Parameter(index) => self
        .route
        .parameters
        .get(index)
        .is_some_and(|p| p.location == ParameterLocation::Path),
      _ => false,
    });

    Err(MarshalError::MissingRequiredParameter {
      scope: if only_path {
        ParameterScope::Path
      } else {
        ParameterScope::Any
      },
      names: missing.into_iter().map(|b| b.argument.clone()).collect(),
    })
  }

  /// Validates `args` and renders the request. Arguments that match no
  /// binding are ignored.
  pub fn marshal(&self, args: &Arguments) -> Result<HttpRequest, MarshalError> {
    self.validate(args)?;

    let mut path_values = HashMap::new();
    let mut query = vec![];
    let mut headers = HeaderMap::new();
    let mut cookies = vec![];

    for (index, param) in self.route.parameters.iter().enumerate() {
      let Some(value) = self.parameter_value(index, param, args) else {
        continue;
      };

      match param.location {
        ParameterLocation::Path => {
          let rendered = path::render_path_value(param, value, &self.route.definitions)?;
          path_values.insert(param.name.as_str(), rendered);
        }
        ParameterLocation::Query => query::push_query_pairs(param, value, &self.route.definitions, &mut query)?,
        ParameterLocation::Header => {
          let name = HeaderName::try_from(param.name.as_str())
            .map_err(|e| MarshalError::serialization(&param.name, e.to_string()))?;
          let text = value::to_text(value);
          let header_value =
            HeaderValue::try_from(text.as_str()).map_err(|e| MarshalError::serialization(&param.name, e.to_string()))?;
          headers.insert(name, header_value);
        }
        ParameterLocation::Cookie => {
          cookies.push(format!("{}={}", param.name, percent_encode_cookie_value(&value::to_text(value))));
        }
      }
    }

    if !cookies.is_empty() {
      let cookie = HeaderValue::try_from(cookies.join("; ")).map_err(|e| MarshalError::serialization("Cookie", e.to_string()))?;
      headers.insert(COOKIE, cookie);
    }

    let body = self
      .body_value(args)
      .map(|value| {
        let content_type = self
          .route
          .request_body
          .as_ref()
          .map_or(JSON_MIME, |b| b.content_type());
        body::encode_body(content_type, &value)
      })
      .transpose()?;

    Ok(
      HttpRequest::builder()
        .method(self.route.method.clone())
        .url(self.template.render(&path_values))
        .query(query)
        .headers(headers)
        .maybe_body(body)
        .build(),
    )
  }

  /// The supplied value for a parameter, else its schema default. `None`
  /// when neither is present.
  fn parameter_value<'a>(&'a self, index: usize, param: &'a ParameterInfo, args: &'a Arguments) -> Option<&'a Value> {
    let argument = self.layout.argument_for(index)?;
    match args.get(argument) {
      Some(value) if !value.is_null() => Some(value),
      _ if param.required => param.default_value(),
      _ => None,
    }
  }

  /// The body to send, if the route has one and any body argument was given.
  fn body_value(&self, args: &Arguments) -> Option<Value> {
    self.route.request_body.as_ref()?;

    let mut fields = Map::new();
    for binding in self.layout.bindings() {
      match &binding.target {
        ArgumentTarget::Body => return args.get(&binding.argument).filter(|v| !v.is_null()).cloned(),
        ArgumentTarget::BodyProperty(prop) => {
          if let Some(value) = args.get(&binding.argument).filter(|v| !v.is_null()) {
            fields.insert(prop.clone(), value.clone());
          }
        }
        ArgumentTarget::Parameter(_) => {}
      }
    }

    let required = self.route.request_body.as_ref().is_some_and(|b| b.required);
    (required || !fields.is_empty()).then_some(Value::Object(fields))
  }
}
