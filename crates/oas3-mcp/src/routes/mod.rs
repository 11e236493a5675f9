//! Normalized, read-only representation of API operations.
//!
//! A [`Route`] carries everything later stages need: method, path template,
//! parameters with their serialization style, the request body, the declared
//! success response and the schema definitions its schemas refer to.

mod parser;
mod path;
mod schema;


use std::collections::BTreeSet;

use http::Method;
use oas3::spec::{ParameterIn, ParameterStyle as SpecParameterStyle};
use serde_json::{Map, Value, json};
use strum::Display;

pub use parser::{ParsedRoutes, RouteParser};
pub use path::{PathParseError, PathPart, PathTemplate};
pub use schema::{DEFS_REF_PREFIX, SCHEMA_REF_PREFIX, collect_refs, resolve_ref, rewrite_refs, schema_type};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ParameterLocation {
  #[default]
  Path,
  Query,
  Header,
  Cookie,
}

impl From<ParameterIn> for ParameterLocation {
  fn from(value: ParameterIn) -> Self {
    match value {
      ParameterIn::Path => Self::Path,
      ParameterIn::Query => Self::Query,
      ParameterIn::Header => Self::Header,
      ParameterIn::Cookie => Self::Cookie,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "camelCase")]
pub enum ParameterStyle {
  Matrix,
  Label,
  Form,
  Simple,
  SpaceDelimited,
  PipeDelimited,
  DeepObject,
}

impl ParameterStyle {
  /// The style OpenAPI assumes when a parameter declares none.
  #[must_use]
  pub const fn default_for(location: ParameterLocation) -> Self {
    match location {
      ParameterLocation::Query | ParameterLocation::Cookie => Self::Form,
      ParameterLocation::Path | ParameterLocation::Header => Self::Simple,
    }
  }
}

impl From<SpecParameterStyle> for ParameterStyle {
  fn from(value: SpecParameterStyle) -> Self {
    match value {
      SpecParameterStyle::Matrix => Self::Matrix,
      SpecParameterStyle::Label => Self::Label,
      SpecParameterStyle::Form => Self::Form,
      SpecParameterStyle::Simple => Self::Simple,
      SpecParameterStyle::SpaceDelimited => Self::SpaceDelimited,
      SpecParameterStyle::PipeDelimited => Self::PipeDelimited,
      SpecParameterStyle::DeepObject => Self::DeepObject,
    }
  }
}

/// One declared parameter of an operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterInfo {
  pub name: String,
  pub location: ParameterLocation,
  pub required: bool,
  pub schema: Value,
  pub style: ParameterStyle,
  pub explode: bool,
  pub description: Option<String>,
}

impl ParameterInfo {
  /// Creates a parameter with OpenAPI defaults for its location: `form`
  /// style with `explode` for query and cookie, `simple` otherwise, and a
  /// plain string schema. Path parameters are always required.
  #[must_use]
  pub fn new(name: impl Into<String>, location: ParameterLocation) -> Self {
    let style = ParameterStyle::default_for(location);
    Self {
      name: name.into(),
      location,
      required: location == ParameterLocation::Path,
      schema: json!({ "type": "string" }),
      style,
      explode: style == ParameterStyle::Form,
      description: None,
    }
  }

  #[must_use]
  pub fn path(name: impl Into<String>) -> Self {
    Self::new(name, ParameterLocation::Path)
  }

  #[must_use]
  pub fn query(name: impl Into<String>) -> Self {
    Self::new(name, ParameterLocation::Query)
  }

  #[must_use]
  pub fn header(name: impl Into<String>) -> Self {
    Self::new(name, ParameterLocation::Header)
  }

  #[must_use]
  pub fn cookie(name: impl Into<String>) -> Self {
    Self::new(name, ParameterLocation::Cookie)
  }

  #[must_use]
  pub fn with_required(mut self, required: bool) -> Self {
    self.required = required || self.location == ParameterLocation::Path;
    self
  }

  #[must_use]
  pub fn with_schema(mut self, schema: Value) -> Self {
    self.schema = schema;
    self
  }

  /// Sets the style and resets `explode` to that style's default.
  #[must_use]
  pub fn with_style(mut self, style: ParameterStyle) -> Self {
    self.style = style;
    self.explode = style == ParameterStyle::Form;
    self
  }

  #[must_use]
  pub fn with_explode(mut self, explode: bool) -> Self {
    self.explode = explode;
    self
  }

  #[must_use]
  pub fn with_description(mut self, description: impl Into<String>) -> Self {
    self.description = Some(description.into());
    self
  }

  /// The schema's `default`, if declared.
  #[must_use]
  pub fn default_value(&self) -> Option<&Value> {
    self.schema.get("default")
  }
}

#[derive(Debug, Clone, PartialEq, bon::Builder)]
pub struct RequestBodyInfo {
  #[builder(default)]
  pub required: bool,
  /// Declared media types, first entry is the one used for serialization.
  #[builder(default = vec!["application/json".to_string()])]
  pub content_types: Vec<String>,
  #[builder(default = json!({}))]
  pub schema: Value,
  pub description: Option<String>,
}

impl RequestBodyInfo {
  #[must_use]
  pub fn content_type(&self) -> &str {
    self.content_types.first().map_or("application/json", String::as_str)
  }

  /// Property schemas when the body is an object, in declaration order.
  #[must_use]
  pub fn properties(&self) -> Option<&Map<String, Value>> {
    self.schema.get("properties").and_then(Value::as_object)
  }

  /// Names listed in the body schema's `required` array.
  #[must_use]
  pub fn required_properties(&self) -> BTreeSet<&str> {
    self
      .schema
      .get("required")
      .and_then(Value::as_array)
      .map(|names| names.iter().filter_map(Value::as_str).collect())
      .unwrap_or_default()
  }
}

/// The first declared success response.
#[derive(Debug, Clone, Default, PartialEq, bon::Builder)]
pub struct ResponseInfo {
  pub content_type: Option<String>,
  pub schema: Option<Value>,
  pub description: Option<String>,
}

/// A single API operation.
#[derive(Debug, Clone, PartialEq, bon::Builder)]
pub struct Route {
  pub method: Method,
  #[builder(into)]
  pub path: String,
  #[builder(default)]
  pub parameters: Vec<ParameterInfo>,
  #[builder(default)]
  pub tags: BTreeSet<String>,
  #[builder(into)]
  pub operation_id: Option<String>,
  #[builder(into)]
  pub summary: Option<String>,
  #[builder(into)]
  pub description: Option<String>,
  pub request_body: Option<RequestBodyInfo>,
  pub response: Option<ResponseInfo>,
  /// Schemas reachable through `#/$defs/...` references.
  #[builder(default)]
  pub definitions: Map<String, Value>,
}

impl Route {
  /// `METHOD /path`, used to attribute errors and log lines to a route.
  #[must_use]
  pub fn display_key(&self) -> String {
    format!("{} {}", self.method, self.path)
  }

  pub fn parameters_in(&self, location: ParameterLocation) -> impl Iterator<Item = &ParameterInfo> {
    self.parameters.iter().filter(move |p| p.location == location)
  }

  pub fn path_parameters(&self) -> impl Iterator<Item = &ParameterInfo> {
    self.parameters_in(ParameterLocation::Path)
  }

  #[must_use]
  pub fn has_tag(&self, tag: &str) -> bool {
    self.tags.contains(tag)
  }

  /// Parses the path template and checks that placeholders and `path`
  /// parameters correspond one to one.
  pub fn path_template(&self) -> Result<PathTemplate, PathParseError> {
    let template = PathTemplate::parse(&self.path)?;
    let placeholders = template.placeholders().collect::<BTreeSet<_>>();
    let declared = self.path_parameters().map(|p| p.name.as_str()).collect::<BTreeSet<_>>();

    if let Some(name) = placeholders.difference(&declared).next() {
      return Err(PathParseError::UndeclaredPlaceholder { name: (*name).to_string() });
    }
    if let Some(name) = declared.difference(&placeholders).next() {
      return Err(PathParseError::UnusedPathParameter { name: (*name).to_string() });
    }

    Ok(template)
  }
}
