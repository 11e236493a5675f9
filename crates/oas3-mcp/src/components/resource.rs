use serde_json::Value;

use super::{
  ComponentMeta, EnabledFlag, RESOURCE_SCHEME, ResourceContents, UriTemplate, binding::RouteBinding,
  content::MappedResponse,
};
use crate::{
  error::ExecutionError,
  marshal::Arguments,
  routes::{ParameterLocation, Route},
};

/// A route exposed as a fixed-URI resource.
#[derive(Debug)]
pub struct Resource {
  meta: ComponentMeta,
  uri: String,
  mime_type: Option<String>,
  binding: RouteBinding,
  enabled: EnabledFlag,
}

impl Resource {
  pub(crate) fn new(meta: ComponentMeta, mime_type: Option<String>, binding: RouteBinding) -> Self {
    Self {
      uri: format!("{RESOURCE_SCHEME}{}", meta.name),
      meta,
      mime_type,
      binding,
      enabled: EnabledFlag::default(),
    }
  }

  #[must_use]
  pub fn meta(&self) -> &ComponentMeta {
    &self.meta
  }

  #[must_use]
  pub fn uri(&self) -> &str {
    &self.uri
  }

  #[must_use]
  pub fn mime_type(&self) -> Option<&str> {
    self.mime_type.as_deref()
  }

  #[must_use]
  pub fn route(&self) -> &Route {
    self.binding.route()
  }

  #[must_use]
  pub fn is_enabled(&self) -> bool {
    self.enabled.get()
  }

  pub fn set_enabled(&self, enabled: bool) {
    self.enabled.set(enabled);
  }

  pub async fn read(&self) -> Result<Vec<ResourceContents>, ExecutionError> {
    if !self.is_enabled() {
      return Err(ExecutionError::NotFound {
        name: self.meta.name.clone(),
      });
    }
    read_route(&self.binding, &self.meta.name, &self.uri, self.mime_type.as_deref(), &Arguments::new()).await
  }
}

/// A route exposed as a parameterized resource.
#[derive(Debug)]
pub struct ResourceTemplate {
  meta: ComponentMeta,
  uri_template: UriTemplate,
  mime_type: Option<String>,
  binding: RouteBinding,
  enabled: EnabledFlag,
}

impl ResourceTemplate {
  pub(crate) fn new(
    meta: ComponentMeta,
    uri_template: UriTemplate,
    mime_type: Option<String>,
    binding: RouteBinding,
  ) -> Self {
    Self {
      meta,
      uri_template,
      mime_type,
      binding,
      enabled: EnabledFlag::default(),
    }
  }

  #[must_use]
  pub fn meta(&self) -> &ComponentMeta {
    &self.meta
  }

  #[must_use]
  pub fn uri_template(&self) -> &UriTemplate {
    &self.uri_template
  }

  #[must_use]
  pub fn mime_type(&self) -> Option<&str> {
    self.mime_type.as_deref()
  }

  #[must_use]
  pub fn route(&self) -> &Route {
    self.binding.route()
  }

  #[must_use]
  pub fn is_enabled(&self) -> bool {
    self.enabled.get()
  }

  pub fn set_enabled(&self, enabled: bool) {
    self.enabled.set(enabled);
  }

  #[must_use]
  pub fn matches(&self, uri: &str) -> bool {
    self.uri_template.match_uri(uri).is_some()
  }

  /// Reads the resource at `uri`, feeding the captured values to the route's
  /// path parameters.
  pub async fn read(&self, uri: &str) -> Result<Vec<ResourceContents>, ExecutionError> {
    if !self.is_enabled() {
      return Err(ExecutionError::NotFound {
        name: self.meta.name.clone(),
      });
    }

    let captured = self
      .uri_template
      .match_uri(uri)
      .ok_or_else(|| ExecutionError::UriMismatch {
        uri: uri.to_string(),
        template: self.uri_template.to_string(),
      })?;

    let route = self.binding.route();
    let layout = self.binding.marshaler().layout();
    let args = captured
      .into_iter()
      .map(|(name, value)| {
        let argument = route
          .parameters
          .iter()
          .position(|p| p.location == ParameterLocation::Path && p.name == name)
          .and_then(|index| layout.argument_for(index))
          .map_or(name.clone(), str::to_string);
        (argument, Value::String(value))
      })
      .collect::<Arguments>();
    read_route(&self.binding, &self.meta.name, uri, self.mime_type.as_deref(), &args).await
  }
}

async fn read_route(
  binding: &RouteBinding,
  component: &str,
  uri: &str,
  mime_type: Option<&str>,
  args: &Arguments,
) -> Result<Vec<ResourceContents>, ExecutionError> {
  let response = binding.dispatch(component, args).await?;
  let declared = binding.route().response.as_ref().and_then(|r| r.content_type.as_deref());
  Ok(MappedResponse::from_response(&response, declared).into_resource_contents(uri, mime_type))
}
