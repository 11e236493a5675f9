use std::sync::Arc;

use indexmap::IndexMap;

use super::{CallOutput, Component, Resource, ResourceContents, ResourceTemplate, Tool};
use crate::{error::ExecutionError, marshal::Arguments};

/// A route that produced no component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcludedRoute {
  /// `METHOD /path`.
  pub route: String,
  pub operation_id: Option<String>,
}

/// The components of one build, in route order, keyed by unique name.
#[derive(Debug, Clone, Default)]
pub struct ComponentSet {
  components: IndexMap<String, Component>,
  excluded: Vec<ExcludedRoute>,
}

impl ComponentSet {
  pub(crate) fn new(components: IndexMap<String, Component>, excluded: Vec<ExcludedRoute>) -> Self {
    Self { components, excluded }
  }

  #[must_use]
  pub fn get(&self, name: &str) -> Option<&Component> {
    self.components.get(name)
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.components.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.components.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &Component> {
    self.components.values()
  }

  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.components.keys().map(String::as_str)
  }

  pub fn tools(&self) -> impl Iterator<Item = &Arc<Tool>> {
    self.components.values().filter_map(|c| match c {
      Component::Tool(tool) => Some(tool),
      _ => None,
    })
  }

  pub fn resources(&self) -> impl Iterator<Item = &Arc<Resource>> {
    self.components.values().filter_map(|c| match c {
      Component::Resource(resource) => Some(resource),
      _ => None,
    })
  }

  pub fn resource_templates(&self) -> impl Iterator<Item = &Arc<ResourceTemplate>> {
    self.components.values().filter_map(|c| match c {
      Component::ResourceTemplate(template) => Some(template),
      _ => None,
    })
  }

  #[must_use]
  pub fn excluded_routes(&self) -> &[ExcludedRoute] {
    &self.excluded
  }

  /// Returns `false` when no component has this name.
  pub fn enable(&self, name: &str) -> bool {
    self.set_enabled(name, true)
  }

  /// Returns `false` when no component has this name.
  pub fn disable(&self, name: &str) -> bool {
    self.set_enabled(name, false)
  }

  fn set_enabled(&self, name: &str, enabled: bool) -> bool {
    self.components.get(name).map(|c| c.set_enabled(enabled)).is_some()
  }

  pub async fn call_tool(&self, name: &str, args: &Arguments) -> Result<CallOutput, ExecutionError> {
    let Some(tool) = self.components.get(name).and_then(Component::as_tool) else {
      return Err(ExecutionError::NotFound { name: name.to_string() });
    };
    tool.call(args).await
  }

  /// Exact resource URIs take precedence over templates; templates are tried
  /// in build order. Disabled components are skipped.
  pub async fn read_resource(&self, uri: &str) -> Result<Vec<ResourceContents>, ExecutionError> {
    if let Some(resource) = self.resources().find(|r| r.is_enabled() && r.uri() == uri) {
      return resource.read().await;
    }
    if let Some(template) = self.resource_templates().find(|t| t.is_enabled() && t.matches(uri)) {
      return template.read(uri).await;
    }
    Err(ExecutionError::NotFound { name: uri.to_string() })
  }
}
