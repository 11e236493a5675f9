//! Invocable components built from routes.
//!
//! Every component is immutable after the build except for its enabled
//! flag. The customization hook sees a [`ComponentDraft`] before the
//! component is frozen; name, schemas and URIs are fixed by then.

mod binding;
mod content;
mod factory;
mod resource;
mod schema;
mod set;
mod tool;
mod uri;


use std::{
  collections::BTreeSet,
  sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
  },
};

use http::Method;
use serde::{Deserialize, Serialize};

pub use content::{CallOutput, Content, RESULT_PROPERTY, ResourceBody, ResourceContents, WRAP_RESULT_KEY};
pub use factory::ComponentFactory;
pub use resource::{Resource, ResourceTemplate};
pub use schema::{input_schema, output_schema, wraps_result};
pub use set::{ComponentSet, ExcludedRoute};
pub use tool::Tool;
pub use uri::{RESOURCE_SCHEME, UriTemplate, UriTemplateError};

use crate::mapping::ComponentType;

/// Behavior hints derived from the HTTP method.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
#[serde(rename_all = "camelCase")]
pub struct Annotations {
  #[builder(into)]
  pub title: Option<String>,
  pub read_only_hint: Option<bool>,
  pub destructive_hint: Option<bool>,
  pub idempotent_hint: Option<bool>,
  pub open_world_hint: Option<bool>,
}

impl Annotations {
  /// `GET`/`HEAD`/`OPTIONS` are read-only; `PUT` and `DELETE` are idempotent;
  /// `DELETE` is destructive. Every route talks to an external system.
  #[must_use]
  pub fn for_method(method: &Method) -> Self {
    let read_only = matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS);
    Self {
      title: None,
      read_only_hint: Some(read_only),
      destructive_hint: (!read_only).then_some(*method == Method::DELETE),
      idempotent_hint: Some(read_only || matches!(*method, Method::PUT | Method::DELETE)),
      open_world_hint: Some(true),
    }
  }
}

/// Metadata shared by every component kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentMeta {
  pub name: String,
  pub description: String,
  pub tags: BTreeSet<String>,
  pub annotations: Annotations,
}

/// Mutable view of a component handed to the customization hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentDraft {
  name: String,
  component_type: ComponentType,
  pub description: String,
  pub tags: BTreeSet<String>,
  pub annotations: Annotations,
  /// Media type reported for resources. Ignored for tools.
  pub mime_type: Option<String>,
}

impl ComponentDraft {
  pub(crate) fn new(name: String, component_type: ComponentType, description: String, tags: BTreeSet<String>) -> Self {
    Self {
      name,
      component_type,
      description,
      tags,
      annotations: Annotations::default(),
      mime_type: None,
    }
  }

  #[must_use]
  pub fn name(&self) -> &str {
    &self.name
  }

  #[must_use]
  pub fn component_type(&self) -> ComponentType {
    self.component_type
  }

  pub(crate) fn freeze(self) -> (ComponentMeta, Option<String>) {
    (
      ComponentMeta {
        name: self.name,
        description: self.description,
        tags: self.tags,
        annotations: self.annotations,
      },
      self.mime_type,
    )
  }
}

/// Runtime on/off switch. A disabled component refuses calls as if it did
/// not exist.
#[derive(Debug)]
pub(crate) struct EnabledFlag(AtomicBool);

impl Default for EnabledFlag {
  fn default() -> Self {
    Self(AtomicBool::new(true))
  }
}

impl EnabledFlag {
  pub(crate) fn get(&self) -> bool {
    self.0.load(Ordering::Acquire)
  }

  pub(crate) fn set(&self, enabled: bool) {
    self.0.store(enabled, Ordering::Release);
  }
}

/// A built component of any kind.
#[derive(Debug, Clone)]
pub enum Component {
  Tool(Arc<Tool>),
  Resource(Arc<Resource>),
  ResourceTemplate(Arc<ResourceTemplate>),
}

impl Component {
  #[must_use]
  pub fn meta(&self) -> &ComponentMeta {
    match self {
      Self::Tool(tool) => tool.meta(),
      Self::Resource(resource) => resource.meta(),
      Self::ResourceTemplate(template) => template.meta(),
    }
  }

  #[must_use]
  pub fn name(&self) -> &str {
    &self.meta().name
  }

  #[must_use]
  pub fn component_type(&self) -> ComponentType {
    match self {
      Self::Tool(_) => ComponentType::Tool,
      Self::Resource(_) => ComponentType::Resource,
      Self::ResourceTemplate(_) => ComponentType::ResourceTemplate,
    }
  }

  #[must_use]
  pub fn is_enabled(&self) -> bool {
    match self {
      Self::Tool(tool) => tool.is_enabled(),
      Self::Resource(resource) => resource.is_enabled(),
      Self::ResourceTemplate(template) => template.is_enabled(),
    }
  }

  pub fn set_enabled(&self, enabled: bool) {
    match self {
      Self::Tool(tool) => tool.set_enabled(enabled),
      Self::Resource(resource) => resource.set_enabled(enabled),
      Self::ResourceTemplate(template) => template.set_enabled(enabled),
    }
  }

  #[must_use]
  pub fn as_tool(&self) -> Option<&Arc<Tool>> {
    match self {
      Self::Tool(tool) => Some(tool),
      _ => None,
    }
  }
}
