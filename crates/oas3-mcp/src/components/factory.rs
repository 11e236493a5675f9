use std::{collections::BTreeSet, sync::Arc};

use oas3_mcp_support::RequestExecutor;

use super::{
  Annotations, Component, ComponentDraft, Resource, ResourceTemplate, Tool, UriTemplate, binding::RouteBinding,
  input_schema, output_schema,
};
use crate::{
  error::RouteIssue,
  mapping::{ComponentFn, ComponentType},
  marshal::RequestMarshaler,
  routes::Route,
};

/// Binds routes to components for one build.
pub struct ComponentFactory<'a> {
  executor: Arc<dyn RequestExecutor>,
  global_tags: &'a BTreeSet<String>,
  component_fn: Option<&'a ComponentFn>,
}

impl std::fmt::Debug for ComponentFactory<'_> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ComponentFactory")
      .field("global_tags", &self.global_tags)
      .field("component_fn", &self.component_fn.is_some())
      .finish_non_exhaustive()
  }
}

impl<'a> ComponentFactory<'a> {
  #[must_use]
  pub fn new(
    executor: Arc<dyn RequestExecutor>,
    global_tags: &'a BTreeSet<String>,
    component_fn: Option<&'a ComponentFn>,
  ) -> Self {
    Self {
      executor,
      global_tags,
      component_fn,
    }
  }

  /// Creates the component for `route`. Returns `None` for
  /// [`ComponentType::Exclude`].
  pub fn create(
    &self,
    route: Arc<Route>,
    component_type: ComponentType,
    name: String,
    extra_tags: &BTreeSet<String>,
  ) -> Result<Option<Component>, RouteIssue> {
    if component_type == ComponentType::Exclude {
      return Ok(None);
    }

    let marshaler = RequestMarshaler::new(Arc::clone(&route))?;
    let uri_template = match component_type {
      ComponentType::ResourceTemplate => Some(UriTemplate::for_component(
        &name,
        route.path_parameters().map(|p| p.name.as_str()),
      )?),
      _ => None,
    };

    let tags = self
      .global_tags
      .iter()
      .chain(extra_tags)
      .chain(&route.tags)
      .cloned()
      .collect();
    let mut draft = ComponentDraft::new(name, component_type, describe(&route), tags);
    draft.annotations = Annotations {
      title: route.summary.clone(),
      ..Annotations::for_method(&route.method)
    };
    if component_type != ComponentType::Tool {
      draft.mime_type = route.response.as_ref().and_then(|r| r.content_type.clone());
    }

    if let Some(hook) = self.component_fn {
      hook(&route, &mut draft);
    }
    let (meta, mime_type) = draft.freeze();

    let binding = RouteBinding::new(marshaler, Arc::clone(&self.executor));
    let component = match (component_type, uri_template) {
      (ComponentType::ResourceTemplate, Some(uri_template)) => {
        Component::ResourceTemplate(Arc::new(ResourceTemplate::new(meta, uri_template, mime_type, binding)))
      }
      (ComponentType::Resource, _) => Component::Resource(Arc::new(Resource::new(meta, mime_type, binding))),
      _ => {
        let input_schema = input_schema(&route, binding.marshaler().layout());
        Component::Tool(Arc::new(Tool::new(meta, input_schema, output_schema(&route), binding)))
      }
    };

    Ok(Some(component))
  }
}

/// Summary and description joined by a blank line, whichever exist, else
/// `METHOD /path`.
pub(crate) fn describe(route: &Route) -> String {
  let parts = [route.summary.as_deref(), route.description.as_deref()]
    .into_iter()
    .flatten()
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .collect::<Vec<_>>();

  if parts.is_empty() {
    route.display_key()
  } else {
    parts.join("\n\n")
  }
}
