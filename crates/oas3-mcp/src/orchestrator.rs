use std::{collections::BTreeSet, sync::Arc};

use indexmap::IndexMap;
use oas3_mcp_support::RequestExecutor;

use crate::{
  components::{Component, ComponentFactory, ComponentSet, ExcludedRoute},
  error::{BuildError, ConfigurationError, RouteBuildError},
  mapping::{ComponentFn, ComponentType, RouteMap, RouteMapFn, RouteMatcher, apply_route_map_fn},
  marshal::ArgumentLayout,
  naming::{NameOverrides, NameRegistry, NameResolver},
  routes::{Route, RouteParser},
  stats::{BuildStats, BuildWarning},
};

/// Everything a build needs besides the routes and the executor.
#[derive(Clone, bon::Builder)]
pub struct BuildConfig {
  /// Evaluated in order, before the defaults.
  #[builder(default)]
  pub route_maps: Vec<RouteMap>,
  #[builder(default)]
  pub global_tags: BTreeSet<String>,
  #[builder(default)]
  pub name_overrides: NameOverrides,
  pub route_map_fn: Option<RouteMapFn>,
  pub component_fn: Option<ComponentFn>,
  /// Append the catch-all tool map after `route_maps`.
  #[builder(default = true)]
  pub include_default_route_maps: bool,
}

impl Default for BuildConfig {
  fn default() -> Self {
    Self::builder().build()
  }
}

impl std::fmt::Debug for BuildConfig {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("BuildConfig")
      .field("route_maps", &self.route_maps)
      .field("global_tags", &self.global_tags)
      .field("name_overrides", &self.name_overrides)
      .field("route_map_fn", &self.route_map_fn.is_some())
      .field("component_fn", &self.component_fn.is_some())
      .field("include_default_route_maps", &self.include_default_route_maps)
      .finish()
  }
}

/// Turns routes into a [`ComponentSet`].
///
/// The pipeline per route, in order: match against the effective route maps,
/// apply the override hook, resolve a unique name, create the component and
/// apply the customization hook. Routes are processed sequentially, so names
/// and collision suffixes depend only on route order.
pub struct Orchestrator {
  routes: Vec<Arc<Route>>,
  executor: Arc<dyn RequestExecutor>,
  config: BuildConfig,
  parse_warnings: Vec<BuildWarning>,
}

impl std::fmt::Debug for Orchestrator {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Orchestrator")
      .field("routes", &self.routes.len())
      .field("config", &self.config)
      .finish_non_exhaustive()
  }
}

impl Orchestrator {
  #[must_use]
  pub fn new(routes: impl IntoIterator<Item = Route>, executor: Arc<dyn RequestExecutor>, config: BuildConfig) -> Self {
    Self {
      routes: routes.into_iter().map(Arc::new).collect(),
      executor,
      config,
      parse_warnings: vec![],
    }
  }

  /// Parses every operation of `spec` into routes first.
  ///
  /// # Errors
  ///
  /// Returns [`ConfigurationError::InvalidRoute`] for the first operation
  /// that cannot be parsed.
  pub fn from_spec(
    spec: &oas3::Spec,
    executor: Arc<dyn RequestExecutor>,
    config: BuildConfig,
  ) -> Result<Self, ConfigurationError> {
    Self::from_parser(RouteParser::new(spec), executor, config)
  }

  /// Parses a JSON OpenAPI document. Unlike [`Orchestrator::from_spec`],
  /// request and response media types keep the order they are declared in.
  ///
  /// # Errors
  ///
  /// Returns [`ConfigurationError::InvalidDocument`] when `json` is not a
  /// valid OpenAPI document, otherwise as [`Orchestrator::from_spec`].
  pub fn from_json(
    json: &str,
    executor: Arc<dyn RequestExecutor>,
    config: BuildConfig,
  ) -> Result<Self, ConfigurationError> {
    let document = serde_json::from_str::<serde_json::Value>(json)?;
    let spec = serde_json::from_value::<oas3::Spec>(document.clone())?;
    Self::from_parser(RouteParser::with_document(&spec, &document), executor, config)
  }

  fn from_parser(
    parser: RouteParser<'_>,
    executor: Arc<dyn RequestExecutor>,
    config: BuildConfig,
  ) -> Result<Self, ConfigurationError> {
    let parsed = parser.parse()?;
    for warning in &parsed.warnings {
      tracing::warn!("{warning}");
    }
    let mut orchestrator = Self::new(parsed.routes, executor, config);
    orchestrator.parse_warnings = parsed.warnings;
    Ok(orchestrator)
  }

  #[must_use]
  pub fn routes(&self) -> &[Arc<Route>] {
    &self.routes
  }

  #[must_use]
  pub fn config(&self) -> &BuildConfig {
    &self.config
  }

  /// Runs the build. Each call starts from a fresh name registry.
  ///
  /// # Errors
  ///
  /// A route matched by no map aborts immediately with
  /// [`ConfigurationError::UnmatchedRoute`]. Routes that fail to become
  /// components are collected and reported together as
  /// [`BuildError::Routes`].
  pub fn build(&self) -> Result<(ComponentSet, BuildStats), BuildError> {
    let matcher = RouteMatcher::new(self.config.route_maps.clone(), self.config.include_default_route_maps);
    let resolver = NameResolver::new(&self.config.name_overrides);
    let factory = ComponentFactory::new(
      Arc::clone(&self.executor),
      &self.config.global_tags,
      self.config.component_fn.as_ref(),
    );

    let mut registry = NameRegistry::new();
    let mut stats = BuildStats::default();
    stats.record_warnings(self.parse_warnings.iter().cloned());

    let mut components = IndexMap::<String, Component>::new();
    let mut excluded = vec![];
    let mut failures = vec![];

    for route in &self.routes {
      stats.record_route();
      let route_key = route.display_key();

      let Some(matched) = matcher.match_route(route) else {
        return Err(ConfigurationError::UnmatchedRoute { route: route_key }.into());
      };
      let component_type = apply_route_map_fn(self.config.route_map_fn.as_ref(), route, matched.component_type);
      stats.record_override(matched.component_type, component_type);

      tracing::debug!(
        route = %route_key,
        map_index = matched.index,
        from_defaults = matched.from_defaults,
        provisional = %matched.component_type,
        component_type = %component_type,
        "matched route"
      );

      if component_type == ComponentType::Exclude {
        stats.record_component(ComponentType::Exclude);
        excluded.push(ExcludedRoute {
          route: route_key,
          operation_id: route.operation_id.clone(),
        });
        continue;
      }

      let resolved = resolver.resolve(route, &mut registry);
      if resolved.collided() {
        tracing::debug!(route = %route_key, requested = %resolved.requested, assigned = %resolved.name, "name collision");
        stats.record_collision();
        stats.record_warning(BuildWarning::NameCollision {
          route: route_key.clone(),
          requested: resolved.requested.clone(),
          assigned: resolved.name.clone(),
        });
      }

      match factory.create(
        Arc::clone(route),
        component_type,
        resolved.name.clone(),
        &matched.route_map.extra_tags,
      ) {
        Ok(Some(component)) => {
          if component_type == ComponentType::Tool {
            let layout = ArgumentLayout::for_route(route);
            stats.record_warnings(layout.renamed(route).map(|(name, renamed)| BuildWarning::ArgumentRenamed {
              route: route_key.clone(),
              name: name.to_string(),
              renamed: renamed.to_string(),
            }));
          }
          stats.record_component(component_type);
          components.insert(resolved.name, component);
        }
        Ok(None) => {}
        Err(issue) => {
          tracing::warn!(route = %route_key, error = %issue, "route failed to build");
          failures.push(RouteBuildError::new(route_key, issue));
        }
      }
    }

    if !failures.is_empty() {
      return Err(BuildError::Routes(failures));
    }

    tracing::info!(
      routes = stats.routes_processed,
      tools = stats.tools_created,
      resources = stats.resources_created,
      templates = stats.templates_created,
      excluded = stats.routes_excluded,
      warnings = stats.warnings.len(),
      "built component set"
    );

    Ok((ComponentSet::new(components, excluded), stats))
  }
}
