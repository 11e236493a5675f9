//! Ordered route-to-component rules.
//!
//! A [`RouteMap`] is a plain predicate over method, path and tags bound to a
//! [`ComponentType`]. Maps are evaluated in list order and the first full
//! match wins; custom maps always come before the defaults.

mod hooks;
mod matcher;


use std::{collections::BTreeSet, sync::LazyLock};

use http::Method;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

pub use hooks::{ComponentFn, RouteMapFn, apply_route_map_fn};
pub use matcher::{RouteMatch, RouteMatcher, match_route};

use crate::{error::ConfigurationError, routes::Route};

static MATCH_ALL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(".*").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComponentType {
  #[serde(alias = "tool")]
  Tool,
  #[serde(alias = "resource")]
  Resource,
  #[serde(alias = "resource_template")]
  ResourceTemplate,
  #[serde(alias = "exclude")]
  Exclude,
}

/// Which HTTP methods a map applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MethodFilter {
  #[default]
  All,
  /// Uppercased method names.
  Only(BTreeSet<String>),
}

impl MethodFilter {
  pub fn only<I, S>(methods: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    Self::Only(
      methods
        .into_iter()
        .map(|m| m.as_ref().trim().to_ascii_uppercase())
        .collect(),
    )
  }

  #[must_use]
  pub fn matches(&self, method: &Method) -> bool {
    match self {
      Self::All => true,
      Self::Only(methods) => methods.contains(method.as_str()),
    }
  }
}

/// One routing rule. Immutable once a build starts.
#[derive(Debug, Clone, bon::Builder)]
pub struct RouteMap {
  #[builder(default)]
  pub methods: MethodFilter,
  /// Searched anywhere in the path; anchor with `^`/`$` for a full match.
  #[builder(default = MATCH_ALL_RE.clone())]
  pub pattern: Regex,
  /// Required route tags. Empty matches every route.
  #[builder(default)]
  pub tags: BTreeSet<String>,
  pub component_type: ComponentType,
  /// Tags added to components created through this map.
  #[builder(default)]
  pub extra_tags: BTreeSet<String>,
}

impl RouteMap {
  /// A map matching every method, path and tag set.
  #[must_use]
  pub fn catch_all(component_type: ComponentType) -> Self {
    Self::builder().component_type(component_type).build()
  }

  /// Compiles `pattern` into a map.
  pub fn with_pattern(component_type: ComponentType, pattern: &str) -> Result<Self, ConfigurationError> {
    let pattern = Regex::new(pattern).map_err(|source| ConfigurationError::InvalidPattern {
      pattern: pattern.to_string(),
      source,
    })?;
    Ok(Self::builder().component_type(component_type).pattern(pattern).build())
  }

  #[must_use]
  pub fn methods<I, S>(mut self, methods: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    self.methods = MethodFilter::only(methods);
    self
  }

  #[must_use]
  pub fn tags<I, S>(mut self, tags: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.tags = tags.into_iter().map(Into::into).collect();
    self
  }

  #[must_use]
  pub fn extra_tags<I, S>(mut self, tags: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.extra_tags = tags.into_iter().map(Into::into).collect();
    self
  }

  /// Method, pattern and tag predicates all hold for `route`.
  #[must_use]
  pub fn matches(&self, route: &Route) -> bool {
    self.methods.matches(&route.method) && self.pattern.is_match(&route.path) && self.tags.is_subset(&route.tags)
  }

  #[must_use]
  pub fn is_catch_all(&self) -> bool {
    self.methods == MethodFilter::All && self.tags.is_empty() && self.pattern.is_match("")
  }
}

/// The rules appended after custom maps: every route becomes a tool.
#[must_use]
pub fn default_route_maps() -> Vec<RouteMap> {
  vec![RouteMap::catch_all(ComponentType::Tool)]
}
