//! JSON build configuration.
//!
//! ```json
//! {
//!   "route_maps": [
//!     { "methods": ["GET"], "pattern": "\\{", "type": "RESOURCE_TEMPLATE" },
//!     { "methods": "*", "pattern": "^/admin", "type": "EXCLUDE" }
//!   ],
//!   "global_tags": ["petstore"],
//!   "name_overrides": [{ "operation_id": "getPetById", "name": "get_pet" }],
//!   "include_default_route_maps": true
//! }
//! ```
//!
//! Hooks cannot be expressed here; set them on the resulting [`BuildConfig`].

use std::{collections::BTreeSet, path::Path};

use http::Method;
use serde::{Deserialize, Serialize};

use crate::{
  error::ConfigurationError,
  mapping::{ComponentType, MethodFilter, RouteMap},
  naming::NameOverrides,
  orchestrator::BuildConfig,
};

const ALL_METHODS: &str = "*";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BridgeConfig {
  #[serde(default)]
  pub route_maps: Vec<RouteMapConfig>,
  #[serde(default)]
  pub global_tags: BTreeSet<String>,
  #[serde(default)]
  pub name_overrides: Vec<NameOverrideEntry>,
  #[serde(default = "default_include_defaults")]
  pub include_default_route_maps: bool,
}

impl Default for BridgeConfig {
  fn default() -> Self {
    Self {
      route_maps: vec![],
      global_tags: BTreeSet::new(),
      name_overrides: vec![],
      include_default_route_maps: true,
    }
  }
}

const fn default_include_defaults() -> bool {
  true
}

fn default_pattern() -> String {
  ".*".to_string()
}

/// `"*"` or a list of method names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MethodsConfig {
  Wildcard(String),
  List(Vec<String>),
}

impl Default for MethodsConfig {
  fn default() -> Self {
    Self::Wildcard(ALL_METHODS.to_string())
  }
}

impl MethodsConfig {
  fn to_filter(&self) -> Result<MethodFilter, ConfigurationError> {
    match self {
      Self::Wildcard(value) if value == ALL_METHODS => Ok(MethodFilter::All),
      Self::Wildcard(value) => Err(ConfigurationError::InvalidMethods(format!(
        "expected \"{ALL_METHODS}\" or a list of methods, got \"{value}\""
      ))),
      Self::List(methods) => {
        for method in methods {
          Method::from_bytes(method.trim().to_ascii_uppercase().as_bytes())
            .map_err(|_| ConfigurationError::InvalidMethods(format!("invalid method \"{method}\"")))?;
        }
        Ok(MethodFilter::only(methods))
      }
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteMapConfig {
  #[serde(default)]
  pub methods: MethodsConfig,
  #[serde(default = "default_pattern")]
  pub pattern: String,
  #[serde(default)]
  pub tags: BTreeSet<String>,
  #[serde(rename = "type", alias = "mcp_type")]
  pub component_type: ComponentType,
  #[serde(default, alias = "extraTags")]
  pub extra_tags: BTreeSet<String>,
}

impl RouteMapConfig {
  pub fn to_route_map(&self) -> Result<RouteMap, ConfigurationError> {
    let mut map = RouteMap::with_pattern(self.component_type, &self.pattern)?;
    map.methods = self.methods.to_filter()?;
    map.tags.clone_from(&self.tags);
    map.extra_tags.clone_from(&self.extra_tags);
    Ok(map)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NameOverrideEntry {
  pub operation_id: String,
  pub name: String,
}

impl BridgeConfig {
  /// Parses JSON, reporting the path of the offending field on failure.
  pub fn from_json_str(json: &str) -> Result<Self, ConfigurationError> {
    let mut de = serde_json::Deserializer::from_str(json);
    serde_path_to_error::deserialize(&mut de).map_err(|err| ConfigurationError::InvalidConfig {
      path: err.path().to_string(),
      message: err.into_inner().to_string(),
    })
  }

  pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
    let path = path.as_ref();
    let json = tokio::fs::read_to_string(path)
      .await
      .map_err(|source| ConfigurationError::Io {
        path: path.to_path_buf(),
        source,
      })?;
    Self::from_json_str(&json)
  }

  /// Compiles patterns and validates overrides. The result has no hooks.
  pub fn into_build_config(self) -> Result<BuildConfig, ConfigurationError> {
    let route_maps = self
      .route_maps
      .iter()
      .map(RouteMapConfig::to_route_map)
      .collect::<Result<Vec<_>, _>>()?;
    let name_overrides = NameOverrides::try_from_pairs(self.name_overrides.into_iter().map(|e| (e.operation_id, e.name)))?;

    Ok(
      BuildConfig::builder()
        .route_maps(route_maps)
        .global_tags(self.global_tags)
        .name_overrides(name_overrides)
        .include_default_route_maps(self.include_default_route_maps)
        .build(),
    )
  }
}
