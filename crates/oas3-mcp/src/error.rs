use std::path::PathBuf;

use http::StatusCode;
use itertools::Itertools;
use oas3_mcp_support::TransportError;
use strum::Display;

use crate::{components::UriTemplateError, routes::PathParseError};

/// Build-time misconfiguration. Always fatal to the build.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
  #[error("failed to parse route {route}: {source:#}")]
  InvalidRoute {
    route: String,
    #[source]
    source: anyhow::Error,
  },
  #[error("invalid OpenAPI document: {0}")]
  InvalidDocument(#[from] serde_json::Error),
  #[error("route {route} is not matched by any route map")]
  UnmatchedRoute { route: String },
  #[error("conflicting name overrides for operation '{operation_id}': '{first}' and '{second}'")]
  DuplicateNameOverride {
    operation_id: String,
    first: String,
    second: String,
  },
  #[error("invalid route map pattern '{pattern}': {source}")]
  InvalidPattern {
    pattern: String,
    #[source]
    source: regex::Error,
  },
  #[error("invalid route map methods: {0}")]
  InvalidMethods(String),
  #[error("invalid configuration at '{path}': {message}")]
  InvalidConfig { path: String, message: String },
  #[error("failed to read configuration from {}: {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

/// Why a single route could not become a component.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteIssue {
  #[error("invalid path template: {0}")]
  InvalidPath(#[from] PathParseError),
  #[error("invalid URI template: {0}")]
  InvalidUriTemplate(#[from] UriTemplateError),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{route}: {issue}")]
pub struct RouteBuildError {
  pub route: String,
  pub issue: RouteIssue,
}

impl RouteBuildError {
  #[must_use]
  pub fn new(route: impl Into<String>, issue: impl Into<RouteIssue>) -> Self {
    Self {
      route: route.into(),
      issue: issue.into(),
    }
  }
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
  #[error(transparent)]
  Configuration(#[from] ConfigurationError),
  #[error("{} route(s) failed to build: {}", .0.len(), .0.iter().join("; "))]
  Routes(Vec<RouteBuildError>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ParameterScope {
  #[strum(to_string = "path parameters")]
  Path,
  #[strum(to_string = "parameters")]
  Any,
}

/// Call-time argument problems. Caller faults, never retried.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MarshalError {
  #[error("missing required {scope}: {}", .names.join(", "))]
  MissingRequiredParameter { scope: ParameterScope, names: Vec<String> },
  #[error("cannot serialize parameter '{name}': {reason}")]
  ParameterSerialization { name: String, reason: String },
}

impl MarshalError {
  pub(crate) fn serialization(name: &str, reason: impl Into<String>) -> Self {
    Self::ParameterSerialization {
      name: name.to_string(),
      reason: reason.into(),
    }
  }

  /// Argument names reported missing, empty for other failures.
  #[must_use]
  pub fn missing_names(&self) -> &[String] {
    match self {
      Self::MissingRequiredParameter { names, .. } => names,
      Self::ParameterSerialization { .. } => &[],
    }
  }
}

/// Failure of a single component invocation.
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
  /// Unknown or disabled component; both read the same to callers.
  #[error("unknown component '{name}'")]
  NotFound { name: String },
  #[error("invalid arguments for '{component}': {source}")]
  InvalidArguments {
    component: String,
    #[source]
    source: MarshalError,
  },
  #[error("'{component}' received {status} from upstream: {body}")]
  Upstream {
    component: String,
    status: StatusCode,
    body: String,
  },
  #[error("'{component}' request failed: {source}")]
  Transport {
    component: String,
    #[source]
    source: TransportError,
  },
  #[error("URI '{uri}' does not match template '{template}'")]
  UriMismatch { uri: String, template: String },
}

impl ExecutionError {
  #[must_use]
  pub fn status(&self) -> Option<StatusCode> {
    match self {
      Self::Upstream { status, .. } => Some(*status),
      _ => None,
    }
  }

  #[must_use]
  pub fn marshal_error(&self) -> Option<&MarshalError> {
    match self {
      Self::InvalidArguments { source, .. } => Some(source),
      _ => None,
    }
  }
}
