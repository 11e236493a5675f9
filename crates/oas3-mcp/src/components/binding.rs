use std::sync::Arc;

use oas3_mcp_support::{HttpResponse, RequestExecutor};

use crate::{
  error::ExecutionError,
  marshal::{Arguments, RequestMarshaler},
  routes::Route,
};

/// A route bound to its marshaler and the executor that sends its requests.
#[derive(Clone)]
pub(crate) struct RouteBinding {
  marshaler: RequestMarshaler,
  executor: Arc<dyn RequestExecutor>,
}

impl std::fmt::Debug for RouteBinding {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("RouteBinding")
      .field("route", &self.marshaler.route().display_key())
      .finish_non_exhaustive()
  }
}

impl RouteBinding {
  pub(crate) fn new(marshaler: RequestMarshaler, executor: Arc<dyn RequestExecutor>) -> Self {
    Self { marshaler, executor }
  }

  pub(crate) fn route(&self) -> &Route {
    self.marshaler.route()
  }

  pub(crate) fn marshaler(&self) -> &RequestMarshaler {
    &self.marshaler
  }

  /// Sends exactly one request. Non-2xx responses become
  /// [`ExecutionError::Upstream`].
  pub(crate) async fn dispatch(&self, component: &str, args: &Arguments) -> Result<HttpResponse, ExecutionError> {
    let request = self
      .marshaler
      .marshal(args)
      .map_err(|source| ExecutionError::InvalidArguments {
        component: component.to_string(),
        source,
      })?;

    tracing::debug!(
      component,
      method = %request.method,
      url = %request.path_and_query(),
      "dispatching request"
    );

    let response = self
      .executor
      .execute(request)
      .await
      .map_err(|source| {
        tracing::warn!(component, error = %source, "request failed");
        ExecutionError::Transport {
          component: component.to_string(),
          source,
        }
      })?;

    if !response.is_success() {
      tracing::warn!(component, status = %response.status, "upstream returned an error status");
      return Err(ExecutionError::Upstream {
        component: component.to_string(),
        status: response.status,
        body: response.text_lossy(),
      });
    }

    tracing::debug!(component, status = %response.status, bytes = response.body.len(), "request completed");
    Ok(response)
  }
}
