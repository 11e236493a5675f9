use serde_json::Value;

use super::{CallOutput, ComponentMeta, EnabledFlag, binding::RouteBinding, content::MappedResponse, wraps_result};
use crate::{error::ExecutionError, marshal::Arguments, routes::Route};

/// A route exposed as a callable tool.
#[derive(Debug)]
pub struct Tool {
  meta: ComponentMeta,
  input_schema: Value,
  output_schema: Option<Value>,
  binding: RouteBinding,
  enabled: EnabledFlag,
}

impl Tool {
  pub(crate) fn new(
    meta: ComponentMeta,
    input_schema: Value,
    output_schema: Option<Value>,
    binding: RouteBinding,
  ) -> Self {
    Self {
      meta,
      input_schema,
      output_schema,
      binding,
      enabled: EnabledFlag::default(),
    }
  }

  #[must_use]
  pub fn meta(&self) -> &ComponentMeta {
    &self.meta
  }

  #[must_use]
  pub fn name(&self) -> &str {
    &self.meta.name
  }

  #[must_use]
  pub fn input_schema(&self) -> &Value {
    &self.input_schema
  }

  #[must_use]
  pub fn output_schema(&self) -> Option<&Value> {
    self.output_schema.as_ref()
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

  /// Checks required arguments without sending anything.
  pub fn validate(&self, args: &Arguments) -> Result<(), ExecutionError> {
    self
      .binding
      .marshaler()
      .validate(args)
      .map_err(|source| ExecutionError::InvalidArguments {
        component: self.meta.name.clone(),
        source,
      })
  }

  pub async fn call(&self, args: &Arguments) -> Result<CallOutput, ExecutionError> {
    if !self.is_enabled() {
      return Err(ExecutionError::NotFound {
        name: self.meta.name.clone(),
      });
    }

    let response = self.binding.dispatch(&self.meta.name, args).await?;
    let declared = self.route().response.as_ref().and_then(|r| r.content_type.as_deref());
    Ok(MappedResponse::from_response(&response, declared).into_call_output(wraps_result(self.output_schema.as_ref())))
  }
}
