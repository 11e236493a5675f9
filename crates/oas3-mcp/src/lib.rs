#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
//! Turns OpenAPI operations into named, invocable components.
//!
//! A build takes a list of [`Route`]s (usually parsed from an [`oas3::Spec`]),
//! classifies each one through ordered [`RouteMap`]s as a tool, resource,
//! resource template or exclusion, names it, and binds it to a
//! [`RequestExecutor`]. Calling a component marshals its arguments into
//! exactly one HTTP request and maps the response to content.
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use oas3_mcp::{BuildConfig, ComponentType, Orchestrator, RouteMap};
//! # async fn run(spec: oas3::Spec, executor: Arc<dyn oas3_mcp::RequestExecutor>) -> anyhow::Result<()> {
//! let config = BuildConfig::builder()
//!   .route_maps(vec![RouteMap::with_pattern(ComponentType::ResourceTemplate, r"\{")?.methods(["GET"])])
//!   .build();
//! let (components, stats) = Orchestrator::from_spec(&spec, executor, config)?.build()?;
//! println!("{} components, {} excluded", stats.components_created(), stats.routes_excluded);
//!
//! let args = serde_json::json!({ "petId": 1 });
//! if let Some(args) = args.as_object() {
//!   let output = components.call_tool("getpetbyid", args).await?;
//!   println!("{:?}", output.structured_content);
//! }
//! # Ok(())
//! # }
//! ```

pub mod components;
pub mod config;
pub mod error;
pub mod mapping;
pub mod marshal;
pub mod media;
pub mod naming;
pub mod orchestrator;
pub mod routes;
pub mod stats;


pub use components::{
  Annotations, CallOutput, Component, ComponentDraft, ComponentMeta, ComponentSet, Content, Resource,
  ResourceContents, ResourceTemplate, Tool, UriTemplate,
};
pub use config::BridgeConfig;
pub use error::{BuildError, ConfigurationError, ExecutionError, MarshalError, RouteBuildError};
pub use mapping::{ComponentFn, ComponentType, MethodFilter, RouteMap, RouteMapFn, default_route_maps};
pub use marshal::{Arguments, RequestMarshaler};
pub use naming::{MAX_NAME_LENGTH, NameOverrides};
#[cfg(feature = "reqwest")]
pub use oas3_mcp_support::ReqwestExecutor;
pub use oas3_mcp_support::{HttpRequest, HttpResponse, RequestBody, RequestExecutor, TransportError};
pub use orchestrator::{BuildConfig, Orchestrator};
pub use routes::{ParameterInfo, ParameterLocation, ParameterStyle, RequestBodyInfo, ResponseInfo, Route, RouteParser};
pub use stats::{BuildStats, BuildWarning};
