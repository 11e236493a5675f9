use std::collections::{BTreeMap, BTreeSet, HashSet};

use anyhow::Context as _;
use http::Method;
use itertools::Itertools;
use oas3::{
  Spec,
  spec::{ObjectOrReference, ObjectSchema, Operation, Parameter},
};
use serde_json::{Map, Value};

use super::{
  ParameterInfo, ParameterLocation, PathTemplate, RequestBodyInfo, ResponseInfo, Route, collect_refs, rewrite_refs,
};
use crate::{error::ConfigurationError, stats::BuildWarning};

/// Routes extracted from a document, plus the warnings raised on the way.
#[derive(Debug, Clone, Default)]
pub struct ParsedRoutes {
  pub routes: Vec<Route>,
  pub warnings: Vec<BuildWarning>,
}

/// Turns every operation of an OpenAPI document into a [`Route`].
///
/// `oas3` keeps media types in sorted maps, so the declared order of a
/// `content` table is only known from the source document. Without one,
/// media types are taken in lexical order.
#[derive(Debug, Clone, Copy)]
pub struct RouteParser<'a> {
  spec: &'a Spec,
  document: Option<&'a Value>,
}

impl<'a> RouteParser<'a> {
  #[must_use]
  pub fn new(spec: &'a Spec) -> Self {
    Self { spec, document: None }
  }

  /// Parses `spec` using `document`, the same OpenAPI document as raw JSON,
  /// to recover the declared order of request and response media types.
  #[must_use]
  pub fn with_document(spec: &'a Spec, document: &'a Value) -> Self {
    Self {
      spec,
      document: Some(document),
    }
  }

  /// Parses all operations in document order. A malformed operation aborts
  /// the whole parse with [`ConfigurationError::InvalidRoute`].
  pub fn parse(&self) -> Result<ParsedRoutes, ConfigurationError> {
    let mut parsed = ParsedRoutes::default();

    for (path, method, operation) in self.spec.operations() {
      let route_key = format!("{} {path}", method.as_str());
      let route = self
        .parse_operation(&path, method.as_str(), operation, &mut parsed.warnings)
        .map_err(|source| ConfigurationError::InvalidRoute {
          route: route_key,
          source,
        })?;
      parsed.routes.push(route);
    }

    Ok(parsed)
  }

  fn parse_operation(
    &self,
    path: &str,
    method: &str,
    operation: &Operation,
    warnings: &mut Vec<BuildWarning>,
  ) -> anyhow::Result<Route> {
    let method = Method::from_bytes(method.as_bytes()).with_context(|| format!("invalid method '{method}'"))?;
    let route_key = format!("{method} {path}");

    let mut parameters = self
      .collect_parameters(path, operation)?
      .iter()
      .map(|param| self.convert_parameter(param, &route_key, warnings))
      .collect::<anyhow::Result<Vec<_>>>()?;

    let declared = parameters
      .iter()
      .filter(|p| p.location == ParameterLocation::Path)
      .map(|p| p.name.clone())
      .collect::<HashSet<_>>();
    for name in PathTemplate::extract_placeholders(path)
      .filter(|name| !declared.contains(*name))
      .unique()
    {
      warnings.push(BuildWarning::SynthesizedPathParameter {
        route: route_key.clone(),
        name: name.to_string(),
      });
      parameters.push(ParameterInfo::path(name));
    }

    let raw_operation = self.raw_operation(path, &method);
    let request_body = self
      .convert_request_body(operation, raw_operation)
      .context("request body")?;
    let response = self
      .convert_response(operation, raw_operation)
      .context("success response")?;

    let mut refs = BTreeSet::new();
    for param in &parameters {
      refs.extend(collect_refs(&param.schema));
    }
    if let Some(body) = &request_body {
      refs.extend(collect_refs(&body.schema));
    }
    if let Some(schema) = response.as_ref().and_then(|r| r.schema.as_ref()) {
      refs.extend(collect_refs(schema));
    }
    let definitions = self.collect_definitions(refs)?;

    Ok(
      Route::builder()
        .method(method)
        .path(path)
        .parameters(parameters)
        .tags(operation.tags.iter().cloned().collect())
        .maybe_operation_id(operation.operation_id.clone())
        .maybe_summary(operation.summary.clone())
        .maybe_description(operation.description.clone())
        .maybe_request_body(request_body)
        .maybe_response(response)
        .definitions(definitions)
        .build(),
    )
  }

  /// Path-item parameters first, each replaced by an operation parameter
  /// with the same name and location.
  fn collect_parameters(&self, path: &str, operation: &Operation) -> anyhow::Result<Vec<Parameter>> {
    let mut params = vec![];

    if let Some(path_item) = self.spec.paths.as_ref().and_then(|p| p.get(path)) {
      for param_ref in &path_item.parameters {
        params.push(param_ref.resolve(self.spec).context("resolving path-level parameter")?);
      }
    }

    for param_ref in &operation.parameters {
      let param = param_ref.resolve(self.spec).context("resolving parameter")?;
      params.retain(|p: &Parameter| p.location != param.location || p.name != param.name);
      params.push(param);
    }

    Ok(params)
  }

  fn convert_parameter(
    &self,
    param: &Parameter,
    route_key: &str,
    warnings: &mut Vec<BuildWarning>,
  ) -> anyhow::Result<ParameterInfo> {
    let mut info = ParameterInfo::new(&param.name, param.location.into()).with_required(param.required.unwrap_or(false));

    match param.schema.as_ref() {
      Some(schema) => {
        let schema = schema_value(schema).with_context(|| format!("schema of parameter '{}'", param.name))?;
        info = info.with_schema(schema);
      }
      None => warnings.push(BuildWarning::MissingParameterSchema {
        route: route_key.to_string(),
        name: param.name.clone(),
      }),
    }

    if let Some(style) = param.style {
      info = info.with_style(style.into());
    }
    if let Some(explode) = param.explode {
      info = info.with_explode(explode);
    }
    if let Some(description) = &param.description {
      info = info.with_description(description);
    }

    Ok(info)
  }

  fn convert_request_body(
    &self,
    operation: &Operation,
    raw_operation: Option<&Value>,
  ) -> anyhow::Result<Option<RequestBodyInfo>> {
    let Some(body_ref) = operation.request_body.as_ref() else {
      return Ok(None);
    };
    let body = body_ref.resolve(self.spec)?;

    let declared = raw_operation.and_then(|op| self.declared_media_types(op.get("requestBody")?));
    let content_types = ordered_media_types(&body.content, declared);
    let Some(media_type) = content_types.first().and_then(|ct| body.content.get(ct)) else {
      return Ok(None);
    };
    let schema = match media_type.schema.as_ref() {
      Some(schema) => schema_value(schema)?,
      None => Value::Object(Map::new()),
    };

    Ok(Some(
      RequestBodyInfo::builder()
        .required(body.required.unwrap_or(false))
        .content_types(content_types)
        .schema(schema)
        .maybe_description(body.description.clone())
        .build(),
    ))
  }

  /// The first `2xx` response in status order.
  fn convert_response(
    &self,
    operation: &Operation,
    raw_operation: Option<&Value>,
  ) -> anyhow::Result<Option<ResponseInfo>> {
    let Some(responses) = operation.responses.as_ref() else {
      return Ok(None);
    };
    let Some((status, response_ref)) = responses
      .iter()
      .find(|(status, _)| status.starts_with('2'))
    else {
      return Ok(None);
    };
    let response = response_ref
      .resolve(self.spec)
      .with_context(|| format!("resolving response {status}"))?;

    let declared = raw_operation.and_then(|op| self.declared_media_types(op.get("responses")?.get(status)?));
    let content_type = ordered_media_types(&response.content, declared).into_iter().next();
    let schema = match content_type.as_ref().and_then(|ct| response.content.get(ct)) {
      Some(media_type) => media_type.schema.as_ref().map(schema_value).transpose()?,
      None => None,
    };

    Ok(Some(
      ResponseInfo::builder()
        .maybe_content_type(content_type)
        .maybe_schema(schema)
        .maybe_description(response.description.clone())
        .build(),
    ))
  }

  /// The operation object in the source document, if one was supplied.
  fn raw_operation(&self, path: &str, method: &Method) -> Option<&'a Value> {
    self
      .document?
      .get("paths")?
      .get(path)?
      .get(method.as_str().to_ascii_lowercase())
  }

  /// Keys of the `content` table of a request body or response object,
  /// in source order. Local references are followed.
  fn declared_media_types(&self, object: &Value) -> Option<Vec<String>> {
    let object = match object.get("$ref").and_then(Value::as_str) {
      Some(target) => self.document?.pointer(target.strip_prefix('#')?)?,
      None => object,
    };
    Some(object.get("content")?.as_object()?.keys().cloned().collect())
  }

  /// Component schemas reachable from `refs`, following references
  /// between components.
  fn collect_definitions(&self, refs: BTreeSet<String>) -> anyhow::Result<Map<String, Value>> {
    let mut definitions = BTreeMap::new();
    let mut pending = refs.into_iter().collect::<Vec<_>>();

    while let Some(name) = pending.pop() {
      if definitions.contains_key(&name) {
        continue;
      }
      let schema = self
        .spec
        .components
        .as_ref()
        .and_then(|c| c.schemas.get(&name))
        .with_context(|| format!("unresolved schema reference '{name}'"))?;
      let schema = schema_value(schema).with_context(|| format!("schema '{name}'"))?;
      pending.extend(collect_refs(&schema).into_iter().filter(|r| !definitions.contains_key(r)));
      definitions.insert(name, schema);
    }

    Ok(definitions.into_iter().collect())
  }
}

/// Media types of `content` with the declared ones first, in declared
/// order, followed by any the declaration did not list.
fn ordered_media_types<V>(content: &BTreeMap<String, V>, declared: Option<Vec<String>>) -> Vec<String> {
  let mut ordered = declared
    .unwrap_or_default()
    .into_iter()
    .filter(|media_type| content.contains_key(media_type))
    .unique()
    .collect::<Vec<_>>();
  let remaining = content
    .keys()
    .filter(|media_type| !ordered.contains(media_type))
    .cloned()
    .collect::<Vec<_>>();
  ordered.extend(remaining);
  ordered
}

fn schema_value(schema: &ObjectOrReference<ObjectSchema>) -> anyhow::Result<Value> {
  let mut value = serde_json::to_value(schema).context("serializing schema")?;
  rewrite_refs(&mut value);
  Ok(value)
}
