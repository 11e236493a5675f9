use async_trait::async_trait;
use http::{HeaderMap, Method, StatusCode, header::CONTENT_TYPE};

use crate::{percent_encode_query_component, percent_encode_query_key};

/// Serialized request payload together with the media type it was encoded as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBody {
  pub content_type: String,
  pub data: Vec<u8>,
}

impl RequestBody {
  #[must_use]
  pub fn new(content_type: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
    Self {
      content_type: content_type.into(),
      data: data.into(),
    }
  }
}

/// A fully marshaled request, ready to hand to a [`RequestExecutor`].
///
/// `url` holds the rendered path only. The executor owns the base URL, so the
/// same request can be replayed against different upstreams.
#[derive(Debug, Clone, PartialEq, bon::Builder)]
pub struct HttpRequest {
  pub method: Method,
  #[builder(into)]
  pub url: String,
  #[builder(default)]
  pub query: Vec<(String, String)>,
  #[builder(default)]
  pub headers: HeaderMap,
  pub body: Option<RequestBody>,
}

impl HttpRequest {
  /// Renders the query pairs as an encoded `a=1&b=2` string, preserving order.
  #[must_use]
  pub fn query_string(&self) -> String {
    self
      .query
      .iter()
      .map(|(key, value)| {
        format!(
          "{}={}",
          percent_encode_query_key(key),
          percent_encode_query_component(value)
        )
      })
      .collect::<Vec<_>>()
      .join("&")
  }

  #[must_use]
  pub fn path_and_query(&self) -> String {
    if self.query.is_empty() {
      self.url.clone()
    } else {
      format!("{}?{}", self.url, self.query_string())
    }
  }

  /// Returns every value recorded for a query key, in emission order.
  pub fn query_values<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> {
    self
      .query
      .iter()
      .filter(move |(k, _)| k == key)
      .map(|(_, v)| v.as_str())
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
  pub status: StatusCode,
  pub headers: HeaderMap,
  pub body: Vec<u8>,
}

impl HttpResponse {
  #[must_use]
  pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
    Self {
      status,
      headers: HeaderMap::new(),
      body: body.into(),
    }
  }

  #[must_use]
  pub fn with_content_type(mut self, content_type: &str) -> Self {
    if let Ok(value) = content_type.parse() {
      self.headers.insert(CONTENT_TYPE, value);
    }
    self
  }

  #[must_use]
  pub fn is_success(&self) -> bool {
    self.status.is_success()
  }

  #[must_use]
  pub fn content_type(&self) -> Option<&str> {
    self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
  }

  #[must_use]
  pub fn text_lossy(&self) -> String {
    String::from_utf8_lossy(&self.body).into_owned()
  }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
  #[error("invalid request URL '{url}': {reason}")]
  InvalidUrl { url: String, reason: String },
  #[error("request failed: {0}")]
  Request(String),
  #[cfg(feature = "reqwest")]
  #[error(transparent)]
  Reqwest(#[from] reqwest::Error),
}

/// The transport seam. Implementations execute exactly one request per call;
/// retries, timeouts and authentication belong to the implementation.
#[async_trait]
pub trait RequestExecutor: Send + Sync {
  async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}
