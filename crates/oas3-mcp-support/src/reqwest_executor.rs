use async_trait::async_trait;
use http::header::CONTENT_TYPE;

use crate::{HttpRequest, HttpResponse, RequestExecutor, TransportError};

/// [`RequestExecutor`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestExecutor {
  client: reqwest::Client,
  base_url: String,
}

impl ReqwestExecutor {
  #[must_use]
  pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
    let base_url = base_url.into().trim_end_matches('/').to_string();
    Self { client, base_url }
  }

  #[must_use]
  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  fn absolute_url(&self, request: &HttpRequest) -> Result<String, TransportError> {
    if !request.url.starts_with('/') {
      return Err(TransportError::InvalidUrl {
        url: request.url.clone(),
        reason: "request path must start with '/'".to_string(),
      });
    }
    Ok(format!("{}{}", self.base_url, request.path_and_query()))
  }
}

#[async_trait]
impl RequestExecutor for ReqwestExecutor {
  async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
    let url = self.absolute_url(&request)?;
    let mut builder = self.client.request(request.method, url).headers(request.headers);

    if let Some(body) = request.body {
      builder = builder.header(CONTENT_TYPE, body.content_type).body(body.data);
    }

    let response = builder.send().await?;
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.bytes().await?.to_vec();

    Ok(HttpResponse { status, headers, body })
  }
}
