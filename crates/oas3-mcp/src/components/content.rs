use base64::{Engine as _, engine::general_purpose::STANDARD};
use oas3_mcp_support::HttpResponse;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::media::{ContentCategory, JSON_MIME, OCTET_STREAM_MIME, TEXT_MIME, essence};

/// Output schema flag marking results wrapped as `{"result": value}`.
pub const WRAP_RESULT_KEY: &str = "x-wrap-result";
pub const RESULT_PROPERTY: &str = "result";

/// One content item of a call result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Content {
  Text {
    text: String,
  },
  Blob {
    blob: String,
    #[serde(rename = "mimeType")]
    mime_type: String,
  },
}

impl Content {
  #[must_use]
  pub fn text(text: impl Into<String>) -> Self {
    Self::Text { text: text.into() }
  }

  #[must_use]
  pub fn as_text(&self) -> Option<&str> {
    match self {
      Self::Text { text } => Some(text),
      Self::Blob { .. } => None,
    }
  }
}

/// Result of a tool call.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallOutput {
  pub content: Vec<Content>,
  pub structured_content: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceBody {
  Text { text: String },
  Blob { blob: String },
}

/// One item returned by reading a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceContents {
  pub uri: String,
  pub mime_type: String,
  #[serde(flatten)]
  pub body: ResourceBody,
}

/// A successful response classified by the mime policy.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum MappedResponse {
  Empty,
  /// JSON document, with its text form.
  Json { value: Value, text: String },
  Text { text: String, mime_type: String },
  /// Base64-encoded payload.
  Binary { blob: String, mime_type: String },
}

impl MappedResponse {
  /// Classifies by the response `Content-Type`, else the declared response
  /// type. Without either, JSON is tried first, then UTF-8 text, then binary.
  pub(crate) fn from_response(response: &HttpResponse, declared: Option<&str>) -> Self {
    if response.body.is_empty() {
      return Self::Empty;
    }

    let content_type = response.content_type().map(essence).or_else(|| declared.map(essence));

    let Some(content_type) = content_type else {
      if let Ok(value) = serde_json::from_slice::<Value>(&response.body) {
        return Self::json(value, response);
      }
      return match std::str::from_utf8(&response.body) {
        Ok(text) => Self::Text {
          text: text.to_string(),
          mime_type: TEXT_MIME.to_string(),
        },
        Err(_) => Self::binary(&response.body, OCTET_STREAM_MIME),
      };
    };

    match ContentCategory::from_content_type(&content_type) {
      ContentCategory::Json => match serde_json::from_slice::<Value>(&response.body) {
        Ok(value) => Self::json(value, response),
        Err(_) => Self::Text {
          text: response.text_lossy(),
          mime_type: content_type,
        },
      },
      category if category.is_textual() => Self::Text {
        text: response.text_lossy(),
        mime_type: content_type,
      },
      _ => Self::binary(&response.body, &content_type),
    }
  }

  fn json(value: Value, response: &HttpResponse) -> Self {
    Self::Json {
      value,
      text: response.text_lossy(),
    }
  }

  fn binary(body: &[u8], mime_type: &str) -> Self {
    Self::Binary {
      blob: STANDARD.encode(body),
      mime_type: mime_type.to_string(),
    }
  }

  /// Tool result. Objects and arrays also become structured content;
  /// with `wrap_result`, every JSON value is wrapped as `{"result": value}`
  /// so it matches the wrapped output schema.
  pub(crate) fn into_call_output(self, wrap_result: bool) -> CallOutput {
    match self {
      Self::Empty => CallOutput::default(),
      Self::Json { value, text } => {
        let structured_content = match value {
          other if wrap_result => Some(Value::Object(Map::from_iter([(RESULT_PROPERTY.to_string(), other)]))),
          Value::Object(_) | Value::Array(_) => Some(value),
          _ => None,
        };
        CallOutput {
          content: vec![Content::text(text)],
          structured_content,
        }
      }
      Self::Text { text, .. } => CallOutput {
        content: vec![Content::text(text)],
        structured_content: None,
      },
      Self::Binary { blob, mime_type } => CallOutput {
        content: vec![Content::Blob { blob, mime_type }],
        structured_content: None,
      },
    }
  }

  /// Resource contents for `uri`. `mime_override` replaces the detected type.
  pub(crate) fn into_resource_contents(self, uri: &str, mime_override: Option<&str>) -> Vec<ResourceContents> {
    let (body, mime_type) = match self {
      Self::Empty => (ResourceBody::Text { text: String::new() }, TEXT_MIME.to_string()),
      Self::Json { text, .. } => (ResourceBody::Text { text }, JSON_MIME.to_string()),
      Self::Text { text, mime_type } => (ResourceBody::Text { text }, mime_type),
      Self::Binary { blob, mime_type } => (ResourceBody::Blob { blob }, mime_type),
    };
    vec![ResourceContents {
      uri: uri.to_string(),
      mime_type: mime_override.map_or(mime_type, str::to_string),
      body,
    }]
  }
}
