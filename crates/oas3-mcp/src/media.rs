use mediatype::MediaType;

pub const JSON_MIME: &str = "application/json";
pub const TEXT_MIME: &str = "text/plain";
pub const OCTET_STREAM_MIME: &str = "application/octet-stream";

/// Coarse classification of a media type, driving both body encoding and
/// response-to-content mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub enum ContentCategory {
  #[default]
  Json,
  FormUrlEncoded,
  Multipart,
  Text,
  Binary,
  Xml,
  EventStream,
}

impl ContentCategory {
  #[must_use]
  pub fn from_content_type(content_type: &str) -> Self {
    let Some(media) = MediaType::parse(content_type).ok() else {
      return Self::Json;
    };

    let suffix = media.suffix.as_ref().map(mediatype::Name::as_str);

    match (media.ty.as_str(), media.subty.as_str(), suffix) {
      ("multipart", _, _) => Self::Multipart,
      ("text", "event-stream", _) => Self::EventStream,
      ("text" | "application", "xml", _) | (_, _, Some("xml")) => Self::Xml,
      ("application", "x-www-form-urlencoded", _) => Self::FormUrlEncoded,
      ("application", "json", _) | (_, _, Some("json")) => Self::Json,
      ("image" | "audio" | "video", _, _) | ("application", "pdf" | "octet-stream" | "zip" | "gzip", _) => {
        Self::Binary
      }
      ("text", _, _) => Self::Text,
      _ => Self::Binary,
    }
  }

  /// Whether payloads of this category are expected to be UTF-8 text.
  #[must_use]
  pub const fn is_textual(self) -> bool {
    matches!(
      self,
      Self::Json | Self::FormUrlEncoded | Self::Text | Self::Xml | Self::EventStream
    )
  }
}

/// The media type without parameters, lowercased (`Text/HTML; charset=utf-8` → `text/html`).
#[must_use]
pub fn essence(content_type: &str) -> String {
  content_type
    .split(';')
    .next()
    .unwrap_or_default()
    .trim()
    .to_ascii_lowercase()
}
