pub use async_trait::async_trait;
pub use http::{HeaderMap, Method, StatusCode};
pub use percent_encoding::{AsciiSet, CONTROLS, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

mod transport;

#[cfg(feature = "reqwest")]
mod reqwest_executor;

#[cfg(feature = "reqwest")]
pub use reqwest_executor::ReqwestExecutor;
pub use transport::{HttpRequest, HttpResponse, RequestBody, RequestExecutor, TransportError};

/// Characters left unescaped inside a single path segment.
///
/// RFC 3986 sub-delimiters stay literal so comma-joined array values survive
/// substitution (`/items/red,blue`).
pub const PATH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
  .remove(b'-')
  .remove(b'_')
  .remove(b'.')
  .remove(b'~')
  .remove(b',')
  .remove(b':')
  .remove(b'@')
  .remove(b'!')
  .remove(b'$')
  .remove(b'\'')
  .remove(b'(')
  .remove(b')')
  .remove(b'*')
  .remove(b';')
  .remove(b'=');

#[inline]
#[must_use]
pub fn percent_encode_path_segment(segment: &str) -> String {
  utf8_percent_encode(segment, PATH_ENCODE_SET).to_string()
}

pub const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
  .remove(b'-')
  .remove(b'_')
  .remove(b'.')
  .remove(b'~')
  .remove(b',')
  .remove(b':')
  .remove(b'@')
  .remove(b'/')
  .remove(b'?')
  .remove(b'!')
  .remove(b'$')
  .remove(b'\'')
  .remove(b'(')
  .remove(b')')
  .remove(b'*');

/// Query keys additionally keep brackets so `deepObject` keys read as `filter[color]`.
pub const QUERY_KEY_ENCODE_SET: &AsciiSet = &QUERY_ENCODE_SET.remove(b'[').remove(b']');

#[inline]
#[must_use]
pub fn percent_encode_query_component(component: &str) -> String {
  utf8_percent_encode(component, QUERY_ENCODE_SET).to_string()
}

#[inline]
#[must_use]
pub fn percent_encode_query_key(key: &str) -> String {
  utf8_percent_encode(key, QUERY_KEY_ENCODE_SET).to_string()
}

/// Characters escaped in a cookie value: everything outside the RFC 6265
/// `cookie-octet` range, plus `%` so the encoding stays reversible.
pub const COOKIE_VALUE_ENCODE_SET: &AsciiSet = &CONTROLS
  .add(b' ')
  .add(b'"')
  .add(b',')
  .add(b';')
  .add(b'\\')
  .add(b'%');

#[inline]
#[must_use]
pub fn percent_encode_cookie_value(value: &str) -> String {
  utf8_percent_encode(value, COOKIE_VALUE_ENCODE_SET).to_string()
}
