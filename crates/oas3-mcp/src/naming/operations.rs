use crate::naming::identifiers::IDENTIFIER_SEPARATOR;

/// The part of an operation identifier before the first `__`.
pub(crate) fn strip_identifier_suffix(operation_id: &str) -> &str {
  operation_id
    .split_once(IDENTIFIER_SEPARATOR)
    .map_or(operation_id, |(head, _)| head)
}

/// Derives an identifier from method and path when the operation has none.
///
/// ```text
/// GET /users/{id}/posts => get_users_by_id_posts
/// ```
pub(crate) fn generate_operation_id<M, P>(method: M, path: P) -> String
where
  M: AsRef<str>,
  P: AsRef<str>,
{
  let path_parts = path
    .as_ref()
    .split('/')
    .filter(|s| !s.is_empty())
    .map(|s| {
      if s.starts_with('{') && s.ends_with('}') {
        "by_id"
      } else {
        s
      }
    })
    .collect::<Vec<_>>();

  if path_parts.is_empty() {
    method.as_ref().to_lowercase()
  } else {
    format!("{}_{}", method.as_ref(), path_parts.join("_")).to_lowercase()
  }
}
