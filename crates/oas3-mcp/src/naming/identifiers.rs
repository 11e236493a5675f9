use std::sync::LazyLock;

use any_ascii::any_ascii;
use regex::Regex;

/// Upper bound on component name length, suffixes included.
pub const MAX_NAME_LENGTH: usize = 56;

/// Marker that ends the meaningful part of an operation identifier
/// (`list_users__v2_internal` → `list_users`).
pub const IDENTIFIER_SEPARATOR: &str = "__";

pub(crate) const FALLBACK_NAME: &str = "unnamed";

static INVALID_CHARS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9_]+").unwrap());
static MULTI_UNDERSCORE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_+").unwrap());

/// Transliterates to ASCII, lowercases, replaces invalid characters with
/// underscores, collapses consecutive underscores and trims them from both ends.
pub(crate) fn slugify(input: &str) -> String {
  if input.is_empty() {
    return String::new();
  }

  let ascii = any_ascii(input).to_ascii_lowercase();
  let replaced = INVALID_CHARS_RE.replace_all(&ascii, "_");
  let collapsed = MULTI_UNDERSCORE_RE.replace_all(&replaced, "_");

  collapsed.trim_matches('_').to_string()
}

/// Cuts a slug to at most `max_len` characters without leaving a trailing separator.
pub(crate) fn truncate_slug(slug: &str, max_len: usize) -> String {
  if slug.len() <= max_len {
    return slug.to_string();
  }
  slug[..max_len].trim_end_matches('_').to_string()
}

/// Whether `name` is a valid, bounded component name.
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
  !name.is_empty()
    && name.len() <= MAX_NAME_LENGTH
    && name.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
    && !name.starts_with('_')
    && !name.ends_with('_')
}

/// Ensures a name is unique, appending `_2`, `_3`, … and shortening the stem
/// so the suffixed name still fits [`MAX_NAME_LENGTH`].
pub(crate) fn ensure_unique<F>(base_name: &str, is_taken: F) -> String
where
  F: Fn(&str) -> bool,
{
  if !is_taken(base_name) {
    return base_name.to_string();
  }
  let mut i = 2usize;
  loop {
    let suffix = format!("_{i}");
    let stem = truncate_slug(base_name, MAX_NAME_LENGTH.saturating_sub(suffix.len()));
    let candidate = format!("{stem}{suffix}");
    if !is_taken(&candidate) {
      return candidate;
    }
    i += 1;
  }
}
