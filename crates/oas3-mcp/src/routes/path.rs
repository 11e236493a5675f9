use std::collections::HashMap;

use strum::Display;

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum PathParseError {
  #[strum(to_string = "unclosed '{{' at position {position} in segment '{segment}'")]
  UnclosedBrace { segment: String, position: usize },
  #[strum(to_string = "empty parameter '{{}}' in segment '{segment}'")]
  EmptyParameter { segment: String },
  #[strum(to_string = "unmatched '}}' at position {position} in segment '{segment}'")]
  UnmatchedClosingBrace { segment: String, position: usize },
  #[strum(to_string = "nested '{{' at position {position} in segment '{segment}'")]
  NestedBraces { segment: String, position: usize },
  #[strum(to_string = "placeholder '{{{name}}}' has no matching path parameter")]
  UndeclaredPlaceholder { name: String },
  #[strum(to_string = "path parameter '{name}' does not appear in the path template")]
  UnusedPathParameter { name: String },
}

impl std::error::Error for PathParseError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathPart {
  Literal(String),
  Param(String),
}

/// A tokenized path template such as `/users/{id}/files/{name}.{ext}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PathTemplate {
  parts: Vec<PathPart>,
}

impl PathTemplate {
  /// Placeholders may not span a `/`, nest, or be empty.
  pub fn parse(path: &str) -> Result<Self, PathParseError> {
    let mut parts = vec![];
    let mut literal = String::new();

    for (index, segment) in path.split('/').enumerate() {
      if index > 0 {
        literal.push('/');
      }
      let mut open = None;
      for (position, ch) in segment.char_indices() {
        match (ch, open) {
          ('{', None) => open = Some(position),
          ('{', Some(_)) => {
            return Err(PathParseError::NestedBraces {
              segment: segment.to_string(),
              position,
            });
          }
          ('}', None) => {
            return Err(PathParseError::UnmatchedClosingBrace {
              segment: segment.to_string(),
              position,
            });
          }
          ('}', Some(start)) => {
            let name = &segment[start + 1..position];
            if name.is_empty() {
              return Err(PathParseError::EmptyParameter {
                segment: segment.to_string(),
              });
            }
            if !literal.is_empty() {
              parts.push(PathPart::Literal(std::mem::take(&mut literal)));
            }
            parts.push(PathPart::Param(name.to_string()));
            open = None;
          }
          (_, Some(_)) => {}
          (_, None) => literal.push(ch),
        }
      }
      if let Some(position) = open {
        return Err(PathParseError::UnclosedBrace {
          segment: segment.to_string(),
          position,
        });
      }
    }

    if !literal.is_empty() {
      parts.push(PathPart::Literal(literal));
    }
    Ok(Self { parts })
  }

  #[must_use]
  pub fn parts(&self) -> &[PathPart] {
    &self.parts
  }

  /// Placeholder names in order of appearance.
  pub fn placeholders(&self) -> impl Iterator<Item = &str> {
    self.parts.iter().filter_map(|part| match part {
      PathPart::Param(name) => Some(name.as_str()),
      PathPart::Literal(_) => None,
    })
  }

  /// Substitutes already-encoded values. Placeholders without a value are
  /// left in their `{name}` form.
  #[must_use]
  pub fn render(&self, values: &HashMap<&str, String>) -> String {
    self.parts.iter().fold(String::new(), |mut acc, part| {
      match part {
        PathPart::Literal(lit) => acc.push_str(lit),
        PathPart::Param(name) => match values.get(name.as_str()) {
          Some(value) => acc.push_str(value),
          None => {
            acc.push('{');
            acc.push_str(name);
            acc.push('}');
          }
        },
      }
      acc
    })
  }

  /// Placeholder names found by a lenient scan, skipping malformed braces.
  pub fn extract_placeholders(path: &str) -> impl Iterator<Item = &str> {
    PlaceholderIter { rest: path }
  }
}

struct PlaceholderIter<'a> {
  rest: &'a str,
}

impl<'a> Iterator for PlaceholderIter<'a> {
  type Item = &'a str;

  fn next(&mut self) -> Option<Self::Item> {
    let open_pos = self.rest.find('{')?;
    let after_open = &self.rest[open_pos + 1..];
    let close_pos = after_open.find('}')?;
    let param = &after_open[..close_pos];
    self.rest = &after_open[close_pos + 1..];

    if param.is_empty() { self.next() } else { Some(param) }
  }
}
