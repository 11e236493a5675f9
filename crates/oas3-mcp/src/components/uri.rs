use std::collections::HashMap;

use oas3_mcp_support::percent_decode_str;
use regex::Regex;
use strum::Display;

/// Scheme prefix of every generated resource URI.
pub const RESOURCE_SCHEME: &str = "resource://";

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum UriTemplateError {
  #[strum(to_string = "unclosed '{{' in '{template}'")]
  UnclosedBrace { template: String },
  #[strum(to_string = "empty placeholder in '{template}'")]
  EmptyPlaceholder { template: String },
  #[strum(to_string = "placeholder '{name}' appears more than once in '{template}'")]
  DuplicatePlaceholder { template: String, name: String },
  #[strum(to_string = "invalid template '{template}': {reason}")]
  Invalid { template: String, reason: String },
}

impl std::error::Error for UriTemplateError {}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Placeholder {
  name: String,
  wildcard: bool,
}

/// A resource URI template with `{name}` placeholders matching one path
/// segment and `{name*}` placeholders matching one or more segments.
#[derive(Debug, Clone)]
pub struct UriTemplate {
  template: String,
  placeholders: Vec<Placeholder>,
  matcher: Regex,
}

impl UriTemplate {
  pub fn parse(template: &str) -> Result<Self, UriTemplateError> {
    let mut pattern = String::from("^");
    let mut placeholders: Vec<Placeholder> = vec![];
    let mut rest = template;

    while let Some(open) = rest.find('{') {
      pattern.push_str(&regex::escape(&rest[..open]));
      let after_open = &rest[open + 1..];
      let Some(close) = after_open.find('}') else {
        return Err(UriTemplateError::UnclosedBrace {
          template: template.to_string(),
        });
      };

      let raw = &after_open[..close];
      let (name, wildcard) = raw.strip_suffix('*').map_or((raw, false), |name| (name, true));
      if name.is_empty() {
        return Err(UriTemplateError::EmptyPlaceholder {
          template: template.to_string(),
        });
      }
      if placeholders.iter().any(|p| p.name == name) {
        return Err(UriTemplateError::DuplicatePlaceholder {
          template: template.to_string(),
          name: name.to_string(),
        });
      }

      pattern.push_str(if wildcard { "(.+?)" } else { "([^/]+)" });
      placeholders.push(Placeholder {
        name: name.to_string(),
        wildcard,
      });
      rest = &after_open[close + 1..];
    }
    pattern.push_str(&regex::escape(rest));
    pattern.push('$');

    let matcher = Regex::new(&pattern).map_err(|e| UriTemplateError::Invalid {
      template: template.to_string(),
      reason: e.to_string(),
    })?;

    Ok(Self {
      template: template.to_string(),
      placeholders,
      matcher,
    })
  }

  /// `resource://{name}/{p1}/{p2}` over the given parameter names.
  pub fn for_component<'a>(name: &str, params: impl IntoIterator<Item = &'a str>) -> Result<Self, UriTemplateError> {
    let template = params
      .into_iter()
      .fold(format!("{RESOURCE_SCHEME}{name}"), |mut acc, param| {
        acc.push_str("/{");
        acc.push_str(param);
        acc.push('}');
        acc
      });
    Self::parse(&template)
  }

  #[must_use]
  pub fn as_str(&self) -> &str {
    &self.template
  }

  pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
    self.placeholders.iter().map(|p| p.name.as_str())
  }

  /// Percent-decoded placeholder values when `uri` matches the whole template.
  #[must_use]
  pub fn match_uri(&self, uri: &str) -> Option<HashMap<String, String>> {
    let captures = self.matcher.captures(uri)?;
    self
      .placeholders
      .iter()
      .enumerate()
      .map(|(index, placeholder)| {
        let raw = captures.get(index + 1)?.as_str();
        let decoded = percent_decode_str(raw).decode_utf8().ok()?.into_owned();
        Some((placeholder.name.clone(), decoded))
      })
      .collect()
  }

  #[must_use]
  pub fn has_wildcard(&self) -> bool {
    self.placeholders.iter().any(|p| p.wildcard)
  }
}

impl PartialEq for UriTemplate {
  fn eq(&self, other: &Self) -> bool {
    self.template == other.template
  }
}

impl Eq for UriTemplate {}

impl std::fmt::Display for UriTemplate {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.template)
  }
}
