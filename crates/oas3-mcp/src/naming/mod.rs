//! Component naming: override lookup, slug normalization, length bounding
//! and per-build collision suffixing.

mod identifiers;
mod operations;

#[cfg(test)]
mod tests;

use std::collections::{HashMap, hash_map::Entry};

use indexmap::IndexMap;

pub use identifiers::{IDENTIFIER_SEPARATOR, MAX_NAME_LENGTH, is_valid_name};
pub(crate) use identifiers::{FALLBACK_NAME, ensure_unique, slugify, truncate_slug};
pub(crate) use operations::{generate_operation_id, strip_identifier_suffix};

use crate::{error::ConfigurationError, routes::Route};

/// Explicit identifier → name table supplied by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameOverrides {
  names: HashMap<String, String>,
}

impl NameOverrides {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Builds the table from ordered pairs. Repeating an identifier with a
  /// different target name is a configuration error.
  pub fn try_from_pairs<I, K, V>(pairs: I) -> Result<Self, ConfigurationError>
  where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
  {
    let mut names = HashMap::new();
    for (operation_id, name) in pairs {
      let (operation_id, name) = (operation_id.into(), name.into());
      match names.entry(operation_id) {
        Entry::Vacant(slot) => {
          slot.insert(name);
        }
        Entry::Occupied(existing) if *existing.get() == name => {}
        Entry::Occupied(existing) => {
          return Err(ConfigurationError::DuplicateNameOverride {
            operation_id: existing.key().clone(),
            first: existing.get().clone(),
            second: name,
          });
        }
      }
    }
    Ok(Self { names })
  }

  #[must_use]
  pub fn get(&self, operation_id: &str) -> Option<&str> {
    self.names.get(operation_id).map(String::as_str)
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.names.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.names.is_empty()
  }
}

impl From<HashMap<String, String>> for NameOverrides {
  fn from(names: HashMap<String, String>) -> Self {
    Self { names }
  }
}

/// Names assigned so far in one build, in assignment order, each mapped to
/// the route it came from. Never shared between builds.
#[derive(Debug, Clone, Default)]
pub struct NameRegistry {
  entries: IndexMap<String, String>,
}

impl NameRegistry {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  #[must_use]
  pub fn contains(&self, name: &str) -> bool {
    self.entries.contains_key(name)
  }

  /// Registers `base_name` for `route_key`, suffixing on collision.
  pub fn register(&mut self, base_name: &str, route_key: impl Into<String>) -> String {
    let name = ensure_unique(base_name, |candidate| self.contains(candidate));
    self.entries.insert(name.clone(), route_key.into());
    name
  }

  #[must_use]
  pub fn route_for(&self, name: &str) -> Option<&str> {
    self.entries.get(name).map(String::as_str)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.entries.iter().map(|(name, route)| (name.as_str(), route.as_str()))
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedName {
  /// The normalized, bounded name before collision handling.
  pub requested: String,
  /// The registered, unique name.
  pub name: String,
}

impl ResolvedName {
  #[must_use]
  pub fn collided(&self) -> bool {
    self.requested != self.name
  }
}

#[derive(Debug, Clone, Copy)]
pub struct NameResolver<'a> {
  overrides: &'a NameOverrides,
}

impl<'a> NameResolver<'a> {
  #[must_use]
  pub fn new(overrides: &'a NameOverrides) -> Self {
    Self { overrides }
  }

  /// The normalized name a route asks for, before uniqueness is enforced.
  #[must_use]
  pub fn requested_name(&self, route: &Route) -> String {
    let raw = match route.operation_id.as_deref() {
      Some(id) => match self.overrides.get(id) {
        Some(name) => name.to_string(),
        None => strip_identifier_suffix(id).to_string(),
      },
      None => generate_operation_id(route.method.as_str(), &route.path),
    };

    let mut slug = slugify(&raw);
    if slug.is_empty() {
      slug = slugify(&generate_operation_id(route.method.as_str(), &route.path));
    }
    if slug.is_empty() {
      slug = FALLBACK_NAME.to_string();
    }

    truncate_slug(&slug, MAX_NAME_LENGTH)
  }

  pub fn resolve(&self, route: &Route, registry: &mut NameRegistry) -> ResolvedName {
    let requested = self.requested_name(route);
    let name = registry.register(&requested, route.display_key());
    ResolvedName { requested, name }
  }
}
