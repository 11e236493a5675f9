use strum::Display;

use crate::mapping::ComponentType;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BuildStats {
  pub routes_processed: usize,
  pub tools_created: usize,
  pub resources_created: usize,
  pub templates_created: usize,
  pub routes_excluded: usize,
  /// Routes whose type the override hook changed.
  pub types_overridden: usize,
  /// Routes a custom or default map excluded but the override hook kept.
  pub routes_resurrected: usize,
  pub name_collisions: usize,
  pub warnings: Vec<BuildWarning>,
}

impl BuildStats {
  pub fn record_route(&mut self) {
    self.routes_processed += 1;
  }

  pub fn record_component(&mut self, component_type: ComponentType) {
    match component_type {
      ComponentType::Tool => self.tools_created += 1,
      ComponentType::Resource => self.resources_created += 1,
      ComponentType::ResourceTemplate => self.templates_created += 1,
      ComponentType::Exclude => self.routes_excluded += 1,
    }
  }

  pub fn record_override(&mut self, provisional: ComponentType, final_type: ComponentType) {
    if provisional == final_type {
      return;
    }
    self.types_overridden += 1;
    if provisional == ComponentType::Exclude {
      self.routes_resurrected += 1;
    }
  }

  pub fn record_collision(&mut self) {
    self.name_collisions += 1;
  }

  pub fn record_warning(&mut self, warning: BuildWarning) {
    self.warnings.push(warning);
  }

  pub fn record_warnings(&mut self, warnings: impl IntoIterator<Item = BuildWarning>) {
    self.warnings.extend(warnings);
  }

  #[must_use]
  pub fn components_created(&self) -> usize {
    self.tools_created + self.resources_created + self.templates_created
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum BuildWarning {
  #[strum(to_string = "[{route}] synthesized path parameter '{name}' for an undeclared placeholder")]
  SynthesizedPathParameter { route: String, name: String },
  #[strum(to_string = "[{route}] parameter '{name}' has no schema, defaulting to string")]
  MissingParameterSchema { route: String, name: String },
  #[strum(to_string = "[{route}] name '{requested}' already taken, registered as '{assigned}'")]
  NameCollision {
    route: String,
    requested: String,
    assigned: String,
  },
  #[strum(to_string = "[{route}] argument '{name}' exposed as '{renamed}' to avoid a collision")]
  ArgumentRenamed {
    route: String,
    name: String,
    renamed: String,
  },
}
