use std::collections::{BTreeSet, HashMap};

use serde_json::{Map, Value};

use crate::{
  naming::IDENTIFIER_SEPARATOR,
  routes::{ParameterInfo, Route, resolve_ref},
};

/// Argument name used for a request body that is not an object.
pub const BODY_ARGUMENT: &str = "body";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentTarget {
  /// Index into the route's parameter list.
  Parameter(usize),
  /// A property of an object request body.
  BodyProperty(String),
  /// The whole request body.
  Body,
}

/// One exposed argument and where its value goes.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentBinding {
  pub argument: String,
  pub target: ArgumentTarget,
  pub required: bool,
  pub schema: Value,
  pub description: Option<String>,
}

/// The argument table shared by input schema generation and marshaling.
///
/// Body properties keep their names. A parameter whose name is also used by
/// a parameter in another location or by the body is exposed as
/// `{name}__{location}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgumentLayout {
  bindings: Vec<ArgumentBinding>,
}

impl ArgumentLayout {
  #[must_use]
  pub fn for_route(route: &Route) -> Self {
    let body_fields = route.request_body.as_ref().map(|body| {
      match object_properties(&body.schema, &route.definitions) {
        Some((properties, required)) => BodyFields::Properties {
          properties: properties.clone(),
          required: if body.required {
            required.into_iter().map(str::to_string).collect()
          } else {
            BTreeSet::new()
          },
        },
        None => BodyFields::Whole {
          schema: body.schema.clone(),
          required: body.required,
          description: body.description.clone(),
        },
      }
    });

    let body_names = match &body_fields {
      Some(BodyFields::Properties { properties, .. }) => properties.keys().cloned().collect::<BTreeSet<_>>(),
      Some(BodyFields::Whole { .. }) => BTreeSet::from([BODY_ARGUMENT.to_string()]),
      None => BTreeSet::new(),
    };

    let mut name_counts = HashMap::<&str, usize>::new();
    for param in &route.parameters {
      *name_counts.entry(param.name.as_str()).or_default() += 1;
    }

    let mut bindings = route
      .parameters
      .iter()
      .enumerate()
      .map(|(index, param)| {
        let collides = name_counts.get(param.name.as_str()).copied().unwrap_or_default() > 1
          || body_names.contains(&param.name);
        let argument = if collides {
          format!("{}{IDENTIFIER_SEPARATOR}{}", param.name, param.location)
        } else {
          param.name.clone()
        };
        ArgumentBinding {
          argument,
          target: ArgumentTarget::Parameter(index),
          required: param.required && param.default_value().is_none(),
          schema: param.schema.clone(),
          description: param.description.clone(),
        }
      })
      .collect::<Vec<_>>();

    match body_fields {
      Some(BodyFields::Properties { properties, required }) => {
        bindings.extend(properties.into_iter().map(|(prop, schema)| ArgumentBinding {
          required: required.contains(&prop),
          description: schema.get("description").and_then(Value::as_str).map(str::to_string),
          argument: prop.clone(),
          target: ArgumentTarget::BodyProperty(prop),
          schema,
        }));
      }
      Some(BodyFields::Whole {
        schema,
        required,
        description,
      }) => bindings.push(ArgumentBinding {
        argument: BODY_ARGUMENT.to_string(),
        target: ArgumentTarget::Body,
        required,
        schema,
        description,
      }),
      None => {}
    }

    Self { bindings }
  }

  #[must_use]
  pub fn bindings(&self) -> &[ArgumentBinding] {
    &self.bindings
  }

  #[must_use]
  pub fn get(&self, argument: &str) -> Option<&ArgumentBinding> {
    self.bindings.iter().find(|b| b.argument == argument)
  }

  /// The argument name exposed for a route parameter.
  #[must_use]
  pub fn argument_for(&self, index: usize) -> Option<&str> {
    self
      .bindings
      .iter()
      .find(|b| b.target == ArgumentTarget::Parameter(index))
      .map(|b| b.argument.as_str())
  }

  /// `(parameter name, exposed argument)` for every renamed parameter.
  pub fn renamed<'a>(&'a self, route: &'a Route) -> impl Iterator<Item = (&'a str, &'a str)> {
    self.bindings.iter().filter_map(|b| match b.target {
      ArgumentTarget::Parameter(index) => route
        .parameters
        .get(index)
        .filter(|p: &&ParameterInfo| p.name != b.argument)
        .map(|p| (p.name.as_str(), b.argument.as_str())),
      _ => None,
    })
  }

  pub fn required_arguments(&self) -> impl Iterator<Item = &str> {
    self.bindings.iter().filter(|b| b.required).map(|b| b.argument.as_str())
  }
}

enum BodyFields {
  Properties {
    properties: Map<String, Value>,
    required: BTreeSet<String>,
  },
  Whole {
    schema: Value,
    required: bool,
    description: Option<String>,
  },
}

/// Properties and required names of an object schema, following
/// `#/$defs/` references into `definitions`.
fn object_properties<'a>(
  schema: &'a Value,
  definitions: &'a Map<String, Value>,
) -> Option<(&'a Map<String, Value>, BTreeSet<&'a str>)> {
  let schema = resolve_ref(schema, definitions);
  let properties = schema.get("properties").and_then(Value::as_object)?;
  let required = schema
    .get("required")
    .and_then(Value::as_array)
    .map(|names| names.iter().filter_map(Value::as_str).collect())
    .unwrap_or_default();
  Some((properties, required))
}
