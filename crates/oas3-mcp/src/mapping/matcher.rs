use super::{ComponentType, RouteMap, default_route_maps};
use crate::routes::Route;

/// The winning map for a route. `component_type` is provisional until the
/// override hook has run.
#[derive(Debug, Clone, Copy)]
pub struct RouteMatch<'a> {
  pub index: usize,
  pub route_map: &'a RouteMap,
  pub component_type: ComponentType,
  pub from_defaults: bool,
}

/// First full match over `maps`, in order.
#[must_use]
pub fn match_route<'a>(maps: &'a [RouteMap], route: &Route) -> Option<(usize, &'a RouteMap)> {
  maps.iter().enumerate().find(|(_, map)| map.matches(route))
}

/// The effective map list of one build: custom maps followed by defaults.
#[derive(Debug, Clone)]
pub struct RouteMatcher {
  maps: Vec<RouteMap>,
  custom_len: usize,
}

impl RouteMatcher {
  #[must_use]
  pub fn new(custom: Vec<RouteMap>, include_defaults: bool) -> Self {
    let custom_len = custom.len();
    let mut maps = custom;
    if include_defaults {
      maps.extend(default_route_maps());
    }
    Self { maps, custom_len }
  }

  #[must_use]
  pub fn route_maps(&self) -> &[RouteMap] {
    &self.maps
  }

  #[must_use]
  pub fn match_route(&self, route: &Route) -> Option<RouteMatch<'_>> {
    match_route(&self.maps, route).map(|(index, route_map)| RouteMatch {
      index,
      route_map,
      component_type: route_map.component_type,
      from_defaults: index >= self.custom_len,
    })
  }
}
