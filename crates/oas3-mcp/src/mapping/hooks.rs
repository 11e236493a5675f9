use std::sync::Arc;

use super::ComponentType;
use crate::{components::ComponentDraft, routes::Route};

/// Called once per route after matching, excluded routes included.
/// `Some` replaces the provisional type, `None` keeps it.
pub type RouteMapFn = Arc<dyn Fn(&Route, ComponentType) -> Option<ComponentType> + Send + Sync>;

/// Called once per created component, before it is frozen.
pub type ComponentFn = Arc<dyn Fn(&Route, &mut ComponentDraft) + Send + Sync>;

#[must_use]
pub fn apply_route_map_fn(hook: Option<&RouteMapFn>, route: &Route, provisional: ComponentType) -> ComponentType {
  hook.and_then(|hook| hook(route, provisional)).unwrap_or(provisional)
}
