use http::Method;

use crate::{
  error::ConfigurationError,
  naming::{
    MAX_NAME_LENGTH, NameOverrides, NameRegistry, NameResolver, ensure_unique, generate_operation_id, is_valid_name,
    slugify, strip_identifier_suffix, truncate_slug,
  },
  routes::{ParameterInfo, Route},
};

fn route(method: Method, path: &str, operation_id: Option<&str>) -> Route {
  let parameters = crate::routes::PathTemplate::extract_placeholders(path)
    .map(ParameterInfo::path)
    .collect();
  Route::builder()
    .method(method)
    .path(path)
    .parameters(parameters)
    .maybe_operation_id(operation_id)
    .build()
}

#[test]
fn test_slugify() {
  let cases = [
    ("listUsers", "listusers"),
    ("list-users", "list_users"),
    ("List Users!!", "list_users"),
    ("__private__", "private"),
    ("a..b--c", "a_b_c"),
    ("Café Crème", "cafe_creme"),
    ("123", "123"),
    ("", ""),
    ("!!!", ""),
  ];
  for (input, expected) in cases {
    assert_eq!(slugify(input), expected, "failed for input {input:?}");
  }
}

#[test]
fn test_truncate_slug() {
  let cases = [
    ("short", 10, "short"),
    ("exactly_ten", 11, "exactly_ten"),
    ("abcde_fghij", 6, "abcde"),
    ("abcdefghij", 4, "abcd"),
  ];
  for (input, max_len, expected) in cases {
    assert_eq!(truncate_slug(input, max_len), expected, "failed for input {input:?}");
  }
}

#[test]
fn test_strip_identifier_suffix() {
  let cases = [
    ("list_users__v2", "list_users"),
    ("list_users__v2__internal", "list_users"),
    ("list_users", "list_users"),
    ("a_b", "a_b"),
  ];
  for (input, expected) in cases {
    assert_eq!(strip_identifier_suffix(input), expected, "failed for input {input:?}");
  }
}

#[test]
fn test_generate_operation_id() {
  let cases = [
    ("GET", "/users/{id}/posts", "get_users_by_id_posts"),
    ("POST", "/pets", "post_pets"),
    ("DELETE", "/", "delete"),
  ];
  for (method, path, expected) in cases {
    assert_eq!(generate_operation_id(method, path), expected, "failed for input {path:?}");
  }
}

#[test]
fn test_ensure_unique_shortens_stem() {
  let long = "a".repeat(MAX_NAME_LENGTH);
  let taken = [long.clone()];
  let unique = ensure_unique(&long, |candidate| taken.iter().any(|t| t == candidate));
  assert_eq!(unique.len(), MAX_NAME_LENGTH);
  assert!(unique.ends_with("_2"));
}

#[test]
fn test_prefix_collisions_are_suffixed() {
  let overrides = NameOverrides::new();
  let resolver = NameResolver::new(&overrides);
  let mut registry = NameRegistry::new();

  let routes = [
    route(Method::GET, "/users", Some("list_users__v1")),
    route(Method::GET, "/v2/users", Some("list_users__v2")),
    route(Method::GET, "/v3/users", Some("list_users__v3")),
  ];
  let names = routes
    .iter()
    .map(|r| resolver.resolve(r, &mut registry).name)
    .collect::<Vec<_>>();

  assert_eq!(names, vec!["list_users", "list_users_2", "list_users_3"]);
  assert_eq!(registry.route_for("list_users_2"), Some("GET /v2/users"));
  assert_eq!(registry.len(), 3);
}

#[test]
fn test_names_are_bounded_and_slug_safe() {
  let overrides = NameOverrides::try_from_pairs([("weird", "Ünïcödé Name / with spaces")]).unwrap();
  let resolver = NameResolver::new(&overrides);
  let mut registry = NameRegistry::new();

  let long_id = "get_".to_string() + &"very_long_segment_".repeat(10);
  let routes = [
    route(Method::GET, "/long", Some(&long_id)),
    route(Method::GET, "/long2", Some(&long_id)),
    route(Method::GET, "/weird", Some("weird")),
    route(Method::GET, "/users/{id}", None),
    route(Method::POST, "/!!!", Some("!!!")),
  ];
  for r in &routes {
    let resolved = resolver.resolve(r, &mut registry);
    assert!(is_valid_name(&resolved.name), "invalid name {:?} for {}", resolved.name, r.display_key());
  }

  let names = registry.iter().map(|(name, _)| name.to_string()).collect::<Vec<_>>();
  assert!(names.contains(&"unicode_name_with_spaces".to_string()));
  assert!(names.contains(&"get_users_by_id".to_string()));
  assert!(names.contains(&"post".to_string()));
}

#[test]
fn test_collision_reported() {
  let overrides = NameOverrides::new();
  let resolver = NameResolver::new(&overrides);
  let mut registry = NameRegistry::new();

  let first = resolver.resolve(&route(Method::GET, "/a", Some("dup")), &mut registry);
  let second = resolver.resolve(&route(Method::GET, "/b", Some("dup")), &mut registry);
  assert!(!first.collided());
  assert!(second.collided());
  assert_eq!(second.requested, "dup");
  assert_eq!(second.name, "dup_2");
}

#[test]
fn test_override_duplicates() {
  let same = NameOverrides::try_from_pairs([("getPet", "fetch_pet"), ("getPet", "fetch_pet")]).unwrap();
  assert_eq!(same.len(), 1);
  assert_eq!(same.get("getPet"), Some("fetch_pet"));

  let err = NameOverrides::try_from_pairs([("getPet", "fetch_pet"), ("getPet", "load_pet")]).unwrap_err();
  assert!(matches!(
    err,
    ConfigurationError::DuplicateNameOverride { ref operation_id, .. } if operation_id == "getPet"
  ));
}

#[test]
fn test_override_beats_identifier() {
  let overrides = NameOverrides::try_from_pairs([("getPet__internal", "fetch_pet")]).unwrap();
  let resolver = NameResolver::new(&overrides);

  let r = route(Method::GET, "/pets/{id}", Some("getPet__internal"));
  assert_eq!(resolver.requested_name(&r), "fetch_pet");

  let other = route(Method::GET, "/pets", Some("listPets__internal"));
  assert_eq!(resolver.requested_name(&other), "listpets");
}
