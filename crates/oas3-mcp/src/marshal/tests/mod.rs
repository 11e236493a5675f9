use std::sync::Arc;

use http::{Method, header::COOKIE};
use serde_json::{Value, json};

use crate::{
  error::{MarshalError, ParameterScope},
  marshal::{ArgumentTarget, Arguments, BODY_ARGUMENT, RequestMarshaler},
  routes::{ParameterInfo, ParameterStyle, PathParseError, RequestBodyInfo, Route},
};

fn args(value: Value) -> Arguments {
  match value {
    Value::Object(map) => map,
    other => panic!("arguments must be an object, got {other}"),
  }
}

fn marshaler(route: Route) -> RequestMarshaler {
  RequestMarshaler::new(Arc::new(route)).unwrap()
}

fn products_route() -> Route {
  Route::builder()
    .method(Method::GET)
    .path("/products")
    .parameters(vec![
      ParameterInfo::query("category"),
      ParameterInfo::query("min_price").with_schema(json!({ "type": "integer" })),
      ParameterInfo::query("max_price").with_schema(json!({ "type": "integer" })),
      ParameterInfo::query("brand"),
    ])
    .build()
}

fn items_route() -> Route {
  Route::builder()
    .method(Method::GET)
    .path("/items/{ids}")
    .parameters(vec![
      ParameterInfo::path("ids").with_schema(json!({ "type": "array", "items": { "type": "string" } })),
    ])
    .build()
}

#[test]
fn test_query_filter_omits_missing_values() {
  let m = marshaler(products_route());
  let request = m
    .marshal(&args(json!({ "category": "electronics", "min_price": 100, "max_price": null, "brand": "" })))
    .unwrap();

  assert_eq!(request.method, Method::GET);
  assert_eq!(request.path_and_query(), "/products?category=electronics&min_price=100");
  assert!(request.body.is_none());
}

#[test]
fn test_query_empty_values_are_omitted() {
  let m = marshaler(products_route());
  let request = m.marshal(&args(json!({ "category": "", "min_price": null }))).unwrap();
  assert!(request.query.is_empty());
  assert_eq!(request.path_and_query(), "/products");
}

#[test]
fn test_path_array_is_comma_joined() {
  let m = marshaler(items_route());
  let request = m.marshal(&args(json!({ "ids": ["red", "blue", "green"] }))).unwrap();
  assert_eq!(request.url, "/items/red,blue,green");
}

#[test]
fn test_path_values_are_percent_encoded() {
  let m = marshaler(items_route());
  let request = m.marshal(&args(json!({ "ids": "a b/c" }))).unwrap();
  assert_eq!(request.url, "/items/a%20b%2Fc");
}

#[test]
fn test_missing_path_parameter_is_named() {
  let m = marshaler(items_route());
  let cases = [json!({ "ids": null }), json!({})];
  for input in cases {
    let err = m.marshal(&args(input.clone())).unwrap_err();
    assert_eq!(
      err,
      MarshalError::MissingRequiredParameter {
        scope: ParameterScope::Path,
        names: vec!["ids".to_string()],
      },
      "failed for input {input:?}"
    );
    assert!(err.to_string().contains("ids"));
  }
}

#[test]
fn test_missing_parameters_are_batched() {
  let route = Route::builder()
    .method(Method::GET)
    .path("/orgs/{org}/repos/{repo}")
    .parameters(vec![
      ParameterInfo::path("org"),
      ParameterInfo::path("repo"),
      ParameterInfo::query("token").with_required(true),
      ParameterInfo::query("page"),
    ])
    .build();
  let m = marshaler(route);

  let err = m.validate(&args(json!({ "repo": "x" }))).unwrap_err();
  assert_eq!(
    err,
    MarshalError::MissingRequiredParameter {
      scope: ParameterScope::Any,
      names: vec!["org".to_string(), "token".to_string()],
    }
  );
  assert_eq!(err.to_string(), "missing required parameters: org, token");
  assert_eq!(err.missing_names(), ["org", "token"]);
}

#[test]
fn test_query_array_explode() {
  let cases = [
    (ParameterStyle::Form, true, "/search?tag=a&tag=b&tag=c"),
    (ParameterStyle::Form, false, "/search?tag=a,b,c"),
    (ParameterStyle::SpaceDelimited, false, "/search?tag=a%20b%20c"),
    (ParameterStyle::PipeDelimited, false, "/search?tag=a%7Cb%7Cc"),
  ];
  for (style, explode, expected) in cases {
    let route = Route::builder()
      .method(Method::GET)
      .path("/search")
      .parameters(vec![
        ParameterInfo::query("tag")
          .with_schema(json!({ "type": "array", "items": { "type": "string" } }))
          .with_style(style)
          .with_explode(explode),
      ])
      .build();
    let request = marshaler(route).marshal(&args(json!({ "tag": ["a", "b", "c"] }))).unwrap();
    assert_eq!(request.path_and_query(), expected, "failed for input {style:?}/{explode}");
  }
}

#[test]
fn test_query_objects() {
  let cases = [
    (ParameterStyle::DeepObject, true, vec![("filter[color]", "red"), ("filter[size]", "10")]),
    (ParameterStyle::Form, true, vec![("color", "red"), ("size", "10")]),
    (ParameterStyle::Form, false, vec![("filter", "color,red,size,10")]),
  ];
  for (style, explode, expected) in cases {
    let route = Route::builder()
      .method(Method::GET)
      .path("/things")
      .parameters(vec![
        ParameterInfo::query("filter")
          .with_schema(json!({
            "type": "object",
            "properties": { "color": { "type": "string" }, "size": { "type": "integer" } }
          }))
          .with_style(style)
          .with_explode(explode),
      ])
      .build();
    let request = marshaler(route)
      .marshal(&args(json!({ "filter": { "color": "red", "size": "10" } })))
      .unwrap();
    let expected = expected
      .into_iter()
      .map(|(k, v)| (k.to_string(), v.to_string()))
      .collect::<Vec<_>>();
    assert_eq!(request.query, expected, "failed for input {style:?}/{explode}");
  }
}

#[test]
fn test_label_and_matrix_path_styles() {
  let cases = [
    (ParameterStyle::Label, false, "/colors/.blue,black"),
    (ParameterStyle::Label, true, "/colors/.blue.black"),
    (ParameterStyle::Matrix, false, "/colors/;color=blue,black"),
    (ParameterStyle::Matrix, true, "/colors/;color=blue;color=black"),
  ];
  for (style, explode, expected) in cases {
    let route = Route::builder()
      .method(Method::GET)
      .path("/colors/{color}")
      .parameters(vec![ParameterInfo::path("color").with_style(style).with_explode(explode)])
      .build();
    let request = marshaler(route).marshal(&args(json!({ "color": ["blue", "black"] }))).unwrap();
    assert_eq!(request.url, expected, "failed for input {style:?}/{explode}");
  }
}

#[test]
fn test_scalar_coercion() {
  let route = Route::builder()
    .method(Method::GET)
    .path("/q")
    .parameters(vec![
      ParameterInfo::query("limit").with_schema(json!({ "type": "integer" })),
      ParameterInfo::query("ratio").with_schema(json!({ "type": "number" })),
      ParameterInfo::query("active").with_schema(json!({ "type": ["boolean", "null"] })),
    ])
    .build();
  let m = marshaler(route);

  let request = m
    .marshal(&args(json!({ "limit": "25", "ratio": 0.5, "active": "TRUE" })))
    .unwrap();
  assert_eq!(request.query_string(), "limit=25&ratio=0.5&active=true");

  let cases = [
    (json!({ "limit": "ten" }), "limit"),
    (json!({ "limit": 2.5 }), "limit"),
    (json!({ "ratio": "fast" }), "ratio"),
    (json!({ "active": "yes" }), "active"),
    (json!({ "active": 1 }), "active"),
  ];
  for (input, name) in cases {
    let err = m.marshal(&args(input.clone())).unwrap_err();
    assert!(
      matches!(&err, MarshalError::ParameterSerialization { name: n, .. } if n == name),
      "failed for input {input:?}: {err}"
    );
  }
}

#[test]
fn test_coercion_follows_schema_references() {
  let route = Route::builder()
    .method(Method::GET)
    .path("/reports/{day}")
    .parameters(vec![
      ParameterInfo::path("day").with_schema(json!({ "$ref": "#/$defs/Day" })),
      ParameterInfo::query("limit").with_schema(json!({ "$ref": "#/$defs/Limit" })),
      ParameterInfo::query("ids").with_schema(json!({ "type": "array", "items": { "$ref": "#/$defs/Limit" } })),
      ParameterInfo::query("range").with_schema(json!({ "$ref": "#/$defs/Range" })),
    ])
    .definitions(serde_json::Map::from_iter([
      ("Day".to_string(), json!({ "$ref": "#/$defs/Limit" })),
      ("Limit".to_string(), json!({ "type": "integer" })),
      (
        "Range".to_string(),
        json!({ "type": "object", "properties": { "from": { "$ref": "#/$defs/Limit" } } }),
      ),
    ]))
    .build();
  let m = marshaler(route);

  let request = m
    .marshal(&args(json!({ "day": "3", "limit": "10", "ids": [1, "2"], "range": { "from": "5" } })))
    .unwrap();
  assert_eq!(request.path_and_query(), "/reports/3?limit=10&ids=1&ids=2&from=5");

  let cases = [
    (json!({ "day": "x" }), "day"),
    (json!({ "day": 1, "limit": "abc" }), "limit"),
    (json!({ "day": 1, "ids": ["one"] }), "ids"),
    (json!({ "day": 1, "range": { "from": "soon" } }), "range"),
  ];
  for (input, name) in cases {
    let err = m.marshal(&args(input.clone())).unwrap_err();
    assert!(
      matches!(&err, MarshalError::ParameterSerialization { name: n, .. } if n == name),
      "failed for input {input:?}: {err}"
    );
  }
}

#[test]
fn test_nested_values_are_rejected() {
  let m = marshaler(items_route());
  let cases = [json!({ "ids": [["a"]] }), json!({ "ids": { "a": 1 } })];
  for input in cases {
    let err = m.marshal(&args(input.clone())).unwrap_err();
    assert!(
      matches!(err, MarshalError::ParameterSerialization { .. }),
      "failed for input {input:?}"
    );
  }
}

#[test]
fn test_headers_and_cookies() {
  let route = Route::builder()
    .method(Method::GET)
    .path("/me")
    .parameters(vec![
      ParameterInfo::header("X-Request-Id"),
      ParameterInfo::header("X-Flags"),
      ParameterInfo::header("X-Missing"),
      ParameterInfo::cookie("session"),
      ParameterInfo::cookie("theme"),
    ])
    .build();
  let request = marshaler(route)
    .marshal(&args(json!({
      "X-Request-Id": 42,
      "X-Flags": ["a", "b"],
      "session": "abc",
      "theme": "dark"
    })))
    .unwrap();

  assert_eq!(request.headers["x-request-id"], "42");
  assert_eq!(request.headers["x-flags"], "a,b");
  assert!(!request.headers.contains_key("x-missing"));
  assert_eq!(request.headers[COOKIE], "session=abc; theme=dark");
}

#[test]
fn test_cookie_values_cannot_add_cookies() {
  let route = Route::builder()
    .method(Method::GET)
    .path("/me")
    .parameters(vec![ParameterInfo::cookie("session"), ParameterInfo::cookie("lang")])
    .build();
  let request = marshaler(route)
    .marshal(&args(json!({ "session": "abc; admin=1", "lang": "en" })))
    .unwrap();

  assert_eq!(request.headers[COOKIE], "session=abc%3B%20admin=1; lang=en");
}

#[test]
fn test_json_body_from_properties() {
  let route = Route::builder()
    .method(Method::POST)
    .path("/users/{id}/notes")
    .parameters(vec![ParameterInfo::path("id"), ParameterInfo::query("text")])
    .request_body(
      RequestBodyInfo::builder()
        .required(true)
        .schema(json!({
          "type": "object",
          "required": ["text"],
          "properties": { "text": { "type": "string" }, "pinned": { "type": "boolean" } }
        }))
        .build(),
    )
    .build();
  let m = marshaler(route);

  let layout = m.layout();
  assert_eq!(layout.get("text__query").map(|b| &b.target), Some(&ArgumentTarget::Parameter(1)));
  assert_eq!(
    layout.get("text").map(|b| &b.target),
    Some(&ArgumentTarget::BodyProperty("text".to_string()))
  );
  assert_eq!(layout.required_arguments().collect::<Vec<_>>(), vec!["id", "text"]);

  let request = m
    .marshal(&args(json!({ "id": 7, "text": "hello", "text__query": "q", "pinned": true })))
    .unwrap();
  assert_eq!(request.path_and_query(), "/users/7/notes?text=q");

  let body = request.body.unwrap();
  assert_eq!(body.content_type, "application/json");
  let sent: Value = serde_json::from_slice(&body.data).unwrap();
  assert_eq!(sent, json!({ "text": "hello", "pinned": true }));
}

#[test]
fn test_body_through_definition_reference() {
  let mut definitions = serde_json::Map::new();
  definitions.insert(
    "NewPet".to_string(),
    json!({ "type": "object", "required": ["name"], "properties": { "name": { "type": "string" } } }),
  );
  let route = Route::builder()
    .method(Method::POST)
    .path("/pets")
    .request_body(
      RequestBodyInfo::builder()
        .required(true)
        .schema(json!({ "$ref": "#/$defs/NewPet" }))
        .build(),
    )
    .definitions(definitions)
    .build();
  let m = marshaler(route);

  let err = m.validate(&args(json!({}))).unwrap_err();
  assert_eq!(err.missing_names(), ["name"]);

  let request = m.marshal(&args(json!({ "name": "Rex" }))).unwrap();
  let sent: Value = serde_json::from_slice(&request.body.unwrap().data).unwrap();
  assert_eq!(sent, json!({ "name": "Rex" }));
}

#[test]
fn test_non_object_bodies() {
  let cases = [
    ("text/plain", json!("raw text"), "raw text"),
    ("application/json", json!([1, 2]), "[1,2]"),
    ("application/xml", json!("<a/>"), "\"<a/>\""),
  ];
  for (content_type, value, expected) in cases {
    let route = Route::builder()
      .method(Method::PUT)
      .path("/blob")
      .request_body(
        RequestBodyInfo::builder()
          .content_types(vec![content_type.to_string()])
          .schema(json!({ "type": "string" }))
          .build(),
      )
      .build();
    let m = marshaler(route);
    assert!(m.layout().get(BODY_ARGUMENT).is_some());

    let request = m.marshal(&args(json!({ "body": value }))).unwrap();
    let body = request.body.unwrap();
    assert_eq!(String::from_utf8(body.data).unwrap(), expected, "failed for input {content_type:?}");
  }
}

#[test]
fn test_form_urlencoded_body() {
  let route = Route::builder()
    .method(Method::POST)
    .path("/login")
    .request_body(
      RequestBodyInfo::builder()
        .content_types(vec!["application/x-www-form-urlencoded".to_string()])
        .schema(json!({
          "type": "object",
          "properties": { "user": {}, "scopes": {}, "note": {} }
        }))
        .build(),
    )
    .build();
  let request = marshaler(route)
    .marshal(&args(json!({ "user": "ann lee", "scopes": ["read", "write"], "note": null })))
    .unwrap();
  let body = request.body.unwrap();
  assert_eq!(body.content_type, "application/x-www-form-urlencoded");
  assert_eq!(
    String::from_utf8(body.data).unwrap(),
    "user=ann%20lee&scopes=read&scopes=write"
  );
}

#[test]
fn test_optional_body_omitted_without_arguments() {
  let route = Route::builder()
    .method(Method::PATCH)
    .path("/settings")
    .request_body(
      RequestBodyInfo::builder()
        .schema(json!({ "type": "object", "properties": { "theme": { "type": "string" } } }))
        .build(),
    )
    .build();
  let request = marshaler(route).marshal(&args(json!({}))).unwrap();
  assert!(request.body.is_none());
}

#[test]
fn test_required_parameter_default() {
  let route = Route::builder()
    .method(Method::GET)
    .path("/list")
    .parameters(vec![
      ParameterInfo::query("limit")
        .with_required(true)
        .with_schema(json!({ "type": "integer", "default": 20 })),
    ])
    .build();
  let request = marshaler(route).marshal(&args(json!({}))).unwrap();
  assert_eq!(request.query_string(), "limit=20");
}

#[test]
fn test_invalid_templates_are_rejected() {
  let route = Route::builder().method(Method::GET).path("/users/{id").build();
  assert!(matches!(
    RequestMarshaler::new(Arc::new(route)).unwrap_err(),
    PathParseError::UnclosedBrace { .. }
  ));
}
