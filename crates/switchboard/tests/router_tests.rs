//! Integration tests for the router
//!
//! Covers:
//! - Bucket pruning and trailing separators
//! - Capture casting through function endpoints
//! - Option validation and strictness
//! - Factory groups
//! - Not-found handling

use pretty_assertions::assert_eq;
use rstest::rstest;
use std::sync::Arc;
use switchboard::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

fn first_arg(args: Arguments) -> Result<Value> {
    Ok(args.index(0).cloned().unwrap_or(Value::Null))
}

fn tagged(path: &str, options: &[&str], result: i64) -> RoutePattern {
    RoutePattern::new(
        path,
        Endpoint::function(move |_| Ok(Value::Int(result))),
        Arc::new(FunctionHandler::new()),
    )
    .unwrap()
    .with_options(options.iter().copied())
}

// ============================================================================
// Matching
// ============================================================================

#[test]
fn test_function_endpoint_receives_integer_capture() {
    init_tracing();
    let table = RouteTable::new().with_function("test/(\\d+)", first_arg).unwrap();
    let router = Router::new(table, OptionRegistry::http());

    let request = ServerRequest::builder("test/42").build();
    assert_eq!(router.route(&request).unwrap(), Value::Int(42));
}

#[test]
fn test_single_capture_is_cast() {
    let table = RouteTable::new().with_function("(\\d+)", first_arg).unwrap();
    let router = Router::new(table, OptionRegistry::http());

    let request = ServerRequest::builder("/42").build();
    assert_eq!(router.route(&request).unwrap(), Value::Int(42));
}

#[rstest]
#[case("/users/7")]
#[case("/users/abc")]
#[case("/posts")]
#[case("/users/7/edit")]
fn test_trailing_separator_gives_same_result(#[case] uri: &str) {
    let table = RouteTable::new()
        .with_function("users/(\\d+)", first_arg)
        .unwrap()
        .with_function("users/(\\d+)/edit", |_| Ok(Value::from("edit")))
        .unwrap()
        .with_function("posts", |_| Ok(Value::from("posts")))
        .unwrap();
    let router = Router::new(table, OptionRegistry::http());

    let plain = router.route(&ServerRequest::builder(uri).build());
    let slashed = router.route(&ServerRequest::builder(format!("{}/", uri)).build());

    match (plain, slashed) {
        (Ok(a), Ok(b)) => assert_eq!(a, b),
        (Err(a), Err(b)) => {
            assert!(a.is_not_found());
            assert!(b.is_not_found());
        }
        (a, b) => panic!("results differ: {:?} vs {:?}", a, b),
    }
}

#[test]
fn test_deeper_templates_are_never_tried() {
    // the alternation matches "/x/y", but the template sits in bucket 3
    let table = RouteTable::new()
        .with_function("(?:x/y|q/r/s)", |_| Ok(Value::Bool(true)))
        .unwrap();
    let router = Router::new(table, OptionRegistry::http());

    assert!(router
        .route(&ServerRequest::builder("/x/y").build())
        .unwrap_err()
        .is_not_found());
    assert_eq!(
        router.route(&ServerRequest::builder("/q/r/s").build()).unwrap(),
        Value::Bool(true)
    );
}

#[test]
fn test_shallower_templates_are_tried_last() {
    let table = RouteTable::new()
        .with_function("(.*)", |_| Ok(Value::from("catch-all")))
        .unwrap()
        .with_function("a/(\\w+)", |_| Ok(Value::from("specific")))
        .unwrap();
    let router = Router::new(table, OptionRegistry::http());

    let request = ServerRequest::builder("/a/b").build();
    assert_eq!(router.route(&request).unwrap(), Value::from("specific"));

    let request = ServerRequest::builder("/c/d").build();
    assert_eq!(router.route(&request).unwrap(), Value::from("catch-all"));
}

#[test]
fn test_not_found() {
    let table = RouteTable::new().with_function("a", first_arg).unwrap();
    let router = Router::new(table, OptionRegistry::http());

    let err = router.route(&ServerRequest::builder("/b").build()).unwrap_err();
    assert!(err.is_not_found());
    assert!(!err.is_configuration());
}

#[test]
fn test_endpoint_errors_propagate() {
    let table = RouteTable::new()
        .with_function("boom", |_| Err(RouteError::ServerError("exploded".into())))
        .unwrap()
        .with_function("(.*)", |_| Ok(Value::Null))
        .unwrap();
    let router = Router::new(table, OptionRegistry::http());

    let err = router.route(&ServerRequest::builder("/boom").build()).unwrap_err();
    assert_eq!(err.to_string(), "server error: exploded");
}

// ============================================================================
// Options
// ============================================================================

#[rstest]
#[case("GET", 1)]
#[case("POST", 2)]
fn test_rejecting_option_falls_through(#[case] method: &str, #[case] expected: i64) {
    let table = RouteTable::new()
        .with_route(tagged("items", &["GET"], 1))
        .with_route(tagged("items", &["POST"], 2));
    let router = Router::new(table, OptionRegistry::http());

    let request = ServerRequest::builder("/items").method(method).build();
    assert_eq!(router.route(&request).unwrap(), Value::Int(expected));
}

#[test]
fn test_no_acceptable_option_is_not_found() {
    let table = RouteTable::new().with_route(tagged("items", &["GET"], 1));
    let router = Router::new(table, OptionRegistry::http());

    let request = ServerRequest::builder("/items").method("DELETE").build();
    assert!(router.route(&request).unwrap_err().is_not_found());
}

#[test]
fn test_xhr_option() {
    let table = RouteTable::new()
        .with_route(tagged("feed", &["GET", "XHR"], 1))
        .with_route(tagged("feed", &["GET"], 2));
    let router = Router::new(table, OptionRegistry::http());

    let ajax = ServerRequest::builder("/feed")
        .method("GET")
        .header(HTTP_X_REQUESTED_WITH, "xmlhttprequest")
        .build();
    assert_eq!(router.route(&ajax).unwrap(), Value::Int(1));

    let plain = ServerRequest::builder("/feed").method("GET").build();
    assert_eq!(router.route(&plain).unwrap(), Value::Int(2));
}

#[test]
fn test_unknown_option_is_error_when_strict() {
    let table = RouteTable::new().with_route(tagged("admin", &["ADMIN"], 1));
    let router = Router::new(table, OptionRegistry::http());

    let err = router.route(&ServerRequest::builder("/admin").build()).unwrap_err();
    assert!(err.is_configuration());
    assert_eq!(
        err.to_string(),
        "route configuration error: The requested route lists option \"ADMIN\", which is not \
         currently configured within this router."
    );
}

#[test]
fn test_unknown_option_is_skipped_when_lenient() {
    init_tracing();
    let table = RouteTable::new().with_route(tagged("admin", &["ADMIN", "GET"], 1));
    let router = Router::new(table, OptionRegistry::http()).with_strict(false);

    let get = ServerRequest::builder("/admin").method("GET").build();
    assert_eq!(router.route(&get).unwrap(), Value::Int(1));

    // known tags are still enforced
    let post = ServerRequest::builder("/admin").method("POST").build();
    assert!(router.route(&post).unwrap_err().is_not_found());
}

#[test]
fn test_custom_option() {
    #[derive(Debug)]
    struct Beta {
        commands: Vec<String>,
    }

    impl RouteOption for Beta {
        fn commands(&self) -> &[String] {
            &self.commands
        }

        fn validate(&self, request: &dyn RouteRequest, _route: &RoutePattern) -> bool {
            request.header("HTTP_X_BETA") == "1"
        }
    }

    let options = OptionRegistry::http().with_option(Beta {
        commands: validate_commands(["BETA"]).unwrap(),
    });
    let table = RouteTable::new()
        .with_route(tagged("home", &["BETA"], 1))
        .with_route(tagged("home", &[], 2));
    let router = Router::new(table, options);

    let beta = ServerRequest::builder("/home").header("HTTP_X_BETA", "1").build();
    assert_eq!(router.route(&beta).unwrap(), Value::Int(1));
    assert_eq!(
        router.route(&ServerRequest::builder("/home").build()).unwrap(),
        Value::Int(2)
    );
}

// ============================================================================
// Factories
// ============================================================================

#[test]
fn test_group_of_tables() {
    let api = RouteTable::new()
        .with_function("api/(\\d+)", |_| Ok(Value::from("api")))
        .unwrap();
    let site = RouteTable::new()
        .with_function("(.*)", |_| Ok(Value::from("site")))
        .unwrap();
    let group = RouteFactoryGroup::new(vec![Arc::new(api), Arc::new(site)]).unwrap();
    let router = Router::new(group, OptionRegistry::http());

    assert_eq!(
        router.route(&ServerRequest::builder("/api/1").build()).unwrap(),
        Value::from("api")
    );
    assert_eq!(
        router.route(&ServerRequest::builder("/about").build()).unwrap(),
        Value::from("site")
    );
}

#[test]
fn test_shared_table() {
    let table = Arc::new(RouteTable::new().with_function("a", |_| Ok(Value::Int(1))).unwrap());
    let first = Router::new(table.clone(), OptionRegistry::http());
    let second = Router::new(table, OptionRegistry::new());

    let request = ServerRequest::builder("/a").build();
    assert_eq!(first.route(&request).unwrap(), second.route(&request).unwrap());
}

#[test]
fn test_named_captures_with_context_setting() {
    let settings = RouterSettings {
        add_context_to_named_arguments: true,
        ..RouterSettings::default()
    };
    let mut table = RouteTable::from_settings(&settings);
    table
        .add_function("u/(?P<id>\\d+)", |args| {
            Ok(Value::Bool(args.named("id").is_some() && args.named("context").is_some()))
        })
        .unwrap();
    let router = Router::from_settings(table, OptionRegistry::http(), &settings);

    let request = ServerRequest::builder("/u/3").build();
    assert_eq!(router.route(&request).unwrap(), Value::Bool(true));
}

#[test]
fn test_route_without_captures_gets_context_only_by_name() {
    let request = ServerRequest::builder("/about").build();

    let table = RouteTable::new()
        .with_function("about", |args| Ok(Value::Int(args.len() as i64)))
        .unwrap();
    let router = Router::new(table, OptionRegistry::http());
    assert_eq!(router.route(&request).unwrap(), Value::Int(0));

    let settings = RouterSettings {
        add_context_to_named_arguments: true,
        ..RouterSettings::default()
    };
    let mut table = RouteTable::from_settings(&settings);
    table
        .add_function("about", |args| Ok(Value::Bool(args.named("context").is_some())))
        .unwrap();
    let router = Router::from_settings(table, OptionRegistry::http(), &settings);
    assert_eq!(router.route(&request).unwrap(), Value::Bool(true));
}
