//! # Switchboard
//!
//! A regex-pattern request router with typed argument binding:
//! - Route templates are anchored regular expressions (`users/(\d+)`)
//! - Routes are bucketed by separator count, so a URI is only tried against
//!   templates that could possibly match it
//! - Captured segments are cast (`"42"` → `42`, `"2.5"` → `2.5`)
//! - Route options (`GET`, `XHR`, ...) validate a request after its path matches
//! - Endpoints are functions, object methods or class methods; arguments are
//!   bound to declared signatures by position or name
//!
//! ## Route Tables
//!
//! - [`RouteTable`]: routes registered in code
//! - [`NestedRouteTable`]: routes compiled on first lookup from a nested
//!   JSON/TOML configuration
//! - [`RouteFactoryGroup`]: several tables consulted in order
//!
//! ## Errors
//!
//! [`RouteError::NotFound`] is the only expected failure of a lookup. Every
//! other error points at broken route data or endpoint metadata and is
//! propagated as-is.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use switchboard::{
//!     ClassDef, ClassRegistry, MethodDef, OptionRegistry, Param, RouteConfig, Router,
//!     RouterSettings, ServerRequest, Signature, Value,
//! };
//!
//! #[derive(Default)]
//! struct Users;
//!
//! let users = ClassDef::with_default::<Users>("Users").with_method(MethodDef::instance(
//!     "show",
//!     Signature::new().with(Param::new("id", ["int"])),
//!     |_this, args| Ok(args[0].clone()),
//! ));
//! let registry = Arc::new(ClassRegistry::new().with_class(users));
//!
//! let config = RouteConfig::from_json_str(r#"{"users": {"(\\d+)": ["Users", "show", "GET"]}}"#);
//! let router = Router::from_config(config, registry, OptionRegistry::http(), &RouterSettings::default());
//!
//! let request = ServerRequest::builder("/users/42").method("GET").build();
//! assert_eq!(router.route(&request).unwrap(), Value::Int(42));
//!
//! let request = ServerRequest::builder("/users/42").method("POST").build();
//! assert!(router.route(&request).unwrap_err().is_not_found());
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

mod args;
mod config;
mod error;
mod handler;
mod option;
pub mod path;
mod request;
mod resolver;
mod route;
mod router;
mod table;
mod value;

// ============================================================================
// Public API
// ============================================================================

pub use args::{ArgKey, Arguments};
pub use config::RouterSettings;
pub use error::{Result, RouteError};
pub use handler::{ClassHandler, FunctionHandler, RouteHandler};
pub use option::{validate_commands, MethodOption, OptionRegistry, RouteOption, XhrOption};
pub use request::{
    RouteRequest, ServerRequest, ServerRequestBuilder, HTTP_X_REQUESTED_WITH, REQUEST_METHOD,
    REQUEST_URI,
};
pub use resolver::{
    context_arguments, has_class_arguments, ArgumentResolver, ClassDef, ClassRegistry,
    Constructor, InstanceResolver, MethodDef, Param, Signature, TypeHint, ARGS_CLASS,
    ARGS_METHOD, CONTEXT_ARGUMENT,
};
pub use route::{Endpoint, EndpointFn, RouteMatch, RoutePattern, ARGS_CAPTURED};
pub use router::Router;
pub use table::{
    class_route_builder, compile, Candidates, ConfigDialect, NestedRouteTable, RouteBuckets,
    RouteBuilder, RouteConfig, RouteEntry, RouteFactory, RouteFactoryGroup, RouteTable,
    MULTI_ROUTE_SUFFIX,
};
pub use value::{Context, Object, Value};
