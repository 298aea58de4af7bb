use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::debug;

use crate::error::{Result, RouteError};
use crate::handler::{ClassHandler, RouteHandler};
use crate::request::RouteRequest;
use crate::resolver::ClassRegistry;
use crate::route::{Endpoint, RoutePattern};

use super::compile::{compile, ConfigDialect, RouteEntry};
use super::source::RouteConfig;
use super::{Candidates, RouteBuckets, RouteFactory};

/// Turns a compiled entry into a route
pub type RouteBuilder = Arc<dyn Fn(RouteEntry) -> Result<RoutePattern> + Send + Sync>;

/// Route table compiled from a nested [`RouteConfig`] on first lookup
///
/// Compilation happens at most once. A failed compilation is not kept and is
/// reported again on the next lookup.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use serde_json::json;
/// use switchboard::{ClassRegistry, NestedRouteTable, RouteConfig, RouteFactory, ServerRequest};
///
/// let config = RouteConfig::from_value(json!({
///     "path5": {"(\\d+)": [["A", "get"], ["B", "get"]]}
/// }));
/// let table = NestedRouteTable::new(config, Arc::new(ClassRegistry::new()));
///
/// let request = ServerRequest::builder("a/b").build();
/// let classes: Vec<String> = table
///     .possible_routes(&request)
///     .unwrap()
///     .map(|route| route.unwrap().endpoint().class_name().unwrap().to_string())
///     .collect();
/// assert_eq!(classes, vec!["A", "B"]);
/// ```
pub struct NestedRouteTable {
    config: RouteConfig,
    dialect: ConfigDialect,
    builder: RouteBuilder,
    compiled: OnceCell<RouteBuckets>,
}

impl NestedRouteTable {
    /// Table whose entries dispatch to classes of `registry`
    pub fn new(config: RouteConfig, registry: Arc<ClassRegistry>) -> Self {
        let handler: Arc<dyn RouteHandler> = Arc::new(ClassHandler::new(registry));
        Self::with_builder(config, class_route_builder(handler))
    }

    /// Table with a custom entry-to-route builder
    pub fn with_builder(config: RouteConfig, builder: RouteBuilder) -> Self {
        Self {
            config,
            dialect: ConfigDialect::default(),
            builder,
            compiled: OnceCell::new(),
        }
    }

    pub fn with_dialect(mut self, dialect: ConfigDialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn dialect(&self) -> ConfigDialect {
        self.dialect
    }

    /// The compiled route buckets, compiling on first call
    pub fn buckets(&self) -> Result<&RouteBuckets> {
        self.compiled.get_or_try_init(|| {
            let entries = compile(self.config.get()?, self.dialect)?;

            let mut buckets = RouteBuckets::new();
            for entry in entries {
                let path = entry.path.clone();
                buckets.insert(&path, (self.builder)(entry));
            }

            debug!(routes = buckets.len(), dialect = ?self.dialect, "compiled nested route table");
            Ok(buckets)
        })
    }
}

impl fmt::Debug for NestedRouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NestedRouteTable")
            .field("config", &self.config)
            .field("dialect", &self.dialect)
            .field("compiled", &self.compiled.get().is_some())
            .finish_non_exhaustive()
    }
}

impl RouteFactory for NestedRouteTable {
    fn possible_routes<'a>(&'a self, request: &dyn RouteRequest) -> Result<Candidates<'a>> {
        Ok(self.buckets()?.candidates(request.uri()))
    }
}

/// Builder producing class-endpoint routes dispatched through `handler`
///
/// An entry with an empty or missing class is a configuration error.
pub fn class_route_builder(handler: Arc<dyn RouteHandler>) -> RouteBuilder {
    Arc::new(move |entry: RouteEntry| -> Result<RoutePattern> {
        let class = match entry.class {
            Some(class) if !class.is_empty() => class,
            _ => {
                return Err(RouteError::configuration(format!(
                    "class for path {} must not be empty",
                    entry.path
                )))
            }
        };

        Ok(
            RoutePattern::new(entry.path, Endpoint::class(class, entry.method), handler.clone())?
                .with_options(entry.options)
                .with_context(entry.context),
        )
    })
}
