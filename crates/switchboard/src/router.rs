//! Request routing: candidate scan, option validation and dispatch

use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::config::RouterSettings;
use crate::error::{Result, RouteError};
use crate::option::OptionRegistry;
use crate::request::RouteRequest;
use crate::resolver::ClassRegistry;
use crate::route::{RouteMatch, RoutePattern};
use crate::table::{NestedRouteTable, RouteConfig, RouteFactory};
use crate::value::Value;

/// Routes requests to the first candidate that matches and passes its options
///
/// Candidates come from the router's [`RouteFactory`]. For each one the URI is
/// matched against the route template, then every option tag on the route is
/// checked against the [`OptionRegistry`]. A failed match or a rejecting
/// option moves on to the next candidate; any other error ends the lookup.
///
/// # Examples
///
/// ```
/// use switchboard::{Arguments, OptionRegistry, Router, RouteTable, ServerRequest, Value};
///
/// let table = RouteTable::new()
///     .with_function("hello/(\\w+)", |args: Arguments| {
///         Ok(Value::from(format!("hello {}", args.index(0).cloned().unwrap_or(Value::Null))))
///     })
///     .unwrap();
/// let router = Router::new(table, OptionRegistry::http());
///
/// let request = ServerRequest::builder("/hello/world").build();
/// assert_eq!(router.route(&request).unwrap(), Value::from("hello world"));
///
/// let missing = ServerRequest::builder("/goodbye").build();
/// assert!(router.route(&missing).unwrap_err().is_not_found());
/// ```
#[derive(Clone)]
pub struct Router {
    factory: Arc<dyn RouteFactory>,
    options: OptionRegistry,
    strict: bool,
}

impl Router {
    /// Strict router over `factory`
    pub fn new(factory: impl RouteFactory + 'static, options: OptionRegistry) -> Self {
        Self {
            factory: Arc::new(factory),
            options,
            strict: true,
        }
    }

    /// Router following `settings`
    pub fn from_settings(
        factory: impl RouteFactory + 'static,
        options: OptionRegistry,
        settings: &RouterSettings,
    ) -> Self {
        Self::new(factory, options).with_strict(settings.strict)
    }

    /// Router over a nested route configuration dispatching to `registry`
    pub fn from_config(
        config: RouteConfig,
        registry: Arc<ClassRegistry>,
        options: OptionRegistry,
        settings: &RouterSettings,
    ) -> Self {
        let table = NestedRouteTable::new(config, registry).with_dialect(settings.dialect);
        Self::from_settings(table, options, settings)
    }

    /// Whether unknown option tags are errors (`true`) or skipped (`false`)
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn options(&self) -> &OptionRegistry {
        &self.options
    }

    pub fn factory(&self) -> &dyn RouteFactory {
        self.factory.as_ref()
    }

    /// Finds the route serving `request` without executing it
    pub fn match_route<'a>(&'a self, request: &dyn RouteRequest) -> Result<RouteMatch<'a>> {
        let uri = request.uri();

        for candidate in self.factory.possible_routes(request)? {
            let route = candidate?;
            trace!(path = route.path(), "trying route");

            let Some(args) = route.matches(uri) else {
                continue;
            };

            if self.valid_options(request, route)? {
                return Ok(RouteMatch { route, args });
            }
        }

        Err(RouteError::NotFound(uri.to_string()))
    }

    /// Routes `request` and runs the matched endpoint
    #[tracing::instrument(level = "debug", skip(self, request), fields(uri = request.uri()))]
    pub fn route(&self, request: &dyn RouteRequest) -> Result<Value> {
        let matched = self.match_route(request)?;
        debug!(path = matched.path(), endpoint = ?matched.route.endpoint(), "dispatching");
        matched.execute()
    }

    fn valid_options(&self, request: &dyn RouteRequest, route: &RoutePattern) -> Result<bool> {
        for tag in route.options() {
            if !self.options.has_option(&[tag.as_str()])? {
                if self.strict {
                    return Err(RouteError::configuration(format!(
                        "The requested route lists option \"{}\", which is not currently configured within this router.",
                        tag
                    )));
                }
                warn!(option = %tag, path = route.path(), "skipping unknown route option");
                continue;
            }

            for option in self.options.options_for(&[tag.as_str()])? {
                if !option.validate(request, route) {
                    trace!(option = %tag, path = route.path(), "route rejected by option");
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("options", &self.options)
            .field("strict", &self.strict)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::Arguments;
    use crate::request::ServerRequest;
    use crate::table::RouteTable;

    fn table() -> RouteTable {
        RouteTable::new()
            .with_function("a/(\\d+)", |args: Arguments| Ok(args.index(0).cloned().unwrap_or(Value::Null)))
            .unwrap()
    }

    #[test]
    fn test_match_route_without_executing() {
        let router = Router::new(table(), OptionRegistry::http());
        let request = ServerRequest::builder("/a/3").build();

        let matched = router.match_route(&request).unwrap();
        assert_eq!(matched.path(), "a/(\\d+)");
        assert_eq!(matched.args.index(0), Some(&Value::Int(3)));
    }

    #[test]
    fn test_not_found_carries_uri() {
        let router = Router::new(table(), OptionRegistry::http());
        let request = ServerRequest::builder("/a/x").build();
        let err = router.route(&request).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "no route matches \"/a/x\"");
    }

    #[test]
    fn test_strict_from_settings() {
        let settings = RouterSettings {
            strict: false,
            ..RouterSettings::default()
        };
        let router = Router::from_settings(table(), OptionRegistry::new(), &settings);
        assert!(!router.is_strict());
    }
}
