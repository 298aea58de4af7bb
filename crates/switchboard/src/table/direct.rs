use std::sync::Arc;

use crate::args::Arguments;
use crate::config::RouterSettings;
use crate::error::Result;
use crate::handler::{FunctionHandler, RouteHandler};
use crate::request::RouteRequest;
use crate::route::{Endpoint, EndpointFn, RoutePattern};
use crate::value::{Context, Value};

use super::{Candidates, RouteBuckets, RouteFactory};

/// Route table built by registering routes in code
///
/// Routes are compiled on registration. By default endpoints are dispatched
/// through a [`FunctionHandler`].
///
/// # Examples
///
/// ```
/// use switchboard::{Arguments, RouteTable, Router, ServerRequest, OptionRegistry, Value};
///
/// let table = RouteTable::new()
///     .with_function("users/(\\d+)", |args: Arguments| Ok(args.index(0).cloned().unwrap_or(Value::Null)))
///     .unwrap();
///
/// let router = Router::new(table, OptionRegistry::http());
/// let request = ServerRequest::builder("/users/7").build();
/// assert_eq!(router.route(&request).unwrap(), Value::Int(7));
/// ```
#[derive(Clone)]
pub struct RouteTable {
    routes: RouteBuckets,
    handler: Arc<dyn RouteHandler>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::with_handler(Arc::new(FunctionHandler::new()))
    }

    /// Table whose function endpoints always get the route context appended positionally
    pub fn functional() -> Self {
        Self::with_handler(Arc::new(FunctionHandler::always_append()))
    }

    pub fn with_handler(handler: Arc<dyn RouteHandler>) -> Self {
        Self {
            routes: RouteBuckets::new(),
            handler,
        }
    }

    /// Table whose function handler follows `settings`
    pub fn from_settings(settings: &RouterSettings) -> Self {
        let handler = FunctionHandler::new()
            .with_context_for_named_arguments(settings.add_context_to_named_arguments);
        Self::with_handler(Arc::new(handler))
    }

    /// Builds a table from template and function pairs
    pub fn from_functions<I, S>(routes: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, EndpointFn)>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for (pattern, function) in routes {
            table.add(pattern, Endpoint::Function(function), Vec::<String>::new(), Context::new())?;
        }
        Ok(table)
    }

    /// Registers an endpoint with options and context using this table's handler
    pub fn add<I, S>(
        &mut self,
        pattern: impl Into<String>,
        endpoint: Endpoint,
        options: I,
        context: Context,
    ) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let route = RoutePattern::new(pattern, endpoint, self.handler.clone())?
            .with_options(options)
            .with_context(context);
        Ok(self.add_route(route))
    }

    pub fn add_function<F>(&mut self, pattern: impl Into<String>, function: F) -> Result<&mut Self>
    where
        F: Fn(Arguments) -> Result<Value> + Send + Sync + 'static,
    {
        self.add(pattern, Endpoint::function(function), Vec::<String>::new(), Context::new())
    }

    pub fn with_function<F>(mut self, pattern: impl Into<String>, function: F) -> Result<Self>
    where
        F: Fn(Arguments) -> Result<Value> + Send + Sync + 'static,
    {
        self.add_function(pattern, function)?;
        Ok(self)
    }

    /// Registers an already built route, keeping its own handler
    pub fn add_route(&mut self, route: RoutePattern) -> &mut Self {
        let path = route.path().to_string();
        self.routes.insert(&path, Ok(route));
        self
    }

    pub fn with_route(mut self, route: RoutePattern) -> Self {
        self.add_route(route);
        self
    }

    pub fn routes(&self) -> &RouteBuckets {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteTable")
            .field("routes", &self.routes)
            .finish_non_exhaustive()
    }
}

impl RouteFactory for RouteTable {
    fn possible_routes<'a>(&'a self, request: &dyn RouteRequest) -> Result<Candidates<'a>> {
        Ok(self.routes.candidates(request.uri()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::ServerRequest;

    #[test]
    fn test_empty_pattern_is_rejected() {
        let mut table = RouteTable::new();
        let err = table.add_function("", |_| Ok(Value::Null)).unwrap_err();
        assert!(err.is_configuration());
        assert!(table.is_empty());
    }

    #[test]
    fn test_possible_routes_by_bucket() {
        let table = RouteTable::new()
            .with_function("a", |_| Ok(Value::Int(0)))
            .unwrap()
            .with_function("a/b/c", |_| Ok(Value::Int(2)))
            .unwrap();

        let request = ServerRequest::builder("a/b").build();
        let paths: Vec<&str> = table
            .possible_routes(&request)
            .unwrap()
            .map(|route| route.unwrap().path())
            .collect();
        assert_eq!(paths, vec!["a"]);
    }

    #[test]
    fn test_from_functions() {
        let function: EndpointFn = Arc::new(|_: Arguments| -> Result<Value> { Ok(Value::Bool(true)) });
        let table = RouteTable::from_functions([("x", function.clone()), ("y", function)]).unwrap();
        assert_eq!(table.len(), 2);
    }
}
