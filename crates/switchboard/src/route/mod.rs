pub mod endpoint;
pub mod pattern;

use crate::args::Arguments;
use crate::error::Result;
use crate::value::Value;

pub use endpoint::{Endpoint, EndpointFn};
pub use pattern::{RoutePattern, ARGS_CAPTURED};

/// A route that accepted a request, with the arguments captured from its URI
#[derive(Debug, Clone)]
pub struct RouteMatch<'a> {
    pub route: &'a RoutePattern,
    pub args: Arguments,
}

impl<'a> RouteMatch<'a> {
    pub fn path(&self) -> &'a str {
        self.route.path()
    }

    /// Dispatches to the route's endpoint
    pub fn execute(self) -> Result<Value> {
        self.route.execute(self.args)
    }
}
