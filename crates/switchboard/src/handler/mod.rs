//! Handler strategies that turn a matched route into an endpoint call
//!
//! - [`FunctionHandler`] passes captured arguments straight to a function endpoint
//! - [`ClassHandler`] binds arguments to declared signatures for object and class endpoints

mod class;
mod function;

pub use class::ClassHandler;
pub use function::FunctionHandler;

use crate::args::Arguments;
use crate::error::Result;
use crate::route::Endpoint;
use crate::value::{Context, Value};

/// Executes an endpoint with the arguments captured for a request
pub trait RouteHandler: Send + Sync {
    fn execute(&self, endpoint: &Endpoint, args: Arguments, context: &Context) -> Result<Value>;
}

impl<T: RouteHandler + ?Sized> RouteHandler for std::sync::Arc<T> {
    fn execute(&self, endpoint: &Endpoint, args: Arguments, context: &Context) -> Result<Value> {
        (**self).execute(endpoint, args, context)
    }
}
