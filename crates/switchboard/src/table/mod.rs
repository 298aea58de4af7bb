//! Route tables: where the router gets its candidate routes from
//!
//! Every table implements [`RouteFactory`]. Tables store routes in
//! [`RouteBuckets`] and hand out a lazy, single-pass sequence of candidates
//! for each request.

mod buckets;
mod compile;
mod direct;
mod group;
mod nested;
mod source;

pub use buckets::RouteBuckets;
pub use compile::{compile, ConfigDialect, RouteEntry, MULTI_ROUTE_SUFFIX};
pub use direct::RouteTable;
pub use group::RouteFactoryGroup;
pub use nested::{class_route_builder, NestedRouteTable, RouteBuilder};
pub use source::RouteConfig;

use std::sync::Arc;

use crate::error::Result;
use crate::request::RouteRequest;
use crate::route::RoutePattern;

/// Candidate routes for one request, consumed once
pub type Candidates<'a> = Box<dyn Iterator<Item = Result<&'a RoutePattern>> + 'a>;

/// Produces the candidate routes for a request
pub trait RouteFactory: Send + Sync {
    fn possible_routes<'a>(&'a self, request: &dyn RouteRequest) -> Result<Candidates<'a>>;
}

impl<T: RouteFactory + ?Sized> RouteFactory for Arc<T> {
    fn possible_routes<'a>(&'a self, request: &dyn RouteRequest) -> Result<Candidates<'a>> {
        (**self).possible_routes(request)
    }
}

impl<T: RouteFactory + ?Sized> RouteFactory for &T {
    fn possible_routes<'a>(&'a self, request: &dyn RouteRequest) -> Result<Candidates<'a>> {
        (**self).possible_routes(request)
    }
}
