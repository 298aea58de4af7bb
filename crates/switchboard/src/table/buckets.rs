use std::collections::BTreeMap;

use crate::error::Result;
use crate::path::{bucket_of, uri_bucket};
use crate::route::RoutePattern;

use super::Candidates;

/// Routes registered under one template, in registration order
#[derive(Debug, Clone)]
struct PathGroup {
    path: String,
    routes: Vec<Result<RoutePattern>>,
}

/// Routes partitioned by the number of separators in their template
///
/// A route that failed to build is kept in place and reported when a lookup
/// reaches it, so one broken entry does not take down the rest of the table.
#[derive(Debug, Clone, Default)]
pub struct RouteBuckets {
    buckets: BTreeMap<usize, Vec<PathGroup>>,
    len: usize,
}

impl RouteBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a route under `path`, after any route already registered for it
    pub fn insert(&mut self, path: &str, route: Result<RoutePattern>) {
        let groups = self.buckets.entry(bucket_of(path)).or_default();
        match groups.iter_mut().find(|group| group.path == path) {
            Some(group) => group.routes.push(route),
            None => groups.push(PathGroup {
                path: path.to_string(),
                routes: vec![route],
            }),
        }
        self.len += 1;
    }

    /// Candidate routes for `uri`
    ///
    /// Buckets are scanned from the URI's own separator count down to 0.
    /// Inside a bucket, paths come in first-registration order and routes
    /// sharing a path in registration order.
    pub fn candidates(&self, uri: &str) -> Candidates<'_> {
        let start = uri_bucket(uri);
        Box::new(
            self.buckets
                .range(..=start)
                .rev()
                .flat_map(|(_, groups)| groups.iter())
                .flat_map(|group| group.routes.iter())
                .map(|route| route.as_ref().map_err(Clone::clone)),
        )
    }

    /// Templates stored in `bucket`, in order
    pub fn paths(&self, bucket: usize) -> Vec<&str> {
        self.buckets
            .get(&bucket)
            .map(|groups| groups.iter().map(|g| g.path.as_str()).collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RouteError;
    use crate::handler::FunctionHandler;
    use crate::route::Endpoint;
    use crate::value::Value;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn route(path: &str, tag: &str) -> Result<RoutePattern> {
        Ok(RoutePattern::new(
            path,
            Endpoint::function(|_| Ok(Value::Null)),
            Arc::new(FunctionHandler::new()),
        )?
        .with_options([tag]))
    }

    fn tags(buckets: &RouteBuckets, uri: &str) -> Vec<String> {
        buckets
            .candidates(uri)
            .map(|route| route.unwrap().options()[0].clone())
            .collect()
    }

    #[test]
    fn test_scans_downward_from_uri_bucket() {
        let mut buckets = RouteBuckets::new();
        buckets.insert("a", route("a", "zero"));
        buckets.insert("a/b", route("a/b", "one"));
        buckets.insert("a/b/c", route("a/b/c", "two"));

        assert_eq!(tags(&buckets, "a/b"), vec!["one", "zero"]);
        assert_eq!(tags(&buckets, "a/b/"), vec!["one", "zero"]);
        assert_eq!(tags(&buckets, "x/y/z/w"), vec!["two", "one", "zero"]);
        assert_eq!(tags(&buckets, "a"), vec!["zero"]);
    }

    #[test]
    fn test_same_path_keeps_registration_order() {
        let mut buckets = RouteBuckets::new();
        buckets.insert("p/(\\d+)", route("p/(\\d+)", "first"));
        buckets.insert("q/(\\d+)", route("q/(\\d+)", "other"));
        buckets.insert("p/(\\d+)", route("p/(\\d+)", "second"));

        assert_eq!(buckets.paths(1), vec!["p/(\\d+)", "q/(\\d+)"]);
        assert_eq!(tags(&buckets, "p/1"), vec!["first", "second", "other"]);
        assert_eq!(buckets.len(), 3);
    }

    #[test]
    fn test_broken_route_is_yielded_as_error() {
        let mut buckets = RouteBuckets::new();
        buckets.insert("a", Err(RouteError::configuration("broken")));
        buckets.insert("a/b", route("a/b", "ok"));

        let mut candidates = buckets.candidates("a/b");
        assert!(candidates.next().unwrap().is_ok());
        assert!(candidates.next().unwrap().unwrap_err().is_configuration());
        assert!(candidates.next().is_none());
    }
}
