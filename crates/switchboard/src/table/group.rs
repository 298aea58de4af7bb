use std::sync::Arc;

use crate::error::{Result, RouteError};
use crate::request::RouteRequest;

use super::{Candidates, RouteFactory};

/// Several route tables consulted in order
///
/// Candidates of the first table come first. A table that fails to produce
/// candidates only fails the lookup once the earlier tables are exhausted.
#[derive(Clone)]
pub struct RouteFactoryGroup {
    factories: Vec<Arc<dyn RouteFactory>>,
}

impl RouteFactoryGroup {
    /// Groups the given tables; an empty group is a configuration error
    pub fn new(factories: Vec<Arc<dyn RouteFactory>>) -> Result<Self> {
        if factories.is_empty() {
            return Err(RouteError::configuration(
                "A route factory group needs at least one factory",
            ));
        }
        Ok(Self { factories })
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl std::fmt::Debug for RouteFactoryGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteFactoryGroup")
            .field("factories", &self.factories.len())
            .finish()
    }
}

impl RouteFactory for RouteFactoryGroup {
    fn possible_routes<'a>(&'a self, request: &dyn RouteRequest) -> Result<Candidates<'a>> {
        let sequences: Vec<Candidates<'a>> = self
            .factories
            .iter()
            .map(|factory| match factory.possible_routes(request) {
                Ok(candidates) => candidates,
                Err(e) => Box::new(std::iter::once(Err(e))) as Candidates<'a>,
            })
            .collect();

        Ok(Box::new(sequences.into_iter().flatten()))
    }
}
