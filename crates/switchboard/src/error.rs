//! Error taxonomy for routing, binding and dispatch.
//!
//! Only [`RouteError::NotFound`] is an expected outcome of a lookup. Every other
//! variant means the route table, the endpoint metadata or the endpoint itself
//! is wrong, and is propagated to the caller untouched.

use thiserror::Error;

/// Convenience alias used throughout the crate
pub type Result<T, E = RouteError> = std::result::Result<T, E>;

/// Errors produced while building route tables or routing a request
#[derive(Debug, Clone, Error)]
pub enum RouteError {
    /// Malformed route data, conflicting bindings, missing arguments,
    /// unknown route options in strict mode, and similar authoring mistakes
    #[error("route configuration error: {0}")]
    Configuration(String),

    /// A route template that does not compile as a regular expression
    #[error("invalid route pattern \"{pattern}\": {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A declared parameter carries no type information
    #[error("argument \"{0}\" has no declared type")]
    UntypedArgument(String),

    /// An object-typed parameter could not be satisfied with an instance
    #[error("route handler error: {0}")]
    Handler(String),

    /// No registered route accepted the request
    #[error("no route matches \"{0}\"")]
    NotFound(String),

    /// Raised by an endpoint that rejects the request it was handed
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Raised by an endpoint that failed while serving a matched request
    #[error("server error: {0}")]
    ServerError(String),
}

impl RouteError {
    pub fn configuration(message: impl Into<String>) -> Self {
        RouteError::Configuration(message.into())
    }

    pub fn handler(message: impl Into<String>) -> Self {
        RouteError::Handler(message.into())
    }

    /// True for configuration errors and their stricter sub-kinds
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            RouteError::Configuration(_)
                | RouteError::InvalidPattern { .. }
                | RouteError::UntypedArgument(_)
        )
    }

    pub fn is_handler(&self) -> bool {
        matches!(self, RouteError::Handler(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RouteError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untyped_is_configuration() {
        assert!(RouteError::UntypedArgument("x".into()).is_configuration());
        assert!(!RouteError::UntypedArgument("x".into()).is_handler());
    }

    #[test]
    fn test_not_found_is_distinct() {
        let err = RouteError::NotFound("/nope".into());
        assert!(err.is_not_found());
        assert!(!err.is_configuration());
        assert!(!err.is_handler());
        assert_eq!(err.to_string(), "no route matches \"/nope\"");
    }

    #[test]
    fn test_invalid_pattern_keeps_source() {
        let source = regex::Regex::new("(").unwrap_err();
        let err = RouteError::InvalidPattern {
            pattern: "(".into(),
            source,
        };
        assert!(err.is_configuration());
        assert!(std::error::Error::source(&err).is_some());
    }
}
