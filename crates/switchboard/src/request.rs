//! Inbound request abstraction
//!
//! The transport layer normalizes whatever it receives into something that
//! implements [`RouteRequest`]; the router only needs the URI and single-value
//! metadata lookups.

use std::collections::HashMap;

use crate::error::{Result, RouteError};

/// Server variable holding the request URI
pub const REQUEST_URI: &str = "REQUEST_URI";

/// Server variable holding the HTTP request method
pub const REQUEST_METHOD: &str = "REQUEST_METHOD";

/// Server variable holding the `X-Requested-With` header
pub const HTTP_X_REQUESTED_WITH: &str = "HTTP_X_REQUESTED_WITH";

/// A normalized request as seen by the router
pub trait RouteRequest {
    /// Request path, possibly with a trailing separator
    fn uri(&self) -> &str;

    /// All transport-level metadata
    fn headers(&self) -> &HashMap<String, String>;

    /// Single metadata value, or `""` when absent
    fn header(&self, name: &str) -> &str {
        self.headers().get(name).map(String::as_str).unwrap_or("")
    }
}

/// Request backed by a CGI-style server variable map
///
/// # Examples
///
/// ```
/// use switchboard::{RouteRequest, ServerRequest};
///
/// let request = ServerRequest::builder("/users/42")
///     .header("REQUEST_METHOD", "GET")
///     .build();
///
/// assert_eq!(request.uri(), "/users/42");
/// assert_eq!(request.header("REQUEST_METHOD"), "GET");
/// assert_eq!(request.header("HTTP_ACCEPT"), "");
/// ```
#[derive(Debug, Clone)]
pub struct ServerRequest {
    server: HashMap<String, String>,
}

impl ServerRequest {
    /// Wraps a server variable map, which must contain `REQUEST_URI`
    pub fn new(server: HashMap<String, String>) -> Result<Self> {
        if !server.contains_key(REQUEST_URI) {
            return Err(RouteError::configuration(format!(
                "server variables must contain key \"{}\"",
                REQUEST_URI
            )));
        }
        Ok(Self { server })
    }

    /// Starts a request for `uri` with no other metadata
    pub fn builder(uri: impl Into<String>) -> ServerRequestBuilder {
        let mut server = HashMap::new();
        server.insert(REQUEST_URI.to_string(), uri.into());
        ServerRequestBuilder { server }
    }
}

impl RouteRequest for ServerRequest {
    fn uri(&self) -> &str {
        self.server.get(REQUEST_URI).map(String::as_str).unwrap_or("")
    }

    fn headers(&self) -> &HashMap<String, String> {
        &self.server
    }
}

/// Builder for [`ServerRequest`]
#[derive(Debug, Clone)]
pub struct ServerRequestBuilder {
    server: HashMap<String, String>,
}

impl ServerRequestBuilder {
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.server.insert(name.into(), value.into());
        self
    }

    pub fn method(self, method: impl Into<String>) -> Self {
        self.header(REQUEST_METHOD, method)
    }

    pub fn build(self) -> ServerRequest {
        ServerRequest {
            server: self.server,
        }
    }
}
