use crate::error::Result;
use crate::request::{RouteRequest, HTTP_X_REQUESTED_WITH};
use crate::route::RoutePattern;

use super::{validate_commands, RouteOption};

/// Default tag for XMLHttpRequest-only routes
pub const XHR_COMMAND: &str = "XHR";

const XML_HTTP_REQUEST: &str = "XMLHttpRequest";

/// Restricts tagged routes to requests sent with `X-Requested-With: XMLHttpRequest`
///
/// Routes that do not carry the tag always pass. The header value is compared
/// ignoring ASCII case, so `xmlhttprequest` is accepted as well.
#[derive(Debug, Clone)]
pub struct XhrOption {
    commands: Vec<String>,
}

impl XhrOption {
    pub fn new() -> Self {
        Self {
            commands: vec![XHR_COMMAND.to_string()],
        }
    }

    /// Option answering to a custom tag
    pub fn with_command(command: impl Into<String>) -> Result<Self> {
        Ok(Self {
            commands: validate_commands([command])?,
        })
    }

    fn command(&self) -> &str {
        self.commands.first().map(String::as_str).unwrap_or(XHR_COMMAND)
    }
}

impl Default for XhrOption {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteOption for XhrOption {
    fn commands(&self) -> &[String] {
        &self.commands
    }

    fn validate(&self, request: &dyn RouteRequest, route: &RoutePattern) -> bool {
        if !route.has_option(self.command()) {
            return true;
        }
        request
            .header(HTTP_X_REQUESTED_WITH)
            .eq_ignore_ascii_case(XML_HTTP_REQUEST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::FunctionHandler;
    use crate::request::ServerRequest;
    use crate::route::Endpoint;
    use crate::value::Value;
    use std::sync::Arc;

    fn route(options: &[&str]) -> RoutePattern {
        RoutePattern::new(
            "a",
            Endpoint::function(|_| Ok(Value::Null)),
            Arc::new(FunctionHandler::new()),
        )
        .unwrap()
        .with_options(options.iter().copied())
    }

    #[test]
    fn test_untagged_route_passes() {
        let request = ServerRequest::builder("/a").build();
        assert!(XhrOption::new().validate(&request, &route(&["GET"])));
    }

    #[test]
    fn test_tagged_route_requires_header() {
        let option = XhrOption::new();
        let plain = ServerRequest::builder("/a").build();
        assert!(!option.validate(&plain, &route(&["XHR"])));

        for header in ["XMLHttpRequest", "XMLHTTPRequest", "xmlhttprequest"] {
            let xhr = ServerRequest::builder("/a")
                .header(HTTP_X_REQUESTED_WITH, header)
                .build();
            assert!(option.validate(&xhr, &route(&["XHR"])), "{}", header);
        }

        let fetch = ServerRequest::builder("/a")
            .header(HTTP_X_REQUESTED_WITH, "fetch")
            .build();
        assert!(!option.validate(&fetch, &route(&["XHR"])));
    }

    #[test]
    fn test_custom_command() {
        let option = XhrOption::with_command("AJAX").unwrap();
        let plain = ServerRequest::builder("/a").build();
        assert!(option.validate(&plain, &route(&["XHR"])));
        assert!(!option.validate(&plain, &route(&["AJAX"])));
        assert!(XhrOption::with_command("no way").is_err());
    }
}
