use crate::error::{Result, RouteError};
use crate::request::{RouteRequest, REQUEST_METHOD};
use crate::route::RoutePattern;

use super::{validate_commands, RouteOption};

/// HTTP methods a [`MethodOption`] can be enabled for
pub const HTTP_METHODS: [&str; 7] = ["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS", "HEAD"];

/// Restricts a route to the HTTP methods listed among its options
///
/// # Examples
///
/// ```
/// use switchboard::{MethodOption, RouteOption};
///
/// let option = MethodOption::new(["GET", "POST"]).unwrap();
/// assert_eq!(option.commands(), &["GET".to_string(), "POST".to_string()]);
/// assert!(MethodOption::new(["FETCH"]).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct MethodOption {
    commands: Vec<String>,
}

impl MethodOption {
    /// Option enabled for the given methods, or for all of them when none are given
    pub fn new<I, S>(methods: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let commands = validate_commands(methods)?;

        if let Some(bad) = commands.iter().find(|m| !HTTP_METHODS.contains(&m.as_str())) {
            return Err(RouteError::configuration(format!(
                "Invalid HTTP request method \"{}\". Valid methods are: \"{}\".",
                bad,
                HTTP_METHODS.join("\",\"")
            )));
        }

        if commands.is_empty() {
            return Ok(Self::all());
        }
        Ok(Self { commands })
    }

    /// Option enabled for every supported method
    pub fn all() -> Self {
        Self {
            commands: HTTP_METHODS.iter().map(|m| m.to_string()).collect(),
        }
    }
}

impl RouteOption for MethodOption {
    fn commands(&self) -> &[String] {
        &self.commands
    }

    fn validate(&self, request: &dyn RouteRequest, route: &RoutePattern) -> bool {
        let method = request.header(REQUEST_METHOD);
        route
            .options()
            .iter()
            .any(|option| option == method && self.commands.contains(option))
    }
}
