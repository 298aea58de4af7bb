//! Route options: router-level validators consulted after a path matches
//!
//! A route lists option tags (`"GET"`, `"XHR"`, ...). The router looks each tag
//! up in its [`OptionRegistry`] and asks every registered [`RouteOption`] for
//! that tag whether the request is acceptable.

mod method;
mod xhr;

pub use method::MethodOption;
pub use xhr::XhrOption;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{Result, RouteError};
use crate::request::RouteRequest;
use crate::route::RoutePattern;

/// A validator bound to one or more option tags
pub trait RouteOption: Send + Sync + fmt::Debug {
    /// Tags this option answers to
    fn commands(&self) -> &[String];

    /// Whether `request` may be served by `route`
    fn validate(&self, request: &dyn RouteRequest, route: &RoutePattern) -> bool;
}

/// Checks option commands are non-empty and alphanumeric
pub fn validate_commands<I, S>(commands: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    commands
        .into_iter()
        .map(Into::into)
        .map(|command: String| {
            if command.is_empty() || !command.chars().all(|c| c.is_ascii_alphanumeric()) {
                Err(RouteError::configuration(format!(
                    "All option commands must be alphanumeric, got \"{}\"",
                    command
                )))
            } else {
                Ok(command)
            }
        })
        .collect()
}

/// Route options known to a router, indexed by command
#[derive(Debug, Clone, Default)]
pub struct OptionRegistry {
    by_command: HashMap<String, Vec<Arc<dyn RouteOption>>>,
    all: Vec<Arc<dyn RouteOption>>,
}

impl OptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with HTTP method and XHR options
    ///
    /// # Examples
    ///
    /// ```
    /// use switchboard::OptionRegistry;
    ///
    /// let options = OptionRegistry::http();
    /// assert!(options.has_option(&["GET", "XHR"]).unwrap());
    /// assert!(!options.has_option(&["ADMIN"]).unwrap());
    /// ```
    pub fn http() -> Self {
        Self::new()
            .with_option(MethodOption::all())
            .with_option(XhrOption::new())
    }

    pub fn register(&mut self, option: impl RouteOption + 'static) {
        let option: Arc<dyn RouteOption> = Arc::new(option);
        for command in option.commands() {
            self.by_command
                .entry(command.clone())
                .or_default()
                .push(option.clone());
            self.all.push(option.clone());
        }
    }

    pub fn with_option(mut self, option: impl RouteOption + 'static) -> Self {
        self.register(option);
        self
    }

    /// Options registered for the given tags, or every option when no tag is given
    ///
    /// An empty or unknown tag is a configuration error.
    pub fn options_for(&self, tags: &[&str]) -> Result<Vec<Arc<dyn RouteOption>>> {
        if tags.is_empty() {
            return Ok(self.all.clone());
        }

        let mut out = Vec::new();
        for tag in tags {
            check_tag(tag)?;
            let options = self.by_command.get(*tag).ok_or_else(|| {
                RouteError::configuration(format!("The specified option \"{}\" does not exist", tag))
            })?;
            out.extend(options.iter().cloned());
        }
        Ok(out)
    }

    /// Whether every tag is known
    pub fn has_option(&self, tags: &[&str]) -> Result<bool> {
        for tag in tags {
            check_tag(tag)?;
            if !self.by_command.contains_key(*tag) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Whether at least one tag is known
    pub fn has_any(&self, tags: &[&str]) -> bool {
        tags.iter().any(|tag| self.by_command.contains_key(*tag))
    }

    /// Every registered option, once per command it answers to
    pub fn all(&self) -> &[Arc<dyn RouteOption>] {
        &self.all
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}

fn check_tag(tag: &str) -> Result<()> {
    if tag.is_empty() {
        return Err(RouteError::configuration("option must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commands_must_be_alphanumeric() {
        assert!(validate_commands(["GET", "X1"]).is_ok());
        assert!(validate_commands([""]).unwrap_err().is_configuration());
        assert!(validate_commands(["a-b"]).unwrap_err().is_configuration());
    }

    #[test]
    fn test_options_for() {
        let registry = OptionRegistry::http();
        assert_eq!(registry.options_for(&["GET", "POST"]).unwrap().len(), 2);
        assert_eq!(registry.options_for(&[]).unwrap().len(), 8);
        assert!(registry.options_for(&["NOPE"]).unwrap_err().is_configuration());
        assert!(registry.options_for(&[""]).unwrap_err().is_configuration());
    }

    #[test]
    fn test_has_option_and_has_any() {
        let registry = OptionRegistry::http();
        assert!(registry.has_option(&["GET"]).unwrap());
        assert!(!registry.has_option(&["GET", "NOPE"]).unwrap());
        assert!(registry.has_option(&[""]).is_err());
        assert!(registry.has_any(&["NOPE", "XHR"]));
        assert!(!registry.has_any(&["NOPE"]));
        assert!(!OptionRegistry::new().has_any(&["GET"]));
    }
}
