//! Compiled route patterns
//!
//! A route template is a regular expression over the request path. It is
//! anchored at both ends and matched against the normalized URI, so templates
//! are written without the leading separator or anchors.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::args::{ArgKey, Arguments};
use crate::error::{Result, RouteError};
use crate::handler::RouteHandler;
use crate::path::{bucket_of, normalize_template, normalize_uri};
use crate::route::endpoint::Endpoint;
use crate::value::{Context, Value};

/// Context key holding the names given to captured segments
pub const ARGS_CAPTURED: &str = "args_captured";

/// A route: compiled template, endpoint, options and context
#[derive(Clone)]
pub struct RoutePattern {
    template: String,
    regex: Regex,
    endpoint: Endpoint,
    handler: Arc<dyn RouteHandler>,
    options: Vec<String>,
    context: Context,
}

impl RoutePattern {
    /// Compiles a route
    ///
    /// An empty template is a configuration error, as is one that does not
    /// compile as a regular expression.
    pub fn new(
        template: impl Into<String>,
        endpoint: Endpoint,
        handler: Arc<dyn RouteHandler>,
    ) -> Result<Self> {
        let template = template.into();
        if template.is_empty() {
            return Err(RouteError::configuration("Path must not be empty"));
        }

        let anchored = format!("^(?:{})$", normalize_template(&template));
        let regex = Regex::new(&anchored).map_err(|source| RouteError::InvalidPattern {
            pattern: template.clone(),
            source,
        })?;

        Ok(Self {
            template,
            regex,
            endpoint,
            handler,
            options: Vec::new(),
            context: Context::new(),
        })
    }

    /// Sets the option tags the router validates after a path match
    ///
    /// Blank tags are dropped.
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options
            .into_iter()
            .map(Into::into)
            .filter(|tag: &String| !tag.trim().is_empty())
            .collect();
        self
    }

    pub fn with_context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    /// Template as registered
    pub fn path(&self) -> &str {
        &self.template
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn has_option(&self, tag: &str) -> bool {
        self.options.iter().any(|o| o == tag)
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Bucket the route is stored in
    pub fn bucket(&self) -> usize {
        bucket_of(&self.template)
    }

    /// Matches a request URI, returning the captured arguments on success
    ///
    /// Captures are keyed by the matching `args_captured` name, then by the
    /// regex group name, then by position. Values are cast with
    /// [`Value::from_capture`]. Unmatched trailing groups are left out and
    /// unmatched inner groups capture as `""`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use switchboard::{Endpoint, FunctionHandler, RoutePattern, Value};
    ///
    /// let route = RoutePattern::new(
    ///     "users/(\\d+)",
    ///     Endpoint::function(|_| Ok(Value::Null)),
    ///     Arc::new(FunctionHandler::new()),
    /// )
    /// .unwrap();
    ///
    /// let args = route.matches("/users/42/").unwrap();
    /// assert_eq!(args.index(0), Some(&Value::Int(42)));
    /// assert!(route.matches("/users/abc").is_none());
    /// ```
    pub fn matches(&self, uri: &str) -> Option<Arguments> {
        let uri = normalize_template(normalize_uri(uri));
        let captures = self.regex.captures(&uri)?;

        let captured_names = self.captured_names();
        let group_names: Vec<Option<&str>> = self.regex.capture_names().collect();

        let last = (1..captures.len())
            .rev()
            .find(|&i| captures.get(i).is_some())
            .unwrap_or(0);

        let mut args = Arguments::new();
        for group in 1..=last {
            let position = group - 1;
            let raw = captures.get(group).map(|m| m.as_str()).unwrap_or("");

            let key = captured_names
                .get(position)
                .copied()
                .flatten()
                .or_else(|| group_names.get(group).copied().flatten())
                .map(|name| ArgKey::Name(name.to_string()))
                .unwrap_or(ArgKey::Index(position));

            args.insert(key, Value::from_capture(raw));
        }

        Some(args)
    }

    /// Runs the endpoint through this route's handler
    pub fn execute(&self, args: Arguments) -> Result<Value> {
        self.handler.execute(&self.endpoint, args, &self.context)
    }

    /// Non-empty names listed under `args_captured`, by capture position
    fn captured_names(&self) -> Vec<Option<&str>> {
        match self.context.get(ARGS_CAPTURED) {
            Some(Value::Array(names)) => names
                .iter()
                .map(|name| name.as_str().filter(|n| !n.is_empty()))
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl fmt::Debug for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoutePattern")
            .field("path", &self.template)
            .field("regex", &self.regex.as_str())
            .field("endpoint", &self.endpoint)
            .field("options", &self.options)
            .field("context", &self.context)
            .finish()
    }
}
