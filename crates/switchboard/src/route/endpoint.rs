//! Endpoint references
//!
//! An endpoint names what a matched route dispatches to. Which handler
//! strategy can realize it depends on the variant.

use std::fmt;
use std::sync::Arc;

use crate::args::Arguments;
use crate::error::Result;
use crate::value::{Object, Value};

/// A plain function endpoint
pub type EndpointFn = Arc<dyn Fn(Arguments) -> Result<Value> + Send + Sync>;

/// What a route dispatches to
#[derive(Clone)]
pub enum Endpoint {
    /// A registered class, instantiated per request unless `method` is static
    Class { class: String, method: String },
    /// An existing instance and one of its instance methods
    Object { object: Object, method: String },
    /// A callable receiving the captured arguments directly
    Function(EndpointFn),
}

impl Endpoint {
    pub fn class(class: impl Into<String>, method: impl Into<String>) -> Self {
        Endpoint::Class {
            class: class.into(),
            method: method.into(),
        }
    }

    pub fn object(object: Object, method: impl Into<String>) -> Self {
        Endpoint::Object {
            object,
            method: method.into(),
        }
    }

    /// Wraps a closure as a function endpoint
    ///
    /// # Examples
    ///
    /// ```
    /// use switchboard::{Arguments, Endpoint, Value};
    ///
    /// let endpoint = Endpoint::function(|args: Arguments| {
    ///     Ok(args.index(0).cloned().unwrap_or(Value::Null))
    /// });
    /// assert!(endpoint.is_function());
    /// assert_eq!(endpoint.method(), "");
    /// ```
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(Arguments) -> Result<Value> + Send + Sync + 'static,
    {
        Endpoint::Function(Arc::new(f))
    }

    /// Class name for class and object endpoints
    pub fn class_name(&self) -> Option<&str> {
        match self {
            Endpoint::Class { class, .. } => Some(class),
            Endpoint::Object { object, .. } => Some(object.class()),
            Endpoint::Function(_) => None,
        }
    }

    /// Method identifier, empty for function endpoints
    pub fn method(&self) -> &str {
        match self {
            Endpoint::Class { method, .. } | Endpoint::Object { method, .. } => method,
            Endpoint::Function(_) => "",
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Endpoint::Function(_))
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Class { class, method } => f
                .debug_struct("Class")
                .field("class", class)
                .field("method", method)
                .finish(),
            Endpoint::Object { object, method } => f
                .debug_struct("Object")
                .field("class", &object.class())
                .field("method", method)
                .finish(),
            Endpoint::Function(_) => f.write_str("Function"),
        }
    }
}
