//! Declared parameter metadata for endpoints and constructors
//!
//! Endpoints describe their parameters up front instead of being reflected on
//! at dispatch time. Each parameter carries a name, a declared type union and
//! an optional default value.

use std::fmt;

use crate::value::Value;

/// One member of a declared parameter type union
///
/// Scalars and `array` are bound literally. `Null` and `Class` are
/// *object-capable*: they make the resolver try to produce an instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeHint {
    Bool,
    Int,
    Float,
    String,
    Any,
    Array,
    Null,
    Class(String),
}

impl TypeHint {
    /// Parses a type name
    ///
    /// # Examples
    ///
    /// ```
    /// use switchboard::TypeHint;
    ///
    /// assert_eq!(TypeHint::parse("int"), TypeHint::Int);
    /// assert_eq!(TypeHint::parse("mixed"), TypeHint::Any);
    /// assert_eq!(TypeHint::parse("Mailer"), TypeHint::Class("Mailer".into()));
    /// ```
    pub fn parse(name: &str) -> Self {
        match name {
            "bool" => TypeHint::Bool,
            "int" => TypeHint::Int,
            "float" => TypeHint::Float,
            "string" => TypeHint::String,
            "any" | "mixed" => TypeHint::Any,
            "array" => TypeHint::Array,
            "null" => TypeHint::Null,
            other => TypeHint::Class(other.to_string()),
        }
    }

    pub fn is_object_capable(&self) -> bool {
        matches!(self, TypeHint::Null | TypeHint::Class(_))
    }

    pub fn name(&self) -> &str {
        match self {
            TypeHint::Bool => "bool",
            TypeHint::Int => "int",
            TypeHint::Float => "float",
            TypeHint::String => "string",
            TypeHint::Any => "any",
            TypeHint::Array => "array",
            TypeHint::Null => "null",
            TypeHint::Class(name) => name,
        }
    }
}

impl fmt::Display for TypeHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&str> for TypeHint {
    fn from(name: &str) -> Self {
        TypeHint::parse(name)
    }
}

/// A declared parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    name: String,
    types: Option<Vec<TypeHint>>,
    default: Option<Value>,
}

impl Param {
    /// Declares a parameter with a type union
    ///
    /// # Examples
    ///
    /// ```
    /// use switchboard::{Param, TypeHint};
    ///
    /// let param = Param::new("mailer", ["Mailer", "null"]);
    /// assert_eq!(param.types().unwrap(), &[TypeHint::Class("Mailer".into()), TypeHint::Null]);
    /// ```
    pub fn new<I, T>(name: impl Into<String>, types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TypeHint>,
    {
        Self {
            name: name.into(),
            types: Some(types.into_iter().map(Into::into).collect()),
            default: None,
        }
    }

    /// Declares a parameter without type information
    ///
    /// Binding a signature that contains one always fails with
    /// [`RouteError::UntypedArgument`](crate::RouteError::UntypedArgument),
    /// whether or not a value was supplied for it.
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types: None,
            default: None,
        }
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn types(&self) -> Option<&[TypeHint]> {
        self.types.as_deref()
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// The object-capable members of the declared union, in declared order
    ///
    /// `None` when the parameter is untyped.
    pub fn object_types(&self) -> Option<Vec<&TypeHint>> {
        self.types
            .as_ref()
            .map(|types| types.iter().filter(|t| t.is_object_capable()).collect())
    }
}

/// Ordered parameter list of a callable
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Signature {
    params: Vec<Param>,
}

impl Signature {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a parameter (builder)
    ///
    /// # Examples
    ///
    /// ```
    /// use switchboard::{Param, Signature};
    ///
    /// let sig = Signature::new()
    ///     .with(Param::new("id", ["int"]))
    ///     .with(Param::new("format", ["string"]).with_default("json"));
    /// assert_eq!(sig.len(), 2);
    /// ```
    pub fn with(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl FromIterator<Param> for Signature {
    fn from_iter<I: IntoIterator<Item = Param>>(iter: I) -> Self {
        Self {
            params: iter.into_iter().collect(),
        }
    }
}
