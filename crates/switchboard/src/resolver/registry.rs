//! Class registry: the explicit replacement for runtime class lookup
//!
//! Every class an endpoint can name is registered up front with its
//! constructor signature, its methods and the types it can stand in for.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::signature::Signature;
use crate::error::{Result, RouteError};
use crate::value::{Object, Value};

/// Builds an instance from resolved constructor arguments
pub type Constructor = Arc<dyn Fn(Vec<Value>) -> Result<Arc<dyn Any + Send + Sync>> + Send + Sync>;

type MethodFn = Arc<dyn Fn(Option<&Object>, Vec<Value>) -> Result<Value> + Send + Sync>;

/// A callable method of a registered class
#[derive(Clone)]
pub struct MethodDef {
    name: String,
    signature: Signature,
    is_static: bool,
    call: MethodFn,
}

impl MethodDef {
    /// Declares an instance method
    ///
    /// # Examples
    ///
    /// ```
    /// use switchboard::{MethodDef, Param, Signature, Value};
    ///
    /// struct Counter(i64);
    ///
    /// let add = MethodDef::instance(
    ///     "add",
    ///     Signature::new().with(Param::new("n", ["int"])),
    ///     |this, args| {
    ///         let base = this.downcast_ref::<Counter>().map(|c| c.0).unwrap_or(0);
    ///         Ok(Value::Int(base + args[0].as_i64().unwrap_or(0)))
    ///     },
    /// );
    /// assert!(!add.is_static());
    /// ```
    pub fn instance<F>(name: impl Into<String>, signature: Signature, f: F) -> Self
    where
        F: Fn(&Object, Vec<Value>) -> Result<Value> + Send + Sync + 'static,
    {
        let name = name.into();
        let method = name.clone();
        Self {
            name,
            signature,
            is_static: false,
            call: Arc::new(move |this, args| match this {
                Some(this) => f(this, args),
                None => Err(RouteError::configuration(format!(
                    "Instance method \"{}\" called without an instance",
                    method
                ))),
            }),
        }
    }

    /// Declares a static method; it never sees an instance
    pub fn static_fn<F>(name: impl Into<String>, signature: Signature, f: F) -> Self
    where
        F: Fn(Vec<Value>) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            signature,
            is_static: true,
            call: Arc::new(move |_, args| f(args)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn invoke(&self, this: Option<&Object>, args: Vec<Value>) -> Result<Value> {
        (self.call)(this, args)
    }
}

impl fmt::Debug for MethodDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDef")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .field("is_static", &self.is_static)
            .finish()
    }
}

/// A registered class
#[derive(Clone)]
pub struct ClassDef {
    name: String,
    constructor: Signature,
    construct: Constructor,
    methods: HashMap<String, MethodDef>,
    supertypes: Vec<String>,
}

impl ClassDef {
    /// Declares a class with a constructor signature
    pub fn new<F>(name: impl Into<String>, constructor: Signature, construct: F) -> Self
    where
        F: Fn(Vec<Value>) -> Result<Arc<dyn Any + Send + Sync>> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            constructor,
            construct: Arc::new(construct),
            methods: HashMap::new(),
            supertypes: Vec::new(),
        }
    }

    /// Declares a class with a parameterless constructor
    ///
    /// # Examples
    ///
    /// ```
    /// use switchboard::ClassDef;
    ///
    /// #[derive(Default)]
    /// struct Mailer;
    ///
    /// let class = ClassDef::with_default::<Mailer>("Mailer").implements("Transport");
    /// assert!(class.is_a("Transport"));
    /// assert!(class.constructor().is_empty());
    /// ```
    pub fn with_default<T>(name: impl Into<String>) -> Self
    where
        T: Default + Any + Send + Sync,
    {
        Self::new(name, Signature::new(), |_| {
            Ok(Arc::new(T::default()) as Arc<dyn Any + Send + Sync>)
        })
    }

    pub fn with_method(mut self, method: MethodDef) -> Self {
        self.methods.insert(method.name.clone(), method);
        self
    }

    /// Records another type name instances of this class satisfy
    pub fn implements(mut self, type_name: impl Into<String>) -> Self {
        self.supertypes.push(type_name.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn constructor(&self) -> &Signature {
        &self.constructor
    }

    pub fn method(&self, name: &str) -> Option<&MethodDef> {
        self.methods.get(name)
    }

    /// Whether instances of this class are instances of `type_name`
    pub fn is_a(&self, type_name: &str) -> bool {
        self.name == type_name || self.supertypes.iter().any(|t| t == type_name)
    }

    /// Builds an instance from already-resolved constructor arguments
    pub fn instantiate(&self, args: Vec<Value>) -> Result<Object> {
        let inner = (self.construct)(args)?;
        Ok(Object::from_arc(self.name.clone(), inner))
    }
}

impl fmt::Debug for ClassDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut methods: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        methods.sort_unstable();
        f.debug_struct("ClassDef")
            .field("name", &self.name)
            .field("constructor", &self.constructor)
            .field("methods", &methods)
            .field("supertypes", &self.supertypes)
            .finish()
    }
}

// ============================================================================
// Instance resolution
// ============================================================================

/// Produces instances for object-typed parameters
///
/// This is the hook a service locator or container plugs into.
pub trait InstanceResolver: Send + Sync {
    /// Instance for `type_name`, or `None` when none can be produced
    fn instance(&self, type_name: &str) -> Result<Option<Object>>;

    /// Whether `object` satisfies `type_name`
    fn is_instance_of(&self, object: &Object, type_name: &str) -> bool;
}

/// Classes known to the router, keyed by name
#[derive(Debug, Clone, Default)]
pub struct ClassRegistry {
    classes: HashMap<String, Arc<ClassDef>>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a class, replacing any class of the same name
    pub fn register(&mut self, class: ClassDef) {
        self.classes.insert(class.name.clone(), Arc::new(class));
    }

    pub fn with_class(mut self, class: ClassDef) -> Self {
        self.register(class);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<ClassDef>> {
        self.classes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl InstanceResolver for ClassRegistry {
    /// Only classes with a parameterless constructor are built automatically
    fn instance(&self, type_name: &str) -> Result<Option<Object>> {
        if type_name == "null" {
            return Ok(None);
        }
        match self.classes.get(type_name) {
            Some(class) if class.constructor.is_empty() => class.instantiate(Vec::new()).map(Some),
            _ => Ok(None),
        }
    }

    fn is_instance_of(&self, object: &Object, type_name: &str) -> bool {
        object.class() == type_name
            || self
                .classes
                .get(object.class())
                .map(|class| class.is_a(type_name))
                .unwrap_or(false)
    }
}
