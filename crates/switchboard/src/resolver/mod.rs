//! Argument binding
//!
//! Reconciles supplied positional and named values with an endpoint's declared
//! parameters. Binding runs in two passes:
//!
//! 1. Every supplied value is placed into its parameter slot. Unknown names,
//!    out-of-range positions and slots filled twice are configuration errors.
//! 2. Every parameter is finalized in declared order. Object-typed parameters
//!    are resolved through an [`InstanceResolver`] before declared defaults are
//!    considered; parameters left without a value are reported together.

mod registry;
mod signature;

pub use registry::{ClassDef, ClassRegistry, Constructor, InstanceResolver, MethodDef};
pub use signature::{Param, Signature, TypeHint};

use std::collections::HashMap;
use std::sync::Arc;

use crate::args::{ArgKey, Arguments};
use crate::error::{Result, RouteError};
use crate::value::{Context, Value};

/// Context key holding constructor arguments for class endpoints
pub const ARGS_CLASS: &str = "args_class";

/// Context key holding extra method arguments
pub const ARGS_METHOD: &str = "args_method";

/// Named argument reserved for the route context
pub const CONTEXT_ARGUMENT: &str = "context";

/// Reads an argument side-channel out of a route context
///
/// A missing or null entry yields no arguments.
pub fn context_arguments(key: &str, context: &Context) -> Result<Arguments> {
    match context.get(key) {
        None | Some(Value::Null) => Ok(Arguments::new()),
        Some(value) => Arguments::from_context_value(key, value),
    }
}

/// Whether a route context carries any constructor arguments
///
/// Only presence is checked, the entry itself is not validated.
pub fn has_class_arguments(context: &Context) -> bool {
    match context.get(ARGS_CLASS) {
        None | Some(Value::Null) => false,
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Map(map)) => !map.is_empty(),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

/// Binds supplied arguments to declared parameters
#[derive(Clone)]
pub struct ArgumentResolver {
    instances: Arc<dyn InstanceResolver>,
}

impl ArgumentResolver {
    pub fn new(instances: Arc<dyn InstanceResolver>) -> Self {
        Self { instances }
    }

    /// Resolves constructor arguments from the `args_class` context entry
    pub fn prepare_class_args(&self, class: &ClassDef, context: &Context) -> Result<Vec<Value>> {
        let supplied = context_arguments(ARGS_CLASS, context)?;
        self.resolve(class.constructor(), &supplied)
    }

    /// Resolves method arguments from captured values plus the `args_method` context entry
    ///
    /// A key supplied by both sources is a configuration error. A captured
    /// `context` argument is dropped since the context is delivered separately.
    pub fn prepare_method_args(
        &self,
        method: &MethodDef,
        captured: Arguments,
        context: &Context,
    ) -> Result<Vec<Value>> {
        let captured: Arguments = captured
            .into_iter()
            .filter(|(key, _)| !matches!(key, ArgKey::Name(name) if name == CONTEXT_ARGUMENT))
            .collect();
        let supplied = captured.merge_disjoint(context_arguments(ARGS_METHOD, context)?)?;
        self.resolve(method.signature(), &supplied)
    }

    /// Binds `supplied` to `signature`, producing one value per declared parameter
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use switchboard::{ArgumentResolver, Arguments, ClassRegistry, Param, Signature, Value};
    ///
    /// let resolver = ArgumentResolver::new(Arc::new(ClassRegistry::new()));
    /// let sig = Signature::new()
    ///     .with(Param::new("a", ["int"]))
    ///     .with(Param::new("b", ["string"]))
    ///     .with(Param::new("c", ["string"]).with_default("z"));
    ///
    /// let args = Arguments::new().with(0usize, 1).with("b", "y");
    /// let values = resolver.resolve(&sig, &args).unwrap();
    /// assert_eq!(values, vec![Value::Int(1), Value::from("y"), Value::from("z")]);
    /// ```
    pub fn resolve(&self, signature: &Signature, supplied: &Arguments) -> Result<Vec<Value>> {
        let params = signature.params();

        if params.is_empty() {
            if !supplied.is_empty() {
                return Err(RouteError::handler(
                    "Arguments passed to a constructor or method without parameters",
                ));
            }
            return Ok(Vec::new());
        }

        let slots = self.fill_slots(signature, supplied)?;

        let mut out = Vec::with_capacity(params.len());
        let mut untyped = Vec::new();
        let mut missing = Vec::new();

        for (param, slot) in params.iter().zip(slots) {
            let object_types = param.object_types();

            let value = match (slot, object_types) {
                (_, None) => {
                    untyped.push(param.name());
                    continue;
                }
                (Some(Value::String(hint)), Some(types))
                    if !hint.is_empty() && !types.is_empty() && !is_only_null(&types) =>
                {
                    self.instance_from_type_list(&types)?
                }
                (Some(value), _) => value,
                (None, Some(types)) if !types.is_empty() => self.instance_from_type_list(&types)?,
                (None, Some(_)) => match param.default_value() {
                    Some(default) => default.clone(),
                    None => {
                        missing.push(param.name());
                        continue;
                    }
                },
            };

            out.push(value);
        }

        if !untyped.is_empty() {
            return Err(RouteError::UntypedArgument(untyped.join("\",\"")));
        }

        if !missing.is_empty() {
            return Err(RouteError::configuration(format!(
                "Method endpoint missing argument values for: \"{}\".",
                missing.join("\",\"")
            )));
        }

        Ok(out)
    }

    /// Places supplied values into parameter slots
    fn fill_slots(&self, signature: &Signature, supplied: &Arguments) -> Result<Vec<Option<Value>>> {
        let params = signature.params();
        let index_of: HashMap<&str, usize> = params
            .iter()
            .enumerate()
            .map(|(i, p)| (p.name(), i))
            .collect();

        let mut slots: Vec<Option<Value>> = vec![None; params.len()];

        for (key, value) in supplied.iter() {
            let index = match key {
                ArgKey::Index(i) if *i < params.len() => *i,
                ArgKey::Index(i) => {
                    return Err(RouteError::configuration(format!(
                        "Parameter \"{}\" is out of range; the endpoint declares {} parameters",
                        i,
                        params.len()
                    )))
                }
                ArgKey::Name(name) => match index_of.get(name.as_str()) {
                    Some(i) => *i,
                    None => {
                        let valid: Vec<&str> = params.iter().map(|p| p.name()).collect();
                        return Err(RouteError::configuration(format!(
                            "Parameter \"{}\" is not a valid argument. Valid arguments are: \"{}\".",
                            name,
                            valid.join("\",\"")
                        )));
                    }
                },
            };

            if let Some(existing) = &slots[index] {
                return Err(RouteError::configuration(format!(
                    "Parameter \"{}\" has already been assigned a value of \"{}\"",
                    key, existing
                )));
            }
            slots[index] = Some(value.clone());
        }

        Ok(slots)
    }

    /// Walks a type union and returns the first instance that can be produced
    fn instance_from_type_list(&self, types: &[&TypeHint]) -> Result<Value> {
        let mut nullable = false;

        for hint in types {
            let name = match hint {
                TypeHint::Null => {
                    nullable = true;
                    continue;
                }
                TypeHint::Class(name) => name,
                _ => continue,
            };

            if let Some(object) = self.instances.instance(name)? {
                if !self.instances.is_instance_of(&object, name) {
                    return Err(RouteError::handler(format!(
                        "Resolved instance of {} is not an instance of {}",
                        object.class(),
                        name
                    )));
                }
                return Ok(Value::Object(object));
            }
        }

        if nullable {
            return Ok(Value::Null);
        }

        let names: Vec<&str> = types.iter().map(|t| t.name()).collect();
        Err(RouteError::handler(format!(
            "Cannot create instance of {}",
            names.join("|")
        )))
    }
}

impl std::fmt::Debug for ArgumentResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArgumentResolver").finish_non_exhaustive()
    }
}

fn is_only_null(types: &[&TypeHint]) -> bool {
    matches!(types, [TypeHint::Null])
}
