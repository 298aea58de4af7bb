use std::sync::Arc;

use tracing::debug;

use crate::args::Arguments;
use crate::error::{Result, RouteError};
use crate::resolver::{has_class_arguments, ArgumentResolver, ClassDef, ClassRegistry, MethodDef};
use crate::route::Endpoint;
use crate::value::{Context, Object, Value};

use super::RouteHandler;

/// Dispatches to methods of registered classes and existing objects
///
/// Constructor parameters are bound from the `args_class` context entry and
/// method parameters from the captured arguments plus the `args_method`
/// context entry, both through an [`ArgumentResolver`].
#[derive(Debug, Clone)]
pub struct ClassHandler {
    registry: Arc<ClassRegistry>,
    resolver: ArgumentResolver,
}

impl ClassHandler {
    /// Handler whose resolver auto-constructs from the same registry
    pub fn new(registry: Arc<ClassRegistry>) -> Self {
        let resolver = ArgumentResolver::new(registry.clone());
        Self { registry, resolver }
    }

    /// Handler with a custom resolver, e.g. one backed by a service container
    pub fn with_resolver(registry: Arc<ClassRegistry>, resolver: ArgumentResolver) -> Self {
        Self { registry, resolver }
    }

    pub fn registry(&self) -> &ClassRegistry {
        &self.registry
    }

    fn class(&self, name: &str) -> Result<&Arc<ClassDef>> {
        self.registry.get(name).ok_or_else(|| {
            RouteError::configuration(format!(
                "Supplied class string: \"{}\" is not an existing class",
                name
            ))
        })
    }

    fn method<'a>(&self, class: &'a ClassDef, name: &str) -> Result<&'a MethodDef> {
        class.method(name).ok_or_else(|| {
            RouteError::configuration(format!(
                "Method \"{}\" is not a valid method of class \"{}\".",
                name,
                class.name()
            ))
        })
    }

    fn execute_object(
        &self,
        object: &Object,
        method: &str,
        args: Arguments,
        context: &Context,
    ) -> Result<Value> {
        let class = self.class(object.class())?;
        let method = self.method(class, method)?;

        if method.is_static() {
            return Err(RouteError::configuration(format!(
                "Cannot call static method on instantiated object of type {}",
                object.class()
            )));
        }

        let method_args = self.resolver.prepare_method_args(method, args, context)?;
        method.invoke(Some(object), method_args)
    }

    fn execute_class(
        &self,
        class: &str,
        method: &str,
        args: Arguments,
        context: &Context,
    ) -> Result<Value> {
        let class = self.class(class)?;
        let method = self.method(class, method)?;

        if method.is_static() {
            if has_class_arguments(context) {
                return Err(RouteError::configuration(format!(
                    "Route endpoint is static method \"{}\" of class \"{}\", but class constructor \
                     arguments have been defined in the route context. Class constructors are never \
                     called when routing to a static method. Either remove the class arguments, \
                     remove the static designation, or move the static method to a class with no \
                     constructor",
                    method.name(),
                    class.name()
                )));
            }
            let method_args = self.resolver.prepare_method_args(method, args, context)?;
            debug!(class = class.name(), method = method.name(), "invoking static method");
            return method.invoke(None, method_args);
        }

        let constructor_args = self.resolver.prepare_class_args(class, context)?;
        let method_args = self.resolver.prepare_method_args(method, args, context)?;
        let instance = class.instantiate(constructor_args)?;
        debug!(class = class.name(), method = method.name(), "invoking instance method");
        method.invoke(Some(&instance), method_args)
    }
}

impl RouteHandler for ClassHandler {
    fn execute(&self, endpoint: &Endpoint, args: Arguments, context: &Context) -> Result<Value> {
        if endpoint.method().is_empty() {
            return Err(RouteError::configuration(format!(
                "Method endpoint for {} must not be empty",
                endpoint.class_name().unwrap_or("function")
            )));
        }

        match endpoint {
            Endpoint::Object { object, method } => self.execute_object(object, method, args, context),
            Endpoint::Class { class, method } => self.execute_class(class, method, args, context),
            Endpoint::Function(_) => Err(RouteError::configuration(
                "Function endpoints cannot be dispatched by ClassHandler",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{Param, Signature};
    use std::any::Any;

    struct Greeter {
        greeting: String,
    }

    fn registry() -> Arc<ClassRegistry> {
        let greeter = ClassDef::new(
            "Greeter",
            Signature::new().with(Param::new("greeting", ["string"]).with_default("hello")),
            |args| {
                let greeting = args[0].as_str().unwrap_or_default().to_string();
                Ok(Arc::new(Greeter { greeting }) as Arc<dyn Any + Send + Sync>)
            },
        )
        .with_method(MethodDef::instance(
            "greet",
            Signature::new().with(Param::new("name", ["string"])),
            |this, args| {
                let greeter = this
                    .downcast_ref::<Greeter>()
                    .ok_or_else(|| RouteError::handler("not a greeter"))?;
                Ok(Value::from(format!("{} {}", greeter.greeting, args[0])))
            },
        ))
        .with_method(MethodDef::static_fn(
            "version",
            Signature::new(),
            |_| Ok(Value::Int(1)),
        ));

        Arc::new(ClassRegistry::new().with_class(greeter))
    }

    #[test]
    fn test_class_dispatch_uses_constructor_default() {
        let handler = ClassHandler::new(registry());
        let args = Arguments::positional([Value::from("bob")]);
        let result = handler
            .execute(&Endpoint::class("Greeter", "greet"), args, &Context::new())
            .unwrap();
        assert_eq!(result, Value::from("hello bob"));
    }

    #[test]
    fn test_class_dispatch_with_constructor_args() {
        let handler = ClassHandler::new(registry());
        let mut class_args = Context::new();
        class_args.insert("greeting".into(), Value::from("hi"));
        let mut context = Context::new();
        context.insert("args_class".into(), Value::Map(class_args));

        let args = Arguments::new().with("name", "amy");
        let result = handler
            .execute(&Endpoint::class("Greeter", "greet"), args, &context)
            .unwrap();
        assert_eq!(result, Value::from("hi amy"));
    }

    #[test]
    fn test_static_method_rejects_class_args() {
        let handler = ClassHandler::new(registry());
        let mut context = Context::new();
        context.insert("args_class".into(), Value::from("not even a map"));
        let err = handler
            .execute(&Endpoint::class("Greeter", "version"), Arguments::new(), &context)
            .unwrap_err();
        assert!(err.is_configuration());

        let result = handler
            .execute(&Endpoint::class("Greeter", "version"), Arguments::new(), &Context::new())
            .unwrap();
        assert_eq!(result, Value::Int(1));
    }

    #[test]
    fn test_missing_class_and_method_are_configuration_errors() {
        let handler = ClassHandler::new(registry());
        for endpoint in [
            Endpoint::class("Nope", "greet"),
            Endpoint::class("Greeter", "nope"),
            Endpoint::class("Greeter", ""),
        ] {
            let err = handler
                .execute(&endpoint, Arguments::new(), &Context::new())
                .unwrap_err();
            assert!(err.is_configuration(), "{:?}", endpoint);
        }
    }

    #[test]
    fn test_object_dispatch() {
        let handler = ClassHandler::new(registry());
        let object = Object::new(
            "Greeter",
            Greeter {
                greeting: "hey".into(),
            },
        );

        let args = Arguments::positional([Value::from("kim")]);
        let result = handler
            .execute(&Endpoint::object(object.clone(), "greet"), args, &Context::new())
            .unwrap();
        assert_eq!(result, Value::from("hey kim"));

        let err = handler
            .execute(&Endpoint::object(object, "version"), Arguments::new(), &Context::new())
            .unwrap_err();
        assert!(err.is_configuration());
    }
}
