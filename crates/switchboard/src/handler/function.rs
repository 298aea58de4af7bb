use crate::args::Arguments;
use crate::error::{Result, RouteError};
use crate::resolver::CONTEXT_ARGUMENT;
use crate::route::Endpoint;
use crate::value::{Context, Value};

use super::RouteHandler;

/// Calls function endpoints with the captured arguments as-is
///
/// The route context is delivered as an extra argument: appended at the next
/// position when the captures are positional, or under the name `context`
/// otherwise. The named form, which also covers routes with no captures,
/// only happens when
/// [`with_context_for_named_arguments`](FunctionHandler::with_context_for_named_arguments)
/// is enabled.
///
/// # Examples
///
/// ```
/// use switchboard::{Arguments, Context, Endpoint, FunctionHandler, RouteHandler, Value};
///
/// let endpoint = Endpoint::function(|args: Arguments| Ok(Value::Int(args.len() as i64)));
/// let handler = FunctionHandler::new();
///
/// let args = Arguments::positional([Value::Int(42)]);
/// let result = handler.execute(&endpoint, args, &Context::new()).unwrap();
/// assert_eq!(result, Value::Int(2));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FunctionHandler {
    add_context_to_named_arguments: bool,
    always_append: bool,
}

impl FunctionHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handler that appends the context positionally regardless of how captures are keyed
    pub fn always_append() -> Self {
        Self {
            add_context_to_named_arguments: false,
            always_append: true,
        }
    }

    pub fn with_context_for_named_arguments(mut self, enabled: bool) -> Self {
        self.add_context_to_named_arguments = enabled;
        self
    }

    fn deliver_context(&self, args: &mut Arguments, context: &Context) {
        let value = Value::Map(context.clone());
        if self.always_append || args.is_positional() {
            args.push(value);
        } else if self.add_context_to_named_arguments {
            args.insert(CONTEXT_ARGUMENT, value);
        }
    }
}

impl RouteHandler for FunctionHandler {
    fn execute(&self, endpoint: &Endpoint, mut args: Arguments, context: &Context) -> Result<Value> {
        let function = match endpoint {
            Endpoint::Function(function) => function,
            other => {
                return Err(RouteError::configuration(format!(
                    "Route endpoint must be a function when using FunctionHandler, got {:?}",
                    other
                )))
            }
        };

        self.deliver_context(&mut args, context);
        function(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn echo() -> Endpoint {
        Endpoint::function(|args| {
            Ok(Value::Array(
                args.iter()
                    .map(|(k, v)| Value::Array(vec![Value::from(k.to_string()), v.clone()]))
                    .collect(),
            ))
        })
    }

    fn context() -> Context {
        let mut context = Context::new();
        context.insert("k".into(), Value::from("v"));
        context
    }

    fn keys(result: Value) -> Vec<String> {
        result
            .as_array()
            .unwrap()
            .iter()
            .map(|pair| pair.as_array().unwrap()[0].to_string())
            .collect()
    }

    #[test]
    fn test_positional_captures_get_context_appended() {
        let args = Arguments::positional([Value::Int(1), Value::Int(2)]);
        let result = FunctionHandler::new().execute(&echo(), args, &context()).unwrap();
        assert_eq!(keys(result), vec!["0", "1", "2"]);
    }

    #[test]
    fn test_no_captures_follow_named_rules() {
        let result = FunctionHandler::new()
            .execute(&echo(), Arguments::new(), &context())
            .unwrap();
        assert!(keys(result).is_empty());

        let handler = FunctionHandler::new().with_context_for_named_arguments(true);
        let result = handler.execute(&echo(), Arguments::new(), &context()).unwrap();
        let pairs = result.as_array().unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].as_array().unwrap()[0], Value::from("context"));
        assert_eq!(pairs[0].as_array().unwrap()[1], Value::Map(context()));

        let result = FunctionHandler::always_append()
            .execute(&echo(), Arguments::new(), &context())
            .unwrap();
        assert_eq!(keys(result), vec!["0"]);
    }

    #[test]
    fn test_named_captures() {
        let args = Arguments::new().with("id", 1);
        let result = FunctionHandler::new().execute(&echo(), args.clone(), &context()).unwrap();
        assert_eq!(keys(result), vec!["id"]);

        let handler = FunctionHandler::new().with_context_for_named_arguments(true);
        let result = handler.execute(&echo(), args.clone(), &context()).unwrap();
        assert_eq!(keys(result), vec!["id", "context"]);

        let result = FunctionHandler::always_append().execute(&echo(), args, &context()).unwrap();
        assert_eq!(keys(result), vec!["id", "0"]);
    }

    #[test]
    fn test_rejects_class_endpoint() {
        let err = FunctionHandler::new()
            .execute(&Endpoint::class("A", "b"), Arguments::new(), &Context::new())
            .unwrap_err();
        assert!(err.is_configuration());
    }
}
