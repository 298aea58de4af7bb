//! Dynamic values passed between the route table and endpoints

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

/// Free-form key-value data attached to a route and threaded through to its endpoint
///
/// Keys keep the order they were inserted in, which for configured routes is
/// the order they were written.
pub type Context = IndexMap<String, Value>;

/// Values that can be captured from a URI, carried in a route context,
/// bound to endpoint parameters, or returned from an endpoint
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Map(Context),
    Object(Object),
}

impl Value {
    /// Casts a captured path segment
    ///
    /// Pure-digit strings become integers, other numeric strings become floats,
    /// everything else (including the empty string) stays a string.
    ///
    /// # Examples
    ///
    /// ```
    /// use switchboard::Value;
    ///
    /// assert_eq!(Value::from_capture("42"), Value::Int(42));
    /// assert_eq!(Value::from_capture("-1.5"), Value::Float(-1.5));
    /// assert_eq!(Value::from_capture("abc"), Value::from("abc"));
    /// assert_eq!(Value::from_capture(""), Value::from(""));
    /// ```
    pub fn from_capture(raw: &str) -> Self {
        if raw.is_empty() {
            return Value::String(String::new());
        }

        if raw.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(n) = raw.parse::<i64>() {
                return Value::Int(n);
            }
        }

        if is_numeric(raw) {
            if let Ok(n) = raw.parse::<f64>() {
                return Value::Float(n);
            }
        }

        Value::String(raw.to_string())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric view; integers widen to floats
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Context> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Short name of the variant, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
            Value::Object(_) => "object",
        }
    }
}

fn is_numeric(raw: &str) -> bool {
    let body = raw
        .strip_prefix(|c: char| c == '+' || c == '-')
        .unwrap_or(raw);
    !body.is_empty()
        && body.bytes().any(|b| b.is_ascii_digit())
        && body
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'))
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::String(s) => f.write_str(s),
            Value::Array(items) => {
                let items: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", items.join(", "))
            }
            Value::Map(_) => f.write_str("[Map]"),
            Value::Object(obj) => write!(f, "[{}]", obj.class()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Context> for Value {
    fn from(map: Context) -> Self {
        Value::Map(map)
    }
}

impl From<Object> for Value {
    fn from(obj: Object) -> Self {
        Value::Object(obj)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

// ============================================================================
// Object handles
// ============================================================================

/// A type-erased instance tagged with the name of the class it was built as
///
/// Objects are cheap to clone; clones share the same underlying instance.
#[derive(Clone)]
pub struct Object {
    class: String,
    inner: Arc<dyn Any + Send + Sync>,
}

impl Object {
    /// Wraps a value as an instance of `class`
    ///
    /// # Examples
    ///
    /// ```
    /// use switchboard::Object;
    ///
    /// struct Mailer;
    ///
    /// let obj = Object::new("Mailer", Mailer);
    /// assert_eq!(obj.class(), "Mailer");
    /// assert!(obj.downcast_ref::<Mailer>().is_some());
    /// ```
    pub fn new<T: Any + Send + Sync>(class: impl Into<String>, value: T) -> Self {
        Self {
            class: class.into(),
            inner: Arc::new(value),
        }
    }

    pub fn from_arc(class: impl Into<String>, inner: Arc<dyn Any + Send + Sync>) -> Self {
        Self {
            class: class.into(),
            inner,
        }
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object").field("class", &self.class).finish()
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.class == other.class && Arc::ptr_eq(&self.inner, &other.inner)
    }
}
