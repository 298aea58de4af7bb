//! Positional and named argument collections

use std::fmt;

use crate::error::{Result, RouteError};
use crate::value::Value;

/// Key of a supplied argument: a parameter position or a parameter name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArgKey {
    Index(usize),
    Name(String),
}

impl ArgKey {
    /// Reads a map key, treating all-digit keys as positions
    ///
    /// # Examples
    ///
    /// ```
    /// use switchboard::ArgKey;
    ///
    /// assert_eq!(ArgKey::parse("2"), ArgKey::Index(2));
    /// assert_eq!(ArgKey::parse("id"), ArgKey::Name("id".into()));
    /// ```
    pub fn parse(key: &str) -> Self {
        if !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(index) = key.parse::<usize>() {
                return ArgKey::Index(index);
            }
        }
        ArgKey::Name(key.to_string())
    }
}

impl fmt::Display for ArgKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgKey::Index(i) => write!(f, "{}", i),
            ArgKey::Name(name) => f.write_str(name),
        }
    }
}

impl From<usize> for ArgKey {
    fn from(index: usize) -> Self {
        ArgKey::Index(index)
    }
}

impl From<&str> for ArgKey {
    fn from(name: &str) -> Self {
        ArgKey::Name(name.to_string())
    }
}

impl From<String> for ArgKey {
    fn from(name: String) -> Self {
        ArgKey::Name(name)
    }
}

/// Ordered collection of supplied argument values
///
/// Insertion order is kept so conflicts and unknown names are reported in
/// the order the values were supplied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    entries: Vec<(ArgKey, Value)>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds positional arguments from a list of values
    ///
    /// # Examples
    ///
    /// ```
    /// use switchboard::{Arguments, Value};
    ///
    /// let args = Arguments::positional([Value::Int(1), Value::from("a")]);
    /// assert_eq!(args.index(1), Some(&Value::from("a")));
    /// ```
    pub fn positional<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        values
            .into_iter()
            .enumerate()
            .map(|(i, v)| (ArgKey::Index(i), v))
            .collect()
    }

    /// Reads an argument side-channel from a route context entry
    ///
    /// Maps are keyed by name or position (all-digit keys), lists are positional.
    pub fn from_context_value(label: &str, value: &Value) -> Result<Self> {
        match value {
            Value::Map(map) => Ok(map
                .iter()
                .map(|(k, v)| (ArgKey::parse(k), v.clone()))
                .collect()),
            Value::Array(items) => Ok(Self::positional(items.iter().cloned())),
            other => Err(RouteError::configuration(format!(
                "Context[{}] must be a map or a list, got {}",
                label,
                other.kind()
            ))),
        }
    }

    /// Sets a value, replacing any value already stored under the same key
    pub fn insert(&mut self, key: impl Into<ArgKey>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Builder form of [`Arguments::insert`]
    pub fn with(mut self, key: impl Into<ArgKey>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Appends a value at the next free position
    pub fn push(&mut self, value: impl Into<Value>) {
        let index = self.next_index();
        self.entries.push((ArgKey::Index(index), value.into()));
    }

    /// One past the highest position in use
    pub fn next_index(&self) -> usize {
        self.entries
            .iter()
            .filter_map(|(k, _)| match k {
                ArgKey::Index(i) => Some(i + 1),
                ArgKey::Name(_) => None,
            })
            .max()
            .unwrap_or(0)
    }

    pub fn get(&self, key: &ArgKey) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn index(&self, index: usize) -> Option<&Value> {
        self.get(&ArgKey::Index(index))
    }

    pub fn named(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| matches!(k, ArgKey::Name(n) if n == name))
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &ArgKey) -> bool {
        self.get(key).is_some()
    }

    /// Whether the first supplied argument is keyed by position
    pub fn is_positional(&self) -> bool {
        matches!(self.entries.first(), Some((ArgKey::Index(_), _)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ArgKey, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Values in supplied order, dropping their keys
    pub fn into_values(self) -> Vec<Value> {
        self.entries.into_iter().map(|(_, v)| v).collect()
    }

    /// Unions two argument sets, rejecting any key present in both
    pub fn merge_disjoint(mut self, other: Arguments) -> Result<Self> {
        for (key, value) in other.entries {
            if self.contains_key(&key) {
                return Err(RouteError::configuration(format!(
                    "Parameter \"{}\" is supplied by both the URI and the route context",
                    key
                )));
            }
            self.entries.push((key, value));
        }
        Ok(self)
    }
}

impl FromIterator<(ArgKey, Value)> for Arguments {
    fn from_iter<I: IntoIterator<Item = (ArgKey, Value)>>(iter: I) -> Self {
        let mut args = Arguments::new();
        for (k, v) in iter {
            args.insert(k, v);
        }
        args
    }
}

impl IntoIterator for Arguments {
    type Item = (ArgKey, Value);
    type IntoIter = std::vec::IntoIter<(ArgKey, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
