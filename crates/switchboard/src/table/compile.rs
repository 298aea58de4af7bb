//! Nested route configuration compiler
//!
//! Flattens a tree of path segments into `(path, entry)` pairs in document
//! order. Map keys are path segments joined with `/`; leaves are route entries.
//!
//! A route entry is either positional, `[class, method, options, context]`
//! (trailing slots optional), or named, `{"class": .., "method": .., "options": .., "context": ..}`.
//! Options are a list of tags or a comma separated string.
//!
//! Two dialects decide how several routes share one path:
//!
//! - [`ConfigDialect::Implicit`]: a list of entries under a key
//! - [`ConfigDialect::Suffixed`]: a key ending in [`MULTI_ROUTE_SUFFIX`] whose
//!   value is a list of entries; the suffix is not part of the path
//!
//! In both dialects an all-digit key registers its entry at the parent path.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use super::source::json_kind;
use crate::error::{Result, RouteError};
use crate::path::join_segment;
use crate::value::{Context, Value};

/// Key suffix marking a multi-route group in the suffixed dialect
pub const MULTI_ROUTE_SUFFIX: &str = "--END";

const CLASS: &str = "class";
const METHOD: &str = "method";
const OPTIONS: &str = "options";
const CONTEXT: &str = "context";

/// How multiple routes under one path are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigDialect {
    #[default]
    Implicit,
    Suffixed,
}

/// One compiled route entry
#[derive(Debug, Clone, PartialEq)]
pub struct RouteEntry {
    pub path: String,
    pub class: Option<String>,
    pub method: String,
    pub options: Vec<String>,
    pub context: Context,
}

/// Flattens a configuration tree
///
/// The top level must be a map, or a list of maps compiled one after another.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use switchboard::{compile, ConfigDialect};
///
/// let config = json!({
///     "path5": {
///         "(\\d+)": [["A", "get", "GET"], ["B", "post", "POST"]]
///     }
/// });
///
/// let entries = compile(&config, ConfigDialect::Implicit).unwrap();
/// assert_eq!(entries.len(), 2);
/// assert_eq!(entries[0].path, "path5/(\\d+)");
/// assert_eq!(entries[1].class.as_deref(), Some("B"));
/// ```
pub fn compile(config: &JsonValue, dialect: ConfigDialect) -> Result<Vec<RouteEntry>> {
    let mut out = Vec::new();
    match config {
        JsonValue::Object(map) => walk(&mut out, "", map, dialect)?,
        JsonValue::Array(items) => {
            for (position, item) in items.iter().enumerate() {
                let map = item.as_object().ok_or_else(|| {
                    RouteError::configuration(format!(
                        "route configuration at position {} must be a map, got {}",
                        position,
                        json_kind(item)
                    ))
                })?;
                walk(&mut out, "", map, dialect)?;
            }
        }
        other => {
            return Err(RouteError::configuration(format!(
                "route configuration must be a map, got {}",
                json_kind(other)
            )))
        }
    }
    Ok(out)
}

fn walk(
    out: &mut Vec<RouteEntry>,
    path: &str,
    map: &Map<String, JsonValue>,
    dialect: ConfigDialect,
) -> Result<()> {
    for (key, data) in map {
        if is_position(key) {
            if !is_route_entry(data) {
                return Err(not_route_data(path, key));
            }
            out.push(parse_entry(path, data)?);
            continue;
        }

        if dialect == ConfigDialect::Suffixed {
            if let Some(segment) = key.strip_suffix(MULTI_ROUTE_SUFFIX) {
                let current = join_segment(path, segment);
                push_group(out, &current, data)?;
                continue;
            }
        }

        let current = join_segment(path, key);

        if is_route_entry(data) {
            out.push(parse_entry(&current, data)?);
            continue;
        }

        match data {
            JsonValue::Object(nested) => walk(out, &current, nested, dialect)?,
            JsonValue::Array(_) if dialect == ConfigDialect::Implicit => {
                push_group(out, &current, data)?
            }
            JsonValue::Array(_) => {
                return Err(RouteError::configuration(format!(
                    "Route data at {} must be route data; register several routes under one path \
                     with the \"{}\" key suffix",
                    current, MULTI_ROUTE_SUFFIX
                )))
            }
            other => {
                return Err(RouteError::configuration(format!(
                    "route configuration at {} must be a map or a list, got {}",
                    current,
                    json_kind(other)
                )))
            }
        }
    }
    Ok(())
}

/// Registers every entry of a list under the same path
fn push_group(out: &mut Vec<RouteEntry>, path: &str, data: &JsonValue) -> Result<()> {
    let items = data.as_array().ok_or_else(|| {
        RouteError::configuration(format!(
            "route configuration at {} must be a list of route data, got {}",
            path,
            json_kind(data)
        ))
    })?;

    for (position, item) in items.iter().enumerate() {
        if !is_route_entry(item) {
            return Err(not_route_data(path, &position.to_string()));
        }
        out.push(parse_entry(path, item)?);
    }
    Ok(())
}

fn not_route_data(path: &str, position: &str) -> RouteError {
    RouteError::configuration(format!(
        "Route data at {} position {} must be route data",
        path, position
    ))
}

fn is_position(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit())
}

/// Whether `data` has the shape of a single route entry
fn is_route_entry(data: &JsonValue) -> bool {
    match data {
        JsonValue::Array(slots) => {
            (1..=4).contains(&slots.len())
                && slots
                    .iter()
                    .enumerate()
                    .all(|(i, slot)| slot_is_valid(SLOTS[i], slot))
        }
        JsonValue::Object(map) => {
            map.contains_key(CLASS)
                && map
                    .iter()
                    .all(|(k, v)| SLOTS.contains(&k.as_str()) && slot_is_valid(k, v))
        }
        _ => false,
    }
}

const SLOTS: [&str; 4] = [CLASS, METHOD, OPTIONS, CONTEXT];

fn slot_is_valid(slot: &str, value: &JsonValue) -> bool {
    match slot {
        CLASS => value.is_string() || value.is_null(),
        METHOD => value.is_string(),
        OPTIONS => value.is_string() || value.is_array(),
        CONTEXT => value.is_object(),
        _ => false,
    }
}

fn slot<'a>(data: &'a JsonValue, name: &str) -> Option<&'a JsonValue> {
    match data {
        JsonValue::Array(slots) => SLOTS
            .iter()
            .position(|s| *s == name)
            .and_then(|i| slots.get(i)),
        JsonValue::Object(map) => map.get(name),
        _ => None,
    }
}

fn parse_entry(path: &str, data: &JsonValue) -> Result<RouteEntry> {
    let class = slot(data, CLASS).and_then(JsonValue::as_str).map(str::to_string);
    let method = slot(data, METHOD)
        .and_then(JsonValue::as_str)
        .unwrap_or_default()
        .to_string();
    let options = match slot(data, OPTIONS) {
        None => Vec::new(),
        Some(value) => parse_options(path, value)?,
    };
    let context = match slot(data, CONTEXT).cloned().map(Value::from) {
        Some(Value::Map(map)) => map,
        _ => Context::new(),
    };

    Ok(RouteEntry {
        path: path.to_string(),
        class,
        method,
        options,
        context,
    })
}

fn parse_options(path: &str, value: &JsonValue) -> Result<Vec<String>> {
    match value {
        JsonValue::String(list) => Ok(list
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect()),
        JsonValue::Array(tags) => tags
            .iter()
            .filter_map(|tag| match tag.as_str() {
                Some(tag) if tag.trim().is_empty() => None,
                Some(tag) => Some(Ok(tag.to_string())),
                None => Some(Err(RouteError::configuration(format!(
                    "Route options at {} must be strings, got {}",
                    path,
                    json_kind(tag)
                )))),
            })
            .collect(),
        other => Err(RouteError::configuration(format!(
            "Route options at {} must be a list or a string, got {}",
            path,
            json_kind(other)
        ))),
    }
}
