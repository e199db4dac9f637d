//! Query-string and form-body serialization
//!
//! Flattens a serialized parameter map into `key=value` pairs. Nested maps use
//! bracket notation and arrays follow the chosen [`ArrayFormat`]. Keys and
//! values are percent-encoded RFC 3986 style, so a space becomes `%20`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result};

/// How array-valued parameters are written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrayFormat {
    /// `key[0]=a&key[1]=b`
    #[default]
    Indices,
    /// `key[]=a&key[]=b`
    Brackets,
    /// `key=a&key=b`
    Repeat,
    /// `key=a,b`
    Comma,
}

/// One flattened parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pair {
    /// Single scalar value
    Scalar(String, String),
    /// Scalars joined by a literal comma
    Joined(String, Vec<String>),
    /// Explicit `null`
    Null(String),
}

impl Pair {
    /// Unencoded key of this pair
    pub fn key(&self) -> &str {
        match self {
            Pair::Scalar(key, _) | Pair::Joined(key, _) | Pair::Null(key) => key,
        }
    }

    fn encode(&self) -> String {
        match self {
            Pair::Scalar(key, value) => format!("{}={}", encode(key), encode(value)),
            Pair::Joined(key, values) => {
                let joined: Vec<String> = values.iter().map(|v| encode(v)).collect();
                format!("{}={}", encode(key), joined.join(","))
            }
            Pair::Null(key) => format!("{}=", encode(key)),
        }
    }
}

fn encode(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}

/// Render a JSON scalar the way it appears on the wire
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Flatten a parameter map into pairs
pub fn flatten(params: &Map<String, Value>, format: ArrayFormat) -> Vec<Pair> {
    let mut pairs = Vec::new();
    for (key, value) in params {
        flatten_value(key, value, format, &mut pairs);
    }
    pairs
}

fn flatten_value(key: &str, value: &Value, format: ArrayFormat, out: &mut Vec<Pair>) {
    match value {
        // bracket-style query strings drop nulls entirely
        Value::Null if format == ArrayFormat::Brackets => {}
        Value::Null => out.push(Pair::Null(key.to_string())),
        Value::Object(map) => {
            for (child, child_value) in map {
                flatten_value(&format!("{}[{}]", key, child), child_value, format, out);
            }
        }
        Value::Array(items) => flatten_array(key, items, format, out),
        scalar => {
            if let Some(text) = scalar_text(scalar) {
                out.push(Pair::Scalar(key.to_string(), text));
            }
        }
    }
}

fn flatten_array(key: &str, items: &[Value], format: ArrayFormat, out: &mut Vec<Pair>) {
    if items.is_empty() {
        return;
    }

    if format == ArrayFormat::Comma {
        let scalars: Option<Vec<String>> = items.iter().map(scalar_text).collect();
        if let Some(values) = scalars {
            out.push(Pair::Joined(key.to_string(), values));
            return;
        }
    }

    for (index, item) in items.iter().enumerate() {
        let item_key = match format {
            ArrayFormat::Repeat => key.to_string(),
            ArrayFormat::Brackets => format!("{}[]", key),
            // nested values inside a comma list fall back to indices
            ArrayFormat::Indices | ArrayFormat::Comma => format!("{}[{}]", key, index),
        };
        flatten_value(&item_key, item, format, out);
    }
}

/// Encode a parameter map as `a=1&b=2`
pub fn stringify(params: &Map<String, Value>, format: ArrayFormat) -> String {
    flatten(params, format)
        .iter()
        .map(Pair::encode)
        .collect::<Vec<_>>()
        .join("&")
}

/// Serialize a typed parameter value into a map
///
/// Returns `Ok(None)` for values that serialize to `null`, which callers treat
/// as absent parameters.
pub fn to_param_map<T: Serialize + ?Sized>(params: &T) -> Result<Option<Map<String, Value>>> {
    match serde_json::to_value(params)? {
        Value::Null => Ok(None),
        Value::Object(map) => Ok(Some(map)),
        other => Err(Error::HttpRequest {
            message: format!(
                "request parameters must serialize to a map, got {}",
                value_kind(&other)
            ),
            source: None,
        }),
    }
}

/// Serialize and encode typed parameters in one step
pub fn stringify_params<T: Serialize + ?Sized>(params: &T, format: ArrayFormat) -> Result<Option<String>> {
    Ok(to_param_map(params)?.map(|map| stringify(&map, format)))
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
