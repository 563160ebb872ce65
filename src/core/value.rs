//! Dynamically typed template values
//!
//! Every piece of template content is a [`Value`]. Function calls are not a
//! separate variant: a single-key map whose key is the reference marker or
//! carries the function prefix is a call, and [`Value::as_call`] is the only
//! place that decides this.

use std::fmt;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::error::{ResolverError, Result};
use crate::config::ResolverConfig;

/// Ordered string-keyed mapping used for template maps
pub type Map = IndexMap<String, Value>;

/// Parameter namespace visible to `Ref`, `Fn::Sub` and `Fn::If`
pub type Parameters = FxHashMap<String, Value>;

/// Template value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(Map),
}

/// A function-call node, borrowed from the value it was classified from
#[derive(Debug, Clone, Copy)]
pub enum Call<'a> {
    /// `{"Ref": target}`
    Reference(&'a Value),
    /// `{"Fn::Name": arguments}`; `name` has the prefix stripped
    Function {
        key: &'a str,
        name: &'a str,
        arguments: &'a Value,
    },
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    /// Classify this value as a function-call node.
    ///
    /// Returns `None` for anything that is not a single-key map keyed by the
    /// reference marker or a prefixed function name.
    pub fn as_call<'a>(&'a self, config: &'a ResolverConfig) -> Option<Call<'a>> {
        let Value::Map(map) = self else {
            return None;
        };
        if map.len() != 1 {
            return None;
        }
        let (key, arguments) = map.first()?;
        if *key == config.reference_key {
            Some(Call::Reference(arguments))
        } else {
            key.strip_prefix(config.function_prefix.as_str())
                .map(|name| Call::Function {
                    key: key.as_str(),
                    name,
                    arguments,
                })
        }
    }

    /// Build a single-key call node
    pub fn call(key: impl Into<String>, arguments: Value) -> Value {
        let mut map = Map::with_capacity(1);
        map.insert(key.into(), arguments);
        Value::Map(map)
    }

    /// Numeric result of a computation: integral finite values in `i64`
    /// range become `Int`, everything else stays `Float`.
    pub fn number(n: f64) -> Value {
        const LIMIT: f64 = 9_223_372_036_854_775_808.0;
        if n.is_finite() && n.fract() == 0.0 && (-LIMIT..LIMIT).contains(&n) {
            Value::Int(n as i64)
        } else {
            Value::Float(n)
        }
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

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a key when this value is a map
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Canonical truthiness conversion.
    ///
    /// Booleans convert as-is, numbers are true when non-zero, and strings
    /// accept `true`/`True`/`TRUE`/`1` and `false`/`False`/`FALSE`/`0`/empty.
    /// Every other value is an error.
    pub fn to_bool(&self) -> Result<bool> {
        match self {
            Value::Bool(b) => Ok(*b),
            Value::Int(i) => Ok(*i != 0),
            Value::Float(f) => Ok(*f != 0.0),
            Value::String(s) => match s.as_str() {
                "true" | "True" | "TRUE" | "1" => Ok(true),
                "false" | "False" | "FALSE" | "0" | "" => Ok(false),
                _ => Err(ResolverError::NotBoolean {
                    actual: format!("string {s:?}"),
                }),
            },
            other => Err(ResolverError::NotBoolean {
                actual: other.type_name().to_string(),
            }),
        }
    }

    /// Compact JSON rendering
    pub fn to_json_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Canonical stringification used wherever a function turns a value into
/// text. Null renders empty; lists and maps render as compact JSON.
/// Functions defer instead of rendering a value that still contains a call.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(n) => write!(f, "{n}"),
            Value::String(s) => f.write_str(s),
            Value::List(_) | Value::Map(_) => f.write_str(&self.to_json_string()),
        }
    }
}

/// Structural equality. Integers and floats compare numerically; values of
/// different kinds are never equal; maps ignore key order.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                (*a as f64) == *b
            }
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<Map> for Value {
    fn from(value: Map) -> Self {
        Value::Map(value)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(object) => Value::Map(
                object
                    .into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Int(i) => serde_json::Value::from(i),
            Value::Float(f) => serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s),
            Value::List(items) => {
                serde_json::Value::Array(items.into_iter().map(Into::into).collect())
            }
            Value::Map(map) => serde_json::Value::Object(
                map.into_iter()
                    .map(|(key, value)| (key, value.into()))
                    .collect(),
            ),
        }
    }
}
