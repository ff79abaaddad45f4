// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parameter specs for handlers exposed through the API layer.
//!
//! A [`ParamSpec`] declares whether a handler takes positional or named
//! arguments and which of them are passed through a transformer before the
//! handler sees them. Specs are validated once, when the handler is
//! registered, and applied on every call.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

/// A per-argument value transformer. Returns a message on rejection.
pub type Transformer = Arc<dyn Fn(Value) -> Result<Value, String> + Send + Sync>;

/// Declared argument shape of a handler.
#[derive(Clone)]
pub enum ParamSpec {
    /// Arguments by position; `None` leaves that position untouched.
    Positional(Vec<Option<Transformer>>),
    /// Arguments by key; `None` leaves that key untouched.
    Named(BTreeMap<String, Option<Transformer>>),
}

/// Caller-supplied arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum Args {
    Positional(Vec<Value>),
    Named(Map<String, Value>),
}

impl fmt::Debug for ParamSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamSpec::Positional(slots) => f
                .debug_tuple("Positional")
                .field(&slots.iter().map(Option::is_some).collect::<Vec<_>>())
                .finish(),
            ParamSpec::Named(keys) => f
                .debug_tuple("Named")
                .field(
                    &keys
                        .iter()
                        .map(|(k, t)| (k.as_str(), t.is_some()))
                        .collect::<Vec<_>>(),
                )
                .finish(),
        }
    }
}

impl ParamSpec {
    /// Check the spec itself. Called once at registration time.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            ParamSpec::Positional(slots) if slots.is_empty() => {
                Err("positional spec must declare at least one argument".to_string())
            }
            ParamSpec::Positional(_) => Ok(()),
            ParamSpec::Named(keys) => {
                for key in keys.keys() {
                    if !is_identifier(key) {
                        return Err(format!("`{key}` is not a valid parameter name"));
                    }
                }
                Ok(())
            }
        }
    }

    /// Run the declared transformers over `args`.
    ///
    /// Values without a transformer, and values beyond the spec, pass through.
    pub fn apply(&self, args: Args) -> Result<Args, String> {
        match (self, args) {
            (ParamSpec::Positional(slots), Args::Positional(values)) => {
                let mut out = Vec::with_capacity(values.len());
                for (i, value) in values.into_iter().enumerate() {
                    match slots.get(i).and_then(Option::as_ref) {
                        Some(transform) => {
                            out.push(transform(value).map_err(|e| format!("argument {i}: {e}"))?)
                        }
                        None => out.push(value),
                    }
                }
                Ok(Args::Positional(out))
            }
            (ParamSpec::Named(keys), Args::Named(values)) => {
                let mut out = Map::new();
                for (key, value) in values {
                    let value = match keys.get(&key).and_then(Option::as_ref) {
                        Some(transform) => {
                            transform(value).map_err(|e| format!("argument `{key}`: {e}"))?
                        }
                        None => value,
                    };
                    out.insert(key, value);
                }
                Ok(Args::Named(out))
            }
            (ParamSpec::Positional(_), Args::Named(_)) => {
                Err("expected positional arguments, got named".to_string())
            }
            (ParamSpec::Named(_), Args::Positional(_)) => {
                Err("expected named arguments, got positional".to_string())
            }
        }
    }
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Built-in transformers for common argument coercions.
pub mod transformers {
    use std::sync::Arc;

    use serde_json::Value;

    use super::Transformer;

    /// Accepts integers and integer strings.
    pub fn to_integer() -> Transformer {
        Arc::new(|value| match value {
            Value::Null => Ok(Value::Null),
            Value::Number(n) if n.is_i64() || n.is_u64() => Ok(Value::Number(n)),
            Value::Number(n) => match n.as_f64() {
                Some(f) if f.fract() == 0.0 => Ok(Value::from(f as i64)),
                _ => Err(format!("{n} is not an integer")),
            },
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| format!("`{s}` is not an integer")),
            other => Err(format!("cannot convert {other} to an integer")),
        })
    }

    /// Accepts booleans, 0/1, and "true"/"false"/"1"/"0" strings.
    pub fn to_boolean() -> Transformer {
        Arc::new(|value| match value {
            Value::Null => Ok(Value::Null),
            Value::Bool(b) => Ok(Value::Bool(b)),
            Value::Number(n) if n.as_i64() == Some(0) => Ok(Value::Bool(false)),
            Value::Number(n) if n.as_i64() == Some(1) => Ok(Value::Bool(true)),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(Value::Bool(true)),
                "false" | "0" => Ok(Value::Bool(false)),
                _ => Err(format!("`{s}` is not a boolean")),
            },
            other => Err(format!("cannot convert {other} to a boolean")),
        })
    }

    /// Renders scalars as strings; structured values are rejected.
    pub fn to_text() -> Transformer {
        Arc::new(|value| match value {
            Value::Null => Ok(Value::Null),
            Value::String(s) => Ok(Value::String(s)),
            Value::Bool(b) => Ok(Value::String(b.to_string())),
            Value::Number(n) => Ok(Value::String(n.to_string())),
            other => Err(format!("cannot convert {other} to text")),
        })
    }

    /// Parses a string argument as JSON; non-strings pass through.
    pub fn parse_json() -> Transformer {
        Arc::new(|value| match value {
            Value::String(s) => serde_json::from_str(&s).map_err(|e| format!("invalid JSON: {e}")),
            other => Ok(other),
        })
    }
}
