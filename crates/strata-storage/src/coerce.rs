// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Coercion of caller values into bindable SQLite values.
//!
//! Booleans become `1`/`0`, objects and arrays become their JSON text, and
//! every other value keeps its meaning. Applied to every parameter list
//! before binding, whatever the statement kind.

use rusqlite::types::Value as SqlValue;
use serde_json::Value;
use strata_core::BoundValue;

/// Coerce a whole parameter list.
pub fn coerce(values: &[Value]) -> Vec<BoundValue> {
    values.iter().map(coerce_value).collect()
}

/// Coerce one value.
pub fn coerce_value(value: &Value) -> BoundValue {
    match value {
        Value::Null => BoundValue::Null,
        Value::Bool(true) => BoundValue::Integer(1),
        Value::Bool(false) => BoundValue::Integer(0),
        Value::Number(n) => match n.as_i64() {
            Some(i) => BoundValue::Integer(i),
            // u64 beyond i64::MAX and non-integers
            None => BoundValue::Real(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => BoundValue::Text(s.clone()),
        Value::Array(_) | Value::Object(_) => BoundValue::Text(value.to_string()),
    }
}

/// Convert a coerced value into rusqlite's owned value for binding.
pub(crate) fn to_sql(value: &BoundValue) -> SqlValue {
    match value {
        BoundValue::Null => SqlValue::Null,
        BoundValue::Integer(i) => SqlValue::Integer(*i),
        BoundValue::Real(f) => SqlValue::Real(*f),
        BoundValue::Text(s) => SqlValue::Text(s.clone()),
        BoundValue::Blob(b) => SqlValue::Blob(b.clone()),
    }
}
