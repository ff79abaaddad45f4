// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collection "contains" predicates over JSON columns.

use serde_json::Value;
use strata_core::PredicateFragment;

use crate::coerce::coerce_value;
use crate::statement::quote_ident;
use crate::type_map::is_structured;

const CONTAINS_OPERATORS: &[&str] = &["contains", "$contains", "has"];

/// Translate `column <operator> operand` when it is a contains-match on a
/// JSON column.
///
/// The fragment holds when the column is non-null and one of its decoded
/// elements equals `operand`. Returns `None` for any other column type or
/// operator, leaving the caller to use its generic translator.
pub fn translate_contains(
    column: &str,
    column_type: &str,
    operator: &str,
    operand: &Value,
) -> Option<PredicateFragment> {
    if !is_structured(column_type) || !is_contains(operator) {
        return None;
    }
    let col = quote_ident(column);
    Some(PredicateFragment {
        sql: format!(
            "({col} IS NOT NULL AND EXISTS (SELECT 1 FROM json_each({col}) WHERE json_each.value = ?))"
        ),
        params: vec![coerce_value(operand)],
    })
}

fn is_contains(operator: &str) -> bool {
    let op = operator.trim();
    CONTAINS_OPERATORS.iter().any(|c| c.eq_ignore_ascii_case(op))
}
