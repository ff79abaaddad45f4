// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Field-type tokens to SQLite column declarations.

use std::str::FromStr;

use strum::EnumString;

/// Declared type of structured (object or collection) columns.
pub const JSON_COLUMN: &str = "JSON";

/// Fallback declaration for tokens the mapper does not know.
pub const TEXT_COLUMN: &str = "TEXT";

/// Abstract field types understood by the mapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum FieldType {
    #[strum(serialize = "pk", serialize = "primary")]
    PrimaryKey,
    #[strum(serialize = "id", serialize = "ref", serialize = "reference")]
    Reference,
    #[strum(serialize = "string", serialize = "text")]
    String,
    #[strum(serialize = "boolean", serialize = "bool")]
    Boolean,
    #[strum(serialize = "number", serialize = "float")]
    Number,
    #[strum(serialize = "integer", serialize = "int")]
    Integer,
    #[strum(serialize = "timestamp")]
    Timestamp,
    #[strum(serialize = "date", serialize = "datetime", serialize = "time")]
    Date,
    #[strum(
        serialize = "json",
        serialize = "object",
        serialize = "array",
        serialize = "collection"
    )]
    Structured,
}

impl FieldType {
    pub fn column_type(self) -> &'static str {
        match self {
            FieldType::PrimaryKey => "INTEGER PRIMARY KEY AUTOINCREMENT",
            FieldType::Reference => "INTEGER",
            FieldType::String => TEXT_COLUMN,
            // 1 / 0
            FieldType::Boolean => "INTEGER",
            FieldType::Number => "REAL",
            FieldType::Integer => "INTEGER",
            // milliseconds since the Unix epoch
            FieldType::Timestamp => "INTEGER",
            // ISO-8601 text
            FieldType::Date => TEXT_COLUMN,
            FieldType::Structured => JSON_COLUMN,
        }
    }
}

/// Map a field-type token to a column declaration.
///
/// `is_collection` forces the structured column type whatever the token.
/// Unknown tokens map to `TEXT`.
pub fn map_type(token: &str, is_collection: bool) -> &'static str {
    if is_collection {
        return JSON_COLUMN;
    }
    FieldType::from_str(token.trim())
        .map(FieldType::column_type)
        .unwrap_or(TEXT_COLUMN)
}

/// Whether a declared column type holds structured JSON.
pub fn is_structured(column_type: &str) -> bool {
    column_type.trim().eq_ignore_ascii_case(JSON_COLUMN)
}
