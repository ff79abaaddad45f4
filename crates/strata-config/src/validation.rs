// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes: non-empty paths, positive timeouts, identifier syntax and
//! log level names.

use crate::diagnostic::{suggest_key, ConfigError};
use crate::model::StrataConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first.
pub fn validate_config(config: &StrataConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let storage = &config.storage;

    if storage.database_path.trim().is_empty() {
        errors.push(invalid("storage.database_path", "must not be empty", None));
    }

    if storage.busy_timeout_ms == 0 {
        errors.push(invalid(
            "storage.busy_timeout_ms",
            "must be greater than zero",
            None,
        ));
    }

    if !is_identifier(&storage.schema_table) {
        errors.push(invalid(
            "storage.schema_table",
            &format!("`{}` is not a plain table name", storage.schema_table),
            Some("use letters, digits and underscores, not starting with a digit".to_string()),
        ));
    }

    let level = config.logging.level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        let help = suggest_key(&level, LOG_LEVELS)
            .map(|s| format!("did you mean `{s}`?"))
            .or_else(|| Some(format!("valid levels: {}", LOG_LEVELS.join(", "))));
        errors.push(invalid(
            "logging.level",
            &format!("`{}` is not a log level", config.logging.level),
            help,
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn invalid(key: &str, message: &str, help: Option<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.to_string(),
        help,
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
