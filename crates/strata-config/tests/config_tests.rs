// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Strata configuration system.

use std::path::Path;

use strata_config::diagnostic::ConfigError;
use strata_config::model::StrataConfig;
use strata_config::{load_and_validate_path, load_and_validate_str, load_config_from_path, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_strata_config() {
    let toml = r#"
[storage]
database_path = "/tmp/test.db"
wal_mode = false
busy_timeout_ms = 250
schema_table = "migrations"

[logging]
level = "debug"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.storage.database_path, "/tmp/test.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.storage.busy_timeout_ms, 250);
    assert_eq!(config.storage.schema_table, "migrations");
    assert_eq!(config.logging.level, "debug");
}

/// Missing sections fall back to defaults.
#[test]
fn missing_optional_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty config is valid");
    assert!(config.storage.wal_mode);
    assert_eq!(config.storage.busy_timeout_ms, 5000);
    assert_eq!(config.logging.level, "info");
}

/// Unknown top-level section is rejected.
#[test]
fn deny_unknown_fields_at_top_level() {
    let err = load_config_from_str("[pool]\nsize = 4\n").expect_err("should reject");
    assert!(format!("{err}").contains("pool"));
}

/// A typo in [storage] produces an UnknownKey diagnostic with a suggestion.
#[test]
fn diagnostic_wal_mod_suggests_wal_mode() {
    let toml = r#"
[storage]
wal_mod = false
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce errors");
    let found = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { key, suggestion, valid_keys, span, .. } if {
            key == "wal_mod"
                && suggestion.as_deref() == Some("wal_mode")
                && valid_keys.contains("busy_timeout_ms")
                && span.is_none()
        })
    });
    assert!(found, "expected UnknownKey for wal_mod, got: {errors:?}");
}

/// A string where a number is expected is reported as InvalidType.
#[test]
fn diagnostic_invalid_type_names_the_key() {
    let toml = r#"
[storage]
busy_timeout_ms = "soon"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject invalid type");
    assert!(
        errors.iter().any(|e| matches!(
            e,
            ConfigError::InvalidType { key, .. } if key == "storage.busy_timeout_ms"
        )),
        "got: {errors:?}"
    );
}

/// Semantic validation runs after a successful parse.
#[test]
fn validation_rejects_unknown_log_level() {
    let errors = load_and_validate_str("[logging]\nlevel = \"loud\"\n").expect_err("should fail");
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::InvalidValue { key, .. } if key == "logging.level"
    )));
}

/// Errors from a config file carry a span pointing at the offending key.
#[test]
fn file_errors_carry_source_span() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("strata.toml");
    let content = "[logging]\nlevel = \"info\"\n\n[storage]\nschema_tabel = \"x\"\n";
    std::fs::write(&path, content).unwrap();

    let errors = load_and_validate_path(&path).expect_err("should reject typo");
    let span = errors
        .iter()
        .find_map(|e| match e {
            ConfigError::UnknownKey { span, src, .. } => {
                assert!(src.is_some());
                *span
            }
            _ => None,
        })
        .expect("span should be resolved");
    assert_eq!(&content[span.offset()..span.offset() + span.len()], "schema_tabel");
}

/// STRATA_<SECTION>_<KEY> maps to section.key, keeping underscores in key names.
#[test]
fn env_vars_override_file_values() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "strata.toml",
            r#"
[storage]
database_path = "from-file.db"
busy_timeout_ms = 100
"#,
        )?;
        jail.set_env("STRATA_STORAGE_BUSY_TIMEOUT_MS", "750");
        jail.set_env("STRATA_STORAGE_SCHEMA_TABLE", "schema_history");
        jail.set_env("STRATA_LOGGING_LEVEL", "warn");

        let config = load_config_from_path(Path::new("strata.toml"))?;
        assert_eq!(config.storage.database_path, "from-file.db");
        assert_eq!(config.storage.busy_timeout_ms, 750);
        assert_eq!(config.storage.schema_table, "schema_history");
        assert_eq!(config.logging.level, "warn");
        Ok(())
    });
}

/// Env overrides apply on top of defaults with no config file present.
#[test]
fn env_vars_with_underscored_keys_map_to_fields() {
    figment::Jail::expect_with(|jail| {
        jail.set_env("STRATA_STORAGE_DATABASE_PATH", "env.db");
        jail.set_env("STRATA_STORAGE_WAL_MODE", "false");

        let config = strata_config::load_config()?;
        assert_eq!(config.storage.database_path, "env.db");
        assert!(!config.storage.wal_mode);
        Ok(())
    });
}

/// The full hierarchy picks up ./strata.toml from the working directory.
#[test]
fn local_config_file_is_discovered() {
    figment::Jail::expect_with(|jail| {
        jail.create_file("strata.toml", "[storage]\nwal_mode = false\n")?;
        let config = strata_config::load_config()?;
        assert!(!config.storage.wal_mode);
        Ok(())
    });
}

/// ConfigError renders through miette's graphical handler.
#[test]
fn config_error_renders_with_miette() {
    use miette::{Diagnostic, GraphicalReportHandler};

    let error = ConfigError::UnknownKey {
        key: "wal_mod".to_string(),
        suggestion: Some("wal_mode".to_string()),
        valid_keys: "database_path, wal_mode".to_string(),
        span: None,
        src: None,
    };
    assert_eq!(
        error.code().map(|c| c.to_string()).as_deref(),
        Some("strata::config::unknown_key")
    );

    let mut buf = String::new();
    GraphicalReportHandler::new()
        .render_report(&mut buf, &error)
        .expect("should render without error");
    assert!(buf.contains("wal_mod"));
    assert!(buf.contains("did you mean `wal_mode`"));
}

/// Serialized defaults round through figment unchanged.
#[test]
fn serialized_defaults_are_sensible() {
    use figment::{providers::Serialized, Figment};

    let config: StrataConfig = Figment::new()
        .merge(Serialized::defaults(StrataConfig::default()))
        .merge(("storage.schema_table", "custom_schema"))
        .extract()
        .expect("defaults should extract");
    assert_eq!(config.storage.schema_table, "custom_schema");
    assert!(config.storage.database_path.ends_with("strata.db"));
}
