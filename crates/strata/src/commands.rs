// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subcommand handlers and the registry that routes to them.
//!
//! Each subcommand becomes a named call with named arguments. The registry
//! applies the handler's [`ParamSpec`] (parsing `--params` JSON, for one)
//! before the handler touches the adapter.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Map, Value};
use strata_config::StrataConfig;
use strata_core::params::transformers::{parse_json, to_text};
use strata_core::{Args, DatabaseAdapter, ParamSpec, RequestContext, StrataError, Transformer};
use strata_registry::{handler_fn, HandlerFuture, HandlerRegistry};
use strata_storage::SqliteAdapter;

use crate::status;
use crate::Commands;

/// Named arguments after the spec has been applied.
pub struct CallArgs(Map<String, Value>);

impl CallArgs {
    fn new(args: Args) -> Result<Self, StrataError> {
        match args {
            Args::Named(map) => Ok(Self(map)),
            Args::Positional(_) => Err(StrataError::InvalidArgument(
                "expected named arguments".to_string(),
            )),
        }
    }

    fn text(&self, key: &str) -> Result<&str, StrataError> {
        self.opt_text(key)
            .ok_or_else(|| StrataError::InvalidArgument(format!("missing argument `{key}`")))
    }

    fn opt_text(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Statement parameters; absent or null means none.
    fn params(&self) -> Result<Vec<Value>, StrataError> {
        match self.0.get("params") {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(values)) => Ok(values.clone()),
            Some(other) => Err(StrataError::InvalidArgument(format!(
                "params must be a JSON array, got {other}"
            ))),
        }
    }
}

fn spec(keys: &[(&str, Transformer)]) -> ParamSpec {
    ParamSpec::Named(
        keys.iter()
            .map(|(key, t)| (key.to_string(), Some(t.clone())))
            .collect::<BTreeMap<_, _>>(),
    )
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, StrataError> {
    serde_json::to_value(value).map_err(|e| StrataError::Internal(format!("failed to encode result: {e}")))
}

/// Turn a parsed subcommand into a registry call.
pub fn to_call(command: Commands) -> Result<(&'static str, Args), StrataError> {
    let mut args = Map::new();
    let name = match command {
        Commands::Schema { file } => {
            let statement = std::fs::read_to_string(&file).map_err(|e| {
                StrataError::InvalidArgument(format!("cannot read {}: {e}", file.display()))
            })?;
            args.insert("statement".into(), Value::String(statement));
            "schema"
        }
        Commands::Query { sql, params } => {
            insert_statement(&mut args, sql, params);
            "query"
        }
        Commands::Insert { sql, params } => {
            insert_statement(&mut args, sql, params);
            "insert"
        }
        Commands::Exec {
            sql,
            params,
            returning,
        } => {
            insert_statement(&mut args, sql, params);
            if let Some(field) = returning {
                args.insert("returning".into(), Value::String(field));
            }
            "exec"
        }
        Commands::Allocate { name } => {
            args.insert("name".into(), Value::String(name));
            "allocate"
        }
        Commands::Status => "status",
    };
    Ok((name, Args::Named(args)))
}

fn insert_statement(args: &mut Map<String, Value>, sql: String, params: Option<String>) {
    args.insert("sql".into(), Value::String(sql));
    if let Some(params) = params {
        args.insert("params".into(), Value::String(params));
    }
}

/// Build the registry of subcommand handlers over one open adapter.
pub fn build_registry(
    adapter: Arc<SqliteAdapter>,
    config: StrataConfig,
) -> Result<HandlerRegistry, StrataError> {
    let mut registry = HandlerRegistry::new();
    let statement = || spec(&[("sql", to_text()), ("params", parse_json())]);

    register(&mut registry, "schema", spec(&[("statement", to_text())]), &adapter, schema)?;
    register(&mut registry, "query", statement(), &adapter, query)?;
    register(&mut registry, "insert", statement(), &adapter, insert)?;
    register(
        &mut registry,
        "exec",
        spec(&[("sql", to_text()), ("params", parse_json()), ("returning", to_text())]),
        &adapter,
        exec,
    )?;
    register(&mut registry, "allocate", spec(&[("name", to_text())]), &adapter, allocate)?;

    let storage = Arc::new(config.storage);
    register(
        &mut registry,
        "status",
        ParamSpec::Named(BTreeMap::new()),
        &adapter,
        move |db, ctx, _args| {
            let storage = storage.clone();
            async move { to_json(&status::run_status(&db, &ctx, &storage).await?) }
        },
    )?;

    Ok(registry)
}

fn register<F, Fut>(
    registry: &mut HandlerRegistry,
    name: &str,
    spec: ParamSpec,
    adapter: &Arc<SqliteAdapter>,
    f: F,
) -> Result<(), StrataError>
where
    F: Fn(Arc<SqliteAdapter>, RequestContext, CallArgs) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, StrataError>> + Send + 'static,
{
    let adapter = adapter.clone();
    registry.register(
        name,
        spec,
        handler_fn(move |ctx, args| -> HandlerFuture {
            match CallArgs::new(args) {
                Ok(args) => Box::pin(f(adapter.clone(), ctx, args)),
                Err(e) => Box::pin(std::future::ready(Err(e))),
            }
        }),
    )
}

async fn schema(
    db: Arc<SqliteAdapter>,
    ctx: RequestContext,
    args: CallArgs,
) -> Result<Value, StrataError> {
    let outcome = db
        .apply_schema(&ctx, args.text("statement")?, Some("cli.schema"))
        .await?;
    to_json(&outcome)
}

async fn query(
    db: Arc<SqliteAdapter>,
    ctx: RequestContext,
    args: CallArgs,
) -> Result<Value, StrataError> {
    let rows = db
        .read(&ctx, args.text("sql")?, &args.params()?, Some("cli.query"))
        .await?;
    Ok(Value::Array(rows.into_iter().map(Value::Object).collect()))
}

async fn insert(
    db: Arc<SqliteAdapter>,
    ctx: RequestContext,
    args: CallArgs,
) -> Result<Value, StrataError> {
    let id = db
        .insert(&ctx, args.text("sql")?, &args.params()?, Some("cli.insert"))
        .await?;
    to_json(&id)
}

async fn exec(
    db: Arc<SqliteAdapter>,
    ctx: RequestContext,
    args: CallArgs,
) -> Result<Value, StrataError> {
    let outcome = db
        .mutate(
            &ctx,
            args.text("sql")?,
            &args.params()?,
            args.opt_text("returning"),
            Some("cli.exec"),
        )
        .await?;
    to_json(&outcome)
}

async fn allocate(
    db: Arc<SqliteAdapter>,
    ctx: RequestContext,
    args: CallArgs,
) -> Result<Value, StrataError> {
    let name = args.text("name")?;
    let value = db.allocate(&ctx, name).await?;
    Ok(json!({ "name": name, "value": value }))
}
