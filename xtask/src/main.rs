// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask - Project Automation
//!
//! Wraps the cargo and tool invocations CI runs so they can be reproduced
//! locally with `cargo xtask <command>`.
//!
//! `verify-migrations` applies the embedded `SQLite` migrations to a fresh
//! in-memory database, checks the resulting schema against the tables and
//! relationships the persistence layer expects, then reverts every
//! migration and checks that nothing is left behind.

#![deny(
    clippy::pedantic,
    //clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::{fmt::Debug, io, process::Output, vec};

use cargo_metadata::MetadataCommand;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{
    Result,
    eyre::{Context, eyre},
};
use diesel::sql_types::Text;
use diesel::{QueryableByName, RunQueryDsl, SqliteConnection};
use duct::cmd;
use std::collections::{BTreeMap, BTreeSet};
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    match args.run() {
        Ok(()) => (),
        Err(err) => {
            tracing::error!("{err}");
            std::process::exit(1);
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask", styles = clap_cargo::style::CLAP_STYLING)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn run(self) -> Result<()> {
        self.command.run()
    }

    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Run CI checks (lint, build, test, migrations)
    CI,

    /// Build the project
    #[command(visible_alias = "b")]
    Build,

    /// Run cargo check
    #[command(visible_alias = "c")]
    Check,

    /// Generate code coverage report
    #[command(visible_alias = "cov")]
    Coverage,

    /// Check dependencies
    #[command(visible_alias = "cd")]
    Deny,

    /// Check unused dependencies
    #[command(visible_alias = "m")]
    Machete,

    /// Lint formatting, typos, clippy, and docs
    #[command(visible_alias = "l")]
    Lint,

    /// Run clippy on the project
    #[command(visible_alias = "cl")]
    LintClippy,

    /// Check documentation for errors and warnings
    #[command(visible_alias = "d")]
    LintDocs,

    /// Check for formatting issues in the project
    #[command(visible_alias = "lf")]
    LintFormatting,

    /// Lint markdown files
    #[command(visible_alias = "md")]
    LintMarkdown,

    /// Check for typos in the project
    #[command(visible_alias = "lt")]
    LintTypos,

    /// Fix clippy warnings in the project
    #[command(visible_alias = "fc")]
    FixClippy,

    /// Fix formatting issues in the project
    #[command(visible_alias = "fmt")]
    FixFormatting,

    /// Fix typos in the project
    #[command(visible_alias = "typos")]
    FixTypos,

    /// Run tests
    #[command(visible_alias = "t")]
    Test,

    /// Run doc tests
    #[command(visible_alias = "td")]
    TestDocs,

    /// Run lib tests
    #[command(visible_alias = "tl")]
    TestLibs,

    /// Apply and revert the `SQLite` migrations and check the schema
    #[command(visible_alias = "vm")]
    VerifyMigrations,
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => ci(),
            Self::Build => build(),
            Self::Check => check(),
            Self::Deny => deny(),
            Self::Machete => machete(),
            Self::Coverage => coverage(),
            Self::Lint => lint(),
            Self::LintClippy => lint_clippy(),
            Self::LintDocs => lint_docs(),
            Self::LintFormatting => lint_format(),
            Self::LintTypos => lint_typos(),
            Self::LintMarkdown => lint_markdown(),
            Self::FixClippy => fix_clippy(),
            Self::FixFormatting => fix_format(),
            Self::FixTypos => fix_typos(),
            Self::Test => test(),
            Self::TestDocs => test_docs(),
            Self::TestLibs => test_libs(),
            Self::VerifyMigrations => verify_migrations(),
        }
    }
}

/// Run CI checks (lint, build, test, migrations)
fn ci() -> Result<()> {
    lint()?;
    deny()?;
    machete()?;
    build()?;
    test()?;
    verify_migrations()?;
    Ok(())
}

fn deny() -> Result<()> {
    run_cargo(vec!["deny", "check"])
}

fn machete() -> Result<()> {
    cmd!("cargo-machete").run_with_trace()?;
    Ok(())
}

/// Build the project
fn build() -> Result<()> {
    run_cargo(vec!["build", "--all-targets", "--all-features"])
}

/// Run cargo check
fn check() -> Result<()> {
    run_cargo(vec!["check", "--all-targets", "--all-features"])
}

/// Generate code coverage report
fn coverage() -> Result<()> {
    run_cargo(vec![
        "llvm-cov",
        "--lcov",
        "--output-path",
        "target/lcov.info",
        "--all-features",
    ])
}

/// Lint formatting, typos, clippy, and docs (and a soft fail on markdown)
fn lint() -> Result<()> {
    lint_clippy()?;
    lint_docs()?;
    lint_format()?;
    lint_typos()?;
    if let Err(err) = lint_markdown() {
        tracing::warn!("markdownlint reported issues: {err}");
    }
    Ok(())
}

/// Run clippy on the project
fn lint_clippy() -> Result<()> {
    run_cargo(vec![
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ])
}

/// Fix clippy warnings in the project
fn fix_clippy() -> Result<()> {
    run_cargo(vec![
        "clippy",
        "--all-targets",
        "--all-features",
        "--fix",
        "--allow-dirty",
        "--allow-staged",
        "--",
        "-D",
        "warnings",
    ])
}

/// Check that docs build without errors using docs.rs-equivalent flags
fn lint_docs() -> Result<()> {
    let meta = MetadataCommand::new()
        .exec()
        .wrap_err("failed to get cargo metadata")?;

    for package in meta.workspace_default_packages() {
        cmd(
            "cargo",
            [
                "doc",
                "--no-deps",
                "--all-features",
                "--package",
                &package.name,
            ],
        )
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .env("RUSTDOCFLAGS", "--cfg docsrs -D warnings")
        .run_with_trace()?;
    }

    Ok(())
}

/// Lint formatting issues in the project
fn lint_format() -> Result<()> {
    run_cargo_nightly(vec!["fmt", "--all", "--check"])
}

/// Fix formatting issues in the project
fn fix_format() -> Result<()> {
    run_cargo_nightly(vec!["fmt", "--all"])
}

/// Lint markdown files using [markdownlint-cli2](https://github.com/DavidAnson/markdownlint-cli2)
fn lint_markdown() -> Result<()> {
    cmd!("markdownlint-cli2", "**/*.md", "!target", "!**/target").run_with_trace()?;

    Ok(())
}

/// Check for typos in the project using [typos-cli](https://github.com/crate-ci/typos/)
fn lint_typos() -> Result<()> {
    cmd!("typos").run_with_trace()?;
    Ok(())
}

/// Fix typos in the project
fn fix_typos() -> Result<()> {
    cmd!("typos", "-w").run_with_trace()?;
    Ok(())
}

/// Run tests for libs and docs
fn test() -> Result<()> {
    test_libs()?;
    test_docs()?; // run last because it's slow
    Ok(())
}

/// Run doc tests for the workspace's default packages
fn test_docs() -> Result<()> {
    run_cargo(vec!["test", "--doc", "--all-features"])
}

/// Run lib tests for the workspace's default packages
fn test_libs() -> Result<()> {
    run_cargo(vec!["test", "--all-targets", "--all-features"])
}

/// Run a cargo subcommand with the default toolchain
fn run_cargo(args: Vec<&str>) -> Result<()> {
    cmd("cargo", args).run_with_trace()?;
    Ok(())
}

/// Run a cargo subcommand with the nightly toolchain
fn run_cargo_nightly(args: Vec<&str>) -> Result<()> {
    cmd("cargo", args)
        // CARGO env var is set because we're running in a cargo subcommand
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .run_with_trace()?;
    Ok(())
}

/// Tables the persistence layer reads and writes, with the foreign keys
/// each one must declare as `(column, referenced table)`.
const EXPECTED_TABLES: &[(&str, &[(&str, &str)])] = &[
    ("employees", &[]),
    ("public_holidays", &[]),
    (
        "leaves",
        &[
            ("employee_id", "employees"),
            ("cover_employee_id", "employees"),
        ],
    ),
    ("leave_balances", &[("employee_id", "employees")]),
    (
        "cover_requests",
        &[
            ("leave_id", "leaves"),
            ("cover_employee_id", "employees"),
        ],
    ),
    (
        "cover_duty_reassignments",
        &[
            ("original_leave_id", "leaves"),
            ("cover_employee_leave_id", "leaves"),
            ("original_cover_employee_id", "employees"),
            ("new_cover_employee_id", "employees"),
        ],
    ),
    (
        "audit_events",
        &[
            ("leave_id", "leaves"),
            ("actor_employee_id", "employees"),
        ],
    ),
];

/// Verify the `SQLite` migrations.
///
/// ## What This Command Does
///
/// 1. Applies every embedded migration to an in-memory database with
///    foreign keys enforced
/// 2. Introspects the resulting tables and foreign keys
/// 3. Fails if an expected table or foreign key is missing, or if an
///    unexpected table exists
/// 4. Reverts every migration and fails if any table survives
///
/// ## Usage
///
/// ```bash
/// cargo xtask verify-migrations
/// ```
fn verify_migrations() -> Result<()> {
    use diesel::Connection;
    use diesel_migrations::{MigrationHarness, embed_migrations};

    tracing::info!("Starting migration verification");

    #[allow(clippy::items_after_statements)]
    const MIGRATIONS: diesel_migrations::EmbeddedMigrations =
        embed_migrations!("../crates/persistence/migrations");

    let mut conn = SqliteConnection::establish(":memory:")
        .wrap_err("Failed to create SQLite in-memory database")?;

    diesel::sql_query("PRAGMA foreign_keys = ON")
        .execute(&mut conn)
        .wrap_err("Failed to enable foreign keys on SQLite")?;

    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| eyre!("Failed to apply SQLite migrations: {}", e))?;
    tracing::info!("Migrations applied successfully");

    let schema: BTreeMap<String, BTreeSet<(String, String)>> = introspect_schema(&mut conn)?;
    compare_schema(&schema)?;
    tracing::info!("Schema matches expectations");

    conn.revert_all_migrations(MIGRATIONS)
        .map_err(|e| eyre!("Failed to revert SQLite migrations: {}", e))?;

    let leftover: BTreeMap<String, BTreeSet<(String, String)>> = introspect_schema(&mut conn)?;
    if !leftover.is_empty() {
        return Err(eyre!(
            "Tables survived reverting all migrations: {:?}",
            leftover.keys().collect::<Vec<_>>()
        ));
    }

    tracing::info!("✓ Migration verification passed");
    Ok(())
}

/// Reads each user table with its `(column, referenced table)` foreign keys.
fn introspect_schema(
    conn: &mut SqliteConnection,
) -> Result<BTreeMap<String, BTreeSet<(String, String)>>> {
    #[derive(QueryableByName)]
    struct TableName {
        #[diesel(sql_type = Text)]
        name: String,
    }

    #[derive(QueryableByName)]
    struct ForeignKeyInfo {
        #[diesel(sql_type = Text)]
        table: String,
        #[diesel(sql_type = Text)]
        from: String,
    }

    let tables: Vec<TableName> = diesel::sql_query(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' \
         AND name != '__diesel_schema_migrations' ORDER BY name",
    )
    .load(conn)
    .wrap_err("Failed to query SQLite tables")?;

    let mut schema: BTreeMap<String, BTreeSet<(String, String)>> = BTreeMap::new();
    for table in tables {
        let fks: Vec<ForeignKeyInfo> =
            diesel::sql_query(format!("PRAGMA foreign_key_list({})", table.name))
                .load(conn)
                .wrap_err(format!(
                    "Failed to get foreign keys for table {}",
                    table.name
                ))?;

        let keys: BTreeSet<(String, String)> =
            fks.into_iter().map(|fk| (fk.from, fk.table)).collect();
        schema.insert(table.name, keys);
    }

    Ok(schema)
}

/// Compares the introspected schema with [`EXPECTED_TABLES`].
fn compare_schema(schema: &BTreeMap<String, BTreeSet<(String, String)>>) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    for (table, foreign_keys) in EXPECTED_TABLES {
        let Some(actual) = schema.get(*table) else {
            errors.push(format!("Table '{table}' is missing"));
            continue;
        };
        for (column, referenced) in *foreign_keys {
            let key: (String, String) = ((*column).to_string(), (*referenced).to_string());
            if !actual.contains(&key) {
                errors.push(format!(
                    "Table '{table}' lacks foreign key {column} -> {referenced}"
                ));
            }
        }
    }

    let expected: BTreeSet<&str> = EXPECTED_TABLES.iter().map(|(name, _)| *name).collect();
    for table in schema.keys() {
        if !expected.contains(table.as_str()) {
            errors.push(format!("Unexpected table '{table}'"));
        }
    }

    if errors.is_empty() {
        return Ok(());
    }

    for error in &errors {
        tracing::error!("{error}");
    }
    Err(eyre!("Schema verification failed with {} error(s)", errors.len()))
}

/// An extension trait for `duct::Expression` that logs the command being run
/// before running it.
trait ExpressionExt {
    /// Run the command and log the command being run
    fn run_with_trace(&self) -> io::Result<Output>;
}

impl ExpressionExt for duct::Expression {
    fn run_with_trace(&self) -> io::Result<Output> {
        tracing::info!("running command: {:?}", self);
        self.run().inspect_err(|_| {
            // The command that was run may have scrolled off the screen, so repeat it here
            tracing::error!("failed to run command: {:?}", self);
        })
    }
}
