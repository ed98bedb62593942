// Copyright (C) 2024-2025 Fred Clausen and the ratatui project contributors
// Copyright (C) 2026 NPLBAM contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask - Project Automation
//!
//! `cargo xtask <command>` wraps the cargo invocations used to check the
//! workspace, so CI and local runs stay identical. Only cargo, rustup's
//! nightly toolchain (for rustfmt and docs), `cargo-machete` and
//! `cargo-llvm-cov` are needed.
//!
//! - `cargo xtask ci`: clippy, formatting, docs, unused dependencies, tests
//! - `cargo xtask lint --fix`: apply clippy suggestions
//! - `cargo xtask serve -- --port 8080`: run the accounts server

#![deny(
    clippy::pedantic,
    //clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::{io, process::Output};

use cargo_metadata::MetadataCommand;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{eyre::Context, Result};
use duct::cmd;
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

/// Package name of the HTTP server binary.
const SERVER_PACKAGE: &str = "nplbam-accounts-server";

/// Flags shared by every build, lint and test invocation.
const ALL_TARGETS: [&str; 2] = ["--all-targets", "--all-features"];

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    if let Err(err) = args.command.run() {
        tracing::error!("{err}");
        std::process::exit(1);
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
    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Run every check CI runs
    CI,

    /// Build all targets
    #[command(visible_alias = "b")]
    Build,

    /// Type-check all targets
    #[command(visible_alias = "c")]
    Check,

    /// Write an lcov report to `target/lcov.info`
    #[command(visible_alias = "cov")]
    Coverage,

    /// Report dependencies no crate uses
    #[command(visible_alias = "m")]
    Machete,

    /// Run clippy with warnings denied
    #[command(visible_alias = "l")]
    Lint {
        /// Apply clippy's suggestions instead of only reporting them
        #[arg(long)]
        fix: bool,
    },

    /// Format the workspace with nightly rustfmt
    Fmt {
        /// Fail on unformatted code instead of rewriting it
        #[arg(long)]
        check: bool,
    },

    /// Build the docs of every default package with warnings denied
    #[command(visible_alias = "d")]
    Docs,

    /// Run unit, binary and doc tests
    #[command(visible_alias = "t")]
    Test {
        /// Run only the doc tests
        #[arg(long)]
        doc: bool,
    },

    /// Run the accounts server, passing any extra arguments through
    #[command(visible_alias = "s")]
    Serve {
        /// Arguments forwarded to the server binary
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => ci(),
            Self::Build => cargo("build", &ALL_TARGETS),
            Self::Check => cargo("check", &ALL_TARGETS),
            Self::Coverage => cargo(
                "llvm-cov",
                &["--lcov", "--output-path", "target/lcov.info", "--all-features"],
            ),
            Self::Machete => {
                cmd!("cargo-machete").run_with_trace()?;
                Ok(())
            }
            Self::Lint { fix } => clippy(fix),
            Self::Fmt { check } => fmt(check),
            Self::Docs => docs(),
            Self::Test { doc: true } => cargo("test", &["--doc", "--all-features"]),
            Self::Test { doc: false } => {
                cargo("test", &ALL_TARGETS)?;
                cargo("test", &["--doc", "--all-features"])
            }
            Self::Serve { args } => serve(&args),
        }
    }
}

/// Lint, then build and test
fn ci() -> Result<()> {
    clippy(false)?;
    fmt(true)?;
    docs()?;
    Command::Machete.run()?;
    Command::Build.run()?;
    Command::Test { doc: false }.run()
}

fn clippy(fix: bool) -> Result<()> {
    let mut args: Vec<&str> = ALL_TARGETS.to_vec();
    if fix {
        args.extend(["--fix", "--allow-dirty", "--allow-staged"]);
    }
    args.extend(["--", "-D", "warnings"]);
    cargo("clippy", &args)
}

fn fmt(check: bool) -> Result<()> {
    let args: &[&str] = if check {
        &["--all", "--check"]
    } else {
        &["--all"]
    };
    nightly(cmd("cargo", ["fmt"].iter().chain(args))).run_with_trace()?;
    Ok(())
}

/// Build docs with docs.rs-equivalent flags, one default package at a time
fn docs() -> Result<()> {
    let meta = MetadataCommand::new()
        .exec()
        .wrap_err("failed to get cargo metadata")?;

    for package in meta.workspace_default_packages() {
        let name: &str = &package.name;
        nightly(cmd!(
            "cargo",
            "doc",
            "--no-deps",
            "--all-features",
            "--package",
            name
        ))
        .env("RUSTDOCFLAGS", "--cfg docsrs -D warnings")
        .run_with_trace()?;
    }

    Ok(())
}

fn serve(server_args: &[String]) -> Result<()> {
    let mut args: Vec<&str> = vec!["--package", SERVER_PACKAGE, "--"];
    args.extend(server_args.iter().map(String::as_str));
    cargo("run", &args).wrap_err("accounts server exited with an error")
}

/// Run `cargo <subcommand> <args>` with the default toolchain
fn cargo(subcommand: &str, args: &[&str]) -> Result<()> {
    cmd("cargo", std::iter::once(&subcommand).chain(args)).run_with_trace()?;
    Ok(())
}

/// Switch an expression to the nightly toolchain
fn nightly(expression: duct::Expression) -> duct::Expression {
    // CARGO env var is set because we're running in a cargo subcommand
    expression
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
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
