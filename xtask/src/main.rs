//! Development automation tasks for the Cadence workspace.
//!
//! Run with: `cargo xtask <command>`
//!
//! This is a CLI tool for developers, so `println!` and `eprintln!` are
//! used for user-facing output rather than structured logging.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::process::{Command, ExitCode};

use anyhow::{bail, Context};

mod features;

const BINDINGS_DIR: &str = "crates/domain/bindings";

fn main() -> ExitCode {
    let task = std::env::args().nth(1);

    let result = match task.as_deref() {
        Some("ci") => run_ci(),
        Some("fmt") => run_fmt(),
        Some("clippy") => run_clippy(),
        Some("test") => run_test(),
        Some("bench") => cargo(&["bench", "-p", "cadence-core"], "Benchmarks failed"),
        Some("codegen") => run_codegen(),
        Some("test-features") => features::test_feature_matrix(),
        Some("help") | None => {
            print_help();
            Ok(())
        }
        Some(unknown) => {
            eprintln!("Unknown task: {unknown}");
            eprintln!();
            print_help();
            Err(anyhow::anyhow!("Unknown task"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Task failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn print_help() {
    println!("Cadence Development Tasks");
    println!();
    println!("USAGE:");
    println!("    cargo xtask <TASK>");
    println!();
    println!("TASKS:");
    println!("    ci             Run fmt, clippy, the feature matrix and tests");
    println!("    fmt            Check Rust code formatting");
    println!("    clippy         Run Clippy lints");
    println!("    test           Run all tests");
    println!("    bench          Run the edit controller benchmarks");
    println!("    codegen        Generate TypeScript bindings for the domain types");
    println!("    test-features  Verify cadence-domain compiles with and without ts-gen");
    println!("    help           Show this help message");
}

/// Run all CI checks in sequence
fn run_ci() -> anyhow::Result<()> {
    println!("==> Step 1/4: Checking Rust format...");
    run_fmt()?;

    println!("\n==> Step 2/4: Running Clippy...");
    run_clippy()?;

    println!("\n==> Step 3/4: Checking feature matrix...");
    features::test_feature_matrix()?;

    println!("\n==> Step 4/4: Running tests...");
    run_test()?;

    println!("\n✓ All CI checks passed!");
    Ok(())
}

fn run_fmt() -> anyhow::Result<()> {
    cargo(&["fmt", "--all", "--", "--check"], "Format check failed. Run 'cargo fmt --all' to fix.")
}

fn run_clippy() -> anyhow::Result<()> {
    cargo(&["clippy", "--workspace", "--all-targets"], "Clippy run failed. See output above.")
}

fn run_test() -> anyhow::Result<()> {
    cargo(&["test", "--workspace"], "Tests failed")
}

fn cargo(args: &[&str], failure: &str) -> anyhow::Result<()> {
    let status = Command::new("cargo")
        .args(args)
        .status()
        .with_context(|| format!("Failed to run cargo {}", args.join(" ")))?;

    if !status.success() {
        bail!("{failure}");
    }
    Ok(())
}

/// Export ts-rs bindings and write an index that re-exports them.
fn run_codegen() -> anyhow::Result<()> {
    println!("==> Generating TypeScript types from Rust...");
    cargo(
        &["test", "-p", "cadence-domain", "--features", "ts-gen", "--lib"],
        "TypeScript generation tests failed",
    )?;

    let bindings = Path::new(BINDINGS_DIR);
    if !bindings.exists() {
        bail!("Bindings directory not found at {}", bindings.display());
    }

    let count = generate_index_ts(bindings)?;
    println!("\n✓ Generated index.ts with {count} exports in {}", bindings.display());
    Ok(())
}

fn generate_index_ts(types_dir: &Path) -> anyhow::Result<usize> {
    let entries = fs::read_dir(types_dir).context("Failed to read bindings directory")?;

    let mut modules: Vec<String> = entries
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let name = entry.file_name().to_str()?.to_owned();
            let module = name.strip_suffix(".ts")?;
            (module != "index").then(|| module.to_owned())
        })
        .collect();
    modules.sort();

    let mut content = String::from(
        "// Auto-generated types from the Cadence domain crate\n\
         // Generated by ts-rs via: cargo xtask codegen\n\n",
    );
    for module in &modules {
        let _ = writeln!(content, "export type {{ {module} }} from './{module}';");
    }

    let index_path = types_dir.join("index.ts");
    fs::write(&index_path, content)
        .with_context(|| format!("Failed to write {}", index_path.display()))?;
    Ok(modules.len())
}
