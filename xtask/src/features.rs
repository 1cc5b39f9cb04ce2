use std::process::Command;

use anyhow::{Context, Result};

const FEATURE_COMBINATIONS: &[&[&str]] = &[&[], &["ts-gen"]];

/// Check that every supported feature combination of the domain crate compiles.
pub fn test_feature_matrix() -> Result<()> {
    for (index, features) in FEATURE_COMBINATIONS.iter().enumerate() {
        let joined = features.join(",");
        let label = if features.is_empty() { "default" } else { joined.as_str() };
        println!("[{}/{}] cargo check -p cadence-domain ({label})", index + 1, FEATURE_COMBINATIONS.len());

        let mut command = Command::new("cargo");
        command.args(["check", "-p", "cadence-domain"]);
        if !features.is_empty() {
            command.args(["--features", joined.as_str()]);
        }

        let status =
            command.status().with_context(|| format!("Failed to run cargo check for '{label}'"))?;
        if !status.success() {
            anyhow::bail!("Feature combination '{label}' failed to compile");
        }
    }

    println!("✅ All {} feature combinations compile", FEATURE_COMBINATIONS.len());
    Ok(())
}
