// SPDX-License-Identifier: MIT

//! Helpers for locating and running external tools.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};

/// Locate `program` on PATH, like `command -v`.
pub fn find_program(program: &str) -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .map(|dir| dir.join(program))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Run a command to completion and return its trimmed stdout. A non-zero
/// exit becomes an error carrying the command line and the tool's stderr.
pub fn sh(name: &str, args: &[&str]) -> Result<String> {
    log::debug!("{} {}", name, args.join(" "));
    let output = Command::new(name)
        .args(args)
        .output()
        .with_context(|| format!("failed to run {name}"))?;
    if !output.status.success() {
        bail!(
            "command failed ({}): {} {}\n{}",
            output.status,
            name,
            args.join(" "),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

#[cfg(test)]
#[path = "shell_tests.rs"]
mod tests;
