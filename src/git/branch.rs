use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::error::{JtError, Result};

/// Name of the branch checked out in `repo_path`.
pub fn current_branch(repo_path: &Path) -> Result<String> {
    let output = Command::new("git")
        .args(["symbolic-ref", "--short", "HEAD"])
        .current_dir(repo_path)
        .output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(JtError::Git(format!(
            "unable to read current branch: {}",
            stderr.trim()
        )));
    }

    let branch = String::from_utf8_lossy(&output.stdout).trim().to_string();
    debug!("current branch: {branch}");
    Ok(branch)
}
