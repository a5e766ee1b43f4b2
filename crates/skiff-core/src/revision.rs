use std::path::Path;
use std::process::Command;

/// Abbreviated commit id of HEAD, as printed by `git rev-parse --short`.
///
/// Default image tags are derived from this, so a missing repository or
/// a missing git binary is a configuration error rather than a warning.
pub fn short_sha(project_dir: &Path) -> crate::Result<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .current_dir(project_dir)
        .output()
        .map_err(|e| crate::Error::GitCommand {
            detail: "failed to execute git rev-parse".to_owned(),
            source: e,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(crate::Error::GitFailed {
            detail: format!(
                "git rev-parse exited with {}: {}",
                output.status,
                stderr.trim()
            ),
        });
    }

    let sha = String::from_utf8_lossy(&output.stdout).trim().to_owned();
    if sha.is_empty() {
        return Err(crate::Error::EmptyRevision {
            dir: project_dir.to_path_buf(),
        });
    }

    Ok(sha)
}
