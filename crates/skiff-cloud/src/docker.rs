use std::path::{Path, PathBuf};

use skiff_core::ImageReference;

use crate::runner::{CommandError, ProcessRunner, RealRunner};

const PROGRAM: &str = "docker";

/// Cloud Run runs linux/amd64 containers; builds always target it.
pub const TARGET_PLATFORM: &str = "linux/amd64";

/// docker operations client, parameterized over the runner for testability.
pub struct DockerClient<R: ProcessRunner = RealRunner> {
    runner: R,
}

impl DockerClient<RealRunner> {
    pub fn new() -> Self {
        Self { runner: RealRunner }
    }
}

impl Default for DockerClient<RealRunner> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: ProcessRunner> DockerClient<R> {
    pub fn with_runner(runner: R) -> Self {
        Self { runner }
    }

    /// Client version, used as the installation probe.
    pub async fn version(&self) -> Result<String, CommandError> {
        let out = self.runner.exec(PROGRAM, &version_args()).await?;
        Ok(out.trim().to_owned())
    }

    /// Build the image and push it to the registry in one step,
    /// streaming build output.
    pub async fn build_and_push(
        &self,
        image: &ImageReference,
        revision: &str,
        slim: bool,
        no_cache: bool,
    ) -> Result<(), CommandError> {
        self.runner
            .exec_streaming(PROGRAM, &build_args(image, revision, slim, no_cache))
            .await
    }
}

// ── Argument builders ──

pub fn version_args() -> Vec<String> {
    vec!["--version".to_owned()]
}

pub fn build_args(
    image: &ImageReference,
    revision: &str,
    slim: bool,
    no_cache: bool,
) -> Vec<String> {
    let mut cmd = vec![
        "buildx".to_owned(),
        "build".to_owned(),
        "--platform".to_owned(),
        TARGET_PLATFORM.to_owned(),
        "--build-arg".to_owned(),
        format!("SLIM_BUILD={}", if slim { "1" } else { "0" }),
        "--build-arg".to_owned(),
        format!("GIT_SHA={revision}"),
        "-t".to_owned(),
        image.to_string(),
        "--push".to_owned(),
    ];
    if no_cache {
        cmd.push("--no-cache".to_owned());
    }
    cmd.push(".".to_owned());
    cmd
}

// ── Registry credential helper lookup ──

/// Path of the docker client configuration, if a home directory is known.
pub fn config_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| Path::new(&home).join(".docker").join("config.json"))
}

/// Whether the docker config already names a credential helper for the
/// registry host. A missing or unparsable config counts as not configured.
pub fn registry_configured(config_path: &Path, host: &str) -> bool {
    let Ok(content) = std::fs::read_to_string(config_path) else {
        return false;
    };
    let Ok(config) = serde_json::from_str::<serde_json::Value>(&content) else {
        return false;
    };
    config
        .get("credHelpers")
        .and_then(|helpers| helpers.get(host))
        .is_some()
}
