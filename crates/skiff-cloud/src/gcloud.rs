use skiff_core::ImageReference;

use crate::runner::{CommandError, ProcessRunner, RealRunner};

const PROGRAM: &str = "gcloud";

/// gcloud operations client, parameterized over the runner for testability.
pub struct GcloudClient<R: ProcessRunner = RealRunner> {
    runner: R,
}

impl GcloudClient<RealRunner> {
    pub fn new() -> Self {
        Self { runner: RealRunner }
    }
}

impl Default for GcloudClient<RealRunner> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: ProcessRunner> GcloudClient<R> {
    pub fn with_runner(runner: R) -> Self {
        Self { runner }
    }

    /// CLI version, used as the installation probe.
    pub async fn version(&self) -> Result<String, CommandError> {
        let out = self.runner.exec(PROGRAM, &version_args()).await?;
        Ok(out.trim().to_owned())
    }

    /// Authentication probe; succeeds only for a logged-in operator.
    pub async fn auth_token(&self) -> Result<(), CommandError> {
        self.runner.exec(PROGRAM, &auth_token_args()).await?;
        Ok(())
    }

    /// Register gcloud as a docker credential helper for the registry host.
    pub async fn configure_docker(&self, host: &str) -> Result<(), CommandError> {
        self.runner
            .exec(PROGRAM, &configure_docker_args(host))
            .await?;
        Ok(())
    }

    /// Whether the image is already present in the remote registry.
    pub async fn image_exists(&self, image: &ImageReference) -> Result<bool, CommandError> {
        match self.runner.exec(PROGRAM, &image_describe_args(image)).await {
            Ok(_) => Ok(true),
            Err(CommandError::CommandFailed { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Hand the build (and the deploy it performs) to the managed build
    /// service, streaming its log output.
    pub async fn submit_build(
        &self,
        project_id: &str,
        image: &ImageReference,
        revision: &str,
        slim: bool,
    ) -> Result<(), CommandError> {
        self.runner
            .exec_streaming(PROGRAM, &builds_submit_args(project_id, image, revision, slim))
            .await
    }

    /// Deploy the image to Cloud Run; returns the service URL.
    pub async fn deploy(
        &self,
        service: &str,
        image: &ImageReference,
        project_id: &str,
        region: &str,
    ) -> Result<String, CommandError> {
        let out = self
            .runner
            .exec(PROGRAM, &deploy_args(service, image, project_id, region))
            .await?;
        Ok(out.trim().to_owned())
    }

    /// Public URL of the deployed service.
    pub async fn service_url(
        &self,
        service: &str,
        project_id: &str,
        region: &str,
    ) -> Result<String, CommandError> {
        let out = self
            .runner
            .exec(PROGRAM, &describe_service_args(service, project_id, region))
            .await?;
        Ok(out.trim().to_owned())
    }
}

// ── Argument builders ──
//
// Shared by the client and by dry-run output, so what skiff prints is
// exactly what it would execute.

pub fn version_args() -> Vec<String> {
    args(["version", "--format", "value(version)"])
}

pub fn auth_token_args() -> Vec<String> {
    args(["auth", "print-access-token", "--quiet"])
}

pub fn configure_docker_args(host: &str) -> Vec<String> {
    args(["auth", "configure-docker", host, "--quiet"])
}

pub fn image_describe_args(image: &ImageReference) -> Vec<String> {
    args([
        "artifacts",
        "docker",
        "images",
        "describe",
        &image.to_string(),
        "--quiet",
    ])
}

pub fn builds_submit_args(
    project_id: &str,
    image: &ImageReference,
    revision: &str,
    slim: bool,
) -> Vec<String> {
    let substitutions = format!(
        "_IMAGE_TAG={tag},_SLIM_BUILD={slim},_GIT_SHA={revision}",
        tag = image.tag,
        slim = if slim { "1" } else { "0" },
    );
    args([
        "builds",
        "submit",
        ".",
        "--project",
        project_id,
        "--config",
        "cloudbuild.yaml",
        "--substitutions",
        &substitutions,
        "--quiet",
    ])
}

pub fn deploy_args(
    service: &str,
    image: &ImageReference,
    project_id: &str,
    region: &str,
) -> Vec<String> {
    args([
        "run",
        "deploy",
        service,
        "--image",
        &image.to_string(),
        "--project",
        project_id,
        "--region",
        region,
        "--platform",
        "managed",
        "--quiet",
        "--format",
        "value(status.url)",
    ])
}

pub fn describe_service_args(service: &str, project_id: &str, region: &str) -> Vec<String> {
    args([
        "run",
        "services",
        "describe",
        service,
        "--project",
        project_id,
        "--region",
        region,
        "--format",
        "value(status.url)",
    ])
}

fn args<const N: usize>(a: [&str; N]) -> Vec<String> {
    a.iter().map(|s| (*s).to_owned()).collect()
}
