use skiff_core::{RunConfig, Strategy};

use crate::docker::{self, DockerClient};
use crate::gcloud::{self, GcloudClient};
use crate::probe::{HealthProbe, HttpProbe, is_healthy};
use crate::runner::{CommandError, ProcessRunner, RealRunner, render};

/// The deployment workflow: prerequisite checks, build, deploy, verify.
///
/// Stages run strictly in order and short-circuit on failure, except
/// verification, which only ever degrades to a warning. Parameterized
/// over the runners and the probe so tests can drive it with mocks.
pub struct Workflow<
    G: ProcessRunner = RealRunner,
    D: ProcessRunner = RealRunner,
    P: HealthProbe = HttpProbe,
> {
    gcloud: GcloudClient<G>,
    docker: DockerClient<D>,
    probe: P,
}

impl Workflow {
    pub fn new() -> Self {
        Self {
            gcloud: GcloudClient::new(),
            docker: DockerClient::new(),
            probe: HttpProbe::new(),
        }
    }
}

impl Default for Workflow {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: ProcessRunner, D: ProcessRunner, P: HealthProbe> Workflow<G, D, P> {
    pub fn with_parts(gcloud: GcloudClient<G>, docker: DockerClient<D>, probe: P) -> Self {
        Self {
            gcloud,
            docker,
            probe,
        }
    }

    /// Run every stage against the given configuration.
    pub async fn run(&self, config: &RunConfig) -> Result<DeploymentOutcome, WorkflowError> {
        self.preflight(config).await?;

        let deployed_by_build = self.build(config).await?;
        if !deployed_by_build {
            self.deploy(config).await?;
        }

        Ok(self.verify(config).await)
    }

    // ── Stage 1: prerequisites ──

    async fn preflight(&self, config: &RunConfig) -> Result<(), PreflightError> {
        println!("Running pre-flight checks...");

        self.docker
            .version()
            .await
            .map_err(|e| PreflightError::DockerNotInstalled { source: e })?;
        self.gcloud
            .version()
            .await
            .map_err(|e| PreflightError::GcloudNotInstalled { source: e })?;
        self.gcloud
            .auth_token()
            .await
            .map_err(|e| PreflightError::NotAuthenticated { source: e })?;

        let host = config.image.registry_host().to_owned();
        let configured = docker::config_path()
            .map(|path| docker::registry_configured(&path, &host))
            .unwrap_or(false);
        if !configured {
            if config.dry_run {
                println!(
                    "[dry-run] {}",
                    render("gcloud", &gcloud::configure_docker_args(&host))
                );
            } else {
                println!("Configuring docker for {host}...");
                self.gcloud
                    .configure_docker(&host)
                    .await
                    .map_err(|e| PreflightError::ConfigureDocker { host, source: e })?;
            }
        }

        Ok(())
    }

    // ── Stage 2: build ──

    /// Returns `true` when the build path already performed the deploy,
    /// so the orchestrator must skip straight to verification.
    async fn build(&self, config: &RunConfig) -> Result<bool, WorkflowError> {
        if config.skip_build {
            if config.dry_run {
                println!(
                    "[dry-run] {}",
                    render("gcloud", &gcloud::image_describe_args(&config.image))
                );
            } else {
                println!("Verifying {} exists in the registry...", config.image);
                let exists = self
                    .gcloud
                    .image_exists(&config.image)
                    .await
                    .map_err(|e| WorkflowError::Registry { source: e })?;
                if !exists {
                    return Err(WorkflowError::MissingArtifact {
                        image: config.image.to_string(),
                    });
                }
            }
            return Ok(false);
        }

        match config.strategy {
            Strategy::Local => {
                if config.dry_run {
                    println!(
                        "[dry-run] {}",
                        render(
                            "docker",
                            &docker::build_args(
                                &config.image,
                                &config.revision,
                                config.slim,
                                config.no_cache,
                            ),
                        )
                    );
                } else {
                    println!("Building and pushing {}...", config.image);
                    self.docker
                        .build_and_push(
                            &config.image,
                            &config.revision,
                            config.slim,
                            config.no_cache,
                        )
                        .await
                        .map_err(|e| BuildError::Build { source: e })?;
                }
                Ok(false)
            }
            Strategy::Remote => {
                if config.dry_run {
                    println!(
                        "[dry-run] {}",
                        render(
                            "gcloud",
                            &gcloud::builds_submit_args(
                                &config.project_id,
                                &config.image,
                                &config.revision,
                                config.slim,
                            ),
                        )
                    );
                } else {
                    println!("Submitting build to Cloud Build...");
                    self.gcloud
                        .submit_build(
                            &config.project_id,
                            &config.image,
                            &config.revision,
                            config.slim,
                        )
                        .await
                        .map_err(|e| BuildError::Submit { source: e })?;
                }
                // cloudbuild.yaml owns the deploy step on this path
                Ok(true)
            }
        }
    }

    // ── Stage 3: deploy ──

    async fn deploy(&self, config: &RunConfig) -> Result<(), DeployError> {
        if config.dry_run {
            println!(
                "[dry-run] {}",
                render(
                    "gcloud",
                    &gcloud::deploy_args(
                        &config.service,
                        &config.image,
                        &config.project_id,
                        &config.region,
                    ),
                )
            );
            return Ok(());
        }

        println!("Deploying to Cloud Run ({})...", config.region);
        let url = self
            .gcloud
            .deploy(
                &config.service,
                &config.image,
                &config.project_id,
                &config.region,
            )
            .await
            .map_err(|e| DeployError::Deploy { source: e })?;
        println!("Deployed: {url}");

        Ok(())
    }

    // ── Stage 4: verify ──

    /// Best-effort liveness check. Never fails the run.
    async fn verify(&self, config: &RunConfig) -> DeploymentOutcome {
        if config.dry_run {
            println!(
                "[dry-run] {}",
                render(
                    "gcloud",
                    &gcloud::describe_service_args(
                        &config.service,
                        &config.project_id,
                        &config.region,
                    ),
                )
            );
            return DeploymentOutcome {
                service_url: None,
                probe: ProbeOutcome::Skipped,
            };
        }

        println!("Verifying service health...");
        let url = match self
            .gcloud
            .service_url(&config.service, &config.project_id, &config.region)
            .await
        {
            Ok(url) if !url.is_empty() => url,
            Ok(_) => {
                tracing::warn!(service = %config.service, "service reported no URL");
                return DeploymentOutcome {
                    service_url: None,
                    probe: ProbeOutcome::Unreachable("service reported no URL".to_owned()),
                };
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not query service URL");
                return DeploymentOutcome {
                    service_url: None,
                    probe: ProbeOutcome::Unreachable(e.to_string()),
                };
            }
        };

        let probe = match self.probe.status(&url).await {
            Ok(status) if is_healthy(status) => ProbeOutcome::Healthy(status),
            Ok(status) => {
                tracing::warn!(status, url = %url, "service responded unhealthy");
                ProbeOutcome::Unhealthy(status)
            }
            Err(e) => {
                tracing::warn!(error = %e, url = %url, "service unreachable");
                ProbeOutcome::Unreachable(e.to_string())
            }
        };

        DeploymentOutcome {
            service_url: Some(url),
            probe,
        }
    }
}

// ── Outcome types ──

/// What a run produced: the service URL, if one was queried, and the
/// result of the liveness probe.
#[derive(Debug)]
pub struct DeploymentOutcome {
    pub service_url: Option<String>,
    pub probe: ProbeOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Healthy(u16),
    Unhealthy(u16),
    Unreachable(String),
    /// Dry-run: no probe was issued.
    Skipped,
}

impl ProbeOutcome {
    pub fn is_healthy(&self) -> bool {
        matches!(self, ProbeOutcome::Healthy(_) | ProbeOutcome::Skipped)
    }
}

// ── Error types ──

#[derive(Debug, thiserror::Error)]
pub enum PreflightError {
    #[error("docker CLI not found — install docker and retry")]
    DockerNotInstalled { source: CommandError },

    #[error("gcloud CLI not found — install: https://cloud.google.com/sdk/docs/install")]
    GcloudNotInstalled { source: CommandError },

    #[error("not authenticated — run: gcloud auth login")]
    NotAuthenticated { source: CommandError },

    #[error("failed to configure docker credentials for {host}")]
    ConfigureDocker { host: String, source: CommandError },
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("image build failed")]
    Build { source: CommandError },

    #[error("build submission failed")]
    Submit { source: CommandError },
}

#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("cloud run deployment failed")]
    Deploy { source: CommandError },
}

#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Preflight(#[from] PreflightError),

    #[error("registry lookup failed")]
    Registry { source: CommandError },

    #[error("image {image} not found in the registry — run without --skip-build first")]
    MissingArtifact { image: String },

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Deploy(#[from] DeployError),
}
