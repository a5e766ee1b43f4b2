pub mod docker;
pub mod gcloud;
pub mod probe;
pub mod runner;
pub mod workflow;

pub use docker::DockerClient;
pub use gcloud::GcloudClient;
pub use probe::{HealthProbe, HttpProbe, ProbeError, is_healthy};
pub use runner::{CommandError, ProcessRunner, RealRunner};
pub use workflow::{
    BuildError, DeployError, DeploymentOutcome, PreflightError, ProbeOutcome, Workflow,
    WorkflowError,
};
