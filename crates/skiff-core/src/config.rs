use serde::{Deserialize, Serialize};

use crate::image::ImageReference;

/// skiff.toml configuration
///
/// Every field has a baked-in default targeting the corewatch-api
/// service, so the file is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkiffConfig {
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub build: BuildConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// GCP project ID
    #[serde(default = "default_project_id")]
    pub gcp_project_id: String,
    /// GCP region
    #[serde(default = "default_region")]
    pub region: String,
    /// Cloud Run service name
    #[serde(default = "default_service")]
    pub service: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Image repository path, without a tag
    #[serde(default = "default_repository")]
    pub repository: String,
    /// Prefix for default tags derived from the git revision
    #[serde(default = "default_tag_prefix")]
    pub tag_prefix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Passed to the image build as the SLIM_BUILD build argument
    #[serde(default = "default_slim")]
    pub slim: bool,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            gcp_project_id: default_project_id(),
            region: default_region(),
            service: default_service(),
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            repository: default_repository(),
            tag_prefix: default_tag_prefix(),
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            slim: default_slim(),
        }
    }
}

impl SkiffConfig {
    /// Load from skiff.toml at the given path, or return defaults if not found.
    pub fn load(project_dir: &std::path::Path) -> crate::Result<Self> {
        let config_path = project_dir.join("skiff.toml");
        if config_path.exists() {
            let content =
                std::fs::read_to_string(&config_path).map_err(|e| crate::Error::ConfigLoad {
                    path: config_path.clone(),
                    source: e,
                })?;
            toml::from_str(&content).map_err(|e| crate::Error::ConfigParse {
                path: config_path,
                source: e,
            })
        } else {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }
}

fn default_project_id() -> String {
    "corewatch-prod".to_owned()
}

fn default_region() -> String {
    "us-central1".to_owned()
}

fn default_service() -> String {
    "corewatch-api".to_owned()
}

fn default_repository() -> String {
    "us-central1-docker.pkg.dev/corewatch-prod/containers/corewatch-api".to_owned()
}

fn default_tag_prefix() -> String {
    "deploy".to_owned()
}

fn default_slim() -> bool {
    true
}

/// How the container image gets built and published.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// The managed build service builds the image and performs the deploy.
    Remote,
    /// docker builds and pushes locally; skiff performs the deploy itself.
    Local,
}

/// Immutable parameters for a single deployment run.
///
/// Assembled once from [`SkiffConfig`] plus the parsed command line,
/// then threaded through every stage.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub project_id: String,
    pub region: String,
    pub service: String,
    pub image: ImageReference,
    /// Short git revision, passed to the build as GIT_SHA
    pub revision: String,
    pub slim: bool,
    pub strategy: Strategy,
    pub skip_build: bool,
    pub dry_run: bool,
    pub no_cache: bool,
}
