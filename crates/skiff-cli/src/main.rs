use std::path::Path;

use clap::Parser;
use skiff_cloud::{ProbeOutcome, Workflow};
use skiff_core::{ImageReference, RunConfig, SkiffConfig, Strategy, resolve_tag, short_sha};

#[derive(Parser)]
#[command(name = "skiff", about = "Build and deploy the corewatch-api container to Cloud Run")]
#[command(version)]
struct Cli {
    /// Image tag (defaults to <tag_prefix>-<git short sha>)
    tag: Option<String>,

    /// Skip the build; the image must already exist in the registry
    #[arg(long)]
    skip_build: bool,

    /// Print the commands that would run without executing them
    #[arg(long)]
    dry_run: bool,

    /// Build locally with docker instead of the managed build service
    #[arg(long)]
    local: bool,

    /// Disable the container build cache
    #[arg(long)]
    no_cache: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let project_dir = Path::new(".");

    let settings = SkiffConfig::load(project_dir)?;
    let revision = short_sha(project_dir)?;

    let tag = resolve_tag(cli.tag.as_deref(), &settings.registry.tag_prefix, &revision);
    let config = RunConfig {
        project_id: settings.project.gcp_project_id,
        region: settings.project.region,
        service: settings.project.service,
        image: ImageReference::new(settings.registry.repository, tag),
        revision,
        slim: settings.build.slim,
        strategy: if cli.local {
            Strategy::Local
        } else {
            Strategy::Remote
        },
        skip_build: cli.skip_build,
        dry_run: cli.dry_run,
        no_cache: cli.no_cache,
    };

    println!(
        "Deploying {service} to {project} ({region}) as {image}",
        service = config.service,
        project = config.project_id,
        region = config.region,
        image = config.image,
    );

    let outcome = Workflow::new().run(&config).await?;

    println!();
    match &outcome.probe {
        ProbeOutcome::Healthy(status) => {
            println!("Service healthy (HTTP {status})");
        }
        ProbeOutcome::Unhealthy(status) => {
            println!("Warning: service responded with HTTP {status} — it may still be starting");
        }
        ProbeOutcome::Unreachable(detail) => {
            println!("Warning: could not verify service: {detail}");
        }
        ProbeOutcome::Skipped => {
            println!("Dry run complete — no commands were executed");
        }
    }
    if let Some(url) = &outcome.service_url {
        println!("Service URL: {url}");
    }

    Ok(())
}
