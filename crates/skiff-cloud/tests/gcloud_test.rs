use mockall::mock;
use skiff_cloud::gcloud::{self, GcloudClient};
use skiff_cloud::runner::{CommandError, ProcessRunner};
use skiff_core::ImageReference;

mock! {
    Runner {}

    impl ProcessRunner for Runner {
        async fn exec(&self, program: &str, args: &[String]) -> Result<String, CommandError>;
        async fn exec_streaming(&self, program: &str, args: &[String]) -> Result<(), CommandError>;
    }
}

fn image(tag: &str) -> ImageReference {
    ImageReference::new(
        "us-central1-docker.pkg.dev/corewatch-prod/containers/corewatch-api",
        tag,
    )
}

fn command_failed() -> CommandError {
    CommandError::CommandFailed {
        program: "gcloud".to_owned(),
        args: vec![],
        stderr: "boom".to_owned(),
    }
}

// ── Installation / auth probes ──

#[tokio::test]
async fn version_returns_trimmed_output() {
    let mut mock = MockRunner::new();

    mock.expect_exec()
        .withf(|program, args| program == "gcloud" && args.contains(&"version".to_owned()))
        .returning(|_, _| Ok("495.0.0\n".to_owned()));

    let client = GcloudClient::with_runner(mock);
    assert_eq!(client.version().await.unwrap(), "495.0.0");
}

#[tokio::test]
async fn auth_token_failure_propagates() {
    let mut mock = MockRunner::new();

    mock.expect_exec()
        .withf(|_, args| args.contains(&"print-access-token".to_owned()))
        .returning(|_, _| Err(command_failed()));

    let client = GcloudClient::with_runner(mock);
    assert!(client.auth_token().await.is_err());
}

// ── Registry image lookup ──

#[tokio::test]
async fn image_exists_true_when_describe_succeeds() {
    let mut mock = MockRunner::new();

    mock.expect_exec()
        .withf(|_, args| {
            args.contains(&"artifacts".to_owned()) && args.contains(&"describe".to_owned())
        })
        .returning(|_, _| Ok("image_summary:\n".to_owned()));

    let client = GcloudClient::with_runner(mock);
    assert!(client.image_exists(&image("v2.3.1")).await.unwrap());
}

#[tokio::test]
async fn image_exists_false_when_describe_fails() {
    let mut mock = MockRunner::new();

    mock.expect_exec()
        .withf(|_, args| args.contains(&"artifacts".to_owned()))
        .returning(|_, _| Err(command_failed()));

    let client = GcloudClient::with_runner(mock);
    assert!(!client.image_exists(&image("ghost")).await.unwrap());
}

#[tokio::test]
async fn image_exists_errors_when_gcloud_missing() {
    let mut mock = MockRunner::new();

    mock.expect_exec().returning(|_, _| {
        Err(CommandError::NotFound {
            program: "gcloud".to_owned(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        })
    });

    let client = GcloudClient::with_runner(mock);
    assert!(client.image_exists(&image("v1")).await.is_err());
}

// ── Cloud Build submission ──

#[tokio::test]
async fn submit_build_passes_substitutions() {
    let mut mock = MockRunner::new();

    mock.expect_exec_streaming()
        .withf(|program, args| {
            program == "gcloud"
                && args.contains(&"builds".to_owned())
                && args.contains(&"submit".to_owned())
                && args.contains(&"cloudbuild.yaml".to_owned())
                && args.contains(&"_IMAGE_TAG=v2.3.1,_SLIM_BUILD=1,_GIT_SHA=abc1234".to_owned())
        })
        .returning(|_, _| Ok(()));

    let client = GcloudClient::with_runner(mock);
    let result = client
        .submit_build("corewatch-prod", &image("v2.3.1"), "abc1234", true)
        .await;

    assert!(result.is_ok());
}

// ── Cloud Run deploy ──

#[tokio::test]
async fn deploy_returns_service_url() {
    let mut mock = MockRunner::new();

    mock.expect_exec()
        .withf(|_, args| {
            args.contains(&"run".to_owned())
                && args.contains(&"deploy".to_owned())
                && args.contains(&"--platform".to_owned())
                && args.contains(&"managed".to_owned())
                && args.contains(&"value(status.url)".to_owned())
        })
        .returning(|_, _| Ok("https://corewatch-api-abc123-uc.a.run.app\n".to_owned()));

    let client = GcloudClient::with_runner(mock);
    let url = client
        .deploy("corewatch-api", &image("v2.3.1"), "corewatch-prod", "us-central1")
        .await
        .unwrap();

    assert_eq!(url, "https://corewatch-api-abc123-uc.a.run.app");
}

#[tokio::test]
async fn deploy_failure_propagates() {
    let mut mock = MockRunner::new();

    mock.expect_exec()
        .withf(|_, args| args.contains(&"deploy".to_owned()))
        .returning(|_, _| Err(command_failed()));

    let client = GcloudClient::with_runner(mock);
    let result = client
        .deploy("corewatch-api", &image("v1"), "corewatch-prod", "us-central1")
        .await;

    assert!(result.is_err());
}

// ── Service describe ──

#[tokio::test]
async fn service_url_returns_trimmed_output() {
    let mut mock = MockRunner::new();

    mock.expect_exec()
        .withf(|_, args| {
            args.contains(&"services".to_owned()) && args.contains(&"describe".to_owned())
        })
        .returning(|_, _| Ok("https://corewatch-api-abc123-uc.a.run.app\n".to_owned()));

    let client = GcloudClient::with_runner(mock);
    let url = client
        .service_url("corewatch-api", "corewatch-prod", "us-central1")
        .await
        .unwrap();

    assert_eq!(url, "https://corewatch-api-abc123-uc.a.run.app");
}

// ── Argument builders ──

#[test]
fn deploy_args_reference_the_full_image() {
    let args = gcloud::deploy_args(
        "corewatch-api",
        &image("v2.3.1"),
        "corewatch-prod",
        "us-central1",
    );

    let image_pos = args.iter().position(|a| a == "--image").unwrap();
    assert_eq!(
        args[image_pos + 1],
        "us-central1-docker.pkg.dev/corewatch-prod/containers/corewatch-api:v2.3.1"
    );
}

#[test]
fn builds_submit_args_encode_slim_switch() {
    let slim = gcloud::builds_submit_args("corewatch-prod", &image("v1"), "abc1234", true);
    let full = gcloud::builds_submit_args("corewatch-prod", &image("v1"), "abc1234", false);

    assert!(slim.contains(&"_IMAGE_TAG=v1,_SLIM_BUILD=1,_GIT_SHA=abc1234".to_owned()));
    assert!(full.contains(&"_IMAGE_TAG=v1,_SLIM_BUILD=0,_GIT_SHA=abc1234".to_owned()));
}

#[test]
fn configure_docker_args_target_the_host() {
    let args = gcloud::configure_docker_args("us-central1-docker.pkg.dev");

    assert!(args.contains(&"configure-docker".to_owned()));
    assert!(args.contains(&"us-central1-docker.pkg.dev".to_owned()));
    assert!(args.contains(&"--quiet".to_owned()));
}
