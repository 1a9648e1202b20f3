use std::path::Path;

use warship_build::recipe::RecipeGenerator;
use warship_build::stage::{StageError, StagedRecipe, stage};
use warship_core::{ResolvedConfiguration, RunStamp, WarshipConfig};
use warship_docker::{
    BuildError, BuildRequest, DockerClient, DockerExecutor, ImageCheckError, PushError,
};

/// Result of a successful publish.
#[derive(Debug)]
pub(crate) struct PublishOutcome {
    /// Pushed `name:tag` reference
    pub image: String,
    pub staged: StagedRecipe,
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum PublishError {
    #[error("runtime image not found: {0}")]
    RuntimeImageNotFound(String),

    #[error(transparent)]
    ImageCheck(#[from] ImageCheckError),

    #[error(transparent)]
    Stage(#[from] StageError),

    #[error(transparent)]
    BuildFailed(#[from] BuildError),

    #[error(transparent)]
    PushFailed(#[from] PushError),
}

/// Verify → generate → stage → build → push. Stops at the first failure;
/// nothing is retried or rolled back.
pub(crate) async fn run<E: DockerExecutor>(
    client: &DockerClient<E>,
    config: &ResolvedConfiguration,
    settings: &WarshipConfig,
    workspace: &Path,
    stage_root: &Path,
    stamp: RunStamp,
) -> Result<PublishOutcome, PublishError> {
    let runtime_image = config.runtime.image_reference(&settings.runtime);
    if !client.image_exists(&runtime_image).await? {
        return Err(PublishError::RuntimeImageNotFound(runtime_image));
    }

    let generated = RecipeGenerator::new(config, &settings.runtime).generate();
    if let Some(script) = &generated.startup_script {
        tracing::info!("Startup script content:\n{script}");
    }
    tracing::info!("Dockerfile contents:\n{}", generated.recipe.render());

    let staged = stage(stage_root, stamp, &generated)?;

    let image = client
        .build(&BuildRequest {
            image: config.image_reference(),
            dockerfile: staged.dockerfile.clone(),
            stage_dir: staged.dir.clone(),
            context: workspace.to_path_buf(),
        })
        .await?;

    client.push(&image).await?;

    Ok(PublishOutcome { image, staged })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::Sequence;
    use mockall::mock;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use warship_core::RuntimeSelector;
    use warship_docker::DockerError;

    mock! {
        Executor {}

        impl DockerExecutor for Executor {
            async fn exec(&self, args: &[String]) -> Result<String, DockerError>;
            async fn exec_streaming(&self, args: &[String]) -> Result<(), DockerError>;
        }
    }

    fn config() -> ResolvedConfiguration {
        ResolvedConfiguration {
            runtime: RuntimeSelector::Versions {
                tomcat: 10,
                java: 11,
            },
            archive: PathBuf::from("app.war"),
            extras_folder: None,
            ports: vec![8080],
            timezone: None,
            template_files: vec!["conf/server.xml".to_owned()],
            image_name: "ghcr.io/octocat/hello-world".to_owned(),
            tag_name: "main".to_owned(),
        }
    }

    fn stamp() -> RunStamp {
        RunStamp::at("2024-06-01T12:30:45".parse().unwrap())
    }

    fn failed() -> DockerError {
        DockerError::CommandFailed {
            args: vec![],
            status: "exit status: 1".to_owned(),
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    fn first_arg_is(args: &[String], command: &str) -> bool {
        args.first().is_some_and(|a| a == command)
    }

    #[tokio::test]
    async fn publishes_in_order() {
        let tmp = TempDir::new().unwrap();
        let mut seq = Sequence::new();
        let mut mock = MockExecutor::new();

        mock.expect_exec()
            .withf(|args| args.iter().any(|a| a == "ghcr.io/itechpros/tomcat:10-java11"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok("{}".to_owned()));
        mock.expect_exec_streaming()
            .withf(|args| first_arg_is(args, "build"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        mock.expect_exec_streaming()
            .withf(|args| {
                first_arg_is(args, "push")
                    && args.get(1).is_some_and(|a| a == "ghcr.io/octocat/hello-world:main")
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let client = DockerClient::with_executor(mock);
        let outcome = run(
            &client,
            &config(),
            &WarshipConfig::default(),
            Path::new("/github/workspace"),
            tmp.path(),
            stamp(),
        )
        .await
        .unwrap();

        assert_eq!(outcome.image, "ghcr.io/octocat/hello-world:main");
        assert_eq!(outcome.staged.dir, tmp.path().join("2024-06-01_12-30-45"));
        assert!(outcome.staged.dockerfile.exists());
        assert!(outcome.staged.startup_script.is_some());
    }

    #[tokio::test]
    async fn missing_runtime_image_stops_before_build() {
        let tmp = TempDir::new().unwrap();
        let mut mock = MockExecutor::new();
        mock.expect_exec().returning(|_| Err(failed()));
        mock.expect_exec_streaming().never();

        let client = DockerClient::with_executor(mock);
        let result = run(
            &client,
            &config(),
            &WarshipConfig::default(),
            Path::new("."),
            tmp.path(),
            stamp(),
        )
        .await;

        match result {
            Err(PublishError::RuntimeImageNotFound(image)) => {
                assert_eq!(image, "ghcr.io/itechpros/tomcat:10-java11");
            }
            other => panic!("expected RuntimeImageNotFound, got {other:?}"),
        }
        assert!(std::fs::read_dir(tmp.path()).unwrap().next().is_none());
    }

    #[tokio::test]
    async fn base_image_is_checked_instead_of_runtime() {
        let tmp = TempDir::new().unwrap();
        let mut mock = MockExecutor::new();
        mock.expect_exec()
            .withf(|args| args.last().is_some_and(|a| a == "tomcat:10.1-jdk17"))
            .times(1)
            .returning(|_| Err(failed()));

        let config = ResolvedConfiguration {
            runtime: RuntimeSelector::BaseImage("tomcat:10.1-jdk17".to_owned()),
            ..config()
        };
        let client = DockerClient::with_executor(mock);
        let result = run(
            &client,
            &config,
            &WarshipConfig::default(),
            Path::new("."),
            tmp.path(),
            stamp(),
        )
        .await;

        assert!(matches!(result, Err(PublishError::RuntimeImageNotFound(_))));
    }

    #[tokio::test]
    async fn build_failure_skips_push() {
        let tmp = TempDir::new().unwrap();
        let mut mock = MockExecutor::new();
        mock.expect_exec().returning(|_| Ok("{}".to_owned()));
        mock.expect_exec_streaming()
            .withf(|args| first_arg_is(args, "build"))
            .times(1)
            .returning(|_| Err(failed()));
        mock.expect_exec_streaming()
            .withf(|args| first_arg_is(args, "push"))
            .never();

        let client = DockerClient::with_executor(mock);
        let result = run(
            &client,
            &config(),
            &WarshipConfig::default(),
            Path::new("."),
            tmp.path(),
            stamp(),
        )
        .await;

        assert!(matches!(result, Err(PublishError::BuildFailed(_))));
    }

    #[tokio::test]
    async fn push_failure_is_terminal() {
        let tmp = TempDir::new().unwrap();
        let mut mock = MockExecutor::new();
        mock.expect_exec().returning(|_| Ok("{}".to_owned()));
        mock.expect_exec_streaming()
            .withf(|args| first_arg_is(args, "build"))
            .returning(|_| Ok(()));
        mock.expect_exec_streaming()
            .withf(|args| first_arg_is(args, "push"))
            .times(1)
            .returning(|_| Err(failed()));

        let client = DockerClient::with_executor(mock);
        let result = run(
            &client,
            &config(),
            &WarshipConfig::default(),
            Path::new("."),
            tmp.path(),
            stamp(),
        )
        .await;

        assert!(matches!(result, Err(PublishError::PushFailed(_))));
    }
}
