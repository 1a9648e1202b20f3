use std::path::{Path, PathBuf};

use warship_core::STAGE_CONTEXT;

use crate::docker::DockerError;
use crate::executor::{DockerExecutor, RealExecutor};

/// Docker operations client, parameterized over the executor for testability.
pub struct DockerClient<E: DockerExecutor = RealExecutor> {
    executor: E,
}

impl DockerClient<RealExecutor> {
    pub fn new() -> Self {
        Self {
            executor: RealExecutor::new(),
        }
    }
}

impl Default for DockerClient<RealExecutor> {
    fn default() -> Self {
        Self::new()
    }
}

/// Inputs for a single `docker build`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    /// Full reference the image is tagged with (`name:tag`)
    pub image: String,
    pub dockerfile: PathBuf,
    /// Directory holding the generated files, exposed as [`STAGE_CONTEXT`]
    pub stage_dir: PathBuf,
    /// Build context (the workspace)
    pub context: PathBuf,
}

impl<E: DockerExecutor> DockerClient<E> {
    pub fn with_executor(executor: E) -> Self {
        Self { executor }
    }

    // ── Registry ──

    /// Whether `image` can be resolved in its registry.
    ///
    /// A failing `docker manifest inspect` means the image does not exist.
    /// Being unable to run docker at all is [`ImageCheckError::DockerUnavailable`].
    pub async fn image_exists(&self, image: &str) -> Result<bool, ImageCheckError> {
        tracing::info!(image, "checking for existence of runtime image");

        match self
            .executor
            .exec(&args(["manifest", "inspect", image]))
            .await
        {
            Ok(_) => Ok(true),
            Err(DockerError::CommandFailed {
                status,
                stdout,
                stderr,
                ..
            }) => {
                tracing::info!(%status, "docker manifest inspect failed");
                tracing::info!(stdout = %stdout.trim(), "docker stdout");
                tracing::info!(stderr = %stderr.trim(), "docker stderr");
                Ok(false)
            }
            Err(e @ DockerError::Unavailable { .. }) => {
                Err(ImageCheckError::DockerUnavailable { source: e })
            }
            Err(e) => Err(ImageCheckError::Inspect { source: e }),
        }
    }

    // ── Build ──

    /// Build and tag the image. Returns the image reference.
    pub async fn build(&self, request: &BuildRequest) -> Result<String, BuildError> {
        let dockerfile = path_arg(&request.dockerfile)?;
        let stage_dir = path_arg(&request.stage_dir)?;
        let context = path_arg(&request.context)?;

        tracing::info!(image = %request.image, "building custom Tomcat image");
        self.executor
            .exec_streaming(&args([
                "build",
                "-t",
                &request.image,
                "-f",
                dockerfile,
                "--build-context",
                &format!("{STAGE_CONTEXT}={stage_dir}"),
                context,
            ]))
            .await
            .map_err(|e| BuildError::Build { source: e })?;

        Ok(request.image.clone())
    }

    // ── Push ──

    pub async fn push(&self, image: &str) -> Result<(), PushError> {
        tracing::info!(image, "pushing custom Tomcat image");
        self.executor
            .exec_streaming(&args(["push", image]))
            .await
            .map_err(|e| PushError::Push { source: e })
    }
}

fn path_arg(path: &Path) -> Result<&str, BuildError> {
    path.to_str()
        .ok_or_else(|| BuildError::InvalidPath(path.to_path_buf()))
}

fn args<const N: usize>(a: [&str; N]) -> Vec<String> {
    a.iter().map(|s| (*s).to_owned()).collect()
}

// ── Error types ──

#[derive(Debug, thiserror::Error)]
pub enum ImageCheckError {
    #[error("docker is not available to check the runtime image")]
    DockerUnavailable { source: DockerError },

    #[error("could not inspect image manifest")]
    Inspect { source: DockerError },
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("build path is not valid UTF-8: {0}")]
    InvalidPath(std::path::PathBuf),

    #[error("building of custom Tomcat image failed")]
    Build { source: DockerError },
}

#[derive(Debug, thiserror::Error)]
pub enum PushError {
    #[error("pushing of custom Tomcat image failed")]
    Push { source: DockerError },
}
