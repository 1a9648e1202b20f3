pub mod client;
pub mod docker;
pub mod executor;

pub use client::{BuildError, BuildRequest, DockerClient, ImageCheckError, PushError};
pub use docker::DockerError;
pub use executor::{DEFAULT_PROGRAM, DockerExecutor, RealExecutor};
