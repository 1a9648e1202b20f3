#[derive(Debug, thiserror::Error)]
pub enum DockerError {
    #[error("could not run {program}; is Docker installed? https://docs.docker.com/engine/install/")]
    Unavailable {
        program: String,
        source: std::io::Error,
    },

    #[error("docker command failed: {args:?} ({status})\n{stderr}")]
    CommandFailed {
        args: Vec<String>,
        status: String,
        stdout: String,
        stderr: String,
    },

    #[error("docker output was not valid UTF-8")]
    InvalidUtf8 { source: std::string::FromUtf8Error },
}
