use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load config from {path}")]
    ConfigLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Bad, conflicting, or missing action input. Raised before any external call.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("both tomcat-version/java-version and base-image were given; choose one")]
    ConflictingRuntimeSelector,

    #[error("no runtime selected: set tomcat-version and java-version, or base-image")]
    MissingRuntimeSelector,

    #[error("invalid {field}: {value:?}")]
    InvalidVersionFormat { field: &'static str, value: String },

    #[error("war-file is required")]
    MissingArchive,

    #[error("WAR file \"{0}\" not found")]
    ArchiveNotFound(PathBuf),

    #[error("WAR file \"{0}\" is not a file")]
    ArchiveNotAFile(PathBuf),

    #[error("Tomcat extras folder \"{0}\" not found")]
    ExtrasFolderNotFound(PathBuf),

    #[error("Tomcat extras folder \"{0}\" is not a directory")]
    ExtrasFolderNotADirectory(PathBuf),

    #[error("invalid port number: {0:?}")]
    InvalidPort(String),

    #[error("invalid time zone: {0:?}")]
    InvalidTimezone(String),

    #[error("image-name not set and GITHUB_REPOSITORY is unavailable to derive one")]
    MissingRepository,
}
