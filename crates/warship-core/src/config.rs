use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Name of the optional settings file looked up in the workspace root.
pub const CONFIG_FILE_NAME: &str = "warship.toml";

/// warship.toml configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WarshipConfig {
    #[serde(default)]
    pub runtime: RuntimeConfig,
    #[serde(default)]
    pub publish: PublishConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Repository holding the `<tomcat>-java<java>` runtime images
    #[serde(default = "default_image_repository")]
    pub image_repository: String,
    /// Tomcat installation directory inside the runtime image
    #[serde(default = "default_home")]
    pub home: String,
    /// Location the runtime entrypoint executes before starting Tomcat.
    ///
    /// The base image owns this contract: if a file exists here it is run
    /// once at container start, then Catalina is launched.
    #[serde(default = "default_startup_hook")]
    pub startup_hook: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublishConfig {
    /// Registry used when deriving the default image name
    #[serde(default = "default_registry")]
    pub registry: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            image_repository: default_image_repository(),
            home: default_home(),
            startup_hook: default_startup_hook(),
        }
    }
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            registry: default_registry(),
        }
    }
}

impl RuntimeConfig {
    /// `<home>/webapps/`, where the WAR file is deployed.
    pub fn webapps_dir(&self) -> String {
        format!("{}/webapps/", self.home.trim_end_matches('/'))
    }

    /// Absolute path of a file relative to the Tomcat home.
    pub fn home_path(&self, relative: &str) -> String {
        format!(
            "{}/{}",
            self.home.trim_end_matches('/'),
            relative.trim_start_matches('/')
        )
    }
}

impl WarshipConfig {
    /// Load from warship.toml in the given directory, or return defaults if not found.
    pub fn load(workspace: &Path) -> crate::Result<Self> {
        let config_path = workspace.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            Self::load_file(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load from an explicit path. A missing file is an error.
    pub fn load_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| crate::Error::ConfigLoad {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| crate::Error::ConfigParse {
            path: PathBuf::from(path),
            source: e,
        })
    }
}

fn default_image_repository() -> String {
    "ghcr.io/itechpros/tomcat".to_owned()
}

fn default_home() -> String {
    "/usr/share/tomcat".to_owned()
}

fn default_startup_hook() -> String {
    "/usr/share/tomcat/tomcat_start.sh".to_owned()
}

fn default_registry() -> String {
    "ghcr.io".to_owned()
}
