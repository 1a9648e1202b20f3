use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use warship_core::RunStamp;

use crate::recipe::{GeneratedRecipe, STARTUP_SCRIPT_NAME};

/// Gives up after this many name collisions within one second.
const MAX_STAGE_ATTEMPTS: u32 = 100;

/// Paths of the files written by [`stage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedRecipe {
    pub dir: PathBuf,
    pub dockerfile: PathBuf,
    pub startup_script: Option<PathBuf>,
}

/// Writes the generated Dockerfile and startup script into a fresh
/// `<root>/<stamp>` directory.
///
/// The directory is never removed; runners are disposable.
pub fn stage(
    root: &Path,
    stamp: RunStamp,
    generated: &GeneratedRecipe,
) -> Result<StagedRecipe, StageError> {
    let dir = create_unique_dir(root, &stamp.to_string())?;

    let dockerfile = dir.join("Dockerfile");
    std::fs::write(&dockerfile, generated.recipe.render()).map_err(|e| StageError::Write {
        path: dockerfile.clone(),
        source: e,
    })?;

    let startup_script = match &generated.startup_script {
        Some(content) => {
            let path = dir.join(STARTUP_SCRIPT_NAME);
            std::fs::write(&path, content).map_err(|e| StageError::Write {
                path: path.clone(),
                source: e,
            })?;
            Some(path)
        }
        None => None,
    };

    tracing::debug!(dir = %dir.display(), "staged build files");

    Ok(StagedRecipe {
        dir,
        dockerfile,
        startup_script,
    })
}

fn create_unique_dir(root: &Path, name: &str) -> Result<PathBuf, StageError> {
    std::fs::create_dir_all(root).map_err(|e| StageError::Create {
        path: root.to_path_buf(),
        source: e,
    })?;

    for attempt in 0..MAX_STAGE_ATTEMPTS {
        let dir = if attempt == 0 {
            root.join(name)
        } else {
            root.join(format!("{name}-{attempt}"))
        };
        match std::fs::create_dir(&dir) {
            Ok(()) => return Ok(dir),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(StageError::Create { path: dir, source: e }),
        }
    }

    Err(StageError::Exhausted {
        root: root.to_path_buf(),
        name: name.to_owned(),
    })
}

#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error("failed to create staging directory {path}")]
    Create {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {path}")]
    Write {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    #[error("no free staging directory for {name} under {root}")]
    Exhausted {
        root: std::path::PathBuf,
        name: String,
    },
}
