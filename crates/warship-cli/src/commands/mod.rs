mod publish;
mod render;

use std::path::Path;

use warship_core::WarshipConfig;

pub use publish::publish;
pub use render::render;

/// Load settings from an explicit `--config` path, or the workspace default.
pub(crate) fn load_settings(
    config_path: Option<&Path>,
    workspace: &Path,
) -> anyhow::Result<WarshipConfig> {
    let settings = match config_path {
        Some(path) => WarshipConfig::load_file(path)?,
        None => WarshipConfig::load(workspace)?,
    };
    Ok(settings)
}

/// Escape a message for a `::error::` workflow command.
pub fn escape_annotation(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
