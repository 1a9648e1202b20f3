use std::io::Write;
use std::path::Path;

use warship_build::GitHistory;
use warship_core::{ActionContext, RawInputs, ResolvedConfiguration, RunStamp};
use warship_docker::DockerClient;

use crate::pipeline;

/// Resolve inputs, then verify, build, and push the custom image.
pub async fn publish(
    config_path: Option<&Path>,
    inputs: &RawInputs,
    context: &ActionContext,
    output_file: Option<&Path>,
) -> anyhow::Result<()> {
    let stamp = RunStamp::now();
    let settings = super::load_settings(config_path, &context.workspace)?;
    let commits = GitHistory::new(&context.workspace);
    let config = ResolvedConfiguration::resolve(inputs, context, &settings, &commits, stamp)?;
    tracing::info!(image = %config.image_reference(), "inputs resolved");

    let client = DockerClient::new();
    let outcome = pipeline::run(
        &client,
        &config,
        &settings,
        &context.workspace,
        &std::env::temp_dir(),
        stamp,
    )
    .await?;
    tracing::debug!(dir = %outcome.staged.dir.display(), "build files left in place");

    if let Some(path) = output_file {
        write_output(path, "image", &outcome.image)?;
    }

    println!("Published: {}", outcome.image);
    Ok(())
}

/// Append `key=value` to the runner's `GITHUB_OUTPUT` file.
fn write_output(path: &Path, key: &str, value: &str) -> anyhow::Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| anyhow::anyhow!("failed to open {}: {e}", path.display()))?;
    writeln!(file, "{key}={value}")
        .map_err(|e| anyhow::anyhow!("failed to write {}: {e}", path.display()))?;
    Ok(())
}
