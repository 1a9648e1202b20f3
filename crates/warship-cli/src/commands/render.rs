use std::path::Path;

use warship_build::GitHistory;
use warship_build::recipe::{RecipeGenerator, STARTUP_SCRIPT_NAME};
use warship_core::{ActionContext, RawInputs, ResolvedConfiguration, RunStamp};

/// Resolve inputs and print what `publish` would build. No docker calls.
pub fn render(
    config_path: Option<&Path>,
    inputs: &RawInputs,
    context: &ActionContext,
) -> anyhow::Result<()> {
    let stamp = RunStamp::now();
    let settings = super::load_settings(config_path, &context.workspace)?;
    let commits = GitHistory::new(&context.workspace);
    let config = ResolvedConfiguration::resolve(inputs, context, &settings, &commits, stamp)?;

    let generated = RecipeGenerator::new(&config, &settings.runtime).generate();

    println!("Image: {}", config.image_reference());
    println!();
    println!("--- Dockerfile ---");
    print!("{}", generated.recipe.render());
    if let Some(script) = &generated.startup_script {
        println!();
        println!("--- {STARTUP_SCRIPT_NAME} ---");
        print!("{script}");
    }

    Ok(())
}
