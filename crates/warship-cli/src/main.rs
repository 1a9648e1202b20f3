mod commands;
mod pipeline;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use warship_core::{ActionContext, RawInputs};

#[derive(Parser)]
#[command(
    name = "warship",
    about = "Package a WAR into a custom Tomcat image and publish it"
)]
#[command(version)]
struct Cli {
    /// Settings file (defaults to warship.toml in the workspace, if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify the runtime image, build the custom image, and push it
    Publish {
        #[command(flatten)]
        inputs: InputArgs,
        #[command(flatten)]
        context: ContextArgs,
    },
    /// Print the generated Dockerfile and startup script without building
    Render {
        #[command(flatten)]
        inputs: InputArgs,
        #[command(flatten)]
        context: ContextArgs,
    },
}

/// Action inputs. Flags win over the `INPUT_*` variables set by the runner.
#[derive(Args)]
struct InputArgs {
    /// Tomcat major version of the runtime image
    #[arg(long, env = "INPUT_TOMCAT-VERSION")]
    tomcat_version: Option<String>,
    /// Java major version of the runtime image
    #[arg(long, env = "INPUT_JAVA-VERSION")]
    java_version: Option<String>,
    /// Arbitrary base image, instead of a Tomcat/Java version pair
    #[arg(long, env = "INPUT_BASE-IMAGE")]
    base_image: Option<String>,
    /// WAR file, relative to the workspace
    #[arg(long, env = "INPUT_WAR-FILE")]
    war_file: Option<String>,
    /// Folder copied over the Tomcat home, relative to the workspace
    #[arg(long, env = "INPUT_TOMCAT-EXTRAS-FOLDER")]
    tomcat_extras_folder: Option<String>,
    /// Comma-separated ports to expose
    #[arg(long, env = "INPUT_PORTS")]
    ports: Option<String>,
    /// Container time zone (e.g. America/Chicago)
    #[arg(long, env = "INPUT_TIMEZONE")]
    timezone: Option<String>,
    /// Newline-separated template files, relative to the Tomcat home
    #[arg(long, env = "INPUT_EP-FILES")]
    ep_files: Option<String>,
    /// Image name (defaults to <registry>/<owner>/<repo>)
    #[arg(long, env = "INPUT_IMAGE-NAME")]
    image_name: Option<String>,
    /// Tag name or git ref
    #[arg(long, env = "INPUT_TAG-NAME")]
    tag_name: Option<String>,
}

/// Runner context.
#[derive(Args)]
struct ContextArgs {
    /// Checkout directory, used as the build context
    #[arg(long, env = "GITHUB_WORKSPACE", default_value = ".")]
    workspace: PathBuf,
    /// owner/repo
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: Option<String>,
    /// Event that triggered the workflow
    #[arg(long, env = "GITHUB_EVENT_NAME")]
    event_name: Option<String>,
    /// File receiving action outputs
    #[arg(long, env = "GITHUB_OUTPUT")]
    output_file: Option<PathBuf>,
}

impl From<InputArgs> for RawInputs {
    fn from(args: InputArgs) -> Self {
        Self {
            tomcat_version: args.tomcat_version,
            java_version: args.java_version,
            base_image: args.base_image,
            war_file: args.war_file,
            tomcat_extras_folder: args.tomcat_extras_folder,
            ports: args.ports,
            timezone: args.timezone,
            ep_files: args.ep_files,
            image_name: args.image_name,
            tag_name: args.tag_name,
        }
    }
}

impl ContextArgs {
    fn action_context(&self) -> ActionContext {
        ActionContext {
            workspace: self.workspace.clone(),
            repository: self.repository.clone(),
            event_name: self.event_name.clone(),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("::error::{}", commands::escape_annotation(&format!("{e:#}")));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Publish { inputs, context } => {
            commands::publish(
                config,
                &inputs.into(),
                &context.action_context(),
                context.output_file.as_deref(),
            )
            .await?
        }
        Commands::Render { inputs, context } => {
            commands::render(config, &inputs.into(), &context.action_context())?
        }
    }

    Ok(())
}
