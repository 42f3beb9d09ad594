//! repo-deploy entry point.
//!
//! This binary is the composition root for the workspace. Responsibilities:
//!
//! 1. **Parse arguments** with `clap` and validate credentials from the
//!    environment before any engine call is made.
//! 2. **Wire observability**: `tracing-subscriber` with a text or JSON layer,
//!    plus an OpenTelemetry OTLP exporter when one is configured.
//! 3. **Render the program** for the selected resources into the work
//!    directory.
//! 4. **Construct the adapter** (`PulumiStack`) and hand it to
//!    [`orchestrator::deploy_run`].

mod program;
mod settings;
mod summary;
mod telemetry;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use pulumi::{PulumiSettings, PulumiStack};
use stack::{
    DeploymentRunId, EnvironmentName, ProjectName, RepositoryName, Stack, StackName, Timestamp,
};
use tracing::{error, info};

use crate::program::{build_program, selection_from, ProgramSelection};
use crate::settings::Credentials;
use crate::summary::{render_outputs, DeploymentSummary};
use crate::telemetry::LogFormat;

#[derive(Debug, Parser)]
#[command(name = "repo-deploy", version, about = "Deploy GitHub repositories through Pulumi")]
struct Cli {
    /// Log line format written to stderr.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render the program, then refresh, preview, and update the stack.
    Deploy {
        #[command(flatten)]
        target: TargetArgs,
        #[command(flatten)]
        program: ProgramArgs,
        /// Print secret outputs in clear text.
        #[arg(long)]
        show_secrets: bool,
    },
    /// Delete every resource of the stack.
    Destroy {
        #[command(flatten)]
        target: TargetArgs,
        /// Also remove the stack from the backend.
        #[arg(long)]
        remove: bool,
    },
    /// Print the program without deploying it. Needs no credentials.
    Render {
        #[arg(long, default_value = "components")]
        project: String,
        #[command(flatten)]
        program: ProgramArgs,
    },
}

#[derive(Debug, Args)]
struct TargetArgs {
    #[arg(long, default_value = "components")]
    project: String,
    #[arg(long, default_value = "dev")]
    environment: String,
    /// Directory the program is written to and the engine runs in.
    #[arg(long, default_value = ".")]
    work_dir: PathBuf,
    #[arg(long, default_value = "pulumi")]
    pulumi_binary: PathBuf,
}

#[derive(Debug, Args)]
struct ProgramArgs {
    /// Deploy a single standard repository with this name instead of the
    /// project's own infrastructure.
    #[arg(long)]
    repository_name: Option<String>,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long = "topic")]
    topics: Vec<String>,
}

impl ProgramArgs {
    fn selection(self) -> anyhow::Result<ProgramSelection> {
        let repository_name = self
            .repository_name
            .map(|name| RepositoryName::new(name).context("repository name must not be empty"))
            .transpose()?;
        Ok(selection_from(
            repository_name,
            self.description,
            self.topics,
        ))
    }
}

fn project_name(project: String) -> anyhow::Result<ProjectName> {
    ProjectName::new(project).context("project name must not be empty")
}

impl TargetArgs {
    fn stack_name(&self, credentials: &Credentials) -> anyhow::Result<StackName> {
        Ok(StackName::new(
            credentials.organization.clone(),
            project_name(self.project.clone())?,
            EnvironmentName::new(self.environment.clone())
                .context("environment name must not be empty")?,
        ))
    }

    fn settings(&self) -> PulumiSettings {
        PulumiSettings {
            binary: self.pulumi_binary.clone(),
            work_dir: self.work_dir.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let telemetry = telemetry::init(cli.log_format)?;

    let result = run(cli.command).await;
    if let Err(e) = &result {
        let message = format!("{e:#}");
        error!(error = %message, "repo-deploy failed");
    }

    telemetry.shutdown();
    result
}

async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Render { project, program } => {
            let program = build_program(&project_name(project)?, &program.selection()?)?;
            print!("{}", program.to_yaml()?);
            Ok(())
        }
        Command::Deploy {
            target,
            program,
            show_secrets,
        } => deploy(target, program, show_secrets).await,
        Command::Destroy { target, remove } => destroy(target, remove).await,
    }
}

async fn deploy(target: TargetArgs, program: ProgramArgs, show_secrets: bool) -> anyhow::Result<()> {
    let credentials = Credentials::from_env()?;
    let name = target.stack_name(&credentials)?;

    build_program(&name.project, &program.selection()?)?
        .write_to(&target.work_dir)
        .context("failed to write program")?;

    let run_id = DeploymentRunId::new_random();
    let started_at = Timestamp::now();
    info!(run_id = %run_id, stack = %name, "deployment requested");

    let mut stack = PulumiStack::select(target.settings(), name.clone(), &credentials.access_token)
        .await
        .context("failed to select stack")?;
    let outputs = orchestrator::deploy_run(
        run_id,
        &mut stack,
        &credentials.access_token,
        &credentials.provider_config(),
    )
    .await?;

    let summary = DeploymentSummary {
        run_id,
        stack: name.fully_qualified(),
        started_at,
        finished_at: Timestamp::now(),
        outputs: render_outputs(&outputs, show_secrets),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

async fn destroy(target: TargetArgs, remove: bool) -> anyhow::Result<()> {
    let credentials = Credentials::from_env()?;
    let name = target.stack_name(&credentials)?;

    let stack = PulumiStack::select(target.settings(), name, &credentials.access_token)
        .await
        .context("failed to select stack")?;
    stack.destroy().await.context("failed to destroy stack")?;
    if remove {
        stack.remove().await.context("failed to remove stack")?;
    }
    Ok(())
}
