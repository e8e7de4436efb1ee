use anyhow::{Context, Result};
use autocoder::logging::{LogFormat, init_tracing};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cmd;

#[derive(Parser)]
#[command(name = "autocoder")]
#[command(version, about = "Turn an app idea into a packaged static web app")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log output format (logs go to stderr)
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    pub log_format: LogFormat,

    #[arg(long, global = true)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one idea through every stage and package the result
    Run {
        /// Description of the app to build
        idea: Option<String>,

        /// Use a quick-start template instead of an idea (see `templates`)
        #[arg(short, long)]
        template: Option<String>,

        #[command(flatten)]
        run: RunFlags,
    },
    /// Submit ideas interactively, one run after another
    Session {
        #[command(flatten)]
        run: RunFlags,
    },
    /// Print the ticket plan for a technical spec JSON file
    Plan {
        /// Path to the technical spec (JSON)
        #[arg(long)]
        spec: PathBuf,

        /// Print tickets as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check a generated project directory
    Validate {
        /// Directory holding the generated project
        dir: PathBuf,
    },
    /// List quick-start templates, or show one
    Templates {
        name: Option<String>,
    },
    /// View or validate configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(clap::Args, Clone, Debug)]
pub struct RunFlags {
    /// Never call the hosted model; every stage uses its fallback
    #[arg(long)]
    pub offline: bool,

    /// Model name, overrides autocoder.toml and AUTOCODER_MODEL
    #[arg(long)]
    pub model: Option<String>,

    /// Directory packaged projects are written below
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

impl RunFlags {
    fn options(&self, verbose: bool) -> cmd::RunOptions {
        cmd::RunOptions {
            offline: self.offline,
            model: self.model.clone(),
            output_dir: self.output_dir.clone(),
            verbose,
        }
    }
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    Show,
    Validate,
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let project_dir = match cli.project_dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    // A missing .env is normal
    let _ = dotenvy::from_path(project_dir.join(".env"));
    init_tracing(cli.verbose, cli.log_format)?;

    match &cli.command {
        Commands::Run {
            idea,
            template,
            run,
        } => {
            cmd::cmd_run(
                &project_dir,
                idea.as_deref(),
                template.as_deref(),
                &run.options(cli.verbose),
            )
            .await?;
        }
        Commands::Session { run } => {
            cmd::cmd_session(&project_dir, &run.options(cli.verbose)).await?;
        }
        Commands::Plan { spec, json } => cmd::cmd_plan(spec, *json)?,
        Commands::Validate { dir } => cmd::cmd_validate(dir)?,
        Commands::Templates { name } => cmd::cmd_templates(name.as_deref())?,
        Commands::Config { command } => cmd::cmd_config(&project_dir, command.clone())?,
    }

    Ok(())
}
