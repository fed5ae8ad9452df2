//! Motion CLI: deploy a token and a DAO from a TOML config and replay
//! governance scripts against it.

mod config;
mod error;
mod replay;
mod script;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use motion_utils::LogFormat;

use crate::config::MotionConfig;
use crate::replay::{Deployment, Outcome};

#[derive(Parser)]
#[command(name = "motion", about = "Token-governed DAO treasury")]
struct Cli {
    /// Log level: "trace", "debug", "info", "warn", "error".
    /// Overrides the config file's `[logging] level`.
    #[arg(long, env = "MOTION_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json". Overrides `[logging] format`.
    #[arg(long, env = "MOTION_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Deploy from config, apply a JSON operation script, print events and a summary.
    Replay {
        /// Path to the TOML deployment config.
        #[arg(long, env = "MOTION_CONFIG")]
        config: PathBuf,

        /// Path to the JSON operation script.
        #[arg(long)]
        script: PathBuf,
    },

    /// Validate a deployment config without running anything.
    CheckConfig {
        #[arg(long, env = "MOTION_CONFIG")]
        config: PathBuf,
    },
}

fn load_config(path: &Path) -> anyhow::Result<MotionConfig> {
    MotionConfig::from_toml_file(path)
        .with_context(|| format!("loading config {}", path.display()))
}

fn init_logging(cli: &Cli, config: &MotionConfig) {
    let format = cli.log_format.unwrap_or(config.logging.format);
    let level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    motion_utils::init_logging(format, level);
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Command::Replay { config, script } => {
            let config_file = load_config(config)?;
            init_logging(&cli, &config_file);

            let source = std::fs::read_to_string(script)
                .with_context(|| format!("reading script {}", script.display()))?;
            let ops = script::parse(&source)
                .with_context(|| format!("parsing script {}", script.display()))?;

            let mut deployment =
                Deployment::from_config(&config_file).context("deploying token and DAO")?;
            tracing::info!(
                steps = ops.len(),
                dao = %deployment.dao.treasury(),
                "replaying script"
            );
            let outcomes = deployment.replay(&ops);

            for outcome in &outcomes {
                if let Outcome::Applied { events, .. } = outcome {
                    for event in events {
                        println!("{}", serde_json::to_string(event)?);
                    }
                }
            }
            let summary = deployment.summary(&outcomes);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::CheckConfig { config } => {
            let config_file = load_config(config)?;
            init_logging(&cli, &config_file);
            config_file
                .validate()
                .with_context(|| format!("validating config {}", config.display()))?;
            let params = config_file.dao_params()?;
            tracing::info!(
                token = %config_file.token.symbol,
                quorum = %params.quorum,
                max_vote = %params.max_vote_per_proposal,
                "config ok"
            );
            println!("config ok");
        }
    }

    Ok(())
}
