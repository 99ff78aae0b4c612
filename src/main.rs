use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};

use pagemark::Config;
use pagemark::replay::{self, Script};

#[derive(Parser, Debug)]
#[command(name = "pagemark")]
#[command(
    version,
    about = "Replay pointer sessions against the document annotation core"
)]
struct Cli {
    /// Replay script (TOML)
    #[arg(value_name = "SCRIPT", required_unless_present = "init_config")]
    script: Option<PathBuf>,

    /// Configuration file to use instead of ~/.config/pagemark/config.toml
    #[arg(long, short = 'c', value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write the default configuration file and exit
    #[arg(long, action = ArgAction::SetTrue)]
    init_config: bool,

    /// Pretty-print the JSON report
    #[arg(long, short = 'p', action = ArgAction::SetTrue)]
    pretty: bool,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    if cli.init_config {
        let path = Config::create_default_file()?;
        println!("Wrote default config to {}", path.display());
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let Some(script_path) = cli.script else {
        return Err(anyhow::anyhow!("No replay script given"));
    };
    let script = Script::load(&script_path)?;
    log::info!(
        "Replaying {} steps over {} pages from {}",
        script.steps.len(),
        script.pages.len(),
        script_path.display()
    );

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let report = runtime
        .block_on(replay::run_script(&script, &config))
        .with_context(|| format!("Failed to replay {}", script_path.display()))?;

    let json = if cli.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{}", json);

    Ok(())
}
