/*
[INPUT]:  CLI arguments, optional YAML overrides file, NH_* environment, SIGINT
[OUTPUT]: JSON result on stdout, logs on stderr
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, startup flow, or shutdown handling
*/

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use nicehash_cli::{Cli, run};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    info!(
        config_path = ?args.config_path,
        command = ?args.command,
        "starting nicehash-cli"
    );

    let output = tokio::select! {
        output = run(&args) => output?,
        Ok(()) = tokio::signal::ctrl_c() => {
            warn!("received SIGINT, abandoning request");
            bail!("interrupted");
        }
    };

    println!("{output}");
    Ok(())
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}
