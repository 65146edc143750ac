/*
[INPUT]:  Parsed Cli and resolved ClientConfig
[OUTPUT]: Pretty-printed JSON or resolved path for stdout
[POS]:    Command layer - runs one subcommand against the API
[UPDATE]: When adding commands or changing output shape
*/

use anyhow::{Context, Result};
use chrono::SecondsFormat;
use nicehash_client::{ClientConfig, NicehashClient, RequestOptions, format_path};
use serde_json::json;
use tracing::info;

use crate::cli::{CallArgs, Cli, Command};
use crate::config::load_config;

/// Run the command with config from flags, file and environment
pub async fn run(cli: &Cli) -> Result<String> {
    if let Command::Format(args) = &cli.command {
        return Ok(format_path(&args.template, &args.path_args()));
    }

    let config = load_config(cli)?;
    execute(cli, config).await
}

/// Run the command with an already resolved config
pub async fn execute(cli: &Cli, config: ClientConfig) -> Result<String> {
    info!(sandbox = config.sandbox(), host = config.host(), "client configured");
    let client = match &cli.base_url {
        Some(base_url) => NicehashClient::with_config_and_base_url(config, base_url),
        None => NicehashClient::with_config(config),
    }
    .context("create client")?;

    match &cli.command {
        Command::Format(args) => Ok(format_path(&args.template, &args.path_args())),
        Command::Time => show_time(&client).await,
        command => {
            let (method, args) = command
                .call()
                .context("command does not call the API")?;
            let endpoint = format_path(&args.endpoint, &args.path_args());
            let options = request_options(args)?;

            let value = client
                .request::<serde_json::Value>(method, &endpoint, options)
                .await
                .with_context(|| format!("call {endpoint}"))?;
            pretty(&value)
        }
    }
}

async fn show_time(client: &NicehashClient) -> Result<String> {
    let state = client.sync_clock().await.context("sync clock")?;
    let server_time = state
        .server_time()
        .map(|time| time.to_rfc3339_opts(SecondsFormat::Millis, true));

    pretty(&json!({
        "sandbox": client.config().sandbox(),
        "host": client.config().host(),
        "locale": client.config().locale(),
        "serverTime": state.server_time_millis,
        "serverTimeUtc": server_time,
        "pingMs": state.offset_millis,
    }))
}

fn request_options(args: &CallArgs) -> Result<RequestOptions> {
    let mut options = RequestOptions::new();
    if let Some(query) = args.query() {
        options = options.query(query);
    }
    if let Some(body) = &args.body {
        serde_json::from_str::<serde_json::Value>(body).context("--body must be valid JSON")?;
        options = options.body(body.clone());
    }
    if let Some(time) = args.time {
        options = options.time(time);
    }
    Ok(options)
}

fn pretty(value: &serde_json::Value) -> Result<String> {
    serde_json::to_string_pretty(value).context("render JSON")
}
