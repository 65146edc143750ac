/*
[INPUT]:  Command-line arguments
[OUTPUT]: Parsed Cli, subcommands and config overrides from flags
[POS]:    CLI layer - argument definitions
[UPDATE]: When adding commands or flags
*/

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use nicehash_client::{ConfigOverrides, Method, PathArgs, Query};

#[derive(Parser, Debug)]
#[command(name = "nicehash-cli", version, about = "NiceHash API v2 command-line client")]
pub struct Cli {
    /// YAML file with config overrides (sandbox, host, locale, api_key, ...)
    #[arg(long = "config", value_name = "PATH")]
    pub config_path: Option<PathBuf>,
    #[arg(long, value_name = "BOOL")]
    pub sandbox: Option<bool>,
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,
    #[arg(long, value_name = "LOCALE")]
    pub locale: Option<String>,
    #[arg(long = "org-id", value_name = "ID")]
    pub organization_id: Option<String>,
    #[arg(long = "timeout-secs", value_name = "SECS")]
    pub timeout_secs: Option<u64>,
    /// Full base URL, bypassing `https://{host}` (local gateways, mocks)
    #[arg(long = "base-url", value_name = "URL", hide = true)]
    pub base_url: Option<String>,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sync the clock and print server time and ping
    Time,
    /// Signed GET
    Get(CallArgs),
    /// Signed POST
    Post(CallArgs),
    /// Signed PUT
    Put(CallArgs),
    /// Signed DELETE
    Delete(CallArgs),
    /// Resolve an endpoint template without calling the API
    Format(FormatArgs),
}

#[derive(Args, Debug)]
pub struct CallArgs {
    /// Endpoint path or template, e.g. /main/api/v2/accounting/account2/{currency}
    pub endpoint: String,
    /// Query parameter, repeatable
    #[arg(long = "query", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub query: Vec<(String, String)>,
    /// Template argument, repeatable
    #[arg(long = "arg", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub args: Vec<(String, String)>,
    /// JSON body
    #[arg(long, value_name = "JSON")]
    pub body: Option<String>,
    /// Timestamp override in milliseconds
    #[arg(long, value_name = "MILLIS")]
    pub time: Option<i64>,
}

impl CallArgs {
    pub fn query(&self) -> Option<Query> {
        if self.query.is_empty() {
            return None;
        }
        Some(self.query.iter().cloned().collect())
    }

    pub fn path_args(&self) -> PathArgs {
        PathArgs::named(self.args.iter().cloned())
    }
}

#[derive(Args, Debug)]
pub struct FormatArgs {
    pub template: String,
    /// Named argument, repeatable
    #[arg(long = "arg", value_name = "KEY=VALUE", value_parser = parse_key_value, conflicts_with = "positional")]
    pub args: Vec<(String, String)>,
    /// Positional argument for {0}, {1}, ...; repeatable
    #[arg(long = "pos", value_name = "VALUE")]
    pub positional: Vec<String>,
}

impl FormatArgs {
    pub fn path_args(&self) -> PathArgs {
        if self.positional.is_empty() {
            PathArgs::named(self.args.iter().cloned())
        } else {
            PathArgs::positional(self.positional.iter())
        }
    }
}

impl Command {
    /// HTTP method and arguments for API calls; `None` for offline commands
    pub fn call(&self) -> Option<(Method, &CallArgs)> {
        match self {
            Command::Get(args) => Some((Method::GET, args)),
            Command::Post(args) => Some((Method::POST, args)),
            Command::Put(args) => Some((Method::PUT, args)),
            Command::Delete(args) => Some((Method::DELETE, args)),
            Command::Time | Command::Format(_) => None,
        }
    }
}

impl Cli {
    /// Config values given as flags
    pub fn flag_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            sandbox: self.sandbox,
            host: self.host.clone(),
            locale: self.locale.clone(),
            organization_id: self.organization_id.clone(),
            timeout_secs: self.timeout_secs,
            ..ConfigOverrides::default()
        }
    }
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got `{raw}`")),
    }
}
