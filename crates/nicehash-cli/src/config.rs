/*
[INPUT]:  CLI flags, optional YAML overrides file, NH_* environment
[OUTPUT]: Resolved ClientConfig for the command
[POS]:    Configuration layer - flag > file > environment > default
[UPDATE]: When adding configuration sources
*/

use anyhow::{Context, Result};
use nicehash_client::{ClientConfig, ConfigOverrides};

use crate::cli::Cli;

/// Merge the overrides file (if any) under the flags
pub fn load_overrides(cli: &Cli) -> Result<ConfigOverrides> {
    let file = match &cli.config_path {
        Some(path) => ConfigOverrides::from_yaml_file(path)
            .with_context(|| format!("load config {}", path.display()))?,
        None => ConfigOverrides::default(),
    };
    Ok(file.overlay(cli.flag_overrides()))
}

/// Resolve against the process environment
pub fn load_config(cli: &Cli) -> Result<ClientConfig> {
    Ok(load_overrides(cli)?.resolve())
}
