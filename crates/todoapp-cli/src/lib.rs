pub mod cli;
pub mod commands;
pub mod render;
pub mod storage;
pub mod transport;

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use todoapp_core::config::Config;
use tracing::{debug, info};

#[tracing::instrument(skip_all)]
pub fn run(raw_args: Vec<OsString>) -> anyhow::Result<()> {
    let cli = cli::GlobalCli::parse_from(raw_args);

    cli::init_tracing(cli.verbose, cli.quiet)?;

    info!(verbose = cli.verbose, quiet = cli.quiet, "starting todo CLI");

    let mut cfg = load_config(cli.config.as_deref())?;
    cfg.apply_overrides(cli.rc_overrides.into_iter().map(|kv| (kv.key, kv.value)))?;
    debug!(?cfg, "effective config");

    let client = commands::Client::new(cfg)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    runtime.block_on(client.dispatch(cli.command, io::stdout().lock()))?;

    info!("done");
    Ok(())
}

/// An explicit `--config` must exist; the default location is optional.
pub fn load_config(override_path: Option<&Path>) -> anyhow::Result<Config> {
    if let Some(path) = override_path {
        return Config::load_file(path);
    }

    match default_config_path() {
        Some(path) if path.exists() => Config::load_file(&path),
        _ => {
            debug!("no config file found; using defaults");
            Ok(Config::default())
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("todoapp").join("config.toml"))
}
