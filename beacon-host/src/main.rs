use std::path::Path;

use anyhow::Result;
use beacon_host::HostConfig;

/// `beacon [config.toml]`
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args_os().nth(1) {
        Some(path) => HostConfig::load(Path::new(&path))?,
        None => HostConfig::default(),
    };

    beacon_host::run(&config)
}
