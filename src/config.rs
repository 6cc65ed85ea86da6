use std::path::Path;

use anyhow::Context;
use web::config::Config;

pub const CONFIG_PATH: &str = "config.toml";

/// Reads `config.toml`, falling back to the defaults when it is missing.
pub fn process_config() -> anyhow::Result<Config> {
    let path = std::env::var("POSTROOM_CONFIG").unwrap_or_else(|_| String::from(CONFIG_PATH));
    if !Path::new(&path).exists() {
        log::warn!("{} not found, using the default configuration", path);
        return Ok(Config::default());
    }

    let config = std::fs::read_to_string(&path).with_context(|| format!("reading {}", path))?;
    toml::from_str(&config).with_context(|| format!("parsing {}", path))
}
