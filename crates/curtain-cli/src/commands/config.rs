use anyhow::{Context, Result};

use curtain_core::AppConfig;

pub fn run(config: &AppConfig) -> Result<()> {
    let rendered = toml::to_string_pretty(config).context("serializing configuration")?;
    println!("# {}", AppConfig::config_path().display());
    print!("{rendered}");
    Ok(())
}
