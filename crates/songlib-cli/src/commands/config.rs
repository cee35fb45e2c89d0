use anyhow::{Context, Result};
use std::path::Path;

use songlib_service::config::{self, Config};

/// Show the current effective configuration.
pub fn show_config(config: &Config, config_path: &Path) {
    println!("Current Configuration");
    println!("=====================\n");

    println!("Config file: {}", config_path.display());
    let exists = config_path.exists();
    println!(
        "File exists: {}\n",
        if exists { "yes" } else { "no (using defaults)" }
    );

    println!("Settings:");
    for key in config::CONFIG_KEYS {
        if let Ok(value) = config.get(key) {
            println!("  {key}: {value}");
        }
    }

    println!("\nPriority: CLI args > ENV vars > Config file > Defaults");
}

/// Get a specific config value, or the whole file when no key is given.
pub fn get_config(config: &Config, config_path: &Path, key: Option<&str>) -> Result<()> {
    if let Some(key) = key {
        println!("{}", config.get(key)?);
    } else if config_path.exists() {
        let contents =
            std::fs::read_to_string(config_path).context("Failed to read config file")?;
        print!("{contents}");
    } else {
        println!("Config file does not exist: {}", config_path.display());
        println!("\nRun 'songlib config init' to create it.");
    }

    Ok(())
}

/// Set a config value.
pub fn set_config(config_path: &Path, key: &str, value: &str) -> Result<()> {
    config::set_config_value(config_path, key, value)?;

    println!("✓ Updated {key} = {value}");
    println!("  in {}", config_path.display());

    Ok(())
}

/// Show the config file path.
pub fn show_path(config_path: &Path) {
    println!("{}", config_path.display());
}

/// Show example configuration.
pub fn show_example() {
    print!("{}", config::example_config());
}

/// Initialize config file with defaults.
pub fn init_config(config_path: &Path) -> Result<()> {
    if config::ensure_config_file(config_path)? {
        println!("✓ Created config file: {}", config_path.display());
        println!("\nEdit this file to configure songlib.");
    } else {
        println!("Config file already exists: {}", config_path.display());
    }

    Ok(())
}
