use std::path::Path;

use anyhow::Result;

use sitefx_core::AppConfig;

pub fn run(config: &AppConfig, explicit: Option<&Path>, defaults: bool, init: bool) -> Result<()> {
    let path = explicit.map(Path::to_path_buf).unwrap_or_else(AppConfig::config_path);

    if init {
        if path.exists() {
            println!("Config already exists at {}", path.display());
            return Ok(());
        }
        AppConfig::default().save_to(&path)?;
        println!("Wrote default config to {}", path.display());
        return Ok(());
    }

    if defaults {
        print!("{}", AppConfig::default().to_toml()?);
        return Ok(());
    }

    let source = if path.exists() {
        path.display().to_string()
    } else {
        format!("{} (not found, using defaults)", path.display())
    };
    println!("# {}", source);
    println!("# log file: {}", config.log_path().display());
    print!("{}", config.to_toml()?);
    Ok(())
}
