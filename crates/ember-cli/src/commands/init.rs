//! Default configuration command

use anyhow::{Context, Result};
use ember_core::EngineConfig;
use std::fs;
use std::path::Path;

pub fn run(path: &str) -> Result<()> {
    let target = Path::new(path);

    if target.exists() {
        anyhow::bail!("'{}' already exists", path);
    }

    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create '{}'", parent.display()))?;
    }

    let contents = EngineConfig::default()
        .to_toml_string()
        .context("Failed to serialize default config")?;
    fs::write(target, contents).with_context(|| format!("Failed to write '{}'", path))?;

    println!("Created {}", path);
    println!("Render with: ember render --config {}", path);
    Ok(())
}
