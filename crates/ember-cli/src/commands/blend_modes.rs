//! Blend mode listing

use anyhow::Result;
use ember_core::BlendMode;

pub fn run() -> Result<()> {
    for mode in BlendMode::ALL {
        println!("{:<18} {}", mode.as_str(), mode.label());
    }
    Ok(())
}
