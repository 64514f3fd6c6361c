//! Resolve command implementation

use crate::input;
use anyhow::{Context, Result};
use idl_driver::ResolverConfig;
use std::path::Path;

/// Resolve one tree and print its IR as JSON
pub fn resolve(path: &Path, config: &ResolverConfig, compact: bool) -> Result<()> {
    let definitions = input::tree(path)?;
    let resolved = idl_driver::resolve(&definitions, config)
        .with_context(|| format!("Failed to resolve {}", path.display()))?;

    let json = if compact {
        serde_json::to_string(&resolved)?
    } else {
        serde_json::to_string_pretty(&resolved)?
    };
    println!("{json}");
    Ok(())
}
