//! Resolver configuration files
//!
//! ```toml
//! entry-scope = ["pkg"]
//! retain-enum-origin = false
//! ```

use anyhow::{Context, Result};
use idl_resolve::ResolverConfig;
use std::fs;
use std::path::Path;

/// Parse a configuration from TOML text; missing keys take their defaults
///
/// # Errors
///
/// Returns an error for malformed TOML or unknown value types.
pub fn parse_config(contents: &str) -> Result<ResolverConfig> {
    toml::from_str(contents).context("Failed to parse resolver configuration")
}

/// Load a configuration file
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config(path: impl AsRef<Path>) -> Result<ResolverConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config = parse_config(&contents).with_context(|| format!("In config file: {}", path.display()))?;
    tracing::debug!(path = %path.display(), ?config, "loaded resolver configuration");
    Ok(config)
}
