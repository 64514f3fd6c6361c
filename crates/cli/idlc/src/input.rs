//! Reading trees and configuration from disk

use anyhow::{Context, Result};
use idl_ast::Definition;
use idl_driver::ResolverConfig;
use std::fs;
use std::path::Path;

/// Load a JSON syntax tree
pub fn tree(path: &Path) -> Result<Vec<Definition>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read syntax tree: {}", path.display()))?;
    let definitions: Vec<Definition> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to decode syntax tree: {}", path.display()))?;
    tracing::debug!(path = %path.display(), definitions = definitions.len(), "loaded syntax tree");
    Ok(definitions)
}

/// Configuration file (or defaults), with the entry scope overridden from the command line
pub fn config(path: Option<&Path>, entry_scope: Option<&str>) -> Result<ResolverConfig> {
    let config = match path {
        Some(path) => idl_driver::load_config(path)?,
        None => ResolverConfig::default(),
    };
    Ok(match entry_scope {
        Some(scope) => config.with_entry_scope(scope),
        None => config,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_entry_scope_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("idl.toml");
        fs::write(&path, "entry-scope = [\"from_file\"]\nretain-enum-origin = false\n").unwrap();

        let from_file = config(Some(path.as_path()), None).unwrap();
        assert_eq!(from_file.entry_scope, vec!["from_file".to_string()]);

        let overridden = config(Some(path.as_path()), Some("pkg::msgs")).unwrap();
        assert_eq!(overridden.entry_scope, vec!["pkg".to_string(), "msgs".to_string()]);
        assert!(!overridden.retain_enum_origin);
    }

    #[test]
    fn decodes_a_tree() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tree.json");
        fs::write(
            &path,
            r#"[{"kind": "struct", "name": "Point", "members": [
                {"name": "x", "type_spec": {"named": "double"}}
            ]}]"#,
        )
        .unwrap();

        let definitions = tree(&path).unwrap();
        assert_eq!(definitions.len(), 1);
        assert_eq!(definitions[0].name(), "Point");
    }

    #[test]
    fn malformed_tree_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{").unwrap();

        let error = tree(&path).unwrap_err();
        assert!(error.to_string().contains("broken.json"));
    }
}
