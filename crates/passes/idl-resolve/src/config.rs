//! Resolver configuration

use serde::{Deserialize, Serialize};

/// Knobs for one resolution pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ResolverConfig {
    /// Scope the input tree is declared in; prefixes every qualified name
    pub entry_scope: Vec<String>,
    /// Record the originating enum on fields whose enum collapsed to `uint32`
    pub retain_enum_origin: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            entry_scope: Vec::new(),
            retain_enum_origin: true,
        }
    }
}

impl ResolverConfig {
    /// Entry scope parsed from `a::b::c` (empty string for the root)
    #[must_use]
    pub fn with_entry_scope(mut self, scope: &str) -> Self {
        self.entry_scope = scope
            .split(idl_ast::SCOPE_SEPARATOR)
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();
        self
    }
}
