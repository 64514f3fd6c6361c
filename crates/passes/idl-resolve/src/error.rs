//! Error types for IDL resolution

use std::mem;
use thiserror::Error;

/// Errors that abort a resolution pass
///
/// Every variant names the offending identifier or fully-qualified definition.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolutionError {
    /// Identifier is not registered in any enclosing scope
    #[error("unresolved reference `{name}` in `{context}`")]
    Unresolved {
        /// The identifier as written
        name: String,
        /// Definition or field the identifier appeared in
        context: String,
        /// Registered names close to `name` (for "did you mean?" messages)
        suggestions: Vec<String>,
    },

    /// Value of the wrong kind in a constant, length or bound position
    #[error("invalid constant `{name}` in `{context}`: {reason}")]
    InvalidConstant {
        /// The identifier or expression at fault
        name: String,
        /// Definition or field the expression appeared in
        context: String,
        /// What was wrong with it
        reason: String,
    },

    /// Union discriminator or predicate outside the allowed family, or a
    /// non-type used as a type
    #[error("type mismatch in `{name}`: expected {expected}, found {found}")]
    TypeMismatch {
        /// Definition or field at fault
        name: String,
        /// What was required
        expected: String,
        /// What was found
        found: String,
    },

    /// Union with more than one `default:` label
    #[error("union `{name}` declares more than one default case")]
    DuplicateDefaultCase {
        /// Fully-qualified union name
        name: String,
    },

    /// Name defined twice in one scope
    #[error("`{name}` is defined more than once (first as {first}, then as {second})")]
    DuplicateDefinition {
        /// Fully-qualified name
        name: String,
        /// Kind of the first definition
        first: &'static str,
        /// Kind of the second definition
        second: &'static str,
    },

    /// Constant or typedef that depends on itself
    #[error("cyclic reference through `{name}`")]
    CyclicReference {
        /// Fully-qualified name where the cycle closed
        name: String,
    },

    /// Array/sequence nesting the IR cannot express
    #[error("unsupported type composition in `{name}`: {reason}")]
    UnsupportedComposition {
        /// Field or typedef at fault
        name: String,
        /// The offending shape
        reason: &'static str,
    },
}

impl ResolutionError {
    /// The offending name carried by the error
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Unresolved { name, .. }
            | Self::InvalidConstant { name, .. }
            | Self::TypeMismatch { name, .. }
            | Self::DuplicateDefaultCase { name }
            | Self::DuplicateDefinition { name, .. }
            | Self::CyclicReference { name }
            | Self::UnsupportedComposition { name, .. } => name,
        }
    }

    /// Rank registered names by similarity to an unresolved identifier
    pub fn compute_suggestions<'name>(
        name: &str,
        available_names: impl IntoIterator<Item = &'name str>,
    ) -> Vec<String> {
        let target = name.trim_start_matches("::");
        let qualified = target.contains("::");
        let mut suggestions: Vec<(usize, &str)> = available_names
            .into_iter()
            .filter(|candidate| !candidate.is_empty())
            .map(|candidate| {
                let compared = if qualified {
                    candidate
                } else {
                    candidate.rsplit("::").next().unwrap_or(candidate)
                };
                (levenshtein_distance(target, compared), candidate)
            })
            .filter(|(distance, _)| *distance <= 2)
            .collect();

        suggestions.sort_unstable();
        suggestions.dedup();
        suggestions
            .into_iter()
            .take(3)
            .map(|(_, candidate)| candidate.to_string())
            .collect()
    }
}

/// Compute Levenshtein distance between two strings
fn levenshtein_distance(source: &str, target: &str) -> usize {
    let source: Vec<char> = source.chars().collect();
    let target: Vec<char> = target.chars().collect();

    if source.is_empty() {
        return target.len();
    }
    if target.is_empty() {
        return source.len();
    }

    let mut previous: Vec<usize> = (0..=target.len()).collect();
    let mut current = vec![0; target.len() + 1];

    for (idx, source_char) in source.iter().enumerate() {
        current[0] = idx + 1;
        for (jdx, target_char) in target.iter().enumerate() {
            let cost = usize::from(source_char != target_char);
            current[jdx + 1] = (previous[jdx + 1] + 1)
                .min(current[jdx] + 1)
                .min(previous[jdx] + cost);
        }
        mem::swap(&mut previous, &mut current);
    }

    previous[target.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;

    #[test]
    fn test_levenshtein_distance() {
        assert_eq!(levenshtein_distance("", ""), 0);
        assert_eq!(levenshtein_distance("abc", "abc"), 0);
        assert_eq!(levenshtein_distance("abc", "def"), 3);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("saturday", "sunday"), 3);
    }

    #[test]
    fn suggestions_compare_simple_names() {
        let names = ["outer::Inner", "outer::Outer", "Holder", "Color::RED"];
        let suggestions = ResolutionError::compute_suggestions("Iner", names);
        assert_eq!(suggestions, vec!["outer::Inner".to_string()]);

        let suggestions = ResolutionError::compute_suggestions("outer::Innr", names);
        assert_eq!(suggestions, vec!["outer::Inner".to_string()]);
    }

    #[test]
    fn messages() {
        let error = ResolutionError::Unresolved {
            name: "Missing".to_string(),
            context: "pkg::Holder::a".to_string(),
            suggestions: Vec::new(),
        };
        expect!["unresolved reference `Missing` in `pkg::Holder::a`"].assert_eq(&error.to_string());
        assert_eq!(error.name(), "Missing");

        let error = ResolutionError::DuplicateDefinition {
            name: "pkg::A".to_string(),
            first: "struct",
            second: "const",
        };
        expect!["`pkg::A` is defined more than once (first as struct, then as const)"]
            .assert_eq(&error.to_string());
    }
}
