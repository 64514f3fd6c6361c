//! Scope tree and symbol registry

use crate::error::ResolutionError;
use crate::node::Node;
use idl_ast::{Module, SCOPE_SEPARATOR};
use rustc_hash::FxHashMap;

/// Unique identifier for a scope
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub struct ScopeId(pub u32);

/// Unique identifier for a registered definition
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub struct NodeId(pub u32);

/// A single scope in the scope tree
#[derive(Debug, Clone)]
pub struct Scope {
    /// Parent scope (None for the global scope)
    pub parent: Option<ScopeId>,
    /// Qualified name of the scope itself (`""` for the global root)
    pub prefix: String,
}

impl Scope {
    /// Fully-qualified name of `name` declared in this scope
    #[must_use]
    pub fn qualify(&self, name: &str) -> String {
        if self.prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}{SCOPE_SEPARATOR}{name}", self.prefix)
        }
    }
}

/// Registry of every named definition, keyed by fully-qualified name
///
/// Filled completely during registration, then only read during resolution.
#[derive(Debug)]
pub struct SymbolRegistry<'ast> {
    /// All scopes in the tree
    scopes: Vec<Scope>,
    /// All registered nodes
    nodes: Vec<Node<'ast>>,
    /// Fully-qualified name -> node
    definitions: FxHashMap<String, NodeId>,
    /// Innermost entry scope segment
    root: ScopeId,
}

impl<'ast> SymbolRegistry<'ast> {
    /// Create a registry whose root scope is `entry_scope`
    ///
    /// Every segment of the entry scope gets its own scope, chained back to
    /// the global scope, so names qualified from any outer segment resolve.
    #[must_use]
    pub fn new(entry_scope: &[String]) -> Self {
        let mut registry = Self {
            scopes: vec![Scope {
                parent: None,
                prefix: String::new(),
            }],
            nodes: Vec::new(),
            definitions: FxHashMap::default(),
            root: ScopeId(0),
        };
        for segment in entry_scope {
            registry.root = registry.create_child(registry.root, segment);
        }
        registry
    }

    /// Innermost entry scope, where top-level definitions live
    #[must_use]
    pub fn root(&self) -> ScopeId {
        self.root
    }

    /// Create a child scope named `name`
    pub fn create_child(&mut self, parent: ScopeId, name: &str) -> ScopeId {
        let prefix = self.scope(parent).qualify(name);
        let scope_id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            parent: Some(parent),
            prefix,
        });
        scope_id
    }

    /// Get a scope by ID
    #[must_use]
    pub fn scope(&self, scope: ScopeId) -> &Scope {
        &self.scopes[scope.0 as usize]
    }

    /// Get a node by ID
    #[must_use]
    pub fn node(&self, node: NodeId) -> &Node<'ast> {
        &self.nodes[node.0 as usize]
    }

    /// Number of registered definitions
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether nothing has been registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Register `node` under its fully-qualified name
    ///
    /// # Errors
    ///
    /// Returns `ResolutionError::DuplicateDefinition` if the name is already taken.
    pub fn define(&mut self, node: Node<'ast>) -> Result<NodeId, ResolutionError> {
        let name = node.name().to_string();
        let node_id = NodeId(self.nodes.len() as u32);
        self.bind(name, node_id, node.keyword())?;
        tracing::trace!(definition = node.name(), kind = node.keyword(), "registered");
        self.nodes.push(node);
        Ok(node_id)
    }

    /// Add another block to the module registered as `qualified`
    ///
    /// Returns the module's scope, or `None` when the name is free or taken
    /// by something other than a module, leaving `define` to report it.
    pub fn reopen_module(&mut self, qualified: &str, module: &'ast Module) -> Option<ScopeId> {
        let node = self.get(qualified)?;
        let Node::Module(existing) = &mut self.nodes[node.0 as usize] else {
            return None;
        };
        existing.reopen(module);
        tracing::trace!(module = qualified, blocks = existing.blocks.len(), "reopened");
        Some(existing.scope)
    }

    /// Make an existing node reachable under a second name in `scope`
    ///
    /// Used for enumerators, which are visible both inside their enum and in
    /// the scope enclosing it.
    ///
    /// # Errors
    ///
    /// Returns `ResolutionError::DuplicateDefinition` if the name is already taken.
    pub fn alias(&mut self, scope: ScopeId, name: &str, node: NodeId) -> Result<(), ResolutionError> {
        let qualified = self.scope(scope).qualify(name);
        let kind = self.node(node).keyword();
        tracing::trace!(alias = %qualified, definition = self.node(node).name(), "aliased");
        self.bind(qualified, node, kind)
    }

    fn bind(&mut self, name: String, node: NodeId, kind: &'static str) -> Result<(), ResolutionError> {
        if let Some(existing) = self.definitions.get(&name) {
            return Err(ResolutionError::DuplicateDefinition {
                name,
                first: self.node(*existing).keyword(),
                second: kind,
            });
        }
        self.definitions.insert(name, node);
        Ok(())
    }

    /// Node registered under exactly this fully-qualified name
    #[must_use]
    pub fn get(&self, qualified: &str) -> Option<NodeId> {
        self.definitions.get(qualified).copied()
    }

    /// Find a name from `scope`, walking up the scope chain
    ///
    /// The nearest enclosing scope wins; `::a::b` skips the walk and matches
    /// the fully-qualified name only.
    #[must_use]
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<NodeId> {
        if let Some(absolute) = name.strip_prefix(SCOPE_SEPARATOR) {
            return self.get(absolute);
        }

        let mut current_scope = Some(scope);
        while let Some(scope_id) = current_scope {
            let scope_data = self.scope(scope_id);
            if let Some(node) = self.definitions.get(&scope_data.qualify(name)) {
                return Some(*node);
            }
            current_scope = scope_data.parent;
        }
        None
    }

    /// Resolve a name in a scope, walking up the scope chain
    ///
    /// # Errors
    ///
    /// Returns `ResolutionError::Unresolved` if the name is not found in any
    /// enclosing scope.
    pub fn resolve(&self, scope: ScopeId, name: &str, context: &str) -> Result<NodeId, ResolutionError> {
        self.lookup(scope, name).ok_or_else(|| ResolutionError::Unresolved {
            name: name.to_string(),
            context: context.to_string(),
            suggestions: ResolutionError::compute_suggestions(
                name,
                self.definitions.keys().map(String::as_str),
            ),
        })
    }
}
