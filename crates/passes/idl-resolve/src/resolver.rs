//! Resolution context shared by the node wrappers

use crate::config::ResolverConfig;
use crate::error::ResolutionError;
use crate::node::Node;
use crate::scope::{NodeId, SymbolRegistry};
use idl_ir::{ConstValue, IdlMessageDefinition};
use rustc_hash::FxHashMap;
use std::cell::RefCell;

/// Read-only view of a fully populated registry plus pass-local state
///
/// Constructed after registration finished; every resolution capability of
/// the node wrappers takes one of these.
pub struct Resolver<'reg, 'ast> {
    /// Registry built during registration
    registry: &'reg SymbolRegistry<'ast>,
    /// Pass configuration
    config: &'reg ResolverConfig,
    /// Constants and typedefs currently being expanded
    in_progress: RefCell<Vec<NodeId>>,
    /// Constants already evaluated in this pass
    values: RefCell<FxHashMap<NodeId, ConstValue>>,
}

impl<'reg, 'ast> Resolver<'reg, 'ast> {
    /// Create a resolver over a populated registry
    #[must_use]
    pub fn new(registry: &'reg SymbolRegistry<'ast>, config: &'reg ResolverConfig) -> Self {
        Self {
            registry,
            config,
            in_progress: RefCell::new(Vec::new()),
            values: RefCell::new(FxHashMap::default()),
        }
    }

    /// The registry being resolved against
    #[must_use]
    pub fn registry(&self) -> &'reg SymbolRegistry<'ast> {
        self.registry
    }

    /// Pass configuration
    #[must_use]
    pub fn config(&self) -> &'reg ResolverConfig {
        self.config
    }

    /// Produce the IR definition of a registered node, if it has one
    ///
    /// # Errors
    ///
    /// Propagates the first resolution error hit inside the definition.
    pub fn definition(&self, node: NodeId) -> Result<Option<IdlMessageDefinition>, ResolutionError> {
        tracing::trace!(definition = self.registry.node(node).name(), "resolving");
        match self.registry.node(node) {
            Node::Module(module) => Ok(module.to_definition(self)?.map(IdlMessageDefinition::Module)),
            Node::Struct(def) => def.to_definition(self).map(|def| Some(IdlMessageDefinition::Struct(def))),
            Node::Union(def) => def.to_definition(self).map(|def| Some(IdlMessageDefinition::Union(def))),
            Node::Enum(def) => Ok(Some(IdlMessageDefinition::Module(def.to_definition(self)?))),
            Node::Constant(_) | Node::Typedef(_) => Ok(None),
        }
    }

    /// Run `expand` with `node` marked as in progress
    ///
    /// # Errors
    ///
    /// Returns `ResolutionError::CyclicReference` if `node` is already being
    /// expanded further up the stack.
    pub(crate) fn guarded<T>(
        &self,
        node: NodeId,
        expand: impl FnOnce() -> Result<T, ResolutionError>,
    ) -> Result<T, ResolutionError> {
        if self.in_progress.borrow().contains(&node) {
            return Err(ResolutionError::CyclicReference {
                name: self.registry.node(node).name().to_string(),
            });
        }
        self.in_progress.borrow_mut().push(node);
        let result = expand();
        self.in_progress.borrow_mut().pop();
        result
    }

    /// Evaluate a constant once per pass; later calls reuse the value
    ///
    /// # Errors
    ///
    /// Propagates errors from `evaluate`, which are not cached.
    pub(crate) fn cached_value(
        &self,
        node: NodeId,
        evaluate: impl FnOnce() -> Result<ConstValue, ResolutionError>,
    ) -> Result<ConstValue, ResolutionError> {
        if let Some(value) = self.values.borrow().get(&node) {
            return Ok(value.clone());
        }
        let value = self.guarded(node, evaluate)?;
        self.values.borrow_mut().insert(node, value.clone());
        Ok(value)
    }
}
