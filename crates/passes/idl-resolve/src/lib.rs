//! Semantic resolution of IDL syntax trees
//!
//! This crate turns a raw, reference-laden IDL tree into flat IR definitions
//! whose only symbolic references are to other structs and unions, by exact
//! fully-qualified name.
//!
//! # Architecture
//!
//! - **Symbol registry**: scope tree plus fully-qualified name table
//! - **Nodes**: one closed variant per definition kind, each producing its IR
//! - **Constant evaluation**: literals, references, sums, lengths and annotations
//! - **Unions**: discriminator, predicates and default case
//!
//! Registration of every definition must finish before any [`Resolver`] is
//! created; the driver crate owns that two-phase walk.
//!
//! # Usage
//!
//! ```rust,ignore
//! use idl_resolve::{Resolver, ResolverConfig, SymbolRegistry};
//!
//! let mut registry = SymbolRegistry::new(&config.entry_scope);
//! // ... define every node ...
//! let resolver = Resolver::new(&registry, &config);
//! let definition = resolver.definition(node)?;
//! ```

pub mod config;
pub mod const_eval;
pub mod error;
pub mod node;
pub mod resolver;
pub mod scope;
pub mod types;
pub mod union;

pub use config::ResolverConfig;
pub use error::ResolutionError;
pub use node::{ConstantNode, ConstantSource, EnumNode, ModuleNode, Node, StructNode, TypedefNode, UnionNode};
pub use resolver::Resolver;
pub use scope::{NodeId, Scope, ScopeId, SymbolRegistry};
pub use types::{BaseType, ResolvedType};
