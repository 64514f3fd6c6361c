//! Resolution driver and high-level APIs
//!
//! This crate orchestrates the two-phase walk over an IDL syntax tree:
//!
//! 1. **Registration** defines every named definition in a fresh
//!    [`SymbolRegistry`], so forward and mutually recursive references work.
//! 2. **Resolution** asks each registered node for its IR definition, in
//!    pre-order over the tree.
//!
//! The registry lives only for the duration of one call.

pub mod config;

pub use config::{load_config, parse_config};
pub use idl_resolve::{ResolutionError, ResolverConfig};

use idl_ast::{Definition, Enum, Module};
use idl_ir::IdlMessageDefinition;
use idl_resolve::{
    ConstantNode, ConstantSource, EnumNode, ModuleNode, Node, NodeId, Resolver, ScopeId, StructNode, SymbolRegistry,
    TypedefNode, UnionNode,
};

/// Result of a batched resolution pass
#[derive(Debug, Default)]
pub struct BatchOutput {
    /// Definitions that resolved, in emission order
    pub definitions: Vec<IdlMessageDefinition>,
    /// One error per definition that failed
    pub errors: Vec<ResolutionError>,
}

impl BatchOutput {
    /// Whether every definition resolved
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Registry populated by the registration phase
struct Registered<'ast> {
    registry: SymbolRegistry<'ast>,
    /// Nodes that may produce a definition, in pre-order
    emit_order: Vec<NodeId>,
}

/// Resolve a whole tree, stopping at the first error
///
/// # Errors
///
/// Returns the first registration or resolution error; no partial output is
/// produced.
#[tracing::instrument(level = "debug", skip_all, fields(definitions = definitions.len()))]
pub fn resolve(definitions: &[Definition], config: &ResolverConfig) -> Result<Vec<IdlMessageDefinition>, ResolutionError> {
    let registered = register(definitions, config)?;
    let resolver = Resolver::new(&registered.registry, config);

    let mut output = Vec::new();
    for node in &registered.emit_order {
        if let Some(definition) = resolver.definition(*node)? {
            output.push(definition);
        }
    }

    tracing::debug!(emitted = output.len(), "resolution finished");
    Ok(output)
}

/// Resolve every definition independently, collecting all failures
///
/// # Errors
///
/// Registration errors (duplicate names) still abort the pass, since no
/// lookup can be trusted afterwards.
#[tracing::instrument(level = "debug", skip_all, fields(definitions = definitions.len()))]
pub fn resolve_batched(definitions: &[Definition], config: &ResolverConfig) -> Result<BatchOutput, ResolutionError> {
    let registered = register(definitions, config)?;
    let resolver = Resolver::new(&registered.registry, config);

    let mut output = BatchOutput::default();
    for node in &registered.emit_order {
        match resolver.definition(*node) {
            Ok(Some(definition)) => output.definitions.push(definition),
            Ok(None) => {}
            Err(error) => {
                tracing::debug!(definition = registered.registry.node(*node).name(), %error, "definition failed");
                output.errors.push(error);
            }
        }
    }

    tracing::debug!(
        emitted = output.definitions.len(),
        failed = output.errors.len(),
        "batched resolution finished"
    );
    Ok(output)
}

#[tracing::instrument(level = "debug", skip_all, fields(entry_scope = %config.entry_scope.join("::")))]
fn register<'ast>(definitions: &'ast [Definition], config: &ResolverConfig) -> Result<Registered<'ast>, ResolutionError> {
    let mut registry = SymbolRegistry::new(&config.entry_scope);
    let root = ModuleNode::root(&registry, definitions);
    let root_id = registry.define(Node::Module(root))?;

    let mut registered = Registered {
        emit_order: vec![root_id],
        registry,
    };
    let scope = registered.registry.root();
    registered.register_all(scope, definitions)?;

    tracing::debug!(registered = registered.registry.len(), "registration finished");
    Ok(registered)
}

impl<'ast> Registered<'ast> {
    fn register_all(&mut self, scope: ScopeId, definitions: &'ast [Definition]) -> Result<(), ResolutionError> {
        for definition in definitions {
            self.register_definition(scope, definition)?;
        }
        Ok(())
    }

    fn register_definition(&mut self, scope: ScopeId, definition: &'ast Definition) -> Result<(), ResolutionError> {
        let name = self.registry.scope(scope).qualify(definition.name());

        match definition {
            Definition::Module(module) => {
                let inner = match self.registry.reopen_module(&name, module) {
                    Some(inner) => inner,
                    None => self.open_module(scope, module)?,
                };
                self.register_all(inner, &module.definitions)?;
            }
            Definition::Struct(ast) => {
                let id = self.registry.define(Node::Struct(StructNode { name, scope, ast }))?;
                self.emit_order.push(id);
            }
            Definition::Union(ast) => {
                let id = self.registry.define(Node::Union(UnionNode { name, scope, ast }))?;
                self.emit_order.push(id);
            }
            Definition::Enum(ast) => self.register_enum(scope, name, ast)?,
            Definition::Constant(ast) => {
                self.registry.define(Node::Constant(ConstantNode {
                    name,
                    scope,
                    source: ConstantSource::Declared(ast),
                }))?;
            }
            Definition::Typedef(ast) => {
                self.registry.define(Node::Typedef(TypedefNode { name, scope, ast }))?;
            }
        }
        Ok(())
    }

    /// First block of a module: a new scope and a node of its own
    fn open_module(&mut self, scope: ScopeId, module: &'ast Module) -> Result<ScopeId, ResolutionError> {
        let inner = self.registry.create_child(scope, &module.name);
        let node = ModuleNode::new(&self.registry, inner, module);
        let id = self.registry.define(Node::Module(node))?;
        self.emit_order.push(id);
        Ok(inner)
    }

    /// Enumerators live inside the enum and leak into the enclosing scope
    fn register_enum(&mut self, scope: ScopeId, name: String, ast: &'ast Enum) -> Result<(), ResolutionError> {
        let id = self.registry.define(Node::Enum(EnumNode { name, scope, ast }))?;
        self.emit_order.push(id);

        let enum_scope = self.registry.create_child(scope, &ast.name);
        for (enumerator, ordinal) in ast.enumerators.iter().zip(0_u32..) {
            let qualified = self.registry.scope(enum_scope).qualify(&enumerator.name);
            let constant = self.registry.define(Node::Constant(ConstantNode {
                name: qualified,
                scope,
                source: ConstantSource::Enumerator {
                    ordinal,
                    ast: enumerator,
                },
            }))?;
            self.registry.alias(scope, &enumerator.name, constant)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idl_ast::{ConstExpr, Constant, Enumerator, Member, Struct, TypeSpec};
    use idl_ir::{AggregatedKind, ConstValue};

    fn constant(name: &str, type_name: &str, value: ConstExpr) -> Definition {
        Definition::Constant(Constant {
            name: name.to_string(),
            type_spec: TypeSpec::named(type_name),
            value,
            annotations: None,
        })
    }

    fn member(name: &str, type_name: &str) -> Member {
        Member {
            name: name.to_string(),
            type_spec: TypeSpec::named(type_name),
            array_lengths: Vec::new(),
            annotations: None,
        }
    }

    #[test]
    fn emits_modules_before_nested_definitions() {
        let tree = vec![
            constant("TOP", "long", ConstExpr::int(1)),
            Definition::Module(Module {
                name: "outer".to_string(),
                definitions: vec![
                    Definition::Struct(Struct {
                        name: "Holder".to_string(),
                        members: vec![member("inner", "Inner")],
                        annotations: None,
                    }),
                    Definition::Struct(Struct {
                        name: "Inner".to_string(),
                        members: vec![member("value", "double")],
                        annotations: None,
                    }),
                    constant("LIMIT", "short", ConstExpr::int(8)),
                ],
                annotations: None,
            }),
        ];

        let output = resolve(&tree, &ResolverConfig::default()).unwrap();
        let names: Vec<_> = output.iter().map(|def| (def.name(), def.kind())).collect();
        assert_eq!(
            names,
            vec![
                ("", AggregatedKind::Module),
                ("outer", AggregatedKind::Module),
                ("outer::Holder", AggregatedKind::Struct),
                ("outer::Inner", AggregatedKind::Struct),
            ]
        );
    }

    #[test]
    fn enumerators_are_visible_in_the_enclosing_scope() {
        let tree = vec![
            Definition::Enum(Enum {
                name: "Color".to_string(),
                enumerators: ["RED", "GREEN", "BLUE"]
                    .into_iter()
                    .map(|name| Enumerator {
                        name: name.to_string(),
                        annotations: None,
                    })
                    .collect(),
                annotations: None,
            }),
            constant("FAVOURITE", "Color", ConstExpr::reference("BLUE")),
            constant(
                "AFTER_GREEN",
                "short",
                ConstExpr::Sum(vec![ConstExpr::reference("Color::GREEN"), ConstExpr::int(2)]),
            ),
        ];

        let config = ResolverConfig::default().with_entry_scope("pkg");
        let output = resolve(&tree, &config).unwrap();
        let root = idl_ir::find_definition(&output, "pkg").unwrap();
        let values: Vec<_> = root.fields().map(|field| field.value.clone()).collect();
        assert_eq!(values, vec![Some(ConstValue::Integer(2)), Some(ConstValue::Integer(3))]);
        assert_eq!(
            root.fields().next().and_then(|field| field.enum_type.as_deref()),
            Some("pkg::Color")
        );
    }

    #[test]
    fn batched_mode_keeps_going_after_a_failure() {
        let tree = vec![
            Definition::Struct(Struct {
                name: "Broken".to_string(),
                members: vec![member("a", "Missing")],
                annotations: None,
            }),
            Definition::Struct(Struct {
                name: "Fine".to_string(),
                members: vec![member("a", "long")],
                annotations: None,
            }),
        ];

        let error = resolve(&tree, &ResolverConfig::default()).unwrap_err();
        assert_eq!(error.name(), "Missing");

        let output = resolve_batched(&tree, &ResolverConfig::default()).unwrap();
        assert!(!output.is_ok());
        assert_eq!(output.errors.len(), 1);
        let names: Vec<_> = output.definitions.iter().map(IdlMessageDefinition::name).collect();
        assert_eq!(names, vec!["Fine"]);
    }

    #[test]
    fn duplicate_names_abort_registration() {
        let tree = vec![
            constant("A", "long", ConstExpr::int(1)),
            constant("A", "long", ConstExpr::int(2)),
        ];
        let error = resolve_batched(&tree, &ResolverConfig::default()).unwrap_err();
        assert!(matches!(error, ResolutionError::DuplicateDefinition { ref name, .. } if name == "A"));
    }
}
