//! Node wrappers around raw definitions
//!
//! Each registered definition is wrapped in exactly one [`Node`] variant. A
//! node remembers its fully-qualified name and the scope it resolves names
//! from, and knows how to produce its part of the IR:
//!
//! - modules, structs, unions and enums produce aggregate definitions
//! - constants (declared or enumerators) produce a single constant field
//! - typedefs produce nothing themselves; they are substituted at use sites

use crate::error::ResolutionError;
use crate::resolver::Resolver;
use crate::scope::{NodeId, ScopeId, SymbolRegistry};
use idl_ast::{self as ast, Annotation, Definition, SCOPE_SEPARATOR};
use idl_ir::{Aggregated, ConstValue, Field, ModuleDefinition, Primitive, StructDefinition};
use rustc_hash::FxHashSet;

/// A registered definition
#[derive(Debug)]
pub enum Node<'ast> {
    /// Module scope
    Module(ModuleNode<'ast>),
    /// Struct
    Struct(StructNode<'ast>),
    /// Union
    Union(UnionNode<'ast>),
    /// Enum
    Enum(EnumNode<'ast>),
    /// Declared constant or enumerator
    Constant(ConstantNode<'ast>),
    /// Typedef
    Typedef(TypedefNode<'ast>),
}

impl Node<'_> {
    /// Fully-qualified name
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Module(node) => &node.name,
            Self::Struct(node) => &node.name,
            Self::Union(node) => &node.name,
            Self::Enum(node) => &node.name,
            Self::Constant(node) => &node.name,
            Self::Typedef(node) => &node.name,
        }
    }

    /// Kind keyword for diagnostics
    #[must_use]
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Module(_) => "module",
            Self::Struct(_) => "struct",
            Self::Union(_) => "union",
            Self::Enum(_) => "enum",
            Self::Constant(node) => match node.source {
                ConstantSource::Declared(_) => "const",
                ConstantSource::Enumerator { .. } => "enumerator",
            },
            Self::Typedef(_) => "typedef",
        }
    }
}

/// Module, or the pseudo-module of the entry scope
///
/// A module may be opened several times; each block's definitions are kept
/// in order and resolved as one module.
#[derive(Debug)]
pub struct ModuleNode<'ast> {
    /// Fully-qualified name
    pub name: String,
    /// Scope opened by the module
    pub scope: ScopeId,
    /// Definitions directly inside each block of the module
    pub blocks: Vec<&'ast [Definition]>,
    /// Annotation block of the first block that has one
    pub annotations: Option<&'ast [Annotation]>,
}

impl<'ast> ModuleNode<'ast> {
    /// Wrap a declared module whose scope has already been created
    #[must_use]
    pub fn new(registry: &SymbolRegistry<'ast>, scope: ScopeId, module: &'ast ast::Module) -> Self {
        Self {
            name: registry.scope(scope).prefix.clone(),
            scope,
            blocks: vec![module.definitions.as_slice()],
            annotations: module.annotations.as_deref(),
        }
    }

    /// Wrap the top-level definitions as the entry scope's module
    #[must_use]
    pub fn root(registry: &SymbolRegistry<'ast>, definitions: &'ast [Definition]) -> Self {
        let scope = registry.root();
        Self {
            name: registry.scope(scope).prefix.clone(),
            scope,
            blocks: vec![definitions],
            annotations: None,
        }
    }

    /// Append another `module name { ... }` block
    pub fn reopen(&mut self, module: &'ast ast::Module) {
        self.blocks.push(&module.definitions);
        if self.annotations.is_none() {
            self.annotations = module.annotations.as_deref();
        }
    }

    /// Constants declared directly in the module; `None` if there are none
    ///
    /// # Errors
    ///
    /// Propagates errors from evaluating any of the constants.
    pub fn to_definition(&self, cx: &Resolver<'_, 'ast>) -> Result<Option<ModuleDefinition>, ResolutionError> {
        let scope = cx.registry().scope(self.scope);
        let definitions = self
            .blocks
            .iter()
            .flat_map(|block| block.iter())
            .filter_map(|definition| match definition {
                Definition::Constant(constant) => Some(scope.qualify(&constant.name)),
                _ => None,
            })
            .map(|qualified| constant_field(cx, &qualified, &self.name))
            .collect::<Result<Vec<_>, _>>()?;

        if definitions.is_empty() {
            return Ok(None);
        }

        Ok(Some(ModuleDefinition {
            aggregated: Aggregated {
                name: self.name.clone(),
                annotations: cx.resolve_annotations(self.annotations, self.scope, &self.name)?,
            },
            definitions,
        }))
    }
}

/// Field of the constant registered under `qualified`
fn constant_field(cx: &Resolver<'_, '_>, qualified: &str, context: &str) -> Result<Field, ResolutionError> {
    let registry = cx.registry();
    let node = registry.get(qualified).ok_or_else(|| ResolutionError::Unresolved {
        name: qualified.to_string(),
        context: context.to_string(),
        suggestions: Vec::new(),
    })?;
    match registry.node(node) {
        Node::Constant(constant) => constant.to_field(node, cx),
        other => Err(ResolutionError::InvalidConstant {
            name: qualified.to_string(),
            context: context.to_string(),
            reason: format!("registered as {}", other.keyword()),
        }),
    }
}

/// Struct definition
#[derive(Debug)]
pub struct StructNode<'ast> {
    /// Fully-qualified name
    pub name: String,
    /// Scope the struct is declared in
    pub scope: ScopeId,
    /// Raw definition
    pub ast: &'ast ast::Struct,
}

impl<'ast> StructNode<'ast> {
    /// Resolve every member, preserving declaration order
    ///
    /// # Errors
    ///
    /// Returns `ResolutionError::DuplicateDefinition` for repeated member
    /// names and propagates member resolution errors.
    pub fn to_definition(&self, cx: &Resolver<'_, 'ast>) -> Result<StructDefinition, ResolutionError> {
        let mut seen = FxHashSet::default();
        let definitions = self
            .ast
            .members
            .iter()
            .map(|member| {
                if !seen.insert(member.name.as_str()) {
                    return Err(ResolutionError::DuplicateDefinition {
                        name: format!("{}::{}", self.name, member.name),
                        first: "member",
                        second: "member",
                    });
                }
                cx.resolve_member(member, self.scope, &self.name)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(StructDefinition {
            aggregated: Aggregated {
                name: self.name.clone(),
                annotations: cx.resolve_annotations(self.ast.annotations.as_deref(), self.scope, &self.name)?,
            },
            definitions,
        })
    }
}

/// Union definition; resolved in [`crate::union`]
#[derive(Debug)]
pub struct UnionNode<'ast> {
    /// Fully-qualified name
    pub name: String,
    /// Scope the union is declared in
    pub scope: ScopeId,
    /// Raw definition
    pub ast: &'ast ast::Union,
}

/// Enum definition
#[derive(Debug)]
pub struct EnumNode<'ast> {
    /// Fully-qualified name
    pub name: String,
    /// Scope the enum is declared in
    pub scope: ScopeId,
    /// Raw definition
    pub ast: &'ast ast::Enum,
}

impl<'ast> EnumNode<'ast> {
    /// The enum as a module of `uint32` constants numbered from zero
    ///
    /// Each entry is the field of the enumerator registered as `Enum::NAME`.
    ///
    /// # Errors
    ///
    /// Propagates annotation resolution errors.
    pub fn to_definition(&self, cx: &Resolver<'_, 'ast>) -> Result<ModuleDefinition, ResolutionError> {
        let definitions = self
            .ast
            .enumerators
            .iter()
            .map(|enumerator| {
                let qualified = format!("{}{SCOPE_SEPARATOR}{}", self.name, enumerator.name);
                constant_field(cx, &qualified, &self.name)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ModuleDefinition {
            aggregated: Aggregated {
                name: self.name.clone(),
                annotations: cx.resolve_annotations(self.ast.annotations.as_deref(), self.scope, &self.name)?,
            },
            definitions,
        })
    }
}

/// Where a constant's value comes from
#[derive(Debug)]
pub enum ConstantSource<'ast> {
    /// `const T NAME = expr;`
    Declared(&'ast ast::Constant),
    /// Enumerator at position `ordinal` of its enum
    Enumerator {
        /// Zero-based declaration position
        ordinal: u32,
        /// Raw enumerator
        ast: &'ast ast::Enumerator,
    },
}

/// Named constant value
#[derive(Debug)]
pub struct ConstantNode<'ast> {
    /// Fully-qualified name
    pub name: String,
    /// Scope the value expression is evaluated in
    pub scope: ScopeId,
    /// Declaration
    pub source: ConstantSource<'ast>,
}

impl<'ast> ConstantNode<'ast> {
    /// Name as declared
    #[must_use]
    pub fn simple_name(&self) -> &'ast str {
        match self.source {
            ConstantSource::Declared(constant) => &constant.name,
            ConstantSource::Enumerator { ast, .. } => &ast.name,
        }
    }

    /// Declared primitive type, with the originating enum if it collapsed
    ///
    /// Enumerators are listed inside their own enum, so they carry no origin.
    ///
    /// # Errors
    ///
    /// Returns `ResolutionError::InvalidConstant` when the declared type is
    /// not a scalar primitive (or enum, or typedef of one).
    pub fn declared_type(&self, cx: &Resolver<'_, 'ast>) -> Result<(Primitive, Option<String>), ResolutionError> {
        let constant = match &self.source {
            ConstantSource::Declared(constant) => constant,
            ConstantSource::Enumerator { .. } => return Ok((Primitive::ENUM, None)),
        };

        let resolved = cx.resolve_type(&constant.type_spec, self.scope, &self.name)?;
        match resolved.scalar_primitive() {
            Some(primitive) => Ok((primitive, resolved.enum_type)),
            None => Err(ResolutionError::InvalidConstant {
                name: self.name.clone(),
                context: self.name.clone(),
                reason: format!("constants need a scalar primitive type, found {}", resolved.describe()),
            }),
        }
    }

    /// Evaluate the constant's value and check it against its declared type
    ///
    /// Callers go through [`Resolver::constant_value`], which guards against
    /// cycles.
    pub(crate) fn evaluate(&self, cx: &Resolver<'_, 'ast>) -> Result<ConstValue, ResolutionError> {
        let constant = match &self.source {
            ConstantSource::Declared(constant) => constant,
            ConstantSource::Enumerator { ordinal, .. } => return Ok(ConstValue::Integer(i64::from(*ordinal))),
        };

        let value = cx.eval_const(&constant.value, self.scope, &self.name)?;
        let (primitive, _) = self.declared_type(cx)?;
        if !value.fits_primitive(primitive) {
            return Err(ResolutionError::InvalidConstant {
                name: self.name.clone(),
                context: self.name.clone(),
                reason: format!("{} value {value} does not fit declared type {primitive}", value.kind_name()),
            });
        }
        Ok(value)
    }

    /// The constant as a field carrying its value
    ///
    /// # Errors
    ///
    /// Propagates evaluation and type errors.
    pub fn to_field(&self, node: NodeId, cx: &Resolver<'_, 'ast>) -> Result<Field, ResolutionError> {
        let value = cx.constant_value(node)?;
        let (primitive, enum_type) = self.declared_type(cx)?;
        let (annotations, value_text) = match &self.source {
            ConstantSource::Declared(constant) => (constant.annotations.as_deref(), constant.value.to_string()),
            ConstantSource::Enumerator { ast, ordinal } => (ast.annotations.as_deref(), ordinal.to_string()),
        };

        Ok(Field {
            enum_type: enum_type.filter(|_| cx.config().retain_enum_origin),
            is_constant: true,
            value: Some(value),
            value_text: Some(value_text),
            annotations: cx.resolve_annotations(annotations, self.scope, &self.name)?,
            ..Field::primitive(self.simple_name(), primitive)
        })
    }
}

/// Typedef; never emitted, substituted wherever it is referenced
#[derive(Debug)]
pub struct TypedefNode<'ast> {
    /// Fully-qualified name
    pub name: String,
    /// Scope the aliased type is resolved in
    pub scope: ScopeId,
    /// Raw definition
    pub ast: &'ast ast::Typedef,
}
