//! Raw IDL syntax tree
//!
//! This crate defines the unresolved tree that the parser hands over to the
//! resolver. Nothing here is validated beyond syntax: identifiers are plain
//! strings, constant expressions are unevaluated, and builtin type keywords
//! are kept exactly as written (`unsigned long`, `double`, ...).
//!
//! Every node derives serde so a tree can be stored and replayed as JSON.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between the segments of a scoped identifier
pub const SCOPE_SEPARATOR: &str = "::";

/// A top-level or module-level definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Definition {
    /// `module name { ... }`
    Module(Module),
    /// `struct name { ... }`
    Struct(Struct),
    /// `union name switch (T) { ... }`
    Union(Union),
    /// `enum name { A, B }`
    Enum(Enum),
    /// `const T name = value;`
    Constant(Constant),
    /// `typedef T name[N];`
    Typedef(Typedef),
}

impl Definition {
    /// Simple (unqualified) name of the definition
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Module(module) => &module.name,
            Self::Struct(def) => &def.name,
            Self::Union(def) => &def.name,
            Self::Enum(def) => &def.name,
            Self::Constant(def) => &def.name,
            Self::Typedef(def) => &def.name,
        }
    }

    /// Annotation block attached to the definition, if one was written
    #[must_use]
    pub fn annotations(&self) -> Option<&[Annotation]> {
        match self {
            Self::Module(module) => module.annotations.as_deref(),
            Self::Struct(def) => def.annotations.as_deref(),
            Self::Union(def) => def.annotations.as_deref(),
            Self::Enum(def) => def.annotations.as_deref(),
            Self::Constant(def) => def.annotations.as_deref(),
            Self::Typedef(def) => def.annotations.as_deref(),
        }
    }

    /// Short keyword describing the definition kind, used in diagnostics
    #[must_use]
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Module(_) => "module",
            Self::Struct(_) => "struct",
            Self::Union(_) => "union",
            Self::Enum(_) => "enum",
            Self::Constant(_) => "const",
            Self::Typedef(_) => "typedef",
        }
    }
}

/// Module definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    /// Module name
    pub name: String,
    /// Definitions nested in the module, in declaration order
    #[serde(default)]
    pub definitions: Vec<Definition>,
    /// Annotation block (`None` when absent)
    #[serde(default)]
    pub annotations: Option<Vec<Annotation>>,
}

/// Struct definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Struct {
    /// Struct name
    pub name: String,
    /// Members in declaration (and wire) order
    #[serde(default)]
    pub members: Vec<Member>,
    /// Annotation block (`None` when absent)
    #[serde(default)]
    pub annotations: Option<Vec<Annotation>>,
}

/// A struct member or the body of a union case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// Member name
    pub name: String,
    /// Declared type
    pub type_spec: TypeSpec,
    /// Array dimensions written at the declaration, outermost first
    #[serde(default)]
    pub array_lengths: Vec<ConstExpr>,
    /// Annotation block (`None` when absent)
    #[serde(default)]
    pub annotations: Option<Vec<Annotation>>,
}

/// Enum definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enum {
    /// Enum name
    pub name: String,
    /// Enumerators in declaration order
    pub enumerators: Vec<Enumerator>,
    /// Annotation block (`None` when absent)
    #[serde(default)]
    pub annotations: Option<Vec<Annotation>>,
}

/// One enumerator; its value is its position in the enum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enumerator {
    /// Enumerator name
    pub name: String,
    /// Annotation block (`None` when absent)
    #[serde(default)]
    pub annotations: Option<Vec<Annotation>>,
}

/// Constant definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constant {
    /// Constant name
    pub name: String,
    /// Declared type
    pub type_spec: TypeSpec,
    /// Unevaluated value
    pub value: ConstExpr,
    /// Annotation block (`None` when absent)
    #[serde(default)]
    pub annotations: Option<Vec<Annotation>>,
}

/// Typedef (alias) definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Typedef {
    /// Alias name
    pub name: String,
    /// Aliased type
    pub type_spec: TypeSpec,
    /// Array dimensions declared on the alias, outermost first
    #[serde(default)]
    pub array_lengths: Vec<ConstExpr>,
    /// Annotation block (`None` when absent)
    #[serde(default)]
    pub annotations: Option<Vec<Annotation>>,
}

/// Union definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Union {
    /// Union name
    pub name: String,
    /// Discriminator type
    pub switch_type: TypeSpec,
    /// Cases in declaration order
    pub cases: Vec<UnionCase>,
    /// Annotation block (`None` when absent)
    #[serde(default)]
    pub annotations: Option<Vec<Annotation>>,
}

/// `case A: case B: T name;`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnionCase {
    /// Labels selecting this case
    pub labels: Vec<CaseLabel>,
    /// Member carried by the case
    pub member: Member,
}

/// A single union case label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseLabel {
    /// `case <expr>:`
    Value(ConstExpr),
    /// `default:`
    Default,
}

/// Type as written at a declaration site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeSpec {
    /// Builtin keyword or scoped identifier
    Named(String),
    /// `sequence<T>` or `sequence<T, N>`
    Sequence {
        /// Element type
        element: Box<TypeSpec>,
        /// Upper bound, if any
        #[serde(default)]
        bound: Option<ConstExpr>,
    },
    /// `string<N>` or `wstring<N>`
    String {
        /// `wstring` rather than `string`
        #[serde(default)]
        wide: bool,
        /// Upper bound, if any
        #[serde(default)]
        bound: Option<ConstExpr>,
    },
}

impl TypeSpec {
    /// Shorthand for [`TypeSpec::Named`]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Shorthand for an unbounded or bounded sequence
    #[must_use]
    pub fn sequence(element: Self, bound: Option<ConstExpr>) -> Self {
        Self::Sequence {
            element: Box::new(element),
            bound,
        }
    }
}

/// Unevaluated constant expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstExpr {
    /// Literal value
    Literal(Literal),
    /// Scoped identifier naming a constant or enumerator
    Reference(String),
    /// `a + b + ...`
    Sum(Vec<ConstExpr>),
}

impl ConstExpr {
    /// Integer literal
    #[must_use]
    pub fn int(value: i64) -> Self {
        Self::Literal(Literal::Integer(value))
    }

    /// Boolean literal
    #[must_use]
    pub fn boolean(value: bool) -> Self {
        Self::Literal(Literal::Boolean(value))
    }

    /// String literal
    pub fn string(value: impl Into<String>) -> Self {
        Self::Literal(Literal::String(value.into()))
    }

    /// Identifier reference
    pub fn reference(name: impl Into<String>) -> Self {
        Self::Reference(name.into())
    }
}

/// Literal token value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Literal {
    /// Integer literal (sign folded in by the parser)
    Integer(i64),
    /// Floating-point literal
    Float(f64),
    /// `TRUE` / `FALSE`
    Boolean(bool),
    /// String literal, adjacent literals already joined
    String(String),
}

/// Renders the expression the way it reads in IDL source
impl fmt::Display for ConstExpr {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(literal) => write!(formatter, "{literal}"),
            Self::Reference(name) => formatter.write_str(name),
            Self::Sum(terms) => {
                for (index, term) in terms.iter().enumerate() {
                    if index > 0 {
                        formatter.write_str(" + ")?;
                    }
                    write!(formatter, "{term}")?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(formatter, "{value}"),
            Self::Float(value) => write!(formatter, "{value:?}"),
            Self::Boolean(true) => formatter.write_str("TRUE"),
            Self::Boolean(false) => formatter.write_str("FALSE"),
            Self::String(value) => write!(formatter, "{value:?}"),
        }
    }
}

/// `@name`, `@name(value)` or `@name(key = value, ...)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Annotation name without the `@`
    pub name: String,
    /// Parameters
    #[serde(default)]
    pub params: AnnotationParams,
}

/// Parameters of an annotation application
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationParams {
    /// `@name`
    #[default]
    None,
    /// `@name(value)`
    Single(ConstExpr),
    /// `@name(key = value, ...)`
    Named(Vec<(String, ConstExpr)>),
}
