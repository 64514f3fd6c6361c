//! Type resolution for fields, typedefs and discriminators

use crate::error::ResolutionError;
use crate::node::{Node, TypedefNode};
use crate::resolver::Resolver;
use crate::scope::ScopeId;
use idl_ast::{Member, TypeSpec};
use idl_ir::{Annotations, Field, Primitive};

/// What a resolved type ultimately refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseType {
    /// Primitive (enums land here as `uint32`)
    Primitive(Primitive),
    /// Struct or union, by fully-qualified name
    Complex(String),
}

/// A type with typedefs substituted and lengths evaluated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    /// Element type
    pub base: BaseType,
    /// Enum the primitive came from
    pub enum_type: Option<String>,
    /// Fixed dimensions, outermost first
    pub array_lengths: Vec<u64>,
    /// `sequence<..>`
    pub is_sequence: bool,
    /// Sequence upper bound
    pub sequence_bound: Option<u64>,
    /// String upper bound
    pub string_upper_bound: Option<u64>,
}

impl ResolvedType {
    fn scalar(base: BaseType) -> Self {
        Self {
            base,
            enum_type: None,
            array_lengths: Vec::new(),
            is_sequence: false,
            sequence_bound: None,
            string_upper_bound: None,
        }
    }

    /// The primitive, if this is neither an array, a sequence nor complex
    #[must_use]
    pub fn scalar_primitive(&self) -> Option<Primitive> {
        match self.base {
            BaseType::Primitive(primitive) if self.array_lengths.is_empty() && !self.is_sequence => Some(primitive),
            _ => None,
        }
    }

    /// IR type name
    #[must_use]
    pub fn type_name(&self) -> &str {
        match &self.base {
            BaseType::Primitive(primitive) => primitive.as_str(),
            BaseType::Complex(name) => name,
        }
    }

    /// Short rendering for diagnostics, e.g. `sequence<pkg::Point>` or `int32[2][3]`
    #[must_use]
    pub fn describe(&self) -> String {
        let mut text = self.type_name().to_string();
        if let Some(bound) = self.string_upper_bound {
            text = format!("{text}<{bound}>");
        }
        if self.is_sequence {
            text = match self.sequence_bound {
                Some(bound) => format!("sequence<{text}, {bound}>"),
                None => format!("sequence<{text}>"),
            };
        }
        for length in &self.array_lengths {
            text = format!("{text}[{length}]");
        }
        text
    }

    /// Append dimensions declared at an outer site after the existing ones
    ///
    /// # Errors
    ///
    /// Returns `ResolutionError::UnsupportedComposition` when the type is a
    /// sequence.
    pub fn with_array_lengths(mut self, lengths: Vec<u64>, context: &str) -> Result<Self, ResolutionError> {
        if lengths.is_empty() {
            return Ok(self);
        }
        if self.is_sequence {
            return Err(ResolutionError::UnsupportedComposition {
                name: context.to_string(),
                reason: "array of sequences",
            });
        }
        self.array_lengths.extend(lengths);
        Ok(self)
    }

    /// Turn the type into a named field
    #[must_use]
    pub fn into_field(self, name: &str, annotations: Option<Annotations>, retain_enum_origin: bool) -> Field {
        let (type_name, is_complex) = match self.base {
            BaseType::Primitive(primitive) => (primitive.as_str().to_string(), false),
            BaseType::Complex(name) => (name, true),
        };
        Field {
            name: name.to_string(),
            type_name,
            is_complex,
            enum_type: self.enum_type.filter(|_| retain_enum_origin),
            array_lengths: self.array_lengths,
            is_sequence: self.is_sequence,
            sequence_bound: self.sequence_bound,
            string_upper_bound: self.string_upper_bound,
            is_constant: false,
            value: None,
            value_text: None,
            annotations,
        }
    }
}

impl Resolver<'_, '_> {
    /// Resolve a written type in `scope`
    ///
    /// # Errors
    ///
    /// Returns `Unresolved` for unknown identifiers, `TypeMismatch` when the
    /// identifier names a module or constant, and `UnsupportedComposition`
    /// for nested sequences or sequences of arrays.
    pub fn resolve_type(&self, spec: &TypeSpec, scope: ScopeId, context: &str) -> Result<ResolvedType, ResolutionError> {
        match spec {
            TypeSpec::Named(name) => self.resolve_named_type(name, scope, context),

            TypeSpec::Sequence { element, bound } => {
                let element = self.resolve_type(element, scope, context)?;
                if element.is_sequence {
                    return Err(ResolutionError::UnsupportedComposition {
                        name: context.to_string(),
                        reason: "sequence of sequences",
                    });
                }
                if !element.array_lengths.is_empty() {
                    return Err(ResolutionError::UnsupportedComposition {
                        name: context.to_string(),
                        reason: "sequence of arrays",
                    });
                }
                let sequence_bound = bound
                    .as_ref()
                    .map(|bound| self.eval_length(bound, scope, context))
                    .transpose()?;
                Ok(ResolvedType {
                    is_sequence: true,
                    sequence_bound,
                    ..element
                })
            }

            TypeSpec::String { wide, bound } => {
                let primitive = if *wide { Primitive::WString } else { Primitive::String };
                let string_upper_bound = bound
                    .as_ref()
                    .map(|bound| self.eval_length(bound, scope, context))
                    .transpose()?;
                Ok(ResolvedType {
                    string_upper_bound,
                    ..ResolvedType::scalar(BaseType::Primitive(primitive))
                })
            }
        }
    }

    fn resolve_named_type(&self, name: &str, scope: ScopeId, context: &str) -> Result<ResolvedType, ResolutionError> {
        if let Some(primitive) = Primitive::from_keyword(name) {
            return Ok(ResolvedType::scalar(BaseType::Primitive(primitive)));
        }

        let node = self.registry().resolve(scope, name, context)?;
        let target = self.registry().node(node);
        match target {
            Node::Struct(def) => Ok(ResolvedType::scalar(BaseType::Complex(def.name.clone()))),
            Node::Union(def) => Ok(ResolvedType::scalar(BaseType::Complex(def.name.clone()))),
            Node::Enum(def) => Ok(ResolvedType {
                enum_type: Some(def.name.clone()),
                ..ResolvedType::scalar(BaseType::Primitive(Primitive::ENUM))
            }),
            Node::Typedef(def) => self.guarded(node, || def.resolve(self)),
            Node::Module(_) | Node::Constant(_) => Err(ResolutionError::TypeMismatch {
                name: context.to_string(),
                expected: format!("a type for `{name}`"),
                found: format!("{} `{}`", target.keyword(), target.name()),
            }),
        }
    }

    /// Resolve a struct member or union case body into a field
    ///
    /// # Errors
    ///
    /// Propagates type, length and annotation errors.
    pub fn resolve_member(&self, member: &Member, scope: ScopeId, owner: &str) -> Result<Field, ResolutionError> {
        let context = format!("{owner}::{}", member.name);
        let resolved = self.resolve_type(&member.type_spec, scope, &context)?;
        let lengths = self.eval_lengths(&member.array_lengths, scope, &context)?;
        let resolved = resolved.with_array_lengths(lengths, &context)?;
        let annotations = self.resolve_annotations(member.annotations.as_deref(), scope, &context)?;
        Ok(resolved.into_field(&member.name, annotations, self.config().retain_enum_origin))
    }
}

impl TypedefNode<'_> {
    /// Underlying type with the alias's own dimensions appended
    ///
    /// Dimensions of an inner alias stay outermost, so `typedef A B[3]` over
    /// `typedef long A[2]` resolves to `int32[2][3]`.
    ///
    /// # Errors
    ///
    /// Propagates resolution errors of the aliased type.
    pub fn resolve(&self, cx: &Resolver<'_, '_>) -> Result<ResolvedType, ResolutionError> {
        let resolved = cx.resolve_type(&self.ast.type_spec, self.scope, &self.name)?;
        let lengths = cx.eval_lengths(&self.ast.array_lengths, self.scope, &self.name)?;
        resolved.with_array_lengths(lengths, &self.name)
    }
}
