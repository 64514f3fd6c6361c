//! Resolved IDL intermediate representation
//!
//! The IR is what the binary codec reads as its schema. It contains only
//! modules, structs and unions; typedefs and enums have been folded away and
//! every field refers either to a primitive or, by fully-qualified name, to
//! another definition in the same output.
//!
//! All values here are plain data: built once by the resolver and never
//! mutated afterwards.

mod field;
mod primitive;
mod value;

pub use field::Field;
pub use primitive::{Primitive, PrimitiveFamily};
pub use value::{AnnotationValue, Annotations, ConstValue};

use serde::{Deserialize, Serialize};

/// Shape shared by every aggregate definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregated {
    /// Fully-qualified, globally unique name (`outer::inner::Name`)
    pub name: String,
    /// Annotations; `None` when the source had no annotation block
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Annotations>,
}

/// Discriminates the three aggregate kinds
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregatedKind {
    /// Module (or enum) constants
    Module,
    /// Struct members
    Struct,
    /// Discriminated union
    Union,
}

/// One unit of resolver output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "aggregatedKind", rename_all = "lowercase")]
pub enum IdlMessageDefinition {
    /// Constants declared directly in a module
    Module(ModuleDefinition),
    /// Struct with ordered members
    Struct(StructDefinition),
    /// Union with discriminator and cases
    Union(UnionDefinition),
}

impl IdlMessageDefinition {
    /// Common `{name, annotations}` record
    #[must_use]
    pub fn aggregated(&self) -> &Aggregated {
        match self {
            Self::Module(def) => &def.aggregated,
            Self::Struct(def) => &def.aggregated,
            Self::Union(def) => &def.aggregated,
        }
    }

    /// Fully-qualified name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.aggregated().name
    }

    /// Annotations, if the definition had an annotation block
    #[must_use]
    pub fn annotations(&self) -> Option<&Annotations> {
        self.aggregated().annotations.as_ref()
    }

    /// Aggregate kind tag
    #[must_use]
    pub fn kind(&self) -> AggregatedKind {
        match self {
            Self::Module(_) => AggregatedKind::Module,
            Self::Struct(_) => AggregatedKind::Struct,
            Self::Union(_) => AggregatedKind::Union,
        }
    }

    /// Every field of the definition, union default included
    pub fn fields(&self) -> Box<dyn Iterator<Item = &Field> + '_> {
        match self {
            Self::Module(def) => Box::new(def.definitions.iter()),
            Self::Struct(def) => Box::new(def.definitions.iter()),
            Self::Union(def) => Box::new(
                def.cases
                    .iter()
                    .map(|case| &case.field)
                    .chain(def.default_case.iter()),
            ),
        }
    }
}

/// Constants declared directly in a module, or the enumerators of an enum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleDefinition {
    /// Name and annotations
    #[serde(flatten)]
    pub aggregated: Aggregated,
    /// Constant fields in declaration order
    pub definitions: Vec<Field>,
}

/// Struct definition; field order is wire order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructDefinition {
    /// Name and annotations
    #[serde(flatten)]
    pub aggregated: Aggregated,
    /// Member fields in declaration order
    pub definitions: Vec<Field>,
}

/// Discriminated union
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnionDefinition {
    /// Name and annotations
    #[serde(flatten)]
    pub aggregated: Aggregated,
    /// Normalized integer, float or boolean primitive name
    pub switch_type: String,
    /// Cases in declaration order
    pub cases: Vec<Case>,
    /// Field selected when no predicate matches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_case: Option<Field>,
}

impl UnionDefinition {
    /// Case whose predicates contain `discriminator`, falling back to the default
    #[must_use]
    pub fn case_for(&self, discriminator: &ConstValue) -> Option<&Field> {
        self.cases
            .iter()
            .find(|case| case.predicates.contains(discriminator))
            .map(|case| &case.field)
            .or(self.default_case.as_ref())
    }
}

/// A union case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    /// Discriminator values selecting this case
    pub predicates: Vec<ConstValue>,
    /// Field carried by the case
    #[serde(rename = "type")]
    pub field: Field,
}

/// Look up a definition by exact fully-qualified name
#[must_use]
pub fn find_definition<'ast>(
    definitions: &'ast [IdlMessageDefinition],
    name: &str,
) -> Option<&'ast IdlMessageDefinition> {
    definitions.iter().find(|def| def.name() == name)
}
