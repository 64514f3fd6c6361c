//! The universal leaf shape of the IR

use crate::{Annotations, ConstValue, Primitive};
use serde::{Deserialize, Serialize};

/// A resolved struct member, union case body, module constant or enumerator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// Simple field name
    pub name: String,
    /// Primitive name, or fully-qualified name of a struct/union
    #[serde(rename = "type")]
    pub type_name: String,
    /// `type_name` names a struct/union rather than a primitive
    pub is_complex: bool,
    /// Enum the field's `uint32` came from, when retained
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enum_type: Option<String>,
    /// Fixed array dimensions, outermost first; empty for scalars
    #[serde(default)]
    pub array_lengths: Vec<u64>,
    /// Field is a `sequence<..>`
    #[serde(default)]
    pub is_sequence: bool,
    /// Sequence upper bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_bound: Option<u64>,
    /// Upper bound of a bounded string (or of each string in a sequence)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_upper_bound: Option<u64>,
    /// Module constant or enumerator
    #[serde(default)]
    pub is_constant: bool,
    /// Value of a constant field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<ConstValue>,
    /// Value expression as written in the source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_text: Option<String>,
    /// Annotations; `None` when the source had no annotation block
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Annotations>,
}

impl Field {
    /// Scalar field of a primitive type
    pub fn primitive(name: impl Into<String>, primitive: Primitive) -> Self {
        Self {
            name: name.into(),
            type_name: primitive.as_str().to_string(),
            is_complex: false,
            enum_type: None,
            array_lengths: Vec::new(),
            is_sequence: false,
            sequence_bound: None,
            string_upper_bound: None,
            is_constant: false,
            value: None,
            value_text: None,
            annotations: None,
        }
    }

    /// Has at least one fixed array dimension
    #[must_use]
    pub fn is_array(&self) -> bool {
        !self.array_lengths.is_empty()
    }

    /// Primitive type of the field, `None` for complex fields
    #[must_use]
    pub fn primitive_type(&self) -> Option<Primitive> {
        if self.is_complex {
            None
        } else {
            Primitive::from_canonical(&self.type_name)
        }
    }
}
