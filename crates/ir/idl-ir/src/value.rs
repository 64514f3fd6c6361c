//! Constant values and annotations

use crate::{Primitive, PrimitiveFamily};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Annotations keyed by name, in declaration order
pub type Annotations = IndexMap<String, AnnotationValue>;

/// An evaluated constant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConstValue {
    /// Integer value
    Integer(i64),
    /// Floating-point value
    Float(f64),
    /// Boolean value
    Boolean(bool),
    /// String value
    String(String),
}

impl ConstValue {
    /// Returns the integer value if this is an integer
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Whether a value of this kind may initialize a type of `family`
    ///
    /// Integers are accepted for floats; the value itself is left untouched.
    #[must_use]
    pub fn fits(&self, family: PrimitiveFamily) -> bool {
        matches!(
            (self, family),
            (Self::Integer(_), PrimitiveFamily::Integer | PrimitiveFamily::Float)
                | (Self::Float(_), PrimitiveFamily::Float)
                | (Self::Boolean(_), PrimitiveFamily::Boolean)
                | (Self::String(_), PrimitiveFamily::Text)
        )
    }

    /// Whether this value may initialize `primitive`, including its range
    #[must_use]
    pub fn fits_primitive(&self, primitive: Primitive) -> bool {
        if !self.fits(primitive.family()) {
            return false;
        }
        match (self, primitive.integer_range()) {
            (Self::Integer(value), Some((min, max))) => (min..=max).contains(value),
            _ => true,
        }
    }

    /// Human-readable kind name for diagnostics
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Boolean(_) => "boolean",
            Self::String(_) => "string",
        }
    }
}

impl fmt::Display for ConstValue {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(formatter, "{value}"),
            Self::Float(value) => write!(formatter, "{value}"),
            Self::Boolean(value) => write!(formatter, "{value}"),
            Self::String(value) => write!(formatter, "{value:?}"),
        }
    }
}

/// Parameters of one resolved annotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum AnnotationValue {
    /// `@name`
    NoParams,
    /// `@name(value)`
    ConstParam {
        /// The single parameter
        value: ConstValue,
    },
    /// `@name(key = value, ...)`
    NamedParams {
        /// Parameters in declaration order
        #[serde(rename = "namedParams")]
        named_params: IndexMap<String, ConstValue>,
    },
}
