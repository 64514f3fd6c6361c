//! Canonical primitive types

use serde::{Deserialize, Serialize};
use std::fmt;

/// A primitive type under its canonical IR name
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    /// `boolean`
    Bool,
    /// `char`
    Char,
    /// `wchar`
    WChar,
    /// `int8`
    Int8,
    /// `uint8`, `octet`, `byte`
    Uint8,
    /// `int16`, `short`
    Int16,
    /// `uint16`, `unsigned short`
    Uint16,
    /// `int32`, `long`
    Int32,
    /// `uint32`, `unsigned long`
    Uint32,
    /// `int64`, `long long`
    Int64,
    /// `uint64`, `unsigned long long`
    Uint64,
    /// `float32`, `float`
    Float32,
    /// `float64`, `double`, `long double`
    Float64,
    /// `string`
    String,
    /// `wstring`
    WString,
}

/// Coarse classification used for constant and discriminator checks
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub enum PrimitiveFamily {
    /// Signed and unsigned integers
    Integer,
    /// Floating point
    Float,
    /// `bool`
    Boolean,
    /// Characters and strings
    Text,
}

impl PrimitiveFamily {
    /// Integer or float
    #[must_use]
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }
}

impl Primitive {
    /// Primitive that every enum collapses to
    pub const ENUM: Self = Self::Uint32;

    /// Parse an IDL builtin keyword, normalizing aliases (`unsigned long` -> `uint32`)
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let words: Vec<&str> = keyword.split_whitespace().collect();
        let primitive = match words.as_slice() {
            ["long", "double"] | ["double"] => Self::Float64,
            ["float"] => Self::Float32,
            ["short"] => Self::Int16,
            ["unsigned", "short"] => Self::Uint16,
            ["long"] => Self::Int32,
            ["unsigned", "long"] => Self::Uint32,
            ["long", "long"] => Self::Int64,
            ["unsigned", "long", "long"] => Self::Uint64,
            ["boolean"] => Self::Bool,
            ["octet" | "byte"] => Self::Uint8,
            [single] => return Self::from_canonical(single),
            _ => return None,
        };
        Some(primitive)
    }

    /// Parse a canonical IR name (`uint32`, `bool`, ...)
    #[must_use]
    pub fn from_canonical(name: &str) -> Option<Self> {
        Some(match name {
            "bool" => Self::Bool,
            "char" => Self::Char,
            "wchar" => Self::WChar,
            "int8" => Self::Int8,
            "uint8" => Self::Uint8,
            "int16" => Self::Int16,
            "uint16" => Self::Uint16,
            "int32" => Self::Int32,
            "uint32" => Self::Uint32,
            "int64" => Self::Int64,
            "uint64" => Self::Uint64,
            "float32" => Self::Float32,
            "float64" => Self::Float64,
            "string" => Self::String,
            "wstring" => Self::WString,
            _ => return None,
        })
    }

    /// Canonical IR name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Char => "char",
            Self::WChar => "wchar",
            Self::Int8 => "int8",
            Self::Uint8 => "uint8",
            Self::Int16 => "int16",
            Self::Uint16 => "uint16",
            Self::Int32 => "int32",
            Self::Uint32 => "uint32",
            Self::Int64 => "int64",
            Self::Uint64 => "uint64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::String => "string",
            Self::WString => "wstring",
        }
    }

    /// Inclusive value range of an integer primitive
    ///
    /// `uint64` is capped at `i64::MAX`, the largest value a constant can hold.
    #[must_use]
    pub fn integer_range(self) -> Option<(i64, i64)> {
        Some(match self {
            Self::Int8 => (i8::MIN.into(), i8::MAX.into()),
            Self::Uint8 => (0, u8::MAX.into()),
            Self::Int16 => (i16::MIN.into(), i16::MAX.into()),
            Self::Uint16 => (0, u16::MAX.into()),
            Self::Int32 => (i32::MIN.into(), i32::MAX.into()),
            Self::Uint32 => (0, u32::MAX.into()),
            Self::Int64 => (i64::MIN, i64::MAX),
            Self::Uint64 => (0, i64::MAX),
            _ => return None,
        })
    }

    /// Family of the primitive
    #[must_use]
    pub fn family(self) -> PrimitiveFamily {
        match self {
            Self::Bool => PrimitiveFamily::Boolean,
            Self::Int8
            | Self::Uint8
            | Self::Int16
            | Self::Uint16
            | Self::Int32
            | Self::Uint32
            | Self::Int64
            | Self::Uint64 => PrimitiveFamily::Integer,
            Self::Float32 | Self::Float64 => PrimitiveFamily::Float,
            Self::Char | Self::WChar | Self::String | Self::WString => PrimitiveFamily::Text,
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_builtin_keywords() {
        let cases = [
            ("long double", Primitive::Float64),
            ("double", Primitive::Float64),
            ("float", Primitive::Float32),
            ("short", Primitive::Int16),
            ("unsigned short", Primitive::Uint16),
            ("unsigned long long", Primitive::Uint64),
            ("unsigned  long", Primitive::Uint32),
            ("long long", Primitive::Int64),
            ("long", Primitive::Int32),
            ("boolean", Primitive::Bool),
            ("octet", Primitive::Uint8),
            ("int8", Primitive::Int8),
            ("wstring", Primitive::WString),
        ];
        for (keyword, expected) in cases {
            assert_eq!(Primitive::from_keyword(keyword), Some(expected), "{keyword}");
        }
    }

    #[test]
    fn rejects_user_identifiers() {
        assert_eq!(Primitive::from_keyword("Color"), None);
        assert_eq!(Primitive::from_keyword("outer::Inner"), None);
        assert_eq!(Primitive::from_keyword("unsigned double"), None);
    }

    #[test]
    fn families() {
        assert!(Primitive::Uint32.family().is_numeric());
        assert!(Primitive::Float32.family().is_numeric());
        assert_eq!(Primitive::Bool.family(), PrimitiveFamily::Boolean);
        assert_eq!(Primitive::Char.family(), PrimitiveFamily::Text);
    }

    #[test]
    fn integer_ranges() {
        assert_eq!(Primitive::Uint8.integer_range(), Some((0, 255)));
        assert_eq!(Primitive::Int16.integer_range(), Some((-32_768, 32_767)));
        assert_eq!(Primitive::Float32.integer_range(), None);
    }
}
