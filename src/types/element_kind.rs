//! This module defines the canonical, type-safe tags used at the boundary.
//!
//! `ElementKind` is the only contract between this layer and the command
//! handlers that consume its arguments. `HostClass` is the element class a
//! host value reports about itself.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of argument kinds reported by `MarshalSession::classify`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    StringChar,
    StringByte,
    SparseByte,
    SparseChar,
    SparseInt,
    SparseReal,
    SparseShort,
    SparseShortReal,
    SparseWord,
    DenseInt,
    DenseReal,
    DenseShort,
    DenseShortReal,
    /// Part of the contract, but never produced by classification: a dense
    /// uint16 matrix classifies as `Undefined` even though it imports fine.
    DenseWord,
    StringInt,
    StringShort,
    StringWord,
    Undefined,
}

impl ElementKind {
    /// Returns `true` for the kinds produced from sparse storage.
    pub fn is_sparse(&self) -> bool {
        matches!(
            self,
            Self::SparseByte
                | Self::SparseChar
                | Self::SparseInt
                | Self::SparseReal
                | Self::SparseShort
                | Self::SparseShortReal
                | Self::SparseWord
        )
    }

    /// Returns `true` for the kinds that denote a string or a list of strings.
    pub fn is_string(&self) -> bool {
        matches!(
            self,
            Self::StringChar
                | Self::StringByte
                | Self::StringInt
                | Self::StringShort
                | Self::StringWord
        )
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// The element class of a host value.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum HostClass {
    Bool,
    Char,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Single,
    Double,
}

impl HostClass {
    /// Returns `true` for classes that count as real numbers (everything but
    /// logical and character data).
    pub fn is_numeric(&self) -> bool {
        !matches!(self, Self::Bool | Self::Char)
    }

    /// The class name the host runtime shows to its users.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bool => "logical",
            Self::Char => "char",
            Self::Int8 => "int8",
            Self::UInt8 => "uint8",
            Self::Int16 => "int16",
            Self::UInt16 => "uint16",
            Self::Int32 => "int32",
            Self::UInt32 => "uint32",
            Self::Single => "single",
            Self::Double => "double",
        }
    }
}

impl fmt::Display for HostClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serializes_as_snake_case() {
        let json = serde_json::to_string(&ElementKind::SparseShortReal).unwrap();
        assert_eq!(json, "\"sparse_short_real\"");
        let back: ElementKind = serde_json::from_str("\"string_byte\"").unwrap();
        assert_eq!(back, ElementKind::StringByte);
    }

    #[test]
    fn test_kind_families() {
        assert!(ElementKind::SparseWord.is_sparse());
        assert!(!ElementKind::DenseWord.is_sparse());
        assert!(ElementKind::StringInt.is_string());
        assert!(!ElementKind::Undefined.is_string());
    }

    #[test]
    fn test_numeric_classes() {
        assert!(HostClass::UInt32.is_numeric());
        assert!(HostClass::Single.is_numeric());
        assert!(!HostClass::Bool.is_numeric());
        assert!(!HostClass::Char.is_numeric());
        assert_eq!(HostClass::UInt8.to_string(), "uint8");
    }
}
