use std::fmt;
use std::str::FromStr;

use crate::shared::error::BimaError;

/// Protocol buffer scalar kinds a module column may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireType {
    String,
    Bool,
    Int32,
    Int64,
    Bytes,
    Double,
    Float,
    Uint32,
    Sint32,
    Sint64,
    Fixed32,
    Fixed64,
    Sfixed32,
    Sfixed64,
}

impl WireType {
    /// Every wire type, in the order the data type prompt offers them.
    pub const ALL: [WireType; 14] = [
        WireType::String,
        WireType::Bool,
        WireType::Int32,
        WireType::Int64,
        WireType::Bytes,
        WireType::Double,
        WireType::Float,
        WireType::Uint32,
        WireType::Sint32,
        WireType::Sint64,
        WireType::Fixed32,
        WireType::Fixed64,
        WireType::Sfixed32,
        WireType::Sfixed64,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WireType::String => "string",
            WireType::Bool => "bool",
            WireType::Int32 => "int32",
            WireType::Int64 => "int64",
            WireType::Bytes => "bytes",
            WireType::Double => "double",
            WireType::Float => "float",
            WireType::Uint32 => "uint32",
            WireType::Sint32 => "sint32",
            WireType::Sint64 => "sint64",
            WireType::Fixed32 => "fixed32",
            WireType::Fixed64 => "fixed64",
            WireType::Sfixed32 => "sfixed32",
            WireType::Sfixed64 => "sfixed64",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|t| t.as_str()).collect()
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WireType {
    type Err = BimaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == name)
            .ok_or_else(|| BimaError::UnknownWireType(name.to_string()))
    }
}

/// Maps wire type names to host language type names.
pub struct TypeMap;

impl TypeMap {
    /// Go type generated code uses for `wire_type`.
    pub fn host_type(wire_type: WireType) -> &'static str {
        match wire_type {
            WireType::String => "string",
            WireType::Bool => "bool",
            WireType::Int32 | WireType::Sint32 | WireType::Sfixed32 => "int32",
            WireType::Int64 | WireType::Sint64 | WireType::Sfixed64 => "int64",
            WireType::Bytes => "[]byte",
            WireType::Double => "float64",
            WireType::Float => "float32",
            WireType::Uint32 | WireType::Fixed32 => "uint32",
            WireType::Fixed64 => "uint64",
        }
    }

    pub fn resolve(wire_type: &str) -> Result<&'static str, BimaError> {
        Ok(Self::host_type(wire_type.parse::<WireType>()?))
    }
}
