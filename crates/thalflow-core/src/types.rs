use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared type of a variable. Dependency analysis never looks inside it. It
/// decides the default data location of parameters and locals.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Bool,
    Uint(u16),
    Int(u16),
    Address,
    Bytes(u8),
    DynamicBytes,
    String,
    Array(Box<Type>, Option<usize>),
    Mapping(Box<Type>, Box<Type>),
    Struct(String),
    Enum(String),
    Contract(String),
    Tuple(Vec<Type>),
}

impl Type {
    pub fn is_reference(&self) -> bool {
        matches!(
            self,
            Type::String
                | Type::DynamicBytes
                | Type::Array(..)
                | Type::Mapping(..)
                | Type::Struct(_)
        )
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Bool => write!(f, "bool"),
            Type::Uint(bits) => write!(f, "uint{}", bits),
            Type::Int(bits) => write!(f, "int{}", bits),
            Type::Address => write!(f, "address"),
            Type::Bytes(n) => write!(f, "bytes{}", n),
            Type::DynamicBytes => write!(f, "bytes"),
            Type::String => write!(f, "string"),
            Type::Array(elem, Some(size)) => write!(f, "{}[{}]", elem, size),
            Type::Array(elem, None) => write!(f, "{}[]", elem),
            Type::Mapping(key, value) => write!(f, "mapping({} => {})", key, value),
            Type::Struct(name) | Type::Enum(name) | Type::Contract(name) => write!(f, "{}", name),
            Type::Tuple(elems) => {
                let elems = elems
                    .iter()
                    .map(|t| t.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "({})", elems)
            }
        }
    }
}
