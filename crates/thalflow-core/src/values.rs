use num_bigint::{BigInt, BigUint};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContractId(pub u32);

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FunctionId(pub u32);

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateVarId {
    pub contract: ContractId,
    pub index: u32,
}

impl fmt::Display for StateVarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:s{}", self.contract, self.index)
    }
}

/// Declares an id that lives inside a single function.
macro_rules! function_scoped_id {
    ($name:ident, $prefix:literal) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name {
            pub function: FunctionId,
            pub index: u32,
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}:{}{}", self.function, $prefix, self.index)
            }
        }
    };
}

function_scoped_id!(LocalId, "l");
function_scoped_id!(ParamId, "p");
function_scoped_id!(TempId, "t");
function_scoped_id!(RefId, "ref");

/// Anything that can be a node of the dependency graph.
///
/// Variables carry an optional SSA version. `None` is the declared (canonical) variable,
/// `Some(n)` is its n-th SSA definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Value {
    State(StateVarId, Option<u32>),
    Local(LocalId, Option<u32>),
    Param(ParamId, Option<u32>),
    Temp(TempId, Option<u32>),
    Reference(RefId, Option<u32>),
    Constant(Constant),
    Env(EnvVar),
}

impl Value {
    pub fn version(&self) -> Option<u32> {
        match self {
            Value::State(_, v)
            | Value::Local(_, v)
            | Value::Param(_, v)
            | Value::Temp(_, v)
            | Value::Reference(_, v) => *v,
            Value::Constant(_) | Value::Env(_) => None,
        }
    }

    pub fn is_ssa(&self) -> bool {
        self.version().is_some()
    }

    /// The same variable at SSA version `version`. Constants and environment
    /// variables are returned unchanged.
    pub fn with_version(&self, version: u32) -> Value {
        self.set_version(Some(version))
    }

    /// Source-level identity: the declared variable behind an SSA version.
    pub fn canonical(&self) -> Value {
        self.set_version(None)
    }

    fn set_version(&self, version: Option<u32>) -> Value {
        match self {
            Value::State(id, _) => Value::State(*id, version),
            Value::Local(id, _) => Value::Local(*id, version),
            Value::Param(id, _) => Value::Param(*id, version),
            Value::Temp(id, _) => Value::Temp(*id, version),
            Value::Reference(id, _) => Value::Reference(*id, version),
            other => other.clone(),
        }
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, Value::Constant(_))
    }

    pub fn is_env(&self) -> bool {
        matches!(self, Value::Env(_))
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Value::Reference(..))
    }

    pub fn is_temporary(&self) -> bool {
        matches!(self, Value::Temp(..))
    }

    pub fn as_reference(&self) -> Option<RefId> {
        match self {
            Value::Reference(id, _) => Some(*id),
            _ => None,
        }
    }

    /// Function that declares this value. State variables, constants and
    /// environment variables have none.
    pub fn owning_function(&self) -> Option<FunctionId> {
        match self {
            Value::Local(id, _) => Some(id.function),
            Value::Param(id, _) => Some(id.function),
            Value::Temp(id, _) => Some(id.function),
            Value::Reference(id, _) => Some(id.function),
            Value::State(..) | Value::Constant(_) | Value::Env(_) => None,
        }
    }

    pub fn uint(value: u64) -> Value {
        Value::Constant(Constant::Uint(BigUint::from(value), 256))
    }

    pub fn bool(value: bool) -> Value {
        Value::Constant(Constant::Bool(value))
    }

    pub fn string(value: impl Into<String>) -> Value {
        Value::Constant(Constant::String(value.into()))
    }

    pub fn env(var: EnvVar) -> Value {
        Value::Env(var)
    }
}

impl From<Constant> for Value {
    fn from(constant: Constant) -> Self {
        Value::Constant(constant)
    }
}

impl From<EnvVar> for Value {
    fn from(var: EnvVar) -> Self {
        Value::Env(var)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (base, version) = match self {
            Value::State(id, v) => (id.to_string(), v),
            Value::Local(id, v) => (id.to_string(), v),
            Value::Param(id, v) => (id.to_string(), v),
            Value::Temp(id, v) => (id.to_string(), v),
            Value::Reference(id, v) => (id.to_string(), v),
            Value::Constant(c) => return write!(f, "{}", c),
            Value::Env(var) => return write!(f, "{}", var),
        };
        match version {
            Some(n) => write!(f, "{}_{}", base, n),
            None => write!(f, "{}", base),
        }
    }
}

/// Environment pseudo-variables supplied by the executing transaction or block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnvVar {
    #[serde(rename = "msg.sender")]
    MsgSender,
    #[serde(rename = "msg.value")]
    MsgValue,
    #[serde(rename = "msg.data")]
    MsgData,
    #[serde(rename = "msg.sig")]
    MsgSig,
    #[serde(rename = "tx.origin")]
    TxOrigin,
    #[serde(rename = "tx.gasprice")]
    TxGasPrice,
    #[serde(rename = "block.timestamp")]
    BlockTimestamp,
    #[serde(rename = "block.number")]
    BlockNumber,
    #[serde(rename = "block.coinbase")]
    BlockCoinbase,
    #[serde(rename = "block.chainid")]
    ChainId,
    #[serde(rename = "this")]
    This,
}

impl EnvVar {
    pub fn name(&self) -> &'static str {
        match self {
            EnvVar::MsgSender => "msg.sender",
            EnvVar::MsgValue => "msg.value",
            EnvVar::MsgData => "msg.data",
            EnvVar::MsgSig => "msg.sig",
            EnvVar::TxOrigin => "tx.origin",
            EnvVar::TxGasPrice => "tx.gasprice",
            EnvVar::BlockTimestamp => "block.timestamp",
            EnvVar::BlockNumber => "block.number",
            EnvVar::BlockCoinbase => "block.coinbase",
            EnvVar::ChainId => "block.chainid",
            EnvVar::This => "this",
        }
    }
}

impl fmt::Display for EnvVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Constant {
    Bool(bool),
    Uint(BigUint, u16),
    Int(BigInt, u16),
    Address([u8; 20]),
    Bytes(Vec<u8>),
    String(String),
    Null,
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Bool(b) => write!(f, "{}", b),
            Constant::Uint(val, _) => write!(f, "{}", val),
            Constant::Int(val, _) => write!(f, "{}", val),
            Constant::Address(addr) => write!(f, "0x{}", hex::encode(addr)),
            Constant::Bytes(bytes) => write!(f, "0x{}", hex::encode(bytes)),
            Constant::String(s) => write!(f, "\"{}\"", s),
            Constant::Null => write!(f, "null"),
        }
    }
}

mod hex {
    pub fn encode(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }
}
