use crate::types::Type;
use crate::values::{FunctionId, Value};
use serde::{Deserialize, Serialize};

/// One SSA operation. Operations that write a value expose it through
/// [`Operation::lvalue`]; the values flowing into it are given by [`Operation::reads`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operation {
    Assign {
        lvalue: Value,
        rvalue: Value,
    },
    Binary {
        lvalue: Value,
        op: BinaryOp,
        left: Value,
        right: Value,
    },
    Unary {
        lvalue: Value,
        op: UnaryOp,
        operand: Value,
    },

    /// `lvalue = base[index]`, `lvalue` is a reference into `base`.
    Index {
        lvalue: Value,
        base: Value,
        index: Value,
    },
    /// `lvalue = base.field`, `lvalue` is a reference into `base`.
    Member {
        lvalue: Value,
        base: Value,
        field: String,
    },
    Length {
        lvalue: Value,
        base: Value,
    },
    Balance {
        lvalue: Value,
        address: Value,
    },

    Phi {
        lvalue: Value,
        sources: Vec<Value>,
    },

    InternalCall {
        lvalue: Option<Value>,
        callee: FunctionId,
        args: Vec<Value>,
        /// SSA return values of the callee, resolved by the IR producer.
        returns: Vec<Value>,
    },
    ExternalCall {
        lvalue: Option<Value>,
        destination: Value,
        function: String,
        args: Vec<Value>,
        value: Option<Value>,
    },
    BuiltinCall {
        lvalue: Option<Value>,
        builtin: BuiltinFunction,
        args: Vec<Value>,
    },
    NewContract {
        lvalue: Value,
        contract: String,
        args: Vec<Value>,
        value: Option<Value>,
    },

    Convert {
        lvalue: Value,
        value: Value,
        to: Type,
    },
    Unpack {
        lvalue: Value,
        tuple: Value,
        index: u32,
    },
    InitArray {
        lvalue: Value,
        elements: Vec<Value>,
    },
    Delete {
        lvalue: Value,
        variable: Value,
    },

    Condition {
        value: Value,
    },
    Return {
        values: Vec<Value>,
    },
    Transfer {
        destination: Value,
        amount: Value,
    },
    Emit {
        event: String,
        args: Vec<Value>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    And,
    Or,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Not,
    BitNot,
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuiltinFunction {
    Require,
    Assert,
    Revert,
    Keccak256,
    Sha256,
    EcRecover,
    AddMod,
    MulMod,
    BlockHash,
    GasLeft,
    AbiEncode,
    AbiDecode,
}

impl BuiltinFunction {
    pub fn is_check(&self) -> bool {
        matches!(self, BuiltinFunction::Require | BuiltinFunction::Assert)
    }
}

impl Operation {
    pub fn lvalue(&self) -> Option<&Value> {
        match self {
            Operation::Assign { lvalue, .. }
            | Operation::Binary { lvalue, .. }
            | Operation::Unary { lvalue, .. }
            | Operation::Index { lvalue, .. }
            | Operation::Member { lvalue, .. }
            | Operation::Length { lvalue, .. }
            | Operation::Balance { lvalue, .. }
            | Operation::Phi { lvalue, .. }
            | Operation::NewContract { lvalue, .. }
            | Operation::Convert { lvalue, .. }
            | Operation::Unpack { lvalue, .. }
            | Operation::InitArray { lvalue, .. }
            | Operation::Delete { lvalue, .. } => Some(lvalue),
            Operation::InternalCall { lvalue, .. }
            | Operation::ExternalCall { lvalue, .. }
            | Operation::BuiltinCall { lvalue, .. } => lvalue.as_ref(),
            Operation::Condition { .. }
            | Operation::Return { .. }
            | Operation::Transfer { .. }
            | Operation::Emit { .. } => None,
        }
    }

    /// Values whose content flows into the lvalue (or, for operations without
    /// one, the values the operation consumes).
    ///
    /// Internal calls read the callee's SSA return values, not their arguments.
    pub fn reads(&self) -> Vec<&Value> {
        match self {
            Operation::Assign { rvalue, .. } => vec![rvalue],
            Operation::Binary { left, right, .. } => vec![left, right],
            Operation::Unary { operand, .. } => vec![operand],
            Operation::Index { base, index, .. } => vec![base, index],
            Operation::Member { base, .. } | Operation::Length { base, .. } => vec![base],
            Operation::Balance { address, .. } => vec![address],
            Operation::Phi { sources, .. } => sources.iter().collect(),
            Operation::InternalCall { returns, .. } => returns.iter().collect(),
            Operation::ExternalCall {
                destination,
                args,
                value,
                ..
            } => std::iter::once(destination)
                .chain(args.iter())
                .chain(value.iter())
                .collect(),
            Operation::BuiltinCall { args, .. } => args.iter().collect(),
            Operation::NewContract { args, value, .. } => {
                args.iter().chain(value.iter()).collect()
            }
            Operation::Convert { value, .. } => vec![value],
            Operation::Unpack { tuple, .. } => vec![tuple],
            Operation::InitArray { elements, .. } => elements.iter().collect(),
            Operation::Delete { variable, .. } => vec![variable],
            Operation::Condition { value } => vec![value],
            Operation::Return { values } => values.iter().collect(),
            Operation::Transfer {
                destination,
                amount,
            } => vec![destination, amount],
            Operation::Emit { args, .. } => args.iter().collect(),
        }
    }

    /// Arguments handed to a callee, for call-like operations.
    pub fn call_arguments(&self) -> &[Value] {
        match self {
            Operation::InternalCall { args, .. }
            | Operation::ExternalCall { args, .. }
            | Operation::BuiltinCall { args, .. }
            | Operation::NewContract { args, .. } => args,
            _ => &[],
        }
    }

    /// The base object the lvalue refers into, for the alias-producing
    /// operations (index, member, length, balance).
    pub fn points_to(&self) -> Option<&Value> {
        match self {
            Operation::Index { base, .. }
            | Operation::Member { base, .. }
            | Operation::Length { base, .. } => Some(base),
            Operation::Balance { address, .. } => Some(address),
            _ => None,
        }
    }

    /// True for operations that guard the rest of the node: branch
    /// conditions and `require`/`assert`.
    pub fn is_check(&self) -> bool {
        match self {
            Operation::Condition { .. } => true,
            Operation::BuiltinCall { builtin, .. } => builtin.is_check(),
            _ => false,
        }
    }
}
