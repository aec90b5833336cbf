use crate::operations::Operation;
use crate::values::{EnvVar, Value};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(pub u32);

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "block{}", self.0)
    }
}

/// A CFG node: its SSA operations in program order plus the ids of the
/// blocks control may flow to next.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasicBlock {
    pub id: BlockId,
    pub operations: Vec<Operation>,
    pub successors: Vec<BlockId>,
}

impl BasicBlock {
    pub fn new(id: BlockId) -> Self {
        Self {
            id,
            operations: Vec::new(),
            successors: Vec::new(),
        }
    }

    pub fn add_operation(&mut self, op: Operation) {
        self.operations.push(op);
    }

    pub fn add_successor(&mut self, target: BlockId) {
        if !self.successors.contains(&target) {
            self.successors.push(target);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// True when `msg.sender` is handed to a call as an argument.
    pub fn passes_sender_to_call(&self) -> bool {
        let sender = Value::Env(EnvVar::MsgSender);
        self.operations
            .iter()
            .any(|op| op.call_arguments().contains(&sender))
    }
}
