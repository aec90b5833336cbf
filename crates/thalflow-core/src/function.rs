use crate::analysis::data_dependency::{DependencyMap, ScopeDependencies};
use crate::block::{BasicBlock, BlockId};
use crate::config::AnalysisConfig;
use crate::operations::Operation;
use crate::types::Type;
use crate::values::{ContractId, EnvVar, FunctionId, LocalId, ParamId, RefId, TempId, Value};
use crate::{IrError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Function {
    pub id: FunctionId,
    pub name: String,
    /// `None` for free functions declared outside any contract.
    pub contract: Option<ContractId>,
    pub kind: FunctionKind,
    pub visibility: Visibility,
    pub mutability: Mutability,
    /// Names of the modifiers applied to this function, in declaration order.
    pub modifiers: Vec<String>,
    pub params: Vec<Parameter>,
    /// SSA values the function returns, as seen by internal callers.
    pub returns: Vec<Value>,
    pub body: FunctionBody,
    /// Explicit access-control verdict. When unset the verdict is derived
    /// from the function's kind, modifiers and `msg.sender` checks.
    pub access_control: Option<bool>,
    #[serde(skip)]
    pub(crate) dependencies: OnceLock<ScopeDependencies>,
    #[serde(skip)]
    pub(crate) must_sources: OnceLock<DependencyMap>,
}

impl Function {
    pub fn new(id: FunctionId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            contract: None,
            kind: FunctionKind::Regular,
            visibility: Visibility::Public,
            mutability: Mutability::NonPayable,
            modifiers: Vec::new(),
            params: Vec::new(),
            returns: Vec::new(),
            body: FunctionBody::new(),
            access_control: None,
            dependencies: OnceLock::new(),
            must_sources: OnceLock::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entry_block(&self) -> BlockId {
        self.body.entry_block
    }

    pub fn is_modifier(&self) -> bool {
        self.kind == FunctionKind::Modifier
    }

    pub fn is_constructor(&self) -> bool {
        self.kind == FunctionKind::Constructor
    }

    /// Whether arbitrary callers can enter this function directly. Free
    /// functions and modifiers never can.
    pub fn is_externally_callable(&self) -> bool {
        self.contract.is_some() && !self.is_modifier() && self.visibility.is_externally_callable()
    }

    /// Every operation of every block, block by block.
    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        self.body
            .blocks
            .values()
            .flat_map(|block| block.operations.iter())
    }

    pub fn param_id(&self, index: u32) -> ParamId {
        ParamId {
            function: self.id,
            index,
        }
    }

    /// Declared parameters, without SSA versions.
    pub fn parameters(&self) -> Vec<Value> {
        (0..self.params.len() as u32)
            .map(|i| Value::Param(self.param_id(i), None))
            .collect()
    }

    /// Parameters as they enter the function in SSA form (version 0).
    pub fn parameters_ssa(&self) -> Vec<Value> {
        (0..self.params.len() as u32)
            .map(|i| Value::Param(self.param_id(i), Some(0)))
            .collect()
    }

    pub fn is_parameter_of(&self, value: &Value) -> bool {
        match value {
            Value::Param(id, _) => {
                id.function == self.id && (id.index as usize) < self.params.len()
            }
            _ => false,
        }
    }

    pub fn declare_local(
        &mut self,
        name: impl Into<String>,
        var_type: Type,
        location: DataLocation,
    ) -> Value {
        let id = LocalId {
            function: self.id,
            index: self.body.locals.len() as u32,
        };
        self.body.locals.push(LocalVariable {
            name: name.into(),
            var_type,
            location,
        });
        Value::Local(id, None)
    }

    pub fn declare_temp(&mut self) -> Value {
        let id = TempId {
            function: self.id,
            index: self.body.temporaries,
        };
        self.body.temporaries += 1;
        Value::Temp(id, None)
    }

    pub fn declare_reference(&mut self) -> Value {
        let id = RefId {
            function: self.id,
            index: self.body.references,
        };
        self.body.references += 1;
        Value::Reference(id, None)
    }

    pub fn local(&self, id: LocalId) -> Option<&LocalVariable> {
        if id.function != self.id {
            return None;
        }
        self.body.locals.get(id.index as usize)
    }

    pub fn param(&self, id: ParamId) -> Option<&Parameter> {
        if id.function != self.id {
            return None;
        }
        self.params.get(id.index as usize)
    }

    pub fn points_to(&self, id: RefId) -> Option<&Value> {
        if id.function != self.id {
            return None;
        }
        self.body.points_to.get(&id.index)
    }

    /// Referents reached by following points-to links from `value`, nearest
    /// first. Empty unless `value` is a reference produced by an alias operation.
    pub fn alias_chain(&self, value: &Value) -> Result<Vec<Value>> {
        let mut chain = Vec::new();
        let mut seen = vec![value.canonical()];
        let mut current = value.clone();
        while let Some(base) = current.as_reference().and_then(|id| self.points_to(id)) {
            let canonical = base.canonical();
            if canonical == current.canonical() {
                return Err(IrError::InvalidOperation(format!(
                    "reference {} points to itself in {}",
                    current, self.name
                )));
            }
            if seen.contains(&canonical) {
                return Err(IrError::InvalidOperation(format!(
                    "points-to cycle through {} in {}",
                    base, self.name
                )));
            }
            seen.push(canonical);
            chain.push(base.clone());
            current = base.clone();
        }
        Ok(chain)
    }

    /// Locals that only hold a storage pointer. Writes to them carry no
    /// source-level data flow.
    pub fn is_storage_pointer(&self, value: &Value) -> bool {
        match value {
            Value::Local(id, _) => self
                .local(*id)
                .map(|local| local.location == DataLocation::Storage)
                .unwrap_or(false),
            _ => false,
        }
    }

    /// Whether execution of this function is gated by an access-control check.
    pub fn is_protected(&self, config: &AnalysisConfig) -> bool {
        if let Some(verdict) = self.access_control {
            return verdict;
        }
        if self.is_constructor() {
            return true;
        }
        if self
            .modifiers
            .iter()
            .any(|name| config.is_protecting_modifier(name))
        {
            return true;
        }
        self.checks_sender()
            || self
                .body
                .blocks
                .values()
                .any(BasicBlock::passes_sender_to_call)
    }

    /// True when `msg.sender` flows into the operand of a condition,
    /// `require` or `assert`, directly or through values defined in this
    /// function. Index and member accesses are not followed, so
    /// `require(allowed[msg.sender])` does not count.
    fn checks_sender(&self) -> bool {
        let mut producers: IndexMap<&Value, Vec<&Operation>> = IndexMap::new();
        for op in self.operations() {
            if let Some(lvalue) = op.lvalue() {
                producers.entry(lvalue).or_default().push(op);
            }
        }

        let sender = Value::Env(EnvVar::MsgSender);
        let mut pending: Vec<&Value> = self
            .operations()
            .filter(|op| op.is_check())
            .flat_map(Operation::reads)
            .collect();
        let mut seen = HashSet::new();
        while let Some(value) = pending.pop() {
            if *value == sender {
                return true;
            }
            if !seen.insert(value) {
                continue;
            }
            let Some(ops) = producers.get(value) else {
                continue;
            };
            for op in ops.iter().filter(|op| op.points_to().is_none()) {
                pending.extend(op.reads());
            }
        }
        false
    }

    pub fn is_computed(&self) -> bool {
        self.dependencies.get().is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FunctionKind {
    Regular,
    Modifier,
    Constructor,
    Fallback,
    Receive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub param_type: Type,
    pub location: DataLocation,
}

impl Parameter {
    pub fn new(name: impl Into<String>, param_type: Type) -> Self {
        let location = if param_type.is_reference() {
            DataLocation::Memory
        } else {
            DataLocation::Stack
        };
        Self {
            name: name.into(),
            param_type,
            location,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataLocation {
    Stack,
    Storage,
    Memory,
    Calldata,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    Public,
    External,
    Internal,
    Private,
}

impl Visibility {
    pub fn is_externally_callable(&self) -> bool {
        matches!(self, Visibility::Public | Visibility::External)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mutability {
    Pure,
    View,
    NonPayable,
    Payable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionBody {
    pub entry_block: BlockId,
    pub blocks: IndexMap<BlockId, BasicBlock>,
    pub locals: Vec<LocalVariable>,
    pub temporaries: u32,
    pub references: u32,
    /// Referent of every reference produced by an alias operation, keyed by
    /// reference index.
    pub points_to: IndexMap<u32, Value>,
    next_block_id: u32,
}

impl FunctionBody {
    pub fn new() -> Self {
        let entry_block = BlockId(0);
        let mut blocks = IndexMap::new();
        blocks.insert(entry_block, BasicBlock::new(entry_block));

        Self {
            entry_block,
            blocks,
            locals: Vec::new(),
            temporaries: 0,
            references: 0,
            points_to: IndexMap::new(),
            next_block_id: 1,
        }
    }

    pub fn create_block(&mut self) -> BlockId {
        let id = BlockId(self.next_block_id);
        self.next_block_id += 1;
        self.blocks.insert(id, BasicBlock::new(id));
        id
    }

    pub fn get_block(&self, id: BlockId) -> Option<&BasicBlock> {
        self.blocks.get(&id)
    }

    pub fn get_block_mut(&mut self, id: BlockId) -> Option<&mut BasicBlock> {
        self.blocks.get_mut(&id)
    }
}

impl Default for FunctionBody {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalVariable {
    pub name: String,
    pub var_type: Type,
    pub location: DataLocation,
}
