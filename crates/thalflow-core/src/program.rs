use crate::analysis::data_dependency::TaintSeeds;
use crate::config::AnalysisConfig;
use crate::contract::Contract;
use crate::function::Function;
use crate::operations::Operation;
use crate::values::{ContractId, FunctionId, RefId, Value};
use crate::{IrError, Result};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// A compilation unit: the arena owning every contract and function under
/// analysis. Ids index straight into `contracts` and `functions`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Program {
    pub contracts: Vec<Contract>,
    pub functions: Vec<Function>,
    #[serde(default)]
    pub config: AnalysisConfig,
    #[serde(skip)]
    pub(crate) taint_seeds: OnceLock<TaintSeeds>,
}

impl Program {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let program: Program = serde_json::from_str(json)
            .map_err(|e| IrError::BuilderError(format!("invalid program: {}", e)))?;
        program.validate()?;
        Ok(program)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| IrError::BuilderError(format!("cannot serialize program: {}", e)))
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn contract(&self, id: ContractId) -> Option<&Contract> {
        self.contracts.get(id.0 as usize)
    }

    pub fn function(&self, id: FunctionId) -> Option<&Function> {
        self.functions.get(id.0 as usize)
    }

    pub fn contracts(&self) -> impl Iterator<Item = &Contract> {
        self.contracts.iter()
    }

    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.functions.iter()
    }

    pub fn contract_by_name(&self, name: &str) -> Option<&Contract> {
        self.contracts.iter().find(|c| c.name == name)
    }

    /// Looks a function up by `Contract::function` or, for free functions,
    /// by its bare name.
    pub fn function_by_name(&self, qualified_name: &str) -> Option<&Function> {
        match qualified_name.split_once("::") {
            Some((contract, name)) => {
                let contract = self.contract_by_name(contract)?;
                contract
                    .functions_and_modifiers()
                    .filter_map(|id| self.function(id))
                    .find(|f| f.name == name)
            }
            None => self
                .functions
                .iter()
                .find(|f| f.contract.is_none() && f.name == qualified_name),
        }
    }

    pub fn qualified_name(&self, function: &Function) -> String {
        match function.contract.and_then(|id| self.contract(id)) {
            Some(contract) => format!("{}::{}", contract.name, function.name),
            None => function.name.clone(),
        }
    }

    /// Source-level name of a value. SSA versions render as `name_N`.
    pub fn value_name(&self, value: &Value) -> String {
        let base = match value {
            Value::State(id, _) => self
                .contract(id.contract)
                .and_then(|c| c.state_variable(*id))
                .map(|var| var.name.clone()),
            Value::Local(id, _) => self
                .function(id.function)
                .and_then(|f| f.local(*id))
                .map(|local| local.name.clone()),
            Value::Param(id, _) => self
                .function(id.function)
                .and_then(|f| f.param(*id))
                .map(|param| param.name.clone()),
            Value::Temp(id, _) => Some(format!("TMP_{}", id.index)),
            Value::Reference(id, _) => Some(format!("REF_{}", id.index)),
            Value::Constant(c) => return c.to_string(),
            Value::Env(var) => return var.name().to_string(),
        };
        let Some(base) = base else {
            return value.to_string();
        };
        match value.version() {
            Some(version) => format!("{}_{}", base, version),
            None => base,
        }
    }

    /// Checks arena ids, ownership links, and every value and points-to
    /// link used by function bodies.
    pub fn validate(&self) -> Result<()> {
        for (index, contract) in self.contracts().enumerate() {
            if contract.id.0 as usize != index {
                return Err(IrError::BuilderError(format!(
                    "contract {} stored at index {} has id {}",
                    contract.name, index, contract.id
                )));
            }
            for id in contract.functions_and_modifiers() {
                let function = self
                    .function(id)
                    .ok_or_else(|| IrError::FunctionNotFound(id.to_string()))?;
                if function.contract != Some(contract.id) {
                    return Err(IrError::BuilderError(format!(
                        "function {} is listed by {} but owned elsewhere",
                        function.name, contract.name
                    )));
                }
            }
        }

        for (index, function) in self.functions.iter().enumerate() {
            if function.id.0 as usize != index {
                return Err(IrError::BuilderError(format!(
                    "function {} stored at index {} has id {}",
                    function.name, index, function.id
                )));
            }
            if let Some(id) = function.contract {
                if self.contract(id).is_none() {
                    return Err(IrError::ContractNotFound(id.to_string()));
                }
            }
            for op in function.operations() {
                for value in op.lvalue().into_iter().chain(op.reads()) {
                    self.check_value(value)?;
                }
                if let Operation::InternalCall { callee, .. } = op {
                    if self.function(*callee).is_none() {
                        return Err(IrError::FunctionNotFound(callee.to_string()));
                    }
                }
            }
            for value in &function.returns {
                self.check_value(value)?;
            }
            for (index, base) in &function.body.points_to {
                self.check_value(base)?;
                let reference = Value::Reference(
                    RefId {
                        function: function.id,
                        index: *index,
                    },
                    None,
                );
                function.alias_chain(&reference)?;
            }
        }
        Ok(())
    }

    fn check_value(&self, value: &Value) -> Result<()> {
        let known = match value {
            Value::State(id, _) => self
                .contract(id.contract)
                .and_then(|c| c.state_variable(*id))
                .is_some(),
            Value::Local(id, _) => self
                .function(id.function)
                .and_then(|f| f.local(*id))
                .is_some(),
            Value::Param(id, _) => self
                .function(id.function)
                .and_then(|f| f.param(*id))
                .is_some(),
            Value::Temp(id, _) => self
                .function(id.function)
                .map(|f| id.index < f.body.temporaries)
                .unwrap_or(false),
            Value::Reference(id, _) => self
                .function(id.function)
                .map(|f| id.index < f.body.references)
                .unwrap_or(false),
            Value::Constant(_) | Value::Env(_) => true,
        };
        if known {
            Ok(())
        } else {
            Err(IrError::BuilderError(format!("unknown value {}", value)))
        }
    }
}
