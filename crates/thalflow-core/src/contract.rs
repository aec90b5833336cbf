use crate::analysis::data_dependency::ScopeDependencies;
use crate::types::Type;
use crate::values::{ContractId, FunctionId, StateVarId, Value};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contract {
    pub id: ContractId,
    pub name: String,
    pub state_variables: Vec<StateVariable>,
    pub functions: Vec<FunctionId>,
    pub modifiers: Vec<FunctionId>,
    #[serde(skip)]
    pub(crate) dependencies: OnceLock<ScopeDependencies>,
}

impl Contract {
    pub fn new(id: ContractId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            state_variables: Vec::new(),
            functions: Vec::new(),
            modifiers: Vec::new(),
            dependencies: OnceLock::new(),
        }
    }

    pub fn add_state_variable(&mut self, name: impl Into<String>, var_type: Type) -> StateVarId {
        let id = StateVarId {
            contract: self.id,
            index: self.state_variables.len() as u32,
        };
        self.state_variables.push(StateVariable {
            name: name.into(),
            var_type,
        });
        id
    }

    pub fn state_variable(&self, id: StateVarId) -> Option<&StateVariable> {
        if id.contract != self.id {
            return None;
        }
        self.state_variables.get(id.index as usize)
    }

    /// Declared state variables, without SSA versions.
    pub fn state_values(&self) -> Vec<Value> {
        (0..self.state_variables.len() as u32)
            .map(|index| {
                Value::State(
                    StateVarId {
                        contract: self.id,
                        index,
                    },
                    None,
                )
            })
            .collect()
    }

    /// Functions first, then modifiers.
    pub fn functions_and_modifiers(&self) -> impl Iterator<Item = FunctionId> + '_ {
        self.functions.iter().chain(self.modifiers.iter()).copied()
    }

    pub fn is_computed(&self) -> bool {
        self.dependencies.get().is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateVariable {
    pub name: String,
    pub var_type: Type,
}
