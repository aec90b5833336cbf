/*! Fluent API for constructing SSA programs.
 *
 * Hand-wiring the arena is tedious and easy to get wrong: ids have to line up with
 * their slots, every reference needs its referent recorded, and functions must be
 * registered with their contract. These builders do that bookkeeping and report
 * malformed input as `IrError` when the program is built.
 */

pub mod block_builder;
pub mod contract_builder;
pub mod function_builder;

pub use block_builder::BlockBuilder;
pub use contract_builder::ContractBuilder;
pub use function_builder::FunctionBuilder;

use crate::config::AnalysisConfig;
use crate::contract::Contract;
use crate::program::Program;
use crate::values::ContractId;
use crate::{IrError, Result};

pub struct ProgramBuilder {
    program: Program,
    errors: Vec<String>,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::with_config(AnalysisConfig::default())
    }

    pub fn with_config(config: AnalysisConfig) -> Self {
        Self {
            program: Program::new(config),
            errors: Vec::new(),
        }
    }

    /// Opens a new contract. Declaring two contracts with the same name is
    /// reported when the program is built.
    pub fn contract(&mut self, name: &str) -> ContractBuilder<'_> {
        if self.program.contract_by_name(name).is_some() {
            self.errors
                .push(format!("Contract {} already exists", name));
        }
        let id = ContractId(self.program.contracts.len() as u32);
        self.program.contracts.push(Contract::new(id, name));
        ContractBuilder::new(id, self)
    }

    /// Opens a free function, declared outside any contract.
    pub fn function(&mut self, name: &str) -> FunctionBuilder<'_> {
        FunctionBuilder::new(name, None, self)
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub(crate) fn program_mut(&mut self) -> &mut Program {
        &mut self.program
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn build(self) -> Result<Program> {
        if !self.errors.is_empty() {
            return Err(IrError::BuilderError(format!(
                "IR building errors: {}",
                self.errors.join("; ")
            )));
        }
        self.program.validate()?;
        Ok(self.program)
    }
}

impl Default for ProgramBuilder {
    fn default() -> Self {
        Self::new()
    }
}
