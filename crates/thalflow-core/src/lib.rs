/*! SSA IR model and data-dependency analysis for smart contracts.
 *
 * Detectors keep asking whether one value can influence another and whether an untrusted
 * caller can reach it. This crate provides the IR those questions are asked about (values,
 * operations, functions, contracts and a program arena), fluent builders to construct it, and
 * the dependency engine that answers them.
 */

pub mod analysis;
pub mod block;
pub mod builder;
pub mod config;
pub mod contract;
pub mod function;
pub mod operations;
pub mod program;
pub mod types;
pub mod values;

pub use analysis::{
    get_all_dependencies, get_all_dependencies_ssa, get_dependencies, get_dependencies_ssa,
    get_must_depends_on, is_dependent, is_dependent_ssa, is_tainted, is_tainted_ssa, Context,
    DependencyMap, Keying, Scope, ScopeDependencies, TaintSeeds,
};
pub use block::{BasicBlock, BlockId};
pub use builder::{BlockBuilder, ContractBuilder, FunctionBuilder, ProgramBuilder};
pub use config::AnalysisConfig;
pub use contract::{Contract, StateVariable};
pub use function::{
    DataLocation, Function, FunctionBody, FunctionKind, LocalVariable, Mutability, Parameter,
    Visibility,
};
pub use operations::{BinaryOp, BuiltinFunction, Operation, UnaryOp};
pub use program::Program;
pub use types::Type;
pub use values::{
    Constant, ContractId, EnvVar, FunctionId, LocalId, ParamId, RefId, StateVarId, TempId, Value,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IrError {
    #[error("Type error: {0}")]
    TypeError(String),
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    #[error("Builder error: {0}")]
    BuilderError(String),
    #[error("Contract not found: {0}")]
    ContractNotFound(String),
    #[error("Function not found: {0}")]
    FunctionNotFound(String),
    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, IrError>;

#[cfg(test)]
mod tests;
