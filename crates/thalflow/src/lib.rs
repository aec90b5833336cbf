/*! Data-dependency and taint analysis for smart contract SSA IR.
 *
 * Single import for the whole workflow: build or load a program, ask which values may influence
 * which, check whether untrusted callers reach them, and print the answers as a report.
 */

pub use thalflow_core as core;
pub use thalflow_emit as emit;

pub use thalflow_core::{
    get_all_dependencies, get_all_dependencies_ssa, get_dependencies, get_dependencies_ssa,
    get_must_depends_on, is_dependent, is_dependent_ssa, is_tainted, is_tainted_ssa,
    AnalysisConfig, BlockId, Context, Contract, ContractId, DependencyMap, EnvVar, Function,
    FunctionId, IrError, Operation, Program, ProgramBuilder, Type, Value, Visibility,
};

pub use thalflow_emit::{DependencyEmitter, DependencyTable, EmitterConfig, OutputFormat};
