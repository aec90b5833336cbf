/*! Whole-program analyses over the SSA IR.
 *
 * Detectors mostly ask one kind of question: can this value be influenced by that one, and can an
 * untrusted caller reach it? The data-dependency engine answers both, per function and per contract.
 */

pub mod data_dependency;

pub use data_dependency::{
    get_all_dependencies, get_all_dependencies_ssa, get_dependencies, get_dependencies_ssa,
    get_must_depends_on, is_dependent, is_dependent_ssa, is_tainted, is_tainted_ssa, Context,
    DependencyMap, Keying, Scope, ScopeDependencies, TaintSeeds,
};
