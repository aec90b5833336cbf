/*! May- and must-dependency between values, and taint from untrusted input.
 *
 * Each function gets a flow-insensitive direct dependency graph built from its SSA operations.
 * The graph is transitively closed, then projected onto source-level (canonical) identities.
 * Contracts union the closures of their functions and modifiers and close the union again, which
 * exposes flows that cross functions through shared state. Every scope keeps four closures: SSA
 * and canonical keying, each over all functions or over unprotected functions only. They are
 * computed on first use and cached on the function or contract.
 *
 * Must-dependency is a separate, intersection-based computation: the values a variable is
 * guaranteed to derive from whichever definition fires.
 */

pub mod canonical;
pub mod closure;
pub mod graph;
pub mod must;
pub mod query;
pub mod scope;

pub use canonical::canonicalize;
pub use closure::transitive_closure;
pub use graph::{build_direct_dependencies, DirectDependencies};
pub use must::{compute_must_dependencies, get_must_depends_on};
pub use query::{
    get_all_dependencies, get_all_dependencies_ssa, get_dependencies, get_dependencies_ssa,
    is_dependent, is_dependent_ssa, is_tainted, is_tainted_ssa,
};
pub use scope::{
    compute_contract, compute_function, contract_dependencies, dependencies,
    function_dependencies, taint_seeds, Context, Scope,
};

use crate::values::Value;
use indexmap::{IndexMap, IndexSet};

/// Written value -> values it depends on.
pub type DependencyMap<V = Value> = IndexMap<V, IndexSet<V>>;

/// How the keys and members of a closure identify variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keying {
    /// One node per SSA version.
    Ssa,
    /// SSA versions merged into their declared variable.
    Canonical,
}

/// The four closures owned by a function or contract scope.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScopeDependencies {
    pub ssa: DependencyMap,
    pub ssa_unprotected: DependencyMap,
    pub canonical: DependencyMap,
    pub canonical_unprotected: DependencyMap,
}

impl ScopeDependencies {
    pub fn closure(&self, keying: Keying, only_unprotected: bool) -> &DependencyMap {
        match (keying, only_unprotected) {
            (Keying::Ssa, false) => &self.ssa,
            (Keying::Ssa, true) => &self.ssa_unprotected,
            (Keying::Canonical, false) => &self.canonical,
            (Keying::Canonical, true) => &self.canonical_unprotected,
        }
    }
}

/// Parameters of every externally callable function, the untrusted inputs
/// of the program. Environment variables are added at query time from the
/// analysis configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaintSeeds {
    pub canonical: IndexSet<Value>,
    pub ssa: IndexSet<Value>,
}

impl TaintSeeds {
    pub fn get(&self, keying: Keying) -> &IndexSet<Value> {
        match keying {
            Keying::Ssa => &self.ssa,
            Keying::Canonical => &self.canonical,
        }
    }
}

/// Unions `from` into `into`, key by key.
pub(crate) fn merge_into<V>(into: &mut DependencyMap<V>, from: &DependencyMap<V>)
where
    V: Clone + Eq + std::hash::Hash,
{
    for (key, values) in from {
        into.entry(key.clone())
            .or_default()
            .extend(values.iter().cloned());
    }
}
