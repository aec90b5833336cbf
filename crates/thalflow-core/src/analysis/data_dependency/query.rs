use super::scope::{dependencies, taint_seeds};
use super::{Context, DependencyMap, Keying};
use crate::program::Program;
use crate::values::Value;
use indexmap::IndexSet;

/// Whether `variable` may be influenced by `source` in `context`.
///
/// Constants never depend on anything and never taint anything. Otherwise a
/// value always depends on itself. Unknown values and contexts answer `false`.
pub fn is_dependent(
    program: &Program,
    variable: &Value,
    source: &Value,
    context: impl Into<Context>,
    only_unprotected: bool,
) -> bool {
    dependent(
        program,
        variable,
        source,
        context.into(),
        Keying::Canonical,
        only_unprotected,
    )
}

/// [`is_dependent`] over SSA versions.
pub fn is_dependent_ssa(
    program: &Program,
    variable: &Value,
    source: &Value,
    context: impl Into<Context>,
    only_unprotected: bool,
) -> bool {
    dependent(
        program,
        variable,
        source,
        context.into(),
        Keying::Ssa,
        only_unprotected,
    )
}

/// Whether `variable` may be influenced by untrusted input: a parameter of an
/// externally callable function or, unless `ignore_generic_taint`, one of the
/// configured environment variables.
pub fn is_tainted(
    program: &Program,
    variable: &Value,
    context: impl Into<Context>,
    only_unprotected: bool,
    ignore_generic_taint: bool,
) -> bool {
    tainted(
        program,
        variable,
        context.into(),
        Keying::Canonical,
        only_unprotected,
        ignore_generic_taint,
    )
}

/// [`is_tainted`] over SSA versions. Parameters seed taint at version 0.
pub fn is_tainted_ssa(
    program: &Program,
    variable: &Value,
    context: impl Into<Context>,
    only_unprotected: bool,
    ignore_generic_taint: bool,
) -> bool {
    tainted(
        program,
        variable,
        context.into(),
        Keying::Ssa,
        only_unprotected,
        ignore_generic_taint,
    )
}

/// Everything `variable` may depend on in `context`. Empty when unknown.
pub fn get_dependencies(
    program: &Program,
    variable: &Value,
    context: impl Into<Context>,
    only_unprotected: bool,
) -> IndexSet<Value> {
    closure(program, context.into(), Keying::Canonical, only_unprotected)
        .and_then(|map| map.get(variable).cloned())
        .unwrap_or_default()
}

pub fn get_dependencies_ssa(
    program: &Program,
    variable: &Value,
    context: impl Into<Context>,
    only_unprotected: bool,
) -> IndexSet<Value> {
    closure(program, context.into(), Keying::Ssa, only_unprotected)
        .and_then(|map| map.get(variable).cloned())
        .unwrap_or_default()
}

/// The whole canonical closure of `context`.
pub fn get_all_dependencies(
    program: &Program,
    context: impl Into<Context>,
    only_unprotected: bool,
) -> DependencyMap {
    closure(program, context.into(), Keying::Canonical, only_unprotected)
        .cloned()
        .unwrap_or_default()
}

pub fn get_all_dependencies_ssa(
    program: &Program,
    context: impl Into<Context>,
    only_unprotected: bool,
) -> DependencyMap {
    closure(program, context.into(), Keying::Ssa, only_unprotected)
        .cloned()
        .unwrap_or_default()
}

fn closure(
    program: &Program,
    context: Context,
    keying: Keying,
    only_unprotected: bool,
) -> Option<&DependencyMap> {
    dependencies(program, context).map(|deps| deps.closure(keying, only_unprotected))
}

fn dependent(
    program: &Program,
    variable: &Value,
    source: &Value,
    context: Context,
    keying: Keying,
    only_unprotected: bool,
) -> bool {
    if variable.is_constant() || source.is_constant() {
        return false;
    }
    if variable == source {
        return true;
    }
    closure(program, context, keying, only_unprotected)
        .and_then(|map| map.get(variable))
        .map(|deps| deps.contains(source))
        .unwrap_or(false)
}

fn tainted(
    program: &Program,
    variable: &Value,
    context: Context,
    keying: Keying,
    only_unprotected: bool,
    ignore_generic_taint: bool,
) -> bool {
    if variable.is_constant() {
        return false;
    }
    let seeds = taint_seeds(program).get(keying);
    let config = program.config();
    if seeds.contains(variable) || (!ignore_generic_taint && config.is_generic_taint(variable)) {
        return true;
    }

    let Some(deps) = closure(program, context, keying, only_unprotected)
        .and_then(|map| map.get(variable))
    else {
        return false;
    };
    deps.iter().any(|source| {
        seeds.contains(source) || (!ignore_generic_taint && config.is_generic_taint(source))
    })
}
