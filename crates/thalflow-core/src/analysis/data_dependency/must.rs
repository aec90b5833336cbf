use super::graph::definitions;
use super::DependencyMap;
use crate::function::Function;
use crate::program::Program;
use crate::values::{FunctionId, Value};
use indexmap::IndexSet;
use std::collections::HashSet;

/// Values `value` derives from whichever of its definitions fires.
///
/// Environment variables, constants and parameters of externally callable
/// functions are their own origin. Any other value combines the results of
/// its one-hop sources: the first source seeds the set, every later source
/// is intersected into it. State variables are resolved inside `context`;
/// other values inside the function that declares them. Values on a
/// definition cycle have no guaranteed origin.
pub fn compute_must_dependencies(
    program: &Program,
    value: &Value,
    context: FunctionId,
) -> IndexSet<Value> {
    let mut visiting = HashSet::new();
    must_dependencies(program, &value.canonical(), context, &mut visiting)
}

/// The single value `value` is guaranteed to come from, if there is exactly
/// one and it is not `value` itself.
pub fn get_must_depends_on(program: &Program, value: &Value, context: FunctionId) -> Option<Value> {
    let dependencies = compute_must_dependencies(program, value, context);
    if dependencies.len() != 1 || dependencies.contains(&value.canonical()) {
        return None;
    }
    dependencies.into_iter().next()
}

fn must_dependencies(
    program: &Program,
    value: &Value,
    context: FunctionId,
    visiting: &mut HashSet<(Value, FunctionId)>,
) -> IndexSet<Value> {
    if value.is_env() || value.is_constant() {
        return IndexSet::from([value.clone()]);
    }

    let function_id = value.owning_function().unwrap_or(context);
    let Some(function) = program.function(function_id) else {
        return IndexSet::new();
    };
    if function.is_externally_callable() && function.is_parameter_of(value) {
        return IndexSet::from([value.clone()]);
    }

    let key = (value.clone(), function_id);
    if !visiting.insert(key.clone()) {
        return IndexSet::new();
    }

    let mut result = IndexSet::new();
    if let Some(sources) = direct_sources(function).get(value) {
        for (i, source) in sources.iter().enumerate() {
            let origins = must_dependencies(program, source, function_id, visiting);
            if i == 0 {
                result.extend(origins);
            } else {
                result.retain(|v| origins.contains(v));
            }
        }
    }

    visiting.remove(&key);
    result
}

/// One-hop sources of every variable of `function`, keyed and valued by
/// canonical identity. Constants are kept: they are origins.
fn direct_sources(function: &Function) -> &DependencyMap {
    function.must_sources.get_or_init(|| {
        let mut sources = DependencyMap::new();
        for definition in definitions(function) {
            let reads: Vec<Value> = definition.reads.iter().map(|v| v.canonical()).collect();
            for target in &definition.targets {
                sources
                    .entry(target.canonical())
                    .or_default()
                    .extend(reads.iter().cloned());
            }
        }
        sources
    })
}
