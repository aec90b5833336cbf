use super::DependencyMap;
use crate::function::Function;
use crate::values::Value;

/// One-hop dependencies of a function, before closure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectDependencies {
    pub all: DependencyMap,
    /// Empty when the function is access controlled.
    pub unprotected: DependencyMap,
}

/// A definition site: the values written (the lvalue, then every referent
/// along its points-to chain) and the values read.
pub(crate) struct Definition<'f> {
    pub targets: Vec<Value>,
    pub reads: Vec<&'f Value>,
}

/// Every definition of `function`. Storage pointers are never targets,
/// whether written directly or reached through a points-to chain.
///
/// # Panics
///
/// Panics when a reference points to itself or the points-to links form a
/// cycle. Builders and `Program::validate` reject such programs.
pub(crate) fn definitions(function: &Function) -> impl Iterator<Item = Definition<'_>> {
    function.operations().filter_map(move |op| {
        let lvalue = op.lvalue()?;
        if function.is_storage_pointer(lvalue) {
            return None;
        }
        let chain = function
            .alias_chain(lvalue)
            .unwrap_or_else(|e| panic!("malformed points-to information: {}", e));
        let mut targets = Vec::with_capacity(chain.len() + 1);
        targets.push(lvalue.clone());
        targets.extend(
            chain
                .into_iter()
                .filter(|referent| !function.is_storage_pointer(referent)),
        );
        Some(Definition {
            targets,
            reads: op.reads(),
        })
    })
}

/// Builds the direct dependency graph of `function`. Control flow is
/// ignored: every operation of every block contributes its edges.
pub fn build_direct_dependencies(function: &Function, protected: bool) -> DirectDependencies {
    let mut direct = DirectDependencies::default();

    for definition in definitions(function) {
        let reads: Vec<&Value> = definition
            .reads
            .into_iter()
            .filter(|v| !v.is_constant())
            .collect();

        for target in &definition.targets {
            let entry = direct.all.entry(target.clone()).or_default();
            entry.extend(reads.iter().map(|v| (*v).clone()));

            if !protected {
                let entry = direct.unprotected.entry(target.clone()).or_default();
                entry.extend(reads.iter().map(|v| (*v).clone()));
            }
        }
    }

    direct
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ProgramBuilder;
    use crate::types::Type;
    use indexmap::IndexSet;
    use pretty_assertions::assert_eq;

    fn set(values: &[&Value]) -> IndexSet<Value> {
        values.iter().map(|v| (*v).clone()).collect()
    }

    #[test]
    fn test_constants_are_not_edges() {
        let mut builder = ProgramBuilder::new();
        let mut c = builder.contract("C");
        let total = c.state_variable("total", Type::Uint(256));
        let mut f = c.function("f");
        let x = f.param("x", Type::Uint(256));
        let tmp = f.temp();
        f.entry_block()
            .add(tmp.with_version(0), x.with_version(0), Value::uint(1))
            .assign(total.with_version(1), tmp.with_version(0));
        let id = f.build().unwrap();
        let program = builder.build().unwrap();
        let function = program.function(id).unwrap();

        let direct = build_direct_dependencies(function, false);
        assert_eq!(direct.all[&tmp.with_version(0)], set(&[&x.with_version(0)]));
        assert_eq!(
            direct.all[&total.with_version(1)],
            set(&[&tmp.with_version(0)])
        );
        assert_eq!(direct.all, direct.unprotected);
    }

    #[test]
    fn test_protected_function_has_no_unprotected_edges() {
        let mut builder = ProgramBuilder::new();
        let mut c = builder.contract("C");
        let owner = c.state_variable("owner", Type::Address);
        let mut f = c.function("setOwner");
        let who = f.param("who", Type::Address);
        f.modifier("onlyOwner");
        f.entry_block()
            .assign(owner.with_version(1), who.with_version(0));
        let id = f.build().unwrap();
        let program = builder.build().unwrap();
        let function = program.function(id).unwrap();

        let direct = build_direct_dependencies(function, function.is_protected(program.config()));
        assert_eq!(direct.all.len(), 1);
        assert!(direct.unprotected.is_empty());
    }

    #[test]
    fn test_write_through_reference_reaches_referent() {
        let mut builder = ProgramBuilder::new();
        let mut c = builder.contract("C");
        let balances = c.state_variable(
            "balances",
            Type::Mapping(Box::new(Type::Address), Box::new(Type::Uint(256))),
        );
        let mut f = c.function("deposit");
        let key = f.param("key", Type::Address);
        let amount = f.param("amount", Type::Uint(256));
        let slot = f.reference();
        f.entry_block()
            .index(slot.clone(), balances.with_version(1), key.with_version(0))
            .assign(slot.clone(), amount.with_version(0));
        let id = f.build().unwrap();
        let program = builder.build().unwrap();
        let function = program.function(id).unwrap();

        let direct = build_direct_dependencies(function, false);
        assert_eq!(
            direct.all[&slot],
            set(&[
                &balances.with_version(1),
                &key.with_version(0),
                &amount.with_version(0)
            ])
        );
        assert!(direct.all[&balances.with_version(1)].contains(&amount.with_version(0)));
    }

    #[test]
    fn test_nested_references_reach_the_root() {
        let mut builder = ProgramBuilder::new();
        let mut c = builder.contract("C");
        let grid = c.state_variable(
            "grid",
            Type::Mapping(
                Box::new(Type::Uint(256)),
                Box::new(Type::Mapping(
                    Box::new(Type::Uint(256)),
                    Box::new(Type::Uint(256)),
                )),
            ),
        );
        let mut f = c.function("set");
        let value = f.param("value", Type::Uint(256));
        let row = f.reference();
        let cell = f.reference();
        f.entry_block()
            .index(row.clone(), grid.with_version(0), Value::uint(1))
            .index(cell.clone(), row.clone(), Value::uint(2))
            .assign(cell.clone(), value.with_version(0));
        let id = f.build().unwrap();
        let program = builder.build().unwrap();
        let function = program.function(id).unwrap();

        let direct = build_direct_dependencies(function, false);
        assert!(direct.all[&row].contains(&value.with_version(0)));
        assert!(direct.all[&grid.with_version(0)].contains(&value.with_version(0)));
    }

    #[test]
    fn test_storage_pointer_writes_are_skipped() {
        let mut builder = ProgramBuilder::new();
        let mut c = builder.contract("C");
        let data = c.state_variable("data", Type::Struct("Data".to_string()));
        let mut f = c.function("f");
        let ptr = f.storage_pointer("ptr", Type::Struct("Data".to_string()));
        f.entry_block().assign(ptr.with_version(1), data.with_version(0));
        let id = f.build().unwrap();
        let program = builder.build().unwrap();

        let direct = build_direct_dependencies(program.function(id).unwrap(), false);
        assert!(direct.all.is_empty());
    }

    #[test]
    fn test_operations_without_lvalue_add_nothing() {
        let mut builder = ProgramBuilder::new();
        let mut f = builder.function("check");
        let flag = f.param("flag", Type::Bool);
        f.entry_block()
            .require(flag.with_version(0))
            .ret(vec![flag.with_version(0)]);
        let id = f.build().unwrap();
        let program = builder.build().unwrap();

        let direct = build_direct_dependencies(program.function(id).unwrap(), false);
        assert!(direct.all.is_empty());
    }

    #[test]
    fn test_rebuilding_is_idempotent() {
        let mut builder = ProgramBuilder::new();
        let mut f = builder.function("f");
        let a = f.param("a", Type::Uint(256));
        let b = f.local("b", Type::Uint(256));
        f.entry_block()
            .assign(b.with_version(1), a.with_version(0))
            .assign(b.with_version(1), a.with_version(0));
        let id = f.build().unwrap();
        let program = builder.build().unwrap();
        let function = program.function(id).unwrap();

        let first = build_direct_dependencies(function, false);
        let second = build_direct_dependencies(function, false);
        assert_eq!(first, second);
        assert_eq!(first.all[&b.with_version(1)].len(), 1);
    }

    #[test]
    #[should_panic(expected = "points to itself")]
    fn test_self_pointing_reference_panics() {
        let mut builder = ProgramBuilder::new();
        let mut f = builder.function("f");
        let r = f.reference();
        f.entry_block().assign(r.clone(), Value::uint(0));
        let id = f.build().unwrap();
        let mut program = builder.build().unwrap();
        let function = &mut program.functions[id.0 as usize];
        let index = r.as_reference().unwrap().index;
        function.body.points_to.insert(index, r.clone());

        build_direct_dependencies(function, false);
    }
}
