use super::{
    build_direct_dependencies, canonicalize, merge_into, transitive_closure, DependencyMap,
    ScopeDependencies, TaintSeeds,
};
use crate::block::BlockId;
use crate::contract::Contract;
use crate::function::Function;
use crate::program::Program;
use crate::values::{ContractId, FunctionId};
use tracing::debug;

/// A scope that owns dependency closures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Function(FunctionId),
    Contract(ContractId),
}

/// Where a query is asked from. Normalized to a [`Scope`] before any lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    Function(FunctionId),
    Contract(ContractId),
    /// A single block of a function.
    Node(FunctionId, BlockId),
}

impl Context {
    /// A node answers with its function's contract, or with the function
    /// itself when it is a free function.
    pub fn normalize(self, program: &Program) -> Option<Scope> {
        match self {
            Context::Function(id) => Some(Scope::Function(id)),
            Context::Contract(id) => Some(Scope::Contract(id)),
            Context::Node(id, _) => {
                let function = program.function(id)?;
                Some(match function.contract {
                    Some(contract) => Scope::Contract(contract),
                    None => Scope::Function(id),
                })
            }
        }
    }
}

impl From<FunctionId> for Context {
    fn from(id: FunctionId) -> Self {
        Context::Function(id)
    }
}

impl From<ContractId> for Context {
    fn from(id: ContractId) -> Self {
        Context::Contract(id)
    }
}

impl From<Scope> for Context {
    fn from(scope: Scope) -> Self {
        match scope {
            Scope::Function(id) => Context::Function(id),
            Scope::Contract(id) => Context::Contract(id),
        }
    }
}

impl From<&Function> for Context {
    fn from(function: &Function) -> Self {
        Context::Function(function.id)
    }
}

impl From<&Contract> for Context {
    fn from(contract: &Contract) -> Self {
        Context::Contract(contract.id)
    }
}

/// Direct graph, closure and canonical projection of one function.
pub fn compute_function(program: &Program, function: &Function) -> ScopeDependencies {
    let protected = function.is_protected(program.config());
    let direct = build_direct_dependencies(function, protected);

    let ssa = transitive_closure(&direct.all);
    let ssa_unprotected = transitive_closure(&direct.unprotected);
    let canonical = canonicalize(&ssa);
    let canonical_unprotected = canonicalize(&ssa_unprotected);

    debug!(
        function = %program.qualified_name(function),
        protected,
        keys = ssa.len(),
        "computed function dependencies"
    );

    ScopeDependencies {
        ssa,
        ssa_unprotected,
        canonical,
        canonical_unprotected,
    }
}

/// Union of the closures of every function and modifier of `contract`,
/// closed again.
pub fn compute_contract(program: &Program, contract: &Contract) -> ScopeDependencies {
    let mut ssa = DependencyMap::new();
    let mut ssa_unprotected = DependencyMap::new();
    let mut canonical = DependencyMap::new();
    let mut canonical_unprotected = DependencyMap::new();

    for id in contract.functions_and_modifiers() {
        let Some(deps) = function_dependencies(program, id) else {
            continue;
        };
        merge_into(&mut ssa, &deps.ssa);
        merge_into(&mut ssa_unprotected, &deps.ssa_unprotected);
        merge_into(&mut canonical, &deps.canonical);
        merge_into(&mut canonical_unprotected, &deps.canonical_unprotected);
    }

    let deps = ScopeDependencies {
        ssa: transitive_closure(&ssa),
        ssa_unprotected: transitive_closure(&ssa_unprotected),
        canonical: transitive_closure(&canonical),
        canonical_unprotected: transitive_closure(&canonical_unprotected),
    };

    debug!(
        contract = %contract.name,
        functions = contract.functions.len(),
        modifiers = contract.modifiers.len(),
        keys = deps.canonical.len(),
        "computed contract dependencies"
    );

    deps
}

pub fn function_dependencies(program: &Program, id: FunctionId) -> Option<&ScopeDependencies> {
    let function = program.function(id)?;
    Some(
        function
            .dependencies
            .get_or_init(|| compute_function(program, function)),
    )
}

pub fn contract_dependencies(program: &Program, id: ContractId) -> Option<&ScopeDependencies> {
    let contract = program.contract(id)?;
    Some(
        contract
            .dependencies
            .get_or_init(|| compute_contract(program, contract)),
    )
}

/// Closures of the scope `context` normalizes to, computed on first use.
/// `None` when the context names nothing in `program`.
pub fn dependencies(program: &Program, context: impl Into<Context>) -> Option<&ScopeDependencies> {
    match context.into().normalize(program)? {
        Scope::Function(id) => function_dependencies(program, id),
        Scope::Contract(id) => contract_dependencies(program, id),
    }
}

/// Parameters of every externally callable function, in SSA and canonical
/// form. Computed once per program.
pub fn taint_seeds(program: &Program) -> &TaintSeeds {
    program.taint_seeds.get_or_init(|| {
        let mut seeds = TaintSeeds::default();
        for function in program.functions().filter(|f| f.is_externally_callable()) {
            seeds.canonical.extend(function.parameters());
            seeds.ssa.extend(function.parameters_ssa());
        }
        debug!(seeds = seeds.canonical.len(), "collected taint seeds");
        seeds
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ProgramBuilder;
    use crate::function::Visibility;
    use crate::types::Type;
    use crate::values::Value;

    #[test]
    fn test_node_context_normalizes_to_contract() {
        let mut builder = ProgramBuilder::new();
        let mut c = builder.contract("C");
        let f = c.function("f").build().unwrap();
        let free = builder.function("helper").build().unwrap();
        let program = builder.build().unwrap();

        assert_eq!(
            Context::Node(f, BlockId(0)).normalize(&program),
            Some(Scope::Contract(ContractId(0)))
        );
        assert_eq!(
            Context::Node(free, BlockId(0)).normalize(&program),
            Some(Scope::Function(free))
        );
        assert_eq!(
            Context::Node(FunctionId(42), BlockId(0)).normalize(&program),
            None
        );
    }

    #[test]
    fn test_scopes_are_memoized() {
        let mut builder = ProgramBuilder::new();
        let mut c = builder.contract("C");
        let x = c.state_variable("x", Type::Uint(256));
        let mut f = c.function("f");
        let a = f.param("a", Type::Uint(256));
        f.entry_block().assign(x.with_version(1), a.with_version(0));
        let f = f.build().unwrap();
        let program = builder.build().unwrap();

        assert!(!program.function(f).unwrap().is_computed());
        let first = dependencies(&program, ContractId(0)).unwrap() as *const _;
        assert!(program.function(f).unwrap().is_computed());
        assert!(program.contract(ContractId(0)).unwrap().is_computed());
        let second = dependencies(&program, ContractId(0)).unwrap() as *const _;
        assert_eq!(first, second);
    }

    #[test]
    fn test_contract_closure_crosses_functions() {
        let mut builder = ProgramBuilder::new();
        let mut c = builder.contract("C");
        let shared = c.state_variable("shared", Type::Uint(256));
        let out = c.state_variable("out", Type::Uint(256));

        let mut set = c.function("set");
        let input = set.param("input", Type::Uint(256));
        set.entry_block()
            .assign(shared.with_version(1), input.with_version(0));
        set.build().unwrap();

        let mut copy = c.function("copy");
        copy.entry_block()
            .assign(out.with_version(1), shared.with_version(0));
        let copy = copy.build().unwrap();
        let program = builder.build().unwrap();

        let function = function_dependencies(&program, copy).unwrap();
        assert!(!function.canonical[&out].contains(&input));

        let contract = contract_dependencies(&program, ContractId(0)).unwrap();
        assert!(contract.canonical[&out].contains(&input));
    }

    #[test]
    fn test_taint_seeds_cover_externally_callable_parameters() {
        let mut builder = ProgramBuilder::new();
        let mut c = builder.contract("C");

        let mut public = c.function("deposit");
        let amount = public.param("amount", Type::Uint(256));
        public.build().unwrap();

        let mut internal = c.function("_credit");
        let credited = internal.param("credited", Type::Uint(256));
        internal.visibility(Visibility::Internal);
        internal.build().unwrap();

        let mut modifier = c.modifier("onlyOwner");
        let who = modifier.param("who", Type::Address);
        modifier.build().unwrap();
        let program = builder.build().unwrap();

        let seeds = taint_seeds(&program);
        assert!(seeds.canonical.contains(&amount));
        assert!(seeds.ssa.contains(&amount.with_version(0)));
        assert!(!seeds.canonical.contains(&credited));
        assert!(!seeds.canonical.contains(&who));
        assert!(!seeds.canonical.contains(&Value::uint(0)));
    }
}
