use super::{BlockBuilder, ProgramBuilder};
use crate::{
    block::BlockId,
    function::{DataLocation, Function, FunctionKind, Mutability, Parameter, Visibility},
    operations::Operation,
    types::Type,
    values::{ContractId, FunctionId, ParamId, RefId, Value},
    IrError, Result,
};

pub struct FunctionBuilder<'a> {
    builder: &'a mut ProgramBuilder,
    function: Function,
    errors: Vec<String>,
}

impl<'a> FunctionBuilder<'a> {
    pub(crate) fn new(
        name: &str,
        contract: Option<ContractId>,
        builder: &'a mut ProgramBuilder,
    ) -> Self {
        let id = FunctionId(builder.program().functions.len() as u32);
        let mut function = Function::new(id, name);
        function.contract = contract;
        if contract.is_none() {
            function.visibility = Visibility::Internal;
        }

        Self {
            builder,
            function,
            errors: Vec::new(),
        }
    }

    /// Id the function will have once built. Needed for recursive calls.
    pub fn id(&self) -> FunctionId {
        self.function.id
    }

    /// Declares a parameter and returns its declared (unversioned) value.
    pub fn param(&mut self, name: &str, ty: Type) -> Value {
        self.push_param(Parameter::new(name, ty))
    }

    pub fn param_in(&mut self, name: &str, ty: Type, location: DataLocation) -> Value {
        let mut param = Parameter::new(name, ty);
        param.location = location;
        self.push_param(param)
    }

    fn push_param(&mut self, param: Parameter) -> Value {
        let id = ParamId {
            function: self.function.id,
            index: self.function.params.len() as u32,
        };
        self.function.params.push(param);
        Value::Param(id, None)
    }

    pub fn local(&mut self, name: &str, ty: Type) -> Value {
        let location = if ty.is_reference() {
            DataLocation::Memory
        } else {
            DataLocation::Stack
        };
        self.function.declare_local(name, ty, location)
    }

    /// A local that only holds a pointer into storage.
    pub fn storage_pointer(&mut self, name: &str, ty: Type) -> Value {
        self.function.declare_local(name, ty, DataLocation::Storage)
    }

    pub fn temp(&mut self) -> Value {
        self.function.declare_temp()
    }

    pub fn reference(&mut self) -> Value {
        self.function.declare_reference()
    }

    pub fn visibility(&mut self, vis: Visibility) -> &mut Self {
        self.function.visibility = vis;
        self
    }

    pub fn mutability(&mut self, mut_: Mutability) -> &mut Self {
        self.function.mutability = mut_;
        self
    }

    pub fn kind(&mut self, kind: FunctionKind) -> &mut Self {
        self.function.kind = kind;
        self
    }

    pub fn modifier(&mut self, name: &str) -> &mut Self {
        self.function.modifiers.push(name.to_string());
        self
    }

    /// SSA values handed back to internal callers.
    pub fn returns(&mut self, values: Vec<Value>) -> &mut Self {
        self.function.returns = values;
        self
    }

    /// Overrides the derived access-control verdict.
    pub fn access_control(&mut self, protected: bool) -> &mut Self {
        self.function.access_control = Some(protected);
        self
    }

    pub fn create_block_id(&mut self) -> BlockId {
        self.function.body.create_block()
    }

    pub fn entry_block(&mut self) -> BlockBuilder<'_> {
        let block_id = self.function.body.entry_block;
        BlockBuilder::new(
            block_id,
            self.builder.program(),
            &mut self.function,
            &mut self.errors,
        )
    }

    pub fn block(&mut self) -> BlockBuilder<'_> {
        let block_id = self.function.body.create_block();
        BlockBuilder::new(
            block_id,
            self.builder.program(),
            &mut self.function,
            &mut self.errors,
        )
    }

    pub fn switch_to_block(&mut self, block_id: BlockId) -> Result<BlockBuilder<'_>> {
        if self.function.body.get_block(block_id).is_none() {
            return Err(IrError::BuilderError(format!(
                "Block {} does not exist in function {}",
                block_id, self.function.name
            )));
        }
        Ok(BlockBuilder::new(
            block_id,
            self.builder.program(),
            &mut self.function,
            &mut self.errors,
        ))
    }

    /// Registers the function with the program (and its contract) and
    /// returns its id.
    pub fn build(mut self) -> Result<FunctionId> {
        if !self.errors.is_empty() {
            return Err(IrError::BuilderError(format!(
                "errors in {}: {}",
                self.function.name,
                self.errors.join("; ")
            )));
        }

        for index in self.function.body.points_to.keys() {
            let reference = Value::Reference(
                RefId {
                    function: self.function.id,
                    index: *index,
                },
                None,
            );
            self.function.alias_chain(&reference)?;
        }

        let id = self.function.id;
        let own_returns = self.function.returns.clone();
        for block in self.function.body.blocks.values_mut() {
            for op in &mut block.operations {
                if let Operation::InternalCall {
                    callee, returns, ..
                } = op
                {
                    if *callee == id {
                        *returns = own_returns.clone();
                    }
                }
            }
        }

        let kind = self.function.kind;
        let contract = self.function.contract;
        let program = self.builder.program_mut();
        program.functions.push(self.function);
        if let Some(contract_id) = contract {
            let contract = program
                .contracts
                .get_mut(contract_id.0 as usize)
                .ok_or_else(|| IrError::ContractNotFound(contract_id.to_string()))?;
            if kind == FunctionKind::Modifier {
                contract.modifiers.push(id);
            } else {
                contract.functions.push(id);
            }
        }
        Ok(id)
    }
}
