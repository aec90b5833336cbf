use super::{FunctionBuilder, ProgramBuilder};
use crate::{
    function::{FunctionKind, Visibility},
    types::Type,
    values::{ContractId, Value},
};

pub struct ContractBuilder<'a> {
    id: ContractId,
    builder: &'a mut ProgramBuilder,
}

impl<'a> ContractBuilder<'a> {
    pub(crate) fn new(id: ContractId, builder: &'a mut ProgramBuilder) -> Self {
        Self { id, builder }
    }

    pub fn id(&self) -> ContractId {
        self.id
    }

    /// Declares a state variable and returns its declared (unversioned) value.
    pub fn state_variable(&mut self, name: &str, ty: Type) -> Value {
        let contract = &mut self.builder.program_mut().contracts[self.id.0 as usize];
        Value::State(contract.add_state_variable(name, ty), None)
    }

    pub fn function(&mut self, name: &str) -> FunctionBuilder<'_> {
        FunctionBuilder::new(name, Some(self.id), self.builder)
    }

    pub fn modifier(&mut self, name: &str) -> FunctionBuilder<'_> {
        let mut modifier = FunctionBuilder::new(name, Some(self.id), self.builder);
        modifier
            .kind(FunctionKind::Modifier)
            .visibility(Visibility::Internal);
        modifier
    }

    pub fn constructor(&mut self) -> FunctionBuilder<'_> {
        let mut constructor = FunctionBuilder::new("constructor", Some(self.id), self.builder);
        constructor.kind(FunctionKind::Constructor);
        constructor
    }
}
