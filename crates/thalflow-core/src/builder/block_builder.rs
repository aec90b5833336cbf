use crate::{
    block::BlockId,
    function::Function,
    operations::{BinaryOp, BuiltinFunction, Operation, UnaryOp},
    program::Program,
    types::Type,
    values::{FunctionId, Value},
};

/// Appends operations to one block of the function under construction.
///
/// Malformed operations are recorded and reported by `FunctionBuilder::build`.
pub struct BlockBuilder<'a> {
    block_id: BlockId,
    program: &'a Program,
    function: &'a mut Function,
    errors: &'a mut Vec<String>,
}

impl<'a> BlockBuilder<'a> {
    pub(crate) fn new(
        block_id: BlockId,
        program: &'a Program,
        function: &'a mut Function,
        errors: &'a mut Vec<String>,
    ) -> Self {
        Self {
            block_id,
            program,
            function,
            errors,
        }
    }

    pub fn block_id(&self) -> BlockId {
        self.block_id
    }

    pub fn new_temp(&mut self) -> Value {
        self.function.declare_temp()
    }

    pub fn new_reference(&mut self) -> Value {
        self.function.declare_reference()
    }

    pub fn successor(&mut self, target: BlockId) -> &mut Self {
        if let Some(block) = self.function.body.get_block_mut(self.block_id) {
            block.add_successor(target);
        }
        self
    }

    /// Appends any operation. Alias operations record their referent.
    pub fn op(&mut self, op: Operation) -> &mut Self {
        if let Some(base) = op.points_to() {
            self.record_alias(op.lvalue(), base);
        }
        if let Some(block) = self.function.body.get_block_mut(self.block_id) {
            block.add_operation(op);
        }
        self
    }

    fn record_alias(&mut self, lvalue: Option<&Value>, base: &Value) {
        let Some(lvalue) = lvalue else {
            return;
        };
        let Some(id) = lvalue.as_reference() else {
            self.errors.push(format!(
                "alias operation must write a reference, got {}",
                lvalue
            ));
            return;
        };
        if id.function != self.function.id {
            self.errors.push(format!(
                "reference {} belongs to another function",
                lvalue
            ));
            return;
        }
        if base.canonical() == lvalue.canonical() {
            self.errors
                .push(format!("reference {} points to itself", lvalue));
            return;
        }
        match self.function.body.points_to.get(&id.index) {
            Some(existing) if existing != base => {
                self.errors.push(format!(
                    "reference {} already points to {}",
                    lvalue, existing
                ));
            }
            Some(_) => {}
            None => {
                self.function.body.points_to.insert(id.index, base.clone());
            }
        }
    }

    pub fn assign(&mut self, lvalue: Value, rvalue: Value) -> &mut Self {
        self.op(Operation::Assign { lvalue, rvalue })
    }

    pub fn binary(&mut self, lvalue: Value, op: BinaryOp, left: Value, right: Value) -> &mut Self {
        self.op(Operation::Binary {
            lvalue,
            op,
            left,
            right,
        })
    }

    pub fn add(&mut self, lvalue: Value, left: Value, right: Value) -> &mut Self {
        self.binary(lvalue, BinaryOp::Add, left, right)
    }

    pub fn sub(&mut self, lvalue: Value, left: Value, right: Value) -> &mut Self {
        self.binary(lvalue, BinaryOp::Sub, left, right)
    }

    pub fn unary(&mut self, lvalue: Value, op: UnaryOp, operand: Value) -> &mut Self {
        self.op(Operation::Unary {
            lvalue,
            op,
            operand,
        })
    }

    /// `reference = base[index]`
    pub fn index(&mut self, reference: Value, base: Value, index: Value) -> &mut Self {
        self.op(Operation::Index {
            lvalue: reference,
            base,
            index,
        })
    }

    /// `reference = base.field`
    pub fn member(&mut self, reference: Value, base: Value, field: &str) -> &mut Self {
        self.op(Operation::Member {
            lvalue: reference,
            base,
            field: field.to_string(),
        })
    }

    pub fn length(&mut self, reference: Value, base: Value) -> &mut Self {
        self.op(Operation::Length {
            lvalue: reference,
            base,
        })
    }

    pub fn balance(&mut self, reference: Value, address: Value) -> &mut Self {
        self.op(Operation::Balance {
            lvalue: reference,
            address,
        })
    }

    pub fn phi(&mut self, lvalue: Value, sources: Vec<Value>) -> &mut Self {
        self.op(Operation::Phi { lvalue, sources })
    }

    /// Calls a function of the program. The callee's SSA return values are
    /// looked up here, so the callee must be built first. A call to the
    /// function under construction reads whatever `returns` holds when that
    /// function is built.
    pub fn internal_call(
        &mut self,
        lvalue: Option<Value>,
        callee: FunctionId,
        args: Vec<Value>,
    ) -> &mut Self {
        let returns = if callee == self.function.id {
            Some(self.function.returns.clone())
        } else {
            self.program.function(callee).map(|f| f.returns.clone())
        };
        match returns {
            Some(returns) => self.op(Operation::InternalCall {
                lvalue,
                callee,
                args,
                returns,
            }),
            None => {
                self.errors
                    .push(format!("call to unknown function {}", callee));
                self
            }
        }
    }

    pub fn external_call(
        &mut self,
        lvalue: Option<Value>,
        destination: Value,
        function: &str,
        args: Vec<Value>,
        value: Option<Value>,
    ) -> &mut Self {
        self.op(Operation::ExternalCall {
            lvalue,
            destination,
            function: function.to_string(),
            args,
            value,
        })
    }

    pub fn builtin(
        &mut self,
        lvalue: Option<Value>,
        builtin: BuiltinFunction,
        args: Vec<Value>,
    ) -> &mut Self {
        self.op(Operation::BuiltinCall {
            lvalue,
            builtin,
            args,
        })
    }

    pub fn require(&mut self, condition: Value) -> &mut Self {
        self.builtin(None, BuiltinFunction::Require, vec![condition])
    }

    pub fn new_contract(
        &mut self,
        lvalue: Value,
        contract: &str,
        args: Vec<Value>,
        value: Option<Value>,
    ) -> &mut Self {
        self.op(Operation::NewContract {
            lvalue,
            contract: contract.to_string(),
            args,
            value,
        })
    }

    pub fn convert(&mut self, lvalue: Value, value: Value, to: Type) -> &mut Self {
        self.op(Operation::Convert { lvalue, value, to })
    }

    pub fn unpack(&mut self, lvalue: Value, tuple: Value, index: u32) -> &mut Self {
        self.op(Operation::Unpack {
            lvalue,
            tuple,
            index,
        })
    }

    pub fn init_array(&mut self, lvalue: Value, elements: Vec<Value>) -> &mut Self {
        self.op(Operation::InitArray { lvalue, elements })
    }

    pub fn delete(&mut self, lvalue: Value, variable: Value) -> &mut Self {
        self.op(Operation::Delete { lvalue, variable })
    }

    pub fn condition(&mut self, value: Value) -> &mut Self {
        self.op(Operation::Condition { value })
    }

    pub fn ret(&mut self, values: Vec<Value>) -> &mut Self {
        self.op(Operation::Return { values })
    }

    pub fn transfer(&mut self, destination: Value, amount: Value) -> &mut Self {
        self.op(Operation::Transfer {
            destination,
            amount,
        })
    }

    pub fn emit(&mut self, event: &str, args: Vec<Value>) -> &mut Self {
        self.op(Operation::Emit {
            event: event.to_string(),
            args,
        })
    }
}
