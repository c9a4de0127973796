//! ADD / SUBTRACT / MULTIPLY / DIVIDE commands

use tally_plugin::prelude::*;

/// Two-operand arithmetic command; one type serves all four operations
pub struct Arithmetic {
    operation: Operation,
}

impl Arithmetic {
    pub fn new(operation: Operation) -> Self {
        Self { operation }
    }

    fn label(&self) -> &'static str {
        match self.operation {
            Operation::Add => "Add",
            Operation::Subtract => "Subtract",
            Operation::Multiply => "Multiply",
            Operation::Divide => "Divide",
        }
    }
}

impl Command for Arithmetic {
    fn meta(&self) -> CommandMeta {
        match self.operation {
            Operation::Add => CommandMeta { description: "Add two numbers", usage: "add <a> <b>" },
            Operation::Subtract => CommandMeta { description: "Subtract b from a", usage: "subtract <a> <b>" },
            Operation::Multiply => CommandMeta { description: "Multiply two numbers", usage: "multiply <a> <b>" },
            Operation::Divide => CommandMeta { description: "Divide a by b (b must not be zero)", usage: "divide <a> <b>" },
        }
    }

    fn execute(&self, args: &[&str], ctx: &mut CommandContext) -> Result<Option<Number>, CalcError> {
        if args.len() != 2 {
            return Err(CalcError::arg_count(self.label(), 2, args.len()));
        }

        let a = Number::from_str(args[0])?;
        let b = Number::from_str(args[1])?;
        if self.operation == Operation::Divide && b.is_zero() {
            return Err(CalcError::DivisionByZero);
        }

        let result = ctx.calculator_mut().perform_operation(a, b, self.operation)?;
        ctx.emit(format!("Result: {}", result));
        Ok(Some(result))
    }
}

pub fn add() -> Box<dyn Command> {
    Box::new(Arithmetic::new(Operation::Add))
}

pub fn subtract() -> Box<dyn Command> {
    Box::new(Arithmetic::new(Operation::Subtract))
}

pub fn multiply() -> Box<dyn Command> {
    Box::new(Arithmetic::new(Operation::Multiply))
}

pub fn divide() -> Box<dyn Command> {
    Box::new(Arithmetic::new(Operation::Divide))
}
