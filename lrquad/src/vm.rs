use std::collections::HashMap;

use crate::error::RuntimeError;
use crate::quad::{Op, Operand, Quadruple};
use crate::symbol_table::{DeclaredType, SymbolTable};
use crate::translate::PRINT;
use crate::value::Value;

static UNDEFINED: Value = Value::Undefined;

/// Largest element count an array may grow to by assignment.
pub const MAX_ARRAY_LEN: usize = 1 << 24;

/// Path to an array element: the variable and one index per dimension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementRef {
    pub symbol: String,
    pub path: Vec<usize>,
}

impl ElementRef {
    fn describe(&self) -> String {
        let indices: String = self.path.iter().map(|idx| format!("[{}]", idx)).collect();
        format!("{}{}", self.symbol, indices)
    }
}

/// Entry of the evaluation stack
#[derive(Debug, Clone, PartialEq)]
enum Slot {
    Value(Value),
    Element(ElementRef),
}

/// Stack machine executing a quadruple program against a symbol table
///
/// Temporaries live on the evaluation stack: an instruction with a temporary result pushes
/// it and an instruction reading a temporary pops it. Operands are resolved right to left
/// (result, then `arg2`, then `arg1`), which matches the order in which the translator
/// pushes them.
pub struct VirtualMachine<'p> {
    program: &'p [Quadruple],
    symbols: &'p mut SymbolTable,
    labels: HashMap<usize, usize>,
    stack: Vec<Slot>,
    params: Vec<Value>,
    output: Vec<String>,
    pc: usize,
}

impl<'p> VirtualMachine<'p> {
    pub fn new(program: &'p [Quadruple], symbols: &'p mut SymbolTable) -> Self {
        let mut labels = HashMap::new();
        for (idx, quad) in program.iter().enumerate() {
            if let (Op::Label, Some(Operand::Label(label))) = (quad.op, &quad.result) {
                labels.entry(*label).or_insert(idx);
            }
        }

        VirtualMachine {
            program,
            symbols,
            labels,
            stack: Vec::new(),
            params: Vec::new(),
            output: Vec::new(),
            pc: 0,
        }
    }

    /// Execute the program until the program counter runs off its end.
    pub fn run(&mut self) -> Result<(), RuntimeError> {
        let program = self.program;
        while let Some(quad) = program.get(self.pc) {
            lrquad_trace!("{:>4}: {}", self.pc, quad);
            self.execute(quad)?;
            self.pc += 1;
        }
        Ok(())
    }

    /// Lines written by `print`.
    pub fn output(&self) -> &[String] {
        &self.output
    }

    pub fn into_output(self) -> Vec<String> {
        self.output
    }

    fn execute(&mut self, quad: &Quadruple) -> Result<(), RuntimeError> {
        match quad.op {
            Op::Assign => {
                let target = self.target(quad.result.as_ref())?;
                let value = self.operand(quad.op, quad.arg1.as_ref())?;
                self.assign(target, value)
            }
            Op::Add | Op::Sub | Op::Mul | Op::Div | Op::Mod if quad.arg2.is_some() => {
                let rhs = self.number(quad.op, quad.arg2.as_ref())?;
                let lhs = self.number(quad.op, quad.arg1.as_ref())?;
                let value = match quad.op {
                    Op::Add => lhs + rhs,
                    Op::Sub => lhs - rhs,
                    Op::Mul => lhs * rhs,
                    Op::Div => lhs / rhs,
                    _ => lhs % rhs,
                };
                self.push_result(quad, Value::Number(value))
            }
            Op::Sub => {
                let value = self.number(quad.op, quad.arg1.as_ref())?;
                self.push_result(quad, Value::Number(-value))
            }
            Op::Add | Op::Mul | Op::Div | Op::Mod => {
                Err(RuntimeError::MissingOperand(quad.op.as_str()))
            }
            Op::Lt | Op::Le | Op::Gt | Op::Ge => {
                let rhs = self.number(quad.op, quad.arg2.as_ref())?;
                let lhs = self.number(quad.op, quad.arg1.as_ref())?;
                let value = match quad.op {
                    Op::Lt => lhs < rhs,
                    Op::Le => lhs <= rhs,
                    Op::Gt => lhs > rhs,
                    _ => lhs >= rhs,
                };
                self.push_result(quad, Value::Bool(value))
            }
            Op::Eq | Op::Ne => {
                let rhs = self.operand(quad.op, quad.arg2.as_ref())?;
                let lhs = self.operand(quad.op, quad.arg1.as_ref())?;
                let equal = lhs == rhs;
                self.push_result(quad, Value::Bool(equal == (quad.op == Op::Eq)))
            }
            Op::And | Op::Or => {
                let rhs = self.truth(quad.op, quad.arg2.as_ref())?;
                let lhs = self.truth(quad.op, quad.arg1.as_ref())?;
                let value = if quad.op == Op::And { lhs && rhs } else { lhs || rhs };
                self.push_result(quad, Value::Bool(value))
            }
            Op::Not => {
                let value = self.truth(quad.op, quad.arg1.as_ref())?;
                self.push_result(quad, Value::Bool(!value))
            }
            Op::Index => {
                let index = self.index(quad.arg2.as_ref())?;
                let element = match quad.arg1.as_ref() {
                    Some(Operand::Name(name)) => {
                        // Undeclared names are not arrays either
                        match self.symbols.get(name) {
                            Some(entry) if entry.declared.is_array() => {}
                            _ => return Err(RuntimeError::NotAnArray(name.clone())),
                        }
                        ElementRef {
                            symbol: name.clone(),
                            path: vec![index],
                        }
                    }
                    Some(Operand::Temp(_)) => match self.pop()? {
                        Slot::Element(mut element) => {
                            element.path.push(index);
                            element
                        }
                        Slot::Value(value) => {
                            return Err(RuntimeError::NotAnArray(value.to_string()))
                        }
                    },
                    Some(other) => return Err(RuntimeError::InvalidOperand(other.to_string())),
                    None => return Err(RuntimeError::MissingOperand(quad.op.as_str())),
                };
                self.stack.push(Slot::Element(element));
                Ok(())
            }
            Op::Label => Ok(()),
            Op::Jmp => self.jump(quad.result.as_ref()),
            Op::JFalse | Op::JTrue => {
                let condition = self.truth(quad.op, quad.arg1.as_ref())?;
                if condition == (quad.op == Op::JTrue) {
                    self.jump(quad.result.as_ref())
                } else {
                    Ok(())
                }
            }
            Op::Param => {
                let value = self.operand(quad.op, quad.arg1.as_ref())?;
                self.params.push(value);
                Ok(())
            }
            Op::Call => self.call(quad),
            Op::Fetch => Err(RuntimeError::UnknownInstruction(quad.op.to_string())),
        }
    }

    fn push_result(&mut self, quad: &Quadruple, value: Value) -> Result<(), RuntimeError> {
        match &quad.result {
            Some(Operand::Temp(_)) => {
                self.stack.push(Slot::Value(value));
                Ok(())
            }
            Some(Operand::Name(name)) => {
                let target = Slot::Element(ElementRef {
                    symbol: name.clone(),
                    path: Vec::new(),
                });
                self.assign(target, value)
            }
            Some(other) => Err(RuntimeError::InvalidOperand(other.to_string())),
            None => Err(RuntimeError::MissingOperand(quad.op.as_str())),
        }
    }

    fn pop(&mut self) -> Result<Slot, RuntimeError> {
        self.stack.pop().ok_or(RuntimeError::StackUnderflow)
    }

    /// Resolve an operand to a value.
    fn operand(&mut self, op: Op, operand: Option<&Operand>) -> Result<Value, RuntimeError> {
        match operand {
            Some(Operand::Temp(_)) => match self.pop()? {
                Slot::Value(value) => Ok(value),
                Slot::Element(element) => self.load(&element),
            },
            Some(Operand::Const(literal)) => Value::from_literal(literal)
                .ok_or_else(|| RuntimeError::InvalidConstant(literal.clone())),
            Some(Operand::Name(name)) => {
                let entry = self
                    .symbols
                    .get(name)
                    .ok_or_else(|| RuntimeError::UndeclaredIdentifier(name.clone()))?;
                match entry.value {
                    Value::Undefined => Err(RuntimeError::UndefinedValue(name.clone())),
                    ref value => Ok(value.clone()),
                }
            }
            Some(Operand::Label(label)) => {
                Err(RuntimeError::InvalidOperand(format!("L{}", label)))
            }
            None => Err(RuntimeError::MissingOperand(op.as_str())),
        }
    }

    fn number(&mut self, op: Op, operand: Option<&Operand>) -> Result<f64, RuntimeError> {
        match self.operand(op, operand)? {
            Value::Number(n) => Ok(n),
            other => Err(RuntimeError::TypeMismatch {
                op: op.as_str(),
                found: other.type_name(),
            }),
        }
    }

    fn truth(&mut self, op: Op, operand: Option<&Operand>) -> Result<bool, RuntimeError> {
        match self.operand(op, operand)? {
            Value::Bool(b) => Ok(b),
            Value::Number(n) => Ok(n != 0.0),
            other => Err(RuntimeError::TypeMismatch {
                op: op.as_str(),
                found: other.type_name(),
            }),
        }
    }

    fn index(&mut self, operand: Option<&Operand>) -> Result<usize, RuntimeError> {
        match self.operand(Op::Index, operand)? {
            Value::Number(n) if n >= 0.0 && n.fract() == 0.0 && n <= usize::MAX as f64 => {
                Ok(n as usize)
            }
            other => Err(RuntimeError::InvalidIndex(other.to_string())),
        }
    }

    /// Resolve the result slot of an assignment.
    fn target(&mut self, operand: Option<&Operand>) -> Result<Slot, RuntimeError> {
        match operand {
            Some(Operand::Name(name)) => Ok(Slot::Element(ElementRef {
                symbol: name.clone(),
                path: Vec::new(),
            })),
            Some(Operand::Temp(_)) => match self.pop()? {
                element @ Slot::Element(_) => Ok(element),
                Slot::Value(value) => Err(RuntimeError::InvalidOperand(value.to_string())),
            },
            Some(other) => Err(RuntimeError::InvalidOperand(other.to_string())),
            None => Err(RuntimeError::MissingOperand(Op::Assign.as_str())),
        }
    }

    fn assign(&mut self, target: Slot, value: Value) -> Result<(), RuntimeError> {
        let element = match target {
            Slot::Element(element) => element,
            Slot::Value(value) => return Err(RuntimeError::InvalidOperand(value.to_string())),
        };
        let entry = self
            .symbols
            .get_mut(&element.symbol)
            .ok_or_else(|| RuntimeError::UndeclaredIdentifier(element.symbol.clone()))?;
        store(
            &mut entry.value,
            &entry.declared,
            &element.path,
            value,
            &element.symbol,
        )
    }

    fn load(&self, element: &ElementRef) -> Result<Value, RuntimeError> {
        let entry = self
            .symbols
            .get(&element.symbol)
            .ok_or_else(|| RuntimeError::UndeclaredIdentifier(element.symbol.clone()))?;

        let mut declared = &entry.declared;
        let mut value = &entry.value;
        for &index in element.path.iter() {
            let (inner, size) = declared
                .as_array()
                .ok_or_else(|| RuntimeError::NotAnArray(element.symbol.clone()))?;
            check_bounds(&element.symbol, index, size)?;
            value = match value {
                Value::Array(items) => items.get(index).unwrap_or(&UNDEFINED),
                Value::Undefined => &UNDEFINED,
                _ => return Err(RuntimeError::NotAnArray(element.symbol.clone())),
            };
            declared = inner;
        }

        match value {
            Value::Undefined => Err(RuntimeError::UndefinedValue(element.describe())),
            value => Ok(value.clone()),
        }
    }

    fn jump(&mut self, label: Option<&Operand>) -> Result<(), RuntimeError> {
        match label {
            Some(Operand::Label(label)) => {
                self.pc = *self
                    .labels
                    .get(label)
                    .ok_or(RuntimeError::MissingLabel(*label))?;
                Ok(())
            }
            Some(other) => Err(RuntimeError::InvalidOperand(other.to_string())),
            None => Err(RuntimeError::MissingOperand("jmp")),
        }
    }

    fn call(&mut self, quad: &Quadruple) -> Result<(), RuntimeError> {
        let name = match &quad.arg1 {
            Some(Operand::Name(name)) => name,
            Some(other) => return Err(RuntimeError::InvalidOperand(other.to_string())),
            None => return Err(RuntimeError::MissingOperand(quad.op.as_str())),
        };
        if name != PRINT {
            return Err(RuntimeError::UnknownFunction(name.clone()));
        }

        let count = match &quad.arg2 {
            Some(Operand::Const(count)) => count
                .parse::<usize>()
                .map_err(|_| RuntimeError::InvalidConstant(count.clone()))?,
            _ => return Err(RuntimeError::MissingOperand(quad.op.as_str())),
        };
        if count > self.params.len() {
            return Err(RuntimeError::StackUnderflow);
        }
        let args = self.params.split_off(self.params.len() - count);
        let line = args
            .iter()
            .map(|value| value.to_string())
            .collect::<Vec<_>>()
            .join(" ");

        lrquad_trace!("print {}", line);
        self.output.push(line);
        Ok(())
    }
}

fn check_bounds(symbol: &str, index: usize, size: Option<usize>) -> Result<(), RuntimeError> {
    match size {
        Some(size) if index >= size => Err(RuntimeError::IndexOutOfBounds {
            symbol: symbol.to_owned(),
            index,
            size,
        }),
        _ => Ok(()),
    }
}

/// Write `value` at `path` below `slot`, growing arrays as needed.
fn store(
    slot: &mut Value,
    declared: &DeclaredType,
    path: &[usize],
    value: Value,
    symbol: &str,
) -> Result<(), RuntimeError> {
    let (&index, rest) = match path.split_first() {
        Some(split) => split,
        None => {
            *slot = value;
            return Ok(());
        }
    };

    let (element, size) = declared
        .as_array()
        .ok_or_else(|| RuntimeError::NotAnArray(symbol.to_owned()))?;
    check_bounds(symbol, index, size)?;

    if slot.is_undefined() {
        *slot = Value::Array(Vec::new());
    }
    match slot {
        Value::Array(items) => {
            if items.len() <= index {
                let too_large = || RuntimeError::ArrayTooLarge {
                    symbol: symbol.to_owned(),
                    index,
                };
                if index >= MAX_ARRAY_LEN {
                    return Err(too_large());
                }
                items
                    .try_reserve(index + 1 - items.len())
                    .map_err(|_| too_large())?;
                items.resize(index + 1, Value::Undefined);
            }
            store(&mut items[index], element, rest, value, symbol)
        }
        _ => Err(RuntimeError::NotAnArray(symbol.to_owned())),
    }
}
