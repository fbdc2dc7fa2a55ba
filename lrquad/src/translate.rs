use std::mem;

use lrquad_core::Symbol;

use crate::error::TranslateError;
use crate::grammar::{Nonterminal, Terminal};
use crate::quad::{Op, Operand, Quadruple};
use crate::tree::{Node, SyntaxTree};

/// The only callable function.
pub const PRINT: &str = "print";

#[derive(Debug, Clone, Copy)]
struct LoopLabels {
    exit: usize,
    top: usize,
}

/// Syntax-directed translation of a syntax tree into quadruples
///
/// Works bottom-up: every node's `code` is synthesized from its children's code, which is moved
/// out of the children, so after translation only the root holds the program. Leaves that
/// carry a value get a single `fetch` placeholder naming that value; operators splice operand
/// code with the placeholders removed. Temporaries and labels are numbered from 1 per
/// translator.
#[derive(Debug, Default)]
pub struct Translator {
    next_temp: usize,
    next_label: usize,
    loops: Vec<LoopLabels>,
}

fn take(node: &mut Node) -> Vec<Quadruple> {
    mem::take(&mut node.code)
}

/// Operand code with the `fetch` placeholders removed.
fn stripped(node: &mut Node) -> impl Iterator<Item = Quadruple> {
    take(node).into_iter().filter(|quad| !quad.is_fetch())
}

fn result_of(node: &Node) -> Result<Operand, TranslateError> {
    node.result()
        .cloned()
        .ok_or_else(|| TranslateError::MissingResult(node.symbol.clone()))
}

impl Translator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Translate `tree`, filling in the code of the root, and return the program.
    pub fn translate(&mut self, tree: &mut SyntaxTree) -> Result<Vec<Quadruple>, TranslateError> {
        self.translate_node(&mut tree.root)?;
        tree.root.code.retain(|quad| !quad.is_fetch());
        Ok(tree.root.code.clone())
    }

    fn new_temp(&mut self) -> Operand {
        self.next_temp += 1;
        Operand::Temp(self.next_temp)
    }

    fn new_label(&mut self) -> usize {
        self.next_label += 1;
        self.next_label
    }

    fn translate_node(&mut self, node: &mut Node) -> Result<(), TranslateError> {
        // Loop labels exist before the body is translated so that `break` can target them.
        let opens_loop = node.is(Nonterminal::Stmt)
            && match node.children.first().and_then(Node::terminal) {
                Some(Terminal::While) | Some(Terminal::Do) => true,
                _ => false,
            };
        if opens_loop {
            let exit = self.new_label();
            let top = self.new_label();
            self.loops.push(LoopLabels { exit, top });
        }

        for child in node.children.iter_mut() {
            self.translate_node(child)?;
        }

        node.code = self.synthesize(node)?;
        Ok(())
    }

    fn synthesize(&mut self, node: &mut Node) -> Result<Vec<Quadruple>, TranslateError> {
        let nonterminal = match &node.symbol {
            Symbol::Terminal(t) if t.is_operand() => {
                let operand = match t {
                    Terminal::Id => Operand::Name(node.value.clone()),
                    _ => Operand::Const(node.value.clone()),
                };
                return Ok(vec![Quadruple::fetch(operand)]);
            }
            Symbol::Terminal(_) => return Ok(Vec::new()),
            Symbol::Nonterminal(n) => *n,
        };

        match nonterminal {
            Nonterminal::Program | Nonterminal::Block | Nonterminal::Stmts => {
                let mut code = Vec::new();
                for child in node.children.iter_mut() {
                    code.append(&mut child.code);
                }
                Ok(code)
            }
            Nonterminal::Decls | Nonterminal::Decl | Nonterminal::Type | Nonterminal::Array => {
                Ok(Vec::new())
            }
            Nonterminal::Stmt => self.statement(node),
            Nonterminal::Func => self.call(node),
            Nonterminal::Args => self.arguments(node),
            Nonterminal::Loc => self.location(node),
            Nonterminal::Bool
            | Nonterminal::Join
            | Nonterminal::Equality
            | Nonterminal::Rel
            | Nonterminal::Expr
            | Nonterminal::Term
            | Nonterminal::Unary
            | Nonterminal::Factor => self.operation(node, nonterminal),
        }
    }

    fn operation(
        &mut self,
        node: &mut Node,
        nonterminal: Nonterminal,
    ) -> Result<Vec<Quadruple>, TranslateError> {
        match node.children.as_mut_slice() {
            [only] => Ok(take(only)),
            [open, inner, close] if open.is(Terminal::LParen) && close.is(Terminal::RParen) => {
                Ok(take(inner))
            }
            [operator, operand] => {
                let op = Self::operator(operator)?;
                let arg = result_of(operand)?;
                let mut code: Vec<Quadruple> = stripped(operand).collect();
                let result = self.new_temp();
                code.push(Quadruple::new(op, Some(arg), None, Some(result)));
                Ok(code)
            }
            [left, operator, right] => {
                let op = Self::operator(operator)?;
                let (arg1, arg2) = (result_of(left)?, result_of(right)?);
                let mut code: Vec<Quadruple> = stripped(left).chain(stripped(right)).collect();
                let result = self.new_temp();
                code.push(Quadruple::new(op, Some(arg1), Some(arg2), Some(result)));
                Ok(code)
            }
            _ => Err(TranslateError::MalformedNode(nonterminal)),
        }
    }

    fn operator(node: &Node) -> Result<Op, TranslateError> {
        node.terminal()
            .and_then(Op::for_terminal)
            .ok_or_else(|| TranslateError::UnknownOperator(node.value.clone()))
    }

    fn location(&mut self, node: &mut Node) -> Result<Vec<Quadruple>, TranslateError> {
        match node.children.as_mut_slice() {
            [id] => Ok(take(id)),
            [base, _, index, _] => {
                let (array, offset) = (result_of(base)?, result_of(index)?);
                let mut code: Vec<Quadruple> = stripped(base).chain(stripped(index)).collect();
                let result = self.new_temp();
                code.push(Quadruple::new(
                    Op::Index,
                    Some(array),
                    Some(offset),
                    Some(result),
                ));
                Ok(code)
            }
            _ => Err(TranslateError::MalformedNode(Nonterminal::Loc)),
        }
    }

    fn statement(&mut self, node: &mut Node) -> Result<Vec<Quadruple>, TranslateError> {
        let malformed = || TranslateError::MalformedNode(Nonterminal::Stmt);
        let (leading, position) = match node.children.first() {
            Some(first) => (first.symbol.clone(), first.position),
            None => return Err(malformed()),
        };

        match leading {
            Symbol::Nonterminal(Nonterminal::Loc) => match node.children.as_mut_slice() {
                [loc, _, value, _] => {
                    let (source, target) = (result_of(value)?, result_of(loc)?);
                    let mut code: Vec<Quadruple> = stripped(value).chain(stripped(loc)).collect();
                    code.push(Quadruple::new(Op::Assign, Some(source), None, Some(target)));
                    Ok(code)
                }
                _ => Err(malformed()),
            },
            Symbol::Nonterminal(Nonterminal::Block) | Symbol::Nonterminal(Nonterminal::Func) => {
                Ok(take(&mut node.children[0]))
            }
            Symbol::Terminal(Terminal::If) => self.conditional(node),
            Symbol::Terminal(Terminal::While) => {
                let labels = self.loops.pop().ok_or(TranslateError::LoopStackUnderflow)?;
                match node.children.as_mut_slice() {
                    [_, _, condition, _, body] => {
                        let test = result_of(condition)?;
                        let mut code = vec![Quadruple::label(labels.top)];
                        code.extend(stripped(condition));
                        code.push(Quadruple::branch(Op::JFalse, test, labels.exit));
                        code.append(&mut body.code);
                        code.push(Quadruple::jump(labels.top));
                        code.push(Quadruple::label(labels.exit));
                        Ok(code)
                    }
                    _ => Err(malformed()),
                }
            }
            Symbol::Terminal(Terminal::Do) => {
                let labels = self.loops.pop().ok_or(TranslateError::LoopStackUnderflow)?;
                match node.children.as_mut_slice() {
                    [_, body, _, _, condition, _, _] => {
                        let test = result_of(condition)?;
                        let mut code = vec![Quadruple::label(labels.top)];
                        code.append(&mut body.code);
                        code.extend(stripped(condition));
                        code.push(Quadruple::branch(Op::JTrue, test, labels.top));
                        code.push(Quadruple::label(labels.exit));
                        Ok(code)
                    }
                    _ => Err(malformed()),
                }
            }
            Symbol::Terminal(Terminal::Break) => match self.loops.last() {
                Some(labels) => Ok(vec![Quadruple::jump(labels.exit)]),
                None => Err(TranslateError::BreakOutsideLoop(
                    position.unwrap_or_default(),
                )),
            },
            _ => Err(malformed()),
        }
    }

    fn conditional(&mut self, node: &mut Node) -> Result<Vec<Quadruple>, TranslateError> {
        let (condition, then_block, else_block) = match node.children.as_mut_slice() {
            [_, _, condition, _, then_block] => (condition, then_block, None),
            [_, _, condition, _, then_block, _, else_block] => {
                (condition, then_block, Some(else_block))
            }
            _ => return Err(TranslateError::MalformedNode(Nonterminal::Stmt)),
        };

        let else_label = self.new_label();
        let end_label = self.new_label();

        let test = result_of(condition)?;
        let mut code: Vec<Quadruple> = stripped(condition).collect();
        code.push(Quadruple::branch(Op::JFalse, test, else_label));
        code.append(&mut then_block.code);
        code.push(Quadruple::jump(end_label));
        code.push(Quadruple::label(else_label));
        if let Some(else_block) = else_block {
            code.append(&mut else_block.code);
        }
        code.push(Quadruple::label(end_label));
        Ok(code)
    }

    fn call(&mut self, node: &mut Node) -> Result<Vec<Quadruple>, TranslateError> {
        let (name, args) = match node.children.as_mut_slice() {
            [name, _, args, _, _] => (name.value.clone(), Some(args)),
            [name, _, _, _] => (name.value.clone(), None),
            _ => return Err(TranslateError::MalformedNode(Nonterminal::Func)),
        };
        if name != PRINT {
            return Err(TranslateError::UnknownFunction(name));
        }

        let mut code = args.map(take).unwrap_or_default();
        let count = code.iter().filter(|quad| quad.op == Op::Param).count();
        code.push(Quadruple::new(
            Op::Call,
            Some(Operand::Name(name)),
            Some(Operand::Const(count.to_string())),
            None,
        ));
        Ok(code)
    }

    fn arguments(&mut self, node: &mut Node) -> Result<Vec<Quadruple>, TranslateError> {
        let (mut code, value) = match node.children.as_mut_slice() {
            [value] => (Vec::new(), value),
            [preceding, _, value] => (take(preceding), value),
            _ => return Err(TranslateError::MalformedNode(Nonterminal::Args)),
        };
        let argument = result_of(value)?;
        code.extend(stripped(value));
        code.push(Quadruple::new(Op::Param, Some(argument), None, None));
        Ok(code)
    }
}
