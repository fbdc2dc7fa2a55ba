use std::fmt;

use lrquad_core::Symbol;

use crate::grammar::{LangSymbol, Nonterminal, Terminal};
use crate::quad::{Operand, Quadruple};
use crate::token::Position;

/// A node of the syntax tree
///
/// Leaves are terminals and carry the token text as `value`; inner nodes are nonterminals and
/// carry their own name. `code` is filled in by the translator, which moves it up into the
/// parent, so after translation it is only left on the root and on unused leaves.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub symbol: LangSymbol,
    pub value: String,
    pub position: Option<Position>,
    pub children: Vec<Node>,
    pub code: Vec<Quadruple>,
}

impl Node {
    pub fn leaf(terminal: Terminal, value: &str, position: Option<Position>) -> Self {
        Node {
            symbol: Symbol::Terminal(terminal),
            value: value.to_owned(),
            position,
            children: Vec::new(),
            code: Vec::new(),
        }
    }

    pub fn branch(nonterminal: Nonterminal, children: Vec<Node>) -> Self {
        let position = children.iter().find_map(|child| child.position);
        Node {
            symbol: Symbol::Nonterminal(nonterminal),
            value: nonterminal.to_string(),
            position,
            children,
            code: Vec::new(),
        }
    }

    pub fn terminal(&self) -> Option<Terminal> {
        self.symbol.as_terminal().copied()
    }

    pub fn nonterminal(&self) -> Option<Nonterminal> {
        self.symbol.as_nonterminal().copied()
    }

    pub fn is(&self, symbol: impl Into<LangSymbol>) -> bool {
        self.symbol == symbol.into()
    }

    /// The operand holding this node's value once its code has run.
    pub fn result(&self) -> Option<&Operand> {
        self.code.last().and_then(|quad| quad.result.as_ref())
    }

    fn write_outline(&self, f: &mut fmt::Formatter, prefix: &str, connector: &str) -> fmt::Result {
        match &self.symbol {
            Symbol::Nonterminal(n) => writeln!(f, "{}{}[{}]", prefix, connector, n)?,
            Symbol::Terminal(t) if t.as_str() == self.value => {
                writeln!(f, "{}{}[{}]", prefix, connector, t)?
            }
            Symbol::Terminal(t) => writeln!(f, "{}{}[{}: {}]", prefix, connector, t, self.value)?,
        }

        let child_prefix = match connector {
            "├── " => format!("{}│   ", prefix),
            _ => format!("{}    ", prefix),
        };
        let count = self.children.len();
        for (idx, child) in self.children.iter().enumerate() {
            let connector = if idx + 1 == count { "└── " } else { "├── " };
            child.write_outline(f, &child_prefix, connector)?;
        }
        Ok(())
    }
}

/// Syntax tree produced by a successful parse
///
/// The root is the `block` node: the parse accepts before `program → block` is ever reduced.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxTree {
    pub root: Node,
}

impl SyntaxTree {
    pub fn new(root: Node) -> Self {
        SyntaxTree { root }
    }

    /// Visit every node in pre-order.
    pub fn walk<'t>(&'t self, visit: &mut dyn FnMut(&'t Node)) {
        fn walk_node<'t>(node: &'t Node, visit: &mut dyn FnMut(&'t Node)) {
            visit(node);
            for child in node.children.iter() {
                walk_node(child, visit);
            }
        }
        walk_node(&self.root, visit);
    }
}

impl fmt::Display for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.root.write_outline(f, "", "")
    }
}
