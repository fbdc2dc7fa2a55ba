use std::fmt;

use lrquad_core::{Action, Symbol};

use crate::error::ParseError;
use crate::grammar::{LangGrammar, LangSymbol, LangTable, Terminal};
use crate::token::{Position, Token, TokenKind};
use crate::tree::{Node, SyntaxTree};

/// One row of the parse trace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceStep {
    pub stack: String,
    pub symbols: String,
    pub input: String,
    pub action: String,
}

impl fmt::Display for TraceStep {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{:<40} | {:<40} | {:<8} | {}",
            self.stack, self.symbols, self.input, self.action
        )
    }
}

#[derive(Debug)]
pub struct Parse {
    pub tree: SyntaxTree,
    pub trace: Vec<TraceStep>,
}

#[derive(Debug)]
struct StackElem {
    state: usize,
    symbol: Option<LangSymbol>,
    token: Option<(String, Position)>,
}

/// Table-driven shift-reduce parser over a token sequence
pub struct Parser<'t> {
    grammar: &'t LangGrammar,
    table: &'t LangTable,
}

/// Map a token onto the terminal the grammar expects.
pub fn terminal_of(token: &Token) -> Result<Terminal, ParseError> {
    let unexpected = || ParseError::UnexpectedToken {
        text: token.text.clone(),
        position: token.position,
    };

    match token.kind {
        TokenKind::Identifier => Ok(Terminal::Id),
        TokenKind::Integer => Ok(Terminal::Num),
        TokenKind::Decimal => Ok(Terminal::Real),
        TokenKind::Eof => Ok(Terminal::End),
        TokenKind::StringLiteral => Err(ParseError::UnsupportedToken {
            kind: token.kind,
            text: token.text.clone(),
            position: token.position,
        }),
        TokenKind::ReservedWord
        | TokenKind::BasicType
        | TokenKind::Operator
        | TokenKind::Separator => Terminal::from_lexeme(&token.text).ok_or_else(unexpected),
    }
}

impl<'t> Parser<'t> {
    pub fn new(grammar: &'t LangGrammar, table: &'t LangTable) -> Self {
        Parser { grammar, table }
    }

    /// Parse `tokens`, which must end with the end-of-input token.
    ///
    /// Builds the syntax tree bottom-up: every non-ε reduction pops one node per nonterminal
    /// of the rule's right-hand side and makes fresh leaves for its terminals. ε reductions
    /// push an empty node and are left out of the trace.
    pub fn parse(&self, tokens: &[Token]) -> Result<Parse, ParseError> {
        let mut stack: Vec<StackElem> = vec![StackElem {
            state: 0,
            symbol: None,
            token: None,
        }];
        let mut nodes: Vec<Node> = Vec::new();
        let mut trace: Vec<TraceStep> = Vec::new();
        let mut tokens = tokens.iter().peekable();

        while let Some(&token) = tokens.peek() {
            let terminal = terminal_of(token)?;
            let state = Self::top_state(&stack)?;

            match self.table.action(state, &terminal) {
                Some(Action::Shift(next_state)) => {
                    lrquad_trace!("shift {} -> {}", token.text, next_state);

                    stack.push(StackElem {
                        state: next_state,
                        symbol: Some(Symbol::Terminal(terminal)),
                        token: Some((token.text.clone(), token.position)),
                    });
                    trace.push(Self::trace_step(
                        &stack,
                        Self::input_text(token, terminal),
                        format!("Shift {}", next_state),
                    ));

                    tokens.next();
                }
                Some(Action::Reduce(rule_idx)) => {
                    self.reduce(rule_idx, &mut stack, &mut nodes, &mut trace, token, terminal)?;
                }
                Some(Action::Accept) => {
                    lrquad_trace!("accept");

                    trace.push(Self::trace_step(
                        &stack,
                        Self::input_text(token, terminal),
                        "Accept".to_owned(),
                    ));

                    // The start rule is never reduced, so its only child is the last node.
                    return match (nodes.pop(), nodes.len()) {
                        (Some(root), 0) => Ok(Parse {
                            tree: SyntaxTree::new(root),
                            trace,
                        }),
                        (_, remaining) => Err(ParseError::IncompleteTree(remaining + 1)),
                    };
                }
                None => {
                    return Err(match terminal {
                        Terminal::End => ParseError::UnexpectedEnd,
                        _ => ParseError::UnexpectedToken {
                            text: token.text.clone(),
                            position: token.position,
                        },
                    });
                }
            }
        }

        Err(ParseError::UnexpectedEnd)
    }

    fn reduce(
        &self,
        rule_idx: usize,
        stack: &mut Vec<StackElem>,
        nodes: &mut Vec<Node>,
        trace: &mut Vec<TraceStep>,
        token: &Token,
        terminal: Terminal,
    ) -> Result<(), ParseError> {
        let state = Self::top_state(stack)?;
        let rule = self
            .grammar
            .rules
            .get(rule_idx)
            .ok_or_else(|| ParseError::CorruptTable {
                state,
                detail: format!("reduce by unknown rule {}", rule_idx),
            })?;

        lrquad_trace!("reduce {}", rule);

        let to_be_popped = rule.rhs.len();
        if stack.len() <= to_be_popped {
            return Err(ParseError::CorruptTable {
                state,
                detail: format!("cannot pop {} symbols for {}", to_be_popped, rule),
            });
        }
        let popped: Vec<StackElem> = stack.drain((stack.len() - to_be_popped)..).collect();

        let exposed = Self::top_state(stack)?;
        let next_state =
            self.table
                .goto(exposed, &rule.lhs)
                .ok_or_else(|| ParseError::CorruptTable {
                    state: exposed,
                    detail: format!("no goto on {}", rule.lhs),
                })?;
        stack.push(StackElem {
            state: next_state,
            symbol: Some(Symbol::Nonterminal(rule.lhs)),
            token: None,
        });

        if rule.is_epsilon() {
            nodes.push(Node::branch(rule.lhs, Vec::new()));
            return Ok(());
        }

        trace.push(Self::trace_step(
            stack,
            Self::input_text(token, terminal),
            format!("Reduce {}", rule),
        ));

        let mut children = Vec::with_capacity(to_be_popped);
        for (symbol, elem) in rule.rhs.iter().zip(popped.into_iter()).rev() {
            match symbol {
                Symbol::Nonterminal(_) => {
                    if nodes.last().map(|node| node.symbol == *symbol) == Some(true) {
                        children.extend(nodes.pop());
                    }
                }
                Symbol::Terminal(t) => {
                    let (value, position) = match elem.token {
                        Some((text, position)) => (text, Some(position)),
                        None => (t.to_string(), None),
                    };
                    children.push(Node::leaf(*t, &value, position));
                }
            }
        }
        children.reverse();
        nodes.push(Node::branch(rule.lhs, children));

        Ok(())
    }

    fn top_state(stack: &[StackElem]) -> Result<usize, ParseError> {
        stack
            .last()
            .map(|elem| elem.state)
            .ok_or_else(|| ParseError::CorruptTable {
                state: 0,
                detail: "empty state stack".to_owned(),
            })
    }

    fn input_text(token: &Token, terminal: Terminal) -> String {
        match terminal {
            Terminal::End => terminal.to_string(),
            _ => token.text.clone(),
        }
    }

    fn trace_step(stack: &[StackElem], input: String, action: String) -> TraceStep {
        let states: Vec<String> = stack.iter().map(|elem| elem.state.to_string()).collect();
        let symbols: Vec<String> = stack
            .iter()
            .filter_map(|elem| elem.symbol.as_ref())
            .map(|symbol| symbol.to_string())
            .collect();
        TraceStep {
            stack: states.join(" "),
            symbols: symbols.join(" "),
            input,
            action,
        }
    }
}
