use lrquad_core::GenerationError;
use thiserror::Error;

use crate::grammar::{LangSymbol, Nonterminal, Terminal};
use crate::token::{Position, TokenKind};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("Unexpected character '{character}' at line {line}, column {column}")]
    UnexpectedCharacter {
        character: char,
        line: usize,
        column: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Syntax error: unexpected '{text}' at {position}")]
    UnexpectedToken { text: String, position: Position },
    #[error("Syntax error: {kind} '{text}' is not supported at {position}")]
    UnsupportedToken {
        kind: TokenKind,
        text: String,
        position: Position,
    },
    #[error("Syntax error: unexpected end of input")]
    UnexpectedEnd,
    #[error("Corrupt parse table in state {state}: {detail}")]
    CorruptTable { state: usize, detail: String },
    #[error("Parse finished with {0} tree nodes instead of one")]
    IncompleteTree(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    #[error("Identifier '{0}' is declared more than once")]
    Redeclared(String),
    #[error("Invalid array size '{0}'")]
    InvalidArraySize(String),
    #[error("'break' outside of a loop at {0}")]
    BreakOutsideLoop(Position),
    #[error("Unknown function '{0}'")]
    UnknownFunction(String),
    #[error("Unknown operator '{0}'")]
    UnknownOperator(String),
    #[error("Malformed '{0}' node")]
    MalformedNode(Nonterminal),
    #[error("'{0}' node produced no result")]
    MissingResult(LangSymbol),
    #[error("Loop labels requested outside of a loop")]
    LoopStackUnderflow,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error("Unknown instruction '{0}'")]
    UnknownInstruction(String),
    #[error("Jump to missing label L{0}")]
    MissingLabel(usize),
    #[error("Undeclared identifier '{0}'")]
    UndeclaredIdentifier(String),
    #[error("Use of undefined value '{0}'")]
    UndefinedValue(String),
    #[error("'{0}' is not an array")]
    NotAnArray(String),
    #[error("Index {index} out of bounds for '{symbol}' of size {size}")]
    IndexOutOfBounds {
        symbol: String,
        index: usize,
        size: usize,
    },
    #[error("Cannot grow '{symbol}' to hold index {index}")]
    ArrayTooLarge { symbol: String, index: usize },
    #[error("Invalid array index {0}")]
    InvalidIndex(String),
    #[error("Operator '{op}' cannot be applied to {found}")]
    TypeMismatch { op: &'static str, found: &'static str },
    #[error("Invalid constant '{0}'")]
    InvalidConstant(String),
    #[error("Operator '{0}' is missing an operand")]
    MissingOperand(&'static str),
    #[error("'{0}' cannot be used as a value")]
    InvalidOperand(String),
    #[error("Evaluation stack underflow")]
    StackUnderflow,
    #[error("Unknown function '{0}'")]
    UnknownFunction(String),
    #[error("Malformed listing on line {line}: {reason}")]
    MalformedListing { line: usize, reason: String },
}

#[derive(Debug, Error)]
pub enum TableIoError {
    #[error("Failed to access parse table file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to (de)serialize parse table: {0}")]
    Json(#[from] serde_json::Error),
}

/// Any error produced while turning source text into output
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Grammar(#[from] GenerationError<Terminal, Nonterminal>),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Translate(#[from] TranslateError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    #[error(transparent)]
    Table(#[from] TableIoError),
}
