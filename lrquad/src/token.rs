use std::fmt;

/// Line and column of a token, both starting at 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Position { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    ReservedWord,
    Identifier,
    BasicType,
    Integer,
    Decimal,
    StringLiteral,
    Operator,
    Separator,
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            TokenKind::ReservedWord => "reserved word",
            TokenKind::Identifier => "identifier",
            TokenKind::BasicType => "basic type",
            TokenKind::Integer => "integer constant",
            TokenKind::Decimal => "decimal constant",
            TokenKind::StringLiteral => "string literal",
            TokenKind::Operator => "operator",
            TokenKind::Separator => "separator",
            TokenKind::Eof => "end of input",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, text: &str, position: Position) -> Self {
        Token {
            kind,
            text: text.to_owned(),
            position,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => write!(f, "<{}> at {}", self.kind, self.position),
            _ => write!(f, "<{} '{}'> at {}", self.kind, self.text, self.position),
        }
    }
}
