use std::fmt;

use lazy_static::lazy_static;
use lrquad_core::{Grammar, ParseTable, Rule, Symbol};
use serde::{Deserialize, Serialize};

pub type LangSymbol = Symbol<Terminal, Nonterminal>;
pub type LangGrammar = Grammar<Terminal, Nonterminal>;
pub type LangTable = ParseTable<Terminal, Nonterminal>;

/// Terminal symbols of the source language
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Terminal {
    If,
    Else,
    While,
    Do,
    Break,
    True,
    False,
    Int,
    Double,
    Boolean,
    Id,
    Num,
    Real,
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Not,
    Assign,
    Semicolon,
    Comma,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    End,
}

impl Terminal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Terminal::If => "if",
            Terminal::Else => "else",
            Terminal::While => "while",
            Terminal::Do => "do",
            Terminal::Break => "break",
            Terminal::True => "true",
            Terminal::False => "false",
            Terminal::Int => "int",
            Terminal::Double => "double",
            Terminal::Boolean => "boolean",
            Terminal::Id => "id",
            Terminal::Num => "num",
            Terminal::Real => "real",
            Terminal::Or => "||",
            Terminal::And => "&&",
            Terminal::Eq => "==",
            Terminal::Ne => "!=",
            Terminal::Lt => "<",
            Terminal::Le => "<=",
            Terminal::Gt => ">",
            Terminal::Ge => ">=",
            Terminal::Plus => "+",
            Terminal::Minus => "-",
            Terminal::Star => "*",
            Terminal::Slash => "/",
            Terminal::Percent => "%",
            Terminal::Not => "!",
            Terminal::Assign => "=",
            Terminal::Semicolon => ";",
            Terminal::Comma => ",",
            Terminal::LParen => "(",
            Terminal::RParen => ")",
            Terminal::LBrace => "{",
            Terminal::RBrace => "}",
            Terminal::LBracket => "[",
            Terminal::RBracket => "]",
            Terminal::End => "$",
        }
    }

    /// Terminal spelled exactly as `text` in source code.
    ///
    /// Only keywords, type names, operators and separators have a fixed spelling; identifiers
    /// and literals are classified by the parser from their token kind.
    pub fn from_lexeme(text: &str) -> Option<Terminal> {
        let terminal = match text {
            "if" => Terminal::If,
            "else" => Terminal::Else,
            "while" => Terminal::While,
            "do" => Terminal::Do,
            "break" => Terminal::Break,
            "true" => Terminal::True,
            "false" => Terminal::False,
            "int" => Terminal::Int,
            "double" => Terminal::Double,
            "boolean" => Terminal::Boolean,
            "||" => Terminal::Or,
            "&&" => Terminal::And,
            "==" => Terminal::Eq,
            "!=" => Terminal::Ne,
            "<" => Terminal::Lt,
            "<=" => Terminal::Le,
            ">" => Terminal::Gt,
            ">=" => Terminal::Ge,
            "+" => Terminal::Plus,
            "-" => Terminal::Minus,
            "*" => Terminal::Star,
            "/" => Terminal::Slash,
            "%" => Terminal::Percent,
            "!" => Terminal::Not,
            "=" => Terminal::Assign,
            ";" => Terminal::Semicolon,
            "," => Terminal::Comma,
            "(" => Terminal::LParen,
            ")" => Terminal::RParen,
            "{" => Terminal::LBrace,
            "}" => Terminal::RBrace,
            "[" => Terminal::LBracket,
            "]" => Terminal::RBracket,
            _ => return None,
        };
        Some(terminal)
    }

    /// Whether leaves of this terminal carry a value into the translation.
    pub fn is_operand(&self) -> bool {
        match self {
            Terminal::Id | Terminal::Num | Terminal::Real | Terminal::True | Terminal::False => {
                true
            }
            _ => false,
        }
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Nonterminal symbols of the source language
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Nonterminal {
    Program,
    Block,
    Decls,
    Decl,
    Type,
    Array,
    Stmts,
    Stmt,
    Func,
    Args,
    Loc,
    Bool,
    Join,
    Equality,
    Rel,
    Expr,
    Term,
    Unary,
    Factor,
}

impl Nonterminal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Nonterminal::Program => "program",
            Nonterminal::Block => "block",
            Nonterminal::Decls => "decls",
            Nonterminal::Decl => "decl",
            Nonterminal::Type => "type",
            Nonterminal::Array => "array",
            Nonterminal::Stmts => "stmts",
            Nonterminal::Stmt => "stmt",
            Nonterminal::Func => "func",
            Nonterminal::Args => "args",
            Nonterminal::Loc => "loc",
            Nonterminal::Bool => "bool",
            Nonterminal::Join => "join",
            Nonterminal::Equality => "equality",
            Nonterminal::Rel => "rel",
            Nonterminal::Expr => "expr",
            Nonterminal::Term => "term",
            Nonterminal::Unary => "unary",
            Nonterminal::Factor => "factor",
        }
    }
}

impl fmt::Display for Nonterminal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<Terminal> for LangSymbol {
    fn from(terminal: Terminal) -> Self {
        Symbol::Terminal(terminal)
    }
}

impl From<Nonterminal> for LangSymbol {
    fn from(nonterminal: Nonterminal) -> Self {
        Symbol::Nonterminal(nonterminal)
    }
}

macro_rules! rule {
    ($lhs:ident => $($rhs:expr),*) => {
        Rule {
            lhs: Nonterminal::$lhs,
            rhs: vec![$(LangSymbol::from($rhs)),*],
        }
    };
}

/// The rule list of the language, with `program → block` as rule 0.
pub fn rules() -> Vec<Rule<Terminal, Nonterminal>> {
    use Nonterminal as N;
    use Terminal as T;

    vec![
        rule!(Program => N::Block),
        rule!(Block => T::LBrace, N::Decls, N::Stmts, T::RBrace),
        rule!(Decls => N::Decls, N::Decl),
        rule!(Decls => ),
        rule!(Decl => N::Type, T::Id, T::Semicolon),
        rule!(Type => N::Array),
        rule!(Type => T::Int),
        rule!(Type => T::Double),
        rule!(Type => T::Boolean),
        rule!(Array => N::Type, T::LBracket, T::Num, T::RBracket),
        rule!(Array => N::Type, T::LBracket, T::RBracket),
        rule!(Stmts => N::Stmts, N::Stmt),
        rule!(Stmts => ),
        rule!(Stmt => N::Loc, T::Assign, N::Bool, T::Semicolon),
        rule!(Stmt => T::If, T::LParen, N::Bool, T::RParen, N::Block),
        rule!(Stmt => T::If, T::LParen, N::Bool, T::RParen, N::Block, T::Else, N::Block),
        rule!(Stmt => T::While, T::LParen, N::Bool, T::RParen, N::Block),
        rule!(Stmt => T::Do, N::Block, T::While, T::LParen, N::Bool, T::RParen, T::Semicolon),
        rule!(Stmt => T::Break, T::Semicolon),
        rule!(Stmt => N::Block),
        rule!(Stmt => N::Func),
        rule!(Func => T::Id, T::LParen, N::Args, T::RParen, T::Semicolon),
        rule!(Func => T::Id, T::LParen, T::RParen, T::Semicolon),
        rule!(Args => N::Args, T::Comma, N::Bool),
        rule!(Args => N::Bool),
        rule!(Loc => N::Loc, T::LBracket, N::Bool, T::RBracket),
        rule!(Loc => T::Id),
        rule!(Bool => N::Bool, T::Or, N::Join),
        rule!(Bool => N::Join),
        rule!(Join => N::Join, T::And, N::Equality),
        rule!(Join => N::Equality),
        rule!(Equality => N::Equality, T::Eq, N::Rel),
        rule!(Equality => N::Equality, T::Ne, N::Rel),
        rule!(Equality => N::Rel),
        rule!(Rel => N::Expr, T::Lt, N::Expr),
        rule!(Rel => N::Expr, T::Le, N::Expr),
        rule!(Rel => N::Expr, T::Ge, N::Expr),
        rule!(Rel => N::Expr, T::Gt, N::Expr),
        rule!(Rel => N::Expr),
        rule!(Expr => N::Expr, T::Plus, N::Term),
        rule!(Expr => N::Expr, T::Minus, N::Term),
        rule!(Expr => N::Term),
        rule!(Term => N::Term, T::Star, N::Unary),
        rule!(Term => N::Term, T::Slash, N::Unary),
        rule!(Term => N::Term, T::Percent, N::Unary),
        rule!(Term => N::Unary),
        rule!(Unary => T::Not, N::Unary),
        rule!(Unary => T::Minus, N::Unary),
        rule!(Unary => N::Factor),
        rule!(Factor => T::LParen, N::Bool, T::RParen),
        rule!(Factor => N::Loc),
        rule!(Factor => T::Num),
        rule!(Factor => T::Real),
        rule!(Factor => T::True),
        rule!(Factor => T::False),
    ]
}

lazy_static! {
    /// The language grammar, built once.
    pub static ref GRAMMAR: LangGrammar =
        Grammar::new(Terminal::End, rules()).expect("the built-in rule list is well formed");
}
