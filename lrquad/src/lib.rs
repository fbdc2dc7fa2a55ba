//! Compiler pipeline for a small block-structured language
//!
//! Source text is tokenized, parsed by a canonical LR(1) table generated from the language
//! grammar, translated into quadruples and executed on a stack machine:
//!
//! ```
//! let table = lrquad::tables::generate().unwrap();
//! let mut compilation = lrquad::compile("{ int x; x = 1 + 2 * 3; print(x); }", &table).unwrap();
//! let output = lrquad::execute(&compilation.code, &mut compilation.symbols).unwrap();
//! assert_eq!(output, vec!["7"]);
//! ```

#[macro_use]
pub mod extra;

mod error;
pub mod grammar;
pub mod lexer;
pub mod parser;
pub mod quad;
pub mod symbol_table;
pub mod tables;
pub mod token;
pub mod translate;
pub mod tree;
pub mod value;
pub mod vm;

pub use crate::error::{Error, LexError, ParseError, RuntimeError, TableIoError, TranslateError};
pub use crate::grammar::{LangGrammar, LangTable, Nonterminal, Terminal, GRAMMAR};
pub use crate::parser::{Parser, TraceStep};
pub use crate::quad::{Op, Operand, Quadruple};
pub use crate::symbol_table::SymbolTable;
pub use crate::token::{Position, Token, TokenKind};
pub use crate::translate::Translator;
pub use crate::tree::{Node, SyntaxTree};
pub use crate::value::Value;
pub use crate::vm::VirtualMachine;

/// Everything produced by compiling one source text
#[derive(Debug)]
pub struct Compilation {
    pub tokens: Vec<Token>,
    pub tree: SyntaxTree,
    pub trace: Vec<TraceStep>,
    pub symbols: SymbolTable,
    pub code: Vec<Quadruple>,
}

/// Tokenize, parse and translate `source`.
pub fn compile(source: &str, table: &LangTable) -> Result<Compilation, Error> {
    let tokens = lexer::tokenize(source)?;
    let parser::Parse { mut tree, trace } = Parser::new(&GRAMMAR, table).parse(&tokens)?;
    let symbols = SymbolTable::from_tree(&tree)?;
    let code = Translator::new().translate(&mut tree)?;

    Ok(Compilation {
        tokens,
        tree,
        trace,
        symbols,
        code,
    })
}

/// Run `code` against `symbols` and return the printed lines.
pub fn execute(code: &[Quadruple], symbols: &mut SymbolTable) -> Result<Vec<String>, Error> {
    let mut vm = VirtualMachine::new(code, symbols);
    vm.run()?;
    Ok(vm.into_output())
}
