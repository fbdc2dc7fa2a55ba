use lazy_static::lazy_static;
use lrquad::quad::write_listing;
use lrquad::{Compilation, Error, LangTable, SymbolTable};

lazy_static! {
    /// Parse table shared by every test of a test binary.
    pub static ref TABLE: LangTable =
        lrquad::tables::generate().expect("the language grammar is LR(1)");
}

pub fn compile(source: &str) -> Result<Compilation, Error> {
    lrquad::compile(source, &TABLE)
}

/// Compile and execute `source`, returning the printed lines.
pub fn run(source: &str) -> Result<Vec<String>, Error> {
    run_with_symbols(source).map(|(output, _)| output)
}

/// Like `run`, also returning the symbol table as left by the program.
pub fn run_with_symbols(source: &str) -> Result<(Vec<String>, SymbolTable), Error> {
    let mut compilation = compile(source)?;
    let output = lrquad::execute(&compilation.code, &mut compilation.symbols)?;
    Ok((output, compilation.symbols))
}

/// Quadruple listing of `source`; panics if it does not compile.
pub fn listing(source: &str) -> String {
    match compile(source) {
        Ok(compilation) => write_listing(&compilation.code),
        Err(err) => panic!("failed to compile {:?}: {}", source, err),
    }
}
