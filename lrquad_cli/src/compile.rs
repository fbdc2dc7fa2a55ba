use std::error::Error;
use std::fs;
use std::path::Path;

use lrquad::quad::{parse_listing, write_listing};
use lrquad::{tables, Compilation, LangTable, TraceStep};
use prettytable as pt;
use prettytable::cell;
use prettytable::row;

/// What `run` prints besides the program output
#[derive(Debug, Default, Clone, Copy)]
pub struct Report {
    pub tokens: bool,
    pub trace: bool,
    pub tree: bool,
    pub quads: bool,
    pub symbols: bool,
}

/// The action/goto table, read from and cached in `tables_filename` when given.
pub fn parse_table(tables_filename: Option<&str>) -> Result<LangTable, Box<dyn Error>> {
    let table = match tables_filename {
        Some(filename) => tables::load_or_generate(Path::new(filename))?,
        None => tables::generate()?,
    };
    Ok(table)
}

fn compile_file(
    filename: &str,
    tables_filename: Option<&str>,
) -> Result<Compilation, Box<dyn Error>> {
    let source = fs::read_to_string(filename)?;
    let table = parse_table(tables_filename)?;
    Ok(lrquad::compile(&source, &table)?)
}

pub fn run(
    filename: &str,
    tables_filename: Option<&str>,
    report: Report,
) -> Result<(), Box<dyn Error>> {
    let mut compilation = compile_file(filename, tables_filename)?;

    if report.tokens {
        for token in compilation.tokens.iter() {
            println!("{}", token);
        }
    }
    if report.trace {
        println!("{}", trace_table(&compilation.trace));
    }
    if report.tree {
        print!("{}", compilation.tree);
    }
    if report.quads {
        print!("{}", write_listing(&compilation.code));
    }

    let output = lrquad::execute(&compilation.code, &mut compilation.symbols)?;
    for line in output {
        println!("{}", line);
    }

    if report.symbols {
        print!("{}", compilation.symbols);
    }
    Ok(())
}

pub fn print_parse(filename: &str, tables_filename: Option<&str>) -> Result<(), Box<dyn Error>> {
    let compilation = compile_file(filename, tables_filename)?;
    println!("{}", trace_table(&compilation.trace));
    print!("{}", compilation.tree);
    Ok(())
}

pub fn write_quads(
    filename: &str,
    tables_filename: Option<&str>,
    output_filename: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    let compilation = compile_file(filename, tables_filename)?;
    let listing = write_listing(&compilation.code);
    match output_filename {
        Some(output_filename) => fs::write(output_filename, listing)?,
        None => print!("{}", listing),
    }
    Ok(())
}

/// Execute a stored listing with the declarations of `source_filename`.
pub fn exec_listing(
    listing_filename: &str,
    source_filename: &str,
    tables_filename: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    let mut compilation = compile_file(source_filename, tables_filename)?;
    let program = parse_listing(&fs::read_to_string(listing_filename)?)?;
    let output = lrquad::execute(&program, &mut compilation.symbols)?;
    for line in output {
        println!("{}", line);
    }
    Ok(())
}

fn trace_table(trace: &[TraceStep]) -> pt::Table {
    let mut table = pt::Table::new();
    table.add_row(row!["#", "Stack", "Symbols", "Input", "Action"]);
    for (i, step) in trace.iter().enumerate() {
        table.add_row(row![i, step.stack, step.symbols, step.input, step.action]);
    }
    table
}
