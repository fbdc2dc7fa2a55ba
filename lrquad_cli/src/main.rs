use std::error::Error;
use std::process;

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};

mod compile;
mod graphviz;
mod table;

use crate::compile::Report;

fn main() {
    if let Err(err) = cli() {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}

fn source_arg<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name("file")
        .help("Source file of the program")
        .required(true)
}

fn tables_arg<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name("tables")
        .long("--tables")
        .takes_value(true)
        .help("Cache the generated parse table in this JSON file")
}

fn cli() -> Result<(), Box<dyn Error>> {
    let matches = App::new("lrquad")
        .about("Compiles programs to quadruples with a canonical LR(1) parser and runs them")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand(
            SubCommand::with_name("run")
                .arg(source_arg())
                .arg(tables_arg())
                .arg(
                    Arg::with_name("tokens")
                        .long("--tokens")
                        .help("Print the token stream"),
                ).arg(
                    Arg::with_name("trace")
                        .long("--trace")
                        .help("Print the shift-reduce trace"),
                ).arg(
                    Arg::with_name("tree")
                        .long("--tree")
                        .help("Print the syntax tree"),
                ).arg(
                    Arg::with_name("quads")
                        .long("--quads")
                        .help("Print the generated quadruples"),
                ).arg(
                    Arg::with_name("symbols")
                        .long("--symbols")
                        .help("Print the symbol table after execution"),
                ).about("Compiles and executes a program"),
        ).subcommand(
            SubCommand::with_name("parse")
                .arg(source_arg())
                .arg(tables_arg())
                .about("Prints the shift-reduce trace and syntax tree of a program"),
        ).subcommand(
            SubCommand::with_name("quads")
                .arg(source_arg())
                .arg(tables_arg())
                .arg(
                    Arg::with_name("output")
                        .long("--output")
                        .short("-o")
                        .takes_value(true)
                        .help("Write the quadruple listing to a file"),
                ).about("Prints the quadruple listing of a program"),
        ).subcommand(
            SubCommand::with_name("exec")
                .arg(
                    Arg::with_name("listing")
                        .help("Quadruple listing to execute")
                        .required(true),
                ).arg(
                    Arg::with_name("file")
                        .help("Source file providing the declarations")
                        .required(true),
                ).arg(tables_arg())
                .about("Executes a stored quadruple listing"),
        ).subcommand(
            SubCommand::with_name("table")
                .arg(tables_arg())
                .arg(
                    Arg::with_name("csv")
                        .long("--csv")
                        .takes_value(true)
                        .help("Write the parse table to a specified CSV file"),
                ).about("Prints the LR(1) parse table of the language"),
        ).subcommand(
            SubCommand::with_name("graph")
                .arg(
                    Arg::with_name("output")
                        .long("--output")
                        .short("-o")
                        .takes_value(true)
                        .help("Write the generated graphviz graph to a file (*.dot)"),
                ).about("Outputs a graphviz graph showing the LR(1) states of the language"),
        ).setting(AppSettings::ArgRequiredElseHelp)
        .get_matches();

    match matches.subcommand() {
        ("run", Some(run_opts)) => {
            let report = Report {
                tokens: run_opts.is_present("tokens"),
                trace: run_opts.is_present("trace"),
                tree: run_opts.is_present("tree"),
                quads: run_opts.is_present("quads"),
                symbols: run_opts.is_present("symbols"),
            };
            compile::run(source(run_opts)?, run_opts.value_of("tables"), report)?;
        }
        ("parse", Some(parse_opts)) => {
            compile::print_parse(source(parse_opts)?, parse_opts.value_of("tables"))?;
        }
        ("quads", Some(quads_opts)) => {
            compile::write_quads(
                source(quads_opts)?,
                quads_opts.value_of("tables"),
                quads_opts.value_of("output"),
            )?;
        }
        ("exec", Some(exec_opts)) => {
            let listing = exec_opts.value_of("listing").ok_or("missing listing file")?;
            compile::exec_listing(listing, source(exec_opts)?, exec_opts.value_of("tables"))?;
        }
        ("table", Some(table_opts)) => {
            let tables_filename = table_opts.value_of("tables");
            if let Some(csv_filename) = table_opts.value_of("csv") {
                table::write_table_csv(csv_filename, tables_filename)?;
            } else {
                table::print_table(tables_filename)?;
            }
        }
        ("graph", Some(graph_opts)) => {
            if let Some(output_filename) = graph_opts.value_of("output") {
                graphviz::write_graphviz_graph(output_filename)?;
            } else {
                graphviz::show_graphviz_graph()?;
            }
        }
        _ => {}
    }

    Ok(())
}

fn source<'a>(opts: &'a ArgMatches) -> Result<&'a str, Box<dyn Error>> {
    Ok(opts.value_of("file").ok_or("missing source file")?)
}
