use std::error::Error;
use std::fs::File;

use lrquad::{LangGrammar, GRAMMAR};
use lrquad_core::{CanonicalCollection, FirstSets};
use prettytable as pt;
use prettytable::cell;
use prettytable::row;

use crate::compile;

pub fn print_table(tables_filename: Option<&str>) -> Result<(), Box<dyn Error>> {
    let pretty_table = generate_pretty_table(tables_filename)?;
    println!("{}", pretty_table);
    Ok(())
}

pub fn write_table_csv(
    csv_filename: &str,
    tables_filename: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    let pretty_table = generate_pretty_table(tables_filename)?;
    let csv_file = File::create(csv_filename)?;
    pretty_table.to_csv(csv_file)?;
    Ok(())
}

/// Item closures always come from a fresh collection; the action and goto columns come from
/// the persisted table when one is given.
fn generate_pretty_table(tables_filename: Option<&str>) -> Result<pt::Table, Box<dyn Error>> {
    let grammar: &LangGrammar = &GRAMMAR;
    let first_sets = FirstSets::compute(grammar);
    let collection = CanonicalCollection::generate(grammar, &first_sets);
    let parse_table = compile::parse_table(tables_filename)?;

    let mut table = pt::Table::new();

    let mut title_row = row!["#", "LR(1) item closure", "Lookahead"];

    for t in grammar.terminals.iter().map(|t| format!("{}", t)) {
        title_row.add_cell(cell!(t));
    }

    for n in grammar.nonterminals.iter().map(|n| format!("{}", n)) {
        title_row.add_cell(cell!(n));
    }

    table.add_row(title_row);

    for (i, items) in collection.states.iter().enumerate() {
        let (rules, lookaheads): (Vec<_>, Vec<_>) = items
            .iter()
            .map(|item| (item.augmented_rule_string(grammar), item.lookahead_string()))
            .unzip();

        let mut row = row![i, rules.join("\n"), lookaheads.join("\n")];

        for t in grammar.terminals.iter() {
            row.add_cell(cell![parse_table
                .action(i, t)
                .map_or("".to_owned(), |a| a.short())]);
        }

        for n in grammar.nonterminals.iter() {
            row.add_cell(cell![parse_table
                .goto(i, n)
                .map_or("".to_owned(), |idx| idx.to_string())]);
        }

        table.add_row(row);
    }

    Ok(table)
}
