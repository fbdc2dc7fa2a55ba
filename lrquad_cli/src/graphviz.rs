use std::error::Error;
use std::fs;
use std::io::Write;

use lrquad::{Nonterminal, Terminal, GRAMMAR};
use lrquad_core::{CanonicalCollection, FirstSets, Grammar, Symbol};
use tempfile::NamedTempFile;

pub fn write_graphviz_graph(output_filename: &str) -> Result<(), Box<dyn Error>> {
    let graphviz_string = render_graphviz_graph(&GRAMMAR);
    fs::write(output_filename, graphviz_string)?;
    Ok(())
}

pub fn show_graphviz_graph() -> Result<(), Box<dyn Error>> {
    let graphviz_string = render_graphviz_graph(&GRAMMAR);
    // The viewer picks the application by file extension
    let mut temp_file = NamedTempFile::new()?;
    let path = temp_file.path().with_extension("dot");
    write!(temp_file, "{}", graphviz_string)?;
    temp_file.persist(&path)?;
    open::that(&path)?;
    Ok(())
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn render_graphviz_graph(grammar: &Grammar<Terminal, Nonterminal>) -> String {
    let first_sets = FirstSets::compute(grammar);
    let collection = CanonicalCollection::generate(grammar, &first_sets);

    let mut lines = Vec::new();
    lines.push("digraph lr1_states {".to_owned());
    for (state_idx, items) in collection.states.iter().enumerate() {
        let table_rows: Vec<String> = items
            .iter()
            .map(|item| {
                let mut la_string = escape(&item.lookahead_string());
                if item.is_pos_at_end(grammar) {
                    // Underline marks a reduce item
                    la_string = format!("<U>{}</U>", la_string);
                }
                format!(
                    "      <TR><TD>{}</TD><TD>{}</TD></TR>",
                    escape(&item.augmented_rule_string(grammar)),
                    la_string
                )
            })
            .collect();
        let table_row_string = table_rows.join("\n");
        let table_head = format!(
            "      <TR><TD><B>State #{}</B></TD><TD><B>Lookahead</B></TD></TR>",
            state_idx
        );
        let line = format!(
            r#"  State{} [shape=plain label=<
    <TABLE BORDER="0" CELLBORDER="1" CELLSPACING="0">
{}
{}
    </TABLE>
  >];"#,
            state_idx, table_head, table_row_string
        );
        lines.push(line);
        for (symbol, other_state_idx) in collection.transitions[state_idx].iter() {
            let label = match symbol {
                Symbol::Terminal(t) => t.to_string(),
                Symbol::Nonterminal(n) => n.to_string(),
            };
            lines.push(format!(
                r#"  State{} -> State{} [label="{}"];"#,
                state_idx,
                other_state_idx,
                label.replace('"', "\\\"")
            ))
        }
    }
    lines.push("}".to_owned());
    lines.join("\n")
}
