use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use lrquad_core::ParseTable;

use crate::error::{Error, TableIoError};
use crate::grammar::{LangTable, GRAMMAR};

/// Generate the parse table of the language grammar.
pub fn generate() -> Result<LangTable, Error> {
    lrquad_trace!("generating parse table for {} rules", GRAMMAR.rules.len());
    Ok(ParseTable::generate(&GRAMMAR)?)
}

pub fn load(path: &Path) -> Result<LangTable, TableIoError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

pub fn save(table: &LangTable, path: &Path) -> Result<(), TableIoError> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(writer, table)?;
    Ok(())
}

/// Load the table cached at `path`, or generate it and write it there.
///
/// A cache that cannot be read back is regenerated.
pub fn load_or_generate(path: &Path) -> Result<LangTable, Error> {
    if path.exists() {
        if let Ok(table) = load(path) {
            if table.state_count() > 0 && table.goto.len() == table.action.len() {
                lrquad_trace!("loaded parse table from {}", path.display());
                return Ok(table);
            }
        }
        lrquad_trace!("regenerating unreadable parse table at {}", path.display());
    }

    let table = generate()?;
    save(&table, path)?;
    Ok(table)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::grammar::Terminal;
    use lrquad_core::Action;
    use tempfile::tempdir;

    #[test]
    fn test_table_survives_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("table.json");

        let generated = load_or_generate(&path).unwrap();
        assert!(path.exists());
        let loaded = load_or_generate(&path).unwrap();

        assert_eq!(generated, loaded);
        assert!(matches!(
            loaded.action(0, &Terminal::LBrace),
            Some(Action::Shift(_))
        ));
    }

    #[test]
    fn test_corrupt_cache_is_regenerated() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("table.json");
        std::fs::write(&path, "{ not json").unwrap();

        let table = load_or_generate(&path).unwrap();
        assert_eq!(table, generate().unwrap());
        assert_eq!(load(&path).unwrap(), table);
    }
}
