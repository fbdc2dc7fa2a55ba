mod pipeline;

pub use crate::pipeline::{compile, listing, run, run_with_symbols, TABLE};
