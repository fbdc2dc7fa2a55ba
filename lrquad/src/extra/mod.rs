#[macro_use]
pub mod trace;
