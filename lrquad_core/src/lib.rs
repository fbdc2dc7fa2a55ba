mod error;
mod lr1;

pub use crate::error::GenerationError;
pub use crate::lr1::*;
