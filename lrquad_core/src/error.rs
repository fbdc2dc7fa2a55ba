use std::error::Error;
use std::fmt;
use std::hash::Hash;

use crate::Action;

#[derive(Debug)]
pub enum GenerationError<T, N>
where
    T: fmt::Display + fmt::Debug + Ord + Clone + Eq + Hash,
    N: fmt::Display + fmt::Debug + Ord + Clone + Eq + Hash,
{
    MissingStartRule,
    UndefinedNonterminal(N),
    /// Two different actions were computed for the same (state, terminal) slot.
    Conflict {
        state: usize,
        lookahead: T,
        existing: Action,
        incoming: Action,
    },
}

impl<T, N> fmt::Display for GenerationError<T, N>
where
    T: fmt::Display + fmt::Debug + Ord + Clone + Eq + Hash,
    N: fmt::Display + fmt::Debug + Ord + Clone + Eq + Hash,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            GenerationError::MissingStartRule => write!(f, "Missing start rule"),
            GenerationError::UndefinedNonterminal(n) => {
                write!(f, "Nonterminal {} is used but never defined", n)
            }
            GenerationError::Conflict {
                state,
                lookahead,
                existing,
                incoming,
            } => write!(
                f,
                "Grammar conflict ({}) in state {} on lookahead {}: {} vs {}",
                Action::conflict_kind(existing, incoming),
                state,
                lookahead,
                existing,
                incoming
            ),
        }
    }
}

impl<T, N> Error for GenerationError<T, N>
where
    T: fmt::Display + fmt::Debug + Ord + Clone + Eq + Hash,
    N: fmt::Display + fmt::Debug + Ord + Clone + Eq + Hash,
{
}
