use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Parser action stored in the action table. An absent entry means "error".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Action {
    Shift(usize),
    Reduce(usize),
    Accept,
}

impl Action {
    /// Compact form used in table listings, e.g. `s4`, `r12`, `acc`.
    pub fn short(&self) -> String {
        match self {
            Action::Shift(state) => format!("s{}", state),
            Action::Reduce(rule) => format!("r{}", rule),
            Action::Accept => "acc".to_owned(),
        }
    }

    /// Name of the conflict between two different actions for the same table slot.
    pub fn conflict_kind(first: &Action, second: &Action) -> &'static str {
        match (first, second) {
            (Action::Reduce(_), Action::Reduce(_)) => "reduce/reduce",
            (Action::Shift(_), Action::Reduce(_)) | (Action::Reduce(_), Action::Shift(_)) => {
                "shift/reduce"
            }
            (Action::Shift(_), Action::Shift(_)) => "shift/shift",
            (Action::Accept, _) | (_, Action::Accept) => "accept",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            Action::Shift(state) => write!(f, "shift {}", state),
            Action::Reduce(rule) => write!(f, "reduce {}", rule),
            Action::Accept => write!(f, "accept"),
        }
    }
}
