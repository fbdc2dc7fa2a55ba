use std::fmt;
use std::hash::Hash;

use crate::Symbol;

/// A production `lhs → rhs`. An empty `rhs` is an epsilon rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rule<T, N>
where
    T: fmt::Debug + fmt::Display + Ord + Clone + Eq + Hash,
    N: fmt::Debug + fmt::Display + Ord + Clone + Eq + Hash,
{
    pub lhs: N,
    pub rhs: Vec<Symbol<T, N>>,
}

impl<T, N> Rule<T, N>
where
    T: fmt::Debug + fmt::Display + Ord + Clone + Eq + Hash,
    N: fmt::Debug + fmt::Display + Ord + Clone + Eq + Hash,
{
    pub fn is_epsilon(&self) -> bool {
        self.rhs.is_empty()
    }
}

impl<T, N> fmt::Display for Rule<T, N>
where
    T: fmt::Debug + fmt::Display + Ord + Clone + Eq + Hash,
    N: fmt::Debug + fmt::Display + Ord + Clone + Eq + Hash,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{} →", self.lhs)?;
        if self.rhs.is_empty() {
            return write!(f, " ε");
        }
        for symbol in &self.rhs {
            write!(f, " {}", symbol)?;
        }
        Ok(())
    }
}
