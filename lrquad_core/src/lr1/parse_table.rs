use std::collections::BTreeMap;
use std::fmt;
use std::hash::Hash;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Action, CanonicalCollection, FirstSets, GenerationError, Grammar, Symbol};

/// Action and goto tables of a canonical LR(1) parser
///
/// Row `s` of `action` maps terminals to the action of state `s`; row `s` of `goto` maps
/// nonterminals to the successor state after a reduction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParseTable<T, N>
where
    T: fmt::Debug + fmt::Display + Ord + Clone + Eq + Hash,
    N: fmt::Debug + fmt::Display + Ord + Clone + Eq + Hash,
{
    pub action: Vec<BTreeMap<T, Action>>,
    pub goto: Vec<BTreeMap<N, usize>>,
}

impl<T, N> ParseTable<T, N>
where
    T: fmt::Debug + fmt::Display + Ord + Clone + Eq + Hash,
    N: fmt::Debug + fmt::Display + Ord + Clone + Eq + Hash,
{
    /// Generate a canonical LR(1) parse table for `grammar`
    pub fn generate(grammar: &Grammar<T, N>) -> Result<Self, GenerationError<T, N>> {
        let first_sets = FirstSets::compute(grammar);
        let collection = CanonicalCollection::generate(grammar, &first_sets);
        Self::from_collection(grammar, &collection)
    }

    /// Fill the tables from an already computed canonical collection
    ///
    /// * dot at the end of rule 0: accept on the end marker
    /// * dot at the end of any other rule: reduce on the item's lookahead
    /// * dot before a terminal: shift to GOTO(state, terminal)
    /// * dot before a nonterminal: goto entry
    ///
    /// Writing a second, different action into an occupied slot is a conflict.
    pub fn from_collection(
        grammar: &Grammar<T, N>,
        collection: &CanonicalCollection<T, N>,
    ) -> Result<Self, GenerationError<T, N>> {
        let mut action = vec![BTreeMap::new(); collection.len()];
        let mut goto = vec![BTreeMap::new(); collection.len()];

        for (state_idx, items) in collection.states.iter().enumerate() {
            for item in items.iter() {
                match item.next_symbol(grammar) {
                    None if item.rule_idx == 0 => {
                        Self::insert_action(
                            &mut action[state_idx],
                            state_idx,
                            grammar.end.clone(),
                            Action::Accept,
                        )?;
                    }
                    None => {
                        Self::insert_action(
                            &mut action[state_idx],
                            state_idx,
                            item.lookahead.clone(),
                            Action::Reduce(item.rule_idx),
                        )?;
                    }
                    Some(symbol) => {
                        let next_state = collection.transitions[state_idx][symbol];
                        match symbol {
                            Symbol::Terminal(t) => {
                                Self::insert_action(
                                    &mut action[state_idx],
                                    state_idx,
                                    t.clone(),
                                    Action::Shift(next_state),
                                )?;
                            }
                            Symbol::Nonterminal(n) => {
                                goto[state_idx].insert(n.clone(), next_state);
                            }
                        }
                    }
                }
            }
        }

        Ok(ParseTable { action, goto })
    }

    pub fn action(&self, state: usize, terminal: &T) -> Option<Action> {
        self.action.get(state).and_then(|row| row.get(terminal)).cloned()
    }

    pub fn goto(&self, state: usize, nonterminal: &N) -> Option<usize> {
        self.goto.get(state).and_then(|row| row.get(nonterminal)).cloned()
    }

    pub fn state_count(&self) -> usize {
        self.action.len()
    }

    fn insert_action(
        row: &mut BTreeMap<T, Action>,
        state: usize,
        terminal: T,
        action: Action,
    ) -> Result<(), GenerationError<T, N>> {
        match row.get(&terminal) {
            Some(existing) if *existing != action => Err(GenerationError::Conflict {
                state,
                lookahead: terminal,
                existing: *existing,
                incoming: action,
            }),
            Some(_) => Ok(()),
            None => {
                row.insert(terminal, action);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{goto, Rule};
    use matches::assert_matches;
    use std::collections::HashSet;

    // Helper macros enabling more declarative tests
    macro_rules! symbols {
        ($n:ident: $($i:ident),+) => {
            #[derive(Debug, PartialOrd, Ord, Clone, PartialEq, Eq, Hash)]
            enum $n {
                $($i),+
            }
            impl fmt::Display for $n {
                fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
                    match self {
                        $(
                            $n::$i => {
                                write!(f, "{}", stringify!($i))
                            }
                        ),+
                    }
                }
            }
        }
    }
    macro_rules! terminals {
        ($($i:ident),+) => {
            symbols! { T: $($i),+ }
            impl From<T> for Symbol<T, N> {
                fn from(t: T) -> Symbol<T, N> {
                    Symbol::Terminal(t)
                }
            }
        }
    }
    macro_rules! nonterminals {
        ($($i:ident),+) => {
            symbols! { N: $($i),+ }
            impl From<N> for Symbol<T, N> {
                fn from(n: N) -> Symbol<T, N> {
                    Symbol::Nonterminal(n)
                }
            }
        }
    }
    macro_rules! rule {
        ($lhs:expr => $($rhs:expr),*) => {
            Rule { lhs: $lhs, rhs: vec![$($rhs.into()),*] }
        }
    }

    #[test]
    fn test_multiple_start_rules_accept() {
        nonterminals! { Start, S }
        terminals! { A, B, End }

        let rules = vec![
            rule![N::Start => N::S],
            rule![N::S => T::A],
            rule![N::S => T::B],
        ];
        let grammar = Grammar::new(T::End, rules).unwrap();

        let parse_table = ParseTable::generate(&grammar).unwrap();

        assert_matches!(parse_table.action(0, &T::A), Some(Action::Shift(_)));
        assert_matches!(parse_table.action(0, &T::B), Some(Action::Shift(_)));
        let accepting = parse_table.goto(0, &N::S).unwrap();
        assert_matches!(parse_table.action(accepting, &T::End), Some(Action::Accept));
    }

    #[test]
    fn test_canonical_lr1_grammar_that_is_not_lalr() {
        // Merging the states reached by `a c` and `b c` (as LALR would) creates a
        // reduce/reduce conflict between A → c and B → c.
        nonterminals! { Start, S, A, B }
        terminals! { Ta, Tb, Tc, Td, Te, End }

        let rules = vec![
            rule![N::Start => N::S],
            rule![N::S => T::Ta, N::A, T::Td],
            rule![N::S => T::Tb, N::B, T::Td],
            rule![N::S => T::Ta, N::B, T::Te],
            rule![N::S => T::Tb, N::A, T::Te],
            rule![N::A => T::Tc],
            rule![N::B => T::Tc],
        ];
        let grammar = Grammar::new(T::End, rules).unwrap();

        let parse_table = ParseTable::generate(&grammar).unwrap();

        let after_a = match parse_table.action(0, &T::Ta) {
            Some(Action::Shift(state)) => state,
            other => panic!("expected shift, got {:?}", other),
        };
        let after_ac = match parse_table.action(after_a, &T::Tc) {
            Some(Action::Shift(state)) => state,
            other => panic!("expected shift, got {:?}", other),
        };
        assert_eq!(parse_table.action(after_ac, &T::Td), Some(Action::Reduce(5)));
        assert_eq!(parse_table.action(after_ac, &T::Te), Some(Action::Reduce(6)));
    }

    #[test]
    fn test_shift_reduce_conflict() {
        nonterminals! { Start, E }
        terminals! { Plus, Id, End }

        let rules = vec![
            rule![N::Start => N::E],
            rule![N::E => N::E, T::Plus, N::E],
            rule![N::E => T::Id],
        ];
        let grammar = Grammar::new(T::End, rules).unwrap();

        match ParseTable::generate(&grammar) {
            Err(GenerationError::Conflict {
                lookahead,
                existing,
                incoming,
                ..
            }) => {
                assert_eq!(lookahead, T::Plus);
                assert_eq!(Action::conflict_kind(&existing, &incoming), "shift/reduce");
            }
            other => panic!("expected a conflict, got {:?}", other),
        }
    }

    #[test]
    fn test_reduce_reduce_conflict() {
        nonterminals! { Start, S, A, B }
        terminals! { X, End }

        let rules = vec![
            rule![N::Start => N::S],
            rule![N::S => N::A],
            rule![N::S => N::B],
            rule![N::A => T::X],
            rule![N::B => T::X],
        ];
        let grammar = Grammar::new(T::End, rules).unwrap();

        let err = ParseTable::generate(&grammar).unwrap_err();
        assert!(format!("{}", err).contains("reduce/reduce"));
        assert_matches!(
            err,
            GenerationError::Conflict {
                lookahead: T::End,
                existing: Action::Reduce(_),
                incoming: Action::Reduce(_),
                ..
            }
        );
    }

    #[test]
    fn test_epsilon_rule_reduces_on_lookahead() {
        nonterminals! { Start, L }
        terminals! { A, End }

        let rules = vec![
            rule![N::Start => N::L],
            rule![N::L => N::L, T::A],
            rule![N::L =>],
        ];
        let grammar = Grammar::new(T::End, rules).unwrap();

        let parse_table = ParseTable::generate(&grammar).unwrap();

        assert_eq!(parse_table.action(0, &T::A), Some(Action::Reduce(2)));
        assert_eq!(parse_table.action(0, &T::End), Some(Action::Reduce(2)));
    }

    #[test]
    fn test_collection_has_no_duplicate_states() {
        nonterminals! { Start, E, Term }
        terminals! { Plus, Times, Id, Open, Close, End }

        let rules = vec![
            rule![N::Start => N::E],
            rule![N::E => N::E, T::Plus, N::Term],
            rule![N::E => N::Term],
            rule![N::Term => N::Term, T::Times, T::Id],
            rule![N::Term => T::Open, N::E, T::Close],
            rule![N::Term => T::Id],
        ];
        let grammar = Grammar::new(T::End, rules).unwrap();
        let first_sets = FirstSets::compute(&grammar);
        let collection = CanonicalCollection::generate(&grammar, &first_sets);

        let distinct: HashSet<_> = collection.states.iter().collect();
        assert_eq!(distinct.len(), collection.len());

        // Re-closing every transition target finds a known state: the fixed point holds.
        for (state_idx, state) in collection.states.iter().enumerate() {
            for (symbol, &target) in collection.transitions[state_idx].iter() {
                let next_state = goto(&grammar, &first_sets, state, symbol);
                assert_eq!(collection.find(&next_state), Some(target));
            }
        }
    }

    #[test]
    fn test_undefined_nonterminal() {
        nonterminals! { Start, Missing }
        terminals! { End }

        let rules = vec![rule![N::Start => N::Missing]];
        assert_matches!(
            Grammar::new(T::End, rules),
            Err(GenerationError::UndefinedNonterminal(N::Missing))
        );
    }
}
