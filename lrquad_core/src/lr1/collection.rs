use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt;
use std::hash::Hash;

use crate::lr1::item::dot_symbols;
use crate::{FirstSets, Grammar, Item, ItemSet, Symbol};

/// Canonical collection of LR(1) item sets
///
/// `states[0]` is the closure of the start item `(rule 0, dot 0, end)`. No two states are
/// set-equal. `transitions[s]` maps every symbol that appears after a dot in state `s` to
/// the index of GOTO(s, symbol).
#[derive(Debug, Clone)]
pub struct CanonicalCollection<T, N>
where
    T: fmt::Debug + fmt::Display + Ord + Clone + Eq + Hash,
    N: fmt::Debug + fmt::Display + Ord + Clone + Eq + Hash,
{
    pub states: Vec<ItemSet<T>>,
    pub transitions: Vec<BTreeMap<Symbol<T, N>, usize>>,
}

impl<T, N> CanonicalCollection<T, N>
where
    T: fmt::Debug + fmt::Display + Ord + Clone + Eq + Hash,
    N: fmt::Debug + fmt::Display + Ord + Clone + Eq + Hash,
{
    pub fn generate(grammar: &Grammar<T, N>, first_sets: &FirstSets<T, N>) -> Self {
        let mut start = ItemSet::new();
        start.insert(Item::new(0, grammar.end.clone()));
        let start = closure(grammar, first_sets, start);

        let mut states = vec![start.clone()];
        let mut transitions = vec![BTreeMap::new()];
        let mut index = HashMap::<ItemSet<T>, usize>::new();
        index.insert(start, 0);

        let mut next_states = VecDeque::<usize>::new();
        next_states.push_back(0);

        while let Some(current_state) = next_states.pop_front() {
            for symbol in dot_symbols(grammar, &states[current_state]) {
                let next_state = goto(grammar, first_sets, &states[current_state], &symbol);
                if next_state.is_empty() {
                    continue;
                }

                // Check for an existing state with the same item set and use that instead of
                // a new state if possible
                let idx = match index.get(&next_state) {
                    Some(&state_idx) => state_idx,
                    None => {
                        let idx = states.len();
                        states.push(next_state.clone());
                        transitions.push(BTreeMap::new());
                        index.insert(next_state, idx);
                        next_states.push_back(idx);
                        idx
                    }
                };

                transitions[current_state].insert(symbol, idx);
            }
        }

        CanonicalCollection {
            states,
            transitions,
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Index of the state that is set-equal to `items`, if any.
    pub fn find(&self, items: &ItemSet<T>) -> Option<usize> {
        self.states.iter().position(|state| state == items)
    }
}

/// Expand an item set with every item implied by a nonterminal after a dot
///
/// For an item `A → α • B β {a}` this adds `B → • γ {b}` for every rule of `B` and every
/// `b` in FIRST(β a). Repeats until nothing new is added; the item space is finite.
pub fn closure<T, N>(
    grammar: &Grammar<T, N>,
    first_sets: &FirstSets<T, N>,
    items: ItemSet<T>,
) -> ItemSet<T>
where
    T: fmt::Debug + fmt::Display + Ord + Clone + Eq + Hash,
    N: fmt::Debug + fmt::Display + Ord + Clone + Eq + Hash,
{
    let mut closure = items;
    let mut unclosed: Vec<Item<T>> = closure.iter().cloned().collect();

    while let Some(item) = unclosed.pop() {
        if let Some(Symbol::Nonterminal(n)) = item.next_symbol(grammar) {
            let lookaheads = item.lookahead_set(grammar, first_sets);
            for (rule_idx, _) in grammar.rules_for(n) {
                for lookahead in lookaheads.iter() {
                    let new_item = Item::new(rule_idx, lookahead.clone());
                    if !closure.contains(&new_item) {
                        closure.insert(new_item.clone());
                        unclosed.push(new_item);
                    }
                }
            }
        }
    }

    closure
}

/// Advance the dot over `symbol` in every item of `items` that allows it, then close.
pub fn goto<T, N>(
    grammar: &Grammar<T, N>,
    first_sets: &FirstSets<T, N>,
    items: &ItemSet<T>,
    symbol: &Symbol<T, N>,
) -> ItemSet<T>
where
    T: fmt::Debug + fmt::Display + Ord + Clone + Eq + Hash,
    N: fmt::Debug + fmt::Display + Ord + Clone + Eq + Hash,
{
    let kernel: ItemSet<T> = items
        .iter()
        .filter(|item| item.next_symbol(grammar) == Some(symbol))
        .map(Item::advance)
        .collect();
    closure(grammar, first_sets, kernel)
}
