use super::{Automaton, Label, StateSet};

// All states reachable from `states` through epsilon moves alone,
// including `states` themselves. Each state is expanded at most once.
pub fn epsilon_closure(automaton: &Automaton, states: &StateSet) -> StateSet {
    let mut closure = states.clone();
    let mut worklist: Vec<&str> = states.iter().map(String::as_str).collect();

    while let Some(state) = worklist.pop() {
        let Some(destinations) = automaton.transitions().get(state, &Label::Epsilon) else {
            continue;
        };
        for destination in destinations {
            if closure.insert(destination.clone()) {
                worklist.push(destination);
            }
        }
    }

    closure
}

// The epsilon closed set of states after reading one symbol
pub fn step(automaton: &Automaton, states: &StateSet, symbol: &str) -> StateSet {
    let label = Label::symbol(symbol);
    let reached: StateSet = states
        .iter()
        .filter_map(|state| automaton.transitions().get(state, &label))
        .flatten()
        .cloned()
        .collect();

    epsilon_closure(automaton, &reached)
}

pub fn accepts<I, S>(automaton: &Automaton, input: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut current = epsilon_closure(automaton, &StateSet::from([automaton.start().to_string()]));

    for symbol in input {
        current = step(automaton, &current, symbol.as_ref());
        if current.is_empty() {
            tracing::trace!(symbol = symbol.as_ref(), "no states left");
            return false;
        }
    }

    current.iter().any(|state| automaton.is_accepting(state))
}
