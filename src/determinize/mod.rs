/*
    This module checks and enforces determinism of automata
*/

pub mod subset;

use indexmap::IndexSet;

use crate::automaton::{epsilon_closure, step, Automaton, Label, StateSet, TransitionMap};
use subset::{unique_names, StateTable, Subset};

// At most one destination per (state, symbol). Epsilon moves are not
// looked at.
pub fn is_deterministic(automaton: &Automaton) -> bool {
    automaton
        .transitions()
        .iter()
        .all(|(_, label, destinations)| *label == Label::Epsilon || destinations.len() <= 1)
}

// A move recorded during exploration. `None` is the shared dead state.
struct Move<'a> {
    source: usize,
    symbol: &'a str,
    target: Option<usize>,
}

// Ids of the subsets reachable from subset 0 along recorded moves
fn reachable_subsets(count: usize, moves: &[Move]) -> Vec<bool> {
    let mut successors = vec![Vec::new(); count];
    for m in moves {
        if let Some(target) = m.target {
            successors[m.source].push(target);
        }
    }

    let mut reachable = vec![false; count];
    let mut stack = vec![0];
    while let Some(id) = stack.pop() {
        if reachable[id] {
            continue;
        }
        reachable[id] = true;
        stack.extend(successors[id].iter().filter(|&&next| !reachable[next]));
    }
    reachable
}

// Subset construction. The start subset and every successor are epsilon
// closed, so epsilon moves in the input are honoured. DFA states are
// named after their member set, which makes the output reproducible.
pub fn determinize(nfa: &Automaton) -> Automaton {
    let table = StateTable::new(nfa);
    tracing::debug!(states = nfa.states().len(), epsilon_moves = nfa.has_epsilon_moves(), "determinizing");
    let initial = epsilon_closure(nfa, &StateSet::from([nfa.start().to_string()]));

    // Insertion order doubles as the breadth first queue
    let mut subsets: IndexSet<Subset> = IndexSet::new();
    subsets.insert(table.subset(&initial));
    let mut moves = Vec::new();

    let mut next = 0;
    while let Some(current) = subsets.get_index(next).cloned() {
        let current_states = table.states(&current);
        tracing::trace!(subset = %table.name(&current), "exploring");

        for symbol in nfa.alphabet() {
            let successor = table.subset(&step(nfa, &current_states, symbol));
            let target = if successor.is_empty() {
                None
            } else {
                Some(subsets.insert_full(successor).0)
            };
            moves.push(Move { source: next, symbol: symbol.as_str(), target });
        }
        next += 1;
    }

    let reachable = reachable_subsets(subsets.len(), &moves);
    assert!(reachable[0], "start subset is unreachable after determinization");

    let names = unique_names(&table, subsets.iter(), nfa.alphabet());
    let accepting: StateSet = subsets
        .iter()
        .enumerate()
        .filter(|(id, subset)| reachable[*id] && subset.iter().any(|&i| nfa.is_accepting(table.state(i))))
        .map(|(id, _)| names[id].clone())
        .collect();

    let states: StateSet = (0..subsets.len())
        .filter(|&id| reachable[id])
        .map(|id| names[id].clone())
        .collect();

    let mut transitions = TransitionMap::new();
    let mut dead_moves = 0;
    for m in &moves {
        match m.target {
            Some(target) if reachable[m.source] && reachable[target] => {
                transitions.insert(&names[m.source], Label::symbol(m.symbol), &names[target]);
            }
            Some(_) => {}
            None => dead_moves += 1,
        }
    }

    tracing::debug!(
        explored = subsets.len(),
        kept = states.len(),
        dead_moves,
        "determinized automaton"
    );

    Automaton::from_parts(
        states,
        nfa.alphabet().clone(),
        transitions,
        names[0].clone(),
        accepting,
    )
}
