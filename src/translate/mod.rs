/*
    This module converts between right-linear grammars and automata
*/

use std::collections::BTreeMap;
use std::fmt::Display;

use crate::automaton::{Automaton, Label, StateSet, TransitionMap};
use crate::error_handling::ErrorType;
use crate::grammar::{display_alternative, Alternative, Grammar, Rewrite, Symbol};

#[derive(Debug, PartialEq)]
pub enum TranslateErrorType {
    // A production is not of the form ε, t, tB or B
    NotRightLinear { nonterminal: String, alternative: String },
}

impl ErrorType for TranslateErrorType {}

impl Display for TranslateErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranslateErrorType::NotRightLinear { nonterminal, alternative } => write!(
                f,
                "Production `{} → {}` is not right-linear and has no automaton equivalent",
                nonterminal, alternative
            ),
        }
    }
}

pub type Result<T> = std::result::Result<T, TranslateErrorType>;

fn check_right_linear(nonterminal: &str, alternative: &Alternative) -> Result<()> {
    match alternative.as_slice() {
        []
        | [Symbol::Terminal(_)]
        | [Symbol::Nonterminal(_)]
        | [Symbol::Terminal(_), Symbol::Nonterminal(_)] => Ok(()),
        _ => Err(TranslateErrorType::NotRightLinear {
            nonterminal: nonterminal.to_string(),
            alternative: display_alternative(alternative),
        }),
    }
}

// "accept", primed until it clashes with no nonterminal or terminal
fn accept_state_name(grammar: &Grammar) -> String {
    let mut name = "accept".to_string();
    while grammar.nonterminals().contains(&name) || grammar.terminals().contains(&name) {
        name.push('\'');
    }
    name
}

// Walks one alternative left to right, moving the current state along
fn add_alternative(transitions: &mut TransitionMap, nonterminal: &str, alternative: &Alternative, accept: &str) {
    if alternative.is_empty() {
        transitions.insert(nonterminal, Label::Epsilon, accept);
        return;
    }

    let mut current = nonterminal;
    for (i, symbol) in alternative.iter().enumerate() {
        match symbol {
            Symbol::Terminal(t) => {
                let target = match alternative.get(i + 1) {
                    Some(next) => next.text(),
                    None => accept,
                };
                transitions.insert(current, Label::symbol(t), target);
                current = target;
            }
            Symbol::Nonterminal(n) => {
                // Already standing on n when a terminal led here
                if current != n.as_str() {
                    transitions.insert(current, Label::Epsilon, n);
                    current = n.as_str();
                }
            }
        }
    }
}

// Only right-linear grammars are accepted; the check runs before any
// transition is built.
pub fn grammar_to_nfa(grammar: &Grammar) -> Result<Automaton> {
    for (nonterminal, alternative) in grammar.productions() {
        check_right_linear(nonterminal, alternative)?;
    }

    let accept = accept_state_name(grammar);
    let mut transitions = TransitionMap::new();
    for (nonterminal, alternative) in grammar.productions() {
        add_alternative(&mut transitions, nonterminal, alternative, &accept);
    }

    let mut states = grammar.nonterminals().clone();
    states.insert(accept.clone());

    tracing::debug!(states = states.len(), moves = transitions.len(), "translated grammar to automaton");

    Ok(Automaton::from_parts(
        states,
        grammar.terminals().clone(),
        transitions,
        grammar.start_symbol().to_string(),
        StateSet::from([accept]),
    ))
}

// Right-regular grammar with one nonterminal per state
pub fn automaton_to_grammar(automaton: &Automaton) -> Grammar {
    let mut rules: BTreeMap<String, Rewrite> = automaton
        .states()
        .iter()
        .map(|state| (state.clone(), Rewrite::new()))
        .collect();

    for state in automaton.accepting() {
        rules.entry(state.clone()).or_default().push(Alternative::new());
    }

    for (source, label, destination) in automaton.transitions().edges() {
        let target = Symbol::Nonterminal(destination.to_string());
        let alternative = match label {
            Label::Symbol(symbol) => vec![Symbol::Terminal(symbol.clone()), target],
            Label::Epsilon => vec![target],
        };
        rules.entry(source.to_string()).or_default().push(alternative);
    }

    Grammar::from_parts(
        automaton.start().to_string(),
        automaton.states().clone(),
        automaton.alphabet().clone(),
        rules,
    )
}
