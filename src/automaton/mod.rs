/*
    This module is for storing finite automata, deterministic or not
*/

pub mod simulation;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;

use itertools::Itertools;

use crate::error_handling::ErrorType;
use crate::grammar::EPSILON;

pub use simulation::{accepts, epsilon_closure, step};

pub type StateSet = BTreeSet<String>;

// What a transition consumes
#[derive(Debug, PartialEq, Eq, Clone, Hash, PartialOrd, Ord)]
pub enum Label {
    Symbol(String),
    Epsilon,
}

impl Label {
    pub fn symbol(text: &str) -> Self {
        Label::Symbol(text.to_string())
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Label::Symbol(s) => write!(f, "{}", s),
            Label::Epsilon => write!(f, "{}", EPSILON),
        }
    }
}

// (state, label) -> destinations. A missing key means no move.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct TransitionMap {
    moves: BTreeMap<(String, Label), StateSet>,
}

impl TransitionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, source: &str, label: Label, destination: &str) {
        self.moves
            .entry((source.to_string(), label))
            .or_default()
            .insert(destination.to_string());
    }

    pub fn get(&self, source: &str, label: &Label) -> Option<&StateSet> {
        // BTreeMap needs an owned key for tuple lookups
        self.moves.get(&(source.to_string(), label.clone()))
    }

    // Grouped view: one entry per (state, label)
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Label, &StateSet)> + '_ {
        self.moves
            .iter()
            .map(|((source, label), destinations)| (source.as_str(), label, destinations))
    }

    // Flat view: one entry per single edge
    pub fn edges(&self) -> impl Iterator<Item = (&str, &Label, &str)> + '_ {
        self.iter().flat_map(|(source, label, destinations)| {
            destinations.iter().map(move |d| (source, label, d.as_str()))
        })
    }

    // Transitions leaving one state
    #[cfg(test)]
    pub(crate) fn from_state<'a>(&'a self, source: &'a str) -> impl Iterator<Item = (&'a Label, &'a StateSet)> + 'a {
        self.iter()
            .filter(move |(s, _, _)| *s == source)
            .map(|(_, label, destinations)| (label, destinations))
    }

    pub(crate) fn len(&self) -> usize {
        self.moves.len()
    }
}

#[derive(Debug, PartialEq)]
pub enum AutomatonErrorType {
    // A state is used but not declared
    UnknownState(String),
    // A transition reads a symbol outside the alphabet
    UnknownSymbol(String),
    // Alphabet symbols must have at least one character
    EmptySymbol,
    // A state shares its name with an alphabet symbol
    OverlappingSymbol(String),
}

impl ErrorType for AutomatonErrorType {}

impl Display for AutomatonErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AutomatonErrorType::UnknownState(s) => write!(f, "State `{}` is not declared", s),
            AutomatonErrorType::UnknownSymbol(s) => write!(f, "Symbol `{}` is not in the alphabet", s),
            AutomatonErrorType::EmptySymbol => write!(f, "Empty alphabet symbol"),
            AutomatonErrorType::OverlappingSymbol(s) => write!(f, "`{}` is both a state and an alphabet symbol", s),
        }
    }
}

pub type Result<T> = std::result::Result<T, AutomatonErrorType>;

#[derive(Debug, PartialEq, Clone)]
pub struct Automaton {
    states: StateSet,
    alphabet: BTreeSet<String>,
    transitions: TransitionMap,
    start: String,
    accepting: StateSet,
}

impl Automaton {
    pub fn new(
        states: StateSet,
        alphabet: BTreeSet<String>,
        transitions: TransitionMap,
        start: String,
        accepting: StateSet,
    ) -> Result<Self> {
        let automaton = Automaton { states, alphabet, transitions, start, accepting };
        automaton.validate()?;
        Ok(automaton)
    }

    // For algorithms whose output satisfies the invariants by construction
    pub(crate) fn from_parts(
        states: StateSet,
        alphabet: BTreeSet<String>,
        transitions: TransitionMap,
        start: String,
        accepting: StateSet,
    ) -> Self {
        let automaton = Automaton { states, alphabet, transitions, start, accepting };
        debug_assert_eq!(automaton.validate(), Ok(()));
        automaton
    }

    fn validate(&self) -> Result<()> {
        if self.alphabet.iter().any(String::is_empty) {
            return Err(AutomatonErrorType::EmptySymbol);
        }
        if let Some(overlap) = self.states.intersection(&self.alphabet).next() {
            return Err(AutomatonErrorType::OverlappingSymbol(overlap.clone()));
        }

        let known = |state: &String| {
            if self.states.contains(state) {
                Ok(())
            } else {
                Err(AutomatonErrorType::UnknownState(state.clone()))
            }
        };

        known(&self.start)?;
        self.accepting.iter().try_for_each(known)?;

        for (source, label, destinations) in self.transitions.iter() {
            known(&source.to_string())?;
            destinations.iter().try_for_each(known)?;
            if let Label::Symbol(symbol) = label {
                if !self.alphabet.contains(symbol) {
                    return Err(AutomatonErrorType::UnknownSymbol(symbol.clone()));
                }
            }
        }

        Ok(())
    }

    pub fn states(&self) -> &StateSet {
        &self.states
    }

    pub fn alphabet(&self) -> &BTreeSet<String> {
        &self.alphabet
    }

    pub fn transitions(&self) -> &TransitionMap {
        &self.transitions
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn accepting(&self) -> &StateSet {
        &self.accepting
    }

    pub fn is_accepting(&self, state: &str) -> bool {
        self.accepting.contains(state)
    }

    pub fn has_epsilon_moves(&self) -> bool {
        self.transitions.iter().any(|(_, label, _)| *label == Label::Epsilon)
    }
}

impl Display for Automaton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "States: {}", self.states.iter().join(", "))?;
        writeln!(f, "Alphabet: {}", self.alphabet.iter().join(", "))?;
        writeln!(f, "Initial State: {}", self.start)?;
        writeln!(f, "Final States: {}", self.accepting.iter().join(", "))?;
        writeln!(f, "Transitions:")?;
        for (source, label, destination) in self.transitions.edges() {
            writeln!(f, "  {} --{}--> {}", source, label, destination)?;
        }
        Ok(())
    }
}
