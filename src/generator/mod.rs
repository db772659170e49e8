/*
    This module generates sample sentences by random derivation
*/

use std::fmt::Display;

use itertools::Itertools;
use rand::prelude::*;

use crate::error_handling::ErrorType;
use crate::grammar::*;

#[derive(Debug, PartialEq)]
pub enum GenerateErrorType {
    // A nonterminal with no alternatives was reached
    NoAlternatives(String),
    // The sentence grew past the length limit
    TooLong(usize),
    // Too many rewrites without finishing
    TooDeep(usize),
}

impl ErrorType for GenerateErrorType {}

impl Display for GenerateErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerateErrorType::NoAlternatives(nonterminal) => write!(f, "No alternatives for nonterminal `{}`", nonterminal),
            GenerateErrorType::TooLong(limit) => write!(f, "Sentence longer than {} symbols", limit),
            GenerateErrorType::TooDeep(limit) => write!(f, "Derivation did not finish within {} steps", limit),
        }
    }
}

pub type GenResult<T> = std::result::Result<T, GenerateErrorType>;

// A generated sentence and the rewrites that produced it
#[derive(Debug, PartialEq, Clone)]
pub struct Derivation {
    pub sentence: Vec<String>,
    pub steps: Vec<String>,
}

impl Derivation {
    pub fn text(&self) -> String {
        self.sentence.concat()
    }
}

impl Display for Derivation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.text(), self.steps.iter().join(" "))
    }
}

fn step_limit(max_length: usize) -> usize {
    (max_length + 1) * 8
}

// Leftmost derivation from the start symbol, choosing alternatives at random
pub fn generate(grammar: &Grammar, rng: &mut impl Rng, max_length: usize) -> GenResult<Derivation> {
    let limit = step_limit(max_length);
    let mut form = vec![Symbol::Nonterminal(grammar.start_symbol().to_string())];
    let mut steps = Vec::new();

    while let Some(position) = form.iter().position(|symbol| !symbol.is_terminal()) {
        if steps.len() >= limit {
            return Err(GenerateErrorType::TooDeep(limit));
        }

        let nonterminal = form[position].text().to_string();
        let alternative = grammar
            .rewrite(&nonterminal)
            .choose(rng)
            .ok_or_else(|| GenerateErrorType::NoAlternatives(nonterminal.clone()))?;

        steps.push(format!("{}→{}", nonterminal, display_alternative(alternative)));
        form.splice(position..=position, alternative.iter().cloned());

        if form.iter().filter(|symbol| symbol.is_terminal()).count() > max_length {
            return Err(GenerateErrorType::TooLong(max_length));
        }
    }

    Ok(Derivation {
        sentence: form.iter().map(|symbol| symbol.text().to_string()).collect(),
        steps,
    })
}

// Up to `count` sentences, giving up after ten failed tries per sentence
pub fn generate_many(grammar: &Grammar, rng: &mut impl Rng, count: usize, max_length: usize) -> Vec<Derivation> {
    let mut derivations = Vec::with_capacity(count);
    let mut attempts = 0;

    while derivations.len() < count && attempts < count * 10 {
        attempts += 1;
        match generate(grammar, rng, max_length) {
            Ok(derivation) => derivations.push(derivation),
            Err(e) => tracing::trace!(attempt = attempts, "discarded derivation: {}", e),
        }
    }

    tracing::debug!(generated = derivations.len(), attempts, "generated sentences");
    derivations
}
