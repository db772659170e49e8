use indexmap::IndexMap;

use crate::grammar::Symbol::Nonterminal;
use super::CompileErrorType::UndefinedNonterminal;
use super::{Alternative, CompileError, CompileErrors, FileResult, Location, Rewrite};

// Rules in file order, each with the line that first defined it
pub type IntermediateRuleset = IndexMap<String, (Rewrite, Location)>;

fn get_alternative_undefined_symbols(alternative: &Alternative, location: &Location, rules: &IntermediateRuleset) -> CompileErrors {
    // Filter out everything but nonterminals and unwrap the text from the
    // nonterminals. Then filter out all the undefined nonterminals.
    alternative.iter()
        .filter_map(|symbol| match symbol {
            Nonterminal(symbol) => Some(symbol),
            _ => None
        })
        .filter(|symbol| !rules.contains_key(*symbol))
        .map(|symbol_text| CompileError {
            location: location.to_owned(),
            error: UndefinedNonterminal(symbol_text.to_owned())
        })
        .collect()
}

fn get_rewrite_undefined_symbols(rewrite: &Rewrite, location: &Location, rules: &IntermediateRuleset) -> CompileErrors {
    rewrite.iter()
        .flat_map(|alternative| get_alternative_undefined_symbols(alternative, location, rules))
        .collect()
}

fn get_undefined_symbols(rules: &IntermediateRuleset) -> CompileErrors {
    rules.values()
        .flat_map(|(rewrite, location)| get_rewrite_undefined_symbols(rewrite, location, rules))
        .collect()
}

pub fn verify_rules(rules: &IntermediateRuleset) -> FileResult<()> {
    let errors = get_undefined_symbols(rules);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
