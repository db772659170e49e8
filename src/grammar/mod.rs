/*
    This module is for storing and inspecting grammars
*/

pub mod classifier;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;

use itertools::Itertools;

use crate::error_handling::ErrorType;

pub use classifier::{classify, ChomskyType};

// How an empty alternative is written
pub const EPSILON: &str = "ε";

// The base unit in a grammar rule
#[derive(Debug, PartialEq, Eq, Clone, Hash, PartialOrd, Ord)]
pub enum Symbol {
    Terminal(String),
    Nonterminal(String),
}

impl Symbol {
    pub fn text(&self) -> &str {
        match self {
            Symbol::Terminal(t) | Symbol::Nonterminal(t) => t,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text())
    }
}

// The symbols in a single alternative, empty for epsilon
pub type Alternative = Vec<Symbol>;

// The alternatives of a rewrite rule
pub type Rewrite = Vec<Alternative>;

pub fn display_alternative(alternative: &Alternative) -> String {
    if alternative.is_empty() {
        EPSILON.to_string()
    } else {
        alternative.iter().join("")
    }
}

#[derive(Debug, PartialEq)]
pub enum GrammarErrorType {
    // A symbol is declared both terminal and nonterminal
    OverlappingSymbol(String),
    // A rule or alternative uses a nonterminal that is not declared
    UndefinedNonterminal(String),
    // An alternative uses a terminal that is not declared
    UndefinedTerminal(String),
    // The start symbol has no rule
    MissingStartRules(String),
    // Terminals must have at least one character
    EmptyTerminal,
}

impl ErrorType for GrammarErrorType {}

impl Display for GrammarErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GrammarErrorType::OverlappingSymbol(s) => write!(f, "`{}` is both a terminal and a nonterminal", s),
            GrammarErrorType::UndefinedNonterminal(s) => write!(f, "Nonterminal `{}` is not declared", s),
            GrammarErrorType::UndefinedTerminal(s) => write!(f, "Terminal `{}` is not declared", s),
            GrammarErrorType::MissingStartRules(s) => write!(f, "Start symbol `{}` has no rule", s),
            GrammarErrorType::EmptyTerminal => write!(f, "Empty terminal (write `ε` for an empty alternative)"),
        }
    }
}

pub type Result<T> = std::result::Result<T, GrammarErrorType>;

#[derive(Debug, PartialEq, Clone)]
pub struct Grammar {
    start_symbol: String,
    nonterminals: BTreeSet<String>,
    terminals: BTreeSet<String>,
    rules: BTreeMap<String, Rewrite>,
}

impl Grammar {
    pub fn new(
        start_symbol: String,
        nonterminals: BTreeSet<String>,
        terminals: BTreeSet<String>,
        rules: BTreeMap<String, Rewrite>,
    ) -> Result<Self> {
        let grammar = Grammar { start_symbol, nonterminals, terminals, rules };
        grammar.validate()?;
        Ok(grammar)
    }

    // For builders whose output satisfies the invariants by construction
    pub(crate) fn from_parts(
        start_symbol: String,
        nonterminals: BTreeSet<String>,
        terminals: BTreeSet<String>,
        rules: BTreeMap<String, Rewrite>,
    ) -> Self {
        let grammar = Grammar { start_symbol, nonterminals, terminals, rules };
        debug_assert_eq!(grammar.validate(), Ok(()));
        grammar
    }

    fn validate(&self) -> Result<()> {
        if let Some(overlap) = self.nonterminals.intersection(&self.terminals).next() {
            return Err(GrammarErrorType::OverlappingSymbol(overlap.clone()));
        }
        if self.terminals.iter().any(String::is_empty) {
            return Err(GrammarErrorType::EmptyTerminal);
        }
        if !self.rules.contains_key(&self.start_symbol) {
            return Err(GrammarErrorType::MissingStartRules(self.start_symbol.clone()));
        }

        for (lhs, rewrite) in &self.rules {
            if !self.nonterminals.contains(lhs) {
                return Err(GrammarErrorType::UndefinedNonterminal(lhs.clone()));
            }
            for symbol in rewrite.iter().flatten() {
                match symbol {
                    Symbol::Nonterminal(n) if !self.nonterminals.contains(n) => {
                        return Err(GrammarErrorType::UndefinedNonterminal(n.clone()))
                    }
                    Symbol::Terminal(t) if !self.terminals.contains(t) => {
                        return Err(GrammarErrorType::UndefinedTerminal(t.clone()))
                    }
                    _ => {}
                }
            }
        }

        Ok(())
    }

    // The same grammar rooted at another nonterminal
    pub fn with_start(&self, start_symbol: &str) -> Result<Self> {
        Grammar::new(
            start_symbol.to_string(),
            self.nonterminals.clone(),
            self.terminals.clone(),
            self.rules.clone(),
        )
    }

    pub fn start_symbol(&self) -> &str {
        &self.start_symbol
    }

    pub fn nonterminals(&self) -> &BTreeSet<String> {
        &self.nonterminals
    }

    pub fn terminals(&self) -> &BTreeSet<String> {
        &self.terminals
    }

    pub fn rules(&self) -> &BTreeMap<String, Rewrite> {
        &self.rules
    }

    // The alternatives of a nonterminal, empty when it has no rule
    pub fn rewrite(&self, nonterminal: &str) -> &[Alternative] {
        self.rules.get(nonterminal).map(Vec::as_slice).unwrap_or(&[])
    }

    // Every production as (lhs, rhs)
    pub fn productions(&self) -> impl Iterator<Item = (&str, &Alternative)> + '_ {
        self.rules
            .iter()
            .flat_map(|(lhs, rewrite)| rewrite.iter().map(move |rhs| (lhs.as_str(), rhs)))
    }
}

impl Display for Grammar {
    // One line per rule, start symbol first
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ordered = std::iter::once(self.start_symbol.as_str())
            .chain(self.rules.keys().map(String::as_str).filter(|k| *k != self.start_symbol));

        for lhs in ordered {
            let alternatives = self.rewrite(lhs).iter().map(display_alternative).join(" | ");
            writeln!(f, "{} → {}", lhs, alternatives)?;
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub fn t(text: &str) -> Symbol {
        Symbol::Terminal(text.to_string())
    }

    pub fn n(text: &str) -> Symbol {
        Symbol::Nonterminal(text.to_string())
    }

    pub fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    // S → aS | bS | cR | dL, R → dL | e, L → fL | eL | d
    pub fn variant_grammar() -> Grammar {
        let mut rules = BTreeMap::new();
        rules.insert("S".to_string(), vec![
            vec![t("a"), n("S")],
            vec![t("b"), n("S")],
            vec![t("c"), n("R")],
            vec![t("d"), n("L")],
        ]);
        rules.insert("R".to_string(), vec![vec![t("d"), n("L")], vec![t("e")]]);
        rules.insert("L".to_string(), vec![
            vec![t("f"), n("L")],
            vec![t("e"), n("L")],
            vec![t("d")],
        ]);

        Grammar::new(
            "S".to_string(),
            set(&["S", "R", "L"]),
            set(&["a", "b", "c", "d", "e", "f"]),
            rules,
        ).unwrap()
    }

    #[test]
    fn valid_grammar_accessors() {
        let grammar = variant_grammar();
        assert_eq!(grammar.start_symbol(), "S");
        assert_eq!(grammar.rewrite("R").len(), 2);
        assert!(grammar.rewrite("X").is_empty());
        assert_eq!(grammar.productions().count(), 9);
    }

    #[test]
    fn reject_malformed_grammars() {
        let mut rules = BTreeMap::new();
        rules.insert("S".to_string(), vec![vec![t("a"), n("T")]]);
        assert_eq!(
            Grammar::new("S".to_string(), set(&["S"]), set(&["a"]), rules.clone()),
            Err(GrammarErrorType::UndefinedNonterminal("T".to_string()))
        );

        rules.insert("S".to_string(), vec![vec![t("z")]]);
        assert_eq!(
            Grammar::new("S".to_string(), set(&["S"]), set(&["a"]), rules.clone()),
            Err(GrammarErrorType::UndefinedTerminal("z".to_string()))
        );

        assert_eq!(
            Grammar::new("Q".to_string(), set(&["S", "Q"]), set(&["z"]), rules.clone()),
            Err(GrammarErrorType::MissingStartRules("Q".to_string()))
        );

        assert_eq!(
            Grammar::new("S".to_string(), set(&["S", "z"]), set(&["z"]), rules),
            Err(GrammarErrorType::OverlappingSymbol("z".to_string()))
        );
    }

    #[test]
    fn rerooting_checks_the_new_start() {
        let grammar = variant_grammar();
        assert_eq!(grammar.with_start("L").unwrap().start_symbol(), "L");
        assert_eq!(
            grammar.with_start("Z"),
            Err(GrammarErrorType::MissingStartRules("Z".to_string()))
        );
    }

    #[test]
    fn display_lists_start_rule_first() {
        let text = variant_grammar().to_string();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "S → aS | bS | cR | dL");
        assert!(lines.contains(&"R → dL | e"));
    }

    #[test]
    fn epsilon_alternative_display() {
        assert_eq!(display_alternative(&vec![]), "ε");
        assert_eq!(display_alternative(&vec![t("a"), n("B")]), "aB");
    }
}
