use std::fmt::Display;

use super::{Alternative, Grammar, Symbol};

// Chomsky hierarchy, strictest first
#[derive(Debug, PartialEq, Eq, Clone, Copy, PartialOrd, Ord)]
pub enum ChomskyType {
    Type3,
    Type2,
    Type1,
    Type0,
}

impl Display for ChomskyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChomskyType::Type3 => write!(f, "Type 3 (Regular Grammar)"),
            ChomskyType::Type2 => write!(f, "Type 2 (Context-Free Grammar)"),
            ChomskyType::Type1 => write!(f, "Type 1 (Context-Sensitive Grammar)"),
            ChomskyType::Type0 => write!(f, "Type 0 (Unrestricted Grammar)"),
        }
    }
}

// A single terminal, or a terminal followed by a nonterminal
pub fn is_right_linear(rhs: &Alternative) -> bool {
    matches!(
        rhs.as_slice(),
        [Symbol::Terminal(_)] | [Symbol::Terminal(_), Symbol::Nonterminal(_)]
    )
}

fn is_context_free(grammar: &Grammar, lhs: &str) -> bool {
    grammar.nonterminals().contains(lhs)
}

// The left hand side is always one symbol long, so an epsilon
// alternative never passes
fn is_non_contracting(rhs: &Alternative) -> bool {
    !rhs.is_empty()
}

pub fn classify(grammar: &Grammar) -> ChomskyType {
    let mut regular = true;
    let mut context_free = true;
    let mut context_sensitive = true;

    for (lhs, rhs) in grammar.productions() {
        regular &= is_right_linear(rhs);
        context_free &= is_context_free(grammar, lhs);
        context_sensitive &= is_non_contracting(rhs);
    }

    tracing::debug!(regular, context_free, context_sensitive, "classified grammar");

    if regular {
        ChomskyType::Type3
    } else if context_free {
        ChomskyType::Type2
    } else if context_sensitive {
        ChomskyType::Type1
    } else {
        ChomskyType::Type0
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::iter::zip;

    use super::*;
    use crate::grammar::tests::{n, set, t, variant_grammar};

    fn single_rule_grammar(rewrite: Vec<Alternative>) -> Grammar {
        let mut rules = BTreeMap::new();
        rules.insert("S".to_string(), rewrite);
        Grammar::new("S".to_string(), set(&["S", "A"]), set(&["a", "b"]), rules).unwrap()
    }

    #[test]
    fn classify_variant_grammar_as_regular() {
        assert_eq!(classify(&variant_grammar()), ChomskyType::Type3);
    }

    #[test]
    fn classify_production_shapes() {
        let rewrites = vec![
            vec![vec![t("a")], vec![t("b"), n("S")]],
            vec![vec![t("a"), n("S"), t("b")]],
            vec![vec![n("A")]],
            vec![vec![t("a"), t("b")]],
            vec![vec![t("a"), n("S")], vec![]],
        ];
        let answers = vec![
            ChomskyType::Type3,
            ChomskyType::Type2,
            ChomskyType::Type2,
            ChomskyType::Type2,
            ChomskyType::Type2,
        ];

        for (rewrite, answer) in zip(rewrites, answers) {
            assert_eq!(classify(&single_rule_grammar(rewrite)), answer);
        }
    }

    #[test]
    fn epsilon_is_never_non_contracting() {
        assert!(!is_non_contracting(&vec![]));
        assert!(is_non_contracting(&vec![t("a")]));
    }

    #[test]
    fn regular_grammars_pass_the_weaker_checks() {
        let grammar = variant_grammar();
        assert_eq!(classify(&grammar), ChomskyType::Type3);
        for (lhs, rhs) in grammar.productions() {
            assert!(is_context_free(&grammar, lhs));
            assert!(is_non_contracting(rhs));
        }
    }

    #[test]
    fn display_names() {
        assert_eq!(ChomskyType::Type3.to_string(), "Type 3 (Regular Grammar)");
        assert_eq!(ChomskyType::Type0.to_string(), "Type 0 (Unrestricted Grammar)");
    }
}
