/*
    This module parses BNF grammar files
*/

mod lexer;
mod verifier;

use std::collections::BTreeSet;
use std::fmt::Display;
use std::fs::File;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use crate::grammar::*;
use crate::error_handling::*;
use itertools::Itertools;
use lexer::*;
use verifier::verify_rules;
use verifier::IntermediateRuleset;

#[derive(Debug)]
pub enum CompileErrorType {
    // A line which should contain a rule does not
    MissingEquals,
    // A rule has multiple equals signs
    UnexpectedEquals,
    // The user starts a rule line with something other than a nonterminal
    MissingNonterminal,
    // There is an unclosed quote
    UnmatchedQuote,
    // An undefined token was used
    UndefinedNonterminal(String),
    // The rules do not form a valid grammar
    MalformedGrammar(GrammarErrorType),
    // Somehow a full rewrite was parsed as a base alternative
    // This is a problem with grammaton, not the grammar
    UnsplitRewrite,
    // A blank line got too deep into the parser
    // This is a problem with grammaton, not the grammar
    UnexpectedBlankLine,
    // There was an issue with reading a file
    FileError(std::io::Error),
}

impl ErrorType for CompileErrorType {}

impl PartialEq for CompileErrorType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CompileErrorType::FileError(a), CompileErrorType::FileError(b)) => a.kind() == b.kind(),
            (CompileErrorType::MalformedGrammar(a), CompileErrorType::MalformedGrammar(b)) => a == b,
            (CompileErrorType::UndefinedNonterminal(a), CompileErrorType::UndefinedNonterminal(b)) => a == b,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

impl Display for CompileErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileErrorType::MissingEquals => write!(f, "Expected `=` after nonterminal"),
            CompileErrorType::UnexpectedEquals => write!(f, "Unexpected `=` encountered"),
            CompileErrorType::MissingNonterminal => write!(f, "Tried to define something other than a nonterminal"),
            CompileErrorType::UnmatchedQuote => write!(f, "Unmatched quotes"),
            CompileErrorType::UndefinedNonterminal(nonterminal) => write!(f, "Could not find definition for `{}`", nonterminal),
            CompileErrorType::MalformedGrammar(e) => write!(f, "Malformed grammar: {}", e),
            CompileErrorType::UnsplitRewrite => write!(f, "Rewrite was not fully split (this is a problem with grammaton, not the grammar)"),
            CompileErrorType::UnexpectedBlankLine => write!(f, "Blank line encountered in rule parser (this is a problem with grammaton, not the grammar)"),
            CompileErrorType::FileError(e) => write!(f, "File error: {}", e),
        }
    }
}

pub type CompileError = Error<CompileErrorType>;
pub type CompileErrors = Errors<CompileErrorType>;

fn io_error(error: std::io::Error, file: PathBuf) -> CompileError {
    CompileError {
        location: Location::file(file),
        error: CompileErrorType::FileError(error)
    }
}

pub type Result<T> = std::result::Result<T, CompileErrorType>;
pub type LineResult<T> = std::result::Result<T, CompileError>;
pub type FileResult<T> = std::result::Result<T, CompileErrors>;

#[derive(PartialEq, Debug)]
struct Rule {
    symbol: String,
    rewrite: Rewrite,
    location: Location
}

// Epsilon and empty terminals contribute no symbols, so `ε` and `""`
// both give an empty alternative
fn parse_alternative(tokens: &[Token]) -> Result<Alternative> {
    tokens.iter().filter_map(|t| match t {
        Token::Equals => Some(Err(CompileErrorType::UnexpectedEquals)),
        Token::Or => Some(Err(CompileErrorType::UnsplitRewrite)),
        Token::Epsilon => None,
        Token::Terminal(s) if s.is_empty() => None,
        Token::Nonterminal(s) => Some(Ok(Symbol::Nonterminal(s.clone()))),
        Token::Terminal(s) => Some(Ok(Symbol::Terminal(s.clone())))
    }).collect()
}

fn parse_rewrite(tokens: &[Token]) -> Result<Rewrite> {
    tokens.split(|t| *t == Token::Or).map(parse_alternative).collect()
}

fn parse_line(tokens: &[Token], location: Location) -> Result<Rule> {
    // Try to get the token the rule is for. The match returns a result which
    // is then unwrapped with the ? operator
    let symbol = match tokens.first() {
        Some(Token::Nonterminal(s)) => Ok(s.clone()),
        Some(_) => Err(CompileErrorType::MissingNonterminal),
        None => Err(CompileErrorType::UnexpectedBlankLine)
    }?;

    if tokens.get(1) != Some(&Token::Equals) {
        return Err(CompileErrorType::MissingEquals)
    }

    let rewrite = parse_rewrite(&tokens[2..])?;

    Ok(Rule {
        symbol,
        rewrite,
        location
    })
}

fn parse_lex_line(line: &str, location: Location) -> LineResult<Rule> {
    lexer::lex_line(line)
        .and_then(|lexed_line| parse_line(&lexed_line, location.clone()))
        .map_err(|error| CompileError { location, error })
}

fn is_rule_line(line: &String) -> bool {
    let line = line.trim();
    !line.is_empty() && !line.starts_with(';')
}

// Returns an iterator over the lines of a file, with the io errors wrapped
// in CompileError and enumerated
fn file_line_nums<'a>(file: File, path: &'a Path) -> impl Iterator<Item = (usize, LineResult<String>)> + 'a {
    std::io::BufReader::new(file)
        .lines()
        .map(move |line| line.map_err(|e| io_error(e, path.to_path_buf())))
        .enumerate()
        .filter(|(_, line)| line.as_ref().is_ok_and(is_rule_line) || line.is_err())
        .map(|(num, line)| (num + 1, line))
}

// Merges rule lines for the same nonterminal. The first line is kept as
// the rule's location.
fn ruleset_from_rules(rules: Vec<Rule>) -> FileResult<IntermediateRuleset> {
    let mut ruleset = IntermediateRuleset::with_capacity(rules.len());
    for rule in rules {
        ruleset
            .entry(rule.symbol)
            .or_insert_with(|| (Rewrite::new(), rule.location))
            .0
            .extend(rule.rewrite);
    }

    verify_rules(&ruleset)?;

    Ok(ruleset)
}

fn grammar_from_rules(rule_list: Vec<Rule>, path: &Path) -> FileResult<Grammar> {
    let start_symbol = rule_list.first().map(|rule| rule.symbol.clone()).unwrap_or_default();

    let ruleset = ruleset_from_rules(rule_list)?;

    let terminals: BTreeSet<String> = ruleset
        .values()
        .flat_map(|(rewrite, _)| rewrite.iter().flatten())
        .filter(|symbol| symbol.is_terminal())
        .map(|symbol| symbol.text().to_string())
        .collect();
    let nonterminals: BTreeSet<String> = ruleset.keys().cloned().collect();
    let rules = ruleset.into_iter().map(|(symbol, (rewrite, _))| (symbol, rewrite)).collect();

    Grammar::new(start_symbol, nonterminals, terminals, rules)
        .map_err(|e| vec![CompileError {
            location: Location::file(path.to_path_buf()),
            error: CompileErrorType::MalformedGrammar(e)
        }])
}

// Parses numbered lines, collecting every line error before giving up
fn parse_lines(lines: impl Iterator<Item = (usize, LineResult<String>)>, path: &Path) -> FileResult<Grammar> {
    let parsed_lines = lines.map(|(num, line_res)| {
        line_res.and_then(|line| parse_lex_line(&line, Location {
            file: path.to_path_buf(),
            line: num
        }))
    });

    let (rules, errors): (Vec<_>, Vec<_>) = parsed_lines.partition_result();
    if !errors.is_empty() {
        return Err(errors);
    }

    tracing::debug!(rules = rules.len(), file = %path.display(), "parsed grammar rules");

    grammar_from_rules(rules, path)
}

pub fn parse_file(path: &Path) -> FileResult<Grammar> {
    let file = File::open(path).map_err(|e| vec![io_error(e, path.to_path_buf())])?;
    parse_lines(file_line_nums(file, path), path)
}

// Same as `parse_file`, for text already in memory. `path` is only
// used for error locations.
pub fn parse_str(text: &str, path: &Path) -> FileResult<Grammar> {
    let lines = text
        .lines()
        .map(String::from)
        .enumerate()
        .filter(|(_, line)| is_rule_line(line))
        .map(|(num, line)| (num + 1, Ok(line)));

    parse_lines(lines, path)
}

#[cfg(test)]
mod tests {
    use std::iter::zip;

    use super::*;
    use crate::grammar::tests::{n, t, variant_grammar};

    impl Location {
        pub fn new() -> Self {
            Location {
                file: PathBuf::new(),
                line: 0
            }
        }
    }

    #[test]
    fn parse_normal_alternative() {
        let lines = vec![
            vec![
                Token::Terminal("a".to_string()),
                Token::Nonterminal("S".to_string())
            ],
            vec![Token::Epsilon],
            vec![Token::Terminal("".to_string())]
        ];
        let answers = vec![
            vec![t("a"), n("S")],
            vec![],
            vec![]
        ];

        for (line, answer) in zip(lines, answers) {
            assert_eq!(parse_alternative(&line[..]).unwrap(), answer);
        }
    }

    #[test]
    fn parse_malformed_alternative() {
        assert_eq!(parse_alternative(&[Token::Equals]), Err(CompileErrorType::UnexpectedEquals));
        assert_eq!(parse_alternative(&[Token::Or]), Err(CompileErrorType::UnsplitRewrite));
    }

    #[test]
    fn parse_normal_line() {
        let text = "R = \"d\" L | \"e\"";
        let lexed = lexer::lex_line(text).unwrap();

        let answer = Rule {
            symbol: "R".to_string(),
            rewrite: vec![
                vec![t("d"), n("L")],
                vec![t("e")]
            ],
            location: Location::new()
        };

        assert_eq!(parse_line(&lexed[..], Location::new()), Ok(answer));
    }

    #[test]
    fn parse_malformed_line() {
        // Blank
        assert_eq!(parse_line(&[], Location::new()), Err(CompileErrorType::UnexpectedBlankLine));

        // Missing equals
        assert_eq!(parse_line(
            &lexer::lex_line("S \"a\" S").unwrap()[..],
            Location::new()
        ), Err(CompileErrorType::MissingEquals));

        // Improper definition
        assert_eq!(parse_line(
            &lexer::lex_line("\"a\" = S").unwrap()[..],
            Location::new()
        ), Err(CompileErrorType::MissingNonterminal));
        assert_eq!(parse_line(
            &lexer::lex_line("= \"a\" S").unwrap()[..],
            Location::new()
        ), Err(CompileErrorType::MissingNonterminal));
    }

    #[test]
    fn repeated_rules_append_alternatives() {
        let text = "S = \"a\" S\n; comment\n\nS = \"b\"\n";
        let grammar = parse_str(text, Path::new("inline.bnf")).unwrap();
        assert_eq!(grammar.rewrite("S"), &[vec![t("a"), n("S")], vec![t("b")]][..]);
    }

    #[test]
    fn parse_normal_file() {
        let example_path = PathBuf::from("example_data/variant.bnf");
        let example_parsed = parse_file(&example_path).unwrap();

        assert_eq!(example_parsed, variant_grammar());
    }

    #[test]
    fn parse_epsilon_file() {
        let example_path = PathBuf::from("example_data/nfa_variant.bnf");
        let example_parsed = parse_file(&example_path).unwrap();

        assert_eq!(example_parsed.start_symbol(), "q0");
        assert_eq!(example_parsed.rewrite("q4"), &[Vec::<Symbol>::new()][..]);
        assert_eq!(example_parsed.terminals().len(), 3);
    }

    #[test]
    fn parse_malformed_file() {
        let example_path = PathBuf::from("example_data/malformed.bnf");
        let example_parsed = parse_file(&example_path).unwrap_err();

        assert_eq!(example_parsed, vec![
            CompileError {
                location: Location {
                    file: example_path.clone(),
                    line: 3
                },
                error: CompileErrorType::MissingNonterminal
            },
            CompileError {
                location: Location {
                    file: example_path,
                    line: 7
                },
                error: CompileErrorType::UnexpectedEquals
            }
        ]);
    }

    #[test]
    fn report_undefined_nonterminals_with_their_line() {
        let path = Path::new("inline.bnf");
        let errors = parse_str("S = \"a\" A\nA = \"b\" B\n", path).unwrap_err();

        assert_eq!(errors, vec![CompileError {
            location: Location { file: path.to_path_buf(), line: 2 },
            error: CompileErrorType::UndefinedNonterminal("B".to_string())
        }]);
    }

    #[test]
    fn report_malformed_grammar() {
        let path = Path::new("inline.bnf");
        let errors = parse_str("S = \"S\"\n", path).unwrap_err();

        assert_eq!(errors, vec![CompileError {
            location: Location::file(path.to_path_buf()),
            error: CompileErrorType::MalformedGrammar(GrammarErrorType::OverlappingSymbol("S".to_string()))
        }]);

        let errors = parse_str("; nothing here\n", path).unwrap_err();
        assert_eq!(errors[0].error, CompileErrorType::MalformedGrammar(GrammarErrorType::MissingStartRules(String::new())));
    }

    #[test]
    fn missing_file() {
        let errors = parse_file(Path::new("example_data/does_not_exist.bnf")).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].error, CompileErrorType::FileError(std::io::Error::from(std::io::ErrorKind::NotFound)));
    }
}
