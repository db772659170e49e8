mod cli;

use std::fmt::Display;
use std::io::Read;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use itertools::Itertools;
use rand::rngs::StdRng;
use rand::SeedableRng;

use cli::{Cli, Command};
use grammaton::automaton::{accepts, Automaton};
use grammaton::determinize::{determinize, is_deterministic};
use grammaton::error_handling::{Error, ErrorType, Location};
use grammaton::grammar::{classify, Grammar};
use grammaton::translate::{automaton_to_grammar, grammar_to_nfa};
use grammaton::{generator, parser, render};

type RunResult<T> = Result<T, Vec<String>>;

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// Reports an error that belongs to the whole file
fn file_error<T: ErrorType>(path: &Path, error: T) -> Vec<String> {
    vec![Error::at(Location::file(path.to_path_buf()), error).to_string()]
}

fn messages<T: Display>(errors: Vec<T>) -> Vec<String> {
    errors.iter().map(ToString::to_string).collect()
}

// `-` reads the grammar from standard input
fn read_grammar(path: &Path) -> RunResult<Grammar> {
    if path.as_os_str() != "-" {
        return parser::parse_file(path).map_err(messages);
    }

    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .map_err(|e| file_error(path, parser::CompileErrorType::FileError(e)))?;
    parser::parse_str(&text, Path::new("<stdin>")).map_err(messages)
}

fn load_grammar(cli: &Cli) -> RunResult<Grammar> {
    let grammar = read_grammar(&cli.file)?;

    match &cli.start {
        Some(start) => grammar.with_start(start).map_err(|e| file_error(&cli.file, e)),
        None => Ok(grammar),
    }
}

fn load_automaton(cli: &Cli, grammar: &Grammar) -> RunResult<Automaton> {
    let nfa = grammar_to_nfa(grammar).map_err(|e| file_error(&cli.file, e))?;

    if cli.command.wants_dfa() {
        Ok(determinize(&nfa))
    } else {
        Ok(nfa)
    }
}

fn split_input(input: &str, tokens: bool) -> Vec<String> {
    if tokens {
        input.split_whitespace().map(String::from).collect()
    } else {
        input.chars().map(String::from).collect()
    }
}

fn run(cli: &Cli) -> RunResult<String> {
    let grammar = load_grammar(cli)?;

    let output = match &cli.command {
        Command::Classify => format!("{}\n", classify(&grammar)),
        Command::Generate { amount, max_length, seed } => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(*seed),
                None => StdRng::from_entropy(),
            };
            generator::generate_many(&grammar, &mut rng, *amount, *max_length)
                .iter()
                .map(|derivation| format!("String: {}, Derivation: {}\n", derivation.text(), derivation.steps.iter().join(" ")))
                .collect()
        }
        Command::Accept { tokens, inputs, .. } => {
            let automaton = load_automaton(cli, &grammar)?;
            inputs
                .iter()
                .map(|input| {
                    let verdict = if accepts(&automaton, split_input(input, *tokens)) { "accepted" } else { "rejected" };
                    format!("{:?} is {}\n", input, verdict)
                })
                .collect()
        }
        Command::Check => {
            let automaton = load_automaton(cli, &grammar)?;
            format!("Is Deterministic? {}\n", is_deterministic(&automaton))
        }
        Command::Automaton { .. } => load_automaton(cli, &grammar)?.to_string(),
        Command::Regular { .. } => automaton_to_grammar(&load_automaton(cli, &grammar)?).to_string(),
        Command::Dot { dfa } => {
            let title = if *dfa { "DFA" } else { "NDFA" };
            render::to_dot(&load_automaton(cli, &grammar)?, title)
        }
    };

    Ok(output)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(errors) => {
            for error in errors {
                eprintln!("{}", error);
            }
            ExitCode::FAILURE
        }
    }
}
