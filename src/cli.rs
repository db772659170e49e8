use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// File containing the grammar (`-` for standard input)
    pub file: PathBuf,

    /// Start symbol (default: first in the file)
    #[arg(short, long, value_name = "SYMBOL")]
    pub start: Option<String>,

    /// Log the steps of each algorithm (RUST_LOG takes precedence)
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the Chomsky type of the grammar
    Classify,

    /// Generate random sentences with their derivations
    Generate {
        /// Amount to generate
        #[arg(short = 'n', long, value_name = "AMOUNT", default_value_t = 5)]
        amount: usize,

        /// Longest sentence, in symbols
        #[arg(long, value_name = "LENGTH", default_value_t = 10)]
        max_length: usize,

        /// Seed for repeatable output
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Test whether the grammar's automaton accepts each input
    Accept {
        /// Run the determinized automaton instead
        #[arg(long)]
        dfa: bool,

        /// Split inputs on whitespace instead of into characters
        #[arg(long)]
        tokens: bool,

        /// Inputs to test
        #[arg(required = true)]
        inputs: Vec<String>,
    },

    /// Report whether the grammar's automaton is deterministic
    Check,

    /// Print the grammar's automaton
    Automaton {
        /// Print the determinized automaton instead
        #[arg(long)]
        dfa: bool,
    },

    /// Print the right-regular grammar read back from the automaton
    Regular {
        /// Read the grammar back from the determinized automaton
        #[arg(long)]
        dfa: bool,
    },

    /// Print the automaton as a Graphviz digraph
    Dot {
        /// Draw the determinized automaton instead
        #[arg(long)]
        dfa: bool,
    },
}

impl Command {
    // Whether the command works on the determinized automaton
    pub fn wants_dfa(&self) -> bool {
        match self {
            Command::Accept { dfa, .. } | Command::Automaton { dfa } | Command::Regular { dfa } | Command::Dot { dfa } => *dfa,
            _ => false,
        }
    }
}
