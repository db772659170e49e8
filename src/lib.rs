pub mod automaton;
pub mod determinize;
pub mod error_handling;
pub mod generator;
pub mod grammar;
pub mod parser;
pub mod render;
pub mod translate;
