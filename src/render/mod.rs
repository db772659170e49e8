/*
    This module draws automata as Graphviz digraphs
*/

use std::fmt::Write;

use crate::automaton::Automaton;

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('\"', "\\\""))
}

// Accepting states get a double border; an invisible point node marks the start
pub fn to_dot(automaton: &Automaton, title: &str) -> String {
    let mut dot = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(dot, "digraph {} {{", quote(title));
    let _ = writeln!(dot, "  rankdir=LR;");
    let _ = writeln!(dot, "  __start [shape=point];");

    for state in automaton.states() {
        let shape = if automaton.is_accepting(state) { "doublecircle" } else { "circle" };
        let _ = writeln!(dot, "  {} [shape={}];", quote(state), shape);
    }

    let _ = writeln!(dot, "  __start -> {};", quote(automaton.start()));
    for (source, label, destination) in automaton.transitions().edges() {
        let _ = writeln!(
            dot,
            "  {} -> {} [label={}];",
            quote(source),
            quote(destination),
            quote(&label.to_string())
        );
    }

    dot.push_str("}\n");
    dot
}
