use std::collections::{BTreeSet, HashSet};

use itertools::Itertools;

use crate::automaton::{Automaton, StateSet};

// A set of NFA states, as sorted indices into a `StateTable`
pub type Subset = BTreeSet<usize>;

// Fixed numbering of the NFA states in name order
pub struct StateTable<'a> {
    names: Vec<&'a str>,
}

impl<'a> StateTable<'a> {
    pub fn new(automaton: &'a Automaton) -> Self {
        // BTreeSet iteration is already sorted
        StateTable { names: automaton.states().iter().map(String::as_str).collect() }
    }

    pub fn index(&self, state: &str) -> usize {
        let found = self.names.binary_search(&state);
        assert!(found.is_ok(), "state `{}` missing from the state table", state);
        found.unwrap_or_default()
    }

    pub fn state(&self, index: usize) -> &'a str {
        self.names[index]
    }

    pub fn subset(&self, states: &StateSet) -> Subset {
        states.iter().map(|s| self.index(s)).collect()
    }

    pub fn states(&self, subset: &Subset) -> StateSet {
        subset.iter().map(|&i| self.names[i].to_string()).collect()
    }

    // `{a,b}` over the sorted member names
    pub fn name(&self, subset: &Subset) -> String {
        format!("{{{}}}", subset.iter().map(|&i| self.names[i]).join(","))
    }
}

// Names for subsets in discovery order. Member names that themselves
// contain `,` or braces can produce equal names for different subsets,
// and a name can equal a `reserved` alphabet symbol; those get a `#n`
// suffix.
pub fn unique_names<'s>(
    table: &StateTable,
    subsets: impl Iterator<Item = &'s Subset>,
    reserved: &BTreeSet<String>,
) -> Vec<String> {
    let mut taken: HashSet<String> = reserved.iter().cloned().collect();
    subsets
        .map(|subset| {
            let base = table.name(subset);
            let mut name = base.clone();
            let mut suffix = 1;
            while !taken.insert(name.clone()) {
                suffix += 1;
                name = format!("{}#{}", base, suffix);
            }
            name
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::tests::variant_nfa;
    use crate::grammar::tests::set;

    #[test]
    fn indices_follow_name_order() {
        let nfa = variant_nfa();
        let table = StateTable::new(&nfa);
        assert_eq!(table.index("q0"), 0);
        assert_eq!(table.index("q4"), 4);
        assert_eq!(table.subset(&set(&["q3", "q2"])), Subset::from([2, 3]));
        assert_eq!(table.states(&Subset::from([1, 4])), set(&["q1", "q4"]));
    }

    #[test]
    fn names_are_sorted_and_unique() {
        let nfa = variant_nfa();
        let table = StateTable::new(&nfa);
        assert_eq!(table.name(&Subset::from([3, 2])), "{q2,q3}");

        let subsets = vec![Subset::from([0]), Subset::from([2, 3])];
        assert_eq!(unique_names(&table, subsets.iter(), &set(&[])), vec!["{q0}", "{q2,q3}"]);
    }

    #[test]
    #[should_panic(expected = "state `q9` missing from the state table")]
    fn unknown_state_has_no_index() {
        let nfa = variant_nfa();
        StateTable::new(&nfa).index("q9");
    }

    #[test]
    fn names_avoid_reserved_symbols() {
        let nfa = variant_nfa();
        let table = StateTable::new(&nfa);
        let subsets = vec![Subset::from([0]), Subset::from([1])];
        assert_eq!(
            unique_names(&table, subsets.iter(), &set(&["{q0}", "a"])),
            vec!["{q0}#2", "{q1}"]
        );
    }
}
