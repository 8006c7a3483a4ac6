//! Graphviz export of a machine's transition table.
//!
//! States are drawn as boxes and actions as ovals. Every source state is
//! joined to its action by an undirected edge, and every action points at
//! each state it may produce. An invisible node `0` points at the initial
//! state.

use crate::core::{Action, State};
use crate::machine::StateMachine;
use indexmap::IndexSet;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Shape {
    Box,
    Oval,
}

impl Shape {
    fn as_str(self) -> &'static str {
        match self {
            Shape::Box => "box",
            Shape::Oval => "oval",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Node {
    id: usize,
    label: String,
    shape: Shape,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct Edge {
    from: usize,
    to: usize,
    arrowed: bool,
}

/// Directed graph description of a machine, rendered in DOT by `Display`.
///
/// Node ids follow first encounter: the initial state, then for each rule in
/// registration order its source states, the action itself, and its result
/// states. Because rules and their state sets keep registration order, the
/// output is identical for identically built machines.
///
/// # Example
///
/// ```rust
/// use switchyard::{Action, DotDiagram, State, StateMachine};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum Door { Closed, Open }
/// impl State for Door {}
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum Push { Open }
/// impl Action for Push {}
///
/// let machine = StateMachine::new(Door::Closed);
/// machine.register_action(Push::Open, [Door::Closed], [Door::Open], |_| Door::Open);
///
/// let diagram = DotDiagram::from_machine(&machine);
/// assert_eq!(diagram.node_count(), 3);
/// assert!(diagram.to_string().contains("2 [label=\"Open\", shape=oval]"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DotDiagram {
    nodes: Vec<Node>,
    edges: IndexSet<Edge>,
}

impl DotDiagram {
    pub fn from_machine<S: State, A: Action>(machine: &StateMachine<S, A>) -> Self {
        let mut numbering = Numbering::default();
        numbering.state(machine.initial_state());

        for (action, rule) in machine.rules() {
            for from in rule.from_states() {
                let state_id = numbering.state(from);
                let action_id = numbering.action(&action);
                numbering.edge(state_id, action_id, false);
            }

            let action_id = numbering.action(&action);
            for to in rule.to_states() {
                let state_id = numbering.state(to);
                numbering.edge(action_id, state_id, true);
            }
        }

        Self {
            nodes: numbering.nodes,
            edges: numbering.edges,
        }
    }

    /// Number of state and action nodes, excluding the start marker.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct edges, excluding the start marker edge.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

impl fmt::Display for DotDiagram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "digraph {{")?;
        writeln!(f, "  graph [rankdir=TB]")?;
        writeln!(f, "  0 [label=\"\", shape=plaintext]")?;
        writeln!(f, "  0 -> 1")?;

        for node in &self.nodes {
            writeln!(
                f,
                "  {} [label=\"{}\", shape={}]",
                node.id,
                escape(&node.label),
                node.shape.as_str()
            )?;
        }

        for edge in &self.edges {
            if edge.arrowed {
                writeln!(f, "  {} -> {}", edge.from, edge.to)?;
            } else {
                writeln!(f, "  {} -> {} [arrowhead=none]", edge.from, edge.to)?;
            }
        }

        writeln!(f, "}}")
    }
}

/// Assigns ids to states and actions on first sight.
struct Numbering<S, A> {
    states: HashMap<S, usize>,
    actions: HashMap<A, usize>,
    nodes: Vec<Node>,
    edges: IndexSet<Edge>,
}

impl<S, A> Default for Numbering<S, A> {
    fn default() -> Self {
        Self {
            states: HashMap::new(),
            actions: HashMap::new(),
            nodes: Vec::new(),
            edges: IndexSet::new(),
        }
    }
}

impl<S: State, A: Action> Numbering<S, A> {
    fn state(&mut self, state: &S) -> usize {
        let next = self.nodes.len() + 1;
        Self::assign(&mut self.states, &mut self.nodes, state, Shape::Box, next, |s| {
            s.label()
        })
    }

    fn action(&mut self, action: &A) -> usize {
        let next = self.nodes.len() + 1;
        Self::assign(&mut self.actions, &mut self.nodes, action, Shape::Oval, next, |a| {
            a.label()
        })
    }

    fn assign<K: Clone + Eq + Hash>(
        ids: &mut HashMap<K, usize>,
        nodes: &mut Vec<Node>,
        key: &K,
        shape: Shape,
        next: usize,
        label: impl FnOnce(&K) -> String,
    ) -> usize {
        if let Some(id) = ids.get(key) {
            return *id;
        }

        ids.insert(key.clone(), next);
        nodes.push(Node {
            id: next,
            label: label(key),
            shape,
        });
        next
    }

    fn edge(&mut self, from: usize, to: usize, arrowed: bool) {
        self.edges.insert(Edge { from, to, arrowed });
    }
}

fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}
