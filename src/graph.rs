//! Generic dependency graph with level-by-level topological sort.
//!
//! Independent of the reflow engine (which sequences depth-first, see
//! [`crate::sequencer`]). Useful for any DAG ordering need where a
//! breadth-first tie-break and a readable cycle path are wanted.
//!
//! # Reference
//! Kahn (1962), "Topological sorting of large networks", CACM 5(11)

use std::collections::{HashMap, HashSet, VecDeque};

use crate::error::{ReflowError, Result};

/// A directed graph of string ids. Edge `from → to` means "from before to".
///
/// Node insertion order is preserved and drives tie-breaks; duplicate
/// edges are ignored.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: Vec<String>,
    index: HashMap<String, usize>,
    successors: Vec<Vec<usize>>,
}

impl DependencyGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node if absent and returns its index.
    pub fn add_node(&mut self, id: impl Into<String>) -> usize {
        let id = id.into();
        if let Some(&i) = self.index.get(&id) {
            return i;
        }
        let i = self.nodes.len();
        self.index.insert(id.clone(), i);
        self.nodes.push(id);
        self.successors.push(Vec::new());
        i
    }

    /// Adds `from → to`, creating either node as needed.
    pub fn add_edge(&mut self, from: impl Into<String>, to: impl Into<String>) {
        let f = self.add_node(from);
        let t = self.add_node(to);
        if !self.successors[f].contains(&t) {
            self.successors[f].push(t);
        }
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Topological order by in-degree counting.
    ///
    /// Sources are released in insertion order; each released node's
    /// successors follow in edge order once their in-degree reaches zero.
    ///
    /// # Errors
    /// [`ReflowError::CyclePath`] with one closed cycle, e.g. `A → B → A`.
    pub fn topological_sort(&self) -> Result<Vec<String>> {
        let mut in_degree = vec![0usize; self.nodes.len()];
        for succ in &self.successors {
            for &t in succ {
                in_degree[t] += 1;
            }
        }

        let mut queue: VecDeque<usize> = (0..self.nodes.len())
            .filter(|&i| in_degree[i] == 0)
            .collect();
        let mut order = Vec::with_capacity(self.nodes.len());

        while let Some(n) = queue.pop_front() {
            order.push(self.nodes[n].clone());
            for &t in &self.successors[n] {
                in_degree[t] -= 1;
                if in_degree[t] == 0 {
                    queue.push_back(t);
                }
            }
        }

        if order.len() == self.nodes.len() {
            Ok(order)
        } else {
            Err(ReflowError::CyclePath {
                path: self.find_cycle(),
            })
        }
    }

    /// One cycle as a closed path of ids (first == last). Empty if acyclic.
    fn find_cycle(&self) -> Vec<String> {
        let mut visited: HashSet<usize> = HashSet::new();

        for root in 0..self.nodes.len() {
            if visited.contains(&root) {
                continue;
            }

            // (node, index of next successor to explore)
            let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
            let mut on_path: HashSet<usize> = HashSet::from([root]);
            visited.insert(root);

            while let Some(frame) = stack.last_mut() {
                let (node, next) = *frame;
                if let Some(&succ) = self.successors[node].get(next) {
                    frame.1 += 1;
                    if on_path.contains(&succ) {
                        let start = stack.iter().position(|&(n, _)| n == succ).unwrap_or(0);
                        return stack[start..]
                            .iter()
                            .map(|&(n, _)| n)
                            .chain(std::iter::once(succ))
                            .map(|i| self.nodes[i].clone())
                            .collect();
                    }
                    if visited.insert(succ) {
                        on_path.insert(succ);
                        stack.push((succ, 0));
                    }
                } else {
                    on_path.remove(&node);
                    stack.pop();
                }
            }
        }

        Vec::new()
    }
}
