//! Pull-based reactive values.
//!
//! ```text
//!   input ──invalidate──► dependents marked dirty (transitively)
//!                                │
//!   frame reads a Memo ──────────┘  recompute if dirty, then mark clean
//! ```
//!
//! Nodes are plain ids in a DAG; the cached values live in [`Memo`]s owned by
//! whoever wires the graph, so the graph itself stays untyped.

use std::collections::VecDeque;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),
    #[error("edge {from} -> {to} would create a cycle")]
    Cycle { from: String, to: String },
}

#[derive(Debug)]
struct Node {
    name: &'static str,
    dirty: bool,
    dependents: Vec<NodeId>,
}

// ---------------------------------------------------------------------------
// DependencyGraph
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct DependencyGraph {
    nodes: Vec<Node>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node. New nodes start dirty so their first read computes.
    pub fn add_node(&mut self, name: &'static str) -> NodeId {
        self.nodes.push(Node {
            name,
            dirty: true,
            dependents: Vec::new(),
        });
        NodeId(self.nodes.len() - 1)
    }

    /// Declare that `downstream` reads `upstream`.
    pub fn add_edge(&mut self, upstream: NodeId, downstream: NodeId) -> Result<(), GraphError> {
        self.check(upstream)?;
        self.check(downstream)?;
        if upstream == downstream || self.reaches(downstream, upstream) {
            return Err(GraphError::Cycle {
                from: self.name(upstream).to_string(),
                to: self.name(downstream).to_string(),
            });
        }
        let deps = &mut self.nodes[upstream.0].dependents;
        if !deps.contains(&downstream) {
            deps.push(downstream);
        }
        Ok(())
    }

    /// Mark every transitive dependent of `node` dirty and return the nodes
    /// that changed from clean to dirty. `node` itself is left as is.
    pub fn invalidate(&mut self, node: NodeId) -> Vec<NodeId> {
        let mut marked = Vec::new();
        let mut seen = vec![false; self.nodes.len()];
        let mut queue: VecDeque<NodeId> = self.dependents(node).iter().copied().collect();
        while let Some(id) = queue.pop_front() {
            if std::mem::replace(&mut seen[id.0], true) {
                continue;
            }
            let n = &mut self.nodes[id.0];
            if !n.dirty {
                n.dirty = true;
                marked.push(id);
            }
            queue.extend(n.dependents.iter().copied());
        }
        if !marked.is_empty() {
            log::debug!(
                "{} invalidated: {:?}",
                self.name(node),
                marked.iter().map(|&id| self.name(id)).collect::<Vec<_>>()
            );
        }
        marked
    }

    pub fn is_dirty(&self, node: NodeId) -> bool {
        self.nodes.get(node.0).is_some_and(|n| n.dirty)
    }

    pub fn mark_clean(&mut self, node: NodeId) {
        if let Some(n) = self.nodes.get_mut(node.0) {
            n.dirty = false;
        }
    }

    pub fn name(&self, node: NodeId) -> &'static str {
        self.nodes.get(node.0).map_or("<unknown>", |n| n.name)
    }

    pub fn dependents(&self, node: NodeId) -> &[NodeId] {
        self.nodes.get(node.0).map_or(&[][..], |n| n.dependents.as_slice())
    }

    fn check(&self, node: NodeId) -> Result<(), GraphError> {
        if node.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(GraphError::UnknownNode(node))
        }
    }

    fn reaches(&self, from: NodeId, to: NodeId) -> bool {
        let mut seen = vec![false; self.nodes.len()];
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            if id == to {
                return true;
            }
            if std::mem::replace(&mut seen[id.0], true) {
                continue;
            }
            stack.extend(self.nodes[id.0].dependents.iter().copied());
        }
        false
    }
}

// ---------------------------------------------------------------------------
// Memo – cached value bound to one node
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct Memo<T> {
    node: NodeId,
    value: Option<T>,
    evaluations: u64,
}

impl<T> Memo<T> {
    pub fn new(node: NodeId) -> Self {
        Memo {
            node,
            value: None,
            evaluations: 0,
        }
    }

    /// How many times the value has been computed.
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    /// Return the cached value, recomputing it first if the node is dirty.
    pub fn get(&mut self, graph: &mut DependencyGraph, compute: impl FnOnce() -> T) -> &T {
        if graph.is_dirty(self.node) {
            self.value = None;
        }
        let node = self.node;
        let evaluations = &mut self.evaluations;
        self.value.get_or_insert_with(|| {
            let value = compute();
            *evaluations += 1;
            graph.mark_clean(node);
            log::debug!("recomputed {} (#{})", graph.name(node), evaluations);
            value
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> (DependencyGraph, NodeId, NodeId, NodeId) {
        let mut g = DependencyGraph::new();
        let a = g.add_node("a");
        let b = g.add_node("b");
        let c = g.add_node("c");
        g.add_edge(a, b).unwrap();
        g.add_edge(b, c).unwrap();
        for id in [a, b, c] {
            g.mark_clean(id);
        }
        (g, a, b, c)
    }

    #[test]
    fn invalidation_is_transitive() {
        let (mut g, a, b, c) = chain();
        assert_eq!(g.invalidate(a), vec![b, c]);
        assert!(!g.is_dirty(a));
        assert!(g.is_dirty(b) && g.is_dirty(c));
        // Nothing left to mark the second time round.
        assert!(g.invalidate(a).is_empty());
    }

    #[test]
    fn invalidation_only_reaches_downstream() {
        let (mut g, a, b, c) = chain();
        assert_eq!(g.invalidate(b), vec![c]);
        assert!(!g.is_dirty(a));
        assert!(!g.is_dirty(b));
    }

    #[test]
    fn cycles_and_self_loops_are_rejected() {
        let (mut g, a, _, c) = chain();
        assert!(matches!(g.add_edge(c, a), Err(GraphError::Cycle { .. })));
        assert!(matches!(g.add_edge(a, a), Err(GraphError::Cycle { .. })));
        assert_eq!(
            g.add_edge(a, NodeId(99)),
            Err(GraphError::UnknownNode(NodeId(99)))
        );
    }

    #[test]
    fn diamond_marks_shared_dependent_once() {
        let mut g = DependencyGraph::new();
        let top = g.add_node("top");
        let left = g.add_node("left");
        let right = g.add_node("right");
        let bottom = g.add_node("bottom");
        for (u, d) in [(top, left), (top, right), (left, bottom), (right, bottom)] {
            g.add_edge(u, d).unwrap();
        }
        for id in [top, left, right, bottom] {
            g.mark_clean(id);
        }
        let marked = g.invalidate(top);
        assert_eq!(marked.len(), 3);
        assert_eq!(marked.iter().filter(|&&id| id == bottom).count(), 1);
    }

    #[test]
    fn memo_recomputes_once_per_invalidation() {
        let mut g = DependencyGraph::new();
        let input = g.add_node("input");
        let node = g.add_node("double");
        g.add_edge(input, node).unwrap();

        let mut source = 2;
        let mut memo = Memo::new(node);
        assert_eq!(*memo.get(&mut g, || source * 2), 4);
        assert_eq!(*memo.get(&mut g, || source * 2), 4);
        assert_eq!(memo.evaluations(), 1);

        // A changed source without invalidation is not observed.
        source = 5;
        assert_eq!(*memo.get(&mut g, || source * 2), 4);

        g.invalidate(input);
        assert!(g.is_dirty(node));
        assert_eq!(*memo.get(&mut g, || source * 2), 10);
        assert_eq!(memo.evaluations(), 2);
        assert!(!g.is_dirty(node));
    }
}
