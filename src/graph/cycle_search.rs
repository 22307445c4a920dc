use crate::graph::loan_graph::LoanGraph;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A path of vertices along existing loans, found by the cycle search.
///
/// Consecutive vertices are loans `(path[i], path[i + 1])`. A closed
/// circuit starts and ends on the same vertex; a boundary circuit may end
/// on a different member of the subgraph it was searched against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Circuit<T> {
    path: Vec<T>,
}

impl<T> Circuit<T> {
    pub(crate) fn new(path: Vec<T>) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &[T] {
        &self.path
    }

    /// Number of loans along the path.
    pub fn hops(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    pub fn first(&self) -> Option<&T> {
        self.path.first()
    }

    pub fn last(&self) -> Option<&T> {
        self.path.last()
    }
}

impl<T: Ord + Clone + fmt::Debug> Circuit<T> {
    /// True when the path returns to the vertex it started from.
    pub fn is_closed(&self) -> bool {
        self.path.len() > 1 && self.path.first() == self.path.last()
    }

    /// True when no vertex repeats, apart from the start reappearing as
    /// the end of a closed circuit.
    pub fn is_simple(&self) -> bool {
        let n = self.path.len();
        n > 1 && all_distinct(&self.path[..n - 1]) && all_distinct(&self.path[1..])
    }

    /// Smallest loan along the path, or `None` if some hop is not a loan
    /// of `graph` (or the path has no hops).
    pub fn bottleneck(&self, graph: &LoanGraph<T>) -> Option<Decimal> {
        self.path
            .windows(2)
            .map(|hop| graph.weight(&hop[0], &hop[1]))
            .try_fold(None, |min: Option<Decimal>, w| {
                let w = w?;
                Some(Some(min.map_or(w, |m| m.min(w))))
            })
            .flatten()
    }
}

fn all_distinct<T: Ord>(vertices: &[T]) -> bool {
    let mut seen = BTreeSet::new();
    vertices.iter().all(|v| seen.insert(v))
}

/// Find a directed cycle through `start`.
///
/// Depth-first search rooted at `start`, visiting borrowers in ascending
/// order and never re-entering a visited vertex. The search stops the
/// moment the current vertex has a loan back to `start`, and returns the
/// path `start, v1, ..., start`. Returns `None` when no cycle passes
/// through `start` (or `start` is not in the graph).
pub fn find_cycle<T>(graph: &LoanGraph<T>, start: &T) -> Option<Circuit<T>>
where
    T: Ord + Clone + fmt::Debug,
{
    let mut visited = BTreeSet::from([start.clone()]);
    let mut path = vec![start.clone()];
    let mut frames = vec![graph.successors(start)];

    while let Some(frame) = frames.last_mut() {
        let Some(next) = frame.next() else {
            frames.pop();
            path.pop();
            continue;
        };
        if next == start {
            path.push(start.clone());
            log::trace!("cycle through {:?}: {:?}", start, path);
            return Some(Circuit::new(path));
        }
        if visited.insert(next.clone()) {
            path.push(next.clone());
            frames.push(graph.successors(next));
        }
    }
    log::trace!("no cycle through {:?}", start);
    None
}

/// Find the first circuit that leaves `subgraph` and comes back into it.
///
/// Each member of `subgraph` is tried as a start vertex in ascending order,
/// searching the full `graph`. Only `subgraph` membership is consulted.
pub fn find_boundary_circuit<T>(
    graph: &LoanGraph<T>,
    subgraph: &LoanGraph<T>,
) -> Option<Circuit<T>>
where
    T: Ord + Clone + fmt::Debug,
{
    subgraph
        .vertices()
        .find_map(|start| boundary_circuit_from(graph, subgraph, start))
}

/// Depth-first search from a member `start` through non-members.
///
/// Loans between two members are never followed. Once the path is outside
/// the subgraph, the first loan back to any member closes the circuit.
fn boundary_circuit_from<T>(
    graph: &LoanGraph<T>,
    subgraph: &LoanGraph<T>,
    start: &T,
) -> Option<Circuit<T>>
where
    T: Ord + Clone + fmt::Debug,
{
    let mut visited = BTreeSet::from([start.clone()]);
    let mut path = vec![start.clone()];
    let mut frames = vec![graph.successors(start)];

    while let Some(frame) = frames.last_mut() {
        let Some(next) = frame.next() else {
            frames.pop();
            path.pop();
            continue;
        };
        // Only `start` is a member; every later vertex on the path is outside.
        let outside = path.len() > 1;
        if subgraph.has_vertex(next) {
            if outside {
                path.push(next.clone());
                log::trace!("boundary circuit from {:?}: {:?}", start, path);
                return Some(Circuit::new(path));
            }
            continue;
        }
        if visited.insert(next.clone()) {
            path.push(next.clone());
            frames.push(graph.successors(next));
        }
    }
    None
}
