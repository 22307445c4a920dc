use crate::graph::loan_graph::LoanGraph;
use std::collections::BTreeMap;
use std::fmt;

/// A strongly connected group of vertices in the loan graph.
///
/// Every member can reach every other member through a chain of loans,
/// so a circular debt can only exist among the members of a single
/// cluster. A cluster with one member has nothing to net.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebtCluster<T> {
    pub members: Vec<T>,
}

impl<T> DebtCluster<T> {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns true if circular debts may exist within this cluster.
    pub fn is_nettable(&self) -> bool {
        self.members.len() > 1
    }
}

/// Partition the graph into strongly connected clusters (Tarjan).
///
/// Members of each cluster are sorted, and clusters are ordered by their
/// smallest member.
pub fn find_clusters<T>(graph: &LoanGraph<T>) -> Vec<DebtCluster<T>>
where
    T: Ord + Clone + fmt::Debug,
{
    let mut state = TarjanState {
        index_counter: 0,
        stack: Vec::new(),
        on_stack: BTreeMap::new(),
        indices: BTreeMap::new(),
        lowlinks: BTreeMap::new(),
        result: Vec::new(),
    };

    for vertex in graph.vertices() {
        if !state.indices.contains_key(vertex) {
            strongconnect(vertex, graph, &mut state);
        }
    }

    let mut clusters: Vec<DebtCluster<T>> = state
        .result
        .into_iter()
        .map(|members| DebtCluster { members })
        .collect();
    clusters.sort_by(|a, b| a.members.first().cmp(&b.members.first()));
    clusters
}

/// Clusters with more than one member, in the same order as `find_clusters`.
pub fn nettable_clusters<T>(graph: &LoanGraph<T>) -> Vec<DebtCluster<T>>
where
    T: Ord + Clone + fmt::Debug,
{
    find_clusters(graph)
        .into_iter()
        .filter(DebtCluster::is_nettable)
        .collect()
}

struct TarjanState<T> {
    index_counter: usize,
    stack: Vec<T>,
    on_stack: BTreeMap<T, bool>,
    indices: BTreeMap<T, usize>,
    lowlinks: BTreeMap<T, usize>,
    result: Vec<Vec<T>>,
}

impl<T: Ord + Clone> TarjanState<T> {
    fn visit(&mut self, v: &T) {
        self.indices.insert(v.clone(), self.index_counter);
        self.lowlinks.insert(v.clone(), self.index_counter);
        self.index_counter += 1;
        self.stack.push(v.clone());
        self.on_stack.insert(v.clone(), true);
    }

    fn lower(&mut self, v: &T, candidate: usize) {
        if let Some(low_v) = self.lowlinks.get_mut(v) {
            *low_v = (*low_v).min(candidate);
        }
    }

    // If v is a root node, pop the stack and generate a cluster
    fn close(&mut self, v: &T) {
        if self.lowlinks.get(v) != self.indices.get(v) {
            return;
        }
        let mut component = Vec::new();
        while let Some(w) = self.stack.pop() {
            self.on_stack.insert(w.clone(), false);
            let done = w == *v;
            component.push(w);
            if done {
                break;
            }
        }
        component.sort();
        self.result.push(component);
    }
}

/// Tarjan's search from `root`, with an explicit stack of successor
/// iterators in place of recursion.
fn strongconnect<T>(root: &T, graph: &LoanGraph<T>, state: &mut TarjanState<T>)
where
    T: Ord + Clone + fmt::Debug,
{
    state.visit(root);
    let mut frames = vec![(root, graph.successors(root))];

    while let Some((v, successors)) = frames.last_mut() {
        let v: &T = *v;
        match successors.next() {
            Some(w) => {
                if let Some(&idx_w) = state.indices.get(w) {
                    if state.on_stack.get(w).copied().unwrap_or(false) {
                        state.lower(v, idx_w);
                    }
                } else {
                    state.visit(w);
                    frames.push((w, graph.successors(w)));
                }
            }
            None => {
                state.close(v);
                frames.pop();
                if let Some((parent, _)) = frames.last() {
                    let low_v = state.lowlinks.get(v).copied().unwrap_or(usize::MAX);
                    state.lower(parent, low_v);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_single_cluster() {
        let mut graph = LoanGraph::new();
        graph.insert_edge("A", "B", dec!(100));
        graph.insert_edge("B", "C", dec!(100));
        graph.insert_edge("C", "A", dec!(100));

        let nettable = nettable_clusters(&graph);
        assert_eq!(nettable.len(), 1);
        assert_eq!(nettable[0].members, ["A", "B", "C"]);
    }

    #[test]
    fn test_disjoint_clusters() {
        let mut graph = LoanGraph::new();
        graph.insert_edge("C", "D", dec!(50));
        graph.insert_edge("D", "C", dec!(50));
        graph.insert_edge("A", "B", dec!(100));
        graph.insert_edge("B", "A", dec!(100));

        let nettable = nettable_clusters(&graph);
        assert_eq!(nettable.len(), 2);
        assert_eq!(nettable[0].members, ["A", "B"]);
        assert_eq!(nettable[1].members, ["C", "D"]);
    }

    #[test]
    fn test_long_chain_closing_into_one_cluster() {
        let mut graph = LoanGraph::new();
        for i in 0..100_000u32 {
            graph.insert_edge(i, i + 1, dec!(1));
        }
        graph.insert_edge(100_000, 0, dec!(1));

        let clusters = find_clusters(&graph);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].len(), 100_001);
        assert_eq!(clusters[0].members.first(), Some(&0));
    }

    #[test]
    fn test_nested_cycles_and_tail() {
        // 1 <-> 2 -> 3 -> 1 is one cluster; 4 hangs off it.
        let mut graph = LoanGraph::new();
        graph.insert_edge(1, 2, dec!(1));
        graph.insert_edge(2, 1, dec!(1));
        graph.insert_edge(2, 3, dec!(1));
        graph.insert_edge(3, 1, dec!(1));
        graph.insert_edge(3, 4, dec!(1));

        let clusters = find_clusters(&graph);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].members, [1, 2, 3]);
        assert_eq!(clusters[1].members, [4]);
    }

    #[test]
    fn test_chain_is_all_singletons() {
        let mut graph = LoanGraph::new();
        graph.insert_edge("A", "B", dec!(100));
        graph.insert_edge("B", "C", dec!(100));

        let clusters = find_clusters(&graph);
        assert_eq!(clusters.len(), 3);
        assert!(clusters.iter().all(|c| !c.is_nettable()));
        assert!(nettable_clusters(&graph).is_empty());
    }
}
