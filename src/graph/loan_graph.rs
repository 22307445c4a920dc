use crate::core::error::GraphError;
use crate::core::ledger::Ledger;
use crate::core::loan::Loan;
use crate::optimization::netting::{NettingEngine, NettingReport};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A directed, weighted graph of loans between vertices.
///
/// An edge `(u, v, w)` means `u` has lent `w` to `v`, so `v` owes `u`.
/// Each vertex maps to its outgoing loans; a vertex with no outgoing
/// loans is still a member of the graph.
///
/// The graph maintains these invariants after every public call:
///
/// - no vertex lends to itself,
/// - every amount is strictly positive (a loan reduced to zero is removed),
/// - at most one loan per ordered pair,
/// - every loan endpoint is a vertex of the graph.
///
/// Iteration is in ascending vertex order, then ascending neighbor order.
/// `Clone` produces a fully independent deep copy.
///
/// # Examples
///
/// ```
/// use debt_graph::prelude::*;
/// use rust_decimal_macros::dec;
///
/// let mut graph = LoanGraph::new();
/// graph.insert_edge("A", "B", dec!(10));
/// graph.insert_edge("B", "A", dec!(4));
///
/// assert_eq!(graph.vertex_count(), 2);
/// assert_eq!(graph.edge_count(), 2);
/// assert_eq!(graph.debt(&"B"), dec!(10));
/// assert_eq!(graph.credit(&"B"), dec!(4));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanGraph<T: Ord> {
    /// lender -> (borrower -> amount)
    adjacency: BTreeMap<T, BTreeMap<T, Decimal>>,
}

impl<T: Ord> Default for LoanGraph<T> {
    fn default() -> Self {
        Self {
            adjacency: BTreeMap::new(),
        }
    }
}

impl<T: Ord + Clone + fmt::Debug> LoanGraph<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from a sequence of loans.
    ///
    /// Later loans between an already-connected pair are ignored, exactly
    /// as with [`insert_edge`](Self::insert_edge).
    pub fn from_loans(loans: impl IntoIterator<Item = Loan<T>>) -> Self {
        let mut graph = Self::new();
        for loan in loans {
            let (lender, borrower, amount) = loan.into_parts();
            graph.insert_edge(lender, borrower, amount);
        }
        graph
    }

    // --- Queries ---

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    pub fn has_vertex(&self, u: &T) -> bool {
        self.adjacency.contains_key(u)
    }

    pub fn has_edge(&self, u: &T, v: &T) -> bool {
        self.weight(u, v).is_some()
    }

    /// Amount `u` has lent to `v`, if such a loan exists.
    pub fn weight(&self, u: &T, v: &T) -> Option<Decimal> {
        self.adjacency.get(u).and_then(|n| n.get(v)).copied()
    }

    /// All vertices in ascending order.
    pub fn vertices(&self) -> impl Iterator<Item = &T> + '_ {
        self.adjacency.keys()
    }

    /// Vertices `u` has lent to, with amounts, in ascending order.
    pub fn borrowers_of(&self, u: &T) -> impl Iterator<Item = (&T, Decimal)> + '_ {
        self.adjacency
            .get(u)
            .into_iter()
            .flat_map(|n| n.iter().map(|(v, &w)| (v, w)))
    }

    /// Vertices that have lent to `u`, with amounts, in ascending order.
    pub fn lenders_to<'a>(
        &'a self,
        u: &'a T,
    ) -> impl Iterator<Item = (&'a T, Decimal)> + 'a {
        self.adjacency
            .iter()
            .filter_map(move |(x, n)| n.get(u).map(|&w| (x, w)))
    }

    /// Every loan, ordered by lender then borrower.
    pub fn loans(&self) -> impl Iterator<Item = Loan<T>> + '_ {
        self.adjacency.iter().flat_map(|(u, n)| {
            n.iter()
                .map(move |(v, &w)| Loan::new(u.clone(), v.clone(), w))
        })
    }

    /// Sum of every loan amount in the graph, saturating at `Decimal::MAX`.
    pub fn gross_total(&self) -> Decimal {
        saturating_sum(self.adjacency.values().flat_map(BTreeMap::values).copied())
    }

    /// Successor vertices used by the cycle search.
    pub(crate) fn successors(&self, u: &T) -> impl Iterator<Item = &T> + '_ {
        self.adjacency.get(u).into_iter().flat_map(BTreeMap::keys)
    }

    // --- Mutation ---

    /// Add `u` with no outgoing loans. No-op if present.
    pub fn insert_vertex(&mut self, u: T) {
        self.adjacency.entry(u).or_default();
    }

    /// Record that `u` lent `amount` to `v`, creating missing vertices.
    ///
    /// If the loan `(u, v)` already exists this is a no-op and `amount`
    /// is discarded.
    ///
    /// # Panics
    ///
    /// Panics if `u == v` or `amount` is not positive.
    pub fn insert_edge(&mut self, u: T, v: T, amount: Decimal) {
        if let Err(err) = self.try_insert_edge(u, v, amount) {
            panic!("{}", err);
        }
    }

    /// Checked form of [`insert_edge`](Self::insert_edge).
    pub fn try_insert_edge(&mut self, u: T, v: T, amount: Decimal) -> Result<(), GraphError> {
        if u == v {
            return Err(GraphError::self_loan(&u));
        }
        if amount <= Decimal::ZERO {
            return Err(GraphError::NonPositiveAmount { amount });
        }
        self.adjacency
            .entry(u)
            .or_default()
            .entry(v.clone())
            .or_insert(amount);
        self.insert_vertex(v);
        Ok(())
    }

    /// Remove `u` and every loan it takes part in. No-op if absent.
    pub fn remove_vertex(&mut self, u: &T) {
        if self.adjacency.remove(u).is_none() {
            return;
        }
        for borrowers in self.adjacency.values_mut() {
            borrowers.remove(u);
        }
    }

    /// Remove the loan `(u, v)`. No-op if absent.
    pub fn remove_edge(&mut self, u: &T, v: &T) {
        if let Some(borrowers) = self.adjacency.get_mut(u) {
            borrowers.remove(v);
        }
    }

    /// Increase an existing loan by `amount`. Returns false if absent.
    ///
    /// The loan is left unchanged if the sum would overflow.
    pub(crate) fn increase_loan(
        &mut self,
        u: &T,
        v: &T,
        amount: Decimal,
    ) -> Result<bool, GraphError> {
        let Some(weight) = self.adjacency.get_mut(u).and_then(|n| n.get_mut(v)) else {
            return Ok(false);
        };
        *weight = weight
            .checked_add(amount)
            .ok_or_else(|| GraphError::amount_overflow(u, v, amount))?;
        Ok(true)
    }

    /// Decrease an existing loan by `amount`, removing it once it reaches
    /// zero. Returns the remaining balance, which is negative when `amount`
    /// exceeded the loan, or `None` if the loan does not exist.
    pub(crate) fn decrease_loan(&mut self, u: &T, v: &T, amount: Decimal) -> Option<Decimal> {
        let borrowers = self.adjacency.get_mut(u)?;
        let weight = borrowers.get_mut(v)?;
        *weight -= amount;
        let remaining = *weight;
        if remaining <= Decimal::ZERO {
            borrowers.remove(v);
        }
        Some(remaining)
    }

    // --- Subgraph extraction ---

    /// Snapshot of the subgraph induced by `members`.
    ///
    /// The result holds exactly `members` and every loan whose endpoints
    /// both lie in `members`. It is an independent copy: later mutation of
    /// either graph does not affect the other.
    ///
    /// # Panics
    ///
    /// Panics if any member is not a vertex of this graph.
    pub fn induced(&self, members: &BTreeSet<T>) -> Self {
        match self.try_induced(members) {
            Ok(subgraph) => subgraph,
            Err(err) => panic!("{}", err),
        }
    }

    /// Checked form of [`induced`](Self::induced).
    pub fn try_induced(&self, members: &BTreeSet<T>) -> Result<Self, GraphError> {
        if let Some(missing) = members.iter().find(|u| !self.has_vertex(u)) {
            return Err(GraphError::unknown_vertex(missing));
        }
        let adjacency = members
            .iter()
            .map(|u| {
                let internal: BTreeMap<T, Decimal> = self
                    .borrowers_of(u)
                    .filter(|(v, _)| members.contains(*v))
                    .map(|(v, w)| (v.clone(), w))
                    .collect();
                (u.clone(), internal)
            })
            .collect();
        Ok(Self { adjacency })
    }

    // --- Aggregation ---

    /// Total amount `u` owes: the sum of loans made to `u`.
    ///
    /// Like every aggregate here, the sum saturates at `Decimal::MAX`.
    pub fn debt(&self, u: &T) -> Decimal {
        saturating_sum(self.lenders_to(u).map(|(_, w)| w))
    }

    /// Total amount owed to `u`: the sum of loans `u` has made.
    pub fn credit(&self, u: &T) -> Decimal {
        saturating_sum(self.borrowers_of(u).map(|(_, w)| w))
    }

    /// `credit(u) - debt(u)`. Netting never changes this value.
    pub fn net_position(&self, u: &T) -> Decimal {
        self.credit(u).saturating_sub(self.debt(u))
    }

    /// Net position of every vertex.
    pub fn net_positions(&self) -> Ledger<T> {
        let mut ledger = Ledger::new();
        for (u, borrowers) in &self.adjacency {
            ledger.touch(u);
            for (v, &w) in borrowers {
                ledger.apply_loan(u, v, w);
            }
        }
        ledger
    }

    /// Total owed by members of `subgraph` to vertices outside it.
    ///
    /// Only loans from an outside lender to a member count; loans between
    /// members are excluded. `subgraph` is used purely for membership.
    pub fn subgraph_debt(&self, subgraph: &Self) -> Decimal {
        self.boundary_total(|x, y| !subgraph.has_vertex(x) && subgraph.has_vertex(y))
    }

    /// Total owed to members of `subgraph` by vertices outside it.
    pub fn subgraph_credit(&self, subgraph: &Self) -> Decimal {
        self.boundary_total(|x, y| subgraph.has_vertex(x) && !subgraph.has_vertex(y))
    }

    fn boundary_total(&self, crosses: impl Fn(&T, &T) -> bool) -> Decimal {
        saturating_sum(
            self.adjacency
                .iter()
                .flat_map(|(x, n)| n.iter().map(move |(y, &w)| (x, y, w)))
                .filter(|(x, y, _)| crosses(*x, *y))
                .map(|(_, _, w)| w),
        )
    }

    // --- Netting ---

    /// Cancel every circular debt through `s`. See [`NettingEngine::reduce_vertex`].
    ///
    /// # Panics
    ///
    /// Panics if `s` is not a vertex of the graph.
    pub fn reduce(&mut self, s: &T) -> NettingReport<T> {
        match self.try_reduce(s) {
            Ok(report) => report,
            Err(err) => panic!("{}", err),
        }
    }

    /// Checked form of [`reduce`](Self::reduce).
    pub fn try_reduce(&mut self, s: &T) -> Result<NettingReport<T>, GraphError> {
        NettingEngine::reduce_vertex(self, s)
    }

    /// Cancel every circuit that leaves `subgraph` and re-enters it.
    /// See [`NettingEngine::reduce_subgraph`].
    ///
    /// # Panics
    ///
    /// Panics if settling the ends of a circuit would overflow a loan.
    pub fn reduce_subgraph(&mut self, subgraph: &Self) -> NettingReport<T> {
        match self.try_reduce_subgraph(subgraph) {
            Ok(report) => report,
            Err(err) => panic!("{}", err),
        }
    }

    /// Checked form of [`reduce_subgraph`](Self::reduce_subgraph).
    ///
    /// On error, cancellations made before the failing circuit stay
    /// applied and the failing circuit is left untouched.
    pub fn try_reduce_subgraph(
        &mut self,
        subgraph: &Self,
    ) -> Result<NettingReport<T>, GraphError> {
        NettingEngine::reduce_subgraph(self, subgraph)
    }

    /// Reduce every vertex in turn, leaving the graph free of cycles.
    pub fn reduce_all(&mut self) -> NettingReport<T> {
        match self.try_reduce_all() {
            Ok(report) => report,
            Err(err) => panic!("{}", err),
        }
    }

    /// Checked form of [`reduce_all`](Self::reduce_all).
    pub fn try_reduce_all(&mut self) -> Result<NettingReport<T>, GraphError> {
        NettingEngine::reduce_all(self)
    }
}

fn saturating_sum(amounts: impl Iterator<Item = Decimal>) -> Decimal {
    amounts.fold(Decimal::ZERO, Decimal::saturating_add)
}

impl<T: Ord + fmt::Display> fmt::Display for LoanGraph<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (u, borrowers) in &self.adjacency {
            if borrowers.is_empty() {
                writeln!(f, "{}", u)?;
            }
            for (v, w) in borrowers {
                writeln!(f, "{} -> {}: {}", u, v, w)?;
            }
        }
        Ok(())
    }
}
