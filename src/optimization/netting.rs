use crate::core::error::GraphError;
use crate::graph::cycle_search::{find_boundary_circuit, find_cycle, Circuit};
use crate::graph::loan_graph::LoanGraph;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One cancellation performed by the netting engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cancellation<T> {
    /// The circuit that was cancelled.
    pub circuit: Circuit<T>,
    /// Amount subtracted from every loan along the circuit.
    pub amount: Decimal,
}

/// Outcome of a netting run over a loan graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NettingReport<T> {
    cancellations: Vec<Cancellation<T>>,
    /// Sum of all loans before netting.
    gross_before: Decimal,
    /// Sum of all loans after netting.
    gross_after: Decimal,
}

impl<T> NettingReport<T> {
    /// Cancellations in the order they were applied.
    pub fn cancellations(&self) -> &[Cancellation<T>] {
        &self.cancellations
    }

    /// Number of cancellations applied.
    pub fn len(&self) -> usize {
        self.cancellations.len()
    }

    /// True when the graph was already at a fixed point.
    pub fn is_empty(&self) -> bool {
        self.cancellations.is_empty()
    }

    pub fn gross_before(&self) -> Decimal {
        self.gross_before
    }

    pub fn gross_after(&self) -> Decimal {
        self.gross_after
    }

    /// Gross obligations removed by netting.
    pub fn savings(&self) -> Decimal {
        self.gross_before - self.gross_after
    }

    /// Savings as a percentage of the gross total before netting.
    pub fn savings_percent(&self) -> f64 {
        if self.gross_before == Decimal::ZERO {
            return 0.0;
        }
        let pct = self.savings() * Decimal::from(100) / self.gross_before;
        pct.to_string().parse::<f64>().unwrap_or(0.0)
    }

    fn merge(&mut self, other: NettingReport<T>) {
        self.cancellations.extend(other.cancellations);
        self.gross_after = other.gross_after;
    }
}

impl<T: fmt::Debug> fmt::Display for NettingReport<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Netting Report ===")?;
        writeln!(f, "Gross Before:   {}", self.gross_before)?;
        writeln!(f, "Gross After:    {}", self.gross_after)?;
        writeln!(f, "Savings:        {}", self.savings())?;
        writeln!(f, "Savings %:      {:.1}%", self.savings_percent())?;
        writeln!(f, "Cancellations:  {}", self.cancellations.len())?;
        for (i, c) in self.cancellations.iter().enumerate() {
            writeln!(f, "  {}: {:?} by {}", i, c.circuit.path(), c.amount)?;
        }
        Ok(())
    }
}

/// The netting engine.
///
/// Cancels circular obligations in place without changing any vertex's
/// net position (`credit - debt`).
pub struct NettingEngine;

impl NettingEngine {
    /// Cancel every cycle through `start`.
    ///
    /// Repeatedly searches for a cycle through `start` (see
    /// [`find_cycle`]) and cancels it, until none is left. Cancelling a
    /// cycle removes at least one loan and adds none, so the loop ends.
    pub fn reduce_vertex<T>(
        graph: &mut LoanGraph<T>,
        start: &T,
    ) -> Result<NettingReport<T>, GraphError>
    where
        T: Ord + Clone + fmt::Debug,
    {
        if !graph.has_vertex(start) {
            return Err(GraphError::unknown_vertex(start));
        }
        Self::run(graph, |g| find_cycle(g, start))
    }

    /// Cancel every circuit that routes a member's debt out of `subgraph`
    /// and back in.
    ///
    /// Searches the full graph for the first boundary circuit (see
    /// [`find_boundary_circuit`]), cancels it, and restarts from scratch
    /// until no member yields a circuit. `subgraph` is read only for its
    /// membership; it is not updated as `graph` changes.
    ///
    /// Fails with [`GraphError::AmountOverflow`] when settling the ends of
    /// a circuit would overflow a loan; that circuit is left untouched.
    pub fn reduce_subgraph<T>(
        graph: &mut LoanGraph<T>,
        subgraph: &LoanGraph<T>,
    ) -> Result<NettingReport<T>, GraphError>
    where
        T: Ord + Clone + fmt::Debug,
    {
        Self::run(graph, |g| find_boundary_circuit(g, subgraph))
    }

    /// Reduce every vertex in ascending order.
    ///
    /// Vertex reduction never creates loans, so a vertex left without
    /// cycles stays that way and the final graph is acyclic.
    pub fn reduce_all<T>(graph: &mut LoanGraph<T>) -> Result<NettingReport<T>, GraphError>
    where
        T: Ord + Clone + fmt::Debug,
    {
        let vertices: Vec<T> = graph.vertices().cloned().collect();
        let gross = graph.gross_total();
        let mut report = NettingReport {
            cancellations: Vec::new(),
            gross_before: gross,
            gross_after: gross,
        };
        for vertex in &vertices {
            report.merge(Self::run(graph, |g| find_cycle(g, vertex))?);
        }
        Ok(report)
    }

    /// Cancel one circuit and return the amount cancelled.
    ///
    /// The smallest loan along the path is subtracted from every loan on
    /// it; loans that reach zero are removed. When the path ends on a
    /// different vertex than it started from, the balance between its two
    /// ends is settled so that net positions are unchanged:
    ///
    /// - an existing loan `first -> last` grows by the amount,
    /// - otherwise an existing loan `last -> first` shrinks by it (and flips
    ///   direction if the amount exceeds it),
    /// - otherwise a loan `first -> last` is created.
    ///
    /// The graph is left untouched when the path repeats a vertex or does
    /// not follow existing loans, or when growing `first -> last` would
    /// overflow.
    pub(crate) fn cancel_circuit<T>(
        graph: &mut LoanGraph<T>,
        circuit: &Circuit<T>,
    ) -> Result<Decimal, GraphError>
    where
        T: Ord + Clone + fmt::Debug,
    {
        let invalid = || GraphError::invalid_circuit(&circuit.path());
        if !circuit.is_simple() {
            return Err(invalid());
        }
        let amount = circuit.bottleneck(graph).ok_or_else(invalid)?;
        let (Some(first), Some(last)) = (circuit.first(), circuit.last()) else {
            return Err(invalid());
        };

        // A single hop is removed before the ends are settled.
        if first != last && circuit.hops() > 1 {
            if let Some(w) = graph.weight(first, last) {
                if w.checked_add(amount).is_none() {
                    return Err(GraphError::amount_overflow(first, last, amount));
                }
            }
        }

        for hop in circuit.path().windows(2) {
            graph.decrease_loan(&hop[0], &hop[1], amount);
        }
        if first != last {
            settle_ends(graph, first, last, amount)?;
        }
        log::debug!("cancelled {} along {:?}", amount, circuit.path());
        Ok(amount)
    }

    fn run<T, F>(
        graph: &mut LoanGraph<T>,
        mut search: F,
    ) -> Result<NettingReport<T>, GraphError>
    where
        T: Ord + Clone + fmt::Debug,
        F: FnMut(&LoanGraph<T>) -> Option<Circuit<T>>,
    {
        let gross_before = graph.gross_total();
        let mut cancellations = Vec::new();
        while let Some(circuit) = search(&*graph) {
            let amount = match Self::cancel_circuit(graph, &circuit) {
                Ok(amount) => amount,
                Err(err) => {
                    log::warn!(
                        "netting stopped after {} cancellation(s): {}",
                        cancellations.len(),
                        err
                    );
                    return Err(err);
                }
            };
            cancellations.push(Cancellation { circuit, amount });
        }
        let gross_after = graph.gross_total();
        if !cancellations.is_empty() {
            log::info!(
                "netting applied {} cancellation(s), gross {} -> {}",
                cancellations.len(),
                gross_before,
                gross_after
            );
        }
        Ok(NettingReport {
            cancellations,
            gross_before,
            gross_after,
        })
    }
}

fn settle_ends<T>(
    graph: &mut LoanGraph<T>,
    first: &T,
    last: &T,
    amount: Decimal,
) -> Result<(), GraphError>
where
    T: Ord + Clone + fmt::Debug,
{
    if graph.increase_loan(first, last, amount)? {
        return Ok(());
    }
    let shortfall = match graph.decrease_loan(last, first, amount) {
        Some(remaining) if remaining < Decimal::ZERO => -remaining,
        Some(_) => return Ok(()),
        None => amount,
    };
    graph.try_insert_edge(first.clone(), last.clone(), shortfall)
}
