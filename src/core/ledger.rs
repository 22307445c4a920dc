use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Net position of each vertex: what it is owed minus what it owes.
///
/// A positive balance means the vertex is a net creditor.
/// A negative balance means the vertex is a net debtor.
///
/// Netting must leave every entry of the ledger untouched, so comparing
/// the ledger taken before and after a reduction is the conservation check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger<T: Ord> {
    positions: BTreeMap<T, Decimal>,
}

impl<T: Ord> Default for Ledger<T> {
    fn default() -> Self {
        Self {
            positions: BTreeMap::new(),
        }
    }
}

impl<T: Ord + Clone> Ledger<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a loan: the lender's balance rises, the borrower's falls.
    ///
    /// Balances saturate at `Decimal::MAX` / `Decimal::MIN`.
    pub fn apply_loan(&mut self, lender: &T, borrower: &T, amount: Decimal) {
        let credit = self.positions.entry(lender.clone()).or_insert(Decimal::ZERO);
        *credit = credit.saturating_add(amount);
        let debit = self
            .positions
            .entry(borrower.clone())
            .or_insert(Decimal::ZERO);
        *debit = debit.saturating_sub(amount);
    }

    /// Make sure `vertex` has an entry, even if it never lends or borrows.
    pub fn touch(&mut self, vertex: &T) {
        self.positions
            .entry(vertex.clone())
            .or_insert(Decimal::ZERO);
    }

    /// Net position of a vertex; zero for unknown vertices.
    pub fn position(&self, vertex: &T) -> Decimal {
        self.positions
            .get(vertex)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// All positions in ascending vertex order.
    pub fn all_positions(&self) -> &BTreeMap<T, Decimal> {
        &self.positions
    }

    /// Sum of all positions is zero: net creditors are owed exactly what
    /// net debtors owe.
    pub fn is_balanced(&self) -> bool {
        let owed = self
            .positions
            .values()
            .filter(|v| **v < Decimal::ZERO)
            .fold(Decimal::ZERO, |acc, v| acc.saturating_sub(*v));
        self.total_net_settlement() == owed
    }

    /// Amount that would actually change hands if every vertex settled
    /// its net position (sum of positive balances, saturating).
    pub fn total_net_settlement(&self) -> Decimal {
        self.positions
            .values()
            .filter(|v| **v > Decimal::ZERO)
            .fold(Decimal::ZERO, |acc, v| acc.saturating_add(*v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_ledger_basic() {
        let mut ledger = Ledger::new();
        ledger.apply_loan(&"A", &"B", dec!(100));

        assert_eq!(ledger.position(&"A"), dec!(100));
        assert_eq!(ledger.position(&"B"), dec!(-100));
        assert_eq!(ledger.position(&"Z"), Decimal::ZERO);
        assert!(ledger.is_balanced());
    }

    #[test]
    fn test_ledger_circular_cancels() {
        let mut ledger = Ledger::new();
        ledger.apply_loan(&"A", &"B", dec!(100));
        ledger.apply_loan(&"B", &"C", dec!(100));
        ledger.apply_loan(&"C", &"A", dec!(100));

        assert_eq!(ledger.position(&"A"), Decimal::ZERO);
        assert_eq!(ledger.total_net_settlement(), Decimal::ZERO);
    }

    #[test]
    fn test_ledger_saturates_at_decimal_max() {
        let mut ledger = Ledger::new();
        ledger.apply_loan(&"A", &"C", Decimal::MAX);
        ledger.apply_loan(&"B", &"C", Decimal::MAX);

        assert_eq!(ledger.position(&"C"), Decimal::MIN);
        assert_eq!(ledger.total_net_settlement(), Decimal::MAX);
    }

    #[test]
    fn test_ledger_touch_keeps_isolated_vertex() {
        let mut ledger: Ledger<&str> = Ledger::new();
        ledger.touch(&"LONE");
        assert_eq!(ledger.all_positions().len(), 1);
        assert_eq!(ledger.position(&"LONE"), Decimal::ZERO);
    }
}
