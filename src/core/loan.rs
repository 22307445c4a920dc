use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A directed loan between two vertices.
///
/// `lender` has lent `amount` to `borrower`, so `borrower` owes `lender`.
/// This is the edge type of [`LoanGraph`](crate::graph::loan_graph::LoanGraph):
/// it is accepted by `LoanGraph::from_loans` and produced by
/// `LoanGraph::loans`.
///
/// # Examples
///
/// ```
/// use debt_graph::core::loan::Loan;
/// use rust_decimal_macros::dec;
///
/// let loan = Loan::new("BANK", "ALICE", dec!(250));
/// assert_eq!(*loan.lender(), "BANK");
/// assert_eq!(loan.amount(), dec!(250));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan<T> {
    lender: T,
    borrower: T,
    amount: Decimal,
}

impl<T: PartialEq> Loan<T> {
    /// Create a new loan.
    ///
    /// # Panics
    ///
    /// Panics if `amount` is not positive or if `lender == borrower`.
    pub fn new(lender: T, borrower: T, amount: Decimal) -> Self {
        assert!(
            amount > Decimal::ZERO,
            "Loan amount must be positive, got {}",
            amount
        );
        assert!(lender != borrower, "A vertex cannot lend to itself");
        Self {
            lender,
            borrower,
            amount,
        }
    }

    pub fn lender(&self) -> &T {
        &self.lender
    }

    pub fn borrower(&self) -> &T {
        &self.borrower
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Split the loan into `(lender, borrower, amount)`.
    pub fn into_parts(self) -> (T, T, Decimal) {
        (self.lender, self.borrower, self.amount)
    }
}
