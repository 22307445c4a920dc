use rust_decimal::Decimal;
use thiserror::Error;

/// Errors reported by the checked (`try_*`) graph operations.
///
/// The unchecked counterparts panic with the same message. Mutations are
/// validated before they start, so an error never leaves a loan half-updated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("vertex {vertex} cannot lend to itself")]
    SelfLoan { vertex: String },
    #[error("loan amount must be positive, got {amount}")]
    NonPositiveAmount { amount: Decimal },
    #[error("vertex {vertex} is not in the graph")]
    UnknownVertex { vertex: String },
    #[error("loan {lender} -> {borrower} cannot grow by {amount} without overflowing")]
    AmountOverflow {
        lender: String,
        borrower: String,
        amount: Decimal,
    },
    #[error("path {path} is not a simple circuit along existing loans")]
    InvalidCircuit { path: String },
}

impl GraphError {
    pub(crate) fn self_loan(vertex: &impl std::fmt::Debug) -> Self {
        Self::SelfLoan {
            vertex: format!("{:?}", vertex),
        }
    }

    pub(crate) fn amount_overflow(
        lender: &impl std::fmt::Debug,
        borrower: &impl std::fmt::Debug,
        amount: Decimal,
    ) -> Self {
        Self::AmountOverflow {
            lender: format!("{:?}", lender),
            borrower: format!("{:?}", borrower),
            amount,
        }
    }

    pub(crate) fn invalid_circuit(path: &impl std::fmt::Debug) -> Self {
        Self::InvalidCircuit {
            path: format!("{:?}", path),
        }
    }

    pub(crate) fn unknown_vertex(vertex: &impl std::fmt::Debug) -> Self {
        Self::UnknownVertex {
            vertex: format!("{:?}", vertex),
        }
    }
}
