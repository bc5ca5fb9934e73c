use serde::Serialize;
use crate::state::session::SessionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PurchaseOutcome {
    Purchased { balance: u32 },
    InsufficientFunds { balance: u32 },
}

impl PurchaseOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self, PurchaseOutcome::Purchased { .. })
    }

    pub fn balance(&self) -> u32 {
        match self {
            PurchaseOutcome::Purchased { balance } | PurchaseOutcome::InsufficientFunds { balance } => *balance,
        }
    }
}

/// New balance after paying `price`, or None when the balance can't cover it
pub fn debit(balance: u32, price: u32) -> Option<u32> {
    balance.checked_sub(price)
}

/// Check-and-debit against the session's credits
pub fn purchase(session: &mut SessionState, price: u32) -> PurchaseOutcome {
    match debit(session.credits, price) {
        Some(balance) => {
            session.credits = balance;
            PurchaseOutcome::Purchased { balance }
        }
        None => PurchaseOutcome::InsufficientFunds { balance: session.credits },
    }
}
