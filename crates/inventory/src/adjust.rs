//! Stock-adjustment arithmetic.
//!
//! The quantity-edit surface offers fixed quick adjustments (±1, ±10) and a
//! custom amount; both use the same formulas. Removal clamps at zero so the
//! stored stock can never go negative.

use serde::{Deserialize, Serialize};

use stockline_core::{DomainError, DomainResult};

/// Fixed amounts offered as one-tap adjustments.
pub const QUICK_ADJUST_AMOUNTS: [u32; 2] = [1, 10];

/// Direction of a relative stock change.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustOp {
    Add,
    Remove,
}

/// A validated relative stock change.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StockAdjustment {
    op: AdjustOp,
    amount: u32,
}

impl StockAdjustment {
    /// Build an adjustment, rejecting non-positive amounts before they can
    /// reach the store.
    pub fn new(op: AdjustOp, amount: u32) -> DomainResult<Self> {
        if amount == 0 {
            return Err(DomainError::validation(
                "adjustment amount must be a positive integer",
            ));
        }
        Ok(Self { op, amount })
    }

    pub fn add(amount: u32) -> DomainResult<Self> {
        Self::new(AdjustOp::Add, amount)
    }

    pub fn remove(amount: u32) -> DomainResult<Self> {
        Self::new(AdjustOp::Remove, amount)
    }

    pub fn op(&self) -> AdjustOp {
        self.op
    }

    pub fn amount(&self) -> u32 {
        self.amount
    }

    pub fn is_quick(&self) -> bool {
        QUICK_ADJUST_AMOUNTS.contains(&self.amount)
    }

    /// Apply to a current stock level.
    ///
    /// `Add` saturates at `u32::MAX`; `Remove` clamps at zero.
    pub fn apply(&self, stock: u32) -> u32 {
        match self.op {
            AdjustOp::Add => stock.saturating_add(self.amount),
            AdjustOp::Remove => stock.saturating_sub(self.amount),
        }
    }
}
