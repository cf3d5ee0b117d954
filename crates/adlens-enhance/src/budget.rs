//! Spend ledger with a hard ceiling
//!
//! The ledger is explicitly passed, explicitly owned shared state — never an
//! ambient singleton — so multiple analyzer instances and tests run in
//! isolation with independent ledgers. Cloning shares the underlying cost
//! record.
//!
//! Cumulative spend is monotonically non-decreasing and never rolled back: a
//! spent external call is spent, even when its result turns out unusable.

use adlens_core::CostSnapshot;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug)]
struct CostRecord {
    ceiling: f64,
    spent: f64,
    reserved: f64,
    calls_made: u64,
}

impl CostRecord {
    fn snapshot(&self) -> CostSnapshot {
        CostSnapshot {
            spent: self.spent,
            ceiling: self.ceiling,
            remaining: (self.ceiling - self.spent).max(0.0),
            calls_made: self.calls_made,
        }
    }
}

/// Process-wide spend tracker enforcing a hard budget ceiling
///
/// Two states: Open (remaining budget > 0) and Exhausted (remaining ≤ 0).
/// Once exhausted, every admission is refused; the ledger never resets
/// itself — a new session gets a new ledger.
#[derive(Debug, Clone)]
pub struct BudgetLedger {
    record: Arc<Mutex<CostRecord>>,
}

impl BudgetLedger {
    /// Create a ledger with the given ceiling in USD
    pub fn new(ceiling: f64) -> Self {
        Self {
            record: Arc::new(Mutex::new(CostRecord {
                ceiling,
                spent: 0.0,
                reserved: 0.0,
                calls_made: 0,
            })),
        }
    }

    /// Pure admission check: would a charge of `estimated_cost` fit?
    ///
    /// Does not mutate the ledger. Under concurrency, use [`reserve`] to
    /// make the admit+commit pair atomic.
    ///
    /// [`reserve`]: Self::reserve
    pub fn admit(&self, estimated_cost: f64) -> bool {
        let record = self.record.lock();
        let headroom = record.ceiling - record.spent - record.reserved;
        headroom > 0.0 && headroom >= estimated_cost
    }

    /// Reserve headroom for one in-flight call
    ///
    /// Returns `None` when the estimate does not fit. The reservation must
    /// be committed with the actual cost once the provider confirms billing;
    /// dropping it uncommitted releases the headroom without spending.
    pub fn reserve(&self, estimated_cost: f64) -> Option<Reservation> {
        let mut record = self.record.lock();
        let headroom = record.ceiling - record.spent - record.reserved;
        if headroom <= 0.0 || headroom < estimated_cost {
            return None;
        }
        record.reserved += estimated_cost;
        Some(Reservation {
            ledger: self.clone(),
            amount: estimated_cost,
            committed: false,
        })
    }

    /// Current spend position
    pub fn snapshot(&self) -> CostSnapshot {
        self.record.lock().snapshot()
    }

    /// Whether cumulative spend has reached the ceiling
    pub fn is_exhausted(&self) -> bool {
        let record = self.record.lock();
        record.spent >= record.ceiling
    }

    /// Cumulative spend in USD
    pub fn spent(&self) -> f64 {
        self.record.lock().spent
    }

    /// Remaining budget, clamped at zero
    pub fn remaining(&self) -> f64 {
        self.snapshot().remaining
    }

    /// Number of committed calls
    pub fn calls_made(&self) -> u64 {
        self.record.lock().calls_made
    }

    fn commit_reserved(&self, reserved: f64, actual_cost: f64) -> CostSnapshot {
        let mut record = self.record.lock();
        record.reserved -= reserved;
        record.spent += actual_cost;
        record.calls_made += 1;
        record.snapshot()
    }

    fn release_reserved(&self, reserved: f64) {
        self.record.lock().reserved -= reserved;
    }
}

/// Headroom held for one in-flight enhancement call
///
/// Commit moves the actual cost into cumulative spend; dropping without
/// committing releases the headroom. Committed spend is never rolled back.
#[derive(Debug)]
pub struct Reservation {
    ledger: BudgetLedger,
    amount: f64,
    committed: bool,
}

impl Reservation {
    /// Commit the confirmed cost of the call this reservation covered
    pub fn commit(mut self, actual_cost: f64) -> CostSnapshot {
        self.committed = true;
        self.ledger.commit_reserved(self.amount, actual_cost)
    }

    /// The estimated amount held by this reservation
    pub fn amount(&self) -> f64 {
        self.amount
    }
}

impl Drop for Reservation {
    fn drop(&mut self) {
        if !self.committed {
            self.ledger.release_reserved(self.amount);
        }
    }
}
