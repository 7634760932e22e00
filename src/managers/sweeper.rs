use std::sync::Arc;
use std::time::Duration;

use super::deposits::DepositManager;
use super::orders::OrderManager;

/// What one sweep pass did
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    /// Auto deposits the gateway confirmed this pass
    pub deposits_completed: usize,
    /// Pending deposits retired by expiry
    pub deposits_expired: usize,
    /// Pending orders cancelled by expiry
    pub orders_expired: usize,
}

/// Background loop: poll pending auto payments and run the expiry sweeps
///
/// Errors inside a pass are logged and the loop keeps running; nothing
/// here is fatal to the process.
pub struct Sweeper {
    orders: Arc<OrderManager>,
    deposits: Arc<DepositManager>,
    interval: Duration,
}

impl Sweeper {
    pub fn new(orders: Arc<OrderManager>, deposits: Arc<DepositManager>, interval: Duration) -> Self {
        Self {
            orders,
            deposits,
            interval,
        }
    }

    /// One full pass: gateway re-check, then both expiry sweeps
    pub async fn run_once(&self) -> SweepReport {
        let mut report = SweepReport::default();

        match self.deposits.poll_pending().await {
            Ok(n) => report.deposits_completed = n,
            Err(e) => tracing::error!(error = %e, "Auto deposit poll pass failed"),
        }

        match self.deposits.expire_pending().await {
            Ok(n) => report.deposits_expired = n,
            Err(e) => tracing::error!(error = %e, "Deposit expiry sweep failed"),
        }

        match self.orders.expire_pending().await {
            Ok(n) => report.orders_expired = n,
            Err(e) => tracing::error!(error = %e, "Order expiry sweep failed"),
        }

        if report != SweepReport::default() {
            tracing::info!(?report, "Sweep pass finished");
        }
        report
    }

    /// Runs sweep passes forever at the configured interval
    pub async fn run(&self) {
        let mut ticker = tokio::time::interval(self.interval);
        // The first tick fires immediately; skip it.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            self.run_once().await;
        }
    }
}
