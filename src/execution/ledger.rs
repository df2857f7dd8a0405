//! Balance ledger - single-writer task owning the process balance.
//!
//! Every read and every fill travels through one unbounded FIFO channel to a
//! task that owns the `Balance` by value. The guard check and the mutation
//! run inside one message handler, so no other request can observe or touch
//! the balance in between. Requests are served strictly in enqueue order.

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::core::{Balance, CandidateOrder, Error, Result};

/// Requests accepted by the ledger task
#[derive(Debug)]
pub enum LedgerCommand {
    /// Guarded fill; replies `true` when the balance changed
    ApplyFill {
        order: CandidateOrder,
        reply: oneshot::Sender<bool>,
    },

    /// Consistent read of the current balance
    Snapshot {
        reply: oneshot::Sender<Balance>,
    },
}

/// A queued fill awaiting the ledger's verdict
#[derive(Debug)]
pub struct PendingFill {
    verdict: Option<oneshot::Receiver<bool>>,
}

impl PendingFill {
    /// `true` if the balance changed. A ledger that went away before
    /// answering counts as a dropped fill.
    pub async fn outcome(self) -> bool {
        match self.verdict {
            Some(verdict) => verdict.await.unwrap_or(false),
            None => false,
        }
    }
}

/// Cloneable handle to the ledger task
#[derive(Debug, Clone)]
pub struct BalanceLedger {
    sender: mpsc::UnboundedSender<LedgerCommand>,
}

impl BalanceLedger {
    /// Spawn the ledger task on the current tokio runtime.
    ///
    /// The task exits once every handle has been dropped.
    pub fn spawn(initial: Balance) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<LedgerCommand>();

        tokio::spawn(async move {
            let mut balance = initial;
            info!("Ledger started with {}", balance);

            while let Some(command) = rx.recv().await {
                match command {
                    LedgerCommand::ApplyFill { order, reply } => {
                        let applied = balance.apply_fill(order.side, order.price, order.size);
                        if applied {
                            info!("FILLED {}", order);
                        } else {
                            debug!("Dropped {} against {}", order, balance);
                        }
                        let _ = reply.send(applied);
                    }

                    LedgerCommand::Snapshot { reply } => {
                        let _ = reply.send(balance);
                    }
                }
            }

            debug!("Ledger channel closed, final balance {}", balance);
        });

        Self { sender: tx }
    }

    /// Queue a fill without waiting. Fills are applied in the order they
    /// are enqueued.
    pub fn enqueue_fill(&self, order: CandidateOrder) -> PendingFill {
        let (reply, verdict) = oneshot::channel();
        if self.sender.send(LedgerCommand::ApplyFill { order, reply }).is_err() {
            warn!("Ledger closed, dropping {}", order);
            return PendingFill { verdict: None };
        }
        PendingFill { verdict: Some(verdict) }
    }

    /// Enqueue a fill and wait for the ledger's verdict.
    pub async fn apply_fill(&self, order: CandidateOrder) -> bool {
        self.enqueue_fill(order).outcome().await
    }

    /// Read the balance through the same queue as fills.
    pub async fn snapshot(&self) -> Result<Balance> {
        let (reply, balance) = oneshot::channel();
        self.sender
            .send(LedgerCommand::Snapshot { reply })
            .map_err(|_| Error::InvalidState("ledger closed".into()))?;
        balance
            .await
            .map_err(|_| Error::InvalidState("ledger dropped snapshot request".into()))
    }

    /// Snapshot and log the balance.
    pub async fn report(&self) -> Result<Balance> {
        let balance = self.snapshot().await?;
        info!("Overall market assets balance: {}", balance);
        Ok(balance)
    }
}
