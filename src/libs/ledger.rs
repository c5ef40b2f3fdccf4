//! Single-writer owner of the persisted ledger.
//!
//! Every change to the stored counters is a [`Mutation`] sent to one actor
//! task. The actor handles mutations strictly in the order they were sent and
//! runs the whole read-merge-write cycle for one before it starts the next, so
//! two flushes can never both read the same stale totals. Callers that only
//! record time or clicks do not wait for storage; callers that need an answer
//! (queries, resets, shutdown) await a reply.
//!
//! ```text
//!  tracker ──add_time──┐
//!  router ──add_click──┼──▶ [ unbounded queue ] ──▶ actor: read → merge → write
//!  queries ──snapshot──┘                                     │
//!                                          reply (oneshot) ◀─┘
//! ```

use crate::db::storage::{LedgerError, LedgerStore};
use crate::libs::accumulator::{self, ClickKind, LedgerRecord};
use chrono::NaiveDate;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// A change to apply to the stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// Writes a zeroed record if none exists yet.
    Initialize,
    AddTime(u64),
    Click(ClickKind),
    ResetToday,
    /// Applies the lazy day rollover and returns the result.
    Rollover,
    /// Reads without writing. Also acts as a barrier for earlier mutations.
    Read,
}

type Reply = oneshot::Sender<Result<LedgerRecord, LedgerError>>;

struct Command {
    mutation: Mutation,
    today: NaiveDate,
    reply: Option<Reply>,
}

/// Cloneable handle to the ledger actor.
#[derive(Clone)]
pub struct Ledger {
    tx: mpsc::UnboundedSender<Command>,
}

impl Ledger {
    /// Starts the actor on the current tokio runtime.
    ///
    /// The actor stops once every handle has been dropped and the queue is
    /// drained; awaiting the returned handle waits for that.
    pub fn spawn<S: LedgerStore>(store: S) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run(store, rx));
        (Self { tx }, worker)
    }

    /// Queues a flushed session span. Does not wait for storage.
    pub fn add_time(&self, elapsed_ms: u64, today: NaiveDate) {
        self.submit(Mutation::AddTime(elapsed_ms), today);
    }

    pub fn add_click(&self, kind: ClickKind, today: NaiveDate) {
        self.submit(Mutation::Click(kind), today);
    }

    pub fn initialize(&self, today: NaiveDate) {
        self.submit(Mutation::Initialize, today);
    }

    pub async fn reset_today(&self, today: NaiveDate) -> Result<LedgerRecord, LedgerError> {
        self.request(Mutation::ResetToday, today).await
    }

    /// Current record with the day rollover applied (and persisted if it fired).
    ///
    /// The request is queued before this returns, so mutations submitted
    /// afterwards are not part of the answer.
    pub fn snapshot(&self, today: NaiveDate) -> PendingRecord {
        self.enqueue(Mutation::Rollover, today)
    }

    /// Waits until every mutation queued before this call has been handled.
    pub async fn sync(&self, today: NaiveDate) -> Result<LedgerRecord, LedgerError> {
        self.request(Mutation::Read, today).await
    }

    fn submit(&self, mutation: Mutation, today: NaiveDate) {
        let command = Command {
            mutation,
            today,
            reply: None,
        };
        if self.tx.send(command).is_err() {
            warn!(?mutation, "ledger stopped, dropping mutation");
        }
    }

    async fn request(&self, mutation: Mutation, today: NaiveDate) -> Result<LedgerRecord, LedgerError> {
        self.enqueue(mutation, today).wait().await
    }

    fn enqueue(&self, mutation: Mutation, today: NaiveDate) -> PendingRecord {
        let (reply_tx, reply_rx) = oneshot::channel();
        let command = Command {
            mutation,
            today,
            reply: Some(reply_tx),
        };
        let queued = self.tx.send(command).map(|_| reply_rx).map_err(|_| LedgerError::Closed);
        PendingRecord { reply: queued }
    }
}

/// Answer to a request that already holds its place in the ledger queue.
pub struct PendingRecord {
    reply: Result<oneshot::Receiver<Result<LedgerRecord, LedgerError>>, LedgerError>,
}

impl PendingRecord {
    pub async fn wait(self) -> Result<LedgerRecord, LedgerError> {
        self.reply?.await.map_err(|_| LedgerError::Closed)?
    }
}

async fn run<S: LedgerStore>(store: S, mut rx: mpsc::UnboundedReceiver<Command>) {
    while let Some(command) = rx.recv().await {
        let result = apply(&store, command.mutation, command.today).await;
        if let Err(err) = &result {
            warn!(mutation = ?command.mutation, error = %err, "ledger update dropped");
        }
        if let Some(reply) = command.reply {
            let _ = reply.send(result);
        }
    }
    debug!("ledger actor stopped");
}

async fn apply<S: LedgerStore>(store: &S, mutation: Mutation, today: NaiveDate) -> Result<LedgerRecord, LedgerError> {
    let stored = store.read().await?;

    let (next, changed) = match (mutation, stored) {
        (Mutation::Initialize, None) => (LedgerRecord::fresh(today), true),
        (Mutation::Initialize, Some(record)) => (record, false),
        (Mutation::Read, stored) => (stored.unwrap_or_default(), false),
        (Mutation::Rollover, stored) => {
            let mut record = stored.unwrap_or_default();
            let changed = accumulator::roll_over(&mut record, today);
            (record, changed)
        }
        (Mutation::AddTime(0), stored) => (stored.unwrap_or_default(), false),
        (Mutation::AddTime(elapsed_ms), stored) => (accumulator::add_elapsed(stored.unwrap_or_default(), elapsed_ms, today), true),
        (Mutation::Click(kind), stored) => (accumulator::add_click(stored.unwrap_or_default(), kind, today), true),
        (Mutation::ResetToday, stored) => (accumulator::reset_today(stored.unwrap_or_default(), today), true),
    };

    if changed {
        store.write(&next).await?;
        debug!(?mutation, total_ms = next.total_time_ms, today_ms = next.today_time_ms, "ledger updated");
    }
    Ok(next)
}
