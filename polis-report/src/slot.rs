//! Current-aggregate slot for the view layer
//!
//! Builds may overlap: a refresh can start before the previous one finished.
//! Every build takes a sequence number from [`AggregateSlot::begin_build`]
//! and a completion is applied only if its sequence number is newer than the
//! last applied one. A build that finishes after a newer build already
//! completed is discarded.

use crate::aggregate::ConversationAggregate;
use crate::builder::ReportBuilder;
use crate::error::BuildError;
use crate::source::ReportSource;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

/// What the view layer currently shows
#[derive(Debug, Clone, Default)]
pub struct SlotState {
    /// Sequence number of the last applied completion (0 = none yet)
    pub seq: u64,
    /// Last successfully built aggregate, kept across failed builds
    pub aggregate: Option<Arc<ConversationAggregate>>,
    /// Error of the last applied completion, cleared on success
    pub error: Option<String>,
}

pub struct AggregateSlot {
    next_seq: AtomicU64,
    tx: watch::Sender<SlotState>,
}

impl AggregateSlot {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SlotState::default());
        Self {
            next_seq: AtomicU64::new(1),
            tx,
        }
    }

    /// Reserve the sequence number for a new build
    pub fn begin_build(&self) -> u64 {
        self.next_seq.fetch_add(1, Ordering::SeqCst)
    }

    /// Publish a finished aggregate; returns false if `seq` is stale
    pub fn publish(&self, seq: u64, aggregate: ConversationAggregate) -> bool {
        let aggregate = Arc::new(aggregate);
        let accepted = self.tx.send_if_modified(|state| {
            if seq <= state.seq {
                return false;
            }
            state.seq = seq;
            state.aggregate = Some(Arc::clone(&aggregate));
            state.error = None;
            true
        });

        if accepted {
            debug!(seq, "Published conversation report");
        } else {
            debug!(seq, "Discarded stale conversation report");
        }
        accepted
    }

    /// Record a failed build; the previous aggregate stays in place
    pub fn fail(&self, seq: u64, error: &BuildError) -> bool {
        let message = error.to_string();
        self.tx.send_if_modified(|state| {
            if seq <= state.seq {
                return false;
            }
            state.seq = seq;
            state.error = Some(message);
            true
        })
    }

    /// Build with `builder` and apply the result to the slot
    ///
    /// Returns `Ok(true)` if the new aggregate was published, `Ok(false)` if
    /// a newer build completed first.
    pub async fn refresh<S: ReportSource>(
        &self,
        builder: &ReportBuilder<S>,
        conversation_id: &str,
    ) -> Result<bool, BuildError> {
        let seq = self.begin_build();
        match builder.build(conversation_id).await {
            Ok(aggregate) => Ok(self.publish(seq, aggregate)),
            Err(e) => {
                warn!(seq, conversation_id = %conversation_id, error = %e, "Conversation report build failed");
                self.fail(seq, &e);
                Err(e)
            }
        }
    }

    /// Currently displayed aggregate, if any
    pub fn current(&self) -> Option<Arc<ConversationAggregate>> {
        self.tx.borrow().aggregate.clone()
    }

    pub fn state(&self) -> SlotState {
        self.tx.borrow().clone()
    }

    /// Receiver notified on every applied completion
    pub fn subscribe(&self) -> watch::Receiver<SlotState> {
        self.tx.subscribe()
    }
}

impl Default for AggregateSlot {
    fn default() -> Self {
        Self::new()
    }
}
