//! The conversation report aggregate
//!
//! One immutable snapshot per successful build. Fields are read through
//! accessors only; a newer build produces a new value that replaces the old
//! one wholesale.

use crate::sanitize::CorrelationMatrix;
use crate::tid_format::TidFormatter;
use chrono::{DateTime, Utc};
use polis_common::{CoOccurrenceMatrix, Comment, MathResult, Tid};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationAggregate {
    pub(crate) conversation_id: String,
    pub(crate) math: MathResult,
    pub(crate) comments: Vec<Comment>,
    pub(crate) participants: Value,
    pub(crate) conversation: Value,
    pub(crate) group_demographics: Value,
    pub(crate) group_names: BTreeMap<String, String>,
    pub(crate) participant_count: u64,
    pub(crate) agree_matrix: CoOccurrenceMatrix,
    pub(crate) correlation_matrix: CorrelationMatrix,
    pub(crate) removed_ids: BTreeSet<Tid>,
    pub(crate) tid_format: TidFormatter,
    pub(crate) fetched_at: DateTime<Utc>,
}

impl ConversationAggregate {
    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    /// PCA / group math result as fetched
    pub fn math(&self) -> &MathResult {
        &self.math
    }

    /// Consensus statements from the math result
    pub fn consensus(&self) -> Option<&Value> {
        self.math.consensus.as_ref()
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn comment(&self, tid: Tid) -> Option<&Comment> {
        self.comments.iter().find(|c| c.tid == tid)
    }

    /// Participants of interest
    pub fn participants(&self) -> &Value {
        &self.participants
    }

    /// Conversation metadata
    pub fn conversation(&self) -> &Value {
        &self.conversation
    }

    pub fn group_demographics(&self) -> &Value {
        &self.group_demographics
    }

    /// Display label per group key
    pub fn group_names(&self) -> &BTreeMap<String, String> {
        &self.group_names
    }

    /// Sum of group member counts
    pub fn participant_count(&self) -> u64 {
        self.participant_count
    }

    /// Agree co-occurrence matrix exactly as fetched, sentinels included
    pub fn agree_matrix(&self) -> &CoOccurrenceMatrix {
        &self.agree_matrix
    }

    /// Correlation matrix with corrupted rows and columns removed
    pub fn correlation_matrix(&self) -> &CorrelationMatrix {
        &self.correlation_matrix
    }

    /// Comment ids dropped from the correlation matrix
    pub fn removed_ids(&self) -> &BTreeSet<Tid> {
        &self.removed_ids
    }

    pub fn tid_formatter(&self) -> TidFormatter {
        self.tid_format
    }

    /// Zero-padded display id, consistent across this snapshot
    pub fn format_display_id(&self, tid: Tid) -> String {
        self.tid_format.format(tid)
    }

    /// Display id for every comment, keyed by tid
    pub fn display_ids(&self) -> BTreeMap<Tid, String> {
        self.comments
            .iter()
            .map(|c| (c.tid, self.format_display_id(c.tid)))
            .collect()
    }

    /// Time the source documents were joined
    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }
}
