//! Conversation report builder
//!
//! Fetches the six source documents concurrently, waits for all of them and
//! assembles one [`ConversationAggregate`]. The join is fail-fast: the first
//! failed fetch fails the whole build and the remaining in-flight fetches
//! are dropped. No partial aggregate is ever produced.

use crate::aggregate::ConversationAggregate;
use crate::error::BuildError;
use crate::groups::{group_names, total_participants};
use crate::sanitize::sanitize;
use crate::source::{Endpoint, FetchError, ReportSource};
use crate::tid_format::TidFormatter;
use chrono::{DateTime, Utc};
use polis_common::{CoOccurrenceMatrix, Comment, MathResult};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// The six decoded source documents of one build
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocuments {
    pub math: MathResult,
    pub co_occurrence: CoOccurrenceMatrix,
    pub comments: Vec<Comment>,
    pub participants: Value,
    pub conversation: Value,
    pub group_demographics: Value,
}

/// Builds report aggregates from a [`ReportSource`]
pub struct ReportBuilder<S> {
    source: S,
}

impl<S: ReportSource> ReportBuilder<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch all six documents for `conversation_id` and assemble them
    pub async fn build(&self, conversation_id: &str) -> Result<ConversationAggregate, BuildError> {
        if conversation_id.trim().is_empty() {
            return Err(BuildError::InvalidConversationId);
        }

        info!(conversation_id = %conversation_id, "Building conversation report");

        let documents = self.fetch_all(conversation_id).await?;
        let aggregate = assemble(conversation_id, documents, Utc::now())?;

        info!(
            conversation_id = %conversation_id,
            comments = aggregate.comments().len(),
            participants = aggregate.participant_count(),
            removed = aggregate.removed_ids().len(),
            "Conversation report built"
        );

        Ok(aggregate)
    }

    /// Fetch and decode the six documents concurrently
    pub async fn fetch_all(&self, conversation_id: &str) -> Result<ReportDocuments, BuildError> {
        let (math, co_occurrence, comments, participants, conversation, group_demographics) = futures::try_join!(
            self.fetch_as::<MathResult>(Endpoint::Math, conversation_id),
            self.fetch_as::<CoOccurrenceMatrix>(Endpoint::CoOccurrence, conversation_id),
            self.fetch_as::<Vec<Comment>>(Endpoint::Comments, conversation_id),
            self.fetch_as::<Value>(Endpoint::Participants, conversation_id),
            self.fetch_as::<Value>(Endpoint::Conversation, conversation_id),
            self.fetch_as::<Value>(Endpoint::GroupDemographics, conversation_id),
        )?;

        Ok(ReportDocuments {
            math,
            co_occurrence,
            comments,
            participants,
            conversation,
            group_demographics,
        })
    }

    async fn fetch_as<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        conversation_id: &str,
    ) -> Result<T, BuildError> {
        let params = endpoint.query(conversation_id);

        let document = match self.source.fetch(endpoint, &params).await {
            Ok(document) => document,
            Err(error) => {
                warn!(
                    conversation_id = %conversation_id,
                    endpoint = %endpoint,
                    error = %error,
                    "Report source fetch failed"
                );
                return Err(BuildError::Fetch { endpoint, error });
            }
        };

        debug!(conversation_id = %conversation_id, endpoint = %endpoint, "Report source fetched");

        serde_json::from_value(document).map_err(|e| BuildError::Fetch {
            endpoint,
            error: FetchError::Parse(e.to_string()),
        })
    }
}

/// Assemble an aggregate from already-fetched documents
///
/// Pure apart from `fetched_at`, which the caller supplies: identical
/// documents and timestamp give an identical aggregate.
pub fn assemble(
    conversation_id: &str,
    documents: ReportDocuments,
    fetched_at: DateTime<Utc>,
) -> Result<ConversationAggregate, BuildError> {
    let ReportDocuments {
        math,
        co_occurrence,
        comments,
        participants,
        conversation,
        group_demographics,
    } = documents;

    let sanitized = sanitize(co_occurrence.matrix.clone(), co_occurrence.ids.clone())?;
    for tid in &sanitized.removed_ids {
        warn!(
            conversation_id = %conversation_id,
            tid = *tid,
            "Removed corrupted comment from correlation matrix"
        );
    }

    let mut seen = BTreeSet::new();
    for comment in &comments {
        if !seen.insert(comment.tid) {
            warn!(conversation_id = %conversation_id, tid = comment.tid, "Duplicate comment id");
        }
    }

    let participant_count = total_participants(&math.group_votes)?;
    let group_names = group_names(&math.group_votes);
    let tid_format = TidFormatter::from_comments(&comments);

    Ok(ConversationAggregate {
        conversation_id: conversation_id.to_string(),
        math,
        comments,
        participants,
        conversation,
        group_demographics,
        group_names,
        participant_count,
        agree_matrix: co_occurrence,
        correlation_matrix: sanitized.matrix,
        removed_ids: sanitized.removed_ids,
        tid_format,
        fetched_at,
    })
}
