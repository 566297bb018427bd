//! Error types for report building

use crate::groups::ParticipantOverflow;
use crate::sanitize::ShapeMismatch;
use crate::source::{Endpoint, FetchError};
use thiserror::Error;

/// Why a report build failed
///
/// A failed build never yields a partial aggregate.
#[derive(Debug, Error)]
pub enum BuildError {
    /// One of the six source documents could not be fetched or decoded
    #[error("Failed to fetch {endpoint}: {error}")]
    Fetch {
        endpoint: Endpoint,
        #[source]
        error: FetchError,
    },

    /// Co-occurrence matrix and its id list disagree in shape
    #[error("Co-occurrence matrix shape mismatch: {0}")]
    Shape(#[from] ShapeMismatch),

    /// Group member counts in the math result are not summable
    #[error("Invalid math result: {0}")]
    ParticipantOverflow(#[from] ParticipantOverflow),

    #[error("Conversation id must not be empty")]
    InvalidConversationId,
}

impl BuildError {
    /// Endpoint responsible for a fetch failure
    pub fn endpoint(&self) -> Option<Endpoint> {
        match self {
            BuildError::Fetch { endpoint, .. } => Some(*endpoint),
            _ => None,
        }
    }
}
