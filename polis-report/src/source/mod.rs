//! Report data sources
//!
//! The aggregate builder reads six JSON documents per conversation. Where
//! they come from is behind the [`ReportSource`] trait: the HTTP backend in
//! production, a directory of fixture files for offline runs and tests.

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

pub mod fixtures;
pub mod http;

pub use fixtures::FixtureSource;
pub use http::HttpSource;

/// Query parameters for one fetch
pub type QueryParams = Vec<(&'static str, String)>;

/// Fetch errors
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(String),
}

/// The six backend documents a report is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Endpoint {
    Math,
    CoOccurrence,
    Comments,
    Participants,
    Conversation,
    GroupDemographics,
}

impl Endpoint {
    pub const ALL: [Endpoint; 6] = [
        Endpoint::Math,
        Endpoint::CoOccurrence,
        Endpoint::Comments,
        Endpoint::Participants,
        Endpoint::Conversation,
        Endpoint::GroupDemographics,
    ];

    /// API path, relative to the backend origin
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Math => "/api/v3/math/pca2",
            Endpoint::CoOccurrence => "/api/v3/voteProbabilityMatrixAgree",
            Endpoint::Comments => "/api/v3/comments",
            Endpoint::Participants => "/api/v3/ptptois",
            Endpoint::Conversation => "/api/v3/conversations",
            Endpoint::GroupDemographics => "/api/v3/group_demographics",
        }
    }

    /// Short name, also used as the fixture file stem
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::Math => "math",
            Endpoint::CoOccurrence => "co_occurrence",
            Endpoint::Comments => "comments",
            Endpoint::Participants => "participants",
            Endpoint::Conversation => "conversation",
            Endpoint::GroupDemographics => "group_demographics",
        }
    }

    /// Query parameters for this endpoint
    ///
    /// Every fetch filters on `conversation_id`. The math fetch asks for the
    /// full result (`lastVoteTimestamp=0`). The comment fetch includes every
    /// comment not rejected by moderation, with social and demographic
    /// annotations attached.
    pub fn query(&self, conversation_id: &str) -> QueryParams {
        let mut params = vec![("conversation_id", conversation_id.to_string())];
        match self {
            Endpoint::Math => {
                params.push(("lastVoteTimestamp", "0".to_string()));
            }
            Endpoint::Comments => {
                params.push(("moderation", "true".to_string()));
                params.push(("mod_gt", "-1".to_string()));
                params.push(("include_social", "true".to_string()));
                params.push(("include_demographics", "true".to_string()));
            }
            _ => {}
        }
        params
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Source of raw report documents
///
/// One call fetches one document once. Retries, if any, belong to the
/// implementation; the aggregate builder never retries.
#[async_trait]
pub trait ReportSource: Send + Sync {
    async fn fetch(&self, endpoint: Endpoint, params: &[(&'static str, String)])
        -> Result<Value, FetchError>;
}
