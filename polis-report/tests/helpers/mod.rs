//! Test helpers for polis-report integration tests
//!
//! Provides an in-memory `ReportSource` with per-endpoint documents,
//! injectable failures and artificial latency, plus sample documents.

#![allow(dead_code)]

use async_trait::async_trait;
use polis_report::source::QueryParams;
use polis_report::{Endpoint, FetchError, ReportSource};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

/// In-memory report source
#[derive(Default)]
pub struct MockSource {
    documents: HashMap<Endpoint, Value>,
    failing: HashSet<Endpoint>,
    delays: HashMap<Endpoint, Duration>,
    calls: Mutex<Vec<(Endpoint, QueryParams)>>,
}

impl MockSource {
    /// Source serving [`sample_documents`]
    pub fn sample() -> Self {
        Self {
            documents: sample_documents(),
            ..Self::default()
        }
    }

    pub fn with_document(mut self, endpoint: Endpoint, document: Value) -> Self {
        self.documents.insert(endpoint, document);
        self
    }

    pub fn failing(mut self, endpoint: Endpoint) -> Self {
        self.failing.insert(endpoint);
        self
    }

    pub fn delayed(mut self, endpoint: Endpoint, delay: Duration) -> Self {
        self.delays.insert(endpoint, delay);
        self
    }

    /// Delay every endpoint
    pub fn delayed_all(mut self, delay: Duration) -> Self {
        for endpoint in Endpoint::ALL {
            self.delays.insert(endpoint, delay);
        }
        self
    }

    /// Recorded fetches, in call order
    pub fn calls(&self) -> Vec<(Endpoint, QueryParams)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReportSource for MockSource {
    async fn fetch(
        &self,
        endpoint: Endpoint,
        params: &[(&'static str, String)],
    ) -> Result<Value, FetchError> {
        self.calls.lock().unwrap().push((endpoint, params.to_vec()));

        if let Some(delay) = self.delays.get(&endpoint) {
            tokio::time::sleep(*delay).await;
        }

        if self.failing.contains(&endpoint) {
            return Err(FetchError::Status {
                status: 500,
                body: format!("{} unavailable", endpoint),
            });
        }

        self.documents
            .get(&endpoint)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(endpoint.path().to_string()))
    }
}

/// Six source documents for one conversation
///
/// The co-occurrence matrix has a `"NaN"` in row 0 for tid 10; group member
/// counts sum to 12.
pub fn sample_documents() -> HashMap<Endpoint, Value> {
    HashMap::from([
        (
            Endpoint::Math,
            json!({
                "group-votes": {
                    "0": {"n-members": 3, "votes": {"20": {"A": 2, "D": 1, "S": 3}}},
                    "1": {"n-members": 5, "votes": {}},
                    "2": {"n-members": 4, "votes": {}}
                },
                "consensus": {"agree": [{"tid": 20, "p-success": 0.9}], "disagree": []},
                "n": 12,
                "lastVoteTimestamp": 1700000000000u64
            }),
        ),
        (
            Endpoint::CoOccurrence,
            json!({
                "matrix": [
                    ["NaN", 0.5, 0.2],
                    ["NaN", 1.0, 0.3],
                    ["NaN", 0.3, 1.0]
                ],
                "rowToTid": [10, 20, 30]
            }),
        ),
        (
            Endpoint::Comments,
            json!([
                {"tid": 7, "txt": "More bike lanes", "mod": 1, "agree_count": 4},
                {"tid": 10, "txt": "Fewer buses", "mod": 0, "agree_count": 1},
                {"tid": 20, "txt": "Free transit on weekends", "mod": 1, "agree_count": 9},
                {"tid": 30, "txt": "Extend the night service", "mod": 0, "agree_count": 2},
                {"tid": 342, "txt": "Congestion pricing downtown", "mod": 1, "agree_count": 5}
            ]),
        ),
        (
            Endpoint::Participants,
            json!([{"pid": 1, "name": "City council"}]),
        ),
        (
            Endpoint::Conversation,
            json!({"conversation_id": "2ez5beswtc", "topic": "Transit plan", "participant_count": 12}),
        ),
        (
            Endpoint::GroupDemographics,
            json!([
                {"gid": 0, "count": 3, "gender_male": 1, "gender_female": 2},
                {"gid": 1, "count": 5, "gender_male": 3, "gender_female": 2},
                {"gid": 2, "count": 4, "gender_male": 2, "gender_female": 2}
            ]),
        ),
    ])
}
