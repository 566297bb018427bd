//! Wire models for backend report documents
//!
//! The backend returns loosely structured JSON. Only the fields the report
//! pipeline reads are typed; everything else is carried through untouched in
//! `BTreeMap`s so that re-serialization is stable.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Comment identifier ("tid" on the wire)
pub type Tid = u64;

/// A comment as returned by `/api/v3/comments`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(alias = "id")]
    pub tid: Tid,
    /// Text, moderation status, social and demographic annotations
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl Comment {
    /// Comment with no extra fields
    pub fn new(tid: Tid) -> Self {
        Self {
            tid,
            fields: BTreeMap::new(),
        }
    }

    /// Comment text, if present
    pub fn text(&self) -> Option<&str> {
        self.fields.get("txt").and_then(Value::as_str)
    }
}

/// One matrix cell: a number, or a sentinel marking an unusable id
///
/// The backend emits the literal string `"NaN"` for corrupted cells. Any
/// non-numeric JSON value is treated the same way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Sentinel(Value),
}

impl Cell {
    /// True when the cell does not hold a usable number
    pub fn is_sentinel(&self) -> bool {
        match self {
            Cell::Number(n) => !n.is_finite(),
            Cell::Sentinel(_) => true,
        }
    }
}

/// Co-occurrence (or correlation) matrix with its index-aligned comment ids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoOccurrenceMatrix {
    pub matrix: Vec<Vec<Cell>>,
    /// `rowToTid` from the agree-matrix endpoint, `comments` in the
    /// hierarchical-cluster export of the same matrix
    #[serde(rename = "rowToTid", alias = "comments")]
    pub ids: Vec<Tid>,
}

/// Per-group vote summary from the math result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupVotes {
    #[serde(rename = "n-members")]
    pub member_count: u64,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl GroupVotes {
    pub fn with_members(member_count: u64) -> Self {
        Self {
            member_count,
            extra: BTreeMap::new(),
        }
    }
}

/// PCA / group math result from `/api/v3/math/pca2`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MathResult {
    #[serde(rename = "group-votes", default)]
    pub group_votes: BTreeMap<String, GroupVotes>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consensus: Option<Value>,

    /// Base clusters, PCA components, repness and the rest
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}
