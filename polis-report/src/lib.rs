//! polis-report - Conversation report aggregation
//!
//! Fetches the six backend documents behind a conversation report (math,
//! co-occurrence matrix, comments, participants of interest, conversation
//! metadata, group demographics), repairs the correlation matrix, derives
//! display ids and participant counts, and hands back one immutable
//! [`ConversationAggregate`] for the view layer.

pub mod aggregate;
pub mod builder;
pub mod error;
pub mod groups;
pub mod sanitize;
pub mod slot;
pub mod source;
pub mod tid_format;

pub use aggregate::ConversationAggregate;
pub use builder::{assemble, ReportBuilder, ReportDocuments};
pub use error::BuildError;
pub use sanitize::{sanitize, CorrelationMatrix, SanitizedMatrix, ShapeMismatch};
pub use slot::{AggregateSlot, SlotState};
pub use source::{Endpoint, FetchError, FixtureSource, HttpSource, ReportSource};
pub use tid_format::TidFormatter;
