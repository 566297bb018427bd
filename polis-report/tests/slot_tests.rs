//! Current-aggregate slot tests: overlapping builds, failures, notification

mod helpers;

use helpers::MockSource;
use polis_report::{AggregateSlot, Endpoint, ReportBuilder};
use serde_json::json;
use std::time::Duration;

#[tokio::test]
async fn test_refresh_publishes_aggregate() {
    let slot = AggregateSlot::new();
    let builder = ReportBuilder::new(MockSource::sample());
    let mut rx = slot.subscribe();

    assert!(slot.current().is_none());
    assert!(slot.refresh(&builder, "2ez5beswtc").await.unwrap());

    rx.changed().await.unwrap();
    let state = rx.borrow().clone();
    assert_eq!(state.seq, 1);
    assert!(state.error.is_none());
    assert_eq!(state.aggregate.unwrap().participant_count(), 12);
}

#[tokio::test]
async fn test_stale_completion_is_discarded() {
    let slot = AggregateSlot::new();
    let slow = ReportBuilder::new(
        MockSource::sample()
            .with_document(Endpoint::Conversation, json!({"topic": "old"}))
            .delayed_all(Duration::from_millis(200)),
    );
    let fast = ReportBuilder::new(
        MockSource::sample().with_document(Endpoint::Conversation, json!({"topic": "new"})),
    );

    // The slow build starts first and finishes last
    let (slow_result, fast_result) = tokio::join!(
        slot.refresh(&slow, "2ez5beswtc"),
        slot.refresh(&fast, "2ez5beswtc"),
    );

    assert!(fast_result.unwrap());
    assert!(!slow_result.unwrap());

    let current = slot.current().unwrap();
    assert_eq!(current.conversation()["topic"], json!("new"));
    assert_eq!(slot.state().seq, 2);
}

#[tokio::test]
async fn test_failed_build_keeps_previous_aggregate() {
    let slot = AggregateSlot::new();

    let good = ReportBuilder::new(MockSource::sample());
    slot.refresh(&good, "2ez5beswtc").await.unwrap();

    let bad = ReportBuilder::new(MockSource::sample().failing(Endpoint::Math));
    assert!(slot.refresh(&bad, "2ez5beswtc").await.is_err());

    let state = slot.state();
    assert_eq!(state.seq, 2);
    assert!(state.error.unwrap().contains("math"));
    assert!(state.aggregate.is_some());
}

#[tokio::test]
async fn test_success_clears_error() {
    let slot = AggregateSlot::new();

    let bad = ReportBuilder::new(MockSource::sample().failing(Endpoint::Comments));
    assert!(slot.refresh(&bad, "2ez5beswtc").await.is_err());
    assert!(slot.current().is_none());
    assert!(slot.state().error.is_some());

    let good = ReportBuilder::new(MockSource::sample());
    slot.refresh(&good, "2ez5beswtc").await.unwrap();

    let state = slot.state();
    assert!(state.error.is_none());
    assert!(state.aggregate.is_some());
}

#[tokio::test]
async fn test_publish_rejects_older_sequence() {
    let slot = AggregateSlot::new();
    let builder = ReportBuilder::new(MockSource::sample());

    let first = slot.begin_build();
    let second = slot.begin_build();
    assert!(second > first);

    let aggregate = builder.build("2ez5beswtc").await.unwrap();
    assert!(slot.publish(second, aggregate.clone()));
    assert!(!slot.publish(first, aggregate.clone()));
    assert!(!slot.publish(second, aggregate));
}
