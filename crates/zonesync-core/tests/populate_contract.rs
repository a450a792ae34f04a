//! Contract Test: Populate
//!
//! Constraints verified:
//! - Provider rows group into one record per name+type
//! - The apex `"."` becomes the empty name
//! - Unsupported types are skipped, never raised
//! - A failed read degrades to an empty zone and is not cached
//! - `exists` reflects whether the zone was cached before the call

mod common;

use common::*;
use zonesync_core::record::{RecordType, RecordValue};
use zonesync_core::{Error, Zone, ZoneSyncEngine};

#[tokio::test]
async fn apex_a_record_populates_with_empty_name() {
    let client = MockRemoteClient::with_rows(vec![raw("1", ".", "A", 300, "1.1.1.1")]);
    let engine = ZoneSyncEngine::new(Box::new(client.clone()));
    let mut zone = Zone::new(ZONE).unwrap();

    let outcome = engine.populate(&mut zone, false, false).await.unwrap();

    assert_eq!(outcome.found, 1);
    assert!(!outcome.degraded);
    assert_eq!(zone.len(), 1);

    let record = &zone.records()[0];
    assert_eq!(record.name(), "");
    assert_eq!(record.record_type(), RecordType::A);
    assert_eq!(record.ttl(), 300);
    assert_eq!(record.value(), &RecordValue::multiple(["1.1.1.1"]));
    assert_eq!(client.calls(), vec![Call::Fetch(API_ZONE.to_string())]);
}

#[tokio::test]
async fn rows_group_by_name_and_type() {
    let client = MockRemoteClient::with_rows(vec![
        raw("1", ".", "A", 300, "1.1.1.1"),
        raw("2", ".", "A", 300, "2.2.2.2"),
        raw("3", ".", "AAAA", 300, "2001:db8::1"),
        raw("4", "www", "CNAME", 600, "example.com."),
        raw("5", "api", "A", 60, "10.0.0.1"),
    ]);
    let engine = ZoneSyncEngine::new(Box::new(client));
    let mut zone = Zone::new(ZONE).unwrap();

    let outcome = engine.populate(&mut zone, true, false).await.unwrap();

    assert_eq!(outcome.found, 4);
    assert_eq!(outcome.skipped, 0);
    assert_eq!(
        zone.get("", RecordType::A).unwrap().value(),
        &RecordValue::multiple(["1.1.1.1", "2.2.2.2"])
    );
    assert_eq!(
        zone.get("www", RecordType::Cname).unwrap().value(),
        &RecordValue::Single("example.com.".to_string())
    );
    assert!(zone.get("", RecordType::Aaaa).is_some());
    assert_eq!(zone.get("api", RecordType::A).unwrap().ttl(), 60);
}

#[tokio::test]
async fn unsupported_types_are_skipped() {
    let client = MockRemoteClient::with_rows(vec![
        raw("1", ".", "MX", 300, "10 mail.example.com."),
        raw("2", ".", "TXT", 300, "v=spf1 -all"),
        raw("3", "www", "A", 300, "1.1.1.1"),
    ]);
    let engine = ZoneSyncEngine::new(Box::new(client));
    let mut zone = Zone::new(ZONE).unwrap();

    let outcome = engine.populate(&mut zone, false, false).await.unwrap();

    assert_eq!(outcome.found, 1);
    assert_eq!(outcome.skipped, 2);
    assert_eq!(zone.len(), 1);
    assert_eq!(zone.records()[0].name(), "www");
}

#[tokio::test]
async fn exists_only_after_first_fetch() {
    let client = MockRemoteClient::with_rows(vec![raw("1", ".", "A", 300, "1.1.1.1")]);
    let engine = ZoneSyncEngine::new(Box::new(client.clone()));

    let first = engine
        .populate(&mut Zone::new(ZONE).unwrap(), false, false)
        .await
        .unwrap();
    let second = engine
        .populate(&mut Zone::new(ZONE).unwrap(), false, false)
        .await
        .unwrap();

    assert!(!first.exists);
    assert!(second.exists);
    assert_eq!(second.found, 1);
    assert!(first.fetched_at.is_some());
    assert_eq!(second.fetched_at, first.fetched_at, "cache hit reports the original fetch time");
    assert_eq!(client.fetch_count(), 1, "second populate must be served from cache");
}

#[tokio::test]
async fn read_failures_degrade_to_empty_zone() {
    for failure in [Failure::BadRequest, Failure::Unauthorized, Failure::Status(503)] {
        let client = MockRemoteClient::with_rows(vec![raw("1", ".", "A", 300, "1.1.1.1")]);
        client.fail_fetch(Some(failure));
        let engine = ZoneSyncEngine::new(Box::new(client.clone()));
        let mut zone = Zone::new(ZONE).unwrap();

        let outcome = engine.populate(&mut zone, false, false).await.unwrap();

        assert!(outcome.degraded, "{:?} should degrade", failure);
        assert_eq!(outcome.found, 0);
        assert!(outcome.fetched_at.is_none());
        assert!(zone.is_empty());
        assert!(!engine.cache().contains(ZONE).await);
    }
}

#[tokio::test]
async fn degraded_read_is_retried_on_next_populate() {
    let client = MockRemoteClient::with_rows(vec![raw("1", ".", "A", 300, "1.1.1.1")]);
    client.fail_fetch(Some(Failure::Status(500)));
    let engine = ZoneSyncEngine::new(Box::new(client.clone()));

    let degraded = engine
        .populate(&mut Zone::new(ZONE).unwrap(), false, false)
        .await
        .unwrap();
    assert!(degraded.degraded);

    client.fail_fetch(None);
    let mut zone = Zone::new(ZONE).unwrap();
    let recovered = engine.populate(&mut zone, false, false).await.unwrap();

    assert!(!recovered.degraded);
    assert!(!recovered.exists);
    assert_eq!(zone.len(), 1);
    assert_eq!(client.fetch_count(), 2);
}

#[tokio::test]
async fn container_rejection_propagates() {
    let client = MockRemoteClient::with_rows(vec![raw("1", "www", "A", 300, "1.1.1.1")]);
    let engine = ZoneSyncEngine::new(Box::new(client));
    let mut zone = Zone::new(ZONE).unwrap();

    engine.populate(&mut zone, false, false).await.unwrap();
    let err = engine.populate(&mut zone, false, false).await.unwrap_err();
    assert!(matches!(err, Error::Zone(_)));

    engine.populate(&mut zone, false, true).await.unwrap();
    assert_eq!(zone.len(), 1);
}

#[tokio::test]
async fn relative_zone_name_is_rejected_before_fetching() {
    let client = MockRemoteClient::new();
    let engine = ZoneSyncEngine::new(Box::new(client.clone()));
    let mut sink = VecSink::new("example.com");

    let err = engine.populate(&mut sink, false, false).await.unwrap_err();

    assert!(matches!(err, Error::InvalidInput(_)));
    assert_eq!(client.fetch_count(), 0);
}

#[tokio::test]
async fn any_sink_receives_records() {
    let client = MockRemoteClient::with_rows(vec![
        raw("1", "mail", "AAAA", 120, "2001:db8::25"),
        raw("2", "mail", "AAAA", 120, "2001:db8::26"),
    ]);
    let engine = ZoneSyncEngine::new(Box::new(client));
    let mut sink = VecSink::new(ZONE);

    engine.populate(&mut sink, false, false).await.unwrap();

    assert_eq!(sink.records.len(), 1);
    assert_eq!(sink.records[0].value().len(), 2);
}
