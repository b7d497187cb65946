//! Integration tests for `AnalysisSource` context construction.

mod common;

use std::sync::Arc;

use serde_json::json;

use threatvault_core::application::AnalysisSource;
use threatvault_core::domain::object::{StoredObject, TloType};
use threatvault_core::domain::service::ServiceError;
use threatvault_core::infrastructure::InMemoryObjectStore;

use common::fixtures::seed_domain;

fn source_over(store: Arc<InMemoryObjectStore>) -> AnalysisSource {
    AnalysisSource::new(store)
}

#[tokio::test]
async fn sample_context_carries_payload_and_checksum() {
    let store = Arc::new(InMemoryObjectStore::new());
    let payload = b"MZ\x90\x00fake-binary".to_vec();
    let checksum = store
        .insert_binary(TloType::Sample, "dropper.exe", "intake", payload.clone())
        .await;

    let context = source_over(store.clone())
        .create_context(TloType::Sample, &checksum, "analyst")
        .await
        .unwrap();

    assert_eq!(context.tlo_type(), TloType::Sample);
    assert_eq!(context.identifier(), checksum);
    assert_eq!(context.checksum(), Some(checksum.as_str()));
    assert_eq!(context.data(), Some(payload.as_slice()));
    assert!(context.has_payload());
}

#[tokio::test]
async fn missing_sample_fails_with_not_found() {
    let store = Arc::new(InMemoryObjectStore::new());

    let error = source_over(store)
        .create_context(TloType::Sample, "deadbeef", "analyst")
        .await
        .unwrap_err();

    assert!(error.is_not_found());
}

#[tokio::test]
async fn sample_without_stored_payload_fails_with_not_found() {
    let store = Arc::new(InMemoryObjectStore::new());
    store
        .insert(StoredObject::new_binary(
            TloType::Sample,
            "obj-1",
            "cafe1234",
            12,
            "gone.bin",
            "intake",
            json!({}),
        ))
        .await;

    let error = source_over(store)
        .create_context(TloType::Sample, "cafe1234", "analyst")
        .await
        .unwrap_err();

    assert!(error.is_not_found());
}

#[tokio::test]
async fn empty_payload_counts_as_missing() {
    let store = Arc::new(InMemoryObjectStore::new());
    store
        .insert(StoredObject::new_binary(
            TloType::Certificate,
            "obj-2",
            "feed5678",
            0,
            "empty.crt",
            "intake",
            json!({}),
        ))
        .await;
    store.store_payload("feed5678", Vec::new()).await;

    let error = source_over(store)
        .create_context(TloType::Certificate, "feed5678", "analyst")
        .await
        .unwrap_err();

    assert!(error.is_not_found());
}

#[tokio::test]
async fn payload_length_mismatch_cites_both_lengths() {
    let store = Arc::new(InMemoryObjectStore::new());
    store
        .insert(StoredObject::new_binary(
            TloType::Sample,
            "obj-3",
            "abad1dea",
            100,
            "truncated.bin",
            "intake",
            json!({}),
        ))
        .await;
    store.store_payload("abad1dea", vec![0u8; 50]).await;

    let error = source_over(store)
        .create_context(TloType::Sample, "abad1dea", "analyst")
        .await
        .unwrap_err();

    match error {
        ServiceError::DataIntegrity { actual, expected } => {
            assert_eq!(actual, 50);
            assert_eq!(expected, 100);
        }
        other => panic!("expected DataIntegrity, got {other:?}"),
    }
    // The rendered message names both lengths for operators.
    let message = ServiceError::DataIntegrity {
        actual: 50,
        expected: 100,
    }
    .to_string();
    assert!(message.contains("50") && message.contains("100"));
}

#[tokio::test]
async fn pcap_context_verifies_declared_length() {
    let store = Arc::new(InMemoryObjectStore::new());
    let payload = vec![0xd4u8; 24];
    let checksum = store
        .insert_binary(TloType::Pcap, "capture.pcap", "sensor", payload.clone())
        .await;

    let context = source_over(store)
        .create_context(TloType::Pcap, &checksum, "analyst")
        .await
        .unwrap();

    assert_eq!(context.data(), Some(payload.as_slice()));
}

#[tokio::test]
async fn domain_context_embeds_the_record_snapshot() {
    let store = Arc::new(InMemoryObjectStore::new());
    seed_domain(&store, "dom-1", "bad.example").await;

    let context = source_over(store)
        .create_context(TloType::Domain, "dom-1", "analyst")
        .await
        .unwrap();

    assert_eq!(context.record(), Some(&json!({ "fqdn": "bad.example" })));
    assert!(!context.has_payload());
}

#[tokio::test]
async fn missing_domain_fails_with_not_found() {
    let store = Arc::new(InMemoryObjectStore::new());

    let error = source_over(store)
        .create_context(TloType::Domain, "nope", "analyst")
        .await
        .unwrap_err();

    assert!(error.is_not_found());
}

#[tokio::test]
async fn reference_kinds_build_without_a_store_lookup() {
    let store = Arc::new(InMemoryObjectStore::new());
    let source = source_over(store);

    for tlo_type in [TloType::RawData, TloType::Event, TloType::Indicator] {
        let context = source
            .create_context(tlo_type, "ref-1", "analyst")
            .await
            .unwrap();
        assert_eq!(context.identifier(), "ref-1");
        assert!(context.record().is_none());
        assert!(!context.has_payload());
    }
}
