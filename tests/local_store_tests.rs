//! Integration tests for the local JSON file store

use std::sync::Arc;

use tempfile::TempDir;
use visitor_tracker::{LocalFileStore, VisitRecord, VisitorDocument, VisitorStore};

fn sample_document() -> VisitorDocument {
    let mut doc = VisitorDocument::empty();
    doc.record_visit(VisitRecord::new("2026-10-15T21:14:03.120044", "203.0.113.7", "Mozilla/5.0"));
    doc.record_visit(VisitRecord::new("2026-10-16T08:01:59.000001", "198.51.100.2", "curl/8.4.0"));
    doc.record_visit(VisitRecord::new("2026-10-16T08:02:10.500000", "203.0.113.7", "Unknown"));
    doc
}

#[tokio::test]
async fn missing_file_loads_empty_skeleton() {
    let temp_dir = TempDir::new().unwrap();
    let store = LocalFileStore::new(temp_dir.path().join("visitor_data.json"));

    assert_eq!(store.load().await, VisitorDocument::empty());
    assert!(!store.path().exists());
}

#[tokio::test]
async fn malformed_file_loads_empty_skeleton() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("visitor_data.json");
    let store = LocalFileStore::new(&path);

    std::fs::write(&path, "[1, 2, 3]").unwrap();
    assert_eq!(store.load().await, VisitorDocument::empty());

    std::fs::write(&path, r#"{"total_visits": 3}"#).unwrap();
    assert_eq!(store.load().await, VisitorDocument::empty());
}

#[tokio::test]
async fn save_then_load_round_trips() {
    let temp_dir = TempDir::new().unwrap();
    let store = LocalFileStore::new(temp_dir.path().join("visitor_data.json"));
    let doc = sample_document();

    assert!(store.save(&doc).await);

    let reloaded = store.load().await;
    assert_eq!(reloaded, doc);
    assert_eq!(reloaded.total_visits, 3);
    assert_eq!(reloaded.unique_visitor_count(), 2);
}

#[tokio::test]
async fn reads_document_written_by_other_tools() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("visitor_data.json");
    std::fs::write(
        &path,
        r#"{
  "total_visits": 1,
  "unique_visitors": ["127.0.0.1"],
  "visits": [
    {
      "timestamp": "2025-01-02T03:04:05.678901",
      "ip": "127.0.0.1",
      "user_agent": "python-requests/2.31.0"
    }
  ]
}"#,
    )
    .unwrap();

    let doc = LocalFileStore::new(&path).load().await;
    assert_eq!(doc.total_visits, 1);
    assert_eq!(doc.visits[0].address, "127.0.0.1");
    assert_eq!(doc.visits[0].agent, "python-requests/2.31.0");
}

#[tokio::test]
async fn save_overwrites_previous_contents() {
    let temp_dir = TempDir::new().unwrap();
    let store = LocalFileStore::new(temp_dir.path().join("visitor_data.json"));

    assert!(store.save(&sample_document()).await);
    assert!(store.save(&VisitorDocument::empty()).await);

    assert_eq!(store.load().await, VisitorDocument::empty());
}

#[tokio::test]
async fn save_into_directory_path_fails() {
    let temp_dir = TempDir::new().unwrap();
    let store = LocalFileStore::new(temp_dir.path());

    assert!(!store.save(&sample_document()).await);
    assert_eq!(store.load().await, VisitorDocument::empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_saves_all_succeed_and_readers_never_see_partial_files() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(LocalFileStore::new(temp_dir.path().join("visitor_data.json")));

    let mut doc = VisitorDocument::empty();
    for i in 0..5_000 {
        doc.record_visit(VisitRecord::new(
            "2026-10-16T12:00:00.000000",
            format!("10.{}.{}.{}", i / 65_536, (i / 256) % 256, i % 256),
            "Mozilla/5.0 (X11; Linux x86_64)",
        ));
    }
    let doc = Arc::new(doc);
    assert!(store.save(&doc).await);

    let mut writers = Vec::new();
    for _ in 0..8 {
        let store = store.clone();
        let doc = doc.clone();
        writers.push(tokio::spawn(async move {
            let mut failed = 0;
            for _ in 0..20 {
                if !store.save(&doc).await {
                    failed += 1;
                }
            }
            failed
        }));
    }

    let reader = {
        let store = store.clone();
        tokio::spawn(async move {
            let mut partial = 0;
            for _ in 0..100 {
                if store.load().await.total_visits != 5_000 {
                    partial += 1;
                }
            }
            partial
        })
    };

    for writer in writers {
        assert_eq!(writer.await.unwrap(), 0, "a concurrent save reported failure");
    }
    assert_eq!(reader.await.unwrap(), 0, "a load observed a half-written file");

    assert_eq!(store.load().await, *doc);
    let entries = std::fs::read_dir(temp_dir.path()).unwrap().count();
    assert_eq!(entries, 1, "temp files left behind");
}
