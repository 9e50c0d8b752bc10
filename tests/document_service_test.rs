//! Tests for DocumentService and the service container

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use did_dnssec::application::ApplicationError;
use did_dnssec::domain::DomainError;
use did_dnssec::infrastructure::di::ServiceContainer;
use did_dnssec::infrastructure::traits::RealFileSystem;
use did_dnssec::{DocumentService, Settings};

const DOCUMENT: &str = r#"{"id": "did:dnssec:example.com", "keys": ["k1", "k2"]}"#;

fn write_document(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("did.json");
    fs::write(&path, content).expect("write document");
    path
}

fn service() -> DocumentService {
    DocumentService::new(Arc::new(RealFileSystem))
}

#[test]
fn given_document_when_creating_records_then_normalizes_base() {
    let temp = TempDir::new().unwrap();
    let path = write_document(&temp, DOCUMENT);

    let records = service().create_records(&path, "Example.COM", 300).unwrap();

    assert_eq!(records.len(), 5);
    assert_eq!(records.last().unwrap().name, "_did.example.com.");
    assert!(records.iter().all(|rr| rr.ttl == 300));
}

#[test]
fn given_invalid_base_when_creating_records_then_fails_before_reading() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("missing.json");

    let err = service()
        .create_records(&missing, "not a domain", 300)
        .unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::InvalidDomainName { .. })
    ));
}

#[test]
fn given_missing_document_when_loading_then_fails_with_not_found() {
    let temp = TempDir::new().unwrap();

    let err = service().load(&temp.path().join("nope.json")).unwrap_err();

    assert!(matches!(err, ApplicationError::NotFound(_)));
}

#[test]
fn given_records_when_writing_zone_then_creates_parent_dirs() {
    let temp = TempDir::new().unwrap();
    let path = write_document(&temp, DOCUMENT);
    let zone_path = temp.path().join("out").join("zone.txt");
    let service = service();
    let records = service.create_records(&path, "example.com.", 3600).unwrap();

    service.write_zone(&records, &zone_path).unwrap();

    let zone = fs::read_to_string(&zone_path).unwrap();
    assert_eq!(zone.lines().count(), records.len());
    assert!(zone.ends_with("_did.example.com.\tIN\t3600\tTXT\t\"v=did:dnssec; t=m; d=aWQ,a2V5cw\"\n"));
}

#[test]
fn given_zone_file_when_resolving_through_container_then_writes_same_json() {
    let temp = TempDir::new().unwrap();
    let path = write_document(&temp, DOCUMENT);
    let zone_path = temp.path().join("zone.txt");
    let json_path = temp.path().join("resolved.json");
    let container = ServiceContainer::new(Settings::default());
    let documents = container.document_service();
    let records = documents
        .create_records(&path, "example.com", container.settings.ttl)
        .unwrap();
    documents.write_zone(&records, &zone_path).unwrap();

    let tree = container
        .resolver(Some(zone_path.as_path()))
        .unwrap()
        .resolve("did:dnssec:example.com")
        .unwrap();
    documents.write_json(&tree, &json_path).unwrap();

    let original: serde_json::Value = serde_json::from_str(DOCUMENT).unwrap();
    let resolved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(resolved, original);
}

#[test]
fn given_missing_zone_file_when_building_resolver_then_fails_with_io_error() {
    let temp = TempDir::new().unwrap();
    let container = ServiceContainer::new(Settings::default());

    let result = container.resolver(Some(temp.path().join("missing.zone").as_path()));

    assert!(matches!(
        result,
        Err(did_dnssec::infrastructure::InfraError::Io { .. })
    ));
}
