// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Zone lifecycle integration tests
//!
//! These tests drive the public `ZoneService` API end to end: configuration is
//! loaded from YAML, zone files land in a temporary directory and NSD is
//! replaced by a stateful in-memory fake.
//!
//! Run with: cargo test --test service_integration

mod common;

use common::{fake_service, zone_data};
use nsd_rpcd::errors::ServiceError;
use nsd_rpcd::result::{ResultCode, ZoneResult};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_zone_lifecycle() {
    let dir = TempDir::new().unwrap();
    let (service, nsd) = fake_service(dir.path(), "%1/%s.zone");
    let path = dir.path().join("e/example.com.zone");

    // Create
    let created = service
        .add_zone("example.com", &zone_data("example.com"), None)
        .unwrap();
    assert!(created.is_success(), "{created:?}");
    assert!(nsd.has_zone("example.com"));
    assert_eq!(fs::read_to_string(&path).unwrap(), zone_data("example.com"));

    // Create again is rejected, file untouched
    let duplicate = service.add_zone("example.com", "garbage", None).unwrap();
    assert_eq!(duplicate.code(), ResultCode::ObjectExists);
    assert_eq!(fs::read_to_string(&path).unwrap(), zone_data("example.com"));

    // Update
    let new_data = format!("{}www IN A 192.0.2.1\n", zone_data("example.com"));
    let updated = service.update_zone("example.com", &new_data).unwrap();
    assert!(updated.is_success());
    assert_eq!(fs::read_to_string(&path).unwrap(), new_data);

    // Delete
    let deleted = service.del_zone("example.com").unwrap();
    assert!(deleted.is_success());
    assert!(!nsd.has_zone("example.com"));
    assert!(!path.exists());

    // Update after delete reports a missing zone
    let missing = service.update_zone("example.com", &new_data).unwrap();
    assert_eq!(missing.code(), ResultCode::ObjectMissing);
    assert!(!path.exists());

    assert_eq!(
        nsd.calls(),
        vec![
            "addzone example.com slave",
            "reload example.com",
            "addzone example.com slave",
            "zonestatus example.com",
            "reload example.com",
            "delzone example.com",
            "zonestatus example.com",
        ]
    );
}

#[test]
fn test_label_pattern_layout() {
    let dir = TempDir::new().unwrap();
    let (service, _nsd) = fake_service(dir.path(), "%z/%y/%s.zone");

    service
        .add_zone("www.example.com", &zone_data("www.example.com"), None)
        .unwrap();

    assert!(dir
        .path()
        .join("com/example/www.example.com.zone")
        .exists());
}

#[test]
fn test_names_are_filtered_before_use() {
    let dir = TempDir::new().unwrap();
    let (service, nsd) = fake_service(dir.path(), "%s.zone");

    let result = service
        .add_zone("exa mple!.com", &zone_data("example.com"), Some("master"))
        .unwrap();

    assert!(result.is_success());
    assert!(nsd.has_zone("example.com"));
    assert_eq!(nsd.calls()[0], "addzone example.com master");
    assert!(dir.path().join("example.com.zone").exists());
}

#[test]
fn test_path_traversal_is_rejected() {
    let dir = TempDir::new().unwrap();
    let zones = dir.path().join("zones");
    let (service, nsd) = fake_service(&zones, "%s.zone");

    // `/` is filtered out, the leftover dots are an empty label
    let result = service.add_zone("../../etc/passwd", "data", None).unwrap();

    assert_eq!(result.code(), ResultCode::ParameterSyntax);
    assert!(nsd.calls().is_empty());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_leading_dots_cannot_leave_the_zone_directory() {
    let dir = TempDir::new().unwrap();
    let zones = dir.path().join("zones");
    let (service, nsd) = fake_service(&zones, "%1%2/%s.zone");

    let result = service
        .add_zone("..evil", &zone_data("evil"), None)
        .unwrap();

    assert_eq!(result.code(), ResultCode::ParameterSyntax);
    assert!(!nsd.has_zone("..evil"));
    assert!(!dir.path().join("..evil.zone").exists());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_pass_through_operations() {
    let dir = TempDir::new().unwrap();
    let (service, nsd) = fake_service(dir.path(), "%s.zone");
    service.add_zone("example.org", "", None).unwrap();

    let status = service.zone_status("example.org").unwrap();
    assert!(status.is_success());
    assert_eq!(status.nsdresult(), Some("zone:\texample.org\n\tstate: ok"));

    assert!(service.notify_zone("example.org").unwrap().is_success());
    assert!(service.transfer_zone("example.org").unwrap().is_success());
    assert!(service.reload_zone("example.org").unwrap().is_success());

    let unknown = service.notify_zone("unknown.org").unwrap();
    assert_eq!(unknown.code(), ResultCode::CommandFailed);
    assert_eq!(unknown.nsdresult(), Some("error zone unknown.org not found"));

    let reconfig = service.reconfig().unwrap();
    assert!(reconfig.is_success());
    assert!(nsd.calls().contains(&"reconfig".to_string()));
}

#[test]
fn test_stats() {
    let dir = TempDir::new().unwrap();
    let (service, nsd) = fake_service(dir.path(), "%s.zone");
    nsd.set_stats("num.queries=42\nzone.master=1\nzone.slave=0");

    let result = service.stats(true).unwrap();

    let ZoneResult::Success(body) = &result else {
        panic!("expected success, got {result:?}");
    };
    let stats = body.stats.as_ref().unwrap();
    assert_eq!(stats.len(), 3);
    assert_eq!(stats["num.queries"], "42");
    assert_eq!(nsd.calls(), vec!["stats_noreset"]);
}

#[test]
fn test_empty_stats_response_fails() {
    let dir = TempDir::new().unwrap();
    let (service, _nsd) = fake_service(dir.path(), "%s.zone");

    let err = service.stats(false).unwrap_err();

    assert!(matches!(err, ServiceError::MalformedStats { .. }));
}

#[test]
fn test_offline_nsd_is_a_hard_fault() {
    let dir = TempDir::new().unwrap();
    let (service, nsd) = fake_service(dir.path(), "%s.zone");
    nsd.go_offline();

    let err = service
        .add_zone("example.com", &zone_data("example.com"), None)
        .unwrap_err();

    assert!(matches!(err, ServiceError::Control(_)));
    assert!(err.to_string().contains("connection refused"));
    assert!(!dir.path().join("example.com.zone").exists());
}

#[test]
fn test_results_serialize_for_the_wire() {
    let dir = TempDir::new().unwrap();
    let (service, _nsd) = fake_service(dir.path(), "%s.zone");

    let result = service.update_zone("absent.com", "").unwrap();

    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        serde_json::json!({
            "code": 2303,
            "msg": "Object does not exists",
            "nsdresult": "error zone absent.com not found",
        })
    );
}
