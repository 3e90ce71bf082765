//! Architectural Contract Test: Backend Lifecycle
//!
//! This test verifies how control-plane lifecycle events reach the appliance.
//!
//! Constraints verified:
//! - Zones are created under their stripped fqdn in the resolved view
//! - Multi-tenant view setup failures degrade instead of failing zone creation
//! - Server events require a serving member
//! - Unknown record types are skipped, or rejected in strict mode
//! - Recordset and server lifecycle events beyond member checks are log-only
//! - Tenant teardown never removes the built-in or shared views
//!
//! If this test fails, the backend contract with the control plane is broken.

mod common;

use common::*;
use ipamdns_core::model::payload;
use ipamdns_core::{BackendConfig, Context, DnsBackend, Error, ObjectStore, Server};

#[tokio::test]
async fn zone_is_created_under_stripped_fqdn_in_shared_view() {
    let (backend, store) = backend_with(BackendConfig::default().with_dns_view("internal"));

    backend
        .create_domain(&Context::new("tenant-a"), &domain("example.com."))
        .await
        .unwrap();

    let creates = store.creates();
    assert_eq!(creates.len(), 1);
    let (obj_type, zone) = &creates[0];
    assert_eq!(obj_type, "zone_auth");
    assert_eq!(zone["fqdn"], "example.com");
    assert_eq!(zone["view"], "internal");
}

#[tokio::test]
async fn multi_tenant_zone_creates_views_first() {
    let (backend, store) = backend_with(BackendConfig::default().with_multi_tenant(true));

    backend
        .create_domain(&Context::new("tenant-a"), &domain("example.com."))
        .await
        .unwrap();

    let created_types: Vec<_> = store.creates().into_iter().map(|(t, _)| t).collect();
    assert_eq!(created_types, ["networkview", "view", "zone_auth"]);

    let views = store.memory().objects_of_type("view").await;
    assert_eq!(views[0]["name"], "tenant-a");
    assert_eq!(views[0]["network_view"], "tenant-a");
}

#[tokio::test]
async fn failed_view_setup_still_creates_zone() {
    let (backend, store) = backend_with(BackendConfig::default().with_multi_tenant(true));
    store.fail_creates_of("view");

    backend
        .create_domain(&Context::new("tenant-a"), &domain("example.com."))
        .await
        .unwrap();

    let zones = store.memory().objects_of_type("zone_auth").await;
    assert_eq!(zones.len(), 1);
    assert_eq!(zones[0]["view"], "tenant-a");
}

#[tokio::test]
async fn refused_zone_create_is_swallowed() {
    let (backend, store) = backend_with(BackendConfig::default());
    store.fail_creates_of("zone_auth");

    backend
        .create_domain(&Context::new("t"), &domain("example.com."))
        .await
        .unwrap();

    assert!(store.memory().is_empty().await);
}

#[tokio::test]
async fn refused_record_create_propagates() {
    let (backend, store) = backend_with(BackendConfig::default());
    store.fail_creates_of("record:a");
    let (recordset, record) = recordset("A", "www.example.com.", "10.0.0.1", None);

    let err = backend
        .create_record(&Context::new("t"), &domain("example.com."), &recordset, &record)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::CannotCreateObject { .. }));
    assert_eq!(err.vendor_response().map(|(_, code)| code), Some(400));
}

#[tokio::test]
async fn unknown_type_is_rejected_in_strict_mode() {
    let (backend, store) = backend_with(BackendConfig::default().with_strict_record_types(true));
    let (recordset, record) = recordset("MX", "example.com.", "10 mail.example.com.", None);

    let err = backend
        .create_record(&Context::new("t"), &domain("example.com."), &recordset, &record)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::UnknownRecordType(tag) if tag == "MX"));
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn server_without_member_is_resource_exhausted() {
    let (backend, store) = backend_with(BackendConfig::default());
    let server = Server {
        name: "ns1.example.com.".to_string(),
    };

    let err = backend
        .create_server(&Context::new("t"), &server)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ResourceExhausted(_)));

    // The member is looked up by host name without the root dot
    let (obj_type, lookup) = &store.queries()[0];
    assert_eq!(obj_type, "member");
    assert_eq!(lookup["host_name"], "ns1.example.com");
}

#[tokio::test]
async fn server_with_member_is_accepted() {
    let (backend, store) = backend_with(BackendConfig::default());
    store
        .memory()
        .insert("member", payload([("host_name", "ns1.example.com".into())]))
        .await;
    let server = Server {
        name: "ns1.example.com.".to_string(),
    };

    backend.create_server(&Context::new("t"), &server).await.unwrap();
    backend.delete_server(&Context::new("t"), &server).await.unwrap();

    assert!(store.creates().is_empty());
    assert!(store.deletes().is_empty());
    assert_eq!(store.memory().len().await, 1);
}

#[tokio::test]
async fn log_only_operations_touch_nothing() {
    let (backend, store) = backend_with(BackendConfig::default());
    let context = Context::new("t");
    let domain = domain("example.com.");
    let (recordset, record) = recordset("A", "www.example.com.", "10.0.0.1", None);

    backend
        .create_recordset(&context, &domain, &recordset)
        .await
        .unwrap();
    backend
        .delete_recordset(&context, &domain, &recordset)
        .await
        .unwrap();
    backend
        .sync_domain(&context, &domain, std::slice::from_ref(&record))
        .await
        .unwrap();
    backend.sync_record(&context, &domain, &record).await.unwrap();
    backend.ping(&context).await.unwrap();

    assert!(store.calls().is_empty());
    assert_eq!(backend.backend_name(), "ipam");
}

#[tokio::test]
async fn teardown_of_default_tenant_keeps_builtin_views() {
    let (backend, store) = backend_with(BackendConfig::default().with_multi_tenant(true));
    store
        .memory()
        .insert("networkview", payload([("name", "default".into())]))
        .await;
    store
        .memory()
        .insert(
            "view",
            payload([("name", "default".into()), ("network_view", "default".into())]),
        )
        .await;

    backend
        .create_domain(&Context::new("default"), &domain("example.com."))
        .await
        .unwrap();
    backend.teardown_tenant(&Context::new("default")).await.unwrap();

    let views = store.memory().objects_of_type("view").await;
    assert_eq!(views.len(), 1);
    assert_eq!(views[0]["name"], "default");
    assert_eq!(store.memory().objects_of_type("networkview").await.len(), 1);
    assert!(store.deletes().is_empty());
    assert_eq!(store.store_name(), "recording");
}

#[tokio::test]
async fn teardown_of_tenant_removes_only_its_views() {
    let (backend, store) = backend_with(BackendConfig::default().with_multi_tenant(true));
    store
        .memory()
        .insert("view", payload([("name", "default".into())]))
        .await;

    backend
        .create_domain(&Context::new("tenant-a"), &domain("example.com."))
        .await
        .unwrap();
    backend.teardown_tenant(&Context::new("tenant-a")).await.unwrap();

    let views = store.memory().objects_of_type("view").await;
    assert_eq!(views.len(), 1);
    assert_eq!(views[0]["name"], "default");
    assert!(store.memory().objects_of_type("networkview").await.is_empty());
    assert_eq!(store.deletes().len(), 2);
}
