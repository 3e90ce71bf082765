//! Test doubles and common utilities for backend contract tests
//!
//! `RecordingStore` delegates to an in-memory store and records every call,
//! so tests can assert on exactly what would reach the appliance.

#![allow(dead_code)]

use async_trait::async_trait;
use ipamdns_core::model::{Payload, VendorObject};
use ipamdns_core::store::MemoryObjectStore;
use ipamdns_core::traits::ObjectStore;
use ipamdns_core::{BackendConfig, Domain, Error, IpamBackend, Record, RecordSet, Result};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// One call issued against the store
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    Query { obj_type: String, payload: Payload },
    Create { obj_type: String, payload: Payload },
    Update { reference: String, fields: Payload },
    Delete { reference: String },
}

/// An object store that records calls and can be told to fail
#[derive(Clone, Default)]
pub struct RecordingStore {
    inner: MemoryObjectStore,
    calls: Arc<Mutex<Vec<StoreCall>>>,
    failing_queries: Arc<Mutex<HashSet<String>>>,
    failing_creates: Arc<Mutex<HashSet<String>>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The wrapped memory store (for seeding and inspection)
    pub fn memory(&self) -> &MemoryObjectStore {
        &self.inner
    }

    /// Make every query against `obj_type` fail with a search error
    pub fn fail_queries_of(&self, obj_type: &str) {
        self.failing_queries
            .lock()
            .unwrap()
            .insert(obj_type.to_string());
    }

    /// Make every create of `obj_type` fail with a cannot-create error
    pub fn fail_creates_of(&self, obj_type: &str) {
        self.failing_creates
            .lock()
            .unwrap()
            .insert(obj_type.to_string());
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn creates(&self) -> Vec<(String, Payload)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                StoreCall::Create { obj_type, payload } => Some((obj_type, payload)),
                _ => None,
            })
            .collect()
    }

    pub fn queries(&self) -> Vec<(String, Payload)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                StoreCall::Query { obj_type, payload } => Some((obj_type, payload)),
                _ => None,
            })
            .collect()
    }

    pub fn updates(&self) -> Vec<(String, Payload)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                StoreCall::Update { reference, fields } => Some((reference, fields)),
                _ => None,
            })
            .collect()
    }

    pub fn deletes(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                StoreCall::Delete { reference } => Some(reference),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: StoreCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ObjectStore for RecordingStore {
    async fn query(
        &self,
        obj_type: &str,
        payload: &Payload,
        return_fields: Option<&[&str]>,
    ) -> Result<Vec<VendorObject>> {
        self.record(StoreCall::Query {
            obj_type: obj_type.to_string(),
            payload: payload.clone(),
        });
        if self.failing_queries.lock().unwrap().contains(obj_type) {
            return Err(Error::search(obj_type, "{\"Error\": \"search failed\"}", 400));
        }
        self.inner.query(obj_type, payload, return_fields).await
    }

    async fn create(
        &self,
        obj_type: &str,
        payload: &Payload,
        return_fields: Option<&[&str]>,
    ) -> Result<VendorObject> {
        self.record(StoreCall::Create {
            obj_type: obj_type.to_string(),
            payload: payload.clone(),
        });
        if self.failing_creates.lock().unwrap().contains(obj_type) {
            return Err(Error::cannot_create(obj_type, "{\"Error\": \"refused\"}", 400));
        }
        self.inner.create(obj_type, payload, return_fields).await
    }

    async fn update(&self, reference: &str, fields: &Payload) -> Result<String> {
        self.record(StoreCall::Update {
            reference: reference.to_string(),
            fields: fields.clone(),
        });
        self.inner.update(reference, fields).await
    }

    async fn delete(&self, reference: &str) -> Result<String> {
        self.record(StoreCall::Delete {
            reference: reference.to_string(),
        });
        self.inner.delete(reference).await
    }

    fn store_name(&self) -> &'static str {
        "recording"
    }
}

/// Backend over a fresh recording store
pub fn backend_with(config: BackendConfig) -> (IpamBackend, RecordingStore) {
    let store = RecordingStore::new();
    let backend = IpamBackend::new(Arc::new(store.clone()), config);
    (backend, store)
}

pub fn domain(name: &str) -> Domain {
    Domain {
        id: "domain-1".to_string(),
        name: name.to_string(),
        tenant_id: "tenant-a".to_string(),
    }
}

/// A single-record recordset of `record_type`
pub fn recordset(record_type: &str, name: &str, data: &str, ttl: Option<u32>) -> (RecordSet, Record) {
    let record = Record::new("record-1", data);
    let mut recordset = RecordSet::new("recordset-1", name, record_type).with_record(record.clone());
    recordset.ttl = ttl;
    (recordset, record)
}
