// # Memory Object Store
//
// In-memory implementation of ObjectStore.
//
// ## Purpose
//
// Mimics the appliance's reference-addressed object store closely enough to
// run the backend without an appliance: queries match on exact attribute
// equality, every created object gets an opaque reference, and update/delete
// address objects by that reference only.
//
// ## When to Use
//
// - Testing environments
// - Dry runs of control-plane event streams
//
// All objects are lost when the store is dropped.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::Error;
use crate::config::StoreConfig;
use crate::model::{Payload, VendorObject};
use crate::traits::{ObjectStore, ObjectStoreFactory};

#[derive(Debug, Clone)]
struct StoredObject {
    reference: String,
    obj_type: String,
    fields: Payload,
}

impl StoredObject {
    fn matches(&self, obj_type: &str, query: &Payload) -> bool {
        self.obj_type == obj_type
            && query
                .iter()
                .all(|(name, value)| self.fields.get(name) == Some(value))
    }

    fn to_vendor_object(&self, return_fields: Option<&[&str]>) -> VendorObject {
        let fields = match return_fields {
            Some(names) => names
                .iter()
                .filter_map(|name| {
                    self.fields
                        .get(*name)
                        .map(|value| (name.to_string(), value.clone()))
                })
                .collect(),
            None => Payload::new(),
        };
        VendorObject {
            reference: self.reference.clone(),
            fields,
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    objects: Vec<StoredObject>,
    next_id: u64,
}

/// In-memory object store implementation
///
/// Objects are kept in insertion order behind a RwLock. Clones share the
/// same objects.
///
/// # Example
///
/// ```rust,no_run
/// use ipamdns_core::store::MemoryObjectStore;
/// use ipamdns_core::traits::ObjectStore;
/// use ipamdns_core::model::payload;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = MemoryObjectStore::new();
///
///     let zone = payload([("fqdn", "example.com".into())]);
///     let created = store.create("zone_auth", &zone, None).await?;
///
///     let found = store.query("zone_auth", &zone, None).await?;
///     assert_eq!(found[0].reference, created.reference);
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryObjectStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryObjectStore {
    /// Create a new empty memory object store
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of objects in the store
    pub async fn len(&self) -> usize {
        self.inner.read().await.objects.len()
    }

    /// Check if the store is empty
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.objects.is_empty()
    }

    /// Remove all objects
    pub async fn clear(&self) {
        self.inner.write().await.objects.clear();
    }

    /// Seed an object directly (e.g. appliance members), returning its reference
    pub async fn insert(&self, obj_type: &str, fields: Payload) -> String {
        let mut guard = self.inner.write().await;
        guard.next_id += 1;
        let reference = make_reference(obj_type, guard.next_id, &fields);
        guard.objects.push(StoredObject {
            reference: reference.clone(),
            obj_type: obj_type.to_string(),
            fields,
        });
        reference
    }

    /// All attributes of all objects of `obj_type`, in insertion order
    pub async fn objects_of_type(&self, obj_type: &str) -> Vec<Payload> {
        let guard = self.inner.read().await;
        guard
            .objects
            .iter()
            .filter(|object| object.obj_type == obj_type)
            .map(|object| object.fields.clone())
            .collect()
    }
}

/// References look like `record:a/3:www.example.com`
fn make_reference(obj_type: &str, id: u64, fields: &Payload) -> String {
    let label = ["name", "fqdn", "host_name"]
        .iter()
        .find_map(|key| fields.get(*key).and_then(Value::as_str))
        .unwrap_or_default();
    format!("{}/{}:{}", obj_type, id, label)
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn query(
        &self,
        obj_type: &str,
        payload: &Payload,
        return_fields: Option<&[&str]>,
    ) -> Result<Vec<VendorObject>, Error> {
        let guard = self.inner.read().await;
        Ok(guard
            .objects
            .iter()
            .filter(|object| object.matches(obj_type, payload))
            .map(|object| object.to_vendor_object(return_fields))
            .collect())
    }

    async fn create(
        &self,
        obj_type: &str,
        payload: &Payload,
        return_fields: Option<&[&str]>,
    ) -> Result<VendorObject, Error> {
        let reference = self.insert(obj_type, payload.clone()).await;
        let guard = self.inner.read().await;
        let object = guard
            .objects
            .iter()
            .find(|object| object.reference == reference)
            .ok_or_else(|| Error::cannot_create(obj_type, "object vanished after insert", 500))?;
        Ok(object.to_vendor_object(return_fields))
    }

    async fn update(&self, reference: &str, fields: &Payload) -> Result<String, Error> {
        let mut guard = self.inner.write().await;
        let object = guard
            .objects
            .iter_mut()
            .find(|object| object.reference == reference)
            .ok_or_else(|| Error::cannot_update(reference, "object not found", 404))?;
        object
            .fields
            .extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
        Ok(reference.to_string())
    }

    async fn delete(&self, reference: &str) -> Result<String, Error> {
        let mut guard = self.inner.write().await;
        let position = guard
            .objects
            .iter()
            .position(|object| object.reference == reference)
            .ok_or_else(|| Error::cannot_delete(reference, "object not found", 404))?;
        guard.objects.remove(position);
        Ok(reference.to_string())
    }

    fn store_name(&self) -> &'static str {
        "memory"
    }
}

/// Factory for creating memory object stores
pub struct MemoryStoreFactory;

impl ObjectStoreFactory for MemoryStoreFactory {
    fn create(&self, config: &StoreConfig) -> Result<Arc<dyn ObjectStore>, Error> {
        match config {
            StoreConfig::Memory => Ok(Arc::new(MemoryObjectStore::new())),
            _ => Err(Error::config("Invalid config for memory store")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::payload;

    #[tokio::test]
    async fn test_memory_store_basic() {
        let store = MemoryObjectStore::new();
        assert!(store.is_empty().await);

        let zone = payload([("fqdn", "example.com".into()), ("view", "default".into())]);
        let created = store.create("zone_auth", &zone, None).await.unwrap();
        assert_eq!(created.reference, "zone_auth/1:example.com");
        assert_eq!(store.len().await, 1);

        store.delete(&created.reference).await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_query_matches_every_field() {
        let store = MemoryObjectStore::new();
        store
            .insert("record:a", payload([("name", "a.example.com".into()), ("view", "v1".into())]))
            .await;
        store
            .insert("record:a", payload([("name", "a.example.com".into()), ("view", "v2".into())]))
            .await;

        let by_name = payload([("name", "a.example.com".into())]);
        assert_eq!(store.query("record:a", &by_name, None).await.unwrap().len(), 2);

        let by_view = payload([("name", "a.example.com".into()), ("view", "v2".into())]);
        assert_eq!(store.query("record:a", &by_view, None).await.unwrap().len(), 1);
        assert!(store.query("record:aaaa", &by_name, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown_reference() {
        let store = MemoryObjectStore::new();
        let err = store.update("zone_auth/9:x", &Payload::new()).await.unwrap_err();
        assert!(matches!(err, Error::CannotUpdateObject { code: 404, .. }));

        let err = store.delete("zone_auth/9:x").await.unwrap_err();
        assert!(matches!(err, Error::CannotDeleteObject { code: 404, .. }));
    }

    #[test]
    fn test_factory_rejects_wapi_config() {
        let config = StoreConfig::Wapi {
            url: "https://ipam.local/wapi/v1.4/".to_string(),
            username: "admin".to_string(),
            password: "secret".to_string(),
            sslverify: true,
            timeout_secs: 30,
        };
        assert!(MemoryStoreFactory.create(&config).is_err());
        assert!(MemoryStoreFactory.create(&StoreConfig::Memory).is_ok());
    }
}
