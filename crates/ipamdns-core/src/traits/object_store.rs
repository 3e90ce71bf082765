// # Object Store Trait
//
// Defines the interface to the IPAM appliance's object store.
//
// ## Implementations
//
// - WAPI (REST): `ipamdns-wapi` crate
// - In-memory: `crate::store::MemoryObjectStore`
//
// ## Usage
//
// ```rust,ignore
// use ipamdns_core::ObjectStore;
//
// let store = /* ObjectStore implementation */;
//
// // Look up a zone by its semantic attributes
// let mut query = Payload::new();
// query.insert("fqdn".into(), "example.com".into());
// let zones = store.query("zone_auth", &query, None).await?;
//
// // Mutations address the object by its opaque reference
// if let Some(zone) = zones.first() {
//     store.delete(&zone.reference).await?;
// }
// ```

use async_trait::async_trait;

use crate::model::{Payload, VendorObject};

/// Trait for object store implementations
///
/// Objects are identified by a server-assigned opaque reference. Semantic
/// attributes are only usable for queries; update and delete always go
/// through the reference.
///
/// # Trust Level
///
/// Stores perform one round trip per call and nothing else:
/// - no retries or backoff
/// - no caching of objects between calls
/// - no background tasks
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Find objects of `obj_type` whose attributes match every field of `payload`
    ///
    /// Returns an empty list when nothing matches. `return_fields` asks the
    /// store to include those attributes in each result.
    ///
    /// # Errors
    ///
    /// `Error::SearchError` when the store rejects the query.
    async fn query(
        &self,
        obj_type: &str,
        payload: &Payload,
        return_fields: Option<&[&str]>,
    ) -> Result<Vec<VendorObject>, crate::Error>;

    /// Create an object of `obj_type` from `payload`
    ///
    /// # Errors
    ///
    /// `Error::CannotCreateObject` when the store rejects the object.
    async fn create(
        &self,
        obj_type: &str,
        payload: &Payload,
        return_fields: Option<&[&str]>,
    ) -> Result<VendorObject, crate::Error>;

    /// Update the object behind `reference` with `fields`
    ///
    /// Returns the (possibly new) reference of the object.
    async fn update(&self, reference: &str, fields: &Payload) -> Result<String, crate::Error>;

    /// Delete the object behind `reference`
    ///
    /// Returns the reference of the deleted object.
    async fn delete(&self, reference: &str) -> Result<String, crate::Error>;

    /// Get the store name (for logging/debugging)
    fn store_name(&self) -> &'static str;
}

/// Helper trait for constructing object stores from configuration
pub trait ObjectStoreFactory: Send + Sync {
    /// Create an ObjectStore instance from configuration
    fn create(
        &self,
        config: &crate::config::StoreConfig,
    ) -> Result<std::sync::Arc<dyn ObjectStore>, crate::Error>;
}
