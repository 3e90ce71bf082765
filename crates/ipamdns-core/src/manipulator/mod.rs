// # Object Manipulator
//
// Idempotent create/update/delete on top of an `ObjectStore`.
//
// The store addresses objects by opaque reference, while callers only know
// semantic attributes. Every mutation therefore looks the object up first:
//
// - create: an existing match is returned instead of creating a duplicate
// - update/delete: a missing object means the store has already converged,
//   so the call is a logged no-op rather than an error
//
// Genuine store failures (other than a failed lookup during update/delete)
// propagate to the caller as typed errors. Nothing is retried here.

pub mod objects;

pub use objects::ViewSetup;

use std::sync::Arc;

use crate::model::{Payload, VendorObject};
use crate::traits::ObjectStore;
use crate::{Error, Result};

/// Idempotent CRUD helper over an object store
#[derive(Clone)]
pub struct ObjectManipulator {
    store: Arc<dyn ObjectStore>,
}

impl std::fmt::Debug for ObjectManipulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectManipulator")
            .field("store", &self.store.store_name())
            .finish()
    }
}

impl ObjectManipulator {
    /// Wrap an object store
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// The underlying store
    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    /// Create an object unless one matching `payload` already exists
    ///
    /// Only `payload` takes part in the existence check. `extra` is merged in
    /// just before the create call; it carries mutable metadata (TTL and the
    /// like) that must not affect whether an object counts as existing.
    ///
    /// # Errors
    ///
    /// - `Error::SearchError` if the existence query fails
    /// - `Error::CannotCreateObject` if the store refuses the object
    pub async fn create_object(
        &self,
        obj_type: &str,
        mut payload: Payload,
        extra: Payload,
        check_exists: bool,
        return_fields: Option<&[&str]>,
    ) -> Result<VendorObject> {
        if check_exists
            && let Some(existing) = self
                .find_object_or_none(obj_type, &payload, return_fields)
                .await?
        {
            tracing::info!("{} already exists: {}", obj_type, existing.reference);
            return Ok(existing);
        }

        payload.extend(extra);
        let created = self.store.create(obj_type, &payload, return_fields).await?;
        tracing::info!("{} was created: {}", obj_type, created.reference);
        Ok(created)
    }

    /// Find the first object of `obj_type` matching `payload`
    ///
    /// Without `return_fields` only the reference is kept.
    pub async fn find_object_or_none(
        &self,
        obj_type: &str,
        payload: &Payload,
        return_fields: Option<&[&str]>,
    ) -> Result<Option<VendorObject>> {
        let found = self.store.query(obj_type, payload, return_fields).await?;

        Ok(found.into_iter().next().map(|object| {
            if return_fields.is_some() {
                object
            } else {
                VendorObject::from_ref(object.reference)
            }
        }))
    }

    /// Update the object matching `payload`; a missing object is a no-op
    pub async fn update_object_by_query(
        &self,
        obj_type: &str,
        payload: &Payload,
        update: &Payload,
    ) -> Result<()> {
        match self.lookup_for_mutation(obj_type, payload, "updated").await? {
            Some(reference) => self.update_object_by_ref(&reference, update).await,
            None => Ok(()),
        }
    }

    /// Update the object behind `reference`
    pub async fn update_object_by_ref(&self, reference: &str, update: &Payload) -> Result<()> {
        self.store.update(reference, update).await?;
        tracing::info!("Object was updated: {}", reference);
        Ok(())
    }

    /// Delete the object matching `payload`; a missing object is a no-op
    pub async fn delete_object_by_query(&self, obj_type: &str, payload: &Payload) -> Result<()> {
        if let Some(reference) = self.lookup_for_mutation(obj_type, payload, "deleted").await? {
            self.store.delete(&reference).await?;
            tracing::info!("Object was deleted: {}", reference);
        }
        Ok(())
    }

    /// Resolve the reference to mutate, treating "not found" and failed
    /// searches as already converged
    async fn lookup_for_mutation(
        &self,
        obj_type: &str,
        payload: &Payload,
        action: &str,
    ) -> Result<Option<String>> {
        match self.find_object_or_none(obj_type, payload, None).await {
            Ok(Some(object)) => Ok(Some(object.reference)),
            Ok(None) => {
                tracing::warn!(
                    "{} will not be {} because it cannot be found: {:?}",
                    obj_type,
                    action,
                    payload
                );
                Ok(None)
            }
            Err(err @ Error::SearchError { .. }) => {
                tracing::warn!(
                    "{} will not be {} because it cannot be found: {:?}",
                    obj_type,
                    action,
                    payload
                );
                tracing::info!("{}", err);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::payload;
    use crate::store::MemoryObjectStore;

    fn manipulator() -> (ObjectManipulator, MemoryObjectStore) {
        let store = MemoryObjectStore::new();
        (ObjectManipulator::new(Arc::new(store.clone())), store)
    }

    #[tokio::test]
    async fn find_returns_reference_only_without_return_fields() {
        let (manipulator, _store) = manipulator();
        let query = payload([("name", "tenant-a".into())]);
        manipulator
            .create_object("networkview", query.clone(), Payload::new(), true, None)
            .await
            .unwrap();

        let found = manipulator
            .find_object_or_none("networkview", &query, None)
            .await
            .unwrap()
            .unwrap();
        assert!(found.fields.is_empty());

        let found = manipulator
            .find_object_or_none("networkview", &query, Some(&["name"][..]))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.field("name"), Some(&serde_json::Value::from("tenant-a")));
    }

    #[tokio::test]
    async fn extra_fields_do_not_take_part_in_existence_check() {
        let (manipulator, store) = manipulator();
        let identity = payload([("name", "www.example.com".into())]);

        manipulator
            .create_object(
                "record:a",
                identity.clone(),
                payload([("ttl", 300.into())]),
                true,
                None,
            )
            .await
            .unwrap();
        manipulator
            .create_object(
                "record:a",
                identity,
                payload([("ttl", 600.into())]),
                true,
                None,
            )
            .await
            .unwrap();

        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn update_of_missing_object_is_a_no_op() {
        let (manipulator, store) = manipulator();
        manipulator
            .update_object_by_query(
                "zone_auth",
                &payload([("fqdn", "missing.example.com".into())]),
                &Payload::new(),
            )
            .await
            .unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn delete_twice_does_not_fail() {
        let (manipulator, store) = manipulator();
        let identity = payload([("fqdn", "example.com".into())]);
        manipulator
            .create_object("zone_auth", identity.clone(), Payload::new(), true, None)
            .await
            .unwrap();

        manipulator
            .delete_object_by_query("zone_auth", &identity)
            .await
            .unwrap();
        manipulator
            .delete_object_by_query("zone_auth", &identity)
            .await
            .unwrap();
        assert!(store.is_empty().await);
    }
}
