//! Core traits for the IPAM DNS backend
//!
//! - [`ObjectStore`]: Outbound contract to the appliance's object store
//! - [`DnsBackend`]: Inbound lifecycle contract used by the control plane

pub mod backend;
pub mod object_store;

pub use backend::DnsBackend;
pub use object_store::{ObjectStore, ObjectStoreFactory};
