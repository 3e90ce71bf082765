// # ipamdns-core
//
// Core library translating DNS lifecycle operations into calls against an
// IPAM appliance's object store.
//
// ## Architecture Overview
//
// - **ObjectStore**: Trait for the appliance's reference-addressed object store
// - **ObjectManipulator**: Idempotent query-then-act create/update/delete
// - **RecordTranslator**: Per-record-type mapping of recordsets to vendor objects
// - **IpamBackend**: The lifecycle contract (`DnsBackend`) the control plane drives
// - **StoreRegistry**: Plugin-based registry for object stores
//
// ## Design Principles
//
// 1. **Stateless**: Every call re-queries the store; nothing is cached
// 2. **Idempotent**: Creates check for existence, missing objects on
//    update/delete are no-ops
// 3. **Explicit configuration**: View selection is passed in, never global
// 4. **Library-First**: The binary is a thin driver over this crate

pub mod backend;
pub mod config;
pub mod error;
pub mod manipulator;
pub mod model;
pub mod records;
pub mod registry;
pub mod store;
pub mod traits;

// Re-export core types for convenience
pub use backend::IpamBackend;
pub use config::{BackendConfig, IpamConfig, StoreConfig};
pub use error::{Error, Result};
pub use manipulator::{ObjectManipulator, ViewSetup};
pub use model::{Context, Domain, Payload, Record, RecordSet, Server, TsigKey, VendorObject};
pub use records::{RecordTranslator, RecordType};
pub use registry::StoreRegistry;
pub use store::MemoryObjectStore;
pub use traits::{DnsBackend, ObjectStore, ObjectStoreFactory};
