// # Object Store Implementations
//
// Stores that live inside this crate. The appliance REST store lives in the
// `ipamdns-wapi` crate.

pub mod memory;

pub use memory::{MemoryObjectStore, MemoryStoreFactory};
