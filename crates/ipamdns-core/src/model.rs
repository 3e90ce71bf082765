//! Request-scoped values supplied by the control plane
//!
//! None of these are stored by the backend; they live for one lifecycle call.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Attribute map sent to, or received from, the object store
pub type Payload = Map<String, Value>;

/// Request context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    /// Tenant issuing the request
    pub tenant: String,
}

impl Context {
    /// Create a context for `tenant`
    pub fn new(tenant: impl Into<String>) -> Self {
        Self {
            tenant: tenant.into(),
        }
    }
}

/// A DNS zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    /// Control-plane identifier
    pub id: String,
    /// Fully-qualified zone name, trailing dot included
    pub name: String,
    /// Owning tenant
    pub tenant_id: String,
}

/// Records sharing one name and type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSet {
    /// Control-plane identifier
    pub id: String,
    /// Owner name, trailing dot included
    pub name: String,
    /// Raw type tag ("A", "AAAA", ...)
    #[serde(rename = "type")]
    pub record_type: String,
    /// TTL; `None` or zero inherits the view default
    #[serde(default)]
    pub ttl: Option<u32>,
    /// Member records, in control-plane order
    #[serde(default)]
    pub records: Vec<Record>,
}

impl RecordSet {
    /// Create an empty recordset
    pub fn new(id: impl Into<String>, name: impl Into<String>, record_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            record_type: record_type.into(),
            ttl: None,
            records: Vec::new(),
        }
    }

    /// Set the TTL
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Append a record
    pub fn with_record(mut self, record: Record) -> Self {
        self.records.push(record);
        self
    }
}

/// A single value of a recordset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Control-plane identifier, distinct from the recordset's
    pub id: String,
    /// Address, target name, ...
    pub data: String,
}

impl Record {
    /// Create a record
    pub fn new(id: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            data: data.into(),
        }
    }
}

/// Shared secret for authenticated zone transfer and update
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TsigKey {
    /// Key name
    pub name: String,
    /// Algorithm, e.g. `hmac-md5`
    pub algorithm: String,
    /// Raw secret bytes
    pub secret: Vec<u8>,
}

impl std::fmt::Debug for TsigKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TsigKey")
            .field("name", &self.name)
            .field("algorithm", &self.algorithm)
            .field("secret", &"<REDACTED>")
            .finish()
    }
}

/// A nameserver known to the control plane
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    /// Hostname, trailing dot included
    pub name: String,
}

/// An object as held by the vendor store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorObject {
    /// Server-assigned opaque reference
    pub reference: String,
    /// Returned fields (empty unless requested)
    #[serde(default)]
    pub fields: Payload,
}

impl VendorObject {
    /// An object known only by its reference
    pub fn from_ref(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            fields: Payload::new(),
        }
    }

    /// Look up a returned field
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

/// Build a payload from field/value pairs
pub fn payload<const N: usize>(fields: [(&str, Value); N]) -> Payload {
    fields
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

/// Strip the root dot from a fully-qualified name
pub fn strip_root(name: &str) -> &str {
    name.strip_suffix('.').unwrap_or(name)
}
