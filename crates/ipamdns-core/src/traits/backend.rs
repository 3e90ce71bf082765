// # DNS Backend Trait
//
// The lifecycle contract a DNS-as-a-service control plane drives.
//
// One method per lifecycle event. Each receives the request context plus the
// value the event is about, and returns nothing on success.

use async_trait::async_trait;

use crate::Result;
use crate::model::{Context, Domain, Record, RecordSet, Server, TsigKey};

/// Trait for backends that apply DNS lifecycle events
///
/// Calls may be delivered more than once; update and delete must be
/// idempotent.
#[async_trait]
pub trait DnsBackend: Send + Sync {
    /// Create a zone
    async fn create_domain(&self, context: &Context, domain: &Domain) -> Result<()>;

    /// Update zone metadata
    async fn update_domain(&self, context: &Context, domain: &Domain) -> Result<()>;

    /// Delete a zone
    async fn delete_domain(&self, context: &Context, domain: &Domain) -> Result<()>;

    /// Create a recordset
    async fn create_recordset(
        &self,
        context: &Context,
        domain: &Domain,
        recordset: &RecordSet,
    ) -> Result<()>;

    /// Update a recordset (name or TTL changed for all its records)
    async fn update_recordset(
        &self,
        context: &Context,
        domain: &Domain,
        recordset: &RecordSet,
    ) -> Result<()>;

    /// Delete a recordset
    async fn delete_recordset(
        &self,
        context: &Context,
        domain: &Domain,
        recordset: &RecordSet,
    ) -> Result<()>;

    /// Create a record
    async fn create_record(
        &self,
        context: &Context,
        domain: &Domain,
        recordset: &RecordSet,
        record: &Record,
    ) -> Result<()>;

    /// Update a record
    async fn update_record(
        &self,
        context: &Context,
        domain: &Domain,
        recordset: &RecordSet,
        record: &Record,
    ) -> Result<()>;

    /// Delete a record
    async fn delete_record(
        &self,
        context: &Context,
        domain: &Domain,
        recordset: &RecordSet,
        record: &Record,
    ) -> Result<()>;

    /// Create a TSIG key
    async fn create_tsigkey(&self, context: &Context, tsigkey: &TsigKey) -> Result<()>;

    /// Update a TSIG key
    async fn update_tsigkey(&self, context: &Context, tsigkey: &TsigKey) -> Result<()>;

    /// Delete a TSIG key
    async fn delete_tsigkey(&self, context: &Context, tsigkey: &TsigKey) -> Result<()>;

    /// Register a nameserver
    async fn create_server(&self, context: &Context, server: &Server) -> Result<()>;

    /// Update a nameserver
    async fn update_server(&self, context: &Context, server: &Server) -> Result<()>;

    /// Remove a nameserver
    async fn delete_server(&self, context: &Context, server: &Server) -> Result<()>;

    /// Re-apply a whole zone
    async fn sync_domain(&self, context: &Context, domain: &Domain, records: &[Record])
    -> Result<()>;

    /// Re-apply a single record
    async fn sync_record(&self, context: &Context, domain: &Domain, record: &Record) -> Result<()>;

    /// Liveness check
    async fn ping(&self, context: &Context) -> Result<()>;

    /// Get the backend name (for logging/debugging)
    fn backend_name(&self) -> &'static str;
}
