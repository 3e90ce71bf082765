// # IPAM Backend
//
// Implements the control plane's lifecycle contract on top of the object
// manipulator and the record translators.
//
// Real state changes happen at zone, record and TSIG-key level only. The
// appliance has no recordset or server entity of its own, so those events are
// logged (server events additionally verify that a serving member exists).
//
// Every call re-queries the store; the backend keeps no state between calls
// beyond its configuration and store handle.

use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::config::{BackendConfig, DEFAULT_NETWORK_VIEW};
use crate::manipulator::{ObjectManipulator, ViewSetup};
use crate::model::{Context, Domain, Record, RecordSet, Server, TsigKey, strip_root};
use crate::records::{self, RecordTranslator};
use crate::traits::{DnsBackend, ObjectStore};
use crate::{Error, Result};

/// Backend name reported to the control plane
pub const BACKEND_NAME: &str = "ipam";

/// DNS backend backed by an IPAM appliance
#[derive(Debug, Clone)]
pub struct IpamBackend {
    manipulator: ObjectManipulator,
    config: BackendConfig,
}

impl IpamBackend {
    /// Create a backend talking to `store`
    pub fn new(store: Arc<dyn ObjectStore>, config: BackendConfig) -> Self {
        Self {
            manipulator: ObjectManipulator::new(store),
            config,
        }
    }

    /// Backend configuration
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Object manipulator used for all store access
    pub fn manipulator(&self) -> &ObjectManipulator {
        &self.manipulator
    }

    /// Resolve (and in multi-tenant mode lazily create) the tenant's DNS view
    pub async fn prepare_view(&self, context: &Context) -> ViewSetup {
        let setup = self
            .manipulator
            .resolve_dns_view(&self.config, &context.tenant)
            .await;
        if let ViewSetup::TenantDegraded { view, reason } = &setup {
            tracing::warn!(
                "Proceeding with DNS view '{}' despite failed view setup: {}",
                view,
                reason
            );
        }
        setup
    }

    /// Delete the tenant's DNS view and network view
    ///
    /// Does nothing outside multi-tenant mode, or for a tenant named after
    /// the built-in `default` views or the configured shared DNS view.
    pub async fn teardown_tenant(&self, context: &Context) -> Result<()> {
        if !self.config.multi_tenant {
            tracing::info!("Shared DNS view in use, nothing to tear down");
            return Ok(());
        }
        if context.tenant == DEFAULT_NETWORK_VIEW || context.tenant == self.config.dns_view {
            tracing::warn!(
                "Tenant {} names a built-in or shared view, keeping its views",
                context.tenant
            );
            return Ok(());
        }

        tracing::info!("Tear down views of tenant {}", context.tenant);
        self.manipulator.delete_dns_view(&context.tenant).await?;
        self.manipulator.delete_network_view(&context.tenant).await
    }

    fn translator(
        &self,
        context: &Context,
        recordset: &RecordSet,
    ) -> Result<Option<RecordTranslator<'_>>> {
        records::select(recordset, &self.manipulator, &self.config, &context.tenant)
    }

    async fn ensure_member(&self, server: &Server) -> Result<()> {
        match self.manipulator.get_member(&server.name).await? {
            Some(_) => Ok(()),
            None => Err(Error::no_member_available()),
        }
    }
}

#[async_trait]
impl DnsBackend for IpamBackend {
    async fn create_domain(&self, context: &Context, domain: &Domain) -> Result<()> {
        tracing::info!("Create Domain {}", domain.name);

        let setup = self.prepare_view(context).await;
        self.manipulator
            .create_zone_auth(strip_root(&domain.name), setup.view())
            .await
    }

    async fn update_domain(&self, _context: &Context, domain: &Domain) -> Result<()> {
        tracing::info!("Update Domain {}", domain.name);
        self.manipulator
            .update_zone_auth(strip_root(&domain.name))
            .await
    }

    async fn delete_domain(&self, _context: &Context, domain: &Domain) -> Result<()> {
        tracing::info!("Delete Domain {}", domain.name);
        self.manipulator
            .delete_zone_auth(strip_root(&domain.name))
            .await
    }

    async fn create_recordset(
        &self,
        _context: &Context,
        domain: &Domain,
        recordset: &RecordSet,
    ) -> Result<()> {
        tracing::info!("Create RecordSet {} / {}", domain.name, recordset.name);
        Ok(())
    }

    async fn update_recordset(
        &self,
        context: &Context,
        domain: &Domain,
        recordset: &RecordSet,
    ) -> Result<()> {
        tracing::info!("Update RecordSet {} / {}", domain.name, recordset.name);
        match self.translator(context, recordset)? {
            Some(translator) => translator.update(recordset, None).await,
            None => Ok(()),
        }
    }

    async fn delete_recordset(
        &self,
        _context: &Context,
        domain: &Domain,
        recordset: &RecordSet,
    ) -> Result<()> {
        tracing::info!("Delete RecordSet {} / {}", domain.name, recordset.name);
        Ok(())
    }

    async fn create_record(
        &self,
        context: &Context,
        domain: &Domain,
        recordset: &RecordSet,
        record: &Record,
    ) -> Result<()> {
        tracing::info!(
            "Create Record {} / {} / {}",
            domain.name,
            recordset.name,
            record.id
        );
        match self.translator(context, recordset)? {
            Some(translator) => translator.create(recordset, Some(record)).await,
            None => Ok(()),
        }
    }

    async fn update_record(
        &self,
        context: &Context,
        domain: &Domain,
        recordset: &RecordSet,
        record: &Record,
    ) -> Result<()> {
        tracing::info!(
            "Update Record {} / {} / {}",
            domain.name,
            recordset.name,
            record.id
        );
        match self.translator(context, recordset)? {
            Some(translator) => translator.update(recordset, Some(record)).await,
            None => Ok(()),
        }
    }

    async fn delete_record(
        &self,
        context: &Context,
        domain: &Domain,
        recordset: &RecordSet,
        record: &Record,
    ) -> Result<()> {
        tracing::info!(
            "Delete Record {} / {} / {}",
            domain.name,
            recordset.name,
            record.id
        );
        match self.translator(context, recordset)? {
            Some(translator) => translator.delete(recordset, Some(record)).await,
            None => Ok(()),
        }
    }

    async fn create_tsigkey(&self, _context: &Context, tsigkey: &TsigKey) -> Result<()> {
        tracing::info!("Create TSIG Key {}", tsigkey.name);
        self.manipulator
            .create_tsig(&tsigkey.name, &tsigkey.algorithm, &STANDARD.encode(&tsigkey.secret))
            .await
    }

    async fn update_tsigkey(&self, _context: &Context, tsigkey: &TsigKey) -> Result<()> {
        tracing::info!("Update TSIG Key {}", tsigkey.name);
        self.manipulator
            .update_tsig(&tsigkey.name, &tsigkey.algorithm, &STANDARD.encode(&tsigkey.secret))
            .await
    }

    async fn delete_tsigkey(&self, _context: &Context, tsigkey: &TsigKey) -> Result<()> {
        tracing::info!("Delete TSIG Key {}", tsigkey.name);
        self.manipulator.delete_tsig(&tsigkey.name).await
    }

    async fn create_server(&self, _context: &Context, server: &Server) -> Result<()> {
        tracing::info!("Create Server {}", server.name);
        self.ensure_member(server).await
    }

    async fn update_server(&self, _context: &Context, server: &Server) -> Result<()> {
        tracing::info!("Update Server {}", server.name);
        self.ensure_member(server).await
    }

    async fn delete_server(&self, _context: &Context, server: &Server) -> Result<()> {
        tracing::info!("Delete Server {}", server.name);
        Ok(())
    }

    async fn sync_domain(
        &self,
        _context: &Context,
        domain: &Domain,
        records: &[Record],
    ) -> Result<()> {
        tracing::info!("Sync Domain {} / {} record(s)", domain.name, records.len());
        Ok(())
    }

    async fn sync_record(&self, _context: &Context, domain: &Domain, record: &Record) -> Result<()> {
        tracing::info!("Sync Record {} / {}", domain.name, record.id);
        Ok(())
    }

    async fn ping(&self, _context: &Context) -> Result<()> {
        tracing::info!("Ping");
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        BACKEND_NAME
    }
}
