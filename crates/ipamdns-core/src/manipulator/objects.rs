//! Typed helpers for the non-record objects the backend touches
//!
//! Members, network views, DNS views, authoritative zones and TSIG keys.

use serde_json::Value;

use super::ObjectManipulator;
use crate::config::{BackendConfig, DEFAULT_NETWORK_VIEW};
use crate::model::{Payload, VendorObject, payload, strip_root};
use crate::{Error, Result};

/// Outcome of resolving the DNS view for a tenant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewSetup {
    /// Multi-tenant mode is off; the shared view is used
    Shared(String),
    /// The tenant's network view and DNS view exist
    TenantReady(String),
    /// View setup failed; callers proceed with the tenant's view anyway
    TenantDegraded {
        /// View name that will be used regardless
        view: String,
        /// Why setup failed
        reason: String,
    },
}

impl ViewSetup {
    /// DNS view name to place objects in
    pub fn view(&self) -> &str {
        match self {
            ViewSetup::Shared(view) | ViewSetup::TenantReady(view) => view,
            ViewSetup::TenantDegraded { view, .. } => view,
        }
    }

    /// `true` if view setup failed
    pub fn is_degraded(&self) -> bool {
        matches!(self, ViewSetup::TenantDegraded { .. })
    }
}

impl ObjectManipulator {
    /// Look up the appliance member serving `member_name`
    pub async fn get_member(&self, member_name: &str) -> Result<Option<VendorObject>> {
        let query = payload([("host_name", strip_root(member_name).into())]);
        self.find_object_or_none("member", &query, None).await
    }

    /// Create a network view (no-op if it exists)
    pub async fn create_network_view(&self, net_view_name: &str) -> Result<VendorObject> {
        let data = payload([("name", net_view_name.into())]);
        self.create_object("networkview", data, Payload::new(), true, None)
            .await
    }

    /// Delete a network view; the default network view is never deleted
    pub async fn delete_network_view(&self, net_view_name: &str) -> Result<()> {
        if net_view_name == DEFAULT_NETWORK_VIEW {
            return Ok(());
        }
        let data = payload([("name", net_view_name.into())]);
        self.delete_object_by_query("networkview", &data).await
    }

    /// Create a DNS view bound to a network view (no-op if it exists)
    pub async fn create_dns_view(
        &self,
        net_view_name: &str,
        dns_view_name: &str,
    ) -> Result<VendorObject> {
        let data = payload([
            ("name", dns_view_name.into()),
            ("network_view", net_view_name.into()),
        ]);
        self.create_object("view", data, Payload::new(), true, None)
            .await
    }

    /// Delete a DNS view
    pub async fn delete_dns_view(&self, dns_view_name: &str) -> Result<()> {
        let data = payload([("name", dns_view_name.into())]);
        self.delete_object_by_query("view", &data).await
    }

    /// Resolve the DNS view for `tenant`, creating per-tenant views lazily
    ///
    /// In multi-tenant mode a failure while creating the network view or
    /// DNS view is logged and reported as [`ViewSetup::TenantDegraded`];
    /// it never fails the call.
    pub async fn resolve_dns_view(&self, config: &BackendConfig, tenant: &str) -> ViewSetup {
        if !config.multi_tenant {
            return ViewSetup::Shared(config.dns_view.clone());
        }

        let setup = async {
            self.create_network_view(tenant).await?;
            self.create_dns_view(tenant, tenant).await?;
            Ok::<(), Error>(())
        };

        match setup.await {
            Ok(()) => ViewSetup::TenantReady(tenant.to_string()),
            Err(err) => {
                tracing::warn!("Issue happened during views creation: {}", err);
                ViewSetup::TenantDegraded {
                    view: tenant.to_string(),
                    reason: err.to_string(),
                }
            }
        }
    }

    /// Create an authoritative zone
    ///
    /// A store refusal (e.g. the zone appeared between check and create) is
    /// logged and swallowed.
    pub async fn create_zone_auth(&self, fqdn: &str, dns_view: &str) -> Result<()> {
        let data = payload([("fqdn", fqdn.into()), ("view", dns_view.into())]);
        match self
            .create_object("zone_auth", data, Payload::new(), true, None)
            .await
        {
            Ok(_) => Ok(()),
            Err(err @ Error::CannotCreateObject { .. }) => {
                tracing::warn!("{}", err);
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// Update an authoritative zone
    // TODO: wire zone attributes (e.g. comment, ns_group) once the control plane sends them
    pub async fn update_zone_auth(&self, fqdn: &str) -> Result<()> {
        let query = payload([("fqdn", fqdn.into())]);
        self.update_object_by_query("zone_auth", &query, &Payload::new())
            .await
    }

    /// Delete an authoritative zone
    pub async fn delete_zone_auth(&self, fqdn: &str) -> Result<()> {
        let query = payload([("fqdn", fqdn.into())]);
        self.delete_object_by_query("zone_auth", &query).await
    }

    /// Create a TSIG key keyed by name
    pub async fn create_tsig(&self, name: &str, algorithm: &str, secret: &str) -> Result<()> {
        let identity = payload([("name", name.into())]);
        self.create_object("tsig", identity, tsig_fields(algorithm, secret), true, None)
            .await?;
        Ok(())
    }

    /// Replace the secret and algorithm of a TSIG key
    pub async fn update_tsig(&self, name: &str, algorithm: &str, secret: &str) -> Result<()> {
        let query = payload([("name", name.into())]);
        self.update_object_by_query("tsig", &query, &tsig_fields(algorithm, secret))
            .await
    }

    /// Delete a TSIG key
    pub async fn delete_tsig(&self, name: &str) -> Result<()> {
        let query = payload([("name", name.into())]);
        self.delete_object_by_query("tsig", &query).await
    }
}

fn tsig_fields(algorithm: &str, secret: &str) -> Payload {
    payload([
        ("key", Value::from(secret)),
        ("algorithm", Value::from(algorithm)),
    ])
}
