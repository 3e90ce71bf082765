//! Configuration types for the IPAM DNS backend
//!
//! Configuration is passed explicitly into the backend and its translators;
//! nothing here is read from global state.

use serde::{Deserialize, Serialize};

/// Name of the network view that always exists on the appliance
pub const DEFAULT_NETWORK_VIEW: &str = "default";

/// Main backend configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IpamConfig {
    /// View selection and record handling
    #[serde(default)]
    pub backend: BackendConfig,

    /// Object store the backend talks to
    #[serde(default)]
    pub store: StoreConfig,
}

impl IpamConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.backend.validate()?;
        self.store.validate()?;
        Ok(())
    }
}

/// Backend behaviour settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// One DNS view (and network view) per tenant, created lazily
    #[serde(default)]
    pub multi_tenant: bool,

    /// Shared DNS view used when `multi_tenant` is off
    #[serde(default = "default_dns_view")]
    pub dns_view: String,

    /// Fail operations on unsupported record types instead of skipping them
    #[serde(default)]
    pub strict_record_types: bool,
}

impl BackendConfig {
    /// DNS view that records of `tenant` live in
    pub fn view_for(&self, tenant: &str) -> String {
        if self.multi_tenant {
            tenant.to_string()
        } else {
            self.dns_view.clone()
        }
    }

    /// Enable or disable multi-tenant mode
    pub fn with_multi_tenant(mut self, multi_tenant: bool) -> Self {
        self.multi_tenant = multi_tenant;
        self
    }

    /// Set the shared DNS view
    pub fn with_dns_view(mut self, dns_view: impl Into<String>) -> Self {
        self.dns_view = dns_view.into();
        self
    }

    /// Enable or disable strict record type handling
    pub fn with_strict_record_types(mut self, strict: bool) -> Self {
        self.strict_record_types = strict;
        self
    }

    /// Validate the backend configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if !self.multi_tenant && self.dns_view.is_empty() {
            return Err(crate::Error::config(
                "DNS view cannot be empty when multi-tenant mode is off",
            ));
        }
        Ok(())
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            multi_tenant: false,
            dns_view: default_dns_view(),
            strict_record_types: false,
        }
    }
}

/// Object store configuration
///
/// `Debug` never shows the WAPI password.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreConfig {
    /// Appliance REST API (WAPI)
    Wapi {
        /// Base URL, e.g. `https://10.0.0.1/wapi/v1.4/`
        url: String,
        /// API user
        username: String,
        /// API password
        password: String,
        /// Verify the appliance TLS certificate
        #[serde(default = "default_sslverify")]
        sslverify: bool,
        /// Per-request timeout in seconds
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },

    /// In-memory store (not persistent, for tests and dry runs)
    #[default]
    Memory,
}

impl StoreConfig {
    /// Validate the store configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            StoreConfig::Wapi {
                url,
                username,
                password,
                timeout_secs,
                ..
            } => {
                if url.is_empty() || username.is_empty() || password.is_empty() {
                    return Err(crate::Error::misconfigured(
                        "wapi url, username and password must be defined",
                    ));
                }
                if *timeout_secs == 0 {
                    return Err(crate::Error::config("WAPI timeout must be > 0"));
                }
                Ok(())
            }
            StoreConfig::Memory => Ok(()),
        }
    }

    /// Get the store type name
    pub fn type_name(&self) -> &str {
        match self {
            StoreConfig::Wapi { .. } => "wapi",
            StoreConfig::Memory => "memory",
        }
    }
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreConfig::Wapi {
                url,
                username,
                sslverify,
                timeout_secs,
                ..
            } => f
                .debug_struct("Wapi")
                .field("url", url)
                .field("username", username)
                .field("password", &"<REDACTED>")
                .field("sslverify", sslverify)
                .field("timeout_secs", timeout_secs)
                .finish(),
            StoreConfig::Memory => f.write_str("Memory"),
        }
    }
}

fn default_dns_view() -> String {
    "default".to_string()
}

fn default_sslverify() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    30
}
