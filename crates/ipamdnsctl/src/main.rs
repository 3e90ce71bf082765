// # ipamdnsctl - IPAM DNS backend driver
//
// Thin command-line layer over ipamdns-core. It reads configuration from the
// environment, builds the object store and the backend, and runs exactly one
// lifecycle command. No DNS or vendor logic lives here.
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// ### Object Store
// - `IPAM_STORE_TYPE`: Store type (wapi, memory)
// - `IPAM_WAPI_URL`: Appliance API base URL (for wapi)
// - `IPAM_WAPI_USERNAME`: API user (for wapi)
// - `IPAM_WAPI_PASSWORD`: API password (for wapi)
// - `IPAM_WAPI_SSLVERIFY`: Verify the TLS certificate (default true)
// - `IPAM_WAPI_TIMEOUT_SECS`: Per-request timeout (default 30)
// - `IPAM_MODE`: `dry-run` to log mutations instead of sending them
//
// ### Backend
// - `IPAM_MULTI_TENANT`: One network view + DNS view per tenant (default false)
// - `IPAM_DNS_VIEW`: Shared DNS view when not multi-tenant (default "default")
// - `IPAM_STRICT_RECORD_TYPES`: Fail on unsupported record types (default false)
// - `IPAM_TENANT`: Tenant of the request context (default "default")
// - `IPAM_LOG_LEVEL`: trace, debug, info, warn, error (default info)
//
// ## Example
//
// ```bash
// export IPAM_STORE_TYPE=wapi
// export IPAM_WAPI_URL=https://10.0.0.1/wapi/v1.4/
// export IPAM_WAPI_USERNAME=admin
// export IPAM_WAPI_PASSWORD=infoblox
// export IPAM_MULTI_TENANT=true
// export IPAM_TENANT=tenant-a
//
// ipamdnsctl create-domain example.com.
// ipamdnsctl create-record rs-1 r-1 A www.example.com. 10.0.0.1 3600
// ipamdnsctl update-recordset rs-1 A www.example.com. 600 r-1
// ```

use anyhow::{Context as _, Result};
use ipamdns_core::{
    BackendConfig, Context, DnsBackend, Domain, IpamBackend, IpamConfig, Record, RecordSet,
    Server, StoreConfig, StoreRegistry, TsigKey,
};
use std::env;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

const USAGE: &str = "\
Usage: ipamdnsctl <command> [args...]

Commands:
  ping
  create-domain <name>
  update-domain <name>
  delete-domain <name>
  create-server <name>
  update-server <name>
  delete-server <name>
  create-record <recordset-id> <record-id> <type> <name> <data> [ttl]
  update-record <recordset-id> <record-id> <type> <name> <data> [ttl]
  update-recordset <recordset-id> <type> <name> <ttl> <record-id>...
  delete-record <recordset-id> <record-id> <type> <name>
  create-tsigkey <name> <algorithm> <secret>
  update-tsigkey <name> <algorithm> <secret>
  delete-tsigkey <name>
  teardown-tenant";

/// Exit codes for different termination scenarios
///
/// - 0: Command succeeded
/// - 1: Configuration or usage error
/// - 2: Command failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IpamExitCode {
    /// Command completed
    Success = 0,
    /// Configuration error or invalid command line
    ConfigError = 1,
    /// The backend operation failed
    RuntimeError = 2,
}

impl From<IpamExitCode> for ExitCode {
    fn from(code: IpamExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
#[derive(Debug)]
struct Config {
    ipam: IpamConfig,
    tenant: String,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        let store = match env::var("IPAM_STORE_TYPE")
            .unwrap_or_else(|_| "wapi".to_string())
            .as_str()
        {
            "wapi" => StoreConfig::Wapi {
                url: env::var("IPAM_WAPI_URL").unwrap_or_default(),
                username: env::var("IPAM_WAPI_USERNAME").unwrap_or_default(),
                password: env::var("IPAM_WAPI_PASSWORD").unwrap_or_default(),
                sslverify: env_flag("IPAM_WAPI_SSLVERIFY", true)?,
                timeout_secs: match env::var("IPAM_WAPI_TIMEOUT_SECS") {
                    Ok(value) => value
                        .parse()
                        .with_context(|| format!("IPAM_WAPI_TIMEOUT_SECS is not a number: {}", value))?,
                    Err(_) => 30,
                },
            },
            "memory" => StoreConfig::Memory,
            other => anyhow::bail!(
                "IPAM_STORE_TYPE '{}' is not supported. \
                Supported types: wapi, memory",
                other
            ),
        };

        let mut backend = BackendConfig::default()
            .with_multi_tenant(env_flag("IPAM_MULTI_TENANT", false)?)
            .with_strict_record_types(env_flag("IPAM_STRICT_RECORD_TYPES", false)?);
        if let Ok(view) = env::var("IPAM_DNS_VIEW") {
            backend = backend.with_dns_view(view);
        }

        Ok(Self {
            ipam: IpamConfig { backend, store },
            tenant: env::var("IPAM_TENANT").unwrap_or_else(|_| "default".to_string()),
            log_level: env::var("IPAM_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        self.ipam.validate()?;

        if self.tenant.is_empty() {
            anyhow::bail!("IPAM_TENANT cannot be empty");
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "IPAM_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }
}

/// Read a boolean environment variable
fn env_flag(name: &str, default: bool) -> Result<bool> {
    match env::var(name) {
        Ok(value) => parse_flag(&value)
            .with_context(|| format!("{} must be true or false. Got: {}", name, value)),
        Err(_) => Ok(default),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// One lifecycle command
#[derive(Debug, PartialEq)]
enum Command {
    Ping,
    CreateDomain(Domain),
    UpdateDomain(Domain),
    DeleteDomain(Domain),
    CreateServer(Server),
    UpdateServer(Server),
    DeleteServer(Server),
    CreateRecord(RecordSet, Record),
    UpdateRecord(RecordSet, Record),
    UpdateRecordSet(RecordSet),
    DeleteRecord(RecordSet, Record),
    CreateTsigKey(TsigKey),
    UpdateTsigKey(TsigKey),
    DeleteTsigKey(TsigKey),
    TeardownTenant,
}

impl Command {
    /// Parse a command from its arguments (program name excluded)
    fn parse(args: &[String], tenant: &str) -> Result<Self> {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        let command = match args.as_slice() {
            ["ping"] => Command::Ping,
            ["create-domain", name] => Command::CreateDomain(domain(name, tenant)),
            ["update-domain", name] => Command::UpdateDomain(domain(name, tenant)),
            ["delete-domain", name] => Command::DeleteDomain(domain(name, tenant)),
            ["create-server", name] => Command::CreateServer(server(name)),
            ["update-server", name] => Command::UpdateServer(server(name)),
            ["delete-server", name] => Command::DeleteServer(server(name)),
            ["create-record", rest @ ..] => {
                let (recordset, record) = record(rest)?;
                Command::CreateRecord(recordset, record)
            }
            ["update-record", rest @ ..] => {
                let (recordset, record) = record(rest)?;
                Command::UpdateRecord(recordset, record)
            }
            ["update-recordset", recordset_id, record_type, name, ttl, record_ids @ ..]
                if !record_ids.is_empty() =>
            {
                let recordset = record_ids.iter().fold(
                    recordset_of(recordset_id, name, record_type, Some(*ttl))?,
                    |recordset, id| recordset.with_record(Record::new(*id, "")),
                );
                Command::UpdateRecordSet(recordset)
            }
            ["delete-record", recordset_id, record_id, record_type, name] => {
                // Deletes are correlated by ids only
                let record = Record::new(*record_id, "");
                let recordset =
                    recordset_of(recordset_id, name, record_type, None)?.with_record(record.clone());
                Command::DeleteRecord(recordset, record)
            }
            ["create-tsigkey", name, algorithm, secret] => {
                Command::CreateTsigKey(tsigkey(name, algorithm, secret))
            }
            ["update-tsigkey", name, algorithm, secret] => {
                Command::UpdateTsigKey(tsigkey(name, algorithm, secret))
            }
            ["delete-tsigkey", name] => Command::DeleteTsigKey(tsigkey(name, "", "")),
            ["teardown-tenant"] => Command::TeardownTenant,
            _ => anyhow::bail!("Invalid command line\n\n{}", USAGE),
        };
        Ok(command)
    }
}

fn domain(name: &str, tenant: &str) -> Domain {
    Domain {
        id: name.to_string(),
        name: name.to_string(),
        tenant_id: tenant.to_string(),
    }
}

fn server(name: &str) -> Server {
    Server {
        name: name.to_string(),
    }
}

fn tsigkey(name: &str, algorithm: &str, secret: &str) -> TsigKey {
    TsigKey {
        name: name.to_string(),
        algorithm: algorithm.to_string(),
        secret: secret.as_bytes().to_vec(),
    }
}

/// `<recordset-id> <record-id> <type> <name> <data> [ttl]`
fn record(args: &[&str]) -> Result<(RecordSet, Record)> {
    let (recordset_id, record_id, record_type, name, data, ttl) = match args {
        [rs, r, t, n, d] => (rs, r, t, n, d, None),
        [rs, r, t, n, d, ttl] => (rs, r, t, n, d, Some(*ttl)),
        _ => anyhow::bail!("Invalid record arguments\n\n{}", USAGE),
    };

    let record = Record::new(*record_id, *data);
    let recordset = recordset_of(recordset_id, name, record_type, ttl)?.with_record(record.clone());
    Ok((recordset, record))
}

fn recordset_of(id: &str, name: &str, record_type: &str, ttl: Option<&str>) -> Result<RecordSet> {
    let recordset = RecordSet::new(id, name, record_type.to_uppercase());
    match ttl {
        Some(ttl) => {
            let ttl = ttl
                .parse()
                .with_context(|| format!("TTL must be a number. Got: {}", ttl))?;
            Ok(recordset.with_ttl(ttl))
        }
        None => Ok(recordset),
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return IpamExitCode::ConfigError.into();
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {:#}", e);
        return IpamExitCode::ConfigError.into();
    }

    let args: Vec<String> = env::args().skip(1).collect();
    let command = match Command::parse(&args, &config.tenant) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}", e);
            return IpamExitCode::ConfigError.into();
        }
    };

    // Initialize tracing
    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return IpamExitCode::ConfigError.into();
    }

    info!(
        "Using {} store, tenant {}",
        config.ipam.store.type_name(),
        config.tenant
    );

    let backend = match build_backend(&config.ipam) {
        Ok(backend) => backend,
        Err(e) => {
            error!("Failed to create object store: {:#}", e);
            return IpamExitCode::ConfigError.into();
        }
    };

    // One command, one sequential chain of requests
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return IpamExitCode::RuntimeError.into();
        }
    };

    let context = Context::new(config.tenant.clone());
    let result = rt.block_on(async {
        if let Err(e) = run_command(&backend, &context, command).await {
            error!("Command failed: {:#}", e);
            IpamExitCode::RuntimeError
        } else {
            IpamExitCode::Success
        }
    });

    result.into()
}

/// Build the store through the registry and wrap it in the backend
fn build_backend(config: &IpamConfig) -> Result<IpamBackend> {
    let registry = StoreRegistry::with_builtin();

    #[cfg(feature = "wapi")]
    ipamdns_wapi::register(&registry);

    let store = registry.create_store(&config.store)?;
    Ok(IpamBackend::new(store, config.backend.clone()))
}

/// Run one lifecycle command against the backend
async fn run_command(backend: &IpamBackend, context: &Context, command: Command) -> Result<()> {
    match command {
        Command::Ping => backend.ping(context).await?,
        Command::CreateDomain(domain) => backend.create_domain(context, &domain).await?,
        Command::UpdateDomain(domain) => backend.update_domain(context, &domain).await?,
        Command::DeleteDomain(domain) => backend.delete_domain(context, &domain).await?,
        Command::CreateServer(server) => backend.create_server(context, &server).await?,
        Command::UpdateServer(server) => backend.update_server(context, &server).await?,
        Command::DeleteServer(server) => backend.delete_server(context, &server).await?,
        Command::CreateRecord(recordset, record) => {
            let domain = record_domain(&recordset, context);
            backend
                .create_record(context, &domain, &recordset, &record)
                .await?
        }
        Command::UpdateRecord(recordset, record) => {
            let domain = record_domain(&recordset, context);
            backend
                .update_record(context, &domain, &recordset, &record)
                .await?
        }
        Command::UpdateRecordSet(recordset) => {
            let domain = record_domain(&recordset, context);
            backend.update_recordset(context, &domain, &recordset).await?
        }
        Command::DeleteRecord(recordset, record) => {
            let domain = record_domain(&recordset, context);
            backend
                .delete_record(context, &domain, &recordset, &record)
                .await?
        }
        Command::CreateTsigKey(key) => backend.create_tsigkey(context, &key).await?,
        Command::UpdateTsigKey(key) => backend.update_tsigkey(context, &key).await?,
        Command::DeleteTsigKey(key) => backend.delete_tsigkey(context, &key).await?,
        Command::TeardownTenant => backend.teardown_tenant(context).await?,
    }

    info!("Done");
    Ok(())
}

/// Records only carry their own name; the domain is informational
fn record_domain(recordset: &RecordSet, context: &Context) -> Domain {
    domain(&recordset.name, &context.tenant)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipamdns_core::MemoryObjectStore;
    use std::sync::Arc;

    fn args(line: &str) -> Vec<String> {
        line.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_parse_domain_commands() {
        let command = Command::parse(&args("create-domain example.com."), "tenant-a").unwrap();
        assert_eq!(
            command,
            Command::CreateDomain(Domain {
                id: "example.com.".to_string(),
                name: "example.com.".to_string(),
                tenant_id: "tenant-a".to_string(),
            })
        );
        assert_eq!(Command::parse(&args("ping"), "t").unwrap(), Command::Ping);
    }

    #[test]
    fn test_parse_record_with_ttl() {
        let command =
            Command::parse(&args("create-record rs-1 r-1 a www.example.com. 10.0.0.1 3600"), "t")
                .unwrap();
        let Command::CreateRecord(recordset, record) = command else {
            panic!("unexpected command: {:?}", command);
        };
        assert_eq!(recordset.record_type, "A");
        assert_eq!(recordset.ttl, Some(3600));
        assert_eq!(recordset.records, vec![record.clone()]);
        assert_eq!(record.id, "r-1");
        assert_eq!(record.data, "10.0.0.1");
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(Command::parse(&args(""), "t").is_err());
        assert!(Command::parse(&args("create-domain"), "t").is_err());
        assert!(Command::parse(&args("create-record rs-1 r-1 A www"), "t").is_err());
        assert!(Command::parse(&args("create-record rs-1 r-1 A www 10.0.0.1 soon"), "t").is_err());
        assert!(Command::parse(&args("update-recordset rs-1 A www 300"), "t").is_err());
        assert!(Command::parse(&args("delete-record rs-1 r-1 A www 10.0.0.1"), "t").is_err());
    }

    #[test]
    fn test_parse_recordset_update() {
        let command =
            Command::parse(&args("update-recordset rs-1 aaaa host.example.com. 600 r-1 r-2"), "t")
                .unwrap();
        let Command::UpdateRecordSet(recordset) = command else {
            panic!("unexpected command: {:?}", command);
        };
        assert_eq!(recordset.id, "rs-1");
        assert_eq!(recordset.record_type, "AAAA");
        assert_eq!(recordset.ttl, Some(600));
        let ids: Vec<&str> = recordset.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["r-1", "r-2"]);
    }

    #[test]
    fn test_parse_delete_record_without_data() {
        let command =
            Command::parse(&args("delete-record rs-1 r-1 A www.example.com."), "t").unwrap();
        let Command::DeleteRecord(recordset, record) = command else {
            panic!("unexpected command: {:?}", command);
        };
        assert_eq!(record.id, "r-1");
        assert_eq!(recordset.ttl, None);
        assert_eq!(recordset.records, vec![record]);
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let config = IpamConfig {
            backend: BackendConfig::default(),
            store: StoreConfig::Memory,
        };
        let backend = build_backend(&config).unwrap();
        let context = Context::new("t");

        let command = Command::parse(&args("create-domain example.com."), "t").unwrap();
        run_command(&backend, &context, command).await.unwrap();
        let command = Command::parse(&args("delete-domain example.com."), "t").unwrap();
        run_command(&backend, &context, command).await.unwrap();
    }

    #[tokio::test]
    async fn test_record_lifecycle_commands() {
        let store = MemoryObjectStore::new();
        let backend = IpamBackend::new(Arc::new(store.clone()), BackendConfig::default());
        let context = Context::new("t");

        for line in [
            "create-record rs-1 r-1 A www.example.com. 10.0.0.1",
            "update-recordset rs-1 A www.example.com. 600 r-1",
        ] {
            let command = Command::parse(&args(line), "t").unwrap();
            run_command(&backend, &context, command).await.unwrap();
        }

        let records = store.objects_of_type("record:a").await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["ipv4addr"], "10.0.0.1");
        assert_eq!(records[0]["ttl"], 600);

        let command =
            Command::parse(&args("delete-record rs-1 r-1 A www.example.com."), "t").unwrap();
        run_command(&backend, &context, command).await.unwrap();
        assert!(store.objects_of_type("record:a").await.is_empty());
    }
}
