// # WAPI Object Store
//
// This crate provides the `ObjectStore` implementation over the appliance's
// REST API (WAPI).
//
// ## Request mapping
//
// - query:    `GET    {base}/{obj_type}?field=value&..[&_return_fields=a,b]`
// - create:   `POST   {base}/{obj_type}[?_return_fields=a,b]` with a JSON body
// - update:   `PUT    {base}/{ref}` with a JSON body
// - delete:   `DELETE {base}/{ref}`
// - function: `POST   {base}/{ref}?_function={name}` with a JSON body
//
// Every request is a single round trip with basic authentication. There is no
// retry, no caching and no session reuse beyond reqwest's connection pool.
// Non-2xx responses become the vendor-store error of the operation, carrying
// the response body and status code.
//
// ## Security Requirements
//
// - The password NEVER appears in logs or `Debug` output
// - TLS verification is on unless `sslverify` is explicitly disabled

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ipamdns_core::config::StoreConfig;
use ipamdns_core::model::{Payload, VendorObject};
use ipamdns_core::registry::StoreRegistry;
use ipamdns_core::traits::{ObjectStore, ObjectStoreFactory};
use ipamdns_core::{Error, Result};
use reqwest::{Method, Url};
use serde_json::Value;

/// Store type name used in configuration and the registry
pub const STORE_NAME: &str = "wapi";

/// Environment variable selecting dry-run mode (`IPAM_MODE=dry-run`)
pub const MODE_ENV: &str = "IPAM_MODE";

/// Reference returned for mutations skipped in dry-run mode
const DRY_RUN_REF_SUFFIX: &str = "dry-run";

/// Appliance REST client
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the client will:
/// - Perform all GET requests (queries)
/// - Log the intended create/update/delete/function call
/// - **NOT** modify anything on the appliance
pub struct WapiClient {
    /// Base URL without trailing slash, e.g. `https://10.0.0.1/wapi/v1.4`
    base_url: String,

    username: String,

    /// ⚠️ NEVER log this value
    password: String,

    client: reqwest::Client,

    dry_run: bool,
}

impl std::fmt::Debug for WapiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WapiClient")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl WapiClient {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// - `Error::Misconfigured` if url, username or password is empty
    /// - `Error::Config` if the url cannot be parsed
    /// - `Error::Http` if the HTTP client cannot be built
    pub fn new(
        url: &str,
        username: impl Into<String>,
        password: impl Into<String>,
        sslverify: bool,
        timeout: Duration,
        dry_run: bool,
    ) -> Result<Self> {
        let username = username.into();
        let password = password.into();
        if url.is_empty() || username.is_empty() || password.is_empty() {
            return Err(Error::misconfigured(
                "wapi url, username and password must be defined",
            ));
        }

        let base_url = url.trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| Error::config(format!("Invalid wapi url: {}", e)))?;

        if !sslverify {
            tracing::warn!("TLS certificate verification is disabled for {}", base_url);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(!sslverify)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url,
            username,
            password,
            client,
            dry_run,
        })
    }

    /// Build a client from a `StoreConfig::Wapi` configuration
    pub fn from_config(config: &StoreConfig, dry_run: bool) -> Result<Self> {
        match config {
            StoreConfig::Wapi {
                url,
                username,
                password,
                sslverify,
                timeout_secs,
            } => Self::new(
                url,
                username.as_str(),
                password.as_str(),
                *sslverify,
                Duration::from_secs(*timeout_secs),
                dry_run,
            ),
            _ => Err(Error::config("Invalid config for wapi store")),
        }
    }

    /// Whether mutations are only logged
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Call a server-side function on the object behind `reference`
    ///
    /// # Errors
    ///
    /// - `Error::FunctionCall` on a non-2xx response
    /// - `Error::ObjectParsing` if the response is not JSON
    pub async fn call_function(
        &self,
        reference: &str,
        func_name: &str,
        payload: &Payload,
    ) -> Result<Value> {
        let url = self.object_url(
            reference,
            &[("_function".to_string(), func_name.to_string())],
        )?;

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would call function {} on {} with payload: {}",
                func_name,
                reference,
                serde_json::Value::Object(payload.clone())
            );
            return Ok(Value::Null);
        }

        let (code, body) = self.send(Method::POST, url, Some(payload)).await?;
        if !is_success(code) {
            return Err(Error::FunctionCall {
                func_name: func_name.to_string(),
                reference: reference.to_string(),
                content: body,
                code,
            });
        }
        parse_json(&body)
    }

    /// URL of `path` (an object type or reference) with query parameters
    fn object_url(&self, path: &str, params: &[(String, String)]) -> Result<Url> {
        let url = format!("{}/{}", self.base_url, path);
        let parsed = if params.is_empty() {
            Url::parse(&url)
        } else {
            Url::parse_with_params(&url, params.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        };
        parsed.map_err(|e| Error::config(format!("Invalid wapi url {}: {}", url, e)))
    }

    async fn send(&self, method: Method, url: Url, body: Option<&Payload>) -> Result<(u16, String)> {
        tracing::debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method, url)
            .basic_auth(&self.username, Some(&self.password))
            .header("Content-Type", "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(transport_error)?;
        let code = response.status().as_u16();
        let text = response.text().await.map_err(transport_error)?;

        tracing::debug!("Response {}: {}", code, text);
        Ok((code, text))
    }

    fn dry_run_ref(obj_type: &str) -> String {
        format!("{}/{}", obj_type, DRY_RUN_REF_SUFFIX)
    }
}

#[async_trait]
impl ObjectStore for WapiClient {
    async fn query(
        &self,
        obj_type: &str,
        payload: &Payload,
        return_fields: Option<&[&str]>,
    ) -> Result<Vec<VendorObject>> {
        let url = self.object_url(obj_type, &query_params(payload, return_fields))?;
        let (code, body) = self.send(Method::GET, url, None).await?;
        if !is_success(code) {
            return Err(Error::search(obj_type, body, code));
        }
        parse_objects(&body)
    }

    async fn create(
        &self,
        obj_type: &str,
        payload: &Payload,
        return_fields: Option<&[&str]>,
    ) -> Result<VendorObject> {
        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would create {} with payload: {}",
                obj_type,
                serde_json::Value::Object(payload.clone())
            );
            return Ok(VendorObject::from_ref(Self::dry_run_ref(obj_type)));
        }

        let url = self.object_url(obj_type, &query_params(&Payload::new(), return_fields))?;
        let (code, body) = self.send(Method::POST, url, Some(payload)).await?;
        if !is_success(code) {
            return Err(Error::cannot_create(obj_type, body, code));
        }
        parse_created(&body)
    }

    async fn update(&self, reference: &str, fields: &Payload) -> Result<String> {
        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would update {} with payload: {}",
                reference,
                serde_json::Value::Object(fields.clone())
            );
            return Ok(reference.to_string());
        }

        let url = self.object_url(reference, &[])?;
        let (code, body) = self.send(Method::PUT, url, Some(fields)).await?;
        if !is_success(code) {
            return Err(Error::cannot_update(reference, body, code));
        }
        parse_reference(&body)
    }

    async fn delete(&self, reference: &str) -> Result<String> {
        if self.dry_run {
            tracing::info!("[DRY-RUN] Would delete {}", reference);
            return Ok(reference.to_string());
        }

        let url = self.object_url(reference, &[])?;
        let (code, body) = self.send(Method::DELETE, url, None).await?;
        if !is_success(code) {
            return Err(Error::cannot_delete(reference, body, code));
        }
        parse_reference(&body)
    }

    fn store_name(&self) -> &'static str {
        STORE_NAME
    }
}

fn is_success(code: u16) -> bool {
    (200..300).contains(&code)
}

fn transport_error(err: reqwest::Error) -> Error {
    if err.is_timeout() || err.is_connect() {
        Error::service_unavailable(format!("Appliance unreachable: {}", err))
    } else {
        Error::http(format!("HTTP request failed: {}", err))
    }
}

/// Query-string parameters for a search
///
/// Strings are sent verbatim, other JSON values in their JSON form.
fn query_params(payload: &Payload, return_fields: Option<&[&str]>) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = payload
        .iter()
        .map(|(field, value)| {
            let value = match value {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            (field.clone(), value)
        })
        .collect();

    if let Some(fields) = return_fields {
        params.push(("_return_fields".to_string(), fields.join(",")));
    }
    params
}

fn parse_json(body: &str) -> Result<Value> {
    serde_json::from_str(body)
        .map_err(|e| Error::object_parsing(format!("Invalid JSON response ({}): {}", e, body)))
}

/// Split a returned object into its reference and remaining fields
fn into_vendor_object(value: Value) -> Result<VendorObject> {
    let Value::Object(mut fields) = value else {
        return Err(Error::object_parsing(format!(
            "Expected an object, got: {}",
            value
        )));
    };

    match fields.remove("_ref") {
        Some(Value::String(reference)) => Ok(VendorObject { reference, fields }),
        _ => Err(Error::object_parsing(format!(
            "Object without _ref: {}",
            Value::Object(fields)
        ))),
    }
}

/// Parse a search response: an array of objects carrying `_ref`
fn parse_objects(body: &str) -> Result<Vec<VendorObject>> {
    match parse_json(body)? {
        Value::Array(objects) => objects.into_iter().map(into_vendor_object).collect(),
        other => Err(Error::object_parsing(format!(
            "Expected an array of objects, got: {}",
            other
        ))),
    }
}

/// Parse a create response: a bare reference, or the object when return
/// fields were requested
fn parse_created(body: &str) -> Result<VendorObject> {
    match parse_json(body)? {
        Value::String(reference) => Ok(VendorObject::from_ref(reference)),
        object @ Value::Object(_) => into_vendor_object(object),
        other => Err(Error::object_parsing(format!(
            "Unexpected create response: {}",
            other
        ))),
    }
}

/// Parse an update/delete response: the affected object's reference
fn parse_reference(body: &str) -> Result<String> {
    match parse_json(body)? {
        Value::String(reference) => Ok(reference),
        other => Err(Error::object_parsing(format!(
            "Expected an object reference, got: {}",
            other
        ))),
    }
}

/// Factory for creating WAPI object stores
pub struct WapiStoreFactory;

impl ObjectStoreFactory for WapiStoreFactory {
    fn create(&self, config: &StoreConfig) -> Result<Arc<dyn ObjectStore>> {
        // Check for dry-run mode environment variable
        let dry_run = std::env::var(MODE_ENV)
            .unwrap_or_default()
            .eq_ignore_ascii_case("dry-run");

        if dry_run {
            tracing::warn!("WAPI store running in DRY-RUN mode - no changes will be made");
        }

        Ok(Arc::new(WapiClient::from_config(config, dry_run)?))
    }
}

/// Register the WAPI store with a registry
///
/// # Example
///
/// ```rust
/// use ipamdns_core::StoreRegistry;
///
/// let registry = StoreRegistry::with_builtin();
/// ipamdns_wapi::register(&registry);
/// assert!(registry.has_store("wapi"));
/// ```
pub fn register(registry: &StoreRegistry) {
    registry.register_store(STORE_NAME, Box::new(WapiStoreFactory));
}
