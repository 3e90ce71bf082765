//! Error types for the IPAM DNS backend
//!
//! Vendor-store failures carry the object type (or reference) they were
//! issued against together with the raw response content and status code.

use thiserror::Error;

/// Result type alias for backend operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the IPAM DNS backend
#[derive(Error, Debug)]
pub enum Error {
    /// The backend cannot serve the request right now
    #[error("The service is unavailable: {0}")]
    ServiceUnavailable(String),

    /// No capacity left to serve the request (e.g. no serving member)
    #[error("Resource exhausted: {0}")]
    ResourceExhausted(String),

    /// A query against the object store failed
    #[error("Cannot search '{objtype}' object(s): {content} [code {code}]")]
    SearchError {
        /// Vendor object type that was queried
        objtype: String,
        /// Raw response content
        content: String,
        /// Response status code
        code: u16,
    },

    /// The object store refused to create an object
    #[error("Cannot create '{objtype}' object(s): {content} [code {code}]")]
    CannotCreateObject {
        /// Vendor object type that was created
        objtype: String,
        /// Raw response content
        content: String,
        /// Response status code
        code: u16,
    },

    /// The object store refused to delete an object
    #[error("Cannot delete object with ref {reference}: {content} [code {code}]")]
    CannotDeleteObject {
        /// Opaque object reference
        reference: String,
        /// Raw response content
        content: String,
        /// Response status code
        code: u16,
    },

    /// The object store refused to update an object
    #[error("Cannot update object with ref {reference}: {content} [code {code}]")]
    CannotUpdateObject {
        /// Opaque object reference
        reference: String,
        /// Raw response content
        content: String,
        /// Response status code
        code: u16,
    },

    /// A server-side function call on an object failed
    #[error(
        "Error occurred during function's '{func_name}' call: ref {reference}: {content} [code {code}]"
    )]
    FunctionCall {
        /// Name of the invoked function
        func_name: String,
        /// Opaque object reference
        reference: String,
        /// Raw response content
        content: String,
        /// Response status code
        code: u16,
    },

    /// A vendor payload could not be interpreted
    #[error("Object cannot be parsed: {0}")]
    ObjectParsing(String),

    /// Required connection settings are missing
    #[error("IPAM is misconfigured: {0}")]
    Misconfigured(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Record type outside of the supported set
    #[error("Unknown record type: {0}")]
    UnknownRecordType(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Transport-level HTTP errors
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a service-unavailable error
    pub fn service_unavailable(msg: impl Into<String>) -> Self {
        Self::ServiceUnavailable(msg.into())
    }

    /// The error raised when no appliance member can serve a zone
    pub fn no_member_available() -> Self {
        Self::ResourceExhausted("No IPAM member is available".to_string())
    }

    /// Create a search error
    pub fn search(objtype: impl Into<String>, content: impl Into<String>, code: u16) -> Self {
        Self::SearchError {
            objtype: objtype.into(),
            content: content.into(),
            code,
        }
    }

    /// Create a cannot-create error
    pub fn cannot_create(objtype: impl Into<String>, content: impl Into<String>, code: u16) -> Self {
        Self::CannotCreateObject {
            objtype: objtype.into(),
            content: content.into(),
            code,
        }
    }

    /// Create a cannot-delete error
    pub fn cannot_delete(reference: impl Into<String>, content: impl Into<String>, code: u16) -> Self {
        Self::CannotDeleteObject {
            reference: reference.into(),
            content: content.into(),
            code,
        }
    }

    /// Create a cannot-update error
    pub fn cannot_update(reference: impl Into<String>, content: impl Into<String>, code: u16) -> Self {
        Self::CannotUpdateObject {
            reference: reference.into(),
            content: content.into(),
            code,
        }
    }

    /// Create an object parsing error
    pub fn object_parsing(msg: impl Into<String>) -> Self {
        Self::ObjectParsing(msg.into())
    }

    /// Create a misconfiguration error
    pub fn misconfigured(msg: impl Into<String>) -> Self {
        Self::Misconfigured(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// `true` for `ServiceUnavailable` and its `ResourceExhausted` specialization
    pub fn is_service_unavailable(&self) -> bool {
        matches!(self, Self::ServiceUnavailable(_) | Self::ResourceExhausted(_))
    }

    /// Vendor response content and code, for errors that carry them
    pub fn vendor_response(&self) -> Option<(&str, u16)> {
        match self {
            Self::SearchError { content, code, .. }
            | Self::CannotCreateObject { content, code, .. }
            | Self::CannotDeleteObject { content, code, .. }
            | Self::CannotUpdateObject { content, code, .. }
            | Self::FunctionCall { content, code, .. } => Some((content.as_str(), *code)),
            _ => None,
        }
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_exhausted_is_a_service_unavailable() {
        assert!(Error::no_member_available().is_service_unavailable());
        assert!(Error::service_unavailable("down").is_service_unavailable());
        assert!(!Error::config("x").is_service_unavailable());
    }

    #[test]
    fn vendor_errors_render_content_and_code() {
        let err = Error::cannot_create("record:a", "{\"Error\": \"dup\"}", 400);
        assert_eq!(
            err.to_string(),
            "Cannot create 'record:a' object(s): {\"Error\": \"dup\"} [code 400]"
        );
        assert_eq!(err.vendor_response(), Some(("{\"Error\": \"dup\"}", 400)));

        let err = Error::cannot_delete("zone_auth/ZG5z:example.com", "gone", 404);
        assert!(err.to_string().contains("ref zone_auth/ZG5z:example.com"));
        assert!(Error::misconfigured("no url").vendor_response().is_none());
    }
}
