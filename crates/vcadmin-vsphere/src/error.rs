//! Error types for the vCenter inventory administration crate.

use std::fmt;

/// Categorised error kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VmwareErrorKind {
    /// vCenter unreachable, or no active session
    ConnectionError,
    /// Authentication failed (401, `InvalidLogin`, host credential rejection)
    AuthenticationError,
    /// Name does not resolve to a live object (404, `ManagedObjectNotFound`)
    NotFound,
    /// Creation target already exists (`DuplicateName`)
    NameCollision,
    /// Object is already managed elsewhere (`AlreadyConnected`, `AlreadyBeingManaged`)
    Conflict,
    /// Mutation blocked by existing dependents (`ResourceInUse`, `InvalidState`)
    PreconditionFailed,
    /// A multi-step operation failed after earlier steps changed remote state
    PartialFailure,
    /// Rejected locally before any remote call
    InvalidArgument,
    /// A name expected to resolve to one object resolved to several
    Ambiguous,
    /// Host certificate not trusted; carries the thumbprint vCenter reported
    CertificateError(Option<String>),
    /// Permission denied (403, `NoPermission`)
    AccessDenied,
    /// HTTP / API error with status code
    ApiError(u16),
    /// Task failed on vCenter
    TaskError,
    /// Timeout
    Timeout,
    /// JSON parse / deserialization error
    ParseError,
    /// Generic
    Other,
}

/// Crate error type carrying a kind + human-readable message.
#[derive(Debug, Clone)]
pub struct VmwareError {
    pub kind: VmwareErrorKind,
    pub message: String,
    pub source: Option<Box<VmwareError>>,
}

impl VmwareError {
    pub fn new(kind: VmwareErrorKind, msg: impl Into<String>) -> Self {
        Self {
            kind,
            message: msg.into(),
            source: None,
        }
    }

    pub fn connection(msg: impl Into<String>) -> Self {
        Self::new(VmwareErrorKind::ConnectionError, msg)
    }

    pub fn auth(msg: impl Into<String>) -> Self {
        Self::new(VmwareErrorKind::AuthenticationError, msg)
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(VmwareErrorKind::NotFound, msg)
    }

    pub fn name_collision(msg: impl Into<String>) -> Self {
        Self::new(VmwareErrorKind::NameCollision, msg)
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::new(VmwareErrorKind::Conflict, msg)
    }

    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::new(VmwareErrorKind::PreconditionFailed, msg)
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::new(VmwareErrorKind::InvalidArgument, msg)
    }

    pub fn ambiguous(msg: impl Into<String>) -> Self {
        Self::new(VmwareErrorKind::Ambiguous, msg)
    }

    pub fn api(status: u16, msg: impl Into<String>) -> Self {
        Self::new(VmwareErrorKind::ApiError(status), msg)
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::new(VmwareErrorKind::ParseError, msg)
    }

    pub fn task(msg: impl Into<String>) -> Self {
        Self::new(VmwareErrorKind::TaskError, msg)
    }

    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::new(VmwareErrorKind::Timeout, msg)
    }

    /// Wrap `cause` as the failure of a later step in a multi-step operation.
    pub fn partial(msg: impl Into<String>, cause: VmwareError) -> Self {
        Self {
            kind: VmwareErrorKind::PartialFailure,
            message: msg.into(),
            source: Some(Box::new(cause)),
        }
    }

    /// Whether this error has the given kind.
    pub fn is(&self, kind: &VmwareErrorKind) -> bool {
        &self.kind == kind
    }
}

impl fmt::Display for VmwareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.kind, self.message)?;
        if let Some(ref cause) = self.source {
            write!(f, ": {cause}")?;
        }
        Ok(())
    }
}

impl std::error::Error for VmwareError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl From<VmwareError> for String {
    fn from(e: VmwareError) -> String {
        e.to_string()
    }
}

impl From<reqwest::Error> for VmwareError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::timeout(format!("HTTP timeout: {e}"))
        } else if e.is_connect() {
            Self::connection(format!("Connection failed: {e}"))
        } else {
            Self::new(VmwareErrorKind::Other, format!("HTTP error: {e}"))
        }
    }
}

impl From<serde_json::Error> for VmwareError {
    fn from(e: serde_json::Error) -> Self {
        Self::parse(format!("JSON parse error: {e}"))
    }
}

/// Convenience alias.
pub type VmwareResult<T> = Result<T, VmwareError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn display_includes_kind_and_message() {
        let e = VmwareError::not_found("cluster 'Missing' not found");
        assert_eq!(e.to_string(), "[NotFound] cluster 'Missing' not found");
    }

    #[test]
    fn partial_failure_keeps_cause() {
        let cause = VmwareError::name_collision("port group 'PG1' already exists");
        let e = VmwareError::partial("switch 'VDS1' was created", cause);
        assert!(e.is(&VmwareErrorKind::PartialFailure));
        let src = e.source().expect("cause");
        assert!(src.to_string().contains("PG1"));
        assert!(e.to_string().contains("[NameCollision]"));
    }

    #[test]
    fn json_errors_become_parse_errors() {
        let err = serde_json::from_str::<u32>("nope").unwrap_err();
        let e: VmwareError = err.into();
        assert_eq!(e.kind, VmwareErrorKind::ParseError);
    }
}
