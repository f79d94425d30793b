//! Authentication / authorization error model.

use chrono::{DateTime, Utc};
use thiserror::Error;

use blog_core::UserId;

/// Failure to decode or issue a serialized credential.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed credential: {0}")]
    MalformedCredential(String),

    #[error("unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("credential signature does not verify")]
    BadSignature,

    #[error("malformed claims: {0}")]
    MalformedClaims(String),

    #[error("failed to sign credential: {0}")]
    Signing(String),
}

/// Why a request was refused as unauthenticated.
///
/// Kept for operator logs only; clients see a uniform rejection.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RejectReason {
    #[error("no authorization header")]
    MissingCredential,

    #[error("authorization header is not of the form '<scheme> <token>'")]
    MalformedHeader,

    #[error("{0}")]
    InvalidToken(#[from] TokenError),

    #[error("credential does not assert an authorized session")]
    NotAuthorized,

    #[error("credential expired at {0}")]
    Expired(DateTime<Utc>),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No, invalid or expired credential.
    #[error("unauthenticated: {0}")]
    Unauthenticated(RejectReason),

    /// Signature verified, payload unusable.
    #[error("malformed claims: {0}")]
    MalformedClaims(String),

    /// Valid identity, but not the owner of the resource.
    #[error("permission denied: {caller} does not own {resource}")]
    PermissionDenied { resource: String, caller: UserId },

    /// The resource (or principal) does not exist.
    #[error("{resource} not found")]
    NotFound { resource: String },

    /// Missing signing secret. Fatal at startup.
    #[error("configuration fault: {0}")]
    ConfigurationFault(String),
}

impl AuthError {
    pub fn unauthenticated(reason: impl Into<RejectReason>) -> Self {
        Self::Unauthenticated(reason.into())
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }
}
