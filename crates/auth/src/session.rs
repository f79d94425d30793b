//! Session gate: admit, renew or reject a request's credential.
//!
//! Transport-agnostic. The HTTP layer hands in the raw header value and the
//! current time, then acts on the returned [`Admission`].

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{AuthError, Credential, RejectReason, TokenCodec, split_authorization};

/// Outcome of a successful verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admission {
    /// Claims of the credential the request arrived with.
    pub credential: Credential,

    /// Replacement credential for the client's *next* request, present only
    /// when the current one is inside the renewal window.
    pub renewed: Option<String>,
}

impl Admission {
    pub fn principal(&self) -> &str {
        &self.credential.principal
    }
}

#[derive(Debug, Clone)]
pub struct SessionVerifier {
    codec: Arc<TokenCodec>,
}

impl SessionVerifier {
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self { codec }
    }

    /// Verify the `Authorization` header value of an incoming request.
    ///
    /// - missing / empty header, undecodable credential, expired credential:
    ///   `Unauthenticated`, the request must not reach its handler
    /// - less than the renewal window left: admitted, with a fresh credential
    ///   issued for the same principal
    pub fn verify(
        &self,
        authorization: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Admission, AuthError> {
        let raw = authorization
            .filter(|h| !h.trim().is_empty())
            .ok_or(AuthError::Unauthenticated(RejectReason::MissingCredential))?;

        let token = split_authorization(raw).map_err(AuthError::Unauthenticated)?;
        let credential = self.codec.decode(token).map_err(AuthError::unauthenticated)?;

        if !credential.authorized {
            return Err(AuthError::Unauthenticated(RejectReason::NotAuthorized));
        }
        if credential.is_expired(now) {
            return Err(AuthError::Unauthenticated(RejectReason::Expired(
                credential.expires_at,
            )));
        }

        let renewed = if credential.needs_renewal(now) {
            // Courtesy refresh: failing to sign one must not fail a request
            // whose credential is still valid.
            match self.codec.issue(&credential.principal, now) {
                Ok(token) => {
                    tracing::debug!(principal = %credential.principal, "session credential renewed");
                    Some(token)
                }
                Err(e) => {
                    tracing::warn!(principal = %credential.principal, error = %e, "credential renewal failed");
                    None
                }
            }
        } else {
            None
        };

        Ok(Admission {
            credential,
            renewed,
        })
    }
}
