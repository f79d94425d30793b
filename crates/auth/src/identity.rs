//! Caller identity from a raw `Authorization` header value.

use std::sync::Arc;

use crate::{AuthError, RejectReason, TokenCodec, TokenError};

/// Split `"<scheme> <token>"` and return the token part.
///
/// The scheme name is not checked. Exactly two whitespace-separated parts are
/// required.
pub fn split_authorization(raw: &str) -> Result<&str, RejectReason> {
    let mut parts = raw.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(_scheme), Some(token), None) => Ok(token),
        (None, _, _) => Err(RejectReason::MissingCredential),
        _ => Err(RejectReason::MalformedHeader),
    }
}

/// Re-derives the calling principal from the request header.
///
/// Handlers call this on their own rather than trusting request-scoped state,
/// so it must decode exactly like the session verifier: it borrows the same
/// [`TokenCodec`].
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    codec: Arc<TokenCodec>,
}

impl IdentityResolver {
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self { codec }
    }

    /// Resolve the principal username asserted by `raw_header`.
    pub fn resolve(&self, raw_header: &str) -> Result<String, AuthError> {
        let token = split_authorization(raw_header).map_err(AuthError::Unauthenticated)?;

        let credential = self.codec.decode(token).map_err(|e| match e {
            TokenError::MalformedClaims(msg) => AuthError::MalformedClaims(msg),
            other => AuthError::unauthenticated(other),
        })?;

        if credential.principal.trim().is_empty() {
            return Err(AuthError::MalformedClaims(
                "principal claim is empty".to_string(),
            ));
        }

        Ok(credential.principal)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use jsonwebtoken::{Algorithm, EncodingKey, Header};

    use super::*;

    const SECRET: &str = "resolver-secret";

    fn resolver() -> (Arc<TokenCodec>, IdentityResolver) {
        let codec = Arc::new(TokenCodec::new(SECRET).unwrap());
        (codec.clone(), IdentityResolver::new(codec))
    }

    fn signed(payload: serde_json::Value) -> String {
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &payload,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn split_takes_second_part_regardless_of_scheme() {
        assert_eq!(split_authorization("Bearer abc"), Ok("abc"));
        assert_eq!(split_authorization("Token   abc "), Ok("abc"));
        assert_eq!(split_authorization(""), Err(RejectReason::MissingCredential));
        assert_eq!(split_authorization("   "), Err(RejectReason::MissingCredential));
        assert_eq!(split_authorization("abc"), Err(RejectReason::MalformedHeader));
        assert_eq!(split_authorization("a b c"), Err(RejectReason::MalformedHeader));
    }

    #[test]
    fn resolves_principal_from_bearer_header() {
        let (codec, resolver) = resolver();
        let token = codec.issue("alice", Utc::now()).unwrap();

        assert_eq!(resolver.resolve(&format!("Bearer {token}")).unwrap(), "alice");
    }

    #[test]
    fn tampered_token_is_unauthenticated() {
        let (codec, resolver) = resolver();
        let token = codec.issue("alice", Utc::now()).unwrap();
        let other = codec.issue("mallory", Utc::now()).unwrap();

        let parts: Vec<&str> = token.split('.').collect();
        let forged_payload = other.split('.').nth(1).unwrap();
        let tampered = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

        let err = resolver.resolve(&format!("Bearer {tampered}")).unwrap_err();
        assert_eq!(
            err,
            AuthError::Unauthenticated(RejectReason::InvalidToken(TokenError::BadSignature))
        );
    }

    #[test]
    fn foreign_secret_is_unauthenticated() {
        let (_, resolver) = resolver();
        let foreign = TokenCodec::new("someone-else").unwrap();
        let token = foreign.issue("alice", Utc::now()).unwrap();

        assert!(matches!(
            resolver.resolve(&format!("Bearer {token}")),
            Err(AuthError::Unauthenticated(_))
        ));
    }

    #[test]
    fn missing_or_mistyped_principal_is_malformed_claims() {
        let (_, resolver) = resolver();
        let exp = (Utc::now() + Duration::minutes(5)).timestamp();

        let missing = signed(serde_json::json!({ "authorized": true, "iat": 1, "exp": exp }));
        assert!(matches!(
            resolver.resolve(&format!("Bearer {missing}")),
            Err(AuthError::MalformedClaims(_))
        ));

        let numeric = signed(serde_json::json!({
            "principal": 42, "authorized": true, "iat": 1, "exp": exp
        }));
        assert!(matches!(
            resolver.resolve(&format!("Bearer {numeric}")),
            Err(AuthError::MalformedClaims(_))
        ));

        let blank = signed(serde_json::json!({
            "principal": "  ", "authorized": true, "iat": 1, "exp": exp
        }));
        assert!(matches!(
            resolver.resolve(&format!("Bearer {blank}")),
            Err(AuthError::MalformedClaims(_))
        ));
    }

    #[test]
    fn bare_token_without_scheme_is_rejected() {
        let (codec, resolver) = resolver();
        let token = codec.issue("alice", Utc::now()).unwrap();

        assert_eq!(
            resolver.resolve(&token),
            Err(AuthError::Unauthenticated(RejectReason::MalformedHeader))
        );
    }
}
