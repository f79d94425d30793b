//! Signed session credentials (compact JWS / JWT, HMAC family).

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::{AuthError, Credential, TokenError};

/// Algorithms accepted on decode. Anything outside the HMAC family is refused
/// before the signature is looked at.
pub const ACCEPTED_ALGORITHMS: [Algorithm; 3] =
    [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Issues and decodes session credentials with one symmetric secret.
///
/// The secret is handed in once at startup; the codec never reads process
/// configuration itself. Both the session verifier and the identity resolver
/// share one instance so they cannot disagree on what a valid credential is.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl core::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenCodec").finish_non_exhaustive()
    }
}

impl TokenCodec {
    /// Build a codec from the signing secret.
    ///
    /// An empty secret is a configuration fault. Secret strength is not checked.
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self, AuthError> {
        let secret = secret.as_ref();
        if secret.is_empty() {
            return Err(AuthError::ConfigurationFault(
                "signing secret is empty".to_string(),
            ));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
        // Expiry belongs to the session verifier, which needs to tell
        // "expired" apart from "about to expire".
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        })
    }

    /// Issue a credential for `principal`, valid for the standard TTL from `now`.
    pub fn issue(&self, principal: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        self.encode(&Credential::new(principal, now))
    }

    pub fn encode(&self, credential: &Credential) -> Result<String, TokenError> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), credential, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Decode and verify a serialized credential.
    ///
    /// Checks structure, algorithm and signature. Does **not** check expiry.
    pub fn decode(&self, token: &str) -> Result<Credential, TokenError> {
        let header = match jsonwebtoken::decode_header(token) {
            Ok(header) => header,
            Err(e) => {
                // `alg: none` and friends never parse into a `Header`; still
                // report them as an algorithm problem rather than garbage.
                if let Some(alg) = asserted_algorithm(token) {
                    if !alg.starts_with("HS") {
                        return Err(TokenError::UnsupportedAlgorithm(alg));
                    }
                }
                return Err(TokenError::MalformedCredential(e.to_string()));
            }
        };

        if !ACCEPTED_ALGORITHMS.contains(&header.alg) {
            return Err(TokenError::UnsupportedAlgorithm(format!("{:?}", header.alg)));
        }

        jsonwebtoken::decode::<Credential>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(classify)
    }
}

/// Map a library error to the codec taxonomy. Only called once the header has
/// parsed, so a JSON failure here is always about the claims payload.
fn classify(err: jsonwebtoken::errors::Error) -> TokenError {
    match err.kind() {
        ErrorKind::InvalidSignature => TokenError::BadSignature,
        ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
            TokenError::UnsupportedAlgorithm(err.to_string())
        }
        ErrorKind::Json(e) => TokenError::MalformedClaims(e.to_string()),
        ErrorKind::MissingRequiredClaim(claim) => {
            TokenError::MalformedClaims(format!("missing claim '{claim}'"))
        }
        _ => TokenError::MalformedCredential(err.to_string()),
    }
}

/// Best-effort read of the raw `alg` field from the header segment.
fn asserted_algorithm(token: &str) -> Option<String> {
    let segment = token.split('.').next()?;
    let bytes = URL_SAFE_NO_PAD.decode(segment).ok()?;
    let header: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    header.get("alg")?.as_str().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn codec(secret: &str) -> TokenCodec {
        TokenCodec::new(secret).unwrap()
    }

    fn b64(json: &str) -> String {
        URL_SAFE_NO_PAD.encode(json.as_bytes())
    }

    #[test]
    fn empty_secret_is_a_configuration_fault() {
        let err = TokenCodec::new("").unwrap_err();
        assert!(matches!(err, AuthError::ConfigurationFault(_)));
    }

    #[test]
    fn issue_then_decode_returns_the_principal() {
        let codec = codec("test-secret");
        let now = Utc::now();

        let token = codec.issue("alice", now).unwrap();
        let credential = codec.decode(&token).unwrap();

        assert_eq!(credential.principal, "alice");
        assert!(credential.authorized);
        // Seconds precision on the wire.
        let drift = (credential.expires_at - (now + Duration::minutes(15))).num_milliseconds();
        assert!((-1000..=0).contains(&drift), "drift was {drift}ms");
    }

    #[test]
    fn decode_does_not_enforce_expiry() {
        let codec = codec("test-secret");
        let long_ago = Utc::now() - Duration::hours(3);

        let token = codec.issue("alice", long_ago).unwrap();
        let credential = codec.decode(&token).unwrap();
        assert!(credential.is_expired(Utc::now()));
    }

    #[test]
    fn different_secret_is_bad_signature() {
        let token = codec("secret-a").issue("alice", Utc::now()).unwrap();
        assert_eq!(codec("secret-b").decode(&token), Err(TokenError::BadSignature));
    }

    #[test]
    fn swapped_payload_is_bad_signature() {
        let codec = codec("test-secret");
        let now = Utc::now();
        let alice = codec.issue("alice", now).unwrap();
        let mallory = codec.issue("mallory", now).unwrap();

        let a: Vec<&str> = alice.split('.').collect();
        let m: Vec<&str> = mallory.split('.').collect();
        let forged = format!("{}.{}.{}", a[0], m[1], a[2]);

        assert_eq!(codec.decode(&forged), Err(TokenError::BadSignature));
    }

    #[test]
    fn garbage_is_malformed() {
        let codec = codec("test-secret");
        for token in ["", "not-a-token", "a.b", "a.b.c.d", "!!!.???.###"] {
            assert!(
                matches!(codec.decode(token), Err(TokenError::MalformedCredential(_))),
                "token {token:?}"
            );
        }
    }

    #[test]
    fn non_hmac_algorithm_is_refused() {
        let codec = codec("test-secret");
        let payload = b64(r#"{"principal":"alice","authorized":true,"iat":1,"exp":9999999999}"#);

        let rs256 = format!("{}.{}.c2ln", b64(r#"{"alg":"RS256","typ":"JWT"}"#), payload);
        assert!(matches!(
            codec.decode(&rs256),
            Err(TokenError::UnsupportedAlgorithm(_))
        ));

        let none = format!("{}.{}.", b64(r#"{"alg":"none","typ":"JWT"}"#), payload);
        assert_eq!(
            codec.decode(&none),
            Err(TokenError::UnsupportedAlgorithm("none".to_string()))
        );
    }

    #[test]
    fn other_hmac_variants_verify() {
        let secret = "test-secret";
        let claims = Credential::new("alice", Utc::now());
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap();

        assert_eq!(codec(secret).decode(&token).unwrap().principal, "alice");
    }

    #[test]
    fn signed_but_wrong_shape_is_malformed_claims() {
        let secret = "test-secret";
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &serde_json::json!({ "username": "alice", "authorized": true, "exp": 9_999_999_999i64 }),
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            codec(secret).decode(&token),
            Err(TokenError::MalformedClaims(_))
        ));
    }

    #[test]
    fn debug_output_hides_key_material() {
        let rendered = format!("{:?}", codec("super-secret-value"));
        assert!(!rendered.contains("super-secret-value"));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 64,
                ..ProptestConfig::default()
            })]

            /// Property: decode(issue(P)) yields P with a 15 minute expiry.
            #[test]
            fn round_trip_preserves_principal(
                principal in "[A-Za-z0-9_.@-]{1,40}",
                offset in 0i64..1_000_000_000,
            ) {
                let codec = TokenCodec::new("prop-secret").unwrap();
                let now = DateTime::from_timestamp(offset, 0).unwrap();

                let token = codec.issue(&principal, now).unwrap();
                let credential = codec.decode(&token).unwrap();

                prop_assert_eq!(credential.principal, principal);
                prop_assert_eq!(credential.expires_at, now + Duration::minutes(15));
            }

            /// Property: a credential never verifies under another secret.
            #[test]
            fn foreign_secret_never_verifies(
                a in "[a-z0-9]{1,32}",
                b in "[a-z0-9]{1,32}",
            ) {
                prop_assume!(a != b);
                let token = TokenCodec::new(&a).unwrap().issue("alice", Utc::now()).unwrap();
                prop_assert_eq!(
                    TokenCodec::new(&b).unwrap().decode(&token),
                    Err(TokenError::BadSignature)
                );
            }
        }
    }
}
