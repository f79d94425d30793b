use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Lifetime of a freshly issued credential.
pub const TOKEN_TTL_SECS: i64 = 15 * 60;

/// A credential with less than this much lifetime left is renewed.
pub const RENEWAL_WINDOW_SECS: i64 = 60;

pub fn token_ttl() -> Duration {
    Duration::seconds(TOKEN_TTL_SECS)
}

pub fn renewal_window() -> Duration {
    Duration::seconds(RENEWAL_WINDOW_SECS)
}

/// Claims carried by a session credential.
///
/// Fixed shape: decoding rejects payloads with missing, mistyped or unknown
/// fields. Timestamps travel as whole seconds since the epoch (`iat` / `exp`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Credential {
    /// Username of the authenticated principal.
    pub principal: String,

    /// Always `true` for credentials minted by this service.
    pub authorized: bool,

    #[serde(rename = "iat", with = "chrono::serde::ts_seconds")]
    pub issued_at: DateTime<Utc>,

    #[serde(rename = "exp", with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,
}

impl Credential {
    /// Claims for a new session starting at `now`.
    pub fn new(principal: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            principal: principal.into(),
            authorized: true,
            issued_at: now,
            expires_at: now + token_ttl(),
        }
    }

    /// Lifetime left at `now`; zero or negative once expired.
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        self.expires_at - now
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.remaining(now) <= Duration::zero()
    }

    /// Still valid, but close enough to expiry that the client should get a
    /// replacement.
    pub fn needs_renewal(&self, now: DateTime<Utc>) -> bool {
        let remaining = self.remaining(now);
        remaining > Duration::zero() && remaining < renewal_window()
    }
}
