//! `blog-auth`: credential issuance, session verification and the ownership
//! policy for mutations.
//!
//! This crate is intentionally decoupled from HTTP and storage: it works on raw
//! header values, explicit clocks and ids handed in by the caller.

pub mod claims;
pub mod codec;
pub mod error;
pub mod identity;
pub mod ownership;
pub mod password;
pub mod session;

pub use claims::{Credential, RENEWAL_WINDOW_SECS, TOKEN_TTL_SECS, renewal_window, token_ttl};
pub use codec::{ACCEPTED_ALGORITHMS, TokenCodec};
pub use error::{AuthError, RejectReason, TokenError};
pub use identity::{IdentityResolver, split_authorization};
pub use ownership::{Decision, OwnershipFact, authorize, authorize_mutation};
pub use password::{PasswordError, hash_password, verify_password};
pub use session::{Admission, SessionVerifier};
