//! Caller identity and ownership checks at the handler boundary.
//!
//! Handlers resolve the caller themselves from the raw header (the session
//! middleware only admits the request), then gate every post/comment mutation
//! on [`authorize_owner`] **before** touching storage.

use axum::http::{HeaderMap, header::AUTHORIZATION};

use blog_auth::{AuthError, OwnershipFact, RejectReason, authorize_mutation};
use blog_core::{Authored, User};
use blog_store::PrincipalField;

use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::context::CallerContext;

/// Resolve the full user record of the caller.
///
/// Unknown principal (e.g. a credential for a user that no longer exists) is
/// `NotFound`, kept apart from a storage failure.
pub fn resolve_user(services: &AppServices, headers: &HeaderMap) -> Result<User, ApiError> {
    let raw = match headers.get(AUTHORIZATION) {
        None => return Err(AuthError::unauthenticated(RejectReason::MissingCredential).into()),
        Some(v) => v
            .to_str()
            .map_err(|_| AuthError::unauthenticated(RejectReason::MalformedHeader))?,
    };

    let username = services.resolver.resolve(raw)?;

    services
        .store
        .find_principal_by(PrincipalField::Username, &username)?
        .ok_or_else(|| {
            tracing::info!(principal = %username, "credential principal has no user record");
            AuthError::not_found(format!("user {username}")).into()
        })
}

pub fn resolve_caller(services: &AppServices, headers: &HeaderMap) -> Result<CallerContext, ApiError> {
    resolve_user(services, headers).map(|user| CallerContext::from(&user))
}

/// Ownership gate for a mutation of `resource` `id`.
///
/// `found` is the owner lookup; absent and not-owned stay distinct errors.
pub fn authorize_owner<E: Authored>(
    resource: &'static str,
    id: E::Id,
    found: Option<&E>,
    caller: &CallerContext,
) -> Result<OwnershipFact<E::Id>, ApiError> {
    Ok(authorize_mutation(resource, id, found, caller.user_id())?)
}
