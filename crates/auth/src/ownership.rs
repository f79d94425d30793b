//! Ownership policy for post / comment mutations.
//!
//! - No IO
//! - No panics
//! - Pure comparison of the caller against the recorded author

use blog_core::{Authored, UserId};

use crate::AuthError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        self == Decision::Allow
    }
}

/// Allow iff the caller is the resource owner.
pub fn authorize(caller: UserId, owner: UserId) -> Decision {
    if caller == owner {
        Decision::Allow
    } else {
        Decision::Deny
    }
}

/// Who owns what, derived from a fetched resource for a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnershipFact<Id> {
    pub resource_id: Id,
    pub owner_id: UserId,
}

impl<Id> OwnershipFact<Id> {
    pub fn of<E>(resource: &E) -> Self
    where
        E: Authored<Id = Id>,
    {
        Self {
            resource_id: resource.id(),
            owner_id: resource.author_id(),
        }
    }
}

/// Gate a mutation on `resource` (e.g. `"post"`) with id `id`.
///
/// `found` is the storage lookup result. An absent resource is `NotFound`, a
/// resource owned by someone else is `PermissionDenied`; the two stay distinct
/// so audit logs say which one happened.
pub fn authorize_mutation<E>(
    resource: &'static str,
    id: E::Id,
    found: Option<&E>,
    caller: UserId,
) -> Result<OwnershipFact<E::Id>, AuthError>
where
    E: Authored,
{
    let Some(entity) = found else {
        tracing::info!(resource, %id, %caller, "mutation target not found");
        return Err(AuthError::not_found(format!("{resource} {id}")));
    };

    let fact = OwnershipFact::of(entity);
    match authorize(caller, fact.owner_id) {
        Decision::Allow => Ok(fact),
        Decision::Deny => {
            tracing::warn!(
                resource,
                %id,
                %caller,
                owner = %fact.owner_id,
                "mutation denied: caller is not the author"
            );
            Err(AuthError::PermissionDenied {
                resource: format!("{resource} {id}"),
                caller,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use blog_core::{Post, PostId};

    use super::*;

    fn post_owned_by(owner: i64) -> Post {
        let now = Utc::now();
        Post {
            id: PostId::new(3),
            title: "t".into(),
            content: "c".into(),
            author_id: UserId::new(owner),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn owner_may_mutate() {
        let post = post_owned_by(7);
        let fact = authorize_mutation("post", post.id, Some(&post), UserId::new(7)).unwrap();

        assert_eq!(
            fact,
            OwnershipFact {
                resource_id: PostId::new(3),
                owner_id: UserId::new(7)
            }
        );
    }

    #[test]
    fn non_owner_is_denied() {
        let post = post_owned_by(7);
        let err = authorize_mutation("post", post.id, Some(&post), UserId::new(8)).unwrap_err();

        assert_eq!(
            err,
            AuthError::PermissionDenied {
                resource: "post 3".into(),
                caller: UserId::new(8)
            }
        );
    }

    #[test]
    fn missing_resource_is_not_found_not_denied() {
        let err =
            authorize_mutation::<Post>("post", PostId::new(99), None, UserId::new(8)).unwrap_err();
        assert_eq!(err, AuthError::not_found("post 99"));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: everyone may mutate what they own.
            #[test]
            fn same_id_always_allows(id in any::<i64>()) {
                prop_assert_eq!(authorize(UserId::new(id), UserId::new(id)), Decision::Allow);
            }

            /// Property: nobody may mutate what someone else owns.
            #[test]
            fn different_ids_always_deny(a in any::<i64>(), b in any::<i64>()) {
                prop_assume!(a != b);
                prop_assert!(!authorize(UserId::new(a), UserId::new(b)).is_allowed());
            }
        }
    }
}
