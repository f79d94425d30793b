use blog_core::{User, UserId};

/// The calling user, re-derived from the request's credential and resolved
/// against storage.
///
/// Built per request by [`crate::authz::resolve_caller`]; never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerContext {
    user_id: UserId,
    username: String,
}

impl CallerContext {
    pub fn new(user_id: UserId, username: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

impl From<&User> for CallerContext {
    fn from(user: &User) -> Self {
        Self::new(user.id, user.username.clone())
    }
}

