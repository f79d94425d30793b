use chrono::{DateTime, Utc};
use thiserror::Error;

use blog_core::{
    Comment, CommentId, NewComment, NewPost, NewUser, Post, PostId, PostPatch, User,
};

/// Storage operation error.
///
/// "Not found" is never an error here: lookups return `Option` so callers can
/// tell an absent record apart from a storage failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Uniqueness constraint on a user field (`"username"` / `"email"`).
    #[error("{0} already in use")]
    Conflict(&'static str),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Field used to look a principal up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrincipalField {
    Id,
    Username,
    Email,
}

/// One page of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// 1-based page number.
    pub page: usize,
    pub limit: usize,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            page: 1,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

impl Page {
    pub const DEFAULT_LIMIT: usize = 10;

    /// Lenient query-string parsing: anything missing, unparseable or below 1
    /// falls back to page 1 / the default limit.
    pub fn from_query(page: Option<&str>, limit: Option<&str>) -> Self {
        let parse = |raw: Option<&str>| {
            raw.and_then(|s| s.trim().parse::<i64>().ok())
                .filter(|n| *n >= 1)
                .and_then(|n| usize::try_from(n).ok())
        };
        Self {
            page: parse(page).unwrap_or(1),
            limit: parse(limit).unwrap_or(Self::DEFAULT_LIMIT),
        }
    }

    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1)).saturating_mul(self.limit)
    }
}

pub trait PrincipalStore: Send + Sync {
    /// Insert a user, assigning its id. Username and email are unique.
    fn save_user(&self, user: NewUser) -> Result<User, StoreError>;

    /// Look a user up by one field. An `Id` value that is not a number
    /// matches nobody.
    fn find_principal_by(
        &self,
        field: PrincipalField,
        value: &str,
    ) -> Result<Option<User>, StoreError>;
}

pub trait PostStore: Send + Sync {
    fn create_post(&self, post: NewPost, at: DateTime<Utc>) -> Result<Post, StoreError>;

    fn get_post(&self, id: PostId) -> Result<Option<Post>, StoreError>;

    /// Posts in id order; `search` filters on title/content.
    fn list_posts(&self, page: Page, search: Option<&str>) -> Result<Vec<Post>, StoreError>;

    fn update_post(
        &self,
        id: PostId,
        patch: &PostPatch,
        at: DateTime<Utc>,
    ) -> Result<Option<Post>, StoreError>;

    /// Delete a post and its comments. `false` when there was nothing to delete.
    fn delete_post(&self, id: PostId) -> Result<bool, StoreError>;
}

pub trait CommentStore: Send + Sync {
    /// `None` when the target post does not exist.
    fn add_comment(
        &self,
        comment: NewComment,
        at: DateTime<Utc>,
    ) -> Result<Option<Comment>, StoreError>;

    fn get_comment(&self, id: CommentId) -> Result<Option<Comment>, StoreError>;

    fn list_comments(&self, post_id: PostId, page: Page) -> Result<Vec<Comment>, StoreError>;

    fn update_comment(
        &self,
        id: CommentId,
        content: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<Comment>, StoreError>;

    fn delete_comment(&self, id: CommentId) -> Result<bool, StoreError>;
}

/// Everything the API needs from storage.
pub trait BlogStore: PrincipalStore + PostStore + CommentStore {}

impl<S> BlogStore for S where S: PrincipalStore + PostStore + CommentStore {}
