use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use blog_core::{
    Comment, CommentId, NewComment, NewPost, NewUser, Post, PostId, PostPatch, User, UserId,
};

use crate::store::{CommentStore, Page, PostStore, PrincipalField, PrincipalStore, StoreError};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    posts: BTreeMap<PostId, Post>,
    comments: BTreeMap<CommentId, Comment>,
    // Last assigned ids; ids start at 1 and are never reused.
    last_user: i64,
    last_post: i64,
    last_comment: i64,
}

/// In-memory blog store.
///
/// Intended for tests/dev. One lock over all tables so multi-table operations
/// (uniqueness checks, cascading deletes) are atomic.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }
}

impl PrincipalStore for InMemoryStore {
    fn save_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut t = self.write()?;

        if t.users.values().any(|u| u.username == user.username) {
            return Err(StoreError::Conflict("username"));
        }
        if t.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict("email"));
        }

        t.last_user += 1;
        let stored = User {
            id: UserId::new(t.last_user),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
        };
        t.users.insert(stored.id, stored.clone());
        tracing::debug!(user_id = %stored.id, "user saved");
        Ok(stored)
    }

    fn find_principal_by(
        &self,
        field: PrincipalField,
        value: &str,
    ) -> Result<Option<User>, StoreError> {
        let t = self.read()?;
        let found = match field {
            PrincipalField::Id => value
                .parse::<UserId>()
                .ok()
                .and_then(|id| t.users.get(&id)),
            PrincipalField::Username => t.users.values().find(|u| u.username == value),
            PrincipalField::Email => {
                let email = value.trim().to_lowercase();
                t.users.values().find(|u| u.email == email)
            }
        };
        Ok(found.cloned())
    }
}

impl PostStore for InMemoryStore {
    fn create_post(&self, post: NewPost, at: DateTime<Utc>) -> Result<Post, StoreError> {
        let mut t = self.write()?;
        t.last_post += 1;
        let stored = Post {
            id: PostId::new(t.last_post),
            title: post.title,
            content: post.content,
            author_id: post.author_id,
            created_at: at,
            updated_at: at,
        };
        t.posts.insert(stored.id, stored.clone());
        Ok(stored)
    }

    fn get_post(&self, id: PostId) -> Result<Option<Post>, StoreError> {
        Ok(self.read()?.posts.get(&id).cloned())
    }

    fn list_posts(&self, page: Page, search: Option<&str>) -> Result<Vec<Post>, StoreError> {
        let t = self.read()?;
        let term = search.unwrap_or_default();
        Ok(t.posts
            .values()
            .filter(|p| p.matches(term))
            .skip(page.offset())
            .take(page.limit)
            .cloned()
            .collect())
    }

    fn update_post(
        &self,
        id: PostId,
        patch: &PostPatch,
        at: DateTime<Utc>,
    ) -> Result<Option<Post>, StoreError> {
        let mut t = self.write()?;
        Ok(t.posts.get_mut(&id).map(|post| {
            patch.apply(post, at);
            post.clone()
        }))
    }

    fn delete_post(&self, id: PostId) -> Result<bool, StoreError> {
        let mut t = self.write()?;
        if t.posts.remove(&id).is_none() {
            return Ok(false);
        }
        t.comments.retain(|_, c| c.post_id != id);
        Ok(true)
    }
}

impl CommentStore for InMemoryStore {
    fn add_comment(
        &self,
        comment: NewComment,
        at: DateTime<Utc>,
    ) -> Result<Option<Comment>, StoreError> {
        let mut t = self.write()?;
        if !t.posts.contains_key(&comment.post_id) {
            return Ok(None);
        }

        t.last_comment += 1;
        let stored = Comment {
            id: CommentId::new(t.last_comment),
            post_id: comment.post_id,
            author_id: comment.author_id,
            content: comment.content,
            created_at: at,
            updated_at: at,
        };
        t.comments.insert(stored.id, stored.clone());
        Ok(Some(stored))
    }

    fn get_comment(&self, id: CommentId) -> Result<Option<Comment>, StoreError> {
        Ok(self.read()?.comments.get(&id).cloned())
    }

    fn list_comments(&self, post_id: PostId, page: Page) -> Result<Vec<Comment>, StoreError> {
        let t = self.read()?;
        Ok(t.comments
            .values()
            .filter(|c| c.post_id == post_id)
            .skip(page.offset())
            .take(page.limit)
            .cloned()
            .collect())
    }

    fn update_comment(
        &self,
        id: CommentId,
        content: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<Comment>, StoreError> {
        let mut t = self.write()?;
        Ok(t.comments.get_mut(&id).map(|comment| {
            comment.content = content.to_string();
            comment.updated_at = at;
            comment.clone()
        }))
    }

    fn delete_comment(&self, id: CommentId) -> Result<bool, StoreError> {
        Ok(self.write()?.comments.remove(&id).is_some())
    }
}
