//! Blog domain records: users, posts, comments.
//!
//! Records are plain data owned by the storage layer. The `New*` / `*Patch`
//! types are validated inputs; construct them through their `new` functions so
//! the storage layer never sees unchecked text.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Authored, CommentId, DomainError, DomainResult, Entity, PostId, UserId};

/// Minimum accepted password length (characters).
pub const MIN_PASSWORD_LEN: usize = 8;

// ─────────────────────────────────────────────────────────────────────────────
// Users
// ─────────────────────────────────────────────────────────────────────────────

/// A registered user (the principal record).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    /// PHC-formatted password hash. Never serialized.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> UserId {
        self.id
    }
}

/// Validated registration input (password already hashed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl NewUser {
    pub fn new(
        username: &str,
        email: &str,
        password_hash: impl Into<String>,
    ) -> DomainResult<Self> {
        Ok(Self {
            username: validate_username(username)?,
            email: validate_email(email)?,
            password_hash: password_hash.into(),
        })
    }
}

pub fn validate_username(username: &str) -> DomainResult<String> {
    let username = username.trim();
    if username.is_empty() {
        return Err(DomainError::validation("username cannot be empty"));
    }
    if username.chars().any(char::is_whitespace) {
        return Err(DomainError::validation("username cannot contain whitespace"));
    }
    Ok(username.to_string())
}

/// Basic email shape check: non-empty local part and domain around one `@`.
pub fn validate_email(email: &str) -> DomainResult<String> {
    let email = email.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(email)
        }
        _ => Err(DomainError::validation("invalid email format")),
    }
}

pub fn validate_password(password: &str) -> DomainResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(DomainError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Posts
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub author_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Post {
    type Id = PostId;

    fn id(&self) -> PostId {
        self.id
    }
}

impl Authored for Post {
    fn author_id(&self) -> UserId {
        self.author_id
    }
}

impl Post {
    /// Case-insensitive substring match over title and content.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        term.is_empty()
            || self.title.to_lowercase().contains(&term)
            || self.content.to_lowercase().contains(&term)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub author_id: UserId,
}

impl NewPost {
    pub fn new(author_id: UserId, title: &str, content: &str) -> DomainResult<Self> {
        let title = title.trim();
        if title.is_empty() {
            return Err(DomainError::validation("title cannot be empty"));
        }
        if content.trim().is_empty() {
            return Err(DomainError::validation("content cannot be empty"));
        }
        Ok(Self {
            title: title.to_string(),
            content: content.to_string(),
            author_id,
        })
    }
}

/// Partial post update. At least one field must be present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl PostPatch {
    pub fn new(title: Option<&str>, content: Option<&str>) -> DomainResult<Self> {
        // Blank fields count as "not provided".
        let title = title.map(str::trim).filter(|t| !t.is_empty()).map(str::to_string);
        let content = content.filter(|c| !c.trim().is_empty()).map(str::to_string);

        if title.is_none() && content.is_none() {
            return Err(DomainError::validation("no fields to update"));
        }
        Ok(Self { title, content })
    }

    pub fn apply(&self, post: &mut Post, at: DateTime<Utc>) {
        if let Some(title) = &self.title {
            post.title = title.clone();
        }
        if let Some(content) = &self.content {
            post.content = content.clone();
        }
        post.updated_at = at;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Comments
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub author_id: UserId,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Comment {
    type Id = CommentId;

    fn id(&self) -> CommentId {
        self.id
    }
}

impl Authored for Comment {
    fn author_id(&self) -> UserId {
        self.author_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub post_id: PostId,
    pub author_id: UserId,
    pub content: String,
}

impl NewComment {
    pub fn new(post_id: PostId, author_id: UserId, content: &str) -> DomainResult<Self> {
        Ok(Self {
            post_id,
            author_id,
            content: validate_comment(content)?,
        })
    }
}

pub fn validate_comment(content: &str) -> DomainResult<String> {
    if content.trim().is_empty() {
        return Err(DomainError::validation("comment cannot be empty"));
    }
    Ok(content.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(title: &str, content: &str) -> Post {
        let now = Utc::now();
        Post {
            id: PostId::new(1),
            title: title.to_string(),
            content: content.to_string(),
            author_id: UserId::new(7),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn new_user_normalizes_email() {
        let user = NewUser::new(" alice ", "Alice@Example.com ", "$argon2id$...").unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.email, "alice@example.com");
    }

    #[test]
    fn new_user_rejects_bad_input() {
        assert!(NewUser::new("", "a@b.c", "h").is_err());
        assert!(NewUser::new("bob smith", "a@b.c", "h").is_err());
        assert!(NewUser::new("bob", "not-an-email", "h").is_err());
        assert!(NewUser::new("bob", "@example.com", "h").is_err());
        assert!(NewUser::new("bob", "bob@", "h").is_err());
    }

    #[test]
    fn password_length_is_enforced() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("long-enough").is_ok());
    }

    #[test]
    fn user_serialization_omits_password_hash() {
        let user = User {
            id: UserId::new(1),
            username: "alice".into(),
            email: "alice@example.com".into(),
            password_hash: "secret-hash".into(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "alice");
    }

    #[test]
    fn post_patch_requires_a_field() {
        let err = PostPatch::new(None, Some("   ")).unwrap_err();
        assert_eq!(err, DomainError::validation("no fields to update"));
    }

    #[test]
    fn post_patch_applies_only_present_fields() {
        let mut p = post("Old", "Body");
        let at = Utc::now();
        PostPatch::new(Some("New"), None).unwrap().apply(&mut p, at);

        assert_eq!(p.title, "New");
        assert_eq!(p.content, "Body");
        assert_eq!(p.updated_at, at);
    }

    #[test]
    fn post_search_matches_title_or_content() {
        let p = post("Rust ownership", "Borrowing explained");
        assert!(p.matches("rust"));
        assert!(p.matches(" BORROW "));
        assert!(p.matches(""));
        assert!(!p.matches("python"));
    }

    #[test]
    fn post_serializes_camel_case_author() {
        let json = serde_json::to_value(post("t", "c")).unwrap();
        assert_eq!(json["authorId"], 7);
    }

    #[test]
    fn blank_comment_rejected() {
        assert!(NewComment::new(PostId::new(1), UserId::new(1), "  ").is_err());
    }
}
