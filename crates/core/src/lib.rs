//! `blog-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod entity;
pub mod error;
pub mod id;
pub mod model;

pub use entity::{Authored, Entity};
pub use error::{DomainError, DomainResult};
pub use id::{CommentId, PostId, UserId};
pub use model::{Comment, NewComment, NewPost, NewUser, Post, PostPatch, User};
