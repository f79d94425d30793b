use std::sync::Arc;

use blog_auth::{IdentityResolver, TokenCodec};
use blog_store::BlogStore;

/// Shared per-process state handed to every handler via `Extension`.
#[derive(Clone)]
pub struct AppServices {
    pub store: Arc<dyn BlogStore>,
    pub codec: Arc<TokenCodec>,
    pub resolver: IdentityResolver,
}

impl AppServices {
    pub fn new(store: Arc<dyn BlogStore>, codec: Arc<TokenCodec>) -> Self {
        Self {
            store,
            resolver: IdentityResolver::new(codec.clone()),
            codec,
        }
    }
}
