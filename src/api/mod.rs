//! Remote interaction layer for the user collection endpoint.
//!
//! The controller only ever talks to a [`UserApi`]; the binary injects
//! [`HttpUserApi`] and tests inject [`InMemoryUserApi`].

mod http;
mod memory;

pub use http::HttpUserApi;
pub use memory::InMemoryUserApi;

use async_trait::async_trait;

use crate::error::NetworkError;
use crate::model::{UserDraft, UserRecord};

/// Fixed base URL of the public demo service.
pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

/// CRUD calls against the user collection.
#[async_trait]
pub trait UserApi: Send + Sync {
    /// `GET /users`
    async fn list_users(&self) -> Result<Vec<UserRecord>, NetworkError>;

    /// `POST /users` with the draft and a locally assigned id; returns the echo.
    async fn create_user(&self, id: u64, draft: &UserDraft) -> Result<UserRecord, NetworkError>;

    /// `PUT /users/{id}`; returns the echo.
    async fn update_user(&self, id: u64, draft: &UserDraft) -> Result<UserRecord, NetworkError>;

    /// `DELETE /users/{id}`
    async fn delete_user(&self, id: u64) -> Result<(), NetworkError>;
}
