use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};

use super::UserApi;
use crate::error::NetworkError;
use crate::model::{UserDraft, UserRecord};

/// In-process stand-in for the collection endpoint.
///
/// Behaves like the demo service (echoes writes, keeps nothing consistent
/// beyond its own list) and records every call so callers can assert on
/// traffic. Used by `--offline` and by tests.
#[derive(Clone, Debug, Default)]
pub struct InMemoryUserApi {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    users: Vec<UserRecord>,
    failing: bool,
    calls: Vec<String>,
}

impl InMemoryUserApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: Vec<UserRecord>) -> Self {
        let api = Self::default();
        api.lock().users = users;
        api
    }

    /// A small directory for running without network access.
    pub fn seeded() -> Self {
        let mk = |id: u64, name: &str, username: &str, email: &str, phone: &str| UserRecord {
            id,
            name: name.to_string(),
            username: username.to_string(),
            email: email.to_string(),
            phone: Some(phone.to_string()),
            address: None,
            website: None,
        };
        Self::with_users(vec![
            mk(1, "Leanne Graham", "Bret", "Sincere@april.biz", "1770736803"),
            mk(2, "Ervin Howell", "Antonette", "Shanna@melissa.tv", "0106926593"),
            mk(3, "Clementine Bauch", "Samantha", "Nathan@yesenia.net", "4631234447"),
        ])
    }

    /// Make every following call fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.lock().failing = failing;
    }

    /// Calls seen so far, as `"METHOD /path"`.
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn begin(&self, call: String) -> Result<MutexGuard<'_, Inner>, NetworkError> {
        let mut guard = self.lock();
        guard.calls.push(call.clone());
        if guard.failing {
            return Err(NetworkError::Unavailable(call));
        }
        Ok(guard)
    }
}

#[async_trait]
impl UserApi for InMemoryUserApi {
    async fn list_users(&self) -> Result<Vec<UserRecord>, NetworkError> {
        let guard = self.begin("GET /users".to_string())?;
        Ok(guard.users.clone())
    }

    async fn create_user(&self, id: u64, draft: &UserDraft) -> Result<UserRecord, NetworkError> {
        let mut guard = self.begin("POST /users".to_string())?;
        let record = UserRecord::from_draft(id, draft);
        guard.users.push(record.clone());
        Ok(record)
    }

    async fn update_user(&self, id: u64, draft: &UserDraft) -> Result<UserRecord, NetworkError> {
        let mut guard = self.begin(format!("PUT /users/{id}"))?;
        let mut record = UserRecord::from_draft(id, draft);
        if let Some(existing) = guard.users.iter_mut().find(|u| u.id == id) {
            record.website = existing.website.clone();
            *existing = record.clone();
        }
        Ok(record)
    }

    async fn delete_user(&self, id: u64) -> Result<(), NetworkError> {
        let mut guard = self.begin(format!("DELETE /users/{id}"))?;
        guard.users.retain(|u| u.id != id);
        Ok(())
    }
}
