//! User directory state and the controller that keeps it in sync with the
//! collection endpoint.
//!
//! Every operation runs in three steps so the UI never waits on the network:
//! 1. `prepare_*` validates input and reserves what it needs, returning an [`Operation`]
//! 2. [`Operation::execute`] performs the HTTP call and yields a [`Completion`]
//! 3. [`UserDirectoryController::reconcile`] applies the completion to the state
//!
//! The async methods (`load_all`, `create`, `update`, `delete`) do the same
//! work inline for callers that are happy to await.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::api::UserApi;
use crate::error::{NetworkError, Result, ValidationError};
use crate::model::{UserDraft, UserRecord};
use crate::search;
use crate::validate::{validate_draft, validate_update};

/// Progress of the one-time initial fetch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadPhase {
    Idle,
    Loading,
    Ready,
    Failed(String),
}

/// In-memory mirror of the remote collection plus view state.
#[derive(Debug)]
pub struct DirectoryState {
    records: Vec<UserRecord>,
    phase: LoadPhase,
    search_query: String,
    selected: Option<UserRecord>,
    in_flight: usize,
    reserved_ids: BTreeSet<u64>,
}

impl Default for DirectoryState {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            phase: LoadPhase::Idle,
            search_query: String::new(),
            selected: None,
            in_flight: 0,
            reserved_ids: BTreeSet::new(),
        }
    }
}

impl DirectoryState {
    /// All records in list order.
    pub fn records(&self) -> &[UserRecord] {
        &self.records
    }

    pub fn phase(&self) -> &LoadPhase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == LoadPhase::Loading
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn selected(&self) -> Option<&UserRecord> {
        self.selected.as_ref()
    }

    /// Operations issued but not yet reconciled.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Records matching the current search query.
    pub fn visible(&self) -> Vec<&UserRecord> {
        search::apply_search(&self.records, &self.search_query)
    }

    pub fn get(&self, id: u64) -> Option<&UserRecord> {
        self.records.iter().find(|u| u.id == id)
    }

    /// One more than the largest id present or reserved, or 1 for an empty list.
    /// `None` once `u64::MAX` is taken.
    pub fn next_id(&self) -> Option<u64> {
        let max_present = self.records.iter().map(|u| u.id).max().unwrap_or(0);
        let max_reserved = self.reserved_ids.last().copied().unwrap_or(0);
        max_present.max(max_reserved).checked_add(1)
    }

    fn replace_all(&mut self, users: Vec<UserRecord>) {
        let mut seen = HashSet::with_capacity(users.len());
        let before = users.len();
        self.records = users.into_iter().filter(|u| seen.insert(u.id)).collect();
        if self.records.len() != before {
            warn!(dropped = before - self.records.len(), "collection contained duplicate ids");
        }
    }

    fn replace_in_place(&mut self, record: UserRecord) -> bool {
        match self.records.iter_mut().find(|u| u.id == record.id) {
            Some(slot) => {
                *slot = record;
                true
            }
            None => false,
        }
    }

    fn remove(&mut self, id: u64) -> bool {
        let before = self.records.len();
        self.records.retain(|u| u.id != id);
        self.records.len() != before
    }

    fn clear_selection_if(&mut self, id: u64) {
        if self.selected.as_ref().is_some_and(|s| s.id == id) {
            self.selected = None;
        }
    }
}

/// A request ready to be sent. Holds no reference to the controller, so it
/// can be moved onto a runtime task.
#[derive(Clone, Debug)]
pub enum Operation {
    Load,
    Create { id: u64, draft: UserDraft },
    Update { id: u64, draft: UserDraft },
    Delete { id: u64 },
}

/// Outcome of an executed [`Operation`], waiting to be reconciled.
#[derive(Debug)]
pub enum Completion {
    Loaded(std::result::Result<Vec<UserRecord>, NetworkError>),
    Created {
        id: u64,
        draft: UserDraft,
        result: std::result::Result<UserRecord, NetworkError>,
    },
    Updated {
        id: u64,
        draft: UserDraft,
        result: std::result::Result<UserRecord, NetworkError>,
    },
    Deleted {
        id: u64,
        result: std::result::Result<(), NetworkError>,
    },
}

/// What a successful reconciliation changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Applied {
    Loaded { count: usize },
    Created(UserRecord),
    Updated(UserRecord),
    Deleted(u64),
}

impl Operation {
    pub async fn execute(self, api: &dyn UserApi) -> Completion {
        match self {
            Operation::Load => Completion::Loaded(api.list_users().await),
            Operation::Create { id, draft } => {
                let result = api.create_user(id, &draft).await;
                Completion::Created { id, draft, result }
            }
            Operation::Update { id, draft } => {
                let result = api.update_user(id, &draft).await;
                Completion::Updated { id, draft, result }
            }
            Operation::Delete { id } => Completion::Deleted {
                id,
                result: api.delete_user(id).await,
            },
        }
    }
}

/// Take the server echo, keep our id, and fill anything the echo left blank
/// from what we sent.
fn reconcile_echo(id: u64, draft: &UserDraft, echo: UserRecord) -> UserRecord {
    let fallback = |echoed: String, sent: &String| if echoed.is_empty() { sent.clone() } else { echoed };
    UserRecord {
        id,
        name: fallback(echo.name, &draft.name),
        username: fallback(echo.username, &draft.username),
        email: fallback(echo.email, &draft.email),
        phone: echo.phone.or_else(|| draft.phone.clone()),
        address: echo.address.or_else(|| draft.address.clone()),
        website: echo.website,
    }
}

/// Owns the directory state and the injected API capability.
pub struct UserDirectoryController {
    api: Arc<dyn UserApi>,
    state: DirectoryState,
    load_issued: bool,
}

impl std::fmt::Debug for UserDirectoryController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserDirectoryController")
            .field("state", &self.state)
            .field("load_issued", &self.load_issued)
            .finish()
    }
}

impl UserDirectoryController {
    pub fn new(api: Arc<dyn UserApi>) -> Self {
        Self {
            api,
            state: DirectoryState::default(),
            load_issued: false,
        }
    }

    /// Shared handle to the API, for executing operations off the UI thread.
    pub fn api(&self) -> Arc<dyn UserApi> {
        Arc::clone(&self.api)
    }

    pub fn state(&self) -> &DirectoryState {
        &self.state
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.state.search_query = query.into();
    }

    /// Make the record with `id` the edit target. Returns false if it does not exist.
    pub fn select(&mut self, id: u64) -> bool {
        self.state.selected = self.state.get(id).cloned();
        self.state.selected.is_some()
    }

    pub fn clear_selection(&mut self) {
        self.state.selected = None;
    }

    /// Start the initial fetch. Only the first call per controller yields an operation.
    pub fn prepare_load(&mut self) -> Option<Operation> {
        if self.load_issued {
            return None;
        }
        self.load_issued = true;
        self.state.phase = LoadPhase::Loading;
        self.state.in_flight += 1;
        Some(Operation::Load)
    }

    /// Validate `draft` and reserve the next id for it.
    pub fn prepare_create(&mut self, draft: UserDraft) -> Result<Operation, ValidationError> {
        let id = self.reserve_create(&draft)?;
        Ok(Operation::Create { id, draft })
    }

    /// Validate `draft` for the record `id`. Requires a current selection.
    pub fn prepare_update(&mut self, id: u64, draft: UserDraft) -> Result<Operation, ValidationError> {
        self.check_update(id, &draft)?;
        Ok(Operation::Update { id, draft })
    }

    pub fn prepare_delete(&mut self, id: u64) -> Operation {
        self.state.in_flight += 1;
        Operation::Delete { id }
    }

    fn reserve_create(&mut self, draft: &UserDraft) -> Result<u64, ValidationError> {
        if let Err(e) = validate_draft(draft) {
            warn!(error = %e, "create rejected");
            return Err(e);
        }
        let Some(id) = self.state.next_id() else {
            warn!("no user id left to assign");
            return Err(ValidationError::IdsExhausted);
        };
        self.state.reserved_ids.insert(id);
        self.state.in_flight += 1;
        Ok(id)
    }

    fn check_update(&mut self, id: u64, draft: &UserDraft) -> Result<(), ValidationError> {
        let Some(current) = &self.state.selected else {
            warn!(id, "update without a selection");
            return Err(ValidationError::NoSelection);
        };
        if let Err(e) = validate_update(draft, current) {
            warn!(id, error = %e, "update rejected");
            return Err(e);
        }
        self.state.in_flight += 1;
        Ok(())
    }

    /// Apply a completed operation. Failures leave the record list untouched
    /// (a failed initial load leaves it empty) and are logged here.
    pub fn reconcile(&mut self, completion: Completion) -> Result<Applied> {
        match completion {
            Completion::Loaded(result) => self
                .apply_loaded(result)
                .map(|count| Applied::Loaded { count }),
            Completion::Created { id, draft, result } => {
                self.apply_created(id, &draft, result).map(Applied::Created)
            }
            Completion::Updated { id, draft, result } => {
                self.apply_updated(id, &draft, result).map(Applied::Updated)
            }
            Completion::Deleted { id, result } => self.apply_deleted(id, result).map(|()| Applied::Deleted(id)),
        }
    }

    fn finish(&mut self) {
        self.state.in_flight = self.state.in_flight.saturating_sub(1);
    }

    fn apply_loaded(
        &mut self,
        result: std::result::Result<Vec<UserRecord>, NetworkError>,
    ) -> Result<usize> {
        self.finish();
        match result {
            Ok(users) => {
                self.state.replace_all(users);
                self.state.phase = LoadPhase::Ready;
                let count = self.state.records.len();
                info!(count, "loaded users");
                Ok(count)
            }
            Err(e) => {
                error!(error = %e, "error fetching users");
                self.state.records.clear();
                self.state.phase = LoadPhase::Failed(e.to_string());
                Err(e.into())
            }
        }
    }

    fn apply_created(
        &mut self,
        id: u64,
        draft: &UserDraft,
        result: std::result::Result<UserRecord, NetworkError>,
    ) -> Result<UserRecord> {
        self.finish();
        self.state.reserved_ids.remove(&id);
        match result {
            Ok(echo) => {
                let record = reconcile_echo(id, draft, echo);
                self.state.records.push(record.clone());
                info!(id, name = %record.name, "user created");
                Ok(record)
            }
            Err(e) => {
                error!(id, error = %e, "error creating user");
                Err(e.into())
            }
        }
    }

    fn apply_updated(
        &mut self,
        id: u64,
        draft: &UserDraft,
        result: std::result::Result<UserRecord, NetworkError>,
    ) -> Result<UserRecord> {
        self.finish();
        match result {
            Ok(echo) => {
                let record = reconcile_echo(id, draft, echo);
                if !self.state.replace_in_place(record.clone()) {
                    warn!(id, "updated user is no longer in the list");
                }
                self.state.clear_selection_if(id);
                info!(id, "user updated");
                Ok(record)
            }
            Err(e) => {
                error!(id, error = %e, "error updating user");
                Err(e.into())
            }
        }
    }

    fn apply_deleted(&mut self, id: u64, result: std::result::Result<(), NetworkError>) -> Result<()> {
        self.finish();
        match result {
            Ok(()) => {
                if !self.state.remove(id) {
                    warn!(id, "deleted user was not in the list");
                }
                self.state.clear_selection_if(id);
                info!(id, "user deleted");
                Ok(())
            }
            Err(e) => {
                error!(id, error = %e, "error deleting user");
                Err(e.into())
            }
        }
    }

    /// Fetch the collection once. Later calls do nothing.
    pub async fn load_all(&mut self) -> Result<()> {
        if self.prepare_load().is_none() {
            return Ok(());
        }
        let result = self.api.list_users().await;
        self.apply_loaded(result).map(|_| ())
    }

    pub async fn create(&mut self, draft: UserDraft) -> Result<UserRecord> {
        let id = self.reserve_create(&draft)?;
        let result = self.api.create_user(id, &draft).await;
        self.apply_created(id, &draft, result)
    }

    pub async fn update(&mut self, id: u64, draft: UserDraft) -> Result<UserRecord> {
        self.check_update(id, &draft)?;
        let result = self.api.update_user(id, &draft).await;
        self.apply_updated(id, &draft, result)
    }

    pub async fn delete(&mut self, id: u64) -> Result<()> {
        self.state.in_flight += 1;
        let result = self.api.delete_user(id).await;
        self.apply_deleted(id, result)
    }
}
