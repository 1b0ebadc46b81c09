//! Create/edit form state and its conversion into a [`UserDraft`].

use crate::controller::{Completion, Operation};
use crate::model::{Address, UserDraft, UserRecord};

pub const FIELD_LABELS: [&str; 6] = ["Name", "Username", "Email", "Phone", "Street", "City"];
/// Focus index of the submit button, after the last field.
pub const SUBMIT: usize = FIELD_LABELS.len();

const NAME: usize = 0;
const USERNAME: usize = 1;
const EMAIL: usize = 2;
const PHONE: usize = 3;
const STREET: usize = 4;
const CITY: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { id: u64 },
}

/// Request a submitted form is waiting on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PendingSubmit {
    Create { id: u64 },
    Update { id: u64 },
}

impl PendingSubmit {
    pub fn for_operation(op: &Operation) -> Option<Self> {
        match op {
            Operation::Create { id, .. } => Some(Self::Create { id: *id }),
            Operation::Update { id, .. } => Some(Self::Update { id: *id }),
            Operation::Load | Operation::Delete { .. } => None,
        }
    }

    pub fn for_completion(c: &Completion) -> Option<Self> {
        match c {
            Completion::Created { id, .. } => Some(Self::Create { id: *id }),
            Completion::Updated { id, .. } => Some(Self::Update { id: *id }),
            Completion::Loaded(_) | Completion::Deleted { .. } => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct FormState {
    pub mode: FormMode,
    pub values: [String; 6],
    pub focus: usize,
    pub error: Option<String>,
    pub pending: Option<PendingSubmit>,
}

impl FormState {
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            values: Default::default(),
            focus: 0,
            error: None,
            pending: None,
        }
    }

    /// Form pre-filled from `record`.
    pub fn edit(record: &UserRecord) -> Self {
        let addr = record.address.clone().unwrap_or_default();
        Self {
            mode: FormMode::Edit { id: record.id },
            values: [
                record.name.clone(),
                record.username.clone(),
                record.email.clone(),
                record.phone.clone().unwrap_or_default(),
                addr.street,
                addr.city,
            ],
            focus: 0,
            error: None,
            pending: None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Create User",
            FormMode::Edit { .. } => "Edit User",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Create",
            FormMode::Edit { .. } => "Update",
        }
    }

    pub fn on_submit(&self) -> bool {
        self.focus == SUBMIT
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % (SUBMIT + 1);
    }

    pub fn focus_prev(&mut self) {
        self.focus = (self.focus + SUBMIT) % (SUBMIT + 1);
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(v) = self.values.get_mut(self.focus) {
            v.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(v) = self.values.get_mut(self.focus) {
            v.pop();
        }
    }

    /// Build the draft. An empty phone means no phone; empty street and city
    /// mean no address.
    pub fn to_draft(&self) -> UserDraft {
        let field = |i: usize| self.values[i].trim().to_string();
        let phone = Some(field(PHONE)).filter(|p| !p.is_empty());
        let (street, city) = (field(STREET), field(CITY));
        let address = if street.is_empty() && city.is_empty() {
            None
        } else {
            Some(Address::new(street, city))
        };
        UserDraft {
            name: field(NAME),
            username: field(USERNAME),
            email: field(EMAIL),
            phone,
            address,
        }
    }
}
