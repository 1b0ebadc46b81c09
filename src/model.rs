//! User record and draft types exchanged with the collection endpoint.

use serde::{Deserialize, Serialize};

/// Postal address attached to a user. The service returns more fields
/// (suite, zipcode, geo); only street and city are kept.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
}

impl Address {
    pub fn new(street: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            street: street.into(),
            city: city.into(),
        }
    }
}

/// One user as mirrored from `GET /users`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

impl UserRecord {
    /// Build a record from a draft under the given id.
    pub fn from_draft(id: u64, draft: &UserDraft) -> Self {
        Self {
            id,
            name: draft.name.clone(),
            username: draft.username.clone(),
            email: draft.email.clone(),
            phone: draft.phone.clone(),
            address: draft.address.clone(),
            website: None,
        }
    }
}

/// Uncommitted values of the create/edit form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct UserDraft {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

impl UserDraft {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            ..Self::default()
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }

    /// Pre-fill a draft from an existing record, as the edit form does.
    pub fn from_record(record: &UserRecord) -> Self {
        Self {
            name: record.name.clone(),
            username: record.username.clone(),
            email: record.email.clone(),
            phone: record.phone.clone(),
            address: record.address.clone(),
        }
    }
}

/// Body of `POST /users`: the draft plus the locally assigned id.
#[derive(Debug, Serialize)]
pub struct NewUser<'a> {
    #[serde(flatten)]
    pub draft: &'a UserDraft,
    pub id: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_ignores_unknown_fields_from_service() {
        let json = r#"{
            "id": 1,
            "name": "Leanne Graham",
            "username": "Bret",
            "email": "Sincere@april.biz",
            "address": {"street": "Kulas Light", "suite": "Apt. 556", "city": "Gwenborough",
                        "zipcode": "92998-3874", "geo": {"lat": "-37.3159", "lng": "81.1496"}},
            "phone": "1-770-736-8031 x56442",
            "website": "hildegard.org",
            "company": {"name": "Romaguera-Crona"}
        }"#;
        let rec: UserRecord = serde_json::from_str(json).expect("parse");
        assert_eq!(rec.id, 1);
        assert_eq!(rec.username, "Bret");
        assert_eq!(rec.address, Some(Address::new("Kulas Light", "Gwenborough")));
        assert_eq!(rec.website.as_deref(), Some("hildegard.org"));
    }

    #[test]
    fn echo_without_username_defaults_to_empty() {
        let rec: UserRecord =
            serde_json::from_str(r#"{"id": 11, "name": "Bob", "email": "bob@x.com"}"#).expect("parse");
        assert_eq!(rec.username, "");
        assert_eq!(rec.phone, None);
    }

    #[test]
    fn new_user_body_omits_absent_optionals() {
        let draft = UserDraft::new("Bob", "bob@x.com");
        let body = serde_json::to_value(NewUser { draft: &draft, id: 3 }).expect("serialize");
        assert_eq!(
            body,
            serde_json::json!({"name": "Bob", "email": "bob@x.com", "id": 3})
        );
    }
}
