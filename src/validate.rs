//! Field-level checks run on a draft before any request is sent.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::ValidationError;
use crate::model::{Address, UserDraft, UserRecord};

pub const MIN_NAME_LEN: usize = 3;
pub const PHONE_DIGITS: usize = 10;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// Check a draft and report the first rule it breaks.
///
/// Rules run in a fixed order: name, email, phone, address.
pub fn validate_draft(draft: &UserDraft) -> Result<(), ValidationError> {
    check_name(&draft.name)?;
    check_email(&draft.email)?;
    if let Some(phone) = &draft.phone {
        check_phone(phone)?;
    }
    if let Some(addr) = &draft.address {
        check_address(addr)?;
    }
    Ok(())
}

/// Like [`validate_draft`], but a phone or address left as `current` has it
/// is accepted as is. Records from the service carry free-form phones such as
/// `1-770-736-8031 x56442`.
pub fn validate_update(draft: &UserDraft, current: &UserRecord) -> Result<(), ValidationError> {
    check_name(&draft.name)?;
    check_email(&draft.email)?;
    if let Some(phone) = &draft.phone {
        if current.phone.as_ref() != Some(phone) {
            check_phone(phone)?;
        }
    }
    if let Some(addr) = &draft.address {
        if current.address.as_ref() != Some(addr) {
            check_address(addr)?;
        }
    }
    Ok(())
}

fn check_name(name: &str) -> Result<(), ValidationError> {
    if name.chars().count() < MIN_NAME_LEN {
        return Err(ValidationError::NameTooShort);
    }
    Ok(())
}

fn check_email(email: &str) -> Result<(), ValidationError> {
    if !EMAIL_RE.is_match(email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

fn check_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.len() != PHONE_DIGITS || !phone.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidPhone);
    }
    Ok(())
}

fn check_address(addr: &Address) -> Result<(), ValidationError> {
    if addr.street.trim().is_empty() || addr.city.trim().is_empty() {
        return Err(ValidationError::MissingAddressField);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn valid() -> UserDraft {
        UserDraft::new("Bobby", "bob@x.com")
    }

    #[test]
    fn accepts_minimal_draft() {
        assert_eq!(validate_draft(&valid()), Ok(()));
    }

    #[rstest]
    #[case("")]
    #[case("Bo")]
    #[case("A")]
    fn rejects_short_names(#[case] name: &str) {
        let draft = UserDraft { name: name.into(), ..valid() };
        assert_eq!(validate_draft(&draft), Err(ValidationError::NameTooShort));
    }

    #[rstest]
    #[case("bob")]
    #[case("bob@x")]
    #[case("@x.com")]
    #[case("bob@.com x")]
    #[case("b ob@x.com")]
    #[case("bob@@x.com")]
    fn rejects_malformed_emails(#[case] email: &str) {
        let draft = UserDraft { email: email.into(), ..valid() };
        assert_eq!(validate_draft(&draft), Err(ValidationError::InvalidEmail));
    }

    #[rstest]
    #[case("123456789")]
    #[case("12345678901")]
    #[case("123-456-7890")]
    #[case("")]
    #[case("12345six90")]
    fn rejects_bad_phones(#[case] phone: &str) {
        let draft = valid().with_phone(phone);
        assert_eq!(validate_draft(&draft), Err(ValidationError::InvalidPhone));
    }

    #[test]
    fn accepts_ten_digit_phone() {
        assert_eq!(validate_draft(&valid().with_phone("1234567890")), Ok(()));
    }

    #[rstest]
    #[case("", "Paris")]
    #[case("Main St", "")]
    #[case(" ", " ")]
    fn rejects_incomplete_address(#[case] street: &str, #[case] city: &str) {
        let draft = valid().with_address(Address::new(street, city));
        assert_eq!(validate_draft(&draft), Err(ValidationError::MissingAddressField));
    }

    #[test]
    fn reports_first_failing_rule() {
        let draft = UserDraft::new("Bo", "nope").with_phone("1");
        assert_eq!(validate_draft(&draft), Err(ValidationError::NameTooShort));
    }

    #[test]
    fn name_length_counts_characters_as_typed() {
        let draft = UserDraft { name: " Al".into(), ..valid() };
        assert_eq!(validate_draft(&draft), Ok(()));
        let draft = UserDraft { name: "Zoë".into(), ..valid() };
        assert_eq!(validate_draft(&draft), Ok(()));
    }

    fn stored() -> UserRecord {
        UserRecord {
            id: 1,
            name: "Leanne Graham".into(),
            username: "Bret".into(),
            email: "Sincere@april.biz".into(),
            phone: Some("1-770-736-8031 x56442".into()),
            address: Some(Address::new("Kulas Light", "Gwenborough")),
            website: None,
        }
    }

    #[test]
    fn update_keeps_unchanged_service_phone() {
        let current = stored();
        let draft = UserDraft { name: "Leanne G".into(), ..UserDraft::from_record(&current) };
        assert_eq!(validate_draft(&draft), Err(ValidationError::InvalidPhone));
        assert_eq!(validate_update(&draft, &current), Ok(()));
    }

    #[test]
    fn update_checks_changed_fields() {
        let current = stored();
        let draft = UserDraft::from_record(&current).with_phone("555-0100");
        assert_eq!(validate_update(&draft, &current), Err(ValidationError::InvalidPhone));

        let draft = UserDraft::from_record(&current).with_address(Address::new("", "Gwenborough"));
        assert_eq!(validate_update(&draft, &current), Err(ValidationError::MissingAddressField));

        let draft = UserDraft { name: "Le".into(), ..UserDraft::from_record(&current) };
        assert_eq!(validate_update(&draft, &current), Err(ValidationError::NameTooShort));
    }
}
