// Unit tests for user-directory

#[cfg(test)]
mod validation_tests {
    use rstest::rstest;
    use user_directory::error::ValidationError;
    use user_directory::model::{Address, UserDraft};
    use user_directory::validate::validate_draft;

    fn full_draft() -> UserDraft {
        UserDraft::new("Bobby Tables", "bobby@example.com")
            .with_username("bobby")
            .with_phone("5551234567")
            .with_address(Address::new("1 Main St", "Springfield"))
    }

    #[test]
    fn test_minimal_draft_is_valid() {
        assert_eq!(validate_draft(&UserDraft::new("Bob", "bob@x.com")), Ok(()));
        assert_eq!(validate_draft(&full_draft()), Ok(()));
    }

    #[rstest]
    #[case::short_name(UserDraft::new("Bo", "bo@x.com"), ValidationError::NameTooShort)]
    #[case::empty_name(UserDraft::new("", "al@x.com"), ValidationError::NameTooShort)]
    #[case::no_at(UserDraft::new("Bobby", "bobby.example.com"), ValidationError::InvalidEmail)]
    #[case::no_dot(UserDraft::new("Bobby", "bobby@example"), ValidationError::InvalidEmail)]
    #[case::short_phone(UserDraft::new("Bobby", "b@x.com").with_phone("12345"), ValidationError::InvalidPhone)]
    #[case::dashed_phone(UserDraft::new("Bobby", "b@x.com").with_phone("555-123-4567"), ValidationError::InvalidPhone)]
    #[case::blank_city(
        UserDraft::new("Bobby", "b@x.com").with_address(Address::new("Main St", " ")),
        ValidationError::MissingAddressField
    )]
    fn test_invalid_drafts_are_rejected(#[case] draft: UserDraft, #[case] expected: ValidationError) {
        assert_eq!(validate_draft(&draft), Err(expected));
    }

    #[test]
    fn test_name_is_checked_before_email() {
        let draft = UserDraft::new("Bo", "not-an-email");
        assert_eq!(validate_draft(&draft), Err(ValidationError::NameTooShort));
    }
}

#[cfg(test)]
mod search_tests {
    use user_directory::model::UserRecord;
    use user_directory::search::{apply_search, matches_query};

    fn create_test_user(id: u64, name: &str, username: &str, email: &str) -> UserRecord {
        UserRecord {
            id,
            name: name.to_string(),
            username: username.to_string(),
            email: email.to_string(),
            phone: None,
            address: None,
            website: None,
        }
    }

    fn users() -> Vec<UserRecord> {
        vec![
            create_test_user(1, "Ann Lee", "ann", "ann@x.com"),
            create_test_user(2, "Ben Stone", "bstone", "ben@corp.io"),
            create_test_user(3, "Carla Diaz", "carla", "c.diaz@x.com"),
        ]
    }

    #[test]
    fn test_empty_query_keeps_everything() {
        let all = users();
        assert_eq!(apply_search(&all, "").len(), 3);
    }

    #[test]
    fn test_query_matches_any_text_field_ignoring_case() {
        let all = users();
        let by_name: Vec<u64> = apply_search(&all, "STONE").iter().map(|u| u.id).collect();
        assert_eq!(by_name, [2]);
        let by_email: Vec<u64> = apply_search(&all, "@x.com").iter().map(|u| u.id).collect();
        assert_eq!(by_email, [1, 3]);
        assert!(matches_query(&all[2], "CARL"));
    }

    #[test]
    fn test_no_match_yields_empty_view() {
        let all = users();
        assert!(apply_search(&all, "zzz").is_empty());
    }
}

#[cfg(test)]
mod model_tests {
    use user_directory::model::{Address, UserDraft, UserRecord};

    #[test]
    fn test_record_decodes_service_payload() {
        let json = r#"{"id":1,"name":"Leanne Graham","username":"Bret","email":"Sincere@april.biz",
            "address":{"street":"Kulas Light","suite":"Apt. 556","city":"Gwenborough"},
            "phone":"1-770-736-8031 x56442","website":"hildegard.org"}"#;
        let rec: UserRecord = serde_json::from_str(json).expect("decode");
        assert_eq!(rec.address, Some(Address::new("Kulas Light", "Gwenborough")));
        assert_eq!(rec.website.as_deref(), Some("hildegard.org"));
    }

    #[test]
    fn test_record_from_draft_keeps_fields() {
        let draft = UserDraft::new("Bobby", "bob@x.com").with_phone("1234567890");
        let rec = UserRecord::from_draft(9, &draft);
        assert_eq!(rec.id, 9);
        assert_eq!(rec.phone.as_deref(), Some("1234567890"));
        assert_eq!(UserDraft::from_record(&rec), draft);
    }
}

#[cfg(test)]
mod app_tests {
    use std::sync::Arc;
    use user_directory::api::InMemoryUserApi;
    use user_directory::app::keymap::Keymap;
    use user_directory::app::{AppState, InputMode, ModalState, Theme};
    use user_directory::controller::UserDirectoryController;

    async fn loaded_app() -> AppState {
        let mut ctl = UserDirectoryController::new(Arc::new(InMemoryUserApi::seeded()));
        ctl.load_all().await.expect("load");
        AppState::new(ctl, Theme::mocha(), Keymap::default())
    }

    #[tokio::test]
    async fn test_selection_clamps_after_search() {
        let mut app = loaded_app().await;
        app.selected_index = 2;
        app.directory.set_search_query("leanne");
        app.clamp_selection();
        assert_eq!(app.selected_index, 0);
        assert_eq!(app.highlighted().map(|u| u.id), Some(1));
    }

    #[tokio::test]
    async fn test_info_modal_switches_input_mode() {
        let mut app = loaded_app().await;
        app.info("Request failed");
        assert_eq!(app.input_mode, InputMode::Modal);
        assert!(matches!(app.modal, Some(ModalState::Info { .. })));
        app.close_modal();
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.modal.is_none());
    }
}
