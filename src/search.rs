use crate::model::UserRecord;

/// True when name, username or email contains `query`, ignoring case.
/// An empty query matches everything.
pub fn matches_query(user: &UserRecord, query: &str) -> bool {
    let q = query.to_lowercase();
    if q.is_empty() {
        return true;
    }
    user.name.to_lowercase().contains(&q)
        || user.username.to_lowercase().contains(&q)
        || user.email.to_lowercase().contains(&q)
}

/// Records matching `query`, in list order.
pub fn apply_search<'a>(users: &'a [UserRecord], query: &str) -> Vec<&'a UserRecord> {
    users.iter().filter(|u| matches_query(u, query)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mk_user(id: u64, name: &str, username: &str, email: &str) -> UserRecord {
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

    #[test]
    fn search_users_filters_by_multiple_fields() {
        let users = vec![
            mk_user(1, "Alice A", "alice", "alice@x.com"),
            mk_user(2, "Bobby Tables", "bob", "tables@y.org"),
            mk_user(3, "Carol", "carol", "carol@bob.net"),
        ];
        let ids = |q: &str| apply_search(&users, q).iter().map(|u| u.id).collect::<Vec<_>>();

        assert_eq!(ids("bOb"), vec![2, 3]);
        assert_eq!(ids("TABLES"), vec![2]);
        assert_eq!(ids("y.org"), vec![2]);
        assert_eq!(ids(""), vec![1, 2, 3]);
    }

    #[test]
    fn search_does_not_look_at_phone_or_id() {
        let mut u = mk_user(42, "Dana", "dana", "d@x.com");
        u.phone = Some("5551234567".into());
        assert!(!matches_query(&u, "555"));
        assert!(!matches_query(&u, "42"));
    }

    #[test]
    fn single_record_scenario() {
        let users = vec![mk_user(1, "Ann", "ann", "a@x.com")];
        assert_eq!(apply_search(&users, "ann").len(), 1);
        assert!(apply_search(&users, "zzz").is_empty());
    }
}
