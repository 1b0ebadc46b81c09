use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use super::UserApi;
use crate::error::NetworkError;
use crate::model::{NewUser, UserDraft, UserRecord};

/// `reqwest`-backed client for the user collection endpoint.
#[derive(Clone, Debug)]
pub struct HttpUserApi {
    client: Client,
    base_url: String,
}

impl HttpUserApi {
    /// Build a client rooted at `base_url` with a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, NetworkError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("user-directory/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| NetworkError::Unavailable(format!("building HTTP client: {e}")))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn users_url(&self) -> String {
        format!("{}/users", self.base_url)
    }

    fn user_url(&self, id: u64) -> String {
        format!("{}/users/{}", self.base_url, id)
    }

    async fn send(
        &self,
        method: &'static str,
        url: String,
        request: RequestBuilder,
    ) -> Result<(Response, String), NetworkError> {
        debug!(method, %url, "sending request");
        let response = request.send().await.map_err(|source| NetworkError::Transport {
            method,
            url: url.clone(),
            source,
        })?;
        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::Status { method, url, status });
        }
        Ok((response, url))
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        method: &'static str,
        url: String,
        request: RequestBuilder,
    ) -> Result<T, NetworkError> {
        let (response, url) = self.send(method, url, request).await?;
        response
            .json::<T>()
            .await
            .map_err(|source| NetworkError::Transport { method, url, source })
    }
}

#[async_trait]
impl UserApi for HttpUserApi {
    async fn list_users(&self) -> Result<Vec<UserRecord>, NetworkError> {
        let url = self.users_url();
        let req = self.client.get(&url);
        self.send_json("GET", url, req).await
    }

    async fn create_user(&self, id: u64, draft: &UserDraft) -> Result<UserRecord, NetworkError> {
        let url = self.users_url();
        let req = self.client.post(&url).json(&NewUser { draft, id });
        self.send_json("POST", url, req).await
    }

    async fn update_user(&self, id: u64, draft: &UserDraft) -> Result<UserRecord, NetworkError> {
        let url = self.user_url(id);
        let req = self.client.put(&url).json(draft);
        self.send_json("PUT", url, req).await
    }

    async fn delete_user(&self, id: u64) -> Result<(), NetworkError> {
        let url = self.user_url(id);
        let req = self.client.delete(&url);
        // Body is empty or `{}`; nothing to decode.
        self.send("DELETE", url, req).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Address;

    fn api(server: &mockito::Server) -> HttpUserApi {
        HttpUserApi::new(server.url(), Duration::from_secs(5)).expect("client")
    }

    #[tokio::test]
    async fn list_users_decodes_collection() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/users")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id":1,"name":"Ann","username":"ann","email":"a@x.com"},
                          {"id":2,"name":"Ben","username":"ben","email":"b@x.com","phone":"555"}]"#)
            .expect(1)
            .create_async()
            .await;

        let users = api(&server).list_users().await.expect("list");
        assert_eq!(users.len(), 2);
        assert_eq!(users[1].phone.as_deref(), Some("555"));
    }

    #[tokio::test]
    async fn create_user_posts_draft_with_local_id() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("POST", "/users")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "name": "Bobby",
                "email": "bob@x.com",
                "phone": "1234567890",
                "address": {"street": "Main St", "city": "Oslo"},
                "id": 7
            })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name":"Bobby","email":"bob@x.com","phone":"1234567890","address":{"street":"Main St","city":"Oslo"},"id":11}"#)
            .expect(1)
            .create_async()
            .await;

        let draft = UserDraft::new("Bobby", "bob@x.com")
            .with_phone("1234567890")
            .with_address(Address::new("Main St", "Oslo"));
        let echo = api(&server).create_user(7, &draft).await.expect("create");
        assert_eq!(echo.name, "Bobby");
        m.assert_async().await;
    }

    #[tokio::test]
    async fn update_user_puts_to_item_url() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("PUT", "/users/3")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":3,"name":"Carla","username":"carla","email":"c@x.com"}"#)
            .expect(1)
            .create_async()
            .await;

        let draft = UserDraft::new("Carla", "c@x.com").with_username("carla");
        let echo = api(&server).update_user(3, &draft).await.expect("update");
        assert_eq!(echo.id, 3);
        assert_eq!(echo.username, "carla");
    }

    #[tokio::test]
    async fn delete_user_accepts_empty_body() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("DELETE", "/users/4")
            .with_status(200)
            .with_body("{}")
            .expect(1)
            .create_async()
            .await;

        api(&server).delete_user(4).await.expect("delete");
    }

    #[tokio::test]
    async fn non_success_status_is_network_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("PUT", "/users/11")
            .with_status(500)
            .create_async()
            .await;

        let err = api(&server)
            .update_user(11, &UserDraft::new("Carla", "c@x.com"))
            .await
            .expect_err("500 must fail");
        match err {
            NetworkError::Status { method, status, .. } => {
                assert_eq!(method, "PUT");
                assert_eq!(status.as_u16(), 500);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn undecodable_body_is_network_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/users")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let err = api(&server).list_users().await.expect_err("bad body");
        assert!(matches!(err, NetworkError::Transport { method: "GET", .. }));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let api = HttpUserApi::new("http://localhost:1/", Duration::from_secs(1)).expect("client");
        assert_eq!(api.base_url(), "http://localhost:1");
        assert_eq!(api.user_url(5), "http://localhost:1/users/5");
    }
}
