//! HTTP client for the Voss API with dual-session handling
//!
//! A browser-style client can hold a User session and an Admin session at the
//! same time. Every authenticated call carries the active kind's token and
//! nothing else.

use crate::domain::{
    AuthResponse, LoginInput, Principal, RegisterInput, Session, SessionKind, SessionStore,
};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error)]
pub enum ClientError {
    /// No session of the active kind is stored; nothing was sent.
    #[error("Not signed in as {0}")]
    Unauthenticated(SessionKind),

    #[error("{status}: {message}")]
    Api { status: StatusCode, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Voss API client
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http_client: Client,
    sessions: Arc<RwLock<SessionStore>>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        let http_client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client,
            sessions: Arc::new(RwLock::new(SessionStore::new())),
        })
    }

    /// Register and keep the returned User session.
    pub async fn register(&self, input: &RegisterInput) -> ClientResult<AuthResponse> {
        let response: AuthResponse = self
            .send(Method::POST, "/api/auth/register", None, Some(input))
            .await?;
        self.store(Session::User {
            token: response.token.clone(),
        })
        .await;
        Ok(response)
    }

    /// Log in to the User pool and make it the active session.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<AuthResponse> {
        let response: AuthResponse = self
            .send(
                Method::POST,
                "/api/auth/login",
                None,
                Some(&credentials(email, password)),
            )
            .await?;
        self.store(Session::User {
            token: response.token.clone(),
        })
        .await;
        Ok(response)
    }

    /// Log in to the Admin pool and make it the active session.
    pub async fn admin_login(&self, email: &str, password: &str) -> ClientResult<AuthResponse> {
        let response: AuthResponse = self
            .send(
                Method::POST,
                "/api/admin/login",
                None,
                Some(&credentials(email, password)),
            )
            .await?;
        self.store(Session::Admin {
            token: response.token.clone(),
        })
        .await;
        Ok(response)
    }

    pub async fn set_active(&self, kind: SessionKind) {
        self.sessions.write().await.set_active(kind);
    }

    pub async fn active(&self) -> SessionKind {
        self.sessions.read().await.active()
    }

    /// Drop one kind of session; the other stays signed in.
    pub async fn logout(&self, kind: SessionKind) {
        self.sessions.write().await.logout(kind);
    }

    pub async fn is_signed_in(&self, kind: SessionKind) -> bool {
        self.sessions.read().await.is_signed_in(kind)
    }

    /// Principal behind the active session.
    pub async fn me(&self) -> ClientResult<Principal> {
        self.get("/api/auth/me").await
    }

    /// Authenticated GET returning the `data` payload.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let token = self.bearer().await?;
        self.send::<(), T>(Method::GET, path, Some(&token), None).await
    }

    /// Authenticated POST returning the `data` payload.
    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let token = self.bearer().await?;
        self.send(Method::POST, path, Some(&token), Some(body)).await
    }

    /// Authenticated PUT returning the `data` payload.
    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let token = self.bearer().await?;
        self.send(Method::PUT, path, Some(&token), Some(body)).await
    }

    /// Authenticated DELETE; expects `204 No Content`.
    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        let token = self.bearer().await?;
        let response = self
            .http_client
            .delete(format!("{}{}", self.base_url, path))
            .bearer_auth(token)
            .send()
            .await?;
        check(response).await.map(|_| ())
    }

    async fn store(&self, session: Session) {
        self.sessions.write().await.store(session);
    }

    async fn bearer(&self) -> ClientResult<String> {
        let sessions = self.sessions.read().await;
        sessions
            .bearer()
            .map(str::to_string)
            .ok_or(ClientError::Unauthenticated(sessions.active()))
    }

    async fn send<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<&B>,
    ) -> ClientResult<T> {
        let mut request = self
            .http_client
            .request(method, format!("{}{}", self.base_url, path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = check(request.send().await?).await?;
        let envelope: Envelope<T> = response.json().await?;
        Ok(envelope.data)
    }
}

fn credentials(email: &str, password: &str) -> LoginInput {
    LoginInput {
        email: email.to_string(),
        password: password.to_string(),
    }
}

/// Map a non-2xx response to `ClientError::Api` using the server's message.
async fn check(response: reqwest::Response) -> ClientResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.message,
        Err(_) => status.canonical_reason().unwrap_or("error").to_string(),
    };
    Err(ClientError::Api { status, message })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Role, StringUuid};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn auth_body(role: Role, token: &str) -> serde_json::Value {
        json!({
            "data": {
                "id": StringUuid::new_v4().to_string(),
                "role": role,
                "email": "someone@example.com",
                "name": "Someone",
                "region": null,
                "phone": null,
                "is_verified": true,
                "permissions": [],
                "pool": role.pool(),
                "token": token
            }
        })
    }

    async fn mount_logins(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(auth_body(Role::Farmer, "user-t")))
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/admin/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(auth_body(Role::Admin, "admin-t")))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_unauthenticated_call_never_reaches_server() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri()).unwrap();
        let err = client.me().await.unwrap_err();
        assert!(matches!(err, ClientError::Unauthenticated(SessionKind::User)));
    }

    #[tokio::test]
    async fn test_active_session_token_is_sent() {
        let server = MockServer::start().await;
        mount_logins(&server).await;
        Mock::given(method("GET"))
            .and(path("/api/admin/stats"))
            .and(header("authorization", "Bearer admin-t"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"ok": true}})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/orders/myorders"))
            .and(header("authorization", "Bearer user-t"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri()).unwrap();
        client.login("f@example.com", "secret1").await.unwrap();
        client.admin_login("a@example.com", "secret1").await.unwrap();
        assert_eq!(client.active().await, SessionKind::Admin);

        let stats: serde_json::Value = client.get("/api/admin/stats").await.unwrap();
        assert_eq!(stats["ok"], true);

        client.set_active(SessionKind::User).await;
        let orders: Vec<serde_json::Value> = client.get("/api/orders/myorders").await.unwrap();
        assert!(orders.is_empty());
    }

    #[tokio::test]
    async fn test_logout_keeps_other_session() {
        let server = MockServer::start().await;
        mount_logins(&server).await;

        let client = ApiClient::new(server.uri()).unwrap();
        client.login("f@example.com", "secret1").await.unwrap();
        client.admin_login("a@example.com", "secret1").await.unwrap();

        client.logout(SessionKind::Admin).await;
        assert!(!client.is_signed_in(SessionKind::Admin).await);
        assert!(client.is_signed_in(SessionKind::User).await);

        let err = client.get::<serde_json::Value>("/api/admin/stats").await.unwrap_err();
        assert!(matches!(err, ClientError::Unauthenticated(SessionKind::Admin)));
    }

    #[tokio::test]
    async fn test_api_error_message_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": "unauthorized",
                "message": "Invalid email or password"
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri()).unwrap();
        match client.login("x@example.com", "nope").await {
            Err(ClientError::Api { status, message }) => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert_eq!(message, "Invalid email or password");
            }
            other => panic!("unexpected result: {:?}", other.map(|r| r.token)),
        }
        assert!(!client.is_signed_in(SessionKind::User).await);
    }
}
