//! HTTP helpers for the Xuper JSON API with consistent timeouts and error
//! normalization. Feature clients (auth, content, admin) go through these so
//! that every call attaches the stored bearer token the same way and every
//! failure lands in the same `Error` variants.
//!
//! The helpers never log request bodies or tokens.

use crate::{
    APP_USER_AGENT,
    config::ClientConfig,
    error::{Error, Result},
    session::SessionStore,
};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, header::AUTHORIZATION};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::sync::Arc;
use tracing::{Instrument, debug, info_span, warn};

/// Maximum number of error body characters surfaced to the user.
const MAX_ERROR_CHARS: usize = 200;

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    config: ClientConfig,
    store: Arc<SessionStore>,
}

impl ApiClient {
    /// # Errors
    /// Returns `Error::Config` if the underlying HTTP client cannot be built.
    pub fn new(config: ClientConfig, store: Arc<SessionStore>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .connect_timeout(config.timeout)
            .build()
            .map_err(|err| Error::Config(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            config,
            store,
        })
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// GETs an API path and decodes the JSON response.
    ///
    /// # Errors
    /// See [`handle_json_response`] for the failure mapping.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send(Method::GET, path, None::<&()>).await?;
        handle_json_response(response).await
    }

    /// POSTs a JSON body to an API path and decodes the JSON response.
    ///
    /// # Errors
    /// See [`handle_json_response`] for the failure mapping.
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.send(Method::POST, path, Some(body)).await?;
        handle_json_response(response).await
    }

    /// GETs an absolute URL outside the API (download packages). No bearer
    /// token and no overall timeout; only the connect timeout applies.
    ///
    /// # Errors
    /// Returns `NetworkUnavailable` when nothing answers, or the mapped HTTP
    /// error for non-2xx responses.
    pub async fn fetch(&self, url: &str) -> Result<Response> {
        let span = info_span!("xuper.fetch", http.method = "GET", url = %url);
        let response = self
            .client
            .get(url)
            .send()
            .instrument(span)
            .await
            .map_err(map_request_error)?;

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(error_from_response(response).await)
        }
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response> {
        let url = self.config.url(path);
        let mut builder: RequestBuilder = self
            .client
            .request(method.clone(), &url)
            .timeout(self.config.timeout);

        if let Some(body) = body {
            builder = builder.json(body);
        }

        let token = self.store.token();
        if let Some(token) = &token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token.expose_secret()));
        }

        let span = info_span!(
            "xuper.request",
            http.method = %method,
            url = %url,
            authenticated = token.is_some()
        );
        let response = builder
            .send()
            .instrument(span)
            .await
            .map_err(map_request_error)?;

        debug!(status = response.status().as_u16(), path, "response received");

        if response.status() == StatusCode::UNAUTHORIZED && token.is_some() {
            warn!(path, "stored token rejected, clearing session");
            if let Err(err) = self.store.clear() {
                warn!("failed to clear session: {err}");
            }
        }

        Ok(response)
    }
}

/// Maps transport errors. Anything that never produced a response is
/// `NetworkUnavailable`.
fn map_request_error(err: reqwest::Error) -> Error {
    if err.is_builder() {
        return Error::Config(format!("failed to build request: {err}"));
    }
    if err.is_timeout() {
        return Error::NetworkUnavailable("request timed out".to_string());
    }
    Error::NetworkUnavailable(err.to_string())
}

/// Decodes 2xx bodies; 4xx becomes `InvalidCredentials`, any other status
/// `ServerError`, each carrying the backend message.
async fn handle_json_response<T: DeserializeOwned>(response: Response) -> Result<T> {
    if response.status().is_success() {
        response
            .json::<T>()
            .await
            .map_err(|err| Error::InvalidResponse(format!("failed to decode response: {err}")))
    } else {
        Err(error_from_response(response).await)
    }
}

async fn error_from_response(response: Response) -> Error {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    error_for_status(status, &body)
}

fn error_for_status(status: StatusCode, body: &str) -> Error {
    let message = error_message(body);
    if status.is_client_error() {
        Error::InvalidCredentials(message)
    } else {
        Error::ServerError {
            status: status.as_u16(),
            message,
        }
    }
}

/// Prefers the backend's `{"message": ...}`, then the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.message)
        .map(|message| message.trim().to_string())
        .filter(|message| !message.is_empty())
        .map_or_else(|| sanitize_body(body), |message| truncate(&message))
}

/// Sanitizes HTTP error bodies for user-facing messages by trimming and truncating.
fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        truncate(trimmed)
    }
}

fn truncate(message: &str) -> String {
    message.chars().take(MAX_ERROR_CHARS).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::session::{Session, UserRecord};
    use secrecy::SecretString;
    use serde_json::{Value, json};
    use std::{net::TcpListener, time::Duration};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn api(uri: &str, store: Arc<SessionStore>) -> ApiClient {
        let config = ClientConfig::new(uri, Duration::from_secs(2), "/nonexistent").unwrap();
        ApiClient::new(config, store).unwrap()
    }

    fn signed_in_store() -> Arc<SessionStore> {
        let store = SessionStore::in_memory();
        store
            .save(&Session::new(
                SecretString::from("stored-token"),
                UserRecord::default(),
            ))
            .unwrap();
        Arc::new(store)
    }

    #[test]
    fn error_message_prefers_backend_message() {
        assert_eq!(error_message(r#"{"message":" Usuario no encontrado "}"#), "Usuario no encontrado");
        assert_eq!(error_message("  plain failure \n"), "plain failure");
        assert_eq!(error_message(r#"{"message":""}"#), r#"{"message":""}"#);
        assert_eq!(error_message(""), "Request failed.");
    }

    #[test]
    fn error_message_is_truncated() {
        let long = "x".repeat(500);
        assert_eq!(error_message(&long).len(), MAX_ERROR_CHARS);
    }

    #[test]
    fn error_for_status_splits_client_and_server_errors() {
        let err = error_for_status(StatusCode::BAD_REQUEST, r#"{"message":"bad code"}"#);
        assert!(matches!(err, Error::InvalidCredentials(ref m) if m == "bad code"));

        let err = error_for_status(StatusCode::BAD_GATEWAY, "upstream");
        assert!(matches!(err, Error::ServerError { status: 502, ref message } if message == "upstream"));
    }

    #[tokio::test]
    async fn attaches_bearer_token_when_signed_in() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/xuper/users"))
            .and(header("Authorization", "Bearer stored-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = api(&server.uri(), signed_in_store());
        let users: Value = client.get_json("/xuper/users").await.unwrap();
        assert_eq!(users, json!([]));
    }

    #[tokio::test]
    async fn unauthorized_with_token_clears_session() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/xuper/users"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Token inválido"})))
            .mount(&server)
            .await;

        let store = signed_in_store();
        let client = api(&server.uri(), store.clone());
        let result: Result<Value> = client.get_json("/xuper/users").await;

        assert!(matches!(result, Err(Error::InvalidCredentials(ref m)) if m == "Token inválido"));
        assert!(store.load().is_none());
    }

    #[tokio::test]
    async fn connection_refused_is_network_unavailable() {
        let port = match TcpListener::bind("127.0.0.1:0") {
            Ok(listener) => listener.local_addr().unwrap().port(),
            Err(_) => {
                eprintln!("Skipping test: cannot bind localhost");
                return;
            }
        };
        // listener dropped, nothing is accepting on this port now
        let client = api(&format!("http://127.0.0.1:{port}"), Arc::new(SessionStore::in_memory()));
        let result: Result<Value> = client.get_json("/api/xuper/download").await;
        assert!(matches!(result, Err(ref err) if err.is_network()));
    }

    #[tokio::test]
    async fn undecodable_success_body_is_invalid_response() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/xuper/download"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = api(&server.uri(), Arc::new(SessionStore::in_memory()));
        let result: Result<Value> = client.get_json("/api/xuper/download").await;
        assert!(matches!(result, Err(Error::InvalidResponse(_))));
    }
}
