//! API client for the procurement backend.
//!
//! `ApiClient` builds JSON requests against the configured base URL,
//! attaches the session's bearer token, and turns non-success statuses into
//! `ApiError`. A 401 ends the session before the error reaches the caller.

use std::sync::Arc;

use reqwest::{header, Client, Method, Request};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use super::ApiError;
use crate::auth::{Notifier, Session};
use crate::config::Config;

/// Message shown to the user when the server rejects the session
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please login again.";

const JSON_CONTENT_TYPE: &str = "application/json";

/// What to do when the server answers 401
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OnUnauthorized {
    /// Notify, clear the session, and navigate to the entry route
    ForceLogout,
    /// Hand the 401 back untouched (login and registration, where a 401
    /// means bad credentials rather than an expired session)
    PassThrough,
}

/// API client for the procurement backend.
/// Clone is cheap - the connection pool and session are shared.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Arc<Session>,
    notifier: Arc<dyn Notifier>,
}

impl ApiClient {
    /// Create a client using the configured base URL and timeout
    pub fn new(
        config: &Config,
        session: Arc<Session>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.request_timeout()).build()?;
        Ok(Self::with_client(client, config.api_base_url(), session, notifier))
    }

    pub fn with_client(
        client: Client,
        base_url: impl Into<String>,
        session: Arc<Session>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            session,
            notifier,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Build the request for `method` and `endpoint` without sending it.
    ///
    /// The endpoint is appended to the base URL as-is. A body is only
    /// attached for POST and PUT; GET and DELETE drop it.
    pub fn build_request<B>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<Request, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        let carries_body = method == Method::POST || method == Method::PUT;

        let mut builder = self
            .client
            .request(method, &url)
            .header(header::CONTENT_TYPE, JSON_CONTENT_TYPE)
            .header(header::ACCEPT, JSON_CONTENT_TYPE);

        if let Some(token) = self.session.get_token() {
            builder = builder.bearer_auth(token);
        }

        if let Some(body) = body.filter(|_| carries_body) {
            builder = builder.body(serde_json::to_vec(body)?);
        }

        Ok(builder.build()?)
    }

    /// Send a request and parse the JSON response.
    ///
    /// On 401 the user is notified and the session is logged out; the
    /// caller still receives `ApiError::Unauthorized`. Every other failure
    /// is returned unchanged. No retries.
    pub async fn request<T, B>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.dispatch(method, endpoint, body, OnUnauthorized::ForceLogout)
            .await
    }

    pub(crate) async fn dispatch<T, B>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
        on_unauthorized: OnUnauthorized,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.build_request(method.clone(), endpoint, body)?;
        debug!(%method, endpoint, "Sending request");

        let response = self.client.execute(request).await?;
        let status = response.status();

        if status.is_success() {
            let text = response.text().await?;
            let text = if text.trim().is_empty() { "null" } else { text.as_str() };
            return serde_json::from_str(text).map_err(|e| {
                ApiError::InvalidResponse(format!(
                    "Failed to parse JSON response from {}: {}",
                    endpoint, e
                ))
            });
        }

        let body = response.text().await.unwrap_or_default();
        let error = ApiError::from_status(status, &body);
        debug!(%method, endpoint, %status, "Request failed");

        if error.is_unauthorized() && on_unauthorized == OnUnauthorized::ForceLogout {
            self.expire_session();
        }

        Err(error)
    }

    fn expire_session(&self) {
        warn!("Server rejected the session token, logging out");
        self.notifier.error(SESSION_EXPIRED_MESSAGE);
        if let Err(e) = self.session.logout() {
            warn!(error = %e, "Failed to clear session storage");
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.request(Method::GET, endpoint, None::<&()>).await
    }

    pub async fn post<T, B>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, endpoint, Some(body)).await
    }

    pub async fn put<T, B>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, endpoint, Some(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.request(Method::DELETE, endpoint, None::<&()>).await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve exactly one HTTP response on a local port.
    ///
    /// Returns the base URL to point a client at and a handle resolving to
    /// the raw request text the server received.
    pub async fn respond_once(status: u16, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let body = body.to_string();

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let raw = read_request(&mut stream).await;

            let response = format!(
                "HTTP/1.1 {} Test\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.ok();
            raw
        });

        (format!("http://{}/api", addr), handle)
    }

    async fn read_request(stream: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf);
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}
