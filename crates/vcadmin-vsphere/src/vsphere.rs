//! vSphere HTTP client with session-based authentication.
//!
//! Talks to vCenter through two surfaces sharing one session id:
//! the Automation REST API (`https://{host}/api/...`) and the VI/JSON
//! binding of the vim25 API (`https://{host}/sdk/vim25/{release}/...`).

use crate::error::{VmwareError, VmwareErrorKind, VmwareResult};
use crate::types::{ManagedObjectRef, VsphereConfig};
use crate::vim;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

const SESSION_HEADER: &str = "vmware-api-session-id";

/// vSphere API client.
pub struct VsphereClient {
    client: Client,
    base_url: String,
    session_id: Option<String>,
    config: VsphereConfig,
}

impl VsphereClient {
    /// Build a new client from config (does NOT create a session yet).
    pub fn new(config: &VsphereConfig) -> VmwareResult<Self> {
        let client = Client::builder()
            .danger_accept_invalid_certs(config.insecure)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| VmwareError::connection(format!("Failed to build HTTP client: {e}")))?;

        let base_url = match config.base_url {
            Some(ref url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}:{}", config.host, config.port),
        };

        Ok(Self {
            client,
            base_url,
            session_id: None,
            config: config.clone(),
        })
    }

    /// Base URL for API calls.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether we have an active session.
    pub fn is_connected(&self) -> bool {
        self.session_id.is_some()
    }

    /// Current session ID (if any).
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Current config.
    pub fn config(&self) -> &VsphereConfig {
        &self.config
    }

    // ── Session management ──────────────────────────────────────────

    /// Create a new API session (POST /api/session).
    pub async fn login(&mut self) -> VmwareResult<String> {
        let url = format!("{}/api/session", self.base_url);
        log::debug!("Opening vSphere session on {} as {}", self.base_url, self.config.username);

        let resp = self
            .client
            .post(&url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .send()
            .await?;

        if resp.status() == StatusCode::UNAUTHORIZED {
            return Err(VmwareError::auth("Invalid credentials"));
        }

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(VmwareError::api(
                status.as_u16(),
                format!("Login failed: {body}"),
            ));
        }

        // Session ID comes back as a quoted JSON string
        let session_id: String = resp.json().await.map_err(|e| {
            VmwareError::parse(format!("Failed to parse session response: {e}"))
        })?;

        self.session_id = Some(session_id.clone());
        log::info!("Connected to vCenter {}", self.config.host);
        Ok(session_id)
    }

    /// Delete the current session (DELETE /api/session).
    pub async fn logout(&mut self) -> VmwareResult<()> {
        if let Some(ref sid) = self.session_id {
            let url = format!("{}/api/session", self.base_url);
            let res = self
                .client
                .delete(&url)
                .header(SESSION_HEADER, sid.as_str())
                .send()
                .await;
            if let Err(e) = res {
                log::debug!("Logout request failed, dropping session anyway: {e}");
            }
        }
        self.session_id = None;
        Ok(())
    }

    /// Check if the session is still valid (GET /api/session).
    pub async fn check_session(&self) -> VmwareResult<bool> {
        let sid = self.require_session()?;
        let url = format!("{}/api/session", self.base_url);
        let resp = self
            .client
            .get(&url)
            .header(SESSION_HEADER, sid)
            .send()
            .await?;

        Ok(resp.status().is_success())
    }

    // ── Automation REST helpers ─────────────────────────────────────

    fn require_session(&self) -> VmwareResult<&str> {
        self.session_id
            .as_deref()
            .ok_or_else(|| VmwareError::auth("Not logged in: no active session"))
    }

    fn authed(&self, req: RequestBuilder) -> VmwareResult<RequestBuilder> {
        let sid = self.require_session()?;
        Ok(req.header(SESSION_HEADER, sid))
    }

    /// GET a JSON response with query params.
    pub async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> VmwareResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .authed(self.client.get(&url).query(params))?
            .send()
            .await?;
        let resp = Self::check_status(resp).await?;
        Self::parse_response(resp).await
    }

    // ── VI/JSON helpers ─────────────────────────────────────────────

    fn vim_url(&self, moref: &ManagedObjectRef, member: &str) -> String {
        format!(
            "{}/sdk/vim25/{}/{}/{}/{}",
            self.base_url, self.config.api_release, moref.r#type, moref.value, member
        )
    }

    /// Invoke a vim25 method on a managed object (POST .../{type}/{id}/{method}).
    pub async fn vim_invoke<T: DeserializeOwned>(
        &self,
        moref: &ManagedObjectRef,
        method: &str,
        body: Option<&serde_json::Value>,
    ) -> VmwareResult<T> {
        let url = self.vim_url(moref, method);
        log::debug!("VI/JSON {method} on {moref}");
        let mut req = self.authed(self.client.post(&url))?;
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = Self::check_status(req.send().await?).await?;
        Self::parse_response(resp).await
    }

    /// Read one property of a managed object (GET .../{type}/{id}/{property}).
    pub async fn vim_property<T: DeserializeOwned>(
        &self,
        moref: &ManagedObjectRef,
        property: &str,
    ) -> VmwareResult<T> {
        let url = self.vim_url(moref, property);
        let resp = self.authed(self.client.get(&url))?.send().await?;
        let resp = Self::check_status(resp).await?;
        Self::parse_response(resp).await
    }

    // ── Internal helpers ────────────────────────────────────────────

    async fn check_status(resp: Response) -> VmwareResult<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let code = status.as_u16();
        let body = resp.text().await.unwrap_or_default();

        // VI/JSON faults carry their type; prefer that over the status code.
        if let Ok(fault) = serde_json::from_str::<serde_json::Value>(&body) {
            if fault.get("_typeName").is_some() {
                return Err(vim::fault_to_error(&fault, None));
            }
        }

        match status {
            StatusCode::UNAUTHORIZED => Err(VmwareError::auth(format!("Session expired or invalid: {body}"))),
            StatusCode::FORBIDDEN => Err(VmwareError::new(
                VmwareErrorKind::AccessDenied,
                format!("Access denied: {body}"),
            )),
            StatusCode::NOT_FOUND => Err(VmwareError::not_found(format!("Resource not found: {body}"))),
            _ => Err(VmwareError::api(code, format!("API error {code}: {body}"))),
        }
    }

    async fn parse_response<T: DeserializeOwned>(resp: Response) -> VmwareResult<T> {
        let text = resp.text().await.map_err(|e| {
            VmwareError::parse(format!("Failed to read response body: {e}"))
        })?;

        if text.is_empty() {
            // void methods (DestroyView, ...) answer 204 with no body
            return serde_json::from_str("null").map_err(|e| {
                VmwareError::parse(format!("Cannot deserialise empty response: {e}"))
            });
        }

        serde_json::from_str(&text).map_err(|e| {
            let snippet: String = text.chars().take(500).collect();
            VmwareError::parse(format!("JSON parse error: {e}; body: {snippet}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::{config_for, connected_client, serve, SESSION_ID};
    use crate::types::DatacenterSummary;
    use axum::http::HeaderMap;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};

    const CREATE_DC: &str = "/sdk/vim25/8.0.1.0/Folder/group-d1/CreateDatacenter";

    async fn error_for_status(status: StatusCode) -> VmwareError {
        let routes = Router::new().route(
            "/api/vcenter/cluster",
            get(move || async move { (status, "rejected") }),
        );
        let client = connected_client(routes).await;
        client
            .get_with_params::<Value>("/api/vcenter/cluster", &[("names", "Prod")])
            .await
            .unwrap_err()
    }

    #[tokio::test]
    async fn login_keeps_the_session_id() {
        let client = connected_client(Router::new()).await;
        assert!(client.is_connected());
        assert_eq!(client.session_id(), Some(SESSION_ID));
        assert!(client.check_session().await.unwrap());
    }

    #[tokio::test]
    async fn rejected_login_is_an_auth_error() {
        let base = serve(Router::new().route(
            "/api/session",
            post(|| async { StatusCode::UNAUTHORIZED }),
        ))
        .await;
        let mut client = VsphereClient::new(&config_for(base)).unwrap();

        let e = client.login().await.unwrap_err();
        assert_eq!(e.kind, VmwareErrorKind::AuthenticationError);
        assert!(!client.is_connected());
    }

    #[tokio::test]
    async fn status_codes_map_to_kinds() {
        assert_eq!(
            error_for_status(StatusCode::UNAUTHORIZED).await.kind,
            VmwareErrorKind::AuthenticationError
        );
        assert_eq!(
            error_for_status(StatusCode::FORBIDDEN).await.kind,
            VmwareErrorKind::AccessDenied
        );
        assert_eq!(
            error_for_status(StatusCode::NOT_FOUND).await.kind,
            VmwareErrorKind::NotFound
        );
        assert_eq!(
            error_for_status(StatusCode::BAD_GATEWAY).await.kind,
            VmwareErrorKind::ApiError(502)
        );
    }

    #[tokio::test]
    async fn vim_fault_body_wins_over_status() {
        let routes = Router::new().route(
            CREATE_DC,
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "_typeName": "DuplicateName",
                        "name": "DC1",
                        "faultMessage": [{"key": "x", "message": "The name 'DC1' already exists."}]
                    })),
                )
            }),
        );
        let client = connected_client(routes).await;

        let e = client
            .vim_invoke::<ManagedObjectRef>(
                &ManagedObjectRef::new("Folder", "group-d1"),
                "CreateDatacenter",
                Some(&json!({ "name": "DC1" })),
            )
            .await
            .unwrap_err();
        assert_eq!(e.kind, VmwareErrorKind::NameCollision);
        assert!(e.message.contains("already exists"));
    }

    #[tokio::test]
    async fn empty_body_parses_as_null() {
        let routes = Router::new().route(
            "/sdk/vim25/8.0.1.0/ContainerView/cv-1/DestroyView",
            post(|| async { StatusCode::NO_CONTENT }),
        );
        let client = connected_client(routes).await;
        let view = ManagedObjectRef::new("ContainerView", "cv-1");

        let v: Value = client.vim_invoke(&view, "DestroyView", None).await.unwrap();
        assert_eq!(v, Value::Null);
        client.vim_invoke::<()>(&view, "DestroyView", None).await.unwrap();
    }

    #[tokio::test]
    async fn rest_calls_carry_the_session_header() {
        let routes = Router::new().route(
            "/api/vcenter/datacenter",
            get(|headers: HeaderMap| async move {
                let sid = headers.get(SESSION_HEADER).and_then(|v| v.to_str().ok());
                if sid == Some(SESSION_ID) {
                    (
                        StatusCode::OK,
                        Json(json!([{ "datacenter": "datacenter-21", "name": "DC1" }])),
                    )
                } else {
                    (StatusCode::UNAUTHORIZED, Json(Value::Null))
                }
            }),
        );
        let client = connected_client(routes).await;

        let found: Vec<DatacenterSummary> = client
            .get_with_params("/api/vcenter/datacenter", &[("names", "DC1")])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].datacenter, "datacenter-21");
    }

    #[tokio::test]
    async fn garbage_body_is_a_parse_error() {
        let routes = Router::new().route("/api/vcenter/host", get(|| async { "<html>" }));
        let client = connected_client(routes).await;
        let e = client
            .get_with_params::<Value>("/api/vcenter/host", &[])
            .await
            .unwrap_err();
        assert_eq!(e.kind, VmwareErrorKind::ParseError);
    }
}
