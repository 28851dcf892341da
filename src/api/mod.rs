//! Authenticated gateway to the AfyaJamii service
//!
//! One thin client over the service's REST API. Authenticated endpoints read
//! the bearer token from the session's shared [`TokenSlot`] at call time; a
//! call with no token present fails fast without touching the network. No
//! retries, no caching, no deduplication.

pub mod error;
#[cfg(test)]
pub(crate) mod stub;
pub mod types;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::ApiConfig;
use crate::session::TokenSlot;
use error::ApiError;
use types::{
    AdviceReply, AdviceRequest, ConversationRecord, LoginRequest, SignupRequest, TokenResponse,
    UserProfile, VitalsRecord, VitalsResponse, VitalsSubmission,
};

pub type ApiResult<T> = Result<T, ApiError>;

/// Everything the session manager and the flows ask of the remote service.
/// The live implementation is [`ApiClient`]; demo mode and tests substitute
/// their own.
#[async_trait]
pub trait HealthApi: Send + Sync {
    async fn login(&self, req: &LoginRequest) -> ApiResult<TokenResponse>;
    async fn signup(&self, req: &SignupRequest) -> ApiResult<()>;
    async fn profile(&self) -> ApiResult<UserProfile>;
    async fn submit_vitals(&self, submission: &VitalsSubmission) -> ApiResult<VitalsResponse>;
    async fn request_advice(&self, question: &str) -> ApiResult<AdviceReply>;
    async fn vitals_history(&self, limit: u32) -> ApiResult<Vec<VitalsRecord>>;
    async fn conversation_history(&self, limit: u32) -> ApiResult<Vec<ConversationRecord>>;
}

/// Which error mapping applies to a non-2xx response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ErrorScope {
    /// The login exchange: 401 means the credentials were wrong.
    Login,
    /// Account creation: any 4xx is a rejected signup.
    Signup,
    /// Bearer-token endpoints: 401 means the session token is dead.
    Bearer,
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: TokenSlot,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, token: TokenSlot) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            base_url: format!("{}/api/v1", config.base_url.trim_end_matches('/')),
            token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Current token or the client-side fail-fast.
    fn bearer(&self) -> ApiResult<String> {
        self.token.get().ok_or(ApiError::Unauthenticated)
    }

    /// Send a built request and decode the JSON body, mapping transport and
    /// status failures into the taxonomy.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        scope: ErrorScope,
    ) -> ApiResult<T> {
        let text = self.execute_raw(request, scope).await?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::remote_rejected(format!("unexpected response shape: {e}")))
    }

    /// Send a built request, discarding any success body.
    async fn execute_unit(
        &self,
        request: reqwest::RequestBuilder,
        scope: ErrorScope,
    ) -> ApiResult<()> {
        self.execute_raw(request, scope).await.map(|_| ())
    }

    async fn execute_raw(
        &self,
        request: reqwest::RequestBuilder,
        scope: ErrorScope,
    ) -> ApiResult<String> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::network("request timed out")
            } else if e.is_connect() {
                ApiError::network(format!("connection failed: {e}"))
            } else {
                ApiError::network(e.to_string())
            }
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::network(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            tracing::debug!(%status, scope = ?scope, "request rejected");
            return Err(classify(scope, status, extract_detail(&text, status)));
        }
        Ok(text)
    }
}

#[async_trait]
impl HealthApi for ApiClient {
    async fn login(&self, req: &LoginRequest) -> ApiResult<TokenResponse> {
        let request = self.http.post(self.url("/auth/login")).json(req);
        self.execute(request, ErrorScope::Login).await
    }

    async fn signup(&self, req: &SignupRequest) -> ApiResult<()> {
        let request = self.http.post(self.url("/auth/signup")).json(req);
        self.execute_unit(request, ErrorScope::Signup).await
    }

    async fn profile(&self) -> ApiResult<UserProfile> {
        let request = self
            .http
            .get(self.url("/auth/me"))
            .bearer_auth(self.bearer()?);
        self.execute(request, ErrorScope::Bearer).await
    }

    async fn submit_vitals(&self, submission: &VitalsSubmission) -> ApiResult<VitalsResponse> {
        let request = self
            .http
            .post(self.url("/vitals/submit"))
            .bearer_auth(self.bearer()?)
            .json(submission);
        self.execute(request, ErrorScope::Bearer).await
    }

    async fn request_advice(&self, question: &str) -> ApiResult<AdviceReply> {
        let request = self
            .http
            .post(self.url("/chat/advice"))
            .bearer_auth(self.bearer()?)
            .json(&AdviceRequest {
                question: question.to_string(),
            });
        self.execute(request, ErrorScope::Bearer).await
    }

    async fn vitals_history(&self, limit: u32) -> ApiResult<Vec<VitalsRecord>> {
        let request = self
            .http
            .get(self.url("/history/vitals"))
            .bearer_auth(self.bearer()?)
            .query(&[("limit", limit)]);
        self.execute(request, ErrorScope::Bearer).await
    }

    async fn conversation_history(&self, limit: u32) -> ApiResult<Vec<ConversationRecord>> {
        let request = self
            .http
            .get(self.url("/history/conversations"))
            .bearer_auth(self.bearer()?)
            .query(&[("limit", limit)]);
        self.execute(request, ErrorScope::Bearer).await
    }
}

/// Map a non-2xx status to the taxonomy for the given endpoint family.
fn classify(scope: ErrorScope, status: StatusCode, detail: String) -> ApiError {
    match (scope, status) {
        (ErrorScope::Login, StatusCode::UNAUTHORIZED) => ApiError::invalid_credentials(detail),
        (ErrorScope::Signup, s) if s.is_client_error() => ApiError::signup_rejected(detail),
        (ErrorScope::Bearer, StatusCode::UNAUTHORIZED) => ApiError::Unauthenticated,
        _ => ApiError::remote_rejected(detail),
    }
}

/// Pull the service's `detail` message out of an error body. Falls back to
/// the raw body text, then to the bare status, so the user always sees
/// something attributable.
fn extract_detail(body: &str, status: StatusCode) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        detail: serde_json::Value,
    }

    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        match parsed.detail {
            serde_json::Value::String(s) => return s,
            // Validation errors arrive as structured detail; show it compact.
            other => return other.to_string(),
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("request failed with HTTP {}", status.as_u16())
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_401_is_invalid_credentials() {
        let err = classify(
            ErrorScope::Login,
            StatusCode::UNAUTHORIZED,
            "Incorrect username or password".into(),
        );
        assert_eq!(
            err,
            ApiError::InvalidCredentials("Incorrect username or password".into())
        );
    }

    #[test]
    fn signup_4xx_is_rejected_but_5xx_is_remote() {
        let err = classify(
            ErrorScope::Signup,
            StatusCode::BAD_REQUEST,
            "Username already registered".into(),
        );
        assert_eq!(
            err,
            ApiError::SignupRejected("Username already registered".into())
        );

        let err = classify(
            ErrorScope::Signup,
            StatusCode::INTERNAL_SERVER_ERROR,
            "boom".into(),
        );
        assert_eq!(err, ApiError::RemoteRejected("boom".into()));
    }

    #[test]
    fn bearer_401_is_unauthenticated() {
        let err = classify(
            ErrorScope::Bearer,
            StatusCode::UNAUTHORIZED,
            "Could not validate credentials".into(),
        );
        assert_eq!(err, ApiError::Unauthenticated);
    }

    #[test]
    fn other_statuses_are_remote_rejections() {
        for scope in [ErrorScope::Login, ErrorScope::Bearer] {
            let err = classify(scope, StatusCode::UNPROCESSABLE_ENTITY, "bad vitals".into());
            assert_eq!(err, ApiError::RemoteRejected("bad vitals".into()));
        }
    }

    #[test]
    fn extract_detail_prefers_the_detail_field() {
        let body = r#"{"detail": "Incorrect username or password"}"#;
        assert_eq!(
            extract_detail(body, StatusCode::UNAUTHORIZED),
            "Incorrect username or password"
        );
    }

    #[test]
    fn extract_detail_compacts_structured_detail() {
        let body = r#"{"detail": [{"loc": ["body", "age"], "msg": "field required"}]}"#;
        let detail = extract_detail(body, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(detail.contains("field required"));
    }

    #[test]
    fn extract_detail_falls_back_to_body_then_status() {
        assert_eq!(
            extract_detail("Service Unavailable", StatusCode::SERVICE_UNAVAILABLE),
            "Service Unavailable"
        );
        assert_eq!(
            extract_detail("  ", StatusCode::BAD_GATEWAY),
            "request failed with HTTP 502"
        );
    }

    #[tokio::test]
    async fn bearer_endpoints_fail_fast_without_a_token() {
        let config = ApiConfig {
            base_url: "http://127.0.0.1:9".into(),
            timeout_secs: 1,
        };
        let client = ApiClient::new(&config, TokenSlot::default()).unwrap();
        let err = client.vitals_history(20).await.unwrap_err();
        assert_eq!(err, ApiError::Unauthenticated);
    }
}
