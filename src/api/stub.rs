//! Scripted gateway for tests
//!
//! Each endpoint pops the next scripted response; an unscripted call comes
//! back as a network error so a test that forgot a script fails loudly
//! instead of hanging. Calls are recorded in order for assertions about
//! what did (and did not) reach the gateway.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::error::ApiError;
use super::types::{
    AdviceReply, ConversationRecord, LoginRequest, SignupRequest, TokenResponse, UserProfile,
    VitalsRecord, VitalsResponse, VitalsSubmission,
};
use super::{ApiResult, HealthApi};
use crate::session::TokenSlot;

#[derive(Default)]
pub(crate) struct StubApi {
    login: Mutex<VecDeque<ApiResult<TokenResponse>>>,
    signup: Mutex<VecDeque<ApiResult<()>>>,
    profile: Mutex<VecDeque<ApiResult<UserProfile>>>,
    vitals: Mutex<VecDeque<ApiResult<VitalsResponse>>>,
    advice: Mutex<VecDeque<ApiResult<AdviceReply>>>,
    vitals_history: Mutex<VecDeque<ApiResult<Vec<VitalsRecord>>>>,
    conversations: Mutex<VecDeque<ApiResult<Vec<ConversationRecord>>>>,
    calls: Mutex<Vec<&'static str>>,
    submissions: Mutex<Vec<VitalsSubmission>>,
    questions: Mutex<Vec<String>>,
    watched_slot: Mutex<Option<TokenSlot>>,
    profile_token_seen: Mutex<Option<String>>,
}

impl StubApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn script_login(&self, response: ApiResult<TokenResponse>) {
        self.login.lock().unwrap().push_back(response);
    }

    pub fn script_signup(&self, response: ApiResult<()>) {
        self.signup.lock().unwrap().push_back(response);
    }

    pub fn script_profile(&self, response: ApiResult<UserProfile>) {
        self.profile.lock().unwrap().push_back(response);
    }

    pub fn script_vitals(&self, response: ApiResult<VitalsResponse>) {
        self.vitals.lock().unwrap().push_back(response);
    }

    pub fn script_advice(&self, response: ApiResult<AdviceReply>) {
        self.advice.lock().unwrap().push_back(response);
    }

    pub fn script_vitals_history(&self, response: ApiResult<Vec<VitalsRecord>>) {
        self.vitals_history.lock().unwrap().push_back(response);
    }

    pub fn script_conversations(&self, response: ApiResult<Vec<ConversationRecord>>) {
        self.conversations.lock().unwrap().push_back(response);
    }

    /// Observe this slot at `profile()` time, so a test can assert the
    /// token was in place before the profile fetch.
    pub fn watch_slot(&self, slot: TokenSlot) {
        *self.watched_slot.lock().unwrap() = Some(slot);
    }

    pub fn token_seen_by_profile(&self) -> Option<String> {
        self.profile_token_seen.lock().unwrap().clone()
    }

    /// Method names in call order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    /// Submission bodies that reached the gateway.
    pub fn submissions(&self) -> Vec<VitalsSubmission> {
        self.submissions.lock().unwrap().clone()
    }

    /// Questions that reached the gateway.
    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().unwrap().clone()
    }

    fn record(&self, name: &'static str) {
        self.calls.lock().unwrap().push(name);
    }

    fn take<T>(queue: &Mutex<VecDeque<ApiResult<T>>>, name: &'static str) -> ApiResult<T> {
        queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::network(format!("unscripted call: {name}"))))
    }
}

#[async_trait]
impl HealthApi for StubApi {
    async fn login(&self, _req: &LoginRequest) -> ApiResult<TokenResponse> {
        self.record("login");
        Self::take(&self.login, "login")
    }

    async fn signup(&self, _req: &SignupRequest) -> ApiResult<()> {
        self.record("signup");
        Self::take(&self.signup, "signup")
    }

    async fn profile(&self) -> ApiResult<UserProfile> {
        self.record("profile");
        if let Some(slot) = self.watched_slot.lock().unwrap().as_ref() {
            *self.profile_token_seen.lock().unwrap() = slot.get();
        }
        Self::take(&self.profile, "profile")
    }

    async fn submit_vitals(&self, submission: &VitalsSubmission) -> ApiResult<VitalsResponse> {
        self.record("submit_vitals");
        self.submissions.lock().unwrap().push(submission.clone());
        Self::take(&self.vitals, "submit_vitals")
    }

    async fn request_advice(&self, question: &str) -> ApiResult<AdviceReply> {
        self.record("request_advice");
        self.questions.lock().unwrap().push(question.to_string());
        Self::take(&self.advice, "request_advice")
    }

    async fn vitals_history(&self, _limit: u32) -> ApiResult<Vec<VitalsRecord>> {
        self.record("vitals_history");
        Self::take(&self.vitals_history, "vitals_history")
    }

    async fn conversation_history(&self, _limit: u32) -> ApiResult<Vec<ConversationRecord>> {
        self.record("conversation_history");
        Self::take(&self.conversations, "conversation_history")
    }
}
