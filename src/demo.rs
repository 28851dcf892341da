//! Demo mode - built-in stub service
//!
//! `--demo` (or `AFYA_DEMO=1`) swaps the HTTP gateway for this in-process
//! implementation of the same trait: any credentials are accepted, the
//! assessment is derived from the submitted measurements, and history comes
//! back pre-populated. Small artificial latencies keep the loading states
//! visible so the whole UI can be exercised with no network at all.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};

use crate::api::error::ApiError;
use crate::api::types::{
    AccountType, AdviceReply, ConversationRecord, LoginRequest, RiskLabel, SignupRequest,
    TokenResponse, UserProfile, VitalsRecord, VitalsResponse,
};
use crate::api::{ApiResult, HealthApi};

const DEMO_TOKEN: &str = "demo-session-token";

/// How long a "network" call takes. Long enough to see the spinners,
/// short enough not to annoy.
const LATENCY: Duration = Duration::from_millis(600);

pub struct DemoApi {
    /// Username from the last login, so the profile greets the right person.
    signed_in: Mutex<Option<String>>,
    /// Account type captured at signup, if the session came from one.
    account_type: Mutex<AccountType>,
}

impl DemoApi {
    pub fn new() -> Self {
        Self {
            signed_in: Mutex::new(None),
            account_type: Mutex::new(AccountType::Pregnant),
        }
    }

    fn username(&self) -> String {
        self.signed_in
            .lock()
            .ok()
            .and_then(|guard| guard.clone())
            .unwrap_or_else(|| "guest".to_string())
    }
}

impl Default for DemoApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HealthApi for DemoApi {
    async fn login(&self, req: &LoginRequest) -> ApiResult<TokenResponse> {
        tokio::time::sleep(LATENCY).await;
        if req.username.trim().is_empty() {
            return Err(ApiError::invalid_credentials("Incorrect username or password"));
        }
        if let Ok(mut guard) = self.signed_in.lock() {
            *guard = Some(req.username.clone());
        }
        Ok(TokenResponse {
            access_token: DEMO_TOKEN.to_string(),
        })
    }

    async fn signup(&self, req: &SignupRequest) -> ApiResult<()> {
        tokio::time::sleep(LATENCY).await;
        if req.username.eq_ignore_ascii_case("taken") {
            return Err(ApiError::signup_rejected("Username already registered"));
        }
        if let Ok(mut guard) = self.account_type.lock() {
            *guard = req.account_type;
        }
        Ok(())
    }

    async fn profile(&self) -> ApiResult<UserProfile> {
        tokio::time::sleep(LATENCY / 2).await;
        let username = self.username();
        let account_type = self.account_type.lock().map(|g| *g).unwrap_or_default();
        Ok(UserProfile {
            id: 1001,
            email: format!("{username}@example.com"),
            full_name: titlecase(&username),
            username,
            account_type,
        })
    }

    async fn submit_vitals(
        &self,
        submission: &crate::api::types::VitalsSubmission,
    ) -> ApiResult<VitalsResponse> {
        tokio::time::sleep(LATENCY).await;
        let vitals = &submission.vitals;

        // Crude rule-of-thumb scoring, enough to make the result panel react
        // to what was typed.
        let mut flags = 0;
        if vitals.systolic_bp >= 140 || vitals.diastolic_bp >= 90 {
            flags += 1;
        }
        if vitals.bs >= 140 {
            flags += 1;
        }
        if vitals.heart_rate >= 110 {
            flags += 1;
        }
        let (label, probability, advice) = match flags {
            0 => (
                "low",
                0.91,
                "Your vitals look within normal ranges. Keep up regular checkups, \
                 stay hydrated, and maintain a balanced diet.",
            ),
            1 => (
                "medium",
                0.74,
                "One of your measurements is elevated. Monitor it over the next few \
                 days and consider discussing it at your next clinic visit.",
            ),
            _ => (
                "high",
                0.88,
                "Several measurements are outside the expected range. Please contact \
                 your healthcare provider promptly for a proper evaluation.",
            ),
        };

        serde_json::from_value(serde_json::json!({
            "ml_output": {"risk_label": label, "probability": probability},
            "llm_advice": {"advice": advice},
        }))
        .map_err(|e| ApiError::remote_rejected(e.to_string()))
    }

    async fn request_advice(&self, question: &str) -> ApiResult<AdviceReply> {
        tokio::time::sleep(LATENCY).await;
        Ok(AdviceReply {
            advice: format!(
                "Thanks for asking about \"{}\". In demo mode I can only offer general \
                 guidance: rest well, stay hydrated, and bring this question to your \
                 next clinic visit for personalized advice.",
                crate::util::preview(question, 80)
            ),
            timestamp: Some(Utc::now()),
        })
    }

    async fn vitals_history(&self, limit: u32) -> ApiResult<Vec<VitalsRecord>> {
        tokio::time::sleep(LATENCY).await;
        let now = Utc::now();
        let samples = [
            (118, 76, 92, 36.7, 74, "low", 0.93),
            (126, 82, 101, 36.9, 79, "low", 0.88),
            (143, 91, 138, 37.1, 88, "medium", 0.71),
            (131, 85, 110, 36.8, 81, "low", 0.84),
        ];
        let count = samples.len();
        Ok(samples
            .iter()
            .take(limit as usize)
            .enumerate()
            .map(|(i, &(sys, dia, bs, temp, hr, label, prob))| VitalsRecord {
                id: (i + 1) as i64,
                age: 28,
                systolic_bp: sys,
                diastolic_bp: dia,
                bs,
                body_temp: temp,
                body_temp_unit: Default::default(),
                heart_rate: hr,
                patient_history: None,
                ml_risk_label: parse_label(label),
                ml_probability: prob,
                created_at: now - ChronoDuration::days((count - i) as i64),
            })
            .collect())
    }

    async fn conversation_history(&self, limit: u32) -> ApiResult<Vec<ConversationRecord>> {
        tokio::time::sleep(LATENCY).await;
        let now = Utc::now();
        let samples = [
            (
                "Is light exercise safe during the second trimester?",
                "Generally yes - walking, swimming and prenatal yoga are good options. \
                 Avoid contact sports and always check with your provider first.",
            ),
            (
                "How much water should I drink per day?",
                "Aim for roughly 8 to 12 cups daily. More if you are active or the \
                 weather is hot.",
            ),
            (
                "My feet are swollen in the evening, is that normal?",
                "Mild swelling late in the day is common. Sudden or severe swelling, \
                 especially with headaches, should be reported to your provider.",
            ),
        ];
        let count = samples.len();
        Ok(samples
            .iter()
            .take(limit as usize)
            .enumerate()
            .map(|(i, &(question, answer))| ConversationRecord {
                id: (i + 1) as i64,
                user_message: question.to_string(),
                ai_response: answer.to_string(),
                created_at: now - ChronoDuration::days((count - i) as i64),
            })
            .collect())
    }
}

fn parse_label(s: &str) -> RiskLabel {
    serde_json::from_value(serde_json::Value::String(s.to_string())).unwrap_or(RiskLabel::Unknown)
}

/// "amina wanjiru" -> "Amina Wanjiru" for the demo profile's full name.
fn titlecase(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{TempUnit, VitalsPayload, VitalsSubmission};

    fn submission(systolic: u32, bs: u32) -> VitalsSubmission {
        VitalsSubmission {
            vitals: VitalsPayload {
                age: 28,
                systolic_bp: systolic,
                diastolic_bp: 80,
                bs,
                body_temp: 36.6,
                body_temp_unit: TempUnit::Celsius,
                heart_rate: 72,
                patient_history: None,
            },
            account_type: AccountType::Pregnant,
        }
    }

    #[tokio::test]
    async fn any_credentials_sign_in_and_shape_the_profile() {
        let api = DemoApi::new();
        api.login(&LoginRequest {
            username: "amina wanjiru".into(),
            password: "whatever".into(),
        })
        .await
        .unwrap();

        let profile = api.profile().await.unwrap();
        assert_eq!(profile.username, "amina wanjiru");
        assert_eq!(profile.full_name, "Amina Wanjiru");
    }

    #[tokio::test]
    async fn assessment_tracks_the_measurements() {
        let api = DemoApi::new();

        let calm = api.submit_vitals(&submission(118, 92)).await.unwrap();
        assert_eq!(calm.ml_output.risk_label, RiskLabel::Low);

        let worrying = api.submit_vitals(&submission(150, 180)).await.unwrap();
        assert_eq!(worrying.ml_output.risk_label, RiskLabel::High);
    }

    #[tokio::test]
    async fn history_respects_the_window() {
        let api = DemoApi::new();
        let records = api.vitals_history(2).await.unwrap();
        assert_eq!(records.len(), 2);
        let conversations = api.conversation_history(50).await.unwrap();
        assert!(!conversations.is_empty());
    }

    #[tokio::test]
    async fn taken_username_is_rejected_at_signup() {
        let api = DemoApi::new();
        let err = api
            .signup(&SignupRequest {
                username: "taken".into(),
                email: "t@example.com".into(),
                full_name: "Taken".into(),
                account_type: AccountType::General,
                password: "secret1".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::SignupRejected(_)));
    }
}
