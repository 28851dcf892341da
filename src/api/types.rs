//! Wire types for the health service API
//!
//! Field names match the service's JSON exactly; anything the UI wants in a
//! friendlier shape gets a conversion here rather than renames on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Accounts and profiles
// ─────────────────────────────────────────────────────────────────────────────

/// Care track an account is enrolled in. Unknown wire values decode as
/// `General` rather than failing the whole profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Pregnant,
    Postnatal,
    #[default]
    #[serde(other)]
    General,
}

impl AccountType {
    pub fn all() -> &'static [AccountType] {
        &[
            AccountType::Pregnant,
            AccountType::Postnatal,
            AccountType::General,
        ]
    }

    /// Wire value, also what the signup endpoint expects.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Pregnant => "pregnant",
            AccountType::Postnatal => "postnatal",
            AccountType::General => "general",
        }
    }

    /// Human label shown in the signup selector and the dashboard header.
    pub fn label(&self) -> &'static str {
        match self {
            AccountType::Pregnant => "Pregnancy Care",
            AccountType::Postnatal => "Postnatal Care",
            AccountType::General => "General Health",
        }
    }

    pub fn next(&self) -> AccountType {
        match self {
            AccountType::Pregnant => AccountType::Postnatal,
            AccountType::Postnatal => AccountType::General,
            AccountType::General => AccountType::Pregnant,
        }
    }

    pub fn prev(&self) -> AccountType {
        match self {
            AccountType::Pregnant => AccountType::General,
            AccountType::Postnatal => AccountType::Pregnant,
            AccountType::General => AccountType::Postnatal,
        }
    }
}

/// Profile as served by `GET /auth/me` and persisted alongside the token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub account_type: AccountType,
}

impl UserProfile {
    /// Full name when the profile has one, otherwise the username.
    pub fn display_name(&self) -> &str {
        if self.full_name.trim().is_empty() {
            &self.username
        } else {
            &self.full_name
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Auth requests
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub account_type: AccountType,
    pub password: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Vitals
// ─────────────────────────────────────────────────────────────────────────────

/// Temperature unit selected on the vitals form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TempUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TempUnit {
    pub fn label(&self) -> &'static str {
        match self {
            TempUnit::Celsius => "°C",
            TempUnit::Fahrenheit => "°F",
        }
    }

    pub fn toggle(&self) -> TempUnit {
        match self {
            TempUnit::Celsius => TempUnit::Fahrenheit,
            TempUnit::Fahrenheit => TempUnit::Celsius,
        }
    }
}

/// One set of measurements, exactly as `POST /vitals/submit` wants them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VitalsPayload {
    pub age: u32,
    pub systolic_bp: u32,
    pub diastolic_bp: u32,
    /// Blood sugar, mg/dL.
    pub bs: u32,
    pub body_temp: f64,
    pub body_temp_unit: TempUnit,
    pub heart_rate: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_history: Option<String>,
}

/// Full submission body: the measurements plus the submitter's care track.
#[derive(Debug, Clone, Serialize)]
pub struct VitalsSubmission {
    pub vitals: VitalsPayload,
    pub account_type: AccountType,
}

/// Risk classification produced by the service's model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLabel {
    Low,
    Medium,
    High,
    Unknown,
}

impl RiskLabel {
    fn parse(s: &str) -> RiskLabel {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => RiskLabel::Low,
            "medium" => RiskLabel::Medium,
            "high" => RiskLabel::High,
            _ => RiskLabel::Unknown,
        }
    }

    /// Uppercased badge text.
    pub fn badge(&self) -> &'static str {
        match self {
            RiskLabel::Low => "LOW",
            RiskLabel::Medium => "MEDIUM",
            RiskLabel::High => "HIGH",
            RiskLabel::Unknown => "UNKNOWN",
        }
    }
}

// The service has emitted labels in mixed case; decode leniently and keep
// anything unrecognized as Unknown instead of rejecting the assessment.
impl<'de> Deserialize<'de> for RiskLabel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(RiskLabel::parse(&raw))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MlOutput {
    pub risk_label: RiskLabel,
    /// Probability of the predicted class, 0.0 to 1.0.
    pub probability: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmAdvice {
    pub advice: String,
}

/// Raw body of a successful `POST /vitals/submit`.
#[derive(Debug, Clone, Deserialize)]
pub struct VitalsResponse {
    pub ml_output: MlOutput,
    /// Advisory text is best-effort on the service side and can be absent.
    pub llm_advice: Option<LlmAdvice>,
}

/// What the vitals flow holds once a submission settles.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentResult {
    pub risk: RiskLabel,
    pub probability: f64,
    pub advice: Option<String>,
}

impl From<VitalsResponse> for AssessmentResult {
    fn from(resp: VitalsResponse) -> Self {
        AssessmentResult {
            risk: resp.ml_output.risk_label,
            probability: resp.ml_output.probability,
            advice: resp.llm_advice.map(|a| a.advice),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Chat
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct AdviceRequest {
    pub question: String,
}

/// Reply from `POST /chat/advice`. The timestamp is decoded leniently; an
/// absent or malformed value falls back to client time at append.
#[derive(Debug, Clone, Deserialize)]
pub struct AdviceReply {
    pub advice: String,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
    }))
}

// ─────────────────────────────────────────────────────────────────────────────
// History
// ─────────────────────────────────────────────────────────────────────────────

/// One past vitals submission with its stored assessment.
#[derive(Debug, Clone, Deserialize)]
pub struct VitalsRecord {
    pub id: i64,
    pub age: u32,
    pub systolic_bp: u32,
    pub diastolic_bp: u32,
    pub bs: u32,
    pub body_temp: f64,
    #[serde(default)]
    pub body_temp_unit: TempUnit,
    pub heart_rate: u32,
    #[serde(default)]
    pub patient_history: Option<String>,
    pub ml_risk_label: RiskLabel,
    pub ml_probability: f64,
    pub created_at: DateTime<Utc>,
}

/// One past question/answer exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct ConversationRecord {
    pub id: i64,
    pub user_message: String,
    pub ai_response: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_type_decodes_unknown_as_general() {
        let t: AccountType = serde_json::from_str("\"pregnant\"").unwrap();
        assert_eq!(t, AccountType::Pregnant);
        let t: AccountType = serde_json::from_str("\"clinician\"").unwrap();
        assert_eq!(t, AccountType::General);
    }

    #[test]
    fn account_type_cycle_covers_all_variants() {
        let mut seen = Vec::new();
        let mut t = AccountType::Pregnant;
        for _ in 0..AccountType::all().len() {
            seen.push(t);
            t = t.next();
        }
        assert_eq!(t, AccountType::Pregnant);
        for variant in AccountType::all() {
            assert!(seen.contains(variant));
        }
    }

    #[test]
    fn display_name_prefers_full_name() {
        let mut profile = UserProfile {
            id: 7,
            username: "amina".into(),
            email: "amina@example.com".into(),
            full_name: "Amina Wanjiru".into(),
            account_type: AccountType::Pregnant,
        };
        assert_eq!(profile.display_name(), "Amina Wanjiru");
        profile.full_name = "   ".into();
        assert_eq!(profile.display_name(), "amina");
    }

    #[test]
    fn risk_label_parses_any_case() {
        assert_eq!(RiskLabel::parse("LOW"), RiskLabel::Low);
        assert_eq!(RiskLabel::parse(" Medium "), RiskLabel::Medium);
        assert_eq!(RiskLabel::parse("high"), RiskLabel::High);
        assert_eq!(RiskLabel::parse("elevated"), RiskLabel::Unknown);
    }

    #[test]
    fn vitals_response_tolerates_missing_advice() {
        let body = r#"{"ml_output": {"risk_label": "High", "probability": 0.87}}"#;
        let resp: VitalsResponse = serde_json::from_str(body).unwrap();
        let result = AssessmentResult::from(resp);
        assert_eq!(result.risk, RiskLabel::High);
        assert!(result.advice.is_none());
        assert!((result.probability - 0.87).abs() < f64::EPSILON);
    }

    #[test]
    fn vitals_submission_serializes_wire_field_names() {
        let body = VitalsSubmission {
            vitals: VitalsPayload {
                age: 28,
                systolic_bp: 120,
                diastolic_bp: 80,
                bs: 95,
                body_temp: 36.6,
                body_temp_unit: TempUnit::Celsius,
                heart_rate: 72,
                patient_history: None,
            },
            account_type: AccountType::Pregnant,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["vitals"]["systolic_bp"], 120);
        assert_eq!(json["vitals"]["body_temp_unit"], "celsius");
        assert_eq!(json["account_type"], "pregnant");
        assert!(json["vitals"].get("patient_history").is_none());
    }

    #[test]
    fn advice_reply_timestamp_is_lenient() {
        let reply: AdviceReply =
            serde_json::from_str(r#"{"advice": "Rest well.", "timestamp": "2025-03-01T09:30:00Z"}"#)
                .unwrap();
        assert!(reply.timestamp.is_some());

        let reply: AdviceReply =
            serde_json::from_str(r#"{"advice": "Rest well.", "timestamp": "yesterday"}"#).unwrap();
        assert!(reply.timestamp.is_none());

        let reply: AdviceReply = serde_json::from_str(r#"{"advice": "Rest well."}"#).unwrap();
        assert!(reply.timestamp.is_none());
    }

    #[test]
    fn history_records_decode() {
        let body = r#"[{
            "id": 3, "age": 29, "systolic_bp": 118, "diastolic_bp": 76,
            "bs": 90, "body_temp": 36.8, "body_temp_unit": "celsius",
            "heart_rate": 70, "patient_history": null,
            "ml_risk_label": "low", "ml_probability": 0.93,
            "created_at": "2025-02-11T14:02:00Z"
        }]"#;
        let records: Vec<VitalsRecord> = serde_json::from_str(body).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].ml_risk_label, RiskLabel::Low);
    }
}
