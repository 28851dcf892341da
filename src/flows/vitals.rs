//! Vitals submission flow
//!
//! Owns the input form and the `idle → submitting → settled | failed`
//! machine. Validation happens locally before anything is spawned; a
//! rejected form never reaches the gateway. On success the form resets to
//! its zero defaults, on failure it keeps what the user typed.

use crate::api::types::{
    AccountType, AssessmentResult, TempUnit, VitalsPayload, VitalsResponse, VitalsSubmission,
};
use crate::api::ApiResult;
use crate::events::AppEvent;

use super::FlowContext;

/// Raw text buffers as edited in the TUI, plus the unit selector. Empty
/// buffers are the zero-valued defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VitalsForm {
    pub age: String,
    pub heart_rate: String,
    pub systolic_bp: String,
    pub diastolic_bp: String,
    pub blood_sugar: String,
    pub body_temp: String,
    pub unit: TempUnit,
    pub patient_history: String,
}

impl VitalsForm {
    /// Validate every field and produce the wire payload. The first
    /// violation wins; the message names the field and its bounds.
    pub fn parse(&self) -> Result<VitalsPayload, String> {
        let age = parse_int_field("Age", &self.age, 1, 120)?;
        let heart_rate = parse_int_field("Heart rate", &self.heart_rate, 30, 220)?;
        let systolic_bp = parse_int_field("Systolic BP", &self.systolic_bp, 70, 250)?;
        let diastolic_bp = parse_int_field("Diastolic BP", &self.diastolic_bp, 40, 150)?;
        let bs = parse_int_field("Blood sugar", &self.blood_sugar, 30, 600)?;

        // Plausible body temperature depends on the selected unit.
        let (temp_min, temp_max) = match self.unit {
            TempUnit::Celsius => (30.0, 45.0),
            TempUnit::Fahrenheit => (86.0, 113.0),
        };
        let body_temp = parse_float_field("Body temperature", &self.body_temp, temp_min, temp_max)?;

        let history = self.patient_history.trim();
        Ok(VitalsPayload {
            age,
            systolic_bp,
            diastolic_bp,
            bs,
            body_temp,
            body_temp_unit: self.unit,
            heart_rate,
            patient_history: (!history.is_empty()).then(|| history.to_string()),
        })
    }
}

fn parse_int_field(label: &str, raw: &str, min: u32, max: u32) -> Result<u32, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(format!("{label} is required"));
    }
    let value: u32 = raw
        .parse()
        .map_err(|_| format!("{label} must be a whole number"))?;
    if !(min..=max).contains(&value) {
        return Err(format!("{label} must be between {min} and {max}"));
    }
    Ok(value)
}

fn parse_float_field(label: &str, raw: &str, min: f64, max: f64) -> Result<f64, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(format!("{label} is required"));
    }
    let value: f64 = raw
        .parse()
        .map_err(|_| format!("{label} must be a number"))?;
    if !(min..=max).contains(&value) {
        return Err(format!("{label} must be between {min} and {max}"));
    }
    Ok(value)
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum VitalsPhase {
    #[default]
    Idle,
    Submitting,
    Settled(AssessmentResult),
    Failed(String),
}

pub struct VitalsFlow {
    ctx: FlowContext,
    account_type: AccountType,
    pub form: VitalsForm,
    phase: VitalsPhase,
    form_error: Option<String>,
}

impl VitalsFlow {
    pub fn new(ctx: FlowContext, account_type: AccountType) -> Self {
        Self {
            ctx,
            account_type,
            form: VitalsForm::default(),
            phase: VitalsPhase::Idle,
            form_error: None,
        }
    }

    pub fn phase(&self) -> &VitalsPhase {
        &self.phase
    }

    pub fn form_error(&self) -> Option<&str> {
        self.form_error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == VitalsPhase::Submitting
    }

    /// Validate and, if the form passes, spawn the submission. A second
    /// call while one is in flight is a no-op (the UI also disables the
    /// submit action, this guard is the controller's own).
    pub fn submit(&mut self) {
        if self.is_submitting() {
            return;
        }
        self.form_error = None;

        let payload = match self.form.parse() {
            Ok(payload) => payload,
            Err(message) => {
                self.form_error = Some(message);
                return;
            }
        };

        self.phase = VitalsPhase::Submitting;
        let submission = VitalsSubmission {
            vitals: payload,
            account_type: self.account_type,
        };
        let ctx = self.ctx.clone();
        tokio::spawn(async move {
            let result = ctx.api.submit_vitals(&submission).await;
            let _ = ctx
                .events
                .send(AppEvent::VitalsSettled {
                    generation: ctx.generation,
                    result,
                })
                .await;
        });
    }

    /// Route the completion back in. Success resets the form; failure
    /// keeps the entered values for correction.
    pub fn on_settled(&mut self, result: ApiResult<VitalsResponse>) {
        match result {
            Ok(response) => {
                self.phase = VitalsPhase::Settled(response.into());
                self.form = VitalsForm::default();
                self.ctx.notify.success(
                    "Vitals submitted",
                    "Your measurements were analyzed successfully.",
                );
            }
            Err(e) => {
                let message = e.to_string();
                self.ctx.notify.error("Submission failed", message.clone());
                self.phase = VitalsPhase::Failed(message);
            }
        }
    }

    pub fn toggle_unit(&mut self) {
        self.form.unit = self.form.unit.toggle();
    }
}
