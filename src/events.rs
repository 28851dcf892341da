//! App events
//!
//! Everything that happens off the main task comes back through one mpsc
//! channel as an `AppEvent`. Flow completions carry the dashboard
//! generation they belong to; the event loop discards events whose
//! generation no longer matches (the controller that asked was torn down by
//! a logout).

use crate::api::types::{
    AdviceReply, ConversationRecord, UserProfile, VitalsRecord, VitalsResponse,
};
use crate::api::ApiResult;
use crate::notify::Notification;

#[derive(Debug)]
pub enum AppEvent {
    /// Login call finished (auth screen).
    LoginFinished(ApiResult<UserProfile>),
    /// Signup plus auto-login finished (auth screen).
    SignupFinished(ApiResult<UserProfile>),
    /// A vitals submission settled.
    VitalsSettled {
        generation: u64,
        result: ApiResult<VitalsResponse>,
    },
    /// The assistant replied (or failed to).
    AdviceArrived {
        generation: u64,
        result: ApiResult<AdviceReply>,
    },
    /// Vitals history fetch finished.
    VitalsHistoryLoaded {
        generation: u64,
        result: ApiResult<Vec<VitalsRecord>>,
    },
    /// Conversation history fetch finished.
    ConversationsLoaded {
        generation: u64,
        result: ApiResult<Vec<ConversationRecord>>,
    },
    /// A notification for the toast overlay.
    Notice(Notification),
}
