//! History flow
//!
//! Two read-only sub-flows, vitals submissions and past conversations,
//! fetched independently so one failing never hides the other. Both start
//! loading as soon as the flow is created; a refresh while a sub-flow is
//! already loading is a no-op.

use crate::api::types::{ConversationRecord, VitalsRecord};
use crate::api::ApiResult;
use crate::events::AppEvent;

use super::FlowContext;

/// How many records each list asks for.
pub const VITALS_WINDOW: u32 = 20;
pub const CONVERSATIONS_WINDOW: u32 = 50;

/// One sub-flow's lifecycle. `Loaded` with no records is the normal empty
/// state, not a failure.
#[derive(Debug, Clone, Default)]
pub enum FetchPhase<T> {
    #[default]
    Idle,
    Loading,
    Loaded(Vec<T>),
    Failed(String),
}

impl<T> FetchPhase<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchPhase::Loading)
    }
}

pub struct HistoryFlow {
    ctx: FlowContext,
    vitals: FetchPhase<VitalsRecord>,
    conversations: FetchPhase<ConversationRecord>,
}

impl HistoryFlow {
    /// Creation kicks off both fetches immediately.
    pub fn new(ctx: FlowContext) -> Self {
        let mut flow = Self {
            ctx,
            vitals: FetchPhase::Idle,
            conversations: FetchPhase::Idle,
        };
        flow.refresh_vitals();
        flow.refresh_conversations();
        flow
    }

    pub fn vitals(&self) -> &FetchPhase<VitalsRecord> {
        &self.vitals
    }

    pub fn conversations(&self) -> &FetchPhase<ConversationRecord> {
        &self.conversations
    }

    /// Re-run both sub-flows.
    pub fn refresh(&mut self) {
        self.refresh_vitals();
        self.refresh_conversations();
    }

    pub fn refresh_vitals(&mut self) {
        if self.vitals.is_loading() {
            return;
        }
        self.vitals = FetchPhase::Loading;
        let ctx = self.ctx.clone();
        tokio::spawn(async move {
            let result = ctx.api.vitals_history(VITALS_WINDOW).await;
            let _ = ctx
                .events
                .send(AppEvent::VitalsHistoryLoaded {
                    generation: ctx.generation,
                    result,
                })
                .await;
        });
    }

    pub fn refresh_conversations(&mut self) {
        if self.conversations.is_loading() {
            return;
        }
        self.conversations = FetchPhase::Loading;
        let ctx = self.ctx.clone();
        tokio::spawn(async move {
            let result = ctx.api.conversation_history(CONVERSATIONS_WINDOW).await;
            let _ = ctx
                .events
                .send(AppEvent::ConversationsLoaded {
                    generation: ctx.generation,
                    result,
                })
                .await;
        });
    }

    pub fn on_vitals(&mut self, result: ApiResult<Vec<VitalsRecord>>) {
        self.vitals = match result {
            Ok(records) => FetchPhase::Loaded(records),
            Err(e) => {
                let message = e.to_string();
                self.ctx
                    .notify
                    .error("History unavailable", message.clone());
                FetchPhase::Failed(message)
            }
        };
    }

    pub fn on_conversations(&mut self, result: ApiResult<Vec<ConversationRecord>>) {
        self.conversations = match result {
            Ok(records) => FetchPhase::Loaded(records),
            Err(e) => {
                let message = e.to_string();
                self.ctx
                    .notify
                    .error("History unavailable", message.clone());
                FetchPhase::Failed(message)
            }
        };
    }
}
