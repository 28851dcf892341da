//! Advisory chat flow
//!
//! An append-only message log. User messages are echoed optimistically
//! before the gateway call is spawned and are never rolled back; a failed
//! request appends a fallback assistant reply instead of surfacing a bare
//! error bubble.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};

use crate::api::types::AdviceReply;
use crate::api::ApiResult;
use crate::events::AppEvent;

use super::FlowContext;

/// Shown as the assistant's reply when the advice call fails.
const FALLBACK_REPLY: &str = "I apologize, but I'm having trouble responding right now. \
Please make sure you have submitted your vitals data first, then try asking your question again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: String,
    pub text: String,
    pub origin: Origin,
    pub timestamp: DateTime<Utc>,
}

/// Unique within the process: wall-clock millis plus a counter for bursts.
fn next_message_id() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let count = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}", Utc::now().timestamp_millis(), count)
}

pub struct ChatFlow {
    ctx: FlowContext,
    messages: Vec<ChatMessage>,
    busy: bool,
    error: Option<String>,
}

impl ChatFlow {
    /// Seeds the log with the assistant's greeting, addressed to whoever
    /// signed in.
    pub fn new(ctx: FlowContext, display_name: &str) -> Self {
        let welcome = format!(
            "Hello {display_name}! I'm your AI healthcare assistant. I can help you \
             understand your health data, provide personalized recommendations, and \
             answer questions about your wellbeing. How can I assist you today?"
        );
        let mut flow = Self {
            ctx,
            messages: Vec::new(),
            busy: false,
            error: None,
        };
        flow.push(Origin::Assistant, welcome, Utc::now());
        flow
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Append the user's message and spawn the advice request. Blank input
    /// and sends while a reply is pending are no-ops.
    pub fn send(&mut self, text: &str) {
        let question = text.trim();
        if question.is_empty() || self.busy {
            return;
        }

        self.error = None;
        self.push(Origin::User, question.to_string(), Utc::now());
        self.busy = true;

        let question = question.to_string();
        let ctx = self.ctx.clone();
        tokio::spawn(async move {
            let result = ctx.api.request_advice(&question).await;
            let _ = ctx
                .events
                .send(AppEvent::AdviceArrived {
                    generation: ctx.generation,
                    result,
                })
                .await;
        });
    }

    /// Route the reply back in. The optimistic user message stays either
    /// way.
    pub fn on_reply(&mut self, result: ApiResult<AdviceReply>) {
        self.busy = false;
        match result {
            Ok(reply) => {
                let timestamp = reply.timestamp.unwrap_or_else(Utc::now);
                self.push(Origin::Assistant, reply.advice, timestamp);
            }
            Err(e) => {
                let message = e.to_string();
                self.ctx.notify.error("Chat error", message.clone());
                self.error = Some(message);
                self.push(Origin::Assistant, FALLBACK_REPLY.to_string(), Utc::now());
            }
        }
    }

    fn push(&mut self, origin: Origin, text: String, timestamp: DateTime<Utc>) {
        self.messages.push(ChatMessage {
            id: next_message_id(),
            text,
            origin,
            timestamp,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::ApiError;
    use crate::api::stub::StubApi;
    use crate::notify::{Notifier, Severity};
    use std::sync::Arc;
    use tokio::sync::mpsc;

    fn context(api: Arc<StubApi>) -> (FlowContext, mpsc::Receiver<AppEvent>) {
        let (tx, rx) = mpsc::channel(16);
        let ctx = FlowContext {
            api,
            events: tx.clone(),
            notify: Notifier::new(tx),
            generation: 1,
        };
        (ctx, rx)
    }

    fn reply(advice: &str) -> AdviceReply {
        serde_json::from_value(serde_json::json!({
            "advice": advice,
            "timestamp": "2025-03-01T09:30:00Z"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn log_opens_with_a_personal_greeting() {
        let api = StubApi::new();
        let (ctx, _rx) = context(api);
        let flow = ChatFlow::new(ctx, "Amina Wanjiru");

        assert_eq!(flow.messages().len(), 1);
        let welcome = &flow.messages()[0];
        assert_eq!(welcome.origin, Origin::Assistant);
        assert!(welcome.text.starts_with("Hello Amina Wanjiru!"));
    }

    #[tokio::test]
    async fn blank_input_is_ignored() {
        let api = StubApi::new();
        let (ctx, _rx) = context(api.clone());
        let mut flow = ChatFlow::new(ctx, "Amina");

        flow.send("   ");

        assert_eq!(flow.messages().len(), 1);
        assert!(!flow.is_busy());
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn send_echoes_optimistically_and_trims_the_question() {
        let api = StubApi::new();
        api.script_advice(Ok(reply("Drink plenty of water.")));
        let (ctx, mut rx) = context(api.clone());
        let mut flow = ChatFlow::new(ctx, "Amina");

        flow.send("  Is my blood pressure normal?  ");

        // Echo happened before any reply arrived.
        assert!(flow.is_busy());
        assert_eq!(flow.messages().len(), 2);
        assert_eq!(flow.messages()[1].origin, Origin::User);
        assert_eq!(flow.messages()[1].text, "Is my blood pressure normal?");

        let result = match rx.recv().await.unwrap() {
            AppEvent::AdviceArrived { result, .. } => result,
            other => panic!("unexpected event: {other:?}"),
        };
        flow.on_reply(result);

        assert!(!flow.is_busy());
        assert_eq!(flow.messages().len(), 3);
        assert_eq!(flow.messages()[2].origin, Origin::Assistant);
        assert_eq!(flow.messages()[2].text, "Drink plenty of water.");
        // Server timestamp, not client time.
        assert_eq!(
            flow.messages()[2].timestamp.to_rfc3339(),
            "2025-03-01T09:30:00+00:00"
        );
        assert_eq!(api.questions(), vec!["Is my blood pressure normal?"]);
    }

    #[tokio::test]
    async fn send_while_waiting_is_a_no_op() {
        let api = StubApi::new();
        api.script_advice(Ok(reply("One at a time.")));
        let (ctx, mut rx) = context(api.clone());
        let mut flow = ChatFlow::new(ctx, "Amina");

        flow.send("first");
        flow.send("second");

        let _ = rx.recv().await.unwrap();
        assert_eq!(api.questions(), vec!["first"]);
        // Only the welcome and the first echo made it into the log.
        assert_eq!(flow.messages().len(), 2);
    }

    #[tokio::test]
    async fn failure_appends_the_fallback_reply_and_keeps_the_echo() {
        let api = StubApi::new();
        api.script_advice(Err(ApiError::network("connection failed")));
        let (ctx, mut rx) = context(api);
        let mut flow = ChatFlow::new(ctx, "Amina");

        flow.send("Am I okay?");
        let result = match rx.recv().await.unwrap() {
            AppEvent::AdviceArrived { result, .. } => result,
            other => panic!("unexpected event: {other:?}"),
        };
        flow.on_reply(result);

        assert!(!flow.is_busy());
        assert!(flow.error().unwrap().contains("connection failed"));
        assert_eq!(flow.messages().len(), 3);
        assert_eq!(flow.messages()[1].text, "Am I okay?");
        assert!(flow.messages()[2]
            .text
            .starts_with("I apologize, but I'm having trouble responding"));

        match rx.recv().await.unwrap() {
            AppEvent::Notice(n) => assert_eq!(n.severity, Severity::Error),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn a_good_reply_clears_the_previous_error() {
        let api = StubApi::new();
        api.script_advice(Err(ApiError::network("flaky")));
        api.script_advice(Ok(reply("Better now.")));
        let (ctx, mut rx) = context(api);
        let mut flow = ChatFlow::new(ctx, "Amina");

        for question in ["one", "two"] {
            flow.send(question);
            let result = match rx.recv().await.unwrap() {
                AppEvent::AdviceArrived { result, .. } => result,
                AppEvent::Notice(_) => match rx.recv().await.unwrap() {
                    AppEvent::AdviceArrived { result, .. } => result,
                    other => panic!("unexpected event: {other:?}"),
                },
                other => panic!("unexpected event: {other:?}"),
            };
            flow.on_reply(result);
        }

        assert!(flow.error().is_none());
        // welcome + two echoes + fallback + real reply
        assert_eq!(flow.messages().len(), 5);
    }

    #[test]
    fn message_ids_are_unique() {
        let mut ids: Vec<String> = (0..64).map(|_| next_message_id()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 64);
    }
}
