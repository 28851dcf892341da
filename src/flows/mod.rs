//! Flow controllers
//!
//! Per-view state machines owned by the dashboard. They transition either
//! synchronously (validation, optimistic appends) or when the event loop
//! routes a completion event back to them; nothing here is locked or
//! shared across tasks. Spawned gateway calls communicate only by sending
//! an `AppEvent` tagged with the generation the flow was created under.

pub mod chat;
pub mod history;
pub mod vitals;

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::api::HealthApi;
use crate::events::AppEvent;
use crate::notify::Notifier;

/// What every flow needs: the gateway, the way back onto the main task,
/// the notification sink, and the generation its completions belong to.
#[derive(Clone)]
pub struct FlowContext {
    pub api: Arc<dyn HealthApi>,
    pub events: mpsc::Sender<AppEvent>,
    pub notify: Notifier,
    pub generation: u64,
}
