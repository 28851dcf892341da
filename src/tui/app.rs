//! Application state and event handling
//!
//! One `App` owns everything on screen: the auth form or the dashboard, the
//! toast stack, the log pane toggle, and the generation counter that ties
//! flow completions to the dashboard that spawned them. All mutation happens
//! on the main task; spawned work comes back through the event channel.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;

use crate::api::types::{AccountType, SignupRequest, UserProfile};
use crate::api::{ApiResult, HealthApi};
use crate::events::AppEvent;
use crate::flows::chat::ChatFlow;
use crate::flows::history::HistoryFlow;
use crate::flows::vitals::VitalsFlow;
use crate::flows::FlowContext;
use crate::logging::LogBuffer;
use crate::notify::Notifier;
use crate::session::SessionManager;
use crate::tui::components::toast::Toast;
use crate::tui::forms::TextField;
use crate::tui::theme::ThemeKind;

// ─────────────────────────────────────────────────────────────────────────────
// Auth screen
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    SignIn,
    SignUp,
}

/// Focusable rows on the auth screen. Which ones are visible depends on the
/// mode; `focus_ring` gives the active set in traversal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    ModeSwitch,
    FullName,
    Username,
    Email,
    AccountType,
    Password,
    Confirm,
}

const SIGN_IN_RING: &[AuthField] = &[AuthField::ModeSwitch, AuthField::Username, AuthField::Password];
const SIGN_UP_RING: &[AuthField] = &[
    AuthField::ModeSwitch,
    AuthField::FullName,
    AuthField::Username,
    AuthField::Email,
    AuthField::AccountType,
    AuthField::Password,
    AuthField::Confirm,
];

/// What a validated auth form wants done.
#[derive(Debug)]
pub enum AuthSubmit {
    Login { username: String, password: String },
    Signup(SignupRequest),
}

pub struct AuthScreen {
    pub mode: AuthMode,
    focus: usize,
    pub full_name: TextField,
    pub username: TextField,
    pub email: TextField,
    pub account_type: AccountType,
    pub password: TextField,
    pub confirm: TextField,
    pub busy: bool,
    pub error: Option<String>,
}

impl AuthScreen {
    pub fn new() -> Self {
        Self {
            mode: AuthMode::SignIn,
            focus: 1, // username
            full_name: TextField::new(),
            username: TextField::new(),
            email: TextField::new(),
            account_type: AccountType::default(),
            password: TextField::password(),
            confirm: TextField::password(),
            busy: false,
            error: None,
        }
    }

    pub fn focus_ring(&self) -> &'static [AuthField] {
        match self.mode {
            AuthMode::SignIn => SIGN_IN_RING,
            AuthMode::SignUp => SIGN_UP_RING,
        }
    }

    pub fn focused(&self) -> AuthField {
        self.focus_ring()[self.focus]
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.focus_ring().len();
    }

    pub fn focus_prev(&mut self) {
        let len = self.focus_ring().len();
        self.focus = (self.focus + len - 1) % len;
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::SignIn => AuthMode::SignUp,
            AuthMode::SignUp => AuthMode::SignIn,
        };
        self.focus = 0;
        self.error = None;
    }

    /// Check the visible fields and produce the request to run. The first
    /// problem wins and nothing is spawned.
    pub fn validate(&self) -> Result<AuthSubmit, String> {
        match self.mode {
            AuthMode::SignIn => {
                if self.username.value().trim().is_empty() || self.password.is_empty() {
                    return Err("Username and password are required".to_string());
                }
                Ok(AuthSubmit::Login {
                    username: self.username.value().trim().to_string(),
                    password: self.password.value().to_string(),
                })
            }
            AuthMode::SignUp => {
                let username = self.username.value().trim();
                let email = self.email.value().trim();
                let full_name = self.full_name.value().trim();
                if username.is_empty() || email.is_empty() || full_name.is_empty() || self.password.is_empty()
                {
                    return Err("All fields are required".to_string());
                }
                if self.password.value().len() < 6 {
                    return Err("Password must be at least 6 characters".to_string());
                }
                if self.password.value() != self.confirm.value() {
                    return Err("Passwords do not match".to_string());
                }
                Ok(AuthSubmit::Signup(SignupRequest {
                    username: username.to_string(),
                    email: email.to_string(),
                    full_name: full_name.to_string(),
                    account_type: self.account_type,
                    password: self.password.value().to_string(),
                }))
            }
        }
    }

    fn focused_field_mut(&mut self) -> Option<&mut TextField> {
        match self.focused() {
            AuthField::FullName => Some(&mut self.full_name),
            AuthField::Username => Some(&mut self.username),
            AuthField::Email => Some(&mut self.email),
            AuthField::Password => Some(&mut self.password),
            AuthField::Confirm => Some(&mut self.confirm),
            AuthField::ModeSwitch | AuthField::AccountType => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Dashboard
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardView {
    Vitals,
    Chat,
    History,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryTab {
    Vitals,
    Conversations,
}

/// Order of the editable rows on the vitals form.
pub const VITALS_FIELDS: usize = 8;

pub struct Dashboard {
    pub profile: UserProfile,
    pub view: DashboardView,
    pub vitals: VitalsFlow,
    pub vitals_focus: usize,
    pub chat: ChatFlow,
    pub chat_input: TextField,
    /// Lines scrolled up from the bottom of the chat log.
    pub chat_scroll: usize,
    pub history: HistoryFlow,
    pub history_tab: HistoryTab,
    pub history_scroll: usize,
}

// ─────────────────────────────────────────────────────────────────────────────
// App
// ─────────────────────────────────────────────────────────────────────────────

pub enum Screen {
    Auth(AuthScreen),
    Dashboard(Dashboard),
}

pub struct App {
    api: Arc<dyn HealthApi>,
    session: SessionManager,
    events_tx: mpsc::Sender<AppEvent>,
    notify: Notifier,
    pub log_buffer: LogBuffer,
    pub theme: ThemeKind,
    pub show_logs: bool,
    pub toasts: Vec<Toast>,
    pub should_quit: bool,
    /// Tick counter, drives the spinner.
    pub frame: usize,
    /// Bumped on every dashboard teardown; completions carrying an older
    /// value are discarded.
    generation: u64,
    pub screen: Screen,
}

impl App {
    pub fn new(
        api: Arc<dyn HealthApi>,
        session: SessionManager,
        events_tx: mpsc::Sender<AppEvent>,
        notify: Notifier,
        log_buffer: LogBuffer,
        theme: ThemeKind,
    ) -> Self {
        let mut app = Self {
            api,
            session,
            events_tx,
            notify,
            log_buffer,
            theme,
            show_logs: false,
            toasts: Vec::new(),
            should_quit: false,
            frame: 0,
            generation: 0,
            screen: Screen::Auth(AuthScreen::new()),
        };
        if let Some(session) = app.session.current() {
            app.enter_dashboard(session.profile);
        }
        app
    }

    /// One animation/housekeeping tick.
    pub fn tick(&mut self) {
        self.frame = self.frame.wrapping_add(1);
        self.toasts.retain(|toast| !toast.is_expired());
    }

    // ── key handling ────────────────────────────────────────────────────────

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => {
                    self.should_quit = true;
                    return;
                }
                KeyCode::Char('g') => {
                    self.show_logs = !self.show_logs;
                    return;
                }
                KeyCode::Char('t') => {
                    self.theme = self.theme.next();
                    self.notify.info("Theme", self.theme.name());
                    return;
                }
                KeyCode::Char('l') => {
                    if matches!(self.screen, Screen::Dashboard(_)) {
                        self.sign_out();
                        self.notify.info("Signed out", "Come back soon.");
                    }
                    return;
                }
                _ => {}
            }
        }

        match &mut self.screen {
            Screen::Auth(_) => self.handle_auth_key(key),
            Screen::Dashboard(_) => self.handle_dashboard_key(key),
        }
    }

    fn handle_auth_key(&mut self, key: KeyEvent) {
        enum Action {
            None,
            Submit,
        }
        let mut action = Action::None;

        if let Screen::Auth(auth) = &mut self.screen {
            if auth.busy {
                return;
            }
            match key.code {
                KeyCode::Tab | KeyCode::Down => auth.focus_next(),
                KeyCode::BackTab | KeyCode::Up => auth.focus_prev(),
                KeyCode::Enter => match auth.focused() {
                    AuthField::ModeSwitch => auth.toggle_mode(),
                    _ => action = Action::Submit,
                },
                KeyCode::Left | KeyCode::Right | KeyCode::Char(' ')
                    if matches!(auth.focused(), AuthField::ModeSwitch | AuthField::AccountType) =>
                {
                    match auth.focused() {
                        AuthField::ModeSwitch => auth.toggle_mode(),
                        AuthField::AccountType => {
                            auth.account_type = if key.code == KeyCode::Left {
                                auth.account_type.prev()
                            } else {
                                auth.account_type.next()
                            };
                        }
                        _ => unreachable!(),
                    }
                }
                _ => {
                    if let Some(field) = auth.focused_field_mut() {
                        field.handle_key(&key);
                    }
                }
            }
        }

        if matches!(action, Action::Submit) {
            self.submit_auth();
        }
    }

    /// Validate the auth form and spawn the login or signup call.
    fn submit_auth(&mut self) {
        let Screen::Auth(auth) = &mut self.screen else {
            return;
        };
        match auth.validate() {
            Err(message) => auth.error = Some(message),
            Ok(submit) => {
                auth.error = None;
                auth.busy = true;
                let session = self.session.clone();
                let events = self.events_tx.clone();
                tokio::spawn(async move {
                    match submit {
                        AuthSubmit::Login { username, password } => {
                            let result = session.login(&username, &password).await;
                            let _ = events.send(AppEvent::LoginFinished(result)).await;
                        }
                        AuthSubmit::Signup(request) => {
                            let result = session.signup(request).await;
                            let _ = events.send(AppEvent::SignupFinished(result)).await;
                        }
                    }
                });
            }
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent) {
        let Screen::Dashboard(dash) = &mut self.screen else {
            return;
        };

        match key.code {
            KeyCode::F(1) => {
                dash.view = DashboardView::Vitals;
                return;
            }
            KeyCode::F(2) => {
                dash.view = DashboardView::Chat;
                return;
            }
            KeyCode::F(3) => {
                dash.view = DashboardView::History;
                return;
            }
            _ => {}
        }

        match dash.view {
            DashboardView::Vitals => Self::handle_vitals_key(dash, key),
            DashboardView::Chat => Self::handle_chat_key(dash, key),
            DashboardView::History => Self::handle_history_key(dash, key),
        }
    }

    fn handle_vitals_key(dash: &mut Dashboard, key: KeyEvent) {
        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                dash.vitals_focus = (dash.vitals_focus + 1) % VITALS_FIELDS;
            }
            KeyCode::BackTab | KeyCode::Up => {
                dash.vitals_focus = (dash.vitals_focus + VITALS_FIELDS - 1) % VITALS_FIELDS;
            }
            KeyCode::Enter => dash.vitals.submit(),
            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') if dash.vitals_focus == 6 => {
                dash.vitals.toggle_unit();
            }
            KeyCode::Char(c) => {
                if let Some(buffer) = Self::vitals_buffer(dash) {
                    buffer.push(c);
                }
            }
            KeyCode::Backspace => {
                if let Some(buffer) = Self::vitals_buffer(dash) {
                    buffer.pop();
                }
            }
            _ => {}
        }
    }

    fn vitals_buffer(dash: &mut Dashboard) -> Option<&mut String> {
        let form = &mut dash.vitals.form;
        match dash.vitals_focus {
            0 => Some(&mut form.age),
            1 => Some(&mut form.heart_rate),
            2 => Some(&mut form.systolic_bp),
            3 => Some(&mut form.diastolic_bp),
            4 => Some(&mut form.blood_sugar),
            5 => Some(&mut form.body_temp),
            7 => Some(&mut form.patient_history),
            _ => None,
        }
    }

    fn handle_chat_key(dash: &mut Dashboard, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                if !dash.chat.is_busy() && !dash.chat_input.value().trim().is_empty() {
                    let text = dash.chat_input.take();
                    dash.chat.send(&text);
                    dash.chat_scroll = 0;
                }
            }
            KeyCode::Up => dash.chat_scroll = dash.chat_scroll.saturating_add(1),
            KeyCode::Down => dash.chat_scroll = dash.chat_scroll.saturating_sub(1),
            KeyCode::PageUp => dash.chat_scroll = dash.chat_scroll.saturating_add(10),
            KeyCode::PageDown => dash.chat_scroll = dash.chat_scroll.saturating_sub(10),
            _ => {
                dash.chat_input.handle_key(&key);
            }
        }
    }

    fn handle_history_key(dash: &mut Dashboard, key: KeyEvent) {
        match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
                dash.history_tab = match dash.history_tab {
                    HistoryTab::Vitals => HistoryTab::Conversations,
                    HistoryTab::Conversations => HistoryTab::Vitals,
                };
                dash.history_scroll = 0;
            }
            KeyCode::Up => dash.history_scroll = dash.history_scroll.saturating_sub(1),
            KeyCode::Down => dash.history_scroll = dash.history_scroll.saturating_add(1),
            KeyCode::Char('r') | KeyCode::F(5) => match dash.history_tab {
                HistoryTab::Vitals => dash.history.refresh_vitals(),
                HistoryTab::Conversations => dash.history.refresh_conversations(),
            },
            _ => {}
        }
    }

    // ── event routing ───────────────────────────────────────────────────────

    pub fn on_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Notice(notification) => self.toasts.push(Toast::new(notification)),
            AppEvent::LoginFinished(result) | AppEvent::SignupFinished(result) => {
                self.on_auth_finished(result);
            }
            AppEvent::VitalsSettled { generation, result } => {
                if !self.accept(generation, result.as_ref().err()) {
                    return;
                }
                if let Screen::Dashboard(dash) = &mut self.screen {
                    dash.vitals.on_settled(result);
                }
            }
            AppEvent::AdviceArrived { generation, result } => {
                if !self.accept(generation, result.as_ref().err()) {
                    return;
                }
                if let Screen::Dashboard(dash) = &mut self.screen {
                    dash.chat.on_reply(result);
                    dash.chat_scroll = 0;
                }
            }
            AppEvent::VitalsHistoryLoaded { generation, result } => {
                if !self.accept(generation, result.as_ref().err()) {
                    return;
                }
                if let Screen::Dashboard(dash) = &mut self.screen {
                    dash.history.on_vitals(result);
                }
            }
            AppEvent::ConversationsLoaded { generation, result } => {
                if !self.accept(generation, result.as_ref().err()) {
                    return;
                }
                if let Screen::Dashboard(dash) = &mut self.screen {
                    dash.history.on_conversations(result);
                }
            }
        }
    }

    fn on_auth_finished(&mut self, result: ApiResult<UserProfile>) {
        match result {
            Ok(profile) => {
                let name = profile.display_name().to_string();
                self.enter_dashboard(profile);
                self.notify.success("Welcome", format!("Signed in as {name}"));
            }
            Err(e) => {
                if let Screen::Auth(auth) = &mut self.screen {
                    auth.busy = false;
                    auth.error = Some(e.to_string());
                }
            }
        }
    }

    /// Gate a flow completion: stale generations are dropped, a dead
    /// session forces a signout before anything else sees the result.
    fn accept(&mut self, generation: u64, error: Option<&crate::api::error::ApiError>) -> bool {
        if generation != self.generation {
            tracing::debug!(generation, current = self.generation, "stale completion discarded");
            return false;
        }
        if error.is_some_and(|e| e.is_session_dead()) {
            self.sign_out();
            self.notify.error("Session expired", "Please sign in again.");
            return false;
        }
        true
    }

    fn enter_dashboard(&mut self, profile: UserProfile) {
        self.generation += 1;
        let ctx = FlowContext {
            api: self.api.clone(),
            events: self.events_tx.clone(),
            notify: self.notify.clone(),
            generation: self.generation,
        };
        let display_name = profile.display_name().to_string();
        let account_type = profile.account_type;
        self.screen = Screen::Dashboard(Dashboard {
            profile,
            view: DashboardView::Vitals,
            vitals: VitalsFlow::new(ctx.clone(), account_type),
            vitals_focus: 0,
            chat: ChatFlow::new(ctx.clone(), &display_name),
            chat_input: TextField::new(),
            chat_scroll: 0,
            history: HistoryFlow::new(ctx),
            history_tab: HistoryTab::Vitals,
            history_scroll: 0,
        });
    }

    /// Tear down the dashboard and drop the session. Completions already in
    /// flight carry the old generation and will be discarded.
    fn sign_out(&mut self) {
        self.session.logout();
        self.generation += 1;
        self.screen = Screen::Auth(AuthScreen::new());
    }
}
