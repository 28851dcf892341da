//! Rendering
//!
//! Pure drawing over the current [`App`] state; nothing here mutates. One
//! `draw` call per frame, auth screen or dashboard plus the overlays.

use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use crate::api::types::TempUnit;
use crate::config::VERSION;
use crate::flows::chat::Origin;
use crate::flows::history::FetchPhase;
use crate::flows::vitals::VitalsPhase;
use crate::tui::app::{
    App, AuthField, AuthMode, AuthScreen, Dashboard, DashboardView, HistoryTab, Screen,
};
use crate::tui::theme::Theme;

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

fn spinner(frame: usize) -> &'static str {
    SPINNER_FRAMES[frame % SPINNER_FRAMES.len()]
}

pub fn draw(f: &mut Frame, app: &App) {
    let theme = app.theme.theme();
    let area = f.area();
    f.render_widget(
        Block::default().style(Style::default().bg(theme.bg).fg(theme.fg)),
        area,
    );

    let body = if app.show_logs {
        let chunks = Layout::vertical([Constraint::Min(10), Constraint::Length(10)]).split(area);
        draw_logs(f, chunks[1], app, &theme);
        chunks[0]
    } else {
        area
    };

    match &app.screen {
        Screen::Auth(auth) => draw_auth(f, body, auth, app, &theme),
        Screen::Dashboard(dash) => draw_dashboard(f, body, dash, app, &theme),
    }

    for (slot, toast) in app.toasts.iter().rev().enumerate() {
        toast.render(f, area, slot as u16, &theme);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Auth screen
// ─────────────────────────────────────────────────────────────────────────────

fn draw_auth(f: &mut Frame, area: Rect, auth: &AuthScreen, app: &App, theme: &Theme) {
    let height = match auth.mode {
        AuthMode::SignIn => 13,
        AuthMode::SignUp => 21,
    };
    let rect = centered(area, 52, height);
    f.render_widget(Clear, rect);

    let title = match auth.mode {
        AuthMode::SignIn => " Afya · Sign In ",
        AuthMode::SignUp => " Afya · Create Account ",
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused))
        .title(Span::styled(
            title,
            Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(rect);
    f.render_widget(block, rect);

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(""));

    // Mode switch row.
    let switch_label = match auth.mode {
        AuthMode::SignIn => "Need an account? Switch to Sign Up",
        AuthMode::SignUp => "Have an account? Switch to Sign In",
    };
    lines.push(selector_line(
        switch_label,
        auth.focused() == AuthField::ModeSwitch,
        theme,
    ));
    lines.push(Line::from(""));

    if auth.mode == AuthMode::SignUp {
        lines.push(field_line("Full name", &auth.full_name.display(), auth.focused() == AuthField::FullName, theme));
        lines.push(Line::from(""));
    }
    lines.push(field_line("Username", &auth.username.display(), auth.focused() == AuthField::Username, theme));
    lines.push(Line::from(""));
    if auth.mode == AuthMode::SignUp {
        lines.push(field_line("Email", &auth.email.display(), auth.focused() == AuthField::Email, theme));
        lines.push(Line::from(""));
        lines.push(selector_line(
            &format!("Care track: ◂ {} ▸", auth.account_type.label()),
            auth.focused() == AuthField::AccountType,
            theme,
        ));
        lines.push(Line::from(""));
    }
    lines.push(field_line("Password", &auth.password.display(), auth.focused() == AuthField::Password, theme));
    lines.push(Line::from(""));
    if auth.mode == AuthMode::SignUp {
        lines.push(field_line("Confirm", &auth.confirm.display(), auth.focused() == AuthField::Confirm, theme));
        lines.push(Line::from(""));
    }

    if auth.busy {
        lines.push(Line::from(Span::styled(
            format!("{} Signing in...", spinner(app.frame)),
            Style::default().fg(theme.accent),
        )));
    } else if let Some(error) = &auth.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(theme.error),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "Tab: next field · Enter: submit · Ctrl+C: quit",
            Style::default().fg(theme.dim),
        )));
    }

    f.render_widget(Paragraph::new(lines), inner);
}

fn field_line<'a>(label: &str, value: &str, focused: bool, theme: &Theme) -> Line<'a> {
    let marker = if focused { "▸ " } else { "  " };
    let label_style = if focused {
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.dim)
    };
    let value_shown = if focused {
        format!("{value}█")
    } else {
        value.to_string()
    };
    Line::from(vec![
        Span::styled(format!("{marker}{label:<10} "), label_style),
        Span::styled(value_shown, Style::default().fg(theme.fg)),
    ])
}

fn selector_line<'a>(label: &str, focused: bool, theme: &Theme) -> Line<'a> {
    let marker = if focused { "▸ " } else { "  " };
    let style = if focused {
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.dim)
    };
    Line::from(Span::styled(format!("{marker}{label}"), style))
}

// ─────────────────────────────────────────────────────────────────────────────
// Dashboard
// ─────────────────────────────────────────────────────────────────────────────

fn draw_dashboard(f: &mut Frame, area: Rect, dash: &Dashboard, app: &App, theme: &Theme) {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(5),
        Constraint::Length(1),
    ])
    .split(area);

    draw_header(f, chunks[0], dash, theme);
    match dash.view {
        DashboardView::Vitals => draw_vitals(f, chunks[1], dash, app, theme),
        DashboardView::Chat => draw_chat(f, chunks[1], dash, app, theme),
        DashboardView::History => draw_history(f, chunks[1], dash, app, theme),
    }
    draw_footer(f, chunks[2], dash, theme);
}

fn draw_header(f: &mut Frame, area: Rect, dash: &Dashboard, theme: &Theme) {
    let tab = |view: DashboardView, key: &str, label: &str| {
        let style = if dash.view == view {
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.dim)
        };
        Span::styled(format!(" {key} {label} "), style)
    };

    let left = Line::from(vec![
        Span::styled(
            format!(" Afya v{VERSION} "),
            Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
        ),
        tab(DashboardView::Vitals, "F1", "Vitals"),
        tab(DashboardView::Chat, "F2", "Chat"),
        tab(DashboardView::History, "F3", "History"),
    ]);
    f.render_widget(Paragraph::new(left), area);

    let who = format!(
        "{} · {} ",
        dash.profile.display_name(),
        dash.profile.account_type.label()
    );
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(who, Style::default().fg(theme.dim))))
            .alignment(Alignment::Right),
        area,
    );
}

fn draw_footer(f: &mut Frame, area: Rect, dash: &Dashboard, theme: &Theme) {
    let hints = match dash.view {
        DashboardView::Vitals => "Tab: field · Space: unit · Enter: submit",
        DashboardView::Chat => "Enter: send · ↑/↓: scroll",
        DashboardView::History => "←/→: tab · ↑/↓: scroll · r: refresh",
    };
    let line = Line::from(Span::styled(
        format!(" {hints} · Ctrl+G: logs · Ctrl+T: theme · Ctrl+L: sign out · Ctrl+C: quit"),
        Style::default().fg(theme.dim),
    ));
    f.render_widget(Paragraph::new(line), area);
}

// ── vitals ───────────────────────────────────────────────────────────────────

fn draw_vitals(f: &mut Frame, area: Rect, dash: &Dashboard, app: &App, theme: &Theme) {
    let columns =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).split(area);

    draw_vitals_form(f, columns[0], dash, theme);
    draw_vitals_result(f, columns[1], dash, app, theme);
}

fn draw_vitals_form(f: &mut Frame, area: Rect, dash: &Dashboard, theme: &Theme) {
    let block = titled_block(" Submit Vitals ", true, theme);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let form = &dash.vitals.form;
    let rows: [(&str, String); 8] = [
        ("Age", form.age.clone()),
        ("Heart rate (bpm)", form.heart_rate.clone()),
        ("Systolic BP (mmHg)", form.systolic_bp.clone()),
        ("Diastolic BP (mmHg)", form.diastolic_bp.clone()),
        ("Blood sugar (mg/dL)", form.blood_sugar.clone()),
        (
            "Body temp",
            format!("{} {}", form.body_temp, form.unit.label()),
        ),
        (
            "Unit",
            match form.unit {
                TempUnit::Celsius => "◂ Celsius ▸".to_string(),
                TempUnit::Fahrenheit => "◂ Fahrenheit ▸".to_string(),
            },
        ),
        ("Notes (optional)", form.patient_history.clone()),
    ];

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(""));
    for (i, (label, value)) in rows.iter().enumerate() {
        let focused = dash.vitals_focus == i;
        let marker = if focused { "▸ " } else { "  " };
        let label_style = if focused {
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.dim)
        };
        let shown = if focused && i != 6 {
            format!("{value}█")
        } else {
            value.clone()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{marker}{label:<20} "), label_style),
            Span::styled(shown, Style::default().fg(theme.fg)),
        ]));
        lines.push(Line::from(""));
    }

    if let Some(error) = dash.vitals.form_error() {
        lines.push(Line::from(Span::styled(
            format!("  {error}"),
            Style::default().fg(theme.error),
        )));
    }

    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_vitals_result(f: &mut Frame, area: Rect, dash: &Dashboard, app: &App, theme: &Theme) {
    let block = titled_block(" Assessment ", false, theme);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut lines: Vec<Line> = vec![Line::from("")];
    match dash.vitals.phase() {
        VitalsPhase::Idle => {
            lines.push(Line::from(Span::styled(
                "  Fill in the form and press Enter to get your risk assessment.",
                Style::default().fg(theme.dim),
            )));
        }
        VitalsPhase::Submitting => {
            lines.push(Line::from(Span::styled(
                format!("  {} Analyzing your measurements...", spinner(app.frame)),
                Style::default().fg(theme.accent),
            )));
        }
        VitalsPhase::Settled(assessment) => {
            lines.push(Line::from(vec![
                Span::styled("  Risk: ", Style::default().fg(theme.dim)),
                Span::styled(
                    format!(" {} ", assessment.risk.badge()),
                    Style::default()
                        .fg(theme.bg)
                        .bg(theme.risk(assessment.risk))
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  confidence {:.0}%", assessment.probability * 100.0),
                    Style::default().fg(theme.dim),
                ),
            ]));
            lines.push(Line::from(""));
            if let Some(advice) = &assessment.advice {
                for wrapped in wrap_text(advice, inner.width.saturating_sub(4) as usize) {
                    lines.push(Line::from(Span::styled(
                        format!("  {wrapped}"),
                        Style::default().fg(theme.fg),
                    )));
                }
            }
        }
        VitalsPhase::Failed(message) => {
            for wrapped in wrap_text(message, inner.width.saturating_sub(4) as usize) {
                lines.push(Line::from(Span::styled(
                    format!("  {wrapped}"),
                    Style::default().fg(theme.error),
                )));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "  Your entries were kept. Adjust and press Enter to retry.",
                Style::default().fg(theme.dim),
            )));
        }
    }

    f.render_widget(Paragraph::new(lines), inner);
}

// ── chat ─────────────────────────────────────────────────────────────────────

fn draw_chat(f: &mut Frame, area: Rect, dash: &Dashboard, app: &App, theme: &Theme) {
    let chunks = Layout::vertical([Constraint::Min(3), Constraint::Length(3)]).split(area);

    let block = titled_block(" Health Assistant · submit vitals first for personalized advice ", false, theme);
    let inner = block.inner(chunks[0]);
    f.render_widget(block, chunks[0]);

    // Flatten the log into wrapped lines, newest at the bottom.
    let width = inner.width.saturating_sub(2) as usize;
    let mut lines: Vec<Line> = Vec::new();
    for message in dash.chat.messages() {
        let (who, color) = match message.origin {
            Origin::User => ("You", theme.user_msg),
            Origin::Assistant => ("Assistant", theme.assistant_msg),
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("{who} "),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                message.timestamp.format("%H:%M").to_string(),
                Style::default().fg(theme.dim),
            ),
        ]));
        for wrapped in wrap_text(&message.text, width) {
            lines.push(Line::from(Span::styled(
                wrapped,
                Style::default().fg(theme.fg),
            )));
        }
        lines.push(Line::from(""));
    }
    if dash.chat.is_busy() {
        lines.push(Line::from(Span::styled(
            format!("{} thinking...", spinner(app.frame)),
            Style::default().fg(theme.dim),
        )));
    }

    // Scroll from the bottom: drop trailing lines, then show the tail.
    let visible = inner.height as usize;
    let end = lines.len().saturating_sub(dash.chat_scroll);
    let start = end.saturating_sub(visible);
    let window: Vec<Line> = lines[start..end].to_vec();
    f.render_widget(Paragraph::new(window), inner);

    // Input box.
    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused))
        .title(Span::styled(" Ask ", Style::default().fg(theme.title)));
    let input_inner = input_block.inner(chunks[1]);
    f.render_widget(input_block, chunks[1]);
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!("{}█", dash.chat_input.value()),
            Style::default().fg(theme.fg),
        ))),
        input_inner,
    );
}

// ── history ──────────────────────────────────────────────────────────────────

fn draw_history(f: &mut Frame, area: Rect, dash: &Dashboard, app: &App, theme: &Theme) {
    let chunks = Layout::vertical([Constraint::Length(1), Constraint::Min(3)]).split(area);

    let tab = |tab: HistoryTab, label: &str| {
        let style = if dash.history_tab == tab {
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.dim)
        };
        Span::styled(format!("  {label}  "), style)
    };
    f.render_widget(
        Paragraph::new(Line::from(vec![
            tab(HistoryTab::Vitals, "Vitals"),
            tab(HistoryTab::Conversations, "Conversations"),
        ])),
        chunks[0],
    );

    match dash.history_tab {
        HistoryTab::Vitals => draw_vitals_history(f, chunks[1], dash, app, theme),
        HistoryTab::Conversations => draw_conversations(f, chunks[1], dash, app, theme),
    }
}

fn draw_vitals_history(f: &mut Frame, area: Rect, dash: &Dashboard, app: &App, theme: &Theme) {
    let block = titled_block(" Past Submissions ", false, theme);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let lines: Vec<Line> = match dash.history.vitals() {
        FetchPhase::Idle | FetchPhase::Loading => {
            vec![Line::from(Span::styled(
                format!(" {} Loading...", spinner(app.frame)),
                Style::default().fg(theme.dim),
            ))]
        }
        FetchPhase::Failed(message) => phase_failed(message, theme),
        FetchPhase::Loaded(records) if records.is_empty() => {
            vec![Line::from(Span::styled(
                " No submissions yet. Your first assessment will show up here.",
                Style::default().fg(theme.dim),
            ))]
        }
        FetchPhase::Loaded(records) => records
            .iter()
            .map(|r| {
                Line::from(vec![
                    Span::styled(
                        format!(" {} ", r.created_at.format("%Y-%m-%d %H:%M")),
                        Style::default().fg(theme.dim),
                    ),
                    Span::styled(
                        format!(" {} ", r.ml_risk_label.badge()),
                        Style::default()
                            .fg(theme.bg)
                            .bg(theme.risk(r.ml_risk_label))
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!(
                            "  BP {}/{}  HR {}  BS {}  {}{}",
                            r.systolic_bp,
                            r.diastolic_bp,
                            r.heart_rate,
                            r.bs,
                            r.body_temp,
                            r.body_temp_unit.label()
                        ),
                        Style::default().fg(theme.fg),
                    ),
                ])
            })
            .collect(),
    };

    f.render_widget(scrolled(lines, dash.history_scroll, inner.height), inner);
}

fn draw_conversations(f: &mut Frame, area: Rect, dash: &Dashboard, app: &App, theme: &Theme) {
    let block = titled_block(" Past Conversations ", false, theme);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let width = inner.width.saturating_sub(4) as usize;
    let lines: Vec<Line> = match dash.history.conversations() {
        FetchPhase::Idle | FetchPhase::Loading => {
            vec![Line::from(Span::styled(
                format!(" {} Loading...", spinner(app.frame)),
                Style::default().fg(theme.dim),
            ))]
        }
        FetchPhase::Failed(message) => phase_failed(message, theme),
        FetchPhase::Loaded(records) if records.is_empty() => {
            vec![Line::from(Span::styled(
                " No conversations yet. Ask the assistant something first.",
                Style::default().fg(theme.dim),
            ))]
        }
        FetchPhase::Loaded(records) => {
            let mut lines = Vec::new();
            for r in records {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!(" {} ", r.created_at.format("%Y-%m-%d %H:%M")),
                        Style::default().fg(theme.dim),
                    ),
                    Span::styled(
                        crate::util::preview(&r.user_message, width.saturating_sub(20)),
                        Style::default().fg(theme.user_msg).add_modifier(Modifier::BOLD),
                    ),
                ]));
                lines.push(Line::from(Span::styled(
                    format!("   {}", crate::util::preview(&r.ai_response, width)),
                    Style::default().fg(theme.fg),
                )));
                lines.push(Line::from(""));
            }
            lines
        }
    };

    f.render_widget(scrolled(lines, dash.history_scroll, inner.height), inner);
}

fn phase_failed<'a>(message: &str, theme: &Theme) -> Vec<Line<'a>> {
    vec![
        Line::from(Span::styled(
            format!(" {message}"),
            Style::default().fg(theme.error),
        )),
        Line::from(Span::styled(
            " Press r to retry.",
            Style::default().fg(theme.dim),
        )),
    ]
}

// ── log pane ─────────────────────────────────────────────────────────────────

fn draw_logs(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled(" Logs ", Style::default().fg(theme.title)));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let lines: Vec<Line> = app
        .log_buffer
        .recent(inner.height as usize)
        .into_iter()
        .map(|entry| {
            Line::from(vec![
                Span::styled(
                    entry.timestamp.format("%H:%M:%S ").to_string(),
                    Style::default().fg(theme.dim),
                ),
                Span::styled(
                    format!("{:<5} ", entry.level.as_str()),
                    Style::default().fg(theme.log_level(entry.level)),
                ),
                Span::styled(format!("{} ", entry.target), Style::default().fg(theme.dim)),
                Span::styled(entry.message, Style::default().fg(theme.fg)),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn titled_block<'a>(title: &'a str, focused: bool, theme: &Theme) -> Block<'a> {
    let border = if focused {
        theme.border_focused
    } else {
        theme.border
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(Span::styled(
            title,
            Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
        ))
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Clamp a scrolled list to its viewport, offset counted from the top.
fn scrolled(lines: Vec<Line>, offset: usize, height: u16) -> Paragraph {
    let height = height as usize;
    let start = offset.min(lines.len().saturating_sub(1));
    let end = (start + height).min(lines.len());
    Paragraph::new(lines[start..end].to_vec())
}

/// Greedy word wrap on display width.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }
    let mut out = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            if line.is_empty() {
                line = word.to_string();
            } else if line.width() + 1 + word.width() <= width {
                line.push(' ');
                line.push_str(word);
            } else {
                out.push(std::mem::take(&mut line));
                line = word.to_string();
            }
        }
        out.push(line);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_respects_the_width() {
        let wrapped = wrap_text("one two three four five", 9);
        assert_eq!(wrapped, vec!["one two", "three", "four five"]);
        for line in &wrapped {
            assert!(line.width() <= 9);
        }
    }

    #[test]
    fn wrap_keeps_paragraph_breaks() {
        let wrapped = wrap_text("first\nsecond", 20);
        assert_eq!(wrapped, vec!["first", "second"]);
    }

    #[test]
    fn wrap_zero_width_passes_through() {
        assert_eq!(wrap_text("anything", 0), vec!["anything"]);
    }

    #[test]
    fn centered_fits_inside_the_area() {
        let area = Rect::new(0, 0, 80, 24);
        let rect = centered(area, 52, 13);
        assert!(rect.x >= area.x && rect.x + rect.width <= area.width);
        assert!(rect.y >= area.y && rect.y + rect.height <= area.height);

        let tiny = centered(Rect::new(0, 0, 20, 5), 52, 13);
        assert_eq!(tiny.width, 20);
        assert_eq!(tiny.height, 5);
    }

    #[test]
    fn spinner_cycles() {
        assert_eq!(spinner(0), spinner(SPINNER_FRAMES.len()));
    }
}
