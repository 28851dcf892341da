// Theme system for the TUI
//
// Provides color themes that can be selected in the config file and cycled
// at runtime. Each theme defines colors for every UI element, including the
// risk badges and log levels.

use ratatui::style::Color;

use crate::api::types::RiskLabel;
use crate::logging::LogLevel;
use crate::notify::Severity;

/// Available themes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeKind {
    #[default]
    JamiiDark,
    JamiiLight,
    Dracula,
    Nord,
    Monokai,
}

impl ThemeKind {
    /// Get all available themes
    pub fn all() -> &'static [ThemeKind] {
        &[
            ThemeKind::JamiiDark,
            ThemeKind::JamiiLight,
            ThemeKind::Dracula,
            ThemeKind::Nord,
            ThemeKind::Monokai,
        ]
    }

    /// Resolve a configured theme name; unknown names fall back to the
    /// default so a typo in the config never breaks startup.
    pub fn from_name(name: &str) -> Self {
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.name().eq_ignore_ascii_case(name.trim()))
            .unwrap_or_default()
    }

    /// Get the next theme in the cycle
    pub fn next(self) -> Self {
        let themes = Self::all();
        let current = themes.iter().position(|&t| t == self).unwrap_or(0);
        themes[(current + 1) % themes.len()]
    }

    /// Get display name
    pub fn name(&self) -> &'static str {
        match self {
            ThemeKind::JamiiDark => "Jamii Dark",
            ThemeKind::JamiiLight => "Jamii Light",
            ThemeKind::Dracula => "Dracula",
            ThemeKind::Nord => "Nord",
            ThemeKind::Monokai => "Monokai",
        }
    }

    /// Get the theme configuration
    pub fn theme(&self) -> Theme {
        match self {
            ThemeKind::JamiiDark => Theme::jamii_dark(),
            ThemeKind::JamiiLight => Theme::jamii_light(),
            ThemeKind::Dracula => Theme::dracula(),
            ThemeKind::Nord => Theme::nord(),
            ThemeKind::Monokai => Theme::monokai(),
        }
    }
}

/// Complete theme definition with all UI colors
#[derive(Debug, Clone)]
pub struct Theme {
    // Base colors
    pub bg: Color,
    pub fg: Color,
    pub dim: Color,
    pub border: Color,
    pub border_focused: Color,
    pub title: Color,
    pub accent: Color,

    // Outcome colors
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,

    // Risk badges
    pub risk_low: Color,
    pub risk_medium: Color,
    pub risk_high: Color,
    pub risk_unknown: Color,

    // Chat
    pub user_msg: Color,
    pub assistant_msg: Color,

    // Log levels
    pub log_error: Color,
    pub log_warn: Color,
    pub log_info: Color,
    pub log_debug: Color,
    pub log_trace: Color,
}

impl Theme {
    pub fn severity(&self, severity: Severity) -> Color {
        match severity {
            Severity::Info => self.info,
            Severity::Success => self.success,
            Severity::Error => self.error,
        }
    }

    pub fn risk(&self, risk: RiskLabel) -> Color {
        match risk {
            RiskLabel::Low => self.risk_low,
            RiskLabel::Medium => self.risk_medium,
            RiskLabel::High => self.risk_high,
            RiskLabel::Unknown => self.risk_unknown,
        }
    }

    pub fn log_level(&self, level: LogLevel) -> Color {
        match level {
            LogLevel::Error => self.log_error,
            LogLevel::Warn => self.log_warn,
            LogLevel::Info => self.log_info,
            LogLevel::Debug => self.log_debug,
            LogLevel::Trace => self.log_trace,
        }
    }

    pub fn jamii_dark() -> Self {
        Self {
            bg: Color::Rgb(14, 21, 25),
            fg: Color::Rgb(214, 222, 227),
            dim: Color::Rgb(110, 125, 135),
            border: Color::Rgb(58, 72, 82),
            border_focused: Color::Rgb(38, 166, 154),
            title: Color::Rgb(38, 166, 154),
            accent: Color::Rgb(77, 182, 172),
            success: Color::Rgb(129, 199, 132),
            warning: Color::Rgb(255, 183, 77),
            error: Color::Rgb(229, 115, 115),
            info: Color::Rgb(100, 181, 246),
            risk_low: Color::Rgb(129, 199, 132),
            risk_medium: Color::Rgb(255, 183, 77),
            risk_high: Color::Rgb(229, 115, 115),
            risk_unknown: Color::Rgb(144, 164, 174),
            user_msg: Color::Rgb(77, 182, 172),
            assistant_msg: Color::Rgb(149, 177, 252),
            log_error: Color::Rgb(229, 115, 115),
            log_warn: Color::Rgb(255, 183, 77),
            log_info: Color::Rgb(100, 181, 246),
            log_debug: Color::Rgb(144, 164, 174),
            log_trace: Color::Rgb(96, 110, 120),
        }
    }

    pub fn jamii_light() -> Self {
        Self {
            bg: Color::Rgb(248, 250, 250),
            fg: Color::Rgb(38, 50, 56),
            dim: Color::Rgb(120, 134, 142),
            border: Color::Rgb(176, 190, 197),
            border_focused: Color::Rgb(0, 121, 107),
            title: Color::Rgb(0, 121, 107),
            accent: Color::Rgb(0, 137, 123),
            success: Color::Rgb(46, 125, 50),
            warning: Color::Rgb(230, 126, 0),
            error: Color::Rgb(198, 40, 40),
            info: Color::Rgb(21, 101, 192),
            risk_low: Color::Rgb(46, 125, 50),
            risk_medium: Color::Rgb(230, 126, 0),
            risk_high: Color::Rgb(198, 40, 40),
            risk_unknown: Color::Rgb(96, 125, 139),
            user_msg: Color::Rgb(0, 121, 107),
            assistant_msg: Color::Rgb(69, 90, 200),
            log_error: Color::Rgb(198, 40, 40),
            log_warn: Color::Rgb(230, 126, 0),
            log_info: Color::Rgb(21, 101, 192),
            log_debug: Color::Rgb(96, 125, 139),
            log_trace: Color::Rgb(144, 160, 168),
        }
    }

    pub fn dracula() -> Self {
        Self {
            bg: Color::Rgb(40, 42, 54),
            fg: Color::Rgb(248, 248, 242),
            dim: Color::Rgb(98, 114, 164),
            border: Color::Rgb(68, 71, 90),
            border_focused: Color::Rgb(189, 147, 249),
            title: Color::Rgb(189, 147, 249),
            accent: Color::Rgb(139, 233, 253),
            success: Color::Rgb(80, 250, 123),
            warning: Color::Rgb(241, 250, 140),
            error: Color::Rgb(255, 85, 85),
            info: Color::Rgb(139, 233, 253),
            risk_low: Color::Rgb(80, 250, 123),
            risk_medium: Color::Rgb(241, 250, 140),
            risk_high: Color::Rgb(255, 85, 85),
            risk_unknown: Color::Rgb(98, 114, 164),
            user_msg: Color::Rgb(139, 233, 253),
            assistant_msg: Color::Rgb(255, 121, 198),
            log_error: Color::Rgb(255, 85, 85),
            log_warn: Color::Rgb(241, 250, 140),
            log_info: Color::Rgb(139, 233, 253),
            log_debug: Color::Rgb(98, 114, 164),
            log_trace: Color::Rgb(68, 71, 90),
        }
    }

    pub fn nord() -> Self {
        Self {
            bg: Color::Rgb(46, 52, 64),
            fg: Color::Rgb(216, 222, 233),
            dim: Color::Rgb(106, 118, 137),
            border: Color::Rgb(67, 76, 94),
            border_focused: Color::Rgb(136, 192, 208),
            title: Color::Rgb(136, 192, 208),
            accent: Color::Rgb(129, 161, 193),
            success: Color::Rgb(163, 190, 140),
            warning: Color::Rgb(235, 203, 139),
            error: Color::Rgb(191, 97, 106),
            info: Color::Rgb(136, 192, 208),
            risk_low: Color::Rgb(163, 190, 140),
            risk_medium: Color::Rgb(235, 203, 139),
            risk_high: Color::Rgb(191, 97, 106),
            risk_unknown: Color::Rgb(106, 118, 137),
            user_msg: Color::Rgb(136, 192, 208),
            assistant_msg: Color::Rgb(180, 142, 173),
            log_error: Color::Rgb(191, 97, 106),
            log_warn: Color::Rgb(235, 203, 139),
            log_info: Color::Rgb(136, 192, 208),
            log_debug: Color::Rgb(106, 118, 137),
            log_trace: Color::Rgb(67, 76, 94),
        }
    }

    pub fn monokai() -> Self {
        Self {
            bg: Color::Rgb(39, 40, 34),
            fg: Color::Rgb(248, 248, 242),
            dim: Color::Rgb(117, 113, 94),
            border: Color::Rgb(73, 72, 62),
            border_focused: Color::Rgb(166, 226, 46),
            title: Color::Rgb(166, 226, 46),
            accent: Color::Rgb(102, 217, 239),
            success: Color::Rgb(166, 226, 46),
            warning: Color::Rgb(230, 219, 116),
            error: Color::Rgb(249, 38, 114),
            info: Color::Rgb(102, 217, 239),
            risk_low: Color::Rgb(166, 226, 46),
            risk_medium: Color::Rgb(230, 219, 116),
            risk_high: Color::Rgb(249, 38, 114),
            risk_unknown: Color::Rgb(117, 113, 94),
            user_msg: Color::Rgb(102, 217, 239),
            assistant_msg: Color::Rgb(174, 129, 255),
            log_error: Color::Rgb(249, 38, 114),
            log_warn: Color::Rgb(230, 219, 116),
            log_info: Color::Rgb(102, 217, 239),
            log_debug: Color::Rgb(117, 113, 94),
            log_trace: Color::Rgb(73, 72, 62),
        }
    }
}
