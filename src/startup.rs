// Startup module - displays banner and module loading status
//
// Runs before the TUI takes over the screen, showing version info, the
// config file in use, and which modules came up. The same lines are also
// traced so they appear in the in-app log pane.

use crate::config::{Config, VERSION};

/// ANSI color codes for terminal output
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const MAGENTA: &str = "\x1b[35m";
}

/// Module loading result for display
pub struct ModuleStatus {
    pub name: &'static str,
    pub enabled: bool,
    pub description: &'static str,
}

/// Print the startup banner and module loading status
pub fn print_startup(config: &Config, session_restored: bool) {
    use colors::*;

    // Banner
    println!();
    println!("  {BOLD}{CYAN}Afya{RESET} {DIM}v{VERSION}{RESET}");
    println!("  {DIM}Terminal client for the AfyaJamii maternal health service{RESET}");
    println!();

    // Config file status
    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("  {DIM}Config:{RESET} {GREEN}✓{RESET} {}", path.display());
        } else {
            println!("  {DIM}Config:{RESET} {DIM}(using defaults){RESET}");
        }
    }
    println!();

    // Module loading
    println!("  {DIM}Loading modules...{RESET}");

    for module in get_module_status(config) {
        print_module_status(&module);
    }

    println!();

    if config.demo_mode {
        println!("  {YELLOW}▸{RESET} {YELLOW}Demo mode active{RESET} {DIM}(built-in stub service, no network){RESET}");
    } else {
        println!(
            "  {MAGENTA}▸{RESET} Service: {BOLD}{}{RESET}",
            config.api.base_url
        );
    }
    if session_restored {
        println!("  {GREEN}▸{RESET} Saved session restored");
    }
    println!();
}

/// Get status of all modules based on config
fn get_module_status(config: &Config) -> Vec<ModuleStatus> {
    vec![
        ModuleStatus {
            name: "session",
            enabled: true, // Core, always on
            description: "Credential store and session manager",
        },
        ModuleStatus {
            name: "gateway",
            enabled: !config.demo_mode,
            description: "Authenticated HTTP client",
        },
        ModuleStatus {
            name: "demo",
            enabled: config.demo_mode,
            description: "Built-in stub service",
        },
        ModuleStatus {
            name: "tui",
            enabled: true,
            description: "Terminal interface",
        },
        ModuleStatus {
            name: "logfile",
            enabled: config.logging.file_enabled,
            description: "Rotating log files",
        },
    ]
}

/// Print a single module's status
fn print_module_status(module: &ModuleStatus) {
    use colors::*;

    let (icon, style) = if module.enabled {
        (format!("{GREEN}✓{RESET}"), "")
    } else {
        (format!("{DIM}○{RESET}"), DIM)
    };

    println!(
        "    {icon} {style}{:<12}{RESET} {DIM}{}{RESET}",
        module.name, module.description
    );
}

/// Trace the same boot sequence so it shows up in the TUI log pane.
pub fn log_startup(config: &Config, session_restored: bool) {
    tracing::info!("Afya v{} starting", VERSION);

    for module in get_module_status(config) {
        let icon = if module.enabled { "✓" } else { "○" };
        tracing::info!("  {} {} - {}", icon, module.name, module.description);
    }

    if config.demo_mode {
        tracing::info!("Demo mode active (built-in stub service)");
    } else {
        tracing::info!("Service base URL: {}", config.api.base_url);
    }
    if session_restored {
        tracing::info!("Saved session restored");
    } else {
        tracing::info!("No saved session, starting signed out");
    }
}
