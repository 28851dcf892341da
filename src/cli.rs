// CLI module - command-line argument parsing and handlers
//
// Plain invocation starts the TUI. The `config` subcommand manages the
// config file:
// - config --show: Display effective configuration
// - config --path: Show config file path
// - config --reset: Regenerate config file with defaults
// - config --edit: Open config file in $EDITOR
// - config --update KEY=VALUE: Set one config key and rewrite the file

use crate::config::{Config, LogRotation, VERSION};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

/// Afya - terminal client for the AfyaJamii maternal health service
#[derive(Parser)]
#[command(name = "afya")]
#[command(version = VERSION)]
#[command(about = "Terminal client for the AfyaJamii maternal health service", long_about = None)]
pub struct Cli {
    /// Run against the built-in stub service (no network, any credentials)
    #[arg(long)]
    pub demo: bool,

    /// Override the service base URL for this run
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Open config file in $EDITOR
        #[arg(long)]
        edit: bool,

        /// Set one key and rewrite the config file (e.g. api.base_url=http://localhost:8000)
        #[arg(long, value_name = "KEY=VALUE")]
        update: Option<String>,
    },
}

/// Handle CLI subcommands. Returns true if a command was handled (exit after).
pub fn handle_cli(cli: &Cli) -> bool {
    match &cli.command {
        Some(Commands::Config {
            show,
            path,
            reset,
            edit,
            update,
        }) => {
            if *path {
                handle_config_path();
            } else if *show {
                handle_config_show();
            } else if *reset {
                handle_config_reset();
            } else if *edit {
                handle_config_edit();
            } else if let Some(assignment) = update {
                handle_config_update(assignment);
            } else {
                // No flag provided, show help
                println!("Usage: afya config [--show|--path|--reset|--edit|--update KEY=VALUE]");
                println!();
                println!("Options:");
                println!("  --show              Display effective configuration");
                println!("  --path              Show config file path");
                println!("  --reset             Reset config file to defaults");
                println!("  --edit              Open config file in $EDITOR");
                println!("  --update KEY=VALUE  Set one key and rewrite the file");
                println!();
                println!("Keys: theme, api.base_url, api.timeout_secs, logging.level,");
                println!("      logging.file_enabled, logging.file_dir, logging.file_rotation,");
                println!("      logging.file_prefix");
            }
            true
        }
        None => false, // No subcommand, run the TUI
    }
}

fn handle_config_path() {
    match Config::config_path() {
        Some(path) => println!("{}", path.display()),
        None => {
            eprintln!("Error: Could not determine config path");
            std::process::exit(1);
        }
    }
}

fn handle_config_show() {
    let config = Config::from_env();

    println!("# Effective configuration (env > file > defaults)");
    println!();
    println!("theme = {:?}", config.theme);
    println!();
    println!("[api]");
    println!("base_url = {:?}", config.api.base_url);
    println!("timeout_secs = {}", config.api.timeout_secs);
    println!();
    println!("[logging]");
    println!("level = {:?}", config.logging.level);
    println!("file_enabled = {}", config.logging.file_enabled);
    println!("file_dir = {:?}", config.logging.file_dir.display().to_string());
    println!("file_rotation = {:?}", config.logging.file_rotation.as_str());
    println!("file_prefix = {:?}", config.logging.file_prefix);

    // Show source info
    println!();
    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("# Source: {}", path.display());
        } else {
            println!("# Source: defaults (no config file)");
        }
    }
}

fn handle_config_reset() {
    let Some(path) = Config::config_path() else {
        eprintln!("Error: Could not determine config path");
        std::process::exit(1);
    };

    // Confirm if file exists
    if path.exists() {
        eprint!(
            "Config file exists at {}. Overwrite? [y/N] ",
            path.display()
        );
        std::io::stderr().flush().unwrap();

        let mut input = String::new();
        std::io::stdin().read_line(&mut input).unwrap();

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return;
        }
    }

    write_config(&path, &Config::default());
    println!("Config reset to defaults: {}", path.display());
}

fn handle_config_edit() {
    let Some(path) = Config::config_path() else {
        eprintln!("Error: Could not determine config path");
        std::process::exit(1);
    };

    // Ensure config exists
    if !path.exists() {
        Config::ensure_config_exists();
        println!("Created new config file: {}", path.display());
    }

    // Get editor from environment
    let editor = std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| {
            // Platform-specific fallback
            if cfg!(windows) {
                "notepad".to_string()
            } else {
                "nano".to_string()
            }
        });

    println!("Opening {} with {}", path.display(), editor);

    let status = Command::new(&editor).arg(&path).status();

    match status {
        Ok(s) if s.success() => {}
        Ok(s) => {
            eprintln!("Editor exited with status: {}", s);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Failed to launch editor '{}': {}", editor, e);
            eprintln!("Set $EDITOR environment variable to your preferred editor");
            std::process::exit(1);
        }
    }
}

fn handle_config_update(assignment: &str) {
    let Some(path) = Config::config_path() else {
        eprintln!("Error: Could not determine config path");
        std::process::exit(1);
    };

    let Some((key, value)) = assignment.split_once('=') else {
        eprintln!("Error: expected KEY=VALUE, got {:?}", assignment);
        std::process::exit(1);
    };

    let mut config = Config::from_env();
    if let Err(e) = apply_update(&mut config, key.trim(), value.trim()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    write_config(&path, &config);
    println!("Set {} = {:?} in {}", key.trim(), value.trim(), path.display());
}

/// Set one config key from its string form. Unknown keys and unparseable
/// values are reported, not guessed at.
fn apply_update(config: &mut Config, key: &str, value: &str) -> Result<(), String> {
    match key {
        "theme" => config.theme = value.to_string(),
        "api.base_url" => config.api.base_url = value.to_string(),
        "api.timeout_secs" => {
            config.api.timeout_secs = value
                .parse()
                .map_err(|_| format!("api.timeout_secs must be a number, got {value:?}"))?;
        }
        "logging.level" => config.logging.level = value.to_string(),
        "logging.file_enabled" => {
            config.logging.file_enabled = match value.to_lowercase().as_str() {
                "true" | "1" => true,
                "false" | "0" => false,
                _ => return Err(format!("logging.file_enabled must be true or false, got {value:?}")),
            };
        }
        "logging.file_dir" => config.logging.file_dir = PathBuf::from(value),
        "logging.file_rotation" => config.logging.file_rotation = LogRotation::from_str(value),
        "logging.file_prefix" => config.logging.file_prefix = value.to_string(),
        _ => {
            return Err(format!(
                "unknown key {key:?} (valid: theme, api.base_url, api.timeout_secs, \
                 logging.level, logging.file_enabled, logging.file_dir, \
                 logging.file_rotation, logging.file_prefix)"
            ))
        }
    }
    Ok(())
}

fn write_config(path: &std::path::Path, config: &Config) {
    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("Error creating directory: {}", e);
            std::process::exit(1);
        }
    }

    if let Err(e) = std::fs::write(path, config.to_toml()) {
        eprintln!("Error writing config: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_sets_nested_keys() {
        let mut config = Config::default();
        apply_update(&mut config, "api.base_url", "http://localhost:8000").unwrap();
        apply_update(&mut config, "api.timeout_secs", "15").unwrap();
        apply_update(&mut config, "logging.file_enabled", "true").unwrap();
        apply_update(&mut config, "logging.file_rotation", "hourly").unwrap();

        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.api.timeout_secs, 15);
        assert!(config.logging.file_enabled);
        assert_eq!(config.logging.file_rotation, LogRotation::Hourly);
    }

    #[test]
    fn update_rejects_unknown_keys_and_bad_values() {
        let mut config = Config::default();
        assert!(apply_update(&mut config, "api.port", "8000").is_err());
        assert!(apply_update(&mut config, "api.timeout_secs", "soon").is_err());
        assert!(apply_update(&mut config, "logging.file_enabled", "maybe").is_err());
    }
}
