//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;

impl Config {
    /// Render the config as a commented TOML file. Used for the first-run
    /// template, `config --reset`, and `config --update`.
    pub fn to_toml(&self) -> String {
        format!(
            r#"# afya configuration

# Theme: Jamii Dark, Jamii Light, Dracula, Nord, Monokai
theme = "{theme}"

# Remote service
[api]
# Base URL of the AfyaJamii service (the /api/v1 prefix is added per request)
base_url = "{base_url}"
# Whole-request timeout in seconds. Advice requests wait on text generation,
# and the hosted service can take a while to wake from idle.
timeout_secs = {timeout_secs}

# Logging configuration (RUST_LOG env var overrides the level)
[logging]
level = "{log_level}"
# File logging (in addition to the in-app log pane)
file_enabled = {log_file_enabled}
file_dir = "{log_file_dir}"
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = "{log_file_prefix}"
"#,
            theme = self.theme,
            base_url = self.api.base_url,
            timeout_secs = self.api.timeout_secs,
            log_level = self.logging.level,
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = self.logging.file_dir.display(),
            log_file_rotation = self.logging.file_rotation.as_str(),
            log_file_prefix = self.logging.file_prefix,
        )
    }
}
