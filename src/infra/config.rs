//! Configuration loading from TOML files
//!
//! Config file is selected via:
//! 1. --config <path> command line argument
//! 2. CONFIG_FILE environment variable
//! 3. Default: config/dev.toml
//!
//! Credentials may also come from the environment (SUPABASE_URL,
//! SUPABASE_SERVICE_ROLE_KEY, TWILIO_ACCOUNT_SID, TWILIO_AUTH_TOKEN,
//! TWILIO_PHONE_NUMBER), which take precedence over the file.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct SupabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub service_role_key: String,
    #[serde(default = "default_http_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            service_role_key: String::new(),
            timeout_ms: default_http_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TwilioConfig {
    #[serde(default)]
    pub account_sid: String,
    #[serde(default)]
    pub auth_token: String,
    /// Sender number in E.164 format
    #[serde(default)]
    pub from_number: String,
    #[serde(default = "default_twilio_api_base")]
    pub api_base: String,
    #[serde(default = "default_http_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for TwilioConfig {
    fn default() -> Self {
        Self {
            account_sid: String::new(),
            auth_token: String::new(),
            from_number: String::new(),
            api_base: default_twilio_api_base(),
            timeout_ms: default_http_timeout_ms(),
        }
    }
}

fn default_http_timeout_ms() -> u64 {
    10_000
}

fn default_twilio_api_base() -> String {
    "https://api.twilio.com".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct HoursConfig {
    #[serde(default = "default_hours_enabled")]
    pub enabled: bool,
    /// IANA time zone name
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_open_hour")]
    pub open_hour: u32,
    /// Exclusive
    #[serde(default = "default_close_hour")]
    pub close_hour: u32,
}

impl Default for HoursConfig {
    fn default() -> Self {
        Self {
            enabled: default_hours_enabled(),
            timezone: default_timezone(),
            open_hour: default_open_hour(),
            close_hour: default_close_hour(),
        }
    }
}

fn default_hours_enabled() -> bool {
    true
}

fn default_timezone() -> String {
    "Australia/Adelaide".to_string()
}

fn default_open_hour() -> u32 {
    8
}

fn default_close_hour() -> u32 {
    20
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageConfig {
    /// `{name}` is replaced with the customer's name
    #[serde(default = "default_message_template")]
    pub template: String,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self { template: default_message_template() }
    }
}

fn default_message_template() -> String {
    "Hi {name}, you're almost up at the barber!".to_string()
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub supabase: SupabaseConfig,
    #[serde(default)]
    pub twilio: TwilioConfig,
    #[serde(default)]
    pub hours: HoursConfig,
    #[serde(default)]
    pub message: MessageConfig,
}

/// Main configuration struct used throughout the application
#[derive(Debug, Clone)]
pub struct Config {
    supabase_url: String,
    supabase_key: String,
    supabase_timeout_ms: u64,
    twilio_account_sid: String,
    twilio_auth_token: String,
    twilio_from_number: String,
    twilio_api_base: String,
    twilio_timeout_ms: u64,
    hours_enabled: bool,
    timezone: String,
    open_hour: u32,
    close_hour: u32,
    message_template: String,
    config_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_toml(TomlConfig::default(), "default".to_string())
    }
}

impl Config {
    fn from_toml(toml_config: TomlConfig, config_file: String) -> Self {
        Self {
            supabase_url: toml_config.supabase.url,
            supabase_key: toml_config.supabase.service_role_key,
            supabase_timeout_ms: toml_config.supabase.timeout_ms,
            twilio_account_sid: toml_config.twilio.account_sid,
            twilio_auth_token: toml_config.twilio.auth_token,
            twilio_from_number: toml_config.twilio.from_number,
            twilio_api_base: toml_config.twilio.api_base,
            twilio_timeout_ms: toml_config.twilio.timeout_ms,
            hours_enabled: toml_config.hours.enabled,
            timezone: toml_config.hours.timezone,
            open_hour: toml_config.hours.open_hour,
            close_hour: toml_config.hours.close_hour,
            message_template: toml_config.message.template,
            config_file,
        }
    }

    /// Determine config file path from the CLI flag or environment
    pub fn resolve_config_path(cli_path: Option<&str>) -> String {
        if let Some(path) = cli_path {
            return path.to_string();
        }

        // Check CONFIG_FILE environment variable
        if let Ok(path) = env::var("CONFIG_FILE") {
            return path;
        }

        // Default to dev.toml
        "config/dev.toml".to_string()
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let toml_config: TomlConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(Self::from_toml(toml_config, path.display().to_string()))
    }

    /// Load configuration - tries TOML file first, falls back to defaults.
    /// Environment credentials are applied either way.
    pub fn load_from_path(path: &str) -> Self {
        let config = match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Warning: {:#}. Using defaults.", e);
                Self::default()
            }
        };
        config.with_env_overrides(|key| env::var(key).ok())
    }

    /// Overlay credentials from `lookup` (normally the process environment)
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let overrides: [(&str, &mut String); 5] = [
            ("SUPABASE_URL", &mut self.supabase_url),
            ("SUPABASE_SERVICE_ROLE_KEY", &mut self.supabase_key),
            ("TWILIO_ACCOUNT_SID", &mut self.twilio_account_sid),
            ("TWILIO_AUTH_TOKEN", &mut self.twilio_auth_token),
            ("TWILIO_PHONE_NUMBER", &mut self.twilio_from_number),
        ];
        for (key, field) in overrides {
            if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
                *field = value;
            }
        }
        self
    }

    /// Check that the credentials needed for a run are present.
    /// Twilio credentials are not needed when nothing will be sent.
    pub fn validate(&self, dry_run: bool) -> anyhow::Result<()> {
        let mut missing = Vec::new();
        if self.supabase_url.trim().is_empty() {
            missing.push("supabase.url");
        }
        if self.supabase_key.trim().is_empty() {
            missing.push("supabase.service_role_key");
        }
        if !dry_run {
            if self.twilio_account_sid.trim().is_empty() {
                missing.push("twilio.account_sid");
            }
            if self.twilio_auth_token.trim().is_empty() {
                missing.push("twilio.auth_token");
            }
            if self.twilio_from_number.trim().is_empty() {
                missing.push("twilio.from_number");
            }
        }
        if !missing.is_empty() {
            bail!("missing configuration: {}", missing.join(", "));
        }
        Ok(())
    }

    // Getters for all config fields
    pub fn supabase_url(&self) -> &str {
        &self.supabase_url
    }

    pub fn supabase_key(&self) -> &str {
        &self.supabase_key
    }

    pub fn supabase_timeout_ms(&self) -> u64 {
        self.supabase_timeout_ms
    }

    pub fn twilio_account_sid(&self) -> &str {
        &self.twilio_account_sid
    }

    pub fn twilio_auth_token(&self) -> &str {
        &self.twilio_auth_token
    }

    pub fn twilio_from_number(&self) -> &str {
        &self.twilio_from_number
    }

    pub fn twilio_api_base(&self) -> &str {
        &self.twilio_api_base
    }

    pub fn twilio_timeout_ms(&self) -> u64 {
        self.twilio_timeout_ms
    }

    pub fn hours_enabled(&self) -> bool {
        self.hours_enabled
    }

    pub fn timezone(&self) -> &str {
        &self.timezone
    }

    pub fn open_hour(&self) -> u32 {
        self.open_hour
    }

    pub fn close_hour(&self) -> u32 {
        self.close_hour
    }

    pub fn message_template(&self) -> &str {
        &self.message_template
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    /// Builder method for tests to point Supabase at a given URL/key
    #[cfg(test)]
    pub fn with_supabase(mut self, url: &str, key: &str) -> Self {
        self.supabase_url = url.to_string();
        self.supabase_key = key.to_string();
        self
    }

    /// Builder method for tests to set Twilio credentials
    #[cfg(test)]
    pub fn with_twilio(mut self, account_sid: &str, auth_token: &str, from_number: &str) -> Self {
        self.twilio_account_sid = account_sid.to_string();
        self.twilio_auth_token = auth_token.to_string();
        self.twilio_from_number = from_number.to_string();
        self
    }
}
