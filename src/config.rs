//! Configuration loaded from `interview-desk.toml`.
//!
//! [`DeskConfig`] holds collaborator endpoints, the company name used in
//! notification templates and list paging sizes. Missing keys fall back to
//! defaults. `INTERVIEW_DESK_API_TOKEN` takes precedence over the file's token.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::HttpWorkflowEngine;
use crate::api::{HttpInterviewStore, HttpMailSender, HttpMeetingProvisioner, HttpTransport};

pub const DEFAULT_CONFIG_FILE: &str = "interview-desk.toml";
pub const TOKEN_ENV: &str = "INTERVIEW_DESK_API_TOKEN";

#[derive(Debug, Clone, Deserialize)]
pub struct DeskConfig {
    /// Record store REST base URL.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_meeting_base_url")]
    pub meeting_base_url: String,

    #[serde(default = "default_mail_base_url")]
    pub mail_base_url: String,

    /// Bearer token sent to every collaborator.
    #[serde(default)]
    pub api_token: String,

    /// Interpolated into notification templates.
    #[serde(default = "default_company_name")]
    pub company_name: String,

    #[serde(default = "default_meeting_duration_minutes")]
    pub meeting_duration_minutes: u32,

    #[serde(default = "default_short_page_size")]
    pub short_page_size: usize,

    #[serde(default = "default_long_page_size")]
    pub long_page_size: usize,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_api_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_meeting_base_url() -> String {
    "http://localhost:8081".to_string()
}

fn default_mail_base_url() -> String {
    "http://localhost:8082".to_string()
}

fn default_company_name() -> String {
    "Our Company".to_string()
}

fn default_meeting_duration_minutes() -> u32 {
    60
}

fn default_short_page_size() -> usize {
    5
}

fn default_long_page_size() -> usize {
    10
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            meeting_base_url: default_meeting_base_url(),
            mail_base_url: default_mail_base_url(),
            api_token: String::new(),
            company_name: default_company_name(),
            meeting_duration_minutes: default_meeting_duration_minutes(),
            short_page_size: default_short_page_size(),
            long_page_size: default_long_page_size(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl DeskConfig {
    /// Load `interview-desk.toml` from the working directory, or defaults if absent.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_CONFIG_FILE), false)
    }

    /// Load from `path`. A missing file is an error only when `required`.
    pub fn load_from(path: &Path, required: bool) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            toml::from_str::<DeskConfig>(&contents)
                .with_context(|| format!("failed to parse {}", path.display()))?
        } else if required {
            anyhow::bail!("config file {} does not exist", path.display());
        } else {
            Self::default()
        };

        if let Ok(token) = std::env::var(TOKEN_ENV)
            && !token.is_empty()
        {
            config.api_token = token;
        }

        Ok(config)
    }

    pub fn page_size(&self, long: bool) -> usize {
        if long {
            self.long_page_size
        } else {
            self.short_page_size
        }
    }

    /// Build the engine against the configured HTTP collaborators.
    pub fn engine(&self) -> Result<HttpWorkflowEngine> {
        let transport = HttpTransport::new(
            self.api_token.clone(),
            Duration::from_secs(self.request_timeout_secs),
        )
        .context("failed to build HTTP client")?;
        Ok(HttpWorkflowEngine::new(
            HttpInterviewStore::new(transport.clone(), self.api_base_url.clone()),
            HttpMeetingProvisioner::new(transport.clone(), self.meeting_base_url.clone()),
            HttpMailSender::new(transport, self.mail_base_url.clone()),
            self.company_name.clone(),
        ))
    }
}
