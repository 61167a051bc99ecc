//! Runtime settings from the environment (and `.env`), overridable on the command line

use std::path::PathBuf;
use std::time::Duration;

use crate::agent::openai::{DEFAULT_API_BASE, DEFAULT_MODEL};
use crate::agent::OpenAiConfig;
use crate::cli::GlobalArgs;
use crate::error::{HealthTwinError, Result};
use crate::pipeline::HandoffMode;

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const API_BASE_VAR: &str = "OPENAI_API_BASE";
pub const MODEL_VAR: &str = "OPENAI_MODEL_NAME";
pub const STAGE_TIMEOUT_VAR: &str = "HEALTH_TWIN_STAGE_TIMEOUT_SECS";
pub const REPORT_DIR_VAR: &str = "HEALTH_TWIN_REPORT_DIR";

pub const DEFAULT_STAGE_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_REPORT_DIR: &str = "./reports";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
    /// `None` disables the per-stage timeout
    pub stage_timeout: Option<Duration>,
    pub report_dir: PathBuf,
    pub handoff: HandoffMode,
    pub agents_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            stage_timeout: Some(Duration::from_secs(DEFAULT_STAGE_TIMEOUT_SECS)),
            report_dir: PathBuf::from(DEFAULT_REPORT_DIR),
            handoff: HandoffMode::default(),
            agents_file: None,
        }
    }
}

fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

impl Settings {
    /// Read settings from the process environment, loading `.env` first if present
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut settings = Self::default();

        settings.api_key = get(API_KEY_VAR);
        if let Some(base) = get(API_BASE_VAR) {
            settings.api_base = base;
        }
        if let Some(model) = get(MODEL_VAR) {
            settings.model = model;
        }
        if let Some(raw) = get(STAGE_TIMEOUT_VAR) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                HealthTwinError::Config(format!(
                    "{} must be a whole number of seconds, got `{}`",
                    STAGE_TIMEOUT_VAR, raw
                ))
            })?;
            settings.stage_timeout = timeout_from_secs(secs);
        }
        if let Some(dir) = get(REPORT_DIR_VAR) {
            settings.report_dir = PathBuf::from(dir);
        }

        Ok(settings)
    }

    /// Command line flags win over the environment
    pub fn merge_args(mut self, args: &GlobalArgs) -> Self {
        if let Some(model) = &args.model {
            self.model = model.clone();
        }
        if let Some(secs) = args.timeout_secs {
            self.stage_timeout = timeout_from_secs(secs);
        }
        if let Some(dir) = &args.report_dir {
            self.report_dir = dir.clone();
        }
        if let Some(handoff) = args.handoff {
            self.handoff = handoff;
        }
        if let Some(agents) = &args.agents {
            self.agents_file = Some(agents.clone());
        }
        self
    }

    /// Engine settings; fails when no API key is configured
    pub fn openai_config(&self) -> Result<OpenAiConfig> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            HealthTwinError::Config(format!("{} is not set (add it to .env)", API_KEY_VAR))
        })?;
        Ok(OpenAiConfig::new(api_key)
            .with_base_url(self.api_base.clone())
            .with_model(self.model.clone()))
    }
}
