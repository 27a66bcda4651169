//! API configuration

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use core_kernel::{PortError, TemporalError, Timezone};
use domain_claims::FollowUpDelays;
use domain_intake::OpenAiConfig;
use domain_notification::DeliveryDelays;

/// API configuration
///
/// Every field has a default, so an empty environment yields a working
/// local server with conversational intake switched off.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Log level
    pub log_level: String,
    /// IANA zone used for the pricing time bands
    pub timezone: String,

    /// Wait after approval before the dispatch message
    pub dispatch_followup_ms: u64,
    /// Wait after the dispatch message before the arrival update
    pub arrival_followup_ms: u64,

    pub approval_delivery_ms: u64,
    pub dispatch_delivery_ms: u64,
    pub arrival_delivery_ms: u64,

    /// Conversational intake is disabled without a key
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub openai_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        let openai = OpenAiConfig::default();
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            timezone: "UTC".to_string(),
            dispatch_followup_ms: 5000,
            arrival_followup_ms: 3000,
            approval_delivery_ms: 2000,
            dispatch_delivery_ms: 1500,
            arrival_delivery_ms: 1000,
            openai_api_key: None,
            openai_model: openai.model,
            openai_base_url: openai.base_url,
            openai_timeout_secs: openai.timeout_secs,
        }
    }
}

/// Reasons the application state could not be assembled
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error(transparent)]
    Timezone(#[from] TemporalError),

    #[error("Failed to start the extraction adapter: {0}")]
    Extractor(#[from] PortError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ApiConfig {
    /// Loads configuration from `API_*` environment variables
    ///
    /// `OPENAI_API_KEY` is accepted when `API_OPENAI_API_KEY` is not set.
    pub fn from_env() -> Result<Self, SetupError> {
        let mut config: ApiConfig = config::Config::builder()
            .add_source(config::Environment::with_prefix("API").try_parsing(true))
            .build()?
            .try_deserialize()?;

        if config.openai_api_key.is_none() {
            config.openai_api_key = std::env::var("OPENAI_API_KEY").ok();
        }
        config.validate()?;
        Ok(config)
    }

    /// Follow-up delays must be positive to keep dispatch after approval
    pub fn validate(&self) -> Result<(), SetupError> {
        for (name, value) in [
            ("dispatch_followup_ms", self.dispatch_followup_ms),
            ("arrival_followup_ms", self.arrival_followup_ms),
        ] {
            if value == 0 {
                return Err(SetupError::Invalid(format!("{name} must be at least 1")));
            }
        }
        Ok(())
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn timezone(&self) -> Result<Timezone, TemporalError> {
        self.timezone.parse()
    }

    pub fn followup_delays(&self) -> FollowUpDelays {
        FollowUpDelays {
            dispatch: Duration::from_millis(self.dispatch_followup_ms),
            arrival: Duration::from_millis(self.arrival_followup_ms),
        }
    }

    pub fn delivery_delays(&self) -> DeliveryDelays {
        DeliveryDelays {
            approval: Duration::from_millis(self.approval_delivery_ms),
            dispatch: Duration::from_millis(self.dispatch_delivery_ms),
            arrival: Duration::from_millis(self.arrival_delivery_ms),
        }
    }

    /// OpenAI settings, or `None` when no usable key is configured
    pub fn openai(&self) -> Option<OpenAiConfig> {
        let api_key = self
            .openai_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())?;

        Some(OpenAiConfig {
            api_key: api_key.to_string(),
            model: self.openai_model.clone(),
            base_url: self.openai_base_url.clone(),
            timeout_secs: self.openai_timeout_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_notification_timings() {
        let config = ApiConfig::default();
        assert_eq!(config.followup_delays(), FollowUpDelays::default());
        assert_eq!(config.delivery_delays(), DeliveryDelays::default());
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_blank_key_disables_intake() {
        let mut config = ApiConfig::default();
        assert!(config.openai().is_none());

        config.openai_api_key = Some("   ".to_string());
        assert!(config.openai().is_none());

        config.openai_api_key = Some("sk-test".to_string());
        let openai = config.openai().unwrap();
        assert_eq!(openai.api_key, "sk-test");
        assert_eq!(openai.model, "gpt-4");
    }

    #[test]
    fn test_zero_followup_delay_is_rejected() {
        assert!(ApiConfig::default().validate().is_ok());

        let config = ApiConfig {
            arrival_followup_ms: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.to_string(), "Invalid configuration: arrival_followup_ms must be at least 1");

        let config = ApiConfig {
            dispatch_followup_ms: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(SetupError::Invalid(_))));
    }

    #[test]
    fn test_unknown_timezone_is_rejected() {
        let config = ApiConfig {
            timezone: "Mars/Olympus".to_string(),
            ..Default::default()
        };
        assert!(config.timezone().is_err());
    }
}
