//! # Studio Configuration
//!
//! Timing and relay settings shared by the caption generator and the
//! feedback form. Supports loading from environment variables and
//! programmatic defaults.

use std::env;
use std::time::Duration;

/// Default Web3Forms submission endpoint.
pub const DEFAULT_RELAY_URL: &str = "https://api.web3forms.com/submit";

/// Configuration for the caption and feedback components.
///
/// # Example
/// ```rust
/// use caption_core::StudioConfig;
/// use std::time::Duration;
///
/// // Load from environment
/// let config = StudioConfig::from_env();
///
/// // Or customize
/// let config = StudioConfig::default()
///     .with_copied_reset(Duration::from_millis(500))
///     .with_access_key("my-access-key");
/// assert_eq!(config.access_key, "my-access-key");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudioConfig {
    /// How long the "copied" acknowledgement stays up.
    /// Default: 2s, Env: CAPTION_COPIED_RESET_MS=2000
    pub copied_reset: Duration,

    /// How long the feedback success/error banner stays up.
    /// Default: 4s, Env: CAPTION_BANNER_MS=4000
    pub banner_dismiss: Duration,

    /// Form relay endpoint.
    /// Default: Web3Forms, Env: WEB3FORMS_URL
    pub relay_url: String,

    /// Relay access key sent with every submission.
    /// Default: empty, Env: WEB3FORMS_ACCESS_KEY
    pub access_key: String,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            copied_reset: Duration::from_secs(2),
            banner_dismiss: Duration::from_secs(4),
            relay_url: DEFAULT_RELAY_URL.to_string(),
            access_key: String::new(),
        }
    }
}

impl StudioConfig {
    /// Create a new config from environment variables.
    /// Falls back to defaults for missing or unparsable variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = env::var("CAPTION_COPIED_RESET_MS") {
            if let Ok(ms) = v.parse() {
                config.copied_reset = Duration::from_millis(ms);
            }
        }
        if let Ok(v) = env::var("CAPTION_BANNER_MS") {
            if let Ok(ms) = v.parse() {
                config.banner_dismiss = Duration::from_millis(ms);
            }
        }
        if let Ok(v) = env::var("WEB3FORMS_URL") {
            config.relay_url = v;
        }
        if let Ok(v) = env::var("WEB3FORMS_ACCESS_KEY") {
            config.access_key = v;
        }

        config
    }

    /// Builder: Set the copied acknowledgement delay.
    pub fn with_copied_reset(mut self, delay: Duration) -> Self {
        self.copied_reset = delay;
        self
    }

    /// Builder: Set the banner auto-dismiss delay.
    pub fn with_banner_dismiss(mut self, delay: Duration) -> Self {
        self.banner_dismiss = delay;
        self
    }

    /// Builder: Set the relay endpoint.
    pub fn with_relay_url(mut self, url: impl Into<String>) -> Self {
        self.relay_url = url.into();
        self
    }

    /// Builder: Set the relay access key.
    pub fn with_access_key(mut self, key: impl Into<String>) -> Self {
        self.access_key = key.into();
        self
    }
}
