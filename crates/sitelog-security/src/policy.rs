use serde::{Deserialize, Serialize};
use sitelog_core::{SitelogError, SitelogResult};

/// Limits applied to authentication attempts per identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitPolicy {
    /// Attempts admitted inside one window before the identifier is blocked.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Window length in seconds, measured from the last counted attempt.
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            window_secs: default_window_secs(),
        }
    }
}

impl RateLimitPolicy {
    /// Rejects policies that would block everyone or never expire.
    pub fn validate(&self) -> SitelogResult<()> {
        if self.max_attempts == 0 {
            return Err(SitelogError::Config(
                "auth_rate_limit.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.window_secs == 0 {
            return Err(SitelogError::Config(
                "auth_rate_limit.window_secs must be at least 1".to_string(),
            ));
        }
        // chrono durations are bounded by i64 milliseconds
        if i64::try_from(self.window_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .is_none()
        {
            return Err(SitelogError::Config(format!(
                "auth_rate_limit.window_secs {} is out of range",
                self.window_secs
            )));
        }
        Ok(())
    }

    /// The window as a chrono duration, saturating for out-of-range values.
    pub fn window(&self) -> chrono::Duration {
        i64::try_from(self.window_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::MAX)
    }
}

fn default_max_attempts() -> u32 {
    5
}
fn default_window_secs() -> u64 {
    15 * 60
}
