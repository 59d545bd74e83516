use log::warn;
use std::str::FromStr;
use std::time::Duration;

pub const RESPONSE_TIMEOUT: Duration = Duration::from_millis(500);
pub const QUEUE_TIMEOUT: Duration = Duration::from_millis(5000);
pub const DEFAULT_RETRY_COUNT: u32 = 10;

/// Master options.
///
/// Text form is a comma separated list of `key=value` pairs, timeouts in
/// milliseconds: `response_timeout=300,queue_timeout=1000,retry_count=3`.
/// Unknown keys are skipped, missing keys keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Wait for a slave reply, per transport call
    pub response_timeout: Duration,
    /// Wait for the line to become free
    pub queue_timeout: Duration,
    /// Attempts of a single register write when the call gives none
    pub retry_count: u32,
}

impl Default for Settings {
    fn default() -> Settings {
        Settings {
            response_timeout: RESPONSE_TIMEOUT,
            queue_timeout: QUEUE_TIMEOUT,
            retry_count: DEFAULT_RETRY_COUNT,
        }
    }
}

fn parse_ms(value: &str) -> Result<Duration, &'static str> {
    u64::from_str(value)
        .map(Duration::from_millis)
        .map_err(|_| "invalid timeout")
}

impl FromStr for Settings {
    type Err = &'static str;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut settings = Settings::default();
        for option in s.split(',').map(str::trim).filter(|o| !o.is_empty()) {
            let (key, value) = option.split_once('=').ok_or("expected key=value")?;
            match key.trim() {
                "response_timeout" => settings.response_timeout = parse_ms(value.trim())?,
                "queue_timeout" => settings.queue_timeout = parse_ms(value.trim())?,
                "retry_count" => {
                    settings.retry_count =
                        u32::from_str(value.trim()).map_err(|_| "invalid retry count")?
                }
                other => warn!("ignore unknown option {}", other),
            }
        }
        Ok(settings)
    }
}
