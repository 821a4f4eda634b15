use serde::{Deserialize, Serialize};

use crate::device::constants::{CONNECT_DELAY, RAW_SAMPLE_INTERVAL, READING_INTERVAL};

pub const DEFAULT_ABOUT_URL: &str = "https://github.com/RacZo/EEGStarter";

/**
 * How a connect request to the simulated headset ends.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConnectOutcome {
    Connected,
    NotFound,
    NotPaired,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeadsetConfig {
    pub connect_delay_ms: u64,
    pub outcome: ConnectOutcome,
    pub reading_interval_ms: u64,
    pub raw_sample_interval_ms: u64,
    // only some headset models report a heart rate
    pub heart_rate: bool,
    // emit 8 channel raw samples next to the single channel ones (raw mode only)
    pub multi_channel: bool,
    pub low_battery_after_secs: Option<u64>,
}

impl Default for HeadsetConfig {
    fn default() -> Self {
        HeadsetConfig {
            connect_delay_ms: CONNECT_DELAY,
            outcome: ConnectOutcome::Connected,
            reading_interval_ms: READING_INTERVAL,
            raw_sample_interval_ms: RAW_SAMPLE_INTERVAL,
            heart_rate: false,
            multi_channel: false,
            low_battery_after_secs: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    // fixed for the lifetime of the session
    pub raw_mode: bool,
    pub about_url: String,
    pub headset: HeadsetConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            raw_mode: true,
            about_url: DEFAULT_ABOUT_URL.to_string(),
            headset: HeadsetConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keys_use_defaults() {
        let config: Config = serde_json::from_str(r#"{"rawMode": false}"#).unwrap();
        assert!(!config.raw_mode);
        assert_eq!(config.about_url, DEFAULT_ABOUT_URL);
        assert_eq!(config.headset, HeadsetConfig::default());
    }

    #[test]
    fn test_headset_keys_are_camel_case() {
        let json = r#"{
            "headset": {
                "connectDelayMs": 5,
                "outcome": "notPaired",
                "heartRate": true,
                "lowBatteryAfterSecs": 60
            }
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.raw_mode);
        assert_eq!(config.headset.connect_delay_ms, 5);
        assert_eq!(config.headset.outcome, ConnectOutcome::NotPaired);
        assert!(config.headset.heart_rate);
        assert_eq!(config.headset.low_battery_after_secs, Some(60));
        assert_eq!(config.headset.reading_interval_ms, READING_INTERVAL);
    }

    #[test]
    fn test_unknown_outcome_is_rejected() {
        let result = serde_json::from_str::<Config>(r#"{"headset": {"outcome": "maybe"}}"#);
        assert!(result.is_err());
    }
}
