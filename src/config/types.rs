//! Controller configuration structs and defaults.

use std::time::Duration;

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ControlConfig {
    pub connection: ConnectionSettings,
    pub curve: CurveSettings,
    /// Seconds between the start of two consecutive polls
    pub interval_secs: u64,
    pub report_cpu_utilization: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConnectionSettings {
    pub host: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub timeout_secs: u64,
}

/// Curve anchor points. Always already clamped when built through the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CurveSettings {
    pub start_temp: i32, // 10-70
    pub start_fan: i32,  // 0-100
    pub end_temp: i32,   // start_temp-70
    pub end_fan: i32,    // start_fan-100
}

pub const DEFAULT_HOST: &str = "192.168.0.120";
pub const DEFAULT_USERNAME: &str = "root";
pub const DEFAULT_PASSWORD: &str = "calvin";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_INTERVAL_SECS: u64 = 30;

impl ConnectionSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ControlConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for CurveSettings {
    fn default() -> Self {
        Self {
            start_temp: 40,
            start_fan: 0,
            end_temp: 65,
            end_fan: 60,
        }
    }
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            username: DEFAULT_USERNAME.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            connection: ConnectionSettings::default(),
            curve: CurveSettings::default(),
            interval_secs: DEFAULT_INTERVAL_SECS,
            report_cpu_utilization: false,
        }
    }
}
