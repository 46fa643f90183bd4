//! Environment loading: parse and validate every key once at startup.

use tracing::{debug, warn};

use crate::config::types::{ConnectionSettings, ControlConfig, CurveSettings};
use crate::error::{ControlError, Result};

pub const KEY_HOST: &str = "IPMI_IP";
pub const KEY_USERNAME: &str = "IPMI_USER";
pub const KEY_PASSWORD: &str = "IPMI_PWD";
pub const KEY_TIMEOUT: &str = "IPMI_TIMEOUT";
pub const KEY_START_TEMP: &str = "START_TEMP";
pub const KEY_START_FAN: &str = "START_FAN";
pub const KEY_END_TEMP: &str = "END_TEMP";
pub const KEY_END_FAN: &str = "END_FAN";
pub const KEY_INTERVAL: &str = "INTERVAL";
pub const KEY_CPU_UTIL: &str = "CPU_UTIL";

/// Load configuration from the process environment.
pub fn load_config() -> Result<ControlConfig> {
    load_config_from(|key| std::env::var(key).ok())
}

/// Load configuration through an arbitrary key lookup.
/// Empty values count as unset.
pub fn load_config_from<F>(lookup: F) -> Result<ControlConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
    let defaults = ControlConfig::default();

    let connection = ConnectionSettings {
        host: get(KEY_HOST).unwrap_or(defaults.connection.host),
        username: get(KEY_USERNAME).unwrap_or(defaults.connection.username),
        password: get(KEY_PASSWORD).unwrap_or(defaults.connection.password),
        timeout_secs: parse_positive(KEY_TIMEOUT, get(KEY_TIMEOUT), defaults.connection.timeout_secs)?,
    };

    let raw = CurveSettings {
        start_temp: parse_int(KEY_START_TEMP, get(KEY_START_TEMP), defaults.curve.start_temp)?,
        start_fan: parse_int(KEY_START_FAN, get(KEY_START_FAN), defaults.curve.start_fan)?,
        end_temp: parse_int(KEY_END_TEMP, get(KEY_END_TEMP), defaults.curve.end_temp)?,
        end_fan: parse_int(KEY_END_FAN, get(KEY_END_FAN), defaults.curve.end_fan)?,
    };

    let config = ControlConfig {
        connection,
        curve: clamp_curve(raw),
        interval_secs: parse_positive(KEY_INTERVAL, get(KEY_INTERVAL), defaults.interval_secs)?,
        report_cpu_utilization: parse_flag(KEY_CPU_UTIL, get(KEY_CPU_UTIL), defaults.report_cpu_utilization)?,
    };

    debug!("Loaded configuration: {:?}", config.curve);
    Ok(config)
}

/// Clamp the curve anchors into their operating ranges.
/// start_temp 10-70, end_temp start_temp-70, start_fan 0-100, end_fan start_fan-100.
pub fn clamp_curve(raw: CurveSettings) -> CurveSettings {
    let start_temp = raw.start_temp.clamp(10, 70);
    let end_temp = raw.end_temp.clamp(start_temp, 70);
    let start_fan = raw.start_fan.clamp(0, 100);
    let end_fan = raw.end_fan.clamp(start_fan, 100);

    let clamped = CurveSettings { start_temp, start_fan, end_temp, end_fan };
    if clamped != raw {
        warn!("Curve settings out of range, clamped from {:?} to {:?}", raw, clamped);
    }
    clamped
}

fn parse_int(key: &'static str, value: Option<String>, default: i32) -> Result<i32> {
    match value {
        None => Ok(default),
        Some(v) => v.trim().parse::<i32>().map_err(|e| ControlError::InvalidConfig {
            key,
            value: v.clone(),
            reason: format!("expected an integer ({})", e),
        }),
    }
}

fn parse_positive(key: &'static str, value: Option<String>, default: u64) -> Result<u64> {
    let Some(v) = value else {
        return Ok(default);
    };
    let parsed = v.trim().parse::<u64>().map_err(|e| ControlError::InvalidConfig {
        key,
        value: v.clone(),
        reason: format!("expected a whole number of seconds ({})", e),
    })?;
    if parsed == 0 {
        return Err(ControlError::InvalidConfig {
            key,
            value: v,
            reason: "must be at least 1 second".to_string(),
        });
    }
    Ok(parsed)
}

fn parse_flag(key: &'static str, value: Option<String>, default: bool) -> Result<bool> {
    let Some(v) = value else {
        return Ok(default);
    };
    match v.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ControlError::InvalidConfig {
            key,
            value: v,
            reason: "expected one of 1/0, true/false, yes/no, on/off".to_string(),
        }),
    }
}
