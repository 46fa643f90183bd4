//! ipmitool text output parsers.
//! `sdr type temperature` rows look like:
//! "Inlet Temp       | 04h | ok  |  7.1 | 23 degrees C"

use crate::error::{ControlError, Result};
use crate::hardware::types::TemperatureReading;

/// Substring a temperature reading must carry to be kept.
pub const TEMP_UNIT_TOKEN: &str = "degrees";
pub const SENSOR_READING_FIELD: &str = "Sensor Reading";

/// Parse `sdr type temperature` output into sensor name -> degrees.
/// Never fails: malformed rows and sensors without a reading are dropped.
pub fn parse_temperatures(output: &str) -> TemperatureReading {
    let mut temps = TemperatureReading::new();

    for line in output.lines() {
        let cols: Vec<&str> = line.split('|').map(str::trim).collect();
        if cols.len() < 2 {
            continue;
        }

        let Some(reading) = cols.get(4) else {
            continue;
        };
        // "disabled", "no reading", "ns"
        if !reading.contains(TEMP_UNIT_TOKEN) {
            continue;
        }

        let Some(value) = reading.split(' ').next().and_then(|v| v.parse::<i32>().ok()) else {
            continue;
        };

        let mut name = cols[0].to_lowercase().replace("temp", "").trim().to_string();
        // Dell BMCs report both CPU sockets as a bare "Temp"
        if name.is_empty() {
            name = if temps.contains("cpu1") { "cpu2" } else { "cpu1" }.to_string();
        }

        temps.insert(name, value);
    }

    temps
}

/// Parse `sdr get "CPU Usage"` output and return the integer utilisation.
/// " Sensor Reading        : 3 (+/- 0) percent" -> 3
pub fn parse_cpu_utilization(output: &str) -> Result<i32> {
    let line = output
        .lines()
        .find(|line| line.contains(SENSOR_READING_FIELD))
        .ok_or(ControlError::NoReadingFound { field: SENSOR_READING_FIELD })?;

    let value = line
        .split_once(':')
        .map(|(_, v)| v.trim())
        .and_then(|v| v.split_whitespace().next())
        .ok_or_else(|| ControlError::MalformedReading(line.trim().to_string()))?;

    value
        .parse::<i32>()
        .map_err(|_| ControlError::MalformedReading(line.trim().to_string()))
}
