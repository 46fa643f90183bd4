//! Error taxonomy for the fan controller.
//! Transient errors are retried by the control loop; everything else is fatal.

use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ControlError>;

#[derive(Error, Debug)]
pub enum ControlError {
    #[error("Failed to execute ipmitool `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("ipmitool timed out after {}s: `{command}`", .timeout.as_secs_f64())]
    Timeout { command: String, timeout: Duration },

    #[error("ipmitool failed ({status}): `{command}`: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("No '{field}' line found in ipmitool output")]
    NoReadingFound { field: &'static str },

    #[error("Malformed sensor reading: {0}")]
    MalformedReading(String),

    #[error("No CPU temperature sensor found (sensors: {0})")]
    NoCpuSensor(String),

    #[error("Fan curve is degenerate: start_temp {start_temp} and end_temp {end_temp} must differ")]
    DegenerateCurve { start_temp: i32, end_temp: i32 },

    #[error("Invalid value for {key} ({value:?}): {reason}")]
    InvalidConfig {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("Giving up after {attempts} consecutive failures, last error: {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<ControlError>,
    },
}

impl ControlError {
    /// Hardware/communication failures that may clear up on the next poll.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ControlError::Spawn { .. }
                | ControlError::Timeout { .. }
                | ControlError::CommandFailed { .. }
                | ControlError::NoReadingFound { .. }
                | ControlError::MalformedReading(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_communication_failures_are_transient() {
        let timeout = ControlError::Timeout {
            command: "ipmitool sdr type temperature".to_string(),
            timeout: Duration::from_secs(10),
        };
        assert!(timeout.is_transient());
        assert!(ControlError::NoReadingFound { field: "Sensor Reading" }.is_transient());
        assert!(ControlError::MalformedReading("x".to_string()).is_transient());
    }

    #[test]
    fn test_data_errors_are_fatal() {
        assert!(!ControlError::NoCpuSensor("inlet".to_string()).is_transient());
        assert!(!ControlError::DegenerateCurve { start_temp: 70, end_temp: 70 }.is_transient());

        let exhausted = ControlError::RetriesExhausted {
            attempts: 10,
            last: Box::new(ControlError::MalformedReading("x".to_string())),
        };
        assert!(!exhausted.is_transient());
    }

    #[test]
    fn test_timeout_message_names_command() {
        let err = ControlError::Timeout {
            command: "ipmitool raw 0x30 0x30 0x01 0x00".to_string(),
            timeout: Duration::from_secs(5),
        };
        assert_eq!(
            err.to_string(),
            "ipmitool timed out after 5s: `ipmitool raw 0x30 0x30 0x01 0x00`"
        );
    }
}
