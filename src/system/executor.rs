//! ipmitool subprocess executor.
//! Every call runs `ipmitool -I lanplus -H <host> -U <user> -P <password> ...`
//! and is bounded by the configured timeout.

use std::process::Stdio;
use std::time::Duration;

use tracing::{debug, trace};

use crate::config::types::ConnectionSettings;
use crate::error::{ControlError, Result};

const IPMITOOL: &str = "ipmitool";

#[derive(Debug, Clone)]
pub struct IpmiTool {
    program: String,
    connection: ConnectionSettings,
}

impl IpmiTool {
    pub fn new(connection: ConnectionSettings) -> Self {
        Self {
            program: IPMITOOL.to_string(),
            connection,
        }
    }

    #[cfg(test)]
    pub fn with_program(mut self, program: &str) -> Self {
        self.program = program.to_string();
        self
    }

    pub fn timeout(&self) -> Duration {
        self.connection.timeout()
    }

    /// Build an ipmitool Command routed over LAN to the configured BMC.
    pub fn build_command(&self, args: &[&str]) -> std::process::Command {
        let mut cmd = std::process::Command::new(&self.program);
        cmd.args([
            "-I", "lanplus",
            "-H", &self.connection.host,
            "-U", &self.connection.username,
            "-P", &self.connection.password,
        ]);
        cmd.args(args);
        cmd
    }

    /// Printable command line with the password masked.
    pub fn describe(&self, args: &[&str]) -> String {
        format!(
            "{} -I lanplus -H {} -U {} -P **** {}",
            self.program,
            self.connection.host,
            self.connection.username,
            args.join(" ")
        )
    }

    /// Execute ipmitool with the given subcommand and return stdout.
    /// The child is killed if the timeout expires or the future is dropped.
    pub async fn run(&self, args: &[&str]) -> Result<String> {
        let described = self.describe(args);
        trace!("Executing: {}", described);

        let mut cmd = tokio::process::Command::from(self.build_command(args));
        cmd.stdin(Stdio::null()).kill_on_drop(true);

        let timeout = self.timeout();
        let output = match tokio::time::timeout(timeout, cmd.output()).await {
            Err(_) => {
                return Err(ControlError::Timeout { command: described, timeout });
            }
            Ok(Err(source)) => {
                return Err(ControlError::Spawn { command: described, source });
            }
            Ok(Ok(output)) => output,
        };

        if !output.status.success() {
            return Err(ControlError::CommandFailed {
                command: described,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        debug!("ipmitool {} returned {} bytes", args.join(" "), output.stdout.len());
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Execute `ipmitool raw <bytes>` for OEM commands.
    pub async fn run_raw(&self, bytes: &[&str]) -> Result<String> {
        let mut args = vec!["raw"];
        args.extend_from_slice(bytes);
        self.run(&args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool() -> IpmiTool {
        IpmiTool::new(ConnectionSettings {
            host: "10.1.2.3".to_string(),
            username: "admin".to_string(),
            password: "secret".to_string(),
            timeout_secs: 1,
        })
    }

    #[test]
    fn test_command_has_fixed_connection_shape() {
        let cmd = tool().build_command(&["sdr", "type", "temperature"]);
        assert_eq!(cmd.get_program().to_string_lossy(), "ipmitool");
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().to_string()).collect();
        assert_eq!(
            args,
            vec!["-I", "lanplus", "-H", "10.1.2.3", "-U", "admin", "-P", "secret", "sdr", "type", "temperature"]
        );
    }

    #[test]
    fn test_describe_masks_password() {
        let described = tool().describe(&["raw", "0x30", "0x30", "0x01", "0x01"]);
        assert!(!described.contains("secret"));
        assert_eq!(described, "ipmitool -I lanplus -H 10.1.2.3 -U admin -P **** raw 0x30 0x30 0x01 0x01");
    }

    #[tokio::test]
    async fn test_missing_binary_is_spawn_error() {
        let tool = tool().with_program("/nonexistent/ipmitool-binary");
        let err = tool.run(&["sdr", "type", "temperature"]).await.unwrap_err();
        assert!(matches!(err, ControlError::Spawn { .. }));
        assert!(err.is_transient());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit_is_command_failed() {
        // `false` ignores its arguments and exits 1
        let tool = tool().with_program("false");
        let err = tool.run_raw(&["0x30", "0x30", "0x01", "0x00"]).await.unwrap_err();
        match err {
            ControlError::CommandFailed { command, .. } => {
                assert!(command.ends_with("raw 0x30 0x30 0x01 0x00"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_hung_bmc_is_timeout_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("ipmitool");
        std::fs::write(&script, "#!/bin/sh\nexec sleep 30\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let tool = tool().with_program(script.to_str().unwrap());
        let started = std::time::Instant::now();
        let err = tool.run(&["sdr", "type", "temperature"]).await.unwrap_err();

        match &err {
            ControlError::Timeout { command, timeout } => {
                assert_eq!(*timeout, Duration::from_secs(1));
                assert!(command.ends_with("-P **** sdr type temperature"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.is_transient());
        assert!(started.elapsed() < Duration::from_secs(10));
    }
}
