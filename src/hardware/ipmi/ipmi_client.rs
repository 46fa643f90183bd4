//! IPMI management client — implements ManagementInterface using ipmitool over LAN.
//! Raw commands target the Dell iDRAC OEM fan interface (netfn 0x30, cmd 0x30).

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::Result;
use crate::hardware::types::TemperatureReading;
use crate::hardware::ManagementInterface;
use crate::system::executor::IpmiTool;
use crate::system::parser;

const SDR_TEMPERATURES: &[&str] = &["sdr", "type", "temperature"];
const SDR_CPU_USAGE: &[&str] = &["sdr", "get", "CPU Usage", "0x01", "0x01"];
const RAW_SET_DUTY_CYCLE: &[&str] = &["0x30", "0x30", "0x02", "0xff"];
const RAW_MANUAL_MODE: &[&str] = &["0x30", "0x30", "0x01", "0x00"];
const RAW_AUTOMATIC_MODE: &[&str] = &["0x30", "0x30", "0x01", "0x01"];

pub struct IpmiClient {
    tool: IpmiTool,
    dry_run: bool,
}

impl IpmiClient {
    pub fn new(tool: IpmiTool, dry_run: bool) -> Self {
        Self { tool, dry_run }
    }

    /// Run a raw write command, or only log it in dry-run mode.
    async fn write_raw(&self, bytes: &[&str]) -> Result<()> {
        if self.dry_run {
            info!("[DRY RUN] Would execute: ipmitool raw {}", bytes.join(" "));
            return Ok(());
        }
        self.tool.run_raw(bytes).await?;
        Ok(())
    }
}

/// 0-100% as the hex byte the BMC expects: 30 -> "0x1e", 0 -> "0x0".
pub fn duty_cycle_byte(percent: i32) -> String {
    format!("{:#x}", percent.clamp(0, 100))
}

#[async_trait]
impl ManagementInterface for IpmiClient {
    async fn get_temperatures(&self) -> Result<TemperatureReading> {
        let output = self.tool.run(SDR_TEMPERATURES).await?;
        let temps = parser::parse_temperatures(&output);
        debug!("Read {} temperature sensors via IPMI SDR", temps.len());
        Ok(temps)
    }

    async fn get_cpu_utilization(&self) -> Result<i32> {
        let output = self.tool.run(SDR_CPU_USAGE).await?;
        parser::parse_cpu_utilization(&output)
    }

    async fn set_fan_speed(&self, percent: i32) -> Result<()> {
        let byte = duty_cycle_byte(percent);
        let mut bytes = RAW_SET_DUTY_CYCLE.to_vec();
        bytes.push(&byte);

        debug!("Setting fan duty cycle to {}% -> ipmitool raw {}", percent.clamp(0, 100), bytes.join(" "));
        self.write_raw(&bytes).await
    }

    async fn disable_automatic_fans(&self) -> Result<()> {
        self.write_raw(RAW_MANUAL_MODE).await?;
        info!("Disabled automatic fan control");
        Ok(())
    }

    async fn enable_automatic_fans(&self) -> Result<()> {
        self.write_raw(RAW_AUTOMATIC_MODE).await?;
        info!("Enabled automatic fan control");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::ConnectionSettings;

    #[test]
    fn test_duty_cycle_byte_is_hex() {
        assert_eq!(duty_cycle_byte(30), "0x1e");
        assert_eq!(duty_cycle_byte(60), "0x3c");
        assert_eq!(duty_cycle_byte(100), "0x64");
        assert_eq!(duty_cycle_byte(0), "0x0");
    }

    #[test]
    fn test_duty_cycle_byte_is_clamped() {
        assert_eq!(duty_cycle_byte(250), "0x64");
        assert_eq!(duty_cycle_byte(-10), "0x0");
    }

    #[tokio::test]
    async fn test_dry_run_skips_raw_writes() {
        // The program does not exist, so any real execution would fail
        let tool = IpmiTool::new(ConnectionSettings::default()).with_program("/nonexistent/ipmitool-binary");
        let client = IpmiClient::new(tool, true);

        client.disable_automatic_fans().await.unwrap();
        client.set_fan_speed(42).await.unwrap();
        client.enable_automatic_fans().await.unwrap();
        assert!(client.get_temperatures().await.is_err());
    }
}
