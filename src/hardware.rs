//! ManagementInterface trait definition and IPMI implementation.

use async_trait::async_trait;

pub mod ipmi;
pub mod types;

pub use ipmi::ipmi_client::IpmiClient;

use crate::error::Result;
use types::TemperatureReading;

#[async_trait]
pub trait ManagementInterface: Send + Sync {
    /// Read all chassis temperature sensors
    async fn get_temperatures(&self) -> Result<TemperatureReading>;

    /// Read CPU utilisation in percent
    async fn get_cpu_utilization(&self) -> Result<i32>;

    /// Set the fan duty cycle (clamped to 0-100%)
    async fn set_fan_speed(&self, percent: i32) -> Result<()>;

    /// Take manual control of the fans away from the BMC
    async fn disable_automatic_fans(&self) -> Result<()>;

    /// Hand fan control back to the BMC
    async fn enable_automatic_fans(&self) -> Result<()>;
}
