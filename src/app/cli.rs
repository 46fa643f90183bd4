//! Command-line argument definitions (clap).

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "ipmi-fan-control")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Closed-loop BMC fan control via ipmitool", long_about = None)]
#[command(after_help = "Connection and curve settings are read from the environment: \
IPMI_IP, IPMI_USER, IPMI_PWD, IPMI_TIMEOUT, START_TEMP, START_FAN, END_TEMP, END_FAN, INTERVAL, CPU_UTIL")]
pub struct Args {
    /// Read sensors but only log fan mode and duty cycle writes
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Test mode (one sensor read, fan mode untouched)
    #[arg(long)]
    pub test: bool,

    /// Show the resolved configuration and exit
    #[arg(short = 'c', long)]
    pub config: bool,

    /// Set log level (TRACE, DEBUG, INFO, WARN, ERROR, CRITICAL)
    #[arg(long = "log-level")]
    pub log_level: Option<String>,
}
