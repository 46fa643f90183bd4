//! Fan control loop: Starting -> Running <-> ErrorRecovering -> ShuttingDown.
//!
//! Startup takes fan control away from the BMC, prints one diagnostic row and
//! fits the curve. Each iteration then reads the temperatures, drives the fans
//! from the hottest CPU sensor and sleeps out the rest of the interval.
//! Transient failures are counted and retried on the next tick; the counter is
//! reset by any successful iteration. Whatever ends the loop (shutdown signal,
//! exhausted retries, a fatal error), automatic fan control is re-enabled
//! exactly once before `run` returns.

use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::config::types::ControlConfig;
use crate::control::shutdown::Shutdown;
use crate::curve::BoundedCurve;
use crate::daemon::status::StatusRow;
use crate::error::{ControlError, Result};
use crate::hardware::ManagementInterface;

/// Consecutive failed iterations tolerated before giving up.
pub const MAX_CONSECUTIVE_ERRORS: u32 = 10;

#[derive(Debug, Default)]
pub struct LoopState {
    consecutive_errors: u32,
}

impl LoopState {
    fn record_success(&mut self) {
        if self.consecutive_errors > 0 {
            info!("Fan control recovered after {} failed iteration(s)", self.consecutive_errors);
        }
        self.consecutive_errors = 0;
    }

    fn record_failure(&mut self) -> u32 {
        self.consecutive_errors += 1;
        self.consecutive_errors
    }
}

pub struct ControlLoop {
    client: Box<dyn ManagementInterface>,
    config: ControlConfig,
    shutdown: Shutdown,
    state: LoopState,
}

impl ControlLoop {
    pub fn new(client: Box<dyn ManagementInterface>, config: ControlConfig, shutdown: Shutdown) -> Self {
        Self {
            client,
            config,
            shutdown,
            state: LoopState::default(),
        }
    }

    /// Run until shutdown is requested or an unrecoverable error occurs.
    /// Returns `Ok(())` for a requested shutdown.
    pub async fn run(mut self) -> Result<()> {
        let outcome = self.run_until_stopped().await;

        match &outcome {
            Ok(()) => info!("Shutdown requested, restoring automatic fan control"),
            Err(e) => error!("Fan control stopped: {}", e),
        }
        self.restore_automatic_control().await;

        outcome
    }

    async fn run_until_stopped(&mut self) -> Result<()> {
        let mut shutdown = self.shutdown.clone();
        if shutdown.is_triggered() {
            return Ok(());
        }

        let started = tokio::select! {
            biased;
            _ = shutdown.triggered() => None,
            result = self.start() => Some(result),
        };
        let Some(curve) = started else {
            return Ok(());
        };
        let curve = curve?;

        let interval = self.config.interval();
        info!(
            "Fan control running: slope {:.3}, intercept {:.3}, interval {}s",
            curve.curve().slope(),
            curve.curve().intercept(),
            interval.as_secs()
        );

        loop {
            let loop_start = Instant::now();

            let iteration = tokio::select! {
                biased;
                _ = shutdown.triggered() => None,
                result = self.iteration(&curve, loop_start) => Some(result),
            };
            let Some(result) = iteration else {
                return Ok(());
            };

            match result {
                Ok(()) => self.state.record_success(),
                Err(e) if e.is_transient() => {
                    let count = self.state.record_failure();
                    error!("Error when controlling fan speed ({}/{}): {}", count, MAX_CONSECUTIVE_ERRORS, e);
                    if count >= MAX_CONSECUTIVE_ERRORS {
                        return Err(ControlError::RetriesExhausted {
                            attempts: count,
                            last: Box::new(e),
                        });
                    }
                }
                Err(e) => return Err(e),
            }

            let remaining = interval.saturating_sub(loop_start.elapsed());
            if remaining.is_zero() {
                warn!("Iteration took longer than the {}s interval, not sleeping", interval.as_secs());
                continue;
            }
            tokio::select! {
                biased;
                _ = shutdown.triggered() => return Ok(()),
                _ = tokio::time::sleep(remaining) => {}
            }
        }
    }

    /// Starting: manual mode, one diagnostic row, curve fit.
    async fn start(&self) -> Result<BoundedCurve> {
        let start = Instant::now();
        self.client.disable_automatic_fans().await?;
        print_diagnostic(self.client.as_ref(), start).await?;
        BoundedCurve::from_settings(&self.config.curve)
    }

    async fn iteration(&self, curve: &BoundedCurve, loop_start: Instant) -> Result<()> {
        let temps = self.client.get_temperatures().await?;
        let hottest = temps.max_cpu().ok_or_else(|| ControlError::NoCpuSensor(temps.names()))?;
        let target = curve.target_fan(f64::from(hottest));
        debug!("Hottest CPU {}°C -> {}%", hottest, target);

        let cpu_utilization = if self.config.report_cpu_utilization {
            Some(self.client.get_cpu_utilization().await?)
        } else {
            None
        };

        let status = StatusRow::now(&temps, Some(target), cpu_utilization, loop_start.elapsed());
        println!("{}", status.row());

        self.client.set_fan_speed(target).await
    }

    /// ShuttingDown: never skipped, never cancelled.
    async fn restore_automatic_control(&self) {
        if let Err(e) = self.client.enable_automatic_fans().await {
            error!("Failed to re-enable automatic fan control: {}", e);
        }
    }
}

/// Read the sensors once and print the table header plus a row with no fan speed.
pub async fn print_diagnostic(client: &dyn ManagementInterface, start: Instant) -> Result<()> {
    let temps = client.get_temperatures().await?;
    let status = StatusRow::now(&temps, None, None, start.elapsed());
    println!();
    println!("{}", status.header());
    println!("{}", status.separator());
    println!("{}", status.row());
    Ok(())
}
