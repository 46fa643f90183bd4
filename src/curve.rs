//! Linear fan curve fitted through two (temperature, duty) anchor points.

use crate::config::types::CurveSettings;
use crate::error::{ControlError, Result};

/// y = slope * x + intercept
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FanCurve {
    slope: f64,
    intercept: f64,
}

impl FanCurve {
    /// Fit the line through `(x1, y1)` and `(x2, y2)`.
    /// Equal temperatures cannot define a slope and are rejected.
    pub fn fit(p1: (i32, i32), p2: (i32, i32)) -> Result<Self> {
        let (x1, y1) = p1;
        let (x2, y2) = p2;
        if x1 == x2 {
            return Err(ControlError::DegenerateCurve { start_temp: x1, end_temp: x2 });
        }

        let slope = f64::from(y2 - y1) / f64::from(x2 - x1);
        let intercept = f64::from(y1) - slope * f64::from(x1);
        Ok(Self { slope, intercept })
    }

    pub fn slope(&self) -> f64 {
        self.slope
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Raw curve output, no clamping.
    pub fn calculate(&self, temp: f64) -> f64 {
        temp * self.slope + self.intercept
    }
}

/// Fitted curve plus the duty range its output is held to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundedCurve {
    curve: FanCurve,
    min_fan: i32,
    max_fan: i32,
}

impl BoundedCurve {
    pub fn from_settings(settings: &CurveSettings) -> Result<Self> {
        let curve = FanCurve::fit(
            (settings.start_temp, settings.start_fan),
            (settings.end_temp, settings.end_fan),
        )?;
        Ok(Self {
            curve,
            min_fan: settings.start_fan,
            max_fan: settings.end_fan.max(settings.start_fan),
        })
    }

    pub fn curve(&self) -> &FanCurve {
        &self.curve
    }

    /// Target duty for a temperature, rounded and clamped to [start_fan, end_fan].
    pub fn target_fan(&self, temp: f64) -> i32 {
        let raw = self.curve.calculate(temp).round();
        if raw.is_nan() {
            return self.min_fan;
        }
        (raw as i64).clamp(i64::from(self.min_fan), i64::from(self.max_fan)) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn default_settings() -> CurveSettings {
        CurveSettings { start_temp: 40, start_fan: 0, end_temp: 65, end_fan: 60 }
    }

    #[test]
    fn test_fit_passes_through_anchor_points() {
        for (p1, p2) in [((40, 0), (65, 60)), ((10, 15), (70, 100)), ((30, 20), (31, 21)), ((50, 40), (60, 40))] {
            let curve = FanCurve::fit(p1, p2).unwrap();
            assert!((curve.calculate(f64::from(p1.0)) - f64::from(p1.1)).abs() < EPS);
            assert!((curve.calculate(f64::from(p2.0)) - f64::from(p2.1)).abs() < EPS);
        }
    }

    #[test]
    fn test_slope_and_intercept() {
        let curve = FanCurve::fit((40, 0), (65, 60)).unwrap();
        assert!((curve.slope() - 2.4).abs() < EPS);
        assert!((curve.intercept() + 96.0).abs() < EPS);
    }

    #[test]
    fn test_equal_temperatures_are_rejected() {
        let err = FanCurve::fit((70, 0), (70, 60)).unwrap_err();
        assert!(matches!(err, ControlError::DegenerateCurve { start_temp: 70, end_temp: 70 }));
    }

    #[test]
    fn test_midpoint_target() {
        let bounded = BoundedCurve::from_settings(&default_settings()).unwrap();
        assert_eq!(bounded.target_fan(52.5), 30);
    }

    #[test]
    fn test_target_clamped_below_start() {
        let bounded = BoundedCurve::from_settings(&default_settings()).unwrap();
        assert!(bounded.curve().calculate(20.0) < 0.0);
        assert_eq!(bounded.target_fan(20.0), 0);
        assert_eq!(bounded.target_fan(-40.0), 0);
    }

    #[test]
    fn test_target_clamped_above_end() {
        let bounded = BoundedCurve::from_settings(&default_settings()).unwrap();
        assert_eq!(bounded.target_fan(90.0), 60);
        assert_eq!(bounded.target_fan(1.0e12), 60);
    }

    #[test]
    fn test_target_respects_raised_floor() {
        let settings = CurveSettings { start_temp: 30, start_fan: 25, end_temp: 60, end_fan: 80 };
        let bounded = BoundedCurve::from_settings(&settings).unwrap();
        for temp in [0.0, 29.0, 30.0, 45.0, 60.0, 61.0, 200.0] {
            let fan = bounded.target_fan(temp);
            assert!((25..=80).contains(&fan), "{fan} out of range at {temp}");
        }
    }
}
