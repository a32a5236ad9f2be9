//! Styling and discretization parameters for the diagnostic markers

use crate::common::types::Point2D;
use crate::error::VisError;
use std::collections::HashMap;

/// Marker counts are capped so every id fits in a ROS `int32`
pub const MAX_MARKER_ID: usize = i32::MAX as usize;

/// Value of pi used to partition the unfilled circle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CircleConstant {
    /// `std::f64::consts::PI`
    #[default]
    Exact,
    /// 3.14, reproduces previously recorded ring diagnostics
    Truncated,
}

impl CircleConstant {
    #[allow(clippy::approx_constant)]
    pub fn value(self) -> f64 {
        match self {
            CircleConstant::Exact => std::f64::consts::PI,
            CircleConstant::Truncated => 3.14,
        }
    }
}

/// Formula placing one cross-track error dot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrossTrackFormula {
    /// Matches the deployed controller output: the base coordinates are
    /// cross-wired and only `x` moves with `len`.
    #[default]
    Legacy,
    /// Line from the base pose along the heading angle.
    Corrected,
}

impl CrossTrackFormula {
    /// Dot position `len` along the line drawn from `base`
    pub fn point(self, base: Point2D, lookahead: f64, alpha: f64, len: f64) -> Point2D {
        let (x0, y0) = base;
        match self {
            CrossTrackFormula::Legacy => {
                let y = x0 + lookahead * alpha.cos();
                let x = y0 + len * alpha.sin();
                (x, y)
            }
            CrossTrackFormula::Corrected => (x0 + len * alpha.cos(), y0 + len * alpha.sin()),
        }
    }
}

/// Parameters shared by the four marker generators
#[derive(Debug, Clone, PartialEq)]
pub struct VisConfig {
    /// Number of dots in the unfilled circle
    pub ring_markers: usize,
    /// Height every marker is lifted to
    pub elevation: f64,
    /// Z scale of the filled circle
    pub disk_thickness: f64,
    /// X/Y scale of ring and cross-track dots
    pub dot_diameter: f64,
    /// Z scale of ring and cross-track dots
    pub dot_height: f64,
    /// X/Y scale of the point cube
    pub point_size: f64,
    /// Spacing between cross-track dots
    pub ct_error_step: f64,
    /// Largest cross-track line drawn; longer lines produce no markers.
    /// Never above `i32::MAX` so ids survive the ROS conversion.
    pub max_ct_markers: usize,
    pub circle_constant: CircleConstant,
    pub ct_formula: CrossTrackFormula,
}

impl Default for VisConfig {
    fn default() -> Self {
        VisConfig {
            ring_markers: 50,
            elevation: 1.0,
            disk_thickness: 0.2,
            dot_diameter: 0.02,
            dot_height: 1.0,
            point_size: 0.2,
            ct_error_step: 0.1,
            max_ct_markers: 10_000,
            circle_constant: CircleConstant::Exact,
            ct_formula: CrossTrackFormula::Legacy,
        }
    }
}

impl VisConfig {
    pub fn with_circle_constant(mut self, circle_constant: CircleConstant) -> Self {
        self.circle_constant = circle_constant;
        self
    }

    pub fn with_ct_formula(mut self, ct_formula: CrossTrackFormula) -> Self {
        self.ct_formula = ct_formula;
        self
    }

    pub fn with_ring_markers(mut self, ring_markers: usize) -> Self {
        self.ring_markers = ring_markers.min(MAX_MARKER_ID);
        self
    }

    pub fn with_max_ct_markers(mut self, max_ct_markers: usize) -> Self {
        self.max_ct_markers = max_ct_markers.min(MAX_MARKER_ID);
        self
    }

    /// Angle between two consecutive ring dots
    pub fn ring_step(&self) -> f64 {
        2.0 * self.circle_constant.value() / self.ring_markers as f64
    }

    /// Update the configuration from a parameter map.
    ///
    /// Unknown keys are ignored. On error the configuration is left
    /// unchanged.
    pub fn configure(&mut self, params: &HashMap<String, f64>) -> Result<(), VisError> {
        let mut next = self.clone();

        for (key, slot) in [
            ("ring_markers", &mut next.ring_markers),
            ("max_ct_markers", &mut next.max_ct_markers),
        ] {
            if let Some(&count) = params.get(key) {
                if count.is_nan()
                    || count < 1.0
                    || count.fract() != 0.0
                    || count > MAX_MARKER_ID as f64
                {
                    return Err(VisError::invalid_parameter(
                        key,
                        "must be a whole number between 1 and i32::MAX",
                    ));
                }
                *slot = count as usize;
            }
        }

        if let Some(&elevation) = params.get("elevation") {
            if !elevation.is_finite() {
                return Err(VisError::invalid_parameter("elevation", "must be finite"));
            }
            next.elevation = elevation;
        }

        for (key, slot) in [
            ("disk_thickness", &mut next.disk_thickness),
            ("dot_diameter", &mut next.dot_diameter),
            ("dot_height", &mut next.dot_height),
            ("point_size", &mut next.point_size),
        ] {
            if let Some(&size) = params.get(key) {
                if !size.is_finite() || size < 0.0 {
                    return Err(VisError::invalid_parameter(key, "must be non-negative"));
                }
                *slot = size;
            }
        }

        if let Some(&step) = params.get("ct_error_step") {
            if !step.is_finite() || step <= 0.0 {
                return Err(VisError::invalid_parameter(
                    "ct_error_step",
                    "must be positive",
                ));
            }
            next.ct_error_step = step;
        }

        *self = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params(entries: &[(&str, f64)]) -> HashMap<String, f64> {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn defaults() {
        let config = VisConfig::default();
        assert_eq!(config.ring_markers, 50);
        assert_eq!(config.elevation, 1.0);
        assert_eq!(config.ct_error_step, 0.1);
        assert_eq!(config.max_ct_markers, 10_000);
        assert_eq!(config.circle_constant, CircleConstant::Exact);
        assert_eq!(config.ct_formula, CrossTrackFormula::Legacy);
    }

    #[test]
    #[allow(clippy::approx_constant)]
    fn ring_step_follows_circle_constant() {
        let exact = VisConfig::default();
        assert_relative_eq!(exact.ring_step(), 2.0 * std::f64::consts::PI / 50.0);

        let truncated = VisConfig::default().with_circle_constant(CircleConstant::Truncated);
        assert_relative_eq!(truncated.ring_step(), 2.0 * 3.14 / 50.0);
    }

    #[test]
    fn configure_updates_known_keys() {
        let mut config = VisConfig::default();
        config
            .configure(&params(&[
                ("ring_markers", 12.0),
                ("elevation", 0.5),
                ("dot_diameter", 0.05),
                ("ct_error_step", 0.25),
                ("max_ct_markers", 500.0),
                ("unrelated", 7.0),
            ]))
            .unwrap();

        assert_eq!(config.ring_markers, 12);
        assert_eq!(config.elevation, 0.5);
        assert_eq!(config.dot_diameter, 0.05);
        assert_eq!(config.ct_error_step, 0.25);
        assert_eq!(config.max_ct_markers, 500);
    }

    #[test]
    fn builders_clamp_counts_to_id_range() {
        let config = VisConfig::default()
            .with_ring_markers(usize::MAX)
            .with_max_ct_markers(usize::MAX);
        assert_eq!(config.ring_markers, MAX_MARKER_ID);
        assert_eq!(config.max_ct_markers, MAX_MARKER_ID);
    }

    #[test]
    fn configure_rejects_bad_values_atomically() {
        let mut config = VisConfig::default();
        let err = config
            .configure(&params(&[("elevation", 3.0), ("ct_error_step", 0.0)]))
            .unwrap_err();

        assert!(matches!(err, VisError::InvalidParameter { ref name, .. } if name == "ct_error_step"));
        assert_eq!(config, VisConfig::default());

        assert!(config.configure(&params(&[("ring_markers", 0.0)])).is_err());
        assert!(config.configure(&params(&[("ring_markers", 2.5)])).is_err());
        assert!(config.configure(&params(&[("max_ct_markers", 1e12)])).is_err());
        assert!(config.configure(&params(&[("max_ct_markers", 0.0)])).is_err());
        assert!(config.configure(&params(&[("point_size", -1.0)])).is_err());
        assert!(config.configure(&params(&[("elevation", f64::NAN)])).is_err());
    }

    #[test]
    fn legacy_formula_cross_wires_base() {
        let (x, y) = CrossTrackFormula::Legacy.point((1.0, 2.0), 0.5, 0.0, 0.3);
        assert_relative_eq!(x, 2.0);
        assert_relative_eq!(y, 1.5);
    }

    #[test]
    fn corrected_formula_follows_heading() {
        let alpha = std::f64::consts::FRAC_PI_2;
        let (x, y) = CrossTrackFormula::Corrected.point((1.0, 2.0), 0.5, alpha, 0.3);
        assert_relative_eq!(x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(y, 2.3);
    }
}
