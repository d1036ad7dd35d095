//! Reconstruction configuration (enumerated tolerances and objective weights).
//!
//! `Config` is passed by value into `reconstruct`; no component holds
//! process-global mutable configuration state.

use serde::{Deserialize, Serialize};

use crate::error::PolyfitError;

/// Tunables for the reconstruction pipeline.
///
/// Invariant enforced by `validate`: `fit_weight + coverage_weight +
/// complexity_weight == 1` (within `1e-9`).
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Data-fit objective weight. Default 0.43.
    pub fit_weight: f64,
    /// Coverage objective weight. Default 0.27.
    pub coverage_weight: f64,
    /// Sharp-edge complexity penalty weight. Default 0.30.
    pub complexity_weight: f64,
    /// Multiplier on mean nearest-neighbor distance for auto-alpha. Default 5.0.
    pub alpha_scale: f64,
    /// Residual tolerance `epsilon` in `supp(f)`. `None` means
    /// `3 * average point spacing`, derived per-segment.
    pub residual_tolerance: Option<f64>,
    /// Bounding-box inflation fraction. Default 0.05.
    pub bbox_margin: f64,
    /// Whether bounding-box-only faces may appear in the output. Default false.
    pub include_bbox_faces: bool,
    /// Wall-clock budget for the MIP solve; 0 means unlimited. Default 0.
    pub solver_time_limit_seconds: f64,
    /// Acceptable optimality gap for the MIP solve. Default 0.0.
    pub solver_gap: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fit_weight: 0.43,
            coverage_weight: 0.27,
            complexity_weight: 0.30,
            alpha_scale: 5.0,
            residual_tolerance: None,
            bbox_margin: 0.05,
            include_bbox_faces: false,
            solver_time_limit_seconds: 0.0,
            solver_gap: 0.0,
        }
    }
}

impl Config {
    /// Validate weight/scale invariants before a reconstruction attempt.
    pub fn validate(&self) -> Result<(), PolyfitError> {
        let sum = self.fit_weight + self.coverage_weight + self.complexity_weight;
        if (sum - 1.0).abs() > 1e-9 {
            return Err(PolyfitError::InvalidInput(format!(
                "fit_weight + coverage_weight + complexity_weight must sum to 1, got {sum}"
            )));
        }
        for (name, v) in [
            ("fit_weight", self.fit_weight),
            ("coverage_weight", self.coverage_weight),
            ("complexity_weight", self.complexity_weight),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return Err(PolyfitError::InvalidInput(format!(
                    "{name} must be in [0,1], got {v}"
                )));
            }
        }
        if self.alpha_scale <= 0.0 {
            return Err(PolyfitError::InvalidInput(format!(
                "alpha_scale must be > 0, got {}",
                self.alpha_scale
            )));
        }
        if let Some(eps) = self.residual_tolerance {
            if eps <= 0.0 {
                return Err(PolyfitError::InvalidInput(format!(
                    "residual_tolerance must be > 0, got {eps}"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.bbox_margin) {
            return Err(PolyfitError::InvalidInput(format!(
                "bbox_margin must be in [0,1], got {}",
                self.bbox_margin
            )));
        }
        if self.solver_time_limit_seconds < 0.0 {
            return Err(PolyfitError::InvalidInput(
                "solver_time_limit_seconds must be >= 0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.solver_gap) {
            return Err(PolyfitError::InvalidInput(format!(
                "solver_gap must be in [0,1], got {}",
                self.solver_gap
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn weights_must_sum_to_one() {
        let mut cfg = Config::default();
        cfg.fit_weight = 0.9;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn non_positive_alpha_scale_rejected() {
        let mut cfg = Config::default();
        cfg.alpha_scale = 0.0;
        assert!(cfg.validate().is_err());
    }
}
