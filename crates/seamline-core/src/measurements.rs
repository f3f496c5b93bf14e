//! Body measurement record driving the pattern-block generators.

use serde::{Deserialize, Serialize};

/// Named body dimensions in inches.
///
/// The core does not validate ranges; generators are expected to produce
/// valid geometry for whatever values arrive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurements {
    pub bust: f64,
    pub waist: f64,
    pub hip: f64,
    pub shoulder_width: f64,
    pub back_length: f64,
    pub arm_length: f64,
    pub inseam: f64,
    pub neck_circ: f64,
    pub skirt_length: f64,
    pub rise: f64,
    /// Wearing ease added over body measurements.
    pub ease: f64,
    pub seam_allowance: f64,
}

impl Default for Measurements {
    fn default() -> Self {
        Self {
            bust: 34.0,
            waist: 26.0,
            hip: 36.0,
            shoulder_width: 5.0,
            back_length: 16.0,
            arm_length: 22.0,
            inseam: 29.0,
            neck_circ: 13.0,
            skirt_length: 24.0,
            rise: 10.5,
            ease: 2.0,
            seam_allowance: 0.5,
        }
    }
}
