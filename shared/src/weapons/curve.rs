//! Slide displacement curve
//!
//! Designer keyed `(time, value)` pairs, sampled the way a float curve asset is:
//! linear between keys, first/last value held outside the keyed range.

use serde::{Deserialize, Serialize};

use super::ConfigError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlideCurve {
    keys: Vec<(f32, f32)>,
}

impl SlideCurve {
    /// Build a curve, rejecting empty key lists, non-finite keys and key times
    /// that are not strictly increasing.
    pub fn new(keys: Vec<(f32, f32)>) -> Result<Self, ConfigError> {
        let curve = Self { keys };
        curve.validate()?;
        Ok(curve)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.keys.is_empty() {
            return Err(ConfigError::InvalidCurve("curve has no keys".to_string()));
        }
        for (i, (time, value)) in self.keys.iter().enumerate() {
            if !time.is_finite() || !value.is_finite() {
                return Err(ConfigError::InvalidCurve(format!(
                    "key {} is not finite ({}, {})",
                    i, time, value
                )));
            }
        }
        for (i, pair) in self.keys.windows(2).enumerate() {
            if pair[1].0 <= pair[0].0 {
                return Err(ConfigError::InvalidCurve(format!(
                    "key {} at t={} does not come after t={}",
                    i + 1,
                    pair[1].0,
                    pair[0].0
                )));
            }
        }
        Ok(())
    }

    /// Sample the curve at `time`
    pub fn sample(&self, time: f32) -> f32 {
        let Some(&(first_time, first_value)) = self.keys.first() else {
            return 0.0;
        };
        if time <= first_time {
            return first_value;
        }

        for pair in self.keys.windows(2) {
            let (t0, v0) = pair[0];
            let (t1, v1) = pair[1];
            if time <= t1 {
                let t = (time - t0) / (t1 - t0);
                return v0 + (v1 - v0) * t;
            }
        }

        // Past the last key
        self.keys.last().map(|&(_, v)| v).unwrap_or(0.0)
    }

    pub fn keys(&self) -> &[(f32, f32)] {
        &self.keys
    }
}

impl Default for SlideCurve {
    /// A flat curve that never moves the slide
    fn default() -> Self {
        Self { keys: vec![(0.0, 0.0)] }
    }
}
