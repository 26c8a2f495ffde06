//! Serializable controller configuration.
//!
//! ```yaml
//! gains: { kp: 1.2, ki: 0.4, kd: 0.05 }
//! dead_band: 0.1
//! set_point: 21.5
//! output_limits: { min: 0.0, max: 1.0 }
//! integral_limits: { min: -50.0, max: 50.0 }
//! ```
//!
//! Every field is optional. Missing output limits mean unbounded output.

use pp_core::{Real, ensure_finite, ensure_non_negative};
use serde::{Deserialize, Serialize};

use crate::controller::{Limits, PidGains};
use crate::error::ControlResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PidConfig {
    pub gains: PidGains,
    pub dead_band: Real,
    pub set_point: Real,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_limits: Option<Limits>,
    pub integral_limits: Limits,
}

impl Default for PidConfig {
    fn default() -> Self {
        Self {
            gains: PidGains::default(),
            dead_band: 0.0,
            set_point: 0.0,
            output_limits: None,
            integral_limits: Limits::default_integral(),
        }
    }
}

impl PidConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(content: &str) -> ControlResult<Self> {
        let config: PidConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> ControlResult<String> {
        self.validate()?;
        Ok(serde_yaml::to_string(self)?)
    }

    /// Gains, dead-band and set point must be finite, the dead-band must be
    /// non-negative and both limit pairs must be ordered. Limits may be
    /// infinite.
    pub fn validate(&self) -> ControlResult<()> {
        ensure_finite(self.gains.kp, "kp")?;
        ensure_finite(self.gains.ki, "ki")?;
        ensure_finite(self.gains.kd, "kd")?;
        ensure_non_negative(self.dead_band, "dead_band")?;
        ensure_finite(self.set_point, "set_point")?;
        if let Some(limits) = self.output_limits {
            Limits::new(limits.min, limits.max, "output limits")?;
        }
        Limits::new(
            self.integral_limits.min,
            self.integral_limits.max,
            "integral limits",
        )?;
        Ok(())
    }
}
