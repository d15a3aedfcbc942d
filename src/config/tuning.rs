use std::fmt;
use std::path::PathBuf;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// All tunable parameters, loaded from tuning.ron.
#[derive(Debug, Clone, Resource, Serialize, Deserialize)]
pub struct WheelTuning {
    /// Fixed tick period in seconds; one animation step per tick.
    pub dt: f32,
    /// Multiplicative damping per deceleration step. 0.995 = soft,
    /// 0.99 = mid, 0.98 = hard stop.
    pub friction: f64,
    /// Minimum angular velocity (radians per step): the initial impulse on
    /// the way up, the stop threshold on the way down.
    pub ang_vel_min: f64,
    /// Multiplicative growth per acceleration step.
    pub growth_factor: f64,
    /// The per-spin velocity ceiling is drawn uniformly from this range.
    pub ceiling_min: f64,
    pub ceiling_max: f64,
    pub pixels_per_unit: f32,
    /// Wheel radius in world units.
    pub wheel_radius: f32,
    /// Center hub radius in world units.
    pub hub_radius: f32,
    /// Pointer length in world units.
    pub pointer_len: f32,
    /// Sector labels sit at this fraction of the wheel radius.
    pub label_radius_frac: f32,
    pub label_font_size: f32,
    pub result_font_size: f32,
}

impl Default for WheelTuning {
    fn default() -> Self {
        Self {
            dt: 1.0 / 60.0,
            friction: 0.991,
            ang_vel_min: 0.002,
            growth_factor: 1.06,
            ceiling_min: 0.25,
            ceiling_max: 0.40,
            pixels_per_unit: 25.0,
            wheel_radius: 15.0,
            hub_radius: 3.2,
            pointer_len: 2.4,
            label_radius_frac: 0.72,
            label_font_size: 30.0,
            result_font_size: 28.0,
        }
    }
}

/// Tuning values that would keep a spin from ever terminating (or from
/// starting sanely). All of these are fatal at startup.
#[derive(Debug, Clone, PartialEq)]
pub enum TuningError {
    Friction(f64),
    GrowthFactor(f64),
    AngVelMin(f64),
    CeilingRange { min: f64, max: f64 },
    Dt(f32),
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Friction(v) => write!(f, "friction must be in (0, 1), got {v}"),
            Self::GrowthFactor(v) => write!(f, "growth_factor must be > 1, got {v}"),
            Self::AngVelMin(v) => write!(f, "ang_vel_min must be > 0, got {v}"),
            Self::CeilingRange { min, max } => write!(
                f,
                "ceiling range must satisfy ang_vel_min < min < max, got ({min}, {max})"
            ),
            Self::Dt(v) => write!(f, "dt must be > 0, got {v}"),
        }
    }
}

impl WheelTuning {
    /// Termination preconditions: a spin ends only when friction decays the
    /// velocity below `ang_vel_min`, so these bounds are what guarantee a
    /// finite spin.
    pub fn validate(&self) -> Result<(), TuningError> {
        if !(self.friction > 0.0 && self.friction < 1.0) {
            return Err(TuningError::Friction(self.friction));
        }
        if !(self.growth_factor > 1.0) || !self.growth_factor.is_finite() {
            return Err(TuningError::GrowthFactor(self.growth_factor));
        }
        if !(self.ang_vel_min > 0.0) || !self.ang_vel_min.is_finite() {
            return Err(TuningError::AngVelMin(self.ang_vel_min));
        }
        if !(self.ang_vel_min < self.ceiling_min && self.ceiling_min < self.ceiling_max)
            || !self.ceiling_max.is_finite()
        {
            return Err(TuningError::CeilingRange {
                min: self.ceiling_min,
                max: self.ceiling_max,
            });
        }
        if !(self.dt > 0.0) || !self.dt.is_finite() {
            return Err(TuningError::Dt(self.dt));
        }
        Ok(())
    }

    /// Get the data directory for config files.
    pub fn data_dir() -> PathBuf {
        let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        base.join("fortune_wheel")
    }

    /// Path to the tuning file.
    pub fn file_path() -> PathBuf {
        Self::data_dir().join("tuning.ron")
    }

    /// Load from file, or create default if not found.
    pub fn load_or_default() -> Self {
        let path = Self::file_path();
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(contents) => match ron::from_str(&contents) {
                    Ok(tuning) => return tuning,
                    Err(e) => {
                        warn!("Failed to parse tuning.ron: {e}, using defaults");
                    }
                },
                Err(e) => {
                    warn!("Failed to read tuning.ron: {e}, using defaults");
                }
            }
        }
        let tuning = Self::default();
        tuning.save();
        tuning
    }

    /// Save current tuning to file.
    pub fn save(&self) {
        let path = Self::file_path();
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let pretty = ron::ser::PrettyConfig::default();
        match ron::ser::to_string_pretty(self, pretty) {
            Ok(s) => {
                if let Err(e) = std::fs::write(&path, s) {
                    warn!("Failed to write tuning.ron: {e}");
                }
            }
            Err(e) => {
                warn!("Failed to serialize tuning: {e}");
            }
        }
    }

    /// Reload from file (called by key press). A reloaded file that fails
    /// validation is rejected so a live wheel cannot be handed a spin that
    /// never ends.
    pub fn reload(&mut self) {
        let loaded = Self::load_or_default();
        match loaded.validate() {
            Ok(()) => {
                *self = loaded;
                info!("Tuning reloaded");
            }
            Err(e) => warn!("Reloaded tuning rejected: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert_eq!(WheelTuning::default().validate(), Ok(()));
    }

    #[test]
    fn friction_must_stay_below_one() {
        let mut tuning = WheelTuning::default();
        tuning.friction = 1.0;
        assert_eq!(tuning.validate(), Err(TuningError::Friction(1.0)));
        tuning.friction = 0.0;
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn growth_factor_must_exceed_one() {
        let mut tuning = WheelTuning::default();
        tuning.growth_factor = 1.0;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::GrowthFactor(_))
        ));
    }

    #[test]
    fn ang_vel_min_must_be_positive() {
        let mut tuning = WheelTuning::default();
        tuning.ang_vel_min = 0.0;
        assert!(matches!(tuning.validate(), Err(TuningError::AngVelMin(_))));
    }

    #[test]
    fn ceiling_range_must_sit_above_the_threshold() {
        let mut tuning = WheelTuning::default();
        tuning.ceiling_min = tuning.ang_vel_min;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::CeilingRange { .. })
        ));

        let mut tuning = WheelTuning::default();
        tuning.ceiling_max = tuning.ceiling_min;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::CeilingRange { .. })
        ));
    }

    #[test]
    fn dt_must_be_positive() {
        let mut tuning = WheelTuning::default();
        tuning.dt = 0.0;
        assert!(matches!(tuning.validate(), Err(TuningError::Dt(_))));
    }
}
