use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

/// Rotation angle in radians, normalized to [0, TAU).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Angle(pub f64);

impl Angle {
    pub fn new(v: f64) -> Self {
        Self(v.rem_euclid(TAU))
    }

    pub fn advance(self, delta: f64) -> Self {
        Self::new(self.0 + delta)
    }
}

/// Distance (in sector-count units) under which an angle is treated as lying
/// exactly on a sector boundary. Far below any per-step increment, far above
/// accumulated f64 rounding.
const BOUNDARY_EPS: f64 = 1e-9;

/// Angle whose facing sector is exactly `index`: the inclusive upper edge of
/// that sector's arc, `TAU * (1 - index / tot)`.
pub fn start_angle_for(index: usize, tot: usize) -> Angle {
    Angle::new(TAU * (1.0 - index as f64 / tot as f64))
}

/// Pointer-facing angle at the middle of sector `index`'s arc.
pub fn sector_center(index: usize, tot: usize) -> Angle {
    let arc = TAU / tot as f64;
    Angle::new(start_angle_for(index, tot).0 - arc * 0.5)
}

/// Index of the sector facing the pointer at `angle`.
///
/// Inverse of `start_angle_for`: `floor(tot - angle/TAU * tot) mod tot`. A
/// boundary angle belongs to the sector whose upper edge it is, so values
/// within rounding dust of a boundary are pulled onto it before flooring —
/// the bare floor loses the round-trip for angles like `TAU * 2/3`.
pub fn index_at(angle: Angle, tot: usize) -> usize {
    let pos = tot as f64 - angle.0 / TAU * tot as f64;
    let nearest = pos.round();
    let idx = if (pos - nearest).abs() < BOUNDARY_EPS {
        nearest
    } else {
        pos.floor()
    };
    idx as usize % tot
}
