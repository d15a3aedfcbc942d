use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::angle::{self, Angle};
use super::sector::SectorTable;
use super::selector;
use crate::config::tuning::WheelTuning;

/// Spin lifecycle. A spin cannot be interrupted once started; the machine
/// cycles `Idle -> Accelerating -> Decelerating -> Idle` and is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpinPhase {
    #[default]
    Idle,
    Accelerating,
    Decelerating,
}

/// Everything the render layer needs from one engine step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepFrame {
    pub angle: Angle,
    /// Sector currently facing the pointer.
    pub index: usize,
    /// Set on the terminal step of a spin: the winning index.
    pub landed: Option<usize>,
}

/// The single spin state machine instance. Lives for the process lifetime as
/// a resource; advanced exactly one step per fixed tick while spinning.
#[derive(Debug, Resource)]
pub struct WheelSpin {
    angle: Angle,
    /// Radians advanced per step.
    ang_vel: f64,
    /// Per-spin soft bound ending the acceleration phase.
    ceiling: f64,
    phase: SpinPhase,
    target: Option<usize>,
    rng: StdRng,
}

impl WheelSpin {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_os_rng())
    }

    /// Deterministic instance for tests and reproducible demos.
    #[allow(dead_code)]
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            angle: Angle::default(),
            ang_vel: 0.0,
            ceiling: 0.0,
            phase: SpinPhase::Idle,
            target: None,
            rng,
        }
    }

    pub fn angle(&self) -> Angle {
        self.angle
    }

    pub fn ang_vel(&self) -> f64 {
        self.ang_vel
    }

    pub fn phase(&self) -> SpinPhase {
        self.phase
    }

    pub fn is_spinning(&self) -> bool {
        self.phase != SpinPhase::Idle
    }

    /// Sector currently facing the pointer.
    pub fn current_index(&self, tot: usize) -> usize {
        angle::index_at(self.angle, tot)
    }

    /// Request a spin: draw the winning sector and a velocity ceiling, then
    /// start the animation committed to that outcome. No-op while a spin is
    /// already in flight. Returns the committed index.
    pub fn spin(&mut self, table: &SectorTable, tuning: &WheelTuning) -> Option<usize> {
        if self.is_spinning() {
            return None;
        }
        let target = selector::pick(&mut self.rng, table);
        let ceiling = self
            .rng
            .random_range(tuning.ceiling_min..tuning.ceiling_max);
        self.begin(target, table.len(), ceiling, tuning);
        Some(target)
    }

    /// Start the animation toward an already-committed target index.
    ///
    /// The velocity profile is fully determined by `ceiling` and the tuning
    /// constants, so the total angle a spin sweeps is known before it runs.
    /// The start angle is aimed so that sweep parks the wheel on the target
    /// sector's arc center.
    pub fn begin(&mut self, target: usize, tot: usize, ceiling: f64, tuning: &WheelTuning) {
        debug_assert!(target < tot, "target index out of range");
        self.target = Some(target);
        self.ceiling = ceiling;
        self.ang_vel = 0.0;
        self.phase = SpinPhase::Accelerating;
        let sweep = total_rotation(ceiling, tuning);
        self.angle = angle::sector_center(target, tot).advance(-sweep);
    }

    /// Advance one animation step. Called once per fixed tick while a spin
    /// is in flight; a no-op frame when idle.
    pub fn step(&mut self, tot: usize, tuning: &WheelTuning) -> StepFrame {
        let mut landed = None;
        match self.phase {
            SpinPhase::Idle => {}
            SpinPhase::Accelerating => {
                if self.ang_vel == 0.0 {
                    self.ang_vel = tuning.ang_vel_min; // initial impulse
                }
                self.ang_vel *= tuning.growth_factor;
                // Soft trigger: overshoot past the ceiling is kept, not clamped.
                if self.ang_vel >= self.ceiling {
                    self.phase = SpinPhase::Decelerating;
                }
            }
            SpinPhase::Decelerating => {
                self.ang_vel *= tuning.friction;
                if self.ang_vel < tuning.ang_vel_min {
                    self.ang_vel = 0.0;
                    self.phase = SpinPhase::Idle;
                    if let Some(target) = self.target.take() {
                        // The aimed start angle leaves only accumulated f64
                        // rounding between here and the arc center; park on
                        // it exactly before reading the result.
                        self.angle = angle::sector_center(target, tot);
                        debug_assert_eq!(angle::index_at(self.angle, tot), target);
                    }
                    landed = Some(angle::index_at(self.angle, tot));
                }
            }
        }
        self.angle = self.angle.advance(self.ang_vel);
        StepFrame {
            angle: self.angle,
            index: angle::index_at(self.angle, tot),
            landed,
        }
    }
}

/// Total angle swept by one complete spin with the given ceiling: the same
/// velocity updates `step` applies, accumulated without touching any state.
fn total_rotation(ceiling: f64, tuning: &WheelTuning) -> f64 {
    let mut vel = 0.0_f64;
    let mut swept = 0.0_f64;
    loop {
        if vel == 0.0 {
            vel = tuning.ang_vel_min;
        }
        vel *= tuning.growth_factor;
        swept += vel;
        if vel >= ceiling {
            break;
        }
    }
    loop {
        vel *= tuning.friction;
        if vel < tuning.ang_vel_min {
            break;
        }
        swept += vel;
    }
    swept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wheel::angle::sector_center;

    // Far above the worst case for default-range tunings (roughly 700 steps).
    const STEP_CAP: usize = 10_000;

    fn run_to_idle(wheel: &mut WheelSpin, tot: usize, tuning: &WheelTuning) -> (usize, Vec<StepFrame>) {
        let mut frames = Vec::new();
        for steps in 0..STEP_CAP {
            let frame = wheel.step(tot, tuning);
            frames.push(frame);
            if !wheel.is_spinning() {
                return (steps + 1, frames);
            }
        }
        panic!("spin did not terminate within {STEP_CAP} steps");
    }

    #[test]
    fn spin_commits_and_starts_accelerating() {
        let table = SectorTable::with_defaults();
        let tuning = WheelTuning::default();
        let mut wheel = WheelSpin::seeded(1);
        let target = wheel.spin(&table, &tuning).unwrap();
        assert!(target < table.len());
        assert_eq!(wheel.phase(), SpinPhase::Accelerating);
        assert_eq!(wheel.ang_vel(), 0.0);
    }

    #[test]
    fn second_request_while_spinning_is_a_no_op() {
        let table = SectorTable::with_defaults();
        let tuning = WheelTuning::default();
        let mut wheel = WheelSpin::seeded(2);
        let first = wheel.spin(&table, &tuning).unwrap();
        assert_eq!(wheel.spin(&table, &tuning), None);

        let (_, frames) = run_to_idle(&mut wheel, table.len(), &tuning);
        let landings: Vec<usize> = frames.iter().filter_map(|f| f.landed).collect();
        assert_eq!(landings, vec![first], "exactly one landing, on the first draw");
    }

    #[test]
    fn lands_on_the_committed_sector() {
        let table = SectorTable::with_defaults();
        let tuning = WheelTuning::default();
        for seed in 0..32 {
            let mut wheel = WheelSpin::seeded(seed);
            let target = wheel.spin(&table, &tuning).unwrap();
            let (_, frames) = run_to_idle(&mut wheel, table.len(), &tuning);
            assert_eq!(frames.last().unwrap().landed, Some(target), "seed {seed}");
            assert_eq!(wheel.current_index(table.len()), target);
        }
    }

    #[test]
    fn forced_first_sector_lands_on_stack() {
        let table = SectorTable::with_defaults();
        let tuning = WheelTuning::default();
        let mut wheel = WheelSpin::seeded(3);
        wheel.begin(0, table.len(), 0.3, &tuning);
        let (_, frames) = run_to_idle(&mut wheel, table.len(), &tuning);
        let landed = frames.last().unwrap().landed.unwrap();
        assert_eq!(landed, 0);
        assert_eq!(table.get(landed).label, "Stack");
        assert_eq!(wheel.current_index(table.len()), 0);
    }

    #[test]
    fn terminates_within_a_bounded_step_count() {
        let table = SectorTable::with_defaults();
        let tuning = WheelTuning::default();
        for seed in 0..8 {
            let mut wheel = WheelSpin::seeded(seed);
            wheel.spin(&table, &tuning).unwrap();
            let (steps, _) = run_to_idle(&mut wheel, table.len(), &tuning);
            // Geometric growth to the ceiling plus geometric decay back down.
            assert!(steps < 2_000, "seed {seed} took {steps} steps");
        }
    }

    #[test]
    fn deceleration_is_monotonic() {
        let table = SectorTable::with_defaults();
        let tuning = WheelTuning::default();
        let mut wheel = WheelSpin::seeded(5);
        wheel.spin(&table, &tuning).unwrap();

        let mut prev = f64::INFINITY;
        for _ in 0..STEP_CAP {
            wheel.step(table.len(), &tuning);
            if wheel.phase() == SpinPhase::Decelerating {
                assert!(wheel.ang_vel() <= prev);
                prev = wheel.ang_vel();
            }
            if !wheel.is_spinning() {
                assert_eq!(wheel.ang_vel(), 0.0);
                return;
            }
        }
        panic!("spin did not terminate");
    }

    #[test]
    fn ceiling_is_a_soft_trigger_not_a_clamp() {
        let table = SectorTable::with_defaults();
        let tuning = WheelTuning::default();
        let ceiling = 0.25;
        let mut wheel = WheelSpin::seeded(6);
        wheel.begin(1, table.len(), ceiling, &tuning);

        for _ in 0..STEP_CAP {
            wheel.step(table.len(), &tuning);
            if wheel.phase() == SpinPhase::Decelerating {
                // The flip step keeps the overshooting velocity as-is.
                assert!(wheel.ang_vel() >= ceiling);
                return;
            }
        }
        panic!("never reached the deceleration phase");
    }

    #[test]
    fn landing_parks_on_the_arc_center() {
        let table = SectorTable::with_defaults();
        let tuning = WheelTuning::default();
        let mut wheel = WheelSpin::seeded(7);
        wheel.begin(3, table.len(), 0.33, &tuning);
        run_to_idle(&mut wheel, table.len(), &tuning);
        assert_eq!(wheel.angle(), sector_center(3, table.len()));
    }

    #[test]
    fn idle_step_is_a_no_op_frame() {
        let table = SectorTable::with_defaults();
        let tuning = WheelTuning::default();
        let mut wheel = WheelSpin::seeded(8);
        let frame = wheel.step(table.len(), &tuning);
        assert_eq!(frame.angle, Angle::default());
        assert_eq!(frame.landed, None);
        assert!(!wheel.is_spinning());
    }
}
