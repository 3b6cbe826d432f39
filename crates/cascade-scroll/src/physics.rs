//! Tick-driven scroll physics.
//!
//! Both animations advance by explicit `dt` so hosts with their own frame
//! clock (and tests) can drive them deterministically; the controller's
//! `animation_frame` derives `dt` from wall time.

/// Residual velocity below this never starts a fling, px/s.
pub const FLING_MIN_VELOCITY: f32 = 50.0;

const FLING_STOP_VELOCITY: f32 = 5.0;
const FLING_DECAY_PER_60HZ: f32 = 0.90;
const SPRING_RATE: f32 = 12.0;
const SPRING_SETTLE_DISTANCE: f32 = 0.5;

/// Inertial scroll after a drag release. Velocity decays ~0.9 per 60 Hz
/// frame, matching the drag feel regardless of the actual frame cadence.
pub struct Fling {
    velocity: f32,
}

impl Fling {
    pub fn new(velocity: f32) -> Self {
        Self { velocity }
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Advances by `dt` seconds; `None` once the velocity has settled.
    pub fn tick(&mut self, dt: f32) -> Option<f32> {
        if self.velocity.abs() < FLING_STOP_VELOCITY {
            return None;
        }
        let dt = dt.clamp(0.0, 0.1);
        let delta = self.velocity * dt;
        self.velocity *= FLING_DECAY_PER_60HZ.powf(dt * 60.0);
        Some(delta)
    }
}

/// Pulls an overscrolled offset back to the nearest content bound.
pub struct SpringBack {
    target: f32,
}

impl SpringBack {
    pub fn new(target: f32) -> Self {
        Self { target }
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    /// Delta moving `current` toward the bound; `None` once settled.
    pub fn tick(&mut self, current: f32, dt: f32) -> Option<f32> {
        let distance = self.target - current;
        if distance.abs() < SPRING_SETTLE_DISTANCE {
            return None;
        }
        let dt = dt.clamp(0.0, 0.1);
        Some(distance * (1.0 - (-SPRING_RATE * dt).exp()))
    }
}

/// Friction applied to direct-drag deltas while overscrolled, as a function
/// of `gamma = |overscroll| / viewport_main`. Strictly decreasing and
/// asymptotically zero, so drag gain damps out the further past the bound
/// the content sits.
pub fn overscroll_friction(gamma: f32) -> f32 {
    (-4.2 * gamma.max(0.0)).exp()
}
