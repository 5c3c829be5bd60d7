/// Fixed timestep accumulator
///
/// Decouples simulation step size from the variable frame time: frame deltas
/// are accumulated and paid out as whole fixed steps, with the fraction left
/// over carried into the next frame.
#[derive(Debug, Clone)]
pub struct FixedStepper {
    /// Size of one step in seconds
    fixed_timestep: f32,

    /// Maximum number of steps handed out per advance
    max_steps: u32,

    /// Accumulated time not yet consumed by a step
    accumulator: f32,

    /// Total steps handed out since creation
    total_steps: u64,

    /// Time thrown away by the step cap since creation
    dropped_time: f32,
}

impl FixedStepper {
    /// Create a stepper; callers validate `fixed_timestep > 0` and `max_steps >= 1`
    pub fn new(fixed_timestep: f32, max_steps: u32) -> Self {
        Self {
            fixed_timestep,
            max_steps,
            accumulator: 0.0,
            total_steps: 0,
            dropped_time: 0.0,
        }
    }

    /// Accumulate a frame delta, returns the number of fixed steps to run
    ///
    /// Non-positive and non-finite deltas are ignored.
    pub fn advance(&mut self, delta_time: f32) -> u32 {
        if delta_time.is_finite() && delta_time > 0.0 {
            self.accumulator += delta_time;
        } else if !delta_time.is_finite() {
            log::warn!("Ignoring non-finite frame time {}", delta_time);
        }

        let mut steps = 0;
        while self.accumulator >= self.fixed_timestep && steps < self.max_steps {
            self.accumulator -= self.fixed_timestep;
            steps += 1;
        }

        // Drop whatever the cap left behind, keeping the sub-step fraction
        if self.accumulator >= self.fixed_timestep {
            let remainder = self.accumulator % self.fixed_timestep;
            let dropped = self.accumulator - remainder;
            log::warn!(
                "Physics fell behind: dropping {:.3}s ({} steps) after {} catch-up steps",
                dropped,
                (dropped / self.fixed_timestep).round() as u64,
                steps
            );
            self.dropped_time += dropped;
            self.accumulator = remainder;
        }

        self.total_steps += steps as u64;
        steps
    }

    pub fn set_fixed_timestep(&mut self, fixed_timestep: f32) {
        self.fixed_timestep = fixed_timestep;
    }

    pub fn set_max_steps(&mut self, max_steps: u32) {
        self.max_steps = max_steps;
    }

    /// Get the interpolation alpha for smooth rendering between physics steps
    /// Alpha = accumulated_time / fixed_timestep
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.fixed_timestep
    }

    /// Get total number of steps executed
    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    /// Simulated time discarded by the step cap
    pub fn dropped_time(&self) -> f32 {
        self.dropped_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_aligned_frames_run_one_step() {
        let mut stepper = FixedStepper::new(DT, 8);
        for _ in 0..10 {
            assert_eq!(stepper.advance(DT), 1);
        }
        assert_eq!(stepper.total_steps(), 10);
        assert_eq!(stepper.alpha(), 0.0);
    }

    #[test]
    fn test_fast_frames_carry_leftover() {
        let mut stepper = FixedStepper::new(0.1, 8);
        assert_eq!(stepper.advance(0.04), 0);
        assert_eq!(stepper.advance(0.04), 0);
        assert_eq!(stepper.advance(0.04), 1);
        assert_relative_eq!(stepper.alpha(), 0.2, epsilon = 1e-4);
    }

    #[test]
    fn test_slow_frame_catches_up() {
        let mut stepper = FixedStepper::new(0.1, 8);
        assert_eq!(stepper.advance(0.35), 3);
        assert_relative_eq!(stepper.alpha(), 0.5, epsilon = 1e-4);
    }

    #[test]
    fn test_max_steps_limit() {
        let mut stepper = FixedStepper::new(0.1, 5);

        // A 2.05 second stall would allow 20 steps
        let steps = stepper.advance(2.05);
        assert_eq!(steps, 5);
        assert!(stepper.alpha() < 1.0);
        assert!(stepper.dropped_time() > 1.4);

        // Nothing left to burst through on the next frame
        assert_eq!(stepper.advance(0.0), 0);
    }

    #[test]
    fn test_negative_delta_is_ignored() {
        let mut stepper = FixedStepper::new(DT, 8);
        assert_eq!(stepper.advance(-1.0), 0);
        assert_eq!(stepper.alpha(), 0.0);
    }

    #[test]
    fn test_non_finite_delta_does_not_stall_later_frames() {
        let mut stepper = FixedStepper::new(DT, 8);
        assert_eq!(stepper.advance(f32::INFINITY), 0);
        assert_eq!(stepper.advance(f32::NAN), 0);
        assert_eq!(stepper.advance(f32::NEG_INFINITY), 0);
        assert_eq!(stepper.alpha(), 0.0);
        assert_eq!(stepper.dropped_time(), 0.0);

        for _ in 0..5 {
            assert_eq!(stepper.advance(DT), 1);
        }
        assert!(stepper.alpha().is_finite());
        assert_eq!(stepper.total_steps(), 5);
    }
}
