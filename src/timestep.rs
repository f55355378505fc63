/*
 * Fixed Timestep Module
 *
 * Turns variable frame times into a whole number of fixed physics steps.
 * Time left over after a frame is carried into the next one. After a long
 * stall at most MAX_STEPS_PER_FRAME steps run and the rest is dropped.
 */

use std::time::Duration;

use tracing::debug;

// Upper bound on physics steps per rendered frame
pub const MAX_STEPS_PER_FRAME: usize = 8;

#[derive(Debug, Clone)]
pub struct FixedStep {
    accumulator: Duration,
    step: Duration,
}

impl FixedStep {
    pub fn new(step: Duration) -> Self {
        Self {
            accumulator: Duration::ZERO,
            step,
        }
    }

    // Step size for a physics rate in Hz
    pub fn from_rate(steps_per_second: f32) -> Self {
        Self::new(Duration::from_secs_f32(1.0 / steps_per_second))
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    pub fn set_step(&mut self, step: Duration) {
        self.step = step;
    }

    pub fn accumulator(&self) -> Duration {
        self.accumulator
    }

    // Add this frame's time and return how many steps to run
    pub fn steps(&mut self, frame_time: Duration, paused: bool) -> usize {
        if paused || self.step.is_zero() {
            self.accumulator = Duration::ZERO;
            return 0;
        }

        self.accumulator += frame_time;

        let mut steps = 0;
        while self.accumulator >= self.step && steps < MAX_STEPS_PER_FRAME {
            self.accumulator -= self.step;
            steps += 1;
        }

        if self.accumulator >= self.step {
            debug!(dropped = ?self.accumulator, "Physics fell behind, dropping accumulated time");
            self.accumulator = Duration::ZERO;
        }

        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sixty_hz() -> FixedStep {
        FixedStep::new(Duration::from_micros(16_667))
    }

    #[test]
    fn normal_frame_runs_one_step() {
        let mut timestep = sixty_hz();
        assert_eq!(timestep.steps(timestep.step(), false), 1);
        assert_eq!(timestep.accumulator(), Duration::ZERO);
    }

    #[test]
    fn short_frame_carries_over() {
        let mut timestep = sixty_hz();
        let half = timestep.step() / 2;
        assert_eq!(timestep.steps(half, false), 0);
        assert_eq!(timestep.steps(half, false), 0);
        assert_eq!(timestep.steps(Duration::from_micros(1), false), 1);
    }

    #[test]
    fn stall_catches_up_and_keeps_remainder() {
        let mut timestep = sixty_hz();
        let step = timestep.step();
        assert_eq!(timestep.steps(step * 7 / 2, false), 3);
        assert_eq!(timestep.accumulator(), step / 2);
    }

    #[test]
    fn long_stall_is_capped_and_dropped() {
        let mut timestep = sixty_hz();
        let step = timestep.step();
        assert_eq!(timestep.steps(step * 20, false), MAX_STEPS_PER_FRAME);
        assert_eq!(timestep.accumulator(), Duration::ZERO);

        assert_eq!(timestep.steps(step, false), 1);
    }

    #[test]
    fn pause_runs_nothing_and_resets() {
        let mut timestep = sixty_hz();
        let step = timestep.step();
        timestep.steps(step / 2, false);
        assert_eq!(timestep.steps(step * 5, true), 0);
        assert_eq!(timestep.accumulator(), Duration::ZERO);

        assert_eq!(timestep.steps(step / 2, false), 0);
    }

    #[test]
    fn from_rate_matches_step_size() {
        let timestep = FixedStep::from_rate(50.0);
        assert!((timestep.step().as_secs_f64() - 0.02).abs() < 1e-6);
    }
}
