/// Fixed-step accumulator that decouples generation rate from frame rate.
///
/// Frame time is clamped to `max_frame_dt` before it is credited, which bounds
/// the catch-up work after a long stall.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedStepClock {
    step_duration: f64,
    max_frame_dt: f64,
    accumulator: f64,
    steps_taken: u64,
}

impl FixedStepClock {
    pub fn new(step_duration: f64, max_frame_dt: f64) -> Self {
        Self {
            step_duration,
            max_frame_dt,
            accumulator: 0.0,
            steps_taken: 0,
        }
    }

    /// Clamp raw frame time into `[0, max_frame_dt]`; garbage counts as no time.
    pub fn clamp_frame(&self, dt: f64) -> f64 {
        if !dt.is_finite() || dt <= 0.0 {
            return 0.0;
        }
        dt.min(self.max_frame_dt)
    }

    /// Credit one frame of (already clamped) elapsed time.
    pub fn accumulate(&mut self, dt: f64) {
        self.accumulator += dt;
    }

    /// Consume one fixed step if enough time has accumulated.
    pub fn next_step(&mut self) -> bool {
        if self.accumulator >= self.step_duration {
            self.accumulator -= self.step_duration;
            self.steps_taken += 1;
            true
        } else {
            false
        }
    }

    pub fn leftover(&self) -> f64 {
        self.accumulator
    }

    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    pub fn step_duration(&self) -> f64 {
        self.step_duration
    }

    pub fn max_frame_dt(&self) -> f64 {
        self.max_frame_dt
    }

    /// Change the step interval without discarding accumulated time.
    pub fn set_step_duration(&mut self, step_duration: f64) {
        self.step_duration = step_duration;
    }

    pub fn set_max_frame_dt(&mut self, max_frame_dt: f64) {
        self.max_frame_dt = max_frame_dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::create_rng;
    use rand::Rng;

    fn drain(clock: &mut FixedStepClock) -> u64 {
        let mut n = 0;
        while clock.next_step() {
            n += 1;
        }
        n
    }

    #[test]
    fn step_count_matches_elapsed_time() {
        let mut rng = create_rng(21);
        let mut clock = FixedStepClock::new(0.12, 0.1);
        let mut credited = 0.0;
        let mut steps = 0;
        for _ in 0..10_000 {
            let dt = clock.clamp_frame(rng.random_range(0.0..0.25));
            credited += dt;
            clock.accumulate(dt);
            steps += drain(&mut clock);
            assert!(clock.leftover() >= 0.0);
            assert!(clock.leftover() < clock.step_duration());
        }
        let expected = (credited / 0.12).floor() as i64;
        assert!((steps as i64 - expected).abs() <= 1);
        assert_eq!(clock.steps_taken(), steps);
    }

    #[test]
    fn long_stall_is_clamped() {
        let mut clock = FixedStepClock::new(0.01, 0.1);
        let dt = clock.clamp_frame(5.0);
        assert_eq!(dt, 0.1);
        clock.accumulate(dt);
        let steps = drain(&mut clock);
        assert!((9..=10).contains(&steps));
    }

    #[test]
    fn invalid_frame_time_counts_as_zero() {
        let clock = FixedStepClock::new(0.12, 0.1);
        assert_eq!(clock.clamp_frame(-1.0), 0.0);
        assert_eq!(clock.clamp_frame(f64::NAN), 0.0);
        assert_eq!(clock.clamp_frame(f64::INFINITY), 0.0);
    }

    #[test]
    fn changing_step_duration_keeps_accumulated_time() {
        let mut clock = FixedStepClock::new(0.12, 0.1);
        clock.accumulate(0.1);
        assert!(!clock.next_step());
        clock.set_step_duration(0.05);
        assert_eq!(drain(&mut clock), 2);
    }
}
