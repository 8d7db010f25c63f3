use std::time::Duration;

use crate::geometry::{ANGLE_PER_STEP, MAX_STEP};

/// Timing curve applied to linear progress before interpolating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    /// Slow start and end, fast middle.
    #[default]
    AccelerateDecelerate,
}

impl Easing {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::AccelerateDecelerate => {
                if t >= 1.0 {
                    1.0
                } else {
                    ((t + 1.0) * std::f64::consts::PI).cos() / 2.0 + 0.5
                }
            }
        }
    }
}

/// One sweep-angle transition.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationTask {
    start_angle: f64,
    target_delta: f64,
    duration: Duration,
    elapsed: Duration,
    easing: Easing,
}

impl AnimationTask {
    pub fn new(start_angle: f64, target_delta: f64, duration: Duration, easing: Easing) -> Self {
        Self {
            start_angle,
            target_delta,
            duration,
            elapsed: Duration::ZERO,
            easing,
        }
    }

    pub fn start_angle(&self) -> f64 {
        self.start_angle
    }

    pub fn target_delta(&self) -> f64 {
        self.target_delta
    }

    pub fn target_angle(&self) -> f64 {
        self.start_angle + self.target_delta
    }

    /// Linear progress in [0, 1]. A zero duration is complete immediately.
    pub fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    pub fn sample(&self) -> f64 {
        self.target_delta * self.easing.apply(self.progress()) + self.start_angle
    }

    /// Move the clock forward by `dt` and return `(sweep_angle, is_done)`.
    pub fn advance(&mut self, dt: Duration) -> (f64, bool) {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        (self.sample(), self.progress() >= 1.0)
    }
}

/// Drives at most one [`AnimationTask`] and keeps the sweep angles it produces.
#[derive(Debug, Clone, Default)]
pub struct AnimationDriver {
    task: Option<AnimationTask>,
    current_sweep_angle: f64,
    previous_sweep_angle: f64,
}

impl AnimationDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest sample, possibly mid-transition.
    pub fn current_sweep_angle(&self) -> f64 {
        self.current_sweep_angle
    }

    /// Baseline for the next transition: the last completed angle, or the
    /// angle a cancelled transition had reached when it was replaced.
    pub fn previous_sweep_angle(&self) -> f64 {
        self.previous_sweep_angle
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    pub fn task(&self) -> Option<&AnimationTask> {
        self.task.as_ref()
    }

    /// Replace any running task with a transition towards `target_step` and
    /// return the first sample. A running task is dropped without completing;
    /// the angle it reached becomes the new baseline.
    pub fn animate_to(&mut self, target_step: u8, duration: Duration, easing: Easing) -> f64 {
        if let Some(cancelled) = self.task.take() {
            log::debug!(
                "cancelling transition to {:.2}° at {:.2}°",
                cancelled.target_angle(),
                self.current_sweep_angle
            );
            self.previous_sweep_angle = self.current_sweep_angle;
        }

        let target = target_step.min(MAX_STEP) as f64 * ANGLE_PER_STEP;
        let target_delta = target - self.previous_sweep_angle;
        log::debug!(
            "animating {:.2}° -> {:.2}° over {:?}",
            self.previous_sweep_angle,
            target,
            duration
        );

        self.task = Some(AnimationTask::new(
            self.previous_sweep_angle,
            target_delta,
            duration,
            easing,
        ));
        self.tick(Duration::ZERO).unwrap_or(self.current_sweep_angle)
    }

    /// Advance the running task. Returns the new sample, or `None` when idle.
    pub fn tick(&mut self, dt: Duration) -> Option<f64> {
        let task = self.task.as_mut()?;
        let (angle, done) = task.advance(dt);
        self.current_sweep_angle = angle;
        if done {
            self.previous_sweep_angle = angle;
            self.task = None;
        }
        Some(angle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_easing_endpoints() {
        for easing in [Easing::Linear, Easing::AccelerateDecelerate] {
            assert!(approx(easing.apply(0.0), 0.0));
            assert!(approx(easing.apply(1.0), 1.0));
        }
        assert!(approx(Easing::AccelerateDecelerate.apply(0.5), 0.5));
    }

    #[test]
    fn test_zero_duration_completes_immediately() {
        let mut task = AnimationTask::new(27.0, 54.0, Duration::ZERO, Easing::Linear);
        let (angle, done) = task.advance(Duration::ZERO);
        assert!(done);
        assert!(approx(angle, 81.0));
    }

    #[test]
    fn test_linear_task_interpolates() {
        let mut task = AnimationTask::new(0.0, 100.0, Duration::from_millis(1000), Easing::Linear);
        let (angle, done) = task.advance(Duration::from_millis(250));
        assert!(!done);
        assert!(approx(angle, 25.0));
        let (angle, done) = task.advance(Duration::from_millis(2000));
        assert!(done);
        assert!(approx(angle, 100.0));
    }

    #[test]
    fn test_driver_settles_and_updates_baseline() {
        let mut driver = AnimationDriver::new();
        let first = driver.animate_to(5, Duration::from_millis(100), Easing::Linear);
        assert!(approx(first, 0.0));
        assert!(driver.is_running());

        while driver.tick(Duration::from_millis(16)).is_some() {}
        assert!(!driver.is_running());
        assert!(approx(driver.current_sweep_angle(), 135.0));
        assert!(approx(driver.previous_sweep_angle(), 135.0));
    }

    #[test]
    fn test_increasing_transition_is_monotonic() {
        for easing in [Easing::Linear, Easing::AccelerateDecelerate] {
            let mut driver = AnimationDriver::new();
            driver.animate_to(2, Duration::ZERO, easing);
            let mut last = driver.animate_to(9, Duration::from_millis(1000), easing);
            while let Some(angle) = driver.tick(Duration::from_millis(7)) {
                assert!(angle >= last, "{angle} < {last}");
                assert!(angle <= 243.0 + 1e-9);
                last = angle;
            }
            assert!(approx(last, 243.0));
        }
    }

    #[test]
    fn test_cancel_keeps_reached_angle_as_start() {
        let mut driver = AnimationDriver::new();
        driver.animate_to(10, Duration::from_millis(1000), Easing::Linear);
        driver.tick(Duration::from_millis(500));
        assert!(approx(driver.current_sweep_angle(), 135.0));

        driver.animate_to(2, Duration::from_millis(1000), Easing::Linear);
        let task = driver.task().unwrap();
        assert!(approx(task.start_angle(), 135.0));
        assert!(approx(task.target_delta(), 54.0 - 135.0));

        while driver.tick(Duration::from_millis(100)).is_some() {}
        assert!(approx(driver.previous_sweep_angle(), 54.0));
    }

    #[test]
    fn test_idle_tick_returns_none() {
        let mut driver = AnimationDriver::new();
        assert_eq!(driver.tick(Duration::from_millis(16)), None);
    }
}
