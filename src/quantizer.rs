//! Pointer angle to discrete step.
//!
//! The dial opens at the bottom between 45° and 135° (screen angles, clockwise
//! from +x). Angles are folded so the usable sweep is contiguous from
//! [`START_ANGLE`], then bucketed into steps of [`ANGLE_PER_STEP`](crate::geometry::ANGLE_PER_STEP). The open gap
//! is split into two stops: the half next to the end of the sweep pins the
//! step to 10, the half next to the start pins it to 0.

use std::cmp::Ordering;

use crate::geometry::{MAX_STEP, MAX_SWEEP_ANGLE, START_ANGLE};

const FOLD_LIMIT: f64 = 45.0;
const STOP_SPLIT: f64 = 90.0;

/// Tracks the committed step across drag updates.
#[derive(Debug, Clone, Default)]
pub struct Quantizer {
    committed: u8,
}

impl Quantizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last committed step.
    pub fn step(&self) -> u8 {
        self.committed
    }

    /// Overwrite the committed step without quantizing (programmatic updates).
    pub fn commit(&mut self, step: u8) {
        self.committed = step.min(MAX_STEP);
    }

    /// Quantize a raw pointer angle (degrees, as from `atan2`) and commit the result.
    pub fn quantize(&mut self, raw_angle: f64) -> u8 {
        let step = quantize_angle(raw_angle, self.committed);
        self.committed = step;
        step
    }
}

/// Fold a raw `atan2` angle (degrees) onto the dial's contiguous domain.
/// Exactly 0° is left alone.
pub fn fold_angle(raw_angle: f64) -> f64 {
    if raw_angle < 0.0 || (raw_angle > 0.0 && raw_angle <= FOLD_LIMIT) {
        raw_angle + 360.0
    } else {
        raw_angle
    }
}

/// Step for a raw pointer angle given the previously committed step.
pub fn quantize_angle(raw_angle: f64, prev_step: u8) -> u8 {
    let angle = fold_angle(raw_angle);
    let raw_step = ((angle - START_ANGLE).abs() / MAX_SWEEP_ANGLE * 10.0).floor() as i64;

    let mut step = match (prev_step as i64).cmp(&raw_step) {
        Ordering::Less => raw_step.min(MAX_STEP as i64),
        // Moving backwards follows the raw bucket unchanged.
        Ordering::Greater => raw_step.max(raw_step),
        Ordering::Equal => raw_step,
    };

    if angle > FOLD_LIMIT && angle <= STOP_SPLIT {
        step = MAX_STEP as i64;
    } else if angle > STOP_SPLIT && angle <= START_ANGLE {
        step = 0;
    }

    step.clamp(0, MAX_STEP as i64) as u8
}
