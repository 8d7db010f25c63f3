// ============================================================================
// CRATE CONFIGURATION & IMPORTS
// ============================================================================

pub mod animation;
pub mod arc_path;
pub mod config;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod quantizer;
mod render;
mod window;

use std::str::FromStr;
use std::sync::mpsc::Receiver;

pub use animation::{AnimationDriver, AnimationTask, Easing};
pub use arc_path::{ArcPath, ArcSegment, GaugePaths};
pub use config::{Color, GaugeConfig};
pub use controller::{
    GaugeController, GaugeListener, GaugeState, PointerAction, PointerEvent,
};
pub use error::GaugeError;
pub use geometry::{Bounds, GaugeGeometry, Padding, Point, Rect};

// ============================================================================
// PUBLIC API - MAIN INTERFACE
// ============================================================================

/// Command enum for type-safe gauge updates from other threads
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GaugeCommand {
    SetValue(f64),
    SetStep(u8),
}

impl GaugeCommand {
    pub fn apply(self, controller: &mut GaugeController) {
        match self {
            GaugeCommand::SetValue(value) => controller.set_value(value),
            GaugeCommand::SetStep(step) => controller.set_step(step),
        }
    }
}

/// Parses the stdin line protocol: `value <n>`, `step <n>`, or a bare number
/// taken as a value.
impl FromStr for GaugeCommand {
    type Err = GaugeError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let invalid = || GaugeError::Command(line.trim().to_string());
        let mut parts = line.split_whitespace();
        let command = match (parts.next(), parts.next()) {
            (Some("value"), Some(arg)) => {
                GaugeCommand::SetValue(arg.parse().map_err(|_| invalid())?)
            }
            (Some("step"), Some(arg)) => GaugeCommand::SetStep(arg.parse().map_err(|_| invalid())?),
            (Some(arg), None) => GaugeCommand::SetValue(arg.parse().map_err(|_| invalid())?),
            _ => return Err(invalid()),
        };
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(command)
    }
}

/// A step gauge with its own window - the primary public interface
#[derive(Debug)]
pub struct StepGauge {
    controller: GaugeController,
}

impl StepGauge {
    pub fn new(config: GaugeConfig) -> Self {
        Self {
            controller: GaugeController::new(config),
        }
    }

    pub fn controller(&self) -> &GaugeController {
        &self.controller
    }

    pub fn set_value(&mut self, value: f64) {
        self.controller.set_value(value);
    }

    pub fn set_step(&mut self, step: u8) {
        self.controller.set_step(step);
    }

    pub fn show(&mut self) -> Result<(), GaugeError> {
        self.run_window(None)
    }

    pub fn show_with_commands(
        &mut self,
        receiver: Receiver<GaugeCommand>,
    ) -> Result<(), GaugeError> {
        self.run_window(Some(receiver))
    }
}
