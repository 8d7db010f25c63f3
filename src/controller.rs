use std::time::Duration;

use crate::animation::{AnimationDriver, Easing};
use crate::arc_path::{build_paths, GaugePaths};
use crate::config::GaugeConfig;
use crate::geometry::{Bounds, GaugeGeometry, Padding, Point, MAX_STEP};
use crate::quantizer::Quantizer;

// ============================================================================
// LISTENER & EVENTS
// ============================================================================

/// Receives gauge notifications synchronously from the controller.
pub trait GaugeListener {
    fn on_touch_state_changed(&mut self, is_touched: bool);
    /// Called for drag moves only; `set_value`/`set_step` stay silent.
    fn on_step_changed(&mut self, step: u8);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    Down,
    Move,
    Up,
    Cancel,
}

/// Pointer input in widget-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub action: PointerAction,
    pub position: Point,
    pub timestamp: Duration,
}

impl PointerEvent {
    pub fn new(action: PointerAction, x: f64, y: f64) -> Self {
        Self {
            action,
            position: Point::new(x, y),
            timestamp: Duration::ZERO,
        }
    }

    pub fn with_timestamp(mut self, timestamp: Duration) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Snapshot of the controller's mutable state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeState {
    pub step: u8,
    pub sweep_angle: f64,
    pub previous_sweep_angle: f64,
    pub is_dragging: bool,
}

/// Map a continuous input onto a step: zero is step 0, anything above zero
/// lands in the next bucket up, capped at [`MAX_STEP`].
pub fn value_to_step(value: f64, max_value: f64) -> u8 {
    if value.is_nan() || value <= 0.0 || max_value <= 0.0 {
        return 0;
    }
    let bucket = (value / max_value * 10.0).floor() + 1.0;
    bucket.min(MAX_STEP as f64) as u8
}

// ============================================================================
// CONTROLLER
// ============================================================================

pub struct GaugeController {
    config: GaugeConfig,
    geometry: Option<GaugeGeometry>,
    quantizer: Quantizer,
    driver: AnimationDriver,
    is_dragging: bool,
    paths: GaugePaths,
    handle: Option<Point>,
    pending_step: Option<u8>,
    redraw_requested: bool,
    listener: Option<Box<dyn GaugeListener>>,
}

impl GaugeController {
    pub fn new(config: GaugeConfig) -> Self {
        Self {
            config,
            geometry: None,
            quantizer: Quantizer::new(),
            driver: AnimationDriver::new(),
            is_dragging: false,
            paths: GaugePaths::default(),
            handle: None,
            pending_step: None,
            redraw_requested: false,
            listener: None,
        }
    }

    pub fn config(&self) -> &GaugeConfig {
        &self.config
    }

    pub fn set_listener(&mut self, listener: Option<Box<dyn GaugeListener>>) {
        self.listener = listener;
    }

    /// Change display density; takes effect on the next `set_bounds`.
    pub fn set_density(&mut self, density: f64) {
        self.config.density = density;
    }

    pub fn state(&self) -> GaugeState {
        GaugeState {
            step: self.quantizer.step(),
            sweep_angle: self.driver.current_sweep_angle(),
            previous_sweep_angle: self.driver.previous_sweep_angle(),
            is_dragging: self.is_dragging,
        }
    }

    pub fn geometry(&self) -> Option<&GaugeGeometry> {
        self.geometry.as_ref()
    }

    pub fn paths(&self) -> &GaugePaths {
        &self.paths
    }

    /// Handle position from the last successful rebuild.
    pub fn handle(&self) -> Option<Point> {
        self.handle
    }

    pub fn is_animating(&self) -> bool {
        self.driver.is_running() || self.pending_step.is_some()
    }

    /// Returns whether a redraw was requested since the last call.
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    // ------------------------------------------------------------------------
    // Layout
    // ------------------------------------------------------------------------

    pub fn set_bounds(&mut self, bounds: Bounds, padding: Padding) {
        self.geometry = Some(GaugeGeometry::resolve(bounds, padding, &self.config));
        self.rebuild(self.driver.current_sweep_angle());
    }

    // ------------------------------------------------------------------------
    // Pointer input
    // ------------------------------------------------------------------------

    /// Returns whether the event was consumed.
    pub fn on_pointer_event(&mut self, event: PointerEvent) -> bool {
        match event.action {
            PointerAction::Down => self.on_pointer_down(event.position),
            PointerAction::Move => self.on_pointer_move(event.position),
            PointerAction::Up | PointerAction::Cancel => self.on_pointer_up(),
        }
    }

    fn on_pointer_down(&mut self, position: Point) -> bool {
        let Some(geometry) = self.geometry else {
            return false;
        };
        if !position.is_finite() {
            return false;
        }
        // Hit box follows the settled angle, not the animated one.
        let hit_area = geometry.handle_hit_area(self.driver.previous_sweep_angle());
        if !hit_area.contains(position) {
            return false;
        }
        self.is_dragging = true;
        self.notify_touch_state(true);
        true
    }

    fn on_pointer_move(&mut self, position: Point) -> bool {
        if !self.is_dragging {
            return false;
        }
        let Some(geometry) = self.geometry else {
            return false;
        };
        if !position.is_finite() {
            return false;
        }
        let step = self.quantizer.quantize(geometry.pointer_angle(position));
        if let Some(listener) = self.listener.as_mut() {
            listener.on_step_changed(step);
        }
        self.animate_to(step, Duration::ZERO);
        true
    }

    fn on_pointer_up(&mut self) -> bool {
        self.is_dragging = false;
        self.notify_touch_state(false);
        true
    }

    // ------------------------------------------------------------------------
    // Programmatic control
    // ------------------------------------------------------------------------

    /// Animate to the step that `value` falls into over the configured
    /// value animation.
    pub fn set_value(&mut self, value: f64) {
        let step = value_to_step(value, self.config.max_value);
        log::debug!("set_value({value}) -> step {step}");
        // Programmatic updates are not echoed to the listener.
        self.quantizer.commit(step);
        self.animate_to(step, self.config.value_animation);
    }

    /// Jump to `step` on the next frame. Repeating the committed step is a no-op.
    pub fn set_step(&mut self, step: u8) {
        let step = step.min(MAX_STEP);
        if step == self.quantizer.step() {
            return;
        }
        self.quantizer.commit(step);
        self.pending_step = Some(step);
    }

    /// Frame clock entry point.
    pub fn tick(&mut self, dt: Duration) {
        if let Some(step) = self.pending_step.take() {
            self.animate_to(step, Duration::ZERO);
        }
        if let Some(angle) = self.driver.tick(dt) {
            self.rebuild(angle);
        }
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn animate_to(&mut self, step: u8, duration: Duration) {
        // Scheduled jumps are superseded by any newer transition.
        self.pending_step = None;
        let easing = if duration.is_zero() {
            Easing::Linear
        } else {
            self.config.easing
        };
        let angle = self.driver.animate_to(step, duration, easing);
        self.rebuild(angle);
    }

    fn rebuild(&mut self, sweep_angle: f64) {
        let Some(geometry) = self.geometry else {
            return;
        };
        let Some(paths) = build_paths(sweep_angle, &geometry) else {
            log::trace!("geometry not drawable, keeping previous paths");
            return;
        };
        self.paths = paths;
        self.handle = Some(geometry.handle_position(sweep_angle));
        self.redraw_requested = true;
    }

    fn notify_touch_state(&mut self, is_touched: bool) {
        if let Some(listener) = self.listener.as_mut() {
            listener.on_touch_state_changed(is_touched);
        }
    }
}

impl std::fmt::Debug for GaugeController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GaugeController")
            .field("state", &self.state())
            .field("geometry", &self.geometry)
            .field("pending_step", &self.pending_step)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arc_path::full_segments;
    use crate::geometry::{polar_to_cartesian, START_ANGLE};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Note {
        Touch(bool),
        Step(u8),
    }

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<Note>>>);

    impl GaugeListener for Recorder {
        fn on_touch_state_changed(&mut self, is_touched: bool) {
            self.0.borrow_mut().push(Note::Touch(is_touched));
        }

        fn on_step_changed(&mut self, step: u8) {
            self.0.borrow_mut().push(Note::Step(step));
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn controller() -> (GaugeController, Rc<RefCell<Vec<Note>>>) {
        let mut controller = GaugeController::new(GaugeConfig::default());
        let recorder = Recorder::default();
        let notes = recorder.0.clone();
        controller.set_listener(Some(Box::new(recorder)));
        controller.set_bounds(Bounds::new(400.0, 400.0), Padding::default());
        (controller, notes)
    }

    fn settle(controller: &mut GaugeController) {
        for _ in 0..200 {
            controller.tick(Duration::from_millis(16));
        }
    }

    #[test]
    fn test_value_to_step() {
        assert_eq!(value_to_step(0.0, 8031.0), 0);
        assert_eq!(value_to_step(1.0, 8031.0), 1);
        assert_eq!(value_to_step(803.0, 8031.0), 1);
        assert_eq!(value_to_step(803.1, 8031.0), 2);
        assert_eq!(value_to_step(8031.0, 8031.0), 10);
        assert_eq!(value_to_step(100_000.0, 8031.0), 10);
        assert_eq!(value_to_step(-5.0, 8031.0), 0);
        assert_eq!(value_to_step(f64::NAN, 8031.0), 0);
    }

    #[test]
    fn test_initial_state() {
        let (controller, notes) = controller();
        let state = controller.state();
        assert_eq!(state.step, 0);
        assert!(approx(state.sweep_angle, 0.0));
        assert!(!state.is_dragging);
        assert!(notes.borrow().is_empty());
        assert!(controller.handle().is_some());
    }

    #[test]
    fn test_set_step_applies_on_next_frame() {
        let (mut controller, notes) = controller();
        controller.take_redraw_request();
        controller.set_step(5);
        assert_eq!(controller.state().step, 5);
        assert!(approx(controller.state().sweep_angle, 0.0));

        controller.tick(Duration::from_millis(16));
        let state = controller.state();
        assert!(approx(state.sweep_angle, 135.0));
        assert!(approx(state.previous_sweep_angle, 135.0));
        assert_eq!(full_segments(state.sweep_angle), 5);
        assert!(controller.take_redraw_request());
        assert!(notes.borrow().is_empty());
    }

    #[test]
    fn test_set_step_twice_is_idempotent() {
        let (mut controller, notes) = controller();
        controller.set_step(3);
        controller.take_redraw_request();
        controller.set_step(3);
        controller.tick(Duration::from_millis(16));
        assert!(controller.take_redraw_request());
        controller.set_step(3);
        controller.tick(Duration::from_millis(16));
        assert!(!controller.take_redraw_request());
        assert!(!controller.is_animating());
        assert!(notes.borrow().len() <= 1);
    }

    #[test]
    fn test_set_value_animates_to_max() {
        let (mut controller, notes) = controller();
        controller.set_value(8031.0);
        assert!(controller.is_animating());
        assert_eq!(controller.state().step, 10);
        settle(&mut controller);
        assert!(approx(controller.state().sweep_angle, 270.0));
        assert!(notes.borrow().is_empty());
    }

    #[test]
    fn test_programmatic_updates_do_not_notify() {
        let (mut controller, notes) = controller();
        controller.set_value(8031.0);
        settle(&mut controller);
        controller.set_step(3);
        controller.tick(Duration::from_millis(16));
        assert_eq!(controller.state().step, 3);
        assert!(approx(controller.state().sweep_angle, 81.0));
        assert!(notes.borrow().is_empty());
    }

    #[test]
    fn test_set_step_cancels_value_animation() {
        let (mut controller, _) = controller();
        controller.set_value(8031.0);
        controller.tick(Duration::from_millis(300));
        let reached = controller.state().sweep_angle;
        assert!(reached > 0.0 && reached < 270.0);

        controller.set_step(4);
        controller.tick(Duration::from_millis(16));
        settle(&mut controller);
        assert!(approx(controller.state().sweep_angle, 108.0));
        assert!(approx(controller.state().previous_sweep_angle, 108.0));
    }

    #[test]
    fn test_drag_from_handle() {
        let (mut controller, notes) = controller();
        let geometry = *controller.geometry().unwrap();
        let handle = polar_to_cartesian(geometry.center, geometry.gauge_radius, START_ANGLE);

        assert!(controller.on_pointer_event(PointerEvent::new(
            PointerAction::Down,
            handle.x,
            handle.y
        )));
        assert!(controller.state().is_dragging);

        // Straight up from the centre is halfway round the dial.
        assert!(controller.on_pointer_event(PointerEvent::new(PointerAction::Move, 200.0, 50.0)));
        let state = controller.state();
        assert_eq!(state.step, 5);
        assert!(approx(state.sweep_angle, 135.0));
        assert!(!controller.is_animating());

        assert!(controller.on_pointer_event(PointerEvent::new(PointerAction::Up, 200.0, 50.0)));
        assert!(!controller.state().is_dragging);
        assert_eq!(
            *notes.borrow(),
            vec![Note::Touch(true), Note::Step(5), Note::Touch(false)]
        );
    }

    #[test]
    fn test_drag_into_end_stop() {
        let (mut controller, _) = controller();
        let geometry = *controller.geometry().unwrap();
        let handle = polar_to_cartesian(geometry.center, geometry.gauge_radius, START_ANGLE);
        controller.on_pointer_event(PointerEvent::new(PointerAction::Down, handle.x, handle.y));

        let stop = polar_to_cartesian(geometry.center, 100.0, 70.0);
        controller.on_pointer_event(PointerEvent::new(PointerAction::Move, stop.x, stop.y));
        assert_eq!(controller.state().step, 10);
        assert!(approx(controller.state().sweep_angle, 270.0));
    }

    #[test]
    fn test_down_away_from_handle_is_ignored() {
        let (mut controller, notes) = controller();
        assert!(!controller.on_pointer_event(PointerEvent::new(PointerAction::Down, 200.0, 200.0)));
        assert!(!controller.on_pointer_event(PointerEvent::new(PointerAction::Move, 200.0, 50.0)));
        assert_eq!(controller.state().step, 0);
        assert!(notes.borrow().is_empty());
    }

    #[test]
    fn test_nan_pointer_is_a_miss() {
        let (mut controller, _) = controller();
        let event = PointerEvent::new(PointerAction::Down, f64::NAN, f64::NAN);
        assert!(!controller.on_pointer_event(event));
        assert!(!controller.state().is_dragging);
    }

    #[test]
    fn test_hit_box_uses_settled_angle() {
        let (mut controller, _) = controller();
        controller.set_value(8031.0);
        controller.tick(Duration::from_millis(500));
        let geometry = *controller.geometry().unwrap();
        let start = polar_to_cartesian(geometry.center, geometry.gauge_radius, START_ANGLE);
        assert!(controller.on_pointer_event(PointerEvent::new(
            PointerAction::Down,
            start.x,
            start.y
        )));
    }

    #[test]
    fn test_hit_box_after_cancel_uses_reached_angle() {
        let (mut controller, _) = controller();
        controller.set_value(8031.0);
        controller.tick(Duration::from_millis(500));
        controller.set_value(0.0);
        assert!(approx(controller.state().previous_sweep_angle, 135.0));

        let geometry = *controller.geometry().unwrap();
        let start = polar_to_cartesian(geometry.center, geometry.gauge_radius, START_ANGLE);
        assert!(!controller.on_pointer_event(PointerEvent::new(
            PointerAction::Down,
            start.x,
            start.y
        )));
        let reached = polar_to_cartesian(geometry.center, geometry.gauge_radius, START_ANGLE + 135.0);
        assert!(controller.on_pointer_event(PointerEvent::new(
            PointerAction::Down,
            reached.x,
            reached.y
        )));
    }

    #[test]
    fn test_degenerate_geometry_keeps_previous_paths() {
        let (mut controller, _) = controller();
        controller.set_step(5);
        controller.tick(Duration::from_millis(16));
        let paths = controller.paths().clone();
        let handle = controller.handle();
        controller.take_redraw_request();

        controller.set_bounds(Bounds::new(400.0, 400.0), Padding::uniform(300.0));
        controller.set_step(9);
        controller.tick(Duration::from_millis(16));
        assert_eq!(*controller.paths(), paths);
        assert_eq!(controller.handle(), handle);
        assert!(!controller.take_redraw_request());
        assert!(approx(controller.state().sweep_angle, 243.0));
    }

    #[test]
    fn test_set_step_before_layout_is_drawn_after() {
        let mut controller = GaugeController::new(GaugeConfig::default());
        controller.set_step(5);
        controller.tick(Duration::from_millis(16));
        assert!(controller.handle().is_none());

        controller.set_bounds(Bounds::new(400.0, 400.0), Padding::default());
        assert_eq!(controller.paths().filled.segments.len(), 6);
        assert!(controller.take_redraw_request());
    }
}
