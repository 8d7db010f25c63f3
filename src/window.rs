// ============================================================================
// WINDOWED HOST
// ============================================================================

use std::sync::mpsc::Receiver;
use std::time::Instant;

use pixels::{Pixels, SurfaceTexture};
use rusttype::Font;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, MouseButton, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use crate::controller::{GaugeListener, PointerAction, PointerEvent};
use crate::error::GaugeError;
use crate::geometry::{Bounds, Padding, Point};
use crate::render::{build_scene, Canvas};
use crate::{GaugeCommand, StepGauge};

/// Logs listener notifications from the interactive window.
struct LoggingListener;

impl GaugeListener for LoggingListener {
    fn on_touch_state_changed(&mut self, is_touched: bool) {
        log::info!("handle touched: {is_touched}");
    }

    fn on_step_changed(&mut self, step: u8) {
        log::info!("step changed: {step}");
    }
}

impl StepGauge {
    pub(crate) fn run_window(
        &mut self,
        receiver: Option<Receiver<GaugeCommand>>,
    ) -> Result<(), GaugeError> {
        let font = match self.controller.config().font_data.clone() {
            Some(data) => Some(Font::try_from_vec(data).ok_or(GaugeError::Font)?),
            None => None,
        };

        let config = self.controller.config().clone();
        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(&config.title)
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .build(&event_loop)?;
        let window = std::sync::Arc::new(window);

        let size = window.inner_size();
        let mut fb_width = size.width as usize;
        let mut fb_height = size.height as usize;
        let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
        let mut pixels = Pixels::new(size.width, size.height, surface_texture)?;

        let controller = &mut self.controller;
        controller.set_listener(Some(Box::new(LoggingListener)));
        controller.set_density(window.scale_factor());
        controller.set_bounds(
            Bounds::new(fb_width as f64, fb_height as f64),
            Padding::default(),
        );

        let window_clone = window.clone();
        let frame_duration = std::time::Duration::from_secs_f64(1.0 / config.max_framerate);
        let started = Instant::now();
        let mut last_frame = Instant::now();
        let mut last_tick = Instant::now();
        let mut cursor = Point::default();

        event_loop.run(move |event, window_target| {
            window_target.set_control_flow(ControlFlow::Poll);
            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => {
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        if new_size.width == 0 || new_size.height == 0 {
                            return;
                        }
                        fb_width = new_size.width as usize;
                        fb_height = new_size.height as usize;
                        if let Err(err) = pixels.resize_buffer(new_size.width, new_size.height) {
                            log::warn!("failed to resize buffer: {err}");
                        }
                        if let Err(err) = pixels.resize_surface(new_size.width, new_size.height) {
                            log::warn!("failed to resize surface: {err}");
                        }
                        controller.set_bounds(
                            Bounds::new(fb_width as f64, fb_height as f64),
                            Padding::default(),
                        );
                    }
                    WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                        controller.set_density(scale_factor);
                        controller.set_bounds(
                            Bounds::new(fb_width as f64, fb_height as f64),
                            Padding::default(),
                        );
                    }
                    WindowEvent::CursorMoved { position, .. } => {
                        cursor = Point::new(position.x, position.y);
                        controller.on_pointer_event(pointer(
                            PointerAction::Move,
                            cursor,
                            started,
                        ));
                    }
                    WindowEvent::CursorLeft { .. } => {
                        if controller.state().is_dragging {
                            controller.on_pointer_event(pointer(
                                PointerAction::Cancel,
                                cursor,
                                started,
                            ));
                        }
                    }
                    WindowEvent::MouseInput {
                        state,
                        button: MouseButton::Left,
                        ..
                    } => {
                        let action = match state {
                            ElementState::Pressed => PointerAction::Down,
                            ElementState::Released => PointerAction::Up,
                        };
                        controller.on_pointer_event(pointer(action, cursor, started));
                    }
                    WindowEvent::RedrawRequested => {
                        if let Some(ref receiver) = receiver {
                            while let Ok(command) = receiver.try_recv() {
                                command.apply(controller);
                            }
                        }
                        let now = Instant::now();
                        controller.tick(now.duration_since(last_tick));
                        last_tick = now;

                        if controller.take_redraw_request() {
                            log::trace!("repainting at {:?}", controller.state());
                        }
                        let scene = build_scene(
                            controller.paths(),
                            controller.handle(),
                            controller.geometry().map(|g| g.center),
                            controller.state().step,
                            controller.config(),
                        );
                        let mut canvas = Canvas::new(pixels.frame_mut(), fb_width, fb_height);
                        scene.render(&mut canvas, font.as_ref());
                        if let Err(err) = pixels.render() {
                            log::error!("render failed: {err}");
                            window_target.exit();
                        }
                    }
                    _ => {}
                },
                Event::AboutToWait => {
                    if last_frame.elapsed() >= frame_duration {
                        window_clone.request_redraw();
                        last_frame = Instant::now();
                    }
                }
                _ => {}
            }
        })?;

        Ok(())
    }
}

fn pointer(action: PointerAction, position: Point, started: Instant) -> PointerEvent {
    PointerEvent::new(action, position.x, position.y).with_timestamp(started.elapsed())
}
