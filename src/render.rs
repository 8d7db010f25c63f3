//! Software rasteriser for the gauge: a retained list of draw commands
//! rendered into an RGBA framebuffer.

use rusttype::{point, Font, PositionedGlyph, Scale};

use crate::arc_path::{ArcSegment, GaugePaths};
use crate::config::GaugeConfig;
use crate::geometry::{to_angle, Point};

// ============================================================================
// RETAINED MODE ABSTRACTIONS
// ============================================================================

#[derive(Clone, Debug)]
pub(crate) enum DrawCommand {
    Clear((u8, u8, u8)),
    Arc {
        segment: ArcSegment,
        thickness: f64,
        color: (u8, u8, u8),
    },
    Circle {
        cx: i32,
        cy: i32,
        radius: i32,
        color: (u8, u8, u8),
    },
    Text {
        x: i32,
        y: i32,
        text: String,
        font_size: f32,
        color: (u8, u8, u8),
    },
}

#[derive(Debug, Default)]
pub(crate) struct Scene {
    pub(crate) commands: Vec<DrawCommand>,
}

impl Scene {
    fn add_command(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub(crate) fn render(&self, canvas: &mut Canvas, font: Option<&Font>) {
        for command in &self.commands {
            match command {
                DrawCommand::Clear(color) => canvas.clear(*color),
                DrawCommand::Arc {
                    segment,
                    thickness,
                    color,
                } => render_arc(canvas, segment, *thickness, *color),
                DrawCommand::Circle {
                    cx,
                    cy,
                    radius,
                    color,
                } => draw_circle(canvas, *cx, *cy, *radius, *color),
                DrawCommand::Text {
                    x,
                    y,
                    text,
                    font_size,
                    color,
                } => {
                    if let Some(font) = font {
                        draw_text(canvas, *x, *y, text, font, Scale::uniform(*font_size), *color);
                    }
                }
            }
        }
    }
}

pub(crate) struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
}

impl<'a> Canvas<'a> {
    pub(crate) fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        Self {
            frame,
            width,
            height,
        }
    }

    fn clear(&mut self, color: (u8, u8, u8)) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.0, color.1, color.2, 0xff]);
        }
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: (u8, u8, u8), alpha: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        if idx + 4 > self.frame.len() {
            return;
        }
        let a = alpha.clamp(0.0, 1.0);
        let dst = &mut self.frame[idx..idx + 4];
        let blend = |src: u8, dst: u8| (src as f32 * a + dst as f32 * (1.0 - a)).round() as u8;
        dst[0] = blend(color.0, dst[0]);
        dst[1] = blend(color.1, dst[1]);
        dst[2] = blend(color.2, dst[2]);
        dst[3] = 0xff;
    }
}

// ============================================================================
// SCENE CONSTRUCTION
// ============================================================================

/// Scene for the current paths, handle and step.
pub(crate) fn build_scene(
    paths: &GaugePaths,
    handle: Option<Point>,
    center: Option<Point>,
    step: u8,
    config: &GaugeConfig,
) -> Scene {
    let mut scene = Scene::default();
    scene.add_command(DrawCommand::Clear(config.background_color.as_tuple()));

    for segment in &paths.remaining.segments {
        scene.add_command(DrawCommand::Arc {
            segment: segment.clone(),
            thickness: config.dp(config.remaining_stroke_width),
            color: config.remaining_color.as_tuple(),
        });
    }
    for segment in &paths.filled.segments {
        scene.add_command(DrawCommand::Arc {
            segment: segment.clone(),
            thickness: config.dp(config.gauge_stroke_width),
            color: config.gauge_color.as_tuple(),
        });
    }

    if let Some(handle) = handle {
        scene.add_command(DrawCommand::Circle {
            cx: handle.x.round() as i32,
            cy: handle.y.round() as i32,
            radius: config.dp(config.handle_dot_radius).round() as i32,
            color: config.handle_color.as_tuple(),
        });
    }

    if let Some(center) = center {
        scene.add_command(DrawCommand::Text {
            x: center.x.round() as i32,
            y: center.y.round() as i32,
            text: step.to_string(),
            font_size: config.readout_font_size * config.density as f32,
            color: config.text_color.as_tuple(),
        });
    }

    scene
}

// ============================================================================
// DRAWING PRIMITIVES
// ============================================================================

/// Stroke an arc of the oval inscribed in `segment.oval`. Ends are cut
/// square along the radius so the gaps between segments stay visible.
fn render_arc(canvas: &mut Canvas, segment: &ArcSegment, thickness: f64, color: (u8, u8, u8)) {
    if segment.sweep_angle <= 0.0 {
        return;
    }
    let center = segment.oval.center();
    let rx = segment.oval.width() / 2.0;
    let ry = segment.oval.height() / 2.0;
    if rx <= 0.0 || ry <= 0.0 {
        return;
    }
    let half = thickness / 2.0;
    let reach_x = (rx + half + 1.0).ceil() as i32;
    let reach_y = (ry + half + 1.0).ceil() as i32;
    let (cx, cy) = (center.x.round() as i32, center.y.round() as i32);

    for y in (cy - reach_y)..=(cy + reach_y) {
        for x in (cx - reach_x)..=(cx + reach_x) {
            let dx = x as f64 - center.x;
            let dy = y as f64 - center.y;
            let theta = dy.atan2(dx);
            let relative = (to_angle(theta) - segment.start_angle).rem_euclid(360.0);
            if relative > segment.sweep_angle {
                continue;
            }
            let dist = (dx * dx + dy * dy).sqrt();
            let oval_radius =
                rx * ry / ((ry * theta.cos()).powi(2) + (rx * theta.sin()).powi(2)).sqrt();
            let aa = 1.0 - ((dist - oval_radius).abs() - half).clamp(0.0, 1.0);
            if aa > 0.01 {
                canvas.set_pixel(x, y, color, aa as f32);
            }
        }
    }
}

fn draw_circle(canvas: &mut Canvas, cx: i32, cy: i32, radius: i32, color: (u8, u8, u8)) {
    for y in -radius - 1..=radius + 1 {
        for x in -radius - 1..=radius + 1 {
            let dist = ((x * x + y * y) as f64).sqrt();
            let aa = if dist > radius as f64 {
                1.0 - (dist - radius as f64).min(1.0)
            } else {
                1.0
            };
            if aa > 0.0 {
                canvas.set_pixel(cx + x, cy + y, color, aa as f32);
            }
        }
    }
}

/// Draw `text` centred on `(x, y)`.
fn draw_text(
    canvas: &mut Canvas,
    x: i32,
    y: i32,
    text: &str,
    font: &Font,
    scale: Scale,
    color: (u8, u8, u8),
) {
    let v_metrics = font.v_metrics(scale);
    let glyphs: Vec<PositionedGlyph> = font
        .layout(text, scale, point(0.0, v_metrics.ascent))
        .collect();

    let (min_x, max_x, min_y, max_y) = glyphs.iter().filter_map(|g| g.pixel_bounding_box()).fold(
        (i32::MAX, i32::MIN, i32::MAX, i32::MIN),
        |(min_x, max_x, min_y, max_y), bb| {
            (
                min_x.min(bb.min.x),
                max_x.max(bb.max.x),
                min_y.min(bb.min.y),
                max_y.max(bb.max.y),
            )
        },
    );
    let width_px = if min_x < max_x { max_x - min_x } else { 0 };
    let height_px = if min_y < max_y { max_y - min_y } else { 0 };
    let offset_x = x - width_px / 2;
    let offset_y = y - height_px / 2;
    for glyph in glyphs {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, v| {
                let px = offset_x + gx as i32 + bb.min.x - min_x;
                let py = offset_y + gy as i32 + bb.min.y - min_y;
                canvas.set_pixel(px, py, color, v);
            });
        }
    }
}
