use crate::geometry::{
    polar_to_cartesian, GaugeGeometry, Point, Rect, MAX_SWEEP_ANGLE, SEGMENT_COUNT, SEGMENT_GAP,
    SEGMENT_SWEEP, START_ANGLE,
};

// ============================================================================
// PATH TYPES
// ============================================================================

/// A sub-path: move to `move_to`, then sweep along the oval inscribed in `oval`.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcSegment {
    pub move_to: Point,
    pub oval: Rect,
    pub start_angle: f64,
    pub sweep_angle: f64,
}

impl ArcSegment {
    pub fn end_angle(&self) -> f64 {
        self.start_angle + self.sweep_angle
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArcPath {
    pub segments: Vec<ArcSegment>,
}

impl ArcPath {
    fn arc_to(&mut self, oval: Rect, radius: f64, start_angle: f64, sweep_angle: f64) {
        self.segments.push(ArcSegment {
            move_to: polar_to_cartesian(oval.center(), radius, start_angle),
            oval,
            start_angle,
            sweep_angle,
        });
    }
}

/// Renderable output for one sweep angle.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GaugePaths {
    pub filled: ArcPath,
    pub remaining: ArcPath,
}

// ============================================================================
// BUILDER
// ============================================================================

/// Filled-segment progress, `sweep / MAX_SWEEP_ANGLE * 10`.
fn segment_progress(sweep_angle: f64) -> f64 {
    sweep_angle / MAX_SWEEP_ANGLE * SEGMENT_COUNT as f64
}

/// Number of completely filled segments for `sweep_angle`.
pub fn full_segments(sweep_angle: f64) -> u32 {
    segment_progress(sweep_angle).floor().max(0.0) as u32
}

/// Fill ratio of the leading, partially filled segment.
pub fn partial_fraction(sweep_angle: f64) -> f64 {
    let progress = segment_progress(sweep_angle);
    progress - progress.floor()
}

/// Build the segmented filled arc and the remaining track for `sweep_angle`.
/// Returns `None` when the geometry has nothing drawable.
pub fn build_paths(sweep_angle: f64, geometry: &GaugeGeometry) -> Option<GaugePaths> {
    if !geometry.is_drawable() {
        return None;
    }
    let gauge_rect = geometry.gauge_rect?;
    let remaining_rect = geometry.remaining_rect?;

    let mut filled = ArcPath::default();
    let mut current_angle = START_ANGLE;
    for _ in 0..full_segments(sweep_angle) {
        filled.arc_to(gauge_rect, geometry.gauge_radius, current_angle, SEGMENT_SWEEP);
        current_angle += SEGMENT_SWEEP + SEGMENT_GAP;
    }

    let partial_sweep = SEGMENT_SWEEP * partial_fraction(sweep_angle);
    filled.arc_to(gauge_rect, geometry.gauge_radius, current_angle, partial_sweep);
    current_angle += partial_sweep - SEGMENT_GAP;

    let mut remaining = ArcPath::default();
    remaining.arc_to(
        remaining_rect,
        geometry.remaining_gauge_radius,
        current_angle,
        START_ANGLE + MAX_SWEEP_ANGLE - current_angle,
    );

    log::trace!(
        "built {} filled segments for sweep {:.2}°",
        filled.segments.len(),
        sweep_angle
    );
    Some(GaugePaths { filled, remaining })
}
