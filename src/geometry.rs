use crate::config::GaugeConfig;

// ============================================================================
// DIAL CONSTANTS
// ============================================================================

/// Angle (degrees, clockwise from +x) where the dial's sweep begins.
pub const START_ANGLE: f64 = 135.0;
/// Total sweep of the dial in degrees.
pub const MAX_SWEEP_ANGLE: f64 = 270.0;
pub const SEGMENT_COUNT: u8 = 10;
/// Gap between neighbouring filled segments, in degrees.
pub const SEGMENT_GAP: f64 = 0.5;
/// Sweep of a single filled segment, in degrees.
pub const SEGMENT_SWEEP: f64 =
    (MAX_SWEEP_ANGLE - SEGMENT_GAP * (SEGMENT_COUNT as f64 - 1.0)) / SEGMENT_COUNT as f64;
pub const ANGLE_PER_STEP: f64 = MAX_SWEEP_ANGLE / SEGMENT_COUNT as f64;
pub const MAX_STEP: u8 = SEGMENT_COUNT;

// ============================================================================
// CONVERSIONS
// ============================================================================

pub fn to_angle(radians: f64) -> f64 {
    radians * (180.0 / std::f64::consts::PI)
}

pub fn to_radian(degrees: f64) -> f64 {
    degrees * (std::f64::consts::PI / 180.0)
}

/// Point on the circle of `radius` around `center` at `angle` degrees.
/// Screen coordinates: y grows downwards, so angles run clockwise.
pub fn polar_to_cartesian(center: Point, radius: f64, angle: f64) -> Point {
    let rad = to_radian(angle);
    Point::new(center.x + rad.cos() * radius, center.y + rad.sin() * radius)
}

// ============================================================================
// BASIC TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Square of side `2 * half_extent` centred on `point`.
    pub fn square_around(point: Point, half_extent: f64) -> Self {
        Self::new(
            point.x - half_extent,
            point.y - half_extent,
            point.x + half_extent,
            point.y + half_extent,
        )
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    /// Strict containment: points on an edge are outside. NaN is never inside.
    pub fn contains(&self, point: Point) -> bool {
        point.x > self.left && point.x < self.right && point.y < self.bottom && point.y > self.top
    }

    fn shrink_by(self, padding: Padding) -> Option<Self> {
        let rect = Self::new(
            self.left + padding.left,
            self.top + padding.top,
            self.right - padding.right,
            self.bottom - padding.bottom,
        );
        if rect.width() <= 0.0 || rect.height() <= 0.0 {
            return None;
        }
        Some(rect)
    }
}

/// Widget size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Padding {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Padding {
    pub const fn uniform(value: f64) -> Self {
        Self {
            left: value,
            top: value,
            right: value,
            bottom: value,
        }
    }
}

// ============================================================================
// GAUGE GEOMETRY
// ============================================================================

/// Layout of the dial for one set of bounds. Replaced as a whole whenever the
/// bounds change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeGeometry {
    pub center: Point,
    pub gauge_radius: f64,
    pub remaining_gauge_radius: f64,
    pub handle_distance: f64,
    pub handle_hit_radius: f64,
    /// Oval the filled segments are drawn on, `None` when padding leaves no room.
    pub gauge_rect: Option<Rect>,
    /// Oval the remaining track is drawn on.
    pub remaining_rect: Option<Rect>,
}

impl GaugeGeometry {
    pub fn resolve(bounds: Bounds, padding: Padding, config: &GaugeConfig) -> Self {
        let handle_area = config.dp(config.handle_area);
        let center = Point::new(bounds.width / 2.0, bounds.height / 2.0);
        let gauge_radius = bounds.width.min(bounds.height) / 2.0 - handle_area;
        let remaining_gauge_radius = gauge_radius + config.dp(config.remaining_gauge_offset);
        let handle_distance = gauge_radius + handle_area - config.dp(config.handle_inset);

        let gauge_rect = Rect::square_around(center, gauge_radius).shrink_by(padding);
        let remaining_rect =
            Rect::square_around(center, remaining_gauge_radius).shrink_by(padding);

        let geometry = Self {
            center,
            gauge_radius,
            remaining_gauge_radius,
            handle_distance,
            handle_hit_radius: handle_area,
            gauge_rect,
            remaining_rect,
        };
        log::debug!(
            "resolved geometry for {}x{}: radius {:.1}, drawable {}",
            bounds.width,
            bounds.height,
            gauge_radius,
            geometry.is_drawable()
        );
        geometry
    }

    /// Both drawing ovals exist and every radius is positive.
    pub fn is_drawable(&self) -> bool {
        self.gauge_radius > 0.0
            && self.remaining_gauge_radius > 0.0
            && self.handle_distance > 0.0
            && self.handle_hit_radius > 0.0
            && self.gauge_rect.is_some()
            && self.remaining_rect.is_some()
    }

    /// Raw pointer angle around the dial centre, degrees in (-180, 180].
    pub fn pointer_angle(&self, point: Point) -> f64 {
        to_angle((point.y - self.center.y).atan2(point.x - self.center.x))
    }

    /// Handle position for a sweep angle measured from [`START_ANGLE`].
    pub fn handle_position(&self, sweep_angle: f64) -> Point {
        polar_to_cartesian(self.center, self.handle_distance, START_ANGLE + sweep_angle)
    }

    /// Square the pointer must land in to grab the handle.
    pub fn handle_hit_area(&self, sweep_angle: f64) -> Rect {
        let anchor = polar_to_cartesian(self.center, self.gauge_radius, START_ANGLE + sweep_angle);
        Rect::square_around(anchor, self.handle_hit_radius)
    }
}
