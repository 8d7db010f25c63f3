use bon::Builder;
use std::time::Duration;

use crate::animation::Easing;

/// Color representation for gauge elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn as_tuple(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }
}

/// Everything tunable about the gauge. Lengths are density-independent and
/// scaled by `density` when the geometry is resolved.
#[derive(Debug, Clone, Builder)]
pub struct GaugeConfig {
    /// Upper bound of the continuous input accepted by `set_value`.
    #[builder(default = 8031.0)]
    pub max_value: f64,
    /// Physical pixels per density-independent unit.
    #[builder(default = 1.0)]
    pub density: f64,

    // Dial geometry
    #[builder(default = 25.0)]
    pub handle_area: f64,
    #[builder(default = 8.0)]
    pub remaining_gauge_offset: f64,
    #[builder(default = 4.0)]
    pub handle_inset: f64,

    // Animation
    #[builder(default = Duration::from_millis(1000))]
    pub value_animation: Duration,
    #[builder(default = Easing::AccelerateDecelerate)]
    pub easing: Easing,

    // Strokes
    #[builder(default = 18.0)]
    pub gauge_stroke_width: f64,
    #[builder(default = 2.0)]
    pub remaining_stroke_width: f64,
    #[builder(default = 3.0)]
    pub handle_dot_radius: f64,

    // Colors
    #[builder(default = Color::new(0x3e, 0x98, 0xcb))]
    pub gauge_color: Color,
    #[builder(default = Color::new(0xd9, 0xdd, 0xe2))]
    pub remaining_color: Color,
    #[builder(default = Color::new(0x3e, 0x98, 0xcb))]
    pub handle_color: Color,
    #[builder(default = Color::new(0xff, 0xff, 0xff))]
    pub background_color: Color,
    #[builder(default = Color::new(0x20, 0x20, 0x20))]
    pub text_color: Color,

    // Window configuration
    #[builder(default = "Step Gauge".to_string())]
    pub title: String,
    #[builder(default = 400)]
    pub window_width: usize,
    #[builder(default = 400)]
    pub window_height: usize,
    #[builder(default = 60.0)]
    pub max_framerate: f64,

    // Readout
    /// TTF/OTF bytes for the step readout. No readout is drawn without a font.
    pub font_data: Option<Vec<u8>>,
    #[builder(default = 64.0)]
    pub readout_font_size: f32,
}

impl GaugeConfig {
    /// Scale a density-independent length to pixels.
    pub fn dp(&self, value: f64) -> f64 {
        value * self.density
    }
}

impl Default for GaugeConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GaugeConfig::default();
        assert_eq!(config.max_value, 8031.0);
        assert_eq!(config.value_animation, Duration::from_millis(1000));
        assert_eq!(config.easing, Easing::AccelerateDecelerate);
        assert!(config.font_data.is_none());
    }

    #[test]
    fn test_dp_scaling() {
        let config = GaugeConfig::builder().density(2.5).build();
        assert_eq!(config.dp(8.0), 20.0);
    }
}
