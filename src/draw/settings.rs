use serde::{Deserialize, Serialize};

use crate::draw::brush::DEFAULT_TOUCH_TOLERANCE;
use crate::draw::model::Color;
use crate::draw::surface::DEFAULT_SHAPE_RADIUS;

pub const DEFAULT_EXPORT_SUBDIR: &str = "Drawy";
pub const DEFAULT_EXPORT_QUALITY: u8 = 90;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DrawSettings {
    /// Drawing size at creation; stands in for the device display metrics.
    #[serde(default = "default_canvas_width")]
    pub canvas_width: u32,
    #[serde(default = "default_canvas_height")]
    pub canvas_height: u32,
    #[serde(default = "default_canvas_color")]
    pub canvas_color: Color,
    #[serde(default = "default_paint_color")]
    pub paint_color: Color,
    #[serde(default = "default_paint_thickness")]
    pub paint_thickness: f32,
    #[serde(default = "default_touch_tolerance")]
    pub touch_tolerance: f32,
    #[serde(default = "default_shape_radius")]
    pub shape_radius: f32,
    #[serde(default = "default_export_quality")]
    pub export_quality: u8,
    #[serde(default = "default_export_subdir")]
    pub export_subdir: String,
    /// Overrides the platform pictures directory as the export root.
    #[serde(default)]
    pub export_root: Option<String>,
    #[serde(default)]
    pub debug_logging: bool,
}

fn default_canvas_width() -> u32 {
    1080
}

fn default_canvas_height() -> u32 {
    1920
}

fn default_canvas_color() -> Color {
    Color::WHITE
}

fn default_paint_color() -> Color {
    Color::BLACK
}

fn default_paint_thickness() -> f32 {
    10.0
}

fn default_touch_tolerance() -> f32 {
    DEFAULT_TOUCH_TOLERANCE
}

fn default_shape_radius() -> f32 {
    DEFAULT_SHAPE_RADIUS
}

fn default_export_quality() -> u8 {
    DEFAULT_EXPORT_QUALITY
}

fn default_export_subdir() -> String {
    DEFAULT_EXPORT_SUBDIR.to_string()
}

impl Default for DrawSettings {
    fn default() -> Self {
        Self {
            canvas_width: default_canvas_width(),
            canvas_height: default_canvas_height(),
            canvas_color: default_canvas_color(),
            paint_color: default_paint_color(),
            paint_thickness: default_paint_thickness(),
            touch_tolerance: default_touch_tolerance(),
            shape_radius: default_shape_radius(),
            export_quality: default_export_quality(),
            export_subdir: default_export_subdir(),
            export_root: None,
            debug_logging: false,
        }
    }
}

impl DrawSettings {
    /// Replaces values the core cannot work with by their defaults.
    pub fn sanitize(&mut self) {
        if self.canvas_width == 0 {
            self.canvas_width = default_canvas_width();
        }
        if self.canvas_height == 0 {
            self.canvas_height = default_canvas_height();
        }
        if !(self.paint_thickness.is_finite() && self.paint_thickness > 0.0) {
            self.paint_thickness = default_paint_thickness();
        }
        if !(self.touch_tolerance.is_finite() && self.touch_tolerance >= 0.0) {
            self.touch_tolerance = default_touch_tolerance();
        }
        if !(self.shape_radius.is_finite() && self.shape_radius > 0.0) {
            self.shape_radius = default_shape_radius();
        }
        self.export_quality = self.export_quality.min(100);
        if self.export_subdir.trim().is_empty() {
            self.export_subdir = default_export_subdir();
        }
    }
}
