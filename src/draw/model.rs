use serde::{Deserialize, Serialize};

/// Straight-alpha RGBA color. Crosses the shell boundary as packed `0xAARRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Self = Self::rgba(255, 255, 255, 255);
    pub const BLACK: Self = Self::rgba(0, 0, 0, 255);
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn from_argb(argb: u32) -> Self {
        Self {
            a: (argb >> 24) as u8,
            r: (argb >> 16) as u8,
            g: (argb >> 8) as u8,
            b: argb as u8,
        }
    }

    pub const fn to_argb(self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    pub fn to_rgba_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn from_rgba_array(color: [u8; 4]) -> Self {
        Self::rgba(color[0], color[1], color[2], color[3])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }

    pub fn offset(self, dx: f32, dy: f32) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }

    pub fn delta_to(self, other: Point) -> (f32, f32) {
        (other.x - self.x, other.y - self.y)
    }

    pub fn distance(self, other: Point) -> f32 {
        let (dx, dy) = self.delta_to(other);
        (dx * dx + dy * dy).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Brush,
    Shape,
    Image,
}

impl Mode {
    /// Modes that float an overlay over the canvas.
    pub fn has_overlay(self) -> bool {
        matches!(self, Mode::Shape | Mode::Image)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Circle,
    #[default]
    Square,
}

/// Paint used by strokes and shape fills. Cap and join are always round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushState {
    pub color: Color,
    pub stroke_width: f32,
}

impl BrushState {
    pub fn radius(&self) -> f32 {
        (self.stroke_width * 0.5).max(0.5)
    }
}

/// Translation in canvas coordinates, uniform scale, rotation in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayTransform {
    pub translation: Point,
    pub scale: f32,
    pub rotation: f32,
}

impl OverlayTransform {
    pub fn at(translation: Point) -> Self {
        Self {
            translation,
            scale: 1.0,
            rotation: 0.0,
        }
    }

    /// Maps a point in overlay-local space (origin at the overlay center) to canvas space.
    pub fn apply(&self, local: Point) -> Point {
        let (sin, cos) = self.rotation.sin_cos();
        let x = local.x * self.scale;
        let y = local.y * self.scale;
        Point::new(
            self.translation.x + x * cos - y * sin,
            self.translation.y + x * sin + y * cos,
        )
    }

    /// Maps a canvas point back into overlay-local space. `None` when the scale collapsed.
    pub fn invert(&self, canvas: Point) -> Option<Point> {
        if !self.scale.is_normal() {
            return None;
        }
        let (sin, cos) = self.rotation.sin_cos();
        let dx = canvas.x - self.translation.x;
        let dy = canvas.y - self.translation.y;
        Some(Point::new(
            (dx * cos + dy * sin) / self.scale,
            (-dx * sin + dy * cos) / self.scale,
        ))
    }
}

impl Default for OverlayTransform {
    fn default() -> Self {
        Self::at(Point::default())
    }
}

pub type PointerId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchAction {
    /// First pointer of a gesture went down.
    Down,
    /// An additional pointer went down while others are held.
    PointerDown,
    Move,
    /// Last pointer of a gesture went up.
    Up,
    /// A non-last pointer went up.
    PointerUp,
    Cancel,
}

/// One pointer sample as delivered by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchEvent {
    pub action: TouchAction,
    pub pointer_id: PointerId,
    pub x: f32,
    pub y: f32,
    /// Pointers in contact when the sample was taken, including this one.
    pub pointer_count: u32,
}

impl TouchEvent {
    pub fn new(action: TouchAction, pointer_id: PointerId, x: f32, y: f32, pointer_count: u32) -> Self {
        Self {
            action,
            pointer_id,
            x,
            y,
            pointer_count,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}
