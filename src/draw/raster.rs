//! Software rasterisation of strokes, dots, filled shapes and transformed bitmaps.
//!
//! Coverage is binary and sampled at pixel centers. Every primitive builds a coverage mask
//! first and composites the paint once per covered pixel, so overlapping stroke segments
//! never darken a translucent color twice.

use crate::draw::bitmap::Bitmap;
use crate::draw::model::{BrushState, Color, OverlayTransform, Point, ShapeKind};

/// Upper bound on line pieces used to flatten one quadratic segment.
const MAX_QUAD_SUBDIVISIONS: usize = 64;
/// Target length, in pixels, of one flattened piece.
const FLATTEN_STEP_PX: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    Quad { control: Point, end: Point },
    Line { end: Point },
}

impl PathSegment {
    pub fn end(&self) -> Point {
        match *self {
            PathSegment::Quad { end, .. } | PathSegment::Line { end } => end,
        }
    }
}

/// An open path: a start point followed by connected segments.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokePath {
    start: Point,
    segments: Vec<PathSegment>,
}

impl StrokePath {
    pub fn new(start: Point) -> Self {
        Self {
            start,
            segments: Vec::new(),
        }
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn current(&self) -> Point {
        self.segments.last().map_or(self.start, PathSegment::end)
    }

    pub fn quad_to(&mut self, control: Point, end: Point) {
        self.segments.push(PathSegment::Quad { control, end });
    }

    pub fn line_to(&mut self, end: Point) {
        self.segments.push(PathSegment::Line { end });
    }

    /// Approximates the path with a polyline, starting at `start()`.
    pub fn flatten(&self) -> Vec<Point> {
        let mut points = vec![self.start];
        let mut from = self.start;
        for segment in &self.segments {
            match *segment {
                PathSegment::Line { end } => points.push(end),
                PathSegment::Quad { control, end } => {
                    let estimate = from.distance(control) + control.distance(end);
                    let steps = ((estimate / FLATTEN_STEP_PX).ceil() as usize)
                        .clamp(1, MAX_QUAD_SUBDIVISIONS);
                    for step in 1..=steps {
                        let t = step as f32 / steps as f32;
                        points.push(quad_point(from, control, end, t));
                    }
                }
            }
            from = segment.end();
        }
        points
    }
}

fn quad_point(p0: Point, c: Point, p1: Point, t: f32) -> Point {
    let mt = 1.0 - t;
    Point::new(
        mt * mt * p0.x + 2.0 * mt * t * c.x + t * t * p1.x,
        mt * mt * p0.y + 2.0 * mt * t * c.y + t * t * p1.y,
    )
}

/// Pixel-aligned, half-open region `[x0, x1) × [y0, y1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x0: i64,
    pub y0: i64,
    pub x1: i64,
    pub y1: i64,
}

impl PixelRect {
    pub fn around(min: Point, max: Point, pad: f32) -> Self {
        Self {
            x0: (min.x - pad).floor() as i64,
            y0: (min.y - pad).floor() as i64,
            x1: (max.x + pad).ceil() as i64 + 1,
            y1: (max.y + pad).ceil() as i64 + 1,
        }
    }

    pub fn clamp(self, width: u32, height: u32) -> Option<PixelRect> {
        let x0 = self.x0.clamp(0, width as i64);
        let y0 = self.y0.clamp(0, height as i64);
        let x1 = self.x1.clamp(0, width as i64);
        let y1 = self.y1.clamp(0, height as i64);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(PixelRect { x0, y0, x1, y1 })
    }

    fn width(&self) -> usize {
        (self.x1 - self.x0) as usize
    }

    fn height(&self) -> usize {
        (self.y1 - self.y0) as usize
    }
}

fn bounds_of(points: &[Point]) -> Option<(Point, Point)> {
    let first = *points.first()?;
    let mut min = first;
    let mut max = first;
    for p in &points[1..] {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    Some((min, max))
}

struct CoverageMask {
    rect: PixelRect,
    covered: Vec<bool>,
}

impl CoverageMask {
    fn new(rect: PixelRect) -> Self {
        Self {
            rect,
            covered: vec![false; rect.width() * rect.height()],
        }
    }

    fn mark_where<F>(&mut self, area: PixelRect, mut inside: F)
    where
        F: FnMut(Point) -> bool,
    {
        let x0 = area.x0.max(self.rect.x0);
        let y0 = area.y0.max(self.rect.y0);
        let x1 = area.x1.min(self.rect.x1);
        let y1 = area.y1.min(self.rect.y1);
        let stride = self.rect.width();
        for y in y0..y1 {
            let row = (y - self.rect.y0) as usize * stride;
            for x in x0..x1 {
                let idx = row + (x - self.rect.x0) as usize;
                if self.covered[idx] {
                    continue;
                }
                if inside(Point::new(x as f32 + 0.5, y as f32 + 0.5)) {
                    self.covered[idx] = true;
                }
            }
        }
    }

    fn mark_capsule(&mut self, start: Point, end: Point, radius: f32) {
        let min = Point::new(start.x.min(end.x), start.y.min(end.y));
        let max = Point::new(start.x.max(end.x), start.y.max(end.y));
        let radius_sq = radius * radius;
        self.mark_where(PixelRect::around(min, max, radius), |p| {
            point_segment_distance_sq(p, start, end) <= radius_sq
        });
    }

    fn paint(&self, bitmap: &mut Bitmap, color: Color) -> u64 {
        let stride = self.rect.width();
        let mut writes: u64 = 0;
        for (idx, _) in self.covered.iter().enumerate().filter(|(_, c)| **c) {
            let x = self.rect.x0 + (idx % stride) as i64;
            let y = self.rect.y0 + (idx / stride) as i64;
            bitmap.blend(x, y, color);
            writes = writes.saturating_add(1);
        }
        writes
    }
}

fn point_segment_distance_sq(point: Point, start: Point, end: Point) -> f32 {
    let vx = end.x - start.x;
    let vy = end.y - start.y;
    let wx = point.x - start.x;
    let wy = point.y - start.y;
    let len_sq = vx * vx + vy * vy;
    if len_sq <= f32::EPSILON {
        return wx * wx + wy * wy;
    }
    let t = ((wx * vx + wy * vy) / len_sq).clamp(0.0, 1.0);
    let dx = point.x - (start.x + vx * t);
    let dy = point.y - (start.y + vy * t);
    dx * dx + dy * dy
}

/// Strokes `path` with round caps and joins. Returns the number of pixels written.
pub fn stroke_path(bitmap: &mut Bitmap, path: &StrokePath, brush: &BrushState) -> u64 {
    let points = path.flatten();
    stroke_polyline(bitmap, &points, brush)
}

pub fn stroke_polyline(bitmap: &mut Bitmap, points: &[Point], brush: &BrushState) -> u64 {
    let radius = brush.radius();
    let Some((min, max)) = bounds_of(points) else {
        return 0;
    };
    let Some(rect) = PixelRect::around(min, max, radius).clamp(bitmap.width(), bitmap.height())
    else {
        return 0;
    };

    let mut mask = CoverageMask::new(rect);
    if points.len() == 1 {
        mask.mark_capsule(points[0], points[0], radius);
    }
    for pair in points.windows(2) {
        mask.mark_capsule(pair[0], pair[1], radius);
    }
    mask.paint(bitmap, brush.color)
}

/// Paints a round dot the size of the brush tip.
pub fn fill_dot(bitmap: &mut Bitmap, center: Point, brush: &BrushState) -> u64 {
    stroke_polyline(bitmap, &[center], brush)
}

/// Corners of the `half_w`×`half_h` box around the overlay origin, in canvas space.
fn transformed_box(transform: &OverlayTransform, half_w: f32, half_h: f32) -> [Point; 4] {
    [
        transform.apply(Point::new(-half_w, -half_h)),
        transform.apply(Point::new(half_w, -half_h)),
        transform.apply(Point::new(half_w, half_h)),
        transform.apply(Point::new(-half_w, half_h)),
    ]
}

/// Fills `kind` of nominal `radius` placed by `transform`. Returns pixels written.
pub fn fill_shape(
    bitmap: &mut Bitmap,
    kind: ShapeKind,
    transform: &OverlayTransform,
    radius: f32,
    color: Color,
) -> u64 {
    let corners = transformed_box(transform, radius, radius);
    let Some((min, max)) = bounds_of(&corners) else {
        return 0;
    };
    let Some(rect) = PixelRect::around(min, max, 0.0).clamp(bitmap.width(), bitmap.height())
    else {
        return 0;
    };

    let radius_sq = radius * radius;
    let mut mask = CoverageMask::new(rect);
    mask.mark_where(rect, |p| match transform.invert(p) {
        Some(local) => match kind {
            ShapeKind::Circle => local.x * local.x + local.y * local.y <= radius_sq,
            ShapeKind::Square => local.x.abs() <= radius && local.y.abs() <= radius,
        },
        None => false,
    });
    mask.paint(bitmap, color)
}

/// Composites `source`, centered on the transform origin, with nearest-neighbour sampling.
pub fn draw_transformed_bitmap(
    bitmap: &mut Bitmap,
    source: &Bitmap,
    transform: &OverlayTransform,
) -> u64 {
    let half_w = source.width() as f32 * 0.5;
    let half_h = source.height() as f32 * 0.5;
    let corners = transformed_box(transform, half_w, half_h);
    let Some((min, max)) = bounds_of(&corners) else {
        return 0;
    };
    let Some(rect) = PixelRect::around(min, max, 0.0).clamp(bitmap.width(), bitmap.height())
    else {
        return 0;
    };

    let mut writes: u64 = 0;
    for y in rect.y0..rect.y1 {
        for x in rect.x0..rect.x1 {
            let center = Point::new(x as f32 + 0.5, y as f32 + 0.5);
            let Some(local) = transform.invert(center) else {
                return writes;
            };
            let sx = (local.x + half_w).floor() as i64;
            let sy = (local.y + half_h).floor() as i64;
            if let Some(color) = source.get(sx, sy) {
                bitmap.blend(x, y, color);
                writes = writes.saturating_add(1);
            }
        }
    }
    writes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brush(width: f32) -> BrushState {
        BrushState {
            color: Color::BLACK,
            stroke_width: width,
        }
    }

    fn canvas() -> Bitmap {
        Bitmap::new(64, 64, Color::WHITE).expect("bitmap")
    }

    #[test]
    fn flatten_quad_ends_at_segment_end() {
        let mut path = StrokePath::new(Point::new(0.0, 0.0));
        path.quad_to(Point::new(10.0, 0.0), Point::new(10.0, 10.0));
        let points = path.flatten();
        assert_eq!(points.first(), Some(&Point::new(0.0, 0.0)));
        let last = points.last().copied().expect("points");
        assert!((last.x - 10.0).abs() < 1e-4 && (last.y - 10.0).abs() < 1e-4);
        assert!(points.len() > 2);
    }

    #[test]
    fn dot_covers_center_and_respects_radius() {
        let mut bitmap = canvas();
        fill_dot(&mut bitmap, Point::new(32.0, 32.0), &brush(10.0));
        assert_eq!(bitmap.pixel(32, 32), Color::BLACK);
        assert_eq!(bitmap.pixel(28, 32), Color::BLACK);
        assert_eq!(bitmap.pixel(38, 32), Color::WHITE);
    }

    #[test]
    fn translucent_stroke_blends_once_at_joins() {
        let mut bitmap = canvas();
        let mut path = StrokePath::new(Point::new(10.0, 10.0));
        path.line_to(Point::new(40.0, 10.0));
        path.line_to(Point::new(40.0, 40.0));
        let paint = BrushState {
            color: Color::rgba(0, 0, 0, 128),
            stroke_width: 6.0,
        };
        stroke_path(&mut bitmap, &path, &paint);
        assert_eq!(bitmap.pixel(40, 10), bitmap.pixel(20, 10));
        assert_eq!(bitmap.pixel(20, 10), bitmap.pixel(40, 30));
    }

    #[test]
    fn stroke_fully_outside_writes_nothing() {
        let mut bitmap = canvas();
        let mut path = StrokePath::new(Point::new(-100.0, -100.0));
        path.line_to(Point::new(-90.0, -100.0));
        assert_eq!(stroke_path(&mut bitmap, &path, &brush(4.0)), 0);
        assert_eq!(bitmap, canvas());
    }

    #[test]
    fn rotated_square_leaves_corners_of_its_bounds_empty() {
        let mut bitmap = canvas();
        let transform = OverlayTransform {
            translation: Point::new(32.0, 32.0),
            scale: 1.0,
            rotation: std::f32::consts::FRAC_PI_4,
        };
        fill_shape(&mut bitmap, ShapeKind::Square, &transform, 10.0, Color::BLACK);
        assert_eq!(bitmap.pixel(32, 32), Color::BLACK);
        assert_eq!(bitmap.pixel(32, 19), Color::BLACK);
        assert_eq!(bitmap.pixel(24, 24), Color::WHITE);
    }

    #[test]
    fn scaled_circle_grows_with_transform() {
        let mut bitmap = canvas();
        let transform = OverlayTransform {
            translation: Point::new(32.0, 32.0),
            scale: 2.0,
            rotation: 0.0,
        };
        fill_shape(&mut bitmap, ShapeKind::Circle, &transform, 5.0, Color::BLACK);
        assert_eq!(bitmap.pixel(32 + 8, 32), Color::BLACK);
        assert_eq!(bitmap.pixel(32 + 12, 32), Color::WHITE);
    }

    #[test]
    fn transformed_bitmap_is_centered_on_translation() {
        let mut bitmap = canvas();
        let source = Bitmap::new(4, 2, Color::rgba(255, 0, 0, 255)).expect("source");
        let transform = OverlayTransform::at(Point::new(10.0, 20.0));
        let writes = draw_transformed_bitmap(&mut bitmap, &source, &transform);
        assert_eq!(writes, 8);
        assert_eq!(bitmap.pixel(8, 19), Color::rgba(255, 0, 0, 255));
        assert_eq!(bitmap.pixel(11, 20), Color::rgba(255, 0, 0, 255));
        assert_eq!(bitmap.pixel(12, 20), Color::WHITE);
        assert_eq!(bitmap.pixel(10, 21), Color::WHITE);
    }

    #[test]
    fn quarter_turn_swaps_bitmap_extent() {
        let mut bitmap = canvas();
        let source = Bitmap::new(8, 2, Color::BLACK).expect("source");
        let transform = OverlayTransform {
            translation: Point::new(32.0, 32.0),
            scale: 1.0,
            rotation: std::f32::consts::FRAC_PI_2,
        };
        draw_transformed_bitmap(&mut bitmap, &source, &transform);
        assert_eq!(bitmap.pixel(32, 29), Color::BLACK);
        assert_eq!(bitmap.pixel(29, 32), Color::WHITE);
    }
}
