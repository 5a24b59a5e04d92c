use crate::draw::bitmap::Bitmap;
use crate::draw::model::{BrushState, Color, OverlayTransform, Point, ShapeKind};
use crate::draw::raster::{self, StrokePath};
use anyhow::{Context, Result};

/// Nominal half-extent of a shape overlay before scaling.
pub const DEFAULT_SHAPE_RADIUS: f32 = 150.0;

/// Owner of the persistent drawing. Every mutation is irreversible.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    drawing: Bitmap,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32, background: Color) -> Result<Self> {
        let drawing = Bitmap::new(width, height, background)
            .with_context(|| format!("create {width}x{height} drawing surface"))?;
        Ok(Self { drawing })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.drawing.dimensions()
    }

    pub fn center(&self) -> Point {
        let (width, height) = self.dimensions();
        Point::new(width as f32 * 0.5, height as f32 * 0.5)
    }

    pub fn clear(&mut self, color: Color) {
        self.drawing.fill(color);
    }

    /// Adopts `bitmap` wholesale, including its dimensions.
    pub fn replace(&mut self, bitmap: Bitmap) {
        if bitmap.dimensions() != self.drawing.dimensions() {
            tracing::debug!(
                from = ?self.drawing.dimensions(),
                to = ?bitmap.dimensions(),
                "drawing surface adopts new dimensions"
            );
        }
        self.drawing = bitmap;
    }

    pub fn commit_stroke(&mut self, path: &StrokePath, brush: &BrushState) {
        let writes = raster::stroke_path(&mut self.drawing, path, brush);
        tracing::trace!(segments = path.segments().len(), writes, "stroke committed");
    }

    pub fn commit_point(&mut self, point: Point, brush: &BrushState) {
        let writes = raster::fill_dot(&mut self.drawing, point, brush);
        tracing::trace!(x = point.x, y = point.y, writes, "dot committed");
    }

    pub fn commit_transformed_bitmap(&mut self, bitmap: &Bitmap, transform: &OverlayTransform) {
        let writes = raster::draw_transformed_bitmap(&mut self.drawing, bitmap, transform);
        tracing::trace!(writes, "bitmap composited");
    }

    pub fn commit_shape(
        &mut self,
        kind: ShapeKind,
        transform: &OverlayTransform,
        radius: f32,
        color: Color,
    ) {
        let writes = raster::fill_shape(&mut self.drawing, kind, transform, radius, color);
        tracing::trace!(?kind, writes, "shape committed");
    }

    /// The committed drawing, for encoding. Never includes live previews.
    pub fn export(&self) -> &Bitmap {
        &self.drawing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brush() -> BrushState {
        BrushState {
            color: Color::rgba(200, 10, 10, 255),
            stroke_width: 20.0,
        }
    }

    #[test]
    fn straight_vertical_stroke_colors_pixels_along_line() {
        let mut surface = RasterSurface::new(64, 64, Color::WHITE).expect("surface");
        let mut path = StrokePath::new(Point::new(10.0, 10.0));
        path.line_to(Point::new(10.0, 50.0));
        surface.commit_stroke(&path, &brush());

        let drawing = surface.export();
        for y in 10..=50 {
            assert_eq!(drawing.pixel(10, y), brush().color, "row {y}");
        }
        assert_eq!(drawing.pixel(40, 30), Color::WHITE);
    }

    #[test]
    fn replace_adopts_source_dimensions() {
        let mut surface = RasterSurface::new(8, 8, Color::WHITE).expect("surface");
        surface.replace(Bitmap::new(3, 5, Color::BLACK).expect("bitmap"));
        assert_eq!(surface.dimensions(), (3, 5));
        assert_eq!(surface.center(), Point::new(1.5, 2.5));
        assert_eq!(surface.export().pixel(2, 4), Color::BLACK);
    }

    #[test]
    fn clear_fills_every_pixel() {
        let mut surface = RasterSurface::new(4, 4, Color::WHITE).expect("surface");
        surface.commit_point(Point::new(2.0, 2.0), &brush());
        surface.clear(Color::from_argb(0xFF00_FF00));
        let drawing = surface.export();
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(drawing.pixel(x, y), Color::rgba(0, 255, 0, 255));
            }
        }
    }

    #[test]
    fn oversized_surface_reports_allocation_error() {
        assert!(RasterSurface::new(u32::MAX, u32::MAX, Color::WHITE).is_err());
    }
}
