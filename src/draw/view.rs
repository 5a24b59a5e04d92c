//! The drawing view: owns the canvas, routes pointer samples by mode and exposes the
//! configuration surface a platform shell drives.
//!
//! Mutations and redraw scheduling are separate steps. Every mutating call raises a redraw
//! request that the shell consumes with [`DrawView::take_redraw_request`] before calling
//! [`DrawView::render`] on its next frame.

use crate::draw::bitmap::Bitmap;
use crate::draw::brush::{BrushEngine, StrokeCommit};
use crate::draw::gesture::TransformController;
use crate::draw::messages::{AnchoredOverlay, CanvasResetSource, ViewToShell};
use crate::draw::model::{BrushState, Color, Mode, OverlayTransform, ShapeKind, TouchAction, TouchEvent};
use crate::draw::raster;
use crate::draw::settings::DrawSettings;
use crate::draw::surface::RasterSurface;
use anyhow::Result;
use std::sync::mpsc::Sender;

pub struct DrawView {
    surface: RasterSurface,
    brush_state: BrushState,
    mode: Mode,
    brush: BrushEngine,
    overlay: TransformController,
    shape: ShapeKind,
    shape_radius: f32,
    image: Option<Bitmap>,
    redraw_requested: bool,
    notifier: Option<Sender<ViewToShell>>,
}

impl DrawView {
    /// Creates a view in Brush mode with a canvas sized and colored from `settings`.
    pub fn new(settings: &DrawSettings) -> Result<Self> {
        let surface = RasterSurface::new(
            settings.canvas_width,
            settings.canvas_height,
            settings.canvas_color,
        )?;
        let center = surface.center();
        Ok(Self {
            surface,
            brush_state: BrushState {
                color: settings.paint_color,
                stroke_width: settings.paint_thickness,
            },
            mode: Mode::Brush,
            brush: BrushEngine::new(settings.touch_tolerance),
            overlay: TransformController::new(center),
            shape: ShapeKind::default(),
            shape_radius: settings.shape_radius,
            image: None,
            redraw_requested: true,
            notifier: None,
        })
    }

    pub fn with_notifier(mut self, notifier: Sender<ViewToShell>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    fn notify(&self, message: ViewToShell) {
        if let Some(tx) = &self.notifier {
            let _ = tx.send(message);
        }
    }

    fn invalidate(&mut self) {
        self.redraw_requested = true;
    }

    /// Returns and clears the pending redraw request.
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    // ---- configuration ------------------------------------------------------

    pub fn set_brush_color(&mut self, argb: u32) {
        self.brush_state.color = Color::from_argb(argb);
        self.invalidate();
    }

    pub fn set_brush_thickness(&mut self, thickness: f32) {
        if !(thickness.is_finite() && thickness > 0.0) {
            tracing::warn!(thickness, "ignoring non-positive brush thickness");
            return;
        }
        self.brush_state.stroke_width = thickness;
        self.invalidate();
    }

    /// Switches mode. Entering Shape or Image places a fresh overlay at the canvas center.
    pub fn set_mode(&mut self, mode: Mode) {
        let from = self.mode;
        if self.brush.cancel() {
            tracing::debug!("in-progress stroke discarded by mode switch");
        }
        self.overlay.cancel();

        if mode.has_overlay() {
            self.overlay.reset(self.surface.center());
        }
        self.mode = mode;
        tracing::debug!(?from, to = ?mode, "mode changed");
        self.notify(ViewToShell::ModeChanged { from, to: mode });
        self.invalidate();
    }

    pub fn set_overlay_image(&mut self, bitmap: Bitmap) {
        self.image = Some(bitmap);
        self.invalidate();
    }

    pub fn set_overlay_shape(&mut self, shape: ShapeKind) {
        self.shape = shape;
        self.invalidate();
    }

    pub fn reset_canvas_color(&mut self, argb: u32) {
        self.brush.cancel();
        self.surface.clear(Color::from_argb(argb));
        self.after_reset(CanvasResetSource::Color);
    }

    /// Starts over from `bitmap`; the drawing adopts its dimensions.
    pub fn reset_canvas_bitmap(&mut self, bitmap: Bitmap) {
        self.brush.cancel();
        self.surface.replace(bitmap);
        self.after_reset(CanvasResetSource::Bitmap);
    }

    fn after_reset(&mut self, source: CanvasResetSource) {
        let (width, height) = self.surface.dimensions();
        tracing::info!(?source, width, height, "canvas reset");
        self.notify(ViewToShell::CanvasReset {
            source,
            width,
            height,
        });
        self.invalidate();
    }

    /// Bakes the live overlay into the drawing. Does nothing in Brush mode.
    ///
    /// The overlay transform is left untouched; re-entering an overlay mode is what places
    /// the next overlay afresh.
    pub fn anchor(&mut self) -> Option<AnchoredOverlay> {
        let transform = self.overlay.transform();
        let anchored = match self.mode {
            Mode::Brush => return None,
            Mode::Shape => {
                self.surface.commit_shape(
                    self.shape,
                    &transform,
                    self.shape_radius,
                    self.brush_state.color,
                );
                AnchoredOverlay::Shape(self.shape)
            }
            Mode::Image => {
                let Some(image) = self.image.as_ref() else {
                    tracing::warn!("anchor requested in image mode without an image");
                    return None;
                };
                self.surface.commit_transformed_bitmap(image, &transform);
                AnchoredOverlay::Image {
                    width: image.width(),
                    height: image.height(),
                }
            }
        };
        tracing::info!(
            ?anchored,
            x = transform.translation.x,
            y = transform.translation.y,
            scale = transform.scale,
            rotation = transform.rotation,
            "overlay anchored"
        );
        self.notify(ViewToShell::OverlayAnchored(anchored));
        self.invalidate();
        Some(anchored)
    }

    /// Toolbar confirm: anchor, then back to Brush.
    pub fn confirm_overlay(&mut self) -> Option<AnchoredOverlay> {
        let anchored = self.anchor();
        self.set_mode(Mode::Brush);
        anchored
    }

    /// Toolbar cancel: back to Brush without touching the drawing.
    pub fn cancel_overlay(&mut self) {
        self.set_mode(Mode::Brush);
    }

    // ---- queries ------------------------------------------------------------

    pub fn brush_color(&self) -> u32 {
        self.brush_state.color.to_argb()
    }

    pub fn brush_thickness(&self) -> f32 {
        self.brush_state.stroke_width
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.surface.dimensions()
    }

    pub fn overlay_transform(&self) -> OverlayTransform {
        self.overlay.transform()
    }

    pub fn overlay(&self) -> &TransformController {
        &self.overlay
    }

    pub fn is_stroking(&self) -> bool {
        self.brush.is_drawing()
    }

    /// The committed drawing only: live strokes and unanchored overlays never appear here.
    pub fn export_bitmap(&self) -> &Bitmap {
        self.surface.export()
    }

    // ---- input --------------------------------------------------------------

    /// Routes one pointer sample to the brush or the overlay depending on the mode.
    /// Returns `true` when the sample changed what would be rendered.
    pub fn on_touch(&mut self, event: &TouchEvent) -> bool {
        let changed = if self.mode.has_overlay() {
            self.overlay.handle(event)
        } else {
            self.on_touch_brush(event)
        };
        if changed {
            self.invalidate();
        }
        changed
    }

    fn on_touch_brush(&mut self, event: &TouchEvent) -> bool {
        let point = event.position();
        match event.action {
            TouchAction::Down => {
                self.brush.pointer_down(event.pointer_id, point);
                true
            }
            TouchAction::Move => self.brush.pointer_move(event.pointer_id, point),
            TouchAction::PointerUp => {
                let commit = self.brush.pointer_up(event.pointer_id, point);
                self.commit_brush(commit)
            }
            TouchAction::Up => {
                let commit = self.brush.release(event.pointer_id, point);
                self.commit_brush(commit)
            }
            TouchAction::Cancel => self.brush.cancel(),
            // Extra fingers do not paint.
            TouchAction::PointerDown => false,
        }
    }

    fn commit_brush(&mut self, commit: Option<StrokeCommit>) -> bool {
        match commit {
            Some(StrokeCommit::Path(path)) => {
                self.surface.commit_stroke(&path, &self.brush_state);
                true
            }
            Some(StrokeCommit::Point(point)) => {
                self.surface.commit_point(point, &self.brush_state);
                true
            }
            None => false,
        }
    }

    // ---- rendering ----------------------------------------------------------

    /// Composes the frame the shell should display: drawing, live stroke, live overlay.
    pub fn render(&self) -> Bitmap {
        let mut frame = self.surface.export().clone();

        match self.brush.preview() {
            Some(StrokeCommit::Path(path)) => {
                raster::stroke_path(&mut frame, &path, &self.brush_state);
            }
            Some(StrokeCommit::Point(point)) => {
                raster::fill_dot(&mut frame, point, &self.brush_state);
            }
            None => {}
        }

        let transform = self.overlay.transform();
        match self.mode {
            Mode::Brush => {}
            Mode::Shape => {
                raster::fill_shape(
                    &mut frame,
                    self.shape,
                    &transform,
                    self.shape_radius,
                    self.brush_state.color,
                );
            }
            Mode::Image => {
                if let Some(image) = &self.image {
                    raster::draw_transformed_bitmap(&mut frame, image, &transform);
                }
            }
        }
        frame
    }
}
