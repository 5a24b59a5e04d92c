use crate::draw::model::{Mode, ShapeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchoredOverlay {
    Shape(ShapeKind),
    Image { width: u32, height: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanvasResetSource {
    Color,
    Bitmap,
}

/// Notifications from the drawing core to the hosting shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewToShell {
    /// The shell should swap toolbar controls (color/thickness vs. cancel/confirm).
    ModeChanged { from: Mode, to: Mode },
    OverlayAnchored(AnchoredOverlay),
    /// Drawing dimensions may differ from before; re-query them.
    CanvasReset {
        source: CanvasResetSource,
        width: u32,
        height: u32,
    },
}
