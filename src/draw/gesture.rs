//! Multi-touch gesture tracking for the floating overlay.
//!
//! One finger drags the overlay relative to where it rested. Two fingers freeze the
//! translation and drive scale and rotation through a [`PinchDetector`]. Scale and rotation
//! fold into the committed transform whenever the tracked pair breaks up, so later
//! sessions compose on top of earlier ones.

use crate::draw::model::{OverlayTransform, Point, PointerId, TouchAction, TouchEvent};
use crate::draw::pinch::PinchDetector;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Idle,
    Translating,
    Pinching,
}

#[derive(Debug, Clone, PartialEq)]
enum Session {
    Idle,
    Translating {
        primary: PointerId,
        initial: Point,
        pivot: Point,
    },
    Pinching {
        primary: PointerId,
        secondary: PointerId,
        detector: PinchDetector,
        session_scale: f32,
        session_rotation: f32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransformController {
    committed: OverlayTransform,
    live: OverlayTransform,
    pointers: Vec<(PointerId, Point)>,
    session: Session,
}

impl TransformController {
    pub fn new(origin: Point) -> Self {
        let transform = OverlayTransform::at(origin);
        Self {
            committed: transform,
            live: transform,
            pointers: Vec::new(),
            session: Session::Idle,
        }
    }

    /// The transform the overlay is rendered and anchored with.
    pub fn transform(&self) -> OverlayTransform {
        self.live
    }

    /// Values that survive the end of the current gesture session.
    pub fn committed(&self) -> OverlayTransform {
        self.committed
    }

    pub fn phase(&self) -> GesturePhase {
        match self.session {
            Session::Idle => GesturePhase::Idle,
            Session::Translating { .. } => GesturePhase::Translating,
            Session::Pinching { .. } => GesturePhase::Pinching,
        }
    }

    /// Fresh placement: translation at `origin`, identity scale and rotation.
    pub fn reset(&mut self, origin: Point) {
        *self = Self::new(origin);
    }

    /// Abandons the running session. Nothing from it is kept beyond what already folded.
    pub fn cancel(&mut self) {
        if !matches!(self.session, Session::Idle) {
            tracing::debug!("overlay gesture session discarded");
        }
        self.live = self.committed;
        self.pointers.clear();
        self.session = Session::Idle;
    }

    /// Feeds one pointer sample. Returns `true` when the rendered transform may have changed.
    pub fn handle(&mut self, event: &TouchEvent) -> bool {
        let id = event.pointer_id;
        let point = event.position();
        let changed = match event.action {
            TouchAction::Down => {
                if !self.pointers.is_empty() {
                    tracing::debug!(pointer = id, "down while pointers are held; restarting session");
                    self.end_session();
                }
                self.pointer_down(id, point)
            }
            TouchAction::PointerDown => self.pointer_down(id, point),
            TouchAction::Move => self.pointer_move(id, point),
            TouchAction::PointerUp => self.pointer_up(id),
            TouchAction::Up => {
                if self.position_of(id).is_none() {
                    tracing::debug!(pointer = id, "up for unknown pointer ignored");
                    return false;
                }
                self.end_session();
                true
            }
            TouchAction::Cancel => {
                self.cancel();
                true
            }
        };

        if event.pointer_count as usize != self.pointers.len()
            && !matches!(event.action, TouchAction::Up | TouchAction::PointerUp | TouchAction::Cancel)
        {
            tracing::trace!(
                reported = event.pointer_count,
                tracked = self.pointers.len(),
                "pointer count disagrees with tracked pointers"
            );
        }
        changed
    }

    fn position_of(&self, id: PointerId) -> Option<Point> {
        self.pointers
            .iter()
            .find(|(pointer, _)| *pointer == id)
            .map(|(_, point)| *point)
    }

    fn pointer_down(&mut self, id: PointerId, point: Point) -> bool {
        if let Some(entry) = self.pointers.iter_mut().find(|(pointer, _)| *pointer == id) {
            entry.1 = point;
        } else {
            self.pointers.push((id, point));
        }

        match self.session {
            Session::Idle => {
                self.start_translating(id, point, self.committed.translation);
                false
            }
            Session::Translating { primary, .. } if primary != id => {
                self.start_pinching(primary, id);
                false
            }
            _ => false,
        }
    }

    fn pointer_move(&mut self, id: PointerId, point: Point) -> bool {
        let Some(entry) = self.pointers.iter_mut().find(|(pointer, _)| *pointer == id) else {
            tracing::debug!(pointer = id, "move for unknown pointer ignored");
            return false;
        };
        entry.1 = point;

        match self.session {
            Session::Translating {
                primary,
                initial,
                pivot,
            } if primary == id => {
                let (dx, dy) = initial.delta_to(point);
                self.live.translation = pivot.offset(dx, dy);
                true
            }
            Session::Pinching {
                primary, secondary, ..
            } if primary == id || secondary == id => self.update_pinch(primary, secondary),
            _ => false,
        }
    }

    fn pointer_up(&mut self, id: PointerId) -> bool {
        if self.position_of(id).is_none() {
            tracing::debug!(pointer = id, "pointer-up for unknown pointer ignored");
            return false;
        }
        self.pointers.retain(|(pointer, _)| *pointer != id);

        let tracked = match self.session {
            Session::Translating { primary, .. } => primary == id,
            Session::Pinching {
                primary, secondary, ..
            } => primary == id || secondary == id,
            Session::Idle => false,
        };
        if !tracked {
            return false;
        }

        self.fold_pinch();
        match self.pointers.as_slice() {
            [] => self.end_session(),
            [(remaining, point)] => {
                let (remaining, point) = (*remaining, *point);
                self.start_translating(remaining, point, self.live.translation);
            }
            [(first, _), (second, _), ..] => {
                let (first, second) = (*first, *second);
                self.start_pinching(first, second);
            }
        }
        true
    }

    fn start_translating(&mut self, primary: PointerId, initial: Point, pivot: Point) {
        tracing::debug!(pointer = primary, "overlay drag started");
        self.session = Session::Translating {
            primary,
            initial,
            pivot,
        };
    }

    /// Translation stays frozen where it is from here on.
    fn start_pinching(&mut self, primary: PointerId, secondary: PointerId) {
        let (Some(first), Some(second)) = (self.position_of(primary), self.position_of(secondary))
        else {
            return;
        };
        tracing::debug!(primary, secondary, "overlay pinch started");
        self.session = Session::Pinching {
            primary,
            secondary,
            detector: PinchDetector::begin(first, second),
            session_scale: 1.0,
            session_rotation: 0.0,
        };
    }

    fn update_pinch(&mut self, primary: PointerId, secondary: PointerId) -> bool {
        let (Some(first), Some(second)) = (self.position_of(primary), self.position_of(secondary))
        else {
            return false;
        };
        let Session::Pinching {
            detector,
            session_scale,
            session_rotation,
            ..
        } = &mut self.session
        else {
            return false;
        };

        let delta = detector.update(first, second);
        *session_scale *= delta.scale_factor;
        *session_rotation = delta.rotation;
        self.live.scale = self.committed.scale * *session_scale;
        self.live.rotation = self.committed.rotation + *session_rotation;
        true
    }

    /// Moves the pinch's scale and rotation into the committed transform.
    fn fold_pinch(&mut self) {
        if let Session::Pinching {
            session_scale,
            session_rotation,
            ..
        } = self.session
        {
            self.committed.scale *= session_scale;
            self.committed.rotation += session_rotation;
            self.live.scale = self.committed.scale;
            self.live.rotation = self.committed.rotation;
            tracing::debug!(
                scale = self.committed.scale,
                rotation = self.committed.rotation,
                "pinch folded into overlay transform"
            );
            self.session = Session::Idle;
        }
    }

    /// Last finger lifted: the overlay rests where it was rendered.
    fn end_session(&mut self) {
        self.fold_pinch();
        self.committed.translation = self.live.translation;
        self.pointers.clear();
        self.session = Session::Idle;
        tracing::debug!(
            x = self.committed.translation.x,
            y = self.committed.translation.y,
            "overlay gesture session ended"
        );
    }
}
