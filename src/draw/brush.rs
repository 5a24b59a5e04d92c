use crate::draw::model::{Point, PointerId};
use crate::draw::raster::StrokePath;

/// Minimum per-axis travel, in pixels, before a move extends the stroke.
pub const DEFAULT_TOUCH_TOLERANCE: f32 = 4.0;

/// What a finished gesture leaves on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub enum StrokeCommit {
    Path(StrokePath),
    Point(Point),
}

#[derive(Debug, Clone, PartialEq)]
struct ActiveStroke {
    pointer: PointerId,
    path: StrokePath,
    last: Point,
    non_trivial: bool,
}

impl ActiveStroke {
    fn finish(mut self, point: Point) -> StrokeCommit {
        if self.non_trivial {
            self.path.line_to(point);
            StrokeCommit::Path(self.path)
        } else {
            StrokeCommit::Point(point)
        }
    }
}

/// Turns one pointer's down/move/up samples into a smoothed stroke.
#[derive(Debug, Clone, PartialEq)]
pub struct BrushEngine {
    tolerance: f32,
    active: Option<ActiveStroke>,
}

impl BrushEngine {
    pub fn new(tolerance: f32) -> Self {
        Self {
            tolerance: tolerance.max(0.0),
            active: None,
        }
    }

    pub fn is_drawing(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_path(&self) -> Option<&StrokePath> {
        self.active.as_ref().map(|stroke| &stroke.path)
    }

    /// What releasing the pointer right now would commit, for live preview.
    pub fn preview(&self) -> Option<StrokeCommit> {
        let stroke = self.active.as_ref()?;
        Some(if stroke.non_trivial {
            StrokeCommit::Path(stroke.path.clone())
        } else {
            StrokeCommit::Point(stroke.last)
        })
    }

    pub fn pointer_down(&mut self, pointer: PointerId, point: Point) {
        if self.active.is_some() {
            tracing::debug!(pointer, "stroke restarted without pointer-up");
        }
        self.active = Some(ActiveStroke {
            pointer,
            path: StrokePath::new(point),
            last: point,
            non_trivial: false,
        });
    }

    /// Returns `true` when the path grew.
    pub fn pointer_move(&mut self, pointer: PointerId, point: Point) -> bool {
        let Some(stroke) = self.active.as_mut() else {
            tracing::debug!(pointer, "move without an active stroke ignored");
            return false;
        };
        if stroke.pointer != pointer {
            return false;
        }

        let dx = (point.x - stroke.last.x).abs();
        let dy = (point.y - stroke.last.y).abs();
        if dx <= self.tolerance && dy <= self.tolerance {
            return false;
        }

        stroke.path.quad_to(stroke.last, stroke.last.midpoint(point));
        stroke.last = point;
        stroke.non_trivial = true;
        true
    }

    /// Ends the stroke and hands back what must be baked into the canvas.
    pub fn pointer_up(&mut self, pointer: PointerId, point: Point) -> Option<StrokeCommit> {
        match self.active.as_ref() {
            Some(stroke) if stroke.pointer == pointer => {}
            Some(_) => return None,
            None => {
                tracing::debug!(pointer, "pointer-up without an active stroke ignored");
                return None;
            }
        }

        let stroke = self.active.take()?;
        Some(stroke.finish(point))
    }

    /// Every pointer is up: ends the stroke whichever pointer lifted last.
    pub fn release(&mut self, pointer: PointerId, point: Point) -> Option<StrokeCommit> {
        let stroke = self.active.take()?;
        if stroke.pointer == pointer {
            return Some(stroke.finish(point));
        }
        tracing::debug!(
            pointer,
            drawing = stroke.pointer,
            "stroke ended by another pointer; closing at last sample"
        );
        let last = stroke.last;
        Some(stroke.finish(last))
    }

    /// Drops the in-progress stroke without committing anything.
    pub fn cancel(&mut self) -> bool {
        self.active.take().is_some()
    }
}

impl Default for BrushEngine {
    fn default() -> Self {
        Self::new(DEFAULT_TOUCH_TOLERANCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::raster::PathSegment;

    #[test]
    fn tap_commits_a_point() {
        let mut brush = BrushEngine::default();
        brush.pointer_down(0, Point::new(5.0, 7.0));
        assert_eq!(
            brush.pointer_up(0, Point::new(5.0, 7.0)),
            Some(StrokeCommit::Point(Point::new(5.0, 7.0)))
        );
        assert!(!brush.is_drawing());
    }

    #[test]
    fn jitter_within_tolerance_never_grows_the_path() {
        let mut brush = BrushEngine::default();
        brush.pointer_down(0, Point::new(10.0, 10.0));
        assert!(!brush.pointer_move(0, Point::new(14.0, 10.0)));
        assert!(!brush.pointer_move(0, Point::new(12.0, 6.0)));
        assert!(!brush.pointer_move(0, Point::new(7.0, 13.0)));
        assert!(brush.active_path().expect("active").is_empty());
        assert_eq!(
            brush.pointer_up(0, Point::new(11.0, 11.0)),
            Some(StrokeCommit::Point(Point::new(11.0, 11.0)))
        );
    }

    #[test]
    fn moves_past_tolerance_append_midpoint_quads() {
        let mut brush = BrushEngine::default();
        brush.pointer_down(0, Point::new(0.0, 0.0));
        assert!(brush.pointer_move(0, Point::new(10.0, 0.0)));
        assert!(brush.pointer_move(0, Point::new(10.0, 20.0)));

        let path = brush.active_path().expect("active");
        assert_eq!(
            path.segments(),
            &[
                PathSegment::Quad {
                    control: Point::new(0.0, 0.0),
                    end: Point::new(5.0, 0.0),
                },
                PathSegment::Quad {
                    control: Point::new(10.0, 0.0),
                    end: Point::new(10.0, 10.0),
                },
            ]
        );

        match brush.pointer_up(0, Point::new(10.0, 22.0)) {
            Some(StrokeCommit::Path(path)) => {
                assert_eq!(path.current(), Point::new(10.0, 22.0));
                assert_eq!(path.segments().len(), 3);
            }
            other => panic!("expected path commit, got {other:?}"),
        }
    }

    #[test]
    fn inconsistent_pointers_are_ignored() {
        let mut brush = BrushEngine::default();
        assert!(!brush.pointer_move(3, Point::new(50.0, 50.0)));
        assert_eq!(brush.pointer_up(3, Point::new(50.0, 50.0)), None);

        brush.pointer_down(1, Point::new(0.0, 0.0));
        assert!(!brush.pointer_move(2, Point::new(40.0, 40.0)));
        assert_eq!(brush.pointer_up(2, Point::new(40.0, 40.0)), None);
        assert!(brush.is_drawing());
    }

    #[test]
    fn release_by_another_pointer_closes_at_last_sample() {
        let mut brush = BrushEngine::default();
        brush.pointer_down(0, Point::new(0.0, 0.0));
        brush.pointer_move(0, Point::new(20.0, 0.0));

        match brush.release(1, Point::new(99.0, 99.0)) {
            Some(StrokeCommit::Path(path)) => assert_eq!(
                path.segments().last(),
                Some(&PathSegment::Line {
                    end: Point::new(20.0, 0.0)
                })
            ),
            other => panic!("expected path commit, got {other:?}"),
        }
        assert!(!brush.is_drawing());
        assert_eq!(brush.release(1, Point::new(0.0, 0.0)), None);
    }

    #[test]
    fn cancel_discards_without_commit() {
        let mut brush = BrushEngine::default();
        brush.pointer_down(0, Point::new(0.0, 0.0));
        brush.pointer_move(0, Point::new(30.0, 30.0));
        assert!(brush.cancel());
        assert_eq!(brush.pointer_up(0, Point::new(30.0, 30.0)), None);
        assert!(!brush.cancel());
    }
}
