use crate::draw::model::Point;
use std::f32::consts::{PI, TAU};

/// Spans or vectors shorter than this are treated as zero-length.
const DEGENERATE_SPAN: f32 = 1e-4;

/// Per-frame result of a two-pointer update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchDelta {
    /// Multiplicative scale increment since the previous frame.
    pub scale_factor: f32,
    /// Signed angle, in (-π, π], between the initial and current pointer vectors.
    pub rotation: f32,
}

impl PinchDelta {
    pub const IDENTITY: Self = Self {
        scale_factor: 1.0,
        rotation: 0.0,
    };
}

/// Tracks the span and orientation between two pointers across one pinch.
#[derive(Debug, Clone, PartialEq)]
pub struct PinchDetector {
    initial: Option<(f32, f32)>,
    previous_span: f32,
    rotation: f32,
}

impl PinchDetector {
    pub fn begin(first: Point, second: Point) -> Self {
        let vector = first.delta_to(second);
        Self {
            initial: non_degenerate(vector),
            previous_span: first.distance(second),
            rotation: 0.0,
        }
    }

    pub fn update(&mut self, first: Point, second: Point) -> PinchDelta {
        let span = first.distance(second);
        let scale_factor = if self.previous_span <= DEGENERATE_SPAN || span <= DEGENERATE_SPAN {
            1.0
        } else {
            span / self.previous_span
        };
        if span > DEGENERATE_SPAN {
            self.previous_span = span;
        }

        let current = non_degenerate(first.delta_to(second));
        match (self.initial, current) {
            (Some(initial), Some(current)) => {
                self.rotation = signed_angle(initial, current);
            }
            // Pointers started on the same pixel: the first usable vector becomes the
            // reference, so rotation is measured from where they separated.
            (None, Some(current)) => {
                self.initial = Some(current);
            }
            (_, None) => {}
        }

        PinchDelta {
            scale_factor,
            rotation: self.rotation,
        }
    }
}

fn non_degenerate(vector: (f32, f32)) -> Option<(f32, f32)> {
    let len = (vector.0 * vector.0 + vector.1 * vector.1).sqrt();
    if len <= DEGENERATE_SPAN || !len.is_finite() {
        return None;
    }
    Some((vector.0 / len, vector.1 / len))
}

fn signed_angle(from: (f32, f32), to: (f32, f32)) -> f32 {
    normalize_angle(to.1.atan2(to.0) - from.1.atan2(from.0))
}

/// Wraps `angle` into (-π, π].
pub fn normalize_angle(angle: f32) -> f32 {
    let mut wrapped = angle % TAU;
    if wrapped <= -PI {
        wrapped += TAU;
    } else if wrapped > PI {
        wrapped -= TAU;
    }
    wrapped
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn spreading_fingers_yields_per_frame_increments() {
        let mut pinch = PinchDetector::begin(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        let first = pinch.update(Point::new(0.0, 0.0), Point::new(20.0, 0.0));
        let second = pinch.update(Point::new(0.0, 0.0), Point::new(30.0, 0.0));
        assert!(approx(first.scale_factor, 2.0));
        assert!(approx(second.scale_factor, 1.5));
        assert!(approx(second.rotation, 0.0));
    }

    #[test]
    fn rotation_is_measured_from_initial_vector() {
        let mut pinch = PinchDetector::begin(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        let delta = pinch.update(Point::new(0.0, 0.0), Point::new(0.0, 10.0));
        assert!(approx(delta.rotation, FRAC_PI_2));
        assert!(approx(delta.scale_factor, 1.0));

        let delta = pinch.update(Point::new(0.0, 0.0), Point::new(0.0, -10.0));
        assert!(approx(delta.rotation, -FRAC_PI_2));
    }

    #[test]
    fn half_turn_wraps_to_positive_pi() {
        assert!(approx(normalize_angle(-PI), PI));
        assert!(approx(normalize_angle(2.5 * PI), FRAC_PI_2));
        assert!(approx(normalize_angle(-1.5 * PI), FRAC_PI_2));
    }

    #[test]
    fn coincident_pointers_are_identity() {
        let mut pinch = PinchDetector::begin(Point::new(5.0, 5.0), Point::new(5.0, 5.0));
        assert_eq!(
            pinch.update(Point::new(5.0, 5.0), Point::new(5.0, 5.0)),
            PinchDelta::IDENTITY
        );

        // Separation after a zero-span start seeds the reference without a jump.
        let delta = pinch.update(Point::new(5.0, 5.0), Point::new(15.0, 5.0));
        assert_eq!(delta, PinchDelta::IDENTITY);
        let delta = pinch.update(Point::new(5.0, 5.0), Point::new(5.0, 25.0));
        assert!(approx(delta.scale_factor, 2.0));
        assert!(approx(delta.rotation, FRAC_PI_2));
    }
}
