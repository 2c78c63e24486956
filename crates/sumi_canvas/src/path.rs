//! Path command recording
//!
//! The engine accumulates a verb stream per path. Point-carrying verbs are
//! transformed into device space by the current state transform at the
//! moment they are appended; later transform changes never touch
//! already-recorded points. `Close` and `Winding` carry no coordinates.

use smallvec::SmallVec;
use sumi_core::{Transform2D, Winding};

/// Bezier circle-quadrant approximation constant
pub(crate) const KAPPA90: f32 = 0.552_284_8;

/// One recorded path command. Operand counts are fixed per verb
/// (2 / 2 / 6 / 0 / 1) by construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Verb {
    MoveTo(f32, f32),
    LineTo(f32, f32),
    BezierTo(f32, f32, f32, f32, f32, f32),
    Close,
    Winding(Winding),
}

/// Accumulates the verb stream for the current path.
///
/// `last` tracks the most recent endpoint in *path space* (before the
/// transform); `arc_to` and `quad_to` derive their control geometry from
/// it. The verbs themselves store device-space coordinates.
#[derive(Debug, Default)]
pub(crate) struct CommandRecorder {
    verbs: SmallVec<[Verb; 16]>,
    last: (f32, f32),
}

impl CommandRecorder {
    pub fn clear(&mut self) {
        self.verbs.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.verbs.is_empty()
    }

    pub fn verbs(&self) -> &[Verb] {
        &self.verbs
    }

    /// Last endpoint in path space
    pub fn last_point(&self) -> (f32, f32) {
        self.last
    }

    /// Append path-space verbs, transforming each coordinate pair
    pub fn append(&mut self, verbs: &[Verb], transform: &Transform2D) {
        // Track the untransformed endpoint before mapping to device space
        for verb in verbs {
            match *verb {
                Verb::MoveTo(x, y) | Verb::LineTo(x, y) => self.last = (x, y),
                Verb::BezierTo(.., x, y) => self.last = (x, y),
                Verb::Close | Verb::Winding(_) => {}
            }
        }

        self.verbs.reserve(verbs.len());
        for verb in verbs {
            let transformed = match *verb {
                Verb::MoveTo(x, y) => {
                    let (x, y) = transform.transform_point(x, y);
                    Verb::MoveTo(x, y)
                }
                Verb::LineTo(x, y) => {
                    let (x, y) = transform.transform_point(x, y);
                    Verb::LineTo(x, y)
                }
                Verb::BezierTo(c1x, c1y, c2x, c2y, x, y) => {
                    let (c1x, c1y) = transform.transform_point(c1x, c1y);
                    let (c2x, c2y) = transform.transform_point(c2x, c2y);
                    let (x, y) = transform.transform_point(x, y);
                    Verb::BezierTo(c1x, c1y, c2x, c2y, x, y)
                }
                other => other,
            };
            self.verbs.push(transformed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_transformed_at_append_time() {
        let mut rec = CommandRecorder::default();
        let shifted = Transform2D::translation(10.0, 0.0);
        rec.append(&[Verb::MoveTo(1.0, 2.0)], &shifted);
        // A later transform change must not affect recorded verbs
        rec.append(&[Verb::LineTo(5.0, 5.0)], &Transform2D::identity());

        assert_eq!(
            rec.verbs(),
            &[Verb::MoveTo(11.0, 2.0), Verb::LineTo(5.0, 5.0)]
        );
    }

    #[test]
    fn test_last_point_stays_in_path_space() {
        let mut rec = CommandRecorder::default();
        let shifted = Transform2D::translation(10.0, 0.0);
        rec.append(&[Verb::MoveTo(1.0, 2.0)], &shifted);
        assert_eq!(rec.last_point(), (1.0, 2.0));
    }

    #[test]
    fn test_close_and_winding_carry_no_coordinates() {
        let mut rec = CommandRecorder::default();
        let shifted = Transform2D::translation(10.0, 0.0);
        rec.append(&[Verb::Close, Verb::Winding(Winding::Cw)], &shifted);
        assert_eq!(rec.verbs(), &[Verb::Close, Verb::Winding(Winding::Cw)]);
    }
}
