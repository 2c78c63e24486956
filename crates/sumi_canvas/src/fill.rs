//! Fill expansion
//!
//! Builds the triangle-fan fill shell for each sub-path, plus an optional
//! anti-aliasing fringe strip along the contour. With a fringe the shell is
//! inset by half the fringe width so the strip straddles the true edge; the
//! fragment gradient then fades across one device pixel.

use sumi_core::{LineJoin, Vertex};

use crate::cache::{reserve_geometric, PathCache};
use crate::stroke::bevel_join;

impl PathCache {
    /// Expand flattened sub-paths into fill geometry. `w` is the fringe
    /// width (zero disables the fringe strip entirely).
    pub fn expand_fill(&mut self, w: f32, line_join: LineJoin, miter_limit: f32) {
        let aa = w;
        let fringe = w > 0.0;
        let woff = 0.5 * aa;

        // Vertex storage is reused from the start on every expansion
        self.vertices.clear();

        self.calculate_joins(w, line_join, miter_limit);

        let mut cverts = 0;
        for path in &self.paths {
            cverts += path.count + path.nbevel + 1;
            if fringe {
                cverts += (path.count + path.nbevel * 5 + 1) * 2;
            }
        }
        reserve_geometric(&mut self.vertices, cverts);

        let convex = self.paths.len() == 1 && self.paths[0].convex;

        for path_idx in 0..self.paths.len() {
            let (first, count) = {
                let p = &self.paths[path_idx];
                (p.first, p.count)
            };

            // Fill shell
            let start = self.vertices.len();
            if fringe {
                let mut p0_idx = count - 1;
                for p1_idx in 0..count {
                    let p0 = self.points[first + p0_idx];
                    let p1 = self.points[first + p1_idx];
                    if p1.flags.bevel {
                        if p1.flags.left {
                            self.vertices.push(Vertex::new(
                                p1.x + p1.dmx * woff,
                                p1.y + p1.dmy * woff,
                                0.5,
                                1.0,
                            ));
                        } else {
                            // Two shell vertices hug the corner on the
                            // outside of a right turn
                            let dlx0 = p0.dy;
                            let dly0 = -p0.dx;
                            let dlx1 = p1.dy;
                            let dly1 = -p1.dx;
                            self.vertices.push(Vertex::new(
                                p1.x + dlx0 * woff,
                                p1.y + dly0 * woff,
                                0.5,
                                1.0,
                            ));
                            self.vertices.push(Vertex::new(
                                p1.x + dlx1 * woff,
                                p1.y + dly1 * woff,
                                0.5,
                                1.0,
                            ));
                        }
                    } else {
                        self.vertices.push(Vertex::new(
                            p1.x + p1.dmx * woff,
                            p1.y + p1.dmy * woff,
                            0.5,
                            1.0,
                        ));
                    }
                    p0_idx = p1_idx;
                }
            } else {
                for i in 0..count {
                    let p = self.points[first + i];
                    self.vertices.push(Vertex::new(p.x, p.y, 0.5, 1.0));
                }
            }
            self.paths[path_idx].fill = start..self.vertices.len();

            // Fringe strip
            if fringe {
                let mut lw = w + woff;
                let rw = w - woff;
                let mut lu = 0.0;
                let ru = 1.0;

                // A convex shape has its AA fringe entirely outside, so the
                // inner row sits on the inset shell edge
                if convex {
                    lw = woff;
                    lu = 0.5;
                }

                let start = self.vertices.len();
                let mut p0_idx = count - 1;
                for p1_idx in 0..count {
                    let p0 = self.points[first + p0_idx];
                    let p1 = self.points[first + p1_idx];
                    if p1.flags.bevel || p1.flags.inner_bevel {
                        bevel_join(&mut self.vertices, &p0, &p1, lw, rw, lu, ru);
                    } else {
                        self.vertices.push(Vertex::new(
                            p1.x + p1.dmx * lw,
                            p1.y + p1.dmy * lw,
                            lu,
                            1.0,
                        ));
                        self.vertices.push(Vertex::new(
                            p1.x - p1.dmx * rw,
                            p1.y - p1.dmy * rw,
                            ru,
                            1.0,
                        ));
                    }
                    p0_idx = p1_idx;
                }

                // Loop the strip onto its own first two vertices
                let v0 = self.vertices[start];
                let v1 = self.vertices[start + 1];
                self.vertices.push(Vertex::new(v0.x, v0.y, lu, 1.0));
                self.vertices.push(Vertex::new(v1.x, v1.y, ru, 1.0));

                self.paths[path_idx].stroke = start..self.vertices.len();
            } else {
                self.paths[path_idx].stroke = 0..0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::Verb;

    fn rect_verbs(x: f32, y: f32, w: f32, h: f32) -> Vec<Verb> {
        vec![
            Verb::MoveTo(x, y),
            Verb::LineTo(x, y + h),
            Verb::LineTo(x + w, y + h),
            Verb::LineTo(x + w, y),
            Verb::Close,
        ]
    }

    #[test]
    fn test_fill_without_fringe_copies_points() {
        let mut cache = PathCache::default();
        cache.flatten(&rect_verbs(0.0, 0.0, 10.0, 10.0), 0.25, 0.01);
        cache.expand_fill(0.0, LineJoin::Miter, 2.4);

        let fill = cache.paths[0].fill.clone();
        assert_eq!(fill.len(), 4);
        assert_eq!(cache.paths[0].stroke.len(), 0);
        let v = cache.vertices[fill.start];
        assert_eq!((v.x, v.y, v.u, v.v), (0.0, 0.0, 0.5, 1.0));
    }

    #[test]
    fn test_fill_with_fringe_emits_looped_strip() {
        let mut cache = PathCache::default();
        cache.flatten(&rect_verbs(0.0, 0.0, 10.0, 10.0), 0.25, 0.01);
        cache.expand_fill(1.0, LineJoin::Miter, 2.4);

        let stroke = cache.paths[0].stroke.clone();
        assert!(stroke.len() >= 10);
        // Last pair repeats the first pair positions
        let first = cache.vertices[stroke.start];
        let second = cache.vertices[stroke.start + 1];
        let last = &cache.vertices[stroke.end - 2..stroke.end];
        assert_eq!((last[0].x, last[0].y), (first.x, first.y));
        assert_eq!((last[1].x, last[1].y), (second.x, second.y));
    }

    #[test]
    fn test_convex_fringe_inner_row_on_shell() {
        let mut cache = PathCache::default();
        cache.flatten(&rect_verbs(0.0, 0.0, 10.0, 10.0), 0.25, 0.01);
        cache.expand_fill(1.0, LineJoin::Miter, 2.4);
        assert!(cache.paths[0].convex);

        // Convex single path keeps lu at the shell midpoint
        let stroke = cache.paths[0].stroke.clone();
        let inner = cache.vertices[stroke.start];
        assert_eq!(inner.u, 0.5);
    }

    #[test]
    fn test_shell_inset_by_half_fringe() {
        let mut cache = PathCache::default();
        cache.flatten(&rect_verbs(0.0, 0.0, 10.0, 10.0), 0.25, 0.01);
        cache.expand_fill(1.0, LineJoin::Miter, 2.4);

        // Corner (0,0) with dm pointing inward: shell vertex moves to
        // (0.5, 0.5) with miter scale 1/|dm|^2 applied in calculate_joins
        let fill = cache.paths[0].fill.clone();
        let v = cache.vertices[fill.start];
        assert!((v.x - 0.5).abs() < 1e-4, "x = {}", v.x);
        assert!((v.y - 0.5).abs() < 1e-4, "y = {}", v.y);
    }
}
