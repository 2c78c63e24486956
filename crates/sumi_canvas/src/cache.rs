//! Per-path flattening cache
//!
//! `PathCache` interprets the recorded verb stream into sub-path point
//! lists, recursively subdividing beziers to the flatness tolerance, and
//! annotates every point with tangent, segment length, and join
//! classification. The point, sub-path, and vertex arrays are reused across
//! paths: cleared logically at `begin_path`, capacity retained, grown 1.5x
//! on overflow, so memory is monotonic within a session.

use std::ops::Range;

use sumi_core::{Bounds, LineJoin, Vertex, Winding};

use crate::path::Verb;

/// Recursion limit for bezier subdivision
const MAX_BEZIER_LEVEL: usize = 10;

/// Clamp on the miter-direction gain, against near-degenerate spikes
const MAX_MITER_SCALE: f32 = 600.0;

/// Grow `buf` so it can hold `additional` more items, enlarging capacity by
/// 1.5x steps rather than whatever the allocator would pick.
pub(crate) fn reserve_geometric<T>(buf: &mut Vec<T>, additional: usize) {
    let needed = buf.len() + additional;
    if needed > buf.capacity() {
        let grown = buf.capacity() + buf.capacity() / 2;
        buf.reserve_exact(grown.max(needed) - buf.len());
    }
}

pub(crate) fn pt_equals(x1: f32, y1: f32, x2: f32, y2: f32, tol: f32) -> bool {
    let dx = x2 - x1;
    let dy = y2 - y1;
    dx * dx + dy * dy < tol * tol
}

/// Normalize in place, returning the original length. Vectors shorter than
/// 1e-6 are left as-is.
pub(crate) fn normalize(x: &mut f32, y: &mut f32) -> f32 {
    let d = (*x * *x + *y * *y).sqrt();
    if d > 1e-6 {
        let id = 1.0 / d;
        *x *= id;
        *y *= id;
    }
    d
}

/// Squared distance from (x, y) to the segment (px, py)-(qx, qy)
pub(crate) fn dist_pt_seg(x: f32, y: f32, px: f32, py: f32, qx: f32, qy: f32) -> f32 {
    let pqx = qx - px;
    let pqy = qy - py;
    let mut dx = x - px;
    let mut dy = y - py;
    let d = pqx * pqx + pqy * pqy;
    let mut t = pqx * dx + pqy * dy;
    if d > 0.0 {
        t /= d;
    }
    let t = t.clamp(0.0, 1.0);
    dx = px + t * pqx - x;
    dy = py + t * pqy - y;
    dx * dx + dy * dy
}

fn triarea2(ax: f32, ay: f32, bx: f32, by: f32, cx: f32, cy: f32) -> f32 {
    let abx = bx - ax;
    let aby = by - ay;
    let acx = cx - ax;
    let acy = cy - ay;
    acx * aby - abx * acy
}

fn poly_area(points: &[CachePoint]) -> f32 {
    let mut area = 0.0;
    for i in 2..points.len() {
        let a = &points[0];
        let b = &points[i - 1];
        let c = &points[i];
        area += triarea2(a.x, a.y, b.x, b.y, c.x, c.y);
    }
    area * 0.5
}

/// Join classification per point
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct PointFlags {
    /// Sharp vertex from the command stream (as opposed to a flattened
    /// curve sample)
    pub corner: bool,
    /// Turn direction relative to the previous edge
    pub left: bool,
    /// Outer side needs a bevel (miter-limit violation or requested join)
    pub bevel: bool,
    /// Miter would overshoot the shorter adjacent edge
    pub inner_bevel: bool,
}

/// One flattened path point with its edge annotations
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct CachePoint {
    pub x: f32,
    pub y: f32,
    /// Unit tangent towards the next point
    pub dx: f32,
    pub dy: f32,
    /// Length of the segment to the next point
    pub len: f32,
    /// Averaged miter direction, pre-scaled by 1/|m|^2
    pub dmx: f32,
    pub dmy: f32,
    pub flags: PointFlags,
}

/// One flattened sub-path addressing ranges of the shared point and vertex
/// arrays
#[derive(Clone, Debug)]
pub(crate) struct SubPath {
    pub first: usize,
    pub count: usize,
    pub closed: bool,
    pub nbevel: usize,
    pub winding: Winding,
    pub convex: bool,
    /// Fill shell vertices, set by the fill expander
    pub fill: Range<usize>,
    /// Fringe/stroke vertices, set by either expander
    pub stroke: Range<usize>,
}

impl SubPath {
    fn new(first: usize) -> Self {
        Self {
            first,
            count: 0,
            closed: false,
            nbevel: 0,
            winding: Winding::Ccw,
            convex: false,
            fill: 0..0,
            stroke: 0..0,
        }
    }
}

/// The ephemeral per-path state rebuilt on every `begin_path`
#[derive(Debug, Default)]
pub(crate) struct PathCache {
    pub points: Vec<CachePoint>,
    pub paths: Vec<SubPath>,
    pub vertices: Vec<Vertex>,
    pub bounds: Bounds,
}

impl PathCache {
    /// Logical reset: lengths to zero, capacity retained
    pub fn clear(&mut self) {
        self.points.clear();
        self.paths.clear();
        self.vertices.clear();
        self.bounds = Bounds::EMPTY;
    }

    fn add_path(&mut self) {
        let first = self.points.len();
        self.paths.push(SubPath::new(first));
    }

    fn add_point(&mut self, x: f32, y: f32, corner: bool, dist_tol: f32) {
        let Some(path) = self.paths.last_mut() else {
            return;
        };

        // Merge with the previous point when within tolerance
        if path.count > 0 {
            if let Some(last) = self.points.last_mut() {
                if pt_equals(last.x, last.y, x, y, dist_tol) {
                    last.flags.corner |= corner;
                    return;
                }
            }
        }

        reserve_geometric(&mut self.points, 1);
        self.points.push(CachePoint {
            x,
            y,
            flags: PointFlags {
                corner,
                ..PointFlags::default()
            },
            ..CachePoint::default()
        });
        path.count += 1;
    }

    fn close_path(&mut self) {
        if let Some(path) = self.paths.last_mut() {
            path.closed = true;
        }
    }

    fn path_winding(&mut self, winding: Winding) {
        if let Some(path) = self.paths.last_mut() {
            path.winding = winding;
        }
    }

    fn last_point(&self) -> Option<(f32, f32)> {
        let path = self.paths.last()?;
        if path.count == 0 {
            return None;
        }
        self.points.last().map(|p| (p.x, p.y))
    }

    /// Adaptive subdivision: stop when the control points' deviation from
    /// the chord satisfies the flatness metric, or at the recursion limit.
    /// Emission is depth-first so point order follows the curve.
    #[allow(clippy::too_many_arguments)]
    fn tesselate_bezier(
        &mut self,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        x3: f32,
        y3: f32,
        x4: f32,
        y4: f32,
        level: usize,
        corner: bool,
        tess_tol: f32,
        dist_tol: f32,
    ) {
        if level > MAX_BEZIER_LEVEL {
            return;
        }

        let dx = x4 - x1;
        let dy = y4 - y1;
        let d2 = ((x2 - x4) * dy - (y2 - y4) * dx).abs();
        let d3 = ((x3 - x4) * dy - (y3 - y4) * dx).abs();

        if (d2 + d3) * (d2 + d3) < tess_tol * (dx * dx + dy * dy) {
            self.add_point(x4, y4, corner, dist_tol);
            return;
        }

        let x12 = (x1 + x2) * 0.5;
        let y12 = (y1 + y2) * 0.5;
        let x23 = (x2 + x3) * 0.5;
        let y23 = (y2 + y3) * 0.5;
        let x34 = (x3 + x4) * 0.5;
        let y34 = (y3 + y4) * 0.5;
        let x123 = (x12 + x23) * 0.5;
        let y123 = (y12 + y23) * 0.5;
        let x234 = (x23 + x34) * 0.5;
        let y234 = (y23 + y34) * 0.5;
        let x1234 = (x123 + x234) * 0.5;
        let y1234 = (y123 + y234) * 0.5;

        self.tesselate_bezier(
            x1, y1, x12, y12, x123, y123, x1234, y1234,
            level + 1,
            false,
            tess_tol,
            dist_tol,
        );
        self.tesselate_bezier(
            x1234, y1234, x234, y234, x34, y34, x4, y4,
            level + 1,
            corner,
            tess_tol,
            dist_tol,
        );
    }

    /// Interpret the verb stream into annotated sub-paths. Idempotent: a
    /// second call without an intervening `begin_path` is a no-op because
    /// the cache is already populated.
    pub fn flatten(&mut self, verbs: &[Verb], tess_tol: f32, dist_tol: f32) {
        if !self.paths.is_empty() {
            return;
        }

        for verb in verbs {
            match *verb {
                Verb::MoveTo(x, y) => {
                    self.add_path();
                    self.add_point(x, y, true, dist_tol);
                }
                Verb::LineTo(x, y) => {
                    self.add_point(x, y, true, dist_tol);
                }
                Verb::BezierTo(c1x, c1y, c2x, c2y, x, y) => {
                    if let Some((lx, ly)) = self.last_point() {
                        self.tesselate_bezier(
                            lx, ly, c1x, c1y, c2x, c2y, x, y, 0, true, tess_tol, dist_tol,
                        );
                    }
                }
                Verb::Close => self.close_path(),
                Verb::Winding(winding) => self.path_winding(winding),
            }
        }

        self.bounds = Bounds::EMPTY;

        for path_idx in 0..self.paths.len() {
            let (first, mut count) = {
                let p = &self.paths[path_idx];
                (p.first, p.count)
            };
            if count == 0 {
                continue;
            }

            // Merge a closing point that coincides with the start
            {
                let p0 = self.points[first + count - 1];
                let p1 = self.points[first];
                if count > 1 && pt_equals(p0.x, p0.y, p1.x, p1.y, dist_tol) {
                    count -= 1;
                    self.paths[path_idx].count = count;
                    self.paths[path_idx].closed = true;
                }
            }

            // Enforce the requested winding via the signed area
            if count > 2 {
                let pts = &mut self.points[first..first + count];
                let area = poly_area(pts);
                let winding = self.paths[path_idx].winding;
                if (winding == Winding::Ccw && area < 0.0)
                    || (winding == Winding::Cw && area > 0.0)
                {
                    pts.reverse();
                }
            }

            // Per-point tangent/length towards the next point, and bounds
            for i in 0..count {
                let next = self.points[first + (i + 1) % count];
                let cur = &mut self.points[first + i];
                cur.dx = next.x - cur.x;
                cur.dy = next.y - cur.y;
                cur.len = normalize(&mut cur.dx, &mut cur.dy);
                self.bounds.union_point(cur.x, cur.y);
            }
        }
    }

    /// Classify every corner: averaged miter direction, turn side, bevel
    /// requirements, and overall sub-path convexity.
    pub fn calculate_joins(&mut self, w: f32, line_join: LineJoin, miter_limit: f32) {
        let iw = if w > 0.0 { 1.0 / w } else { 0.0 };

        for path in &mut self.paths {
            let pts = &mut self.points[path.first..path.first + path.count];
            let count = pts.len();
            if count == 0 {
                continue;
            }

            let mut nleft = 0;
            path.nbevel = 0;

            for i in 0..count {
                let p0 = pts[(i + count - 1) % count];
                let p1 = &mut pts[i];

                let dlx0 = p0.dy;
                let dly0 = -p0.dx;
                let dlx1 = p1.dy;
                let dly1 = -p1.dx;

                // Averaged miter direction, scaled by the inverse squared
                // length and clamped against degenerate spikes
                p1.dmx = (dlx0 + dlx1) * 0.5;
                p1.dmy = (dly0 + dly1) * 0.5;
                let dmr2 = p1.dmx * p1.dmx + p1.dmy * p1.dmy;
                if dmr2 > 1e-6 {
                    let scale = (1.0 / dmr2).min(MAX_MITER_SCALE);
                    p1.dmx *= scale;
                    p1.dmy *= scale;
                }

                // Reset everything but the corner flag
                p1.flags = PointFlags {
                    corner: p1.flags.corner,
                    ..PointFlags::default()
                };

                let cross = p1.dx * p0.dy - p0.dx * p1.dy;
                if cross > 0.0 {
                    nleft += 1;
                    p1.flags.left = true;
                }

                // Inner bevel when the miter would overshoot the shorter
                // adjacent edge
                let limit = (p0.len.min(p1.len) * iw).max(1.01);
                if dmr2 * limit * limit < 1.0 {
                    p1.flags.inner_bevel = true;
                }

                if p1.flags.corner
                    && (dmr2 * miter_limit * miter_limit < 1.0
                        || line_join == LineJoin::Bevel
                        || line_join == LineJoin::Round)
                {
                    p1.flags.bevel = true;
                }

                if p1.flags.bevel || p1.flags.inner_bevel {
                    path.nbevel += 1;
                }
            }

            path.convex = nleft == count;
        }
    }
}
