//! Stroke expansion
//!
//! Turns annotated sub-path points into a triangle-strip stroke ribbon:
//! butt/square/round caps on open paths, miter/bevel/round joins at
//! corners, and a ring looped onto its own first two vertices for closed
//! paths. The `u` texture coordinate carries the edge AA gradient; `v`
//! separates cap rows from body rows.

use std::f32::consts::PI;

use sumi_core::{LineCap, LineJoin, Vertex};

use crate::cache::{normalize, reserve_geometric, CachePoint, PathCache};

/// Subdivisions for a half-circle of radius `r` at tolerance `tol`
pub(crate) fn curve_divs(r: f32, arc: f32, tol: f32) -> usize {
    let da = (r / (r + tol)).acos() * 2.0;
    ((arc / da).ceil() as usize).max(2)
}

fn vset(verts: &mut Vec<Vertex>, x: f32, y: f32, u: f32, v: f32) {
    verts.push(Vertex::new(x, y, u, v));
}

/// Bevel edge endpoints: the two offset points flanking the corner when an
/// inner bevel is needed, else the miter point twice
fn choose_bevel(
    inner_bevel: bool,
    p0: &CachePoint,
    p1: &CachePoint,
    w: f32,
) -> (f32, f32, f32, f32) {
    if inner_bevel {
        (
            p1.x + p0.dy * w,
            p1.y - p0.dx * w,
            p1.x + p1.dy * w,
            p1.y - p1.dx * w,
        )
    } else {
        (
            p1.x + p1.dmx * w,
            p1.y + p1.dmy * w,
            p1.x + p1.dmx * w,
            p1.y + p1.dmy * w,
        )
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn bevel_join(
    verts: &mut Vec<Vertex>,
    p0: &CachePoint,
    p1: &CachePoint,
    lw: f32,
    rw: f32,
    lu: f32,
    ru: f32,
) {
    let dlx0 = p0.dy;
    let dly0 = -p0.dx;
    let dlx1 = p1.dy;
    let dly1 = -p1.dx;

    if p1.flags.left {
        let (lx0, ly0, lx1, ly1) = choose_bevel(p1.flags.inner_bevel, p0, p1, lw);

        vset(verts, lx0, ly0, lu, 1.0);
        vset(verts, p1.x - dlx0 * rw, p1.y - dly0 * rw, ru, 1.0);

        if p1.flags.bevel {
            vset(verts, lx0, ly0, lu, 1.0);
            vset(verts, p1.x - dlx0 * rw, p1.y - dly0 * rw, ru, 1.0);
            vset(verts, lx1, ly1, lu, 1.0);
            vset(verts, p1.x - dlx1 * rw, p1.y - dly1 * rw, ru, 1.0);
        } else {
            let rx0 = p1.x - p1.dmx * rw;
            let ry0 = p1.y - p1.dmy * rw;

            vset(verts, p1.x, p1.y, 0.5, 1.0);
            vset(verts, p1.x - dlx0 * rw, p1.y - dly0 * rw, ru, 1.0);

            vset(verts, rx0, ry0, ru, 1.0);
            vset(verts, rx0, ry0, ru, 1.0);

            vset(verts, p1.x, p1.y, 0.5, 1.0);
            vset(verts, p1.x - dlx1 * rw, p1.y - dly1 * rw, ru, 1.0);
        }

        vset(verts, lx1, ly1, lu, 1.0);
        vset(verts, p1.x - dlx1 * rw, p1.y - dly1 * rw, ru, 1.0);
    } else {
        let (rx0, ry0, rx1, ry1) = choose_bevel(p1.flags.inner_bevel, p0, p1, -rw);

        vset(verts, p1.x + dlx0 * lw, p1.y + dly0 * lw, lu, 1.0);
        vset(verts, rx0, ry0, ru, 1.0);

        if p1.flags.bevel {
            vset(verts, p1.x + dlx0 * lw, p1.y + dly0 * lw, lu, 1.0);
            vset(verts, rx0, ry0, ru, 1.0);
            vset(verts, p1.x + dlx1 * lw, p1.y + dly1 * lw, lu, 1.0);
            vset(verts, rx1, ry1, ru, 1.0);
        } else {
            let lx0 = p1.x + p1.dmx * lw;
            let ly0 = p1.y + p1.dmy * lw;

            vset(verts, p1.x + dlx0 * lw, p1.y + dly0 * lw, lu, 1.0);
            vset(verts, p1.x, p1.y, 0.5, 1.0);

            vset(verts, lx0, ly0, lu, 1.0);
            vset(verts, lx0, ly0, lu, 1.0);

            vset(verts, p1.x, p1.y, 0.5, 1.0);
            vset(verts, p1.x + dlx1 * lw, p1.y + dly1 * lw, lu, 1.0);
        }

        vset(verts, p1.x + dlx1 * lw, p1.y + dly1 * lw, lu, 1.0);
        vset(verts, rx1, ry1, ru, 1.0);
    }
}

#[allow(clippy::too_many_arguments)]
fn round_join(
    verts: &mut Vec<Vertex>,
    p0: &CachePoint,
    p1: &CachePoint,
    lw: f32,
    rw: f32,
    lu: f32,
    ru: f32,
    ncap: usize,
) {
    let dlx0 = p0.dy;
    let dly0 = -p0.dx;
    let dlx1 = p1.dy;
    let dly1 = -p1.dx;

    if p1.flags.left {
        let (lx0, ly0, lx1, ly1) = choose_bevel(p1.flags.inner_bevel, p0, p1, lw);
        let a0 = (-dly0).atan2(-dlx0);
        let mut a1 = (-dly1).atan2(-dlx1);
        if a1 > a0 {
            a1 -= PI * 2.0;
        }

        vset(verts, lx0, ly0, lu, 1.0);
        vset(verts, p1.x - dlx0 * rw, p1.y - dly0 * rw, ru, 1.0);

        let n = (((a0 - a1) / PI * ncap as f32).ceil() as usize).clamp(2, ncap);
        for i in 0..n {
            let u = i as f32 / (n - 1) as f32;
            let a = a0 + u * (a1 - a0);
            let rx = p1.x + a.cos() * rw;
            let ry = p1.y + a.sin() * rw;
            vset(verts, p1.x, p1.y, 0.5, 1.0);
            vset(verts, rx, ry, ru, 1.0);
        }

        vset(verts, lx1, ly1, lu, 1.0);
        vset(verts, p1.x - dlx1 * rw, p1.y - dly1 * rw, ru, 1.0);
    } else {
        let (rx0, ry0, rx1, ry1) = choose_bevel(p1.flags.inner_bevel, p0, p1, -rw);
        let a0 = dly0.atan2(dlx0);
        let mut a1 = dly1.atan2(dlx1);
        if a1 < a0 {
            a1 += PI * 2.0;
        }

        vset(verts, p1.x + dlx0 * lw, p1.y + dly0 * lw, lu, 1.0);
        vset(verts, rx0, ry0, ru, 1.0);

        let n = (((a1 - a0) / PI * ncap as f32).ceil() as usize).clamp(2, ncap);
        for i in 0..n {
            let u = i as f32 / (n - 1) as f32;
            let a = a0 + u * (a1 - a0);
            let lx = p1.x + a.cos() * lw;
            let ly = p1.y + a.sin() * lw;
            vset(verts, lx, ly, lu, 1.0);
            vset(verts, p1.x, p1.y, 0.5, 1.0);
        }

        vset(verts, p1.x + dlx1 * lw, p1.y + dly1 * lw, lu, 1.0);
        vset(verts, rx1, ry1, ru, 1.0);
    }
}

#[allow(clippy::too_many_arguments)]
fn butt_cap_start(
    verts: &mut Vec<Vertex>,
    p: &CachePoint,
    dx: f32,
    dy: f32,
    w: f32,
    d: f32,
    aa: f32,
    u0: f32,
    u1: f32,
) {
    let px = p.x - dx * d;
    let py = p.y - dy * d;
    let dlx = dy;
    let dly = -dx;
    vset(verts, px + dlx * w - dx * aa, py + dly * w - dy * aa, u0, 0.0);
    vset(verts, px - dlx * w - dx * aa, py - dly * w - dy * aa, u1, 0.0);
    vset(verts, px + dlx * w, py + dly * w, u0, 1.0);
    vset(verts, px - dlx * w, py - dly * w, u1, 1.0);
}

#[allow(clippy::too_many_arguments)]
fn butt_cap_end(
    verts: &mut Vec<Vertex>,
    p: &CachePoint,
    dx: f32,
    dy: f32,
    w: f32,
    d: f32,
    aa: f32,
    u0: f32,
    u1: f32,
) {
    let px = p.x + dx * d;
    let py = p.y + dy * d;
    let dlx = dy;
    let dly = -dx;
    vset(verts, px + dlx * w, py + dly * w, u0, 1.0);
    vset(verts, px - dlx * w, py - dly * w, u1, 1.0);
    vset(verts, px + dlx * w + dx * aa, py + dly * w + dy * aa, u0, 0.0);
    vset(verts, px - dlx * w + dx * aa, py - dly * w + dy * aa, u1, 0.0);
}

#[allow(clippy::too_many_arguments)]
fn round_cap_start(
    verts: &mut Vec<Vertex>,
    p: &CachePoint,
    dx: f32,
    dy: f32,
    w: f32,
    ncap: usize,
    u0: f32,
    u1: f32,
) {
    let px = p.x;
    let py = p.y;
    let dlx = dy;
    let dly = -dx;
    for i in 0..ncap {
        let a = i as f32 / (ncap - 1) as f32 * PI;
        let ax = a.cos() * w;
        let ay = a.sin() * w;
        vset(verts, px - dlx * ax - dx * ay, py - dly * ax - dy * ay, u0, 1.0);
        vset(verts, px, py, 0.5, 1.0);
    }
    vset(verts, px + dlx * w, py + dly * w, u0, 1.0);
    vset(verts, px - dlx * w, py - dly * w, u1, 1.0);
}

#[allow(clippy::too_many_arguments)]
fn round_cap_end(
    verts: &mut Vec<Vertex>,
    p: &CachePoint,
    dx: f32,
    dy: f32,
    w: f32,
    ncap: usize,
    u0: f32,
    u1: f32,
) {
    let px = p.x;
    let py = p.y;
    let dlx = dy;
    let dly = -dx;
    vset(verts, px + dlx * w, py + dly * w, u0, 1.0);
    vset(verts, px - dlx * w, py - dly * w, u1, 1.0);
    for i in 0..ncap {
        let a = i as f32 / (ncap - 1) as f32 * PI;
        let ax = a.cos() * w;
        let ay = a.sin() * w;
        vset(verts, px, py, 0.5, 1.0);
        vset(verts, px + dlx * ax - dx * ay, py + dly * ax - dy * ay, u0, 1.0);
    }
}

impl PathCache {
    /// Expand every sub-path into a stroke ribbon of half-width `w`.
    /// `fringe` is the AA fringe width; zero disables the edge gradient by
    /// collapsing the u range to its midpoint.
    pub fn expand_stroke(
        &mut self,
        w: f32,
        fringe: f32,
        line_cap: LineCap,
        line_join: LineJoin,
        miter_limit: f32,
        tess_tol: f32,
    ) {
        let aa = fringe;
        let ncap = curve_divs(w, PI, tess_tol);
        let w = w + aa * 0.5;

        let (u0, u1) = if aa == 0.0 { (0.5, 0.5) } else { (0.0, 1.0) };

        self.vertices.clear();
        self.calculate_joins(w, line_join, miter_limit);

        // Worst-case vertex count, so each sub-path expands without
        // reallocating mid-emission
        let mut cverts = 0;
        for path in &self.paths {
            if line_join == LineJoin::Round {
                cverts += (path.count + path.nbevel * (ncap + 2) + 1) * 2;
            } else {
                cverts += (path.count + path.nbevel * 5 + 1) * 2;
            }
            if !path.closed {
                if line_cap == LineCap::Round {
                    cverts += (ncap * 2 + 2) * 2;
                } else {
                    cverts += (3 + 3) * 2;
                }
            }
        }
        reserve_geometric(&mut self.vertices, cverts);

        for path_idx in 0..self.paths.len() {
            let (first, count, closed) = {
                let p = &self.paths[path_idx];
                (p.first, p.count, p.closed)
            };
            if count < 2 {
                self.paths[path_idx].fill = 0..0;
                self.paths[path_idx].stroke = 0..0;
                continue;
            }

            let start = self.vertices.len();

            let (mut p0_idx, mut p1_idx, s, e) = if closed {
                (count - 1, 0, 0, count)
            } else {
                (0, 1, 1, count - 1)
            };

            if !closed {
                let p0 = self.points[first + p0_idx];
                let p1 = self.points[first + p1_idx];
                let mut dx = p1.x - p0.x;
                let mut dy = p1.y - p0.y;
                normalize(&mut dx, &mut dy);
                match line_cap {
                    LineCap::Butt => {
                        butt_cap_start(&mut self.vertices, &p0, dx, dy, w, -aa * 0.5, aa, u0, u1)
                    }
                    LineCap::Square => {
                        butt_cap_start(&mut self.vertices, &p0, dx, dy, w, w - aa, aa, u0, u1)
                    }
                    LineCap::Round => {
                        round_cap_start(&mut self.vertices, &p0, dx, dy, w, ncap, u0, u1)
                    }
                }
            }

            for _ in s..e {
                let p0 = self.points[first + p0_idx];
                let p1 = self.points[first + p1_idx];

                if p1.flags.bevel || p1.flags.inner_bevel {
                    if line_join == LineJoin::Round {
                        round_join(&mut self.vertices, &p0, &p1, w, w, u0, u1, ncap);
                    } else {
                        bevel_join(&mut self.vertices, &p0, &p1, w, w, u0, u1);
                    }
                } else {
                    vset(
                        &mut self.vertices,
                        p1.x + p1.dmx * w,
                        p1.y + p1.dmy * w,
                        u0,
                        1.0,
                    );
                    vset(
                        &mut self.vertices,
                        p1.x - p1.dmx * w,
                        p1.y - p1.dmy * w,
                        u1,
                        1.0,
                    );
                }

                p0_idx = p1_idx;
                p1_idx += 1;
            }

            if closed {
                // Loop the ring onto its own first two vertices
                let v0 = self.vertices[start];
                let v1 = self.vertices[start + 1];
                vset(&mut self.vertices, v0.x, v0.y, u0, 1.0);
                vset(&mut self.vertices, v1.x, v1.y, u1, 1.0);
            } else {
                let p0 = self.points[first + p0_idx];
                let p1 = self.points[first + p1_idx];
                let mut dx = p1.x - p0.x;
                let mut dy = p1.y - p0.y;
                normalize(&mut dx, &mut dy);
                match line_cap {
                    LineCap::Butt => {
                        butt_cap_end(&mut self.vertices, &p1, dx, dy, w, -aa * 0.5, aa, u0, u1)
                    }
                    LineCap::Square => {
                        butt_cap_end(&mut self.vertices, &p1, dx, dy, w, w - aa, aa, u0, u1)
                    }
                    LineCap::Round => {
                        round_cap_end(&mut self.vertices, &p1, dx, dy, w, ncap, u0, u1)
                    }
                }
            }

            self.paths[path_idx].fill = 0..0;
            self.paths[path_idx].stroke = start..self.vertices.len();
        }
    }
}
