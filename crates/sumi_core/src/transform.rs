//! 2D affine transforms
//!
//! Column layout follows the usual 2x3 convention:
//!
//! ```text
//!   [a c e]
//!   [b d f]
//!   [0 0 1]
//! ```

/// 2D affine transform
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C)]
pub struct Transform2D {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform2D {
    pub const fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    pub const fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn translation(x: f32, y: f32) -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: x,
            f: y,
        }
    }

    pub fn scaling(sx: f32, sy: f32) -> Self {
        Self {
            a: sx,
            b: 0.0,
            c: 0.0,
            d: sy,
            e: 0.0,
            f: 0.0,
        }
    }

    pub fn rotation(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: 0.0,
            f: 0.0,
        }
    }

    pub fn skew_x(angle: f32) -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: angle.tan(),
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    pub fn skew_y(angle: f32) -> Self {
        Self {
            a: 1.0,
            b: angle.tan(),
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    /// Compose on the right: `self = self * other`
    pub fn multiply(&mut self, other: &Transform2D) {
        let a = self.a * other.a + self.b * other.c;
        let c = self.c * other.a + self.d * other.c;
        let e = self.e * other.a + self.f * other.c + other.e;
        self.b = self.a * other.b + self.b * other.d;
        self.d = self.c * other.b + self.d * other.d;
        self.f = self.e * other.b + self.f * other.d + other.f;
        self.a = a;
        self.c = c;
        self.e = e;
    }

    /// Compose on the left: `self = other * self`
    pub fn premultiply(&mut self, other: &Transform2D) {
        let mut lhs = *other;
        lhs.multiply(self);
        *self = lhs;
    }

    /// Inverse transform, or `None` when the determinant is within 1e-6 of
    /// zero. Callers are expected to fall back to an untransformed value.
    pub fn inverse(&self) -> Option<Transform2D> {
        let det = self.a as f64 * self.d as f64 - self.c as f64 * self.b as f64;
        if det > -1e-6 && det < 1e-6 {
            tracing::debug!(det, "transform not invertible");
            return None;
        }
        let invdet = 1.0 / det;
        Some(Transform2D {
            a: (self.d as f64 * invdet) as f32,
            b: (-self.b as f64 * invdet) as f32,
            c: (-self.c as f64 * invdet) as f32,
            d: (self.a as f64 * invdet) as f32,
            e: ((self.c as f64 * self.f as f64 - self.d as f64 * self.e as f64) * invdet) as f32,
            f: ((self.b as f64 * self.e as f64 - self.a as f64 * self.f as f64) * invdet) as f32,
        })
    }

    /// Transform a point
    pub fn transform_point(&self, x: f32, y: f32) -> (f32, f32) {
        (
            x * self.a + y * self.c + self.e,
            x * self.b + y * self.d + self.f,
        )
    }

    /// Average of the x and y axis scale factors
    pub fn average_scale(&self) -> f32 {
        let sx = (self.a * self.a + self.c * self.c).sqrt();
        let sy = (self.b * self.b + self.d * self.d).sqrt();
        (sx + sy) * 0.5
    }

    /// Expand into the 3x4 column-padded layout shader uniforms use
    pub fn to_mat3x4(&self) -> [f32; 12] {
        [
            self.a, self.b, 0.0, 0.0, self.c, self.d, 0.0, 0.0, self.e, self.f, 1.0, 0.0,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiply_applies_right_operand_last() {
        // Scale then translate: point (1, 0) -> (2, 0) -> (12, 5)
        let mut t = Transform2D::scaling(2.0, 2.0);
        t.multiply(&Transform2D::translation(10.0, 5.0));
        let (x, y) = t.transform_point(1.0, 0.0);
        assert!((x - 12.0).abs() < 1e-6);
        assert!((y - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_premultiply_applies_left_operand_last() {
        // Premultiplying the translation applies it before the scale
        let mut t = Transform2D::scaling(2.0, 2.0);
        t.premultiply(&Transform2D::translation(10.0, 5.0));
        let (x, y) = t.transform_point(1.0, 0.0);
        assert!((x - 22.0).abs() < 1e-6);
        assert!((y - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_inverse_roundtrip() {
        let mut t = Transform2D::rotation(0.7);
        t.multiply(&Transform2D::translation(3.0, -2.0));
        let inv = t.inverse().unwrap();
        let (x, y) = t.transform_point(5.0, 7.0);
        let (rx, ry) = inv.transform_point(x, y);
        assert!((rx - 5.0).abs() < 1e-4);
        assert!((ry - 7.0).abs() < 1e-4);
    }

    #[test]
    fn test_inverse_singular_is_none() {
        let t = Transform2D::scaling(0.0, 1.0);
        assert!(t.inverse().is_none());
    }

    #[test]
    fn test_average_scale() {
        let t = Transform2D::scaling(2.0, 4.0);
        assert!((t.average_scale() - 3.0).abs() < 1e-6);
    }
}
