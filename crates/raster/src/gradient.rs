//! Screen-space attribute gradients.
//!
//! Every interpolated quantity - depth, inverse W, and each varying
//! (pre-divided by W) - is a plane over screen space. Given the
//! barycentric denominator `c = Δx21·Δy31 − Δx31·Δy21` (twice the signed
//! screen area) and the attribute differences at vertices 2 and 3 relative
//! to vertex 1, the gradient is:
//!
//! ```text
//! ∂a/∂x = (d21·Δy31 − d31·Δy21) / c
//! ∂a/∂y = (Δx21·d31 − Δx31·d21) / c
//! ```
//!
//! The solver is shared by all attributes of a triangle through
//! [`AttributeBasis`], which caches the per-triangle terms.

/// A linear function over screen space: `value(x, y) = base + dx·x + dy·y`.
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    base: f32,
    dx: f32,
    dy: f32,
}

impl Plane {
    /// Evaluate the plane at a screen position.
    #[inline]
    pub fn at(&self, x: f32, y: f32) -> f32 {
        self.base + self.dx * x + self.dy * y
    }

    /// Screen-space gradient, mostly for tests.
    pub fn gradient(&self) -> (f32, f32) {
        (self.dx, self.dy)
    }
}

/// Per-triangle terms shared by every attribute's gradient.
#[derive(Debug, Clone, Copy)]
pub struct AttributeBasis {
    x1: f32,
    y1: f32,
    dx21: f32,
    dx31: f32,
    dy21: f32,
    dy31: f32,
    inv_c: f32,
}

impl AttributeBasis {
    /// Build the basis from the three screen positions.
    ///
    /// Returns `None` when the barycentric denominator is zero - the same
    /// degenerate triangles the fixed-point setup rejects, checked again
    /// here because the float and fixed tests can disagree on slivers.
    pub fn new(p1: (f32, f32), p2: (f32, f32), p3: (f32, f32)) -> Option<Self> {
        let dx21 = p2.0 - p1.0;
        let dx31 = p3.0 - p1.0;
        let dy21 = p2.1 - p1.1;
        let dy31 = p3.1 - p1.1;
        let c = dx21 * dy31 - dx31 * dy21;
        if c == 0.0 || !c.is_finite() {
            return None;
        }
        Some(Self {
            x1: p1.0,
            y1: p1.1,
            dx21,
            dx31,
            dy21,
            dy31,
            inv_c: 1.0 / c,
        })
    }

    /// Build the interpolation plane for one attribute from its values at
    /// the three vertices.
    pub fn plane(&self, v1: f32, v2: f32, v3: f32) -> Plane {
        let d21 = v2 - v1;
        let d31 = v3 - v1;
        let dx = (d21 * self.dy31 - d31 * self.dy21) * self.inv_c;
        let dy = (self.dx21 * d31 - self.dx31 * d21) * self.inv_c;
        Plane {
            base: v1 - dx * self.x1 - dy * self.y1,
            dx,
            dy,
        }
    }
}
