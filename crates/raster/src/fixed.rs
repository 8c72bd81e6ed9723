//! Fixed-point geometry and half-space setup.
//!
//! Screen coordinates are converted to 28.4 fixed point (4 bits of
//! sub-pixel precision); per-pixel edge stepping uses 24.8 deltas so the
//! rasterizer's inner loop is additions-only. Keeping every edge test at
//! the same scale is what makes coverage exact and reproducible - a mixed
//! scale would desynchronize the corner masks from the per-pixel tests.
//!
//! The half-space function of an edge (a, b) evaluated at a 28.4 point
//! `(x, y)` is `c + dx*y - dy*x` with `dx = xa - xb`, `dy = ya - yb`;
//! it is positive strictly inside for triangles wound counterclockwise in
//! y-down screen space. The constant carries the top-left fill-convention
//! bias so that two triangles sharing an edge cover every shared pixel
//! exactly once.

/// Sub-pixel bits of the 28.4 coordinate format.
pub const FP_BITS: i32 = 4;

/// One pixel in 28.4 fixed point.
pub const FP_ONE: i32 = 1 << FP_BITS;

/// Convert a floating-point screen coordinate to 28.4 fixed point,
/// rounding to the nearest sub-pixel step.
#[inline]
pub fn to_fixed(v: f32) -> i32 {
    (v * FP_ONE as f32).round() as i32
}

/// Ceiling of a 28.4 coordinate to a whole pixel.
///
/// The first pixel a triangle can cover is the one at or strictly right of
/// its leftmost edge, hence ceil rather than floor; ownership of pixels
/// exactly on an edge is decided by the fill-convention bias, not here.
#[inline]
pub fn ceil_to_pixel(v: i32) -> i32 {
    (v + (FP_ONE - 1)) >> FP_BITS
}

/// One edge's half-space function.
#[derive(Debug, Clone, Copy)]
pub struct EdgeFn {
    /// Delta along x in 28.4 (start minus end).
    pub dx: i32,
    /// Delta along y in 28.4 (start minus end).
    pub dy: i32,
    /// Delta along x in 24.8: change of the edge value per one-pixel step in y.
    pub fdx: i32,
    /// Delta along y in 24.8: change of the edge value per one-pixel step in x
    /// (subtracted).
    pub fdy: i32,
    /// Half-space constant, including the fill-convention bias.
    pub c: i32,
}

impl EdgeFn {
    /// Build the half-space function for the directed edge `(xa, ya) -> (xb, yb)`
    /// (28.4 endpoints).
    fn new(xa: i32, ya: i32, xb: i32, yb: i32) -> Self {
        let dx = xa - xb;
        let dy = ya - yb;
        let mut c = dy * xa - dx * ya;

        // Top-left fill convention: edges that do not own their pixels get
        // the on-edge value nudged to positive, so a pixel exactly on a
        // shared edge is rasterized by exactly one of the two triangles.
        if dy < 0 || (dy == 0 && dx > 0) {
            c += 1;
        }

        Self {
            dx,
            dy,
            fdx: dx << FP_BITS,
            fdy: dy << FP_BITS,
            c,
        }
    }

    /// Evaluate the edge value at a 28.4 point. Positive means inside.
    #[inline]
    pub fn eval(&self, fx: i32, fy: i32) -> i32 {
        self.c + self.dx * fy - self.dy * fx
    }
}

/// Half-space functions and pixel bounding rectangle of one triangle.
#[derive(Debug, Clone, Copy)]
pub struct HalfSpaces {
    pub e12: EdgeFn,
    pub e23: EdgeFn,
    pub e31: EdgeFn,
    /// Bounding rectangle in whole pixels, ceil convention; max is exclusive
    /// after clamping by the caller.
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

/// Set up the three half-space functions for a screen triangle given in
/// 28.4 fixed point.
///
/// Vertices must be in counterclockwise order in y-down screen space
/// (negative `Δx21·Δy31 − Δx31·Δy21`); the pipeline canonicalizes winding
/// before calling. Returns `None` when the triangle is degenerate at
/// fixed-point precision - including slivers whose area rounds away -
/// in which case nothing must be rasterized.
pub fn setup(p1: (i32, i32), p2: (i32, i32), p3: (i32, i32)) -> Option<HalfSpaces> {
    // Signed parallelogram area in fixed point, widened to avoid overflow.
    let cross = (p2.0 - p1.0) as i64 * (p3.1 - p1.1) as i64
        - (p3.0 - p1.0) as i64 * (p2.1 - p1.1) as i64;
    if cross >= 0 {
        // Zero: collinear after rounding. Positive: the float-space winding
        // check and the rounded coordinates disagree, which only happens for
        // sub-pixel slivers; they produce no coverage either way.
        return None;
    }

    let min_x = ceil_to_pixel(p1.0.min(p2.0).min(p3.0));
    let max_x = ceil_to_pixel(p1.0.max(p2.0).max(p3.0));
    let min_y = ceil_to_pixel(p1.1.min(p2.1).min(p3.1));
    let max_y = ceil_to_pixel(p1.1.max(p2.1).max(p3.1));

    Some(HalfSpaces {
        e12: EdgeFn::new(p1.0, p1.1, p2.0, p2.1),
        e23: EdgeFn::new(p2.0, p2.1, p3.0, p3.1),
        e31: EdgeFn::new(p3.0, p3.1, p1.0, p1.1),
        min_x,
        min_y,
        max_x,
        max_y,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_fixed_rounds_to_nearest() {
        assert_eq!(to_fixed(0.0), 0);
        assert_eq!(to_fixed(1.0), 16);
        assert_eq!(to_fixed(1.5), 24);
        assert_eq!(to_fixed(0.03), 0); // 0.48 sub-pixel steps rounds down
        assert_eq!(to_fixed(0.04), 1); // 0.64 rounds up
        assert_eq!(to_fixed(-1.0), -16);
    }

    #[test]
    fn test_ceil_to_pixel() {
        assert_eq!(ceil_to_pixel(0), 0);
        assert_eq!(ceil_to_pixel(1), 1);
        assert_eq!(ceil_to_pixel(16), 1);
        assert_eq!(ceil_to_pixel(17), 2);
        assert_eq!(ceil_to_pixel(31), 2);
        assert_eq!(ceil_to_pixel(32), 2);
    }

    #[test]
    fn test_setup_rejects_degenerate() {
        // Collinear points
        assert!(setup((0, 0), (16, 16), (32, 32)).is_none());
        // Repeated points
        assert!(setup((0, 0), (0, 0), (32, 16)).is_none());
        // Clockwise winding is not accepted
        assert!(setup((0, 0), (64, 0), (0, 64)).is_none());
    }

    #[test]
    fn test_interior_point_is_inside_all_edges() {
        // Counterclockwise (y-down) right triangle over pixels [0,4)x[0,4)
        let hs = setup((0, 0), (0, 64), (64, 0)).expect("valid triangle");

        // Pixel (1, 1)
        let (fx, fy) = (16, 16);
        assert!(hs.e12.eval(fx, fy) > 0);
        assert!(hs.e23.eval(fx, fy) > 0);
        assert!(hs.e31.eval(fx, fy) > 0);

        // Pixel (5, 5) is outside the hypotenuse
        assert!(hs.e23.eval(80, 80) <= 0);
    }

    #[test]
    fn test_bounding_rect_uses_ceil() {
        let hs = setup((0, 0), (0, 64), (64, 0)).unwrap();
        assert_eq!((hs.min_x, hs.min_y), (0, 0));
        assert_eq!((hs.max_x, hs.max_y), (4, 4));

        // Sub-pixel vertex positions: bbox snaps up
        let hs = setup((1, 1), (1, 65), (65, 1)).unwrap();
        assert_eq!((hs.min_x, hs.min_y), (1, 1));
        assert_eq!((hs.max_x, hs.max_y), (5, 5));
    }

    #[test]
    fn test_fill_convention_bias() {
        // Left edge of the CCW unit-square triangle: points down (dy < 0),
        // so the bias makes on-edge pixels pass.
        let hs = setup((0, 0), (0, 64), (64, 0)).unwrap();
        // Pixel (0, 1) lies exactly on the edge from (0,0) to (0,4)
        assert!(hs.e12.eval(0, 16) > 0);

        // The hypotenuse does not own its pixels: (2, 2) lies exactly on it
        assert!(hs.e23.eval(32, 32) <= 0);
    }

    #[test]
    fn test_edge_incremental_deltas_match_eval() {
        let hs = setup((5, 3), (9, 70), (61, 10)).expect("valid triangle");
        for e in [hs.e12, hs.e23, hs.e31] {
            let base = e.eval(32, 48);
            // One pixel step in x subtracts fdy
            assert_eq!(e.eval(32 + FP_ONE, 48), base - e.fdy);
            // One pixel step in y adds fdx
            assert_eq!(e.eval(32, 48 + FP_ONE), base + e.fdx);
        }
    }
}
