//! Block-based half-space triangle rasterizer.
//!
//! The triangle's (viewport-clamped) bounding rectangle is snapped outward
//! to 4x4 pixel blocks. For every block the three half-space functions are
//! evaluated at the four corners, giving a 4-bit mask per edge:
//!
//! - **Trivial reject**: some edge has all four corners outside - the block
//!   cannot intersect the triangle and is skipped whole.
//! - **Trivial accept**: all three masks are full - every pixel is inside,
//!   and only the depth test and pixel shader run per pixel.
//! - **Partial**: the half-spaces are evaluated per pixel, one 4-wide lane
//!   row at a time, stepping the 24.8 edge values incrementally so the
//!   inner loop is additions-only.
//!
//! Most interior pixels of a typical triangle land in trivially accepted
//! blocks and most exterior blocks are rejected whole; this classification
//! is the dominant performance lever of the engine.
//!
//! Covered pixels go through the shading dispatch: perspective-correct
//! varying recovery, strict less-than depth test, pixel shader call,
//! color + depth write.

use crate::fixed::{self, EdgeFn, HalfSpaces, FP_BITS};
use crate::gradient::{AttributeBasis, Plane};
use crate::shader::{PixelInput, PixelShader, ShaderGlobals, TransformedVertex, NUM_VARYINGS};
use crate::simd::I32x4;

/// Edge length of a rasterization block, in pixels. A block row is exactly
/// one [`I32x4`] of half-space values.
pub const BLOCK_SIZE: usize = 4;

const B: i32 = BLOCK_SIZE as i32;

/// Observer of block classification events.
///
/// Injectable debugging/visualization hook, notified once per block with
/// the block's top-left pixel and size. All methods default to no-ops; the
/// rasterizer pays one branch per block for the hook.
pub trait RasterObserver: Send + Sync {
    fn block_accepted(&self, _x: i32, _y: i32, _size: i32) {}
    fn block_rejected(&self, _x: i32, _y: i32, _size: i32) {}
    fn block_partial(&self, _x: i32, _y: i32, _size: i32) {}
}

/// Raw view of the color and depth planes.
///
/// # Safety contract
///
/// A `TargetView` is only dereferenced through [`RenderContext`], and each
/// context owns the disjoint row band `[y_start, y_end)`. Concurrent
/// contexts over the same target never overlap rows, which is what makes
/// the unsynchronized depth read-modify-write sound.
#[derive(Clone, Copy)]
pub(crate) struct TargetView {
    pub color: *mut u32,
    pub depth: *mut f32,
    pub width: i32,
    pub height: i32,
}

// SAFETY: the row-band discipline above partitions all writes; see the
// pipeline's band construction.
unsafe impl Send for TargetView {}
unsafe impl Sync for TargetView {}

/// Everything one rasterization task needs, immutable for its duration.
pub(crate) struct RenderContext<'a> {
    pub target: TargetView,
    /// First row owned by this context (inclusive).
    pub y_start: i32,
    /// One past the last row owned by this context.
    pub y_end: i32,
    pub globals: &'a ShaderGlobals,
    pub pixel_shader: PixelShader,
    pub observer: Option<&'a dyn RasterObserver>,
}

/// Interpolation planes of one triangle: depth, inverse W, and the
/// varyings pre-divided by W at the vertices.
struct TriangleInterp {
    z: Plane,
    inv_w: Plane,
    vars: [Plane; NUM_VARYINGS],
}

/// Rasterize one solid triangle into the context's band.
///
/// Vertices carry projected screen positions with 1/w in the w component
/// and must be wound counterclockwise in y-down screen space; the pipeline
/// canonicalizes winding before dispatch, so this is the only convention
/// the edge setup ever sees. Degenerate triangles produce no pixels.
pub(crate) fn fill_triangle(
    ctx: &RenderContext,
    v1: &TransformedVertex,
    v2: &TransformedVertex,
    v3: &TransformedVertex,
) {
    let p1 = v1.position;
    let p2 = v2.position;
    let p3 = v3.position;

    let Some(hs) = fixed::setup(
        (fixed::to_fixed(p1.x), fixed::to_fixed(p1.y)),
        (fixed::to_fixed(p2.x), fixed::to_fixed(p2.y)),
        (fixed::to_fixed(p3.x), fixed::to_fixed(p3.y)),
    ) else {
        return;
    };

    // Bounding rectangle clamped to the viewport intersection with this
    // context's band; beyond that the rasterizer does no clipping.
    let min_x = hs.min_x.max(0);
    let max_x = hs.max_x.min(ctx.target.width);
    let min_y = hs.min_y.max(ctx.y_start);
    let max_y = hs.max_y.min(ctx.y_end);
    if min_x >= max_x || min_y >= max_y {
        return;
    }

    let Some(basis) = AttributeBasis::new((p1.x, p1.y), (p2.x, p2.y), (p3.x, p3.y)) else {
        return;
    };
    let interp = TriangleInterp {
        z: basis.plane(p1.z, p2.z, p3.z),
        inv_w: basis.plane(p1.w, p2.w, p3.w),
        vars: core::array::from_fn(|i| {
            basis.plane(
                v1.varyings[i] * p1.w,
                v2.varyings[i] * p2.w,
                v3.varyings[i] * p3.w,
            )
        }),
    };

    // Snap outward to whole blocks
    let block_min_x = min_x & !(B - 1);
    let block_min_y = min_y & !(B - 1);

    let mut by = block_min_y;
    while by < max_y {
        let mut bx = block_min_x;
        while bx < max_x {
            process_block(ctx, &hs, &interp, bx, by, min_x, max_x, min_y, max_y);
            bx += B;
        }
        by += B;
    }
}

/// 4-bit corner mask of one edge over a block: bit 0 = top-left,
/// bit 1 = top-right, bit 2 = bottom-left, bit 3 = bottom-right.
fn corner_mask(e: &EdgeFn, fx0: i32, fx1: i32, fy0: i32, fy1: i32) -> u8 {
    I32x4::new([
        e.eval(fx0, fy0),
        e.eval(fx1, fy0),
        e.eval(fx0, fy1),
        e.eval(fx1, fy1),
    ])
    .gt_zero_mask()
}

#[allow(clippy::too_many_arguments)]
fn process_block(
    ctx: &RenderContext,
    hs: &HalfSpaces,
    interp: &TriangleInterp,
    bx: i32,
    by: i32,
    min_x: i32,
    max_x: i32,
    min_y: i32,
    max_y: i32,
) {
    // Block corners in 28.4; the far corner is the block's last pixel
    let fx0 = bx << FP_BITS;
    let fx1 = (bx + B - 1) << FP_BITS;
    let fy0 = by << FP_BITS;
    let fy1 = (by + B - 1) << FP_BITS;

    let a = corner_mask(&hs.e12, fx0, fx1, fy0, fy1);
    let b = corner_mask(&hs.e23, fx0, fx1, fy0, fy1);
    let c = corner_mask(&hs.e31, fx0, fx1, fy0, fy1);

    // Trivial reject: the whole block is outside some edge
    if a == 0 || b == 0 || c == 0 {
        if let Some(obs) = ctx.observer {
            obs.block_rejected(bx, by, B);
        }
        return;
    }

    let y_lo = by.max(min_y);
    let y_hi = (by + B).min(max_y);
    let x_lo = bx.max(min_x);
    let x_hi = (bx + B).min(max_x);

    // Trivial accept: all corners inside all edges, no per-pixel edge tests
    if a == 0xF && b == 0xF && c == 0xF {
        if let Some(obs) = ctx.observer {
            obs.block_accepted(bx, by, B);
        }
        for y in y_lo..y_hi {
            for x in x_lo..x_hi {
                shade_pixel(ctx, interp, x, y);
            }
        }
        return;
    }

    // Partially covered block
    if let Some(obs) = ctx.observer {
        obs.block_partial(bx, by, B);
    }

    // Lane i covers pixel bx + i; mask off lanes outside the clamped rect
    let mut lane_valid = 0u8;
    for i in 0..B {
        if bx + i >= x_lo && bx + i < x_hi {
            lane_valid |= 1 << i;
        }
    }
    if lane_valid == 0 {
        return;
    }

    // Lane vectors of edge values for the first processed row: one pixel
    // step in x subtracts fdy per lane, one row step in y adds fdx to every
    // lane. The inner loop is additions-only.
    let fy_lo = y_lo << FP_BITS;
    let mut c1 = I32x4::splat(hs.e12.eval(fx0, fy_lo))
        .sub(I32x4::new([0, hs.e12.fdy, 2 * hs.e12.fdy, 3 * hs.e12.fdy]));
    let mut c2 = I32x4::splat(hs.e23.eval(fx0, fy_lo))
        .sub(I32x4::new([0, hs.e23.fdy, 2 * hs.e23.fdy, 3 * hs.e23.fdy]));
    let mut c3 = I32x4::splat(hs.e31.eval(fx0, fy_lo))
        .sub(I32x4::new([0, hs.e31.fdy, 2 * hs.e31.fdy, 3 * hs.e31.fdy]));

    let row_step1 = I32x4::splat(hs.e12.fdx);
    let row_step2 = I32x4::splat(hs.e23.fdx);
    let row_step3 = I32x4::splat(hs.e31.fdx);

    for y in y_lo..y_hi {
        let mut mask =
            c1.gt_zero_mask() & c2.gt_zero_mask() & c3.gt_zero_mask() & lane_valid;

        while mask != 0 {
            let i = mask.trailing_zeros() as i32;
            shade_pixel(ctx, interp, bx + i, y);
            mask &= mask - 1;
        }

        c1 = c1.add(row_step1);
        c2 = c2.add(row_step2);
        c3 = c3.add(row_step3);
    }
}

/// Shading dispatch for one covered pixel.
///
/// Recovers perspective-correct varyings as `(attr/w) / (1/w)`, depth
/// directly (it is already perspective-linear after projection), performs
/// the strict less-than depth test and, on pass, runs the pixel shader and
/// writes color and depth.
#[inline]
fn shade_pixel(ctx: &RenderContext, interp: &TriangleInterp, x: i32, y: i32) {
    let xf = x as f32;
    let yf = y as f32;
    let depth = interp.z.at(xf, yf);
    let idx = (y * ctx.target.width + x) as usize;

    // SAFETY: callers keep x in [0, width) and y in this context's
    // [y_start, y_end) ⊆ [0, height); bands are disjoint across concurrent
    // contexts (TargetView contract), so this pixel's read-modify-write is
    // exclusive to us.
    unsafe {
        let depth_slot = ctx.target.depth.add(idx);
        if depth < *depth_slot {
            let w = 1.0 / interp.inv_w.at(xf, yf);
            let mut varyings = [0.0f32; NUM_VARYINGS];
            for (slot, plane) in varyings.iter_mut().zip(&interp.vars) {
                *slot = plane.at(xf, yf) * w;
            }
            let input = PixelInput {
                varyings,
                depth,
                globals: ctx.globals,
            };
            let color = (ctx.pixel_shader)(&input);
            *depth_slot = depth;
            *ctx.target.color.add(idx) = color;
        }
    }
}
