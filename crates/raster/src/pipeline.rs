//! Triangle pipeline: vertex shading, projection, culling and dispatch.
//!
//! Per draw call the pipeline:
//!
//! 1. Runs the vertex shader over every vertex exactly once (a pre-pass,
//!    so indexed vertices are never re-shaded and parallel rasterization
//!    has no shading races), then performs the perspective divide and
//!    viewport mapping, storing 1/w in the position's w component.
//! 2. Rejects triangles with vertices behind the eye or with non-finite
//!    projections, applies the cull-mode test on the signed screen area,
//!    and canonicalizes surviving triangles to counterclockwise winding
//!    with one conditional swap.
//! 3. Dispatches per the fill mode resolved once per call: solid triangles
//!    to the block rasterizer, wireframe triangles to the 2D line drawer
//!    (no depth buffer, no shaders).
//!
//! With a worker pool attached, solid rasterization is partitioned into
//! disjoint horizontal screen bands, one task per band, each task walking
//! the full triangle list clipped to its rows. Disjoint rows mean no two
//! tasks ever write the same pixel, which is the entire concurrency
//! discipline - no locks, no atomics in the pixel path.

use crate::block::{self, RasterObserver, RenderContext, TargetView};
use crate::line;
use crate::session::{CullMode, FillMode};
use crate::shader::{PixelShader, ShaderGlobals, TransformedVertex, Vertex, VertexShader};
use crate::stats::Stats;
use glam::Vec4;
use sr_core::graphics::color::ARGB_WHITE;
use sr_core::graphics::DepthBuffer;
use sr_core::logging::{log, LogCategory, LogLevel};
use sr_core::threading::ThreadPool;
use sr_core::types::Frame;
use std::sync::Arc;

/// Screen coordinates beyond this magnitude would overflow the 28.4 edge
/// arithmetic; triangles reaching past it are skipped. This is the only
/// clipping the pipeline performs besides the bounding-rectangle/viewport
/// intersection inside the rasterizer.
const COORD_LIMIT: f32 = 2048.0;

/// Smallest clip-space w still treated as in front of the eye.
const MIN_W: f32 = 1e-6;

/// Everything a band task owns. Lives in an `Arc` shared by all bands of
/// one draw call; dropped after the end-of-call join.
struct SolidJob {
    transformed: Vec<TransformedVertex>,
    tris: Vec<[u32; 3]>,
    globals: Arc<ShaderGlobals>,
    pixel_shader: PixelShader,
    target: TargetView,
    observer: Option<Arc<dyn RasterObserver>>,
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn draw_triangles(
    frame: &mut Frame,
    depth: &mut DepthBuffer,
    pool: Option<&ThreadPool>,
    globals: &Arc<ShaderGlobals>,
    vertex_shader: VertexShader,
    pixel_shader: PixelShader,
    cull_mode: CullMode,
    fill_mode: FillMode,
    observer: Option<&Arc<dyn RasterObserver>>,
    vertices: &[Vertex],
    indices: &[u32],
    stats: &mut Stats,
) {
    // Zero-count draw calls are no-ops, not errors
    if vertices.is_empty() || indices.is_empty() {
        return;
    }
    debug_assert!(
        indices.len() % 3 == 0,
        "index count must be a multiple of 3"
    );

    stats.vertices += vertices.len() as u32;
    stats.indices += indices.len() as u32;

    let width = frame.width;
    let height = frame.height;

    // Vertex pre-pass: shade and project every vertex exactly once
    let transformed: Vec<TransformedVertex> = vertices
        .iter()
        .map(|v| {
            let mut out = vertex_shader(globals, v);
            project_to_screen(&mut out, width as f32, height as f32);
            out
        })
        .collect();

    // Cull test resolved once per draw call
    let (skip_cw, skip_ccw) = match cull_mode {
        CullMode::None => (false, false),
        CullMode::Cw => (true, false),
        CullMode::Ccw => (false, true),
    };

    let mut tris: Vec<[u32; 3]> = Vec::with_capacity(indices.len() / 3);
    for tri in indices.chunks_exact(3) {
        let (i1, i2, i3) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        if i1 >= transformed.len() || i2 >= transformed.len() || i3 >= transformed.len() {
            debug_assert!(false, "triangle index out of range");
            continue;
        }
        let p1 = transformed[i1].position;
        let p2 = transformed[i2].position;
        let p3 = transformed[i3].position;

        // Behind-eye or non-finite projections were marked with w = 0
        if p1.w <= 0.0 || p2.w <= 0.0 || p3.w <= 0.0 {
            continue;
        }
        if !within_coord_limit(p1) || !within_coord_limit(p2) || !within_coord_limit(p3) {
            continue;
        }

        // Twice the signed screen area; positive is clockwise in y-down
        // screen space
        let area2 = (p2.x - p1.x) * (p3.y - p1.y) - (p3.x - p1.x) * (p2.y - p1.y);
        if area2 == 0.0 || !area2.is_finite() {
            continue;
        }
        let clockwise = area2 > 0.0;
        if (clockwise && skip_cw) || (!clockwise && skip_ccw) {
            continue;
        }

        // The rasterizer accepts exactly one winding; flip clockwise
        // triangles here instead of swapping unconditionally
        if clockwise {
            tris.push([tri[0], tri[2], tri[1]]);
        } else {
            tris.push([tri[0], tri[1], tri[2]]);
        }
    }

    log(LogCategory::Pipeline, LogLevel::Debug, || {
        format!(
            "draw call: {} indices, {} triangles after cull/reject",
            indices.len(),
            tris.len()
        )
    });

    if tris.is_empty() {
        return;
    }
    stats.triangles_rendered += tris.len() as u32;

    match fill_mode {
        FillMode::Wireframe => {
            // Wireframe bypasses the depth buffer and the shader pipeline
            for t in &tris {
                let p1 = transformed[t[0] as usize].position;
                let p2 = transformed[t[1] as usize].position;
                let p3 = transformed[t[2] as usize].position;
                line::draw_wireframe_triangle(
                    frame,
                    (p1.x, p1.y),
                    (p2.x, p2.y),
                    (p3.x, p3.y),
                    ARGB_WHITE,
                );
            }
        }
        FillMode::Solid => {
            let target = TargetView {
                color: frame.pixels.as_mut_ptr(),
                depth: depth.as_mut_slice().as_mut_ptr(),
                width: width as i32,
                height: height as i32,
            };
            let bands = pool
                .map(|p| p.workers())
                .unwrap_or(1)
                .clamp(1, height as usize);
            if bands <= 1 {
                let ctx = RenderContext {
                    target,
                    y_start: 0,
                    y_end: height as i32,
                    globals: globals.as_ref(),
                    pixel_shader,
                    observer: observer.map(|o| o.as_ref()),
                };
                raster_list(&ctx, &transformed, &tris);
            } else {
                let pool = pool.expect("bands > 1 implies a pool");
                let job = Arc::new(SolidJob {
                    transformed,
                    tris,
                    globals: Arc::clone(globals),
                    pixel_shader,
                    target,
                    observer: observer.cloned(),
                });
                for band in 0..bands {
                    let y_start = (band * height as usize / bands) as i32;
                    let y_end = ((band + 1) * height as usize / bands) as i32;
                    if y_start >= y_end {
                        continue;
                    }
                    let job = Arc::clone(&job);
                    pool.submit(move || {
                        let ctx = RenderContext {
                            target: job.target,
                            y_start,
                            y_end,
                            globals: job.globals.as_ref(),
                            pixel_shader: job.pixel_shader,
                            observer: job.observer.as_deref(),
                        };
                        raster_list(&ctx, &job.transformed, &job.tris);
                    });
                }
                // The band tasks alias the frame through raw pointers; the
                // join here keeps them within this call's borrow of it.
                pool.wait_all();
            }
        }
    }
}

fn raster_list(ctx: &RenderContext, vertices: &[TransformedVertex], tris: &[[u32; 3]]) {
    for t in tris {
        block::fill_triangle(
            ctx,
            &vertices[t[0] as usize],
            &vertices[t[1] as usize],
            &vertices[t[2] as usize],
        );
    }
}

/// Perspective divide and viewport mapping.
///
/// Takes the clip-space position the vertex shader produced and rewrites
/// it to screen space: x/y in pixels, perspective-linear depth in z, and
/// **1/w in the w component**. Vertices behind the eye or with non-finite
/// projections get w = 0, which marks every triangle using them as
/// unrenderable (1/w is positive for every valid vertex).
fn project_to_screen(v: &mut TransformedVertex, width: f32, height: f32) {
    let clip = v.position;
    if !clip.is_finite() || clip.w <= MIN_W {
        v.position.w = 0.0;
        return;
    }
    let inv_w = 1.0 / clip.w;
    let x = (clip.x * inv_w * 0.5 + 0.5) * width;
    let y = (0.5 - clip.y * inv_w * 0.5) * height;
    let z = clip.z * inv_w;
    let screen = Vec4::new(x, y, z, inv_w);
    if !screen.is_finite() {
        v.position.w = 0.0;
        return;
    }
    v.position = screen;
}

fn within_coord_limit(p: Vec4) -> bool {
    p.x.abs() <= COORD_LIMIT && p.y.abs() <= COORD_LIMIT
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::NUM_VARYINGS;

    fn xv(clip: Vec4) -> TransformedVertex {
        TransformedVertex {
            position: clip,
            varyings: [0.0; NUM_VARYINGS],
        }
    }

    #[test]
    fn test_projection_stores_inverse_w() {
        let mut v = xv(Vec4::new(0.0, 0.0, 1.0, 2.0));
        project_to_screen(&mut v, 100.0, 50.0);

        // Center of the viewport, depth z/w, and 1/w in w
        assert_eq!(v.position.x, 50.0);
        assert_eq!(v.position.y, 25.0);
        assert_eq!(v.position.z, 0.5);
        assert_eq!(v.position.w, 0.5);
    }

    #[test]
    fn test_projection_flips_y() {
        // NDC +y is up; screen +y is down
        let mut top = xv(Vec4::new(0.0, 1.0, 0.0, 1.0));
        project_to_screen(&mut top, 100.0, 50.0);
        assert_eq!(top.position.y, 0.0);

        let mut bottom = xv(Vec4::new(0.0, -1.0, 0.0, 1.0));
        project_to_screen(&mut bottom, 100.0, 50.0);
        assert_eq!(bottom.position.y, 50.0);
    }

    #[test]
    fn test_projection_marks_behind_eye_vertices() {
        let mut v = xv(Vec4::new(0.5, 0.5, 0.5, -1.0));
        project_to_screen(&mut v, 100.0, 100.0);
        assert_eq!(v.position.w, 0.0);

        let mut v = xv(Vec4::new(0.5, 0.5, 0.5, 0.0));
        project_to_screen(&mut v, 100.0, 100.0);
        assert_eq!(v.position.w, 0.0);
    }

    #[test]
    fn test_projection_marks_non_finite() {
        let mut v = xv(Vec4::new(f32::NAN, 0.0, 0.0, 1.0));
        project_to_screen(&mut v, 100.0, 100.0);
        assert_eq!(v.position.w, 0.0);

        let mut v = xv(Vec4::new(f32::INFINITY, 0.0, 0.0, 1.0));
        project_to_screen(&mut v, 100.0, 100.0);
        assert_eq!(v.position.w, 0.0);
    }

    #[test]
    fn test_coord_limit_guard() {
        assert!(within_coord_limit(Vec4::new(2048.0, -2048.0, 0.0, 1.0)));
        assert!(!within_coord_limit(Vec4::new(2049.0, 0.0, 0.0, 1.0)));
        assert!(!within_coord_limit(Vec4::new(0.0, -3000.0, 0.0, 1.0)));
    }
}
