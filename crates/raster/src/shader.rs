//! Shader ABI: vertex formats, per-draw-call globals and shader signatures.
//!
//! Shaders are plain function pointers. Both stages must be pure functions
//! of their inputs - they are called concurrently from band tasks without
//! synchronization.

use glam::{Mat4, Vec2, Vec3, Vec4};
use sr_core::texture::Texture2D;
use std::sync::Arc;

/// Number of interpolated scalar parameters carried from the vertex shader
/// to the pixel shader.
pub const NUM_VARYINGS: usize = 4;

/// Input vertex (application to vertex shader).
///
/// Owned by the caller's vertex buffer; the pipeline never mutates it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub tex_coord: Vec2,
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3, tex_coord: Vec2) -> Self {
        Self {
            position,
            normal,
            tex_coord,
        }
    }
}

/// Transformed vertex (vertex shader output, rasterizer input).
///
/// The vertex shader fills `position` with the homogeneous clip-space
/// position. After the pipeline's perspective divide, `position` holds
/// screen-space x/y, perspective-linear depth in z, and **1/w in the w
/// component** (the rasterizer interpolates 1/w linearly in screen space).
#[derive(Debug, Clone, Copy)]
pub struct TransformedVertex {
    pub position: Vec4,
    pub varyings: [f32; NUM_VARYINGS],
}

/// Read-only globals shared by every shader invocation of a draw call.
///
/// Built by the session when `draw_triangles` starts and never mutated
/// while the draw call is in flight.
#[derive(Clone)]
pub struct ShaderGlobals {
    /// Model-to-world transform (normals, lighting).
    pub world: Mat4,
    /// Combined world-view-projection transform.
    pub wvp: Mat4,
    /// Texture bound for point sampling, if any.
    pub texture: Option<Arc<Texture2D>>,
}

/// Vertex shader: one input vertex to one transformed vertex.
///
/// Must be a pure function of its inputs.
pub type VertexShader = fn(&ShaderGlobals, &Vertex) -> TransformedVertex;

/// Per-pixel inputs handed to the pixel shader.
pub struct PixelInput<'a> {
    /// Perspective-correct interpolated varyings.
    pub varyings: [f32; NUM_VARYINGS],
    /// Interpolated depth of this pixel.
    pub depth: f32,
    pub globals: &'a ShaderGlobals,
}

/// Pixel shader: interpolated inputs to one packed ARGB color.
///
/// The rasterizer writes the returned color to the pixel that passed the
/// depth test; the shader must not touch any other pixel.
pub type PixelShader = fn(&PixelInput) -> u32;
