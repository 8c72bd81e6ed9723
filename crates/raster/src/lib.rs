//! Software triangle rasterization pipeline.
//!
//! A CPU-only renderer: vertices run through a programmable vertex shader,
//! triangles are culled and projected, and covered pixels are produced by a
//! block-based half-space rasterizer with perspective-correct interpolation
//! feeding a programmable pixel shader.
//!
//! # Architecture Overview
//!
//! ```text
//! SoftRenderer (session state) -> pipeline (shade/cull/project)
//!                                   -> block rasterizer (solid fill)
//!                                   -> line drawer (wireframe)
//! ```
//!
//! - **fixed**: 28.4/24.8 fixed-point half-space setup with the top-left
//!   fill convention
//! - **gradient**: screen-space attribute gradients shared by depth,
//!   inverse-W and all varyings
//! - **simd**: explicit 4-lane integer vector for coverage tests
//! - **block**: the block rasterizer (trivial accept/reject, partial blocks)
//!   and per-pixel shading dispatch
//! - **line**: Bresenham 2D lines and wireframe triangles
//! - **pipeline**: per-draw-call vertex pre-pass, culling, winding
//!   canonicalization and band dispatch
//! - **session**: the `SoftRenderer` session object, render state and stats
//!
//! Rasterization is deterministic: coverage is pure integer arithmetic at a
//! single fixed-point scale, so output is pixel-exact across platforms.

mod block;
mod fixed;
mod gradient;
mod line;
mod pipeline;
mod session;
mod shader;
mod simd;
mod stats;

pub use block::{RasterObserver, BLOCK_SIZE};
pub use session::{
    CullMode, FillMode, InitError, Settings, SoftRenderer, MAX_VIEWPORT_HEIGHT,
    MAX_VIEWPORT_WIDTH,
};
pub use shader::{
    PixelInput, PixelShader, ShaderGlobals, TransformedVertex, Vertex, VertexShader, NUM_VARYINGS,
};
pub use stats::Stats;
