//! Rendering session: state, lifecycle and the public drawing API.
//!
//! A [`SoftRenderer`] is an explicit session value - there is no process
//! global. Lifecycle:
//!
//! ```text
//! new -> configure (setters) -> (begin_frame -> draw* -> end_frame)* -> drop
//! ```
//!
//! Render state (matrices, shaders, modes, texture) is read when a draw
//! call starts; `&mut self` on every frame operation means state cannot
//! change while a draw call is in flight. `end_frame` is the barrier that
//! joins any outstanding rasterization tasks.

use crate::block::RasterObserver;
use crate::line;
use crate::pipeline;
use crate::shader::{PixelShader, ShaderGlobals, Vertex, VertexShader};
use crate::stats::Stats;
use glam::{Mat4, Vec2};
use serde::{Deserialize, Serialize};
use sr_core::graphics::color::ARGB_BLACK;
use sr_core::graphics::DepthBuffer;
use sr_core::logging::{log, LogCategory, LogLevel};
use sr_core::texture::Texture2D;
use sr_core::threading::ThreadPool;
use sr_core::types::Frame;
use std::sync::Arc;
use thiserror::Error;

/// Largest supported viewport width: beyond this the 28.4 fixed-point edge
/// arithmetic could overflow 32 bits.
pub const MAX_VIEWPORT_WIDTH: u32 = 2048;
/// Largest supported viewport height.
pub const MAX_VIEWPORT_HEIGHT: u32 = 1024;

/// Which winding of screen-space triangles to discard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CullMode {
    /// Draw both windings.
    #[default]
    None,
    /// Discard triangles wound clockwise on screen.
    Cw,
    /// Discard triangles wound counterclockwise on screen.
    Ccw,
}

/// How triangles are filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FillMode {
    /// Filled triangles through the full shading pipeline.
    #[default]
    Solid,
    /// Outlines only: 2D lines, no depth test, no shaders.
    Wireframe,
}

/// Session configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Worker threads for rasterization. 0 renders on the calling thread;
    /// N > 0 splits each draw call into N disjoint horizontal screen bands.
    pub worker_threads: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self { worker_threads: 0 }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum InitError {
    #[error("viewport dimensions must be non-zero, got {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },
    #[error("viewport {width}x{height} exceeds the supported maximum of 2048x1024")]
    TooLarge { width: u32, height: u32 },
}

/// A software rendering session.
pub struct SoftRenderer {
    frame: Frame,
    depth: DepthBuffer,

    world: Mat4,
    view: Mat4,
    projection: Mat4,

    cull_mode: CullMode,
    fill_mode: FillMode,

    vertex_shader: Option<VertexShader>,
    pixel_shader: Option<PixelShader>,
    texture: Option<Arc<Texture2D>>,
    observer: Option<Arc<dyn RasterObserver>>,

    pool: Option<ThreadPool>,
    settings: Settings,
    stats: Stats,
}

impl SoftRenderer {
    /// Create a session with its own color and depth planes.
    ///
    /// This is the only fallible operation of the API: invalid dimensions
    /// are rejected here so that every per-frame call can stay infallible.
    pub fn new(width: u32, height: u32, settings: Settings) -> Result<Self, InitError> {
        if width == 0 || height == 0 {
            return Err(InitError::ZeroDimensions { width, height });
        }
        if width > MAX_VIEWPORT_WIDTH || height > MAX_VIEWPORT_HEIGHT {
            return Err(InitError::TooLarge { width, height });
        }

        let pool = if settings.worker_threads > 0 {
            Some(ThreadPool::new(settings.worker_threads))
        } else {
            None
        };

        log(LogCategory::Session, LogLevel::Info, || {
            format!(
                "session created: {}x{}, {} worker threads",
                width, height, settings.worker_threads
            )
        });

        Ok(Self {
            frame: Frame::new(width, height),
            depth: DepthBuffer::new(width, height),
            world: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            cull_mode: CullMode::default(),
            fill_mode: FillMode::default(),
            vertex_shader: None,
            pixel_shader: None,
            texture: None,
            observer: None,
            pool,
            settings,
            stats: Stats::default(),
        })
    }

    /// Start a frame: clear both planes and reset the statistics.
    pub fn begin_frame(&mut self) {
        self.frame.fill(ARGB_BLACK);
        self.depth.clear();
        self.stats.reset();
    }

    /// End a frame. This is the synchronization barrier: any rasterization
    /// tasks still in flight are joined before it returns.
    pub fn end_frame(&mut self) {
        if let Some(pool) = &self.pool {
            pool.wait_all();
        }
        log(LogCategory::Session, LogLevel::Debug, || {
            format!(
                "frame complete: {} triangles, {} vertices, {} indices",
                self.stats.triangles_rendered, self.stats.vertices, self.stats.indices
            )
        });
    }

    pub fn set_world_matrix(&mut self, world: Mat4) {
        self.world = world;
    }

    pub fn set_view_matrix(&mut self, view: Mat4) {
        self.view = view;
    }

    pub fn set_projection_matrix(&mut self, projection: Mat4) {
        self.projection = projection;
    }

    pub fn set_cull_mode(&mut self, cull_mode: CullMode) {
        self.cull_mode = cull_mode;
    }

    pub fn set_fill_mode(&mut self, fill_mode: FillMode) {
        self.fill_mode = fill_mode;
    }

    pub fn set_vertex_shader(&mut self, shader: VertexShader) {
        self.vertex_shader = Some(shader);
    }

    pub fn set_pixel_shader(&mut self, shader: PixelShader) {
        self.pixel_shader = Some(shader);
    }

    /// Bind or unbind the texture exposed to shaders through the globals.
    pub fn set_texture(&mut self, texture: Option<Arc<Texture2D>>) {
        self.texture = texture;
    }

    /// Install a rasterization observer (block classification events).
    pub fn set_observer(&mut self, observer: Option<Arc<dyn RasterObserver>>) {
        self.observer = observer;
    }

    /// Draw an indexed triangle list with the current render state.
    ///
    /// Zero-length vertex or index slices are no-ops. Both shaders must be
    /// bound: drawing without them is a contract violation - asserted in
    /// debug builds, a silent no-op in release (the hot path carries no
    /// runtime check for it).
    pub fn draw_triangles(&mut self, vertices: &[Vertex], indices: &[u32]) {
        let (Some(vertex_shader), Some(pixel_shader)) = (self.vertex_shader, self.pixel_shader)
        else {
            debug_assert!(false, "draw_triangles called with no shaders bound");
            return;
        };

        // Snapshot of the draw-call globals, immutable while in flight
        let wvp = self.projection * self.view * self.world;
        let globals = Arc::new(ShaderGlobals {
            world: self.world,
            wvp,
            texture: self.texture.clone(),
        });

        pipeline::draw_triangles(
            &mut self.frame,
            &mut self.depth,
            self.pool.as_ref(),
            &globals,
            vertex_shader,
            pixel_shader,
            self.cull_mode,
            self.fill_mode,
            self.observer.as_ref(),
            vertices,
            indices,
            &mut self.stats,
        );
    }

    /// Draw a 2D line in screen pixels, bypassing the 3D pipeline.
    pub fn draw_line_2d(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
        line::draw_line_2d(&mut self.frame, x0, y0, x1, y1, color);
    }

    /// Draw a triangle outline in screen pixels, bypassing the 3D pipeline.
    pub fn draw_wireframe_triangle(&mut self, p0: Vec2, p1: Vec2, p2: Vec2, color: u32) {
        line::draw_wireframe_triangle(
            &mut self.frame,
            (p0.x, p0.y),
            (p1.x, p1.y),
            (p2.x, p2.y),
            color,
        );
    }

    pub fn viewport_size(&self) -> (u32, u32) {
        (self.frame.width, self.frame.height)
    }

    /// The color plane.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Raw view of the color plane, row-major packed ARGB.
    pub fn color_buffer(&self) -> &[u32] {
        &self.frame.pixels
    }

    /// The depth plane (mostly useful for tests and tools).
    pub fn depth_buffer(&self) -> &DepthBuffer {
        &self.depth
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}
