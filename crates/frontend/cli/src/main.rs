//! Headless demo frontend: renders a spinning textured cube to PNG files.

use anyhow::{Context, Result};
use clap::Parser;
use glam::{Mat4, Vec3};
use sr_core::graphics::color::ARGB_WHITE;
use sr_core::graphics::ColorOps;
use sr_core::texture::Texture2D;
use sr_core::types::Frame;
use sr_raster::{
    CullMode, FillMode, PixelInput, Settings, ShaderGlobals, SoftRenderer, TransformedVertex,
    Vertex,
};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;

mod mesh;

#[derive(Parser)]
#[command(
    name = "softrast",
    about = "Software rasterizer demo: renders a spinning textured cube to PNG frames"
)]
struct Args {
    /// Viewport width in pixels
    #[arg(long, default_value_t = 640)]
    width: u32,

    /// Viewport height in pixels
    #[arg(long, default_value_t = 480)]
    height: u32,

    /// Number of animation frames to render
    #[arg(long, default_value_t = 8)]
    frames: u32,

    /// Output directory for PNG frames
    #[arg(long, default_value = "frames")]
    out: String,

    /// Draw triangle outlines instead of solid fills
    #[arg(long, default_value_t = false)]
    wireframe: bool,

    /// Cull mode: "none", "cw" or "ccw"
    #[arg(long, default_value = "ccw")]
    cull: String,

    /// Rasterization worker threads (0 = render on the calling thread)
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Write the last frame's statistics as JSON to this file
    #[arg(long)]
    stats: Option<String>,

    /// Suppress per-frame output
    #[arg(long, default_value_t = false)]
    quiet: bool,
}

/// Transforms the vertex into clip space and computes a per-vertex diffuse
/// intensity; varyings carry (u, v, intensity).
fn cube_vertex_shader(globals: &ShaderGlobals, vertex: &Vertex) -> TransformedVertex {
    let clip = globals.wvp * vertex.position.extend(1.0);

    let normal = (globals.world * vertex.normal.extend(0.0))
        .truncate()
        .normalize_or_zero();
    let light = Vec3::new(0.5, 0.7, 0.5).normalize();
    let diffuse = normal.dot(light).max(0.0);
    let intensity = 0.3 + 0.7 * diffuse;

    TransformedVertex {
        position: clip,
        varyings: [vertex.tex_coord.x, vertex.tex_coord.y, intensity, 0.0],
    }
}

/// Samples the bound texture at the interpolated UV and modulates it by the
/// interpolated diffuse intensity.
fn cube_pixel_shader(input: &PixelInput) -> u32 {
    let base = match &input.globals.texture {
        Some(texture) => texture.sample_point_wrap(input.varyings[0], input.varyings[1]),
        None => ARGB_WHITE,
    };
    ColorOps::modulate(base, input.varyings[2])
}

fn write_png(path: &Path, frame: &Frame) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), frame.width, frame.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;

    let mut data = Vec::with_capacity(frame.pixels.len() * 4);
    for &pixel in &frame.pixels {
        data.push(ColorOps::red(pixel));
        data.push(ColorOps::green(pixel));
        data.push(ColorOps::blue(pixel));
        data.push(ColorOps::alpha(pixel));
    }
    writer.write_image_data(&data)?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let cull = match args.cull.as_str() {
        "none" => CullMode::None,
        "cw" => CullMode::Cw,
        "ccw" => CullMode::Ccw,
        other => anyhow::bail!("unsupported cull mode: {}", other),
    };

    fs::create_dir_all(&args.out)
        .with_context(|| format!("creating output directory {}", args.out))?;

    let mut renderer = SoftRenderer::new(
        args.width,
        args.height,
        Settings {
            worker_threads: args.threads,
        },
    )?;

    renderer.set_vertex_shader(cube_vertex_shader);
    renderer.set_pixel_shader(cube_pixel_shader);
    renderer.set_cull_mode(cull);
    renderer.set_fill_mode(if args.wireframe {
        FillMode::Wireframe
    } else {
        FillMode::Solid
    });
    renderer.set_texture(Some(Arc::new(Texture2D::checkerboard())));

    let aspect = args.width as f32 / args.height as f32;
    renderer.set_projection_matrix(Mat4::perspective_rh(
        60f32.to_radians(),
        aspect,
        0.1,
        100.0,
    ));
    renderer.set_view_matrix(Mat4::look_at_rh(
        Vec3::new(0.0, 1.2, 2.5),
        Vec3::ZERO,
        Vec3::Y,
    ));

    let cube = mesh::cube();
    log::info!(
        "rendering {} frames of a {}-triangle cube at {}x{}",
        args.frames,
        cube.triangle_count(),
        args.width,
        args.height
    );

    for frame_index in 0..args.frames {
        let angle = frame_index as f32 * 0.12;
        renderer
            .set_world_matrix(Mat4::from_rotation_y(angle) * Mat4::from_rotation_x(angle * 0.6));

        renderer.begin_frame();
        renderer.draw_triangles(&cube.vertices, &cube.indices);
        renderer.end_frame();

        let path = Path::new(&args.out).join(format!("frame_{:03}.png", frame_index));
        write_png(&path, renderer.frame())?;

        if !args.quiet {
            let stats = renderer.stats();
            println!(
                "frame {}: {} triangles rendered ({} vertices, {} indices) -> {}",
                frame_index,
                stats.triangles_rendered,
                stats.vertices,
                stats.indices,
                path.display()
            );
        }
    }

    if let Some(stats_path) = args.stats.as_ref() {
        let file = File::create(stats_path)
            .with_context(|| format!("creating {}", stats_path))?;
        serde_json::to_writer_pretty(file, renderer.stats())?;
    }

    Ok(())
}
