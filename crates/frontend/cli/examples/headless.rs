use glam::{Vec2, Vec3, Vec4};
use sr_raster::{
    PixelInput, Settings, ShaderGlobals, SoftRenderer, TransformedVertex, Vertex,
};

fn passthrough(_globals: &ShaderGlobals, v: &Vertex) -> TransformedVertex {
    TransformedVertex {
        position: Vec4::new(v.position.x, v.position.y, v.position.z, 1.0),
        varyings: [v.tex_coord.x, v.tex_coord.y, 0.0, 0.0],
    }
}

fn uv_shader(input: &PixelInput) -> u32 {
    let r = (input.varyings[0].clamp(0.0, 1.0) * 255.0) as u32;
    let g = (input.varyings[1].clamp(0.0, 1.0) * 255.0) as u32;
    0xFF000000 | (r << 16) | (g << 8)
}

fn main() {
    let mut renderer = SoftRenderer::new(64, 64, Settings::default()).unwrap();
    renderer.set_vertex_shader(passthrough);
    renderer.set_pixel_shader(uv_shader);

    let vertices = [
        Vertex::new(Vec3::new(-0.8, 0.8, 0.5), Vec3::Z, Vec2::new(0.0, 0.0)),
        Vertex::new(Vec3::new(0.8, 0.8, 0.5), Vec3::Z, Vec2::new(1.0, 0.0)),
        Vertex::new(Vec3::new(-0.8, -0.8, 0.5), Vec3::Z, Vec2::new(0.0, 1.0)),
    ];

    renderer.begin_frame();
    renderer.draw_triangles(&vertices, &[0, 1, 2]);
    renderer.end_frame();

    let frame = renderer.frame();
    println!("Headless frame: {}x{}", frame.width, frame.height);
    println!("Stats: {:?}", renderer.stats());

    let mut out = String::new();
    for i in 0..8 {
        out.push_str(&format!("{:08X} ", frame.pixels[32 * 64 + 24 + i]));
    }
    println!("Center pixels: {}", out);
}
