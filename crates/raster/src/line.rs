//! 2D line drawing for wireframe rendering.
//!
//! Lines are drawn with Bresenham's algorithm straight into the color
//! plane: no depth test and no shader pipeline, matching the wireframe
//! fill mode's contract. Out-of-bounds pixels are dropped by the frame's
//! bounds-checked write.

use sr_core::types::Frame;

/// Draw a line from `(x0, y0)` to `(x1, y1)` in screen pixels.
pub fn draw_line_2d(frame: &mut Frame, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut x = x0;
    let mut y = y0;

    loop {
        if x >= 0 && y >= 0 {
            frame.write(x as u32, y as u32, color);
        }

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Draw a triangle outline as three 2D lines.
pub fn draw_wireframe_triangle(
    frame: &mut Frame,
    p0: (f32, f32),
    p1: (f32, f32),
    p2: (f32, f32),
    color: u32,
) {
    let (x0, y0) = (p0.0.round() as i32, p0.1.round() as i32);
    let (x1, y1) = (p1.0.round() as i32, p1.1.round() as i32);
    let (x2, y2) = (p2.0.round() as i32, p2.1.round() as i32);
    draw_line_2d(frame, x0, y0, x1, y1, color);
    draw_line_2d(frame, x1, y1, x2, y2, color);
    draw_line_2d(frame, x2, y2, x0, y0, color);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizontal_line() {
        let mut frame = Frame::new(64, 64);
        draw_line_2d(&mut frame, 10, 10, 50, 10, 0xFFFFFFFF);

        assert_eq!(frame.read(10, 10), Some(0xFFFFFFFF));
        assert_eq!(frame.read(30, 10), Some(0xFFFFFFFF));
        assert_eq!(frame.read(50, 10), Some(0xFFFFFFFF));
        assert_eq!(frame.read(30, 11), Some(0));
    }

    #[test]
    fn test_diagonal_line() {
        let mut frame = Frame::new(64, 64);
        draw_line_2d(&mut frame, 10, 10, 50, 50, 0xFFFFFFFF);

        assert_eq!(frame.read(10, 10), Some(0xFFFFFFFF));
        assert_eq!(frame.read(30, 30), Some(0xFFFFFFFF));
        assert_eq!(frame.read(50, 50), Some(0xFFFFFFFF));
    }

    #[test]
    fn test_single_point_line() {
        let mut frame = Frame::new(8, 8);
        draw_line_2d(&mut frame, 3, 3, 3, 3, 0xFF00FF00);
        assert_eq!(frame.read(3, 3), Some(0xFF00FF00));
        assert_eq!(frame.pixels.iter().filter(|&&p| p != 0).count(), 1);
    }

    #[test]
    fn test_line_clips_to_frame() {
        let mut frame = Frame::new(16, 16);
        // Endpoints far outside the frame must not panic
        draw_line_2d(&mut frame, -20, 8, 40, 8, 0xFFFFFFFF);
        assert_eq!(frame.read(0, 8), Some(0xFFFFFFFF));
        assert_eq!(frame.read(15, 8), Some(0xFFFFFFFF));
    }

    #[test]
    fn test_wireframe_triangle_outline() {
        let mut frame = Frame::new(64, 64);
        draw_wireframe_triangle(
            &mut frame,
            (10.0, 10.0),
            (40.0, 10.0),
            (25.0, 40.0),
            0xFFFF0000,
        );

        // Vertices and an edge midpoint are drawn
        assert_eq!(frame.read(10, 10), Some(0xFFFF0000));
        assert_eq!(frame.read(40, 10), Some(0xFFFF0000));
        assert_eq!(frame.read(25, 10), Some(0xFFFF0000));

        // Interior stays untouched
        assert_eq!(frame.read(25, 20), Some(0));
    }
}
