// Window + software drawing utilities.
// Visual effects provided here:
// 1) A window that shows the composited camera image.
// 2) Filled shapes and thick strokes (palette boxes, pointer dot, paint strokes).
// 3) A thin-line hand skeleton over the detected hand.
// 4) A tiny 5x7 bitmap font (scalable) for labels and the HUD.

use crate::error::Error;
use crate::hand::{KeypointSet, HAND_CONNECTIONS};
use crate::types::{FrameBuffer, Point};
use minifb::{Key, Window, WindowOptions};

pub struct Drawer {
    window: Window, // the on-screen window you see
}

impl Drawer {
    /// Create a window of a fixed size (frames are resized to match before display).
    /// Visual: a new empty window appears with your chosen title.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        Ok(Self { window })
    }

    /// Push the pixels for this frame to the screen.
    /// Visual: the window immediately displays the new image.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// ESC ends the session.
    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }
}

/* ---------- Software drawing: pixels, lines, shapes ---------- */

/// Put a pixel on the framebuffer if (x,y) is inside bounds.
/// Visual: the exact pixel at (x,y) changes color.
#[inline]
pub fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    let idx = y * fb.width + x;
    fb.pixels[idx] = color;
}

/// Draw a thin line between (x0,y0) and (x1,y1) using Bresenham.
/// Visual: a straight 1-pixel line appears on top of the camera image.
pub fn draw_line(fb: &mut FrameBuffer, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
    let (mut x0, mut y0, x1, y1) = (x0, y0, x1, y1);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        put_pixel(fb, x0, y0, color);
        if x0 == x1 && y0 == y1 { break; }
        let e2 = 2 * err;
        if e2 >= dy { err += dy; x0 += sx; }
        if e2 <= dx { err += dx; y0 += sy; }
    }
}

/// Draw a stroke `thickness` pixels wide with round caps from `a` to `b`.
/// Every pixel whose center lies within thickness/2 of the segment is painted.
/// Visual: one paint-brush segment; a zero-length segment leaves a round dot.
pub fn draw_thick_line(fb: &mut FrameBuffer, a: Point, b: Point, thickness: u32, color: u32) {
    let r = (thickness / 2) as i32;
    if r == 0 {
        draw_line(fb, a.x, a.y, b.x, b.y, color);
        return;
    }

    // Only scan the segment's bounding box grown by the radius, clipped to the buffer.
    let x_min = (a.x.min(b.x) - r).max(0);
    let y_min = (a.y.min(b.y) - r).max(0);
    let x_max = (a.x.max(b.x) + r).min(fb.width as i32 - 1);
    let y_max = (a.y.max(b.y) + r).min(fb.height as i32 - 1);

    let (ax, ay) = (a.x as f32, a.y as f32);
    let (dx, dy) = ((b.x - a.x) as f32, (b.y - a.y) as f32);
    let len2 = dx * dx + dy * dy;
    let r2 = (r * r) as f32;

    for y in y_min..=y_max {
        for x in x_min..=x_max {
            let (px, py) = (x as f32 - ax, y as f32 - ay);
            // closest point on the segment, as a fraction of its length
            let t = if len2 > 0.0 { ((px * dx + py * dy) / len2).clamp(0.0, 1.0) } else { 0.0 };
            let (ex, ey) = (px - t * dx, py - t * dy);
            if ex * ex + ey * ey <= r2 {
                fb.pixels[y as usize * fb.width + x as usize] = color;
            }
        }
    }
}

/// Filled disc of `radius` centered at `c`.
/// Visual: the round pointer dot under the index fingertip while drawing.
pub fn fill_circle(fb: &mut FrameBuffer, c: Point, radius: i32, color: u32) {
    let r2 = radius * radius;
    for y in -radius..=radius {
        for x in -radius..=radius {
            if x * x + y * y <= r2 {
                put_pixel(fb, c.x + x, c.y + y, color);
            }
        }
    }
}

/// Filled axis-aligned rectangle between two opposite corners (inclusive, any order).
/// Visual: palette boxes and the select-mode indicator.
pub fn fill_rect(fb: &mut FrameBuffer, a: Point, b: Point, color: u32) {
    let x0 = a.x.min(b.x).max(0);
    let y0 = a.y.min(b.y).max(0);
    let x1 = a.x.max(b.x).min(fb.width as i32 - 1);
    let y1 = a.y.max(b.y).min(fb.height as i32 - 1);
    for y in y0..=y1 {
        let row = y as usize * fb.width;
        for x in x0..=x1 {
            fb.pixels[row + x as usize] = color;
        }
    }
}

/// Thin white bones plus red joint dots over the detected hand.
/// Visual: the familiar landmark skeleton follows your hand around.
pub fn draw_hand_skeleton(fb: &mut FrameBuffer, keypoints: &KeypointSet) {
    let pts = keypoints.points();
    if pts.is_empty() {
        return;
    }
    for &(from, to) in HAND_CONNECTIONS.iter() {
        let (a, b) = (pts[from], pts[to]);
        draw_line(fb, a.x, a.y, b.x, b.y, 0x00_FF_FF_FF);
    }
    for &p in pts {
        fill_circle(fb, p, 3, 0x00_FF_00_00);
    }
}

/* ---------- 5x7 bitmap font (ASCII subset for labels and "FPS: 00.0") ---------- */

/// Return a 5x7 glyph bitmap for a limited character set.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    // Helper macro to define a glyph quickly
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        // Digits 0..9
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        // Uppercase letters used by the labels, tool names and FPS; lowercase maps onto these
        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),

        // Punctuation: space, vertical bar, colon, dot
        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),

        _ => None,
    }
}

/// Draw a single 5x7 character at (x,y), each font pixel blown up to `scale`x`scale`.
/// Visual: a glyph appears with a black shadow for contrast.
fn draw_char_5x7(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, color: u32, scale: i32) {
    let Some(rows) = glyph5x7(ch) else { return };

    let mut plot = |px: i32, py: i32, c: u32| {
        for sy in 0..scale {
            for sx in 0..scale {
                put_pixel(fb, px + sx, py + sy, c);
            }
        }
    };

    // Shadow pass first, then the glyph itself on top
    for (offset, c) in [(scale.max(1), 0x00000000), (0, color)] {
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..5 {
                if (rowbits & (1 << (4 - rx))) != 0 {
                    plot(x + rx * scale + offset, y + ry as i32 * scale + offset, c);
                }
            }
        }
    }
}

/// Draw a text string using 5x7 glyphs at the given integer scale (1 = HUD size).
/// Visual: each glyph is 5x7 font pixels with 1 font pixel of spacing.
pub fn draw_text_5x7(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, color: u32, scale: i32) {
    let scale = scale.max(1);
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, color, scale);
        x += 6 * scale;
    }
}
