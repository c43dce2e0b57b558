// Merges the persistent paint canvas over the live camera frame.
// Visual: strokes stay on screen in their own color while everything else is live video.

use crate::error::Error;
use crate::types::FrameBuffer;

/// Canvas pixels brighter than this count as paint; darker ones let the camera through.
pub const STROKE_CUTOFF: u8 = 20;

/// Integer luma of a 0x00RRGGBB pixel (0.299 R + 0.587 G + 0.114 B, rounded).
#[inline]
pub fn luma(px: u32) -> u8 {
    let r = (px >> 16) & 0xFF;
    let g = (px >> 8) & 0xFF;
    let b = px & 0xFF;
    // 14-bit fixed point weights, summing to 1 << 14
    ((r * 4899 + g * 9617 + b * 1868 + (1 << 13)) >> 14) as u8
}

/// Pass-through mask for one canvas pixel: all ones where the camera shows, zero under paint.
#[inline]
fn pass_mask(canvas_px: u32) -> u32 {
    if luma(canvas_px) > STROKE_CUTOFF { 0 } else { 0x00_FF_FF_FF }
}

/// `frame = (frame & mask) | canvas`, computed in place.
/// Must run every displayed frame: the canvas is unchanged but the frame is new.
pub fn composite(frame: &mut FrameBuffer, canvas: &FrameBuffer) -> Result<(), Error> {
    if !frame.same_size(canvas) {
        return Err(Error::Composite(format!(
            "composite: frame {}x{} vs canvas {}x{}",
            frame.width, frame.height, canvas.width, canvas.height
        )));
    }
    for (out, &paint) in frame.pixels.iter_mut().zip(canvas.pixels.iter()) {
        *out = (*out & pass_mask(paint)) | paint;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::rgb;

    #[test]
    fn test_luma() {
        assert_eq!(luma(0), 0);
        assert_eq!(luma(rgb(255, 255, 255)), 255);
        assert_eq!(luma(rgb(255, 0, 0)), 76);
        assert_eq!(luma(rgb(0, 255, 0)), 150);
        assert_eq!(luma(rgb(0, 0, 255)), 29);
    }

    #[test]
    fn test_strokes_replace_frame_elsewhere_passes_through() {
        let mut canvas = FrameBuffer::new(4, 1);
        canvas.pixels[1] = rgb(0, 0, 255);
        canvas.pixels[2] = rgb(10, 10, 10); // too dark to count as paint

        let mut frame = FrameBuffer::filled(4, 1, rgb(200, 100, 50));
        composite(&mut frame, &canvas).unwrap();

        assert_eq!(frame.pixels[0], rgb(200, 100, 50));
        assert_eq!(frame.pixels[1], rgb(0, 0, 255));
        // OR-ed in, like a bitwise merge of the two images
        assert_eq!(frame.pixels[2], rgb(200, 100, 50) | rgb(10, 10, 10));
        assert_eq!(frame.pixels[3], rgb(200, 100, 50));
    }

    #[test]
    fn test_same_canvas_over_different_frames() {
        let mut canvas = FrameBuffer::new(8, 8);
        for i in 0..8 {
            canvas.pixels[i * 8 + i] = rgb(255, 255, 0);
        }
        let live_a = FrameBuffer::filled(8, 8, rgb(1, 2, 3));
        let live_b = FrameBuffer::filled(8, 8, rgb(90, 80, 70));

        let (mut out_a, mut out_b) = (live_a.clone(), live_b.clone());
        composite(&mut out_a, &canvas).unwrap();
        composite(&mut out_b, &canvas).unwrap();

        for i in 0..64 {
            if canvas.pixels[i] != 0 {
                assert_eq!(out_a.pixels[i], out_b.pixels[i]);
                assert_eq!(out_a.pixels[i], canvas.pixels[i]);
            } else {
                assert_eq!(out_a.pixels[i], live_a.pixels[i]);
                assert_eq!(out_b.pixels[i], live_b.pixels[i]);
                assert_ne!(out_a.pixels[i], out_b.pixels[i]);
            }
        }
    }

    #[test]
    fn test_empty_canvas_is_identity() {
        let canvas = FrameBuffer::new(3, 3);
        let live = FrameBuffer::filled(3, 3, rgb(12, 34, 56));
        let mut out = live.clone();
        composite(&mut out, &canvas).unwrap();
        assert_eq!(out, live);
    }

    #[test]
    fn test_size_mismatch() {
        let canvas = FrameBuffer::new(3, 3);
        let mut frame = FrameBuffer::new(4, 3);
        assert!(matches!(composite(&mut frame, &canvas), Err(Error::Composite(_))));
    }
}
