// The color bar along the top of the screen.
// Visual: five filled boxes (red, green, blue, yellow, black "ERASER"). Pointing at one with two
// fingers up picks that color.

use crate::draw::{draw_text_5x7, fill_rect};
use crate::types::{rgb, FrameBuffer, Point};

/// Pointer y must be strictly above this to hit a palette box.
pub const BAR_BOTTOM: i32 = 100;
const BOX_TOP: i32 = 10;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tool {
    #[default]
    Red,
    Green,
    Blue,
    Yellow,
    Eraser,
}

impl Tool {
    /// Left to right, as they appear on the bar.
    pub const ALL: [Tool; 5] = [Tool::Red, Tool::Green, Tool::Blue, Tool::Yellow, Tool::Eraser];

    /// Paint color as 0x00RRGGBB. The eraser paints the empty-canvas color.
    pub const fn color(self) -> u32 {
        match self {
            Tool::Red => rgb(255, 0, 0),
            Tool::Green => rgb(0, 255, 0),
            Tool::Blue => rgb(0, 0, 255),
            Tool::Yellow => rgb(255, 255, 0),
            Tool::Eraser => 0,
        }
    }

    /// Exclusive x range of this tool's box: a pointer hits when `lo < x < hi`.
    pub const fn x_range(self) -> (i32, i32) {
        match self {
            Tool::Red => (10, 230),
            Tool::Green => (240, 460),
            Tool::Blue => (470, 690),
            Tool::Yellow => (700, 920),
            Tool::Eraser => (940, 1160),
        }
    }
}

/// Which palette box, if any, the pointer is over. Gaps between boxes and anything at or below
/// the bar hit nothing.
pub fn hit_test(pointer: Point) -> Option<Tool> {
    if pointer.y >= BAR_BOTTOM {
        return None;
    }
    Tool::ALL.into_iter().find(|tool| {
        let (lo, hi) = tool.x_range();
        lo < pointer.x && pointer.x < hi
    })
}

/// Draw the bar onto the live frame.
/// Visual: the boxes sit on top of the camera image every frame.
pub fn draw_bar(fb: &mut FrameBuffer) {
    for tool in Tool::ALL {
        let (lo, hi) = tool.x_range();
        fill_rect(fb, Point::new(lo, BOX_TOP), Point::new(hi, BAR_BOTTOM), tool.color());
    }
    let (eraser_lo, _) = Tool::Eraser.x_range();
    draw_text_5x7(fb, eraser_lo + 20, 34, "ERASER", 0x00_FF_FF_FF, 5);
}
