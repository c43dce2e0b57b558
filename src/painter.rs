// The painting session: gesture -> mode -> strokes on a persistent canvas.
// Visual expectation per frame:
// • palette bar always at the top,
// • two fingers up: a colored rectangle between the fingertips; touching a box picks its color,
// • index finger only: a dot under the fingertip, "DRAWING MODE", and paint follows the finger,
// • strokes stay on screen across frames.

use crate::compositor::composite;
use crate::draw::{draw_hand_skeleton, draw_text_5x7, draw_thick_line, fill_circle, fill_rect};
use crate::error::Error;
use crate::hand::{Finger, FingerFlags, KeypointSet};
use crate::landmark::LandmarkSource;
use crate::palette::{self, Tool};
use crate::types::{FrameBuffer, Point};

pub const BRUSH_THICKNESS: u32 = 10;
pub const ERASER_THICKNESS: u32 = 50;
const POINTER_RADIUS: i32 = 15;
const DRAW_LABEL_POS: Point = Point::new(900, 600);
const DRAW_LABEL_COLOR: u32 = 0x00_00_FF_FF;

/// What the hand is doing this frame. Recomputed every frame, never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Idle,
    /// Index and middle finger up.
    Select,
    /// Index finger up, middle finger down.
    Draw,
}

impl Mode {
    pub fn from_flags(flags: Option<FingerFlags>) -> Self {
        let Some(flags) = flags else { return Mode::Idle };
        match (flags.is_up(Finger::Index), flags.is_up(Finger::Middle)) {
            (true, true) => Mode::Select,
            (true, false) => Mode::Draw,
            _ => Mode::Idle,
        }
    }
}

pub struct Painter {
    canvas: FrameBuffer,
    tool: Tool,
    /// Start of the next stroke segment; None when no stroke is in progress.
    prev: Option<Point>,
}

impl Painter {
    /// Fresh session: empty canvas, red brush, no stroke in progress.
    pub fn new(width: usize, height: usize) -> Self {
        Self { canvas: FrameBuffer::new(width, height), tool: Tool::default(), prev: None }
    }

    #[cfg(test)]
    pub fn canvas(&self) -> &FrameBuffer {
        &self.canvas
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    #[cfg(test)]
    pub fn stroke_origin(&self) -> Option<Point> {
        self.prev
    }

    /// One full frame: detect the hand, update mode/color/stroke, then composite the canvas
    /// into `frame` (which becomes the image to display).
    pub fn step<S: LandmarkSource + ?Sized>(
        &mut self,
        source: &mut S,
        frame: &mut FrameBuffer,
    ) -> Result<Mode, Error> {
        palette::draw_bar(frame);

        let keypoints = source.detect(frame)?;
        draw_hand_skeleton(frame, &keypoints);
        let flags = source.fingers_up(&keypoints);

        let mode = self.update(frame, &keypoints, flags);
        composite(frame, &self.canvas)?;
        Ok(mode)
    }

    /// Apply one frame's gesture. `flags` is None when no hand was found, and then nothing but
    /// the stroke reset happens.
    pub fn update(
        &mut self,
        frame: &mut FrameBuffer,
        keypoints: &KeypointSet,
        flags: Option<FingerFlags>,
    ) -> Mode {
        let mode = Mode::from_flags(flags);
        let (Some(index), Some(middle)) = (keypoints.index_tip(), keypoints.middle_tip()) else {
            self.prev = None;
            return Mode::Idle;
        };
        log::trace!("mode {:?}, index tip {:?}, middle tip {:?}", mode, index, middle);

        match mode {
            Mode::Idle => {
                // Closing the hand ends the stroke; resuming starts a new one.
                self.prev = None;
            }
            Mode::Select => {
                self.prev = None;
                if let Some(tool) = palette::hit_test(index) {
                    if tool != self.tool {
                        log::debug!("tool: {:?} -> {:?}", self.tool, tool);
                    }
                    self.tool = tool;
                }
                fill_rect(frame, index, middle, self.tool.color());
            }
            Mode::Draw => {
                let Point { x, y } = DRAW_LABEL_POS;
                draw_text_5x7(frame, x, y, "DRAWING MODE", DRAW_LABEL_COLOR, 3);
                fill_circle(frame, index, POINTER_RADIUS, self.tool.color());

                // The first frame of a stroke only records where it starts.
                if let Some(prev) = self.prev {
                    let thickness = self.thickness();
                    let color = self.tool.color();
                    draw_thick_line(frame, prev, index, thickness, color);
                    draw_thick_line(&mut self.canvas, prev, index, thickness, color);
                }
                self.prev = Some(index);
            }
        }
        mode
    }

    /// Stroke width of the active tool.
    pub fn thickness(&self) -> u32 {
        match self.tool {
            Tool::Eraser => ERASER_THICKNESS,
            _ => BRUSH_THICKNESS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::fixtures::{draw_at, fist, select_at};
    use crate::hand::fingers_up;
    use crate::types::rgb;
    use std::collections::VecDeque;

    const W: usize = 1280;
    const H: usize = 720;

    /// Replays prepared keypoint sets, one per frame.
    struct Scripted(VecDeque<KeypointSet>);

    impl LandmarkSource for Scripted {
        fn detect(&mut self, _frame: &FrameBuffer) -> Result<KeypointSet, Error> {
            Ok(self.0.pop_front().unwrap_or_default())
        }
    }

    fn apply(painter: &mut Painter, keypoints: KeypointSet) -> Mode {
        let mut frame = FrameBuffer::new(W, H);
        let flags = fingers_up(&keypoints);
        painter.update(&mut frame, &keypoints, flags)
    }

    fn painted(painter: &Painter) -> usize {
        painter.canvas().pixels.iter().filter(|&&p| p != 0).count()
    }

    #[test]
    fn test_mode_from_flags() {
        let flags = |index, middle| Some(FingerFlags([false, index, middle, false, false]));
        assert_eq!(Mode::from_flags(None), Mode::Idle);
        assert_eq!(Mode::from_flags(flags(true, true)), Mode::Select);
        assert_eq!(Mode::from_flags(flags(true, false)), Mode::Draw);
        assert_eq!(Mode::from_flags(flags(false, true)), Mode::Idle);
        assert_eq!(Mode::from_flags(flags(false, false)), Mode::Idle);
        // other fingers don't matter
        assert_eq!(Mode::from_flags(Some(FingerFlags([true, true, false, true, true]))), Mode::Draw);
    }

    #[test]
    fn test_select_red_persists_through_drawing() {
        let mut painter = Painter::new(W, H);
        assert_eq!(apply(&mut painter, select_at(Point::new(500, 50))), Mode::Select);
        assert_eq!(painter.tool(), Tool::Blue);

        assert_eq!(apply(&mut painter, select_at(Point::new(100, 50))), Mode::Select);
        assert_eq!(painter.tool(), Tool::Red);

        for x in [300, 320, 340] {
            assert_eq!(apply(&mut painter, draw_at(Point::new(x, 400))), Mode::Draw);
            assert_eq!(painter.tool(), Tool::Red);
        }
        assert_eq!(painter.canvas().get(320, 400), Some(Tool::Red.color()));
    }

    #[test]
    fn test_select_in_gap_or_below_bar_keeps_color() {
        let mut painter = Painter::new(W, H);
        apply(&mut painter, select_at(Point::new(800, 50)));
        assert_eq!(painter.tool(), Tool::Yellow);

        apply(&mut painter, select_at(Point::new(465, 50)));
        assert_eq!(painter.tool(), Tool::Yellow);

        apply(&mut painter, select_at(Point::new(100, 300)));
        assert_eq!(painter.tool(), Tool::Yellow);
        assert_eq!(painted(&painter), 0);
    }

    #[test]
    fn test_first_draw_frame_only_sets_origin() {
        let mut painter = Painter::new(W, H);
        apply(&mut painter, draw_at(Point::new(200, 300)));
        assert_eq!(painter.stroke_origin(), Some(Point::new(200, 300)));
        assert_eq!(painted(&painter), 0);
    }

    #[test]
    fn test_two_draw_frames_make_one_segment() {
        let (a, b) = (Point::new(200, 300), Point::new(260, 340));

        let mut painter = Painter::new(W, H);
        apply(&mut painter, draw_at(a));
        apply(&mut painter, draw_at(b));

        let mut expected = FrameBuffer::new(W, H);
        draw_thick_line(&mut expected, a, b, BRUSH_THICKNESS, Tool::Red.color());
        assert_eq!(painter.canvas(), &expected);
        assert_eq!(painter.stroke_origin(), Some(b));
    }

    #[test]
    fn test_select_breaks_the_stroke() {
        let mut painter = Painter::new(W, H);
        apply(&mut painter, draw_at(Point::new(200, 300)));
        apply(&mut painter, select_at(Point::new(600, 500)));
        assert_eq!(painter.stroke_origin(), None);

        apply(&mut painter, draw_at(Point::new(900, 300)));
        assert_eq!(painted(&painter), 0);
    }

    #[test]
    fn test_idle_and_lost_hand_break_the_stroke() {
        let mut painter = Painter::new(W, H);
        apply(&mut painter, draw_at(Point::new(200, 300)));
        assert_eq!(apply(&mut painter, fist()), Mode::Idle);
        assert_eq!(painter.stroke_origin(), None);

        apply(&mut painter, draw_at(Point::new(210, 300)));
        assert_eq!(apply(&mut painter, KeypointSet::empty()), Mode::Idle);
        assert_eq!(painter.stroke_origin(), None);

        apply(&mut painter, draw_at(Point::new(900, 600)));
        assert_eq!(painted(&painter), 0);
    }

    #[test]
    fn test_blue_then_eraser_scenario() {
        let mut painter = Painter::new(W, H);

        apply(&mut painter, select_at(Point::new(500, 50)));
        assert_eq!(painter.tool(), Tool::Blue);
        apply(&mut painter, draw_at(Point::new(100, 100)));
        apply(&mut painter, draw_at(Point::new(150, 120)));
        let blue_before = painter.canvas().pixels.iter().filter(|&&p| p == Tool::Blue.color()).count();
        assert!(blue_before > 0);

        apply(&mut painter, select_at(Point::new(1000, 50)));
        assert_eq!(painter.tool(), Tool::Eraser);
        assert_eq!(painter.thickness(), ERASER_THICKNESS);
        apply(&mut painter, draw_at(Point::new(120, 110)));
        apply(&mut painter, draw_at(Point::new(140, 115)));

        let canvas = painter.canvas();
        let blue_after = canvas.pixels.iter().filter(|&&p| p == Tool::Blue.color()).count();
        // partially erased: some blue is gone, some survives outside the eraser's reach
        assert!(blue_after > 0);
        assert!(blue_after < blue_before);
        assert_eq!(canvas.get(130, 112), Some(0));
        assert_eq!(canvas.get(150, 120), Some(0));
        // the round cap behind the stroke's start is out of the eraser's reach
        assert_eq!(canvas.get(96, 98), Some(Tool::Blue.color()));
    }

    #[test]
    fn test_eraser_stroke_is_wider() {
        let run = |tool_x: i32| {
            let mut painter = Painter::new(W, H);
            apply(&mut painter, select_at(Point::new(tool_x, 50)));
            // fill the area first so erasing shows up
            painter.canvas = FrameBuffer::filled(W, H, rgb(9, 9, 9));
            apply(&mut painter, draw_at(Point::new(300, 400)));
            apply(&mut painter, draw_at(Point::new(500, 400)));
            let color = painter.tool().color();
            (0..H as i32).filter(|&y| painter.canvas().get(400, y) == Some(color)).count()
        };
        let brush = run(100);
        let eraser = run(1000);
        assert_eq!(brush, 2 * (BRUSH_THICKNESS / 2) as usize + 1);
        assert_eq!(eraser, 2 * (ERASER_THICKNESS / 2) as usize + 1);
        assert!(eraser > brush);
    }

    #[test]
    fn test_step_composites_canvas_over_live_frame() {
        let mut source = Scripted(VecDeque::from([
            draw_at(Point::new(400, 400)),
            draw_at(Point::new(500, 400)),
            KeypointSet::empty(),
        ]));
        let mut painter = Painter::new(W, H);
        let live = rgb(60, 60, 60);

        let mut frame = FrameBuffer::filled(W, H, live);
        assert_eq!(painter.step(&mut source, &mut frame).unwrap(), Mode::Draw);
        let mut frame = FrameBuffer::filled(W, H, live);
        assert_eq!(painter.step(&mut source, &mut frame).unwrap(), Mode::Draw);

        // no hand: the stroke and palette remain, the rest is live video
        let mut frame = FrameBuffer::filled(W, H, live);
        assert_eq!(painter.step(&mut source, &mut frame).unwrap(), Mode::Idle);
        assert_eq!(frame.get(450, 400), Some(Tool::Red.color()));
        assert_eq!(frame.get(450, 200), Some(live));
        assert_eq!(frame.get(800, 50), Some(Tool::Yellow.color()));
        // the "DRAWING MODE" label is only shown while drawing
        assert_eq!(frame.get(DRAW_LABEL_POS.x, DRAW_LABEL_POS.y), Some(live));
    }
}
