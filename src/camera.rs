// Opens the first working camera and converts frames into a buffer suitable for the window.
// Visual expectation: when main.rs calls `next_frame()`, you get a Vec<u32> where each pixel is
// 0x00RRGGBB, already resized to the window and mirrored like a selfie view.

use crate::error::Error;
use crate::types::FrameBuffer;

// Bring in nokhwa types for camera control.
use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    },
};

// `image` does the resize + mirror on the decoded RGB frame.
use image::{ImageBuffer, Rgb, imageops};

// A small wrapper around nokhwa::Camera so our main loop stays clean.
pub struct CameraCapture {
    cam: Camera,
    index: u32,
    out_width: u32,
    out_height: u32,
    mirror: bool,
}

impl CameraCapture {
    /// Try camera indices `0..probe_count` in order and keep the first one that streams.
    /// Frames will be delivered at `out_width`x`out_height` whatever the device produces.
    pub fn open_first(
        probe_count: u32,
        out_width: u32,
        out_height: u32,
        mirror: bool,
    ) -> Result<Self, Error> {
        for index in 0..probe_count {
            match Self::open(index, out_width, out_height, mirror) {
                Ok(cam) => return Ok(cam),
                Err(e) => log::warn!("camera {}: {}", index, e),
            }
        }
        Err(Error::CameraInit(format!(
            "No webcam found (tried indices 0..{probe_count}). Please check camera permissions."
        )))
    }

    /// Open one camera index.
    /// On success, nothing is shown on screen yet — we just hold an open stream.
    pub fn open(index: u32, out_width: u32, out_height: u32, mirror: bool) -> Result<Self, Error> {
        let idx = CameraIndex::Index(index);

        let fmt = CameraFormat::new(
            Resolution::new(out_width, out_height),
            FrameFormat::MJPEG, // most webcams only reach 720p at 30 FPS compressed
            30,                 // target FPS
        );

        // Ask for RGB frames, as close as possible to the window size.
        let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

        // Create the camera (this fails if no device exists at this index).
        let mut cam = Camera::new(idx, req)
            .map_err(|e| Error::CameraInit(format!("Create camera: {e}")))?;

        // Start streaming frames from the camera.
        cam.open_stream()
            .map_err(|e| Error::CameraInit(format!("Open stream: {e}")))?;

        let actual = cam.resolution();
        log::info!(
            "opened camera {} at {}x{} (displaying {}x{})",
            index,
            actual.width(),
            actual.height(),
            out_width,
            out_height
        );

        Ok(Self { cam, index, out_width, out_height, mirror })
    }

    /// Grab one frame, scale it to the output size, optionally mirror it, and pack it as
    /// 0x00RRGGBB pixels.
    pub fn next_frame(&mut self) -> Result<FrameBuffer, Error> {
        // Pull a frame from the camera (this blocks until a new frame is ready).
        let frame = self
            .cam
            .frame()
            .map_err(|e| Error::CameraFrame(format!("Fetch frame: {e}")))?;

        // Decode to an ImageBuffer<Rgb<u8>, Vec<u8>> (handles various raw formats safely).
        let rgb_img = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| Error::CameraFrame(format!("Decode RGB: {e}")))?;

        Ok(to_frame_buffer(rgb_img, self.out_width, self.out_height, self.mirror))
    }

    pub fn index(&self) -> u32 {
        self.index
    }
}

impl Drop for CameraCapture {
    // Runs on every exit path out of the main loop, including errors.
    fn drop(&mut self) {
        match self.cam.stop_stream() {
            Ok(()) => log::info!("released camera {}", self.index),
            Err(e) => log::warn!("releasing camera {}: {}", self.index, e),
        }
    }
}

/// Resize (if needed), mirror and pack a decoded RGB image.
fn to_frame_buffer(
    img: ImageBuffer<Rgb<u8>, Vec<u8>>,
    width: u32,
    height: u32,
    mirror: bool,
) -> FrameBuffer {
    let mut img = if img.dimensions() == (width, height) {
        img
    } else {
        imageops::resize(&img, width, height, imageops::FilterType::Triangle)
    };
    if mirror {
        imageops::flip_horizontal_in_place(&mut img);
    }

    let pixels = img
        .pixels()
        .map(|p| ((p[0] as u32) << 16) | ((p[1] as u32) << 8) | p[2] as u32)
        .collect();

    FrameBuffer { width: width as usize, height: height as usize, pixels }
}
