//! Hand landmark sources.
//!
//! The painter never looks at pixels to find the hand itself; it asks a [`LandmarkSource`]. The
//! real one, [`ProcessLandmarker`], talks to an external detector program (e.g. a MediaPipe hand
//! landmarker script) over stdin/stdout:
//!
//! 1. On startup the detector prints a single `READY` line.
//! 2. Per frame we write `width`, `height`, `channels` as little-endian `u32`, then
//!    `width * height * channels` bytes of packed RGB.
//! 3. The detector answers with one JSON line:
//!    `{"hands":[{"handedness":"Right","score":0.97,"landmarks":[{"x":..,"y":..,"z":..}, ...]}],"error":null}`
//!    where `x`/`y` are normalized to `0.0..=1.0` of the frame size.

use crate::error::Error;
use crate::hand::{self, FingerFlags, KeypointSet, LANDMARK_COUNT};
use crate::types::{FrameBuffer, Point};
use serde::Deserialize;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

/// Anything that can find (at most) one hand in a frame.
pub trait LandmarkSource {
    /// Keypoints of the hand in `frame`, in pixel coordinates, or an empty set for "no hand".
    fn detect(&mut self, frame: &FrameBuffer) -> Result<KeypointSet, Error>;

    /// Finger-up flags for keypoints returned by [`detect`](Self::detect). Sources whose
    /// detector classifies fingers itself can override this.
    fn fingers_up(&self, keypoints: &KeypointSet) -> Option<FingerFlags> {
        hand::fingers_up(keypoints)
    }
}

#[derive(Deserialize, Debug)]
struct LandmarkJson {
    x: f32,
    y: f32,
    #[allow(dead_code)]
    #[serde(default)]
    z: f32,
}

#[derive(Deserialize, Debug)]
struct HandJson {
    #[serde(default)]
    handedness: String,
    score: f32,
    landmarks: Vec<LandmarkJson>,
}

#[derive(Deserialize, Debug)]
struct DetectionResult {
    #[serde(default)]
    hands: Vec<HandJson>,
    #[serde(default)]
    error: Option<String>,
}

/// Normalized coordinate that can still be mapped to a pixel near the frame.
fn plausible(v: f32) -> bool {
    v.is_finite() && (-1.0..=2.0).contains(&v)
}

/// Turn one JSON reply into pixel keypoints for a `width`x`height` frame.
/// The first hand scoring at least `min_score` with a full set of landmarks wins.
fn parse_reply(line: &str, width: usize, height: usize, min_score: f32) -> Result<KeypointSet, Error> {
    let result: DetectionResult = serde_json::from_str(line.trim())
        .map_err(|e| Error::Detector(format!("bad reply {:?}: {e}", line.trim())))?;

    if let Some(error) = result.error {
        log::warn!("detector error: {}", error);
        return Ok(KeypointSet::empty());
    }

    for hand in result.hands {
        if hand.score < min_score {
            log::trace!("ignoring {} hand, score {:.2}", hand.handedness, hand.score);
            continue;
        }
        if hand.landmarks.len() != LANDMARK_COUNT {
            log::warn!("expected {} landmarks, got {}", LANDMARK_COUNT, hand.landmarks.len());
            continue;
        }
        // Slightly off-screen is normal near the frame edge; anything further is garbage.
        if let Some(lm) = hand.landmarks.iter().find(|lm| !plausible(lm.x) || !plausible(lm.y)) {
            log::warn!("ignoring hand with landmark out of range: ({}, {})", lm.x, lm.y);
            continue;
        }
        let points = hand
            .landmarks
            .iter()
            .map(|lm| Point::new((lm.x * width as f32) as i32, (lm.y * height as f32) as i32))
            .collect();
        log::trace!("{} hand, score {:.2}", hand.handedness, hand.score);
        return KeypointSet::new(points);
    }

    Ok(KeypointSet::empty())
}

/// Runs the detector as a child process for the lifetime of the session.
pub struct ProcessLandmarker {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    min_score: f32,
    /// Reused per frame to avoid reallocating the RGB payload.
    payload: Vec<u8>,
}

impl ProcessLandmarker {
    /// Spawn `command` (program followed by arguments) and wait for it to print `READY`.
    pub fn spawn(command: &[String], min_score: f32) -> Result<Self, Error> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| Error::Detector("empty detector command".into()))?;

        log::info!("starting hand detector: {}", command.join(" "));
        let mut process = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| Error::Detector(format!("spawn {program}: {e}")))?;

        let stdin = process.stdin.take().ok_or_else(|| Error::Detector("no stdin pipe".into()))?;
        let stdout = process.stdout.take().ok_or_else(|| Error::Detector("no stdout pipe".into()))?;
        let mut stdout = BufReader::new(stdout);

        let mut ready = String::new();
        stdout
            .read_line(&mut ready)
            .map_err(|e| Error::Detector(format!("waiting for READY: {e}")))?;
        if ready.trim() != "READY" {
            let _ = process.kill();
            let _ = process.wait();
            return Err(Error::Detector(format!("detector did not signal ready, got {:?}", ready.trim())));
        }
        log::info!("hand detector ready");

        Ok(Self { process, stdin, stdout, min_score, payload: Vec::new() })
    }
}

/// Fill `out` with the little-endian header and packed RGB bytes of `frame`.
fn encode_frame(frame: &FrameBuffer, out: &mut Vec<u8>) {
    out.clear();
    out.reserve(12 + frame.pixels.len() * 3);
    for v in [frame.width as u32, frame.height as u32, 3] {
        out.extend_from_slice(&v.to_le_bytes());
    }
    for &px in &frame.pixels {
        out.extend_from_slice(&[(px >> 16) as u8, (px >> 8) as u8, px as u8]);
    }
}

impl LandmarkSource for ProcessLandmarker {
    fn detect(&mut self, frame: &FrameBuffer) -> Result<KeypointSet, Error> {
        encode_frame(frame, &mut self.payload);
        self.stdin
            .write_all(&self.payload)
            .and_then(|()| self.stdin.flush())
            .map_err(|e| Error::Detector(format!("send frame: {e}")))?;

        let mut line = String::new();
        let n = self
            .stdout
            .read_line(&mut line)
            .map_err(|e| Error::Detector(format!("read reply: {e}")))?;
        if n == 0 {
            return Err(Error::Detector("detector exited".into()));
        }
        parse_reply(&line, frame.width, frame.height, self.min_score)
    }
}

impl Drop for ProcessLandmarker {
    fn drop(&mut self) {
        // Kill the detector with the session; it would otherwise block on stdin forever.
        let _ = self.process.kill();
        let _ = self.process.wait();
    }
}
