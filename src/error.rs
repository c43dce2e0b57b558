// One error type for the whole painter.
// Every variant states *where* things went wrong.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Window init error: {0}")]
    WindowInit(String),   // Creating the window failed
    #[error("Window update error: {0}")]
    WindowUpdate(String), // Updating the window buffer failed
    #[error("Camera init error: {0}")]
    CameraInit(String),   // No camera could be opened/started
    #[error("Camera frame error: {0}")]
    CameraFrame(String),  // Grabbing/decoding a frame failed
    #[error("Hand detector error: {0}")]
    Detector(String),     // The landmark detector process misbehaved
    #[error("Composite error: {0}")]
    Composite(String),    // Canvas and frame disagree on size
    #[error("Config error: {0}")]
    Config(String),       // An environment override could not be parsed
    #[error("expected 0 or 21 keypoints, got {0}")]
    InvalidKeypoints(usize),
}
