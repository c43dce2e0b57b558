// Runtime settings. The program takes no flags; a few `PAINTER_*` environment
// variables override the defaults (RUST_LOG controls logging separately).

use crate::error::Error;
use std::env;
use std::str::FromStr;

pub const FRAME_WIDTH: usize = 1280;
pub const FRAME_HEIGHT: usize = 720;

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub window_title: String,
    /// Size every camera frame is resized to before processing.
    pub frame_width: usize,
    pub frame_height: usize,
    /// Camera indices `0..camera_probe_count` are tried in order.
    pub camera_probe_count: u32,
    /// Mirror frames horizontally (selfie view), so moving your hand right moves the pointer right.
    pub mirror: bool,
    /// Detector program followed by its arguments.
    pub detector_command: Vec<String>,
    /// Hands scored below this are ignored.
    pub confidence_threshold: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window_title: "Virtual Painter".into(),
            frame_width: FRAME_WIDTH,
            frame_height: FRAME_HEIGHT,
            camera_probe_count: 5,
            mirror: true,
            detector_command: vec!["python3".into(), "hand_detect.py".into()],
            confidence_threshold: 0.5,
        }
    }
}

impl Config {
    /// Defaults, overridden by whatever `PAINTER_*` variables are set.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let mut config = Config::default();

        if let Some(v) = lookup("PAINTER_CAMERA_PROBE") {
            config.camera_probe_count = parse("PAINTER_CAMERA_PROBE", &v)?;
            if config.camera_probe_count == 0 {
                return Err(Error::Config("PAINTER_CAMERA_PROBE must be at least 1".into()));
            }
        }
        if let Some(v) = lookup("PAINTER_DETECTOR") {
            let command: Vec<String> = v.split_whitespace().map(String::from).collect();
            if command.is_empty() {
                return Err(Error::Config("PAINTER_DETECTOR is empty".into()));
            }
            config.detector_command = command;
        }
        if let Some(v) = lookup("PAINTER_CONFIDENCE") {
            let threshold: f32 = parse("PAINTER_CONFIDENCE", &v)?;
            if !(0.0..=1.0).contains(&threshold) {
                return Err(Error::Config(format!("PAINTER_CONFIDENCE out of range: {threshold}")));
            }
            config.confidence_threshold = threshold;
        }

        log::debug!("config: {:?}", config);
        Ok(config)
    }
}

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T, Error>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| Error::Config(format!("{key}={value:?}: {e}")))
}
