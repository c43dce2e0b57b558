// What you SEE:
// • Live (mirrored) camera with a color bar along the top.
// • Index + middle finger up: selection mode. Touch a box on the bar to pick that color
//   (the black box is the eraser).
// • Index finger only: drawing mode. Paint follows your fingertip and stays on screen.
// • ESC quits.

mod camera;
mod compositor;
mod config;
mod draw;
mod error;
mod hand;
mod landmark;
mod painter;
mod palette;
mod types;

use camera::CameraCapture;
use config::Config;
use draw::{Drawer, draw_text_5x7};
use error::Error;
use landmark::ProcessLandmarker;
use log::LevelFilter;
use painter::{Mode, Painter};
use std::time::{Duration, Instant};

fn init_logger() {
    env_logger::Builder::new()
        .filter(Some(env!("CARGO_CRATE_NAME")), LevelFilter::Debug)
        .parse_default_env()
        .try_init()
        .ok();
}

fn main() -> Result<(), Error> {
    init_logger();
    let config = Config::from_env()?;

    /* --- Camera, detector, window ---
       Visual: nothing yet; if no camera opens we exit here with a message. */
    let mut cam = CameraCapture::open_first(
        config.camera_probe_count,
        config.frame_width as u32,
        config.frame_height as u32,
        config.mirror,
    )?;
    let mut detector = ProcessLandmarker::spawn(&config.detector_command, config.confidence_threshold)?;
    let mut drawer = Drawer::new(&config.window_title, config.frame_width, config.frame_height)?;

    /* --- Painting session ---
       Visual: empty canvas, red brush. */
    let mut painter = Painter::new(config.frame_width, config.frame_height);

    /* --- HUD / FPS --- */
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut hud_fps_text = String::from("FPS: 0.0");
    let mut last_mode = Mode::Idle;

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        let now = Instant::now();

        // 1) Grab a fresh live frame. A dead camera ends the session, it isn't retried.
        let mut frame = match cam.next_frame() {
            Ok(frame) => frame,
            Err(e) => {
                log::error!("failed to grab frame from camera {}: {}", cam.index(), e);
                break;
            }
        };

        // 2) Hand -> gesture -> strokes, then canvas over live video.
        let mode = match painter.step(&mut detector, &mut frame) {
            Ok(mode) => mode,
            Err(e) => {
                log::error!("{}", e);
                break;
            }
        };
        if mode != last_mode {
            log::debug!("mode: {:?} -> {:?}", last_mode, mode);
            last_mode = mode;
        }

        // 3) HUD in the bottom-left corner, then present.
        let hud = format!("{:?} | {}", painter.tool(), hud_fps_text);
        let hud_y = frame.height as i32 - 16;
        draw_text_5x7(&mut frame, 8, hud_y, &hud, 0x00_FF_FF_FF, 1);
        drawer.present(&frame)?;

        // 4) FPS counter (log + HUD once per second)
        frames_this_second += 1;
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            let fps = frames_this_second as f32 / secs;
            log::debug!("FPS: {:.1}", fps);
            hud_fps_text = format!("FPS: {:.1}", fps);
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    // Camera and detector are released by their Drop impls, window closes with `drawer`.
    log::info!("session over");
    Ok(())
}
