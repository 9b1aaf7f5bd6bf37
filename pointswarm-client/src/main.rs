use std::path::{Path, PathBuf};

use pointswarm_core::{ControlRequest, Variant, config::Config};
use sdl2::keyboard::Keycode;

use crate::{
    abs::App,
    camera::OrbitCamera,
    other::{KeyboardState, MouseState, UpdateContext},
    render::animator::Animator,
};

mod abs;
mod camera;
mod logging;
mod other;
mod render;

/// Intensity change per key press.
const INTENSITY_STEP: f32 = 0.1;

/// Uses the configured shader directory if it exists, otherwise the one
/// shipped next to this crate.
fn resolve_shader_dir(config: &Config) -> PathBuf {
    if config.shader_dir.is_dir() {
        return config.shader_dir.clone();
    }
    let bundled = Path::new(env!("CARGO_MANIFEST_DIR")).join("shaders");
    log::warn!(
        "Shader directory {} not found, falling back to {}",
        config.shader_dir.display(),
        bundled.display()
    );
    bundled
}

/// Maps this frame's key presses to animator requests. `0` restores
/// `default_intensity`.
fn key_requests(ctx: &UpdateContext, default_intensity: f32) -> Vec<ControlRequest> {
    let mut requests = Vec::new();
    for keycode in &ctx.keyboard.pressed {
        let request = match *keycode {
            Keycode::Tab => ControlRequest::NextVariant,
            Keycode::Num1 => ControlRequest::SelectVariant(Variant::Swarm),
            Keycode::Num2 => ControlRequest::SelectVariant(Variant::Honeycomb),
            Keycode::Num3 => ControlRequest::SelectVariant(Variant::Cloud),
            Keycode::Space => ControlRequest::TogglePlay,
            Keycode::Up => ControlRequest::NudgeIntensity(INTENSITY_STEP),
            Keycode::Down => ControlRequest::NudgeIntensity(-INTENSITY_STEP),
            Keycode::Num0 => ControlRequest::SetIntensity(default_intensity),
            Keycode::R => ControlRequest::Reload,
            _ => continue,
        };
        requests.push(request);
    }
    requests
}

fn main() {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let (config, config_warning) = Config::load_or_default(config_path.as_deref());

    if let Err(err) = logging::init(&config.log_level) {
        eprintln!("Failed to set up logging: {err}");
    }
    if let Some(warning) = config_warning {
        log::warn!("{warning}");
    }

    let mut app = match App::new(&config.window) {
        Ok(app) => app,
        Err(err) => {
            log::error!("Could not open an OpenGL 3.3 window: {err}");
            std::process::exit(1);
        }
    };

    let shader_dir = resolve_shader_dir(&config);
    let (width, height) = app.size();
    let mut animator = match Animator::init(&app.gl, &config, &shader_dir, width, height) {
        Ok(animator) => animator,
        Err(err) => {
            log::error!("Could not set up the animator: {err}");
            std::process::exit(1);
        }
    };
    log::info!("Tab/1-3 switch demo, Space pauses, Up/Down change intensity, 0 resets it, R reloads shaders");

    let mut camera = OrbitCamera::default();
    let mut keyboard_state = KeyboardState::default();
    let mut mouse_state = MouseState::default();
    let mut last_frame_time = std::time::Instant::now();
    let mut title_timer = 0.0;

    'running: loop {
        let now = std::time::Instant::now();
        let delta_time = now.duration_since(last_frame_time).as_secs_f32();
        last_frame_time = now;

        other::begin_frame(&mut keyboard_state, &mut mouse_state);

        for event in app.event_pump.poll_iter() {
            other::track_event(&mut keyboard_state, &mut mouse_state, &event);
            match event {
                sdl2::event::Event::Quit { .. } => break 'running,
                sdl2::event::Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'running,
                sdl2::event::Event::Window {
                    win_event: sdl2::event::WindowEvent::SizeChanged(..),
                    ..
                } => {
                    let (width, height) = app.window.drawable_size();
                    animator.resize(width, height);
                }
                _ => {}
            }
        }

        let update_ctx = UpdateContext::new(&keyboard_state, &mouse_state, delta_time);
        for request in key_requests(&update_ctx, config.intensity) {
            animator.request(request);
        }
        camera.update(&update_ctx);

        animator.update_and_draw(update_ctx.delta_time, &camera);
        app.window.gl_swap_window();

        title_timer += delta_time;
        if title_timer >= 0.25 {
            title_timer = 0.0;
            let title = format!(
                "{} - {} - intensity {:.1}{} - FPS: {:.0}",
                config.window.title,
                animator.active_variant(),
                animator.intensity(),
                if animator.playing() { "" } else { " (paused)" },
                1.0 / delta_time.max(f32::EPSILON)
            );
            if let Err(err) = app.window.set_title(&title) {
                log::debug!("Could not set window title: {err}");
            }
        }
    }

    animator.cleanup();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requests_for(keys: &[Keycode], default_intensity: f32) -> Vec<ControlRequest> {
        let mut keyboard = KeyboardState::default();
        keyboard.pressed.extend(keys.iter().copied());
        let mouse = MouseState::default();
        key_requests(&UpdateContext::new(&keyboard, &mouse, 0.016), default_intensity)
    }

    #[test]
    fn test_zero_resets_intensity() {
        assert_eq!(requests_for(&[Keycode::Num0], 2.5), vec![ControlRequest::SetIntensity(2.5)]);
    }

    #[test]
    fn test_intensity_keys_nudge() {
        assert_eq!(requests_for(&[Keycode::Up], 1.0), vec![ControlRequest::NudgeIntensity(INTENSITY_STEP)]);
        assert_eq!(requests_for(&[Keycode::Down], 1.0), vec![ControlRequest::NudgeIntensity(-INTENSITY_STEP)]);
    }

    #[test]
    fn test_unmapped_keys_are_ignored() {
        assert!(requests_for(&[Keycode::Q, Keycode::Escape], 1.0).is_empty());
    }
}
