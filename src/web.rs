//! Browser bindings
//!
//! The page owns rendering and event listeners; it forwards animation-frame
//! timestamps and input here and draws from the JSON view each frame.

use wasm_bindgen::prelude::*;

use crate::audio::{Sfx, WebAudioBackend};
use crate::session::{CatchSession, MazeSession};
use crate::settings::Settings;

/// Longest frame gap fed to the simulation (tab switches, breakpoints)
const MAX_FRAME_MS: f64 = 100.0;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Heart Arcade loaded");
}

/// Turn an optional JS function into a completion callback
fn completion(on_won: Option<js_sys::Function>) -> impl FnMut() + 'static {
    move || {
        if let Some(f) = &on_won {
            if let Err(e) = f.call0(&JsValue::NULL) {
                log::warn!("Completion callback threw: {e:?}");
            }
        }
    }
}

/// Tracks animation-frame timestamps
#[derive(Default)]
struct FrameClock {
    last_time: Option<f64>,
}

impl FrameClock {
    /// Milliseconds since the previous frame (clamped)
    fn elapsed(&mut self, time_ms: f64) -> f64 {
        let dt = match self.last_time {
            Some(last) => (time_ms - last).clamp(0.0, MAX_FRAME_MS),
            None => 0.0,
        };
        self.last_time = Some(time_ms);
        dt
    }
}

#[wasm_bindgen]
pub struct CatchGame {
    session: CatchSession<Sfx<WebAudioBackend>>,
    clock: FrameClock,
}

#[wasm_bindgen]
impl CatchGame {
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: Option<String>, on_won: Option<js_sys::Function>) -> CatchGame {
        let settings = Settings::load_from(settings_json);
        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        let sfx = Sfx::new(WebAudioBackend::new(), &settings.sfx);
        let session = CatchSession::new(&settings, seed, sfx).on_won(completion(on_won));
        CatchGame {
            session,
            clock: FrameClock::default(),
        }
    }

    /// Call from requestAnimationFrame with its timestamp
    pub fn update(&mut self, time_ms: f64) {
        let dt = self.clock.elapsed(time_ms);
        self.session.update(dt);
    }

    /// Pointer/touch x relative to the play field
    pub fn pointer_move(&mut self, x: f32) {
        self.session.pointer_moved(x);
    }

    pub fn resize(&mut self, width: f32) {
        self.session.resize(width);
    }

    pub fn set_autopilot(&mut self, on: bool) {
        self.session.set_autopilot(on);
    }

    pub fn restart(&mut self) {
        self.session.restart();
    }

    /// UI button pressed
    pub fn click(&mut self) {
        self.session.sink().backend().resume();
        self.session.click();
    }

    /// Current state for drawing
    pub fn view_json(&self) -> String {
        serde_json::to_string(self.session.state()).unwrap_or_default()
    }
}

#[wasm_bindgen]
pub struct MazeGame {
    session: MazeSession<Sfx<WebAudioBackend>>,
    clock: FrameClock,
}

#[wasm_bindgen]
impl MazeGame {
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: Option<String>, on_won: Option<js_sys::Function>) -> MazeGame {
        let settings = Settings::load_from(settings_json);
        let sfx = Sfx::new(WebAudioBackend::new(), &settings.sfx);
        let session = MazeSession::new(&settings, sfx).on_won(completion(on_won));
        MazeGame {
            session,
            clock: FrameClock::default(),
        }
    }

    pub fn update(&mut self, time_ms: f64) {
        let dt = self.clock.elapsed(time_ms);
        self.session.update(dt);
    }

    /// Keyboard `key` value; returns true when the maze used it
    pub fn key_down(&mut self, key: &str) -> bool {
        self.session.press_key(key).is_some()
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }

    pub fn dismiss(&mut self) {
        self.session.dismiss();
    }

    pub fn click(&mut self) {
        self.session.sink().backend().resume();
        self.session.click();
    }

    pub fn view_json(&self) -> String {
        serde_json::to_string(&self.session.state().view()).unwrap_or_default()
    }
}
