//! Feedback cues and sound synthesis
//!
//! Games report cues; `Sfx` decides whether a cue is heard (enabled flag,
//! volume, rate limit) and turns it into procedurally generated tones - no
//! external files needed. Backends do the actual playing.

use serde::{Deserialize, Serialize};

use crate::settings::SfxSettings;

/// Discrete feedback events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cue {
    /// Button / UI press
    Click,
    /// Heart caught
    Pop,
    /// Game won
    Success,
    /// Bomb caught or patrol bumped
    Hazard,
    /// Game lost
    Failure,
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Waveform {
    Sine,
    Triangle,
    Square,
    Sawtooth,
}

/// One enveloped oscillator note
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tone {
    pub freq: f32,
    /// Seconds
    pub duration: f64,
    /// Peak gain
    pub volume: f32,
    pub waveform: Waveform,
    /// Seconds after the cue fires
    pub delay: f64,
}

const fn tone(freq: f32, duration: f64, volume: f32, waveform: Waveform, delay: f64) -> Tone {
    Tone {
        freq,
        duration,
        volume,
        waveform,
        delay,
    }
}

const CLICK: [Tone; 1] = [tone(960.0, 0.06, 0.05, Waveform::Triangle, 0.0)];
const POP: [Tone; 1] = [tone(640.0, 0.09, 0.06, Waveform::Sine, 0.0)];
// Rising arpeggio
const SUCCESS: [Tone; 3] = [
    tone(520.0, 0.08, 0.06, Waveform::Triangle, 0.0),
    tone(740.0, 0.08, 0.06, Waveform::Triangle, 0.08),
    tone(980.0, 0.10, 0.05, Waveform::Triangle, 0.16),
];
const HAZARD: [Tone; 1] = [tone(180.0, 0.14, 0.05, Waveform::Sawtooth, 0.0)];
// Sad descending pair
const FAILURE: [Tone; 2] = [
    tone(392.0, 0.12, 0.06, Waveform::Triangle, 0.0),
    tone(294.0, 0.18, 0.05, Waveform::Triangle, 0.12),
];

impl Cue {
    /// End-of-game cues; these are never rate limited
    pub fn is_terminal(self) -> bool {
        matches!(self, Cue::Success | Cue::Failure)
    }

    /// Tone recipe for this cue
    pub fn tones(self) -> &'static [Tone] {
        match self {
            Cue::Click => &CLICK,
            Cue::Pop => &POP,
            Cue::Success => &SUCCESS,
            Cue::Hazard => &HAZARD,
            Cue::Failure => &FAILURE,
        }
    }
}

/// Where games send their cues
pub trait FeedbackSink {
    /// Report a cue at host time `now_ms`
    fn cue(&mut self, cue: Cue, now_ms: f64);
}

/// Something that can make a tone audible
pub trait ToneBackend {
    fn play(&mut self, tone: &Tone);
}

/// Cue player with the preferences baked in at construction
#[derive(Debug)]
pub struct Sfx<B> {
    backend: B,
    enabled: bool,
    volume: f32,
    min_gap_ms: f64,
    last_play_ms: Option<f64>,
}

impl<B: ToneBackend> Sfx<B> {
    pub fn new(backend: B, settings: &SfxSettings) -> Self {
        Self {
            backend,
            enabled: settings.enabled,
            volume: settings.volume.clamp(0.0, 1.0),
            min_gap_ms: settings.min_gap_ms.max(0.0),
            last_play_ms: None,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

impl<B: ToneBackend> FeedbackSink for Sfx<B> {
    fn cue(&mut self, cue: Cue, now_ms: f64) {
        if !self.enabled || self.volume <= 0.0 {
            return;
        }
        if let Some(last) = self.last_play_ms {
            if !cue.is_terminal() && now_ms - last < self.min_gap_ms {
                log::debug!("Dropped {cue:?} cue ({:.0} ms after the last)", now_ms - last);
                return;
            }
        }
        self.last_play_ms = Some(now_ms);

        for tone in cue.tones() {
            let scaled = Tone {
                volume: tone.volume * self.volume,
                ..*tone
            };
            self.backend.play(&scaled);
        }
    }
}

/// Backend for hosts without audio: logs what would play
#[derive(Debug, Default)]
pub struct LogBackend {
    played: usize,
}

impl LogBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tones played so far
    pub fn played(&self) -> usize {
        self.played
    }
}

impl ToneBackend for LogBackend {
    fn play(&mut self, tone: &Tone) {
        self.played += 1;
        log::debug!(
            "♪ {:.0} Hz {:?} for {:.2}s (+{:.2}s) at {:.3}",
            tone.freq,
            tone.waveform,
            tone.duration,
            tone.delay,
            tone.volume
        );
    }
}

/// Web Audio backend: one oscillator + gain envelope per tone
#[cfg(target_arch = "wasm32")]
pub struct WebAudioBackend {
    ctx: Option<web_sys::AudioContext>,
}

#[cfg(target_arch = "wasm32")]
impl Default for WebAudioBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
impl WebAudioBackend {
    pub fn new() -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = web_sys::AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self { ctx }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    fn create_osc(
        ctx: &web_sys::AudioContext,
        tone: &Tone,
    ) -> Option<(web_sys::OscillatorNode, web_sys::GainNode)> {
        use web_sys::OscillatorType;

        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(match tone.waveform {
            Waveform::Sine => OscillatorType::Sine,
            Waveform::Triangle => OscillatorType::Triangle,
            Waveform::Square => OscillatorType::Square,
            Waveform::Sawtooth => OscillatorType::Sawtooth,
        });
        osc.frequency().set_value(tone.freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }
}

#[cfg(target_arch = "wasm32")]
impl ToneBackend for WebAudioBackend {
    fn play(&mut self, tone: &Tone) {
        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        let Some((osc, gain)) = Self::create_osc(ctx, tone) else {
            return;
        };
        let t = ctx.current_time() + tone.delay;

        // Exponential ramps cannot start from zero
        gain.gain().set_value_at_time(0.0001, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(tone.volume.max(0.0001), t + 0.01)
            .ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.0001, t + tone.duration)
            .ok();

        osc.start_with_when(t).ok();
        osc.stop_with_when(t + tone.duration + 0.02).ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder(Vec<Tone>);

    impl ToneBackend for Recorder {
        fn play(&mut self, tone: &Tone) {
            self.0.push(*tone);
        }
    }

    #[test]
    fn test_success_is_rising_arpeggio() {
        let tones = Cue::Success.tones();
        assert_eq!(tones.len(), 3);
        assert!(tones.windows(2).all(|w| w[0].freq < w[1].freq));
        assert!(tones.windows(2).all(|w| w[0].delay < w[1].delay));
    }

    #[test]
    fn test_disabled_sfx_is_silent() {
        let settings = SfxSettings {
            enabled: false,
            ..Default::default()
        };
        let mut sfx = Sfx::new(Recorder::default(), &settings);
        sfx.cue(Cue::Pop, 0.0);
        assert!(sfx.backend().0.is_empty());

        sfx.set_enabled(true);
        sfx.cue(Cue::Pop, 100.0);
        assert_eq!(sfx.backend().0.len(), 1);
    }

    #[test]
    fn test_cues_are_rate_limited() {
        let mut sfx = Sfx::new(Recorder::default(), &SfxSettings::default());
        sfx.cue(Cue::Click, 0.0);
        sfx.cue(Cue::Click, 39.0);
        sfx.cue(Cue::Click, 40.0);
        assert_eq!(sfx.backend().0.len(), 2);
    }

    #[test]
    fn test_terminal_cues_skip_rate_limit() {
        let mut sfx = Sfx::new(Recorder::default(), &SfxSettings::default());
        sfx.cue(Cue::Pop, 0.0);
        sfx.cue(Cue::Success, 16.0);
        sfx.cue(Cue::Failure, 20.0);
        let freqs: Vec<f32> = sfx.backend().0.iter().map(|t| t.freq).collect();
        assert_eq!(freqs, vec![640.0, 520.0, 740.0, 980.0, 392.0, 294.0]);

        // The gap still counts from the terminal cue
        sfx.cue(Cue::Click, 40.0);
        assert_eq!(sfx.backend().0.len(), 6);
    }

    #[test]
    fn test_volume_scales_tones() {
        let settings = SfxSettings {
            volume: 0.5,
            ..Default::default()
        };
        let mut sfx = Sfx::new(Recorder::default(), &settings);
        sfx.cue(Cue::Click, 0.0);
        let played = &sfx.backend().0;
        assert_eq!(played[0].volume, 0.025);
        assert_eq!(played[0].freq, 960.0);

        sfx.set_volume(0.0);
        sfx.cue(Cue::Click, 1000.0);
        assert_eq!(sfx.backend().0.len(), 1);
    }

    #[test]
    fn test_log_backend_counts() {
        let mut sfx = Sfx::new(LogBackend::new(), &SfxSettings::default());
        sfx.cue(Cue::Failure, 0.0);
        assert_eq!(sfx.backend().played(), 2);
    }
}
