//! Audio system using Web Audio API
//!
//! Sound effects and the background loop are synthesized with oscillators,
//! so nothing has to be downloaded.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::ui::SoundCue;

/// Seconds of music scheduled ahead of the audio clock
const MUSIC_LOOKAHEAD: f64 = 0.2;
/// Length of one melody step
const MUSIC_STEP: f64 = 0.22;
/// Loop melody in Hz; zero is a rest
const MELODY: [f32; 16] = [
    392.0, 0.0, 523.3, 392.0, 440.0, 0.0, 349.2, 0.0, 392.0, 0.0, 523.3, 587.3, 523.3, 440.0,
    392.0, 0.0,
];
/// Bass note under each half of the loop
const BASS: [f32; 2] = [98.0, 87.3];

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    music_bus: Option<GainNode>,
    sfx_volume: f32,
    music_volume: f32,
    next_step_time: f64,
    step: usize,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // Fails outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        let music_bus = ctx.as_ref().and_then(|ctx| {
            let bus = ctx.create_gain().ok()?;
            bus.gain().set_value(0.0);
            bus.connect_with_audio_node(&ctx.destination()).ok()?;
            Some(bus)
        });
        Self {
            ctx,
            music_bus,
            sfx_volume: 0.8,
            music_volume: 0.0,
            next_step_time: 0.0,
            step: 0,
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
        }
    }

    /// Background loop volume (0.0 - 1.0); zero silences the loop
    pub fn set_music_volume(&mut self, volume: f32) {
        self.music_volume = volume.clamp(0.0, 1.0);
        if let Some(bus) = &self.music_bus {
            bus.gain().set_value(self.music_volume * 0.3);
        }
    }

    /// Keep the background loop scheduled; call once per frame
    pub fn update_music(&mut self) {
        let Some(ctx) = &self.ctx else { return };
        let Some(bus) = &self.music_bus else { return };
        let now = ctx.current_time();
        if self.music_volume <= 0.0 || ctx.state() != web_sys::AudioContextState::Running {
            self.next_step_time = now;
            return;
        }
        // Fell behind (tab was hidden): restart from the clock
        if self.next_step_time < now {
            self.next_step_time = now;
        }

        while self.next_step_time < now + MUSIC_LOOKAHEAD {
            let t = self.next_step_time;
            let freq = MELODY[self.step % MELODY.len()];
            if freq > 0.0 {
                let length = MUSIC_STEP * 0.9;
                schedule_note(ctx, bus, freq, OscillatorType::Square, t, length, 0.25);
            }
            if self.step % 4 == 0 {
                let bass = BASS[(self.step / (MELODY.len() / 2)) % BASS.len()];
                let length = MUSIC_STEP * 3.5;
                schedule_note(ctx, bus, bass, OscillatorType::Triangle, t, length, 0.5);
            }
            self.step = (self.step + 1) % MELODY.len();
            self.next_step_time += MUSIC_STEP;
        }
    }

    /// Play the sound for a cue
    pub fn play(&self, cue: SoundCue) {
        let vol = self.sfx_volume;
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };
        self.resume();

        match cue {
            SoundCue::Explosion => self.play_explosion(ctx, vol),
            SoundCue::Lose => self.play_lose(ctx, vol),
            SoundCue::HoverButton => self.play_hover(ctx, vol),
            SoundCue::OpenButton => self.play_open(ctx, vol),
            SoundCue::BackButton => self.play_back(ctx, vol),
            SoundCue::ExitNo => self.play_exit_no(ctx, vol),
            SoundCue::ExitDisappointing => self.play_disappointed(ctx, vol),
            SoundCue::Footstep => self.play_footstep(ctx, vol),
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Bomb - low boom with a crack on top
    fn play_explosion(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();
        if let Some((osc, gain)) = self.create_osc(ctx, 110.0, OscillatorType::Sawtooth) {
            gain.gain().set_value_at_time(vol * 0.5, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.6)
                .ok();
            osc.frequency().set_value_at_time(110.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(25.0, t + 0.6)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.7).ok();
        }

        if let Some((osc, gain)) = self.create_osc(ctx, 1200.0, OscillatorType::Square) {
            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.08)
                .ok();
            osc.frequency().set_value_at_time(1200.0, t).ok();
            osc.frequency().set_value_at_time(300.0, t + 0.03).ok();
            osc.frequency().set_value_at_time(900.0, t + 0.05).ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.1).ok();
        }
    }

    /// Game over - sad descending
    fn play_lose(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [392.0, 349.2, 311.1, 261.6].iter().enumerate() {
            let delay = i as f64 * 0.25;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.35, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.35)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.4).ok();
            }
        }
    }

    /// Menu selection moved - short tick
    fn play_hover(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 880.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.15, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.05)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.06).ok();
    }

    /// Button activated - rising blip
    fn play_open(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 440.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.15)
            .ok();
        osc.frequency().set_value_at_time(440.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(880.0, t + 0.1)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.18).ok();
    }

    /// Back out of a screen - falling blip
    fn play_back(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 660.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.15)
            .ok();
        osc.frequency().set_value_at_time(660.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(330.0, t + 0.1)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.18).ok();
    }

    /// Exit prompt opened - two-note "uh oh"
    fn play_exit_no(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [523.3, 392.0].iter().enumerate() {
            let delay = i as f64 * 0.12;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Square) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.15, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.14).ok();
            }
        }
    }

    /// Confirmed exit - slow sad trombone, done before the app closes
    fn play_disappointed(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [293.7, 277.2, 261.6].iter().enumerate() {
            let delay = i as f64 * 0.22;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sawtooth) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.2, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.21).ok();
            }
        }

        // Long wobbling last note
        let t = ctx.current_time() + 0.66;
        if let Some((osc, gain)) = self.create_osc(ctx, 246.9, OscillatorType::Sawtooth) {
            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.22)
                .ok();
            osc.frequency().set_value_at_time(246.9, t).ok();
            osc.frequency().set_value_at_time(233.1, t + 0.07).ok();
            osc.frequency().set_value_at_time(246.9, t + 0.14).ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + 0.23).ok();
        }
    }

    /// Walking - soft low tap
    fn play_footstep(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 90.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.2, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.06)
            .ok();
        osc.frequency().set_value_at_time(90.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(50.0, t + 0.06)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.08).ok();
    }
}

/// One music note routed through the music bus
#[allow(clippy::too_many_arguments)]
fn schedule_note(
    ctx: &AudioContext,
    bus: &GainNode,
    freq: f32,
    osc_type: OscillatorType,
    t: f64,
    length: f64,
    level: f32,
) {
    let Ok(osc) = ctx.create_oscillator() else { return };
    let Ok(gain) = ctx.create_gain() else { return };
    osc.set_type(osc_type);
    osc.frequency().set_value(freq);
    if osc.connect_with_audio_node(&gain).is_err()
        || gain.connect_with_audio_node(bus).is_err()
    {
        return;
    }
    gain.gain().set_value_at_time(level, t).ok();
    gain.gain()
        .exponential_ramp_to_value_at_time(0.01, t + length)
        .ok();
    osc.start_with_when(t).ok();
    osc.stop_with_when(t + length + 0.02).ok();
}
