//! Audio feedback
//!
//! Tracks background music intent and plays the tap effect. The actual device
//! sits behind [`AudioOutput`]; the native build logs instead of playing.

use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Correct tap on the head tile
    Tap,
}

/// Background music playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicState {
    Stopped,
    Playing,
    Paused,
}

/// Device that actually produces sound
pub trait AudioOutput {
    /// Start the looping music track. Returns false if the device refused.
    fn start_music(&mut self, volume: f32) -> bool;
    fn pause_music(&mut self);
    fn resume_music(&mut self);
    /// Stop the track and release it
    fn stop_music(&mut self);
    fn set_music_volume(&mut self, volume: f32);
    fn play_effect(&mut self, effect: SoundEffect, volume: f32);
}

/// Output that only logs what would be played
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAudioOutput;

impl AudioOutput for LogAudioOutput {
    fn start_music(&mut self, volume: f32) -> bool {
        log::debug!("bgm: start (volume {:.2})", volume);
        true
    }

    fn pause_music(&mut self) {
        log::debug!("bgm: pause");
    }

    fn resume_music(&mut self) {
        log::debug!("bgm: resume");
    }

    fn stop_music(&mut self) {
        log::debug!("bgm: stop");
    }

    fn set_music_volume(&mut self, volume: f32) {
        log::debug!("bgm: volume {:.2}", volume);
    }

    fn play_effect(&mut self, effect: SoundEffect, volume: f32) {
        log::debug!("sfx: {:?} (volume {:.2})", effect, volume);
    }
}

/// One call made on a [`RecordingAudioOutput`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioCall {
    StartMusic(f32),
    PauseMusic,
    ResumeMusic,
    StopMusic,
    MusicVolume(f32),
    Effect(SoundEffect),
}

/// Output that records calls, for tests and headless runs
#[derive(Debug, Clone)]
pub struct RecordingAudioOutput {
    pub calls: Vec<AudioCall>,
    /// Value returned from `start_music`
    pub accept_music: bool,
}

impl Default for RecordingAudioOutput {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            accept_music: true,
        }
    }
}

impl AudioOutput for RecordingAudioOutput {
    fn start_music(&mut self, volume: f32) -> bool {
        self.calls.push(AudioCall::StartMusic(volume));
        self.accept_music
    }
    fn pause_music(&mut self) {
        self.calls.push(AudioCall::PauseMusic);
    }
    fn resume_music(&mut self) {
        self.calls.push(AudioCall::ResumeMusic);
    }
    fn stop_music(&mut self) {
        self.calls.push(AudioCall::StopMusic);
    }
    fn set_music_volume(&mut self, volume: f32) {
        self.calls.push(AudioCall::MusicVolume(volume));
    }
    fn play_effect(&mut self, effect: SoundEffect, _volume: f32) {
        self.calls.push(AudioCall::Effect(effect));
    }
}

/// Audio manager for the game
#[derive(Debug)]
pub struct AudioManager<O: AudioOutput> {
    output: O,
    music: MusicState,
    /// Music should be playing (set by play_bgm, cleared by stop_bgm).
    /// A resume without intent is ignored, so a stopped game-over screen
    /// stays silent when the app comes back to the foreground.
    should_play_bgm: bool,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
}

impl<O: AudioOutput> AudioManager<O> {
    pub fn new(output: O) -> Self {
        Self::from_settings(output, &Settings::default())
    }

    pub fn from_settings(output: O, settings: &Settings) -> Self {
        Self {
            output,
            music: MusicState::Stopped,
            should_play_bgm: false,
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
            music_volume: settings.music_volume.clamp(0.0, 1.0),
            muted: false,
        }
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn music_state(&self) -> MusicState {
        self.music
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
        self.push_music_volume();
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
        self.push_music_volume();
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.push_music_volume();
    }

    fn effective_sfx_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    fn effective_music_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }

    fn push_music_volume(&mut self) {
        if self.music != MusicState::Stopped {
            let vol = self.effective_music_volume();
            self.output.set_music_volume(vol);
        }
    }

    /// Start music and remember that it should be playing
    pub fn play_bgm(&mut self) {
        self.should_play_bgm = true;
        self.resume_bgm();
    }

    /// Resume music, but only if it is meant to be playing
    pub fn resume_bgm(&mut self) {
        if !self.should_play_bgm {
            return;
        }
        match self.music {
            MusicState::Playing => {}
            MusicState::Paused => {
                self.output.resume_music();
                self.music = MusicState::Playing;
            }
            MusicState::Stopped => {
                let vol = self.effective_music_volume();
                if self.output.start_music(vol) {
                    self.music = MusicState::Playing;
                } else {
                    log::warn!("Music device refused to start - bgm disabled");
                    self.stop_bgm();
                }
            }
        }
    }

    /// Pause music without clearing the intent to play
    pub fn pause_bgm(&mut self) {
        if self.music == MusicState::Playing {
            self.output.pause_music();
            self.music = MusicState::Paused;
        }
    }

    /// Stop music and clear the intent to play
    pub fn stop_bgm(&mut self) {
        self.should_play_bgm = false;
        if self.music != MusicState::Stopped {
            self.output.stop_music();
            self.music = MusicState::Stopped;
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_sfx_volume();
        if vol <= 0.0 {
            return;
        }
        self.output.play_effect(effect, vol);
    }
}
