//! Feedback sink interface
//!
//! The engine reports observable transitions here (tap success, failure,
//! pause/resume, session start/reset). Calls are fire-and-forget: a sink must
//! not block and cannot fail the engine.

use crate::audio::{AudioManager, AudioOutput, LogAudioOutput, SoundEffect};
use crate::haptics::{HapticOutput, HapticsManager, LogHapticOutput, VibrationPattern};
use crate::settings::Settings;

/// Side effects triggered by engine transitions. Every method defaults to a no-op.
pub trait FeedbackSink {
    /// Correct tap on the head tile
    fn on_tap_success(&mut self) {}
    /// Wrong or stale tap (ends the game)
    fn on_tap_fail(&mut self) {}
    /// A tile fell past the bottom edge
    fn on_game_over(&mut self) {}
    fn on_pause_audio(&mut self) {}
    fn on_resume_audio(&mut self) {}
    /// Session began, start ambient audio
    fn on_session_start(&mut self) {}
    /// State was reset, halt ambient audio
    fn on_session_reset(&mut self) {}
}

impl<F: FeedbackSink + ?Sized> FeedbackSink for Box<F> {
    fn on_tap_success(&mut self) {
        (**self).on_tap_success()
    }
    fn on_tap_fail(&mut self) {
        (**self).on_tap_fail()
    }
    fn on_game_over(&mut self) {
        (**self).on_game_over()
    }
    fn on_pause_audio(&mut self) {
        (**self).on_pause_audio()
    }
    fn on_resume_audio(&mut self) {
        (**self).on_resume_audio()
    }
    fn on_session_start(&mut self) {
        (**self).on_session_start()
    }
    fn on_session_reset(&mut self) {
        (**self).on_session_reset()
    }
}

/// Sink that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullFeedback;

impl FeedbackSink for NullFeedback {}

/// One recorded feedback call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackEvent {
    TapSuccess,
    TapFail,
    GameOver,
    PauseAudio,
    ResumeAudio,
    SessionStart,
    SessionReset,
}

/// Sink that records every call in order
#[derive(Debug, Clone, Default)]
pub struct RecordingFeedback {
    pub events: Vec<FeedbackEvent>,
}

impl RecordingFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, event: FeedbackEvent) -> usize {
        self.events.iter().filter(|e| **e == event).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl FeedbackSink for RecordingFeedback {
    fn on_tap_success(&mut self) {
        self.events.push(FeedbackEvent::TapSuccess);
    }
    fn on_tap_fail(&mut self) {
        self.events.push(FeedbackEvent::TapFail);
    }
    fn on_game_over(&mut self) {
        self.events.push(FeedbackEvent::GameOver);
    }
    fn on_pause_audio(&mut self) {
        self.events.push(FeedbackEvent::PauseAudio);
    }
    fn on_resume_audio(&mut self) {
        self.events.push(FeedbackEvent::ResumeAudio);
    }
    fn on_session_start(&mut self) {
        self.events.push(FeedbackEvent::SessionStart);
    }
    fn on_session_reset(&mut self) {
        self.events.push(FeedbackEvent::SessionReset);
    }
}

/// Audio + vibration feedback, the sink the game ships with
#[derive(Debug)]
pub struct DeviceFeedback<A: AudioOutput = LogAudioOutput, H: HapticOutput = LogHapticOutput> {
    pub audio: AudioManager<A>,
    pub haptics: HapticsManager<H>,
}

impl DeviceFeedback {
    /// Log-backed devices configured from settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            AudioManager::from_settings(LogAudioOutput, settings),
            HapticsManager::from_settings(LogHapticOutput, settings),
        )
    }
}

impl<A: AudioOutput, H: HapticOutput> DeviceFeedback<A, H> {
    pub fn new(audio: AudioManager<A>, haptics: HapticsManager<H>) -> Self {
        Self { audio, haptics }
    }

    fn fail(&mut self) {
        self.audio.stop_bgm();
        self.haptics.vibrate(VibrationPattern::FAIL);
    }
}

impl<A: AudioOutput, H: HapticOutput> FeedbackSink for DeviceFeedback<A, H> {
    fn on_tap_success(&mut self) {
        self.audio.play(SoundEffect::Tap);
        self.haptics.vibrate(VibrationPattern::TAP);
    }

    fn on_tap_fail(&mut self) {
        self.fail();
    }

    fn on_game_over(&mut self) {
        self.fail();
    }

    fn on_pause_audio(&mut self) {
        self.audio.pause_bgm();
    }

    fn on_resume_audio(&mut self) {
        self.audio.resume_bgm();
    }

    fn on_session_start(&mut self) {
        self.audio.play_bgm();
    }

    fn on_session_reset(&mut self) {
        self.audio.stop_bgm();
    }
}
