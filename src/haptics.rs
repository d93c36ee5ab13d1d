//! Vibration feedback
//!
//! Short pulse on a correct tap, two-pulse buzz on failure. Suppressed when the
//! player turned vibration off or the device is in silent mode.

use crate::settings::Settings;

/// A vibration to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VibrationPattern {
    /// Single pulse of the given length (ms)
    OneShot(u64),
    /// Alternating off/on durations (ms), starting with an off delay
    Waveform(&'static [u64]),
}

impl VibrationPattern {
    pub const TAP: Self = Self::OneShot(30);
    /// buzz, pause, buzz
    pub const FAIL: Self = Self::Waveform(&[0, 120, 80, 200]);

    /// Total time the pattern occupies the motor (ms)
    pub fn duration_ms(&self) -> u64 {
        match self {
            Self::OneShot(ms) => *ms,
            Self::Waveform(timings) => timings.iter().sum(),
        }
    }
}

/// Device that drives the vibration motor
pub trait HapticOutput {
    fn vibrate(&mut self, pattern: VibrationPattern);
}

/// Output that only logs
#[derive(Debug, Clone, Copy, Default)]
pub struct LogHapticOutput;

impl HapticOutput for LogHapticOutput {
    fn vibrate(&mut self, pattern: VibrationPattern) {
        log::debug!("haptics: {:?} ({} ms)", pattern, pattern.duration_ms());
    }
}

/// Output that records patterns, for tests
#[derive(Debug, Clone, Default)]
pub struct RecordingHapticOutput {
    pub pulses: Vec<VibrationPattern>,
}

impl HapticOutput for RecordingHapticOutput {
    fn vibrate(&mut self, pattern: VibrationPattern) {
        self.pulses.push(pattern);
    }
}

#[derive(Debug)]
pub struct HapticsManager<O: HapticOutput> {
    output: O,
    enabled: bool,
    silent_mode: bool,
}

impl<O: HapticOutput> HapticsManager<O> {
    pub fn new(output: O) -> Self {
        Self {
            output,
            enabled: true,
            silent_mode: false,
        }
    }

    pub fn from_settings(output: O, settings: &Settings) -> Self {
        Self {
            enabled: settings.vibration_enabled,
            ..Self::new(output)
        }
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Device ringer is silenced
    pub fn set_silent_mode(&mut self, silent: bool) {
        self.silent_mode = silent;
    }

    pub fn can_vibrate(&self) -> bool {
        self.enabled && !self.silent_mode
    }

    pub fn vibrate(&mut self, pattern: VibrationPattern) {
        if self.can_vibrate() {
            self.output.vibrate(pattern);
        }
    }
}
