//! Audible/haptic vote confirmation
//!
//! The confirmation is one fixed-duration square-wave tone under a short
//! linear attack/release envelope. [`AudioSink`] stands in for the platform
//! audio subsystem: it is constructed lazily on first play and discarded on
//! reset, because a submitted tone cannot be silenced any other way.

use crate::Result;
use crate::config::MachineConfig;
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

/// Sample rate the tone is rendered at
pub const SAMPLE_RATE: u32 = 44_100;

/// Shape of the confirmation tone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneSpec {
    /// Oscillator frequency in Hz
    pub frequency_hz: f32,
    /// Total tone duration in milliseconds
    pub duration_ms: u64,
    /// Linear fade-in length in milliseconds
    pub attack_ms: u64,
    /// Linear fade-out length in milliseconds
    pub release_ms: u64,
    /// Amplitude held between attack and release, 0.0..=1.0
    pub peak_amplitude: f32,
}

impl ToneSpec {
    /// The machine's stock confirmation beep: 1 kHz square, 2 s,
    /// 10 ms attack and 50 ms release at quarter amplitude
    pub fn confirmation() -> Self {
        Self {
            frequency_hz: 1000.0,
            duration_ms: 2000,
            attack_ms: 10,
            release_ms: 50,
            peak_amplitude: 0.25,
        }
    }

    /// Build the spec from machine configuration
    pub fn from_config(config: &MachineConfig) -> Self {
        Self {
            frequency_hz: config.tone_hz,
            duration_ms: config.beep_ms,
            attack_ms: config.attack_ms,
            release_ms: config.release_ms,
            peak_amplitude: config.peak_amplitude,
        }
    }

    /// Tone duration as a [`Duration`]
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// Envelope amplitude at `t` seconds into the tone
    ///
    /// Linear ramp from zero over the attack, flat sustain at peak, linear
    /// ramp back to zero over the release. Zero outside the tone.
    pub fn amplitude_at(&self, t_secs: f32) -> f32 {
        let duration = self.duration_ms as f32 / 1000.0;
        let attack = self.attack_ms as f32 / 1000.0;
        let release = self.release_ms as f32 / 1000.0;

        if t_secs < 0.0 || t_secs >= duration {
            0.0
        } else if t_secs < attack {
            self.peak_amplitude * (t_secs / attack)
        } else if t_secs > duration - release {
            self.peak_amplitude * ((duration - t_secs) / release)
        } else {
            self.peak_amplitude
        }
    }

    /// Render the square-wave samples under the envelope
    pub fn render(&self, sample_rate: u32) -> Vec<f32> {
        let total = (self.duration_ms as u64 * sample_rate as u64 / 1000) as usize;
        let mut samples = Vec::with_capacity(total);
        for n in 0..total {
            let t = n as f32 / sample_rate as f32;
            let phase = (t * self.frequency_hz).fract();
            let square = if phase < 0.5 { 1.0 } else { -1.0 };
            samples.push(square * self.amplitude_at(t));
        }
        samples
    }
}

/// Whether the audio subsystem is ready to play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkState {
    /// Accepting audio
    Running,
    /// Needs a resume before audio will be heard
    Suspended,
}

/// Boundary to the platform audio subsystem
///
/// Submitting samples schedules them for playback; there is no way to
/// silence them afterwards short of closing the sink.
pub trait AudioSink: Send {
    /// Current subsystem state
    fn state(&self) -> SinkState;

    /// Try to move a suspended subsystem to running
    fn resume(&mut self) -> Result<()>;

    /// Schedule rendered samples for playback
    fn submit(&mut self, sample_rate: u32, samples: &[f32]) -> Result<()>;

    /// Tear the subsystem down, discarding anything scheduled
    fn close(&mut self);
}

/// Headless sink: accepts and discards everything
#[derive(Debug, Default)]
pub struct NullSink;

impl AudioSink for NullSink {
    fn state(&self) -> SinkState {
        SinkState::Running
    }

    fn resume(&mut self) -> Result<()> {
        Ok(())
    }

    fn submit(&mut self, _sample_rate: u32, _samples: &[f32]) -> Result<()> {
        Ok(())
    }

    fn close(&mut self) {}
}

/// Boundary to the platform haptic motor
pub trait HapticDriver: Send + Sync {
    /// Fire one vibration pulse
    fn pulse(&self, duration_ms: u64) -> Result<()>;
}

/// Haptics on a platform with no motor: every pulse is a no-op
#[derive(Debug, Default)]
pub struct NullHaptics;

impl HapticDriver for NullHaptics {
    fn pulse(&self, _duration_ms: u64) -> Result<()> {
        Ok(())
    }
}

/// Factory recreating the audio sink after a reset
pub type SinkFactory = Box<dyn Fn() -> Box<dyn AudioSink> + Send + Sync>;

/// Plays the fixed-duration confirmation tone
///
/// The sink is created lazily on the first play. [`ConfirmationSignal::play`]
/// suspends the caller for the full tone duration; the only way to cut a
/// tone short is [`ConfirmationSignal::reset`], which drops the sink so the
/// next play starts from a fresh one.
pub struct ConfirmationSignal {
    spec: ToneSpec,
    sink: Mutex<Option<Box<dyn AudioSink>>>,
    factory: SinkFactory,
}

impl ConfirmationSignal {
    /// Create a signal with a sink factory
    pub fn new(spec: ToneSpec, factory: SinkFactory) -> Self {
        Self {
            spec,
            sink: Mutex::new(None),
            factory,
        }
    }

    /// Create a headless signal (discards audio) with the stock beep
    pub fn headless(spec: ToneSpec) -> Self {
        Self::new(spec, Box::new(|| Box::new(NullSink) as Box<dyn AudioSink>))
    }

    /// Create a fast headless signal for tests
    pub fn for_testing() -> Self {
        Self::headless(ToneSpec::from_config(&MachineConfig::for_testing()))
    }

    /// The tone shape this signal plays
    pub fn spec(&self) -> ToneSpec {
        self.spec
    }

    /// Schedule the tone for playback without awaiting it
    ///
    /// A suspended sink gets one best-effort resume; resume and submit
    /// failures are swallowed and playback proceeds as silence.
    pub fn begin(&self) {
        self.submit_tone();
    }

    /// Await the playback window of a tone scheduled with [`Self::begin`]
    pub async fn finish(&self) {
        tokio::time::sleep(self.spec.duration()).await;
    }

    /// Play the confirmation tone, resolving when playback completes
    ///
    /// The await always lasts the full tone duration.
    pub async fn play(&self) {
        self.begin();
        self.finish().await;
    }

    /// Tear down the audio sink, discarding any in-flight tone
    pub fn reset(&self) {
        let mut sink = match self.sink.lock() {
            Ok(sink) => sink,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(mut active) = sink.take() {
            active.close();
            debug!("audio sink torn down");
        }
    }

    // Render and schedule the tone synchronously; the guard must be released
    // before the playback await.
    fn submit_tone(&self) {
        let mut sink = match self.sink.lock() {
            Ok(sink) => sink,
            Err(poisoned) => poisoned.into_inner(),
        };
        let active = sink.get_or_insert_with(|| (self.factory)());

        if active.state() == SinkState::Suspended {
            if let Err(e) = active.resume() {
                debug!("audio resume failed, playing best-effort: {e}");
            }
        }

        let samples = self.spec.render(SAMPLE_RATE);
        if let Err(e) = active.submit(SAMPLE_RATE, &samples) {
            debug!("audio submit failed, tone skipped: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal_error;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_envelope_shape() {
        let spec = ToneSpec::confirmation();

        assert_eq!(spec.amplitude_at(0.0), 0.0);
        // Peak reached at the end of the attack and held through the sustain
        assert!((spec.amplitude_at(0.01) - 0.25).abs() < 1e-6);
        assert!((spec.amplitude_at(1.0) - 0.25).abs() < 1e-6);
        // Release ramps back to zero
        assert!(spec.amplitude_at(1.99) < 0.25);
        assert_eq!(spec.amplitude_at(2.0), 0.0);
        assert_eq!(spec.amplitude_at(-0.5), 0.0);
    }

    #[test]
    fn test_render_respects_peak_and_length() {
        let spec = ToneSpec {
            duration_ms: 100,
            ..ToneSpec::confirmation()
        };
        let samples = spec.render(SAMPLE_RATE);
        assert_eq!(samples.len(), SAMPLE_RATE as usize / 10);
        assert!(!samples.is_empty());
        assert!((samples[0]).abs() < 1e-6);
        assert!(samples.iter().all(|s| s.abs() <= spec.peak_amplitude + 1e-6));
        // The square wave actually swings both ways
        assert!(samples.iter().any(|&s| s > 0.2));
        assert!(samples.iter().any(|&s| s < -0.2));
    }

    /// Sink double that starts suspended and counts interactions
    struct CountingSink {
        resumed: Arc<AtomicUsize>,
        submitted: Arc<AtomicUsize>,
        closed: Arc<AtomicUsize>,
        fail_resume: bool,
        suspended: bool,
    }

    impl AudioSink for CountingSink {
        fn state(&self) -> SinkState {
            if self.suspended {
                SinkState::Suspended
            } else {
                SinkState::Running
            }
        }

        fn resume(&mut self) -> Result<()> {
            self.resumed.fetch_add(1, Ordering::SeqCst);
            if self.fail_resume {
                return Err(signal_error!("user gesture required"));
            }
            self.suspended = false;
            Ok(())
        }

        fn submit(&mut self, _sample_rate: u32, samples: &[f32]) -> Result<()> {
            assert!(!samples.is_empty());
            self.submitted.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn close(&mut self) {
            self.closed.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn counting_signal(fail_resume: bool) -> (ConfirmationSignal, [Arc<AtomicUsize>; 3]) {
        let resumed = Arc::new(AtomicUsize::new(0));
        let submitted = Arc::new(AtomicUsize::new(0));
        let closed = Arc::new(AtomicUsize::new(0));
        let counters = [resumed.clone(), submitted.clone(), closed.clone()];

        let spec = ToneSpec {
            duration_ms: 20,
            attack_ms: 2,
            release_ms: 5,
            ..ToneSpec::confirmation()
        };
        let signal = ConfirmationSignal::new(
            spec,
            Box::new(move || {
                Box::new(CountingSink {
                    resumed: resumed.clone(),
                    submitted: submitted.clone(),
                    closed: closed.clone(),
                    fail_resume,
                    suspended: true,
                }) as Box<dyn AudioSink>
            }),
        );
        (signal, counters)
    }

    #[tokio::test]
    async fn test_play_resumes_then_submits() {
        let (signal, [resumed, submitted, _]) = counting_signal(false);
        signal.play().await;
        assert_eq!(resumed.load(Ordering::SeqCst), 1);
        assert_eq!(submitted.load(Ordering::SeqCst), 1);

        // Second play reuses the running sink, no second resume
        signal.play().await;
        assert_eq!(resumed.load(Ordering::SeqCst), 1);
        assert_eq!(submitted.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_resume_failure_is_swallowed() {
        let (signal, [resumed, submitted, _]) = counting_signal(true);
        signal.play().await;
        // Resume failed but playback proceeded best-effort
        assert_eq!(resumed.load(Ordering::SeqCst), 1);
        assert_eq!(submitted.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_reset_closes_and_recreates() {
        let (signal, [_, submitted, closed]) = counting_signal(false);
        signal.play().await;
        signal.reset();
        assert_eq!(closed.load(Ordering::SeqCst), 1);

        // Reset with no sink is a no-op
        signal.reset();
        assert_eq!(closed.load(Ordering::SeqCst), 1);

        // Next play builds a fresh sink
        signal.play().await;
        assert_eq!(submitted.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_play_lasts_the_tone_duration() {
        let signal = ConfirmationSignal::for_testing();
        let started = std::time::Instant::now();
        signal.play().await;
        assert!(started.elapsed() >= signal.spec().duration());
    }
}
