//! Vote session state machine
//!
//! One controller per running panel instance. A vote cycle runs
//! Idle → Armed → Signaling → Idle: guard the lock, validate the row, light
//! the LED, fire the haptic, persist the vote, then hold the session locked
//! until the confirmation tone resolves. Activations while locked are
//! discarded, never queued. The operator reset is the only cancellation
//! path: it tears down the audio sink, clears every indicator, and returns
//! to Idle from any state.

use crate::config::MachineConfig;
use crate::machine::banner::BannerController;
use crate::machine::indicator::IndicatorController;
use crate::machine::panel::{PanelFace, RowModel};
use crate::machine::signal::{ConfirmationSignal, HapticDriver, NullHaptics, ToneSpec};
use crate::machine::tally::{KeyValueStore, MemoryStore, PersistentTally};
use crate::types::{Candidate, PressOutcome, SessionPhase, TallyRecord};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

/// The panel's vote-cycle state machine
///
/// Owns its lock flag and the confirmation-signal resource; construct one
/// per panel instance. The lock is process-local: it serializes cycles
/// within this instance but offers no protection across independent
/// instances sharing one store.
pub struct VoteSessionController {
    rows: RowModel,
    tally: Arc<PersistentTally>,
    indicators: Arc<RwLock<IndicatorController>>,
    signal: Arc<ConfirmationSignal>,
    banner: Arc<BannerController>,
    haptics: Arc<dyn HapticDriver>,
    haptic_ms: u64,
    locked: Arc<AtomicBool>,
    phase: Arc<RwLock<SessionPhase>>,
    cycle: Mutex<Option<JoinHandle<()>>>,
}

impl VoteSessionController {
    /// Create a controller over a candidate list and a persistent store
    pub fn new(
        config: &MachineConfig,
        candidates: Vec<Candidate>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        let rows = RowModel::new(candidates, config.row_count);
        let tally = Arc::new(PersistentTally::new(store, config.storage_key.clone()));
        let signal = Arc::new(ConfirmationSignal::headless(ToneSpec::from_config(config)));

        Self {
            indicators: Arc::new(RwLock::new(IndicatorController::new(config.row_count))),
            banner: Arc::new(BannerController::new(config.banner_ms)),
            haptics: Arc::new(NullHaptics),
            haptic_ms: config.haptic_ms,
            locked: Arc::new(AtomicBool::new(false)),
            phase: Arc::new(RwLock::new(SessionPhase::Idle)),
            cycle: Mutex::new(None),
            rows,
            tally,
            signal,
        }
    }

    /// Create a controller for tests: in-memory store, fast timings
    pub fn for_testing(candidates: Vec<Candidate>) -> Self {
        Self::new(
            &MachineConfig::for_testing(),
            candidates,
            Arc::new(MemoryStore::new()),
        )
    }

    /// Replace the confirmation signal (audio sink injection)
    pub fn with_signal(mut self, signal: ConfirmationSignal) -> Self {
        self.signal = Arc::new(signal);
        self
    }

    /// Replace the haptic driver
    pub fn with_haptics(mut self, haptics: Arc<dyn HapticDriver>) -> Self {
        self.haptics = haptics;
        self
    }

    /// Handle one row-activation event
    ///
    /// Locked sessions and unbound rows drop the event silently. A valid
    /// press runs the side effects strictly in order: LED on, haptic pulse,
    /// tally write, optional banner, then the signaling tail. The vote is
    /// durable before the tone starts, so a later reset cannot lose it.
    pub fn press(&self, row_index: usize) -> PressOutcome {
        if self.locked.swap(true, Ordering::SeqCst) {
            debug!(row_index, "activation dropped: session locked");
            return PressOutcome::IgnoredLocked;
        }
        self.set_phase(SessionPhase::Armed);

        // The renderer never emits a button on a spacer row, but the
        // controller validates independently.
        let Some(candidate) = self.rows.candidate_for(row_index).cloned() else {
            debug!(row_index, "activation dropped: unbound row");
            self.set_phase(SessionPhase::Idle);
            self.locked.store(false, Ordering::SeqCst);
            return PressOutcome::IgnoredUnbound;
        };

        let cycle_id = Uuid::new_v4();

        self.with_indicators(|leds| leds.set_active(row_index));

        if let Err(e) = self.haptics.pulse(self.haptic_ms) {
            debug!("haptic pulse failed: {e}");
        }

        let record = self.tally.record_vote(&candidate);
        info!(
            cycle = %cycle_id,
            candidate = %candidate.id,
            row = row_index,
            count = record.count_for(&candidate.id),
            total = record.total,
            "vote accepted"
        );

        if let Some(message) = &candidate.special_message {
            self.banner.show(message.clone());
        }

        self.set_phase(SessionPhase::Signaling);
        // The tone is scheduled before the cycle suspends; only the playback
        // window itself runs in the spawned tail.
        self.signal.begin();
        self.spawn_signaling_tail(cycle_id);

        PressOutcome::Accepted {
            cycle_id,
            candidate_id: candidate.id,
        }
    }

    // Hold the session through the playback window, then clear the LED,
    // unlock, and return to Idle. Runs as its own task so a reset can cancel
    // it at the playback await.
    fn spawn_signaling_tail(&self, cycle_id: Uuid) {
        let signal = self.signal.clone();
        let indicators = self.indicators.clone();
        let locked = self.locked.clone();
        let phase = self.phase.clone();

        let handle = tokio::spawn(async move {
            signal.finish().await;

            let mut leds = indicators.write().unwrap_or_else(|p| p.into_inner());
            leds.clear_all();
            drop(leds);

            locked.store(false, Ordering::SeqCst);
            let mut phase = phase.write().unwrap_or_else(|p| p.into_inner());
            *phase = SessionPhase::Idle;
            debug!(cycle = %cycle_id, "vote cycle complete");
        });

        let mut cycle = self.cycle.lock().unwrap_or_else(|p| p.into_inner());
        // Lock invariant: any previous tail has already finished.
        *cycle = Some(handle);
    }

    /// Await the in-flight vote cycle, if any
    ///
    /// Pressing never queues; this only waits for the current cycle's
    /// confirmation tone to finish.
    pub async fn wait_idle(&self) {
        let handle = {
            let mut cycle = self.cycle.lock().unwrap_or_else(|p| p.into_inner());
            cycle.take()
        };
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }

    /// Operator reset, valid in any state
    ///
    /// Aborts the in-flight cycle, tears down and recreates the audio
    /// resource (the only way to silence a scheduled tone), blanks the
    /// banner, clears every LED, unlocks, and returns to Idle. Votes
    /// persisted before the reset stay recorded.
    pub fn reset(&self) {
        let handle = {
            let mut cycle = self.cycle.lock().unwrap_or_else(|p| p.into_inner());
            cycle.take()
        };
        if let Some(handle) = handle {
            handle.abort();
        }

        self.signal.reset();
        self.banner.clear();
        self.with_indicators(|leds| leds.clear_all());
        self.locked.store(false, Ordering::SeqCst);
        self.set_phase(SessionPhase::Idle);
        info!("panel reset");
    }

    /// Current observable phase
    pub fn phase(&self) -> SessionPhase {
        *self.phase.read().unwrap_or_else(|p| p.into_inner())
    }

    /// Whether a vote cycle currently holds the session lock
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::SeqCst)
    }

    /// The currently lit LED row, if any
    pub fn lit_row(&self) -> Option<usize> {
        self.indicators
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .active_row()
    }

    /// Count of lit LEDs (0 or 1 by invariant)
    pub fn lit_count(&self) -> usize {
        self.indicators
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .active_count()
    }

    /// The banner message currently displayed, if any
    pub fn banner_message(&self) -> Option<String> {
        self.banner.current()
    }

    /// Load the persisted tally record
    pub fn tally(&self) -> TallyRecord {
        self.tally.load()
    }

    /// The static row model behind this controller
    pub fn rows(&self) -> &RowModel {
        &self.rows
    }

    /// Render the machine face for this controller's rows
    pub fn face(&self) -> PanelFace {
        PanelFace::render(&self.rows)
    }

    fn set_phase(&self, phase: SessionPhase) {
        let mut current = self.phase.write().unwrap_or_else(|p| p.into_inner());
        *current = phase;
    }

    fn with_indicators(&self, f: impl FnOnce(&mut IndicatorController)) {
        let mut leds = self.indicators.write().unwrap_or_else(|p| p.into_inner());
        f(&mut leds);
    }
}
