//! Machine-face components for the voting panel

pub mod banner;
pub mod indicator;
pub mod panel;
pub mod session;
pub mod signal;
pub mod tally;

// Re-export the panel surface
pub use panel::{PanelFace, RowModel};

// Re-export the persistence layer
pub use tally::{FileStore, KeyValueStore, MemoryStore, PersistentTally};

// Re-export indicator and signal types
pub use indicator::IndicatorController;
pub use signal::{
    AudioSink, ConfirmationSignal, HapticDriver, NullHaptics, NullSink, SinkState, ToneSpec,
};

// Re-export the session controller
pub use banner::BannerController;
pub use session::VoteSessionController;
