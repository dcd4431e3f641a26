//! Simulated Voting Machine Panel
//!
//! A browser-style voting-machine widget: fixed candidate rows with logos,
//! a single-active LED column, an audible confirmation tone, and a
//! persisted vote tally. Demonstration/training hardware, not an election
//! system.

pub mod config;
pub mod errors;
pub mod machine;
pub mod types;

// Re-export commonly used types
pub use errors::{Error, Result};
pub use machine::VoteSessionController;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the panel with proper logging
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "evm_panel=info".into()),
        )
        .init();

    tracing::info!("🗳️  Voting machine panel v{} initialized", VERSION);
    Ok(())
}
