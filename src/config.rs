//! Configuration for the voting machine panel
//!
//! Loads machine timings and storage placement from environment variables
//! with validated defaults.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Machine-face and timing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineConfig {
    /// Total visible rows on the machine face (default: 12)
    pub row_count: usize,

    /// Confirmation tone duration in milliseconds (default: 2000)
    pub beep_ms: u64,

    /// Confirmation tone frequency in Hz (default: 1000)
    pub tone_hz: f32,

    /// Tone attack ramp in milliseconds (default: 10)
    pub attack_ms: u64,

    /// Tone release ramp in milliseconds (default: 50)
    pub release_ms: u64,

    /// Tone peak amplitude, 0.0..=1.0 (default: 0.25)
    pub peak_amplitude: f32,

    /// Haptic pulse duration in milliseconds (default: 60)
    pub haptic_ms: u64,

    /// Transient banner display window in milliseconds (default: 3000)
    pub banner_ms: u64,

    /// Reserved key in the persistent store (default: "vfsVotes")
    pub storage_key: String,

    /// Directory for the file-backed store, if one is used
    pub storage_dir: Option<String>,
}

impl MachineConfig {
    /// Load machine configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let row_count = std::env::var("EVM_ROW_COUNT")
            .unwrap_or_else(|_| "12".to_string())
            .parse()
            .map_err(|_| Error::internal("Invalid EVM_ROW_COUNT"))?;

        let beep_ms = std::env::var("EVM_BEEP_MS")
            .unwrap_or_else(|_| "2000".to_string())
            .parse()
            .map_err(|_| Error::internal("Invalid EVM_BEEP_MS"))?;

        let tone_hz = std::env::var("EVM_TONE_HZ")
            .unwrap_or_else(|_| "1000".to_string())
            .parse()
            .map_err(|_| Error::internal("Invalid EVM_TONE_HZ"))?;

        let banner_ms = std::env::var("EVM_BANNER_MS")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| Error::internal("Invalid EVM_BANNER_MS"))?;

        let storage_key =
            std::env::var("EVM_STORAGE_KEY").unwrap_or_else(|_| "vfsVotes".to_string());

        let storage_dir = std::env::var("EVM_STORAGE_DIR").ok();

        let config = Self {
            row_count,
            beep_ms,
            tone_hz,
            attack_ms: 10,
            release_ms: 50,
            peak_amplitude: 0.25,
            haptic_ms: 60,
            banner_ms,
            storage_key,
            storage_dir,
        };
        config.validate()?;
        Ok(config)
    }

    /// Create configuration for testing (short timings so cycles finish fast)
    pub fn for_testing() -> Self {
        Self {
            row_count: 12,
            beep_ms: 40,
            tone_hz: 1000.0,
            attack_ms: 2,
            release_ms: 5,
            peak_amplitude: 0.25,
            haptic_ms: 5,
            banner_ms: 60,
            storage_key: "vfsVotes".to_string(),
            storage_dir: None,
        }
    }

    /// Validate timing and sizing invariants
    pub fn validate(&self) -> Result<()> {
        if self.row_count == 0 {
            return Err(Error::internal("EVM_ROW_COUNT must be at least 1"));
        }
        if self.beep_ms == 0 {
            return Err(Error::internal("EVM_BEEP_MS must be at least 1"));
        }
        if self.attack_ms + self.release_ms > self.beep_ms {
            return Err(Error::internal(
                "Tone attack + release must fit within the tone duration",
            ));
        }
        if !(0.0..=1.0).contains(&self.peak_amplitude) {
            return Err(Error::internal("Peak amplitude must be within 0.0..=1.0"));
        }
        if !self.tone_hz.is_finite() || self.tone_hz <= 0.0 {
            return Err(Error::internal("Invalid EVM_TONE_HZ"));
        }
        Ok(())
    }
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            row_count: 12,
            beep_ms: 2000,
            tone_hz: 1000.0,
            attack_ms: 10,
            release_ms: 50,
            peak_amplitude: 0.25,
            haptic_ms: 60,
            banner_ms: 3000,
            storage_key: "vfsVotes".to_string(),
            storage_dir: None,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub machine: MachineConfig,
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Config {
    /// Load configuration from environment
    pub fn from_env() -> Result<Self> {
        let machine = MachineConfig::from_env()?;

        let logging = LoggingConfig {
            level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
        };

        Ok(Self { machine, logging })
    }

    /// Create configuration for testing
    pub fn for_testing() -> Self {
        let machine = MachineConfig::for_testing();

        let logging = LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        };

        Self { machine, logging }
    }
}
