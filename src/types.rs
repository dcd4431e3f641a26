//! # Core types for the voting machine panel
//!
//! This module defines the data structures shared by the panel renderer, the
//! persistent tally, and the vote session controller.
//!
//! ## Type categories
//!
//! - [`Candidate`] / [`Row`]: static machine-face configuration, fixed at
//!   startup
//! - [`TallyRecord`]: the persisted vote counters
//! - [`SessionPhase`] / [`PressOutcome`]: observable controller state
//!
//! ## Usage example
//!
//! ```rust
//! use evm_panel::types::Candidate;
//!
//! let candidate = Candidate::new("c1", "Aarav Sharma").with_glyph("🪷");
//! assert_eq!(candidate.logo_markup(), "🪷");
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// One selectable candidate on the machine face
///
/// Candidates are immutable and defined at startup. A candidate may carry up
/// to three logo representations; [`Candidate::logo_markup`] resolves them
/// with a fixed precedence: explicit image reference, then inline SVG
/// markup, then plain glyph, then empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Candidate {
    /// Unique candidate identifier (the tally map key)
    pub id: String,

    /// Candidate's display name as printed on the ballot strip
    pub name: String,

    /// Path or URL of a logo image, preferred over all other logo forms
    pub logo_img: Option<String>,

    /// Inline SVG markup for the logo
    pub logo_svg: Option<String>,

    /// Plain text glyph standing in for the logo
    pub logo_glyph: Option<String>,

    /// Render this candidate's row with the visual de-emphasis style
    pub de_emphasized: bool,

    /// Transient banner text shown when this candidate receives a vote
    pub special_message: Option<String>,
}

impl Candidate {
    /// Create a candidate with no logo and no flags
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            logo_img: None,
            logo_svg: None,
            logo_glyph: None,
            de_emphasized: false,
            special_message: None,
        }
    }

    /// Set the logo image reference
    pub fn with_image(mut self, path: impl Into<String>) -> Self {
        self.logo_img = Some(path.into());
        self
    }

    /// Set the inline SVG logo markup
    pub fn with_svg(mut self, markup: impl Into<String>) -> Self {
        self.logo_svg = Some(markup.into());
        self
    }

    /// Set the plain glyph logo
    pub fn with_glyph(mut self, glyph: impl Into<String>) -> Self {
        self.logo_glyph = Some(glyph.into());
        self
    }

    /// Mark the candidate's row for visual de-emphasis
    pub fn de_emphasized(mut self) -> Self {
        self.de_emphasized = true;
        self
    }

    /// Attach the transient banner message shown when this candidate is voted
    pub fn with_special_message(mut self, message: impl Into<String>) -> Self {
        self.special_message = Some(message.into());
        self
    }

    /// Resolve the logo markup for this candidate
    ///
    /// Precedence: image reference > inline SVG > glyph > empty string.
    pub fn logo_markup(&self) -> String {
        if let Some(img) = &self.logo_img {
            format!("<img src=\"{}\" alt=\"{} symbol\">", img, self.name)
        } else if let Some(svg) = &self.logo_svg {
            svg.clone()
        } else if let Some(glyph) = &self.logo_glyph {
            glyph.clone()
        } else {
            String::new()
        }
    }
}

/// One fixed visual slot on the machine face
///
/// Exactly one `Row` exists per index. Rows without a bound candidate render
/// as blank spacers with no interactive affordance.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Slot position, 0-based from the top of the face
    pub index: usize,

    /// The candidate bound to this slot, if any
    pub candidate: Option<Candidate>,
}

impl Row {
    /// Whether this row has a bound candidate (and therefore a vote button)
    pub fn is_bound(&self) -> bool {
        self.candidate.is_some()
    }

    /// Whether this row renders with the de-emphasis style
    pub fn is_de_emphasized(&self) -> bool {
        self.candidate
            .as_ref()
            .map(|c| c.de_emphasized)
            .unwrap_or(false)
    }
}

/// The persisted vote counters
///
/// `total` increments independently of the per-candidate counts. Multiple
/// independent panel instances sharing one store race on the whole record
/// (last write wins), so `total` and the sum of `candidates` can diverge.
/// The record is a best-effort counter, not a reconciled ledger.
///
/// Wire field names match the stored payload:
/// `{total, candidates, candidateNames, updatedAt}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TallyRecord {
    /// Running count of all accepted votes
    #[serde(default)]
    pub total: u64,

    /// Votes per candidate id
    #[serde(default)]
    pub candidates: HashMap<String, u64>,

    /// Last-seen display name per candidate id
    #[serde(default, rename = "candidateNames")]
    pub candidate_names: HashMap<String, String>,

    /// When the record was last written by any instance
    #[serde(default, rename = "updatedAt")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl TallyRecord {
    /// The zero-state record used when the store is empty or unreadable
    pub fn zero() -> Self {
        Self::default()
    }

    /// Vote count for a candidate id (0 when the candidate has no entry)
    pub fn count_for(&self, candidate_id: &str) -> u64 {
        self.candidates.get(candidate_id).copied().unwrap_or(0)
    }
}

/// Observable phase of the vote session controller
///
/// `Armed` is transient: it covers row validation between the lock
/// acquisition and the start of signaling, all within one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// No vote cycle in flight; input accepted
    Idle,
    /// A row activation is being validated
    Armed,
    /// Vote recorded; confirmation tone in flight
    Signaling,
}

/// What a row activation resolved to
#[derive(Debug, Clone, PartialEq)]
pub enum PressOutcome {
    /// Vote accepted and recorded; the confirmation signal is in flight
    Accepted {
        /// Correlation id for this vote cycle's log lines
        cycle_id: Uuid,
        /// Id of the candidate the vote was recorded for
        candidate_id: String,
    },

    /// Dropped: another vote cycle holds the session lock
    IgnoredLocked,

    /// Dropped: the activated row has no bound candidate
    IgnoredUnbound,
}

impl PressOutcome {
    /// Whether the activation produced a recorded vote
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}
