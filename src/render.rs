//! Result display bands.
//!
//! Pure functions from response values to a [`Band`] the UI turns into a
//! colour.  Nothing here touches the response data itself.

use crate::api::{ConfidenceLevel, Difficulty};

// ---------------------------------------------------------------------------
// Band
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Good,
    Warning,
    Poor,
    /// No judgement (unrecognised difficulty).
    Neutral,
}

impl Band {
    /// RGB triple used when painting the band.
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            Band::Good => (80, 200, 120),
            Band::Warning => (230, 180, 60),
            Band::Poor => (255, 100, 80),
            Band::Neutral => (160, 160, 160),
        }
    }
}

// ---------------------------------------------------------------------------
// Score thresholds
// ---------------------------------------------------------------------------

/// Lower bounds (inclusive) of the good and warning bands for one screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub good: u32,
    pub warning: u32,
}

impl Thresholds {
    pub const CV_MATCH: Thresholds = Thresholds { good: 75, warning: 50 };
    pub const QUIZ_SCORE: Thresholds = Thresholds { good: 70, warning: 40 };
    pub const AUDIO_CONFIDENCE: Thresholds = Thresholds { good: 80, warning: 50 };

    pub fn band(&self, score: u32) -> Band {
        if score >= self.good {
            Band::Good
        } else if score >= self.warning {
            Band::Warning
        } else {
            Band::Poor
        }
    }
}

pub fn cv_match_band(score: u32) -> Band {
    Thresholds::CV_MATCH.band(score)
}

pub fn quiz_score_band(score: u32) -> Band {
    Thresholds::QUIZ_SCORE.band(score)
}

pub fn audio_confidence_band(score: u32) -> Band {
    Thresholds::AUDIO_CONFIDENCE.band(score)
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

/// High → good, Medium → warning, anything else → poor.
pub fn confidence_band(level: &ConfidenceLevel) -> Band {
    match level {
        ConfidenceLevel::High => Band::Good,
        ConfidenceLevel::Medium => Band::Warning,
        ConfidenceLevel::Low | ConfidenceLevel::Other(_) => Band::Poor,
    }
}

pub fn difficulty_band(difficulty: &Difficulty) -> Band {
    match difficulty {
        Difficulty::Easy => Band::Good,
        Difficulty::Medium => Band::Warning,
        Difficulty::Hard => Band::Poor,
        Difficulty::Other(_) => Band::Neutral,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
