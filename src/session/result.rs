use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::metrics;
use crate::session::drill::DrillState;
use crate::store::schema::new_id;

/// Outcome of one finished session. Created once, never modified.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeResult {
    pub id: String,
    pub text_id: String,
    pub wpm: u32,
    /// Whole percent, 0..=100.
    pub accuracy: u32,
    /// Seconds of running time.
    pub duration: u64,
    pub timestamp: DateTime<Utc>,
}

impl PracticeResult {
    pub fn from_drill(drill: &DrillState, elapsed_secs: u64, text_id: &str) -> Self {
        let correct = drill.correct_count();
        Self {
            id: new_id(),
            text_id: text_id.to_string(),
            wpm: metrics::wpm(correct, elapsed_secs),
            accuracy: metrics::accuracy(correct, drill.typed_len()),
            duration: elapsed_secs,
            timestamp: Utc::now(),
        }
    }
}

/// Figures shown while typing; recomputed on every keystroke and tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LiveMetrics {
    pub wpm: u32,
    pub accuracy: u32,
    pub elapsed_secs: u64,
    pub mistakes: usize,
    pub progress: f64,
}

impl LiveMetrics {
    pub fn from_drill(drill: &DrillState, elapsed_secs: u64) -> Self {
        let correct = drill.correct_count();
        Self {
            wpm: metrics::wpm(correct, elapsed_secs),
            accuracy: metrics::accuracy(correct, drill.typed_len()),
            elapsed_secs,
            mistakes: drill.typed_len() - correct,
            progress: drill.progress(),
        }
    }
}
