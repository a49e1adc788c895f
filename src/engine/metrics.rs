use serde::{Deserialize, Serialize};

const CHARS_PER_WORD: f64 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Metrics {
    pub wpm: u32,
    pub accuracy: u32,
}

impl Metrics {
    /// What the displays show before anything has been typed.
    pub fn idle() -> Self {
        Self {
            wpm: 0,
            accuracy: 100,
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::idle()
    }
}

pub fn compute_metrics(correct_chars: usize, total_chars: usize, elapsed_secs: f64) -> Metrics {
    let wpm = if elapsed_secs > 0.0 {
        let raw = (correct_chars as f64 / CHARS_PER_WORD) / (elapsed_secs / 60.0);
        if raw.is_finite() { raw.round() as u32 } else { 0 }
    } else {
        0
    };
    let accuracy = (100.0 * correct_chars as f64 / total_chars.max(1) as f64).round() as u32;
    Metrics { wpm, accuracy }
}

/// Highest WPM reached on a clean plain-text completion. Never decreases.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BestWpm(u32);

impl BestWpm {
    pub fn value(self) -> u32 {
        self.0
    }

    /// Returns true only when `wpm` beats the stored mark.
    pub fn record(&mut self, wpm: u32) -> bool {
        if wpm > self.0 {
            self.0 = wpm;
            true
        } else {
            false
        }
    }
}
