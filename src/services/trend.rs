//! Mood trend analytics for the dashboard badge.
//!
//! A coarse first-half/second-half comparison over the most recent samples.
//! The window is a sample count: seven entries logged on one afternoon make a
//! full "7" window.

use serde::{Deserialize, Serialize};

use crate::models::mood::MoodSample;

/// Neutral midpoint reported when there is nothing to average.
pub const NEUTRAL_SCORE: f64 = 5.0;

/// Minimum gap between recent and older averages before a direction is called.
pub const TREND_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl Trend {
    pub fn label(self) -> &'static str {
        match self {
            Trend::Up => "Improving",
            Trend::Down => "Needs attention",
            Trend::Stable => "Stable",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TrendResult {
    pub average_mood: f64,
    pub average_energy: f64,
    pub trend: Trend,
}

impl TrendResult {
    pub fn neutral() -> Self {
        Self {
            average_mood: NEUTRAL_SCORE,
            average_energy: NEUTRAL_SCORE,
            trend: Trend::Stable,
        }
    }
}

/// Summarize the first `window` samples of a most-recent-first list.
pub fn analyze(samples: &[MoodSample], window: usize) -> TrendResult {
    let samples = &samples[..samples.len().min(window)];
    if samples.is_empty() {
        return TrendResult::neutral();
    }

    let average_mood = mean(samples.iter().map(|s| s.mood_score)).unwrap_or(NEUTRAL_SCORE);
    let average_energy = mean(samples.iter().map(|s| s.energy_level)).unwrap_or(NEUTRAL_SCORE);

    // Older half takes the extra element on odd lengths.
    let (recent, older) = samples.split_at(samples.len() / 2);
    let trend = classify(
        mean(recent.iter().map(|s| s.mood_score)),
        mean(older.iter().map(|s| s.mood_score)),
    );

    TrendResult {
        average_mood: round_one_decimal(average_mood),
        average_energy: round_one_decimal(average_energy),
        trend,
    }
}

fn classify(recent: Option<f64>, older: Option<f64>) -> Trend {
    let (Some(recent), Some(older)) = (recent, older) else {
        return Trend::Stable;
    };

    let difference = recent - older;
    if difference > TREND_THRESHOLD {
        Trend::Up
    } else if difference < -TREND_THRESHOLD {
        Trend::Down
    } else {
        Trend::Stable
    }
}

fn mean(values: impl Iterator<Item = i32>) -> Option<f64> {
    let (sum, count) = values.fold((0i64, 0usize), |(sum, count), v| (sum + v as i64, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum as f64 / count as f64)
    }
}

/// Half-up for the non-negative scores this module sees.
fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
