//! Display scale for complexity scores.

use std::fmt;

/// Scores strictly above this are flagged.
pub const WARNING_THRESHOLD: f64 = 60.0;

/// Risk marker shown next to a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskEmoji {
    Ok,
    Warning,
}

impl RiskEmoji {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskEmoji::Ok => "✅",
            RiskEmoji::Warning => "⚠️",
        }
    }
}

impl fmt::Display for RiskEmoji {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A score rounded for display together with its risk marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedScore {
    pub rounded: f64,
    pub emoji: RiskEmoji,
}

impl fmt::Display for NormalizedScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.rounded, self.emoji)
    }
}

/// Rounds to two decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Rounds `score` for display and picks its risk marker.
///
/// Works on whatever scale it is given; callers invert oracle scores first.
pub fn normalize(score: f64) -> NormalizedScore {
    let emoji = if score > WARNING_THRESHOLD {
        RiskEmoji::Warning
    } else {
        RiskEmoji::Ok
    };

    NormalizedScore {
        rounded: round2(score),
        emoji,
    }
}
