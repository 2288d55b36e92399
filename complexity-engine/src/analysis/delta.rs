//! Before/after complexity change for a single file.
//!
//! Oracle scores are inverted (higher raw score = simpler code), so both
//! sides are flipped with `100 - raw` before anything is compared or shown.
//! On the flipped scale higher means more complex.

use super::score::{normalize, round2};

/// Upper bound of the oracle's raw score range.
pub const SCORE_CEILING: f64 = 100.0;

/// Marker appended to a change that lowered complexity.
pub const IMPROVED: &str = "📉👍";
/// Marker appended to a change that raised complexity.
pub const WORSENED: &str = "📈👎";

/// Placeholder shown when a file has no base revision metrics.
pub const NOT_AVAILABLE: &str = "N/A";

/// Presentation of one file's complexity change.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexityDelta {
    pub previous_display: String,
    pub current_display: String,
    /// Signed change on the inverted scale.
    pub change: f64,
    pub change_text: String,
}

/// Flips an oracle score so that higher means more complex.
pub fn invert(raw: f64) -> f64 {
    SCORE_CEILING - raw
}

/// Computes the change between `previous_raw` and `current_raw`.
///
/// A missing previous score is shown as `N/A` but counts as a zero baseline
/// in the change, so a new file reports its full inverted score.
pub fn delta(current_raw: f64, previous_raw: Option<f64>) -> ComplexityDelta {
    let current = invert(current_raw);
    let previous = previous_raw.map(invert);

    let current_display = normalize(current).to_string();
    let previous_display = match previous {
        Some(p) => normalize(p).to_string(),
        None => NOT_AVAILABLE.to_string(),
    };

    let change = current - previous.unwrap_or(0.0);

    ComplexityDelta {
        previous_display,
        current_display,
        change,
        change_text: change_text(change),
    }
}

/// Formats a change as a signed two-decimal percentage with a trend marker.
pub fn change_text(change: f64) -> String {
    let sign = if change > 0.0 { "+" } else { "" };
    let pct = format!("{sign}{:.2}%", round2(change));

    if change < 0.0 {
        format!("{pct} {IMPROVED}")
    } else if change > 0.0 {
        format!("{pct} {WORSENED}")
    } else {
        pct
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn improvement_is_negative_with_thumbs_up() {
        let d = delta(70.0, Some(50.0));
        assert_eq!(d.change, -20.0);
        assert!(d.change_text.starts_with("-20.00%"));
        assert!(d.change_text.ends_with(IMPROVED));
        assert_eq!(d.current_display, "30 ✅");
        assert_eq!(d.previous_display, "50 ✅");
    }

    #[test]
    fn regression_is_positive_with_thumbs_down() {
        let d = delta(20.0, Some(45.5));
        assert_eq!(d.change, 25.5);
        assert_eq!(d.change_text, format!("+25.50% {WORSENED}"));
        assert_eq!(d.current_display, "80 ⚠️");
    }

    #[test]
    fn missing_previous_uses_zero_baseline() {
        let d = delta(90.0, None);
        assert_eq!(d.previous_display, NOT_AVAILABLE);
        assert_eq!(d.change, 10.0);
        assert_eq!(d.change_text, format!("+10.00% {WORSENED}"));
    }

    #[test]
    fn unchanged_has_no_marker() {
        let d = delta(42.0, Some(42.0));
        assert_eq!(d.change, 0.0);
        assert_eq!(d.change_text, "0.00%");
    }
}
