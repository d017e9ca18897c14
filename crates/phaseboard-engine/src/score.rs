//! Status to progress-score mapping.

use phaseboard_utils::types::Status;

/// Score a stored status label.
///
/// Total over every input: the four catalog statuses map to their scores and
/// any other label (legacy or foreign data) scores `0`.
///
/// ```rust
/// use phaseboard_engine::score::score_of;
///
/// assert_eq!(score_of("Bezig"), 50);
/// assert_eq!(score_of("Afgerond"), 0);
/// ```
#[must_use]
pub fn score_of(status: &str) -> u8 {
    Status::parse(status).map_or(0, |status| status.score())
}

/// Arithmetic mean of `scores`, rounded half-up.
///
/// Returns `None` for an empty slice.
#[must_use]
pub fn rounded_mean(scores: &[u8]) -> Option<u8> {
    if scores.is_empty() {
        return None;
    }
    let sum: u64 = scores.iter().map(|&s| u64::from(s)).sum();
    let n = scores.len() as u64;
    // floor((sum / n) + 1/2) in integer arithmetic
    let rounded = (2 * sum + n) / (2 * n);
    Some(u8::try_from(rounded).unwrap_or(u8::MAX))
}

/// Arithmetic mean of `scores`, truncated toward zero.
#[must_use]
pub fn truncated_mean(scores: &[u8]) -> Option<u8> {
    if scores.is_empty() {
        return None;
    }
    let sum: u64 = scores.iter().map(|&s| u64::from(s)).sum();
    let mean = sum / scores.len() as u64;
    Some(u8::try_from(mean).unwrap_or(u8::MAX))
}
