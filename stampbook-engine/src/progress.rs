use serde::{Deserialize, Serialize};

use crate::constants::PERCENT_MAX;

/// Evaluated state of one requirement against one statistics snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub current: f64,
    pub target: f64,
    /// Always within `[0, 100]`.
    pub percent_complete: f64,
    pub is_complete: bool,
}

impl Progress {
    /// Progress toward a numeric target. A target of zero (or less) counts
    /// as already met.
    #[must_use]
    pub fn toward(current: f64, target: f64) -> Self {
        if !(target > 0.0) {
            return Self {
                current,
                target,
                percent_complete: PERCENT_MAX,
                is_complete: true,
            };
        }
        let ratio = if current.is_nan() { 0.0 } else { current / target };
        Self {
            current,
            target,
            percent_complete: (ratio * PERCENT_MAX).clamp(0.0, PERCENT_MAX),
            is_complete: current >= target,
        }
    }

    /// Progress for an integral counter.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn counted(current: u64, target: u64) -> Self {
        Self::toward(current as f64, target as f64)
    }

    /// A yes/no condition expressed as `1 / 1` or `0 / 1`.
    #[must_use]
    pub fn flag(satisfied: bool) -> Self {
        Self::toward(if satisfied { 1.0 } else { 0.0 }, 1.0)
    }

    /// Result for anything the evaluator cannot resolve.
    #[must_use]
    pub fn unresolved() -> Self {
        Self::flag(false)
    }

    #[must_use]
    pub fn complete() -> Self {
        Self::toward(0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_target_is_complete() {
        let progress = Progress::counted(0, 0);
        assert!(progress.is_complete);
        assert!((progress.percent_complete - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn percent_is_clamped() {
        let over = Progress::counted(500, 100);
        assert!(over.is_complete);
        assert!((over.percent_complete - 100.0).abs() < f64::EPSILON);
        assert!((over.current - 500.0).abs() < f64::EPSILON);

        let partial = Progress::counted(25, 100);
        assert!(!partial.is_complete);
        assert!((partial.percent_complete - 25.0).abs() < f64::EPSILON);

        let nan = Progress::toward(f64::NAN, 10.0);
        assert!(!nan.is_complete);
        assert!(nan.percent_complete.abs() < f64::EPSILON);
    }

    #[test]
    fn flags_and_unresolved() {
        assert!(Progress::flag(true).is_complete);
        let unresolved = Progress::unresolved();
        assert!(!unresolved.is_complete);
        assert!((unresolved.target - 1.0).abs() < f64::EPSILON);
        assert!(unresolved.current.abs() < f64::EPSILON);
    }
}
