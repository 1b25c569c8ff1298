//! Score normalization and the UCB1 selection score.

/// Normalized value used before any score range exists.
pub const NEUTRAL_NORMALIZED_SCORE: f64 = 0.5;

/// Running min/max of rollout fitness observed by one engine run.
///
/// Starts at `(+∞, −∞)` and only widens. Used for normalization in
/// selection, never for termination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBounds {
    min: f64,
    max: f64,
}

impl ScoreBounds {
    #[must_use]
    pub fn new() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    /// Widen the bounds to include `score`.
    pub fn observe(&mut self, score: f64) {
        if score < self.min {
            self.min = score;
        }
        if score > self.max {
            self.max = score;
        }
    }

    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Map `value` into `[0, 1]` against the observed range.
    ///
    /// Returns [`NEUTRAL_NORMALIZED_SCORE`] while the range is empty or a
    /// single point, when no discrimination is possible yet.
    #[must_use]
    pub fn normalize(&self, value: f64) -> f64 {
        if self.max > self.min {
            (value - self.min) / (self.max - self.min)
        } else {
            NEUTRAL_NORMALIZED_SCORE
        }
    }
}

impl Default for ScoreBounds {
    fn default() -> Self {
        Self::new()
    }
}

/// UCB1 score of a child with at least one visit.
///
/// `normalized_avg + c · sqrt(ln(parent_visits) / child_visits)`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn ucb1(normalized_avg: f64, parent_visits: u64, child_visits: u64, c: f64) -> f64 {
    let exploration = ((parent_visits as f64).ln() / child_visits as f64).sqrt();
    normalized_avg + c * exploration
}
