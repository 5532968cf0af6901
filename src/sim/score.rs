//! Score tracking and difficulty ramp
//!
//! The scorecard shows `score mod (capacity + 1)` markers. Every time the
//! display wraps back to zero the birds get permanently faster.

/// Outcome of recording one hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreUpdate {
    /// Markers to show after this hit
    pub displayed: usize,
    /// True when the display wrapped to zero on this hit
    pub wrapped: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ScoreTracker {
    score: u64,
    scorecard_capacity: usize,
    /// Difficulty ramps applied so far
    wraps: u32,
}

impl ScoreTracker {
    pub fn new(scorecard_capacity: usize) -> Self {
        Self {
            score: 0,
            scorecard_capacity,
            wraps: 0,
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn wraps(&self) -> u32 {
        self.wraps
    }

    /// Markers currently shown on the scorecard
    pub fn displayed(&self) -> usize {
        (self.score % self.period()) as usize
    }

    fn period(&self) -> u64 {
        self.scorecard_capacity as u64 + 1
    }

    /// Count one hit
    pub fn record_hit(&mut self) -> ScoreUpdate {
        self.score += 1;
        let displayed = self.displayed();
        let wrapped = displayed == 0;
        if wrapped {
            self.wraps += 1;
        }
        ScoreUpdate { displayed, wrapped }
    }
}
