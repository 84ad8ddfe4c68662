use std::time::Duration;

use super::config::EngineConfig;

/// Base points by number of lines cleared at once.
///
/// Index corresponds to the number of lines cleared simultaneously:
/// - 0 lines: 0 points
/// - 1 line: 100 points
/// - 2 lines: 300 points
/// - 3 lines: 500 points
/// - 4 or more lines: 800 points
const SCORE_TABLE: [u64; 5] = [0, 100, 300, 500, 800];

/// Returns the base points for clearing `cleared_lines` rows at once.
#[must_use]
pub fn line_clear_base_points(cleared_lines: usize) -> u64 {
    SCORE_TABLE[cleared_lines.min(SCORE_TABLE.len() - 1)]
}

/// Returns `round(base * level * combo_base^combo)`.
///
/// # Examples
///
/// ```
/// use blockfall_engine::combo_score;
///
/// assert_eq!(combo_score(300, 1, 1, 1.1), 330);
/// assert_eq!(combo_score(100, 1, 2, 1.1), 121);
/// ```
#[must_use]
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn combo_score(base_points: u64, level: u32, combo: u32, combo_base: f64) -> u64 {
    let exponent = i32::try_from(combo).unwrap_or(i32::MAX);
    let score = base_points as f64 * f64::from(level) * combo_base.powi(exponent);
    score.round() as u64
}

/// What a single lock did to the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LockOutcome {
    pub cleared_lines: usize,
    /// Points awarded for the clear (0 when nothing was cleared).
    pub awarded: u64,
    /// Levels gained by this lock.
    pub levels_gained: u32,
}

/// Score, level, line and combo counters of a session.
///
/// # Scoring
///
/// - A lock clearing `n >= 1` rows increments the combo counter, then awards
///   `round(base(n) * level * combo_base^combo)`
/// - A lock clearing nothing resets the combo counter to 0
/// - Hard and soft drops add points per row through [`Self::add_drop_points`]
///
/// # Levels
///
/// After every clear, while total lines reach `level * lines_per_level` the
/// level goes up and the drop interval is recomputed, so one large clear can
/// jump several levels.
///
/// # Example
///
/// ```
/// use blockfall_engine::{EngineConfig, GameStats};
///
/// let config = EngineConfig::default();
/// let mut stats = GameStats::new(&config);
/// stats.complete_piece_drop(2, &config);
///
/// assert_eq!(stats.score(), 330);
/// assert_eq!(stats.combo(), 1);
/// assert_eq!(stats.total_cleared_lines(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStats {
    score: u64,
    level: u32,
    total_cleared_lines: u32,
    combo: u32,
    drop_interval: Duration,
    completed_pieces: u64,
    line_cleared_counter: [u64; 5],
}

impl GameStats {
    /// Creates counters at their initial values: score 0, level 1, no lines,
    /// no combo, level 1 drop interval.
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            score: 0,
            level: 1,
            total_cleared_lines: 0,
            combo: 0,
            drop_interval: config.drop_interval(1),
            completed_pieces: 0,
            line_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> u32 {
        self.total_cleared_lines
    }

    #[must_use]
    pub const fn combo(&self) -> u32 {
        self.combo
    }

    /// Gravity interval for the current level (without soft drop).
    #[must_use]
    pub const fn drop_interval(&self) -> Duration {
        self.drop_interval
    }

    /// Returns the total number of pieces that have been locked into place.
    #[must_use]
    pub const fn completed_pieces(&self) -> u64 {
        self.completed_pieces
    }

    /// Returns a histogram of locks by lines cleared.
    ///
    /// - `[0]`: locks with no clear
    /// - `[1]`..`[3]`: singles, doubles, triples
    /// - `[4]`: four or more lines
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[u64; 5] {
        &self.line_cleared_counter
    }

    /// Updates the counters after a piece locks.
    pub fn complete_piece_drop(
        &mut self,
        cleared_lines: usize,
        config: &EngineConfig,
    ) -> LockOutcome {
        self.completed_pieces += 1;
        self.line_cleared_counter[cleared_lines.min(4)] += 1;

        if cleared_lines == 0 {
            self.combo = 0;
            return LockOutcome::default();
        }

        self.combo += 1;
        let awarded = combo_score(
            line_clear_base_points(cleared_lines),
            self.level,
            self.combo,
            config.combo_base,
        );
        self.score += awarded;
        self.total_cleared_lines += u32::try_from(cleared_lines).unwrap_or(u32::MAX);

        let start_level = self.level;
        let lines_per_level = config.lines_per_level.max(1);
        while self.total_cleared_lines >= self.level.saturating_mul(lines_per_level) {
            self.level += 1;
            self.drop_interval = config.drop_interval(self.level);
        }

        LockOutcome {
            cleared_lines,
            awarded,
            levels_gained: self.level - start_level,
        }
    }

    /// Adds drop points (hard drop distance or soft drop steps).
    pub fn add_drop_points(&mut self, points: u64) {
        self.score += points;
    }
}
