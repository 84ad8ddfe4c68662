use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::piece::Position;

/// Timing and scoring constants of a session.
///
/// Every field has a default, so a partial JSON document is a valid config:
///
/// ```
/// use blockfall_engine::EngineConfig;
///
/// let config: EngineConfig = serde_json::from_str(r#"{ "lines_per_level": 5 }"#).unwrap();
/// assert_eq!(config.lines_per_level, 5);
/// assert_eq!(config.base_drop_interval_ms, 800);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Gravity interval at level 1.
    pub base_drop_interval_ms: u64,
    /// Gravity interval never drops below this, however high the level.
    pub min_drop_interval_ms: u64,
    /// Interval decrease per level above 1.
    pub drop_interval_step_ms: u64,
    /// While soft-dropping the interval is divided by this...
    pub soft_drop_divisor: u32,
    /// ...but never below this.
    pub min_soft_drop_interval_ms: u64,
    /// Lines needed per level: level `n` ends at `n * lines_per_level`.
    pub lines_per_level: u32,
    /// Combo multiplier base: clears score `base * level * combo_base^combo`.
    pub combo_base: f64,
    /// Points per row travelled by a hard drop.
    pub hard_drop_points_per_row: u64,
    /// Points per gravity step taken while soft-dropping.
    pub soft_drop_points_per_row: u64,
    /// Anchor where new pieces appear.
    pub spawn_anchor: Position,
    /// Also end the game when a piece locks with a block above row 0.
    ///
    /// Off by default: blocks locked in the spawn buffer are dropped and
    /// play goes on until a spawn collides.
    pub lock_out: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_drop_interval_ms: 800,
            min_drop_interval_ms: 120,
            drop_interval_step_ms: 60,
            soft_drop_divisor: 6,
            min_soft_drop_interval_ms: 60,
            lines_per_level: 10,
            combo_base: 1.1,
            hard_drop_points_per_row: 2,
            soft_drop_points_per_row: 1,
            spawn_anchor: Position::SPAWN,
            lock_out: false,
        }
    }
}

impl EngineConfig {
    /// Returns the gravity interval for `level` (1-based).
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    ///
    /// use blockfall_engine::EngineConfig;
    ///
    /// let config = EngineConfig::default();
    /// assert_eq!(config.drop_interval(1), Duration::from_millis(800));
    /// assert_eq!(config.drop_interval(2), Duration::from_millis(740));
    /// assert_eq!(config.drop_interval(50), Duration::from_millis(120));
    /// ```
    #[must_use]
    pub fn drop_interval(&self, level: u32) -> Duration {
        let decrease =
            u64::from(level.saturating_sub(1)).saturating_mul(self.drop_interval_step_ms);
        let millis = self
            .base_drop_interval_ms
            .saturating_sub(decrease)
            .max(self.min_drop_interval_ms);
        Duration::from_millis(millis)
    }

    /// Returns the gravity interval while soft drop is held.
    #[must_use]
    pub fn soft_drop_interval(&self, interval: Duration) -> Duration {
        let floor = Duration::from_millis(self.min_soft_drop_interval_ms);
        (interval / self.soft_drop_divisor.max(1)).max(floor)
    }
}
