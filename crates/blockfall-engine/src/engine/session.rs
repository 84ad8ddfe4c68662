use std::time::Duration;

use rand::Rng as _;
use rand_pcg::Pcg32;
use tracing::{debug, info, trace};

use crate::{
    CommandError, PieceCollisionError,
    core::{board::Board, piece::Piece, rotation::RotationDirection},
};

use super::{
    config::EngineConfig,
    input::{Command, InputBuffer},
    randomizer::{PieceSeed, Randomizer, ShuffleSource},
    scoring::GameStats,
    snapshot::{PieceSnapshot, Snapshot},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    Running,
    Paused,
    GameOver,
}

fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// A falling-block session advanced by an external clock.
///
/// Adapters either buffer edge-triggered commands ([`Self::move_left`],
/// [`Self::hard_drop`], ...) which the next [`Self::tick`] consumes, or call
/// the `try_*` operations that apply immediately and report why they were
/// rejected. A rejected operation never changes the session.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Engine, EngineConfig, PieceKind, Unshuffled};
///
/// let mut engine = Engine::with_source(EngineConfig::default(), Unshuffled);
/// assert_eq!(engine.current().kind(), PieceKind::I);
/// assert_eq!(engine.next().kind(), PieceKind::O);
///
/// // The I piece falls through all 20 rows: 20 * 2 points.
/// assert_eq!(engine.try_hard_drop(), Ok(20));
/// assert_eq!(engine.stats().score(), 40);
/// assert_eq!(engine.current().kind(), PieceKind::O);
/// ```
#[derive(Debug, Clone)]
pub struct Engine<S = Pcg32> {
    config: EngineConfig,
    board: Board,
    randomizer: Randomizer<S>,
    current: Piece,
    next: Piece,
    stats: GameStats,
    input: InputBuffer,
    drop_accumulator: Duration,
    elapsed: Duration,
    paused: bool,
    game_over: bool,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Creates a session with default tuning and a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Creates a session with default tuning and a reproducible piece order.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self::with_config(EngineConfig::default(), seed)
    }

    #[must_use]
    pub fn with_config(config: EngineConfig, seed: PieceSeed) -> Self {
        Self::from_randomizer(config, Randomizer::with_seed(seed))
    }
}

impl<S: ShuffleSource> Engine<S> {
    /// Creates a session drawing bag permutations from `source`.
    #[must_use]
    pub fn with_source(config: EngineConfig, source: S) -> Self {
        Self::from_randomizer(config, Randomizer::with_source(source))
    }

    fn from_randomizer(config: EngineConfig, mut randomizer: Randomizer<S>) -> Self {
        let current = Piece::new(randomizer.pop_next(), config.spawn_anchor);
        let next = Piece::new(randomizer.pop_next(), config.spawn_anchor);
        let mut this = Self {
            stats: GameStats::new(&config),
            config,
            board: Board::EMPTY,
            randomizer,
            current,
            next,
            input: InputBuffer::default(),
            drop_accumulator: Duration::ZERO,
            elapsed: Duration::ZERO,
            paused: false,
            game_over: false,
        };
        this.check_spawn();
        this
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Replaces the board, keeping the pieces and counters.
    ///
    /// Meant for fixtures and puzzle setups; a current piece that now
    /// collides ends the session.
    pub fn set_board(&mut self, board: Board) {
        self.board = board;
        self.check_spawn();
    }

    #[must_use]
    pub fn current(&self) -> &Piece {
        &self.current
    }

    #[must_use]
    pub fn next(&self) -> &Piece {
        &self.next
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn input(&self) -> &InputBuffer {
        &self.input
    }

    /// Returns the total time ticked while running.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Game over takes precedence over pause.
    #[must_use]
    pub fn state(&self) -> SessionState {
        if self.game_over {
            SessionState::GameOver
        } else if self.paused {
            SessionState::Paused
        } else {
            SessionState::Running
        }
    }

    fn ensure_running(&self) -> Result<(), CommandError> {
        match self.state() {
            SessionState::Running => Ok(()),
            SessionState::Paused => Err(CommandError::Paused),
            SessionState::GameOver => Err(CommandError::GameOver),
        }
    }

    /// Gravity interval in effect for the next tick.
    #[must_use]
    pub fn active_drop_interval(&self) -> Duration {
        let interval = self.stats.drop_interval();
        if self.input.soft_drop() {
            self.config.soft_drop_interval(interval)
        } else {
            interval
        }
    }

    fn drop_distance(&self) -> u32 {
        let mut distance = 0;
        let mut piece = self.current;
        loop {
            let below = piece.moved(0, 1);
            if self.board.is_colliding(&below) {
                return distance;
            }
            piece = below;
            distance += 1;
        }
    }

    /// Returns where the current piece would land on a hard drop.
    #[must_use]
    pub fn ghost(&self) -> Piece {
        let distance = i32::try_from(self.drop_distance()).unwrap_or(i32::MAX);
        self.current.moved(0, distance)
    }

    /// Buffers an edge-triggered command for the next tick.
    ///
    /// Commands issued while the session is paused or over are discarded.
    pub fn press(&mut self, command: Command) {
        if self.state().is_running() {
            self.input.press(command);
        }
    }

    pub fn move_left(&mut self) {
        self.press(Command::MoveLeft);
    }

    pub fn move_right(&mut self) {
        self.press(Command::MoveRight);
    }

    pub fn rotate(&mut self, direction: RotationDirection) {
        self.press(Command::rotate(direction));
    }

    pub fn hard_drop(&mut self) {
        self.press(Command::HardDrop);
    }

    pub fn swap_hold(&mut self) {
        self.press(Command::Swap);
    }

    /// Sets the level-triggered soft drop flag.
    pub fn set_soft_drop(&mut self, active: bool) {
        self.input.set_soft_drop(active);
    }

    /// Moves the current piece by `(dx, dy)` if the target is free.
    pub fn try_move(&mut self, dx: i32, dy: i32) -> Result<(), CommandError> {
        self.ensure_running()?;
        let moved = self.current.moved(dx, dy);
        if self.board.is_colliding(&moved) {
            return Err(PieceCollisionError.into());
        }
        self.current = moved;
        Ok(())
    }

    /// Rotates the current piece, trying horizontal kicks.
    pub fn try_rotate(&mut self, direction: RotationDirection) -> Result<(), CommandError> {
        self.ensure_running()?;
        let rotated = self
            .current
            .super_rotated(direction, &self.board)
            .ok_or(PieceCollisionError)?;
        self.current = rotated;
        Ok(())
    }

    /// Drops the current piece to the bottom and locks it.
    ///
    /// Returns the number of rows travelled; each row is worth
    /// `hard_drop_points_per_row` on top of any line clear score.
    pub fn try_hard_drop(&mut self) -> Result<u32, CommandError> {
        self.ensure_running()?;
        let distance = self.drop_distance();
        self.current = self.ghost();
        self.lock_piece();
        self.stats.add_drop_points(u64::from(distance) * self.config.hard_drop_points_per_row);
        debug!(distance, "hard drop");
        Ok(distance)
    }

    /// Swaps the current piece with the next one.
    ///
    /// The next piece keeps its offsets and takes the current anchor. If it
    /// would collide there nothing changes; otherwise the previous current
    /// kind becomes the next piece, canonical and at the spawn anchor.
    pub fn swap_with_next(&mut self) -> Result<(), CommandError> {
        self.ensure_running()?;
        let candidate = self.next.at(self.current.anchor());
        if self.board.is_colliding(&candidate) {
            return Err(PieceCollisionError.into());
        }
        let previous = self.current.kind();
        self.current = candidate;
        self.next = Piece::new(previous, self.config.spawn_anchor);
        debug!(current = ?self.current.kind(), next = ?previous, "swapped with next");
        Ok(())
    }

    /// Toggles pause. Available in every state.
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        self.input.clear_pending();
        info!(paused = self.paused, "pause toggled");
    }

    /// Starts a new session with the same config and randomness source.
    pub fn restart(&mut self) {
        self.board = Board::EMPTY;
        self.randomizer.reset();
        self.current = Piece::new(self.randomizer.pop_next(), self.config.spawn_anchor);
        self.next = Piece::new(self.randomizer.pop_next(), self.config.spawn_anchor);
        self.stats = GameStats::new(&self.config);
        self.input = InputBuffer::default();
        self.drop_accumulator = Duration::ZERO;
        self.elapsed = Duration::ZERO;
        self.paused = false;
        self.game_over = false;
        info!("session restarted");
        self.check_spawn();
    }

    /// Advances the session by `dt`.
    ///
    /// Does nothing while paused or over. Otherwise consumes the buffered
    /// commands in [`Command::ALL`] order, then applies at most one gravity
    /// step once the accumulated time exceeds the active drop interval.
    pub fn tick(&mut self, dt: Duration) {
        if !self.state().is_running() {
            return;
        }
        self.elapsed = self.elapsed.saturating_add(dt);

        for command in Command::ALL {
            if !self.input.take(command) {
                continue;
            }
            if let Err(err) = self.apply(command) {
                trace!(?command, %err, "command rejected");
            }
        }
        if self.game_over {
            self.input.clear_pending();
            return;
        }

        self.drop_accumulator = self.drop_accumulator.saturating_add(dt);
        if self.drop_accumulator <= self.active_drop_interval() {
            return;
        }
        self.drop_accumulator = Duration::ZERO;

        let below = self.current.moved(0, 1);
        if self.board.is_colliding(&below) {
            self.lock_piece();
            return;
        }
        self.current = below;
        if self.input.soft_drop() {
            self.stats.add_drop_points(self.config.soft_drop_points_per_row);
        }
        trace!(anchor = ?self.current.anchor(), "gravity step");
    }

    fn apply(&mut self, command: Command) -> Result<(), CommandError> {
        match command {
            Command::MoveLeft => self.try_move(-1, 0),
            Command::MoveRight => self.try_move(1, 0),
            Command::RotateCcw => self.try_rotate(RotationDirection::CounterClockwise),
            Command::RotateCw => self.try_rotate(RotationDirection::Clockwise),
            Command::HardDrop => self.try_hard_drop().map(|_| ()),
            Command::Swap => self.swap_with_next(),
        }
    }

    fn lock_piece(&mut self) {
        let locked = self.current;
        self.board.merge(&locked);
        let cleared = self.board.clear_lines();
        let outcome = self.stats.complete_piece_drop(cleared, &self.config);
        debug!(
            kind = ?locked.kind(),
            anchor = ?locked.anchor(),
            cleared,
            awarded = outcome.awarded,
            combo = self.stats.combo(),
            "piece locked"
        );
        if outcome.levels_gained > 0 {
            info!(
                level = self.stats.level(),
                drop_interval_ms = duration_millis(self.stats.drop_interval()),
                "level up"
            );
        }

        if self.config.lock_out && locked.is_above_board() {
            self.game_over = true;
            info!(score = self.stats.score(), "game over: locked above the board");
            return;
        }
        self.spawn();
    }

    fn spawn(&mut self) {
        self.current = self.next.at(self.config.spawn_anchor);
        self.next = Piece::new(self.randomizer.pop_next(), self.config.spawn_anchor);
        self.check_spawn();
    }

    fn check_spawn(&mut self) {
        if self.board.is_colliding(&self.current) {
            self.game_over = true;
            info!(score = self.stats.score(), "game over: spawn blocked");
        }
    }

    /// Returns an owned view of the session for adapters.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board.clone(),
            current: PieceSnapshot::from(&self.current),
            next: PieceSnapshot::from(&self.next),
            ghost: self.ghost().anchor(),
            score: self.stats.score(),
            level: self.stats.level(),
            lines: self.stats.total_cleared_lines(),
            combo: self.stats.combo(),
            completed_pieces: self.stats.completed_pieces(),
            drop_interval_ms: duration_millis(self.stats.drop_interval()),
            soft_drop: self.input.soft_drop(),
            paused: self.paused,
            game_over: self.game_over,
            elapsed_ms: duration_millis(self.elapsed),
        }
    }
}
