//! Simulation core for a falling-block puzzle game.
//!
//! The crate is split in two layers:
//!
//! - [`core`] - geometry: the shape table, pieces, the board with its
//!   collision rule, and the rotation system with horizontal kicks.
//! - [`engine`] - the session: 7-bag randomizer, scoring policy, input
//!   buffering, gravity timing and the Running/Paused/GameOver state machine.
//!
//! Adapters (renderers, input decoders) only talk to [`Engine`]: they issue
//! commands, call [`Engine::tick`] once per clock pulse and read a
//! [`Snapshot`].
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use blockfall_engine::{Engine, PieceSeed};
//!
//! let mut engine = Engine::with_seed(PieceSeed::from(42_u128));
//! engine.move_left();
//! engine.hard_drop();
//! engine.tick(Duration::from_millis(16));
//!
//! let snapshot = engine.snapshot();
//! assert!(snapshot.score > 0);
//! assert!(!snapshot.game_over);
//! ```

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("piece colliding with the board")]
pub struct PieceCollisionError;

/// Reason a direct engine command left the session unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum CommandError {
    #[display("{_0}")]
    PieceCollision(PieceCollisionError),
    #[display("session is paused")]
    Paused,
    #[display("session is over")]
    GameOver,
}

impl From<PieceCollisionError> for CommandError {
    fn from(err: PieceCollisionError) -> Self {
        CommandError::PieceCollision(err)
    }
}
