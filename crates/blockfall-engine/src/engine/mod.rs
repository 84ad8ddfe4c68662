//! Game session logic.
//!
//! This module orchestrates the core data structures into a playable
//! session driven by a single external clock:
//!
//! - [`Engine`] - session state, commands, gravity and the state machine
//! - [`Randomizer`] - 7-bag piece sequencing with a pluggable [`ShuffleSource`]
//! - [`GameStats`] - scoring policy, combo, level and drop interval
//! - [`InputBuffer`] - edge-triggered commands and the level-triggered soft drop
//! - [`Snapshot`] - read-only post-tick view for adapters
//! - [`EngineConfig`] - timing and scoring constants
//!
//! # Tick order
//!
//! Each [`Engine::tick`] while running:
//!
//! 1. Consumes buffered commands once each, in [`Command::ALL`] order
//! 2. Adds the elapsed time to the drop accumulator
//! 3. When the accumulator exceeds the active interval, moves the piece down
//!    one row or locks it, clears lines, scores and spawns the next piece

pub use self::{config::*, input::*, randomizer::*, scoring::*, session::*, snapshot::*};

mod config;
mod input;
mod randomizer;
mod scoring;
mod session;
mod snapshot;
