use serde::{Deserialize, Serialize};

use crate::core::rotation::RotationDirection;

/// An edge-triggered player intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    MoveLeft,
    MoveRight,
    RotateCcw,
    RotateCw,
    HardDrop,
    Swap,
}

impl Command {
    pub const LEN: usize = 6;

    /// All commands in the order a tick consumes them.
    pub const ALL: [Command; Self::LEN] = [
        Command::MoveLeft,
        Command::MoveRight,
        Command::RotateCcw,
        Command::RotateCw,
        Command::HardDrop,
        Command::Swap,
    ];

    #[must_use]
    pub const fn rotate(direction: RotationDirection) -> Self {
        match direction {
            RotationDirection::Clockwise => Command::RotateCw,
            RotationDirection::CounterClockwise => Command::RotateCcw,
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// Input signals collected between two ticks.
///
/// Commands are edge-triggered: pressing one any number of times before a
/// tick yields a single pending intent, which [`Self::take`] clears. Soft
/// drop is level-triggered: it stays set until released.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Command, InputBuffer};
///
/// let mut input = InputBuffer::default();
/// input.press(Command::MoveLeft);
/// input.press(Command::MoveLeft);
///
/// assert!(input.take(Command::MoveLeft));
/// assert!(!input.take(Command::MoveLeft));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBuffer {
    pending: [bool; Command::LEN],
    soft_drop: bool,
}

impl InputBuffer {
    pub fn press(&mut self, command: Command) {
        self.pending[command.index()] = true;
    }

    /// Returns whether `command` was pending, clearing it.
    pub fn take(&mut self, command: Command) -> bool {
        std::mem::take(&mut self.pending[command.index()])
    }

    #[must_use]
    pub fn is_pending(&self, command: Command) -> bool {
        self.pending[command.index()]
    }

    /// Drops every pending command. Soft drop is left as is.
    pub fn clear_pending(&mut self) {
        self.pending = [false; Command::LEN];
    }

    pub fn set_soft_drop(&mut self, active: bool) {
        self.soft_drop = active;
    }

    #[must_use]
    pub fn soft_drop(&self) -> bool {
        self.soft_drop
    }
}
