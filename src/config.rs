//! Engine and session configuration.

use std::time::Duration;

use crate::error::{EngineError, EngineResult};
use crate::rules::Color;

/// Search depth the computer plays at unless told otherwise.
pub const DEFAULT_DEPTH: u32 = 3;

/// Pause before the computer answers, so its reply does not land on the
/// same frame as the human's move.
pub const DEFAULT_THINK_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Plies searched, counting the computer's own move
    pub depth: u32,
    /// Seed for the root move shuffle; `None` draws one from the OS
    pub seed: Option<u64>,
    /// Side the computer plays
    pub computer_color: Color,
    /// Artificial delay applied by interactive callers
    pub think_delay: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            depth: DEFAULT_DEPTH,
            seed: None,
            computer_color: Color::Black,
            think_delay: DEFAULT_THINK_DELAY,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> EngineResult<()> {
        if self.depth == 0 {
            return Err(EngineError::InvalidDepth { depth: self.depth });
        }
        Ok(())
    }

    pub fn human_color(&self) -> Color {
        self.computer_color.opposite()
    }
}
