//! Rotatie die idle-draaiing koppelt aan scroll-gedreven draaiing.

use super::{Mapper, MappingInput, Signal};

/// `elapsed * base_speed + progress * scroll_influence`.
#[must_use]
pub fn combined_rotation(
    elapsed_seconds: f64,
    base_speed: f64,
    progress: f64,
    scroll_influence: f64,
) -> f64 {
    elapsed_seconds * base_speed + progress * scroll_influence
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombinedRotation {
    pub input: Signal,
    /// Radialen per seconde.
    pub base_speed: f64,
    pub scroll_influence: f64,
}

impl CombinedRotation {
    #[must_use]
    pub const fn new(input: Signal, base_speed: f64, scroll_influence: f64) -> Self {
        Self {
            input,
            base_speed,
            scroll_influence,
        }
    }

    /// Alleen tijdgedreven draaiing.
    #[must_use]
    pub const fn idle(base_speed: f64) -> Self {
        Self::new(Signal::Progress, base_speed, 0.0)
    }
}

impl Mapper for CombinedRotation {
    fn map(&self, input: &MappingInput) -> f64 {
        combined_rotation(
            input.elapsed_seconds,
            self.base_speed,
            self.input.read(input),
            self.scroll_influence,
        )
    }
}
