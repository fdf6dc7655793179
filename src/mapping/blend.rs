//! Lineaire scroll-blend voor camera-drift, parallax en fades.

use super::{Mapper, MappingInput, Signal};

/// `base + progress * delta`.
#[must_use]
pub fn linear_blend(progress: f64, base: f64, delta: f64) -> f64 {
    base + progress * delta
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearBlend {
    pub input: Signal,
    pub base: f64,
    pub delta: f64,
}

impl LinearBlend {
    #[must_use]
    pub const fn new(input: Signal, base: f64, delta: f64) -> Self {
        Self { input, base, delta }
    }

    /// Blend over de sectie-voortgang.
    #[must_use]
    pub const fn over_progress(base: f64, delta: f64) -> Self {
        Self::new(Signal::Progress, base, delta)
    }

    /// Blend over de ruwe scroll-offset (`base + scrollY * factor`).
    #[must_use]
    pub const fn over_scroll(base: f64, factor: f64) -> Self {
        Self::new(Signal::ScrollOffset, base, factor)
    }
}

impl Mapper for LinearBlend {
    fn map(&self, input: &MappingInput) -> f64 {
        linear_blend(self.input.read(input), self.base, self.delta)
    }
}
