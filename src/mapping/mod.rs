//! Visual Parameter Mapper: pure functies van afgeleide signalen en
//! animatietijd naar één numerieke visuele parameter.
//!
//! Elke mapper is stateless. Twee aanroepen met dezelfde [`MappingInput`]
//! geven bit-identieke uitkomsten.

use thiserror::Error;

use crate::clock::AnimationClock;
use crate::scroll::progress::DerivedSignals;

pub mod blend;
pub mod fade;
pub mod oscillator;
pub mod rotation;

pub use blend::{LinearBlend, linear_blend};
pub use fade::PiecewiseFade;
pub use oscillator::{Oscillator, Wave, oscillate};
pub use rotation::{CombinedRotation, combined_rotation};

/// Fouten bij het configureren van mappers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MappingError {
    #[error("piecewise fade verwacht evenveel breekpunten als waarden ({breakpoints} vs {values})")]
    LengthMismatch { breakpoints: usize, values: usize },
    #[error("piecewise fade heeft minimaal één breekpunt nodig")]
    Empty,
    #[error("breekpunt {index} is geen eindig getal")]
    NonFiniteBreakpoint { index: usize },
    #[error("waarde {index} is geen eindig getal")]
    NonFiniteValue { index: usize },
    #[error("breekpunten moeten oplopend zijn (index {index})")]
    Unordered { index: usize },
}

/// Alle invoer die een mapper per frame kan lezen.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MappingInput {
    pub progress: f64,
    pub offset_y: f64,
    pub speed_px_per_ms: f64,
    pub elapsed_seconds: f64,
}

impl MappingInput {
    #[must_use]
    pub fn new(signals: &DerivedSignals, clock: &AnimationClock) -> Self {
        Self {
            progress: signals.progress,
            offset_y: signals.offset_y,
            speed_px_per_ms: signals.speed_px_per_ms,
            elapsed_seconds: clock.elapsed_seconds(),
        }
    }

    /// Invoer met alleen voortgang en tijd, handig voor sectiecurves.
    #[must_use]
    pub fn at(progress: f64, elapsed_seconds: f64) -> Self {
        Self {
            progress,
            elapsed_seconds,
            ..Self::default()
        }
    }
}

/// Welk scroll-signaal een mapper als invoer neemt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Signal {
    /// Sectie-voortgang in `[0, 1]`.
    #[default]
    Progress,
    /// Ruwe scroll-offset in pixels.
    ScrollOffset,
    /// Scrollsnelheid in px/ms.
    Speed,
}

impl Signal {
    #[must_use]
    pub fn read(self, input: &MappingInput) -> f64 {
        match self {
            Self::Progress => input.progress,
            Self::ScrollOffset => input.offset_y,
            Self::Speed => input.speed_px_per_ms,
        }
    }
}

/// Trait die alle mappers implementeren.
pub trait Mapper {
    fn map(&self, input: &MappingInput) -> f64;
}

/// Samenstelbare beschrijving van één parameterbinding.
#[derive(Debug, Clone, PartialEq)]
pub enum Mapping {
    Constant(f64),
    Oscillator(Oscillator),
    LinearBlend(LinearBlend),
    PiecewiseFade(PiecewiseFade),
    CombinedRotation(CombinedRotation),
    /// Som van de deelmappings, bv. zweven plus scroll-drift.
    Sum(Vec<Mapping>),
}

impl Mapper for Mapping {
    fn map(&self, input: &MappingInput) -> f64 {
        match self {
            Self::Constant(value) => *value,
            Self::Oscillator(mapper) => mapper.map(input),
            Self::LinearBlend(mapper) => mapper.map(input),
            Self::PiecewiseFade(mapper) => mapper.map(input),
            Self::CombinedRotation(mapper) => mapper.map(input),
            Self::Sum(parts) => parts.iter().map(|part| part.map(input)).sum(),
        }
    }
}

impl From<Oscillator> for Mapping {
    fn from(value: Oscillator) -> Self {
        Self::Oscillator(value)
    }
}

impl From<LinearBlend> for Mapping {
    fn from(value: LinearBlend) -> Self {
        Self::LinearBlend(value)
    }
}

impl From<PiecewiseFade> for Mapping {
    fn from(value: PiecewiseFade) -> Self {
        Self::PiecewiseFade(value)
    }
}

impl From<CombinedRotation> for Mapping {
    fn from(value: CombinedRotation) -> Self {
        Self::CombinedRotation(value)
    }
}

impl From<f64> for Mapping {
    fn from(value: f64) -> Self {
        Self::Constant(value)
    }
}
