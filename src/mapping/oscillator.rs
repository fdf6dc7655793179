//! Sinusvormige, scroll-onafhankelijke beweging (zweven, dobberen).

use super::{Mapper, MappingInput};

/// `amplitude * sin(elapsed * frequency + phase)`.
#[must_use]
pub fn oscillate(elapsed_seconds: f64, amplitude: f64, frequency: f64, phase: f64) -> f64 {
    amplitude * (elapsed_seconds * frequency + phase).sin()
}

/// Golfvorm van een [`Oscillator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Wave {
    #[default]
    Sine,
    Cosine,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oscillator {
    pub amplitude: f64,
    /// Hoekfrequentie in radialen per seconde.
    pub frequency: f64,
    pub phase: f64,
    /// Rustwaarde waar omheen geslingerd wordt.
    pub base: f64,
    pub wave: Wave,
}

impl Oscillator {
    #[must_use]
    pub const fn sine(amplitude: f64, frequency: f64, phase: f64) -> Self {
        Self {
            amplitude,
            frequency,
            phase,
            base: 0.0,
            wave: Wave::Sine,
        }
    }

    #[must_use]
    pub const fn cosine(amplitude: f64, frequency: f64, phase: f64) -> Self {
        Self {
            wave: Wave::Cosine,
            ..Self::sine(amplitude, frequency, phase)
        }
    }

    #[must_use]
    pub const fn around(mut self, base: f64) -> Self {
        self.base = base;
        self
    }

    #[must_use]
    pub fn sample(&self, elapsed_seconds: f64) -> f64 {
        let offset = match self.wave {
            Wave::Sine => oscillate(elapsed_seconds, self.amplitude, self.frequency, self.phase),
            Wave::Cosine => {
                self.amplitude * (elapsed_seconds * self.frequency + self.phase).cos()
            }
        };
        self.base + offset
    }
}

impl Mapper for Oscillator {
    fn map(&self, input: &MappingInput) -> f64 {
        self.sample(input.elapsed_seconds)
    }
}
