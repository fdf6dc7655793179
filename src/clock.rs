//! Animatieklok van de renderloop.

use serde::Serialize;

/// Verstreken animatietijd in seconden. Loopt alleen vooruit; alleen
/// [`AnimationClock::reset`] (volledige herlaad) zet hem terug.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationClock {
    elapsed_seconds: f64,
    #[serde(skip)]
    origin_ms: Option<f64>,
}

impl AnimationClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Klok die al op `elapsed_seconds` staat.
    #[must_use]
    pub fn at(elapsed_seconds: f64) -> Self {
        let mut clock = Self::new();
        clock.advance_to(elapsed_seconds);
        clock
    }

    #[must_use]
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed_seconds
    }

    /// Zet de klok op `seconds`, tenzij dat terug in de tijd zou zijn.
    pub fn advance_to(&mut self, seconds: f64) {
        if seconds.is_finite() && seconds > self.elapsed_seconds {
            self.elapsed_seconds = seconds;
        }
    }

    pub fn advance_by(&mut self, delta_seconds: f64) {
        if delta_seconds.is_finite() && delta_seconds > 0.0 {
            self.elapsed_seconds += delta_seconds;
        }
    }

    /// Verwerk een frame-tijdstempel (bv. van `requestAnimationFrame`). Het
    /// eerste tijdstempel wordt het nulpunt.
    pub fn tick(&mut self, timestamp_ms: f64) {
        if !timestamp_ms.is_finite() {
            return;
        }
        let origin = *self.origin_ms.get_or_insert(timestamp_ms);
        self.advance_to((timestamp_ms - origin) / 1_000.0);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::AnimationClock;

    #[test]
    fn never_runs_backwards() {
        let mut clock = AnimationClock::new();
        clock.advance_to(2.0);
        clock.advance_to(1.0);
        clock.advance_by(-0.5);
        clock.advance_by(f64::NAN);
        assert!((clock.elapsed_seconds() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ticks_relative_to_first_timestamp() {
        let mut clock = AnimationClock::new();
        clock.tick(10_000.0);
        assert!(clock.elapsed_seconds().abs() < f64::EPSILON);
        clock.tick(11_500.0);
        assert!((clock.elapsed_seconds() - 1.5).abs() < 1e-12);
        clock.tick(11_000.0);
        assert!((clock.elapsed_seconds() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn reset_rewinds_to_zero() {
        let mut clock = AnimationClock::at(4.0);
        clock.reset();
        assert!(clock.elapsed_seconds().abs() < f64::EPSILON);
        clock.tick(500.0);
        assert!(clock.elapsed_seconds().abs() < f64::EPSILON);
    }
}
