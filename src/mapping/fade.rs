//! Stuksgewijs lineaire curves voor "fade in, vasthouden, fade out".

use super::{Mapper, MappingError, MappingInput};

/// Interpoleert lineair tussen opeenvolgende `(breekpunt, waarde)` paren.
#[derive(Debug, Clone, PartialEq)]
pub struct PiecewiseFade {
    breakpoints: Vec<f64>,
    values: Vec<f64>,
}

impl PiecewiseFade {
    pub fn new(breakpoints: Vec<f64>, values: Vec<f64>) -> Result<Self, MappingError> {
        if breakpoints.len() != values.len() {
            return Err(MappingError::LengthMismatch {
                breakpoints: breakpoints.len(),
                values: values.len(),
            });
        }
        if breakpoints.is_empty() {
            return Err(MappingError::Empty);
        }
        if let Some(index) = breakpoints.iter().position(|b| !b.is_finite()) {
            return Err(MappingError::NonFiniteBreakpoint { index });
        }
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(MappingError::NonFiniteValue { index });
        }
        if let Some(index) = breakpoints.windows(2).position(|pair| pair[1] < pair[0]) {
            return Err(MappingError::Unordered { index: index + 1 });
        }

        Ok(Self {
            breakpoints,
            values,
        })
    }

    /// Vier-punts curve, zoals `[0, 0.2, 0.8, 1] → [0, 1, 1, 0]`.
    pub fn four_point(breakpoints: [f64; 4], values: [f64; 4]) -> Result<Self, MappingError> {
        Self::new(breakpoints.to_vec(), values.to_vec())
    }

    #[must_use]
    pub fn breakpoints(&self) -> &[f64] {
        &self.breakpoints
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Waarde van de curve bij `progress`. Buiten de breekpunten wordt de
    /// eerste of laatste waarde vastgehouden; een segment zonder breedte
    /// springt naar zijn rechterwaarde, ook op het eerste breekpunt.
    #[must_use]
    pub fn sample(&self, progress: f64) -> f64 {
        let first = self.values[0];
        let last = self.values[self.values.len() - 1];

        if progress.is_nan() || progress < self.breakpoints[0] {
            return first;
        }
        if progress >= self.breakpoints[self.breakpoints.len() - 1] {
            return last;
        }

        // Eerste breekpunt strikt groter dan `progress`; bestaat altijd hier.
        let upper = self
            .breakpoints
            .iter()
            .position(|b| *b > progress)
            .unwrap_or(self.breakpoints.len() - 1);
        let lower = upper - 1;

        let (p0, p1) = (self.breakpoints[lower], self.breakpoints[upper]);
        let (v0, v1) = (self.values[lower], self.values[upper]);
        v0 + (progress - p0) / (p1 - p0) * (v1 - v0)
    }
}

impl Mapper for PiecewiseFade {
    fn map(&self, input: &MappingInput) -> f64 {
        self.sample(input.progress)
    }
}

#[cfg(test)]
mod tests {
    use super::PiecewiseFade;
    use crate::mapping::MappingError;

    fn opacity_curve() -> PiecewiseFade {
        PiecewiseFade::four_point([0.0, 0.2, 0.8, 1.0], [0.0, 1.0, 1.0, 0.0]).unwrap()
    }

    #[test]
    fn fades_in_holds_and_fades_out() {
        let fade = opacity_curve();
        assert!((fade.sample(0.1) - 0.5).abs() < 1e-12);
        assert!((fade.sample(0.5) - 1.0).abs() < 1e-12);
        assert!((fade.sample(0.9) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn hits_values_at_breakpoints() {
        let fade = opacity_curve();
        assert!(fade.sample(0.0).abs() < 1e-12);
        assert!((fade.sample(0.2) - 1.0).abs() < 1e-12);
        assert!((fade.sample(0.8) - 1.0).abs() < 1e-12);
        assert!(fade.sample(1.0).abs() < 1e-12);
    }

    #[test]
    fn holds_outside_range_and_on_nan() {
        let scale =
            PiecewiseFade::four_point([0.0, 0.2, 0.8, 1.0], [0.9, 1.0, 1.0, 0.95]).unwrap();
        assert!((scale.sample(-3.0) - 0.9).abs() < 1e-12);
        assert!((scale.sample(7.0) - 0.95).abs() < 1e-12);
        assert!((scale.sample(f64::NAN) - 0.9).abs() < 1e-12);
    }

    #[test]
    fn zero_width_segment_jumps_to_right_value() {
        let step = PiecewiseFade::new(vec![0.0, 0.5, 0.5, 1.0], vec![0.0, 0.0, 1.0, 1.0]).unwrap();
        assert!(step.sample(0.49).abs() < 1e-12);
        assert!((step.sample(0.5) - 1.0).abs() < 1e-12);
        assert!((step.sample(0.51) - 1.0).abs() < 1e-12);

        let leading = PiecewiseFade::new(vec![0.5, 0.5, 1.0], vec![0.0, 1.0, 1.0]).unwrap();
        assert!(leading.sample(0.49).abs() < 1e-12);
        assert!((leading.sample(0.5) - 1.0).abs() < 1e-12);
        assert!((leading.sample(0.75) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn single_point_is_constant() {
        let constant = PiecewiseFade::new(vec![0.3], vec![7.0]).unwrap();
        assert!((constant.sample(0.0) - 7.0).abs() < f64::EPSILON);
        assert!((constant.sample(1.0) - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_invalid_curves() {
        assert_eq!(
            PiecewiseFade::new(vec![0.0, 1.0], vec![0.0]),
            Err(MappingError::LengthMismatch {
                breakpoints: 2,
                values: 1
            })
        );
        assert_eq!(
            PiecewiseFade::new(Vec::new(), Vec::new()),
            Err(MappingError::Empty)
        );
        assert_eq!(
            PiecewiseFade::new(vec![0.0, 0.8, 0.2], vec![0.0, 1.0, 0.0]),
            Err(MappingError::Unordered { index: 2 })
        );
        assert_eq!(
            PiecewiseFade::new(vec![0.0, f64::NAN], vec![0.0, 1.0]),
            Err(MappingError::NonFiniteBreakpoint { index: 1 })
        );
    }
}
