//! Deeltjesveld achter het contactformulier.
//!
//! Basisposities en kleuren komen uit een geseedde generator, zodat twee
//! velden met dezelfde seed identiek zijn. De drift is in gesloten vorm
//! uitgedrukt in de verstreken tijd en stapelt dus niet op per frame.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::clock::AnimationClock;

/// Halve breedte van het veld op de x- en y-as.
const SPREAD_XY: f32 = 4.0;
/// Halve diepte van het veld op de z-as.
const SPREAD_Z: f32 = 2.0;
/// Drift-amplitudes (per-frame stappen van 0.005 en 0.01 bij 60 fps).
const DRIFT_X: f64 = 0.3;
const DRIFT_Y: f64 = 0.6;
/// Faseverschuiving per deeltjesindex.
const PHASE_STEP_X: f64 = 0.05;
const PHASE_STEP_Y: f64 = 0.1;

pub const DEFAULT_PARTICLE_COUNT: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct ParticleField {
    base: Vec<[f32; 3]>,
    colors: Vec<[f32; 3]>,
}

impl ParticleField {
    #[must_use]
    pub fn new(count: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut base = Vec::with_capacity(count);
        let mut colors = Vec::with_capacity(count);

        for _ in 0..count {
            base.push([
                (rng.random::<f32>() - 0.5) * SPREAD_XY * 2.0,
                (rng.random::<f32>() - 0.5) * SPREAD_XY * 2.0,
                (rng.random::<f32>() - 0.5) * SPREAD_Z * 2.0,
            ]);
            colors.push([
                rng.random::<f32>() * 0.5 + 0.5,
                rng.random::<f32>() * 0.5 + 0.7,
                1.0,
            ]);
        }

        Self { base, colors }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.base.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }

    #[must_use]
    pub fn base_positions(&self) -> &[[f32; 3]] {
        &self.base
    }

    /// Posities op het tijdstip van de klok, als platte xyz-buffer.
    #[must_use]
    pub fn positions(&self, clock: &AnimationClock) -> Vec<f32> {
        let t = clock.elapsed_seconds();
        let mut buffer = Vec::with_capacity(self.base.len() * 3);

        for (index, [x, y, z]) in self.base.iter().enumerate() {
            let i = index as f64;
            let phase_x = i * PHASE_STEP_X;
            let phase_y = i * PHASE_STEP_Y;
            let dx = DRIFT_X * ((t + phase_x).sin() - phase_x.sin());
            let dy = -DRIFT_Y * ((t + phase_y).cos() - phase_y.cos());

            buffer.push(*x + dx as f32);
            buffer.push(*y + dy as f32);
            buffer.push(*z);
        }

        buffer
    }

    /// Vertexkleuren als platte rgb-buffer.
    #[must_use]
    pub fn colors(&self) -> Vec<f32> {
        self.colors.iter().flatten().copied().collect()
    }
}

impl Default for ParticleField {
    fn default() -> Self {
        Self::new(DEFAULT_PARTICLE_COUNT, 0)
    }
}
