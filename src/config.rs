//! Configuratie die de pagina-shell aan de engine doorgeeft.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scene::particles::DEFAULT_PARTICLE_COUNT;
use crate::scroll::progress::SectionLayout;

/// Bovengrens voor het aantal deeltjes in het contactveld.
pub const MAX_PARTICLES: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("viewporthoogte moet groter dan nul zijn, kreeg {0}")]
    InvalidViewport(f64),
    #[error("sectie op positie {0} heeft geen naam")]
    UnnamedSection(usize),
    #[error("sectie `{0}` komt meerdere keren voor")]
    DuplicateSection(String),
    #[error("sectie `{0}` heeft een ongeldige positie of hoogte")]
    InvalidLayout(String),
    #[error("throttle-interval moet eindig en niet-negatief zijn, kreeg {0}")]
    InvalidThrottle(f64),
    #[error("maximaal 10000 deeltjes toegestaan, kreeg {0}")]
    TooManyParticles(usize),
}

/// Layout en instellingen van de portfolio-pagina.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MotionConfig {
    pub viewport_height: f64,
    pub sections: Vec<SectionLayout>,
    /// Minimale tijd tussen scroll-notificaties; `None` schakelt throttling uit.
    pub throttle_ms: Option<f64>,
    pub particle_count: usize,
    pub particle_seed: u64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            viewport_height: 900.0,
            sections: vec![
                SectionLayout::new("hero", 0.0, 900.0),
                SectionLayout::new("about", 900.0, 1_000.0),
                SectionLayout::new("projects", 1_900.0, 1_200.0),
                SectionLayout::new("contact", 3_100.0, 1_100.0),
            ],
            throttle_ms: None,
            particle_count: DEFAULT_PARTICLE_COUNT,
            particle_seed: 0,
        }
    }
}

impl MotionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.viewport_height.is_finite() || self.viewport_height <= 0.0 {
            return Err(ConfigError::InvalidViewport(self.viewport_height));
        }

        let mut seen = HashSet::new();
        for (index, section) in self.sections.iter().enumerate() {
            let name = section.name.trim();
            if name.is_empty() {
                return Err(ConfigError::UnnamedSection(index));
            }
            if !seen.insert(name.to_ascii_lowercase()) {
                return Err(ConfigError::DuplicateSection(name.to_owned()));
            }
            if !section.top.is_finite() || !section.height.is_finite() || section.height < 0.0 {
                return Err(ConfigError::InvalidLayout(name.to_owned()));
            }
        }

        if let Some(throttle) = self.throttle_ms {
            if !throttle.is_finite() || throttle < 0.0 {
                return Err(ConfigError::InvalidThrottle(throttle));
            }
        }

        if self.particle_count > MAX_PARTICLES {
            return Err(ConfigError::TooManyParticles(self.particle_count));
        }

        Ok(())
    }

    #[must_use]
    pub fn section(&self, name: &str) -> Option<&SectionLayout> {
        self.sections
            .iter()
            .find(|section| section.name.eq_ignore_ascii_case(name))
    }
}
