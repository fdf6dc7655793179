//! Elementpresets van de portfolio-pagina.
//!
//! Elke preset beschrijft één geanimeerd element als set parameterbindings.
//! Waar de pagina per frame optelde (zoals de globe die elk frame 0.01 rad
//! draait) staat hier de gesloten vorm in verstreken tijd, uitgaande van
//! 60 frames per seconde.

use crate::config::MotionConfig;
use crate::mapping::{CombinedRotation, LinearBlend, Mapping, MappingError, Oscillator, PiecewiseFade, Signal};
use crate::scroll::progress::SectionRange;

use super::{ElementSpec, Parameter, Scene, SceneError};

pub const SECTION_HERO: &str = "hero";
pub const SECTION_ABOUT: &str = "about";
pub const SECTION_PROJECTS: &str = "projects";
pub const SECTION_CONTACT: &str = "contact";

/// Labels van de zwevende kubussen in de hero.
pub const TECH_STACK: &[&str] = &["React", "Three.js", "TypeScript", "Node.js", "Next.js", "Fastify.js"];

/// Aangenomen framerate bij het omzetten van per-frame stappen.
const FRAMES_PER_SECOND: f64 = 60.0;

/// Draaiing van de globe per frame, in radialen.
const GLOBE_STEP_PER_FRAME: f64 = 0.01;

/// Breekpunten van de fade-curves van het contactpaneel.
const PANEL_BREAKPOINTS: [f64; 4] = [0.0, 0.2, 0.8, 1.0];

/// Zwevende kubus `index` in de hero.
#[must_use]
pub fn floating_cube(index: usize, label: &str) -> ElementSpec {
    let i = index as f64;
    let base_y = i.sin() * 2.0;

    ElementSpec::new(format!("hero-cube-{index}"), SECTION_HERO)
        .with_label(label)
        .bind(Parameter::PositionX, (i - 1.5) * 3.0)
        .bind(Parameter::PositionY, Oscillator::sine(0.1, 2.0, 0.0).around(base_y))
        .bind(Parameter::PositionZ, -2.0)
        .bind(Parameter::RotationX, CombinedRotation::idle(0.2))
        .bind(Parameter::RotationY, CombinedRotation::idle(0.3))
        .bind(Parameter::Hue, 200.0 + i * 30.0)
}

/// Draaiende wireframe-globe in de about-sectie.
#[must_use]
pub fn globe() -> ElementSpec {
    ElementSpec::new("about-globe", SECTION_ABOUT)
        .bind(
            Parameter::RotationY,
            CombinedRotation::idle(GLOBE_STEP_PER_FRAME * FRAMES_PER_SECOND),
        )
        .bind(Parameter::Opacity, 0.6)
        .bind(Parameter::Scale, 1.0)
}

/// Groep met e-mail-, telefoon- en locatie-iconen naast het formulier.
#[must_use]
pub fn contact_icons() -> ElementSpec {
    ElementSpec::new("contact-icons", SECTION_CONTACT)
        .bind(
            Parameter::RotationY,
            CombinedRotation::new(Signal::ScrollOffset, 0.1, 0.001 * 0.2),
        )
        .bind(
            Parameter::PositionY,
            Mapping::Sum(vec![
                Oscillator::sine(0.5, 0.5, 0.0).into(),
                LinearBlend::over_scroll(0.0, -0.001 * 0.3).into(),
            ]),
        )
}

/// Rotatie van het deeltjesveld achter het formulier.
#[must_use]
pub fn form_particles() -> ElementSpec {
    ElementSpec::new("contact-particles", SECTION_CONTACT)
        .bind(Parameter::RotationY, LinearBlend::over_scroll(0.0, 0.0005))
}

/// Het contactpaneel: drift omhoog, fade in/uit en lichte schaalverandering
/// over het volledige scrollbereik van de sectie.
pub fn contact_panel() -> Result<ElementSpec, MappingError> {
    let opacity = PiecewiseFade::four_point(PANEL_BREAKPOINTS, [0.0, 1.0, 1.0, 0.0])?;
    let scale = PiecewiseFade::four_point(PANEL_BREAKPOINTS, [0.9, 1.0, 1.0, 0.95])?;

    Ok(ElementSpec::new("contact-panel", SECTION_CONTACT)
        .bind(Parameter::PositionY, LinearBlend::over_progress(0.0, -50.0))
        .bind(Parameter::Opacity, opacity)
        .bind(Parameter::Scale, scale))
}

/// Conic-gradient overlay; `hue` is de starthoek in graden.
#[must_use]
pub fn gradient_overlay() -> ElementSpec {
    ElementSpec::new("contact-gradient", SECTION_CONTACT)
        .bind(Parameter::Hue, LinearBlend::over_scroll(0.0, 0.1))
}

/// Tekstgloed achter de contacttitel.
#[must_use]
pub fn heading_glow() -> ElementSpec {
    ElementSpec::new("contact-heading", SECTION_CONTACT)
        .bind(Parameter::Glow, LinearBlend::over_scroll(0.4, 0.0001))
}

/// Bouw de standaard portfolio-scène uit de configuratie.
pub fn portfolio_scene(config: &MotionConfig) -> Result<Scene, SceneError> {
    let mut scene = Scene::new();

    for layout in &config.sections {
        let range = SectionRange::viewport_pass(layout, config.viewport_height)?;
        log::debug!(
            "sectie `{}`: voortgang van {} tot {}",
            layout.name,
            range.start_trigger,
            range.end_trigger
        );
        scene.set_section(layout.name.trim().to_ascii_lowercase(), range);
    }

    for (index, label) in TECH_STACK.iter().enumerate() {
        scene.add_element(floating_cube(index, label))?;
    }
    scene.add_element(globe())?;
    scene.add_element(contact_icons())?;
    scene.add_element(form_particles())?;
    scene.add_element(contact_panel()?)?;
    scene.add_element(gradient_overlay())?;
    scene.add_element(heading_glow())?;

    Ok(scene)
}
