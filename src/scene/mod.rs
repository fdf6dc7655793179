//! Render targets en de scène die per frame hun parameters berekent.
//!
//! De scène bevat alleen statische elementconstanten. [`Scene::compute`] is
//! een pure functie van scrolltoestand en klok; schrijven naar de
//! scene-graph gebeurt uitsluitend via [`RenderTarget::apply`].

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::clock::AnimationClock;
use crate::mapping::{Mapper, Mapping, MappingError, MappingInput};
use crate::scroll::ScrollState;
use crate::scroll::progress::{RangeError, SectionRange, derive_signals};

pub mod particles;
pub mod presets;

/// Namen van visuele parameters die een render target kan ontvangen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Parameter {
    RotationX,
    RotationY,
    RotationZ,
    PositionX,
    PositionY,
    PositionZ,
    Opacity,
    Scale,
    /// Kleurtoon of gradienthoek in graden.
    Hue,
    /// Alpha van een tekstgloed.
    Glow,
}

impl Parameter {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::RotationX => "rotationX",
            Self::RotationY => "rotationY",
            Self::RotationZ => "rotationZ",
            Self::PositionX => "positionX",
            Self::PositionY => "positionY",
            Self::PositionZ => "positionZ",
            Self::Opacity => "opacity",
            Self::Scale => "scale",
            Self::Hue => "hue",
            Self::Glow => "glow",
        }
    }
}

/// Parameterwaarden van één element voor één frame.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct VisualParameterSet(BTreeMap<Parameter, f64>);

impl VisualParameterSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, parameter: Parameter, value: f64) {
        self.0.insert(parameter, value);
    }

    #[must_use]
    pub fn get(&self, parameter: Parameter) -> Option<f64> {
        self.0.get(&parameter).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Parameter, f64)> + '_ {
        self.0.iter().map(|(parameter, value)| (*parameter, *value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Een visueel element en de mappings die zijn parameters aansturen.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementSpec {
    pub id: String,
    /// Sectie waarvan de voortgang als `Signal::Progress` gebruikt wordt.
    pub section: String,
    /// Optioneel tekstlabel (bv. de technologie op een zwevende kubus).
    pub label: Option<String>,
    pub bindings: Vec<(Parameter, Mapping)>,
}

impl ElementSpec {
    #[must_use]
    pub fn new(id: impl Into<String>, section: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            section: section.into(),
            label: None,
            bindings: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn bind(mut self, parameter: Parameter, mapping: impl Into<Mapping>) -> Self {
        self.bindings.push((parameter, mapping.into()));
        self
    }

    /// Evalueer alle bindings. Latere bindings voor dezelfde parameter
    /// overschrijven eerdere.
    #[must_use]
    pub fn evaluate(&self, input: &MappingInput) -> VisualParameterSet {
        let mut params = VisualParameterSet::new();
        for (parameter, mapping) in &self.bindings {
            params.insert(*parameter, mapping.map(input));
        }
        params
    }
}

/// Berekende parameters van één element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementFrame {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub params: VisualParameterSet,
}

/// Ontvanger van berekende parameters (mesh, deeltjessysteem, kaart,
/// gradient). Moet ze toepassen vóór de volgende paint.
pub trait RenderTarget {
    fn apply(&mut self, params: &VisualParameterSet);
}

/// Render targets per element-id.
pub type RenderTargets = BTreeMap<String, Box<dyn RenderTarget>>;

/// Fouten bij het opbouwen van een scène.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    #[error("element `{element}` verwijst naar onbekende sectie `{section}`")]
    UnknownSection { element: String, section: String },
    #[error("element `{0}` bestaat al in de scène")]
    DuplicateElement(String),
    #[error(transparent)]
    Range(#[from] RangeError),
    #[error(transparent)]
    Mapping(#[from] MappingError),
}

/// Element met het scrollbereik van zijn sectie.
#[derive(Debug, Clone)]
struct SceneElement {
    spec: ElementSpec,
    range: SectionRange,
}

#[derive(Debug, Clone, Default)]
pub struct Scene {
    sections: BTreeMap<String, SectionRange>,
    elements: Vec<SceneElement>,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registreer of vervang het scrollbereik van een sectie.
    pub fn set_section(&mut self, name: impl Into<String>, range: SectionRange) {
        let name = name.into();
        for element in &mut self.elements {
            if element.spec.section == name {
                element.range = range;
            }
        }
        self.sections.insert(name, range);
    }

    pub fn add_element(&mut self, element: ElementSpec) -> Result<(), SceneError> {
        let Some(range) = self.sections.get(&element.section).copied() else {
            return Err(SceneError::UnknownSection {
                element: element.id,
                section: element.section,
            });
        };
        if self.elements.iter().any(|existing| existing.spec.id == element.id) {
            return Err(SceneError::DuplicateElement(element.id));
        }

        log::debug!(
            "element `{}` toegevoegd aan sectie `{}` met {} bindings",
            element.id,
            element.section,
            element.bindings.len()
        );
        self.elements.push(SceneElement {
            spec: element,
            range,
        });
        Ok(())
    }

    #[must_use]
    pub fn section(&self, name: &str) -> Option<&SectionRange> {
        self.sections.get(name)
    }

    pub fn sections(&self) -> impl Iterator<Item = (&str, &SectionRange)> + '_ {
        self.sections
            .iter()
            .map(|(name, range)| (name.as_str(), range))
    }

    /// Elementen in registratievolgorde.
    pub fn elements(&self) -> impl ExactSizeIterator<Item = &ElementSpec> + '_ {
        self.elements.iter().map(|element| &element.spec)
    }

    #[must_use]
    pub fn element(&self, id: &str) -> Option<&ElementSpec> {
        self.elements().find(|element| element.id == id)
    }

    #[must_use]
    pub fn section_progress(&self, name: &str, scroll: &ScrollState) -> Option<f64> {
        self.sections
            .get(name)
            .map(|range| derive_signals(scroll, range).progress)
    }

    /// Bereken de parameters van één element.
    #[must_use]
    pub fn compute_element(
        &self,
        id: &str,
        scroll: &ScrollState,
        clock: &AnimationClock,
    ) -> Option<VisualParameterSet> {
        let element = self.elements.iter().find(|element| element.spec.id == id)?;
        Some(element.evaluate(scroll, clock))
    }

    /// Bereken alle elementen, in registratievolgorde.
    #[must_use]
    pub fn compute(&self, scroll: &ScrollState, clock: &AnimationClock) -> Vec<ElementFrame> {
        self.elements
            .iter()
            .map(|element| ElementFrame {
                id: element.spec.id.clone(),
                label: element.spec.label.clone(),
                params: element.evaluate(scroll, clock),
            })
            .collect()
    }

    /// Bereken en lever de parameters af aan de geregistreerde targets.
    /// Geeft het aantal bijgewerkte targets terug.
    pub fn apply(
        &self,
        scroll: &ScrollState,
        clock: &AnimationClock,
        targets: &mut RenderTargets,
    ) -> usize {
        let mut applied = 0;
        for frame in self.compute(scroll, clock) {
            if let Some(target) = targets.get_mut(&frame.id) {
                target.apply(&frame.params);
                applied += 1;
            }
        }
        applied
    }
}

impl SceneElement {
    fn evaluate(&self, scroll: &ScrollState, clock: &AnimationClock) -> VisualParameterSet {
        let input = MappingInput::new(&derive_signals(scroll, &self.range), clock);
        self.spec.evaluate(&input)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::{ElementSpec, Parameter, RenderTarget, RenderTargets, Scene, SceneError, VisualParameterSet};
    use crate::clock::AnimationClock;
    use crate::mapping::{LinearBlend, Mapping};
    use crate::scroll::ScrollState;
    use crate::scroll::progress::SectionRange;

    struct Recorder(Rc<RefCell<Vec<VisualParameterSet>>>);

    impl RenderTarget for Recorder {
        fn apply(&mut self, params: &VisualParameterSet) {
            self.0.borrow_mut().push(params.clone());
        }
    }

    fn scene() -> Scene {
        let mut scene = Scene::new();
        scene.set_section("contact", SectionRange::new(1_000.0, 2_000.0).unwrap());
        scene
            .add_element(
                ElementSpec::new("panel", "contact")
                    .bind(Parameter::PositionY, LinearBlend::over_progress(0.0, -50.0))
                    .bind(Parameter::Scale, Mapping::Constant(1.0)),
            )
            .unwrap();
        scene
    }

    fn at(offset_y: f64) -> ScrollState {
        ScrollState {
            offset_y,
            ..ScrollState::default()
        }
    }

    #[test]
    fn computes_progress_driven_parameters() {
        let scene = scene();
        let params = scene
            .compute_element("panel", &at(1_500.0), &AnimationClock::new())
            .unwrap();
        assert!((params.get(Parameter::PositionY).unwrap() + 25.0).abs() < 1e-12);
        assert!((params.get(Parameter::Scale).unwrap() - 1.0).abs() < f64::EPSILON);
        assert_eq!(params.get(Parameter::Opacity), None);
    }

    #[test]
    fn identical_inputs_give_identical_frames() {
        let scene = scene();
        let clock = AnimationClock::at(3.25);
        assert_eq!(scene.compute(&at(1_234.0), &clock), scene.compute(&at(1_234.0), &clock));
    }

    #[test]
    fn rejects_unknown_sections_and_duplicates() {
        let mut scene = scene();
        assert!(matches!(
            scene.add_element(ElementSpec::new("ghost", "footer")),
            Err(SceneError::UnknownSection { .. })
        ));
        assert_eq!(
            scene.add_element(ElementSpec::new("panel", "contact")),
            Err(SceneError::DuplicateElement("panel".to_owned()))
        );
    }

    #[test]
    fn apply_reaches_registered_targets_only() {
        let scene = scene();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut targets = RenderTargets::new();
        targets.insert("panel".to_owned(), Box::new(Recorder(Rc::clone(&log))));
        targets.insert("other".to_owned(), Box::new(Recorder(Rc::clone(&log))));

        let applied = scene.apply(&at(2_000.0), &AnimationClock::new(), &mut targets);
        assert_eq!(applied, 1);
        let log = log.borrow();
        assert_eq!(log.len(), 1);
        assert!((log[0].get(Parameter::PositionY).unwrap() + 50.0).abs() < 1e-12);
    }

    #[test]
    fn later_bindings_override_earlier_ones() {
        let element = ElementSpec::new("x", "contact")
            .bind(Parameter::Opacity, 0.2)
            .bind(Parameter::Opacity, 0.7);
        let params = element.evaluate(&crate::mapping::MappingInput::default());
        assert_eq!(params.len(), 1);
        assert!((params.get(Parameter::Opacity).unwrap() - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn replacing_a_section_moves_its_elements() {
        let mut scene = scene();
        scene.set_section("contact", SectionRange::new(0.0, 1_000.0).unwrap());
        let params = scene
            .compute_element("panel", &at(500.0), &AnimationClock::new())
            .unwrap();
        assert!((params.get(Parameter::PositionY).unwrap() + 25.0).abs() < 1e-12);
    }

    #[test]
    fn section_progress_is_reported_per_section() {
        let scene = scene();
        assert!((scene.section_progress("contact", &at(1_250.0)).unwrap() - 0.25).abs() < 1e-12);
        assert_eq!(scene.section_progress("hero", &at(0.0)), None);
    }
}
