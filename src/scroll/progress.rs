//! Afgeleide signalen: sectie-voortgang en geschaalde scroll-veelvouden.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{ScrollDirection, ScrollState};

/// Fouten bij het opbouwen van een [`SectionRange`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RangeError {
    #[error("trigger `{name}` moet een eindig getal zijn, kreeg {value}")]
    NonFinite { name: &'static str, value: f64 },
    #[error("sectiehoogte moet eindig en niet-negatief zijn, kreeg {0}")]
    InvalidHeight(f64),
    #[error("viewporthoogte moet eindig en niet-negatief zijn, kreeg {0}")]
    InvalidViewport(f64),
    #[error("bereik van {start} tot {end} is te groot")]
    SpanOverflow { start: f64, end: f64 },
}

/// Scrollbereik waarbinnen een sectie van voortgang 0 naar 1 loopt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionRange {
    pub start_trigger: f64,
    pub end_trigger: f64,
}

impl SectionRange {
    pub fn new(start_trigger: f64, end_trigger: f64) -> Result<Self, RangeError> {
        if !start_trigger.is_finite() {
            return Err(RangeError::NonFinite {
                name: "start",
                value: start_trigger,
            });
        }
        if !end_trigger.is_finite() {
            return Err(RangeError::NonFinite {
                name: "end",
                value: end_trigger,
            });
        }
        if !(end_trigger - start_trigger).is_finite() {
            return Err(RangeError::SpanOverflow {
                start: start_trigger,
                end: end_trigger,
            });
        }
        Ok(Self {
            start_trigger,
            end_trigger,
        })
    }

    /// Bereken het bereik uit een sectie-layout en twee snijpunten met de
    /// viewport.
    pub fn from_layout(
        layout: &SectionLayout,
        viewport_height: f64,
        start: Intersection,
        end: Intersection,
    ) -> Result<Self, RangeError> {
        if !layout.height.is_finite() || layout.height < 0.0 {
            return Err(RangeError::InvalidHeight(layout.height));
        }
        if !viewport_height.is_finite() || viewport_height < 0.0 {
            return Err(RangeError::InvalidViewport(viewport_height));
        }

        Self::new(
            start.trigger(layout, viewport_height),
            end.trigger(layout, viewport_height),
        )
    }

    /// Van "sectie-begin raakt viewport-onderkant" tot "sectie-einde raakt
    /// viewport-bovenkant".
    pub fn viewport_pass(layout: &SectionLayout, viewport_height: f64) -> Result<Self, RangeError> {
        Self::from_layout(
            layout,
            viewport_height,
            Intersection::new(Edge::Start, Edge::End),
            Intersection::new(Edge::End, Edge::Start),
        )
    }

    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.end_trigger == self.start_trigger
    }

    /// Genormaliseerde voortgang van `offset_y` binnen dit bereik, altijd
    /// in `[0, 1]`.
    #[must_use]
    pub fn progress(&self, offset_y: f64) -> f64 {
        if offset_y.is_nan() {
            return 0.0;
        }
        if self.is_degenerate() {
            return if offset_y >= self.start_trigger { 1.0 } else { 0.0 };
        }

        let raw = (offset_y - self.start_trigger) / (self.end_trigger - self.start_trigger);
        if raw.is_nan() {
            return 0.0;
        }
        raw.clamp(0.0, 1.0)
    }
}

/// Positie en hoogte van een sectie op de pagina, in pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionLayout {
    pub name: String,
    pub top: f64,
    pub height: f64,
}

impl SectionLayout {
    #[must_use]
    pub fn new(name: impl Into<String>, top: f64, height: f64) -> Self {
        Self {
            name: name.into(),
            top,
            height,
        }
    }
}

/// Rand van een sectie of viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Start,
    Center,
    End,
}

impl Edge {
    fn fraction(self) -> f64 {
        match self {
            Self::Start => 0.0,
            Self::Center => 0.5,
            Self::End => 1.0,
        }
    }
}

/// Het moment waarop de `target`-rand van de sectie de `viewport`-rand
/// raakt, zoals `"start end"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Intersection {
    pub target: Edge,
    pub viewport: Edge,
}

impl Intersection {
    #[must_use]
    pub const fn new(target: Edge, viewport: Edge) -> Self {
        Self { target, viewport }
    }

    fn trigger(self, layout: &SectionLayout, viewport_height: f64) -> f64 {
        layout.top + self.target.fraction() * layout.height
            - self.viewport.fraction() * viewport_height
    }
}

/// Signalen die de mappers als invoer gebruiken.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedSignals {
    pub progress: f64,
    pub offset_y: f64,
    pub direction: ScrollDirection,
    pub speed_px_per_ms: f64,
}

impl DerivedSignals {
    /// Scroll-offset vermenigvuldigd met een factor, bv. `scrollY * 0.001`.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> f64 {
        self.offset_y * factor
    }
}

/// Leid de sectie-signalen af uit de huidige scrolltoestand.
#[must_use]
pub fn derive_signals(scroll: &ScrollState, range: &SectionRange) -> DerivedSignals {
    DerivedSignals {
        progress: range.progress(scroll.offset_y),
        offset_y: scroll.offset_y,
        direction: scroll.direction,
        speed_px_per_ms: scroll.speed_px_per_ms,
    }
}
