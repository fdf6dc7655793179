#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod clock;
pub mod config;
pub mod contact;
pub mod mapping;
pub mod scene;
pub mod scroll;

use std::collections::BTreeMap;
use std::fmt;

use clock::AnimationClock;
use config::{ConfigError, MotionConfig};
use scene::particles::ParticleField;
use scene::presets::portfolio_scene;
use scene::{ElementFrame, Scene, SceneError};
use scroll::{
    SamplerError, ScrollMount, ScrollSampler, ScrollSignal, ScrollState, Subscription,
};
use serde::Serialize;
use thiserror::Error;
use wasm_bindgen::prelude::*;

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))] {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            console_error_panic_hook::set_once();
            init_logger();
        }
    } else {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            // no-op fallback when panic hook is disabled
            init_logger();
        }
    }
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use log::LevelFilter;
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {
    // no-op fallback when debug logs are disabled
}

#[macro_export]
macro_rules! debug_log {
    ($($t:tt)*) => {{
        #[cfg(feature = "debug_logs")]
        {
            #[cfg(target_arch = "wasm32")]
            {
                ::web_sys::console::log_1(&::wasm_bindgen::JsValue::from_str(&format!($($t)*)));
            }
            #[cfg(not(target_arch = "wasm32"))]
            {
                println!("{}", format!($($t)*));
            }
        }
    }};
}

/// Fouten van de engine-facade.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("ongeldige configuratie: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error(transparent)]
    Sampler(#[from] SamplerError),
}

/// Alles wat de renderer voor één frame nodig heeft.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameSnapshot {
    pub scroll: ScrollState,
    pub elapsed_seconds: f64,
    /// Voortgang per sectie.
    pub sections: BTreeMap<String, f64>,
    pub elements: Vec<ElementFrame>,
}

/// Public entry point for the page shell.
#[wasm_bindgen]
pub struct MotionEngine {
    initialized: bool,
    config: MotionConfig,
    sampler: ScrollSampler,
    clock: AnimationClock,
    scene: Scene,
    particles: ParticleField,
    subscriptions: Vec<Subscription>,
    #[cfg(target_arch = "wasm32")]
    window_mount: Option<ScrollMount<gloo::events::EventListener>>,
}

#[wasm_bindgen]
impl MotionEngine {
    /// Engine met de standaard portfolio-layout.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<MotionEngine, JsValue> {
        Self::with_config(MotionConfig::default()).map_err(to_js_error)
    }

    /// Geeft terug of de engine de minimale initialisatie heeft doorlopen.
    #[wasm_bindgen]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Laad een nieuwe layout. Scrolltoestand en klok blijven behouden.
    #[wasm_bindgen]
    pub fn configure(&mut self, config: JsValue) -> Result<(), JsValue> {
        let config: MotionConfig = serde_wasm_bindgen::from_value(config).map_err(to_js_error)?;
        self.configure_with(config).map_err(to_js_error)
    }

    /// Koppel de sampler aan de scroll-events van `window`.
    #[cfg(target_arch = "wasm32")]
    #[wasm_bindgen]
    pub fn attach_window(&mut self) -> Result<(), JsValue> {
        if self.window_mount.is_some() {
            return Err(to_js_error(SamplerError::AlreadyMounted));
        }
        let window = scroll::dom::WindowScroll::new().map_err(to_js_error)?;
        let mount = self.mount_signal(&window).map_err(to_js_error)?;
        self.window_mount = Some(mount);
        Ok(())
    }

    /// Verwijder de window-listener. Geeft `false` terug als er geen was.
    #[cfg(target_arch = "wasm32")]
    #[wasm_bindgen]
    pub fn detach_window(&mut self) -> bool {
        match self.window_mount.take() {
            Some(mount) => {
                mount.unmount();
                true
            }
            None => false,
        }
    }

    /// Handmatige scrollmelding, voor shells die zelf luisteren.
    #[wasm_bindgen]
    pub fn record_scroll(&mut self, offset_y: f64, now_ms: f64) {
        self.sampler.record(offset_y, now_ms);
    }

    #[wasm_bindgen]
    pub fn advance_clock(&mut self, delta_seconds: f64) {
        self.clock.advance_by(delta_seconds);
    }

    /// Verwerk een `requestAnimationFrame` tijdstempel. Een door throttling
    /// overgeslagen scrollnotificatie wordt hier alsnog afgeleverd.
    #[wasm_bindgen]
    pub fn tick(&mut self, timestamp_ms: f64) {
        self.clock.tick(timestamp_ms);
        self.sampler.flush();
    }

    /// Lever een overgeslagen scrollnotificatie direct af.
    #[wasm_bindgen]
    pub fn flush_scroll(&self) -> bool {
        self.sampler.flush()
    }

    /// Registreer een JS-callback die bij elke (gethrottlede) scrollnotificatie
    /// de nieuwe toestand ontvangt. Geeft het aantal callbacks terug.
    #[cfg(target_arch = "wasm32")]
    #[wasm_bindgen]
    pub fn on_scroll(&mut self, callback: js_sys::Function) -> usize {
        let subscription = self.subscribe(move |state| {
            let result = to_js_value(state)
                .and_then(|value| callback.call1(&JsValue::NULL, &value));
            if let Err(err) = result {
                log::warn!("scroll-callback faalde: {err:?}");
            }
        });
        self.subscriptions.push(subscription);
        self.subscriptions.len()
    }

    /// Verwijder alle JS-callbacks van [`MotionEngine::on_scroll`].
    #[wasm_bindgen]
    pub fn clear_scroll_callbacks(&mut self) {
        self.subscriptions.clear();
    }

    #[wasm_bindgen]
    pub fn scroll_state(&self) -> Result<JsValue, JsValue> {
        to_js_value(&self.sampler.state())
    }

    #[wasm_bindgen]
    pub fn section_progress(&self, name: &str) -> Option<f64> {
        self.scene
            .section_progress(&name.trim().to_ascii_lowercase(), &self.sampler.state())
    }

    /// Parameters van alle elementen voor de huidige scrolltoestand en klok.
    #[wasm_bindgen]
    pub fn frame(&self) -> Result<JsValue, JsValue> {
        to_js_value(&self.frame_snapshot())
    }

    /// Deeltjesposities als platte xyz-buffer.
    #[wasm_bindgen]
    pub fn particle_positions(&self) -> Vec<f32> {
        self.particles.positions(&self.clock)
    }

    #[wasm_bindgen]
    pub fn particle_colors(&self) -> Vec<f32> {
        self.particles.colors()
    }

    /// Aantal actieve scroll-listeners (gekoppelde bron plus abonnees).
    #[wasm_bindgen]
    pub fn listener_count(&self) -> usize {
        usize::from(self.sampler.is_mounted()) + self.sampler.subscriber_count()
    }
}

/// Verstuur het contactformulier. Slaagt altijd na de gesimuleerde
/// verzendtijd, tenzij de invoer ongeldig is.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub async fn submit_contact(message: JsValue) -> Result<JsValue, JsValue> {
    let message: contact::ContactMessage =
        serde_wasm_bindgen::from_value(message).map_err(to_js_error)?;
    let receipt = contact::submit_message(message, &contact::TimerDelay)
        .await
        .map_err(to_js_error)?;
    to_js_value(&receipt)
}

impl MotionEngine {
    pub fn with_config(config: MotionConfig) -> Result<Self, EngineError> {
        let mut engine = Self {
            initialized: false,
            config: MotionConfig::default(),
            sampler: ScrollSampler::new(),
            clock: AnimationClock::new(),
            scene: Scene::new(),
            particles: ParticleField::new(0, 0),
            subscriptions: Vec::new(),
            #[cfg(target_arch = "wasm32")]
            window_mount: None,
        };
        engine.configure_with(config)?;
        engine.initialized = true;
        Ok(engine)
    }

    /// Valideer en activeer `config`. Bij een fout blijft de huidige
    /// configuratie actief.
    pub fn configure_with(&mut self, config: MotionConfig) -> Result<(), EngineError> {
        config.validate()?;
        let scene = portfolio_scene(&config)?;
        let particles = ParticleField::new(config.particle_count, config.particle_seed);

        self.sampler.set_throttle(config.throttle_ms);
        self.scene = scene;
        self.particles = particles;
        log::info!(
            "configuratie geladen: {} secties, {} elementen, {} deeltjes",
            config.sections.len(),
            self.scene.elements().len(),
            self.particles.len()
        );
        debug_log!("viewporthoogte {}", config.viewport_height);
        self.config = config;
        Ok(())
    }

    /// Koppel een willekeurige scrollbron. De bron blijft gekoppeld zolang
    /// de teruggegeven guard leeft.
    pub fn mount_signal<S: ScrollSignal>(
        &self,
        signal: &S,
    ) -> Result<ScrollMount<S::Guard>, EngineError> {
        Ok(self.sampler.mount(signal)?)
    }

    /// Abonneer op scrollnotificaties van de engine. Houdt zich aan het
    /// geconfigureerde throttle-interval.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(&ScrollState) + 'static,
    {
        self.sampler.subscribe(callback)
    }

    #[must_use]
    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    #[must_use]
    pub fn sampler(&self) -> &ScrollSampler {
        &self.sampler
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[must_use]
    pub fn clock(&self) -> AnimationClock {
        self.clock
    }

    #[must_use]
    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    #[must_use]
    pub fn frame_snapshot(&self) -> FrameSnapshot {
        let scroll = self.sampler.state();
        let sections = self
            .scene
            .sections()
            .map(|(name, range)| (name.to_owned(), range.progress(scroll.offset_y)))
            .collect();

        FrameSnapshot {
            scroll,
            elapsed_seconds: self.clock.elapsed_seconds(),
            sections,
            elements: self.scene.compute(&scroll, &self.clock),
        }
    }
}

fn to_js_value<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(to_js_error)
}

fn to_js_error<E: fmt::Display>(error: E) -> JsValue {
    js_error(&error.to_string())
}

fn js_error(message: &str) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    {
        wasm_bindgen::JsError::new(message).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
        JsValue::NULL
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::{EngineError, MotionEngine};
    use crate::config::{ConfigError, MotionConfig};
    use crate::scene::Parameter;
    use crate::scroll::{SamplerError, ScrollDirection, VirtualViewport};

    fn engine() -> MotionEngine {
        MotionEngine::with_config(MotionConfig::default()).unwrap()
    }

    #[test]
    fn starts_initialized_with_default_layout() {
        let engine = engine();
        assert!(engine.is_initialized());
        assert_eq!(engine.scene().elements().len(), 12);
        assert_eq!(engine.particles().len(), 100);
        assert_eq!(engine.listener_count(), 0);
    }

    #[test]
    fn frame_follows_recorded_scroll() {
        let mut engine = engine();
        engine.record_scroll(3_200.0, 16.0);

        let frame = engine.frame_snapshot();
        assert!((frame.sections["contact"] - 0.5).abs() < 1e-12);
        assert!((frame.sections["hero"] - 1.0).abs() < 1e-12);

        let panel = frame
            .elements
            .iter()
            .find(|element| element.id == "contact-panel")
            .unwrap();
        assert!((panel.params.get(Parameter::Opacity).unwrap() - 1.0).abs() < 1e-12);
        assert!((panel.params.get(Parameter::PositionY).unwrap() + 25.0).abs() < 1e-12);
    }

    #[test]
    fn section_progress_ignores_case() {
        let mut engine = engine();
        engine.record_scroll(2_700.0, 0.0);
        assert!((engine.section_progress(" Contact ").unwrap() - 0.25).abs() < 1e-12);
        assert_eq!(engine.section_progress("footer"), None);
    }

    #[test]
    fn clock_drives_time_based_parameters() {
        let mut engine = engine();
        engine.tick(1_000.0);
        engine.tick(11_000.0);
        assert!((engine.clock().elapsed_seconds() - 10.0).abs() < 1e-12);

        let globe = engine
            .scene()
            .compute_element("about-globe", &engine.sampler().state(), &engine.clock())
            .unwrap();
        assert!((globe.get(Parameter::RotationY).unwrap() - 6.0).abs() < 1e-9);

        engine.advance_clock(-5.0);
        assert!((engine.clock().elapsed_seconds() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn tick_delivers_throttled_trailing_scroll() {
        let mut engine = MotionEngine::with_config(MotionConfig {
            throttle_ms: Some(16.0),
            ..MotionConfig::default()
        })
        .unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _subscription = engine.subscribe(move |state| sink.borrow_mut().push(state.offset_y));
        assert_eq!(engine.listener_count(), 1);

        for step in 0..5 {
            engine.record_scroll(f64::from(step) * 10.0, f64::from(step) * 4.0);
        }
        assert_eq!(*seen.borrow(), vec![0.0, 40.0]);

        engine.record_scroll(45.0, 17.0);
        assert_eq!(seen.borrow().len(), 2);

        engine.tick(1_000.0);
        assert_eq!(seen.borrow().last().copied(), Some(45.0));
        assert!(!engine.flush_scroll());
    }

    #[test]
    fn invalid_config_keeps_previous_one() {
        let mut engine = engine();
        let config = MotionConfig {
            particle_count: 50_000,
            ..MotionConfig::default()
        };
        assert_eq!(
            engine.configure_with(config),
            Err(EngineError::Config(ConfigError::TooManyParticles(50_000)))
        );
        assert_eq!(engine.config(), &MotionConfig::default());
        assert_eq!(engine.particles().len(), 100);
    }

    #[test]
    fn reconfigure_keeps_scroll_state() {
        let mut engine = engine();
        engine.record_scroll(400.0, 0.0);
        engine
            .configure_with(MotionConfig {
                particle_count: 10,
                ..MotionConfig::default()
            })
            .unwrap();
        assert!((engine.sampler().state().offset_y - 400.0).abs() < f64::EPSILON);
        assert_eq!(engine.particle_positions().len(), 30);
        assert_eq!(engine.particle_colors().len(), 30);
    }

    #[test]
    fn mounted_viewport_feeds_the_engine() {
        let engine = engine();
        let viewport = VirtualViewport::new();
        let mount = engine.mount_signal(&viewport).unwrap();
        assert_eq!(engine.listener_count(), 1);
        assert_eq!(
            engine.mount_signal(&viewport).err(),
            Some(EngineError::Sampler(SamplerError::AlreadyMounted))
        );

        viewport.scroll_to(600.0, 100.0);
        viewport.scroll_to(300.0, 200.0);
        let state = engine.frame_snapshot().scroll;
        assert!((state.offset_y - 300.0).abs() < f64::EPSILON);
        assert_eq!(state.direction, ScrollDirection::Up);
        assert!((state.speed_px_per_ms - 3.0).abs() < 1e-12);

        drop(mount);
        assert_eq!(engine.listener_count(), 0);
        assert_eq!(viewport.listener_count(), 0);
    }
}
