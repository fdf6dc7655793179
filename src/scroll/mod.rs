//! Scroll-sampling: de enige schrijver van [`ScrollState`].
//!
//! Een [`ScrollSampler`] ontvangt ruwe scroll-offsets van een geïnjecteerde
//! [`ScrollSignal`] bron, leidt richting en snelheid af en geeft de laatste
//! toestand synchroon door aan alle abonnees. Registraties zijn guards: bij
//! het droppen van een [`Subscription`] of [`ScrollMount`] wordt de listener
//! vrijgegeven.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use serde::Serialize;
use thiserror::Error;

#[cfg(target_arch = "wasm32")]
pub mod dom;
pub mod progress;
pub mod viewport;

pub use viewport::VirtualViewport;

/// Scrollrichting ten opzichte van de vorige sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    Up,
    #[default]
    Down,
}

/// Momentopname van de scrollpositie van de viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollState {
    /// Verticale afstand vanaf de bovenkant in pixels, nooit negatief.
    pub offset_y: f64,
    pub direction: ScrollDirection,
    /// Absolute snelheid in pixels per milliseconde.
    pub speed_px_per_ms: f64,
}

/// Fouten bij het koppelen van een sampler aan een scrollbron.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SamplerError {
    #[error("scroll sampler is al gekoppeld aan een scrollbron")]
    AlreadyMounted,
    #[error("scrollbron is niet beschikbaar: {0}")]
    SignalUnavailable(String),
}

/// Platformbron die "scroll gewijzigd" meldingen levert.
///
/// `listen` registreert precies één listener die bij elke melding
/// [`ScrollSampler::record`] aanroept. De teruggegeven guard verwijdert die
/// listener weer wanneer hij gedropt wordt.
pub trait ScrollSignal {
    type Guard;

    /// Huidige offset van de bron, gebruikt als basislijn bij het koppelen.
    fn current_offset(&self) -> f64;

    /// Huidige tijd in milliseconden volgens de klok van de bron.
    fn now_ms(&self) -> f64;

    fn listen(&self, sampler: &ScrollSampler) -> Result<Self::Guard, SamplerError>;
}

type Callback = Rc<RefCell<dyn FnMut(&ScrollState)>>;

#[derive(Debug, Clone, Copy)]
struct Sample {
    offset_y: f64,
    time_ms: f64,
}

#[derive(Default)]
struct SamplerInner {
    state: ScrollState,
    last: Option<Sample>,
    subscribers: BTreeMap<u64, Callback>,
    next_id: u64,
    mounted: bool,
    throttle_ms: Option<f64>,
    last_notified_ms: Option<f64>,
    pending: bool,
}

impl SamplerInner {
    fn should_notify(&mut self, now_ms: f64) -> bool {
        let Some(interval) = self.throttle_ms else {
            self.pending = false;
            return true;
        };

        match self.last_notified_ms {
            // Een klok die terugloopt (andere tijdbron) zet het venster opnieuw.
            Some(last) if now_ms >= last && now_ms - last < interval => {
                self.pending = true;
                false
            }
            _ => {
                self.last_notified_ms = Some(now_ms);
                self.pending = false;
                true
            }
        }
    }
}

/// Observeerbare scrollsampler. Klonen levert een handle naar dezelfde
/// toestand op.
#[derive(Clone, Default)]
pub struct ScrollSampler {
    inner: Rc<RefCell<SamplerInner>>,
}

impl std::fmt::Debug for ScrollSampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ScrollSampler")
            .field("state", &inner.state)
            .field("subscribers", &inner.subscribers.len())
            .field("mounted", &inner.mounted)
            .finish()
    }
}

impl ScrollSampler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Laatst bekende toestand.
    #[must_use]
    pub fn state(&self) -> ScrollState {
        self.inner.borrow().state
    }

    /// Stel de basislijn in zonder abonnees te informeren.
    pub fn seed(&self, offset_y: f64, now_ms: f64) {
        if !offset_y.is_finite() {
            return;
        }
        let offset_y = offset_y.max(0.0);
        let mut inner = self.inner.borrow_mut();
        inner.last = Some(Sample {
            offset_y,
            time_ms: now_ms,
        });
        inner.state.offset_y = offset_y;
    }

    /// Verwerk een nieuwe scrollmelding en informeer abonnees.
    pub fn record(&self, offset_y: f64, now_ms: f64) -> ScrollState {
        if !offset_y.is_finite() {
            log::warn!("scroll offset {offset_y} genegeerd");
            return self.state();
        }
        let offset_y = offset_y.max(0.0);

        let (state, notify) = {
            let mut inner = self.inner.borrow_mut();
            let state = next_state(inner.last, offset_y, now_ms);
            inner.state = state;
            inner.last = Some(Sample {
                offset_y,
                time_ms: now_ms,
            });
            let notify = inner.should_notify(now_ms);
            (state, notify)
        };

        if notify {
            self.dispatch(&state);
        }
        state
    }

    /// Beperk notificaties tot maximaal één per `interval_ms`. De toestand
    /// zelf wordt altijd bijgewerkt.
    pub fn set_throttle(&self, interval_ms: Option<f64>) {
        let mut inner = self.inner.borrow_mut();
        inner.throttle_ms = interval_ms.filter(|ms| ms.is_finite() && *ms > 0.0);
        inner.last_notified_ms = None;
    }

    /// Lever een overgeslagen notificatie alsnog af. Geeft `true` terug als
    /// er iets verstuurd is.
    pub fn flush(&self) -> bool {
        let state = {
            let mut inner = self.inner.borrow_mut();
            if !inner.pending {
                return false;
            }
            inner.pending = false;
            inner.state
        };
        self.dispatch(&state);
        true
    }

    /// Registreer een abonnee. De registratie leeft zolang de teruggegeven
    /// [`Subscription`] leeft.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(&ScrollState) + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        let callback: Callback = Rc::new(RefCell::new(callback));
        inner.subscribers.insert(id, callback);

        Subscription {
            sampler: Rc::downgrade(&self.inner),
            id: Some(id),
        }
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.inner.borrow().mounted
    }

    /// Koppel de sampler aan een scrollbron. Er kan maar één koppeling
    /// tegelijk actief zijn.
    pub fn mount<S: ScrollSignal>(&self, signal: &S) -> Result<ScrollMount<S::Guard>, SamplerError> {
        if self.is_mounted() {
            return Err(SamplerError::AlreadyMounted);
        }

        self.seed(signal.current_offset(), signal.now_ms());
        let guard = signal.listen(self)?;
        self.inner.borrow_mut().mounted = true;
        log::debug!("scroll sampler gekoppeld");

        Ok(ScrollMount {
            sampler: Rc::downgrade(&self.inner),
            guard: Some(guard),
        })
    }

    fn dispatch(&self, state: &ScrollState) {
        let callbacks: Vec<(u64, Callback)> = self
            .inner
            .borrow()
            .subscribers
            .iter()
            .map(|(id, callback)| (*id, Rc::clone(callback)))
            .collect();

        for (id, callback) in callbacks {
            if !self.inner.borrow().subscribers.contains_key(&id) {
                continue;
            }
            // Een abonnee die zelf opnieuw een scroll registreert wordt niet
            // recursief aangeroepen.
            if let Ok(mut callback) = callback.try_borrow_mut() {
                (&mut *callback)(state);
            }
        }
    }
}

fn next_state(previous: Option<Sample>, offset_y: f64, now_ms: f64) -> ScrollState {
    let Some(previous) = previous else {
        return ScrollState {
            offset_y,
            direction: ScrollDirection::Down,
            speed_px_per_ms: 0.0,
        };
    };

    let elapsed = now_ms - previous.time_ms;
    let speed_px_per_ms = if elapsed.is_finite() && elapsed > 0.0 {
        (offset_y - previous.offset_y).abs() / elapsed
    } else {
        0.0
    };
    let direction = if offset_y > previous.offset_y {
        ScrollDirection::Down
    } else {
        ScrollDirection::Up
    };

    ScrollState {
        offset_y,
        direction,
        speed_px_per_ms,
    }
}

/// Guard voor een abonnee op een [`ScrollSampler`].
#[derive(Debug)]
#[must_use = "de abonnee wordt direct afgemeld als de subscription gedropt wordt"]
pub struct Subscription {
    sampler: Weak<RefCell<SamplerInner>>,
    id: Option<u64>,
}

impl Subscription {
    /// Meld de abonnee expliciet af.
    pub fn cancel(mut self) {
        self.release();
    }

    fn release(&mut self) {
        let Some(id) = self.id.take() else {
            return;
        };
        if let Some(inner) = self.sampler.upgrade() {
            inner.borrow_mut().subscribers.remove(&id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

/// Actieve koppeling tussen een sampler en een scrollbron. Droppen
/// verwijdert de platformlistener.
#[must_use = "de scrollbron wordt direct ontkoppeld als de mount gedropt wordt"]
pub struct ScrollMount<G> {
    sampler: Weak<RefCell<SamplerInner>>,
    guard: Option<G>,
}

impl<G> ScrollMount<G> {
    /// Ontkoppel expliciet.
    pub fn unmount(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.guard.take().is_none() {
            return;
        }
        if let Some(inner) = self.sampler.upgrade() {
            inner.borrow_mut().mounted = false;
        }
        log::debug!("scroll sampler ontkoppeld");
    }
}

impl<G> Drop for ScrollMount<G> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<G> std::fmt::Debug for ScrollMount<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollMount")
            .field("active", &self.guard.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::{SamplerError, ScrollDirection, ScrollSampler, ScrollState, VirtualViewport};

    #[test]
    fn initial_state_is_zero_down_and_still() {
        let sampler = ScrollSampler::new();
        assert_eq!(
            sampler.state(),
            ScrollState {
                offset_y: 0.0,
                direction: ScrollDirection::Down,
                speed_px_per_ms: 0.0,
            }
        );
    }

    #[test]
    fn first_sample_defaults_to_down_without_speed() {
        let sampler = ScrollSampler::new();
        let state = sampler.record(300.0, 1_000.0);
        assert_eq!(state.direction, ScrollDirection::Down);
        assert!(state.speed_px_per_ms.abs() < f64::EPSILON);
        assert!((state.offset_y - 300.0).abs() < f64::EPSILON);
    }

    #[test]
    fn derives_direction_and_speed() {
        let sampler = ScrollSampler::new();
        sampler.record(100.0, 0.0);
        let down = sampler.record(300.0, 100.0);
        assert_eq!(down.direction, ScrollDirection::Down);
        assert!((down.speed_px_per_ms - 2.0).abs() < 1e-12);

        let up = sampler.record(250.0, 150.0);
        assert_eq!(up.direction, ScrollDirection::Up);
        assert!((up.speed_px_per_ms - 1.0).abs() < 1e-12);

        let same = sampler.record(250.0, 200.0);
        assert_eq!(same.direction, ScrollDirection::Up);
        assert!(same.speed_px_per_ms.abs() < f64::EPSILON);
    }

    #[test]
    fn zero_time_delta_yields_zero_speed() {
        let sampler = ScrollSampler::new();
        sampler.record(0.0, 500.0);
        let state = sampler.record(400.0, 500.0);
        assert!(state.speed_px_per_ms.abs() < f64::EPSILON);
        assert_eq!(state.direction, ScrollDirection::Down);
    }

    #[test]
    fn negative_offsets_clamp_and_nan_is_ignored() {
        let sampler = ScrollSampler::new();
        let state = sampler.record(-40.0, 10.0);
        assert!(state.offset_y.abs() < f64::EPSILON);

        sampler.record(120.0, 20.0);
        let state = sampler.record(f64::NAN, 30.0);
        assert!((state.offset_y - 120.0).abs() < f64::EPSILON);
    }

    #[test]
    fn subscribers_see_latest_state_until_dropped() {
        let sampler = ScrollSampler::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let subscription = sampler.subscribe(move |state| sink.borrow_mut().push(state.offset_y));

        sampler.record(10.0, 1.0);
        sampler.record(20.0, 2.0);
        assert_eq!(sampler.subscriber_count(), 1);

        drop(subscription);
        sampler.record(30.0, 3.0);

        assert_eq!(*seen.borrow(), vec![10.0, 20.0]);
        assert_eq!(sampler.subscriber_count(), 0);
    }

    #[test]
    fn cancel_during_dispatch_skips_later_subscriber() {
        let sampler = ScrollSampler::new();
        let calls = Rc::new(RefCell::new(0_u32));
        let victim: Rc<RefCell<Option<super::Subscription>>> = Rc::new(RefCell::new(None));

        let victim_handle = Rc::clone(&victim);
        let _first = sampler.subscribe(move |_| {
            if let Some(subscription) = victim_handle.borrow_mut().take() {
                subscription.cancel();
            }
        });
        let counter = Rc::clone(&calls);
        *victim.borrow_mut() = Some(sampler.subscribe(move |_| *counter.borrow_mut() += 1));

        sampler.record(5.0, 1.0);
        assert_eq!(*calls.borrow(), 0);
        assert_eq!(sampler.subscriber_count(), 1);
    }

    #[test]
    fn throttle_skips_notifications_but_keeps_final_state() {
        let throttled = ScrollSampler::new();
        throttled.set_throttle(Some(50.0));
        let plain = ScrollSampler::new();

        let notified = Rc::new(RefCell::new(0_u32));
        let counter = Rc::clone(&notified);
        let _subscription = throttled.subscribe(move |_| *counter.borrow_mut() += 1);

        for step in 0..10 {
            let offset = f64::from(step) * 25.0;
            let now = f64::from(step) * 10.0;
            throttled.record(offset, now);
            plain.record(offset, now);
        }

        assert_eq!(throttled.state(), plain.state());
        assert_eq!(*notified.borrow(), 2);
        assert!(throttled.flush());
        assert_eq!(*notified.borrow(), 3);
        assert!(!throttled.flush());
    }

    #[test]
    fn rewound_clock_rearms_throttle() {
        let sampler = ScrollSampler::new();
        sampler.set_throttle(Some(16.0));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _subscription = sampler.subscribe(move |state| sink.borrow_mut().push(state.offset_y));

        sampler.record(10.0, 100_000.0);
        for step in 0..50 {
            sampler.record(20.0 + f64::from(step), f64::from(step) * 20.0);
        }

        let seen = seen.borrow();
        assert_eq!(seen.len(), 51);
        assert_eq!(seen.last().copied(), Some(sampler.state().offset_y));
        assert!((sampler.state().offset_y - 69.0).abs() < f64::EPSILON);
    }

    #[test]
    fn mount_is_exclusive_and_released_on_drop() {
        let viewport = VirtualViewport::new();
        let sampler = ScrollSampler::new();

        let mount = sampler.mount(&viewport).expect("eerste mount");
        assert!(sampler.is_mounted());
        assert_eq!(viewport.listener_count(), 1);
        assert_eq!(
            sampler.mount(&viewport).unwrap_err(),
            SamplerError::AlreadyMounted
        );
        assert_eq!(viewport.listener_count(), 1);

        viewport.scroll_to(80.0, 16.0);
        assert!((sampler.state().offset_y - 80.0).abs() < f64::EPSILON);

        mount.unmount();
        assert!(!sampler.is_mounted());
        assert_eq!(viewport.listener_count(), 0);

        viewport.scroll_to(500.0, 32.0);
        assert!((sampler.state().offset_y - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn mount_seeds_baseline_from_signal() {
        let viewport = VirtualViewport::new();
        viewport.scroll_to(400.0, 0.0);
        let sampler = ScrollSampler::new();
        let _mount = sampler.mount(&viewport).expect("mount");

        assert!((sampler.state().offset_y - 400.0).abs() < f64::EPSILON);
        let state = viewport_scroll(&viewport, &sampler, 350.0, 50.0);
        assert_eq!(state.direction, ScrollDirection::Up);
        assert!((state.speed_px_per_ms - 1.0).abs() < 1e-12);
    }

    fn viewport_scroll(
        viewport: &VirtualViewport,
        sampler: &ScrollSampler,
        offset: f64,
        now_ms: f64,
    ) -> ScrollState {
        viewport.scroll_to(offset, now_ms);
        sampler.state()
    }
}
