//! Browser-scrollbron: een passieve `scroll` listener op `window`.

use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use web_sys::Window;

use super::{SamplerError, ScrollSampler, ScrollSignal};

/// [`ScrollSignal`] op basis van `window.scrollY` en `performance.now()`.
#[derive(Debug, Clone)]
pub struct WindowScroll {
    window: Window,
}

impl WindowScroll {
    pub fn new() -> Result<Self, SamplerError> {
        let window = web_sys::window()
            .ok_or_else(|| SamplerError::SignalUnavailable("geen window beschikbaar".to_owned()))?;
        Ok(Self { window })
    }
}

fn read_offset(window: &Window) -> f64 {
    window.scroll_y().unwrap_or(0.0)
}

fn read_now(window: &Window) -> f64 {
    window
        .performance()
        .map_or_else(js_sys::Date::now, |performance| performance.now())
}

impl ScrollSignal for WindowScroll {
    type Guard = EventListener;

    fn current_offset(&self) -> f64 {
        read_offset(&self.window)
    }

    fn now_ms(&self) -> f64 {
        read_now(&self.window)
    }

    fn listen(&self, sampler: &ScrollSampler) -> Result<Self::Guard, SamplerError> {
        let sampler = sampler.clone();
        let window = self.window.clone();

        Ok(EventListener::new_with_options(
            &self.window,
            "scroll",
            EventListenerOptions {
                phase: EventListenerPhase::Bubble,
                passive: true,
            },
            move |_event| {
                sampler.record(read_offset(&window), read_now(&window));
            },
        ))
    }
}
