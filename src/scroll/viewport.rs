//! In-process scrollbron zonder browser, voor tests en de trace-CLI.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use super::{SamplerError, ScrollSampler, ScrollSignal};

#[derive(Debug, Default)]
struct ViewportInner {
    offset_y: f64,
    now_ms: f64,
    listeners: BTreeMap<u64, ScrollSampler>,
    next_id: u64,
}

/// Gesimuleerde viewport die scrollmeldingen doorgeeft aan gekoppelde
/// samplers.
#[derive(Debug, Clone, Default)]
pub struct VirtualViewport {
    inner: Rc<RefCell<ViewportInner>>,
}

impl VirtualViewport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scroll naar `offset_y` op tijdstip `now_ms` en meld dat aan alle
    /// listeners.
    pub fn scroll_to(&self, offset_y: f64, now_ms: f64) {
        let listeners: Vec<ScrollSampler> = {
            let mut inner = self.inner.borrow_mut();
            inner.offset_y = offset_y;
            inner.now_ms = now_ms;
            inner.listeners.values().cloned().collect()
        };

        for sampler in listeners {
            sampler.record(offset_y, now_ms);
        }
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

/// Guard die een viewport-listener verwijdert bij het droppen.
#[derive(Debug)]
pub struct ViewportListener {
    viewport: Weak<RefCell<ViewportInner>>,
    id: u64,
}

impl Drop for ViewportListener {
    fn drop(&mut self) {
        if let Some(inner) = self.viewport.upgrade() {
            inner.borrow_mut().listeners.remove(&self.id);
        }
    }
}

impl ScrollSignal for VirtualViewport {
    type Guard = ViewportListener;

    fn current_offset(&self) -> f64 {
        self.inner.borrow().offset_y
    }

    fn now_ms(&self) -> f64 {
        self.inner.borrow().now_ms
    }

    fn listen(&self, sampler: &ScrollSampler) -> Result<Self::Guard, SamplerError> {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.insert(id, sampler.clone());

        Ok(ViewportListener {
            viewport: Rc::downgrade(&self.inner),
            id,
        })
    }
}
