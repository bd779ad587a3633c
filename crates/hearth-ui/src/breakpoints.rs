//! Responsive viewport bands and the width observer.
//!
//! # Design
//! - Bands are ordered, contiguous and non-overlapping; every width maps to
//!   exactly one of them.
//! - The observer is push-driven: the resize listener feeds `on_resize` while
//!   active, and nothing polls.
//! - The latest [`ViewportSnapshot`] is a yewdux slice, so components can
//!   select single flags from it.

use std::cell::Cell;
use std::rc::Rc;

use crate::core::host::HostEnvironment;
use crate::core::store::{Context, Slice, Store, SubscriptionId};

/// Layout band derived from the window width.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ViewportBand {
    /// Narrow screens (< 768px).
    Mobile,
    /// Medium screens (768px to 1023px).
    Tablet,
    /// Wide screens (>= 1024px).
    Desktop,
}

impl ViewportBand {
    /// Stable identifier for CSS hooks.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::Tablet => "tablet",
            Self::Desktop => "desktop",
        }
    }
}

/// Band with an inclusive minimum width and optional inclusive maximum.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Breakpoint {
    /// Band this range selects.
    pub band: ViewportBand,
    /// Inclusive lower bound in CSS pixels.
    pub min_width: u32,
    /// Inclusive upper bound; `None` for the open-ended top band.
    pub max_width: Option<u32>,
}

/// Mobile range.
pub const MOBILE: Breakpoint = Breakpoint {
    band: ViewportBand::Mobile,
    min_width: 0,
    max_width: Some(767),
};
/// Tablet range.
pub const TABLET: Breakpoint = Breakpoint {
    band: ViewportBand::Tablet,
    min_width: 768,
    max_width: Some(1023),
};
/// Desktop range.
pub const DESKTOP: Breakpoint = Breakpoint {
    band: ViewportBand::Desktop,
    min_width: 1024,
    max_width: None,
};

/// Ordered breakpoints used for classification.
pub const BREAKPOINTS: [Breakpoint; 3] = [MOBILE, TABLET, DESKTOP];

/// Classify a window width.
#[must_use]
pub fn classify(width: u32) -> ViewportBand {
    BREAKPOINTS
        .iter()
        .find(|bp| width >= bp.min_width && bp.max_width.is_none_or(|max| width <= max))
        .map_or(ViewportBand::Desktop, |bp| bp.band)
}

/// Width plus the derived flags exposed to components.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewportSnapshot {
    /// Window width in CSS pixels.
    pub width: u32,
    /// `width < 768`.
    pub is_mobile: bool,
    /// `768 <= width < 1024`.
    pub is_tablet: bool,
    /// `width >= 1024`.
    pub is_desktop: bool,
    /// Current band.
    pub current: ViewportBand,
}

impl ViewportSnapshot {
    /// Snapshot for `width`.
    #[must_use]
    pub fn for_width(width: u32) -> Self {
        let current = classify(width);
        Self {
            width,
            is_mobile: current == ViewportBand::Mobile,
            is_tablet: current == ViewportBand::Tablet,
            is_desktop: current == ViewportBand::Desktop,
            current,
        }
    }
}

impl Store for ViewportSnapshot {
    fn new(_cx: &Context) -> Self {
        Self::for_width(0)
    }

    fn should_notify(&self, old: &Self) -> bool {
        self != old
    }
}

/// Tracks window width while active.
#[derive(Clone, Debug)]
pub struct ViewportObserver {
    host: HostEnvironment,
    snapshot: Slice<ViewportSnapshot>,
    active: Rc<Cell<bool>>,
}

impl ViewportObserver {
    /// Observer in `cx` seeded with the host width (0, hence mobile, when
    /// headless).
    #[must_use]
    pub fn new(cx: &Context, host: HostEnvironment) -> Self {
        let snapshot = ViewportSnapshot::for_width(host.inner_width());
        Self {
            host,
            snapshot: Slice::with_state(cx, snapshot),
            active: Rc::new(Cell::new(false)),
        }
    }

    /// Start accepting resize updates and re-read the current width.
    pub fn activate(&self) {
        self.active.set(true);
        self.on_resize(self.host.inner_width());
    }

    /// Stop accepting resize updates.
    pub fn deactivate(&self) {
        self.active.set(false);
    }

    /// Whether resize updates are accepted.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Record a new width. Ignored (returns `false`) while inactive.
    pub fn on_resize(&self, width: u32) -> bool {
        if !self.active.get() {
            return false;
        }
        self.snapshot.set(ViewportSnapshot::for_width(width));
        true
    }

    /// Latest snapshot.
    #[must_use]
    pub fn snapshot(&self) -> ViewportSnapshot {
        self.snapshot.get()
    }

    /// Observe snapshot changes.
    pub fn subscribe(&self, listener: impl Fn(&ViewportSnapshot) + 'static) -> SubscriptionId {
        self.snapshot.subscribe(listener)
    }

    /// Stop observing.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.snapshot.unsubscribe(id)
    }
}
