//! Pointer followers.
//!
//! A follower is an element that tracks the pointer. A *zone* follower is
//! only visible while the pointer is inside its zone; a *global* follower is
//! visible everywhere except while some zone follower is showing. The two
//! kinds coordinate through a [`CursorZoneRegistry`] the application creates
//! once and hands to every follower.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use spindle_core::{BoundingRect, Dispose, Signal, StyleSurface, Vec2, css_number};

/// Off-screen parking spot used before the first pointer event.
const OFFSCREEN: Vec2 = Vec2::new(-9999.0, -9999.0);

/// Counts zones the pointer is currently in.
pub struct CursorZoneRegistry {
    active_count: Cell<usize>,
    active: Signal<bool>,
}

impl Default for CursorZoneRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CursorZoneRegistry {
    pub fn new() -> Self {
        Self {
            active_count: Cell::new(0),
            active: Signal::new(false),
        }
    }

    /// Reports a zone's transition from `prev` to `active`. Equal values are
    /// ignored.
    pub fn set(&self, active: bool, prev: bool) {
        if active == prev {
            return;
        }
        let count = self.active_count.get();
        let count = if active {
            count + 1
        } else {
            count.saturating_sub(1)
        };
        self.active_count.set(count);
        log::trace!("cursor zones active: {count}");
        self.active.set(count > 0);
    }

    pub fn is_zone_active(&self) -> bool {
        self.active_count.get() > 0
    }

    pub fn active_zones(&self) -> usize {
        self.active_count.get()
    }

    /// Calls `f` now with the current state, then after every change.
    pub fn subscribe(&self, f: impl Fn(bool) + 'static) -> Dispose {
        f(self.is_zone_active());
        self.active.subscribe(move |active| f(*active))
    }
}

impl fmt::Debug for CursorZoneRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorZoneRegistry")
            .field("active_count", &self.active_count.get())
            .finish()
    }
}

#[derive(Clone, Default)]
pub struct FollowerOptions {
    /// Restricts the follower to this zone; `None` makes it global.
    pub zone: Option<Rc<dyn BoundingRect>>,
    /// Added to the pointer position, in pixels.
    pub offset: Vec2,
}

pub struct MouseFollower {
    surface: Rc<dyn StyleSurface>,
    registry: Rc<CursorZoneRegistry>,
    zone: Option<Rc<dyn BoundingRect>>,
    offset: Vec2,
    position: Cell<Vec2>,
    inside: Cell<bool>,
    subscription: Option<Dispose>,
}

impl MouseFollower {
    pub fn new(
        surface: Rc<dyn StyleSurface>,
        registry: Rc<CursorZoneRegistry>,
        options: FollowerOptions,
    ) -> Self {
        surface.set_style_property("position", "fixed");
        surface.set_style_property("top", "0");
        surface.set_style_property("left", "0");
        surface.set_style_property("pointer-events", "none");
        surface.set_style_property("will-change", "transform, opacity");
        surface.set_style_property("transform", &translate(OFFSCREEN));

        let subscription = options.zone.is_none().then(|| {
            let surface = surface.clone();
            registry.subscribe(move |zone_active| {
                surface.set_style_property("opacity", if zone_active { "0" } else { "1" });
            })
        });

        Self {
            surface,
            registry,
            zone: options.zone,
            offset: options.offset,
            position: Cell::new(OFFSCREEN),
            inside: Cell::new(false),
            subscription,
        }
    }

    pub fn is_global(&self) -> bool {
        self.zone.is_none()
    }

    /// Whether the pointer was inside the zone at the last update. Always
    /// false for global followers.
    pub fn is_inside(&self) -> bool {
        self.inside.get()
    }

    pub fn position(&self) -> Vec2 {
        self.position.get()
    }

    pub fn pointer_moved(&self, x: f64, y: f64) {
        let pointer = Vec2::new(x, y);
        self.position.set(pointer);
        self.surface
            .set_style_property("transform", &translate(pointer + self.offset));

        if let Some(zone) = &self.zone {
            let inside = zone.bounding_rect().contains(pointer);
            self.registry.set(inside, self.inside.get());
            self.inside.set(inside);
            self.surface
                .set_style_property("opacity", if inside { "1" } else { "0" });
        }
    }

    /// Re-evaluates the last pointer position, e.g. after a scroll or resize
    /// moved the zone under a stationary pointer.
    pub fn recompute(&self) {
        let p = self.position.get();
        self.pointer_moved(p.x, p.y);
    }
}

impl Drop for MouseFollower {
    fn drop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.run();
        }
        if self.zone.is_some() && self.inside.replace(false) {
            self.registry.set(false, true);
        }
    }
}

impl fmt::Debug for MouseFollower {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MouseFollower")
            .field("global", &self.is_global())
            .field("position", &self.position.get())
            .field("inside", &self.inside.get())
            .finish()
    }
}

fn translate(p: Vec2) -> String {
    format!(
        "translate3d({}px, {}px, 0)",
        css_number(p.x),
        css_number(p.y)
    )
}
