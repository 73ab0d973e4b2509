//! Declarative rotation for a single element.
//!
//! A [`Motion`] owns at most one live binding. Each binding keeps its own
//! [`RotationRun`] and at most one outstanding frame request. The `Motion`
//! holds the only strong reference to its binding and frame callbacks reach
//! it through a `Weak`, so once `unbind` (or drop) releases the binding, any
//! callback the host still delivers finds nothing to upgrade and writes
//! nothing.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use spindle_core::{
    AnimationSpec, Easing, FrameHandle, FrameScheduler, MotionError, Phase, RotationRun,
    StyleSurface, Tick, css_number,
};

/// Which element a [`Motion`] stands in for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Div,
    Span,
    Img,
    P,
    Button,
}

impl ElementKind {
    pub fn tag(&self) -> &'static str {
        match self {
            ElementKind::Div => "div",
            ElementKind::Span => "span",
            ElementKind::Img => "img",
            ElementKind::P => "p",
            ElementKind::Button => "button",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ElementKind::Div => "MotionDiv",
            ElementKind::Span => "MotionSpan",
            ElementKind::Img => "MotionImg",
            ElementKind::P => "MotionP",
            ElementKind::Button => "MotionButton",
        }
    }
}

/// Writes one frame of rotation onto `surface`.
pub fn apply_rotation(surface: &dyn StyleSurface, degrees: f64, easing: Easing) {
    surface.set_style_property("transform", &format!("rotate({}deg)", css_number(degrees)));
    surface.set_style_property("transition", &format!("transform {}", easing.css_name()));
}

struct Binding {
    kind: ElementKind,
    run: RotationRun,
    pending: Option<FrameHandle>,
}

pub struct Motion {
    kind: ElementKind,
    scheduler: Rc<dyn FrameScheduler>,
    surface: Rc<dyn StyleSurface>,
    spec: Option<AnimationSpec>,
    binding: Option<Rc<RefCell<Binding>>>,
}

impl Motion {
    pub fn new(
        kind: ElementKind,
        scheduler: Rc<dyn FrameScheduler>,
        surface: Rc<dyn StyleSurface>,
    ) -> Self {
        Self {
            kind,
            scheduler,
            surface,
            spec: None,
            binding: None,
        }
    }

    pub fn div(scheduler: Rc<dyn FrameScheduler>, surface: Rc<dyn StyleSurface>) -> Self {
        Self::new(ElementKind::Div, scheduler, surface)
    }

    pub fn span(scheduler: Rc<dyn FrameScheduler>, surface: Rc<dyn StyleSurface>) -> Self {
        Self::new(ElementKind::Span, scheduler, surface)
    }

    pub fn img(scheduler: Rc<dyn FrameScheduler>, surface: Rc<dyn StyleSurface>) -> Self {
        Self::new(ElementKind::Img, scheduler, surface)
    }

    pub fn p(scheduler: Rc<dyn FrameScheduler>, surface: Rc<dyn StyleSurface>) -> Self {
        Self::new(ElementKind::P, scheduler, surface)
    }

    pub fn button(scheduler: Rc<dyn FrameScheduler>, surface: Rc<dyn StyleSurface>) -> Self {
        Self::new(ElementKind::Button, scheduler, surface)
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// The spec last bound, if any.
    pub fn spec(&self) -> Option<&AnimationSpec> {
        self.spec.as_ref()
    }

    /// True while a binding exists and its run has not stopped, either by
    /// finishing or because the host refused a frame.
    pub fn is_bound(&self) -> bool {
        self.phase() != Phase::Stopped
    }

    pub fn phase(&self) -> Phase {
        self.binding
            .as_ref()
            .map_or(Phase::Stopped, |b| b.borrow().run.phase())
    }

    pub fn iterations_completed(&self) -> u32 {
        self.binding
            .as_ref()
            .map_or(0, |b| b.borrow().run.iterations_completed())
    }

    /// Starts animating `spec`, replacing whatever was bound before.
    ///
    /// A zero target rotation binds nothing: no frame is requested and the
    /// surface is left untouched.
    pub fn bind(&mut self, spec: AnimationSpec) -> Result<(), MotionError> {
        self.unbind();

        if spec.target_rotation_degrees == 0.0 {
            log::trace!("{}: no rotation configured", self.kind.display_name());
            self.spec = Some(spec);
            return Ok(());
        }
        spec.validate()?;

        let mut run = RotationRun::new(spec);
        run.start(self.scheduler.now());
        let binding = Rc::new(RefCell::new(Binding {
            kind: self.kind,
            run,
            pending: None,
        }));

        log::debug!(
            "{}: bound rotate={}deg over {:?}, repeat {:?}",
            self.kind.display_name(),
            spec.target_rotation_degrees,
            spec.duration,
            spec.repeat
        );
        schedule(&binding, &self.scheduler, &self.surface);
        self.spec = Some(spec);
        self.binding = Some(binding);
        Ok(())
    }

    /// Rebinds only when `spec` differs from the one currently bound.
    pub fn update(&mut self, spec: AnimationSpec) -> Result<(), MotionError> {
        if self.spec.as_ref() == Some(&spec) {
            return Ok(());
        }
        self.bind(spec)
    }

    /// Cancels any pending frame and stops. Safe to call repeatedly.
    pub fn unbind(&mut self) {
        self.spec = None;
        let Some(binding) = self.binding.take() else {
            return;
        };
        let mut b = binding.borrow_mut();
        if let Some(handle) = b.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
        b.run.stop();
        log::debug!(
            "{}: unbound after {} cycles",
            self.kind.display_name(),
            b.run.iterations_completed()
        );
    }
}

impl Drop for Motion {
    fn drop(&mut self) {
        self.unbind();
    }
}

impl fmt::Debug for Motion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Motion")
            .field("kind", &self.kind)
            .field("spec", &self.spec)
            .field("phase", &self.phase())
            .finish()
    }
}

fn schedule(
    binding: &Rc<RefCell<Binding>>,
    scheduler: &Rc<dyn FrameScheduler>,
    surface: &Rc<dyn StyleSurface>,
) {
    let weak_binding = Rc::downgrade(binding);
    let weak_scheduler = Rc::downgrade(scheduler);
    let surface = surface.clone();
    let handle = scheduler.request_frame(Box::new(move |timestamp| {
        on_frame(&weak_binding, &weak_scheduler, &surface, timestamp)
    }));

    let mut b = binding.borrow_mut();
    b.pending = handle;
    if handle.is_none() {
        log::warn!(
            "{}: frame request refused; rotation halted",
            b.kind.display_name()
        );
        b.run.stop();
    }
}

fn on_frame(
    binding: &Weak<RefCell<Binding>>,
    scheduler: &Weak<dyn FrameScheduler>,
    surface: &Rc<dyn StyleSurface>,
    timestamp: f64,
) {
    let Some(binding) = binding.upgrade() else {
        return;
    };
    let (tick, easing, kind) = {
        let mut b = binding.borrow_mut();
        b.pending = None;
        (b.run.tick(timestamp), b.run.spec().easing, b.kind)
    };

    match tick {
        Tick::Idle => {}
        Tick::Continue(degrees) => {
            log::trace!("{}: {degrees}deg @{timestamp}ms", kind.display_name());
            apply_rotation(surface.as_ref(), degrees, easing);
            if let Some(scheduler) = scheduler.upgrade() {
                schedule(&binding, &scheduler, surface);
            }
        }
        Tick::Finish(degrees) => {
            apply_rotation(surface.as_ref(), degrees, easing);
            log::debug!(
                "{}: finished at {degrees}deg after {} cycles",
                kind.display_name(),
                binding.borrow().run.iterations_completed()
            );
        }
    }
}
