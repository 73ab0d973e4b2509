//! Step-by-step flows ("funnels") with optional browser-history sync.
//!
//! A [`Funnel`] walks an ordered list of steps. With a [`History`] attached,
//! every forward move pushes an entry whose state records the step, going
//! back is delegated to the history, and popstate notifications (browser
//! back/forward buttons) move the funnel to the step the entry recorded.

use std::cell::RefCell;
use std::fmt::{self, Debug};
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use spindle_core::{Dispose, Signal};
use thiserror::Error;

pub trait FunnelStep: Clone + PartialEq + Debug + Serialize + DeserializeOwned + 'static {}
impl<T> FunnelStep for T where T: Clone + PartialEq + Debug + Serialize + DeserializeOwned + 'static {}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FunnelError {
    #[error("a funnel needs at least one step")]
    NoSteps,
    #[error("step {0} appears more than once")]
    DuplicateStep(usize),
    #[error("no such step: {0}")]
    UnknownStep(String),
}

/// Session history the funnel records its steps in.
///
/// States are opaque strings. `back` and `forward` must notify popstate
/// listeners with the state of the entry they land on; `push_state` and
/// `replace_state` must not.
pub trait History {
    fn push_state(&self, state: String);
    fn replace_state(&self, state: String);
    fn back(&self);
    /// Registers a popstate listener. Run the returned handle to remove it.
    fn on_popstate(&self, listener: Box<dyn Fn(Option<&str>)>) -> Dispose;
}

/// What a funnel stores in each history entry.
#[derive(Serialize, Deserialize)]
struct HistoryState<S> {
    #[serde(rename = "funnelStep")]
    funnel_step: S,
}

fn encode<S: FunnelStep>(step: &S) -> Option<String> {
    serde_json::to_string(&HistoryState {
        funnel_step: step.clone(),
    })
    .map_err(|e| log::warn!("funnel: cannot encode {step:?}: {e}"))
    .ok()
}

fn decode<S: FunnelStep>(state: &str) -> Option<S> {
    serde_json::from_str::<HistoryState<S>>(state)
        .ok()
        .map(|s| s.funnel_step)
}

/// Where the funnel stands, derived from the current step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FunnelMeta {
    pub current_index: usize,
    pub length: usize,
    pub is_first: bool,
    pub is_last: bool,
    pub can_prev: bool,
    pub can_next: bool,
}

impl FunnelMeta {
    fn at(current_index: usize, length: usize) -> Self {
        Self {
            current_index,
            length,
            is_first: current_index == 0,
            is_last: current_index + 1 == length,
            can_prev: current_index > 0,
            can_next: current_index + 1 < length,
        }
    }
}

pub struct Funnel<S: FunnelStep> {
    steps: Rc<[S]>,
    current: Signal<S>,
    history: Option<Rc<dyn History>>,
    popstate: Option<Dispose>,
}

impl<S: FunnelStep> Funnel<S> {
    /// A funnel that keeps its position in memory only.
    pub fn new(steps: impl IntoIterator<Item = S>) -> Result<Self, FunnelError> {
        let steps = checked(steps)?;
        Ok(Self {
            current: Signal::new(steps[0].clone()),
            steps,
            history: None,
            popstate: None,
        })
    }

    /// A funnel mirrored into `history`. The current entry is replaced with
    /// the first step so going back to it restores the start of the flow.
    pub fn with_history(
        steps: impl IntoIterator<Item = S>,
        history: Rc<dyn History>,
    ) -> Result<Self, FunnelError> {
        let mut funnel = Self::new(steps)?;
        if let Some(state) = encode(&funnel.step()) {
            history.replace_state(state);
        }

        let (steps, current) = (funnel.steps.clone(), funnel.current.clone());
        let popstate = history.on_popstate(Box::new(move |state: Option<&str>| {
            let Some(step) = state.and_then(decode::<S>) else {
                return;
            };
            if steps.contains(&step) {
                log::debug!("funnel: history moved to {step:?}");
                current.set(step);
            }
        }));
        funnel.popstate = Some(popstate);
        funnel.history = Some(history);
        Ok(funnel)
    }

    pub fn step(&self) -> S {
        self.current.get()
    }

    pub fn steps(&self) -> &[S] {
        &self.steps
    }

    /// Whether `step` is the one to show.
    pub fn is_current(&self, step: &S) -> bool {
        self.current.get() == *step
    }

    pub fn meta(&self) -> FunnelMeta {
        FunnelMeta::at(self.index(), self.steps.len())
    }

    /// Calls `f` after every step change.
    pub fn subscribe(&self, f: impl Fn(&S) + 'static) -> Dispose {
        self.current.subscribe(f)
    }

    /// Moves one step forward. Stays put on the last step.
    pub fn next(&self) {
        let meta = self.meta();
        if !meta.can_next {
            return;
        }
        self.go(meta.current_index + 1);
    }

    /// Moves one step back. Stays put on the first step.
    ///
    /// With history attached this is a history `back()`, so the step is
    /// restored by the resulting popstate exactly as with the browser's own
    /// back button.
    pub fn prev(&self) {
        let meta = self.meta();
        if !meta.can_prev {
            return;
        }
        match &self.history {
            Some(history) => history.back(),
            None => self.current.set(self.steps[meta.current_index - 1].clone()),
        }
    }

    /// Jumps straight to `step`, recording a history entry when attached.
    pub fn set_step(&self, step: &S) -> Result<(), FunnelError> {
        let index = self
            .steps
            .iter()
            .position(|s| s == step)
            .ok_or_else(|| FunnelError::UnknownStep(format!("{step:?}")))?;
        if index != self.index() {
            self.go(index);
        }
        Ok(())
    }

    fn go(&self, index: usize) {
        let step = self.steps[index].clone();
        if let Some(history) = &self.history
            && let Some(state) = encode(&step)
        {
            history.push_state(state);
        }
        log::debug!("funnel: step {step:?} ({}/{})", index + 1, self.steps.len());
        self.current.set(step);
    }

    fn index(&self) -> usize {
        let current = self.current.get();
        self.steps.iter().position(|s| *s == current).unwrap_or(0)
    }
}

fn checked<S: FunnelStep>(steps: impl IntoIterator<Item = S>) -> Result<Rc<[S]>, FunnelError> {
    let steps: Rc<[S]> = steps.into_iter().collect();
    if steps.is_empty() {
        return Err(FunnelError::NoSteps);
    }
    for (i, step) in steps.iter().enumerate() {
        if steps[..i].contains(step) {
            return Err(FunnelError::DuplicateStep(i));
        }
    }
    Ok(steps)
}

impl<S: FunnelStep> Drop for Funnel<S> {
    fn drop(&mut self) {
        if let Some(popstate) = self.popstate.take() {
            popstate.run();
        }
    }
}

impl<S: FunnelStep> fmt::Debug for Funnel<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Funnel")
            .field("steps", &self.steps)
            .field("step", &self.current.get())
            .field("history", &self.history.is_some())
            .finish()
    }
}

/// Session history kept in memory: a stack of entries and a cursor, as in a
/// browser tab.
pub struct MemoryHistory {
    inner: RefCell<HistoryInner>,
    popped: Signal<Option<String>>,
}

struct HistoryInner {
    entries: Vec<Option<String>>,
    index: usize,
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHistory {
    /// Starts with a single stateless entry.
    pub fn new() -> Self {
        Self {
            inner: RefCell::new(HistoryInner {
                entries: vec![None],
                index: 0,
            }),
            popped: Signal::new(None),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn index(&self) -> usize {
        self.inner.borrow().index
    }

    /// State of the current entry.
    pub fn state(&self) -> Option<String> {
        let inner = self.inner.borrow();
        inner.entries[inner.index].clone()
    }

    pub fn forward(&self) {
        self.traverse(1);
    }

    fn traverse(&self, delta: isize) {
        let state = {
            let mut inner = self.inner.borrow_mut();
            let Some(index) = inner
                .index
                .checked_add_signed(delta)
                .filter(|i| *i < inner.entries.len())
            else {
                return;
            };
            inner.index = index;
            inner.entries[index].clone()
        };
        self.popped.set(state);
    }
}

impl History for MemoryHistory {
    /// Drops any forward entries, like a browser navigation.
    fn push_state(&self, state: String) {
        let mut inner = self.inner.borrow_mut();
        let index = inner.index + 1;
        inner.entries.truncate(index);
        inner.entries.push(Some(state));
        inner.index = index;
    }

    fn replace_state(&self, state: String) {
        let mut inner = self.inner.borrow_mut();
        let index = inner.index;
        inner.entries[index] = Some(state);
    }

    fn back(&self) {
        self.traverse(-1);
    }

    fn on_popstate(&self, listener: Box<dyn Fn(Option<&str>)>) -> Dispose {
        self.popped.subscribe(move |state| listener(state.as_deref()))
    }
}

impl fmt::Debug for MemoryHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("MemoryHistory")
            .field("entries", &inner.entries)
            .field("index", &inner.index)
            .finish()
    }
}
