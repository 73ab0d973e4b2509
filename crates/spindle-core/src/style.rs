use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use smallvec::SmallVec;

/// The visual element an animation writes to.
pub trait StyleSurface {
    fn set_style_property(&self, name: &str, value: &str);
}

/// A short, ordered batch of style declarations.
pub type StyleProps = SmallVec<[(&'static str, String); 6]>;

pub fn apply_styles(surface: &dyn StyleSurface, props: &[(&'static str, String)]) {
    for (name, value) in props {
        surface.set_style_property(name, value);
    }
}

/// Formats a number the way inline styles expect (`90`, `22.5`, never `-0`).
pub fn css_number(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    format!("{v}")
}

/// In-memory surface that records every write. Used by tests and headless
/// hosts.
#[derive(Debug, Default)]
pub struct StyleMap {
    props: RefCell<HashMap<String, String>>,
    writes: Cell<usize>,
}

impl StyleMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.props.borrow().get(name).cloned()
    }

    /// Total writes so far, including ones that repeated a value.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    pub fn is_empty(&self) -> bool {
        self.props.borrow().is_empty()
    }
}

impl StyleSurface for StyleMap {
    fn set_style_property(&self, name: &str, value: &str) {
        self.props
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
        self.writes.set(self.writes.get() + 1);
    }
}
