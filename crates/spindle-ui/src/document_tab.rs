//! Browser-tab title and favicon.
//!
//! [`DocumentTab`] picks a title/favicon from a route table whenever the
//! current path changes. [`DocumentTabOverride`] sets them directly for as
//! long as it lives. Both put back whatever the document showed before.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// The host document's tab metadata.
pub trait DocumentSurface {
    fn title(&self) -> String;
    fn set_title(&self, title: &str);
    /// Current favicon href, or `None` when the document has no icon link.
    fn favicon(&self) -> Option<String>;
    /// Points the icon link at `href`, creating the link if needed.
    fn set_favicon(&self, href: &str);
}

/// Title/favicon to show for paths matching `path`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocumentMeta {
    pub path: String,
    pub title: Option<String>,
    pub favicon: Option<String>,
}

impl DocumentMeta {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn favicon(mut self, href: impl Into<String>) -> Self {
        self.favicon = Some(href.into());
        self
    }
}

/// Matches `path` against `pattern` segment by segment. Empty segments are
/// ignored, the segment counts must be equal, and `:name` segments match
/// anything.
pub fn match_route(pattern: &str, path: &str) -> bool {
    fn segments(s: &str) -> Vec<&str> {
        s.split('/').filter(|p| !p.is_empty()).collect()
    }
    let (pattern, path) = (segments(pattern), segments(path));
    pattern.len() == path.len()
        && pattern
            .iter()
            .zip(&path)
            .all(|(want, got)| want.starts_with(':') || want == got)
}

/// What to put back once a title write is undone.
struct SavedTitle(String);

impl SavedTitle {
    fn apply(surface: &dyn DocumentSurface, title: &str) -> Self {
        let prev = surface.title();
        surface.set_title(title);
        SavedTitle(prev)
    }

    fn restore(self, surface: &dyn DocumentSurface) {
        surface.set_title(&self.0);
    }
}

/// What to put back once a favicon write is undone. A document that had no
/// icon before keeps the one we created.
struct SavedFavicon(Option<String>);

impl SavedFavicon {
    fn apply(surface: &dyn DocumentSurface, href: &str) -> Self {
        let prev = surface.favicon().filter(|p| !p.is_empty());
        surface.set_favicon(href);
        SavedFavicon(prev)
    }

    fn restore(self, surface: &dyn DocumentSurface) {
        if let Some(prev) = self.0 {
            surface.set_favicon(&prev);
        }
    }
}

#[derive(Default)]
struct Applied {
    title: Option<SavedTitle>,
    favicon: Option<SavedFavicon>,
}

impl Applied {
    fn apply(surface: &dyn DocumentSurface, title: Option<&str>, favicon: Option<&str>) -> Self {
        Self {
            title: title.map(|t| SavedTitle::apply(surface, t)),
            favicon: favicon.map(|f| SavedFavicon::apply(surface, f)),
        }
    }

    fn restore(self, surface: &dyn DocumentSurface) {
        if let Some(title) = self.title {
            title.restore(surface);
        }
        if let Some(favicon) = self.favicon {
            favicon.restore(surface);
        }
    }
}

/// Route-driven tab metadata.
pub struct DocumentTab {
    metas: Vec<DocumentMeta>,
    surface: Rc<dyn DocumentSurface>,
    path: RefCell<Option<String>>,
    applied: RefCell<Option<Applied>>,
}

impl DocumentTab {
    /// Nothing is written until the first [`route_changed`](Self::route_changed).
    pub fn new(metas: Vec<DocumentMeta>, surface: Rc<dyn DocumentSurface>) -> Self {
        Self {
            metas,
            surface,
            path: RefCell::new(None),
            applied: RefCell::new(None),
        }
    }

    pub fn path(&self) -> Option<String> {
        self.path.borrow().clone()
    }

    /// The first meta whose pattern matches `path`.
    pub fn meta_for(&self, path: &str) -> Option<&DocumentMeta> {
        self.metas.iter().find(|m| match_route(&m.path, path))
    }

    /// Undoes the previous route's title/favicon and applies the first meta
    /// matching `path`. Repeating the current path does nothing.
    pub fn route_changed(&self, path: &str) {
        if self.path.borrow().as_deref() == Some(path) {
            return;
        }
        self.path.replace(Some(path.to_owned()));
        self.restore();

        let Some(meta) = self.meta_for(path) else {
            log::trace!("document tab: no meta for {path}");
            return;
        };
        log::debug!("document tab: {path} matched {}", meta.path);
        let applied = Applied::apply(
            self.surface.as_ref(),
            meta.title.as_deref(),
            meta.favicon.as_deref(),
        );
        self.applied.replace(Some(applied));
    }

    fn restore(&self) {
        let applied = self.applied.borrow_mut().take();
        if let Some(applied) = applied {
            applied.restore(self.surface.as_ref());
        }
    }
}

impl Drop for DocumentTab {
    fn drop(&mut self) {
        self.restore();
    }
}

impl fmt::Debug for DocumentTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentTab")
            .field("metas", &self.metas)
            .field("path", &self.path.borrow())
            .finish()
    }
}

/// Sets the tab title and/or favicon while alive.
///
/// Title and favicon are independent: changing one restores and re-applies
/// only that one.
pub struct DocumentTabOverride {
    surface: Rc<dyn DocumentSurface>,
    title: Option<String>,
    favicon: Option<String>,
    saved: Applied,
}

impl DocumentTabOverride {
    pub fn new(
        surface: Rc<dyn DocumentSurface>,
        title: Option<&str>,
        favicon: Option<&str>,
    ) -> Self {
        let saved = Applied::apply(surface.as_ref(), title, favicon);
        Self {
            surface,
            title: title.map(str::to_owned),
            favicon: favicon.map(str::to_owned),
            saved,
        }
    }

    pub fn set_title(&mut self, title: Option<&str>) {
        if self.title.as_deref() == title {
            return;
        }
        if let Some(saved) = self.saved.title.take() {
            saved.restore(self.surface.as_ref());
        }
        self.saved.title = title.map(|t| SavedTitle::apply(self.surface.as_ref(), t));
        self.title = title.map(str::to_owned);
    }

    pub fn set_favicon(&mut self, favicon: Option<&str>) {
        if self.favicon.as_deref() == favicon {
            return;
        }
        if let Some(saved) = self.saved.favicon.take() {
            saved.restore(self.surface.as_ref());
        }
        self.saved.favicon = favicon.map(|f| SavedFavicon::apply(self.surface.as_ref(), f));
        self.favicon = favicon.map(str::to_owned);
    }
}

impl Drop for DocumentTabOverride {
    fn drop(&mut self) {
        std::mem::take(&mut self.saved).restore(self.surface.as_ref());
    }
}

impl fmt::Debug for DocumentTabOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentTabOverride")
            .field("title", &self.title)
            .field("favicon", &self.favicon)
            .finish()
    }
}

/// In-memory document, for tests and headless hosts.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    title: RefCell<String>,
    favicon: RefCell<Option<String>>,
}

impl MemoryDocument {
    pub fn new(title: &str, favicon: Option<&str>) -> Self {
        Self {
            title: RefCell::new(title.to_owned()),
            favicon: RefCell::new(favicon.map(str::to_owned)),
        }
    }
}

impl DocumentSurface for MemoryDocument {
    fn title(&self) -> String {
        self.title.borrow().clone()
    }

    fn set_title(&self, title: &str) {
        *self.title.borrow_mut() = title.to_owned();
    }

    fn favicon(&self) -> Option<String> {
        self.favicon.borrow().clone()
    }

    fn set_favicon(&self, href: &str) {
        *self.favicon.borrow_mut() = Some(href.to_owned());
    }
}
