//! The host-facing entry surface.
//!
//! One registry owns every window's state bundle, keyed by a generated
//! opaque handle. The host event pump calls the per-window entry points
//! from whatever threads it runs its windows on: the map is behind a
//! read lock and each window behind its own mutex, so two windows never
//! contend and a frame pass never observes a half-updated widget list.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Instant;

use crate::error::UiError;
use crate::geometry::PointF;
use crate::input::{Key, KeyAction, Modifiers, PointerButton};
use crate::keywords::{KeywordExpander, TemplateKeywords};
use crate::metrics::{FixedWidthMetrics, TextMetrics};
use crate::session::{FileSessionStore, MemorySessionStore, SessionStore};
use crate::ui::{FrameScene, WindowUi};

/// Opaque per-window handle issued by [`WindowRegistry::open_window`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowId(u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window-{}", self.0)
    }
}

pub struct WindowRegistry {
    windows: RwLock<HashMap<WindowId, Arc<Mutex<WindowUi>>>>,
    next_id: AtomicU64,
    metrics: Arc<dyn TextMetrics>,
    keywords: Arc<dyn KeywordExpander>,
    sessions: Arc<dyn SessionStore>,
}

impl WindowRegistry {
    /// Registry with explicit collaborators.
    pub fn new(
        metrics: Arc<dyn TextMetrics>,
        keywords: Arc<dyn KeywordExpander>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            windows: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            metrics,
            keywords,
            sessions,
        }
    }

    /// Stock collaborators: fixed-width metrics, template keywords, and the
    /// file-backed session store under the platform config directory.
    pub fn with_defaults() -> Result<Self, UiError> {
        let sessions: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new()?);
        Ok(Self::new(
            Arc::new(FixedWidthMetrics::default()),
            Arc::new(TemplateKeywords::new()),
            sessions,
        ))
    }

    /// In-memory sessions; useful for tests and hosts that persist
    /// elsewhere.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(FixedWidthMetrics::default()),
            Arc::new(TemplateKeywords::new()),
            Arc::new(MemorySessionStore::new()),
        )
    }

    // ---- lifecycle ----

    pub fn open_window(&self, width: f32, height: f32) -> WindowId {
        let id = WindowId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let ui = WindowUi::new(
            width,
            height,
            self.metrics.clone(),
            self.keywords.clone(),
            self.sessions.clone(),
        );
        self.windows
            .write()
            .unwrap()
            .insert(id, Arc::new(Mutex::new(ui)));
        tracing::debug!(%id, width, height, "window opened");
        id
    }

    /// Drop a window's entire state bundle in one step: tabs, input state,
    /// menus, animations, and any in-flight drag go with it. Returns false
    /// for unknown handles.
    pub fn close_window(&self, id: WindowId) -> bool {
        let removed = self.windows.write().unwrap().remove(&id).is_some();
        if removed {
            tracing::debug!(%id, "window closed");
        } else {
            tracing::warn!(%id, "close for unknown window");
        }
        removed
    }

    pub fn window_count(&self) -> usize {
        self.windows.read().unwrap().len()
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.windows.read().unwrap().contains_key(&id)
    }

    /// Run a closure against one window's state. Unknown handles yield
    /// `None`; nothing panics across the API boundary.
    pub fn with_window<T>(&self, id: WindowId, f: impl FnOnce(&mut WindowUi) -> T) -> Option<T> {
        let window = self.windows.read().unwrap().get(&id).cloned()?;
        let mut ui = window.lock().unwrap();
        Some(f(&mut ui))
    }

    // ---- per-window event entry points ----

    pub fn pointer_down(
        &self,
        id: WindowId,
        button: PointerButton,
        x: f32,
        y: f32,
        modifiers: Modifiers,
    ) {
        let now = Instant::now();
        self.with_window(id, |ui| {
            ui.pointer_down(button, PointF::new(x, y), modifiers, now)
        });
    }

    pub fn pointer_up(
        &self,
        id: WindowId,
        button: PointerButton,
        x: f32,
        y: f32,
        modifiers: Modifiers,
    ) {
        self.with_window(id, |ui| {
            ui.pointer_up(button, PointF::new(x, y), modifiers)
        });
    }

    pub fn pointer_move(&self, id: WindowId, x: f32, y: f32) {
        self.with_window(id, |ui| ui.pointer_move(PointF::new(x, y)));
    }

    pub fn scroll(&self, id: WindowId, dy: f32) {
        self.with_window(id, |ui| ui.scroll(dy));
    }

    pub fn key(&self, id: WindowId, key: Key, action: KeyAction, modifiers: Modifiers) {
        self.with_window(id, |ui| ui.key(key, action, modifiers));
    }

    pub fn char_input(&self, id: WindowId, c: char) {
        self.with_window(id, |ui| ui.char_input(c));
    }

    pub fn resize(&self, id: WindowId, width: f32, height: f32) {
        let now = Instant::now();
        self.with_window(id, |ui| ui.resize(width, height, now));
    }

    /// Advance animations and describe the window for drawing. `None` for
    /// unknown handles.
    pub fn frame(&self, id: WindowId, now: Instant) -> Option<FrameScene> {
        self.with_window(id, |ui| ui.frame(now))
    }

    /// Pop the window's pending user-visible notification, if any.
    pub fn take_notice(&self, id: WindowId) -> Option<String> {
        self.with_window(id, |ui| ui.take_notice()).flatten()
    }
}
