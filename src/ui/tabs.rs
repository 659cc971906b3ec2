//! Tabs and bubbles: the per-window widget arenas.
//!
//! Widgets are referenced by generated ids rather than borrowed, so input
//! state (drag, hover, focus) can point at them without owning them; every
//! use re-validates existence first.

use serde::{Deserialize, Serialize};

use crate::constants::MAX_TABS;
use crate::geometry::PointF;
use crate::theme::Rgba;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TabId(pub u64);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct BubbleId(pub u64);

/// Fixed chrome controls that participate in hit-testing alongside tabs and
/// bubbles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ButtonId {
    InputBox,
    Send,
    SessionMenu,
    DarkMode,
    NewTab,
}

/// Capability-tagged element handle: what a click zone, focus slot, or drag
/// grip can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ElementId {
    Tab(TabId),
    Bubble(TabId, BubbleId),
    Button(ButtonId),
}

/// Visual variants. Only `Rectangle` and `Rounded` lay out differently;
/// `Speech` and `Thought` are reserved for future styling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BubbleStyle {
    Rectangle,
    #[default]
    Rounded,
    Speech,
    Thought,
}

/// A single chat-style message widget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bubble {
    pub id: BubbleId,
    pub text: String,
    /// Display-only creation time, already formatted.
    pub timestamp: String,
    pub position: PointF,
    pub scale: f32,
    pub style: BubbleStyle,
    pub bold: bool,
    pub italic: bool,
    pub color: Rgba,
    #[serde(skip)]
    pub editing: bool,
}

impl Bubble {
    pub fn new(id: BubbleId, text: impl Into<String>, scale: f32, color: Rgba, timestamp: String) -> Self {
        Self {
            id,
            text: text.into(),
            timestamp,
            position: PointF::default(),
            scale,
            style: BubbleStyle::default(),
            bold: false,
            italic: false,
            color,
            editing: false,
        }
    }

    /// Copy for duplication: same content and styling under a fresh id, with
    /// transient state reset.
    pub fn duplicated_as(&self, id: BubbleId) -> Self {
        Self {
            id,
            editing: false,
            ..self.clone()
        }
    }
}

/// A named, ordered collection of bubbles with its own scroll offset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tab {
    pub id: TabId,
    pub name: String,
    pub color: Rgba,
    pub scroll_offset: f32,
    pub bubbles: Vec<Bubble>,
}

impl Tab {
    pub fn new(id: TabId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            color: Rgba::new(0.6, 0.6, 0.7, 0.8),
            scroll_offset: 0.0,
            bubbles: Vec::new(),
        }
    }

    pub fn bubble(&self, id: BubbleId) -> Option<&Bubble> {
        self.bubbles.iter().find(|bubble| bubble.id == id)
    }

    pub fn bubble_mut(&mut self, id: BubbleId) -> Option<&mut Bubble> {
        self.bubbles.iter_mut().find(|bubble| bubble.id == id)
    }

    pub fn remove_bubble(&mut self, id: BubbleId) -> Option<Bubble> {
        let index = self.bubbles.iter().position(|bubble| bubble.id == id)?;
        Some(self.bubbles.remove(index))
    }

    pub fn editing_bubble(&self) -> Option<BubbleId> {
        self.bubbles
            .iter()
            .find(|bubble| bubble.editing)
            .map(|bubble| bubble.id)
    }

    /// Mark one bubble as editing; at most one bubble per tab edits at a
    /// time, so everything else is cleared.
    pub fn set_editing(&mut self, id: Option<BubbleId>) {
        for bubble in &mut self.bubbles {
            bubble.editing = Some(bubble.id) == id;
        }
    }

    /// Scroll, clamping at zero on underflow.
    pub fn scroll_by(&mut self, delta: f32) {
        self.scroll_offset = (self.scroll_offset + delta).max(0.0);
    }
}

/// The ordered tab strip of one window plus the id allocators for its
/// widgets. Tab 0 ("Main") is permanent.
#[derive(Debug, Clone)]
pub struct Tabs {
    tabs: Vec<Tab>,
    active: usize,
    previous: usize,
    next_tab: u64,
    next_bubble: u64,
}

impl Tabs {
    pub fn new() -> Self {
        Self {
            tabs: vec![Tab::new(TabId(0), "Main")],
            active: 0,
            previous: 0,
            next_tab: 1,
            next_bubble: 0,
        }
    }

    /// Rebuild from a loaded session, bumping the allocators past every id
    /// seen so new widgets never collide with loaded ones. An empty snapshot
    /// still yields the permanent Main tab.
    pub fn from_loaded(mut tabs: Vec<Tab>) -> Self {
        if tabs.is_empty() {
            tabs.push(Tab::new(TabId(0), "Main"));
        }
        let next_tab = tabs.iter().map(|tab| tab.id.0 + 1).max().unwrap_or(1);
        let next_bubble = tabs
            .iter()
            .flat_map(|tab| tab.bubbles.iter())
            .map(|bubble| bubble.id.0 + 1)
            .max()
            .unwrap_or(0);
        Self {
            tabs,
            active: 0,
            previous: 0,
            next_tab,
            next_bubble,
        }
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tab> {
        self.tabs.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tab> {
        self.tabs.iter_mut()
    }

    pub fn all(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn get(&self, index: usize) -> Option<&Tab> {
        self.tabs.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Tab> {
        self.tabs.get_mut(index)
    }

    pub fn by_id(&self, id: TabId) -> Option<&Tab> {
        self.tabs.iter().find(|tab| tab.id == id)
    }

    pub fn by_id_mut(&mut self, id: TabId) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|tab| tab.id == id)
    }

    pub fn index_of(&self, id: TabId) -> Option<usize> {
        self.tabs.iter().position(|tab| tab.id == id)
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_tab(&self) -> &Tab {
        &self.tabs[self.active]
    }

    pub fn active_tab_mut(&mut self) -> &mut Tab {
        &mut self.tabs[self.active]
    }

    /// Switch the active tab, remembering where we came from.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.tabs.len() {
            return false;
        }
        if index != self.active {
            self.previous = self.active;
            self.active = index;
        }
        true
    }

    /// Cycle forward through tabs (the Tab key).
    pub fn cycle(&mut self) {
        if self.tabs.len() > 1 {
            let next = (self.active + 1) % self.tabs.len();
            self.select(next);
        }
    }

    pub fn previous_index(&self) -> usize {
        self.previous
    }

    /// Append a tab named "Tab N". Refused past the tab cap.
    pub fn add_tab(&mut self) -> Option<usize> {
        if self.tabs.len() >= MAX_TABS {
            return None;
        }
        let id = TabId(self.next_tab);
        self.next_tab += 1;
        self.tabs.push(Tab::new(id, format!("Tab {}", self.tabs.len() + 1)));
        self.active = self.tabs.len() - 1;
        Some(self.active)
    }

    /// Close a tab. The Main tab (index 0) is permanent; the active index
    /// shifts left when the closed tab was at or before it.
    pub fn close_tab(&mut self, index: usize) -> Option<Tab> {
        if index == 0 || index >= self.tabs.len() {
            return None;
        }
        let removed = self.tabs.remove(index);
        if self.active >= index {
            self.active = self.active.saturating_sub(1);
        }
        if self.previous >= self.tabs.len() {
            self.previous = 0;
        }
        Some(removed)
    }

    /// Rename a non-Main tab.
    pub fn rename_tab(&mut self, index: usize, name: impl Into<String>) -> bool {
        if index == 0 {
            return false;
        }
        match self.tabs.get_mut(index) {
            Some(tab) => {
                tab.name = name.into();
                true
            }
            None => false,
        }
    }

    /// Deep-copy a tab as "<name> (Copy)" with fresh ids throughout, and
    /// make it active. Refused past the tab cap.
    pub fn duplicate_tab(&mut self, index: usize) -> Option<usize> {
        if self.tabs.len() >= MAX_TABS {
            return None;
        }
        let source = self.tabs.get(index)?;
        let mut copy = Tab::new(TabId(self.next_tab), format!("{} (Copy)", source.name));
        self.next_tab += 1;
        copy.color = source.color;
        let bubbles = source.bubbles.clone();
        for bubble in bubbles {
            let id = BubbleId(self.next_bubble);
            self.next_bubble += 1;
            copy.bubbles.push(bubble.duplicated_as(id));
        }
        self.tabs.push(copy);
        self.active = self.tabs.len() - 1;
        Some(self.active)
    }

    pub fn alloc_bubble_id(&mut self) -> BubbleId {
        let id = BubbleId(self.next_bubble);
        self.next_bubble += 1;
        id
    }

    /// Validate a (tab, bubble) pair before use.
    pub fn bubble(&self, tab: TabId, bubble: BubbleId) -> Option<&Bubble> {
        self.by_id(tab)?.bubble(bubble)
    }

    pub fn bubble_mut(&mut self, tab: TabId, bubble: BubbleId) -> Option<&mut Bubble> {
        self.by_id_mut(tab)?.bubble_mut(bubble)
    }
}

impl Default for Tabs {
    fn default() -> Self {
        Self::new()
    }
}
