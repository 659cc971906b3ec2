//! The per-window state machine.
//!
//! `WindowUi` owns one window's tabs, bubbles, input buffer, menus, and
//! mode flags, and turns routed input events into state changes. Every
//! behavior a menu item or chrome button can trigger is a tagged
//! [`Action`] dispatched through [`WindowUi::apply`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use crate::actions::Action;
use crate::animation::MoveAnimation;
use crate::constants::{
    BASE_WINDOW_HEIGHT, BASE_WINDOW_WIDTH, BUTTON_WIDTH, DARK_MODE_BUTTON_HEIGHT,
    DARK_MODE_BUTTON_PADDING, DARK_MODE_BUTTON_WIDTH, MAX_HISTORY, MAX_INPUT_LENGTH, MAX_SCALE,
    MAX_TABS, MIN_SCALE, NEW_TAB_BUTTON_WIDTH, SCROLL_SPEED, SESSION_BUTTON_WIDTH,
    SESSION_MENU_WIDTH, SESSION_NAME_PLACEHOLDER, TAB_HEIGHT, TAB_PADDING, TEXT_BOX_HEIGHT,
    TEXT_BOX_WIDTH, TEXT_BOX_X,
};
use crate::geometry::{PointF, RectF};
use crate::input::{
    ButtonMask, ClickZone, EventKind, InputMode, InputRouter, Key, KeyAction, Modifiers,
    PointerButton, UiEvent,
};
use crate::keywords::KeywordExpander;
use crate::layout::PlacementEngine;
use crate::menu::{ContextMenu, MenuItem};
use crate::metrics::TextMetrics;
use crate::session::{SessionSnapshot, SessionStore};
use crate::theme::{PRESET_COLORS, Theme};

use super::tabs::{Bubble, BubbleId, BubbleStyle, ButtonId, ElementId, TabId, Tabs};

/// Z layers for hit-testing: chrome above tabs above bubbles.
const Z_BUBBLE: i32 = 10;
const Z_TAB: i32 = 20;
const Z_CHROME: i32 = 30;

/// UI scale derived from the window size against the reference size.
pub fn dynamic_scale(width: f32, height: f32) -> f32 {
    let scale = (width / BASE_WINDOW_WIDTH).min(height / BASE_WINDOW_HEIGHT);
    scale.clamp(MIN_SCALE, MAX_SCALE)
}

pub struct WindowUi {
    pub(super) width: f32,
    pub(super) height: f32,
    pub(super) scale: f32,
    pub(super) theme: Theme,
    pub(super) tabs: Tabs,
    pub(super) router: InputRouter<ElementId>,
    pub(super) placement: PlacementEngine<(TabId, BubbleId)>,
    pub(super) animations: HashMap<(TabId, BubbleId), MoveAnimation>,
    pub(super) input: String,
    pub(super) cursor: usize,
    history: Vec<String>,
    history_index: Option<usize>,
    draft: Option<String>,
    pub(super) menu: Option<ContextMenu>,
    pub(super) renaming_tab: Option<usize>,
    session_being_renamed: Option<String>,
    pub(super) notice: Option<String>,
    metrics: Arc<dyn TextMetrics>,
    keywords: Arc<dyn KeywordExpander>,
    sessions: Arc<dyn SessionStore>,
}

impl WindowUi {
    pub fn new(
        width: f32,
        height: f32,
        metrics: Arc<dyn TextMetrics>,
        keywords: Arc<dyn KeywordExpander>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        let mut ui = Self {
            width,
            height,
            scale: dynamic_scale(width, height),
            theme: Theme::default(),
            tabs: Tabs::new(),
            router: InputRouter::new(),
            placement: PlacementEngine::new(width, height),
            animations: HashMap::new(),
            input: String::new(),
            cursor: 0,
            history: Vec::new(),
            history_index: None,
            draft: None,
            menu: None,
            renaming_tab: None,
            session_being_renamed: None,
            notice: None,
            metrics,
            keywords,
            sessions,
        };
        ui.sync_zones();
        ui
    }

    // ---- accessors ----

    pub fn mode(&self) -> InputMode {
        self.router.mode()
    }

    pub fn tabs(&self) -> &Tabs {
        &self.tabs
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn input_text(&self) -> &str {
        &self.input
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn focused(&self) -> Option<ElementId> {
        self.router.focused()
    }

    pub fn dragged(&self) -> Option<ElementId> {
        self.router.dragging()
    }

    pub fn menu_open(&self) -> bool {
        self.menu.is_some()
    }

    pub fn renaming_tab(&self) -> Option<usize> {
        self.renaming_tab
    }

    pub fn session_list(&self) -> Vec<String> {
        self.sessions.list().unwrap_or_default()
    }

    /// One pending human-readable notification, consumed by the host.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    pub fn router(&mut self) -> &mut InputRouter<ElementId> {
        &mut self.router
    }

    // ---- chrome geometry ----

    fn input_area_y(&self) -> f32 {
        self.height - TEXT_BOX_HEIGHT * self.scale - 10.0 * self.scale
    }

    pub(super) fn input_box_rect(&self) -> RectF {
        RectF::new(
            TEXT_BOX_X * self.scale,
            self.input_area_y(),
            TEXT_BOX_WIDTH * self.scale,
            TEXT_BOX_HEIGHT * self.scale,
        )
    }

    pub(super) fn send_button_rect(&self) -> RectF {
        let input = self.input_box_rect();
        RectF::new(
            input.x + input.width + 10.0 * self.scale,
            input.y,
            BUTTON_WIDTH * self.scale,
            input.height,
        )
    }

    pub(super) fn session_button_rect(&self) -> RectF {
        let send = self.send_button_rect();
        RectF::new(
            send.x + send.width + 10.0 * self.scale,
            send.y,
            SESSION_BUTTON_WIDTH * self.scale,
            send.height,
        )
    }

    pub(super) fn dark_mode_button_rect(&self) -> RectF {
        RectF::new(
            self.width - (DARK_MODE_BUTTON_WIDTH + DARK_MODE_BUTTON_PADDING) * self.scale,
            5.0 * self.scale,
            DARK_MODE_BUTTON_WIDTH * self.scale,
            DARK_MODE_BUTTON_HEIGHT * self.scale,
        )
    }

    pub(super) fn tab_rect(&self, index: usize) -> Option<RectF> {
        let mut x = TAB_PADDING * self.scale;
        for (i, tab) in self.tabs.iter().enumerate() {
            let width = (self.metrics.measure_width(&tab.name, 1.0) + 40.0) * self.scale;
            if i == index {
                return Some(RectF::new(
                    x,
                    2.0 * self.scale,
                    width,
                    (TAB_HEIGHT - 4.0) * self.scale,
                ));
            }
            x += width + 5.0 * self.scale;
        }
        None
    }

    fn tab_close_rect(&self, index: usize) -> Option<RectF> {
        if index == 0 {
            return None;
        }
        let rect = self.tab_rect(index)?;
        Some(RectF::new(
            rect.x + rect.width - 25.0 * self.scale,
            5.0 * self.scale,
            14.0 * self.scale,
            14.0 * self.scale,
        ))
    }

    pub(super) fn new_tab_button_rect(&self) -> Option<RectF> {
        if self.tabs.len() >= MAX_TABS {
            return None;
        }
        let last = self.tab_rect(self.tabs.len() - 1)?;
        Some(RectF::new(
            last.x + last.width + 5.0 * self.scale,
            2.0 * self.scale,
            NEW_TAB_BUTTON_WIDTH * self.scale,
            26.0 * self.scale,
        ))
    }

    /// Content-space size of a bubble, from the fixed-width metrics.
    pub(super) fn bubble_size(&self, bubble: &Bubble) -> (f32, f32) {
        let text_width = self
            .metrics
            .measure_width(&bubble.text, bubble.scale * self.scale);
        let ts_width = self
            .metrics
            .measure_width(&bubble.timestamp, bubble.scale * 0.8 * self.scale);
        let width = text_width.max(ts_width) + 40.0 * self.scale;
        let height = self.metrics.line_height(bubble.scale * self.scale) + 25.0 * self.scale;
        (width, height)
    }

    /// Window-space rectangle of a bubble, scroll applied.
    pub(super) fn bubble_display_rect(&self, bubble: &Bubble, scroll: f32) -> RectF {
        let (width, height) = self.bubble_size(bubble);
        RectF::new(bubble.position.x, bubble.position.y - scroll, width, height)
    }

    // ---- zone bookkeeping ----

    /// Reconcile registered click zones with the current widget set: tabs
    /// and the active tab's bubbles, plus fixed chrome. Zones for departed
    /// widgets are unregistered, which silently cancels any interaction
    /// still referencing them.
    pub(super) fn sync_zones(&mut self) {
        let mut desired: Vec<ClickZone<ElementId>> = vec![
            ClickZone::new(
                ElementId::Button(ButtonId::InputBox),
                self.input_box_rect(),
                Z_CHROME,
            )
            .with_draggable(false),
            ClickZone::new(
                ElementId::Button(ButtonId::Send),
                self.send_button_rect(),
                Z_CHROME,
            )
            .with_draggable(false),
            ClickZone::new(
                ElementId::Button(ButtonId::SessionMenu),
                self.session_button_rect(),
                Z_CHROME,
            )
            .with_draggable(false),
            ClickZone::new(
                ElementId::Button(ButtonId::DarkMode),
                self.dark_mode_button_rect(),
                Z_CHROME,
            )
            .with_draggable(false),
        ];
        if let Some(rect) = self.new_tab_button_rect() {
            desired.push(
                ClickZone::new(ElementId::Button(ButtonId::NewTab), rect, Z_CHROME)
                    .with_draggable(false),
            );
        }
        for index in 0..self.tabs.len() {
            if let Some(rect) = self.tab_rect(index) {
                let id = self.tabs.get(index).map(|tab| tab.id);
                if let Some(id) = id {
                    desired.push(
                        ClickZone::new(ElementId::Tab(id), rect, Z_TAB)
                            .with_buttons(ButtonMask::LEFT_RIGHT)
                            .with_draggable(false),
                    );
                }
            }
        }
        let active = self.tabs.active_tab();
        let tab_id = active.id;
        let scroll = active.scroll_offset;
        let bubble_zones: Vec<(BubbleId, RectF)> = active
            .bubbles
            .iter()
            .map(|bubble| (bubble.id, self.bubble_display_rect(bubble, scroll)))
            .collect();
        for (bubble_id, rect) in bubble_zones {
            desired.push(
                ClickZone::new(ElementId::Bubble(tab_id, bubble_id), rect, Z_BUBBLE)
                    .with_buttons(ButtonMask::LEFT_RIGHT),
            );
        }

        let wanted: Vec<ElementId> = desired.iter().map(|zone| zone.element).collect();
        for element in self.router.zone_elements() {
            if !wanted.contains(&element) {
                self.router.unregister_zone(element);
            }
        }
        for zone in desired {
            if self.router.has_zone(zone.element) {
                self.router.set_zone_rect(zone.element, zone.rect);
            } else {
                self.router.register_zone(zone);
            }
        }
    }

    /// Re-place the active tab's bubbles after the visible set changed.
    /// Preferred positions keep placements sticky; no animation here, only
    /// window resizes animate.
    fn rebuild_placement(&mut self) {
        self.placement.clear_active();
        let tab_id = self.tabs.active_tab().id;
        let sizes: Vec<(BubbleId, f32, f32)> = self
            .tabs
            .active_tab()
            .bubbles
            .iter()
            .map(|bubble| {
                let (w, h) = self.bubble_size(bubble);
                (bubble.id, w, h)
            })
            .collect();
        for (bubble_id, width, height) in sizes {
            let placement = self.placement.place((tab_id, bubble_id), width, height);
            if let Some(bubble) = self.tabs.bubble_mut(tab_id, bubble_id) {
                bubble.position = placement.position;
            }
        }
    }

    // ---- pointer entry points ----

    pub fn pointer_down(
        &mut self,
        button: PointerButton,
        position: PointF,
        modifiers: Modifiers,
        now: Instant,
    ) {
        // An open menu captures the click entirely.
        if let Some(menu) = &self.menu {
            if button == PointerButton::Left {
                if let Some(item) = menu.hit_item(position) {
                    if let Some(action) = item.action.clone() {
                        self.apply(action);
                    }
                    return;
                }
                if !menu.contains(position) {
                    self.close_menu();
                }
                return;
            }
            self.close_menu();
        }

        let events = self.router.pointer_down(button, position, modifiers, now);
        self.process_events(events);
    }

    pub fn pointer_move(&mut self, position: PointF) {
        let events = self.router.pointer_move(position);
        self.process_events(events);
    }

    pub fn pointer_up(&mut self, button: PointerButton, position: PointF, modifiers: Modifiers) {
        let events = self.router.pointer_up(button, position, modifiers);
        self.process_events(events);
    }

    pub fn scroll(&mut self, dy: f32) {
        let events = self.router.scroll(dy);
        self.process_events(events);
        if self.menu.is_some() {
            return;
        }
        self.tabs.active_tab_mut().scroll_by(-dy * SCROLL_SPEED);
        self.sync_zones();
    }

    fn process_events(&mut self, events: Vec<UiEvent<ElementId>>) {
        for event in events {
            if event.consumed() {
                continue;
            }
            match event.kind {
                EventKind::PointerDown => {
                    if event.button == Some(PointerButton::Right)
                        && let Some(target) = event.target
                    {
                        self.open_context_menu_for(target, event.position);
                    }
                }
                EventKind::Click => self.on_click(&event),
                EventKind::Drag => {
                    if let (Some(ElementId::Bubble(tab_id, bubble_id)), Some(origin)) =
                        (event.target, event.origin)
                    {
                        let scroll = self
                            .tabs
                            .by_id(tab_id)
                            .map(|tab| tab.scroll_offset)
                            .unwrap_or(0.0);
                        if let Some(bubble) = self.tabs.bubble_mut(tab_id, bubble_id) {
                            bubble.position = PointF::new(origin.x, origin.y + scroll);
                        }
                    }
                }
                EventKind::DragEnd => {
                    if let Some(ElementId::Bubble(tab_id, bubble_id)) = event.target {
                        self.finish_bubble_drag(tab_id, bubble_id);
                    }
                }
                EventKind::FocusGained => {
                    if event.target == Some(ElementId::Button(ButtonId::InputBox))
                        && self.mode() == InputMode::Normal
                    {
                        self.router.set_mode(InputMode::TextInput);
                    }
                }
                EventKind::FocusLost => {
                    if event.target == Some(ElementId::Button(ButtonId::InputBox))
                        && self.mode() == InputMode::TextInput
                    {
                        self.router.set_mode(InputMode::Normal);
                    }
                }
                _ => {}
            }
        }
    }

    fn on_click(&mut self, event: &UiEvent<ElementId>) {
        match event.target {
            Some(ElementId::Button(ButtonId::DarkMode)) => self.apply(Action::ToggleDarkMode),
            Some(ElementId::Button(ButtonId::Send)) => self.send_button_pressed(),
            Some(ElementId::Button(ButtonId::SessionMenu)) => self.apply(Action::OpenSessionMenu),
            Some(ElementId::Button(ButtonId::NewTab)) => self.apply(Action::NewTab),
            Some(ElementId::Button(ButtonId::InputBox)) => {
                self.place_cursor_from_click(event.position.x);
            }
            Some(ElementId::Tab(tab_id)) => {
                let Some(index) = self.tabs.index_of(tab_id) else {
                    return;
                };
                if let Some(close) = self.tab_close_rect(index)
                    && close.contains(event.position)
                {
                    self.apply(Action::CloseTab(index));
                } else {
                    self.apply(Action::SelectTab(index));
                }
            }
            Some(ElementId::Bubble(tab_id, bubble_id)) => {
                if event.click_count >= 2 {
                    self.apply(Action::BeginBubbleEdit(tab_id, bubble_id));
                }
            }
            None => {}
        }
    }

    /// The send button doubles as the confirm button for session prompts.
    fn send_button_pressed(&mut self) {
        match self.mode() {
            InputMode::SavingSession | InputMode::RenamingSession => self.commit_session_prompt(),
            _ => self.apply(Action::SubmitInput),
        }
    }

    fn finish_bubble_drag(&mut self, tab_id: TabId, bubble_id: BubbleId) {
        let Some(bubble) = self.tabs.bubble(tab_id, bubble_id) else {
            return;
        };
        let (width, height) = self.bubble_size(bubble);
        let rect = RectF::new(bubble.position.x, bubble.position.y, width, height);
        // A dragged bubble keeps its new spot: sticky placement.
        self.placement.occupy((tab_id, bubble_id), rect);
        self.animations.remove(&(tab_id, bubble_id));
    }

    fn place_cursor_from_click(&mut self, click_x: f32) {
        let rect = self.input_box_rect();
        let char_width = 9.0 * self.scale * 2.0;
        let offset = (click_x - rect.x - 10.0 * self.scale).max(0.0);
        let chars = self.input.chars().count();
        self.cursor = ((offset / char_width) as usize).min(chars);
    }

    // ---- context menus ----

    fn open_context_menu_for(&mut self, target: ElementId, position: PointF) {
        match target {
            ElementId::Tab(tab_id) => {
                if let Some(index) = self.tabs.index_of(tab_id) {
                    self.open_menu(self.build_tab_menu(index, position));
                }
            }
            ElementId::Bubble(tab_id, bubble_id) => {
                if self.tabs.bubble(tab_id, bubble_id).is_some() {
                    self.open_menu(self.build_bubble_menu(tab_id, bubble_id, position));
                }
            }
            ElementId::Button(_) => {}
        }
    }

    fn build_tab_menu(&self, index: usize, position: PointF) -> ContextMenu {
        let mut items = Vec::new();
        if index > 0 {
            items.push(MenuItem::new("Rename Tab", Action::BeginTabRename(index)));
        }
        items.push(MenuItem::new("Duplicate Tab", Action::DuplicateTab(index)));
        if index > 0 {
            items.push(MenuItem::new("Close Tab", Action::CloseTab(index)));
        }
        let mut menu = ContextMenu::new(position, items);
        menu.clamp_into(self.width, self.height);
        menu
    }

    fn build_bubble_menu(&self, tab_id: TabId, bubble_id: BubbleId, position: PointF) -> ContextMenu {
        let mut menu = ContextMenu::new(
            position,
            vec![
                MenuItem::new("Edit", Action::BeginBubbleEdit(tab_id, bubble_id)),
                MenuItem::new("Style", Action::OpenStyleMenu(tab_id, bubble_id)),
                MenuItem::new("Color", Action::OpenColorMenu(tab_id, bubble_id)),
                MenuItem::new("Duplicate", Action::DuplicateBubble(tab_id, bubble_id)),
                MenuItem::new("Delete", Action::DeleteBubble(tab_id, bubble_id)),
            ],
        );
        menu.clamp_into(self.width, self.height);
        menu
    }

    fn build_style_menu(&self, tab_id: TabId, bubble_id: BubbleId) -> ContextMenu {
        let (bold, italic) = self
            .tabs
            .bubble(tab_id, bubble_id)
            .map(|bubble| (bubble.bold, bubble.italic))
            .unwrap_or((false, false));
        ContextMenu::new(
            PointF::default(),
            vec![
                MenuItem::new(
                    "Rectangle",
                    Action::SetBubbleStyle(tab_id, bubble_id, BubbleStyle::Rectangle),
                ),
                MenuItem::new(
                    "Rounded",
                    Action::SetBubbleStyle(tab_id, bubble_id, BubbleStyle::Rounded),
                ),
                MenuItem::new(
                    if bold { "Disable Bold" } else { "Enable Bold" },
                    Action::ToggleBubbleBold(tab_id, bubble_id),
                ),
                MenuItem::new(
                    if italic { "Disable Italic" } else { "Enable Italic" },
                    Action::ToggleBubbleItalic(tab_id, bubble_id),
                ),
            ],
        )
    }

    fn build_color_menu(&self, tab_id: TabId, bubble_id: BubbleId) -> ContextMenu {
        let items = PRESET_COLORS
            .iter()
            .map(|(name, color)| {
                MenuItem::new(*name, Action::SetBubbleColor(tab_id, bubble_id, *color))
            })
            .collect();
        ContextMenu::new(PointF::default(), items)
    }

    fn build_session_menu(&self) -> ContextMenu {
        let mut items = vec![MenuItem::new(
            "Save Current Session",
            Action::PromptSaveSession,
        )];
        match self.sessions.list() {
            Ok(sessions) if !sessions.is_empty() => {
                items.push(MenuItem::separator());
                for name in sessions {
                    items.push(MenuItem::new(
                        name.clone(),
                        Action::OpenSessionActions(name),
                    ));
                }
            }
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(error = %err, "failed to list sessions");
            }
        }
        let button = self.session_button_rect();
        let anchor = PointF::new(button.x, (button.y - 200.0 * self.scale).max(0.0));
        let mut menu = ContextMenu::new(anchor, items).with_width(SESSION_MENU_WIDTH);
        menu.clamp_into(self.width, self.height);
        menu
    }

    fn build_session_actions_menu(&self, name: &str) -> ContextMenu {
        ContextMenu::new(
            PointF::default(),
            vec![
                MenuItem::new("Load", Action::LoadSession(name.to_owned())),
                MenuItem::new("Rename", Action::PromptRenameSession(name.to_owned())),
                MenuItem::new("Delete", Action::DeleteSession(name.to_owned())),
            ],
        )
    }

    fn open_menu(&mut self, menu: ContextMenu) {
        self.menu = Some(menu);
        if self.mode() == InputMode::Normal || self.mode() == InputMode::TextInput {
            self.router.set_mode(InputMode::Modal);
        }
    }

    /// Attach `submenu` to the open menu, level with the item carrying
    /// `action`; closing the parent closes it too.
    fn open_submenu_for(&mut self, action: &Action, submenu: ContextMenu) {
        if let Some(menu) = self.menu.as_mut() {
            let index = menu
                .items
                .iter()
                .position(|item| item.action.as_ref() == Some(action))
                .unwrap_or(0);
            menu.open_submenu(index, submenu);
            if let Some(sub) = menu.submenu.as_mut() {
                sub.clamp_into(self.width, self.height);
            }
        }
    }

    fn close_menu(&mut self) {
        self.menu = None;
        if self.mode() == InputMode::Modal {
            self.router.set_mode(InputMode::Normal);
        }
    }

    // ---- action dispatch ----

    pub fn apply(&mut self, action: Action) {
        tracing::debug!(action = %action, "apply");
        match action {
            Action::SelectTab(index) => {
                if self.tabs.select(index) {
                    self.rebuild_placement();
                    self.sync_zones();
                }
                self.close_menu();
            }
            Action::CloseTab(index) => {
                if let Some(tab) = self.tabs.close_tab(index) {
                    for bubble in &tab.bubbles {
                        self.placement.remove((tab.id, bubble.id));
                        self.animations.remove(&(tab.id, bubble.id));
                    }
                    // A rename aimed at a shifted or removed index is stale.
                    match self.renaming_tab {
                        Some(renaming) if renaming == index => self.renaming_tab = None,
                        Some(renaming) if renaming > index => {
                            self.renaming_tab = Some(renaming - 1)
                        }
                        _ => {}
                    }
                    self.rebuild_placement();
                    self.sync_zones();
                }
                self.close_menu();
            }
            Action::NewTab => {
                if self.tabs.add_tab().is_some() {
                    self.rebuild_placement();
                    self.sync_zones();
                }
                self.close_menu();
            }
            Action::BeginTabRename(index) => {
                if index > 0 && index < self.tabs.len() {
                    self.renaming_tab = Some(index);
                    self.input = self
                        .tabs
                        .get(index)
                        .map(|tab| tab.name.clone())
                        .unwrap_or_default();
                    self.cursor = self.input.chars().count();
                }
                self.close_menu();
            }
            Action::DuplicateTab(index) => {
                if self.tabs.duplicate_tab(index).is_some() {
                    self.rebuild_placement();
                    self.sync_zones();
                }
                self.close_menu();
            }
            Action::BeginBubbleEdit(tab_id, bubble_id) => {
                let text = self
                    .tabs
                    .bubble(tab_id, bubble_id)
                    .map(|bubble| bubble.text.clone());
                if let Some(text) = text
                    && let Some(tab) = self.tabs.by_id_mut(tab_id)
                {
                    tab.set_editing(Some(bubble_id));
                    self.cursor = text.chars().count();
                    self.input = text;
                }
                self.close_menu();
            }
            Action::OpenStyleMenu(tab_id, bubble_id) => {
                let submenu = self.build_style_menu(tab_id, bubble_id);
                self.open_submenu_for(&Action::OpenStyleMenu(tab_id, bubble_id), submenu);
            }
            Action::OpenColorMenu(tab_id, bubble_id) => {
                let submenu = self.build_color_menu(tab_id, bubble_id);
                self.open_submenu_for(&Action::OpenColorMenu(tab_id, bubble_id), submenu);
            }
            Action::SetBubbleStyle(tab_id, bubble_id, style) => {
                if let Some(bubble) = self.tabs.bubble_mut(tab_id, bubble_id) {
                    bubble.style = style;
                }
                self.close_menu();
            }
            Action::SetBubbleColor(tab_id, bubble_id, color) => {
                if let Some(bubble) = self.tabs.bubble_mut(tab_id, bubble_id) {
                    bubble.color = color.with_alpha(0.9);
                }
                self.close_menu();
            }
            Action::ToggleBubbleBold(tab_id, bubble_id) => {
                if let Some(bubble) = self.tabs.bubble_mut(tab_id, bubble_id) {
                    bubble.bold = !bubble.bold;
                }
                self.close_menu();
            }
            Action::ToggleBubbleItalic(tab_id, bubble_id) => {
                if let Some(bubble) = self.tabs.bubble_mut(tab_id, bubble_id) {
                    bubble.italic = !bubble.italic;
                }
                self.close_menu();
            }
            Action::DuplicateBubble(tab_id, bubble_id) => {
                self.duplicate_bubble(tab_id, bubble_id);
                self.close_menu();
            }
            Action::DeleteBubble(tab_id, bubble_id) => {
                if let Some(tab) = self.tabs.by_id_mut(tab_id)
                    && tab.remove_bubble(bubble_id).is_some()
                {
                    self.placement.remove((tab_id, bubble_id));
                    self.animations.remove(&(tab_id, bubble_id));
                    self.sync_zones();
                }
                self.close_menu();
            }
            Action::OpenSessionMenu => {
                let menu = self.build_session_menu();
                self.open_menu(menu);
            }
            Action::OpenSessionActions(name) => {
                let submenu = self.build_session_actions_menu(&name);
                self.open_submenu_for(&Action::OpenSessionActions(name), submenu);
            }
            Action::PromptSaveSession => {
                self.close_menu();
                self.input = SESSION_NAME_PLACEHOLDER.to_owned();
                self.cursor = self.input.chars().count();
                self.router.set_mode(InputMode::SavingSession);
            }
            Action::LoadSession(name) => {
                self.close_menu();
                match self.sessions.load(&name) {
                    Ok(Some(snapshot)) => self.load_snapshot(snapshot),
                    Ok(None) => {
                        self.notice = Some(format!("Session {name:?} not found"));
                    }
                    Err(err) => {
                        tracing::warn!(session = %name, error = %err, "session load failed");
                        self.notice = Some(format!("Failed to load session {name:?}: {err}"));
                    }
                }
            }
            Action::PromptRenameSession(name) => {
                self.close_menu();
                self.input = name.clone();
                self.cursor = self.input.chars().count();
                self.session_being_renamed = Some(name);
                self.router.set_mode(InputMode::RenamingSession);
            }
            Action::DeleteSession(name) => {
                self.close_menu();
                if let Err(err) = self.sessions.delete(&name) {
                    tracing::warn!(session = %name, error = %err, "session delete failed");
                    self.notice = Some(format!("Failed to delete session {name:?}: {err}"));
                }
            }
            Action::ToggleDarkMode => {
                self.theme = self.theme.toggled();
                let tint = if self.theme.dark_mode {
                    crate::theme::Rgba::opaque(0.2, 0.2, 0.2)
                } else {
                    crate::theme::Rgba::opaque(0.85, 0.85, 0.85)
                };
                for tab in self.tabs.iter_mut() {
                    for bubble in &mut tab.bubbles {
                        bubble.color = tint;
                    }
                }
            }
            Action::SubmitInput => self.submit_input(),
            Action::CloseMenu => self.close_menu(),
        }
    }

    fn duplicate_bubble(&mut self, tab_id: TabId, bubble_id: BubbleId) {
        let Some(source) = self.tabs.bubble(tab_id, bubble_id).cloned() else {
            return;
        };
        let new_id = self.tabs.alloc_bubble_id();
        let mut copy = source.duplicated_as(new_id);
        let (width, height) = self.bubble_size(&copy);
        let placement = self.placement.place((tab_id, new_id), width, height);
        copy.position = placement.position;
        if let Some(tab) = self.tabs.by_id_mut(tab_id) {
            tab.bubbles.push(copy);
            self.sync_zones();
        } else {
            self.placement.remove((tab_id, new_id));
        }
    }

    // ---- text input ----

    pub fn char_input(&mut self, c: char) {
        if self.input.chars().count() >= MAX_INPUT_LENGTH {
            return;
        }
        let byte = byte_index(&self.input, self.cursor);
        self.input.insert(byte, c);
        self.cursor += 1;
    }

    pub fn key(&mut self, key: Key, action: KeyAction, modifiers: Modifiers) {
        if action == KeyAction::Release {
            return;
        }
        self.router.key(key, action, modifiers);

        if key == Key::Escape && self.menu.is_some() {
            self.close_menu();
            return;
        }
        if key == Key::Char('s') && modifiers.ctrl {
            let menu = self.build_session_menu();
            self.open_menu(menu);
            return;
        }

        // Strict precedence: tab rename, then session prompts, then bubble
        // edit, then normal input.
        if let Some(index) = self.renaming_tab {
            if index == 0 || index >= self.tabs.len() {
                // Stale rename target: clear instead of faulting.
                tracing::warn!(index, "dropping stale tab rename");
                self.renaming_tab = None;
            } else {
                self.handle_tab_rename_key(key, index);
                return;
            }
        }
        if matches!(
            self.mode(),
            InputMode::SavingSession | InputMode::RenamingSession
        ) {
            self.handle_session_key(key);
            return;
        }
        if let Some(bubble_id) = self.tabs.active_tab().editing_bubble() {
            self.handle_bubble_edit_key(key, bubble_id);
            return;
        }
        self.handle_normal_key(key);
    }

    fn handle_tab_rename_key(&mut self, key: Key, index: usize) {
        match key {
            Key::Enter => {
                let name = self.input.trim().to_owned();
                if !name.is_empty() {
                    self.tabs.rename_tab(index, name);
                    self.sync_zones();
                }
                self.renaming_tab = None;
                self.clear_input();
            }
            Key::Escape => {
                self.renaming_tab = None;
                self.clear_input();
            }
            _ => self.common_edit_key(key),
        }
    }

    fn handle_session_key(&mut self, key: Key) {
        match key {
            Key::Enter => self.commit_session_prompt(),
            Key::Escape => {
                self.session_being_renamed = None;
                self.router.set_mode(InputMode::Normal);
                self.clear_input();
            }
            _ => self.common_edit_key(key),
        }
    }

    fn commit_session_prompt(&mut self) {
        match self.mode() {
            InputMode::SavingSession => {
                let name = self.input.trim().to_owned();
                if !name.is_empty() && name != SESSION_NAME_PLACEHOLDER {
                    let snapshot = self.snapshot(name.clone());
                    match self.sessions.save(&snapshot) {
                        Ok(()) => tracing::debug!(session = %name, "session saved"),
                        Err(err) => {
                            // The unsaved tabs stay untouched in memory.
                            tracing::warn!(session = %name, error = %err, "session save failed");
                            self.notice =
                                Some(format!("Failed to save session {name:?}: {err}"));
                        }
                    }
                }
            }
            InputMode::RenamingSession => {
                let new = self.input.trim().to_owned();
                if let Some(old) = self.session_being_renamed.take()
                    && !new.is_empty()
                    && let Err(err) = self.sessions.rename(&old, &new)
                {
                    tracing::warn!(from = %old, to = %new, error = %err, "session rename failed");
                    self.notice = Some(format!("Failed to rename session {old:?}: {err}"));
                }
            }
            _ => {}
        }
        self.session_being_renamed = None;
        self.router.set_mode(InputMode::Normal);
        self.clear_input();
    }

    fn handle_bubble_edit_key(&mut self, key: Key, bubble_id: BubbleId) {
        let tab_id = self.tabs.active_tab().id;
        match key {
            Key::Enter => {
                let text = self.input.trim().to_owned();
                if !text.is_empty()
                    && let Some(bubble) = self.tabs.bubble_mut(tab_id, bubble_id)
                {
                    bubble.text = text;
                }
                // Keep the occupied rect in step with the edited size.
                if let Some(bubble) = self.tabs.bubble(tab_id, bubble_id) {
                    let (width, height) = self.bubble_size(bubble);
                    let rect =
                        RectF::new(bubble.position.x, bubble.position.y, width, height);
                    self.placement.occupy((tab_id, bubble_id), rect);
                }
                self.tabs.active_tab_mut().set_editing(None);
                self.clear_input();
                self.sync_zones();
            }
            Key::Escape => {
                self.tabs.active_tab_mut().set_editing(None);
                self.clear_input();
            }
            _ => self.common_edit_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: Key) {
        match key {
            Key::Enter => {
                if !self.input.is_empty() {
                    self.submit_input();
                }
            }
            Key::Up | Key::Down => self.navigate_history(key),
            Key::Tab => {
                self.tabs.cycle();
                self.rebuild_placement();
                self.sync_zones();
            }
            _ => self.common_edit_key(key),
        }
    }

    /// Shared editing primitives every text-accepting mode falls back to.
    fn common_edit_key(&mut self, key: Key) {
        match key {
            Key::Backspace => {
                if self.cursor > 0 {
                    let byte = byte_index(&self.input, self.cursor - 1);
                    self.input.remove(byte);
                    self.cursor -= 1;
                }
            }
            Key::Delete => {
                if self.cursor < self.input.chars().count() {
                    let byte = byte_index(&self.input, self.cursor);
                    self.input.remove(byte);
                }
            }
            Key::Left => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                }
            }
            Key::Right => {
                if self.cursor < self.input.chars().count() {
                    self.cursor += 1;
                }
            }
            Key::Home => self.cursor = 0,
            Key::End => self.cursor = self.input.chars().count(),
            _ => {}
        }
    }

    fn navigate_history(&mut self, key: Key) {
        if self.history.is_empty() {
            return;
        }
        match key {
            Key::Up => {
                let next = match self.history_index {
                    None => {
                        self.draft = Some(self.input.clone());
                        0
                    }
                    Some(index) if index + 1 < self.history.len() => index + 1,
                    Some(_) => return,
                };
                self.history_index = Some(next);
                self.input = self.history[self.history.len() - 1 - next].clone();
                self.cursor = self.input.chars().count();
            }
            Key::Down => match self.history_index {
                Some(0) => {
                    self.history_index = None;
                    self.input = self.draft.take().unwrap_or_default();
                    self.cursor = self.input.chars().count();
                }
                Some(index) => {
                    self.history_index = Some(index - 1);
                    self.input = self.history[self.history.len() - index].clone();
                    self.cursor = self.input.chars().count();
                }
                None => {}
            },
            _ => {}
        }
    }

    fn clear_input(&mut self) {
        self.input.clear();
        self.cursor = 0;
    }

    /// Submit pipeline: trim, expand keywords, stamp, place, record history.
    fn submit_input(&mut self) {
        let raw = self.input.trim().to_owned();
        if raw.is_empty() {
            return;
        }
        let text = self.keywords.process(&raw);
        let timestamp = chrono::Local::now().format("%H:%M:%S").to_string();
        let bubble_id = self.tabs.alloc_bubble_id();
        let tab_id = self.tabs.active_tab().id;
        let mut bubble = Bubble::new(
            bubble_id,
            text,
            1.0,
            self.theme.new_bubble_color(),
            timestamp,
        );
        let (width, height) = self.bubble_size(&bubble);
        let placement = self.placement.place((tab_id, bubble_id), width, height);
        bubble.position = placement.position;
        self.tabs.active_tab_mut().bubbles.push(bubble);

        self.history.push(raw);
        while self.history.len() > MAX_HISTORY {
            self.history.remove(0);
        }
        self.history_index = None;
        self.draft = None;
        self.clear_input();
        self.sync_zones();
    }

    // ---- resize and sessions ----

    pub fn resize(&mut self, width: f32, height: f32, now: Instant) {
        self.width = width;
        self.height = height;
        self.scale = dynamic_scale(width, height);
        let moves = self.placement.resize(width, height);
        for (key, old, new) in moves {
            if old.distance_to(new) > 1.0 {
                self.animations.insert(key, MoveAnimation::layout(old, new, now));
            }
            let (tab_id, bubble_id) = key;
            if let Some(bubble) = self.tabs.bubble_mut(tab_id, bubble_id) {
                bubble.position = new;
            }
        }
        self.sync_zones();
    }

    pub fn snapshot(&self, name: String) -> SessionSnapshot {
        SessionSnapshot::new(
            name,
            self.tabs.all().to_vec(),
            self.theme.dark_mode,
            self.scale,
        )
    }

    fn load_snapshot(&mut self, snapshot: SessionSnapshot) {
        tracing::debug!(session = %snapshot.name, tabs = snapshot.tabs.len(), "loading session");
        self.tabs = Tabs::from_loaded(snapshot.tabs);
        self.theme = Theme::for_mode(snapshot.dark_mode);
        self.animations.clear();
        self.placement = PlacementEngine::new(self.width, self.height);
        self.renaming_tab = None;
        self.session_being_renamed = None;
        self.router.set_mode(InputMode::Normal);
        self.clear_input();
        self.rebuild_placement();
        self.sync_zones();
    }
}

/// Byte offset of the `char_index`-th character.
fn byte_index(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map(|(byte, _)| byte)
        .unwrap_or(s.len())
}
