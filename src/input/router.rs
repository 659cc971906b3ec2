//! Per-window input routing: hit-testing, focus, hover, click vs. drag.

use std::time::{Duration, Instant};

use crate::constants::{DRAG_THRESHOLD, MULTI_CLICK_WINDOW_MS};
use crate::geometry::{PointF, RectF};

use super::{
    ClickZone, EventKind, InputListener, InputMode, Key, KeyAction, ListenerId, Modifiers,
    PointerButton, UiEvent,
};

#[derive(Debug, Clone, Copy)]
struct DragGrip<E: Copy + Eq> {
    element: E,
    /// Pointer position minus the element's top-left, captured once at
    /// drag start so the element stays stuck to the cursor.
    offset: PointF,
}

/// Pointer-interaction state for one window.
#[derive(Debug, Clone, Copy)]
struct PointerState<E: Copy + Eq> {
    down: bool,
    down_pos: PointF,
    last_pos: PointF,
    /// Element hit at pointer-down; receives the CLICK on release.
    pressed: Option<E>,
    dragging: bool,
    grip: Option<DragGrip<E>>,
    /// Travel exceeded the drag threshold during this press. Set even when
    /// nothing draggable sat under the down position, so the release does
    /// not fire a spurious click.
    moved_past_threshold: bool,
    last_click_at: Option<Instant>,
    click_count: u32,
    hovered: Option<E>,
    modifiers: Modifiers,
}

impl<E: Copy + Eq> Default for PointerState<E> {
    fn default() -> Self {
        Self {
            down: false,
            down_pos: PointF::default(),
            last_pos: PointF::default(),
            pressed: None,
            dragging: false,
            grip: None,
            moved_past_threshold: false,
            last_click_at: None,
            click_count: 0,
            hovered: None,
            modifiers: Modifiers::NONE,
        }
    }
}

/// Routes raw pointer events against registered click zones and synthesizes
/// focus/hover/click/drag events.
///
/// The router never owns widget lifetime: zones refer to elements by handle,
/// and [`InputRouter::unregister_zone`] silently cancels any interaction
/// (drag, hover, focus, pending click) referencing a departed element.
///
/// Every entry point returns the events it synthesized, after listener
/// delivery, so the embedding state machine can act on the unconsumed ones.
pub struct InputRouter<E: Copy + Eq + std::fmt::Debug> {
    zones: Vec<ClickZone<E>>,
    listeners: Vec<(ListenerId, Box<dyn InputListener<E>>)>,
    next_listener: u64,
    focus: Option<E>,
    mode: InputMode,
    pointer: PointerState<E>,
}

impl<E: Copy + Eq + std::fmt::Debug> Default for InputRouter<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Copy + Eq + std::fmt::Debug> InputRouter<E> {
    pub fn new() -> Self {
        Self {
            zones: Vec::new(),
            listeners: Vec::new(),
            next_listener: 0,
            focus: None,
            mode: InputMode::Normal,
            pointer: PointerState::default(),
        }
    }

    // ---- zone management ----

    pub fn register_zone(&mut self, zone: ClickZone<E>) {
        self.zones.push(zone);
    }

    /// Remove every zone bound to `element` and silently cancel any
    /// in-flight interaction referencing it.
    pub fn unregister_zone(&mut self, element: E) {
        self.zones.retain(|zone| zone.element != element);
        self.forget_element(element);
    }

    /// Move an element's zone without disturbing interaction state.
    /// Returns false if the element has no zone.
    pub fn set_zone_rect(&mut self, element: E, rect: RectF) -> bool {
        let mut found = false;
        for zone in self.zones.iter_mut().filter(|z| z.element == element) {
            zone.rect = rect;
            found = true;
        }
        found
    }

    pub fn set_zone_enabled(&mut self, element: E, enabled: bool) {
        for zone in self.zones.iter_mut().filter(|z| z.element == element) {
            zone.enabled = enabled;
        }
    }

    pub fn zone_rect(&self, element: E) -> Option<RectF> {
        self.zones
            .iter()
            .find(|zone| zone.element == element)
            .map(|zone| zone.rect)
    }

    pub fn has_zone(&self, element: E) -> bool {
        self.zones.iter().any(|zone| zone.element == element)
    }

    /// Distinct elements with at least one registered zone, in registration
    /// order. Lets the embedding layer diff its widget set against the
    /// router's when widgets come and go.
    pub fn zone_elements(&self) -> Vec<E> {
        let mut out: Vec<E> = Vec::new();
        for zone in &self.zones {
            if !out.contains(&zone.element) {
                out.push(zone.element);
            }
        }
        out
    }

    /// The enabled zone with the highest z-index containing the point.
    /// Among equal z-indices the later registration wins, so newer UI sits
    /// on top of older UI.
    pub fn top_element_at(&self, point: PointF) -> Option<E> {
        self.top_zone_at(point, None).map(|zone| zone.element)
    }

    fn top_zone_at(&self, point: PointF, button: Option<PointerButton>) -> Option<&ClickZone<E>> {
        let mut best: Option<&ClickZone<E>> = None;
        for zone in &self.zones {
            if !zone.enabled || !zone.rect.contains(point) {
                continue;
            }
            if let Some(button) = button
                && !zone.buttons.allows(button)
            {
                continue;
            }
            if best.is_none_or(|b| zone.z_index >= b.z_index) {
                best = Some(zone);
            }
        }
        best
    }

    // ---- listeners ----

    pub fn add_listener(&mut self, listener: Box<dyn InputListener<E>>) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, listener));
        id
    }

    pub fn remove_listener(&mut self, id: ListenerId) {
        self.listeners.retain(|(lid, _)| *lid != id);
    }

    fn dispatch(&mut self, mut event: UiEvent<E>) -> UiEvent<E> {
        for (_, listener) in self.listeners.iter_mut() {
            if event.consumed() {
                break;
            }
            listener.on_event(&mut event);
        }
        event
    }

    // ---- mode and focus ----

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: InputMode) {
        if self.mode != mode {
            tracing::debug!(from = ?self.mode, to = ?mode, "input mode change");
            self.mode = mode;
        }
    }

    pub fn focused(&self) -> Option<E> {
        self.focus
    }

    pub fn hovered(&self) -> Option<E> {
        self.pointer.hovered
    }

    pub fn dragging(&self) -> Option<E> {
        self.pointer.grip.map(|grip| grip.element)
    }

    pub fn click_count(&self) -> u32 {
        self.pointer.click_count
    }

    pub fn modifiers(&self) -> Modifiers {
        self.pointer.modifiers
    }

    /// Transfer focus, firing FOCUS_LOST on the old holder and then
    /// FOCUS_GAINED on the new one, both before this returns.
    pub fn set_focus(&mut self, element: Option<E>, out: &mut Vec<UiEvent<E>>) {
        if self.focus == element {
            return;
        }
        if let Some(old) = self.focus.take() {
            let event = UiEvent::new(EventKind::FocusLost, Some(old), self.pointer.last_pos);
            out.push(self.dispatch(event));
        }
        if let Some(new) = element {
            let event = UiEvent::new(EventKind::FocusGained, Some(new), self.pointer.last_pos);
            out.push(self.dispatch(event));
        }
        self.focus = element;
    }

    // ---- pointer entry points ----

    pub fn pointer_down(
        &mut self,
        button: PointerButton,
        position: PointF,
        modifiers: Modifiers,
        now: Instant,
    ) -> Vec<UiEvent<E>> {
        self.pointer.modifiers = modifiers;
        self.pointer.down = true;
        self.pointer.down_pos = position;
        self.pointer.last_pos = position;
        self.pointer.moved_past_threshold = false;

        let window = Duration::from_millis(MULTI_CLICK_WINDOW_MS);
        self.pointer.click_count = match self.pointer.last_click_at {
            Some(prev) if now.saturating_duration_since(prev) < window => {
                self.pointer.click_count + 1
            }
            _ => 1,
        };
        self.pointer.last_click_at = Some(now);

        let mut out = Vec::new();
        let hit = self.top_zone_at(position, Some(button)).map(|z| z.element);
        self.pointer.pressed = hit;
        self.set_focus(hit, &mut out);

        let mut event = UiEvent::new(EventKind::PointerDown, hit, position);
        event.button = Some(button);
        event.modifiers = modifiers;
        event.click_count = self.pointer.click_count;
        out.push(self.dispatch(event));
        out
    }

    pub fn pointer_move(&mut self, position: PointF) -> Vec<UiEvent<E>> {
        let mut out = Vec::new();

        // Hover transitions fire before anything else this move produces.
        let over = self.top_element_at(position);
        if over != self.pointer.hovered {
            if let Some(old) = self.pointer.hovered {
                let event = UiEvent::new(EventKind::HoverEnd, Some(old), position);
                out.push(self.dispatch(event));
            }
            if let Some(new) = over {
                let event = UiEvent::new(EventKind::HoverStart, Some(new), position);
                out.push(self.dispatch(event));
            }
            self.pointer.hovered = over;
        }

        if self.pointer.down {
            if !self.pointer.dragging
                && !self.pointer.moved_past_threshold
                && position.distance_to(self.pointer.down_pos) > DRAG_THRESHOLD
            {
                self.pointer.moved_past_threshold = true;
                // The drag target is the element under the original down
                // position, not the current one.
                if let Some(element) = self.pointer.pressed
                    && self.zone_is_draggable(element)
                    && let Some(rect) = self.zone_rect(element)
                {
                    let offset = PointF::new(
                        self.pointer.down_pos.x - rect.x,
                        self.pointer.down_pos.y - rect.y,
                    );
                    self.pointer.dragging = true;
                    self.pointer.grip = Some(DragGrip { element, offset });
                    if self.mode == InputMode::Normal {
                        self.set_mode(InputMode::Dragging);
                    }
                    tracing::debug!(element = ?element, "drag start");
                    let mut event = UiEvent::new(EventKind::DragStart, Some(element), position);
                    event.origin = Some(rect.origin());
                    out.push(self.dispatch(event));
                }
            }

            if self.pointer.dragging
                && let Some(grip) = self.pointer.grip
            {
                let origin =
                    PointF::new(position.x - grip.offset.x, position.y - grip.offset.y);
                self.set_zone_origin(grip.element, origin);
                let mut event = UiEvent::new(EventKind::Drag, Some(grip.element), position);
                event.origin = Some(origin);
                out.push(self.dispatch(event));
            }
        }

        let event = UiEvent::new(EventKind::PointerMove, self.pointer.hovered, position);
        out.push(self.dispatch(event));
        self.pointer.last_pos = position;
        out
    }

    pub fn pointer_up(
        &mut self,
        button: PointerButton,
        position: PointF,
        modifiers: Modifiers,
    ) -> Vec<UiEvent<E>> {
        self.pointer.modifiers = modifiers;
        let mut out = Vec::new();

        if self.pointer.dragging
            && let Some(grip) = self.pointer.grip.take()
        {
            let origin = PointF::new(position.x - grip.offset.x, position.y - grip.offset.y);
            tracing::debug!(element = ?grip.element, "drag end");
            let mut event = UiEvent::new(EventKind::DragEnd, Some(grip.element), position);
            event.button = Some(button);
            event.origin = Some(origin);
            out.push(self.dispatch(event));
        } else if let Some(pressed) = self.pointer.pressed
            && !self.pointer.moved_past_threshold
        {
            let mut event = UiEvent::new(EventKind::Click, Some(pressed), position);
            event.button = Some(button);
            event.modifiers = modifiers;
            event.click_count = self.pointer.click_count;
            out.push(self.dispatch(event));
        }

        let mut event = UiEvent::new(EventKind::PointerUp, self.top_element_at(position), position);
        event.button = Some(button);
        event.modifiers = modifiers;
        out.push(self.dispatch(event));

        self.pointer.down = false;
        self.pointer.dragging = false;
        self.pointer.grip = None;
        self.pointer.pressed = None;
        self.pointer.moved_past_threshold = false;
        if self.mode == InputMode::Dragging {
            self.set_mode(InputMode::Normal);
        }
        out
    }

    pub fn scroll(&mut self, delta: f32) -> Vec<UiEvent<E>> {
        let mut event = UiEvent::new(
            EventKind::Scroll,
            self.pointer.hovered,
            self.pointer.last_pos,
        );
        event.scroll_delta = delta;
        vec![self.dispatch(event)]
    }

    // ---- internal ----

    fn zone_is_draggable(&self, element: E) -> bool {
        self.zones
            .iter()
            .any(|zone| zone.element == element && zone.draggable)
    }

    fn set_zone_origin(&mut self, element: E, origin: PointF) {
        for zone in self.zones.iter_mut().filter(|z| z.element == element) {
            zone.rect = zone.rect.at(origin);
        }
    }

    /// Clear every interaction reference to a departed element. The drag, if
    /// any, is cancelled silently: no DRAG_END fires, and the release will
    /// not produce a click either.
    fn forget_element(&mut self, element: E) {
        if self.pointer.grip.is_some_and(|grip| grip.element == element) {
            tracing::debug!(element = ?element, "drag target vanished, cancelling drag");
            self.pointer.grip = None;
            self.pointer.dragging = false;
            self.pointer.moved_past_threshold = true;
            if self.mode == InputMode::Dragging {
                self.set_mode(InputMode::Normal);
            }
        }
        if self.pointer.pressed == Some(element) {
            self.pointer.pressed = None;
        }
        if self.pointer.hovered == Some(element) {
            self.pointer.hovered = None;
        }
        if self.focus == Some(element) {
            self.focus = None;
        }
    }
}

/// Key events route modally through the UI layer; the router only keeps the
/// modifier flags current so pointer handlers observe them.
impl<E: Copy + Eq + std::fmt::Debug> InputRouter<E> {
    pub fn key(&mut self, _key: Key, action: KeyAction, modifiers: Modifiers) {
        if action != KeyAction::Release {
            self.pointer.modifiers = modifiers;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ButtonMask;
    use std::sync::{Arc, Mutex};

    type Log = Arc<Mutex<Vec<(EventKind, Option<u32>)>>>;

    fn recording_router() -> (InputRouter<u32>, Log) {
        let mut router = InputRouter::new();
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let sink = log.clone();
        router.add_listener(Box::new(move |event: &mut UiEvent<u32>| {
            sink.lock().unwrap().push((event.kind, event.target));
        }));
        (router, log)
    }

    fn zone(id: u32, x: f32, y: f32, w: f32, h: f32, z: i32) -> ClickZone<u32> {
        ClickZone::new(id, RectF::new(x, y, w, h), z)
    }

    #[test]
    fn hit_test_prefers_higher_z_then_later_registration() {
        let mut router: InputRouter<u32> = InputRouter::new();
        router.register_zone(zone(1, 0.0, 0.0, 100.0, 100.0, 1));
        router.register_zone(zone(2, 0.0, 0.0, 100.0, 100.0, 5));
        router.register_zone(zone(3, 0.0, 0.0, 100.0, 100.0, 5));
        assert_eq!(router.top_element_at(PointF::new(10.0, 10.0)), Some(3));
    }

    #[test]
    fn disabled_zones_are_invisible() {
        let mut router: InputRouter<u32> = InputRouter::new();
        let mut z = zone(1, 0.0, 0.0, 100.0, 100.0, 1);
        z.enabled = false;
        router.register_zone(z);
        assert_eq!(router.top_element_at(PointF::new(10.0, 10.0)), None);
    }

    #[test]
    fn focus_transfer_orders_lost_before_gained() {
        let (mut router, log) = recording_router();
        router.register_zone(zone(1, 0.0, 0.0, 50.0, 50.0, 1));
        router.register_zone(zone(2, 100.0, 0.0, 50.0, 50.0, 1));
        let now = Instant::now();
        router.pointer_down(PointerButton::Left, PointF::new(10.0, 10.0), Modifiers::NONE, now);
        assert_eq!(router.focused(), Some(1));
        log.lock().unwrap().clear();

        router.pointer_down(
            PointerButton::Left,
            PointF::new(110.0, 10.0),
            Modifiers::NONE,
            now + Duration::from_secs(1),
        );
        let events = log.lock().unwrap().clone();
        assert_eq!(
            events,
            vec![
                (EventKind::FocusLost, Some(1)),
                (EventKind::FocusGained, Some(2)),
                (EventKind::PointerDown, Some(2)),
            ]
        );
        assert_eq!(router.focused(), Some(2));
    }

    #[test]
    fn missing_everything_clears_focus() {
        let (mut router, log) = recording_router();
        router.register_zone(zone(1, 0.0, 0.0, 50.0, 50.0, 1));
        let now = Instant::now();
        router.pointer_down(PointerButton::Left, PointF::new(10.0, 10.0), Modifiers::NONE, now);
        log.lock().unwrap().clear();
        router.pointer_down(
            PointerButton::Left,
            PointF::new(500.0, 500.0),
            Modifiers::NONE,
            now + Duration::from_secs(1),
        );
        assert_eq!(router.focused(), None);
        let events = log.lock().unwrap().clone();
        assert_eq!(
            events.iter().filter(|(k, _)| *k == EventKind::FocusLost).count(),
            1
        );
        assert!(!events.iter().any(|(k, _)| *k == EventKind::FocusGained));
    }

    #[test]
    fn movement_at_threshold_does_not_drag() {
        let (mut router, log) = recording_router();
        router.register_zone(zone(1, 0.0, 0.0, 50.0, 50.0, 1));
        router.pointer_down(
            PointerButton::Left,
            PointF::new(10.0, 10.0),
            Modifiers::NONE,
            Instant::now(),
        );
        // Exactly 3 px: no drag.
        router.pointer_move(PointF::new(13.0, 10.0));
        assert!(router.dragging().is_none());
        let events = log.lock().unwrap().clone();
        assert!(!events.iter().any(|(k, _)| *k == EventKind::DragStart));
    }

    #[test]
    fn movement_past_threshold_starts_exactly_one_drag() {
        let (mut router, log) = recording_router();
        router.register_zone(zone(1, 0.0, 0.0, 50.0, 50.0, 1));
        router.pointer_down(
            PointerButton::Left,
            PointF::new(10.0, 10.0),
            Modifiers::NONE,
            Instant::now(),
        );
        router.pointer_move(PointF::new(13.01, 10.0));
        assert_eq!(router.dragging(), Some(1));
        router.pointer_move(PointF::new(20.0, 10.0));
        router.pointer_move(PointF::new(30.0, 10.0));
        let events = log.lock().unwrap().clone();
        let starts = events.iter().filter(|(k, _)| *k == EventKind::DragStart).count();
        assert_eq!(starts, 1);
    }

    #[test]
    fn drag_moves_element_by_captured_offset() {
        let (mut router, _log) = recording_router();
        router.register_zone(zone(1, 100.0, 100.0, 50.0, 50.0, 1));
        router.pointer_down(
            PointerButton::Left,
            PointF::new(110.0, 120.0),
            Modifiers::NONE,
            Instant::now(),
        );
        let events = router.pointer_move(PointF::new(150.0, 160.0));
        let drag = events
            .iter()
            .find(|e| e.kind == EventKind::Drag)
            .expect("drag event");
        // Offset captured at down was (10, 20); new origin follows pointer.
        assert_eq!(drag.origin, Some(PointF::new(140.0, 140.0)));
        assert_eq!(router.zone_rect(1).unwrap().origin(), PointF::new(140.0, 140.0));
    }

    #[test]
    fn release_after_drag_fires_drag_end_not_click() {
        let (mut router, log) = recording_router();
        router.register_zone(zone(1, 0.0, 0.0, 50.0, 50.0, 1));
        router.pointer_down(
            PointerButton::Left,
            PointF::new(10.0, 10.0),
            Modifiers::NONE,
            Instant::now(),
        );
        router.pointer_move(PointF::new(40.0, 40.0));
        router.pointer_up(PointerButton::Left, PointF::new(40.0, 40.0), Modifiers::NONE);
        let events = log.lock().unwrap().clone();
        assert!(events.iter().any(|(k, _)| *k == EventKind::DragEnd));
        assert!(!events.iter().any(|(k, _)| *k == EventKind::Click));
    }

    #[test]
    fn clean_press_release_fires_click() {
        let (mut router, log) = recording_router();
        router.register_zone(zone(1, 0.0, 0.0, 50.0, 50.0, 1));
        router.pointer_down(
            PointerButton::Left,
            PointF::new(10.0, 10.0),
            Modifiers::NONE,
            Instant::now(),
        );
        router.pointer_up(PointerButton::Left, PointF::new(10.0, 10.0), Modifiers::NONE);
        let events = log.lock().unwrap().clone();
        assert!(events.iter().any(|(k, t)| *k == EventKind::Click && *t == Some(1)));
    }

    #[test]
    fn multi_click_counter_windows_at_500ms() {
        let (mut router, _log) = recording_router();
        router.register_zone(zone(1, 0.0, 0.0, 50.0, 50.0, 1));
        let t0 = Instant::now();
        let p = PointF::new(10.0, 10.0);
        router.pointer_down(PointerButton::Left, p, Modifiers::NONE, t0);
        router.pointer_up(PointerButton::Left, p, Modifiers::NONE);
        assert_eq!(router.click_count(), 1);
        router.pointer_down(
            PointerButton::Left,
            p,
            Modifiers::NONE,
            t0 + Duration::from_millis(200),
        );
        router.pointer_up(PointerButton::Left, p, Modifiers::NONE);
        assert_eq!(router.click_count(), 2);
        // A gap of exactly the window resets.
        router.pointer_down(
            PointerButton::Left,
            p,
            Modifiers::NONE,
            t0 + Duration::from_millis(700),
        );
        assert_eq!(router.click_count(), 1);
    }

    #[test]
    fn hover_transitions_fire_end_then_start() {
        let (mut router, log) = recording_router();
        router.register_zone(zone(1, 0.0, 0.0, 50.0, 50.0, 1));
        router.register_zone(zone(2, 100.0, 0.0, 50.0, 50.0, 1));
        router.pointer_move(PointF::new(10.0, 10.0));
        log.lock().unwrap().clear();
        router.pointer_move(PointF::new(110.0, 10.0));
        let events = log.lock().unwrap().clone();
        assert_eq!(
            events,
            vec![
                (EventKind::HoverEnd, Some(1)),
                (EventKind::HoverStart, Some(2)),
                (EventKind::PointerMove, Some(2)),
            ]
        );
    }

    #[test]
    fn consumption_stops_later_listeners() {
        let mut router: InputRouter<u32> = InputRouter::new();
        router.register_zone(zone(1, 0.0, 0.0, 50.0, 50.0, 1));
        let first: Log = Arc::new(Mutex::new(Vec::new()));
        let second: Log = Arc::new(Mutex::new(Vec::new()));
        let sink = first.clone();
        router.add_listener(Box::new(move |event: &mut UiEvent<u32>| {
            sink.lock().unwrap().push((event.kind, event.target));
            event.consume();
        }));
        let sink = second.clone();
        router.add_listener(Box::new(move |event: &mut UiEvent<u32>| {
            sink.lock().unwrap().push((event.kind, event.target));
        }));
        router.pointer_down(
            PointerButton::Left,
            PointF::new(10.0, 10.0),
            Modifiers::NONE,
            Instant::now(),
        );
        assert!(!first.lock().unwrap().is_empty());
        // Consumption stops this event instance, not future ones; the second
        // listener saw nothing because every event got consumed first.
        assert!(second.lock().unwrap().is_empty());
    }

    #[test]
    fn unregistering_drag_target_cancels_silently() {
        let (mut router, log) = recording_router();
        router.register_zone(zone(1, 0.0, 0.0, 50.0, 50.0, 1));
        router.pointer_down(
            PointerButton::Left,
            PointF::new(10.0, 10.0),
            Modifiers::NONE,
            Instant::now(),
        );
        router.pointer_move(PointF::new(40.0, 40.0));
        assert_eq!(router.dragging(), Some(1));
        log.lock().unwrap().clear();

        router.unregister_zone(1);
        assert!(router.dragging().is_none());
        assert_eq!(router.focused(), None);
        // Silent: no DRAG_END, and the eventual release is not a click.
        router.pointer_up(PointerButton::Left, PointF::new(40.0, 40.0), Modifiers::NONE);
        let events = log.lock().unwrap().clone();
        assert!(!events.iter().any(|(k, _)| *k == EventKind::DragEnd));
        assert!(!events.iter().any(|(k, _)| *k == EventKind::Click));
    }

    #[test]
    fn right_click_ignored_by_left_only_zone() {
        let (mut router, _log) = recording_router();
        router.register_zone(zone(1, 0.0, 0.0, 50.0, 50.0, 1));
        let events = router.pointer_down(
            PointerButton::Right,
            PointF::new(10.0, 10.0),
            Modifiers::NONE,
            Instant::now(),
        );
        let down = events
            .iter()
            .find(|e| e.kind == EventKind::PointerDown)
            .unwrap();
        assert_eq!(down.target, None);
        assert_eq!(router.focused(), None);
    }

    #[test]
    fn both_button_zone_accepts_right_click() {
        let (mut router, _log) = recording_router();
        router.register_zone(
            zone(1, 0.0, 0.0, 50.0, 50.0, 1).with_buttons(ButtonMask::LEFT_RIGHT),
        );
        let events = router.pointer_down(
            PointerButton::Right,
            PointF::new(10.0, 10.0),
            Modifiers::NONE,
            Instant::now(),
        );
        let down = events
            .iter()
            .find(|e| e.kind == EventKind::PointerDown)
            .unwrap();
        assert_eq!(down.target, Some(1));
    }

    #[test]
    fn non_draggable_zone_never_starts_a_drag() {
        let (mut router, log) = recording_router();
        router.register_zone(zone(1, 0.0, 0.0, 50.0, 50.0, 1).with_draggable(false));
        router.pointer_down(
            PointerButton::Left,
            PointF::new(10.0, 10.0),
            Modifiers::NONE,
            Instant::now(),
        );
        router.pointer_move(PointF::new(40.0, 40.0));
        assert!(router.dragging().is_none());
        // The travel still suppresses the click on release.
        router.pointer_up(PointerButton::Left, PointF::new(40.0, 40.0), Modifiers::NONE);
        let events = log.lock().unwrap().clone();
        assert!(!events.iter().any(|(k, _)| *k == EventKind::DragStart));
        assert!(!events.iter().any(|(k, _)| *k == EventKind::Click));
    }

    #[test]
    fn drag_mode_tracks_threshold_and_release() {
        let (mut router, _log) = recording_router();
        router.register_zone(zone(1, 0.0, 0.0, 50.0, 50.0, 1));
        assert_eq!(router.mode(), InputMode::Normal);
        router.pointer_down(
            PointerButton::Left,
            PointF::new(10.0, 10.0),
            Modifiers::NONE,
            Instant::now(),
        );
        assert_eq!(router.mode(), InputMode::Normal);
        router.pointer_move(PointF::new(30.0, 10.0));
        assert_eq!(router.mode(), InputMode::Dragging);
        router.pointer_up(PointerButton::Left, PointF::new(30.0, 10.0), Modifiers::NONE);
        assert_eq!(router.mode(), InputMode::Normal);
    }
}
