//! Context menus: flat item lists with optional one-level submenus.

use crate::actions::Action;
use crate::constants::{MENU_ITEM_HEIGHT, MENU_SEPARATOR, MENU_WIDTH};
use crate::geometry::{PointF, RectF};

/// A single menu entry. Separator rows carry no action and are skipped by
/// hit-testing.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    pub label: String,
    pub action: Option<Action>,
}

impl MenuItem {
    pub fn new(label: impl Into<String>, action: Action) -> Self {
        Self {
            label: label.into(),
            action: Some(action),
        }
    }

    pub fn separator() -> Self {
        Self {
            label: MENU_SEPARATOR.to_owned(),
            action: None,
        }
    }

    pub fn is_separator(&self) -> bool {
        self.label == MENU_SEPARATOR
    }
}

/// An anchored menu. A menu may spawn one submenu to its right; dropping the
/// parent drops the submenu with it, so closing cascades for free.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextMenu {
    pub anchor: PointF,
    pub items: Vec<MenuItem>,
    pub width: f32,
    pub visible: bool,
    pub submenu: Option<Box<ContextMenu>>,
}

impl ContextMenu {
    pub fn new(anchor: PointF, items: Vec<MenuItem>) -> Self {
        Self {
            anchor,
            items,
            width: MENU_WIDTH,
            visible: true,
            submenu: None,
        }
    }

    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    pub fn height(&self) -> f32 {
        self.items.len() as f32 * MENU_ITEM_HEIGHT
    }

    pub fn rect(&self) -> RectF {
        RectF::new(self.anchor.x, self.anchor.y, self.width, self.height())
    }

    /// Shift the anchor so the menu stays inside the window.
    pub fn clamp_into(&mut self, window_width: f32, window_height: f32) {
        if self.anchor.x + self.width > window_width {
            self.anchor.x = (window_width - self.width).max(0.0);
        }
        if self.anchor.y + self.height() > window_height {
            self.anchor.y = (window_height - self.height()).max(0.0);
        }
    }

    /// Attach a submenu at this menu's right edge, level with `item_index`.
    pub fn open_submenu(&mut self, item_index: usize, mut submenu: ContextMenu) {
        submenu.anchor = PointF::new(
            self.anchor.x + self.width,
            self.anchor.y + item_index as f32 * MENU_ITEM_HEIGHT,
        );
        self.submenu = Some(Box::new(submenu));
    }

    /// The interactive item under the point, submenu first (it renders on
    /// top). Separators never hit.
    pub fn hit_item(&self, point: PointF) -> Option<&MenuItem> {
        if let Some(submenu) = &self.submenu
            && let Some(item) = submenu.hit_item(point)
        {
            return Some(item);
        }
        if !self.visible || !self.rect().contains(point) {
            return None;
        }
        let index = ((point.y - self.anchor.y) / MENU_ITEM_HEIGHT) as usize;
        let item = self.items.get(index)?;
        if item.is_separator() { None } else { Some(item) }
    }

    /// Whether the point lands on this menu or its submenu at all
    /// (separators included); clicks elsewhere close the menu.
    pub fn contains(&self, point: PointF) -> bool {
        self.rect().contains(point)
            || self
                .submenu
                .as_ref()
                .is_some_and(|submenu| submenu.contains(point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu_at(x: f32, y: f32) -> ContextMenu {
        ContextMenu::new(
            PointF::new(x, y),
            vec![
                MenuItem::new("Edit", Action::CloseMenu),
                MenuItem::separator(),
                MenuItem::new("Delete", Action::CloseMenu),
            ],
        )
    }

    #[test]
    fn hit_resolves_by_row() {
        let menu = menu_at(100.0, 100.0);
        let hit = menu.hit_item(PointF::new(110.0, 105.0)).unwrap();
        assert_eq!(hit.label, "Edit");
        let hit = menu.hit_item(PointF::new(110.0, 100.0 + 2.0 * MENU_ITEM_HEIGHT + 5.0));
        assert_eq!(hit.unwrap().label, "Delete");
    }

    #[test]
    fn separator_rows_do_not_hit_but_do_occupy_space() {
        let menu = menu_at(100.0, 100.0);
        let on_separator = PointF::new(110.0, 100.0 + MENU_ITEM_HEIGHT + 5.0);
        assert!(menu.hit_item(on_separator).is_none());
        assert!(menu.contains(on_separator));
    }

    #[test]
    fn outside_misses() {
        let menu = menu_at(100.0, 100.0);
        assert!(menu.hit_item(PointF::new(50.0, 105.0)).is_none());
        assert!(!menu.contains(PointF::new(50.0, 105.0)));
    }

    #[test]
    fn submenu_sits_to_the_right_and_hits_first() {
        let mut menu = menu_at(100.0, 100.0);
        menu.open_submenu(
            0,
            ContextMenu::new(
                PointF::default(),
                vec![MenuItem::new("Rounded", Action::CloseMenu)],
            ),
        );
        let submenu = menu.submenu.as_ref().unwrap();
        assert_eq!(submenu.anchor, PointF::new(100.0 + MENU_WIDTH, 100.0));
        let hit = menu
            .hit_item(PointF::new(100.0 + MENU_WIDTH + 10.0, 105.0))
            .unwrap();
        assert_eq!(hit.label, "Rounded");
        // Dropping the parent drops the submenu: nothing dangles.
        drop(menu);
    }

    #[test]
    fn clamps_to_window_edges() {
        let mut menu = menu_at(790.0, 590.0);
        menu.clamp_into(800.0, 600.0);
        assert!(menu.anchor.x + menu.width <= 800.0);
        assert!(menu.anchor.y + menu.height() <= 600.0);
    }
}
