//! Per-frame "advance and describe": resolve animated positions, drop
//! finished animations, and hand the host a plain description of every
//! visible widget. The host draws pixels; nothing here does.

use std::time::Instant;

use crate::constants::{CONTENT_BOTTOM_MARGIN, TAB_HEIGHT};
use crate::geometry::RectF;
use crate::menu::ContextMenu;
use crate::theme::{Rgba, Theme};

use super::state::WindowUi;
use super::tabs::{BubbleId, BubbleStyle, TabId};

#[derive(Debug, Clone, PartialEq)]
pub struct TabVisual {
    pub index: usize,
    pub name: String,
    pub rect: RectF,
    pub color: Rgba,
    pub active: bool,
    /// The tab is mid-rename; hosts render a placeholder label.
    pub renaming: bool,
    pub close_button: Option<RectF>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BubbleVisual {
    pub tab: TabId,
    pub id: BubbleId,
    /// Display rectangle with animation and scroll already applied.
    pub rect: RectF,
    pub text: String,
    pub timestamp: String,
    pub style: BubbleStyle,
    pub bold: bool,
    pub italic: bool,
    pub color: Rgba,
    pub editing: bool,
    pub animating: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputBoxVisual {
    pub rect: RectF,
    pub text: String,
    /// Cursor position in characters.
    pub cursor: usize,
    pub send_button: RectF,
    pub session_button: RectF,
    pub dark_mode_button: RectF,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuItemVisual {
    pub label: String,
    pub separator: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuVisual {
    pub rect: RectF,
    pub items: Vec<MenuItemVisual>,
    pub submenu: Option<Box<MenuVisual>>,
}

impl MenuVisual {
    fn from_menu(menu: &ContextMenu) -> Self {
        Self {
            rect: menu.rect(),
            items: menu
                .items
                .iter()
                .map(|item| MenuItemVisual {
                    label: item.label.clone(),
                    separator: item.is_separator(),
                })
                .collect(),
            submenu: menu
                .submenu
                .as_deref()
                .map(|submenu| Box::new(MenuVisual::from_menu(submenu))),
        }
    }
}

/// Everything the host needs to draw one frame of one window.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameScene {
    pub theme: Theme,
    pub scale: f32,
    pub tab_bar_height: f32,
    pub tabs: Vec<TabVisual>,
    pub new_tab_button: Option<RectF>,
    pub bubbles: Vec<BubbleVisual>,
    pub input: InputBoxVisual,
    pub menu: Option<MenuVisual>,
    pub notice: Option<String>,
}

impl WindowUi {
    /// Advance animations to `now` and describe the window. Finished
    /// animations snap their bubble to the target and are garbage-collected
    /// here; this is the only place animation entries die.
    pub fn frame(&mut self, now: Instant) -> FrameScene {
        let finished: Vec<(TabId, BubbleId)> = self
            .animations
            .iter()
            .filter(|(_, animation)| animation.finished(now))
            .map(|(key, _)| *key)
            .collect();
        for key in finished {
            if let Some(animation) = self.animations.remove(&key) {
                let (tab_id, bubble_id) = key;
                if let Some(bubble) = self.tabs.bubble_mut(tab_id, bubble_id) {
                    bubble.position = animation.target;
                }
            }
        }

        let tabs = self.describe_tabs();
        let bubbles = self.describe_bubbles(now);
        FrameScene {
            theme: self.theme,
            scale: self.scale,
            tab_bar_height: TAB_HEIGHT * self.scale,
            tabs,
            new_tab_button: self.new_tab_button_rect(),
            bubbles,
            input: InputBoxVisual {
                rect: self.input_box_rect(),
                text: self.input.clone(),
                cursor: self.cursor,
                send_button: self.send_button_rect(),
                session_button: self.session_button_rect(),
                dark_mode_button: self.dark_mode_button_rect(),
            },
            menu: self.menu.as_ref().map(MenuVisual::from_menu),
            notice: self.notice.clone(),
        }
    }

    fn describe_tabs(&self) -> Vec<TabVisual> {
        let active = self.tabs.active_index();
        let renaming = self.renaming_tab;
        self.tabs
            .iter()
            .enumerate()
            .map(|(index, tab)| TabVisual {
                index,
                name: tab.name.clone(),
                rect: self.tab_rect(index).unwrap_or_default(),
                color: tab.color,
                active: index == active,
                renaming: renaming == Some(index),
                close_button: if index > 0 {
                    self.tab_rect(index).map(|rect| {
                        RectF::new(
                            rect.x + rect.width - 25.0 * self.scale,
                            5.0 * self.scale,
                            14.0 * self.scale,
                            14.0 * self.scale,
                        )
                    })
                } else {
                    None
                },
            })
            .collect()
    }

    fn describe_bubbles(&self, now: Instant) -> Vec<BubbleVisual> {
        let tab = self.tabs.active_tab();
        let scroll = tab.scroll_offset;
        let top = TAB_HEIGHT * self.scale;
        let bottom = self.height - CONTENT_BOTTOM_MARGIN * self.scale;
        let mut out = Vec::with_capacity(tab.bubbles.len());
        for bubble in &tab.bubbles {
            let mut rect = self.bubble_display_rect(bubble, scroll);
            let mut animating = false;
            if let Some(animation) = self.animations.get(&(tab.id, bubble.id))
                && !animation.finished(now)
            {
                let position = animation.value_at(now);
                rect = RectF::new(position.x, position.y - scroll, rect.width, rect.height);
                animating = true;
            }
            // Cull bubbles scrolled out of the content region.
            if rect.y + rect.height < top || rect.y > bottom {
                continue;
            }
            out.push(BubbleVisual {
                tab: tab.id,
                id: bubble.id,
                rect,
                text: bubble.text.clone(),
                timestamp: bubble.timestamp.clone(),
                style: bubble.style,
                bold: bubble.bold,
                italic: bubble.italic,
                color: bubble.color,
                editing: bubble.editing,
                animating,
            });
        }
        out
    }
}
