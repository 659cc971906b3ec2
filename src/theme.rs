//! Color palette shared by every window, with a dark and a light variant.

use serde::{Deserialize, Serialize};

/// Straight-alpha RGBA color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    pub const fn with_alpha(mut self, a: f32) -> Self {
        self.a = a;
        self
    }
}

/// Resolved palette for one theme mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub dark_mode: bool,
    pub background: Rgba,
    pub primary: Rgba,
    pub accent: Rgba,
    pub text: Rgba,
    pub bubble: Rgba,
}

impl Theme {
    pub const fn dark() -> Self {
        Self {
            dark_mode: true,
            background: Rgba::opaque(0.15, 0.15, 0.15),
            primary: Rgba::opaque(0.2, 0.2, 0.2),
            accent: Rgba::opaque(0.4, 0.6, 1.0),
            text: Rgba::opaque(0.95, 0.95, 0.95),
            bubble: Rgba::opaque(0.25, 0.25, 0.25),
        }
    }

    pub const fn light() -> Self {
        Self {
            dark_mode: false,
            background: Rgba::opaque(0.95, 0.95, 0.95),
            primary: Rgba::opaque(1.0, 1.0, 1.0),
            accent: Rgba::opaque(0.4, 0.6, 1.0),
            text: Rgba::opaque(0.1, 0.1, 0.1),
            bubble: Rgba::opaque(0.85, 0.85, 0.85),
        }
    }

    pub const fn for_mode(dark_mode: bool) -> Self {
        if dark_mode { Self::dark() } else { Self::light() }
    }

    pub const fn toggled(&self) -> Self {
        Self::for_mode(!self.dark_mode)
    }

    /// Default fill for newly created bubbles in this theme.
    pub const fn new_bubble_color(&self) -> Rgba {
        if self.dark_mode {
            Rgba::new(0.2, 0.2, 0.2, 0.9)
        } else {
            Rgba::new(0.95, 0.95, 1.0, 0.9)
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

/// Preset colors offered by the bubble color menu.
pub const PRESET_COLORS: [(&str, Rgba); 10] = [
    ("Red", Rgba::opaque(1.0, 0.0, 0.0)),
    ("Green", Rgba::opaque(0.0, 1.0, 0.0)),
    ("Blue", Rgba::opaque(0.0, 0.0, 1.0)),
    ("Yellow", Rgba::opaque(1.0, 1.0, 0.0)),
    ("Cyan", Rgba::opaque(0.0, 1.0, 1.0)),
    ("Magenta", Rgba::opaque(1.0, 0.0, 1.0)),
    ("Black", Rgba::opaque(0.0, 0.0, 0.0)),
    ("White", Rgba::opaque(1.0, 1.0, 1.0)),
    ("Gray", Rgba::opaque(0.5, 0.5, 0.5)),
    ("Orange", Rgba::opaque(1.0, 0.5, 0.0)),
];
