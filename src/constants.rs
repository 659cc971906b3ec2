//! Shared crate-wide constants.
//!
//! Sizes are in window-local pixels before the per-window dynamic scale is
//! applied; durations are wall-clock.

/// Height of the tab bar along the top of a window.
pub const TAB_HEIGHT: f32 = 40.0;

/// Left inset before the first tab.
pub const TAB_PADDING: f32 = 30.0;

/// Width of the "+" new-tab button at the end of the strip.
pub const NEW_TAB_BUTTON_WIDTH: f32 = 20.0;

/// Maximum number of tabs a window will hold.
pub const MAX_TABS: usize = 10;

/// Input box geometry along the bottom edge.
pub const TEXT_BOX_X: f32 = 10.0;
pub const TEXT_BOX_WIDTH: f32 = 600.0;
pub const TEXT_BOX_HEIGHT: f32 = 60.0;

/// Send button beside the input box.
pub const BUTTON_WIDTH: f32 = 170.0;

/// Session menu button beside the send button.
pub const SESSION_BUTTON_WIDTH: f32 = 40.0;

/// Dark-mode toggle in the top-right corner.
pub const DARK_MODE_BUTTON_WIDTH: f32 = 40.0;
pub const DARK_MODE_BUTTON_HEIGHT: f32 = 20.0;
pub const DARK_MODE_BUTTON_PADDING: f32 = 10.0;

/// Pixels scrolled per wheel notch.
pub const SCROLL_SPEED: f32 = 30.0;

/// Reserved strip above the input area that bubbles scroll out of.
pub const CONTENT_BOTTOM_MARGIN: f32 = 80.0;

/// Maximum characters accepted into the input buffer.
pub const MAX_INPUT_LENGTH: usize = 1024;

/// Submitted messages kept for Up/Down history recall.
pub const MAX_HISTORY: usize = 100;

/// Context menu geometry.
pub const MENU_WIDTH: f32 = 120.0;
pub const MENU_ITEM_HEIGHT: f32 = 25.0;

/// Wider variant used for the session menu (names can be long).
pub const SESSION_MENU_WIDTH: f32 = 200.0;

/// Pointer travel (Euclidean, in pixels) that promotes a press into a drag.
pub const DRAG_THRESHOLD: f32 = 3.0;

/// Consecutive pointer-downs within this window bump the click counter;
/// a longer gap resets it to 1.
pub const MULTI_CLICK_WINDOW_MS: u64 = 500;

/// Duration of bubble layout-move animations.
pub const LAYOUT_ANIMATION_MS: u64 = 300;

/// Default duration for generic progress/fade animations.
pub const PROGRESS_ANIMATION_MS: u64 = 500;

/// Reference window size the dynamic UI scale is computed against.
pub const BASE_WINDOW_WIDTH: f32 = 1024.0;
pub const BASE_WINDOW_HEIGHT: f32 = 600.0;
pub const MIN_SCALE: f32 = 0.75;
pub const MAX_SCALE: f32 = 2.0;

/// Placement scoring: candidates closer than this to an existing bubble are
/// penalized by the shortfall, so bubbles spread out.
pub const SPACING_BONUS_RADIUS: f32 = 300.0;

/// Cascade fallback offset applied per already-placed bubble.
pub const CASCADE_STEP: f32 = 20.0;

/// Upper bound on grid candidates scanned per placement call. Large windows
/// with small bubbles would otherwise make the scan unbounded; past the cap
/// the best candidate seen so far wins.
pub const MAX_GRID_CANDIDATES: usize = 4096;

/// Buffer prefill shown when the save-session prompt opens. A submission
/// equal to the placeholder is treated as empty.
pub const SESSION_NAME_PLACEHOLDER: &str = "Session name";

/// Menu item label rendered as a non-interactive separator.
pub const MENU_SEPARATOR: &str = "---";
