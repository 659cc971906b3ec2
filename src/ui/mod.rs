//! Per-window UI state: tabs, bubbles, input buffer, menus, and the modal
//! key-routing state machine, plus the per-frame scene description.

pub mod scene;
pub mod state;
pub mod tabs;

pub use scene::FrameScene;
pub use state::WindowUi;
