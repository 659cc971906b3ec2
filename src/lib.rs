//! A multi-window chat-bubble UI engine.
//!
//! The host application owns window creation, its event pump, and the actual
//! pixel drawing. This crate owns everything in between: per-window UI state
//! (tabs, draggable bubbles, context menus, a text input box), routing of raw
//! pointer/key events into that state, collision-aware bubble placement, and
//! time-based animation of layout moves.
//!
//! The entry surface is [`window::WindowRegistry`]: the host opens a window,
//! feeds the registry's per-window event entry points from its own pump, and
//! draws whatever [`window::WindowRegistry::frame`] describes each tick.

pub mod actions;
pub mod animation;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod input;
pub mod keywords;
pub mod layout;
pub mod menu;
pub mod metrics;
pub mod session;
pub mod theme;
pub mod tracing_sub;
pub mod ui;
pub mod window;

pub use error::UiError;
pub use window::{WindowId, WindowRegistry};
