//! Window registry: per-window state bundles behind opaque handles.

mod registry;

pub use registry::{WindowId, WindowRegistry};
