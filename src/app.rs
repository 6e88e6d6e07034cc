//! Application module: exposes the UI-side model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the list cursor, the
//! active prompt with its input buffer, and the current notice.

mod model;

pub use model::*;
