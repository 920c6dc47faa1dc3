//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the loaded playlist,
//! per-track artwork state, selection, filter and theme.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
