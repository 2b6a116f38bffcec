//! Output generation for one aggregation cycle.
//!
//! # Submodules
//!
//! - [`view`]: pure mapping from `LoadState` to a `View`, plus plain-text display
//! - [`markdown`]: Markdown document for a `View`
//! - [`json`]: JSON snapshot of the request and raw `LoadState`

pub mod json;
pub mod markdown;
pub mod view;
