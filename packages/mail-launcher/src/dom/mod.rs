//! Document model the heuristics run against.
//!
//! The host page's DOM is consumed, never controlled: everything here is
//! duck-typed capability checks ("is this editable?") rather than typed
//! element classes.

mod document;
mod parse;

pub use document::{Document, ElementData, NodeData, NodeId, Rect, Viewport};
