//! Interactive panel for browsing route trees.
//!
//! The panel renders a self-contained HTML document that draws the selected
//! route's tree with a hierarchical layout and offers a selector for every
//! route. The page answers a selection with a `change-route` message; the
//! host hands it to [`Panel::handle`] and replaces the whole document with
//! the result.

mod html;
mod panel;

// Re-export public API
pub use html::render_page;
pub use panel::{Panel, PanelMessage};
