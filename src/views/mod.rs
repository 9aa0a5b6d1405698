//! Display-ready shapes for the dashboard pages.

pub mod conversations;
pub mod overview;
pub mod settings;
