//! Presentation settings shared with the front end

pub mod fonts;

pub use fonts::{FontConfig, INTER, LUSITANA};
