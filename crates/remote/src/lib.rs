//! Network and filesystem collaborators for the deck generator.
//!
//! [`ImageResolver`] loads images from URLs or local paths and reports their
//! pixel size and DPI. [`HttpEnricher`] calls hosted text-generation
//! endpoints for summarization and expansion.

pub mod dpi;
pub mod enricher;
pub mod images;

pub use enricher::{EnricherConfig, HttpEnricher};
pub use images::ImageResolver;
