//! Core of the deck generator: content enrichment policy, bullet parsing,
//! image autofit and slide layout for turning table rows into slides.

pub mod autofit;
pub mod bullets;
pub mod deck;
pub mod enrich;
pub mod error;
pub mod layout;
pub mod outline;
pub mod scrub;
pub mod types;

pub use autofit::autofit;
pub use bullets::parse_bullets;
pub use deck::{DeckBuilder, ImageSource, NoImages};
pub use enrich::{
    Enrichment, EnrichmentDecision, EnrichmentPolicy, EnrichmentService, ExpandParams,
    NoEnrichment, SummarizeParams,
};
pub use error::{Error, Result};
pub use layout::{ImageRequest, SlideComposer};
pub use outline::OutlineFormatter;
pub use scrub::scrub;
pub use types::{
    Bullet, BulletLevel, Deck, ImageBox, ImageRegion, PixelSize, PlacedBullet, PlacedKind, Rect,
    ResolvedImage, Row, SlideSize, SlideSpec, TableSlideSpec, TextStyle,
};
