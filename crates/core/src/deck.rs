//! Row-to-slide composition.
//!
//! [`DeckBuilder`] is the one place where a row flows through enrichment,
//! bullet parsing, image resolution and layout. Collaborator failures are
//! logged and absorbed, so every row yields a slide.

use crate::bullets::parse_bullets;
use crate::enrich::{EnrichmentPolicy, EnrichmentService};
use crate::error::{Error, Result};
use crate::layout::{display_title, ImageRequest, SlideComposer};
use crate::types::{Deck, ResolvedImage, Row, SlideSize, SlideSpec};

/// Turns an image reference (URL or path) into decoded image data.
pub trait ImageSource: Send + Sync {
    fn resolve(&self, reference: &str) -> Result<ResolvedImage>;
}

/// An image source that resolves nothing. Slides are built text-only.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImages;

impl ImageSource for NoImages {
    fn resolve(&self, reference: &str) -> Result<ResolvedImage> {
        Err(Error::ImageFetch(format!("image loading disabled for {}", reference)))
    }
}

/// Builds slide specifications from rows.
///
/// Holds only shared, read-only collaborators; rows can be built from
/// several threads at once.
pub struct DeckBuilder<'a> {
    policy: EnrichmentPolicy<'a>,
    images: &'a dyn ImageSource,
    composer: SlideComposer,
}

impl<'a> DeckBuilder<'a> {
    /// Create a builder using `service` for enrichment and `images` for
    /// image references, on a default-sized slide.
    pub fn new(service: &'a dyn EnrichmentService, images: &'a dyn ImageSource) -> Self {
        Self {
            policy: EnrichmentPolicy::new(service),
            images,
            composer: SlideComposer::new(),
        }
    }

    /// Replace the enrichment policy (e.g. to change generation parameters).
    pub fn with_policy(mut self, policy: EnrichmentPolicy<'a>) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the slide composer.
    pub fn with_composer(mut self, composer: SlideComposer) -> Self {
        self.composer = composer;
        self
    }

    pub fn slide_size(&self) -> SlideSize {
        self.composer.slide_size()
    }

    /// Build the slide for the row at `index`.
    pub fn build_slide(&self, index: usize, row: &Row) -> SlideSpec {
        let title = display_title(row.title.as_deref());
        let enrichment = self.policy.decide_detailed(&title, row.content.as_deref());
        let bullets = parse_bullets(&enrichment.text);

        let resolved = row
            .image_reference()
            .and_then(|reference| match self.images.resolve(reference) {
                Ok(image) => Some((reference, image)),
                Err(e) => {
                    log::warn!("Could not add image {}: {}", reference, e);
                    None
                }
            });

        let request = resolved.as_ref().map(|(reference, image)| ImageRequest {
            reference: *reference,
            image,
        });

        let mut slide = self
            .composer
            .compose(index, row.title.as_deref(), &bullets, request);
        slide.enrichment = Some(enrichment.decision);
        slide
    }

    /// Build a deck with one slide per row, in row order.
    pub fn build_deck(&self, source: &str, rows: &[Row]) -> Deck {
        let mut deck = Deck::new(source, self.slide_size());
        for (index, row) in rows.iter().enumerate() {
            deck.add_slide(self.build_slide(index, row));
        }
        log::debug!("Composed {} slides from {}", deck.slides.len(), source);
        deck
    }

    /// Build the single-slide deck used for tables without slide columns.
    pub fn build_table_deck(
        &self,
        source: &str,
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    ) -> Deck {
        let mut deck = Deck::new(source, self.slide_size());
        deck.table = Some(self.composer.compose_table(headers, rows));
        deck
    }
}
