//! Slide layout composition.
//!
//! Splits a slide into a text region and, when an image is present, an image
//! region to its right, then places up to [`MAX_BULLETS`] bullets with a
//! single truncation marker standing in for the rest.

use crate::autofit::{autofit, DEFAULT_MIN_IMAGE_SIZE};
use crate::types::{
    Alignment, Bullet, BulletLevel, ImageRegion, PlacedBullet, PlacedKind, Rect, ResolvedImage,
    Rgb, SlideSize, SlideSpec, TableSlideSpec, TextStyle,
};

/// Title used when a row has none.
pub const UNTITLED_SLIDE: &str = "Untitled Slide";

/// Text of the line replacing bullets beyond the limit.
pub const TRUNCATION_MARKER: &str = "... (content truncated)";

/// Content bullets rendered before truncating.
pub const MAX_BULLETS: usize = 10;

/// Distance from the slide edges, in inches.
pub const MARGIN: f64 = 0.5;

/// Space between the text and image regions.
pub const GAP: f64 = 0.3;

/// Top of the body regions, below the title.
pub const BODY_TOP: f64 = 1.5;

/// Share of the slide width reserved for an image.
pub const IMAGE_WIDTH_RATIO: f64 = 0.38;

/// Lower bound on the image region width.
pub const MIN_IMAGE_REGION_WIDTH: f64 = 2.5;

/// Title used for the generic table slide.
pub const TABLE_VIEW_TITLE: &str = "Table View";

/// Slide title: 34 pt bold, dark blue.
pub const TITLE_STYLE: TextStyle = TextStyle {
    font_size_pt: 34.0,
    bold: true,
    color: Rgb::new(10, 60, 120),
};

/// Top-level bullet: 20 pt, near black.
pub const MAIN_BULLET_STYLE: TextStyle = TextStyle {
    font_size_pt: 20.0,
    bold: false,
    color: Rgb::new(35, 35, 35),
};

/// Sub-bullet: 18 pt, near black.
pub const SUB_BULLET_STYLE: TextStyle = TextStyle {
    font_size_pt: 18.0,
    bold: false,
    color: Rgb::new(35, 35, 35),
};

/// Truncation marker: 18 pt, grey.
pub const TRUNCATION_STYLE: TextStyle = TextStyle {
    font_size_pt: 18.0,
    bold: false,
    color: Rgb::new(150, 150, 150),
};

/// An image to place on a slide, already resolved by an image source.
#[derive(Debug, Clone, Copy)]
pub struct ImageRequest<'a> {
    pub reference: &'a str,
    pub image: &'a ResolvedImage,
}

/// Composes slide specifications for a fixed slide size.
#[derive(Debug, Clone)]
pub struct SlideComposer {
    slide: SlideSize,
    min_image_size: f64,
}

impl Default for SlideComposer {
    fn default() -> Self {
        Self {
            slide: SlideSize::default(),
            min_image_size: DEFAULT_MIN_IMAGE_SIZE,
        }
    }
}

impl SlideComposer {
    /// Create a composer for the default 10 x 7.5 inch slide.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different slide size.
    pub fn with_slide_size(mut self, slide: SlideSize) -> Self {
        self.slide = slide;
        self
    }

    /// Use a different minimum rendered image size.
    pub fn with_min_image_size(mut self, min_size: f64) -> Self {
        self.min_image_size = min_size;
        self
    }

    pub fn slide_size(&self) -> SlideSize {
        self.slide
    }

    /// Lay out one slide.
    pub fn compose(
        &self,
        index: usize,
        title: Option<&str>,
        bullets: &[Bullet],
        image: Option<ImageRequest<'_>>,
    ) -> SlideSpec {
        let title = display_title(title);

        let image_region = image.and_then(|request| {
            let bounds = self.image_bounds();
            match autofit(
                request.image.pixel_size,
                request.image.dpi,
                bounds,
                self.min_image_size,
            ) {
                Some(placement) => Some(ImageRegion {
                    reference: request.reference.to_string(),
                    bounds,
                    placement,
                    pixel_size: request.image.pixel_size,
                    data: request.image.data.clone(),
                }),
                None => {
                    log::warn!(
                        "[{}] Image {} has no usable size, leaving it out.",
                        title,
                        request.reference
                    );
                    None
                }
            }
        });

        let text_region = if image_region.is_some() {
            self.text_bounds_beside_image()
        } else {
            self.full_text_bounds()
        };

        SlideSpec {
            index,
            title,
            title_style: TITLE_STYLE,
            text_region,
            bullets: place_bullets(bullets),
            image: image_region,
            enrichment: None,
        }
    }

    /// Lay out the single table slide used for inputs without slide columns.
    pub fn compose_table(&self, headers: Vec<String>, rows: Vec<Vec<String>>) -> TableSlideSpec {
        TableSlideSpec {
            title: TABLE_VIEW_TITLE.to_string(),
            region: Rect::new(
                MARGIN,
                BODY_TOP,
                self.slide.width - 2.0 * MARGIN,
                5.0_f64.min(self.body_height()),
            ),
            headers,
            rows,
        }
    }

    fn body_height(&self) -> f64 {
        self.slide.height - BODY_TOP - MARGIN
    }

    fn image_region_width(&self) -> f64 {
        (self.slide.width * IMAGE_WIDTH_RATIO).max(MIN_IMAGE_REGION_WIDTH)
    }

    fn text_bounds_beside_image(&self) -> Rect {
        let width = self.slide.width - self.image_region_width() - GAP - 2.0 * MARGIN;
        Rect::new(MARGIN, BODY_TOP, width, self.body_height())
    }

    fn image_bounds(&self) -> Rect {
        let text = self.text_bounds_beside_image();
        Rect::new(
            text.right() + GAP,
            BODY_TOP,
            self.image_region_width(),
            self.body_height(),
        )
    }

    fn full_text_bounds(&self) -> Rect {
        Rect::new(
            MARGIN,
            BODY_TOP,
            self.slide.width - 2.0 * MARGIN,
            self.body_height(),
        )
    }
}

/// Title shown on the slide, substituting [`UNTITLED_SLIDE`] for missing,
/// blank or "nan" values. Other titles are kept exactly as written.
pub fn display_title(title: Option<&str>) -> String {
    match title {
        Some(t) if !is_blank_title(t.trim()) => t.to_string(),
        _ => UNTITLED_SLIDE.to_string(),
    }
}

fn is_blank_title(trimmed: &str) -> bool {
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan")
}

/// Style and indent the first [`MAX_BULLETS`] bullets, appending one
/// truncation marker if any are left over.
pub fn place_bullets(bullets: &[Bullet]) -> Vec<PlacedBullet> {
    let mut placed: Vec<PlacedBullet> = bullets
        .iter()
        .take(MAX_BULLETS)
        .map(|bullet| {
            let (indent_level, style) = match bullet.level {
                BulletLevel::Main => (0, MAIN_BULLET_STYLE),
                BulletLevel::Sub => (1, SUB_BULLET_STYLE),
            };
            PlacedBullet {
                kind: PlacedKind::Content(bullet.level),
                text: bullet.text.clone(),
                indent_level,
                style,
                alignment: Alignment::Left,
            }
        })
        .collect();

    if bullets.len() > MAX_BULLETS {
        placed.push(PlacedBullet {
            kind: PlacedKind::TruncationMarker,
            text: TRUNCATION_MARKER.to_string(),
            indent_level: 0,
            style: TRUNCATION_STYLE,
            alignment: Alignment::Left,
        });
    }

    placed
}
