//! Domain types for rows, bullets, slide geometry and the composed deck.

use serde::{Deserialize, Serialize};

use crate::enrich::EnrichmentDecision;

/// One source record, destined to become one slide.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    /// Slide title, if the table had one.
    pub title: Option<String>,

    /// Free-text content.
    pub content: Option<String>,

    /// Image URL or local path.
    pub image: Option<String>,
}

impl Row {
    /// Create a row from optional cells.
    pub fn new(title: Option<&str>, content: Option<&str>, image: Option<&str>) -> Self {
        Self {
            title: title.map(str::to_string),
            content: content.map(str::to_string),
            image: image.map(str::to_string),
        }
    }

    /// The image reference, if present and not blank.
    pub fn image_reference(&self) -> Option<&str> {
        self.image
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Bullet nesting level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulletLevel {
    Main,
    Sub,
}

/// A single parsed bullet line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bullet {
    pub level: BulletLevel,
    pub text: String,
}

impl Bullet {
    pub fn main(text: impl Into<String>) -> Self {
        Self {
            level: BulletLevel::Main,
            text: text.into(),
        }
    }

    pub fn sub(text: impl Into<String>) -> Self {
        Self {
            level: BulletLevel::Sub,
            text: text.into(),
        }
    }
}

/// An axis-aligned rectangle in slide units (inches).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Slide dimensions in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlideSize {
    pub width: f64,
    pub height: f64,
}

impl SlideSize {
    /// 4:3, the default of most presentation templates.
    pub const STANDARD: SlideSize = SlideSize {
        width: 10.0,
        height: 7.5,
    };

    /// 16:9.
    pub const WIDESCREEN: SlideSize = SlideSize {
        width: 13.333,
        height: 7.5,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for SlideSize {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Decoded pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

impl PixelSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Final placement of an image inside its region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageBox {
    pub width: f64,
    pub height: f64,
    pub left: f64,
    pub top: f64,
}

/// An RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Font styling for a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_size_pt: f64,
    pub bold: bool,
    pub color: Rgb,
}

/// Paragraph alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
}

/// What a placed paragraph represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "level")]
pub enum PlacedKind {
    /// A bullet taken from the content.
    Content(BulletLevel),
    /// The single line standing in for bullets that did not fit.
    TruncationMarker,
}

/// A bullet paragraph ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedBullet {
    pub kind: PlacedKind,
    pub text: String,
    /// Paragraph indent: 0 for main bullets, 1 for sub-bullets.
    pub indent_level: u8,
    pub style: TextStyle,
    pub alignment: Alignment,
}

impl PlacedBullet {
    pub fn is_truncation_marker(&self) -> bool {
        self.kind == PlacedKind::TruncationMarker
    }
}

/// A decoded image handed back by an image source.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedImage {
    pub pixel_size: PixelSize,

    /// Dots per inch recorded in the file, if any.
    pub dpi: Option<f64>,

    /// Raw encoded bytes, for the renderer to embed.
    pub data: Vec<u8>,
}

/// The image part of a slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRegion {
    /// The reference the image was resolved from.
    pub reference: String,

    /// The area reserved for the image.
    pub bounds: Rect,

    /// Where the image actually lands inside `bounds`.
    pub placement: ImageBox,

    pub pixel_size: PixelSize,

    #[serde(skip)]
    pub data: Vec<u8>,
}

/// Everything a renderer needs to draw one slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideSpec {
    /// 0-based row index the slide was built from.
    pub index: usize,

    pub title: String,
    pub title_style: TextStyle,
    pub text_region: Rect,

    /// At most the bullet limit of content bullets, plus an optional marker.
    pub bullets: Vec<PlacedBullet>,

    pub image: Option<ImageRegion>,

    /// Which enrichment branch produced the bullet text.
    pub enrichment: Option<EnrichmentDecision>,
}

impl SlideSpec {
    /// Bullets that came from the content, excluding the truncation marker.
    pub fn content_bullets(&self) -> impl Iterator<Item = &PlacedBullet> {
        self.bullets.iter().filter(|b| !b.is_truncation_marker())
    }

    /// Whether the bullet list was clipped.
    pub fn is_truncated(&self) -> bool {
        self.bullets.iter().any(PlacedBullet::is_truncation_marker)
    }
}

/// A single slide showing a table that had no slide columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSlideSpec {
    pub title: String,
    pub region: Rect,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// A composed deck, slides in row order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    /// Name of the input the deck was built from.
    pub source: String,

    pub slide_size: SlideSize,

    pub slides: Vec<SlideSpec>,

    /// Set instead of `slides` when the input was a generic table.
    pub table: Option<TableSlideSpec>,
}

impl Deck {
    /// Create an empty deck.
    pub fn new(source: impl Into<String>, slide_size: SlideSize) -> Self {
        Self {
            source: source.into(),
            slide_size,
            slides: Vec::new(),
            table: None,
        }
    }

    /// Append a slide.
    pub fn add_slide(&mut self, slide: SlideSpec) {
        self.slides.push(slide);
    }

    /// Number of slides the renderer will produce.
    pub fn slide_count(&self) -> usize {
        self.slides.len() + usize::from(self.table.is_some())
    }

    /// All slide titles in order.
    pub fn titles(&self) -> Vec<&str> {
        self.slides.iter().map(|s| s.title.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_reference_blank() {
        let row = Row::new(Some("T"), Some("C"), Some("   "));
        assert_eq!(row.image_reference(), None);

        let row = Row::new(Some("T"), Some("C"), Some(" pic.png "));
        assert_eq!(row.image_reference(), Some("pic.png"));

        let row = Row::new(Some("T"), None, None);
        assert_eq!(row.image_reference(), None);
    }

    #[test]
    fn test_rect_edges() {
        let r = Rect::new(0.5, 1.5, 4.0, 2.0);
        assert_eq!(r.right(), 4.5);
        assert_eq!(r.bottom(), 3.5);
    }

    #[test]
    fn test_deck_slide_count() {
        let mut deck = Deck::new("input.csv", SlideSize::default());
        assert_eq!(deck.slide_count(), 0);
        deck.table = Some(TableSlideSpec {
            title: "Table View".into(),
            region: Rect::new(0.5, 1.5, 9.0, 5.0),
            headers: vec![],
            rows: vec![],
        });
        assert_eq!(deck.slide_count(), 1);
    }

    #[test]
    fn test_placed_kind_serialization() {
        let json = serde_json::to_string(&PlacedKind::Content(BulletLevel::Sub)).unwrap();
        assert_eq!(json, r#"{"type":"content","level":"sub"}"#);
        let json = serde_json::to_string(&PlacedKind::TruncationMarker).unwrap();
        assert_eq!(json, r#"{"type":"truncation_marker"}"#);
    }
}
