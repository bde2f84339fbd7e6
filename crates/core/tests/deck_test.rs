//! Integration tests for row-to-slide composition.

use std::sync::atomic::{AtomicUsize, Ordering};

use deck_core::enrich::{CONTENT_NOT_AVAILABLE, EXPAND_INSTRUCTION};
use deck_core::layout::TRUNCATION_MARKER;
use deck_core::{
    BulletLevel, DeckBuilder, EnrichmentDecision, EnrichmentService, Error, ExpandParams,
    ImageSource, NoEnrichment, NoImages, PixelSize, PlacedKind, ResolvedImage, Result, Row,
    SlideComposer, SlideSize, SummarizeParams,
};

/// Counts calls and answers with fixed text.
#[derive(Default)]
struct CountingService {
    summarize_calls: AtomicUsize,
    expand_calls: AtomicUsize,
}

impl EnrichmentService for CountingService {
    fn summarize(&self, _text: &str, _params: &SummarizeParams) -> Result<String> {
        self.summarize_calls.fetch_add(1, Ordering::SeqCst);
        Ok("Summary line one.\n- detail".to_string())
    }

    fn expand(&self, prompt: &str, _params: &ExpandParams) -> Result<String> {
        self.expand_calls.fetch_add(1, Ordering::SeqCst);
        let body = prompt.trim_start_matches(EXPAND_INSTRUCTION);
        Ok(format!("{body}\nThis point deserves a longer explanation."))
    }
}

/// Resolves "*.png" references to a fixed 1920x1080 image.
struct StubImages;

impl ImageSource for StubImages {
    fn resolve(&self, reference: &str) -> Result<ResolvedImage> {
        if reference.ends_with(".png") {
            Ok(ResolvedImage {
                pixel_size: PixelSize::new(1920, 1080),
                dpi: None,
                data: vec![0x89, b'P', b'N', b'G'],
            })
        } else {
            Err(Error::ImageFetch(format!("unreachable: {reference}")))
        }
    }
}

#[test]
fn test_short_content_is_expanded_into_bullets() {
    let service = CountingService::default();
    let builder = DeckBuilder::new(&service, &NoImages);

    let slide = builder.build_slide(0, &Row::new(Some("Intro"), Some("Short."), None));

    assert_eq!(service.expand_calls.load(Ordering::SeqCst), 1);
    assert_eq!(service.summarize_calls.load(Ordering::SeqCst), 0);
    assert_eq!(slide.enrichment, Some(EnrichmentDecision::Expanded { length: 6 }));
    let texts: Vec<&str> = slide.bullets.iter().map(|b| b.text.as_str()).collect();
    assert_eq!(texts, vec!["Short.", "This point deserves a longer explanation."]);
}

#[test]
fn test_long_content_is_summarized() {
    let service = CountingService::default();
    let builder = DeckBuilder::new(&service, &NoImages);
    let long = "word ".repeat(40);

    let slide = builder.build_slide(0, &Row::new(Some("Long"), Some(long.as_str()), None));

    assert_eq!(service.summarize_calls.load(Ordering::SeqCst), 1);
    assert_eq!(slide.bullets.len(), 2);
    assert_eq!(slide.bullets[1].kind, PlacedKind::Content(BulletLevel::Sub));
    assert_eq!(slide.bullets[1].text, "detail");
}

#[test]
fn test_nan_content_skips_service() {
    let service = CountingService::default();
    let builder = DeckBuilder::new(&service, &NoImages);

    let slide = builder.build_slide(0, &Row::new(Some("nan"), Some("NaN"), None));

    assert_eq!(slide.title, "Untitled Slide");
    assert_eq!(slide.bullets.len(), 1);
    assert_eq!(slide.bullets[0].text, CONTENT_NOT_AVAILABLE);
    assert_eq!(service.expand_calls.load(Ordering::SeqCst), 0);
    assert_eq!(service.summarize_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_twelve_bullets_truncated_end_to_end() {
    // Long enough to be summarized; with no service the text is kept whole.
    let content: String = (1..=12)
        .map(|i| format!("Item {i:04}"))
        .collect::<Vec<_>>()
        .join("\n");
    assert!(content.chars().count() > 100);

    let builder = DeckBuilder::new(&NoEnrichment, &NoImages);
    let slide = builder.build_slide(0, &Row::new(Some("List"), Some(content.as_str()), None));

    assert_eq!(slide.bullets.len(), 11);
    assert_eq!(slide.content_bullets().count(), 10);
    assert_eq!(slide.bullets[10].text, TRUNCATION_MARKER);
    assert!(slide.bullets.iter().all(|b| b.text != "Item 0011" && b.text != "Item 0012"));
}

#[test]
fn test_image_layout_and_fallback() {
    let builder = DeckBuilder::new(&NoEnrichment, &StubImages);

    let with_image = builder.build_slide(0, &Row::new(Some("A"), Some("x"), Some("hero.png")));
    let region = with_image.image.as_ref().expect("image region");
    assert!((region.bounds.width - 3.8).abs() < 1e-9);
    assert!((region.placement.width - 3.8).abs() < 1e-9);
    assert!(region.placement.height < region.bounds.height);
    assert!((with_image.text_region.width - 4.9).abs() < 1e-9);

    let unresolvable = builder.build_slide(1, &Row::new(Some("B"), Some("x"), Some("http://down/x.jpg")));
    assert!(unresolvable.image.is_none());
    assert_eq!(unresolvable.text_region.width, 9.0);

    let blank = builder.build_slide(2, &Row::new(Some("C"), Some("x"), Some("  ")));
    assert!(blank.image.is_none());
    assert_eq!(blank.text_region.width, 9.0);
}

#[test]
fn test_widescreen_slide() {
    let builder = DeckBuilder::new(&NoEnrichment, &StubImages)
        .with_composer(SlideComposer::new().with_slide_size(SlideSize::WIDESCREEN));

    let slide = builder.build_slide(0, &Row::new(Some("W"), Some("x"), None));
    assert!((slide.text_region.width - (13.333 - 1.0)).abs() < 1e-9);
}

#[test]
fn test_rows_built_concurrently() {
    let service = CountingService::default();
    let builder = DeckBuilder::new(&service, &StubImages);
    let rows: Vec<Row> = (0..8)
        .map(|i| Row::new(Some(format!("Row {i}").as_str()), Some("Short."), Some("a.png")))
        .collect();

    let slides: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let builder = &builder;
                scope.spawn(move || builder.build_slide(i, row))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(slides.len(), 8);
    assert_eq!(service.expand_calls.load(Ordering::SeqCst), 8);
    for (i, slide) in slides.iter().enumerate() {
        assert_eq!(slide.index, i);
        assert_eq!(slide.title, format!("Row {i}"));
        assert!(slide.image.is_some());
    }
}

#[test]
fn test_deck_serializes_without_image_bytes() {
    let builder = DeckBuilder::new(&NoEnrichment, &StubImages);
    let deck = builder.build_deck("in.csv", &[Row::new(Some("A"), Some("x"), Some("a.png"))]);
    let json = serde_json::to_value(&deck).unwrap();

    let image = &json["slides"][0]["image"];
    assert_eq!(image["reference"], "a.png");
    assert!(image.get("data").is_none());
    assert_eq!(json["slides"][0]["enrichment"]["branch"], "expand_rejected");
}
