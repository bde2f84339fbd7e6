//! Plain-text outline output.
//!
//! Renders a composed deck as readable text: one block per slide, separated
//! by a blank line.

use crate::types::{Deck, PlacedKind, SlideSpec, TableSlideSpec};

/// Formatter for plain-text deck outlines.
#[derive(Debug, Clone)]
pub struct OutlineFormatter {
    /// Spaces per bullet indent level.
    indent_width: usize,

    /// Whether to print the image placement line.
    show_images: bool,
}

impl Default for OutlineFormatter {
    fn default() -> Self {
        Self {
            indent_width: 2,
            show_images: true,
        }
    }
}

impl OutlineFormatter {
    /// Create a new formatter with two-space indents.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of spaces per indent level.
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    /// Set whether image placements are printed.
    pub fn with_images(mut self, show: bool) -> Self {
        self.show_images = show;
        self
    }

    /// Format a whole deck.
    ///
    /// # Example output
    /// ```text
    /// Slide 1: Rust
    /// - A systems language
    ///   - Memory safe
    /// [image: logo.png 3.80x2.14 in at (5.70, 3.18)]
    ///
    /// Slide 2: Untitled Slide
    /// - Content not available.
    /// ```
    pub fn format(&self, deck: &Deck) -> String {
        let mut blocks: Vec<String> = deck
            .slides
            .iter()
            .enumerate()
            .map(|(i, slide)| self.format_slide(i + 1, slide))
            .collect();

        if let Some(table) = &deck.table {
            blocks.push(format_table(blocks.len() + 1, table));
        }

        blocks.join("\n\n")
    }

    /// Format and add a trailing newline.
    pub fn format_with_newline(&self, deck: &Deck) -> String {
        let formatted = self.format(deck);
        if formatted.is_empty() {
            formatted
        } else {
            format!("{}\n", formatted)
        }
    }

    fn format_slide(&self, number: usize, slide: &SlideSpec) -> String {
        let mut lines = vec![format!("Slide {}: {}", number, slide.title)];

        for bullet in &slide.bullets {
            match bullet.kind {
                PlacedKind::Content(_) => {
                    let indent = " ".repeat(self.indent_width * usize::from(bullet.indent_level));
                    lines.push(format!("{}- {}", indent, bullet.text));
                }
                PlacedKind::TruncationMarker => lines.push(bullet.text.clone()),
            }
        }

        if self.show_images {
            if let Some(image) = &slide.image {
                let p = image.placement;
                lines.push(format!(
                    "[image: {} {:.2}x{:.2} in at ({:.2}, {:.2})]",
                    image.reference, p.width, p.height, p.left, p.top
                ));
            }
        }

        lines.join("\n")
    }
}

fn format_table(number: usize, table: &TableSlideSpec) -> String {
    let mut lines = vec![format!("Slide {}: {}", number, table.title)];
    lines.push(table.headers.join(" | "));
    for row in &table.rows {
        lines.push(row.join(" | "));
    }
    lines.join("\n")
}
