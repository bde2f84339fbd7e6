//! Byte-to-text decoding with fallbacks.
//!
//! Spreadsheet exports arrive as UTF-8, UTF-16 (with a byte order mark) or a
//! legacy Windows code page. Decoding is tried in that order; the final
//! Windows-1252 step accepts any input.

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8, WINDOWS_1252};

/// The encoding a table was decoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Utf16Le,
    Utf16Be,
    Windows1252,
}

/// Decode `bytes` as text, reporting which encoding succeeded.
pub fn decode_text(bytes: &[u8]) -> (String, TextEncoding) {
    let (text, had_errors) = UTF_8.decode_with_bom_removal(bytes);
    if !had_errors {
        return (text.into_owned(), TextEncoding::Utf8);
    }

    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        let kind = if encoding == UTF_16LE {
            Some(TextEncoding::Utf16Le)
        } else if encoding == UTF_16BE {
            Some(TextEncoding::Utf16Be)
        } else {
            None
        };
        if let Some(kind) = kind {
            let (text, had_errors) = encoding.decode_with_bom_removal(bytes);
            if !had_errors {
                return (text.into_owned(), kind);
            }
        }
    }

    log::debug!("Input is not UTF-8 or UTF-16, decoding as Windows-1252");
    let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
    (text.into_owned(), TextEncoding::Windows1252)
}
