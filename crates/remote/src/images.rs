//! Image resolution from URLs and local paths.

use deck_core::{Error, ImageSource, PixelSize, ResolvedImage, Result};
use reqwest::blocking::Client;
use std::io::Cursor;
use std::path::PathBuf;
use std::time::Duration;

use crate::dpi::sniff_dpi;

/// Default time allowed for fetching one image.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Loads images over HTTP(S) or from disk and decodes their dimensions.
///
/// References starting with `http` are fetched; anything else is a path,
/// resolved against `base_dir` when relative.
pub struct ImageResolver {
    client: Client,
    base_dir: Option<PathBuf>,
}

impl ImageResolver {
    /// Create a resolver with the default fetch timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_FETCH_TIMEOUT)
    }

    /// Create a resolver whose fetches give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::HttpError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_dir: None,
        })
    }

    /// Resolve relative paths against `dir` instead of the working directory.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        log::debug!("Fetching image {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| Error::ImageFetch(format!("{}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::ImageFetch(format!("{}: HTTP {}", url, status)));
        }

        let bytes = response
            .bytes()
            .map_err(|e| Error::ImageFetch(format!("{}: {}", url, e)))?;
        Ok(bytes.to_vec())
    }

    fn read_local(&self, reference: &str) -> Result<Vec<u8>> {
        let path = PathBuf::from(reference);
        let path = match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path,
        };
        log::debug!("Reading image {}", path.display());
        Ok(std::fs::read(&path)?)
    }
}

impl ImageSource for ImageResolver {
    fn resolve(&self, reference: &str) -> Result<ResolvedImage> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(Error::BlankImageReference);
        }

        let data = if reference.starts_with("http") {
            self.fetch(reference)?
        } else {
            self.read_local(reference)?
        };

        decode(data)
    }
}

/// Decode dimensions and DPI from encoded image bytes.
pub fn decode(data: Vec<u8>) -> Result<ResolvedImage> {
    let (width, height) = image::ImageReader::new(Cursor::new(&data))
        .with_guessed_format()
        .map_err(|e| Error::ImageDecode(e.to_string()))?
        .into_dimensions()
        .map_err(|e| Error::ImageDecode(e.to_string()))?;

    Ok(ResolvedImage {
        pixel_size: PixelSize::new(width, height),
        dpi: sniff_dpi(&data),
        data,
    })
}
