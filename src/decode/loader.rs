//! Fetching and decoding image sources.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use image::DynamicImage;
use tokio::sync::Mutex;
use tracing::debug;

use super::cache::{DEFAULT_CACHE_ENTRIES, ImageCache};
use crate::error::LabelError;

/// Turns a source string into a decoded image.
#[async_trait]
pub trait SourceLoader: Send + Sync {
    async fn load(&self, source: &str) -> Result<DynamicImage, LabelError>;
}

/// Where a source string points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind<'a> {
    /// `http://` or `https://` URL
    Http(&'a str),
    /// `data:` URI; `base64` tells how the payload is encoded
    Data { payload: &'a str, base64: bool },
    /// Anything else is treated as a local path
    Path(&'a str),
}

impl<'a> SourceKind<'a> {
    pub fn classify(source: &'a str) -> Result<Self, LabelError> {
        if source.starts_with("http://") || source.starts_with("https://") {
            return Ok(Self::Http(source));
        }
        if let Some(rest) = source.strip_prefix("data:") {
            let (header, payload) = rest
                .split_once(',')
                .ok_or_else(|| LabelError::Decode("data URI without ',' separator".to_string()))?;
            return Ok(Self::Data {
                payload,
                base64: header.split(';').any(|p| p == "base64"),
            });
        }
        Ok(Self::Path(source))
    }
}

/// Loader for URLs, `data:` URIs and files.
///
/// Decoded images are kept in a bounded [`ImageCache`] keyed by source
/// string; clones share the cache.
#[derive(Clone)]
pub struct DefaultLoader {
    client: reqwest::Client,
    cache: Arc<Mutex<ImageCache>>,
}

impl DefaultLoader {
    pub fn new() -> Result<Self, LabelError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("labelstrip/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LabelError::Decode(format!("HTTP client error: {}", e)))?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            cache: Arc::new(Mutex::new(ImageCache::new(DEFAULT_CACHE_ENTRIES))),
        }
    }

    /// Keep at most `max_entries` decoded images. Zero turns caching off.
    pub fn with_cache_capacity(mut self, max_entries: usize) -> Self {
        self.cache = Arc::new(Mutex::new(ImageCache::new(max_entries)));
        self
    }

    /// Number of decoded images held in the cache.
    pub async fn cached(&self) -> usize {
        self.cache.lock().await.len()
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, LabelError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LabelError::Decode(format!("Failed to download {}: {}", url, e)))?;
        if !response.status().is_success() {
            return Err(LabelError::Decode(format!(
                "Failed to download {}: HTTP {}",
                url,
                response.status()
            )));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| LabelError::Decode(format!("Failed to read image data: {}", e)))?;
        Ok(bytes.to_vec())
    }

    async fn read(&self, source: &str) -> Result<Vec<u8>, LabelError> {
        match SourceKind::classify(source)? {
            SourceKind::Http(url) => self.fetch(url).await,
            SourceKind::Data { payload, base64 } => decode_data_payload(payload, base64),
            SourceKind::Path(path) => tokio::fs::read(Path::new(path))
                .await
                .map_err(|e| LabelError::Decode(format!("Failed to read {}: {}", path, e))),
        }
    }
}

#[async_trait]
impl SourceLoader for DefaultLoader {
    async fn load(&self, source: &str) -> Result<DynamicImage, LabelError> {
        if let Some(image) = self.cache.lock().await.get(source) {
            debug!(source = short(source), "Image cache hit");
            return Ok(image);
        }

        let bytes = self.read(source).await?;
        let image = image::load_from_memory(&bytes)
            .map_err(|e| LabelError::Decode(format!("Failed to decode image: {}", e)))?;

        self.cache.lock().await.insert(source, image.clone());
        Ok(image)
    }
}

fn decode_data_payload(payload: &str, base64: bool) -> Result<Vec<u8>, LabelError> {
    if !base64 {
        return Ok(payload.as_bytes().to_vec());
    }
    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| LabelError::Decode(format!("Invalid base64 payload: {}", e)))
}

/// Data URIs can be huge; keep log lines readable.
fn short(source: &str) -> &str {
    match source.char_indices().nth(64) {
        Some((i, _)) => &source[..i],
        None => source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255])));
        let mut out = Cursor::new(Vec::new());
        image.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    fn data_uri(bytes: &[u8]) -> String {
        format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(bytes)
        )
    }

    #[test]
    fn test_classify() {
        assert_eq!(
            SourceKind::classify("https://example.com/a.png").unwrap(),
            SourceKind::Http("https://example.com/a.png")
        );
        assert_eq!(
            SourceKind::classify("data:image/png;base64,AAAA").unwrap(),
            SourceKind::Data {
                payload: "AAAA",
                base64: true
            }
        );
        assert_eq!(
            SourceKind::classify("data:,hello").unwrap(),
            SourceKind::Data {
                payload: "hello",
                base64: false
            }
        );
        assert_eq!(
            SourceKind::classify("logo.png").unwrap(),
            SourceKind::Path("logo.png")
        );
        assert!(SourceKind::classify("data:image/png;base64").is_err());
    }

    #[tokio::test]
    async fn test_load_data_uri() {
        let loader = DefaultLoader::new().unwrap();
        let image = loader.load(&data_uri(&png_bytes(3, 2))).await.unwrap();
        assert_eq!((image.width(), image.height()), (3, 2));
        assert_eq!(loader.cached().await, 1);

        // Second load is served from the cache
        loader.load(&data_uri(&png_bytes(3, 2))).await.unwrap();
        assert_eq!(loader.cached().await, 1);
    }

    #[tokio::test]
    async fn test_cache_is_bounded() {
        let loader = DefaultLoader::new().unwrap().with_cache_capacity(4);
        for width in 1..=50 {
            loader.load(&data_uri(&png_bytes(width, 1))).await.unwrap();
        }
        assert_eq!(loader.cached().await, 4);

        let default = DefaultLoader::new().unwrap();
        for width in 1..=(DEFAULT_CACHE_ENTRIES as u32 + 5) {
            default.load(&data_uri(&png_bytes(width, 1))).await.unwrap();
        }
        assert_eq!(default.cached().await, DEFAULT_CACHE_ENTRIES);
    }

    #[tokio::test]
    async fn test_load_file() {
        let path = std::env::temp_dir().join(format!("labelstrip-loader-{}.png", std::process::id()));
        tokio::fs::write(&path, png_bytes(5, 4)).await.unwrap();

        let loader = DefaultLoader::new().unwrap();
        let image = loader.load(path.to_str().unwrap()).await.unwrap();
        assert_eq!((image.width(), image.height()), (5, 4));

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_failures_are_decode_errors() {
        let loader = DefaultLoader::new().unwrap();

        let missing = loader.load("/definitely/not/here.png").await;
        assert!(matches!(missing, Err(LabelError::Decode(_))));

        let garbage = loader.load(&data_uri(b"not an image")).await;
        assert!(matches!(garbage, Err(LabelError::Decode(_))));

        let bad_base64 = loader.load("data:image/png;base64,@@@").await;
        assert!(matches!(bad_base64, Err(LabelError::Decode(_))));

        assert_eq!(loader.cached().await, 0);
    }
}
