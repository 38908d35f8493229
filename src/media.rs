use std::path::{Path, PathBuf};

use base64::{engine::general_purpose, Engine as _};
use tokio::fs;

use crate::{
    error::{BgSwapError, Result},
    models::GenerativePart,
};

/// A local photo selected for upload: the source path plus the media type
/// that will be declared verbatim on the wire.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub path: PathBuf,
    pub mime_type: String,
}

impl ImageFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mime_type = mime_type_for(&path).to_string();
        Self { path, mime_type }
    }

    pub async fn to_part(&self) -> Result<GenerativePart> {
        let bytes = fs::read(&self.path).await.map_err(|e| {
            BgSwapError::ReadError(format!("failed to read {}: {}", self.path.display(), e))
        })?;
        Ok(part_from_bytes(&bytes, &self.mime_type))
    }
}

/// Encode raw image bytes as an inline-data part. The media type is passed
/// through verbatim; no size or format validation happens here.
pub fn part_from_bytes(bytes: &[u8], mime_type: &str) -> GenerativePart {
    GenerativePart::inline(mime_type, general_purpose::STANDARD.encode(bytes))
}

/// Read a file fully into memory and encode it as an inline-data part,
/// deriving the declared media type from the file extension.
pub async fn part_from_file(path: impl AsRef<Path>) -> Result<GenerativePart> {
    ImageFile::new(path.as_ref()).to_part().await
}

/// Retain only the raw base64 payload when the input carries a
/// `data:<mime>;base64,` prefix.
pub fn strip_data_uri_prefix(data: &str) -> &str {
    match data.split_once(',') {
        Some((head, payload)) if head.starts_with("data:") => payload,
        _ => data,
    }
}

fn mime_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_round_trips_byte_content() {
        let bytes: Vec<u8> = (0u8..=255).collect();
        let part = part_from_bytes(&bytes, "image/png");
        let inline = part.as_inline().unwrap();
        let decoded = general_purpose::STANDARD.decode(&inline.data).unwrap();
        assert_eq!(decoded, bytes);
        assert_eq!(inline.mime_type, "image/png");
    }

    #[test]
    fn data_uri_prefix_is_stripped() {
        assert_eq!(
            strip_data_uri_prefix("data:image/png;base64,QUJD"),
            "QUJD"
        );
        assert_eq!(strip_data_uri_prefix("QUJD"), "QUJD");
    }

    #[test]
    fn mime_type_follows_extension() {
        assert_eq!(ImageFile::new("photo.JPG").mime_type, "image/jpeg");
        assert_eq!(ImageFile::new("photo.webp").mime_type, "image/webp");
        assert_eq!(ImageFile::new("photo.raw").mime_type, "application/octet-stream");
    }

    #[tokio::test]
    async fn reading_a_file_produces_an_inline_part() {
        let path = std::env::temp_dir().join("bgswap_media_test.png");
        std::fs::write(&path, b"not really a png").unwrap();

        let part = part_from_file(&path).await.unwrap();
        let inline = part.as_inline().unwrap();
        assert_eq!(inline.mime_type, "image/png");
        let decoded = general_purpose::STANDARD.decode(&inline.data).unwrap();
        assert_eq!(decoded, b"not really a png");

        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn unreadable_file_maps_to_read_error() {
        let result = part_from_file("/definitely/not/here.png").await;
        assert!(matches!(result, Err(BgSwapError::ReadError(_))));
    }
}
