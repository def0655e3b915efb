//! Base64 data-URL transport for file uploads.
//!
//! Files travel to the backend embedded in JSON form payloads as
//! `data:<mime>;base64,<payload>` strings. Validation is per-file;
//! batch encoding is atomic (first error fails the whole batch).

use std::io::Cursor;
use std::path::Path;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;
use tracing::debug;

use crate::{PipelineError, Result, TRANSPORT_LIMIT_BYTES};

/// Read an upload from disk for the pipeline.
///
/// I/O failures surface as [`PipelineError::Read`]; an interrupted read
/// maps to [`PipelineError::ReadAborted`].
pub fn read_upload(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(map_read_error)
}

fn map_read_error(error: std::io::Error) -> PipelineError {
    match error.kind() {
        std::io::ErrorKind::Interrupted => PipelineError::ReadAborted,
        _ => PipelineError::Read(error),
    }
}

/// Encode a raw uploaded file as a data URL, MIME sniffed from magic bytes.
///
/// Fails with [`PipelineError::FileTooLarge`] above [`TRANSPORT_LIMIT_BYTES`]
/// and [`PipelineError::EmptyFile`] for zero-byte input. A file of exactly
/// the limit is accepted.
pub fn encode_file(name: &str, bytes: &[u8]) -> Result<String> {
    if bytes.is_empty() {
        return Err(PipelineError::EmptyFile);
    }
    let actual = bytes.len() as u64;
    if actual > TRANSPORT_LIMIT_BYTES {
        return Err(PipelineError::FileTooLarge {
            actual,
            limit: TRANSPORT_LIMIT_BYTES,
        });
    }

    let mime = sniff_mime(bytes);
    debug!(name, mime, size = actual, "Encoding file for transport");
    Ok(format!("data:{mime};base64,{}", BASE64.encode(bytes)))
}

/// Encode a batch of files atomically.
///
/// The first failing file fails the batch; no partial results are returned.
pub fn encode_batch(files: &[(String, Vec<u8>)]) -> Result<Vec<String>> {
    let mut encoded = Vec::with_capacity(files.len());
    for (name, bytes) in files {
        encoded.push(encode_file(name, bytes)?);
    }
    Ok(encoded)
}

/// Re-encode a raster as JPEG at the given quality and wrap it as a data URL.
///
/// All pipeline-produced assets are `image/jpeg` regardless of the original
/// upload format.
pub fn jpeg_data_url(img: &DynamicImage, quality: u8) -> Result<String> {
    let rgb = img.to_rgb8();
    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(Cursor::new(&mut buf), quality);
    encoder
        .encode_image(&rgb)
        .map_err(|e| PipelineError::Encode(e.to_string()))?;
    Ok(format!("data:image/jpeg;base64,{}", BASE64.encode(&buf)))
}

/// Best-effort MIME detection from leading magic bytes.
fn sniff_mime(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        "image/png"
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        "image/webp"
    } else if bytes.starts_with(b"GIF8") {
        "image/gif"
    } else if bytes.starts_with(b"%PDF") {
        "application/pdf"
    } else {
        "application/octet-stream"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JPEG_MAGIC: [u8; 3] = [0xFF, 0xD8, 0xFF];

    fn jpeg_bytes(total_len: usize) -> Vec<u8> {
        let mut v = vec![0u8; total_len];
        v[..3].copy_from_slice(&JPEG_MAGIC);
        v
    }

    #[test]
    fn encode_file_produces_data_url() {
        let url = encode_file("scan.jpg", &jpeg_bytes(64)).unwrap();
        assert!(url.starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn encode_file_sniffs_png() {
        let mut bytes = vec![0x89, b'P', b'N', b'G'];
        bytes.extend_from_slice(&[0u8; 16]);
        let url = encode_file("logo.png", &bytes).unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn encode_file_rejects_empty() {
        let err = encode_file("empty", &[]).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyFile));
    }

    #[test]
    fn encode_file_accepts_exact_limit() {
        let bytes = jpeg_bytes(TRANSPORT_LIMIT_BYTES as usize);
        assert!(encode_file("at-limit.jpg", &bytes).is_ok());
    }

    #[test]
    fn encode_file_rejects_one_past_limit() {
        let bytes = jpeg_bytes(TRANSPORT_LIMIT_BYTES as usize + 1);
        let err = encode_file("oversized.jpg", &bytes).unwrap_err();
        match err {
            PipelineError::FileTooLarge { actual, limit } => {
                assert_eq!(actual, TRANSPORT_LIMIT_BYTES + 1);
                assert_eq!(limit, TRANSPORT_LIMIT_BYTES);
            }
            other => panic!("expected FileTooLarge, got {other:?}"),
        }
    }

    #[test]
    fn error_message_includes_both_sizes() {
        let bytes = jpeg_bytes(TRANSPORT_LIMIT_BYTES as usize + 1);
        let msg = encode_file("oversized.jpg", &bytes).unwrap_err().to_string();
        assert!(msg.contains(&(TRANSPORT_LIMIT_BYTES + 1).to_string()));
        assert!(msg.contains(&TRANSPORT_LIMIT_BYTES.to_string()));
    }

    #[test]
    fn batch_fails_whole_on_middle_error() {
        let files = vec![
            ("a.jpg".to_string(), jpeg_bytes(32)),
            ("b.jpg".to_string(), jpeg_bytes(TRANSPORT_LIMIT_BYTES as usize + 1)),
            ("c.jpg".to_string(), jpeg_bytes(32)),
        ];
        let err = encode_batch(&files).unwrap_err();
        assert!(matches!(err, PipelineError::FileTooLarge { .. }));
    }

    #[test]
    fn batch_succeeds_when_all_valid() {
        let files = vec![
            ("a.jpg".to_string(), jpeg_bytes(32)),
            ("b.jpg".to_string(), jpeg_bytes(48)),
        ];
        let urls = encode_batch(&files).unwrap();
        assert_eq!(urls.len(), 2);
        assert!(urls.iter().all(|u| u.starts_with("data:image/jpeg;base64,")));
    }

    #[test]
    fn read_upload_missing_file_is_a_read_error() {
        let err = read_upload(Path::new("/nonexistent/upload.jpg")).unwrap_err();
        assert!(matches!(err, PipelineError::Read(_)));
    }

    #[test]
    fn interrupted_read_maps_to_aborted() {
        let io = std::io::Error::new(std::io::ErrorKind::Interrupted, "signal");
        assert!(matches!(map_read_error(io), PipelineError::ReadAborted));
    }

    #[test]
    fn other_io_failures_map_to_read() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(matches!(map_read_error(io), PipelineError::Read(_)));
    }

    #[test]
    fn jpeg_data_url_has_jpeg_prefix() {
        let img = DynamicImage::new_rgb8(32, 32);
        let url = jpeg_data_url(&img, 75).unwrap();
        assert!(url.starts_with("data:image/jpeg;base64,"));
        assert!(url.len() > "data:image/jpeg;base64,".len());
    }

    #[test]
    fn jpeg_data_url_is_deterministic() {
        let img = DynamicImage::new_rgb8(64, 36);
        let a = jpeg_data_url(&img, 75).unwrap();
        let b = jpeg_data_url(&img, 75).unwrap();
        assert_eq!(a, b);
    }
}
