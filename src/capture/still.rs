use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::ImageFormat;
use std::fmt;

const FALLBACK_MIME: &str = "application/octet-stream";

/// A still image ready to be sent for analysis.
///
/// File uploads stay binary. Camera snapshots are encoded into a data URL,
/// which is the form the detection endpoint accepts as JSON.
#[derive(Clone, PartialEq, Eq)]
pub enum CapturedImage {
    Binary { bytes: Vec<u8>, mime: String },
    DataUrl(String),
}

impl CapturedImage {
    pub fn data_url(mime: &str, bytes: &[u8]) -> Self {
        Self::DataUrl(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)))
    }

    /// Name used for the multipart `image` part.
    pub fn file_name(&self) -> String {
        let mime = match self {
            Self::Binary { mime, .. } => mime.as_str(),
            Self::DataUrl(_) => "image/jpeg",
        };
        let extension = ImageFormat::from_mime_type(mime)
            .and_then(|format| format.extensions_str().first().copied())
            .unwrap_or("img");
        format!("capture.{}", extension)
    }
}

impl fmt::Debug for CapturedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binary { bytes, mime } => f
                .debug_struct("Binary")
                .field("len", &bytes.len())
                .field("mime", mime)
                .finish(),
            Self::DataUrl(url) => f.debug_tuple("DataUrl").field(&url.len()).finish(),
        }
    }
}

/// Infer a content type from the file's magic bytes.
pub fn sniff_mime(bytes: &[u8]) -> String {
    image::guess_format(bytes)
        .map(|format| format.to_mime_type().to_string())
        .unwrap_or_else(|_| FALLBACK_MIME.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];

    #[test]
    fn test_data_url_prefix() {
        let image = CapturedImage::data_url("image/jpeg", &[1, 2, 3]);
        assert_eq!(image, CapturedImage::DataUrl("data:image/jpeg;base64,AQID".to_string()));
    }

    #[test]
    fn test_sniff_mime() {
        assert_eq!(sniff_mime(PNG_MAGIC), "image/png");
        assert_eq!(sniff_mime(&[0xFF, 0xD8, 0xFF, 0xE0, 0, 0]), "image/jpeg");
        assert_eq!(sniff_mime(b"hello world"), FALLBACK_MIME);
    }

    #[test]
    fn test_file_name_follows_mime() {
        let png = CapturedImage::Binary {
            bytes: PNG_MAGIC.to_vec(),
            mime: "image/png".to_string(),
        };
        assert_eq!(png.file_name(), "capture.png");
        assert_eq!(CapturedImage::data_url("image/jpeg", &[0]).file_name(), "capture.jpg");
    }
}
