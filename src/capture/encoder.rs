use super::still::CapturedImage;
use crate::error::CaptureError;
use image::RgbImage;
use image::codecs::jpeg::JpegEncoder;

/// Turns a raw camera frame into a still that can be sent for analysis
pub trait FrameEncoder {
    fn encode(&self, frame: &RgbImage) -> Result<CapturedImage, CaptureError>;
}

/// Encodes frames as JPEG data URLs
pub struct JpegFrameEncoder {
    quality: u8,
}

impl JpegFrameEncoder {
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }
}

impl FrameEncoder for JpegFrameEncoder {
    fn encode(&self, frame: &RgbImage) -> Result<CapturedImage, CaptureError> {
        let mut jpeg_buf = Vec::new();
        let mut enc = JpegEncoder::new_with_quality(&mut jpeg_buf, self.quality);
        enc.encode_image(frame)
            .map_err(|e| CaptureError::Encoding(e.to_string()))?;

        Ok(CapturedImage::data_url("image/jpeg", &jpeg_buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use image::Rgb;

    #[test]
    fn test_encodes_jpeg_data_url() {
        let frame = RgbImage::from_pixel(8, 8, Rgb([0, 128, 255]));
        let encoded = JpegFrameEncoder::new(90).encode(&frame).unwrap();

        let CapturedImage::DataUrl(url) = encoded else {
            panic!("expected a data URL");
        };
        let payload = url.strip_prefix("data:image/jpeg;base64,").unwrap();
        let jpeg = STANDARD.decode(payload).unwrap();

        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 8));
    }
}
