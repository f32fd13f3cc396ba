use std::io::Cursor;

use cbzz_application::{ApplicationError, PageDecoder};
use cbzz_domain::PageImage;
use image::io::Reader;
use image::ImageFormat;

/// Checks that page bytes hold a readable image and tags them with their real MIME type.
#[derive(Debug, Default)]
pub struct ImageCratePageDecoder;

impl PageDecoder for ImageCratePageDecoder {
    fn decode_page(&self, entry_name: &str, bytes: Vec<u8>) -> Result<PageImage, ApplicationError> {
        if bytes.is_empty() {
            return Err(ApplicationError::Decode(format!("{entry_name} is empty")));
        }

        let mut reader = Reader::new(Cursor::new(bytes.as_slice()))
            .with_guessed_format()
            .map_err(|error| ApplicationError::Decode(error.to_string()))?;
        if reader.format().is_none() {
            if let Some(format) = format_from_name(entry_name) {
                reader.set_format(format);
            }
        }
        let format = reader.format().ok_or_else(|| {
            ApplicationError::Decode(format!("unknown image format: {entry_name}"))
        })?;
        let mime = mime_for(format).ok_or_else(|| {
            ApplicationError::Decode(format!("unsupported image format {format:?}: {entry_name}"))
        })?;
        reader
            .into_dimensions()
            .map_err(|error| ApplicationError::Decode(format!("{entry_name}: {error}")))?;

        Ok(PageImage::new(mime, bytes))
    }
}

fn format_from_name(entry_name: &str) -> Option<ImageFormat> {
    let (_, extension) = entry_name.rsplit_once('.')?;
    ImageFormat::from_extension(extension)
}

fn mime_for(format: ImageFormat) -> Option<&'static str> {
    match format {
        ImageFormat::Jpeg => Some("image/jpeg"),
        ImageFormat::Png => Some("image/png"),
        ImageFormat::Gif => Some("image/gif"),
        ImageFormat::WebP => Some("image/webp"),
        ImageFormat::Bmp => Some("image/bmp"),
        _ => None,
    }
}
