use cbzz_domain::{FitMode, PageImage, ReadingFilter};

use super::canvas::{pack_rgb, unpack_rgb};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageBitmap {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>,
}

pub fn decode_bitmap(page: &PageImage) -> Result<PageBitmap, String> {
    let image = image::load_from_memory(&page.bytes)
        .map_err(|error| format!("failed to decode {} page: {error}", page.mime))?;
    let source = image.to_rgb8();
    let width = source.width() as usize;
    let height = source.height() as usize;
    if width == 0 || height == 0 {
        return Err("page has no pixels".to_string());
    }
    let pixels = source
        .pixels()
        .map(|pixel| {
            let [r, g, b] = pixel.0;
            pack_rgb(r, g, b)
        })
        .collect();
    Ok(PageBitmap {
        width,
        height,
        pixels,
    })
}

/// On-screen size of a page inside an `area_width` x `area_height` slot.
pub fn fitted_size(
    src_width: usize,
    src_height: usize,
    area_width: usize,
    area_height: usize,
    fit: FitMode,
    zoom: f32,
) -> (usize, usize) {
    if src_width == 0 || src_height == 0 || area_width == 0 || area_height == 0 {
        return (1, 1);
    }
    let by_width = area_width as f32 / src_width as f32;
    let by_height = area_height as f32 / src_height as f32;
    let scale = match fit {
        FitMode::Contain => by_width.min(by_height),
        FitMode::Width => by_width,
        FitMode::Height => by_height,
    } * zoom;
    let width = (src_width as f32 * scale).round().max(1.0) as usize;
    let height = (src_height as f32 * scale).round().max(1.0) as usize;
    (width, height)
}

/// Nearest-neighbour resample.
pub fn scale_bitmap(bitmap: &PageBitmap, width: usize, height: usize) -> PageBitmap {
    let width = width.max(1);
    let height = height.max(1);
    let mut pixels = vec![0_u32; width * height];
    for y in 0..height {
        let src_y = y * bitmap.height / height;
        for x in 0..width {
            let src_x = x * bitmap.width / width;
            pixels[y * width + x] = bitmap.pixels[src_y * bitmap.width + src_x];
        }
    }
    PageBitmap {
        width,
        height,
        pixels,
    }
}

pub fn apply_filter(pixels: &mut [u32], filter: ReadingFilter) {
    match filter {
        ReadingFilter::Normal => {}
        ReadingFilter::Sepia => map_channels(pixels, |r, g, b| {
            (
                0.393 * r + 0.769 * g + 0.189 * b,
                0.349 * r + 0.686 * g + 0.168 * b,
                0.272 * r + 0.534 * g + 0.131 * b,
            )
        }),
        ReadingFilter::Night => map_channels(pixels, |r, g, b| {
            ((1.0 - r) * 0.85, (1.0 - g) * 0.85, (1.0 - b) * 0.85)
        }),
        ReadingFilter::Warm => map_channels(pixels, |r, g, b| (r * 1.08 + 0.03, g * 1.02, b * 0.82)),
    }
}

fn map_channels(pixels: &mut [u32], transform: impl Fn(f32, f32, f32) -> (f32, f32, f32)) {
    for pixel in pixels.iter_mut() {
        let [r, g, b] = unpack_rgb(*pixel);
        let (red, green, blue) = transform(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
        );
        *pixel = pack_rgb(to_channel(red), to_channel(green), to_channel(blue));
    }
}

fn to_channel(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};

    use super::*;

    #[test]
    fn contain_keeps_the_whole_page_visible() {
        assert_eq!(fitted_size(800, 1200, 400, 400, FitMode::Contain, 1.0), (267, 400));
        assert_eq!(fitted_size(800, 1200, 400, 400, FitMode::Width, 1.0), (400, 600));
        assert_eq!(fitted_size(800, 1200, 400, 400, FitMode::Height, 1.0), (267, 400));
    }

    #[test]
    fn zoom_scales_the_fitted_size() {
        assert_eq!(fitted_size(100, 100, 200, 200, FitMode::Contain, 1.5), (300, 300));
        assert_eq!(fitted_size(100, 100, 200, 200, FitMode::Contain, 0.25), (50, 50));
        assert_eq!(fitted_size(0, 100, 200, 200, FitMode::Contain, 1.0), (1, 1));
    }

    #[test]
    fn scaling_picks_nearest_source_pixels() {
        let bitmap = PageBitmap {
            width: 2,
            height: 1,
            pixels: vec![1, 2],
        };
        let scaled = scale_bitmap(&bitmap, 4, 2);
        assert_eq!(scaled.pixels, vec![1, 1, 2, 2, 1, 1, 2, 2]);
    }

    #[test]
    fn filters_change_pixels_as_expected() {
        let mut night = vec![0x000000, 0xFFFFFF];
        apply_filter(&mut night, ReadingFilter::Night);
        assert_eq!(night, vec![pack_rgb(217, 217, 217), 0x000000]);

        let mut sepia = vec![0xFFFFFF];
        apply_filter(&mut sepia, ReadingFilter::Sepia);
        let [r, g, b] = unpack_rgb(sepia[0]);
        assert!(r >= g && g >= b);

        let mut warm = vec![pack_rgb(100, 100, 100)];
        apply_filter(&mut warm, ReadingFilter::Warm);
        let [r, _, b] = unpack_rgb(warm[0]);
        assert!(r > 100 && b < 100);

        let mut normal = vec![0x123456];
        apply_filter(&mut normal, ReadingFilter::Normal);
        assert_eq!(normal, vec![0x123456]);
    }

    #[test]
    fn decodes_png_pages_into_rgb_pixels() {
        let mut image = RgbImage::new(2, 1);
        image.put_pixel(1, 0, Rgb([255, 0, 0]));
        let mut bytes = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(image)
            .write_to(&mut bytes, ImageOutputFormat::Png)
            .expect("encode");

        let bitmap = decode_bitmap(&PageImage::new("image/png", bytes.into_inner())).expect("decode");
        assert_eq!((bitmap.width, bitmap.height), (2, 1));
        assert_eq!(bitmap.pixels, vec![0x000000, 0xFF0000]);
        assert!(decode_bitmap(&PageImage::new("image/png", vec![1, 2, 3])).is_err());
    }
}
