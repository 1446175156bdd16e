mod font;
mod label;
mod qr;

use std::io::Cursor;
use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, RgbImage};

pub use font::ResolvedFont;
pub use label::LABEL_BAND_HEIGHT;
pub use qr::QUIET_ZONE;

use crate::error::Result;
use crate::session::QrSettings;

/// The logo is resized to this fraction of the QR image's side.
const LOGO_FRACTION: u32 = 4;

/// Turns a fully populated settings record into PNG bytes.
///
/// Constructed once at startup; resolving the label font walks the
/// resolution chain a single time.
pub struct Compositor {
    font: ResolvedFont,
}

impl Compositor {
    pub fn new(preferred_font: Option<&Path>) -> Self {
        Compositor {
            font: font::resolve(preferred_font),
        }
    }

    /// Encode -> style -> logo overlay -> label band -> PNG.
    pub fn compose(&self, settings: &QrSettings) -> Result<Vec<u8>> {
        let mut img = qr::render(
            &settings.text,
            settings.error_correction,
            settings.size,
            settings.style,
        )?;

        if settings.has_logo {
            if let Some(logo) = &settings.logo_image {
                overlay_logo(&mut img, logo);
            }
        }

        let img = match settings.label.as_deref() {
            Some(label) if !label.is_empty() => label::append_label(img, label, &self.font),
            _ => img,
        };

        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(img).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }
}

/// Resize the logo to a quarter of the QR side and composite it centered.
/// Alpha, when present, is used as the blend mask; opaque sources overwrite.
/// Modules under the silhouette are sacrificed to the error-correction
/// margin; no occlusion check is made.
fn overlay_logo(base: &mut RgbImage, logo: &DynamicImage) {
    let side = base.width() / LOGO_FRACTION;
    if side == 0 {
        return;
    }
    let resized = logo.resize_exact(side, side, FilterType::Lanczos3).to_rgba8();

    let x0 = (base.width() - side) / 2;
    let y0 = (base.height() - side) / 2;

    for (lx, ly, pixel) in resized.enumerate_pixels() {
        let alpha = pixel.0[3] as f32 / 255.0;
        if alpha <= 0.0 {
            continue;
        }
        let dst = base.get_pixel_mut(x0 + lx, y0 + ly);
        let inv = 1.0 - alpha;
        for c in 0..3 {
            dst.0[c] = (pixel.0[c] as f32 * alpha + dst.0[c] as f32 * inv) as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::{EcClass, SizeClass, StyleClass};
    use crate::error::AppError;
    use crate::session::MAX_TEXT_LEN;
    use image::Rgb;

    fn compositor() -> Compositor {
        // Deterministic: skip the host font chain entirely.
        Compositor {
            font: ResolvedFont::Builtin,
        }
    }

    fn settings(text: &str) -> QrSettings {
        QrSettings::new(text).unwrap()
    }

    fn decode(bytes: &[u8]) -> DynamicImage {
        image::load_from_memory(bytes).unwrap()
    }

    #[test]
    fn test_png_dimensions_scale_with_size_class() {
        let comp = compositor();
        let mut widths = Vec::new();

        for size in SizeClass::all() {
            let mut s = settings("https://example.com");
            s.size = *size;
            let png = comp.compose(&s).unwrap();
            let img = decode(&png);
            widths.push(img.width());
            assert_eq!(img.width(), img.height());
        }

        assert!(widths.windows(2).all(|w| w[0] < w[1]));
        // Same payload, same version: dimensions scale exactly with module px.
        assert_eq!(widths[2] * 10, widths[0] * 20);
    }

    #[test]
    fn test_label_adds_fixed_band_height() {
        let comp = compositor();

        let plain = settings("https://example.com");
        let base = decode(&comp.compose(&plain).unwrap());

        let mut labeled = settings("https://example.com");
        labeled.set_label("Scan Me").unwrap();
        let with_band = decode(&comp.compose(&labeled).unwrap());

        assert_eq!(with_band.width(), base.width());
        assert_eq!(with_band.height(), base.height() + LABEL_BAND_HEIGHT);
    }

    #[test]
    fn test_logo_changes_content_not_dimensions() {
        let comp = compositor();

        let plain = settings("https://example.com");
        let base = decode(&comp.compose(&plain).unwrap());

        let mut with_logo = settings("https://example.com");
        with_logo.set_logo_shape(crate::enums::LogoShape::Circle);
        let red = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            200,
            200,
            Rgb([200, 0, 0]),
        ));
        with_logo.attach_logo(red);
        let overlaid = decode(&comp.compose(&with_logo).unwrap());

        assert_eq!(overlaid.width(), base.width());
        assert_eq!(overlaid.height(), base.height());

        // Center pixel is the opaque logo color.
        let rgb = overlaid.to_rgb8();
        let center = *rgb.get_pixel(rgb.width() / 2, rgb.height() / 2);
        assert_eq!(center, Rgb([200, 0, 0]));
    }

    #[test]
    fn test_logo_occupies_quarter_width_centered() {
        let comp = compositor();

        let mut s = settings("https://example.com");
        s.set_logo_shape(crate::enums::LogoShape::Square);
        let red = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            200,
            200,
            Rgb([200, 0, 0]),
        ));
        s.attach_logo(red);

        let rgb = decode(&comp.compose(&s).unwrap()).to_rgb8();
        let w = rgb.width();
        let side = w / 4;
        let x0 = (w - side) / 2;
        let y = rgb.height() / 2;

        // Just inside both logo edges: logo color.
        assert_eq!(*rgb.get_pixel(x0, y), Rgb([200, 0, 0]));
        assert_eq!(*rgb.get_pixel(x0 + side - 1, y), Rgb([200, 0, 0]));
        // Just outside: whatever the QR has there, never the logo color.
        assert_ne!(*rgb.get_pixel(x0 - 2, y), Rgb([200, 0, 0]));
        assert_ne!(*rgb.get_pixel(x0 + side + 1, y), Rgb([200, 0, 0]));
    }

    #[test]
    fn test_green_style_renders_green_modules() {
        let comp = compositor();
        let mut s = settings("https://example.com");
        s.set_style(StyleClass::Green);
        s.size = SizeClass::Large;

        let rgb = decode(&comp.compose(&s).unwrap()).to_rgb8();
        assert!(rgb.pixels().any(|p| *p == Rgb([0, 128, 0])));
        assert!(!rgb.pixels().any(|p| *p == Rgb([0, 0, 0])));
    }

    #[test]
    fn test_payload_too_large_surfaces() {
        let comp = compositor();
        let mut s = settings(&"x".repeat(MAX_TEXT_LEN));
        s.select_error_correction(EcClass::Max);
        assert!(matches!(comp.compose(&s), Err(AppError::PayloadTooLarge)));
    }

    #[test]
    fn test_alpha_logo_blends_instead_of_overwriting() {
        let comp = compositor();
        let mut s = settings("https://example.com");
        s.set_logo_shape(crate::enums::LogoShape::Square);
        // Fully transparent logo leaves the QR untouched.
        let transparent = DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
            64,
            64,
            image::Rgba([255, 0, 0, 0]),
        ));
        s.attach_logo(transparent);

        let with_logo = decode(&comp.compose(&s).unwrap()).to_rgb8();

        let plain = settings("https://example.com");
        let base = decode(&comp.compose(&plain).unwrap()).to_rgb8();

        assert_eq!(with_logo.as_raw(), base.as_raw());
    }
}
