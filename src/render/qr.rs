use image::{Rgb, RgbImage};
use qrcode::{Color, QrCode};

use crate::enums::{EcClass, ModuleShape, SizeClass, StyleClass};
use crate::error::Result;

/// Quiet zone around the code, in modules.
pub const QUIET_ZONE: u32 = 4;

/// Encode `text` and rasterize the module grid onto a white background.
///
/// The encoder picks the minimal QR version that fits the payload at the
/// requested error-correction level; an unfittable payload surfaces as
/// `PayloadTooLarge`.
pub fn render(
    text: &str,
    error_correction: EcClass,
    size: SizeClass,
    style: StyleClass,
) -> Result<RgbImage> {
    let code = QrCode::with_error_correction_level(text.as_bytes(), error_correction.ec_level())?;
    let modules = code.to_colors();
    let module_count = code.width() as u32;

    let scale = size.module_px();
    let img_size = (module_count + 2 * QUIET_ZONE) * scale;

    let mut img = RgbImage::from_pixel(img_size, img_size, Rgb([255, 255, 255]));
    let fill = style.fill_color();
    let shape = style.module_shape();

    for (i, color) in modules.iter().enumerate() {
        if *color != Color::Dark {
            continue;
        }
        let mx = (i as u32) % module_count;
        let my = (i as u32) / module_count;
        draw_module(
            &mut img,
            (QUIET_ZONE + mx) * scale,
            (QUIET_ZONE + my) * scale,
            scale,
            shape,
            fill,
        );
    }

    Ok(img)
}

fn draw_module(img: &mut RgbImage, ox: u32, oy: u32, scale: u32, shape: ModuleShape, fill: Rgb<u8>) {
    match shape {
        ModuleShape::Square => {
            for dy in 0..scale {
                for dx in 0..scale {
                    img.put_pixel(ox + dx, oy + dy, fill);
                }
            }
        }
        ModuleShape::Rounded => {
            let radius = scale as f32 * 0.3;
            for dy in 0..scale {
                for dx in 0..scale {
                    if in_rounded_cell(dx, dy, scale, radius) {
                        img.put_pixel(ox + dx, oy + dy, fill);
                    }
                }
            }
        }
        ModuleShape::Circle => {
            let center = scale as f32 / 2.0;
            let radius = scale as f32 / 2.0;
            for dy in 0..scale {
                for dx in 0..scale {
                    let px = dx as f32 + 0.5;
                    let py = dy as f32 + 0.5;
                    if (px - center).powi(2) + (py - center).powi(2) <= radius * radius {
                        img.put_pixel(ox + dx, oy + dy, fill);
                    }
                }
            }
        }
    }
}

/// Whether a pixel of a `scale`-sized cell lies inside a rounded square with
/// the given corner radius.
fn in_rounded_cell(dx: u32, dy: u32, scale: u32, radius: f32) -> bool {
    let px = dx as f32 + 0.5;
    let py = dy as f32 + 0.5;
    let max = scale as f32;

    let cx = if px < radius {
        radius
    } else if px > max - radius {
        max - radius
    } else {
        return true;
    };
    let cy = if py < radius {
        radius
    } else if py > max - radius {
        max - radius
    } else {
        return true;
    };

    (px - cx).powi(2) + (py - cy).powi(2) <= radius * radius
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

    fn module_count(text: &str, ec: EcClass) -> u32 {
        QrCode::with_error_correction_level(text.as_bytes(), ec.ec_level())
            .unwrap()
            .width() as u32
    }

    #[test]
    fn test_dimensions_follow_scale_and_quiet_zone() {
        let text = "https://example.com";
        let modules = module_count(text, EcClass::Medium);

        for size in SizeClass::all() {
            let img = render(text, EcClass::Medium, *size, StyleClass::Classic).unwrap();
            let expected = (modules + 2 * QUIET_ZONE) * size.module_px();
            assert_eq!(img.width(), expected);
            assert_eq!(img.height(), expected);
        }
    }

    #[test]
    fn test_classic_style_draws_black_squares() {
        let img = render("hello", EcClass::Medium, SizeClass::Small, StyleClass::Classic).unwrap();

        // Top-left finder pattern module is dark; with square modules its
        // whole cell is filled, corner pixel included.
        let scale = SizeClass::Small.module_px();
        let origin = QUIET_ZONE * scale;
        assert_eq!(*img.get_pixel(origin, origin), Rgb([0, 0, 0]));

        // Quiet zone stays white.
        assert_eq!(*img.get_pixel(0, 0), WHITE);
    }

    #[test]
    fn test_circle_style_leaves_cell_corners_white() {
        let img = render("hello", EcClass::Medium, SizeClass::Small, StyleClass::Green).unwrap();

        let scale = SizeClass::Small.module_px();
        let origin = QUIET_ZONE * scale;
        // Cell corner lies outside the inscribed circle.
        assert_eq!(*img.get_pixel(origin, origin), WHITE);
        // Cell center lies inside it, in the style's fill color.
        let mid = origin + scale / 2;
        assert_eq!(*img.get_pixel(mid, mid), Rgb([0, 128, 0]));
    }

    #[test]
    fn test_payload_too_large_is_surfaced() {
        let text = "x".repeat(2900);
        let err = render(&text, EcClass::Max, SizeClass::Medium, StyleClass::Classic).unwrap_err();
        assert!(matches!(err, AppError::PayloadTooLarge));
    }

    #[test]
    fn test_capacity_ceiling_fits_at_lowest_level() {
        let text = "x".repeat(crate::session::MAX_TEXT_LEN);
        assert!(render(&text, EcClass::Low, SizeClass::Small, StyleClass::Classic).is_ok());
    }
}
