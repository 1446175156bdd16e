use image::{Rgb, RgbImage};
use rusttype::{point, Font, Scale};

use super::font::{builtin_rows, ResolvedFont, BUILTIN_GLYPH_WIDTH};

/// Extra canvas height added below the QR image for the caption band.
pub const LABEL_BAND_HEIGHT: u32 = 100;

const LABEL_FONT_SIZE: f32 = 40.0;
const LABEL_TOP_OFFSET: u32 = 30;
const BUILTIN_SCALE: u32 = 5;
const TEXT_COLOR: Rgb<u8> = Rgb([0, 0, 0]);

/// Extend the canvas down by the fixed band height and draw `label`
/// horizontally centered inside the band.
pub fn append_label(qr: RgbImage, label: &str, font: &ResolvedFont) -> RgbImage {
    let (width, height) = qr.dimensions();
    let mut out = RgbImage::from_pixel(width, height + LABEL_BAND_HEIGHT, Rgb([255, 255, 255]));
    image::imageops::replace(&mut out, &qr, 0, 0);

    let text_width = measure(font, label);
    let x = width.saturating_sub(text_width) / 2;
    let y = height + LABEL_TOP_OFFSET;

    match font {
        ResolvedFont::Truetype(f) => draw_truetype(&mut out, f, label, x as f32, y as f32),
        ResolvedFont::Builtin => draw_builtin(&mut out, label, x, y),
    }

    out
}

/// Pixel width of the rendered text: glyph metrics for TrueType, estimated
/// from character count for the builtin face.
fn measure(font: &ResolvedFont, text: &str) -> u32 {
    match font {
        ResolvedFont::Truetype(f) => truetype_width(f, text).ceil() as u32,
        ResolvedFont::Builtin => text.chars().count() as u32 * builtin_advance(),
    }
}

fn builtin_advance() -> u32 {
    (BUILTIN_GLYPH_WIDTH + 1) * BUILTIN_SCALE
}

fn truetype_width(font: &Font<'static>, text: &str) -> f32 {
    if text.is_empty() {
        return 0.0;
    }
    let scale = Scale::uniform(LABEL_FONT_SIZE);
    let v_metrics = font.v_metrics(scale);
    let glyphs: Vec<_> = font.layout(text, scale, point(0.0, v_metrics.ascent)).collect();

    let mut width: f32 = 0.0;
    for glyph in &glyphs {
        if let Some(bb) = glyph.pixel_bounding_box() {
            width = width.max(bb.max.x as f32);
        }
    }
    width
}

fn draw_truetype(img: &mut RgbImage, font: &Font<'static>, text: &str, x: f32, y: f32) {
    let scale = Scale::uniform(LABEL_FONT_SIZE);
    let v_metrics = font.v_metrics(scale);
    let baseline = y + v_metrics.ascent;
    let mut caret = x;

    for ch in text.chars() {
        let glyph = font.glyph(ch).scaled(scale).positioned(point(caret, baseline));
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, coverage| {
                let px = gx as i32 + bb.min.x;
                let py = gy as i32 + bb.min.y;
                if px < 0 || py < 0 {
                    return;
                }
                let (px, py) = (px as u32, py as u32);
                if px >= img.width() || py >= img.height() {
                    return;
                }
                let dst = img.get_pixel_mut(px, py);
                let inv = 1.0 - coverage;
                for c in 0..3 {
                    dst.0[c] = (TEXT_COLOR.0[c] as f32 * coverage + dst.0[c] as f32 * inv) as u8;
                }
            });
        }
        caret += glyph.unpositioned().h_metrics().advance_width;
    }
}

fn draw_builtin(img: &mut RgbImage, text: &str, x: u32, y: u32) {
    let mut caret = x;
    for ch in text.chars() {
        let rows = builtin_rows(ch);
        for (row_idx, row) in rows.iter().enumerate() {
            for col in 0..BUILTIN_GLYPH_WIDTH {
                if row & (1 << (BUILTIN_GLYPH_WIDTH - 1 - col)) == 0 {
                    continue;
                }
                for dy in 0..BUILTIN_SCALE {
                    for dx in 0..BUILTIN_SCALE {
                        let px = caret + col * BUILTIN_SCALE + dx;
                        let py = y + row_idx as u32 * BUILTIN_SCALE + dy;
                        if px < img.width() && py < img.height() {
                            img.put_pixel(px, py, TEXT_COLOR);
                        }
                    }
                }
            }
        }
        caret += builtin_advance();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white_square(side: u32) -> RgbImage {
        RgbImage::from_pixel(side, side, Rgb([255, 255, 255]))
    }

    #[test]
    fn test_band_adds_exact_height() {
        let qr = white_square(300);
        let out = append_label(qr, "Scan Me", &ResolvedFont::Builtin);
        assert_eq!(out.width(), 300);
        assert_eq!(out.height(), 300 + LABEL_BAND_HEIGHT);
    }

    #[test]
    fn test_builtin_text_lands_centered_in_band() {
        let qr = white_square(600);
        let out = append_label(qr, "Scan Me", &ResolvedFont::Builtin);

        let mut min_x = u32::MAX;
        let mut max_x = 0;
        let mut dark_in_band = false;
        for y in 600..out.height() {
            for x in 0..out.width() {
                if out.get_pixel(x, y).0[0] < 128 {
                    dark_in_band = true;
                    min_x = min_x.min(x);
                    max_x = max_x.max(x);
                }
            }
        }

        assert!(dark_in_band, "label band has no text pixels");
        let center = (min_x + max_x) / 2;
        let offset = center.abs_diff(300);
        assert!(offset <= builtin_advance(), "text center off by {offset} px");
    }

    #[test]
    fn test_qr_area_untouched() {
        let qr = white_square(200);
        let out = append_label(qr, "W", &ResolvedFont::Builtin);
        for y in 0..200 {
            for x in 0..200 {
                assert_eq!(*out.get_pixel(x, y), Rgb([255, 255, 255]));
            }
        }
    }

    #[test]
    fn test_empty_label_only_extends_canvas() {
        let qr = white_square(100);
        let out = append_label(qr, "", &ResolvedFont::Builtin);
        assert_eq!(out.height(), 100 + LABEL_BAND_HEIGHT);
        assert!(out.pixels().all(|p| *p == Rgb([255, 255, 255])));
    }
}
