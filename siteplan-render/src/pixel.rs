use std::io::Cursor;

use font8x8::{BASIC_FONTS, UnicodeFonts};
use image::{ImageFormat, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_circle_mut, draw_line_segment_mut};
use siteplan_core::geometry::{Point2, Vector2};

use crate::canvas::{Canvas, RasterTarget};
use crate::errors::RenderError;
use crate::style::{Color, Stroke};

/// 8×8 点阵字体的字宽。
pub const GLYPH_SIZE: u32 = 8;

/// 基于 `image` / `imageproc` 的 RGB 画布，白色背景。
#[derive(Debug, Clone)]
pub struct PixelCanvas {
    image: RgbImage,
}

impl PixelCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbImage::from_pixel(width.max(1), height.max(1), rgb(Color::WHITE)),
        }
    }

    #[inline]
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    fn put_pixel_checked(&mut self, x: i64, y: i64, color: Color) {
        let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
            return;
        };
        if x < self.image.width() && y < self.image.height() {
            self.image.put_pixel(x, y, rgb(color));
        }
    }
}

#[inline]
fn rgb(color: Color) -> Rgb<u8> {
    Rgb(color.0)
}

#[inline]
fn as_f32(point: Point2) -> (f32, f32) {
    (point.x() as f32, point.y() as f32)
}

impl Canvas for PixelCanvas {
    fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn draw_line(&mut self, start: Point2, end: Point2, stroke: Stroke) {
        let color = rgb(stroke.color);
        if stroke.width <= 1 {
            draw_line_segment_mut(&mut self.image, as_f32(start), as_f32(end), color);
            return;
        }
        // 粗线以法线方向上的多条平行线近似
        let normal = start
            .vector_to(end)
            .normalize()
            .map(Vector2::perp)
            .unwrap_or_else(|| Vector2::new(0.0, 1.0));
        let half = f64::from(stroke.width - 1) / 2.0;
        for step in 0..stroke.width {
            let offset = normal.scale(f64::from(step) - half);
            draw_line_segment_mut(
                &mut self.image,
                as_f32(start.translate(offset)),
                as_f32(end.translate(offset)),
                color,
            );
        }
    }

    fn draw_text(&mut self, position: Point2, text: &str, color: Color) {
        let origin_x = position.x().round() as i64;
        let origin_y = position.y().round() as i64;
        for (column, ch) in text.chars().enumerate() {
            let Some(glyph) = BASIC_FONTS.get(ch).or_else(|| BASIC_FONTS.get('?')) else {
                continue;
            };
            let glyph_x = origin_x + column as i64 * i64::from(GLYPH_SIZE);
            for (row, bits) in glyph.iter().enumerate() {
                for bit in 0..GLYPH_SIZE {
                    if bits & (1 << bit) != 0 {
                        self.put_pixel_checked(glyph_x + i64::from(bit), origin_y + row as i64, color);
                    }
                }
            }
        }
    }

    fn draw_circle(&mut self, center: Point2, radius: f64, fill: Color, outline: Color) {
        let center = (center.x().round() as i32, center.y().round() as i32);
        let radius = radius.round() as i32;
        draw_filled_circle_mut(&mut self.image, center, radius, rgb(fill));
        draw_hollow_circle_mut(&mut self.image, center, radius, rgb(outline));
    }
}

impl RasterTarget for PixelCanvas {
    fn encode_png(&self) -> Result<Vec<u8>, RenderError> {
        let mut bytes = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_canvas_is_white_and_non_empty() {
        let canvas = PixelCanvas::new(0, 3);
        assert_eq!(canvas.size(), (1, 3));
        assert!(canvas.image().pixels().all(|p| *p == Rgb([255, 255, 255])));
    }

    #[test]
    fn thick_line_covers_neighbouring_rows() {
        let mut canvas = PixelCanvas::new(20, 20);
        canvas.draw_line(
            Point2::new(2.0, 10.0),
            Point2::new(17.0, 10.0),
            Stroke::new(Color::BLACK, 3),
        );
        for y in 9..=11 {
            assert_eq!(*canvas.image().get_pixel(10, y), Rgb([0, 0, 0]), "row {y}");
        }
        assert_eq!(*canvas.image().get_pixel(10, 5), Rgb([255, 255, 255]));
    }

    #[test]
    fn text_and_circles_are_clipped_to_canvas() {
        let mut canvas = PixelCanvas::new(10, 10);
        canvas.draw_text(Point2::new(-4.0, -4.0), "P0", Color::BLUE);
        canvas.draw_circle(Point2::new(9.0, 9.0), 5.0, Color::RED, Color::BLACK);
        assert_eq!(*canvas.image().get_pixel(9, 9), Rgb([255, 0, 0]));
        assert!(canvas.image().pixels().any(|p| *p == Rgb([0, 0, 255])));
    }

    #[test]
    fn far_out_of_range_pixels_are_clipped_not_wrapped() {
        let mut canvas = PixelCanvas::new(10, 10);
        let wrapped = i64::from(u32::MAX) + 1 + 2;
        canvas.put_pixel_checked(wrapped, 2, Color::RED);
        canvas.put_pixel_checked(2, wrapped, Color::RED);
        canvas.put_pixel_checked(-1, 2, Color::RED);
        assert!(canvas.image().pixels().all(|p| *p == Rgb([255, 255, 255])));

        canvas.put_pixel_checked(2, 2, Color::RED);
        assert_eq!(*canvas.image().get_pixel(2, 2), Rgb([255, 0, 0]));
    }

    #[test]
    fn encodes_png_signature() {
        let canvas = PixelCanvas::new(4, 4);
        let bytes = canvas.encode_png().expect("encode");
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }
}
