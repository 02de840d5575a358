//! 圆角图标的"锐化"启发式。
//!
//! 市场里一类图标模板用四个盲文点阵字形画出圆角。该启发式只认这一个模板：
//! 四个固定坐标的字形全部命中才生效，命中后把对应格子的背景色替换为其前景色
//! 并置为全透明，相当于把圆角抠成透明缺口。任何一角缺失或不匹配时图片原样返回。

use super::raster::PixelImage;

/// 圆角模板的角点表：`(x, y, 期望字形)`。
///
/// 固定常量，来源于具体的图标模板，不随图片内容推导。
const CORNER_GLYPHS: [(u32, u32, char); 4] = [(0, 0, '⣾'), (7, 0, '⣷'), (0, 3, '⢿'), (7, 3, '⡿')];

/// 就地应用锐化；返回是否命中模板。
///
/// 两次应用与一次应用结果相同：字形不被修改，因此第二次仍会命中，
/// 但背景色已等于前景色、alpha 已为 0，写入是幂等的。
pub fn sharpen(image: &mut PixelImage) -> bool {
    for &(x, y, glyph) in &CORNER_GLYPHS {
        match image.pixel(x, y) {
            Some(px) if px.glyph == glyph => {}
            _ => return false,
        }
    }

    for &(x, y, _) in &CORNER_GLYPHS {
        if let Some(px) = image.pixel_mut(x, y) {
            px.background = px.foreground;
            px.alpha = 0.0;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::super::raster::{Pixel, PixelImage, Rgb};
    use super::{CORNER_GLYPHS, sharpen};

    fn template_icon() -> PixelImage {
        let mut img = PixelImage::filled(
            8,
            4,
            Pixel {
                background: Rgb::new(40, 40, 40),
                foreground: Rgb::new(220, 220, 220),
                alpha: 1.0,
                glyph: ' ',
            },
        );
        for &(x, y, glyph) in &CORNER_GLYPHS {
            img.pixel_mut(x, y).expect("in bounds").glyph = glyph;
        }
        img
    }

    #[test]
    fn fires_on_template_and_punches_corners() {
        let mut img = template_icon();
        assert!(sharpen(&mut img));

        for &(x, y, _) in &CORNER_GLYPHS {
            let px = img.pixel(x, y).expect("in bounds");
            assert_eq!(px.background, px.foreground);
            assert_eq!(px.alpha, 0.0);
        }
        // 非角点格保持不变
        let center = img.pixel(3, 2).expect("in bounds");
        assert_eq!(center.background, Rgb::new(40, 40, 40));
        assert_eq!(center.alpha, 1.0);
    }

    #[test]
    fn idempotent_once_fired() {
        let mut once = template_icon();
        sharpen(&mut once);
        let mut twice = once.clone();
        assert!(sharpen(&mut twice));
        assert_eq!(once, twice);
    }

    #[test]
    fn mismatched_corner_leaves_image_untouched() {
        let mut img = template_icon();
        img.pixel_mut(7, 3).expect("in bounds").glyph = '?';
        let before = img.clone();
        assert!(!sharpen(&mut img));
        assert_eq!(img, before);
    }

    #[test]
    fn missing_corner_leaves_image_untouched() {
        // 6x3 栅格没有 (7, 3) 角点
        let mut img = PixelImage::filled(6, 3, Pixel::default());
        for &(x, y, glyph) in &CORNER_GLYPHS {
            if let Some(px) = img.pixel_mut(x, y) {
                px.glyph = glyph;
            }
        }
        let before = img.clone();
        assert!(!sharpen(&mut img));
        assert_eq!(img, before);
    }
}
