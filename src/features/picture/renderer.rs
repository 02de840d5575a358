//! PNG 栅格化：把字符格栅格按整数倍数放大为 RGBA 位图。

use super::codec::CodecError;
use super::raster::PixelImage;

/// 将栅格编码为 PNG。
///
/// 最近邻放大：每个字符格输出 `scale × scale` 的纯色块，
/// 颜色取背景色，PNG alpha 通道取格子不透明度。
pub fn encode_png(image: &PixelImage, scale: u32) -> Result<Vec<u8>, CodecError> {
    if scale == 0 {
        return Err(CodecError::Encode("放大倍数不能为 0".to_string()));
    }

    let out_width = image.width() * scale;
    let out_height = image.height() * scale;
    let mut rgba = vec![0u8; (out_width * out_height * 4) as usize];

    for y in 0..image.height() {
        for x in 0..image.width() {
            let px = image.pixel(x, y).expect("栅格内坐标");
            let cell = [
                px.background.r,
                px.background.g,
                px.background.b,
                (px.alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
            ];
            for dy in 0..scale {
                let row = (y * scale + dy) * out_width;
                for dx in 0..scale {
                    let offset = ((row + x * scale + dx) * 4) as usize;
                    rgba[offset..offset + 4].copy_from_slice(&cell);
                }
            }
        }
    }

    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, out_width, out_height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder
            .write_header()
            .map_err(|e| CodecError::Encode(e.to_string()))?;
        writer
            .write_image_data(&rgba)
            .map_err(|e| CodecError::Encode(e.to_string()))?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::super::raster::{Pixel, PixelImage, Rgb};
    use super::encode_png;

    fn decode_png(bytes: &[u8]) -> (u32, u32, Vec<u8>) {
        let decoder = png::Decoder::new(bytes);
        let mut reader = decoder.read_info().expect("png header");
        let mut buf = vec![0u8; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).expect("png frame");
        buf.truncate(info.buffer_size());
        (info.width, info.height, buf)
    }

    #[test]
    fn output_dimensions_scale_linearly() {
        let img = PixelImage::filled(3, 2, Pixel::default());
        for scale in [1u32, 4, 8] {
            let bytes = encode_png(&img, scale).expect("encode");
            let (w, h, _) = decode_png(&bytes);
            assert_eq!((w, h), (3 * scale, 2 * scale));
        }
    }

    #[test]
    fn cells_become_solid_blocks_with_alpha() {
        let mut img = PixelImage::filled(2, 1, Pixel::default());
        *img.pixel_mut(0, 0).expect("in bounds") = Pixel {
            background: Rgb::new(10, 20, 30),
            foreground: Rgb::WHITE,
            alpha: 1.0,
            glyph: '⣿',
        };

        let bytes = encode_png(&img, 2).expect("encode");
        let (w, h, rgba) = decode_png(&bytes);
        assert_eq!((w, h), (4, 2));

        // 左上 2×2 块为不透明的背景色
        for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            let i = (y * w as usize + x) * 4;
            assert_eq!(&rgba[i..i + 4], &[10, 20, 30, 255]);
        }
        // 右侧块保持默认的全透明
        let i = 2 * 4;
        assert_eq!(rgba[i + 3], 0);
    }

    #[test]
    fn zero_scale_is_rejected() {
        let img = PixelImage::filled(1, 1, Pixel::default());
        assert!(encode_png(&img, 0).is_err());
    }
}
