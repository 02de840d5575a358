//! OCIF（OpenComputers Image Format）解码。
//!
//! 容器结构：4 字节魔数 `OCIF` + 1 字节编码方式。
//! - 方式 5（raw）：`width u8`、`height u8`，随后按行优先逐格存储
//!   背景 RGB（3B）、前景 RGB（3B）、不透明度（1B）、UTF-8 字形。
//! - 方式 8（grouped）：`width u8`、`height u8`，随后按
//!   不透明度 → 字形 → 背景色索引 → 前景色索引 分组，叶子是 `(x, y)` 坐标表；
//!   颜色为 8 位 OpenComputers 调色板索引。
//! 其余编码方式拒绝处理。

use super::codec::CodecError;
use super::raster::{Pixel, PixelImage, Rgb};

/// 容器魔数
const MAGIC: &[u8; 4] = b"OCIF";

/// raw 编码方式号
const METHOD_RAW: u8 = 5;
/// grouped 编码方式号
const METHOD_GROUPED: u8 = 8;

/// 解码 OCIF 字节流
pub fn decode(bytes: &[u8]) -> Result<PixelImage, CodecError> {
    let mut r = Reader::new(bytes);

    let magic = r.take(4)?;
    if magic != MAGIC {
        return Err(CodecError::InvalidSignature);
    }

    let method = r.u8()?;
    match method {
        METHOD_RAW => decode_raw(&mut r),
        METHOD_GROUPED => decode_grouped(&mut r),
        other => Err(CodecError::UnsupportedMethod(other)),
    }
}

fn read_dimensions(r: &mut Reader<'_>) -> Result<(u32, u32), CodecError> {
    let width = u32::from(r.u8()?);
    let height = u32::from(r.u8()?);
    if width == 0 || height == 0 {
        return Err(CodecError::Corrupt("图片尺寸为 0".to_string()));
    }
    Ok((width, height))
}

fn decode_raw(r: &mut Reader<'_>) -> Result<PixelImage, CodecError> {
    let (width, height) = read_dimensions(r)?;

    let mut pixels = Vec::with_capacity((width * height) as usize);
    for _ in 0..width * height {
        let background = r.rgb()?;
        let foreground = r.rgb()?;
        let alpha = f32::from(r.u8()?) / 255.0;
        let glyph = r.utf8_char()?;
        pixels.push(Pixel {
            background,
            foreground,
            alpha,
            glyph,
        });
    }

    PixelImage::from_pixels(width, height, pixels)
        .ok_or_else(|| CodecError::Corrupt("像素数量与尺寸不一致".to_string()))
}

fn decode_grouped(r: &mut Reader<'_>) -> Result<PixelImage, CodecError> {
    let (width, height) = read_dimensions(r)?;
    let mut image = PixelImage::filled(width, height, Pixel::default());

    let alpha_groups = r.u8()?;
    for _ in 0..alpha_groups {
        let alpha = f32::from(r.u8()?) / 255.0;
        let glyph_groups = r.u16()?;
        for _ in 0..glyph_groups {
            let glyph = r.utf8_char()?;
            let bg_groups = r.u8()?;
            for _ in 0..bg_groups {
                let background = palette_color(r.u8()?);
                let fg_groups = r.u8()?;
                for _ in 0..fg_groups {
                    let foreground = palette_color(r.u8()?);
                    let positions = r.u16()?;
                    for _ in 0..positions {
                        let x = u32::from(r.u8()?);
                        let y = u32::from(r.u8()?);
                        let px = image.pixel_mut(x, y).ok_or_else(|| {
                            CodecError::Corrupt(format!("像素坐标越界: ({x}, {y})"))
                        })?;
                        *px = Pixel {
                            background,
                            foreground,
                            alpha,
                            glyph,
                        };
                    }
                }
            }
        }
    }

    Ok(image)
}

/// OpenComputers 8 位调色板。
///
/// 0..=15 为 16 级灰度（步长 15），16..=255 为 6×8×5 的 RGB 色立方。
fn palette_color(index: u8) -> Rgb {
    if index < 16 {
        let level = (u16::from(index) + 1) * 15;
        let v = level as u8;
        return Rgb::new(v, v, v);
    }

    let i = u16::from(index) - 16;
    let r = i / 40;
    let g = (i / 5) % 8;
    let b = i % 5;
    Rgb::new(
        (r * 255 / 5) as u8,
        (g * 255 / 7) as u8,
        (b * 255 / 4) as u8,
    )
}

/// 顺序读取器：所有读取在数据截断时返回错误而不是 panic
struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| CodecError::Corrupt("数据截断".to_string()))?;
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> Result<u16, CodecError> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn rgb(&mut self) -> Result<Rgb, CodecError> {
        let b = self.take(3)?;
        Ok(Rgb::new(b[0], b[1], b[2]))
    }

    /// 读取一个 UTF-8 编码的字形（1-4 字节）
    fn utf8_char(&mut self) -> Result<char, CodecError> {
        let first = *self
            .data
            .get(self.pos)
            .ok_or_else(|| CodecError::Corrupt("数据截断".to_string()))?;
        let len = match first {
            0x00..=0x7F => 1,
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => return Err(CodecError::Corrupt("非法的 UTF-8 首字节".to_string())),
        };
        let bytes = self.take(len)?;
        std::str::from_utf8(bytes)
            .ok()
            .and_then(|s| s.chars().next())
            .ok_or_else(|| CodecError::Corrupt("非法的 UTF-8 字形".to_string()))
    }
}
