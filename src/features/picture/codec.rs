//! 图片编解码器的窄接口。
//!
//! 转码流水线只依赖 `decode` / `encode` 两个操作，便于测试时注入假实现；
//! 生产实现为 OCIF 解码 + PNG 栅格化。

use thiserror::Error;

use super::ocif;
use super::raster::PixelImage;
use super::renderer;

/// 编解码错误
#[derive(Error, Debug)]
pub enum CodecError {
    /// 容器魔数不匹配
    #[error("无效的 OCIF 签名")]
    InvalidSignature,

    /// 容器声明了未实现的编码方式
    #[error("不支持的编码方式: {0}")]
    UnsupportedMethod(u8),

    /// 字节流截断或内容非法
    #[error("数据不完整或损坏: {0}")]
    Corrupt(String),

    /// PNG 编码失败
    #[error("PNG 编码失败: {0}")]
    Encode(String),
}

/// 图片编解码器
pub trait PictureCodec: Send + Sync {
    /// 把抓取到的字节流解码为像素栅格
    fn decode(&self, bytes: &[u8]) -> Result<PixelImage, CodecError>;

    /// 把像素栅格按整数倍放大编码为 PNG
    fn encode(&self, image: &PixelImage, scale: u32) -> Result<Vec<u8>, CodecError>;
}

/// 生产用编解码器：OCIF 进，PNG 出
pub struct OcifCodec;

impl PictureCodec for OcifCodec {
    fn decode(&self, bytes: &[u8]) -> Result<PixelImage, CodecError> {
        ocif::decode(bytes)
    }

    fn encode(&self, image: &PixelImage, scale: u32) -> Result<Vec<u8>, CodecError> {
        renderer::encode_png(image, scale)
    }
}
