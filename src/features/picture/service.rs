//! 抓取之后的同步转码流水线：解码 → 尺寸上限 → 锐化 → PNG 编码。

use crate::config::PictureConfig;
use crate::error::AppError;

use super::codec::PictureCodec;
use super::sharpen;
use super::types::RenderRequest;

/// 把抓取到的字节流转码为 PNG。
///
/// 失败语义与前端约定一致：解码/编码异常是本服务的处理失败（500），
/// 解码后尺寸超限是调用方请求了不受支持的资源（400）。
/// 任一步骤失败立即中止，不产出部分结果。
pub fn transcode(
    codec: &dyn PictureCodec,
    bytes: &[u8],
    request: &RenderRequest,
    limits: &PictureConfig,
) -> Result<Vec<u8>, AppError> {
    let mut picture = codec
        .decode(bytes)
        .map_err(|e| AppError::Internal(format!("解码远端图片失败: {e}")))?;

    if picture.width() > limits.max_width || picture.height() > limits.max_height {
        return Err(AppError::Validation(format!(
            "解码后尺寸超限: {}x{}（上限 {}x{}）",
            picture.width(),
            picture.height(),
            limits.max_width,
            limits.max_height
        )));
    }

    if request.sharpen {
        let fired = sharpen::sharpen(&mut picture);
        tracing::debug!(fired, "锐化启发式执行完成");
    }

    codec
        .encode(&picture, request.scale)
        .map_err(|e| AppError::Internal(format!("编码 PNG 失败: {e}")))
}

#[cfg(test)]
mod tests {
    use super::super::codec::{CodecError, PictureCodec};
    use super::super::raster::{Pixel, PixelImage};
    use super::super::types::{RenderQuery, RenderRequest};
    use super::transcode;
    use crate::config::PictureConfig;
    use crate::error::AppError;

    /// 假编解码器：解码输出固定尺寸的栅格，编码回显尺寸信息
    struct FakeCodec {
        width: u32,
        height: u32,
    }

    impl PictureCodec for FakeCodec {
        fn decode(&self, _bytes: &[u8]) -> Result<PixelImage, CodecError> {
            Ok(PixelImage::filled(self.width, self.height, Pixel::default()))
        }

        fn encode(&self, image: &PixelImage, scale: u32) -> Result<Vec<u8>, CodecError> {
            Ok(format!("{}x{}@{}", image.width(), image.height(), scale).into_bytes())
        }
    }

    /// 一路失败的假编解码器
    struct BrokenCodec;

    impl PictureCodec for BrokenCodec {
        fn decode(&self, _bytes: &[u8]) -> Result<PixelImage, CodecError> {
            Err(CodecError::Corrupt("boom".to_string()))
        }

        fn encode(&self, _image: &PixelImage, _scale: u32) -> Result<Vec<u8>, CodecError> {
            Err(CodecError::Encode("boom".to_string()))
        }
    }

    fn request(scale: u32) -> RenderRequest {
        let query = RenderQuery {
            url: Some("http://host/icon.pic".to_string()),
            scale: Some(scale.to_string()),
            sharp: None,
        };
        RenderRequest::from_query(&query, &PictureConfig::default()).expect("valid request")
    }

    #[test]
    fn pipeline_passes_scale_through_to_encoder() {
        let codec = FakeCodec {
            width: 8,
            height: 4,
        };
        let out = transcode(&codec, b"...", &request(3), &PictureConfig::default()).expect("ok");
        assert_eq!(out, b"8x4@3");
    }

    #[test]
    fn oversized_decode_is_a_validation_error() {
        let limits = PictureConfig::default();
        for (w, h) in [(65, 1), (1, 17)] {
            let codec = FakeCodec {
                width: w,
                height: h,
            };
            let err = transcode(&codec, b"...", &request(1), &limits).expect_err("must fail");
            assert!(matches!(err, AppError::Validation(_)), "{w}x{h}");
        }
        // 恰好在上限内则通过
        let codec = FakeCodec {
            width: 64,
            height: 16,
        };
        assert!(transcode(&codec, b"...", &request(1), &limits).is_ok());
    }

    #[test]
    fn decode_failure_is_internal() {
        let err = transcode(&BrokenCodec, b"...", &request(1), &PictureConfig::default())
            .expect_err("must fail");
        assert!(matches!(err, AppError::Internal(_)));
    }
}
