use std::sync::Arc;

use crate::features::picture::codec::{OcifCodec, PictureCodec};

/// 聚合的应用共享状态
///
/// 边缘层无共享可变状态；这里只挂载可替换的协作件（图片编解码器），
/// 便于集成测试注入假实现。
#[derive(Clone)]
pub struct AppState {
    /// 图片编解码器（生产环境为 OCIF 实现）
    pub codec: Arc<dyn PictureCodec>,
}

impl AppState {
    /// 生产默认状态：OCIF 编解码器
    pub fn new() -> Self {
        Self {
            codec: Arc::new(OcifCodec),
        }
    }

    /// 注入自定义编解码器（测试用）
    pub fn with_codec(codec: Arc<dyn PictureCodec>) -> Self {
        Self { codec }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
