/// 图片转码服务（OCIF → PNG）
pub mod picture;

/// 受限反向代理
pub mod proxy;

/// 健康检查
pub mod health;
