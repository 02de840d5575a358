use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// 应用统一错误类型
///
/// 与前端约定的失败语义：边缘端点失败时返回对应状态码的空响应体，
/// 诊断细节只进服务端日志（代理端点转发的上游错误体不在此列，
/// 那是中继行为，不经过本类型）。
#[derive(Error, Debug)]
pub enum AppError {
    /// 参数校验错误（URL 缺失/非法、scale 越界、解码后尺寸超限）
    #[error("参数校验错误: {0}")]
    Validation(String),

    /// 禁止访问（代理路径不在白名单内）
    #[error("禁止访问: {0}")]
    Forbidden(String),

    /// 上游不可用（抓取返回非 2xx，或代理连接上游失败）
    #[error("上游错误: {0}")]
    Upstream(String),

    /// 内部服务器错误（解码/编码异常等处理失败）
    #[error("内部错误: {0}")]
    Internal(String),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // 4xx 是调用方问题，warn 级别足够；5xx 记 error 便于告警。
        if status.is_server_error() {
            tracing::error!(
                status = status.as_u16(),
                request_id = ?crate::request_id::current_request_id(),
                "请求处理失败: {self}"
            );
        } else {
            tracing::warn!(
                status = status.as_u16(),
                request_id = ?crate::request_id::current_request_id(),
                "请求被拒绝: {self}"
            );
        }
        status.into_response()
    }
}
