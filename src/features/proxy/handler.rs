use axum::{
    Router,
    body::Body,
    extract::{Query, Request},
    http::header,
    response::Response,
    routing::any,
};
use serde::Deserialize;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::http;
use crate::state::AppState;

/// 代理请求的查询参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProxyQuery {
    /// 转发目标的绝对 URL
    #[serde(default)]
    pub url: Option<String>,
}

/// 校验转发目标：绝对 URL 且 path 命中白名单前缀。
///
/// 白名单只约束 path，不约束 host 与 query：目的是阻止本源被当作
/// 无关路径的开放中继，而不是做完整的上游白名单。
fn validate_target(query: &ProxyQuery, allowed_prefixes: &[String]) -> Result<reqwest::Url, AppError> {
    let raw = query
        .url
        .as_deref()
        .ok_or_else(|| AppError::Validation("缺少 url 参数".to_string()))?;
    let target = reqwest::Url::parse(raw)
        .map_err(|e| AppError::Validation(format!("url 不是合法的绝对 URL: {e}")))?;

    let path = target.path();
    if !allowed_prefixes.iter().any(|p| path.starts_with(p)) {
        return Err(AppError::Forbidden(format!("代理路径不在白名单内: {path}")));
    }
    Ok(target)
}

/// 转发请求时丢弃的请求头。
///
/// - `host` 指向本服务而非上游，由客户端按目标 URL 重新生成；
/// - `accept-encoding` 交给客户端协商，保证响应能被透明解压；
/// - `content-length` 与重新分帧的流式请求体冲突。
const SKIPPED_REQUEST_HEADERS: [header::HeaderName; 3] = [
    header::HOST,
    header::ACCEPT_ENCODING,
    header::CONTENT_LENGTH,
];

#[utoipa::path(
    post,
    path = "/proxy",
    summary = "受限反向代理",
    description = "把调用方的方法/请求头/请求体原样转发到 url 指定的上游（path 必须命中白名单前缀），流式中继上游响应；content-encoding 响应头被剔除（传输压缩已被透明解压）。重定向不自动跟随，原样返回。路由按任意方法注册，部署中前端以 POST 调用。",
    params(
        ("url" = String, Query, description = "目标绝对 URL，path 需以白名单前缀开头")
    ),
    responses(
        (status = 200, description = "上游响应原样中继（含非 2xx 状态）"),
        (status = 400, description = "url 缺失或非法"),
        (status = 403, description = "路径不在白名单内，不发起任何上游调用"),
        (status = 502, description = "连接上游失败")
    ),
    tag = "Proxy"
)]
pub async fn forward_request(
    Query(query): Query<ProxyQuery>,
    request: Request,
) -> Result<Response, AppError> {
    let config = AppConfig::global();
    // 白名单校验先于任何网络调用。
    let target = validate_target(&query, &config.proxy.allowed_path_prefixes)?;

    let client =
        http::client_proxy().map_err(|e| AppError::Internal(format!("构建 HTTP 客户端失败: {e}")))?;

    let (parts, body) = request.into_parts();
    let mut headers = parts.headers;
    for name in SKIPPED_REQUEST_HEADERS {
        headers.remove(&name);
    }

    // 请求体流式透传，不在内存里聚合。
    let upstream = client
        .request(parts.method, target.clone())
        .headers(headers)
        .body(reqwest::Body::wrap_stream(body.into_data_stream()))
        .send()
        .await
        .map_err(|e| AppError::Upstream(format!("连接上游失败: {target}: {e}")))?;

    tracing::debug!(url = %target, status = %upstream.status(), "上游响应中继");

    let status = upstream.status();
    let mut relay_headers = upstream.headers().clone();
    // 客户端栈已透明解压传输编码，原样转发 content-encoding 会让
    // 编码标签与实际字节不一致；transfer-encoding 属逐跳头，由本端重新分帧。
    relay_headers.remove(header::CONTENT_ENCODING);
    relay_headers.remove(header::TRANSFER_ENCODING);

    let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
    *response.status_mut() = status;
    *response.headers_mut() = relay_headers;
    Ok(response)
}

pub fn create_proxy_router() -> Router<AppState> {
    Router::new().route("/proxy", any(forward_request))
}
