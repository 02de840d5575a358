use axum::{
    Router,
    extract::{Query, State},
    http::{HeaderValue, StatusCode, header},
    response::IntoResponse,
    routing::get,
};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::http;
use crate::state::AppState;

use super::service;
use super::types::{RenderQuery, RenderRequest};

#[utoipa::path(
    get,
    path = "/image",
    summary = "远端 OCIF 图片转码为 PNG",
    description = "抓取 url 指向的 OCIF 图片，按 scale 整数倍最近邻放大为 PNG 返回；sharp=true 时对识别出的圆角图标模板抠出透明圆角。失败时返回对应状态码的空响应体。",
    params(
        ("url" = String, Query, description = "远端图片的绝对 URL"),
        ("scale" = Option<u32>, Query, description = "整数放大倍数，闭区间 [1, 8]，默认 1"),
        ("sharp" = Option<String>, Query, description = "字面量 \"true\" 启用圆角锐化，其余取值视为关闭")
    ),
    responses(
        (status = 200, description = "PNG bytes", content_type = "image/png"),
        (status = 400, description = "url 缺失/非法、scale 越界或解码后尺寸超限"),
        (status = 502, description = "远端资源返回非 2xx"),
        (status = 500, description = "抓取传输失败或解码/编码异常")
    ),
    tag = "Image"
)]
pub async fn render_picture(
    State(state): State<AppState>,
    Query(query): Query<RenderQuery>,
) -> Result<impl IntoResponse, AppError> {
    let limits = &AppConfig::global().picture;
    // 全部入参校验先于任何网络 IO，坏请求不触发抓取。
    let request = RenderRequest::from_query(&query, limits)?;

    let client =
        http::client_fetch().map_err(|e| AppError::Internal(format!("构建 HTTP 客户端失败: {e}")))?;
    // 传输层失败（DNS/连接/读取）是本服务的处理失败（500）；
    // 远端明确回了非 2xx 才是资源问题（502），两类保持可区分。
    let response = client
        .get(request.source_url.clone())
        .send()
        .await
        .map_err(|e| AppError::Internal(format!("抓取远端图片失败: {e}")))?;
    if !response.status().is_success() {
        return Err(AppError::Upstream(format!(
            "远端资源返回 {}: {}",
            response.status(),
            request.source_url
        )));
    }
    let bytes = response
        .bytes()
        .await
        .map_err(|e| AppError::Internal(format!("读取远端图片失败: {e}")))?;

    let png = service::transcode(state.codec.as_ref(), &bytes, &request, limits)?;

    tracing::debug!(
        url = %request.source_url,
        scale = request.scale,
        sharpen = request.sharpen,
        bytes = png.len(),
        "图片转码完成"
    );

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, HeaderValue::from_static("image/png"))],
        png,
    ))
}

pub fn create_picture_router() -> Router<AppState> {
    Router::new().route("/image", get(render_picture))
}
