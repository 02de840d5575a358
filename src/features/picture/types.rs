use serde::Deserialize;

use crate::config::PictureConfig;
use crate::error::AppError;

/// 图片转码的原始查询参数。
///
/// scale 以字符串接收：校验语义要求"非整数即 400"，
/// 交给反序列化器转数字会把错误归到框架层、丢掉统一的空响应体约定。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RenderQuery {
    /// 远端图片的绝对 URL
    #[serde(default)]
    pub url: Option<String>,
    /// 整数放大倍数（缺省 1）
    #[serde(default)]
    pub scale: Option<String>,
    /// 锐化开关，仅接受字面量 "true"
    #[serde(default)]
    pub sharp: Option<String>,
}

/// 校验通过的转码请求参数
#[derive(Debug, Clone)]
pub struct RenderRequest {
    /// 远端图片地址
    pub source_url: reqwest::Url,
    /// 放大倍数，闭区间 `[1, max_scale]`
    pub scale: u32,
    /// 是否应用圆角锐化启发式
    pub sharpen: bool,
}

impl RenderRequest {
    /// 校验查询参数；任何网络调用之前完成。
    ///
    /// 超界 scale 直接拒绝而不是钳制：放大倍数对输出体积是平方放大，
    /// 由调用方自行给出合理值。
    pub fn from_query(query: &RenderQuery, limits: &PictureConfig) -> Result<Self, AppError> {
        let raw_url = query
            .url
            .as_deref()
            .ok_or_else(|| AppError::Validation("缺少 url 参数".to_string()))?;
        let source_url = reqwest::Url::parse(raw_url)
            .map_err(|e| AppError::Validation(format!("url 不是合法的绝对 URL: {e}")))?;

        let scale = match query.scale.as_deref() {
            None => 1,
            Some(raw) => {
                let value: i64 = raw
                    .trim()
                    .parse()
                    .map_err(|_| AppError::Validation(format!("scale 不是整数: {raw}")))?;
                if value < 1 || value > i64::from(limits.max_scale) {
                    return Err(AppError::Validation(format!(
                        "scale 超出范围 [1, {}]: {value}",
                        limits.max_scale
                    )));
                }
                value as u32
            }
        };

        let sharpen = query.sharp.as_deref() == Some("true");

        Ok(Self {
            source_url,
            scale,
            sharpen,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{RenderQuery, RenderRequest};
    use crate::config::PictureConfig;

    fn query(url: Option<&str>, scale: Option<&str>, sharp: Option<&str>) -> RenderQuery {
        RenderQuery {
            url: url.map(str::to_string),
            scale: scale.map(str::to_string),
            sharp: sharp.map(str::to_string),
        }
    }

    #[test]
    fn defaults_apply_when_optional_params_absent() {
        let req = RenderRequest::from_query(
            &query(Some("http://host/icon.pic"), None, None),
            &PictureConfig::default(),
        )
        .expect("valid");
        assert_eq!(req.scale, 1);
        assert!(!req.sharpen);
    }

    #[test]
    fn missing_or_relative_url_is_rejected() {
        let limits = PictureConfig::default();
        assert!(RenderRequest::from_query(&query(None, None, None), &limits).is_err());
        assert!(RenderRequest::from_query(&query(Some("/icon.pic"), None, None), &limits).is_err());
        assert!(
            RenderRequest::from_query(&query(Some("not a url"), None, None), &limits).is_err()
        );
    }

    #[test]
    fn scale_bounds_are_inclusive() {
        let limits = PictureConfig::default();
        let url = Some("http://host/icon.pic");
        for ok in ["1", "8"] {
            assert!(RenderRequest::from_query(&query(url, Some(ok), None), &limits).is_ok());
        }
        for bad in ["0", "9", "-1", "2.5", "abc", ""] {
            assert!(
                RenderRequest::from_query(&query(url, Some(bad), None), &limits).is_err(),
                "scale={bad} must be rejected"
            );
        }
    }

    #[test]
    fn sharp_requires_exact_literal_true() {
        let limits = PictureConfig::default();
        let url = Some("http://host/icon.pic");
        let on = RenderRequest::from_query(&query(url, None, Some("true")), &limits).expect("ok");
        assert!(on.sharpen);
        for off in ["True", "1", "yes", ""] {
            let req =
                RenderRequest::from_query(&query(url, None, Some(off)), &limits).expect("ok");
            assert!(!req.sharpen, "sharp={off} must not enable sharpen");
        }
    }
}
