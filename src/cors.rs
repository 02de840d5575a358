use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};

use crate::config::CorsConfig;

/// 根据配置构建 CORS 中间件。
///
/// 边缘端点不携带凭证，方法与请求头一律放开，仅按配置收敛 Origin。
pub fn build_cors_layer(cors: &CorsConfig) -> Option<CorsLayer> {
    if !cors.enabled {
        return None;
    }

    let (any_origin, origins) = parse_allowed_origins(&cors.allowed_origins);
    if !any_origin && origins.is_empty() {
        tracing::warn!("CORS 已启用但 allowed_origins 为空，已跳过启用");
        return None;
    }

    let mut layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if any_origin {
        layer = layer.allow_origin(Any);
    } else {
        layer = layer.allow_origin(origins);
    }

    Some(layer)
}

fn parse_allowed_origins(values: &[String]) -> (bool, Vec<HeaderValue>) {
    let mut any = false;
    let mut origins = Vec::new();
    for raw in values {
        let value = raw.trim();
        if value.is_empty() {
            continue;
        }
        if value == "*" {
            any = true;
            continue;
        }
        match HeaderValue::from_str(value) {
            Ok(v) => origins.push(v),
            Err(_) => tracing::warn!("CORS allowed_origins 含无效值: {}", value),
        }
    }
    (any, origins)
}

#[cfg(test)]
mod tests {
    use super::{build_cors_layer, parse_allowed_origins};
    use crate::config::CorsConfig;

    #[test]
    fn build_cors_layer_skips_when_disabled() {
        let layer = build_cors_layer(&CorsConfig::default());
        assert!(layer.is_none());
    }

    #[test]
    fn build_cors_layer_skips_when_origins_empty() {
        let cors = CorsConfig {
            enabled: true,
            allowed_origins: Vec::new(),
        };
        assert!(build_cors_layer(&cors).is_none());
    }

    #[test]
    fn parse_allowed_origins_detects_wildcard_and_trims() {
        let (any, origins) =
            parse_allowed_origins(&["*".to_string(), " https://market.example ".to_string()]);
        assert!(any);
        assert_eq!(origins.len(), 1);
    }
}
