use std::future::IntoFuture;

use axum::{Router, routing::get};
use market_edge::features::{health, picture, proxy};
use market_edge::{AppConfig, AppState, ShutdownManager};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        market_edge::features::picture::handler::render_picture,
        market_edge::features::proxy::handler::forward_request,
        market_edge::features::health::handler::health_check,
    ),
    components(schemas(market_edge::features::health::handler::HealthResponse)),
    tags(
        (name = "Image", description = "Image transcoding APIs"),
        (name = "Proxy", description = "Restricted proxy APIs"),
        (name = "Health", description = "Health APIs"),
    ),
    info(
        title = "Market Edge API",
        version = "0.1.0",
        description = "MineOS market edge service (Axum)"
    )
)]
pub struct ApiDoc;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "market_edge=info,tower_http=info".into()),
        )
        .init();

    // 创建优雅退出管理器
    let shutdown_manager = ShutdownManager::new();

    // Load config
    if let Err(e) = AppConfig::init_global() {
        tracing::error!("Config init failed: {}", e);
        std::process::exit(1);
    }
    let config = AppConfig::global();

    // 启动信号处理器
    if let Err(e) = shutdown_manager.start_signal_handler() {
        tracing::error!("信号处理器启动失败: {}", e);
        std::process::exit(1);
    }

    // Shared state：边缘层无共享可变状态，只挂载编解码器
    let app_state = AppState::new();

    // Routes
    let api_router = Router::<AppState>::new()
        .merge(picture::create_picture_router())
        .merge(proxy::create_proxy_router());

    let mut app = Router::<AppState>::new()
        .route("/health", get(health::health_check))
        .nest(&config.api.prefix, api_router)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state);

    // 全局 request_id 透传
    app = app.layer(axum::middleware::from_fn(
        market_edge::request_id::request_id_middleware,
    ));

    // CORS（默认关闭，按配置启用）
    if let Some(cors) = market_edge::cors::build_cors_layer(&config.cors) {
        app = app.layer(cors);
    }

    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Bind address failed {}: {}", addr, e);
            std::process::exit(1);
        });

    tracing::info!("Server: http://{}", addr);
    tracing::info!("Docs: http://{}/docs", addr);
    tracing::info!("Health: http://{}/health", addr);
    tracing::info!("Image API: http://{}{}/image", addr, config.api.prefix);
    tracing::info!("Proxy API: http://{}{}/proxy", addr, config.api.prefix);

    // 启动服务器并等待优雅退出信号
    let graceful = axum::serve(listener, app)
        .with_graceful_shutdown({
            let manager = shutdown_manager.clone();
            async move {
                let reason = manager.wait_for_shutdown().await;
                tracing::info!("接收到退出信号: {:?}，开始优雅关闭HTTP服务器...", reason);
            }
        })
        .into_future();
    tokio::pin!(graceful);

    // 在途连接允许继续排空，但不超过配置的优雅退出时限
    let force_quit = async {
        shutdown_manager.wait_for_shutdown().await;
        tokio::time::sleep(config.shutdown.timeout_duration()).await;
    };

    tokio::select! {
        result = &mut graceful => {
            if let Err(e) = result {
                tracing::error!("服务器运行错误: {}", e);
                std::process::exit(1);
            }
            tracing::info!("服务器已优雅关闭");
        }
        _ = force_quit => {
            tracing::warn!("优雅退出超时（{}秒），强制退出", config.shutdown.timeout_secs);
        }
    }
}
