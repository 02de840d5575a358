use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

/// 全局配置单例
static CONFIG: OnceCell<AppConfig> = OnceCell::new();

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "ServerConfig::default_host")]
    pub host: String,
    /// 监听端口
    #[serde(default = "ServerConfig::default_port")]
    pub port: u16,
}

impl ServerConfig {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }
    fn default_port() -> u16 {
        3000
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_string()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
        }
    }
}

/// API 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API 路由前缀
    #[serde(default = "ApiConfig::default_prefix")]
    pub prefix: String,
}

impl ApiConfig {
    fn default_prefix() -> String {
        "/api".to_string()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            prefix: Self::default_prefix(),
        }
    }
}

/// CORS 配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CorsConfig {
    /// 是否启用 CORS
    #[serde(default)]
    pub enabled: bool,
    /// 允许的 Origin 列表（支持 "*" 表示任意）
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// 图片渲染配置
///
/// 上限取值与前端约定一致：64×16 的图标在 8 倍放大下最多输出 512×128 像素，
/// 该上界限定了单次请求的最大输出体积。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PictureConfig {
    /// 放大倍数上限（请求中 scale 的闭区间上界，下界恒为 1）
    #[serde(default = "PictureConfig::default_max_scale")]
    pub max_scale: u32,
    /// 解码后图片宽度上限（字符格）
    #[serde(default = "PictureConfig::default_max_width")]
    pub max_width: u32,
    /// 解码后图片高度上限（字符格）
    #[serde(default = "PictureConfig::default_max_height")]
    pub max_height: u32,
}

impl PictureConfig {
    fn default_max_scale() -> u32 {
        8
    }
    fn default_max_width() -> u32 {
        64
    }
    fn default_max_height() -> u32 {
        16
    }
}

impl Default for PictureConfig {
    fn default() -> Self {
        Self {
            max_scale: Self::default_max_scale(),
            max_width: Self::default_max_width(),
            max_height: Self::default_max_height(),
        }
    }
}

/// 反向代理配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// 允许转发的上游路径前缀列表。
    ///
    /// 仅校验 path 前缀，不限制 host 与 query；目的是防止本服务被当作
    /// 任意路径的开放中继，而不是做完整的上游白名单。
    #[serde(default = "ProxyConfig::default_allowed_path_prefixes")]
    pub allowed_path_prefixes: Vec<String>,
}

impl ProxyConfig {
    fn default_allowed_path_prefixes() -> Vec<String> {
        vec!["/MineOSAPI/2.04/".to_string()]
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            allowed_path_prefixes: Self::default_allowed_path_prefixes(),
        }
    }
}

/// 优雅退出配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShutdownConfig {
    /// 优雅退出超时时间（秒）
    #[serde(default = "ShutdownConfig::default_timeout")]
    pub timeout_secs: u64,
}

impl ShutdownConfig {
    fn default_timeout() -> u64 {
        30
    }

    /// 获取优雅退出超时时间
    pub fn timeout_duration(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            timeout_secs: Self::default_timeout(),
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub api: ApiConfig,
    /// CORS 配置
    #[serde(default)]
    pub cors: CorsConfig,
    /// 图片渲染配置
    #[serde(default)]
    pub picture: PictureConfig,
    /// 反向代理配置
    #[serde(default)]
    pub proxy: ProxyConfig,
    /// 优雅退出配置
    #[serde(default)]
    pub shutdown: ShutdownConfig,
}

impl AppConfig {
    /// 从配置文件加载配置，支持环境变量覆盖。
    ///
    /// config.toml 允许缺省：所有字段均有默认值，空配置也能启动。
    pub fn load() -> Result<Self, ConfigError> {
        let builder = ConfigBuilder::builder()
            // 加载配置文件（可选）
            .add_source(File::with_name("config").required(false))
            // 支持环境变量覆盖，例如：APP_API_PREFIX
            .add_source(
                Environment::with_prefix("APP")
                    .separator("_")
                    .try_parsing(true),
            )
            .build()?;

        builder.try_deserialize()
    }

    /// 获取全局配置单例
    pub fn global() -> &'static AppConfig {
        CONFIG.get().expect("配置未初始化，请先调用 init_global()")
    }

    /// 初始化全局配置
    pub fn init_global() -> Result<(), ConfigError> {
        let config = Self::load()?;
        CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("配置已经被初始化".to_string()))?;
        Ok(())
    }

    /// 测试辅助：直接以给定配置初始化全局单例（重复初始化时忽略）
    pub fn init_global_with(config: AppConfig) {
        let _ = CONFIG.set(config);
    }

    /// 获取服务器监听地址
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
