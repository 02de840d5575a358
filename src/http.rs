use once_cell::sync::OnceCell;
use reqwest::{Client, redirect};

/// 全局复用的 HTTP Client（统一连接池/Keep-Alive），避免每次请求重复创建。
///
/// 说明：
/// - 本层不设置超时：上游抓取的时限由部署侧（反代/运行时）统一约束。
/// - `Client` 本身是线程安全的，适合全局复用。
static CLIENT_FETCH: OnceCell<Client> = OnceCell::new();
static CLIENT_PROXY: OnceCell<Client> = OnceCell::new();

/// 图片抓取用 HTTP Client（默认跟随重定向）。
pub fn client_fetch() -> Result<&'static Client, reqwest::Error> {
    CLIENT_FETCH.get_or_try_init(|| Client::builder().build())
}

/// 反向代理用 HTTP Client。
///
/// 重定向不自动跟随：3xx 原样中继给调用方，保留上游的跳转语义。
pub fn client_proxy() -> Result<&'static Client, reqwest::Error> {
    CLIENT_PROXY.get_or_try_init(|| Client::builder().redirect(redirect::Policy::none()).build())
}
