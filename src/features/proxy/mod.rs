pub mod handler;

pub use handler::create_proxy_router;
