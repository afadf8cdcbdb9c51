pub mod browser;
pub mod http;
pub mod rendering;
pub mod services;
