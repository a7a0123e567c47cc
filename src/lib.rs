pub mod api;
pub mod avatar;
pub mod cartoon;
pub mod commands;
pub mod config;
pub mod http;
pub mod service;
pub mod validate;

pub use api::Toonify;
pub use config::Config;
pub use http::ApiError;
pub use service::Service;
pub use validate::ImageFile;
