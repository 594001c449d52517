pub mod app;
pub mod config;
pub mod http;
pub mod logs;
pub mod oauth1;
pub mod persistence;
pub mod profile;
pub mod sanitize;
pub mod timeline;
