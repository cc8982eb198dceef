/// Shared modules for the traffic dashboard
pub mod acquisition;
pub mod app;
pub mod config;
pub mod error;
pub mod logging;
pub mod mock;
pub mod mode;
pub mod render;
pub mod types;
pub mod websocket;
pub mod widget;
