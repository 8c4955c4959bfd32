pub mod api;
pub mod config;
pub mod pipeline;
pub mod session;
