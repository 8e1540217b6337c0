pub mod app;
pub mod config;
pub mod error;
pub mod fetch;
pub mod install;
pub mod net;
pub mod resolve;
pub mod stream;
pub mod version;
