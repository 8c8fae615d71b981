pub mod config;
pub mod dashboard;
pub mod host;
pub mod logging;
pub mod settings;
pub mod version;
