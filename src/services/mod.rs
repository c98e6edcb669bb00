pub mod advisory;
pub mod classifier;
pub mod config_service;
pub mod fs_service;
pub mod pipeline;
pub mod session;
