pub mod config;
pub mod infer;
pub mod relay;
pub mod service;
