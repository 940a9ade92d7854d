pub mod load_config;

pub use load_config::LoadConfig;
