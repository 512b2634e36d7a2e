pub mod config;
pub mod melody;
