pub mod config;
pub mod domain;
pub mod mqtt;
pub mod shutdown;
pub mod storage;
pub mod telemetry;

pub use domain::*;
