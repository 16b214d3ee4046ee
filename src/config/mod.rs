pub mod config;

pub use config::{ChunkConfig, EngineConfig, ScanLimits};
