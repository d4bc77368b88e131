pub mod chunksys;

pub use chunksys::{ChunkSysConfig, ConfigError};
