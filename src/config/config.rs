use crate::errors::{CredError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// 默认分块大小：500 MiB
pub const DEFAULT_CHUNK_SIZE: u64 = 500 * 1024 * 1024;
/// 超过该大小的文件会被自动分块：1 GiB
pub const DEFAULT_LARGE_FILE_THRESHOLD: u64 = 1024 * 1024 * 1024;
/// 读取缓冲区大小：64 KiB
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;
/// 单行最大长度：1 MiB
pub const DEFAULT_MAX_LINE_LENGTH: usize = 1024 * 1024;

/// 大文件分块配置
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChunkConfig {
    /// 关闭自动分块
    pub disabled: bool,
    /// 触发分块的文件大小阈值（字节）
    pub large_file_threshold: u64,
    /// 每个分块的最大字节数
    pub chunk_size: u64,
    /// 分块临时目录的父目录，为空时使用系统临时目录
    pub temp_root: Option<PathBuf>,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        ChunkConfig {
            disabled: false,
            large_file_threshold: DEFAULT_LARGE_FILE_THRESHOLD,
            chunk_size: DEFAULT_CHUNK_SIZE,
            temp_root: None,
        }
    }
}

impl ChunkConfig {
    pub fn disabled() -> Self {
        ChunkConfig {
            disabled: true,
            ..ChunkConfig::default()
        }
    }
}

/// 按行读取的缓冲区和行长限制，迭代器、分块器和计数器共用
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScanLimits {
    pub buffer_size: usize,
    pub max_line_length: usize,
}

impl ScanLimits {
    /// 缓冲区为 0 时 fill_buf 永远返回空，会被当成文件结束
    pub fn validate(&self) -> Result<()> {
        if self.buffer_size == 0 {
            return Err(CredError::ConfigError(
                "buffer_size must be greater than zero".to_string(),
            ));
        }
        if self.max_line_length == 0 {
            return Err(CredError::ConfigError(
                "max_line_length must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ScanLimits {
    fn default() -> Self {
        ScanLimits {
            buffer_size: DEFAULT_BUFFER_SIZE,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }
}

/// 引擎配置，从配置文件中读取或直接构造
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// 未指定密码时只尝试空密码，而不是默认字典
    pub use_empty_password: bool,
    pub chunking: ChunkConfig,
    pub scanner: ScanLimits,
}

impl EngineConfig {
    /// 从配置文件中加载配置
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CredError::file(path, e))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 检查配置中的数值是否合法
    pub fn validate(&self) -> Result<()> {
        if self.chunking.chunk_size == 0 {
            return Err(CredError::ConfigError(
                "chunk_size must be greater than zero".to_string(),
            ));
        }
        self.scanner.validate()
    }

    pub fn with_use_empty_password(mut self, use_empty_password: bool) -> Self {
        self.use_empty_password = use_empty_password;
        self
    }

    pub fn with_chunking(mut self, chunking: ChunkConfig) -> Self {
        self.chunking = chunking;
        self
    }

    pub fn with_scanner(mut self, scanner: ScanLimits) -> Self {
        self.scanner = scanner;
        self
    }
}
