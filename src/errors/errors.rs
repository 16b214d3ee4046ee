use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::path::PathBuf;

// 凭据枚举引擎的错误类型
#[derive(Debug)]
pub enum CredError {
    // 配置错误（组合字面量缺少冒号、配置文件非法等）
    ConfigError(String),
    // 通用IO错误
    IoError(io::Error),
    // 打开/创建/读取指定文件失败
    FileError { path: PathBuf, source: io::Error },
    // 单行超过最大长度限制
    LineTooLong(usize),
    // 组合文件中的格式错误行（只记录日志，不中断迭代）
    FormatError(String),
}

pub type Result<T> = std::result::Result<T, CredError>;

impl CredError {
    pub fn file(path: impl Into<PathBuf>, source: io::Error) -> Self {
        CredError::FileError {
            path: path.into(),
            source,
        }
    }
}

impl fmt::Display for CredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredError::ConfigError(e) => write!(f, "Configuration error: {}", e),
            CredError::IoError(e) => write!(f, "IO error: {}", e),
            CredError::FileError { path, source } => {
                write!(f, "IO error on {}: {}", path.display(), source)
            }
            CredError::LineTooLong(limit) => {
                write!(f, "Line exceeds maximum length of {} bytes", limit)
            }
            CredError::FormatError(line) => write!(f, "Invalid combo line: {}", line),
        }
    }
}

impl StdError for CredError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            CredError::IoError(e) => Some(e),
            CredError::FileError { source, .. } => Some(source),
            _ => None,
        }
    }
}

// 从IO错误转换
impl From<io::Error> for CredError {
    fn from(error: io::Error) -> Self {
        CredError::IoError(error)
    }
}

// 从TOML解析错误转换
impl From<toml::de::Error> for CredError {
    fn from(error: toml::de::Error) -> Self {
        CredError::ConfigError(error.to_string())
    }
}
