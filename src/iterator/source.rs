use crate::config::EngineConfig;
use crate::errors::Result;
use crate::iterator::counter::count_lines;
use crate::iterator::credential_iterator::IteratorConfig;
use crate::iterator::line_source::FileLines;
use std::path::{Path, PathBuf};

/// 凭据数据源，分类之后在迭代器生命周期内不再改变
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    // 单个字面量
    Literal(String),
    // 常驻内存的列表（默认字典）
    List(Vec<String>),
    // 按行惰性读取的文件
    File(PathBuf),
}

impl CredentialSource {
    /// 对非空的原始值分类：存在的文件 -> File，否则 -> Literal
    pub fn classify(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            None
        } else if Path::new(raw).is_file() {
            Some(CredentialSource::File(PathBuf::from(raw)))
        } else {
            Some(CredentialSource::Literal(raw.to_string()))
        }
    }

    /// 打开数据源，得到一个独占的游标
    pub fn open(&self, config: &EngineConfig) -> Result<SourceCursor> {
        match self {
            CredentialSource::Literal(value) => Ok(SourceCursor::values(vec![value.clone()])),
            CredentialSource::List(values) => Ok(SourceCursor::values(values.clone())),
            CredentialSource::File(path) => Ok(SourceCursor::File(FileLines::open(path, config)?)),
        }
    }

    /// 条目数量，文件按迭代器相同的规则数行
    pub fn count(&self, config: &EngineConfig) -> Result<u64> {
        match self {
            CredentialSource::Literal(_) => Ok(1),
            CredentialSource::List(values) => Ok(values.len() as u64),
            CredentialSource::File(path) => count_lines(path, config.scanner),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CredentialSource::Literal(_) => "literal",
            CredentialSource::List(_) => "list",
            CredentialSource::File(_) => "file",
        }
    }
}

/// 用户名来源：未指定时使用默认字典
pub fn resolve_user(config: &IteratorConfig) -> CredentialSource {
    CredentialSource::classify(&config.user).unwrap_or_else(|| {
        CredentialSource::List(config.wordlists.users(&config.version, &config.host.service))
    })
}

/// 密码来源：未指定时使用空密码或默认字典
pub fn resolve_password(config: &IteratorConfig) -> CredentialSource {
    CredentialSource::classify(&config.password).unwrap_or_else(|| {
        if config.engine.use_empty_password {
            CredentialSource::List(vec![String::new()])
        } else {
            CredentialSource::List(
                config
                    .wordlists
                    .passwords(&config.version, &config.host.service),
            )
        }
    })
}

pub fn resolve_combo(config: &IteratorConfig) -> Option<CredentialSource> {
    CredentialSource::classify(&config.combo)
}

/// 数据源游标：把句柄和读取位置放在一个对象里，支持 读取 / 重置 / 关闭
pub enum SourceCursor {
    Values { values: Vec<String>, position: usize },
    File(FileLines),
}

impl SourceCursor {
    pub fn values(values: Vec<String>) -> Self {
        SourceCursor::Values {
            values,
            position: 0,
        }
    }

    pub fn next_value(&mut self) -> Result<Option<String>> {
        match self {
            SourceCursor::Values { values, position } => {
                let value = values.get(*position).cloned();
                if value.is_some() {
                    *position += 1;
                }
                Ok(value)
            }
            SourceCursor::File(lines) => lines.next_line(),
        }
    }

    pub fn reset(&mut self) -> Result<()> {
        match self {
            SourceCursor::Values { position, .. } => {
                *position = 0;
                Ok(())
            }
            SourceCursor::File(lines) => lines.reset(),
        }
    }

    pub fn close(&mut self) -> Result<()> {
        match self {
            SourceCursor::Values { .. } => Ok(()),
            SourceCursor::File(lines) => lines.close(),
        }
    }
}
