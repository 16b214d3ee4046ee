use crate::config::ScanLimits;
use crate::errors::{CredError, Result};
use crate::iterator::credential_iterator::{IterationMode, IteratorConfig};
use crate::iterator::line_reader::FileLineReader;
use crate::iterator::source::{CredentialSource, resolve_combo, resolve_password, resolve_user};
use log::debug;
use std::path::Path;
use timing_macro::timing;

/// 统计文件行数，扫描规则与迭代器一致（空行也算一行）
pub fn count_lines(path: &Path, limits: ScanLimits) -> Result<u64> {
    let mut reader = FileLineReader::open(path, limits)?;
    let mut count = 0;
    while reader.next_raw()?.is_some() {
        count += 1;
    }
    Ok(count)
}

/// 统计组合文件中格式正确（含冒号）的行数
pub fn count_combo_lines(path: &Path, limits: ScanLimits) -> Result<u64> {
    let mut reader = FileLineReader::open(path, limits)?;
    let mut count = 0;
    while let Some(line) = reader.next_raw()? {
        if line.contains(&b':') {
            count += 1;
        }
    }
    Ok(count)
}

/// 计算完整迭代会产生的凭据总数，不保存任何行内容，也不改变迭代器状态
///
/// 与 [`CredentialIterator`](crate::iterator::CredentialIterator) 使用相同的数据源解析规则，
/// 大文件直接扫描原文件（分块拼接后的行序列与原文件相同）。
#[timing]
pub fn count_credentials(config: &IteratorConfig) -> Result<u64> {
    let engine = &config.engine;
    let total = match config.mode() {
        IterationMode::Combo => match resolve_combo(config) {
            Some(CredentialSource::File(path)) => count_combo_lines(&path, engine.scanner)?,
            _ if config.combo.contains(':') => 1,
            _ => {
                return Err(CredError::ConfigError(
                    "invalid combo format, expected user:password".to_string(),
                ));
            }
        },
        IterationMode::PasswordOnly => resolve_password(config).count(engine)?,
        IterationMode::Standard => {
            let users = resolve_user(config).count(engine)?;
            let passwords = resolve_password(config).count(engine)?;
            users.saturating_mul(passwords)
        }
    };
    debug!("Total credentials for {}: {}", config.host, total);
    Ok(total)
}
