use crate::config::ScanLimits;
use crate::errors::{CredError, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Seek, SeekFrom};
use std::path::Path;

/// 有界按行读取器
///
/// 按 `\n` 切分，去掉行尾的一个 `\r`；最后一行没有换行符也算一行；
/// 空行照常返回。行内容超过 `max_line_length` 时返回 [`CredError::LineTooLong`]，
/// 不做截断。
pub struct LineReader<R> {
    inner: R,
    max_line_length: usize,
    line: Vec<u8>,
}

pub type FileLineReader = LineReader<BufReader<File>>;

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R, max_line_length: usize) -> Self {
        LineReader {
            inner,
            max_line_length,
            line: Vec::new(),
        }
    }

    /// 读取下一行，读到文件末尾时返回 `None`
    pub fn next_line(&mut self) -> Result<Option<String>> {
        Ok(self
            .next_raw()?
            .map(|raw| String::from_utf8_lossy(raw).into_owned()))
    }

    /// 读取下一行的原始字节（不含行尾）
    pub fn next_raw(&mut self) -> Result<Option<&[u8]>> {
        self.line.clear();
        loop {
            let available = self.inner.fill_buf()?;
            if available.is_empty() {
                if self.line.is_empty() {
                    return Ok(None);
                }
                break;
            }

            let (consumed, found_newline) = match available.iter().position(|&b| b == b'\n') {
                Some(pos) => {
                    self.line.extend_from_slice(&available[..pos]);
                    (pos + 1, true)
                }
                None => {
                    self.line.extend_from_slice(available);
                    (available.len(), false)
                }
            };
            self.inner.consume(consumed);

            // 多留一个字节给可能存在的 \r
            if self.line.len() > self.max_line_length + 1 {
                return Err(CredError::LineTooLong(self.max_line_length));
            }
            if found_newline {
                break;
            }
        }

        if self.line.last() == Some(&b'\r') {
            self.line.pop();
        }
        if self.line.len() > self.max_line_length {
            return Err(CredError::LineTooLong(self.max_line_length));
        }
        Ok(Some(&self.line))
    }
}

impl<R: BufRead + Seek> LineReader<R> {
    /// 回到流的起始位置，丢弃已缓冲的数据
    pub fn rewind(&mut self) -> io::Result<()> {
        self.line.clear();
        self.inner.seek(SeekFrom::Start(0))?;
        Ok(())
    }
}

impl FileLineReader {
    /// 按扫描限制打开文件
    pub fn open(path: &Path, limits: ScanLimits) -> Result<Self> {
        limits.validate()?;
        let file = File::open(path).map_err(|e| CredError::file(path, e))?;
        Ok(LineReader::new(
            BufReader::with_capacity(limits.buffer_size, file),
            limits.max_line_length,
        ))
    }
}
