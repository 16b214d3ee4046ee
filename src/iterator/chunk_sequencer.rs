use crate::config::ScanLimits;
use crate::errors::Result;
use crate::iterator::chunked_file::ChunkedFile;
use crate::iterator::line_reader::FileLineReader;
use log::{debug, warn};
use std::path::PathBuf;
use std::sync::Arc;

/// 把有序的分块文件当作一个逻辑行流顺序读取，同一时刻最多打开一个分块
pub struct ChunkSequencer {
    owner: Arc<ChunkedFile>,
    chunks: Vec<PathBuf>,
    next_index: usize,
    current: Option<FileLineReader>,
    limits: ScanLimits,
    closed: bool,
}

impl ChunkSequencer {
    pub fn new(owner: Arc<ChunkedFile>, limits: ScanLimits) -> Self {
        let chunks = owner.chunk_paths();
        ChunkSequencer {
            owner,
            chunks,
            next_index: 0,
            current: None,
            limits,
            closed: false,
        }
    }

    /// 关闭当前分块并打开下一个，没有剩余分块时返回 `None`
    pub fn advance(&mut self) -> Result<Option<&mut FileLineReader>> {
        self.current = None;
        if self.closed || self.next_index >= self.chunks.len() {
            return Ok(None);
        }

        let path = &self.chunks[self.next_index];
        self.next_index += 1;
        debug!("Opening chunk {}: {}", self.next_index, path.display());
        self.current = Some(FileLineReader::open(path, self.limits)?);
        Ok(self.current.as_mut())
    }

    /// 跨分块读取下一行
    pub fn next_line(&mut self) -> Result<Option<String>> {
        loop {
            if let Some(reader) = self.current.as_mut() {
                if let Some(line) = reader.next_line()? {
                    return Ok(Some(line));
                }
                // 最后一个分块读完后保留句柄，rewind 时可以直接 seek
                if self.next_index >= self.chunks.len() {
                    return Ok(None);
                }
            }
            if self.advance()?.is_none() {
                return Ok(None);
            }
        }
    }

    /// 回到第一个分块的开头
    ///
    /// 只有一个分块且句柄仍打开时先尝试 seek，失败后从路径重新打开。
    pub fn rewind(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        if self.chunks.len() == 1 {
            if let Some(reader) = self.current.as_mut() {
                match reader.rewind() {
                    Ok(()) => return Ok(()),
                    Err(e) => warn!(
                        "Seek failed on {}, reopening: {}",
                        self.chunks[0].display(),
                        e
                    ),
                }
            }
        }

        self.current = None;
        self.next_index = 0;
        self.advance()?;
        Ok(())
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    /// 关闭当前句柄，并且只调用一次所属 ChunkedFile 的 cleanup
    pub fn close(&mut self) -> Result<()> {
        self.current = None;
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.owner.cleanup()
    }
}
