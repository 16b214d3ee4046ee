use crate::config::EngineConfig;
use crate::errors::Result;
use crate::iterator::chunk_sequencer::ChunkSequencer;
use crate::iterator::chunked_file::ChunkedFile;
use log::warn;
use std::path::Path;
use std::sync::Arc;

/// 文件行源：对消费者隐藏文件是否被分块
///
/// 一个实例独占一份文件资源，提供 打开 / 读行 / 重置 / 关闭 四个操作。
pub struct FileLines {
    chunked: Arc<ChunkedFile>,
    sequencer: ChunkSequencer,
}

impl FileLines {
    /// 按配置决定是否分块，并打开第一个分块
    pub fn open(path: impl AsRef<Path>, config: &EngineConfig) -> Result<Self> {
        let chunked = Arc::new(ChunkedFile::new(&path, &config.chunking, config.scanner)?);
        let mut lines = FileLines::from_chunked(chunked, config);
        let opened = lines.sequencer.advance().map(|_| ());
        if let Err(e) = opened {
            // 打开失败时不留下分块目录
            if let Err(close_err) = lines.close() {
                warn!("Failed to clean up after open error: {}", close_err);
            }
            return Err(e);
        }
        Ok(lines)
    }

    pub fn from_chunked(chunked: Arc<ChunkedFile>, config: &EngineConfig) -> Self {
        FileLines {
            sequencer: ChunkSequencer::new(chunked.clone(), config.scanner),
            chunked,
        }
    }

    pub fn next_line(&mut self) -> Result<Option<String>> {
        self.sequencer.next_line()
    }

    pub fn reset(&mut self) -> Result<()> {
        self.sequencer.rewind()
    }

    pub fn close(&mut self) -> Result<()> {
        self.sequencer.close()
    }

    pub fn chunked_file(&self) -> &Arc<ChunkedFile> {
        &self.chunked
    }

    pub fn is_open(&self) -> bool {
        self.sequencer.is_open()
    }
}
