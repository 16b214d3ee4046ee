use crate::config::{ChunkConfig, ScanLimits};
use crate::errors::{CredError, Result};
use crate::iterator::line_reader::FileLineReader;
use log::{debug, info};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tempfile::TempDir;

const CHUNK_DIR_PREFIX: &str = "cred-chunks-";

// 受锁保护的分块状态
struct ChunkState {
    chunk_paths: Vec<PathBuf>,
    temp_dir: Option<TempDir>,
    is_chunked: bool,
}

/// 大文件分块管理器
///
/// 小文件（或关闭分块时）原样包装，分块列表只有原文件本身；
/// 大文件按行切分成若干个不超过 `chunk_size` 的有序分块文件，
/// 放在自己独占的临时目录中。分块列表、分块标记和临时目录的读写都在同一把锁下进行，
/// 计数和消费可以同时访问同一个实例。
pub struct ChunkedFile {
    original_path: PathBuf,
    chunk_size: u64,
    state: Mutex<ChunkState>,
}

impl ChunkedFile {
    pub fn new(path: impl AsRef<Path>, config: &ChunkConfig, limits: ScanLimits) -> Result<Self> {
        let path = path.as_ref();
        limits.validate()?;
        let unchunked = ChunkedFile {
            original_path: path.to_path_buf(),
            chunk_size: config.chunk_size,
            state: Mutex::new(ChunkState {
                chunk_paths: vec![path.to_path_buf()],
                temp_dir: None,
                is_chunked: false,
            }),
        };

        if config.disabled {
            return Ok(unchunked);
        }

        let metadata = fs::metadata(path).map_err(|e| CredError::file(path, e))?;
        if metadata.len() < config.large_file_threshold {
            return Ok(unchunked);
        }

        info!(
            "Large file detected ({} MB), creating chunks...",
            metadata.len() / (1024 * 1024)
        );
        unchunked.create_chunks(config, limits)?;
        Ok(unchunked)
    }

    fn state(&self) -> MutexGuard<'_, ChunkState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // 按行切分原文件，一行不会跨两个分块
    fn create_chunks(&self, config: &ChunkConfig, limits: ScanLimits) -> Result<()> {
        let mut state = self.state();
        if state.is_chunked {
            return Ok(());
        }

        let mut builder = tempfile::Builder::new();
        builder.prefix(CHUNK_DIR_PREFIX);
        let temp_dir = match &config.temp_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
        .map_err(|e| {
            let root = config.temp_root.clone().unwrap_or_else(std::env::temp_dir);
            CredError::file(root, e)
        })?;

        let mut reader = FileLineReader::open(&self.original_path, limits)?;
        let mut chunk_paths: Vec<PathBuf> = Vec::new();
        let mut writer: Option<BufWriter<File>> = None;
        let mut current_size: u64 = 0;

        // 出错提前返回时 temp_dir 被 drop，已写出的分块随之删除
        while let Some(line) = reader.next_raw()? {
            let line_size = line.len() as u64 + 1;

            if writer.is_none() || current_size + line_size > self.chunk_size {
                if let Some(mut previous) = writer.take() {
                    previous.flush()?;
                }

                let chunk_path = temp_dir
                    .path()
                    .join(format!("chunk_{:04}.txt", chunk_paths.len()));
                let file = File::create(&chunk_path).map_err(|e| CredError::file(&chunk_path, e))?;
                info!("Created chunk {}: {}", chunk_paths.len() + 1, chunk_path.display());
                chunk_paths.push(chunk_path);
                writer = Some(BufWriter::new(file));
                current_size = 0;
            }

            if let Some(out) = writer.as_mut() {
                out.write_all(line)?;
                out.write_all(b"\n")?;
            }
            current_size += line_size;
        }

        if let Some(mut last) = writer.take() {
            last.flush()?;
        }

        info!("Successfully created {} chunks", chunk_paths.len());
        state.chunk_paths = chunk_paths;
        state.temp_dir = Some(temp_dir);
        state.is_chunked = true;
        Ok(())
    }

    /// 删除本实例创建的临时目录和全部分块，可重复调用
    pub fn cleanup(&self) -> Result<()> {
        let mut state = self.state();
        let Some(temp_dir) = state.temp_dir.as_ref() else {
            return Ok(());
        };

        info!("Cleaning up temporary chunk files in {}", temp_dir.path().display());
        fs::remove_dir_all(temp_dir.path()).map_err(|e| CredError::file(temp_dir.path(), e))?;

        state.temp_dir = None;
        state.chunk_paths.clear();
        state.is_chunked = false;
        Ok(())
    }

    pub fn original_path(&self) -> &Path {
        &self.original_path
    }

    pub fn chunk_size(&self) -> u64 {
        self.chunk_size
    }

    pub fn chunk_paths(&self) -> Vec<PathBuf> {
        self.state().chunk_paths.clone()
    }

    pub fn is_chunked(&self) -> bool {
        self.state().is_chunked
    }

    pub fn temp_dir(&self) -> Option<PathBuf> {
        self.state().temp_dir.as_ref().map(|dir| dir.path().to_path_buf())
    }
}

/// 统计所有分块的总行数
pub fn count_lines_in_chunked_file(chunked: &ChunkedFile, limits: ScanLimits) -> Result<u64> {
    let mut count = 0;
    for chunk_path in chunked.chunk_paths() {
        let mut reader = FileLineReader::open(&chunk_path, limits)?;
        while reader.next_raw()?.is_some() {
            count += 1;
        }
    }
    debug!("Counted {} lines in {}", count, chunked.original_path().display());
    Ok(count)
}

/// 依次把每一行交给回调，回调出错时立即停止
pub fn read_lines_from_chunked_file<F>(
    chunked: &ChunkedFile,
    limits: ScanLimits,
    mut callback: F,
) -> Result<()>
where
    F: FnMut(&str) -> Result<()>,
{
    for chunk_path in chunked.chunk_paths() {
        let mut reader = FileLineReader::open(&chunk_path, limits)?;
        while let Some(line) = reader.next_line()? {
            callback(&line)?;
        }
    }
    Ok(())
}
