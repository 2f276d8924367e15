//! CSV ファイルへ 1 行追記する RecordSink 実装
//!
//! 書き込みごとに追記モードで開き、flush して閉じる（ファイルを保持し続けない）。

use crate::domain::SpeedRecord;
use crate::ports::outbound::RecordSink;
use common::error::Error;
use common::ports::outbound::FileSystem;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// 出力 CSV への追記
pub struct CsvFileSink {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
}

impl CsvFileSink {
    pub fn new(fs: Arc<dyn FileSystem>, path: impl AsRef<Path>) -> Self {
        Self {
            fs,
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl RecordSink for CsvFileSink {
    fn append(&self, record: &SpeedRecord) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                self.fs.create_dir_all(parent)?;
            }
        }
        let line = record.to_csv_line();
        let mut w = self.fs.open_append(&self.path)?;
        w.write_all(line.as_bytes()).map_err(|e| {
            Error::io_msg(format!("Failed to write '{}': {}", self.path.display(), e))
        })?;
        w.flush().map_err(|e| {
            Error::io_msg(format!("Failed to flush '{}': {}", self.path.display(), e))
        })?;
        Ok(())
    }
}
