//! ファイルへ JSONL で追記する Log 実装
//!
//! ログの出力先はファイルのみ。コンソール表示は StderrLog が担当し、FanoutLog で束ねる。

use crate::error::Error;
use crate::ports::outbound::{FileSystem, Log, LogRecord};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// ファイルへ JSONL を追記する Log 実装
pub struct FileJsonLog {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
}

impl FileJsonLog {
    /// ログファイルパスへ追記する logger を生成する。
    /// 親ディレクトリが無ければ作成する（初回書き込み時）。
    pub fn new(fs: Arc<dyn FileSystem>, path: impl AsRef<Path>) -> Self {
        Self {
            fs,
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl Log for FileJsonLog {
    fn log(&self, record: &LogRecord) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            self.fs.create_dir_all(parent)?;
        }
        let mut line = serde_json::to_string(record)?;
        line.push('\n');
        let mut w = self.fs.open_append(&self.path)?;
        w.write_all(line.as_bytes())?;
        w.flush()?;
        Ok(())
    }
}

/// 複数の Log へ同じレコードを流す。個々の失敗は無視する（ログ失敗で本処理を止めない）。
pub struct FanoutLog {
    logs: Vec<Arc<dyn Log>>,
}

impl FanoutLog {
    pub fn new(logs: Vec<Arc<dyn Log>>) -> Self {
        Self { logs }
    }
}

impl Log for FanoutLog {
    fn log(&self, record: &LogRecord) -> Result<(), Error> {
        for l in &self.logs {
            let _ = l.log(record);
        }
        Ok(())
    }
}

/// 何も出力しない Log 実装（テスト用）
#[derive(Debug, Clone, Default)]
pub struct NoopLog;

impl Log for NoopLog {
    fn log(&self, _record: &LogRecord) -> Result<(), Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::StdFileSystem;
    use crate::ports::outbound::LogLevel;

    #[test]
    fn test_noop_log() {
        let rec = LogRecord::new(LogLevel::Info, "cli", "lifecycle", "test");
        assert!(NoopLog.log(&rec).is_ok());
    }

    #[test]
    fn test_file_json_log_appends_lines_and_creates_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("speedlog.jsonl");
        let log = FileJsonLog::new(Arc::new(StdFileSystem), &path);

        log.log(&LogRecord::new(LogLevel::Info, "cli", "lifecycle", "one")).unwrap();
        log.log(&LogRecord::new(LogLevel::Warn, "usecase", "record", "two")).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["level"], "warn");
        assert_eq!(second["message"], "two");
    }

    struct FailingLog;

    impl Log for FailingLog {
        fn log(&self, _record: &LogRecord) -> Result<(), Error> {
            Err(Error::io_msg("disk full"))
        }
    }

    #[test]
    fn test_fanout_ignores_failures() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jsonl");
        let fanout = FanoutLog::new(vec![
            Arc::new(FailingLog),
            Arc::new(FileJsonLog::new(Arc::new(StdFileSystem), &path)),
        ]);
        fanout
            .log(&LogRecord::new(LogLevel::Error, "usecase", "error", "boom"))
            .unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("boom"));
    }
}
