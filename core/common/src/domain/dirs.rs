//! 実行時ディレクトリ（XDG / SPEEDLOG_HOME 解決結果）
//!
//! EnvResolver::resolve_dirs() で取得し、設定・ログ・出力 CSV のパス計算に使う。

use std::path::PathBuf;

/// 解決済みの config / state / data ディレクトリ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dirs {
    pub config_dir: PathBuf,
    pub state_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl Dirs {
    /// 全ディレクトリを 1 つのルート配下にまとめる（SPEEDLOG_HOME 用）
    pub fn under(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            config_dir: root.clone(),
            state_dir: root.clone(),
            data_dir: root,
        }
    }

    /// 設定ファイル（config/config.json）
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.json")
    }

    /// ログ格納ディレクトリ（state/logs）
    pub fn logs_dir(&self) -> PathBuf {
        self.state_dir.join("logs")
    }

    /// 構造化ログ（JSONL）のファイル
    pub fn log_file(&self) -> PathBuf {
        self.logs_dir().join("speedlog.jsonl")
    }

    /// 出力 CSV の既定パス
    pub fn default_output_file(&self) -> PathBuf {
        self.data_dir.join("output.csv")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_under_puts_everything_in_root() {
        let dirs = Dirs::under("/srv/speedlog");
        assert_eq!(dirs.config_file(), Path::new("/srv/speedlog/config.json"));
        assert_eq!(dirs.log_file(), Path::new("/srv/speedlog/logs/speedlog.jsonl"));
        assert_eq!(dirs.default_output_file(), Path::new("/srv/speedlog/output.csv"));
    }
}
