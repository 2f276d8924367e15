//! 計測ツール 1 回分の実行結果と、失敗時の扱い

use common::error::Error;
use std::fmt;
use std::str::FromStr;

/// 計測ツールの終了コードと出力
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Measurement {
    /// 終了コード（シグナル終了時は None）
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl Measurement {
    /// 失敗とみなす理由（終了コード 0 かつ stdout が空白以外を含めば None）
    pub fn failure_reason(&self) -> Option<String> {
        match self.exit_code {
            Some(0) => {}
            Some(code) => return Some(format!("speedtest exited with code {}", code)),
            None => return Some("speedtest was terminated by a signal".to_string()),
        }
        if self.stdout.trim().is_empty() {
            return Some("speedtest produced no output".to_string());
        }
        None
    }
}

/// 計測失敗時に行を追記するかどうか
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// 空または途中までの出力のまま追記し、成功扱いで終える（record の既定）
    Append,
    /// 何も追記しない（watch の既定）
    Skip,
}

impl FromStr for FailurePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "append" => Ok(Self::Append),
            "skip" => Ok(Self::Skip),
            _ => Err(Error::invalid_argument(format!(
                "unknown failure policy '{}' (expected append or skip)",
                s
            ))),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Append => f.write_str("append"),
            Self::Skip => f.write_str("skip"),
        }
    }
}
