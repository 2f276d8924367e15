//! 解決済みの実行設定と、CLI から渡される上書き値

use super::measurement::FailurePolicy;
use super::schedule::Schedule;
use super::timezone::TimeZoneSpec;
use std::path::PathBuf;

/// 既定の計測サーバー ID
pub const DEFAULT_SERVER_ID: &str = "48463";

/// 既定の計測ツール（PATH から探す）
pub fn default_executable() -> PathBuf {
    if cfg!(windows) {
        PathBuf::from("speedtest.exe")
    } else {
        PathBuf::from("speedtest")
    }
}

/// 既定値・設定ファイル・環境変数・CLI を重ねた結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub executable: PathBuf,
    pub server_id: String,
    pub output_file: PathBuf,
    pub timezone: TimeZoneSpec,
    pub schedule: Schedule,
    /// 計測失敗時の扱い（None ならコマンドごとの既定）
    pub on_failure: Option<FailurePolicy>,
}

impl Settings {
    /// 既定値（出力先だけは呼び出し側が決める）
    pub fn with_output(output_file: impl Into<PathBuf>) -> Self {
        Self {
            executable: default_executable(),
            server_id: DEFAULT_SERVER_ID.to_string(),
            output_file: output_file.into(),
            timezone: TimeZoneSpec::default(),
            schedule: Schedule::default(),
            on_failure: None,
        }
    }

    /// 明示指定がなければ default を使う
    pub fn failure_policy_or(&self, default: FailurePolicy) -> FailurePolicy {
        self.on_failure.unwrap_or(default)
    }
}

/// CLI オプションによる上書き（未指定は None / false）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsOverrides {
    pub config_file: Option<PathBuf>,
    pub executable: Option<String>,
    pub server_id: Option<String>,
    pub output_file: Option<String>,
    pub timezone: Option<String>,
    pub interval_minutes: Option<u32>,
    pub offset_minutes: Option<u32>,
    pub on_failure: Option<FailurePolicy>,
}
