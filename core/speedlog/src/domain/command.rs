//! speedlog コマンドの enum（Command Pattern）
//!
//! 引数解析の結果を enum に落とし、main の match でディスパッチする。

/// speedlog のサブコマンド
///
/// コマンドなし = Record（1 回計測して追記）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// ヘルプ表示
    Help,

    /// 1 回計測して CSV に 1 行追記する
    Record,

    /// スケジュールに従って計測を繰り返す（count 回で終了、None なら Ctrl+C まで）
    Watch { count: Option<u32> },

    /// 解決済みの設定を表示する
    ShowConfig,

    /// 未知のコマンド（エラー用）
    Unknown(String),
}

impl Command {
    /// コマンド名から Command に解析する（watch の count は別途渡す）
    pub fn parse(name: &str, count: Option<u32>) -> Self {
        match name {
            "record" => Command::Record,
            "watch" => Command::Watch { count },
            "config" => Command::ShowConfig,
            "help" => Command::Help,
            other => Command::Unknown(other.to_string()),
        }
    }

    /// ログ用のコマンド名
    pub fn name(&self) -> &str {
        match self {
            Command::Help => "help",
            Command::Record => "record",
            Command::Watch { .. } => "watch",
            Command::ShowConfig => "config",
            Command::Unknown(name) => name,
        }
    }
}
