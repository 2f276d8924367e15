//! 環境変数解決 Outbound ポート
//!
//! usecase / adapter はこの trait 経由でのみ環境変数にアクセスする。

use crate::domain::Dirs;
use crate::error::Error;

/// 環境変数解決抽象（Outbound ポート）
///
/// 実装は `common::adapter::StdEnvResolver` やテスト用のモックなど。
pub trait EnvResolver: Send + Sync {
    /// 環境変数を取得する（未設定・空文字は None）
    fn var(&self, name: &str) -> Option<String>;

    /// 実行時ディレクトリを解決する
    ///
    /// 優先順位:
    /// 1. SPEEDLOG_HOME（設定されていれば全てその配下）
    /// 2. config: $XDG_CONFIG_HOME/speedlog（既定 ~/.config/speedlog）
    ///    state: $XDG_STATE_HOME/speedlog（既定 ~/.local/state/speedlog）
    ///    data: ~/speedtest
    fn resolve_dirs(&self) -> Result<Dirs, Error>;
}
