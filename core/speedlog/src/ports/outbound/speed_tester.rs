//! 計測ツール実行の Outbound ポート

use crate::domain::Measurement;
use common::error::Error;

/// 指定サーバーに対して 1 回計測する
///
/// 起動できなかった場合のみ Err。ツールの失敗（非 0 終了・空出力）は Measurement で返す。
pub trait SpeedTester: Send + Sync {
    fn measure(&self, server_id: &str) -> Result<Measurement, Error>;
}
