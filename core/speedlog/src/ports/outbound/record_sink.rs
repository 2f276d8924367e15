//! 計測レコードの追記先 Outbound ポート

use crate::domain::SpeedRecord;
use common::error::Error;

/// レコードを 1 行として追記する
pub trait RecordSink: Send + Sync {
    fn append(&self, record: &SpeedRecord) -> Result<(), Error>;
}
