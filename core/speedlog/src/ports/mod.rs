//! Ports & Adapters のポート定義
//!
//! - inbound: ドライバ（CLI）がアプリを呼び出すインターフェース
//! - outbound: 計測ツール・CSV 追記・割り込み・待機の trait（common の Clock / Log 等も利用）

pub mod inbound;
pub mod outbound;
