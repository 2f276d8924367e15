//! 標準環境変数解決実装（std::env を委譲）

use crate::domain::Dirs;
use crate::error::Error;
use crate::ports::outbound::EnvResolver;
use std::env;
use std::path::PathBuf;

/// 標準環境変数解決実装
#[derive(Debug, Clone, Default)]
pub struct StdEnvResolver;

impl EnvResolver for StdEnvResolver {
    fn var(&self, name: &str) -> Option<String> {
        env::var(name).ok().filter(|s| !s.is_empty())
    }

    fn resolve_dirs(&self) -> Result<Dirs, Error> {
        resolve_dirs_with(|name| self.var(name))
    }
}

/// 環境変数の取得関数を受け取って Dirs を組み立てる（テストから直接呼べるよう分離）
pub(crate) fn resolve_dirs_with<F>(var: F) -> Result<Dirs, Error>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(home) = var("SPEEDLOG_HOME") {
        return Ok(Dirs::under(home));
    }

    let home = var("HOME")
        .or_else(|| var("USERPROFILE"))
        .map(PathBuf::from)
        .ok_or_else(|| Error::env("HOME is not set (set SPEEDLOG_HOME to choose a directory)"))?;

    let config_base = var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| home.join(".config"));
    let state_base = var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| home.join(".local").join("state"));

    Ok(Dirs {
        config_dir: config_base.join("speedlog"),
        state_dir: state_base.join("speedlog"),
        data_dir: home.join("speedtest"),
    })
}
