//! 認証情報入りの一時設定ファイル
//!
//! 返される [`NamedTempFile`] がスコープを抜けるとファイルは削除される。

use crate::config::RegistryConfig;
use crate::error::Result;
use std::io::Write;
use tempfile::NamedTempFile;

/// レジストリ設定を一時ファイルに書き出す（パーミッション 0600）
pub fn write_credentials_file(config: &RegistryConfig) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("tutor-registry-")
        .suffix(".yml")
        .tempfile()?;

    file.write_all(config.to_yaml()?.as_bytes())?;
    file.flush()?;

    tracing::debug!("Wrote registry configuration to {}", file.path().display());
    Ok(file)
}
