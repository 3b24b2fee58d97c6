//! ローカルレジストリのブートストラップ
//!
//! ```text
//! NotStarted → ConfigWritten → RegistryLaunched → Polling → Ready
//!                                                        ↘ Exhausted
//! ```
//!
//! 認証情報入りの設定ファイルはこの関数のスコープが所有し、
//! どの経路で戻る場合も戻る前に削除される。

use crate::config::RegistryConfig;
use crate::converter::{registry_spec, registry_ui_spec};
use crate::credfile::write_credentials_file;
use crate::error::{RegistryError, Result};
use crate::runtime::ContainerLauncher;
use crate::waiter::HealthCheck;
use std::path::PathBuf;
use tutor_openstack_cloud::CloudCredentials;

/// ブートストラップの進行状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapState {
    NotStarted,
    ConfigWritten,
    RegistryLaunched,
    Polling,
    Ready,
    Exhausted,
}

impl std::fmt::Display for BootstrapState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BootstrapState::NotStarted => "not started",
            BootstrapState::ConfigWritten => "configuration written",
            BootstrapState::RegistryLaunched => "registry launched",
            BootstrapState::Polling => "waiting for registry",
            BootstrapState::Ready => "ready",
            BootstrapState::Exhausted => "exhausted",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BootstrapOptions {
    pub with_ui: bool,
}

/// ブートストラップ結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapReport {
    pub registry_container: String,
    pub ui_container: Option<String>,
    /// 準備完了までのヘルスチェック試行回数
    pub attempts: u32,
    /// 使用した一時設定ファイルのパス（既に削除済み）
    pub config_path: PathBuf,
}

/// レジストリを起動し、応答するまで待機する
///
/// `progress` は状態が進むたびに呼ばれる。
pub async fn bootstrap<L: ContainerLauncher>(
    credentials: &CloudCredentials,
    launcher: &L,
    health: &HealthCheck,
    options: BootstrapOptions,
    mut progress: impl FnMut(BootstrapState),
) -> Result<BootstrapReport> {
    progress(BootstrapState::NotStarted);

    let config = RegistryConfig::from_credentials(credentials);
    let (registry_container, attempts, config_path) = {
        let file = write_credentials_file(&config)?;
        let config_path = file.path().to_path_buf();
        progress(BootstrapState::ConfigWritten);

        let registry_container = launcher.launch(&registry_spec(&config_path)).await?;
        progress(BootstrapState::RegistryLaunched);

        progress(BootstrapState::Polling);
        let attempts = match health.wait().await {
            Ok(attempts) => attempts,
            Err(e @ RegistryError::HealthCheckExhausted { .. }) => {
                progress(BootstrapState::Exhausted);
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        file.close()?;
        tracing::debug!("Removed registry configuration {}", config_path.display());
        (registry_container, attempts, config_path)
    };
    progress(BootstrapState::Ready);

    let ui_container = if options.with_ui {
        Some(launcher.launch(&registry_ui_spec()).await?)
    } else {
        None
    };

    Ok(BootstrapReport {
        registry_container,
        ui_container,
        attempts,
        config_path,
    })
}
