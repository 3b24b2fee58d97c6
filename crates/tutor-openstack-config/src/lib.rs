pub mod error;
pub mod settings;

pub use error::*;
pub use settings::*;

use std::path::{Path, PathBuf};

/// ホストツールがプロジェクトルートに使う環境変数
pub const ROOT_ENV: &str = "TUTOR_ROOT";

/// プロジェクトルート内の設定ファイル名
pub const CONFIG_FILE: &str = "config.yml";

/// Tutor のプロジェクトルートを決定する
///
/// 優先順位:
/// 1. 明示的に渡されたパス (`--root`)
/// 2. 環境変数 TUTOR_ROOT
/// 3. `<data_local_dir>/tutor`
pub fn project_root(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    if let Ok(root) = std::env::var(ROOT_ENV)
        && !root.is_empty()
    {
        return Ok(PathBuf::from(root));
    }

    dirs::data_local_dir()
        .map(|dir| dir.join("tutor"))
        .ok_or(ConfigError::DataDirNotFound)
}

/// `<root>/config.yml` からプラグイン設定を読み込む
///
/// ファイルが空の場合はデフォルト値を返す
pub fn load(root: &Path) -> Result<OpenStackSettings> {
    let path = root.join(CONFIG_FILE);
    if !path.exists() {
        return Err(ConfigError::ConfigNotFound { path });
    }

    tracing::debug!("Loading settings from {}", path.display());
    let content = std::fs::read_to_string(&path)?;
    if content.trim().is_empty() {
        return Ok(OpenStackSettings::default());
    }

    serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse { path, source })
}
